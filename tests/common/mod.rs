//! Builds small MaxMind DB files for tests.
//!
//! The builder writes a 24-bit record search tree, the 16-byte separator,
//! a data section with every record stored inline (no pointers), and the
//! metadata map. That is enough for the reader to treat the result like
//! any other database.
#![allow(dead_code)]

use std::fs;
use std::net::IpAddr;
use std::path::{Path, PathBuf};

use ipnetwork::IpNetwork;

const METADATA_START_MARKER: &[u8] = b"\xab\xcd\xefMaxMind.com";
const DATA_SECTION_SEPARATOR_SIZE: usize = 16;

const TYPE_STRING: u8 = 2;
const TYPE_DOUBLE: u8 = 3;
const TYPE_BYTES: u8 = 4;
const TYPE_UINT16: u8 = 5;
const TYPE_UINT32: u8 = 6;
const TYPE_MAP: u8 = 7;
const TYPE_INT32: u8 = 8;
const TYPE_UINT64: u8 = 9;
const TYPE_UINT128: u8 = 10;
const TYPE_ARRAY: u8 = 11;
const TYPE_BOOL: u8 = 14;
const TYPE_FLOAT: u8 = 15;

/// A value to store in the data section.
#[derive(Clone, Debug)]
pub enum Data {
    Str(String),
    F64(f64),
    Bytes(Vec<u8>),
    U16(u16),
    U32(u32),
    Map(Vec<(String, Data)>),
    I32(i32),
    U64(u64),
    U128(u128),
    Array(Vec<Data>),
    Bool(bool),
    F32(f32),
}

impl Data {
    pub fn str(s: &str) -> Data {
        Data::Str(s.to_owned())
    }

    pub fn map(entries: Vec<(&str, Data)>) -> Data {
        Data::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.to_owned(), v))
                .collect(),
        )
    }

    fn encode(&self, out: &mut Vec<u8>) {
        match self {
            Data::Str(s) => {
                write_control(out, TYPE_STRING, s.len());
                out.extend_from_slice(s.as_bytes());
            }
            Data::F64(v) => {
                write_control(out, TYPE_DOUBLE, 8);
                out.extend_from_slice(&v.to_be_bytes());
            }
            Data::Bytes(b) => {
                write_control(out, TYPE_BYTES, b.len());
                out.extend_from_slice(b);
            }
            Data::U16(v) => write_uint(out, TYPE_UINT16, &v.to_be_bytes()),
            Data::U32(v) => write_uint(out, TYPE_UINT32, &v.to_be_bytes()),
            Data::Map(entries) => {
                write_control(out, TYPE_MAP, entries.len());
                for (key, value) in entries {
                    Data::Str(key.clone()).encode(out);
                    value.encode(out);
                }
            }
            Data::I32(v) => {
                write_control(out, TYPE_INT32, 4);
                out.extend_from_slice(&v.to_be_bytes());
            }
            Data::U64(v) => write_uint(out, TYPE_UINT64, &v.to_be_bytes()),
            Data::U128(v) => write_uint(out, TYPE_UINT128, &v.to_be_bytes()),
            Data::Array(items) => {
                write_control(out, TYPE_ARRAY, items.len());
                for item in items {
                    item.encode(out);
                }
            }
            Data::Bool(v) => write_control(out, TYPE_BOOL, usize::from(*v)),
            Data::F32(v) => {
                write_control(out, TYPE_FLOAT, 4);
                out.extend_from_slice(&v.to_be_bytes());
            }
        }
    }
}

fn write_control(out: &mut Vec<u8>, type_num: u8, size: usize) {
    let (size_bits, extra): (u8, Vec<u8>) = if size < 29 {
        (size as u8, Vec::new())
    } else if size < 285 {
        (29, vec![(size - 29) as u8])
    } else if size < 65_821 {
        (30, ((size - 285) as u16).to_be_bytes().to_vec())
    } else {
        (31, ((size - 65_821) as u32).to_be_bytes()[1..].to_vec())
    };

    if type_num < 8 {
        out.push((type_num << 5) | size_bits);
    } else {
        // extended type: the type byte follows the control byte
        out.push(size_bits);
        out.push(type_num - 7);
    }
    out.extend_from_slice(&extra);
}

fn write_uint(out: &mut Vec<u8>, type_num: u8, be_bytes: &[u8]) {
    let start = be_bytes
        .iter()
        .position(|&b| b != 0)
        .unwrap_or(be_bytes.len());
    write_control(out, type_num, be_bytes.len() - start);
    out.extend_from_slice(&be_bytes[start..]);
}

#[derive(Clone, Copy, Debug)]
enum Slot {
    Empty,
    Node(usize),
    Data(usize),
}

/// Builds a database in memory, one network at a time.
pub struct MmdbBuilder {
    ip_version: u16,
    database_type: String,
    nodes: Vec<[Slot; 2]>,
    records: Vec<Data>,
}

impl MmdbBuilder {
    pub fn new(ip_version: u16) -> MmdbBuilder {
        assert!(ip_version == 4 || ip_version == 6);
        MmdbBuilder {
            ip_version,
            database_type: "test_client".to_owned(),
            nodes: vec![[Slot::Empty; 2]],
            records: Vec::new(),
        }
    }

    pub fn database_type(mut self, database_type: &str) -> MmdbBuilder {
        self.database_type = database_type.to_owned();
        self
    }

    /// Store `data` for `network`. A later insert for a more specific
    /// network splits the earlier one.
    pub fn insert(mut self, network: &str, data: Data) -> MmdbBuilder {
        let network: IpNetwork = network.parse().expect("valid network");
        let (bits, prefix_len, depth) = self.tree_position(network);
        assert!(prefix_len > 0, "cannot insert a /0 network");

        let index = self.records.len();
        self.records.push(data);

        let mut node = 0;
        for i in 0..prefix_len {
            let bit = ((bits >> (depth - 1 - i)) & 1) as usize;
            if i + 1 == prefix_len {
                self.nodes[node][bit] = Slot::Data(index);
                break;
            }
            node = match self.nodes[node][bit] {
                Slot::Node(child) => child,
                other => {
                    let child = self.nodes.len();
                    self.nodes.push([other, other]);
                    self.nodes[node][bit] = Slot::Node(child);
                    child
                }
            };
        }
        self
    }

    fn tree_position(&self, network: IpNetwork) -> (u128, usize, usize) {
        let prefix = usize::from(network.prefix());
        match (network.network(), self.ip_version) {
            (IpAddr::V4(ip), 4) => (u128::from(u32::from(ip)), prefix, 32),
            // IPv4 lives under ::/96 in an IPv6 tree
            (IpAddr::V4(ip), _) => (u128::from(u32::from(ip)), prefix + 96, 128),
            (IpAddr::V6(ip), 6) => (u128::from(ip), prefix, 128),
            (IpAddr::V6(_), _) => panic!("IPv6 network in an IPv4 database"),
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let node_count = self.nodes.len();

        let mut data = Vec::new();
        let mut offsets = Vec::with_capacity(self.records.len());
        for record in &self.records {
            offsets.push(data.len());
            record.encode(&mut data);
        }

        let mut out = Vec::new();
        for node in &self.nodes {
            for slot in node {
                let value = match *slot {
                    Slot::Empty => node_count,
                    Slot::Node(child) => child,
                    Slot::Data(index) => node_count + DATA_SECTION_SEPARATOR_SIZE + offsets[index],
                };
                assert!(value < 1 << 24, "record value does not fit 24 bits");
                out.extend_from_slice(&(value as u32).to_be_bytes()[1..]);
            }
        }
        out.extend_from_slice(&[0_u8; DATA_SECTION_SEPARATOR_SIZE]);
        out.extend_from_slice(&data);
        out.extend_from_slice(METADATA_START_MARKER);
        self.metadata(node_count).encode(&mut out);
        out
    }

    fn metadata(&self, node_count: usize) -> Data {
        Data::map(vec![
            ("binary_format_major_version", Data::U16(2)),
            ("binary_format_minor_version", Data::U16(0)),
            ("build_epoch", Data::U64(1_700_000_000)),
            ("database_type", Data::str(&self.database_type)),
            (
                "description",
                Data::map(vec![("en", Data::str("for testing purposes only"))]),
            ),
            ("ip_version", Data::U16(self.ip_version)),
            ("languages", Data::Array(vec![Data::str("en")])),
            ("node_count", Data::U32(node_count as u32)),
            ("record_size", Data::U16(24)),
        ])
    }

    pub fn write_to(&self, dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, self.to_bytes()).expect("write test database");
        path
    }
}

/// A record carrying every field with a non-zero value.
pub fn sample_record() -> Data {
    Data::map(vec![
        ("i32", Data::I32(-268_435_456)),
        ("f32", Data::F32(1.1)),
        ("f64", Data::F64(42.123_456)),
        ("u16", Data::U16(100)),
        ("u32", Data::U32(268_435_456)),
        ("u64", Data::U64(1_152_921_504_606_846_976)),
        ("u128", Data::U128(1 << 120)),
        (
            "array",
            Data::Array(vec![Data::U32(1), Data::U32(2), Data::U32(3)]),
        ),
        (
            "map",
            Data::map(vec![(
                "mapX",
                Data::map(vec![
                    (
                        "arrayX",
                        Data::Array(vec![Data::U32(7), Data::U32(8), Data::U32(9)]),
                    ),
                    ("utf8_stringX", Data::str("hello")),
                ]),
            )]),
        ),
        ("bytes", Data::Bytes(vec![0, 0, 0, 42])),
        ("string", Data::str("unicode! \u{262f} - \u{266b}")),
        ("bool", Data::Bool(true)),
    ])
}

/// `sample_record()` as the client prints it.
pub const SAMPLE_JSON: &str = concat!(
    r#"{"i32":-268435456,"f32":1.1,"f64":42.123456,"u16":100,"u32":268435456,"#,
    r#""u64":1152921504606846976,"u128":1329227995784915872903807060280344576,"#,
    r#""array":[1,2,3],"map":{"mapX":{"arrayX":[7,8,9],"utf8_stringX":"hello"}},"#,
    r#""bytes":"AAAAKg==","string":"unicode! ☯ - ♫","bool":true}"#
);

/// The record printed for an address the database does not contain.
pub const EMPTY_JSON: &str = r#"{"i32":0,"f32":0.0,"f64":0.0,"u16":0,"u32":0,"u64":0,"u128":0,"array":[],"map":{},"bytes":"","string":"","bool":false}"#;

/// An IPv4 database with the sample record at 1.0.0.0/8 and smaller
/// records at 2.0.0.0/8 and 1.10.10.0/24.
pub fn sample_ipv4_database() -> MmdbBuilder {
    MmdbBuilder::new(4)
        .insert("1.0.0.0/8", sample_record())
        .insert(
            "2.0.0.0/8",
            Data::map(vec![("string", Data::str("two")), ("u16", Data::U16(2))]),
        )
        .insert(
            "1.10.10.0/24",
            Data::map(vec![("string", Data::str("subnet")), ("bool", Data::Bool(true))]),
        )
}
