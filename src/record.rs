//! The lookup result record.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::value::{self, Value};

/// The record stored for a network, decoded field by field.
///
/// Fields missing from the stored map keep their zero value, and a lookup
/// that finds no network yields [`Record::default()`]. A field present with
/// an incompatible type fails the decode. Keys the record does not know
/// are skipped.
///
/// Serialization writes the fields in declaration order under their
/// database names (`i32`, `f32`, ... `bool`).
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct Record {
    #[serde(rename = "i32")]
    pub int32: i32,
    #[serde(rename = "f32")]
    pub float32: f32,
    #[serde(rename = "f64")]
    pub float64: f64,
    #[serde(rename = "u16")]
    pub uint16: u16,
    #[serde(rename = "u32")]
    pub uint32: u32,
    #[serde(rename = "u64")]
    pub uint64: u64,
    #[serde(rename = "u128")]
    pub uint128: u128,
    pub array: Vec<Value>,
    pub map: BTreeMap<String, Value>,
    #[serde(with = "value::bytes")]
    pub bytes: Vec<u8>,
    pub string: String,
    #[serde(rename = "bool")]
    pub boolean: bool,
}
