//! Read-only database handle.

use std::net::IpAddr;
use std::path::Path;

use ipnetwork::IpNetwork;
use log::{debug, info};
use maxminddb::{MaxMindDBError, Metadata, Reader};

#[cfg(feature = "mmap")]
use maxminddb::Mmap;

use crate::error::LookupError;
use crate::record::Record;

/// An open MaxMind DB file. The type parameter is the buffer holding the
/// file contents; it is released when the `Database` is dropped.
///
/// # Example
///
/// ```no_run
/// use mmdb_lookup::Database;
///
/// let db = Database::open_readfile("/usr/local/share/GeoIP/test.mmdb")?;
/// let record = db.lookup("1.1.1.1".parse().unwrap())?;
/// println!("{}", record.string);
/// # Ok::<(), mmdb_lookup::LookupError>(())
/// ```
#[derive(Debug)]
pub struct Database<S: AsRef<[u8]>> {
    reader: Reader<S>,
}

#[cfg(feature = "mmap")]
impl Database<Mmap> {
    /// Open a database file by memory mapping it.
    pub fn open_mmap<P: AsRef<Path>>(path: P) -> Result<Database<Mmap>, LookupError> {
        let path = path.as_ref();
        let reader = Reader::open_mmap(path).map_err(|source| LookupError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Database::opened(path, reader))
    }
}

impl Database<Vec<u8>> {
    /// Open a database file by loading it into memory.
    pub fn open_readfile<P: AsRef<Path>>(path: P) -> Result<Database<Vec<u8>>, LookupError> {
        let path = path.as_ref();
        let reader = Reader::open_readfile(path).map_err(|source| LookupError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Database::opened(path, reader))
    }
}

impl<S: AsRef<[u8]>> Database<S> {
    /// Wrap a database already held in memory.
    pub fn from_source(buf: S) -> Result<Database<S>, MaxMindDBError> {
        Ok(Database {
            reader: Reader::from_source(buf)?,
        })
    }

    fn opened(path: &Path, reader: Reader<S>) -> Database<S> {
        let metadata = &reader.metadata;
        info!("opened {}", path.display());
        debug!(
            "database_type={} ip_version={} node_count={} record_size={} build_epoch={}",
            metadata.database_type,
            metadata.ip_version,
            metadata.node_count,
            metadata.record_size,
            metadata.build_epoch
        );
        Database { reader }
    }

    #[must_use]
    pub fn metadata(&self) -> &Metadata {
        &self.reader.metadata
    }

    /// Look up `address` and decode its record.
    ///
    /// An address the database does not contain yields
    /// [`Record::default()`], not an error.
    pub fn lookup(&self, address: IpAddr) -> Result<Record, LookupError> {
        self.lookup_network(address).map(|(record, _)| record)
    }

    /// Like [`Database::lookup`], also returning the network that matched.
    /// The network is `None` when the address was not found.
    ///
    /// An IPv4-mapped IPv6 address (`::ffff:a.b.c.d`) is looked up as the
    /// IPv4 address it carries.
    pub fn lookup_network(
        &self,
        address: IpAddr,
    ) -> Result<(Record, Option<IpNetwork>), LookupError> {
        let address = unmap_ipv4(address);
        if address.is_ipv6() && self.reader.metadata.ip_version == 4 {
            return Err(LookupError::AddressFamily { address });
        }

        match self.reader.lookup_prefix::<Record>(address) {
            Ok((record, prefix_len)) => {
                let network = matched_network(address, prefix_len);
                match network {
                    Some(network) => debug!("{address} matched {network}"),
                    None => debug!("{address} matched with prefix length {prefix_len}"),
                }
                Ok((record, network))
            }
            Err(MaxMindDBError::AddressNotFoundError(_)) => {
                debug!("{address} not found");
                Ok((Record::default(), None))
            }
            Err(source) => Err(LookupError::Lookup { address, source }),
        }
    }
}

fn unmap_ipv4(address: IpAddr) -> IpAddr {
    match address {
        IpAddr::V6(v6) => v6.to_ipv4_mapped().map_or(address, IpAddr::V4),
        IpAddr::V4(_) => address,
    }
}

fn matched_network(address: IpAddr, prefix_len: usize) -> Option<IpNetwork> {
    let prefix = u8::try_from(prefix_len).ok()?;
    let network = IpNetwork::new(address, prefix).ok()?;
    IpNetwork::new(network.network(), prefix).ok()
}
