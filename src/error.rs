//! Error types for the lookup client.

use std::io;
use std::net::IpAddr;
use std::path::PathBuf;

use maxminddb::MaxMindDBError;
use thiserror::Error;

/// Exit status for argument errors and databases that cannot be opened.
pub const EXIT_USAGE: u8 = 1;

/// Exit status for failures after the database was opened.
pub const EXIT_LOOKUP: u8 = 2;

/// Error returned by the lookup client.
///
/// Every variant is fatal. Messages describe only the failing step; the
/// underlying cause is reachable through [`std::error::Error::source`] and
/// the binary prints the whole chain before exiting with
/// [`LookupError::exit_code`].
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum LookupError {
    /// The database file is missing, unreadable, or not a MaxMind DB.
    #[error("cannot open database {}", .path.display())]
    Open {
        /// Path given on the command line.
        path: PathBuf,
        /// Error reported by the reader.
        #[source]
        source: MaxMindDBError,
    },

    /// Memory-mapped access was requested but the binary was built without it.
    #[error("cannot open database {}: built without the `mmap` feature", .path.display())]
    MmapUnsupported {
        /// Path given on the command line.
        path: PathBuf,
    },

    /// An IPv6 address was looked up in an IPv4-only database.
    #[error("cannot look up IPv6 address {address} in an IPv4-only database")]
    AddressFamily {
        /// Address given on the command line.
        address: IpAddr,
    },

    /// The reader failed while walking the tree or decoding the record.
    #[error("lookup of {address} failed")]
    Lookup {
        /// Address given on the command line.
        address: IpAddr,
        /// Error reported by the reader.
        #[source]
        source: MaxMindDBError,
    },

    /// The record could not be rendered as JSON.
    #[error("cannot serialize record")]
    Serialize(
        #[from]
        #[source]
        serde_json::Error,
    ),

    /// Writing the rendered record failed.
    #[error("cannot write output")]
    Output(
        #[from]
        #[source]
        io::Error,
    ),
}

impl LookupError {
    /// Process exit status for this error.
    ///
    /// Open failures share the status of argument errors; anything after a
    /// successful open uses [`EXIT_LOOKUP`].
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            LookupError::Open { .. } | LookupError::MmapUnsupported { .. } => EXIT_USAGE,
            LookupError::AddressFamily { .. }
            | LookupError::Lookup { .. }
            | LookupError::Serialize(_)
            | LookupError::Output(_) => EXIT_LOOKUP,
        }
    }
}
