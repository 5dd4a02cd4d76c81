#![deny(trivial_casts, trivial_numeric_casts, unused_import_braces)]
//! # mmdb-lookup
//!
//! A small client for MaxMind DB files: open a database, look up one IP
//! address, and print the stored record as JSON.
//!
//! The binary format itself is read by the [`maxminddb`] crate. This crate
//! supplies the fixed [`Record`] shape the client decodes into, the
//! [`Value`] type for its untyped `array` and `map` fields, and the JSON
//! rendering.
//!
//! ## Features
//!
//! - **`mmap`** (default: disabled): allow `--mode mmap`, which memory maps
//!   the database instead of reading it into memory
//! - **`unsafe-str-decode`** (default: disabled): skip UTF-8 validation of
//!   strings in the database
//!
//! ## Example
//!
//! ```no_run
//! use mmdb_lookup::{lookup, Database};
//!
//! let db = Database::open_readfile("test.mmdb")?;
//! let record = db.lookup("1.1.1.1".parse().unwrap())?;
//! println!("{}", lookup::render(&record, false)?);
//! # Ok::<(), mmdb_lookup::LookupError>(())
//! ```

pub mod config;
mod database;
mod error;
pub mod lookup;
mod record;
mod value;

pub use config::{Cli, LookupConfig, OpenMode};
pub use database::Database;
pub use error::{LookupError, EXIT_LOOKUP, EXIT_USAGE};
pub use record::Record;
pub use value::Value;

pub use maxminddb::{MaxMindDBError, Metadata};

#[cfg(feature = "mmap")]
pub use maxminddb::Mmap;
