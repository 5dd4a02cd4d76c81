//! Command-line surface.
//!
//! Arguments are parsed exactly once into a [`LookupConfig`], which is then
//! handed to [`crate::lookup::run`].

use std::net::IpAddr;
use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};
use log::LevelFilter;

/// How the database file is brought into memory.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OpenMode {
    /// Read the whole file into memory
    #[default]
    File,
    /// Memory-map the file (requires the `mmap` feature)
    Mmap,
}

#[derive(Parser, Debug)]
#[command(name = "mmdb-lookup")]
#[command(
    about = "Look up an IP address in a MaxMind DB file and print the record as JSON",
    long_about = "mmdb-lookup - look up one IP address in a MaxMind DB (.mmdb) file\n\n\
    The record found for the address is printed as a single JSON object with the\n\
    fields i32, f32, f64, u16, u32, u64, u128, array, map, bytes, string and bool.\n\
    Fields the record does not carry, and addresses the database does not\n\
    contain, print as zero values.\n\n\
    Examples:\n\
      mmdb-lookup --db test.mmdb --ip 1.1.1.1\n\
      mmdb-lookup --db test.mmdb --ip 2001:db8::1 --pretty"
)]
#[command(version)]
pub struct Cli {
    /// Path to the MaxMind DB file
    #[arg(long = "db", value_name = "PATH", value_parser = non_empty_path)]
    pub database: PathBuf,

    /// IP address to look up (IPv4 or IPv6)
    #[arg(long = "ip", value_name = "ADDRESS")]
    pub address: IpAddr,

    /// How to open the database
    #[arg(long, value_enum, default_value_t = OpenMode::File)]
    pub mode: OpenMode,

    /// Pretty-print the JSON record
    #[arg(long)]
    pub pretty: bool,

    /// Increase log verbosity on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Log level selected by the `-v` flags. `RUST_LOG` still takes precedence.
    #[must_use]
    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    /// Freeze the parsed flags into the configuration for one run.
    #[must_use]
    pub fn into_config(self) -> LookupConfig {
        LookupConfig {
            database: self.database,
            address: self.address,
            mode: self.mode,
            pretty: self.pretty,
        }
    }
}

/// Everything a single lookup needs, fixed at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LookupConfig {
    /// Path of the `.mmdb` file.
    pub database: PathBuf,
    /// Address to look up.
    pub address: IpAddr,
    /// How the database is loaded.
    pub mode: OpenMode,
    /// Print multi-line JSON.
    pub pretty: bool,
}

fn non_empty_path(value: &str) -> Result<PathBuf, String> {
    if value.is_empty() {
        Err("database path must not be empty".to_owned())
    } else {
        Ok(PathBuf::from(value))
    }
}
