//! The single lookup a run performs: open, look up, render, write.

use std::io::Write;

use crate::config::{LookupConfig, OpenMode};
use crate::database::Database;
use crate::error::LookupError;
use crate::record::Record;

/// Open the configured database, look up the configured address and write
/// the record to `out` as one JSON document followed by a newline.
///
/// The database is dropped before this returns, on success and on error.
/// Nothing is written unless the record was decoded and rendered.
pub fn run<W: Write>(config: &LookupConfig, out: &mut W) -> Result<(), LookupError> {
    match config.mode {
        OpenMode::File => {
            let db = Database::open_readfile(&config.database)?;
            write_record(&db, config, out)
        }
        #[cfg(feature = "mmap")]
        OpenMode::Mmap => {
            let db = Database::open_mmap(&config.database)?;
            write_record(&db, config, out)
        }
        #[cfg(not(feature = "mmap"))]
        OpenMode::Mmap => Err(LookupError::MmapUnsupported {
            path: config.database.clone(),
        }),
    }
}

fn write_record<S, W>(
    db: &Database<S>,
    config: &LookupConfig,
    out: &mut W,
) -> Result<(), LookupError>
where
    S: AsRef<[u8]>,
    W: Write,
{
    let record = db.lookup(config.address)?;
    let mut rendered = render(&record, config.pretty)?;
    rendered.push('\n');
    out.write_all(rendered.as_bytes())?;
    out.flush()?;
    Ok(())
}

/// Render a record as JSON, compact unless `pretty` is set.
pub fn render(record: &Record, pretty: bool) -> Result<String, LookupError> {
    let rendered = if pretty {
        serde_json::to_string_pretty(record)?
    } else {
        serde_json::to_string(record)?
    };
    Ok(rendered)
}
