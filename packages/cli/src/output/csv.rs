//! CSV output, one row per record, columns matching each record type's fields.

use std::io::{self, Write};

use browser_vault_core::ArtifactOutcome;

pub fn write<W: Write>(outcome: &ArtifactOutcome, writer: W) -> io::Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    match outcome {
        ArtifactOutcome::Passwords(records) => {
            for record in records {
                csv_writer
                    .serialize(record)
                    .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
            }
        }
        ArtifactOutcome::Cookies(records) => {
            for record in records {
                csv_writer
                    .serialize(record)
                    .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
            }
        }
        ArtifactOutcome::History(records) => {
            for record in records {
                csv_writer
                    .serialize(record)
                    .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
            }
        }
        ArtifactOutcome::Bookmarks(records) => {
            for record in records {
                csv_writer
                    .serialize(record)
                    .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
            }
        }
    }

    csv_writer
        .flush()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))
}
