//! JSON output: the record collection serialized as a pretty-printed array.

use std::io::{self, Write};

use browser_vault_core::ArtifactOutcome;

pub fn write<W: Write>(outcome: &ArtifactOutcome, mut writer: W) -> io::Result<()> {
    let result = match outcome {
        ArtifactOutcome::Passwords(records) => serde_json::to_writer_pretty(&mut writer, records),
        ArtifactOutcome::Cookies(records) => serde_json::to_writer_pretty(&mut writer, records),
        ArtifactOutcome::History(records) => serde_json::to_writer_pretty(&mut writer, records),
        ArtifactOutcome::Bookmarks(records) => serde_json::to_writer_pretty(&mut writer, records),
    };

    result.map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    writeln!(writer)
}
