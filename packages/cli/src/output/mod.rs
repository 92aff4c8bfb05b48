//! Output sinks. Each sink is a pure emitter handed a typed, immutable collection; sinks never
//! mutate records. File naming is `{browser}_{kind}.{ext}` under the caller's output directory;
//! `console` writes a formatted table to stdout instead of a file.

pub mod console;
pub mod csv;
pub mod json;

use std::fmt;
use std::fs::File;
use std::path::Path;
use std::str::FromStr;

use browser_vault_core::{ArtifactKind, ArtifactOutcome, Browser};

#[derive(Debug, Clone, Copy)]
pub enum Format {
    Csv,
    Json,
    Console,
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "csv" => Ok(Format::Csv),
            "json" => Ok(Format::Json),
            "console" => Ok(Format::Console),
            _ => Err(format!(
                "'{s}' is not one of the supported output formats (csv, json, console)"
            )),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Csv => write!(f, "csv"),
            Format::Json => write!(f, "json"),
            Format::Console => write!(f, "console"),
        }
    }
}

/// Write `outcome` to the sink selected by `format`.
pub fn emit(
    browser: Browser,
    kind: ArtifactKind,
    outcome: &ArtifactOutcome,
    format: Format,
    output_dir: &Path,
) -> std::io::Result<()> {
    match format {
        Format::Console => console::write(outcome, &mut std::io::stdout().lock()),
        Format::Csv => {
            let path = output_dir.join(format!("{}_{}.csv", browser.slug(), kind.slug()));
            csv::write(outcome, File::create(path)?)
        }
        Format::Json => {
            let path = output_dir.join(format!("{}_{}.json", browser.slug(), kind.slug()));
            json::write(outcome, File::create(path)?)
        }
    }
}
