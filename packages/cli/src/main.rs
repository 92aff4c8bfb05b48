#![deny(unsafe_code)]

use std::path::PathBuf;
use std::process::ExitCode;

use bpaf::Bpaf;
use browser_vault_core::{ArtifactKind, Browser};
use color_eyre::eyre::Context;
use color_eyre::Result;

mod logging;
mod output;

use output::Format;

#[derive(Debug, Clone, Bpaf)]
#[bpaf(options, version)]
/// Extracts and decrypts saved passwords, cookies, history and bookmarks from a local browser
/// profile, and emits them as CSV, JSON, or a console table.
struct Args {
    /// Browser to extract artifacts from
    ///
    /// Supported browsers: chrome, chromium, edge, firefox
    #[bpaf(short, long)]
    browser: Browser,

    /// Directory to write CSV/JSON output files into (ignored for the console format)
    #[bpaf(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format
    ///
    /// Supported formats: csv, json, console
    #[bpaf(short, long, fallback(Format::Console))]
    format: Format,

    /// Profile directory, overriding the platform default-profile lookup
    #[bpaf(long)]
    profile_dir: Option<PathBuf>,
}

fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    logging::init();

    let args = args().run();
    run(args)
}

fn run(args: Args) -> Result<ExitCode> {
    let scratch_dir = tempfile::tempdir().wrap_err("failed to create a scratch directory")?;
    let output_dir = args.output_dir.unwrap_or_else(|| PathBuf::from("."));

    let mut had_failure = false;

    for kind in ArtifactKind::ALL {
        let outcome = browser_vault_core::orchestrator::extract(
            args.browser,
            kind,
            args.profile_dir.as_deref(),
            scratch_dir.path(),
            b"",
        );

        match outcome {
            Ok(outcome) => {
                output::emit(args.browser, kind, &outcome, args.format, &output_dir)
                    .wrap_err_with(|| format!("failed to write {kind} output"))?;
            }
            Err(err) => {
                tracing::warn!(browser = %args.browser, %kind, error = %err, "failed to extract artifact kind");
                had_failure = true;
            }
        }
    }

    if had_failure {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
