//! A plain, aligned-column table written to an arbitrary writer (normally stdout).

use std::io::{self, Write};

use browser_vault_core::ArtifactOutcome;

pub fn write<W: Write>(outcome: &ArtifactOutcome, writer: &mut W) -> io::Result<()> {
    match outcome {
        ArtifactOutcome::Passwords(records) => table(
            writer,
            &["login_url", "username", "password", "created_at"],
            records.iter().map(|r| {
                vec![
                    r.login_url.clone(),
                    r.username.clone(),
                    r.password.clone(),
                    r.created_at.to_string(),
                ]
            }),
        ),
        ArtifactOutcome::Cookies(records) => table(
            writer,
            &["host", "path", "name", "value", "secure", "http_only", "expires_at"],
            records.iter().map(|r| {
                vec![
                    r.host.clone(),
                    r.path.clone(),
                    r.name.clone(),
                    r.value.clone(),
                    r.is_secure.to_string(),
                    r.is_http_only.to_string(),
                    r.expires_at.to_string(),
                ]
            }),
        ),
        ArtifactOutcome::History(records) => table(
            writer,
            &["url", "title", "visit_count", "last_visit_at"],
            records.iter().map(|r| {
                vec![
                    r.url.clone(),
                    r.title.clone(),
                    r.visit_count.to_string(),
                    r.last_visit_at.to_string(),
                ]
            }),
        ),
        ArtifactOutcome::Bookmarks(records) => table(
            writer,
            &["id", "name", "kind", "url", "added_at"],
            records.iter().map(|r| {
                vec![
                    r.id.to_string(),
                    r.name.clone(),
                    format!("{:?}", r.kind),
                    r.url.clone(),
                    r.added_at.to_string(),
                ]
            }),
        ),
    }
}

fn table<W: Write, I: Iterator<Item = Vec<String>>>(
    writer: &mut W,
    headers: &[&str],
    rows: I,
) -> io::Result<()> {
    let rows: Vec<Vec<String>> = rows.collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.len());
        }
    }

    write_row(writer, headers.iter().map(|h| h.to_string()), &widths)?;
    let separator: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    write_row(writer, separator.into_iter(), &widths)?;

    for row in &rows {
        write_row(writer, row.iter().cloned(), &widths)?;
    }

    Ok(())
}

fn write_row<W: Write, I: Iterator<Item = String>>(
    writer: &mut W,
    cells: I,
    widths: &[usize],
) -> io::Result<()> {
    let line = cells
        .enumerate()
        .map(|(i, cell)| format!("{:width$}", cell, width = widths[i]))
        .collect::<Vec<_>>()
        .join("  ");

    writeln!(writer, "{}", line.trim_end())
}
