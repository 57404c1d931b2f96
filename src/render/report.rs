//! Rendering research results to the terminal and to report files.

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use time::macros::format_description;
use tracing::info;

use crate::config::OutputFormat;
use crate::research::ResearchResult;

/// Characters of the query shown in the report header.
const HEADER_QUERY_CHARS: usize = 30;

/// Write the LLM response exactly as received.
pub fn render_response(out: &mut impl Write, response: &str) -> std::io::Result<()> {
    out.write_all(response.as_bytes())
}

/// Write a full research report in the requested format.
pub fn render_report(out: &mut impl Write, result: &ResearchResult, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => render_text(out, result),
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, result).context("Failed to serialize research result")?;
            writeln!(out)?;
            Ok(())
        }
    }
}

fn render_text(out: &mut impl Write, result: &ResearchResult) -> Result<()> {
    let generated = result.generated_at.format(format_description!("[year]-[month]-[day] [hour]:[minute]")).context("Failed to format timestamp")?;

    let mut query: String = result.query.chars().take(HEADER_QUERY_CHARS).collect();
    if result.query.chars().count() > HEADER_QUERY_CHARS {
        query.push_str("...");
    }

    writeln!(out, "### 📋 Legal Eagle Research Results")?;
    writeln!(out)?;
    writeln!(out, "Jurisdiction: {}", result.jurisdiction.name)?;
    writeln!(out, "Query:        {}", query)?;
    writeln!(out, "Generated:    {}", generated)?;
    writeln!(out)?;
    writeln!(out, "---")?;
    writeln!(out)?;

    render_response(out, &result.analysis)?;
    if !result.analysis.ends_with('\n') {
        writeln!(out)?;
    }

    if !result.cases.is_empty() {
        writeln!(out)?;
        writeln!(out, "---")?;
        writeln!(out)?;
        writeln!(out, "### Cases searched ({})", result.cases.len())?;
        for (i, case) in result.cases.iter().enumerate() {
            writeln!(out, "{}. {} {}", i + 1, case.title, case.citation)?;
            writeln!(out, "   {}", case.url)?;
        }
    }

    writeln!(out)?;
    writeln!(out, "Not a substitute for professional legal advice.")?;
    Ok(())
}

/// Save the text report under `dir` as `<YYYYMMDD-HHMMSS>-<code>.md`.
///
/// Existing reports are never overwritten: a second report in the same second gets a
/// `-2`, `-3`, ... suffix.
///
/// # Returns
/// Path of the written file.
pub fn save_report(dir: &Path, result: &ResearchResult) -> Result<PathBuf> {
    std::fs::create_dir_all(dir).with_context(|| format!("Failed to create report directory {}", dir.display()))?;

    let stamp = result.generated_at.format(format_description!("[year][month][day]-[hour][minute][second]")).context("Failed to format timestamp")?;
    let stem = format!("{}-{}", stamp, result.jurisdiction.code);

    let mut buf = Vec::new();
    render_text(&mut buf, result)?;

    let mut attempt = 1u32;
    let (path, mut file) = loop {
        let path = if attempt == 1 { dir.join(format!("{}.md", stem)) } else { dir.join(format!("{}-{}.md", stem, attempt)) };
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => break (path, file),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => attempt += 1,
            Err(e) => return Err(e).with_context(|| format!("Failed to create report {}", path.display())),
        }
    };
    file.write_all(&buf).with_context(|| format!("Failed to write report {}", path.display()))?;

    info!("💾 Report saved to {}", path.display());
    Ok(path)
}
