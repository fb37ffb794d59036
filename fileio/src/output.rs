//! Shared output formatting for processing reports.
//!
//! Provides JSON and plain-text formatters for `ProcessingReport`.
//! Color/terminal formatting is left to the CLI layer.

use std::io::Write;

use crate::report::ProcessingReport;

/// Format a `ProcessingReport` as JSON to a writer.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_json(report: &ProcessingReport, writer: &mut dyn Write) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    writeln!(writer, "{json}")?;
    Ok(())
}

/// Format a `ProcessingReport` as human-readable plain text to a writer.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_human(report: &ProcessingReport, writer: &mut dyn Write) -> anyhow::Result<()> {
    writeln!(writer)?;
    writeln!(writer, "{}", "=".repeat(80))?;
    writeln!(writer, "  FILEIO PROCESSING SUMMARY")?;
    writeln!(writer, "{}", "=".repeat(80))?;
    writeln!(writer)?;
    writeln!(writer, "  Folder:           {}", report.folder.display())?;
    writeln!(writer, "  Files processed:  {}", report.processed_files)?;
    writeln!(writer, "  Files skipped:    {}", report.skipped_files)?;
    writeln!(writer)?;

    if report.processed_files > 0 {
        writeln!(writer, "{}", "-".repeat(80))?;
        writeln!(writer, "  WRITTEN")?;
        writeln!(writer, "{}", "-".repeat(80))?;
        for outcome in &report.outcomes {
            if let Some(output) = &outcome.output {
                writeln!(
                    writer,
                    "{} ({}) -> {}",
                    outcome.file.display(),
                    outcome.encoding,
                    output.display()
                )?;
            }
        }
        writeln!(writer)?;
    }

    if report.skipped_files > 0 {
        writeln!(writer, "{}", "-".repeat(80))?;
        writeln!(writer, "  SKIPPED")?;
        writeln!(writer, "{}", "-".repeat(80))?;
        for error in report.errors() {
            writeln!(writer, "{}", error.format_human_readable())?;
        }
        writeln!(writer)?;
    }

    writeln!(writer, "{}", "=".repeat(80))?;
    if report.files_attempted() == 0 {
        writeln!(writer, "No files to process")?;
    } else if report.ok {
        writeln!(
            writer,
            "\u{2713} All {} files processed",
            report.processed_files
        )?;
    } else {
        writeln!(
            writer,
            "\u{2717} {} of {} file(s) skipped",
            report.skipped_files,
            report.files_attempted()
        )?;
    }
    writeln!(writer, "{}", "=".repeat(80))?;

    Ok(())
}
