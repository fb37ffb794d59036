use std::io::{IsTerminal, Write};
use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::{ArgAction, Parser, ValueEnum};
use colored::Colorize;
use fileio::{DEFAULT_SEARCH_TOKEN, FolderConfig, ProcessingReport, TransformConfig, output};
use tracing::debug;

use crate::logging;

pub const USAGE_HINT: &str = "You need to provide two command line arguments: an existing folder and the number of words per line.";

/// Replacement used when `--new-name` is not given.
pub const DEFAULT_NEW_NAME: &str = "Nathan F\u{fc}llemann - Fullann";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
}

/// Normalize every unprocessed file in a folder into `<name>.processed` (UTF-8).
#[derive(Debug, Parser)]
#[command(name = "fileio", version, about)]
pub struct Cli {
    /// Existing folder whose files are processed
    pub folder: PathBuf,

    /// Number of words per numbered output line (positive integer)
    #[arg(value_parser = parse_words_per_line)]
    pub words_per_line: usize,

    /// Text that replaces every occurrence of the search token
    #[arg(long, default_value = DEFAULT_NEW_NAME)]
    pub new_name: String,

    /// Case-sensitive token to replace
    #[arg(long, default_value = DEFAULT_SEARCH_TOKEN)]
    pub search_token: String,

    /// Skip files matching this glob (repeatable)
    #[arg(long, value_name = "GLOB")]
    pub exclude: Vec<String>,

    /// Summary format printed to stdout after the run
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,

    /// More log output (-v debug, -vv trace); `RUST_LOG` overrides
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

fn parse_words_per_line(raw: &str) -> Result<usize, String> {
    match raw.trim().parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_owned()),
        Ok(n) => Ok(n),
        Err(e) => Err(format!("'{raw}' is not a positive integer: {e}")),
    }
}

pub fn run(cli: &Cli) -> Result<()> {
    logging::init(cli.verbose);
    debug!(
        folder = %cli.folder.display(),
        words_per_line = cli.words_per_line,
        "Parsed arguments"
    );

    if !cli.folder.is_dir() {
        bail!(
            "'{}' is not an existing folder\n{USAGE_HINT}",
            cli.folder.display()
        );
    }

    let mut folder_config = FolderConfig::new(&cli.folder);
    folder_config.exclude.clone_from(&cli.exclude);

    let transform_config = TransformConfig::new(cli.new_name.as_str(), cli.words_per_line)
        .with_search_token(cli.search_token.as_str());

    let report = fileio::process_folder(&folder_config, &transform_config)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match cli.format {
        OutputFormat::Json => output::write_json(&report, &mut out)?,
        OutputFormat::Human => {
            let color = stdout.is_terminal();
            write_human_colored(&report, &mut out, color)?;
        }
    }
    Ok(())
}

/// Plain report from the library, with the final status line colored.
fn write_human_colored(report: &ProcessingReport, out: &mut dyn Write, color: bool) -> Result<()> {
    let mut buf = Vec::new();
    output::write_human(report, &mut buf)?;
    let text = String::from_utf8(buf)?;

    for line in text.lines() {
        if color && line.starts_with('\u{2713}') {
            writeln!(out, "{}", line.green())?;
        } else if color && line.starts_with('\u{2717}') {
            writeln!(out, "{}", line.red())?;
        } else {
            writeln!(out, "{line}")?;
        }
    }
    Ok(())
}
