// These Clippy lints are disabled because this is a CLI binary, not a library:
// - print_stdout/print_stderr: CLI tools are expected to print to stdout/stderr for user output.
// - exit: Calling `std::process::exit()` is standard for CLI apps to signal failure to the shell.
#![allow(clippy::print_stdout, clippy::print_stderr, clippy::exit)]

mod cli;
mod logging;

use clap::Parser;
use clap::error::ErrorKind;

fn main() {
    let cli = match cli::Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            // clap exits with 2 on usage errors; bad arguments are a plain failure here.
            let _ = e.print();
            eprintln!("{}", cli::USAGE_HINT);
            std::process::exit(1);
        }
    };

    if let Err(e) = cli::run(&cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
