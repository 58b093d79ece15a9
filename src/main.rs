//! aerocms CLI entry point
//!
//! Parses arguments and dispatches via `cli::run`, which writes the JSON
//! response to stdout. Exits non-zero on failure.

use aerocms::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
