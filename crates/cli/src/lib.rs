//! Lunar CLI: argument parsing, logger setup, and the interactive line loop.

#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

#[macro_use]
extern crate tracing;

use clap::Parser as _;
use lunar_eval::Interp;
use lunar_interface::{ColorChoice, Session};
use std::{io, process::ExitCode};

pub use lunar_config::{self as config, Opts, version};

pub mod utils;

mod repl;
pub use repl::{Outcome, Repl};

/// Parses CLI arguments into [`Opts`].
pub fn parse_args<I, T>(itr: I) -> Result<Opts, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Opts::try_parse_from(itr)
}

/// Runs the interactive interpreter with the given options.
pub fn run_repl(opts: Opts) -> ExitCode {
    let color = match opts.color {
        clap::ColorChoice::Auto => ColorChoice::Auto,
        clap::ColorChoice::Always => ColorChoice::Always,
        clap::ColorChoice::Never => ColorChoice::Never,
    };
    let session = Session::builder().opts(opts).color(color).build();
    let interp = Interp::new(session);
    let stdin = io::stdin().lock();
    let stdout = io::stdout();
    match Repl::new(interp, stdin, stdout).run() {
        Ok(Outcome::Eof) => ExitCode::SUCCESS,
        Ok(Outcome::Fatal) => ExitCode::FAILURE,
        Err(e) => {
            error!(error = %e, "I/O error in the line loop");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Opts::command().debug_assert();
    }

    #[test]
    fn parses_limits() {
        let opts = parse_args(["lunar", "--arena-cells", "31", "--symbol-slots", "53"]).unwrap();
        assert_eq!(opts.arena_cells, 31);
        assert_eq!(opts.symbol_slots, 53);
        assert_eq!(opts.max_symbol_len, 10);

        let opts = parse_args(["lunar", "--dump", "arena"]).unwrap();
        assert_eq!(opts.dump, Some(config::Dump::Arena));

        assert!(parse_args(["lunar", "--no-such-flag"]).is_err());
    }
}
