//! The main entry point for the Lunar interpreter.

#![allow(unused_crate_dependencies)]

use std::process::ExitCode;

fn main() -> ExitCode {
    let opts = match lunar_cli::parse_args(std::env::args_os()) {
        Ok(opts) => opts,
        Err(e) => e.exit(),
    };
    lunar_cli::utils::init_logger();
    lunar_cli::run_repl(opts)
}
