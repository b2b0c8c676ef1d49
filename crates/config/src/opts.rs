//! Lunar CLI options.

use crate::Dump;

#[cfg(feature = "clap")]
use clap::{ColorChoice, Parser};

/// Interactive interpreter for a small Lisp-family language.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "clap", derive(Parser))]
#[cfg_attr(feature = "clap", command(
    name = "lunar",
    version = crate::version::SHORT_VERSION,
    long_version = crate::version::LONG_VERSION,
))]
pub struct Opts {
    /// Number of cons cells in the node arena.
    #[cfg_attr(
        feature = "clap",
        arg(help_heading = "Limits", long, value_name = "N", default_value_t = Self::DEFAULT_ARENA_CELLS)
    )]
    pub arena_cells: usize,
    /// Number of slots in the symbol table. Should be prime.
    #[cfg_attr(
        feature = "clap",
        arg(help_heading = "Limits", long, value_name = "N", default_value_t = Self::DEFAULT_SYMBOL_SLOTS)
    )]
    pub symbol_slots: usize,
    /// Maximum symbol length in bytes. Longer symbols are truncated when interned.
    #[cfg_attr(
        feature = "clap",
        arg(help_heading = "Limits", long, value_name = "LEN", default_value_t = Self::DEFAULT_MAX_SYMBOL_LEN)
    )]
    pub max_symbol_len: usize,
    /// Maximum number of parameters per call frame.
    #[cfg_attr(
        feature = "clap",
        arg(help_heading = "Limits", long, value_name = "N", default_value_t = Self::DEFAULT_MAX_PARAMS)
    )]
    pub max_params: usize,

    /// Print interpreter state tables after each command.
    #[cfg_attr(
        feature = "clap",
        arg(help_heading = "Display options", long, value_enum, value_name = "KIND")
    )]
    pub dump: Option<Dump>,
    /// Coloring.
    #[cfg(feature = "clap")]
    #[cfg_attr(
        feature = "clap",
        arg(help_heading = "Display options", long, value_enum, default_value_t)
    )]
    pub color: ColorChoice,
    /// Use verbose output.
    #[cfg_attr(feature = "clap", arg(help_heading = "Display options", long, short))]
    pub verbose: bool,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            arena_cells: Self::DEFAULT_ARENA_CELLS,
            symbol_slots: Self::DEFAULT_SYMBOL_SLOTS,
            max_symbol_len: Self::DEFAULT_MAX_SYMBOL_LEN,
            max_params: Self::DEFAULT_MAX_PARAMS,
            dump: None,
            #[cfg(feature = "clap")]
            color: ColorChoice::default(),
            verbose: false,
        }
    }
}

impl Opts {
    /// Default node arena capacity, including the reserved sentinel cell.
    pub const DEFAULT_ARENA_CELLS: usize = 2000;
    /// Default symbol table capacity. Prime, so linear probing cycles the whole table.
    pub const DEFAULT_SYMBOL_SLOTS: usize = 101;
    /// Default symbol length limit.
    pub const DEFAULT_MAX_SYMBOL_LEN: usize = 10;
    /// Default call frame parameter limit.
    pub const DEFAULT_MAX_PARAMS: usize = 5;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let opts = Opts::default();
        assert_eq!(opts.arena_cells, 2000);
        assert_eq!(opts.symbol_slots, 101);
        assert_eq!(opts.max_symbol_len, 10);
        assert_eq!(opts.max_params, 5);
        assert_eq!(opts.dump, None);
    }
}
