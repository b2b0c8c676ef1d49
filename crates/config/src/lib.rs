//! Lunar interpreter configuration.

#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

mod opts;
pub use opts::Opts;

pub mod version;

/// Selects which interpreter state tables to print after each command.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[derive(strum::Display, strum::EnumString, strum::IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum Dump {
    /// The node arena: index, head, tail.
    Arena,
    /// The symbol table: slot, symbol, binding.
    Symbols,
    /// Both tables.
    #[default]
    All,
}

impl Dump {
    /// Returns `true` if the arena table is selected.
    pub fn arena(self) -> bool {
        matches!(self, Self::Arena | Self::All)
    }

    /// Returns `true` if the symbol table is selected.
    pub fn symbols(self) -> bool {
        matches!(self, Self::Symbols | Self::All)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dump_from_str() {
        assert_eq!("arena".parse(), Ok(Dump::Arena));
        assert_eq!("symbols".parse(), Ok(Dump::Symbols));
        assert_eq!("all".parse(), Ok(Dump::All));
        assert!("arenas".parse::<Dump>().is_err());
    }

    #[test]
    fn dump_selection() {
        assert!(Dump::All.arena() && Dump::All.symbols());
        assert!(Dump::Arena.arena() && !Dump::Arena.symbols());
        assert!(!Dump::Symbols.arena() && Dump::Symbols.symbols());
    }
}
