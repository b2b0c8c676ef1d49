//! Core data structures of the Lunar interpreter: tagged values, the symbol
//! table, the node arena with its mark-sweep collector, rendering, and
//! structured errors.

#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

#[macro_use]
extern crate tracing;

pub mod diagnostics;
use diagnostics::InterpreterError;

mod value;
pub use value::{NodeId, SymbolId, Value};

mod symbol;
pub use symbol::{Slot, SymbolTable};

mod arena;
pub use arena::{Cell, GcStats, NodeArena};

pub mod num;

mod display;
pub use display::render;

mod session;
pub use session::{Session, SessionBuilder};

pub use anstream::ColorChoice;
pub use lunar_config as config;

/// The current version of the Lunar interpreter.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Interpreter result type.
pub type Result<T = (), E = InterpreterError> = std::result::Result<T, E>;
