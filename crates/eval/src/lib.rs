//! Lunar evaluator: the tree walker, primitive dispatch, user-defined calls
//! via save/restore of symbol bindings, and the top-level command driver.

#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

#[macro_use]
extern crate tracing;

mod builtin;
pub use builtin::Builtin;

mod eval;
pub use eval::Evaluator;

mod interp;
pub use interp::Interp;

pub mod dump;

// Convenience re-exports.
pub use lunar_interface as interface;
pub use lunar_parse as parse;
