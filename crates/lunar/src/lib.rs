//! Interactive interpreter for a small Lisp-family language: S-expressions
//! with numbers, symbols, lists, lambdas, and a fixed set of primitives,
//! backed by a fixed-capacity cons-cell arena with a mark-sweep collector
//! and an open-addressed symbol table.

#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

pub use lunar_cli as cli;
pub use lunar_config as config;
pub use lunar_eval as eval;
pub use lunar_interface as interface;
pub use lunar_parse as parse;

pub use lunar_eval::Interp;
pub use lunar_interface::{Session, Value};
