//! Lunar reader: preprocessor, tokeniser, and the recursive-descent parser
//! that materialises S-expressions in the node arena.

#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

#[macro_use]
extern crate tracing;

mod cursor;
pub use cursor::{Cursor, RawToken, RawTokenKind, is_atom_byte, is_whitespace_byte};

mod token;
pub use token::{Token, Tokens};

mod pre;
pub use pre::preprocess;

mod reader;
pub use reader::Reader;

mod input;
pub use input::InputBuffer;

// Convenience re-export.
pub use lunar_interface as interface;
