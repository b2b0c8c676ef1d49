//! Structured interpreter errors and their stderr emission.
//!
//! Recoverable errors unwind to the interactive prompt carrying a trace of
//! the `eval` frames they crossed; fatal errors terminate the session.
//! `NeedGc` is an internal control signal and never reaches the user.

use crate::ColorChoice;
use anstyle::{AnsiColor, Style};
use std::{fmt, io::Write};

/// The kind of an interpreter error.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ErrorKind {
    /// A primitive or user function received the wrong number of arguments.
    #[error("expected {expected} argument(s), found {actual}")]
    ArityMismatch {
        /// Arguments the operator takes.
        expected: usize,
        /// Arguments it was given.
        actual: usize,
    },
    /// A numeric primitive received a non-numeric operand.
    #[error("`{0}` is not a number")]
    NotNumber(String),
    /// The operator symbol has no binding and names no primitive.
    #[error("unknown identifier `{0}`")]
    UnknownIdentifier(String),
    /// `car` or `cdr` of something that is not a pair.
    #[error("`{0}` is not a pair")]
    NotPair(String),
    /// `cond` ran out of clauses without an `else`.
    #[error("no matching `cond` clause")]
    NoMatchingClause,
    /// The reader met a token it cannot start a datum with.
    #[error("unexpected `{0}`")]
    UnexpectedToken(String),
    /// Every symbol table slot holds a different symbol.
    #[error("symbol table is full ({0} slots)")]
    TableFull(usize),
    /// Internal control signal: the free list is nearly empty and the
    /// current command must be retried after a collection.
    #[error("node arena needs collection")]
    NeedGc,
    /// The arena has no free cell left even after collecting.
    #[error("node arena is exhausted ({0} cells)")]
    ArenaExhausted(usize),
    /// A call frame would save more than the parameter limit.
    #[error("call frame overflow (limit: {0} parameters)")]
    StackOverflow(usize),
}

impl ErrorKind {
    /// Returns `true` for errors that terminate the session instead of
    /// unwinding to the prompt.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::TableFull(_) | Self::ArenaExhausted(_) | Self::StackOverflow(_))
    }
}

/// An interpreter error together with the rendered expressions of the `eval`
/// frames it unwound through, innermost first.
#[derive(Clone, Debug)]
pub struct InterpreterError {
    kind: ErrorKind,
    frames: Vec<String>,
}

impl InterpreterError {
    /// Creates an error with an empty frame trace.
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, frames: Vec::new() }
    }

    /// The error kind.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// The rendered eval frames, innermost first.
    pub fn frames(&self) -> &[String] {
        &self.frames
    }

    /// Appends the rendering of an unwound `eval` frame.
    pub fn with_frame(mut self, rendered: String) -> Self {
        self.frames.push(rendered);
        self
    }

    /// Returns `true` for errors that terminate the session.
    pub fn is_fatal(&self) -> bool {
        self.kind.is_fatal()
    }

    /// Returns `true` for the internal collect-and-retry signal.
    pub fn is_need_gc(&self) -> bool {
        matches!(self.kind, ErrorKind::NeedGc)
    }

    /// Writes the error and its eval stack to stderr.
    pub fn emit(&self, color: ColorChoice) {
        let mut err = anstream::AutoStream::new(std::io::stderr(), color);
        // Best effort: a failed stderr write has nowhere to report to.
        let _ = self.write(&mut err);
    }

    fn write(&self, out: &mut impl Write) -> std::io::Result<()> {
        let error = Style::new().fg_color(Some(AnsiColor::Red.into())).bold();
        let bold = Style::new().bold();
        writeln!(out, "{error}error{error:#}{bold}: {}{bold:#}", self.kind)?;
        if !self.frames.is_empty() {
            writeln!(out, "Current Eval Stack:")?;
            for (i, frame) in self.frames.iter().enumerate() {
                writeln!(out, "  [{i}] {frame}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for InterpreterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.kind.fmt(f)
    }
}

impl std::error::Error for InterpreterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}

impl From<ErrorKind> for InterpreterError {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}
