use crate::{ColorChoice, diagnostics::InterpreterError};
use lunar_config::Opts;

/// Information about the current interpreter session: the configured limits
/// and how diagnostics are presented.
#[derive(Clone, Debug, Default)]
pub struct Session {
    /// The interpreter options.
    pub opts: Opts,
    /// Coloring of stderr diagnostics.
    pub color: ColorChoice,
}

impl Session {
    /// Creates a session from options, with automatic color detection.
    pub fn new(opts: Opts) -> Self {
        Self { opts, color: ColorChoice::Auto }
    }

    /// Creates a [`SessionBuilder`].
    pub fn builder() -> SessionBuilder {
        SessionBuilder::default()
    }

    /// Emits an error to stderr with this session's color choice.
    pub fn emit_error(&self, err: &InterpreterError) {
        err.emit(self.color);
    }
}

/// [`Session`] builder.
#[derive(Default)]
#[must_use = "builders don't do anything unless you call `build`"]
pub struct SessionBuilder {
    opts: Option<Opts>,
    color: Option<ColorChoice>,
}

impl SessionBuilder {
    /// Sets the interpreter options.
    pub fn opts(mut self, opts: Opts) -> Self {
        self.opts = Some(opts);
        self
    }

    /// Sets the diagnostic color choice.
    pub fn color(mut self, color: ColorChoice) -> Self {
        self.color = Some(color);
        self
    }

    /// Disables diagnostic coloring; convenient in tests.
    pub fn without_color(self) -> Self {
        self.color(ColorChoice::Never)
    }

    /// Consumes the builder to create a new session.
    pub fn build(self) -> Session {
        Session {
            opts: self.opts.unwrap_or_default(),
            color: self.color.unwrap_or(ColorChoice::Auto),
        }
    }
}
