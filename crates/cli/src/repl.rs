use lunar_eval::Interp;
use lunar_parse::InputBuffer;
use std::io::{self, BufRead, Write};

/// How a [`Repl`] session ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The input reached EOF.
    Eof,
    /// A fatal interpreter error terminated the session.
    Fatal,
}

/// The interactive line loop.
///
/// Prompts with `"> "` on a fresh line; continuation lines of an unbalanced
/// command wait without a prompt. Lines are trimmed, `;` comment lines and
/// blank lines are discarded, and EOF ends the session with a newline.
pub struct Repl<R, W> {
    interp: Interp,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Repl<R, W> {
    /// Creates a line loop over the given streams.
    pub fn new(interp: Interp, input: R, output: W) -> Self {
        Self { interp, input, output }
    }

    /// Runs until EOF or a fatal error.
    pub fn run(&mut self) -> io::Result<Outcome> {
        let mut buffer = InputBuffer::new();
        let mut line = String::new();
        loop {
            if buffer.is_empty() {
                write!(self.output, "> ")?;
                self.output.flush()?;
            }

            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                writeln!(self.output)?;
                return Ok(Outcome::Eof);
            }
            let line = line.trim();
            if line.is_empty() || line.starts_with(';') {
                continue;
            }
            if !buffer.push_line(line) {
                continue;
            }

            let command = buffer.take();
            debug!(%command, "executing");
            match self.interp.execute(&command) {
                Ok(value) => {
                    writeln!(self.output, "{}", self.interp.render(value))?;
                    writeln!(self.output)?;
                    self.interp.dump_to(&mut self.output)?;
                }
                Err(e) => {
                    self.interp.session().emit_error(&e);
                    if e.is_fatal() {
                        return Ok(Outcome::Fatal);
                    }
                }
            }
        }
    }

    /// Consumes the loop, returning the interpreter.
    pub fn into_interp(self) -> Interp {
        self.interp
    }
}
