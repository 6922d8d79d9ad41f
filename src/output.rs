//! User-facing terminal output.
//!
//! Informational lines are suppressed in quiet mode; results (the bare
//! command or commit message) and relayed command output never are.

use std::io::{self, Write};

use crossterm::style::Stylize;

use crate::error::ExecError;
use crate::exec::ExecOutput;

pub struct Reporter {
    out: Box<dyn Write + Send>,
    quiet: bool,
    color: bool,
}

impl Reporter {
    pub fn new(out: Box<dyn Write + Send>, quiet: bool, color: bool) -> Self {
        Self { out, quiet, color }
    }

    /// Stdout, colored only when it is a terminal.
    pub fn stdout(quiet: bool) -> Self {
        use std::io::IsTerminal;
        let color = io::stdout().is_terminal();
        Self::new(Box::new(io::stdout()), quiet, color)
    }

    fn label(&self, text: &str) -> String {
        if self.color {
            text.yellow().to_string()
        } else {
            text.to_string()
        }
    }

    /// A yellow status line, e.g. the empty-diff notice.
    pub fn notice(&mut self, text: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = self.label(text);
        writeln!(self.out, "{line}")
    }

    /// `label` followed by a highlighted command or message.
    pub fn command(&mut self, label: &str, command: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let label = self.label(label);
        let command = if self.color {
            command.bold().red().to_string()
        } else {
            command.to_string()
        };
        writeln!(self.out, "{label} {command}")
    }

    pub fn explanation(&mut self, text: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let label = self.label("Explanation");
        let body = if self.color {
            text.bold().green().to_string()
        } else {
            text.to_string()
        };
        writeln!(self.out, "{label}\n{body}")
    }

    /// Printed even in quiet mode.
    pub fn result(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{text}")?;
        self.out.flush()
    }

    /// Relay captured command output verbatim, after an `Output:` header.
    pub fn relay(&mut self, output: &ExecOutput) -> Result<(), ExecError> {
        if !self.quiet {
            let header = self.label("Output:");
            writeln!(self.out, "{header}").map_err(ExecError::Relay)?;
        }
        output.relay(&mut self.out)
    }
}
