//! `fzf`-backed selection oracle.

use std::io::{ErrorKind, Write};
use std::process::{Command, Stdio};

use super::{OracleError, SelectionOracle};

/// Arguments passed to the chooser.
///
/// Field 4 of a candidate line is its first preview line.
pub const FZF_ARGS: &[&str] = &[
    "--delimiter=|",
    "--header=Choose file to keep (arrow keys, enter to select)",
    "--preview-window=up:3",
    "--preview=echo {4}",
    "--bind=ctrl-a:select-all",
    "--bind=esc:abort",
    "--height=40%",
];

/// Runs an `fzf`-compatible program on the controlling terminal.
///
/// Candidates are written to the program's stdin, one per line; the choice
/// is read from its stdout. The call blocks until the program exits. The
/// program's stderr is inherited so it can draw its interface.
#[derive(Debug, Clone)]
pub struct FzfOracle {
    program: String,
    args: Vec<String>,
}

impl Default for FzfOracle {
    fn default() -> Self {
        Self::new("fzf")
    }
}

impl FzfOracle {
    /// Create an oracle running `program` with the standard arguments.
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: FZF_ARGS.iter().map(|a| (*a).to_string()).collect(),
        }
    }

    /// Replace the argument list.
    #[must_use]
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Program that will be run.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }
}

impl SelectionOracle for FzfOracle {
    fn choose(&self, lines: &[String]) -> Result<Option<String>, OracleError> {
        log::debug!("Running {} with {} candidate(s)", self.program, lines.len());

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| OracleError::Unavailable {
                program: self.program.clone(),
                source,
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            let mut input = lines.join("\n");
            input.push('\n');
            match stdin.write_all(input.as_bytes()) {
                // The chooser may exit before reading everything.
                Err(e) if e.kind() == ErrorKind::BrokenPipe => {
                    log::debug!("{} closed its input early", self.program);
                }
                Err(e) => return Err(OracleError::Io(e)),
                Ok(()) => {}
            }
        }

        let output = child.wait_with_output()?;
        if !output.status.success() {
            return Err(OracleError::Aborted {
                code: output.status.code(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let reply = stdout.lines().next().unwrap_or_default().trim_end();
        if reply.is_empty() {
            Ok(None)
        } else {
            Ok(Some(reply.to_string()))
        }
    }
}
