//! Running an external command as a promised action.

use std::fmt;
use std::process::Stdio;

use tokio::process::Command;

use crate::error::{Error, Result};
use crate::promise::Action;

/// Whatever the command printed, captured so it cannot tear the spinner.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Captured {
    /// `None` when the process was killed by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

/// The command ran but did not exit successfully.
#[derive(Debug, thiserror::Error)]
#[error("`{program}` {}", describe_exit(.output))]
pub struct CommandFailed {
    pub program: String,
    pub output: Captured,
}

fn describe_exit(output: &Captured) -> String {
    match output.code {
        Some(code) => format!("exited with code {code}"),
        None => "was terminated by a signal".to_string(),
    }
}

/// A command line, program first.
#[derive(Debug, Clone)]
pub struct CommandLine {
    argv: Vec<String>,
}

impl CommandLine {
    pub fn new<I, S>(argv: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let argv: Vec<String> = argv.into_iter().map(Into::into).collect();
        if argv.first().is_none_or(|program| program.is_empty()) {
            return Err(Error::InvalidArgument("no command given".to_string()));
        }
        Ok(Self { argv })
    }

    pub fn program(&self) -> &str {
        &self.argv[0]
    }

    /// Execute to completion, capturing both streams.
    pub async fn run(self) -> anyhow::Result<Captured> {
        tracing::debug!(command = %self, "running command");
        let output = Command::new(&self.argv[0])
            .args(&self.argv[1..])
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| anyhow::anyhow!("failed to run `{}`: {e}", self.program()))?;

        let captured = Captured {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        if output.status.success() {
            Ok(captured)
        } else {
            Err(CommandFailed {
                program: self.argv[0].clone(),
                output: captured,
            }
            .into())
        }
    }

    /// Wrap the command for [`promise`](crate::promise::promise).
    pub fn into_action(self) -> Action<Captured, anyhow::Error> {
        Action::pending(self.run())
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.argv.join(" "))
    }
}
