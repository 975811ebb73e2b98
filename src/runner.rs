//! External command execution.
//!
//! All external tools (docker, git, go) are reached through the
//! [`CommandRunner`] trait so the pipeline can be exercised without them.

use crate::error::{Error, Result};
use log::debug;
use std::path::Path;
use std::process::{Command, Stdio};

/// Runs external programs to completion.
pub trait CommandRunner {
    /// Runs `program` with the given arguments, inheriting stdout and stderr.
    fn run(&self, program: &str, args: &[String]) -> Result<()>;

    /// Runs `program` in `dir` and returns its stdout with one trailing
    /// newline removed. Stderr is discarded.
    fn output(&self, dir: &Path, program: &str, args: &[String]) -> Result<String>;
}

/// [`CommandRunner`] backed by [`std::process::Command`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<()> {
        debug!("Running: {}", command_line(program, args));

        let status = Command::new(program)
            .args(args)
            .status()
            .map_err(|source| Error::CommandSpawn {
                program: program.to_string(),
                source,
            })?;

        if !status.success() {
            return Err(Error::CommandFailed {
                command: command_line(program, args),
                code: status.code(),
            });
        }

        Ok(())
    }

    fn output(&self, dir: &Path, program: &str, args: &[String]) -> Result<String> {
        debug!(
            "Running in {} (capturing output): {}",
            dir.display(),
            command_line(program, args)
        );

        let output = Command::new(program)
            .args(args)
            .current_dir(dir)
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()
            .map_err(|source| Error::CommandSpawn {
                program: program.to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(Error::CommandFailed {
                command: command_line(program, args),
                code: output.status.code(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(stdout.strip_suffix('\n').unwrap_or(&stdout).to_string())
    }
}

/// Renders a program and its arguments for logs and error messages.
pub fn command_line(program: &str, args: &[String]) -> String {
    let mut line = program.to_string();
    for arg in args {
        line.push(' ');
        line.push_str(arg);
    }
    line
}
