//! External command execution.
//!
//! Every stage of the pipeline that shells out (`lipo`, `codesign`) goes
//! through this builder so failures always carry the tool's stderr instead of
//! a bare exit code.

use anyhow::{bail, Context, Result};
use std::path::Path;
use std::process::Command;

/// Captured output of a finished command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    pub stdout: String,
    pub stderr: String,
}

impl CommandResult {
    /// Stdout with surrounding whitespace removed.
    pub fn stdout_trimmed(&self) -> &str {
        self.stdout.trim()
    }
}

/// Builder for a single external command invocation.
pub struct Cmd {
    program: String,
    args: Vec<String>,
    error_prefix: Option<String>,
}

impl Cmd {
    pub fn new(program: impl AsRef<str>) -> Self {
        Self {
            program: program.as_ref().to_string(),
            args: Vec::new(),
            error_prefix: None,
        }
    }

    /// Add a single argument.
    pub fn arg(mut self, arg: impl AsRef<str>) -> Self {
        self.args.push(arg.as_ref().to_string());
        self
    }

    /// Add a path as an argument.
    pub fn arg_path(mut self, path: &Path) -> Self {
        self.args.push(path.to_string_lossy().into_owned());
        self
    }

    /// Prefix for the error message when the command exits non-zero.
    pub fn error_msg(mut self, msg: impl AsRef<str>) -> Self {
        self.error_prefix = Some(msg.as_ref().to_string());
        self
    }

    /// Run the command and capture output. Non-zero exit is an error that
    /// includes the trimmed stderr.
    pub fn run(self) -> Result<CommandResult> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .output()
            .with_context(|| format!("failed to execute '{}'. Is it installed?", self.program))?;

        let result = CommandResult {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        if !output.status.success() {
            let prefix = self
                .error_prefix
                .unwrap_or_else(|| format!("'{}' failed", self.program));
            let code = output.status.code().unwrap_or(-1);
            let stderr = result.stderr.trim();
            if stderr.is_empty() {
                bail!("{} (exit code {})", prefix, code);
            }
            bail!("{} (exit code {}): {}", prefix, code, stderr);
        }

        Ok(result)
    }
}
