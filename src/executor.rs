// file: src/executor.rs
// version: 3.0.0
// guid: 2ae5644f-4edd-4e88-a4d4-7d02f44432c8

//! System command capability
//!
//! Every interaction with the host (interface commands, systemctl, the device
//! configuration action) goes through [`SystemCommand`], so the provisioning
//! flow can be driven by a fake in tests without root or hardware.

use crate::error::ProvisionError;
use crate::utils::system::SystemUtils;
use crate::Result;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Captured result of an external command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when the process was killed by a signal
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Output of a command that exited with status 0
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            exit_code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Output of a command that exited with a nonzero status
    pub fn failed(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            exit_code: Some(exit_code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Best diagnostic text: stderr, falling back to stdout
    pub fn diagnostic(&self) -> &str {
        if self.stderr.trim().is_empty() {
            self.stdout.trim()
        } else {
            self.stderr.trim()
        }
    }

    /// Convert a nonzero exit into [`ProvisionError::Process`]
    pub fn into_result(self, command: &str) -> Result<CommandOutput> {
        if self.success() {
            Ok(self)
        } else {
            Err(ProvisionError::Process {
                command: command.to_string(),
                exit_code: self.exit_code,
                stderr: self.diagnostic().to_string(),
            })
        }
    }
}

/// Capability for running external programs on the local host
#[async_trait::async_trait]
pub trait SystemCommand: Send + Sync {
    /// Run `program` with `args`, adding `env` to the inherited environment.
    ///
    /// A nonzero exit is reported through [`CommandOutput::exit_code`], not as
    /// an error. Errors are reserved for commands that could not be started.
    async fn run(&self, program: &str, args: &[&str], env: &[(&str, &str)])
        -> Result<CommandOutput>;

    /// Check if a program is available on `PATH`
    fn command_exists(&self, program: &str) -> bool;

    /// Check if the process has administrative privileges
    fn is_privileged(&self) -> bool;
}

/// [`SystemCommand`] backed by real child processes
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalSystem;

impl LocalSystem {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl SystemCommand for LocalSystem {
    async fn run(
        &self,
        program: &str,
        args: &[&str],
        env: &[(&str, &str)],
    ) -> Result<CommandOutput> {
        // env is deliberately not logged: it carries credentials
        debug!("Executing: {} {}", program, args.join(" "));

        let output = Command::new(program)
            .args(args)
            .envs(env.iter().copied())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| ProvisionError::Process {
                command: program.to_string(),
                exit_code: None,
                stderr: format!("Failed to execute command: {}", e),
            })?;

        let result = CommandOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        };
        debug!("{} exited with {:?}", program, result.exit_code);

        Ok(result)
    }

    fn command_exists(&self, program: &str) -> bool {
        SystemUtils::command_exists(program)
    }

    fn is_privileged(&self) -> bool {
        SystemUtils::is_root()
    }
}
