//! Dependency installation through the selected package manager
//!
//! Runs `npm install` / `yarn install` in the project directory and streams
//! the tool's output while it runs.

use crate::flags::PackageManager;
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command as TokioCommand;
use tokio::time::timeout;

/// Timeout for a full install (10 minutes)
const INSTALL_TIMEOUT: Duration = Duration::from_secs(600);

/// Installs the generated project's dependencies
#[derive(Debug, Clone)]
pub struct Installer {
    manager: PackageManager,
    timeout: Duration,
}

impl Installer {
    pub fn new(manager: PackageManager) -> Self {
        Self {
            manager,
            timeout: INSTALL_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn manager(&self) -> PackageManager {
        self.manager
    }

    /// The command shown to the user, e.g. `yarn install`
    pub fn command_line(&self) -> String {
        format!("{} install", self.manager.binary())
    }

    /// Run the install in `project_dir`, streaming output
    pub async fn install(&self, project_dir: &Path) -> Result<()> {
        let cmd = self.command_line();
        println!();
        println!("{} {}", "Running:".dimmed(), cmd.yellow());
        println!();

        let mut child = TokioCommand::new(self.manager.binary())
            .arg("install")
            .current_dir(project_dir)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("Failed to start '{}' in {}", cmd, project_dir.display()))?;

        let stdout = child
            .stdout
            .take()
            .context("Failed to capture installer stdout")?;
        let stderr = child
            .stderr
            .take()
            .context("Failed to capture installer stderr")?;

        let mut stdout_reader = BufReader::new(stdout).lines();
        let mut stderr_reader = BufReader::new(stderr).lines();

        let output_task = async {
            let mut stdout_open = true;
            let mut stderr_open = true;
            while stdout_open || stderr_open {
                tokio::select! {
                    line = stdout_reader.next_line(), if stdout_open => {
                        match line {
                            Ok(Some(line)) => println!("  {}", line),
                            Ok(None) => stdout_open = false,
                            Err(e) => {
                                eprintln!("{} {}", "Error reading stdout:".red(), e);
                                stdout_open = false;
                            }
                        }
                    }
                    line = stderr_reader.next_line(), if stderr_open => {
                        match line {
                            Ok(Some(line)) => eprintln!("  {}", line.yellow()),
                            Ok(None) => stderr_open = false,
                            Err(e) => {
                                eprintln!("{} {}", "Error reading stderr:".red(), e);
                                stderr_open = false;
                            }
                        }
                    }
                }
            }
        };

        if timeout(self.timeout, output_task).await.is_err() {
            let _ = child.kill().await;
            println!();
            anyhow::bail!(
                "Installation timed out after {} seconds.\n\
                 Please run it manually: {}",
                self.timeout.as_secs(),
                cmd
            );
        }

        let status = child
            .wait()
            .await
            .context("Failed to wait for the package manager")?;
        println!();

        if !status.success() {
            anyhow::bail!(
                "'{}' failed with exit code: {}\n\
                 Please run it manually: {}",
                cmd,
                status.code().unwrap_or(-1),
                cmd
            );
        }

        Ok(())
    }
}
