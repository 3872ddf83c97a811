//! Bounded run of the documentation site build.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;

/// Upper bound on `nx build docs`.
pub const DOCS_BUILD_TIMEOUT: Duration = Duration::from_secs(120);

/// Marker the site generator prints for dead internal links.
pub const BROKEN_LINK_MARKER: &str = "Broken link";

/// How a docs build ended. Every variant except `Passed` fails validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildOutcome {
    Passed,
    /// Non-zero exit.
    Failed { stdout: String, stderr: String },
    /// Exit 0, but the output reports broken links.
    BrokenLinks { stdout: String },
    /// Killed after the bound elapsed.
    TimedOut { after: Duration },
    /// The process could not be started or awaited.
    LaunchFailed { reason: String },
}

impl BuildOutcome {
    /// Classify a finished build.
    pub fn from_output(success: bool, stdout: String, stderr: String) -> BuildOutcome {
        if !success {
            BuildOutcome::Failed { stdout, stderr }
        } else if stdout.contains(BROKEN_LINK_MARKER) || stderr.contains(BROKEN_LINK_MARKER) {
            BuildOutcome::BrokenLinks { stdout }
        } else {
            BuildOutcome::Passed
        }
    }

    pub fn passed(&self) -> bool {
        matches!(self, BuildOutcome::Passed)
    }
}

/// Seam between the documentation policy and the process that builds docs.
pub trait DocsBuilder {
    fn build(&self) -> BuildOutcome;
}

/// Runs `nx build docs` in the repository root.
#[derive(Debug, Clone)]
pub struct NxDocsBuilder {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
    pub timeout: Duration,
}

impl NxDocsBuilder {
    pub fn new(cwd: PathBuf) -> Self {
        Self {
            program: "nx".to_string(),
            args: vec!["build".to_string(), "docs".to_string()],
            cwd,
            timeout: DOCS_BUILD_TIMEOUT,
        }
    }

    async fn run(&self) -> BuildOutcome {
        let child = Command::new(&self.program)
            .args(&self.args)
            .current_dir(&self.cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn();

        let child = match child {
            Ok(c) => c,
            Err(e) => {
                return BuildOutcome::LaunchFailed {
                    reason: e.to_string(),
                };
            }
        };

        // Dropping the timed-out future drops the child, which kills it.
        match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => BuildOutcome::from_output(
                output.status.success(),
                String::from_utf8_lossy(&output.stdout).into_owned(),
                String::from_utf8_lossy(&output.stderr).into_owned(),
            ),
            Ok(Err(e)) => BuildOutcome::LaunchFailed {
                reason: e.to_string(),
            },
            Err(_elapsed) => {
                tracing::warn!(
                    program = %self.program,
                    timeout_secs = self.timeout.as_secs(),
                    "docs build timed out"
                );
                BuildOutcome::TimedOut {
                    after: self.timeout,
                }
            }
        }
    }
}

impl DocsBuilder for NxDocsBuilder {
    fn build(&self) -> BuildOutcome {
        let runtime = match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(rt) => rt,
            Err(e) => {
                return BuildOutcome::LaunchFailed {
                    reason: e.to_string(),
                };
            }
        };
        runtime.block_on(self.run())
    }
}
