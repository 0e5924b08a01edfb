//! External comparator invocation.

use crate::config::Config;
use crate::errors::CompareError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tokio::time::{timeout, Duration};

/// A completed comparator run that exited 0. One entry per output line;
/// an empty list is the legitimate "no differences" result.
#[derive(Debug, PartialEq, Eq)]
pub struct Comparison {
    pub entries: Vec<String>,
}

/// Seam between the request pipeline and the engine that actually computes
/// differences. Production uses [`CommandComparator`]; tests substitute
/// their own.
#[async_trait]
pub trait Comparator: Send + Sync {
    async fn compare(&self, actual: &Path, planned: &Path) -> Result<Comparison, CompareError>;
}

/// Runs the configured executable as a subprocess. Arguments are passed as
/// discrete argv entries; no shell is ever involved, so staged paths cannot
/// alter the command structure regardless of their content.
pub struct CommandComparator {
    program: PathBuf,
    fixed_args: Vec<String>,
    timeout_s: u64,
    max_output_bytes: usize,
}

impl CommandComparator {
    pub fn new(cfg: &Config) -> anyhow::Result<Self> {
        let program = resolve_command(&cfg.comparator.command)?;
        Ok(Self {
            program,
            fixed_args: cfg.comparator.args.clone(),
            timeout_s: cfg.limits.exec_timeout_s,
            max_output_bytes: cfg.limits.max_output_kb * 1024,
        })
    }

    /// Human-readable command line, for diagnostics only. Execution never
    /// goes through this string.
    fn command_line(&self, actual: &Path, planned: &Path) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(self.fixed_args.iter().cloned());
        parts.push(actual.display().to_string());
        parts.push(planned.display().to_string());
        parts.join(" ")
    }
}

fn resolve_command(command: &str) -> anyhow::Result<PathBuf> {
    let path = if command.contains('/') {
        PathBuf::from(command)
    } else {
        which::which(command)?
    };
    Ok(dunce::canonicalize(path)?)
}

#[async_trait]
impl Comparator for CommandComparator {
    async fn compare(&self, actual: &Path, planned: &Path) -> Result<Comparison, CompareError> {
        let actual = dunce::canonicalize(actual)?;
        let planned = dunce::canonicalize(planned)?;
        let command_line = self.command_line(&actual, &planned);

        let mut command = Command::new(&self.program);
        command.args(&self.fixed_args);
        command.arg(&actual);
        command.arg(&planned);
        command.stdin(Stdio::null());
        command.stdout(Stdio::piped());
        command.stderr(Stdio::piped());

        let mut child = command.spawn()?;
        let mut stdout = child.stdout.take().expect("stdout piped");
        let mut stderr = child.stderr.take().expect("stderr piped");

        // Merge both streams into one ordered buffer, the way `2>&1` would.
        let mut combined = Vec::new();
        let mut truncated = false;
        let read_fut = async {
            let mut buf_out = [0u8; 8192];
            let mut buf_err = [0u8; 8192];
            let mut out_done = false;
            let mut err_done = false;
            while !(out_done && err_done) {
                tokio::select! {
                    r = stdout.read(&mut buf_out), if !out_done => {
                        let n = r.unwrap_or(0);
                        if n == 0 { out_done = true; continue; }
                        combined.extend_from_slice(&buf_out[..n]);
                    }
                    r = stderr.read(&mut buf_err), if !err_done => {
                        let n = r.unwrap_or(0);
                        if n == 0 { err_done = true; continue; }
                        combined.extend_from_slice(&buf_err[..n]);
                    }
                }
                if combined.len() > self.max_output_bytes {
                    truncated = true;
                    let _ = child.kill().await;
                    break;
                }
            }
        };

        let budget = Duration::from_secs(self.timeout_s);
        if timeout(budget, read_fut).await.is_err() {
            let _ = child.kill().await;
            let _ = child.wait().await;
            return Err(CompareError::TimedOut {
                seconds: self.timeout_s,
                detail: format!(
                    "Timed out after {}s when executing: {}\n{}",
                    self.timeout_s,
                    command_line,
                    String::from_utf8_lossy(&combined)
                ),
            });
        }

        let waited = timeout(budget, child.wait()).await;
        let status = match waited {
            Ok(wait_result) => wait_result?,
            Err(_) => {
                let _ = child.kill().await;
                return Err(CompareError::TimedOut {
                    seconds: self.timeout_s,
                    detail: format!(
                        "Timed out after {}s when executing: {}",
                        self.timeout_s, command_line
                    ),
                });
            }
        };

        // Killed-by-signal counts as failure too.
        let code = status.code().unwrap_or(-1);
        if code != 0 || truncated {
            let mut output = String::from_utf8_lossy(&combined).into_owned();
            if truncated {
                output.push_str("\n[output truncated]");
            }
            return Err(CompareError::NonZeroExit {
                code,
                detail: format!(
                    "Unexpected result code {code} when executing: {command_line}\n{output}"
                ),
            });
        }

        let entries = String::from_utf8_lossy(&combined)
            .lines()
            .map(str::to_string)
            .collect();
        Ok(Comparison { entries })
    }
}
