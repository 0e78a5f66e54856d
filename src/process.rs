//! Blocking subprocess execution with a deadline.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use log::debug;

use crate::error::{Result, SheetError};

/// Default deadline for a single external tool invocation (5 minutes).
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Exit status and captured stderr of a finished process
#[derive(Debug)]
pub struct ProcessOutput {
    pub status: ExitStatus,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// One-line description of a failed run for error messages
    pub fn failure_reason(&self) -> String {
        let code = self
            .status
            .code()
            .map_or_else(|| "signal".to_string(), |c| c.to_string());
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            format!("exited with status {}", code)
        } else {
            format!("exited with status {}: {}", code, stderr)
        }
    }
}

/// Resolve an executable: explicit path, then environment variable, then `PATH`.
pub fn find_tool(
    tool: &'static str,
    explicit: Option<&Path>,
    env_var: &str,
    names: &[&str],
) -> Result<PathBuf> {
    if let Some(path) = explicit {
        if path.exists() {
            return Ok(path.to_path_buf());
        }
        return Err(SheetError::ToolNotFound { tool });
    }

    if let Ok(path) = std::env::var(env_var) {
        let path = PathBuf::from(path);
        if path.exists() {
            return Ok(path);
        }
    }

    names
        .iter()
        .find_map(|name| which::which(name).ok())
        .ok_or(SheetError::ToolNotFound { tool })
}

/// Run `cmd` to completion, killing it once `timeout` elapses.
///
/// Stdout is discarded; stderr is drained on a helper thread so a chatty
/// process cannot block on a full pipe.
pub fn run_with_timeout(
    tool: &'static str,
    cmd: &mut Command,
    timeout: Duration,
) -> Result<ProcessOutput> {
    debug!("Running {:?}", cmd);

    cmd.stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped());

    let mut child = cmd
        .spawn()
        .map_err(|source| SheetError::Spawn { tool, source })?;

    let stderr_reader = child.stderr.take().map(|mut pipe| {
        thread::spawn(move || {
            let mut buf = String::new();
            let _ = pipe.read_to_string(&mut buf);
            buf
        })
    });

    let start = Instant::now();
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => {
                if start.elapsed() > timeout {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(SheetError::Timeout {
                        tool,
                        timeout_secs: timeout.as_secs(),
                    });
                }
                thread::sleep(POLL_INTERVAL);
            }
            Err(source) => return Err(SheetError::Spawn { tool, source }),
        }
    };

    let stderr = stderr_reader
        .and_then(|handle| handle.join().ok())
        .unwrap_or_default();

    Ok(ProcessOutput { status, stderr })
}
