//! Root shell backed by the `su` binary
//!
//! Commands are written to the stdin of a fresh `su` process, so a batch
//! shares one shell and its stdout comes back in order.

use super::{GrantState, PrivilegedShell, ShellOutput};
use crate::config::schema::ShellConfig;
use crate::error::{RootEnvError, RootEnvResult};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::process::Stdio;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info, warn};

const UNDETERMINED: u8 = 0;
const GRANTED: u8 = 1;
const DENIED: u8 = 2;

fn encode(state: GrantState) -> u8 {
    match state {
        GrantState::Undetermined => UNDETERMINED,
        GrantState::Granted => GRANTED,
        GrantState::Denied => DENIED,
    }
}

fn decode(raw: u8) -> GrantState {
    match raw {
        GRANTED => GrantState::Granted,
        DENIED => GrantState::Denied,
        _ => GrantState::Undetermined,
    }
}

/// Root shell using `su`
pub struct SuShell {
    config: ShellConfig,
    grant: Arc<AtomicU8>,
    grant_requested: AtomicBool,
}

impl SuShell {
    /// Create a new `su` shell; the grant is requested lazily
    pub fn new(config: ShellConfig) -> Self {
        Self {
            config,
            grant: Arc::new(AtomicU8::new(UNDETERMINED)),
            grant_requested: AtomicBool::new(false),
        }
    }

    fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.config.command_timeout_secs)
    }

    /// Kick off the background grant request once
    ///
    /// Without a tokio runtime the request is deferred to the next poll.
    fn request_grant(&self) {
        if self.grant_requested.swap(true, Ordering::SeqCst) {
            return;
        }

        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                debug!("No async runtime, deferring root grant request");
                self.grant_requested.store(false, Ordering::SeqCst);
                return;
            }
        };

        let su = self.config.su_binary.clone();
        let timeout = Duration::from_secs(self.config.grant_timeout_secs);
        let grant = Arc::clone(&self.grant);
        handle.spawn(async move {
            let state = Self::probe_grant(&su, timeout).await;
            info!("Root grant decided: {:?}", state);
            grant.store(encode(state), Ordering::SeqCst);
        });
    }

    /// Ask `su` for a root `id` and read the answer
    async fn probe_grant(su: &str, timeout: Duration) -> GrantState {
        debug!("Requesting root grant via {}", su);

        let output = Command::new(su)
            .args(["-c", "id"])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .output();

        match tokio::time::timeout(timeout, output).await {
            Ok(Ok(output)) => {
                let stdout = String::from_utf8_lossy(&output.stdout);
                if output.status.success() && stdout.contains("uid=0") {
                    GrantState::Granted
                } else {
                    GrantState::Denied
                }
            }
            Ok(Err(e)) => {
                warn!("Failed to start {}: {}", su, e);
                GrantState::Denied
            }
            Err(_) => {
                warn!("Root grant request timed out after {:?}", timeout);
                GrantState::Denied
            }
        }
    }
}

#[async_trait]
impl PrivilegedShell for SuShell {
    fn grant_state(&self) -> GrantState {
        let state = decode(self.grant.load(Ordering::SeqCst));
        if state == GrantState::Undetermined {
            self.request_grant();
        }
        state
    }

    async fn execute(&self, commands: &[&str]) -> RootEnvResult<ShellOutput> {
        let su = &self.config.su_binary;
        let script = commands.join("\n");
        debug!("Executing in root shell: {:?}", commands);

        let mut child = Command::new(su)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound | ErrorKind::PermissionDenied => {
                    RootEnvError::ShellUnavailable(format!("{}: {}", su, e))
                }
                _ => RootEnvError::command_failed(su.clone(), e),
            })?;

        // Dropping stdin at the end of this block closes the shell's input
        if let Some(mut stdin) = child.stdin.take() {
            let write = async {
                stdin.write_all(script.as_bytes()).await?;
                stdin.write_all(b"\nexit\n").await
            };
            write
                .await
                .map_err(|e| RootEnvError::command_failed(script.clone(), e))?;
        }

        let secs = self.config.command_timeout_secs;
        let output = tokio::time::timeout(self.command_timeout(), child.wait_with_output())
            .await
            .map_err(|_| RootEnvError::CommandTimeout {
                command: script.clone(),
                secs,
            })?
            .map_err(|e| RootEnvError::command_failed(script.clone(), e))?;

        if !output.status.success() {
            debug!(
                "Root shell batch exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        Ok(ShellOutput {
            success: output.status.success(),
            lines: String::from_utf8_lossy(&output.stdout)
                .lines()
                .map(str::to_string)
                .collect(),
        })
    }

    fn shell_name(&self) -> &'static str {
        "su"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn missing_su() -> ShellConfig {
        ShellConfig {
            su_binary: "/nonexistent/rootenv-test/su".to_string(),
            grant_timeout_secs: 1,
            command_timeout_secs: 1,
            ..ShellConfig::default()
        }
    }

    #[test]
    fn grant_state_roundtrip() {
        for state in [
            GrantState::Granted,
            GrantState::Denied,
            GrantState::Undetermined,
        ] {
            assert_eq!(decode(encode(state)), state);
        }
    }

    #[test]
    fn grant_undetermined_without_runtime() {
        let shell = SuShell::new(missing_su());
        assert_eq!(shell.grant_state(), GrantState::Undetermined);
        assert!(!shell.grant_requested.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn missing_binary_is_denied() {
        let shell = SuShell::new(missing_su());
        assert_eq!(shell.grant_state(), GrantState::Undetermined);

        let mut state = shell.grant_state();
        for _ in 0..100 {
            if state != GrantState::Undetermined {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
            state = shell.grant_state();
        }
        assert_eq!(state, GrantState::Denied);
    }

    #[tokio::test]
    async fn missing_binary_is_unavailable() {
        let shell = SuShell::new(missing_su());
        let err = shell.execute(&["id"]).await.unwrap_err();
        assert!(err.is_shell_unavailable());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn batch_output_is_collected_in_order() {
        // `sh` reads the batch from stdin exactly like `su` does
        let shell = SuShell::new(ShellConfig {
            su_binary: "sh".to_string(),
            grant_timeout_secs: 1,
            command_timeout_secs: 5,
            ..ShellConfig::default()
        });

        let output = shell.execute(&["echo first", "echo", "echo third"]).await.unwrap();
        assert!(output.success);
        assert_eq!(output.lines, vec!["first", "", "third"]);

        let output = shell.execute(&["echo partial", "false"]).await.unwrap();
        assert!(!output.success);
        assert_eq!(output.lines, vec!["partial"]);
    }
}
