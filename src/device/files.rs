//! File existence probes
//!
//! The framework keeps its runtime state in directories an unprivileged
//! process cannot stat, so candidate paths are checked through the root
//! shell. [`LocalFileProbe`] is the plain filesystem variant.

use crate::error::{RootEnvError, RootEnvResult};
use crate::shell::PrivilegedShell;
use async_trait::async_trait;
use shell_escape::escape;
use std::borrow::Cow;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Answers whether a path exists on the device
///
/// `Err` means the question could not be asked, not that the path is
/// missing.
#[async_trait]
pub trait FileProbe: Send + Sync {
    async fn exists(&self, path: &str) -> RootEnvResult<bool>;
}

/// Existence check through the root shell
pub struct ShellFileProbe {
    shell: Arc<dyn PrivilegedShell>,
}

impl ShellFileProbe {
    pub fn new(shell: Arc<dyn PrivilegedShell>) -> Self {
        Self { shell }
    }

    /// Build the `test -e` line for a path, quoted for the shell
    fn test_command(path: &str) -> String {
        format!("[ -e {} ]", escape(Cow::Borrowed(path)))
    }
}

#[async_trait]
impl FileProbe for ShellFileProbe {
    async fn exists(&self, path: &str) -> RootEnvResult<bool> {
        let command = Self::test_command(path);
        let output = self.shell.execute(&[&command]).await.map_err(|e| {
            debug!("Existence check for {} failed: {}", path, e);
            e
        })?;
        Ok(output.success)
    }
}

/// Existence check against the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileProbe;

#[async_trait]
impl FileProbe for LocalFileProbe {
    async fn exists(&self, path: &str) -> RootEnvResult<bool> {
        tokio::fs::try_exists(Path::new(path))
            .await
            .map_err(|e| RootEnvError::io(format!("checking {}", path), e))
    }
}
