//! Privileged shell abstraction
//!
//! Every probe the resolver makes goes through a [`PrivilegedShell`]:
//! - production: [`SuShell`], a root shell opened with `su`
//! - tests: scripted fakes

mod su;

pub use su::SuShell;

use crate::error::RootEnvResult;
use async_trait::async_trait;

/// Whether this process has been granted root
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrantState {
    Granted,
    Denied,
    /// The grant decision is still pending (dialog shown, shell starting)
    Undetermined,
}

/// Result of one batched shell invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShellOutput {
    /// Exit status of the batch was zero
    pub success: bool,
    /// Stdout of every command in the batch, in order
    pub lines: Vec<String>,
}

impl ShellOutput {
    /// Successful output with the given lines
    pub fn ok<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            success: true,
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    /// Failed output with the given lines
    pub fn failed<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            success: false,
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }
}

/// Abstract root shell interface
#[async_trait]
pub trait PrivilegedShell: Send + Sync {
    /// Current grant decision. Polled, never blocks.
    fn grant_state(&self) -> GrantState;

    /// Run command lines in one root shell and collect their stdout
    ///
    /// Returns `RootEnvError::ShellUnavailable` when no root shell can be
    /// started at all.
    async fn execute(&self, commands: &[&str]) -> RootEnvResult<ShellOutput>;

    /// Human-readable shell name for display
    fn shell_name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_constructors() {
        let out = ShellOutput::ok(["/sbin", "26300"]);
        assert!(out.success);
        assert_eq!(out.lines, vec!["/sbin", "26300"]);

        let out = ShellOutput::failed(Vec::<String>::new());
        assert!(!out.success);
        assert!(out.lines.is_empty());
    }
}
