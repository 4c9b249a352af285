//! Error types for rootenv
//!
//! All modules use `RootEnvResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for rootenv operations
pub type RootEnvResult<T> = Result<T, RootEnvError>;

/// All errors that can occur in rootenv
#[derive(Error, Debug)]
pub enum RootEnvError {
    // Privileged shell errors
    #[error("Root shell unavailable: {0}")]
    ShellUnavailable(String),

    #[error("Shell command timed out after {secs}s: {command}")]
    CommandTimeout { command: String, secs: u64 },

    #[error("Malformed shell output from `{command}`: {reason}")]
    MalformedOutput { command: String, reason: String },

    #[error("Invalid version code {value:?}: {source}")]
    VersionParse {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    #[error("Probe failed after {attempts} retries: {last}")]
    RetriesExhausted { attempts: u32, last: Box<RootEnvError> },

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Process errors
    #[error("Command failed: {command}")]
    CommandFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    User(String),
}

impl RootEnvError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a command failed error
    pub fn command_failed(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::CommandFailed {
            command: command.into(),
            source,
        }
    }

    /// Create a malformed output error
    pub fn malformed(command: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedOutput {
            command: command.into(),
            reason: reason.into(),
        }
    }

    /// Check if the error is a transient probe failure worth retrying
    ///
    /// Configuration and serialization problems will not go away by asking
    /// the shell again, everything else on the probe path might.
    pub fn is_transient(&self) -> bool {
        !matches!(
            self,
            Self::RetriesExhausted { .. }
                | Self::ConfigInvalid { .. }
                | Self::ConfigDirCreate { .. }
                | Self::Json(_)
                | Self::TomlParse(_)
                | Self::TomlSerialize(_)
                | Self::User(_)
        )
    }

    /// Check if the error means the root shell could not be started at all
    pub fn is_shell_unavailable(&self) -> bool {
        match self {
            Self::ShellUnavailable(_) => true,
            Self::RetriesExhausted { last, .. } => last.is_shell_unavailable(),
            _ => false,
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::ShellUnavailable(_) => Some("Install a root solution that provides `su`"),
            Self::CommandTimeout { .. } => Some("Confirm the root grant dialog, or raise shell.command_timeout_secs"),
            Self::ConfigInvalid { .. } => Some("Run: rootenv config init --force"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = RootEnvError::ShellUnavailable("su not found".to_string());
        assert!(err.to_string().contains("Root shell unavailable"));
    }

    #[test]
    fn error_hint() {
        let err = RootEnvError::ShellUnavailable("su not found".to_string());
        assert_eq!(err.hint(), Some("Install a root solution that provides `su`"));
        assert!(RootEnvError::User("bad".to_string()).hint().is_none());
    }

    #[test]
    fn error_transient() {
        assert!(RootEnvError::malformed("su -V", "no output").is_transient());
        assert!(RootEnvError::ShellUnavailable("gone".to_string()).is_transient());
        assert!(!RootEnvError::RetriesExhausted {
            attempts: 11,
            last: Box::new(RootEnvError::malformed("su -V", "no output")),
        }
        .is_transient());
        assert!(!RootEnvError::User("bad".to_string()).is_transient());
    }

    #[test]
    fn version_parse_is_transient() {
        let source = "abc".parse::<i64>().unwrap_err();
        let err = RootEnvError::VersionParse {
            value: "abc".to_string(),
            source,
        };
        assert!(err.is_transient());
        assert!(err.to_string().contains("\"abc\""));
    }

    #[test]
    fn exhausted_keeps_shell_unavailability() {
        let err = RootEnvError::RetriesExhausted {
            attempts: 11,
            last: Box::new(RootEnvError::ShellUnavailable("su missing".to_string())),
        };
        assert!(err.is_shell_unavailable());
        assert!(!err.is_transient());

        let err = RootEnvError::RetriesExhausted {
            attempts: 11,
            last: Box::new(RootEnvError::malformed("su -V", "empty")),
        };
        assert!(!err.is_shell_unavailable());
    }
}
