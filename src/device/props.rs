//! System property lookup

use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Read-only view of the device's system properties
#[async_trait]
pub trait PropertySource: Send + Sync {
    /// Property value, `None` when unset or empty
    async fn get(&self, key: &str) -> Option<String>;
}

/// Reads properties with the `getprop` tool
#[derive(Debug, Clone)]
pub struct GetpropSource {
    program: String,
}

impl GetpropSource {
    /// Look properties up as `<program> <key>`
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

#[async_trait]
impl PropertySource for GetpropSource {
    async fn get(&self, key: &str) -> Option<String> {
        let output = Command::new(&self.program)
            .arg(key)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .output()
            .await;

        match output {
            Ok(output) if output.status.success() => {
                let value = String::from_utf8_lossy(&output.stdout).trim().to_string();
                (!value.is_empty()).then_some(value)
            }
            Ok(_) => None,
            Err(e) => {
                debug!("{} {} failed: {}", self.program, key, e);
                None
            }
        }
    }
}
