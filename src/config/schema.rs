//! Configuration schema for rootenv
//!
//! Configuration is stored at `~/.config/rootenv/config.toml`

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Root shell settings
    pub shell: ShellConfig,

    /// Resolution algorithm tuning
    pub resolver: ResolverConfig,

    /// Framework locations
    pub framework: FrameworkConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Enable verbose logging
    pub verbose: bool,

    /// Log format: "text" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            log_format: "text".to_string(),
        }
    }
}

/// Root shell configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Binary used to open a root shell
    pub su_binary: String,

    /// How long the grant request may stay pending before it counts as denied
    pub grant_timeout_secs: u64,

    /// Upper bound for a single batched shell invocation
    pub command_timeout_secs: u64,

    /// Run file existence checks through the root shell. Turn off when
    /// this process already runs as root.
    pub check_files_as_root: bool,

    /// Property lookup tool, called as `<getprop_binary> <key>`
    pub getprop_binary: String,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            su_binary: "su".to_string(),
            grant_timeout_secs: 20,
            command_timeout_secs: 30,
            check_files_as_root: true,
            getprop_binary: "getprop".to_string(),
        }
    }
}

/// Resolution algorithm configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Interval between grant state polls while the decision is pending
    pub grant_poll_interval_ms: u64,

    /// Retries allowed for transient probe failures in one call chain
    pub max_transient_retries: u32,

    /// Linear backoff step; retry N sleeps N * step
    pub backoff_step_ms: u64,

    /// First version code with flat module layout
    pub flat_modules_version: i64,

    /// First version code that reports its own runtime path
    pub path_support_version: i64,
}

impl ResolverConfig {
    pub fn grant_poll_interval(&self) -> Duration {
        Duration::from_millis(self.grant_poll_interval_ms)
    }

    /// Backoff before retry number `attempt` (1-based)
    pub fn backoff(&self, attempt: u32) -> Duration {
        Duration::from_millis(self.backoff_step_ms.saturating_mul(u64::from(attempt)))
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            grant_poll_interval_ms: 100,
            max_transient_retries: 11,
            backoff_step_ms: 50,
            flat_modules_version: 19000,
            path_support_version: 26300,
        }
    }
}

/// Where the privileged framework lives on the device
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameworkConfig {
    /// Framework binary locations; none present means no framework installed
    pub binary_locations: Vec<String>,

    /// Marker file of the alternate (ksu) implementation
    pub alternate_marker: String,

    /// Runtime root used when the alternate implementation is detected
    pub alternate_root: String,

    /// Runtime root for versions with flat modules but no path reporting
    pub legacy_root: String,
}

impl Default for FrameworkConfig {
    fn default() -> Self {
        Self {
            binary_locations: vec![
                "/sbin/magisk".to_string(),
                "/system/bin/magisk".to_string(),
                "/system/xbin/magisk".to_string(),
            ],
            alternate_marker: "/data/adb/ksu".to_string(),
            alternate_root: "/data/adb".to_string(),
            legacy_root: "/sbin".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = Config::default();
        let toml = toml::to_string_pretty(&config).unwrap();
        assert!(toml.contains("[general]"));
        assert!(toml.contains("[resolver]"));
        assert!(toml.contains("max_transient_retries = 11"));
    }

    #[test]
    fn partial_config_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [resolver]
            grant_poll_interval_ms = 250
            "#,
        )
        .unwrap();

        assert_eq!(config.resolver.grant_poll_interval_ms, 250);
        assert_eq!(config.resolver.backoff_step_ms, 50);
        assert_eq!(config.shell.su_binary, "su");
        assert_eq!(config.framework.legacy_root, "/sbin");
        assert!(config.shell.check_files_as_root);
    }

    #[test]
    fn backoff_is_linear() {
        let resolver = ResolverConfig::default();
        assert_eq!(resolver.backoff(1), Duration::from_millis(50));
        assert_eq!(resolver.backoff(11), Duration::from_millis(550));
        assert_eq!(resolver.grant_poll_interval(), Duration::from_millis(100));
    }
}
