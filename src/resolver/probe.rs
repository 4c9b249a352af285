//! Shell command lines issued by the resolver and their decoded replies
//!
//! Each batched call is decoded into a typed record right away so the
//! algorithm never indexes raw output lines.

use crate::error::{RootEnvError, RootEnvResult};
use crate::shell::ShellOutput;

/// Prints `true` when `/` is mounted from `/dev/root`, `false` otherwise
pub const ROOT_MOUNT_CHECK: &str =
    "if grep ' / ' /proc/mounts | grep -q '/dev/root' &> /dev/null; then echo true; else echo false; fi";

/// Version code of the root shell's provider
pub const SHELL_VERSION: &str = "su -V";

/// Asks the framework for its runtime path
pub const PATH_REPORT: &str = "magisk --path";

/// Build property set on devices with A/B system updates
pub const AB_UPDATE_PROPERTY: &str = "ro.build.ab_update";

/// Printed by the shell when the framework binary is missing
const NOT_FOUND_SENTINEL: &str = "not found";

/// Reply to `[ROOT_MOUNT_CHECK, SHELL_VERSION]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RamdiskProbe {
    pub success: bool,
    /// `true`/`false` line of the root mount check
    pub root_mount: Option<String>,
    pub shell_version: Option<String>,
}

impl RamdiskProbe {
    pub fn decode(output: ShellOutput) -> Self {
        let mut lines = output.lines.into_iter();
        Self {
            success: output.success,
            root_mount: lines.next(),
            shell_version: lines.next(),
        }
    }

    /// Ramdisk guess after a failed probe, `None` when there was no output
    ///
    /// Approximation: A/B update support is not the same thing as booting
    /// from a ramdisk, but the two correlate on the devices this targets.
    pub fn ramdisk_hint(&self, ab_update: Option<&str>) -> Option<bool> {
        let root_mount = self.root_mount.as_deref()?;
        Some(root_mount == "false" || ab_update.is_some_and(|v| v.eq_ignore_ascii_case("true")))
    }
}

/// Reply to `[PATH_REPORT, SHELL_VERSION]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathReport {
    /// Path the framework reported, if it reported a usable one
    pub path: Option<String>,
    version_line: Option<String>,
}

impl PathReport {
    pub fn decode(output: &ShellOutput) -> Self {
        // A single line means the path report printed nothing
        let (path_line, version_line) = match output.lines.as_slice() {
            [] => (None, None),
            [version] => (None, Some(version.clone())),
            [path, version, ..] => (Some(path.as_str()), Some(version.clone())),
        };

        let path = path_line
            .filter(|_| output.success)
            .map(str::trim)
            .filter(|p| !p.is_empty() && !p.contains(NOT_FOUND_SENTINEL))
            .map(str::to_string);

        Self { path, version_line }
    }

    /// Parsed version code
    pub fn version_code(&self) -> RootEnvResult<i64> {
        let line = self
            .version_line
            .as_deref()
            .ok_or_else(|| RootEnvError::malformed(SHELL_VERSION, "no version line"))?;

        line.trim()
            .parse::<i64>()
            .map_err(|source| RootEnvError::VersionParse {
                value: line.to_string(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ramdisk_probe_lines() {
        let probe = RamdiskProbe::decode(ShellOutput::ok(["false", "26300"]));
        assert!(probe.success);
        assert_eq!(probe.root_mount.as_deref(), Some("false"));
        assert_eq!(probe.shell_version.as_deref(), Some("26300"));
    }

    #[test]
    fn ramdisk_hint_from_root_mount() {
        let probe = RamdiskProbe::decode(ShellOutput::failed(["false"]));
        assert_eq!(probe.ramdisk_hint(None), Some(true));

        let probe = RamdiskProbe::decode(ShellOutput::failed(["true"]));
        assert_eq!(probe.ramdisk_hint(None), Some(false));
        assert_eq!(probe.ramdisk_hint(Some("TRUE")), Some(true));
        assert_eq!(probe.ramdisk_hint(Some("false")), Some(false));
    }

    #[test]
    fn ramdisk_hint_needs_output() {
        let probe = RamdiskProbe::decode(ShellOutput::failed(Vec::<String>::new()));
        assert_eq!(probe.ramdisk_hint(Some("true")), None);
    }

    #[test]
    fn path_report_accepts_path() {
        let report = PathReport::decode(&ShellOutput::ok(["/sbin", "26300"]));
        assert_eq!(report.path.as_deref(), Some("/sbin"));
        assert_eq!(report.version_code().unwrap(), 26300);
    }

    #[test]
    fn path_report_rejects_sentinel_and_empty() {
        let report =
            PathReport::decode(&ShellOutput::ok(["/system/bin/sh: magisk: not found", "26300"]));
        assert_eq!(report.path, None);

        let report = PathReport::decode(&ShellOutput::ok(["", "26200"]));
        assert_eq!(report.path, None);
        assert_eq!(report.version_code().unwrap(), 26200);
    }

    #[test]
    fn path_report_ignores_path_of_failed_batch() {
        let report = PathReport::decode(&ShellOutput::failed(["/sbin", "26300"]));
        assert_eq!(report.path, None);
        assert_eq!(report.version_code().unwrap(), 26300);
    }

    #[test]
    fn path_report_single_line_is_version() {
        let report = PathReport::decode(&ShellOutput::ok(["32"]));
        assert_eq!(report.path, None);
        assert_eq!(report.version_code().unwrap(), 32);
    }

    #[test]
    fn version_errors() {
        let report = PathReport::decode(&ShellOutput::ok(Vec::<String>::new()));
        assert!(matches!(
            report.version_code(),
            Err(RootEnvError::MalformedOutput { .. })
        ));

        let report = PathReport::decode(&ShellOutput::ok(["/sbin", "26.3:MAGISK"]));
        let err = report.version_code().unwrap_err();
        assert!(matches!(err, RootEnvError::VersionParse { .. }));
        assert!(err.is_transient());
    }
}
