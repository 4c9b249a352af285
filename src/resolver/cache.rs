//! Shared cache of the last resolved environment

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::{PoisonError, RwLock};

/// Suffix of the read-only mirror under the runtime path
pub const MIRROR_SUFFIX: &str = "/.magisk/mirror";

/// Suffix of the loaded-modules view under the runtime path
pub const MODULES_SUFFIX: &str = "/.magisk/modules";

/// Read/write modules directory owned by the framework
pub const WRITABLE_MODULES_DIR: &str = "/data/adb/modules";

/// Resolved root environment
///
/// Always written as a whole, so a path is never paired with another
/// probe's version code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolvedEnvironment {
    /// Runtime root of the framework, only ever a validated path
    pub path: Option<String>,
    /// Framework version code, 0 when unknown or when `path` is absent
    pub version_code: i64,
    /// Device boots from a ramdisk
    pub has_ramdisk: bool,
    /// Framework is the alternate (ksu) implementation
    pub is_alternate_variant: bool,
    /// When the probe producing this tuple finished
    pub resolved_at: Option<DateTime<Utc>>,
}

impl ResolvedEnvironment {
    /// Tuple for a probe that found no usable path
    pub fn unresolved(has_ramdisk: bool) -> Self {
        Self {
            path: None,
            version_code: 0,
            has_ramdisk,
            is_alternate_variant: false,
            resolved_at: Some(Utc::now()),
        }
    }

    /// Mirror of the system partitions. Read only on current framework
    /// versions; never write through it.
    pub fn mirror_path(&self) -> Option<String> {
        self.path.as_ref().map(|p| format!("{}{}", p, MIRROR_SUFFIX))
    }

    /// Modules currently loaded. For changes use [`WRITABLE_MODULES_DIR`].
    pub fn modules_path(&self) -> Option<String> {
        self.path.as_ref().map(|p| format!("{}{}", p, MODULES_SUFFIX))
    }
}

/// Last known environment, shared by the resolver and the accessors
#[derive(Debug, Default)]
pub struct EnvironmentCache {
    inner: RwLock<ResolvedEnvironment>,
}

impl EnvironmentCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the whole tuple
    pub fn snapshot(&self) -> ResolvedEnvironment {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn peek_path(&self) -> Option<String> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .path
            .clone()
    }

    pub fn peek_version_code(&self) -> i64 {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .version_code
    }

    pub fn peek_has_ramdisk(&self) -> bool {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .has_ramdisk
    }

    pub fn peek_is_alternate_variant(&self) -> bool {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_alternate_variant
    }

    /// Replace the whole tuple
    pub fn replace(&self, env: ResolvedEnvironment) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = env;
    }

    /// Update only the ramdisk flag, leaving the rest of the tuple alone
    pub fn set_has_ramdisk(&self, has_ramdisk: bool) {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .has_ramdisk = has_ramdisk;
    }

    /// Drop the cached path; the ramdisk flag survives
    pub fn invalidate(&self) {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let has_ramdisk = guard.has_ramdisk;
        *guard = ResolvedEnvironment::unresolved(has_ramdisk);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolved(path: &str, version_code: i64) -> ResolvedEnvironment {
        ResolvedEnvironment {
            path: Some(path.to_string()),
            version_code,
            has_ramdisk: true,
            is_alternate_variant: false,
            resolved_at: Some(Utc::now()),
        }
    }

    #[test]
    fn empty_cache() {
        let cache = EnvironmentCache::new();
        assert_eq!(cache.peek_path(), None);
        assert_eq!(cache.peek_version_code(), 0);
        assert!(!cache.peek_has_ramdisk());
        assert!(cache.snapshot().mirror_path().is_none());
        assert!(cache.snapshot().modules_path().is_none());
    }

    #[test]
    fn derived_paths() {
        let env = resolved("/debug_ramdisk", 27000);
        assert_eq!(
            env.mirror_path().as_deref(),
            Some("/debug_ramdisk/.magisk/mirror")
        );
        assert_eq!(
            env.modules_path().as_deref(),
            Some("/debug_ramdisk/.magisk/modules")
        );
    }

    #[test]
    fn invalidate_resets_version_keeps_ramdisk() {
        let cache = EnvironmentCache::new();
        cache.replace(resolved("/sbin", 26300));
        assert_eq!(cache.peek_version_code(), 26300);

        cache.invalidate();
        let env = cache.snapshot();
        assert_eq!(env.path, None);
        assert_eq!(env.version_code, 0);
        assert!(env.has_ramdisk);
        assert!(!env.is_alternate_variant);
    }

    #[test]
    fn ramdisk_flag_updates_alone() {
        let cache = EnvironmentCache::new();
        cache.replace(resolved("/sbin", 26300));

        cache.set_has_ramdisk(false);
        let env = cache.snapshot();
        assert!(!env.has_ramdisk);
        assert_eq!(env.path.as_deref(), Some("/sbin"));
        assert_eq!(env.version_code, 26300);
    }

    #[test]
    fn concurrent_writers_never_mix_tuples() {
        let cache = std::sync::Arc::new(EnvironmentCache::new());
        let writers: Vec<_> = (0..8)
            .map(|i| {
                let cache = cache.clone();
                std::thread::spawn(move || {
                    for _ in 0..200 {
                        cache.replace(resolved(&format!("/path{}", i), i));
                        let env = cache.snapshot();
                        let expected = format!("/path{}", env.version_code);
                        assert_eq!(env.path.as_deref(), Some(expected.as_str()));
                    }
                })
            })
            .collect();

        for writer in writers {
            writer.join().unwrap();
        }
    }
}
