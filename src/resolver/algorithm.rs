//! Runtime path resolution
//!
//! Probe order:
//! 1. cached path (unless forced)
//! 2. wait for the root grant decision
//! 3. root mount / ramdisk probe
//! 4. path report, alternate variant marker, legacy fallback, validation
//!
//! Transient failures in 3-4 are retried with linear backoff up to
//! `max_transient_retries` times.

use super::cache::{EnvironmentCache, ResolvedEnvironment};
use super::probe::{
    PathReport, RamdiskProbe, AB_UPDATE_PROPERTY, PATH_REPORT, ROOT_MOUNT_CHECK, SHELL_VERSION,
};
use crate::config::schema::{FrameworkConfig, ResolverConfig};
use crate::device::{FileProbe, PropertySource};
use crate::error::{RootEnvError, RootEnvResult};
use crate::shell::{GrantState, PrivilegedShell};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Runtime state marker of the primary framework, relative to its path
const PRIMARY_MARKER: &str = ".magisk";

/// Daemon binary of the alternate framework, relative to its path
const ALTERNATE_MARKER: &str = "ksud";

/// The probe sequence; run it on a background task
pub struct PathResolver {
    shell: Arc<dyn PrivilegedShell>,
    files: Arc<dyn FileProbe>,
    props: Arc<dyn PropertySource>,
    cache: Arc<EnvironmentCache>,
    config: ResolverConfig,
    framework: FrameworkConfig,
}

impl PathResolver {
    pub fn new(
        shell: Arc<dyn PrivilegedShell>,
        files: Arc<dyn FileProbe>,
        props: Arc<dyn PropertySource>,
        cache: Arc<EnvironmentCache>,
        config: ResolverConfig,
        framework: FrameworkConfig,
    ) -> Self {
        Self {
            shell,
            files,
            props,
            cache,
            config,
            framework,
        }
    }

    pub fn cache(&self) -> &Arc<EnvironmentCache> {
        &self.cache
    }

    pub fn shell(&self) -> &Arc<dyn PrivilegedShell> {
        &self.shell
    }

    /// Resolve the runtime path
    ///
    /// `Ok(None)` is a definitive answer (denied, no ramdisk probe, nothing
    /// valid found). `Err` means the probe kept failing or the shell is
    /// gone; the cache is left for the caller to reset.
    ///
    /// Only a forced chain may drop a cached path. A retry counts as
    /// forced.
    pub async fn resolve(&self, force_check: bool) -> RootEnvResult<Option<String>> {
        if !force_check {
            if let Some(path) = self.cache.peek_path() {
                return Ok(Some(path));
            }
        }

        debug!("Resolving runtime path through {}", self.shell.shell_name());
        let mut force = force_check;
        let mut retries = 0;
        loop {
            if !self.await_grant().await {
                debug!("Root access denied, skipping probe");
                return Ok(None);
            }

            match self.probe(force).await {
                Ok(path) => return Ok(path),
                Err(e) if e.is_transient() && retries < self.config.max_transient_retries => {
                    retries += 1;
                    force = true;
                    let delay = self.config.backoff(retries);
                    debug!(
                        "Probe failed ({}), retry {}/{} in {:?}",
                        e, retries, self.config.max_transient_retries, delay
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) if e.is_transient() => {
                    warn!("Giving up after {} retries: {}", retries, e);
                    return Err(RootEnvError::RetriesExhausted {
                        attempts: retries,
                        last: Box::new(e),
                    });
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Poll until the grant is decided; `true` when granted
    async fn await_grant(&self) -> bool {
        let mut logged = false;
        loop {
            match self.shell.grant_state() {
                GrantState::Granted => return true,
                GrantState::Denied => return false,
                GrantState::Undetermined => {
                    if !logged {
                        debug!("Waiting for root grant decision");
                        logged = true;
                    }
                    tokio::time::sleep(self.config.grant_poll_interval()).await;
                }
            }
        }
    }

    /// One pass over steps 3 and 4; commits its outcome to the cache
    async fn probe(&self, force: bool) -> RootEnvResult<Option<String>> {
        let previous = self.cache.snapshot();

        let output = self
            .shell
            .execute(&[ROOT_MOUNT_CHECK, SHELL_VERSION])
            .await?;
        let ramdisk = RamdiskProbe::decode(output);

        if !ramdisk.success {
            info!("Failed to search for ramdisk");
            let mut has_ramdisk = previous.has_ramdisk;
            if ramdisk.root_mount.is_some() {
                let ab_update = self.props.get(AB_UPDATE_PROPERTY).await;
                if let Some(hint) = ramdisk.ramdisk_hint(ab_update.as_deref()) {
                    has_ramdisk = hint;
                }
            }
            if force {
                self.cache.replace(ResolvedEnvironment::unresolved(has_ramdisk));
            } else {
                self.cache.set_has_ramdisk(has_ramdisk);
            }
            return Ok(None);
        }

        debug!(
            "Root mount check: {:?}, shell version: {:?}",
            ramdisk.root_mount, ramdisk.shell_version
        );
        debug!("Searching for runtime path, cached: {:?}", previous.path);

        let output = self.shell.execute(&[PATH_REPORT, SHELL_VERSION]).await?;
        let report = PathReport::decode(&output);

        let mut candidate = report.path.clone();
        let mut is_alternate = false;
        if candidate.is_none() && self.files.exists(&self.framework.alternate_marker).await? {
            candidate = Some(self.framework.alternate_root.clone());
            is_alternate = true;
        }
        info!("Runtime path candidate: {:?}", candidate);

        let version_code = report.version_code()?;
        info!("Version code: {}", version_code);

        if self.needs_legacy_root(version_code, candidate.as_deref()).await? {
            debug!(
                "Version {} predates path reporting, using {}",
                version_code, self.framework.legacy_root
            );
            candidate = Some(self.framework.legacy_root.clone());
            is_alternate = false;
        }

        let valid = match candidate.as_deref() {
            Some(path) => self.validate(path, is_alternate).await?,
            None => false,
        };
        let path = match candidate {
            Some(path) if valid => path,
            other => {
                error!("Failed to get runtime path (got {:?})", other);
                if force {
                    self.cache
                        .replace(ResolvedEnvironment::unresolved(previous.has_ramdisk));
                }
                return Ok(None);
            }
        };

        self.cache.replace(ResolvedEnvironment {
            path: Some(path.clone()),
            version_code,
            has_ramdisk: previous.has_ramdisk,
            is_alternate_variant: is_alternate,
            resolved_at: Some(Utc::now()),
        });
        Ok(Some(path))
    }

    /// Versions with flat modules but no path reporting live at the legacy root
    async fn needs_legacy_root(
        &self,
        version_code: i64,
        candidate: Option<&str>,
    ) -> RootEnvResult<bool> {
        let in_range = version_code >= self.config.flat_modules_version
            && version_code < self.config.path_support_version;
        if !in_range {
            return Ok(false);
        }

        match candidate {
            None => Ok(true),
            Some("") => Ok(true),
            Some(path) => Ok(!self.files.exists(path).await?),
        }
    }

    /// Candidate exists and carries the framework's marker
    async fn validate(&self, path: &str, is_alternate: bool) -> RootEnvResult<bool> {
        if path.is_empty() || !self.files.exists(path).await? {
            return Ok(false);
        }

        let marker = if is_alternate {
            ALTERNATE_MARKER
        } else {
            PRIMARY_MARKER
        };
        self.files
            .exists(&format!("{}/{}", path.trim_end_matches('/'), marker))
            .await
    }
}
