//! Non-blocking entry point to path resolution
//!
//! Every request runs on its own tokio task and delivers exactly one
//! [`Resolution`]. Concurrent requests are not coalesced; they all write
//! the same cache and the last one wins.

use super::algorithm::PathResolver;
use super::cache::{EnvironmentCache, ResolvedEnvironment};
use crate::access::RootAccessFlag;
use crate::config::Config;
use crate::device::{FileProbe, GetpropSource, LocalFileProbe, PropertySource, ShellFileProbe};
use crate::shell::{GrantState, PrivilegedShell, SuShell};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

/// Why a resolution produced no path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureCode {
    /// Probing finished without a valid path
    NoPath = 1,
    /// No root shell could be started
    NoSu = 2,
    /// Probing failed unexpectedly
    Other = 3,
}

impl FailureCode {
    /// Stable numeric code
    pub fn code(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for FailureCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::NoPath => "no runtime path found",
            Self::NoSu => "root shell unavailable",
            Self::Other => "probe failed",
        };
        f.write_str(text)
    }
}

/// Outcome of one resolution request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Resolved(String),
    Failed(FailureCode),
}

impl Resolution {
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::Resolved(path) => Some(path),
            Self::Failed(_) => None,
        }
    }

    pub fn failure(&self) -> Option<FailureCode> {
        match self {
            Self::Resolved(_) => None,
            Self::Failed(code) => Some(*code),
        }
    }
}

/// Receiver of a resolution outcome
///
/// Both methods consume the callback, so it fires exactly once.
pub trait ResolveCallback: Send + 'static {
    fn on_path_received(self, path: String);
    fn on_failure(self, code: FailureCode);
}

impl<F> ResolveCallback for F
where
    F: FnOnce(Resolution) + Send + 'static,
{
    fn on_path_received(self, path: String) {
        self(Resolution::Resolved(path))
    }

    fn on_failure(self, code: FailureCode) {
        self(Resolution::Failed(code))
    }
}

/// User-facing diagnosis of the environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnvironmentIssue {
    /// No framework binary on the device
    NoFramework,
    /// Framework present, root explicitly refused
    RootDenied,
    /// Framework present, root not (yet) usable
    NoRoot,
}

impl EnvironmentIssue {
    pub fn message(&self) -> &'static str {
        match self {
            Self::NoFramework => "No root framework installed",
            Self::RootDenied => "Root access was denied",
            Self::NoRoot => "Root access is not available",
        }
    }
}

/// Root environment service: cached accessors plus async resolution
#[derive(Clone)]
pub struct RootEnvironment {
    resolver: Arc<PathResolver>,
    access: &'static RootAccessFlag,
    framework_installed: bool,
}

impl RootEnvironment {
    /// Build the service from explicit collaborators
    pub async fn new(
        shell: Arc<dyn PrivilegedShell>,
        files: Arc<dyn FileProbe>,
        props: Arc<dyn PropertySource>,
        config: &Config,
    ) -> Self {
        let framework_installed = framework_present(&config.framework.binary_locations).await;
        debug!("Framework binary present: {}", framework_installed);

        let resolver = PathResolver::new(
            shell,
            files,
            props,
            Arc::new(EnvironmentCache::new()),
            config.resolver.clone(),
            config.framework.clone(),
        );

        Self {
            resolver: Arc::new(resolver),
            access: RootAccessFlag::global(),
            framework_installed,
        }
    }

    /// Build the service against the device: `su`, file checks, `getprop`
    pub async fn from_config(config: &Config) -> Self {
        let shell: Arc<dyn PrivilegedShell> = Arc::new(SuShell::new(config.shell.clone()));
        let files: Arc<dyn FileProbe> = if config.shell.check_files_as_root {
            Arc::new(ShellFileProbe::new(Arc::clone(&shell)))
        } else {
            Arc::new(LocalFileProbe)
        };
        let props = Arc::new(GetpropSource::with_program(&config.shell.getprop_binary));
        Self::new(shell, files, props, config).await
    }

    /// Record root access in `flag` instead of the process-wide one
    pub fn with_access_flag(mut self, flag: &'static RootAccessFlag) -> Self {
        self.access = flag;
        self
    }

    fn cache(&self) -> &EnvironmentCache {
        self.resolver.cache()
    }

    pub fn peek_path(&self) -> Option<String> {
        self.cache().peek_path()
    }

    /// Read-only mirror; never write through it
    pub fn peek_mirror_path(&self) -> Option<String> {
        self.cache().snapshot().mirror_path()
    }

    /// Loaded-modules view; mutate [`super::WRITABLE_MODULES_DIR`] instead
    pub fn peek_modules_path(&self) -> Option<String> {
        self.cache().snapshot().modules_path()
    }

    pub fn peek_version_code(&self) -> i64 {
        self.cache().peek_version_code()
    }

    pub fn peek_has_ramdisk(&self) -> bool {
        self.cache().peek_has_ramdisk()
    }

    pub fn peek_is_alternate_variant(&self) -> bool {
        self.cache().peek_is_alternate_variant()
    }

    pub fn snapshot(&self) -> ResolvedEnvironment {
        self.cache().snapshot()
    }

    pub fn framework_installed(&self) -> bool {
        self.framework_installed
    }

    /// Outcome recorded by the latest fresh resolution
    pub fn has_gotten_root_access(&self) -> bool {
        self.access.has_gotten_root_access()
    }

    /// Diagnose the environment from the cache and the grant state
    pub fn error_signal(&self) -> Option<EnvironmentIssue> {
        let grant = self.resolver.shell().grant_state();
        if self.cache().peek_path().is_some() && grant != GrantState::Denied {
            return None;
        }

        if !self.framework_installed {
            Some(EnvironmentIssue::NoFramework)
        } else if grant == GrantState::Denied {
            Some(EnvironmentIssue::RootDenied)
        } else {
            Some(EnvironmentIssue::NoRoot)
        }
    }

    /// Resolve on a background task; the receiver gets exactly one outcome
    ///
    /// Must be called from within a tokio runtime.
    pub fn resolve_async(&self, force_check: bool) -> oneshot::Receiver<Resolution> {
        let (tx, rx) = oneshot::channel();
        let resolver = Arc::clone(&self.resolver);
        let access = self.access;

        tokio::spawn(async move {
            let resolution = run_resolution(&resolver, access, force_check).await;
            if tx.send(resolution).is_err() {
                debug!("Resolution finished after the requester went away");
            }
        });

        rx
    }

    /// Resolve on a background task and report through `callback`
    ///
    /// The callback fires exactly once, with `Other` if the resolution
    /// task dies.
    pub fn resolve_with_callback<C: ResolveCallback>(
        &self,
        callback: C,
        force_check: bool,
    ) -> JoinHandle<()> {
        let outcome = self.resolve_async(force_check);

        tokio::spawn(async move {
            match settle(outcome.await) {
                Resolution::Resolved(path) => callback.on_path_received(path),
                Resolution::Failed(code) => callback.on_failure(code),
            }
        })
    }

    /// Resolve and wait for the outcome
    pub async fn resolve(&self, force_check: bool) -> Resolution {
        settle(self.resolve_async(force_check).await)
    }
}

/// A dropped sender means the resolution task panicked
fn settle(outcome: Result<Resolution, oneshot::error::RecvError>) -> Resolution {
    outcome.unwrap_or_else(|_| {
        error!("Resolution task ended without an outcome");
        Resolution::Failed(FailureCode::Other)
    })
}

/// Any of the framework binaries exists
async fn framework_present(locations: &[String]) -> bool {
    for location in locations {
        match tokio::fs::try_exists(location).await {
            Ok(true) => return true,
            Ok(false) => {}
            Err(e) => debug!("Cannot check {}: {}", location, e),
        }
    }
    false
}

/// Body of one background resolution task
async fn run_resolution(
    resolver: &PathResolver,
    access: &RootAccessFlag,
    force_check: bool,
) -> Resolution {
    if !force_check {
        if let Some(path) = resolver.cache().peek_path() {
            return Resolution::Resolved(path);
        }
    }

    let (path, code) = match resolver.resolve(force_check).await {
        Ok(path) => (path, FailureCode::NoPath),
        Err(e) if e.is_shell_unavailable() => {
            warn!("Root shell unavailable: {}", e);
            (None, FailureCode::NoSu)
        }
        Err(e) => {
            error!("Runtime path resolution failed: {}", e);
            (None, FailureCode::Other)
        }
    };

    if force_check && path.is_none() {
        resolver.cache().invalidate();
    }

    match path {
        Some(path) => {
            access.set_has_gotten_root_access(true);
            Resolution::Resolved(path)
        }
        None => {
            access.set_has_gotten_root_access(false);
            Resolution::Failed(code)
        }
    }
}
