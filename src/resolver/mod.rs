//! Runtime path resolver
//!
//! Finds where the root framework exposes its runtime state, caches the
//! answer, and serves it to any number of callers:
//! - `cache`: last validated environment and its derived paths
//! - `probe`: shell command lines and their typed replies
//! - `algorithm`: the probe sequence with grant polling and retry
//! - `facade`: background tasks, outcome delivery, diagnosis

mod algorithm;
mod cache;
mod facade;
pub mod probe;

pub use algorithm::PathResolver;
pub use cache::{
    EnvironmentCache, ResolvedEnvironment, MIRROR_SUFFIX, MODULES_SUFFIX, WRITABLE_MODULES_DIR,
};
pub use facade::{EnvironmentIssue, FailureCode, Resolution, ResolveCallback, RootEnvironment};
