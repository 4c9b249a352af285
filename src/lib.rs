//! rootenv - Root environment discovery
//!
//! Finds where a root framework (Magisk or KernelSU) exposes its runtime
//! state on an Android device, caches the answer with the framework's
//! version code and boot layout, and resolves it asynchronously for any
//! number of callers.

pub mod access;
pub mod cli;
pub mod config;
pub mod device;
pub mod error;
pub mod resolver;
pub mod shell;
pub mod ui;

pub use error::{RootEnvError, RootEnvResult};
pub use resolver::{FailureCode, Resolution, ResolveCallback, RootEnvironment};
