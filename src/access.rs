//! Process-wide "root access was obtained" bookkeeping

use std::sync::atomic::{AtomicBool, Ordering};

static GLOBAL: RootAccessFlag = RootAccessFlag::new();

/// One-way flag recording the outcome of the latest resolution
///
/// Last write wins.
#[derive(Debug, Default)]
pub struct RootAccessFlag {
    gotten: AtomicBool,
}

impl RootAccessFlag {
    pub const fn new() -> Self {
        Self {
            gotten: AtomicBool::new(false),
        }
    }

    /// The process-wide flag
    pub fn global() -> &'static RootAccessFlag {
        &GLOBAL
    }

    pub fn set_has_gotten_root_access(&self, gotten: bool) {
        self.gotten.store(gotten, Ordering::SeqCst);
    }

    pub fn has_gotten_root_access(&self) -> bool {
        self.gotten.load(Ordering::SeqCst)
    }
}
