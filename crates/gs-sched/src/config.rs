//! Process-wide tick configuration.
//!
//! Both knobs are read freshly on every scheduler pass, so changing them on
//! a live controller takes effect at the next pass — no restart, no
//! per-simulation plumbing.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Default global base period: one scheduler pass every 50 ms.
pub const DEFAULT_BASE_PERIOD_MS: u64 = 50;

/// How one scheduler pass distributes work.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum TickMode {
    /// Tick running simulations one after another on the ticker thread.
    /// A slow simulation stalls the whole pass — the documented trade-off
    /// of choosing this mode.
    Synchronous,
    /// One detached rayon task per running simulation; the pass returns
    /// without waiting and each snapshot is forwarded as its own tick
    /// completes.  In-flight ticks are bounded by the pool size, not by
    /// the simulation count.
    Concurrent,
}

/// Hot-reloadable tick settings shared by the ticker thread and any caller
/// holding the controller.
#[derive(Debug)]
pub struct TickSettings {
    base_period_ms: AtomicU64,
    concurrent:     AtomicBool,
}

impl TickSettings {
    pub fn new(base_period_ms: u64, mode: TickMode) -> Self {
        Self {
            base_period_ms: AtomicU64::new(base_period_ms.max(1)),
            concurrent:     AtomicBool::new(mode == TickMode::Concurrent),
        }
    }

    /// The global base period in milliseconds.  Every simulation's own
    /// tick rate is throttled as a multiple of this.
    pub fn base_period_ms(&self) -> u64 {
        self.base_period_ms.load(Ordering::Relaxed)
    }

    pub fn set_base_period_ms(&self, ms: u64) {
        self.base_period_ms.store(ms.max(1), Ordering::Relaxed);
    }

    pub fn mode(&self) -> TickMode {
        if self.concurrent.load(Ordering::Relaxed) {
            TickMode::Concurrent
        } else {
            TickMode::Synchronous
        }
    }

    pub fn set_mode(&self, mode: TickMode) {
        self.concurrent
            .store(mode == TickMode::Concurrent, Ordering::Relaxed);
    }
}

impl Default for TickSettings {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_PERIOD_MS, TickMode::Synchronous)
    }
}
