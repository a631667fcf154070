//! The `Simulation` state machine.

use std::sync::Mutex;
use std::sync::PoisonError;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use tracing::debug;

use gs_core::Tick;
use gs_grid::GridState;
use gs_model::Model;

use crate::{SimError, SimOutput, SimResult};

/// Default per-simulation tick rate in milliseconds.
pub const DEFAULT_TICK_RATE_MS: u64 = 100;

// ── RunState ──────────────────────────────────────────────────────────────────

/// Where one simulation sits in its lifecycle.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum RunState {
    /// Configured and registered, never started.
    Idle,
    /// Advanced by scheduler passes.
    Running,
    /// Start-able again; retains its state and tick counter.
    Paused,
    /// The model's exit predicate fired.  Terminal.
    Finished,
}

// ── Simulation ────────────────────────────────────────────────────────────────

/// Mutable per-simulation data behind the lock.
struct SimInner {
    state:      GridState,
    status:     RunState,
    /// Base-period milliseconds accumulated since the last real tick —
    /// the throttle counter.
    elapsed_ms: u64,
    /// Completed real ticks.
    tick:       Tick,
}

/// One runnable simulation: a model bound to its evolving state, with run
/// control, tick-rate throttling, and the at-most-one-in-flight guard.
///
/// `Simulation` is `Send + Sync`; the scheduler shares it between the
/// ticker thread and session-management callers via `Arc`.  Between ticks
/// the `GridState` is owned exclusively by this struct — the `calculating`
/// flag (not a lock on the state) guarantees no two ticks ever compute
/// concurrently.
pub struct Simulation {
    model:        Model,
    inner:        Mutex<SimInner>,
    /// `true` while a tick is computing.  `tick()` fails rather than
    /// queueing when it finds this set.
    calculating:  AtomicBool,
    /// This simulation's own tick rate, adjustable at runtime without
    /// pausing.  Expressed in the same milliseconds as the scheduler's
    /// global base period.
    tick_rate_ms: AtomicU64,
}

impl Simulation {
    /// Wrap an already-initialized state with its model.  Starts `Idle`
    /// with the default tick rate.
    pub fn new(model: Model, initial_state: GridState) -> Self {
        Self {
            model,
            inner: Mutex::new(SimInner {
                state:      initial_state,
                status:     RunState::Idle,
                elapsed_ms: 0,
                tick:       Tick::ZERO,
            }),
            calculating:  AtomicBool::new(false),
            tick_rate_ms: AtomicU64::new(DEFAULT_TICK_RATE_MS),
        }
    }

    /// Run the model's readiness gate and initializer, then wrap the result.
    pub fn new_initialized(model: Model) -> SimResult<Self> {
        let state = model.initialize()?;
        Ok(Self::new(model, state))
    }

    /// Rewrap a previously saved (state, model) pair, resuming the
    /// completed-tick counter where it left off.  Starts `Idle`; the caller
    /// restores the tick rate and starts it explicitly.
    pub fn new_resumed(model: Model, state: GridState, tick: Tick) -> Self {
        let sim = Self::new(model, state);
        sim.lock_inner().tick = tick;
        sim
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    // ── Run control ───────────────────────────────────────────────────────

    pub fn status(&self) -> RunState {
        self.lock_inner().status
    }

    pub fn is_running(&self) -> bool {
        self.status() == RunState::Running
    }

    /// Idle/Paused → Running.
    ///
    /// Deliberately not idempotent: starting a running simulation errors
    /// with [`SimError::AlreadyRunning`]; a finished one with
    /// [`SimError::Finished`].
    pub fn start(&self) -> SimResult<()> {
        let mut inner = self.lock_inner();
        match inner.status {
            RunState::Idle | RunState::Paused => {
                inner.status = RunState::Running;
                debug!(tick = %inner.tick, "simulation started");
                Ok(())
            }
            RunState::Running => Err(SimError::AlreadyRunning),
            RunState::Finished => Err(SimError::Finished),
        }
    }

    /// Running → Paused.  Takes effect on the next scheduler pass; a tick
    /// already in flight completes normally.
    pub fn pause(&self) -> SimResult<()> {
        let mut inner = self.lock_inner();
        match inner.status {
            RunState::Running => {
                inner.status = RunState::Paused;
                debug!(tick = %inner.tick, "simulation paused");
                Ok(())
            }
            _ => Err(SimError::NotRunning),
        }
    }

    // ── Tick rate ─────────────────────────────────────────────────────────

    pub fn tick_rate_ms(&self) -> u64 {
        self.tick_rate_ms.load(Ordering::Relaxed)
    }

    /// Adjust the tick rate at runtime.  A rate of `k × base period` yields
    /// one real tick per `k` scheduler passes; rates below the base period
    /// fire every pass.
    pub fn set_tick_rate_ms(&self, ms: u64) {
        self.tick_rate_ms.store(ms.max(1), Ordering::Relaxed);
    }

    // ── Ticking ───────────────────────────────────────────────────────────

    /// Offer this simulation one scheduler pass worth `base_period_ms` of
    /// elapsed time.
    ///
    /// Outcomes:
    /// - `Err(AlreadyCalculating)` — a previous tick is still in flight;
    ///   the request is rejected, never queued;
    /// - `Ok(None)` — already `Finished`, or not yet due under the
    ///   throttle (both are normal, not errors);
    /// - `Err(NotRunning)` — `Idle`/`Paused`;
    /// - `Ok(Some(output))` — the model advanced one tick; the snapshot
    ///   carries the new cell layout, the finished flag, and statistics.
    ///
    /// A model error (a strategy violating a spatial invariant) aborts
    /// this tick and leaves the previous state installed; the guard is
    /// released on every exit path.
    pub fn tick(&self, base_period_ms: u64) -> SimResult<Option<SimOutput>> {
        let _guard = CalcGuard::acquire(&self.calculating)?;

        let mut inner = self.lock_inner();
        match inner.status {
            RunState::Finished => return Ok(None),
            RunState::Running => {}
            RunState::Idle | RunState::Paused => return Err(SimError::NotRunning),
        }

        // Throttle against the global base period.
        inner.elapsed_ms += base_period_ms;
        if inner.elapsed_ms < self.tick_rate_ms.load(Ordering::Relaxed) {
            return Ok(None);
        }
        inner.elapsed_ms = 0;

        let new_state = self.model.tick(&inner.state)?;
        let finished = self.model.is_over(&inner.state, &new_state);
        let statistics = self.model.statistics(&new_state);

        inner.tick = inner.tick + 1;
        let output = SimOutput::capture(inner.tick, &new_state, finished, statistics);
        inner.state = new_state;
        if finished {
            inner.status = RunState::Finished;
            debug!(tick = %inner.tick, "simulation finished");
        }
        Ok(Some(output))
    }

    // ── Introspection ─────────────────────────────────────────────────────

    /// Read-only access to the live state and counters under the lock.
    ///
    /// Used by persistence to capture a consistent picture; keep `f` short,
    /// the lock blocks run-control calls while it runs.
    pub fn inspect<R>(&self, f: impl FnOnce(&GridState, RunState, Tick) -> R) -> R {
        let inner = self.lock_inner();
        f(&inner.state, inner.status, inner.tick)
    }

    fn lock_inner(&self) -> std::sync::MutexGuard<'_, SimInner> {
        // A panic mid-tick poisons the mutex; the stored state is still the
        // last consistently installed one, so recover rather than propagate.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ── CalcGuard ─────────────────────────────────────────────────────────────────

/// RAII holder of the `calculating` flag.
struct CalcGuard<'a>(&'a AtomicBool);

impl<'a> CalcGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> SimResult<Self> {
        flag.compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .map_err(|_| SimError::AlreadyCalculating)?;
        Ok(CalcGuard(flag))
    }
}

impl Drop for CalcGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
