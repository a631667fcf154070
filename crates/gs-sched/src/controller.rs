//! `SimulationsController` — the registry of active simulations and their
//! subscribers, and the per-pass fan-out logic.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crossbeam_channel::Sender;
use tracing::{debug, trace, warn};

use gs_core::SessionId;
use gs_sim::{SimError, SimOutput, Simulation};

use crate::config::{TickMode, TickSettings};
use crate::{SchedError, SchedResult};

/// The per-session output consumer: a channel sender.
///
/// Unsubscribing — or simply dropping the receiving end — makes the
/// scheduler drop that session's snapshots on the floor; a closed channel
/// is never an error.
pub type Subscriber = Sender<SimOutput>;

type SubscriberMap = Arc<Mutex<HashMap<SessionId, Subscriber>>>;

/// Registry and dispatcher for all active simulations.
///
/// Explicitly constructed and shared by handle (`Arc`); the periodic driver
/// that calls [`make_models_tick`][Self::make_models_tick] is a separate,
/// owned [`Ticker`][crate::Ticker].
///
/// # Shared state
///
/// The simulation and subscriber registries are the only state shared
/// between the ticker thread, detached tick tasks, and session-management
/// callers; both sit behind their own mutex, and no lock is held while a
/// simulation ticks or a snapshot is sent.
pub struct SimulationsController {
    settings:    TickSettings,
    simulations: Mutex<HashMap<SessionId, Arc<Simulation>>>,
    /// Behind an `Arc` so detached concurrent-mode tasks can forward (and
    /// unregister disconnected subscribers) after the pass has returned.
    subscribers: SubscriberMap,
}

impl SimulationsController {
    pub fn new() -> Self {
        Self::with_settings(TickSettings::default())
    }

    pub fn with_settings(settings: TickSettings) -> Self {
        Self {
            settings,
            simulations: Mutex::new(HashMap::new()),
            subscribers: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// The live, hot-reloadable tick settings.
    pub fn settings(&self) -> &TickSettings {
        &self.settings
    }

    // ── Registry ──────────────────────────────────────────────────────────

    /// Register a simulation under `id`, returning the shared handle.
    pub fn add_simulation(
        &self,
        id: SessionId,
        simulation: Simulation,
    ) -> SchedResult<Arc<Simulation>> {
        let mut sims = lock(&self.simulations);
        if sims.contains_key(&id) {
            return Err(SchedError::DuplicateSession(id));
        }
        let handle = Arc::new(simulation);
        sims.insert(id.clone(), Arc::clone(&handle));
        debug!(session = %id, "simulation registered");
        Ok(handle)
    }

    /// Drop the session: the simulation leaves the registry (callers may
    /// persist it first via the returned handle) and its subscriber — if
    /// any — is unregistered.
    pub fn remove_simulation(&self, id: &SessionId) -> SchedResult<Arc<Simulation>> {
        let removed = lock(&self.simulations)
            .remove(id)
            .ok_or_else(|| SchedError::UnknownSession(id.clone()))?;
        lock(&self.subscribers).remove(id);
        debug!(session = %id, "simulation removed");
        Ok(removed)
    }

    /// Shared handle to the simulation registered under `id`.
    pub fn simulation(&self, id: &SessionId) -> SchedResult<Arc<Simulation>> {
        lock(&self.simulations)
            .get(id)
            .cloned()
            .ok_or_else(|| SchedError::UnknownSession(id.clone()))
    }

    pub fn session_ids(&self) -> Vec<SessionId> {
        lock(&self.simulations).keys().cloned().collect()
    }

    // ── Run control (session-id flavored) ─────────────────────────────────

    /// Start the session's simulation.  Errors if the session is unknown or
    /// the simulation is already running/finished — not an idempotent no-op.
    pub fn start_simulation(&self, id: &SessionId) -> SchedResult<()> {
        self.simulation(id)?.start()?;
        Ok(())
    }

    /// Pause the session's simulation.  Errors if the session is unknown or
    /// the simulation is not running.
    pub fn pause_simulation(&self, id: &SessionId) -> SchedResult<()> {
        self.simulation(id)?.pause()?;
        Ok(())
    }

    // ── Subscribers ───────────────────────────────────────────────────────

    /// Register `subscriber` as the single output consumer for `id`.  A
    /// later subscribe for the same session replaces the previous one
    /// (last writer wins).
    pub fn subscribe(&self, id: &SessionId, subscriber: Subscriber) -> SchedResult<()> {
        // Existence check so a typo'd session id fails loudly instead of
        // silently never delivering.
        if !lock(&self.simulations).contains_key(id) {
            return Err(SchedError::UnknownSession(id.clone()));
        }
        lock(&self.subscribers).insert(id.clone(), subscriber);
        Ok(())
    }

    pub fn unsubscribe(&self, id: &SessionId) {
        lock(&self.subscribers).remove(id);
    }

    pub fn is_subscribed(&self, id: &SessionId) -> bool {
        lock(&self.subscribers).contains_key(id)
    }

    // ── The scheduler pass ────────────────────────────────────────────────

    /// Advance every running simulation by one scheduler pass.
    ///
    /// Invoked by the [`Ticker`][crate::Ticker] on the global base period.
    /// The registry lock is released before any simulation ticks; settings
    /// are re-read each pass, so base-period and mode changes apply
    /// immediately.
    ///
    /// In `Concurrent` mode each simulation ticks in a detached task on
    /// rayon's pool and this call returns without waiting for any of them:
    /// a slow tick delays only its own session's next snapshot.  A tick
    /// still in flight when the next pass comes around is skipped by the
    /// simulation's own guard, never queued behind.
    pub fn make_models_tick(&self) {
        let base = self.settings.base_period_ms();

        let running: Vec<(SessionId, Arc<Simulation>)> = lock(&self.simulations)
            .iter()
            .filter(|(_, sim)| sim.is_running())
            .map(|(id, sim)| (id.clone(), Arc::clone(sim)))
            .collect();

        match self.settings.mode() {
            TickMode::Synchronous => {
                for (id, sim) in &running {
                    tick_session(id, sim, base, &self.subscribers);
                }
            }
            TickMode::Concurrent => {
                for (id, sim) in running {
                    let subscribers = Arc::clone(&self.subscribers);
                    rayon::spawn(move || tick_session(&id, &sim, base, &subscribers));
                }
            }
        }
    }
}

impl Default for SimulationsController {
    fn default() -> Self {
        Self::new()
    }
}

/// Tick one simulation and forward its snapshot, mapping each outcome per
/// the error taxonomy: "not due" is normal, a still-in-flight tick is
/// skipped, and a model failure is fatal to this simulation's tick only —
/// never to the pass or to sibling simulations.
fn tick_session(id: &SessionId, sim: &Simulation, base_period_ms: u64, subscribers: &SubscriberMap) {
    match sim.tick(base_period_ms) {
        Ok(Some(output)) => forward(id, output, subscribers),
        Ok(None) => {}
        Err(SimError::AlreadyCalculating) => {
            trace!(session = %id, "tick still in flight, skipping pass");
        }
        Err(error) => {
            warn!(session = %id, %error, "simulation tick failed");
        }
    }
}

/// Send `output` to the session's subscriber, if one is registered and
/// still connected.  A disconnected channel drops the snapshot and the
/// registration.
fn forward(id: &SessionId, output: SimOutput, subscribers: &SubscriberMap) {
    let subscriber = match lock(subscribers).get(id) {
        Some(s) => s.clone(),
        None => return,
    };
    // Send outside the lock: an unbounded channel never blocks, but a
    // bounded subscriber must not stall unrelated sessions' bookkeeping.
    if subscriber.send(output).is_err() {
        debug!(session = %id, "subscriber disconnected, dropping registration");
        lock(subscribers).remove(id);
    }
}

/// Lock a registry mutex, recovering from poisoning — registry contents are
/// plain maps, consistent after any panic in another thread.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
