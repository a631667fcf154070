//! Unit tests for the scheduler: registry, passes, subscribers, ticker,
//! sessions, and persistence.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam_channel::unbounded;

use gs_core::{Position, SessionId, Tick};
use gs_grid::{Agent, GridResult, GridState};
use gs_model::{AgentBuilder, AgentFactory, Model, ModelBuilder, ModelResult};
use gs_param::{ParamKind, Parameter};
use gs_sim::{RunState, Simulation};

use crate::config::{TickMode, TickSettings};
use crate::controller::SimulationsController;
use crate::persist::{load_simulation, save_simulation};
use crate::session::SessionBuilder;
use crate::ticker::Ticker;
use crate::SchedError;

// ── Helpers ───────────────────────────────────────────────────────────────────

fn p(x: i32, y: i32) -> Position {
    Position::new(x, y)
}

fn sid(id: &str) -> SessionId {
    SessionId::new(id)
}

fn walker_agent() -> Agent {
    AgentBuilder::new("w")
        .param(Parameter::optional("steps", ParamKind::Int))
        .strategy(|state: &mut GridState, pos: Position| -> GridResult<()> {
            let w = state.width() as i32;
            let h = state.height() as i32;
            let next = p((pos.x + 1) % w, (pos.y + 1) % h);
            state.move_agent(pos, next)?;
            if let Some(agent) = state.agent_at_mut(next) {
                let steps = agent.params().int("steps").unwrap_or(0);
                agent.set_parameter("steps", steps + 1).unwrap();
            }
            Ok(())
        })
        .build()
        .unwrap()
}

/// A model whose single agent sleeps in its strategy, keeping its tick in
/// flight for `sleep_ms`.
fn slow_model(sleep_ms: u64) -> Model {
    ModelBuilder::new()
        .init_fn(move |_| {
            let mut state = GridState::new(2, 2);
            let sleeper = AgentBuilder::new("s")
                .strategy(move |_: &mut GridState, _: Position| -> GridResult<()> {
                    std::thread::sleep(Duration::from_millis(sleep_ms));
                    Ok(())
                })
                .build()?;
            state.add_agent(p(0, 0), sleeper)?;
            Ok(state)
        })
        .exit_fn(|_, _| false)
        .build()
        .unwrap()
}

/// A model whose single agent violates the grid bounds on every tick.
fn failing_model() -> Model {
    ModelBuilder::new()
        .init_fn(|_| {
            let mut state = GridState::new(2, 2);
            let clumsy = AgentBuilder::new("c")
                .strategy(|state: &mut GridState, pos: Position| -> GridResult<()> {
                    state.move_agent(pos, p(-1, -1))
                })
                .build()?;
            state.add_agent(p(0, 0), clumsy)?;
            Ok(state)
        })
        .exit_fn(|_, _| false)
        .build()
        .unwrap()
}

/// A 5×5 model with one diagonal walker; never exits.
fn walker_model() -> Model {
    let mut model = ModelBuilder::new()
        .param(Parameter::required("size", ParamKind::Int))
        .init_fn(|params| {
            let size = params.require_int("size")? as u32;
            let mut state = GridState::new(size, size);
            state.add_agent(p(0, 0), walker_agent())?;
            Ok(state)
        })
        .exit_fn(|_, _| false)
        .build()
        .unwrap();
    model.set_parameter("size", 5i64).unwrap();
    model
}

fn walker_sim() -> Simulation {
    Simulation::new_initialized(walker_model()).unwrap()
}

/// Controller with a registered, running walker whose tick rate fires on
/// every pass of the given settings.
fn controller_with_running(id: &SessionId, settings: TickSettings) -> Arc<SimulationsController> {
    let controller = Arc::new(SimulationsController::with_settings(settings));
    let sim = controller.add_simulation(id.clone(), walker_sim()).unwrap();
    sim.set_tick_rate_ms(1);
    sim.start().unwrap();
    controller
}

// ── Registry ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod registry {
    use super::*;

    #[test]
    fn add_then_lookup_then_remove() {
        let controller = SimulationsController::new();
        let id = sid("alpha");

        controller.add_simulation(id.clone(), walker_sim()).unwrap();
        assert_eq!(controller.session_ids(), vec![id.clone()]);
        assert!(controller.simulation(&id).is_ok());

        controller.remove_simulation(&id).unwrap();
        assert!(controller.session_ids().is_empty());
        assert!(matches!(
            controller.simulation(&id),
            Err(SchedError::UnknownSession(_))
        ));
    }

    #[test]
    fn duplicate_session_id_is_rejected() {
        let controller = SimulationsController::new();
        let id = sid("alpha");
        controller.add_simulation(id.clone(), walker_sim()).unwrap();
        assert!(matches!(
            controller.add_simulation(id, walker_sim()),
            Err(SchedError::DuplicateSession(_))
        ));
    }

    #[test]
    fn remove_unknown_session_errors() {
        let controller = SimulationsController::new();
        assert!(matches!(
            controller.remove_simulation(&sid("ghost")),
            Err(SchedError::UnknownSession(_))
        ));
    }

    #[test]
    fn removed_simulation_survives_via_returned_handle() {
        let controller = SimulationsController::new();
        let id = sid("alpha");
        controller.add_simulation(id.clone(), walker_sim()).unwrap();

        let handle = controller.remove_simulation(&id).unwrap();
        // Still usable for a final save or inspection.
        handle.inspect(|state, status, tick| {
            assert_eq!(state.agent_count(), 1);
            assert_eq!(status, RunState::Idle);
            assert_eq!(tick, Tick::ZERO);
        });
    }

    #[test]
    fn run_control_by_session_id() {
        let controller = SimulationsController::new();
        let id = sid("alpha");
        controller.add_simulation(id.clone(), walker_sim()).unwrap();

        controller.start_simulation(&id).unwrap();
        assert!(controller.simulation(&id).unwrap().is_running());
        controller.pause_simulation(&id).unwrap();
        assert_eq!(controller.simulation(&id).unwrap().status(), RunState::Paused);

        assert!(matches!(
            controller.start_simulation(&sid("ghost")),
            Err(SchedError::UnknownSession(_))
        ));
        // Simulation-level errors pass through.
        controller.start_simulation(&id).unwrap();
        assert!(matches!(
            controller.start_simulation(&id),
            Err(SchedError::Sim(_))
        ));
    }
}

// ── Scheduler passes ──────────────────────────────────────────────────────────

#[cfg(test)]
mod passes {
    use super::*;

    #[test]
    fn pass_forwards_snapshot_to_subscriber() {
        let id = sid("alpha");
        let controller = controller_with_running(&id, TickSettings::default());
        let (tx, rx) = unbounded();
        controller.subscribe(&id, tx).unwrap();

        controller.make_models_tick();

        let output = rx.try_recv().unwrap();
        assert_eq!(output.tick, Tick(1));
        assert_eq!(output.kind_at(p(1, 1)), Some("w"));
    }

    #[test]
    fn paused_simulations_are_skipped() {
        let id = sid("alpha");
        let controller = controller_with_running(&id, TickSettings::default());
        let (tx, rx) = unbounded();
        controller.subscribe(&id, tx).unwrap();

        controller.pause_simulation(&id).unwrap();
        controller.make_models_tick();

        assert!(rx.try_recv().is_err());
        controller.simulation(&id).unwrap().inspect(|_, _, tick| {
            assert_eq!(tick, Tick::ZERO);
        });
    }

    #[test]
    fn throttled_simulation_fires_every_second_pass() {
        let id = sid("alpha");
        let controller = controller_with_running(&id, TickSettings::new(10, TickMode::Synchronous));
        controller.simulation(&id).unwrap().set_tick_rate_ms(20);
        let (tx, rx) = unbounded();
        controller.subscribe(&id, tx).unwrap();

        for _ in 0..4 {
            controller.make_models_tick();
        }
        let ticks: Vec<Tick> = rx.try_iter().map(|o| o.tick).collect();
        assert_eq!(ticks, vec![Tick(1), Tick(2)]);
    }

    #[test]
    fn concurrent_mode_ticks_every_running_simulation() {
        let settings = TickSettings::new(10, TickMode::Concurrent);
        let controller = SimulationsController::with_settings(settings);
        let (tx_a, rx_a) = unbounded();
        let (tx_b, rx_b) = unbounded();
        for (name, tx) in [("alpha", tx_a), ("beta", tx_b)] {
            let id = sid(name);
            let sim = controller.add_simulation(id.clone(), walker_sim()).unwrap();
            sim.set_tick_rate_ms(1);
            sim.start().unwrap();
            controller.subscribe(&id, tx).unwrap();
        }

        controller.make_models_tick();

        // Detached tasks: the snapshots arrive asynchronously.
        let a = rx_a.recv_timeout(Duration::from_secs(2)).unwrap();
        let b = rx_b.recv_timeout(Duration::from_secs(2)).unwrap();
        assert_eq!(a.tick, Tick(1));
        assert_eq!(b.tick, Tick(1));
    }

    #[test]
    fn concurrent_pass_returns_before_slow_tick_completes() {
        let settings = TickSettings::new(10, TickMode::Concurrent);
        let controller = SimulationsController::with_settings(settings);

        let slow_id = sid("slow");
        let slow = Simulation::new_initialized(slow_model(400)).unwrap();
        slow.set_tick_rate_ms(1);
        let slow = controller.add_simulation(slow_id.clone(), slow).unwrap();
        slow.start().unwrap();
        let (slow_tx, slow_rx) = unbounded();
        controller.subscribe(&slow_id, slow_tx).unwrap();

        let fast_id = sid("fast");
        let fast = controller.add_simulation(fast_id.clone(), walker_sim()).unwrap();
        fast.set_tick_rate_ms(1);
        fast.start().unwrap();
        let (fast_tx, fast_rx) = unbounded();
        controller.subscribe(&fast_id, fast_tx).unwrap();

        // The pass dispatches and returns; it never waits on the 400 ms
        // tick.
        let t0 = Instant::now();
        controller.make_models_tick();
        assert!(
            t0.elapsed() < Duration::from_millis(200),
            "pass blocked for {:?}",
            t0.elapsed()
        );

        // The fast simulation's snapshot arrives well before the slow
        // tick finishes; the slow one follows on its own schedule.
        let fast_out = fast_rx.recv_timeout(Duration::from_millis(300)).unwrap();
        assert_eq!(fast_out.tick, Tick(1));
        let slow_out = slow_rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert_eq!(slow_out.tick, Tick(1));
    }

    #[test]
    fn in_flight_tick_is_skipped_not_queued() {
        let settings = TickSettings::new(10, TickMode::Concurrent);
        let controller = SimulationsController::with_settings(settings);
        let id = sid("slow");
        let sim = Simulation::new_initialized(slow_model(300)).unwrap();
        sim.set_tick_rate_ms(1);
        let sim = controller.add_simulation(id.clone(), sim).unwrap();
        sim.start().unwrap();
        let (tx, rx) = unbounded();
        controller.subscribe(&id, tx).unwrap();

        controller.make_models_tick();
        // Give the first tick time to enter the strategy sleep, then offer
        // a second pass while it is still in flight.
        std::thread::sleep(Duration::from_millis(50));
        controller.make_models_tick();

        // Exactly one snapshot: the overlapping pass was rejected by the
        // guard, not queued behind the first.
        let first = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert_eq!(first.tick, Tick(1));
        assert!(rx.recv_timeout(Duration::from_millis(500)).is_err());

        // Once the tick is no longer in flight, passes are accepted again.
        controller.make_models_tick();
        let second = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert_eq!(second.tick, Tick(2));
    }

    #[test]
    fn failing_simulation_does_not_disturb_the_pass_or_siblings() {
        let id_bad = sid("bad");
        let id_good = sid("good");
        let controller = SimulationsController::with_settings(TickSettings::default());

        let bad = Simulation::new_initialized(failing_model()).unwrap();
        bad.set_tick_rate_ms(1);
        let bad = controller.add_simulation(id_bad.clone(), bad).unwrap();
        bad.start().unwrap();
        let (bad_tx, bad_rx) = unbounded();
        controller.subscribe(&id_bad, bad_tx).unwrap();

        let good = controller.add_simulation(id_good.clone(), walker_sim()).unwrap();
        good.set_tick_rate_ms(1);
        good.start().unwrap();
        let (good_tx, good_rx) = unbounded();
        controller.subscribe(&id_good, good_tx).unwrap();

        // Two passes: each tick of the bad simulation fails, each tick of
        // the good one succeeds, and the pass never unwinds.
        controller.make_models_tick();
        controller.make_models_tick();

        let ticks: Vec<Tick> = good_rx.try_iter().map(|o| o.tick).collect();
        assert_eq!(ticks, vec![Tick(1), Tick(2)]);
        assert!(bad_rx.try_recv().is_err());

        // The failing simulation stays registered and running for a front
        // end to inspect or remove.
        assert!(controller.simulation(&id_bad).unwrap().is_running());
        bad.inspect(|_, _, tick| assert_eq!(tick, Tick::ZERO));
    }

    #[test]
    fn mode_switch_applies_on_next_pass() {
        let id = sid("alpha");
        let controller = controller_with_running(&id, TickSettings::default());
        let (tx, rx) = unbounded();
        controller.subscribe(&id, tx).unwrap();

        controller.settings().set_mode(TickMode::Concurrent);
        controller.make_models_tick();
        let out = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert_eq!(out.tick, Tick(1));
    }
}

// ── Subscribers ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod subscribers {
    use super::*;

    #[test]
    fn subscribe_to_unknown_session_errors() {
        let controller = SimulationsController::new();
        let (tx, _rx) = unbounded();
        assert!(matches!(
            controller.subscribe(&sid("ghost"), tx),
            Err(SchedError::UnknownSession(_))
        ));
    }

    #[test]
    fn later_subscriber_replaces_earlier() {
        let id = sid("alpha");
        let controller = controller_with_running(&id, TickSettings::default());

        let (tx_old, rx_old) = unbounded();
        let (tx_new, rx_new) = unbounded();
        controller.subscribe(&id, tx_old).unwrap();
        controller.subscribe(&id, tx_new).unwrap();

        controller.make_models_tick();

        assert!(rx_old.try_recv().is_err());
        assert!(rx_new.try_recv().is_ok());
    }

    #[test]
    fn disconnected_subscriber_is_dropped_silently() {
        let id = sid("alpha");
        let controller = controller_with_running(&id, TickSettings::default());

        let (tx, rx) = unbounded();
        controller.subscribe(&id, tx).unwrap();
        drop(rx);

        // No panic, snapshot dropped, registration cleaned up.
        controller.make_models_tick();
        assert!(!controller.is_subscribed(&id));

        // The simulation kept ticking regardless.
        controller.simulation(&id).unwrap().inspect(|_, _, tick| {
            assert_eq!(tick, Tick(1));
        });
    }

    #[test]
    fn unsubscribe_stops_delivery_but_not_the_simulation() {
        let id = sid("alpha");
        let controller = controller_with_running(&id, TickSettings::default());
        let (tx, rx) = unbounded();
        controller.subscribe(&id, tx).unwrap();

        controller.make_models_tick();
        controller.unsubscribe(&id);
        controller.make_models_tick();

        assert_eq!(rx.try_iter().count(), 1);
        controller.simulation(&id).unwrap().inspect(|_, _, tick| {
            assert_eq!(tick, Tick(2));
        });
    }

    #[test]
    fn remove_simulation_drops_its_subscriber() {
        let id = sid("alpha");
        let controller = controller_with_running(&id, TickSettings::default());
        let (tx, _rx) = unbounded();
        controller.subscribe(&id, tx).unwrap();

        controller.remove_simulation(&id).unwrap();
        assert!(!controller.is_subscribed(&id));
    }
}

// ── Ticker ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod ticker {
    use super::*;

    #[test]
    fn ticker_drives_passes_until_stopped() {
        let id = sid("alpha");
        let controller = controller_with_running(&id, TickSettings::new(5, TickMode::Synchronous));
        let (tx, rx) = unbounded();
        controller.subscribe(&id, tx).unwrap();

        let ticker = Ticker::spawn(Arc::clone(&controller));
        let first = rx.recv_timeout(Duration::from_millis(500)).unwrap();
        assert_eq!(first.tick, Tick(1));
        ticker.stop();

        // Drain anything in flight; after stop, no further passes arrive.
        while rx.try_recv().is_ok() {}
        std::thread::sleep(Duration::from_millis(30));
        assert!(rx.try_recv().is_err());
    }
}

// ── Sessions ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod sessions {
    use super::*;

    fn unconfigured_builder() -> SessionBuilder {
        let model = ModelBuilder::new()
            .param(Parameter::required("size", ParamKind::Int))
            .param(Parameter::required("density", ParamKind::Float))
            .init_fn(|params| {
                let size = params.require_int("size")? as u32;
                Ok(GridState::new(size, size))
            })
            .exit_fn(|_, _| false)
            .build()
            .unwrap();
        SessionBuilder::new(model)
    }

    #[test]
    fn launch_requires_every_required_parameter() {
        let controller = SimulationsController::new();
        let mut builder = unconfigured_builder();
        builder.set_parameter("size", 8i64).unwrap();

        assert!(!builder.is_ready());
        assert_eq!(builder.missing_parameters(), vec!["density"]);
        assert!(matches!(
            builder.launch(&controller, sid("alpha")),
            Err(SchedError::Sim(_))
        ));
        // Nothing was registered.
        assert!(controller.session_ids().is_empty());
    }

    #[test]
    fn rejected_parameter_leaves_siblings_intact() {
        let mut builder = unconfigured_builder();
        builder.set_parameter("size", 8i64).unwrap();

        assert!(builder.set_parameter("size", "big").is_err());
        assert!(builder.set_parameter("shape", 1i64).is_err());
        assert_eq!(builder.params().int("size"), Some(8));
    }

    #[test]
    fn launch_registers_an_idle_simulation() {
        let controller = SimulationsController::new();
        let mut builder = unconfigured_builder();
        builder.set_parameter("size", 8i64).unwrap();
        builder.set_parameter("density", 0.5f64).unwrap();
        assert!(builder.is_ready());

        let sim = builder.launch(&controller, sid("alpha")).unwrap();
        assert_eq!(sim.status(), RunState::Idle);
        assert_eq!(controller.session_ids(), vec![sid("alpha")]);
        sim.inspect(|state, _, _| assert_eq!((state.width(), state.height()), (8, 8)));
    }
}

// ── Persistence ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod persistence {
    use super::*;

    struct WalkerFactory;

    impl AgentFactory for WalkerFactory {
        fn create_agent(&self) -> ModelResult<Agent> {
            Ok(walker_agent())
        }
    }

    fn factories() -> HashMap<String, Box<dyn AgentFactory>> {
        let mut map: HashMap<String, Box<dyn AgentFactory>> = HashMap::new();
        map.insert("w".to_owned(), Box::new(WalkerFactory));
        map
    }

    #[test]
    fn save_load_roundtrip_restores_state_tick_and_params() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("alpha.json");

        let sim = walker_sim();
        sim.set_tick_rate_ms(75);
        sim.start().unwrap();
        // Two real ticks: walker ends at (2,2) with steps == 2.
        for _ in 0..2 {
            sim.tick(100).unwrap();
        }
        sim.pause().unwrap();
        save_simulation(&sim, &path).unwrap();

        let loaded = load_simulation(&path, walker_model(), &factories()).unwrap();
        assert_eq!(loaded.status(), RunState::Idle);
        assert_eq!(loaded.tick_rate_ms(), 75);
        loaded.inspect(|state, _, tick| {
            assert_eq!(tick, Tick(2));
            assert_eq!((state.width(), state.height()), (5, 5));
            let agent = state.agent_at(p(2, 2)).unwrap();
            assert_eq!(agent.kind(), "w");
            assert_eq!(agent.params().int("steps"), Some(2));
        });

        // A resumed simulation picks up where it left off.
        loaded.start().unwrap();
        let out = loaded.tick(100).unwrap().unwrap();
        assert_eq!(out.tick, Tick(3));
        assert_eq!(out.kind_at(p(3, 3)), Some("w"));
    }

    #[test]
    fn load_rejects_unknown_agent_kind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("alpha.json");

        let sim = walker_sim();
        save_simulation(&sim, &path).unwrap();

        assert!(matches!(
            load_simulation(&path, walker_model(), &HashMap::new()),
            Err(SchedError::UnknownKind(kind)) if kind == "w"
        ));
    }

    #[test]
    fn load_rejects_unsupported_version() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("alpha.json");

        let sim = walker_sim();
        save_simulation(&sim, &path).unwrap();
        let bumped = std::fs::read_to_string(&path)
            .unwrap()
            .replacen("\"version\": 1", "\"version\": 99", 1);
        std::fs::write(&path, bumped).unwrap();

        assert!(matches!(
            load_simulation(&path, walker_model(), &factories()),
            Err(SchedError::UnsupportedVersion(99))
        ));
    }

    #[test]
    fn malformed_document_is_a_format_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            load_simulation(&path, walker_model(), &factories()),
            Err(SchedError::Format(_))
        ));
    }
}
