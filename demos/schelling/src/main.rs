//! schelling — Schelling segregation demo for the gridsim framework.
//!
//! Two kinds of settlers share a grid; a settler whose same-kind neighbor
//! fraction falls below its threshold relocates to a random free cell.
//! The run exits once a whole tick passes with nobody moving.
//!
//! Everything runs through the scheduler stack: a `SessionBuilder`
//! configures the model, a `SimulationsController` plus `Ticker` drive it,
//! and the console consumes snapshots off a subscriber channel.  The final
//! state is saved to JSON on the way out.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use anyhow::Result;
use crossbeam_channel::unbounded;
use tracing::info;
use tracing_subscriber::EnvFilter;

use gs_core::{Position, SessionId, SimRng};
use gs_grid::{Agent, GridResult, GridState, TickStrategy};
use gs_model::{AgentBuilder, AgentFactory, Model, ModelBuilder, ModelFactory, ModelResult};
use gs_param::{Domain, ParamKind, Parameter};
use gs_sched::{
    load_simulation, save_simulation, SessionBuilder, SimulationsController, TickMode,
    TickSettings, Ticker,
};
use gs_sim::SimOutput;

// ── Constants ─────────────────────────────────────────────────────────────────

const GRID_SIZE:      i64 = 24;
const DENSITY:        f64 = 0.85; // occupied fraction of cells
const THRESHOLD:      f64 = 0.55; // minimum same-kind neighbor fraction
const SEED:           i64 = 42;
const BASE_PERIOD_MS: u64 = 20;
const TICK_RATE_MS:   u64 = 40;   // one real tick per two scheduler passes
const MAX_TICKS:      u64 = 400;
const RENDER_EVERY:   u64 = 25;

const KIND_RED:  &str = "red";
const KIND_BLUE: &str = "blue";

// ── Behavior ──────────────────────────────────────────────────────────────────

/// Same-kind fraction among occupied neighbors at Chebyshev radius 1.
/// A settler with no neighbors counts as satisfied.
fn is_satisfied(state: &GridState, pos: Position, kind: &str, threshold: f64) -> bool {
    let mut same = 0usize;
    let mut other = 0usize;
    for (neighbor, agent) in state.agents_within(pos, 1) {
        if neighbor == pos {
            continue;
        }
        if agent.kind() == kind {
            same += 1;
        } else {
            other += 1;
        }
    }
    let total = same + other;
    total == 0 || same as f64 / total as f64 >= threshold
}

fn free_cells(state: &GridState) -> Vec<Position> {
    let mut free = Vec::new();
    for y in 0..state.height() as i32 {
        for x in 0..state.width() as i32 {
            let pos = Position::new(x, y);
            if state.is_free(pos) {
                free.push(pos);
            }
        }
    }
    free
}

/// One strategy instance shared by the whole population; relocation targets
/// come from a seeded RNG so runs replay identically.
fn settler_strategy(rng: Arc<Mutex<SimRng>>) -> Arc<dyn TickStrategy> {
    Arc::new(move |state: &mut GridState, pos: Position| -> GridResult<()> {
        let (kind, threshold) = match state.agent_at(pos) {
            Some(agent) => (
                agent.kind().to_owned(),
                agent.params().float("threshold").unwrap_or(THRESHOLD),
            ),
            None => return Ok(()),
        };
        if is_satisfied(state, pos, &kind, threshold) {
            return Ok(());
        }
        let free = free_cells(state);
        let mut rng = rng.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(target) = rng.pick(&free).copied() {
            state.move_agent(pos, target)?;
        }
        Ok(())
    })
}

// ── Factories ─────────────────────────────────────────────────────────────────

/// Builds settlers of one kind; also used to rebuild them from a saved run.
struct SettlerFactory {
    kind:     &'static str,
    strategy: Arc<dyn TickStrategy>,
}

impl AgentFactory for SettlerFactory {
    fn create_agent(&self) -> ModelResult<Agent> {
        Ok(AgentBuilder::new(self.kind)
            .param(
                Parameter::optional("threshold", ParamKind::Float)
                    .with_domain(Domain::float_range(0.0..=1.0))
                    .with_value(THRESHOLD)?,
            )
            .shared_strategy(Arc::clone(&self.strategy))
            .build()?)
    }
}

struct SegregationFactory {
    strategy: Arc<dyn TickStrategy>,
}

impl SegregationFactory {
    fn new(relocation_seed: u64) -> Self {
        let rng = Arc::new(Mutex::new(SimRng::new(relocation_seed)));
        Self { strategy: settler_strategy(rng) }
    }

    fn agent_factories(&self) -> HashMap<String, Box<dyn AgentFactory>> {
        let mut map: HashMap<String, Box<dyn AgentFactory>> = HashMap::new();
        for kind in [KIND_RED, KIND_BLUE] {
            map.insert(
                kind.to_owned(),
                Box::new(SettlerFactory { kind, strategy: Arc::clone(&self.strategy) }),
            );
        }
        map
    }
}

impl ModelFactory for SegregationFactory {
    fn create_model(&self) -> ModelResult<Model> {
        let strategy = Arc::clone(&self.strategy);
        ModelBuilder::new()
            .param(
                Parameter::required("size", ParamKind::Int)
                    .with_domain(Domain::int_range(2..=512)),
            )
            .param(
                Parameter::required("density", ParamKind::Float)
                    .with_domain(Domain::float_range(0.05..=0.95)),
            )
            .param(
                Parameter::required("threshold", ParamKind::Float)
                    .with_domain(Domain::float_range(0.0..=1.0)),
            )
            .param(Parameter::required("seed", ParamKind::Int))
            .init_fn(move |params| {
                let size = params.require_int("size")? as u32;
                let density = params.require_float("density")?;
                let threshold = params.require_float("threshold")?;
                let seed = params.require_int("seed")? as u64;

                let mut state = GridState::new(size, size);
                let mut rng = SimRng::new(seed);
                let population = (size as f64 * size as f64 * density) as usize;
                for i in 0..population {
                    let kind = if i % 2 == 0 { KIND_RED } else { KIND_BLUE };
                    let settler = AgentBuilder::new(kind)
                        .param(
                            Parameter::optional("threshold", ParamKind::Float)
                                .with_domain(Domain::float_range(0.0..=1.0))
                                .with_value(threshold)?,
                        )
                        .shared_strategy(Arc::clone(&strategy))
                        .build()?;
                    // Rejection-sample a free cell; density ≤ 0.95 keeps
                    // this cheap.
                    loop {
                        let pos = Position::new(
                            rng.gen_range(0..size as i32),
                            rng.gen_range(0..size as i32),
                        );
                        if state.is_free(pos) {
                            state.add_agent(pos, settler)?;
                            break;
                        }
                    }
                }
                Ok(state)
            })
            .exit_fn(|old, new| layout(old) == layout(new))
            .statistics_fn(|state| {
                let mut satisfied = 0usize;
                let mut total = 0usize;
                for (pos, agent) in state.agents() {
                    total += 1;
                    let t = agent.params().float("threshold").unwrap_or(THRESHOLD);
                    if is_satisfied(state, pos, agent.kind(), t) {
                        satisfied += 1;
                    }
                }
                let pct = if total == 0 {
                    100.0
                } else {
                    100.0 * satisfied as f64 / total as f64
                };
                vec![
                    ("settlers".to_owned(), total.to_string()),
                    ("satisfied".to_owned(), format!("{satisfied} ({pct:.1}%)")),
                ]
            })
            .build()
    }
}

/// Position/kind layout used by the exit predicate: the run is over when a
/// tick changes nothing.
fn layout(state: &GridState) -> Vec<(Position, String)> {
    state
        .agents()
        .into_iter()
        .map(|(pos, agent)| (pos, agent.kind().to_owned()))
        .collect()
}

// ── Console rendering ─────────────────────────────────────────────────────────

fn render(output: &SimOutput) {
    for y in 0..output.height as i32 {
        let row: String = (0..output.width as i32)
            .map(|x| match output.kind_at(Position::new(x, y)) {
                Some(KIND_RED) => '#',
                Some(KIND_BLUE) => 'o',
                Some(_) => '?',
                None => '.',
            })
            .collect();
        println!("  {row}");
    }
}

fn stats_line(output: &SimOutput) -> String {
    output
        .statistics
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("  ")
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== schelling — gridsim demo ===");
    println!("Grid: {GRID_SIZE}×{GRID_SIZE}  |  Density: {DENSITY}  |  Threshold: {THRESHOLD}  |  Seed: {SEED}");
    println!();

    // 1. Configure the session through the builder (each value validated
    //    against its declared domain as it lands).
    let factory = SegregationFactory::new(SEED as u64 ^ 0xdead_beef);
    let mut session = SessionBuilder::from_factory(&factory)?;
    session.set_parameter("size", GRID_SIZE)?;
    session.set_parameter("density", DENSITY)?;
    session.set_parameter("threshold", THRESHOLD)?;
    session.set_parameter("seed", SEED)?;

    // 2. Launch into a controller and wire up a subscriber.
    let controller = Arc::new(SimulationsController::with_settings(TickSettings::new(
        BASE_PERIOD_MS,
        TickMode::Concurrent,
    )));
    let id = SessionId::new("schelling-demo");
    let simulation = session.launch(&controller, id.clone())?;
    simulation.set_tick_rate_ms(TICK_RATE_MS);

    let (tx, rx) = unbounded();
    controller.subscribe(&id, tx)?;
    controller.start_simulation(&id)?;

    // 3. One global ticker drives the whole controller.
    let ticker = Ticker::spawn(Arc::clone(&controller));
    let t0 = Instant::now();

    // 4. Consume snapshots until the run settles (or hits the tick cap).
    let mut last: Option<SimOutput> = None;
    loop {
        let output = rx.recv_timeout(Duration::from_secs(5))?;
        if output.tick.0 % RENDER_EVERY == 0 || output.finished {
            println!("tick {:>4}  {}", output.tick.0, stats_line(&output));
        }
        let done = output.finished || output.tick.0 >= MAX_TICKS;
        last = Some(output);
        if done {
            break;
        }
    }
    let elapsed = t0.elapsed();

    if !simulation.is_running() {
        info!("run finished on its own");
    } else {
        controller.pause_simulation(&id)?;
    }
    ticker.stop();

    // 5. Persist the final state, then drop the session.
    std::fs::create_dir_all("output")?;
    let path = Path::new("output/schelling.json");
    save_simulation(&simulation, path)?;
    println!();
    println!("Saved final state to {}", path.display());
    // Round-trip check: the document reloads through the same factories.
    let restored = load_simulation(path, factory.create_model()?, &factory.agent_factories())?;
    restored.inspect(|state, _, tick| {
        println!("Reloaded: {} settlers at tick {tick}", state.agent_count());
    });
    controller.remove_simulation(&id)?;

    // 6. Summary.
    if let Some(output) = &last {
        println!(
            "Settled after {} ticks in {:.2} s  ({})",
            output.tick.0,
            elapsed.as_secs_f64(),
            stats_line(output)
        );
        println!();
        render(output);
    }

    Ok(())
}
