//! Snapshot persistence: save a simulation's state to a JSON document and
//! rebuild it later from the same factories.
//!
//! Only *data* is persisted — grid dimensions, the tick counter, parameter
//! values, and each agent's kind, position and parameter values.  Behavior
//! (strategies, init/exit functions, parameter declarations and domains) is
//! code, so loading takes the same [`Model`] and a kind-keyed map of
//! [`AgentFactory`]s and revalidates every saved value on the way in.  A
//! loaded simulation always resumes idle; callers start it explicitly.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use gs_core::{Position, Tick};
use gs_grid::{Entity, GridState};
use gs_model::{AgentFactory, Model};
use gs_sim::Simulation;

use crate::{SchedError, SchedResult};

/// Bumped whenever the document layout changes incompatibly.
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct SavedAgent {
    pos:    Position,
    kind:   String,
    params: BTreeMap<String, gs_param::ParamValue>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SavedEntity {
    pos:  Position,
    kind: String,
}

/// The on-disk document.
#[derive(Debug, Serialize, Deserialize)]
pub struct SavedSimulation {
    pub version:      u32,
    pub width:        u32,
    pub height:       u32,
    pub tick:         Tick,
    pub tick_rate_ms: u64,
    pub model_params: BTreeMap<String, gs_param::ParamValue>,
    agents:           Vec<SavedAgent>,
    entities:         Vec<SavedEntity>,
}

/// Write `simulation`'s current state to `path` as pretty-printed JSON.
///
/// Callers pause the simulation first if they want a quiescent snapshot;
/// the capture itself is consistent either way (taken under the state
/// lock, never mid-tick).
pub fn save_simulation(simulation: &Simulation, path: impl AsRef<Path>) -> SchedResult<()> {
    let doc = simulation.inspect(|state, _status, tick| SavedSimulation {
        version:      FORMAT_VERSION,
        width:        state.width(),
        height:       state.height(),
        tick,
        tick_rate_ms: simulation.tick_rate_ms(),
        model_params: simulation
            .model()
            .params()
            .values()
            .map(|(k, v)| (k.to_owned(), v.clone()))
            .collect(),
        agents:       state
            .agents()
            .into_iter()
            .map(|(pos, agent)| SavedAgent {
                pos,
                kind: agent.kind().to_owned(),
                params: agent
                    .params()
                    .values()
                    .map(|(k, v)| (k.to_owned(), v.clone()))
                    .collect(),
            })
            .collect(),
        entities:     state
            .entities()
            .into_iter()
            .map(|(pos, entity)| SavedEntity { pos, kind: entity.kind().to_owned() })
            .collect(),
    });

    let json = serde_json::to_string_pretty(&doc)?;
    fs::write(path.as_ref(), json)?;
    debug!(path = %path.as_ref().display(), tick = %doc.tick, "simulation saved");
    Ok(())
}

/// Rebuild a simulation from the document at `path`.
///
/// `model` supplies the parameter declarations and behavior functions;
/// `factories` maps each saved agent kind to the factory that rebuilds it.
/// Saved values pass through the normal parameter validation, so a document
/// edited out from under its declarations fails with the usual
/// [`ParamError`][gs_param::ParamError] rather than loading silently wrong.
pub fn load_simulation(
    path: impl AsRef<Path>,
    mut model: Model,
    factories: &HashMap<String, Box<dyn AgentFactory>>,
) -> SchedResult<Simulation> {
    let json = fs::read_to_string(path.as_ref())?;
    let doc: SavedSimulation = serde_json::from_str(&json)?;
    if doc.version != FORMAT_VERSION {
        return Err(SchedError::UnsupportedVersion(doc.version));
    }

    for (key, value) in &doc.model_params {
        model.set_parameter(key, value.clone())?;
    }

    let mut state = GridState::new(doc.width, doc.height);
    for saved in &doc.entities {
        state.place_entity(saved.pos, Entity::new(saved.kind.clone()))?;
    }
    for saved in &doc.agents {
        let factory = factories
            .get(&saved.kind)
            .ok_or_else(|| SchedError::UnknownKind(saved.kind.clone()))?;
        let mut agent = factory.create_agent()?;
        for (key, value) in &saved.params {
            agent.set_parameter(key, value.clone())?;
        }
        state.add_agent(saved.pos, agent)?;
    }

    debug!(path = %path.as_ref().display(), tick = %doc.tick, "simulation loaded");
    let simulation = Simulation::new_resumed(model, state, doc.tick);
    simulation.set_tick_rate_ms(doc.tick_rate_ms);
    Ok(simulation)
}
