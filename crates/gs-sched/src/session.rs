//! Session construction: configure a model's parameters, then launch it
//! into a controller as a registered simulation.

use gs_core::SessionId;
use gs_model::{Model, ModelFactory};
use gs_sim::Simulation;

use std::sync::Arc;

use crate::controller::SimulationsController;
use crate::SchedResult;

/// Stages a [`Model`] for launch: parameters are set one at a time, each
/// individually validated, and the session only launches once every
/// required parameter holds a value.
pub struct SessionBuilder {
    model: Model,
}

impl SessionBuilder {
    pub fn new(model: Model) -> Self {
        Self { model }
    }

    /// Stage a fresh model from a factory.
    pub fn from_factory(factory: &dyn ModelFactory) -> SchedResult<Self> {
        Ok(Self::new(factory.create_model()?))
    }

    /// Set one model parameter.  A rejected value (unknown key, wrong type,
    /// domain violation) leaves every other parameter untouched.
    pub fn set_parameter(
        &mut self,
        key: &str,
        value: impl Into<gs_param::ParamValue>,
    ) -> SchedResult<()> {
        self.model.set_parameter(key, value)?;
        Ok(())
    }

    /// Keys of required parameters still without a value.
    pub fn missing_parameters(&self) -> Vec<&str> {
        self.model.unset_parameters()
    }

    pub fn is_ready(&self) -> bool {
        self.model.is_configured()
    }

    pub fn params(&self) -> &gs_param::ParameterSet {
        self.model.params()
    }

    /// Initialize the model and register the resulting simulation under
    /// `id`.  Fails — without registering anything — if required
    /// parameters are unset or initialization errors.
    pub fn launch(
        self,
        controller: &SimulationsController,
        id: SessionId,
    ) -> SchedResult<Arc<Simulation>> {
        let simulation = Simulation::new_initialized(self.model)?;
        controller.add_simulation(id, simulation)
    }
}
