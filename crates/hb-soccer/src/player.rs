//! One agent: a behavior instance over a [`PlayerWorld`].

use std::sync::Arc;

use hb_engine::{
    ActivationGraph, Behavior, BehaviorBuilder, BehaviorConfig, BehaviorResult, CycleObserver,
    DefinitionSource, FrameTime, InstanceId, NoopObserver, Registry,
};

use crate::estimate::TeamEstimate;
use crate::field::{Action, SensorSnapshot};
use crate::options::ROOT;
use crate::world::PlayerWorld;

/// A player runs `play_soccer` once per call to [`execute`][Self::execute],
/// stamping its cycles 0, 1, 2, …
pub struct Player {
    behavior: Behavior<PlayerWorld>,
}

impl Player {
    pub fn new(
        number:   usize,
        registry: Arc<Registry<PlayerWorld>>,
        source:   Arc<dyn DefinitionSource>,
    ) -> Self {
        Self::with_config(number, registry, source, BehaviorConfig::default())
    }

    pub fn with_config(
        number:   usize,
        registry: Arc<Registry<PlayerWorld>>,
        source:   Arc<dyn DefinitionSource>,
        config:   BehaviorConfig,
    ) -> Self {
        let behavior = BehaviorBuilder::new(registry, PlayerWorld::new(number))
            .id(InstanceId(number as u32))
            .config(config)
            .definitions(source)
            .build();
        Self { behavior }
    }

    /// Run one cycle on `snapshot` and return the action chosen.
    pub fn execute(&mut self, snapshot: &SensorSnapshot, team: &TeamEstimate) -> BehaviorResult<Action> {
        self.execute_observed(snapshot, team, &mut NoopObserver)
    }

    /// [`execute`][Self::execute], notifying `observer` around the cycle.
    pub fn execute_observed<Obs: CycleObserver>(
        &mut self,
        snapshot: &SensorSnapshot,
        team:     &TeamEstimate,
        observer: &mut Obs,
    ) -> BehaviorResult<Action> {
        let now = match self.behavior.last_cycle() {
            Some(last) => last + 1,
            None => FrameTime::ZERO,
        };
        self.behavior.world_mut().observe(snapshot, team);
        self.behavior.run_cycle(now, &[ROOT], observer)?;
        let action = self.behavior.world().next_action;
        tracing::trace!(player = %self.behavior.id(), %now, %action, "player acted");
        Ok(action)
    }

    pub fn number(&self) -> usize {
        self.behavior.world().number
    }

    pub fn world(&self) -> &PlayerWorld {
        self.behavior.world()
    }

    pub fn behavior(&self) -> &Behavior<PlayerWorld> {
        &self.behavior
    }

    /// Mutable access, e.g. to [`reset`][Behavior::reset] a poisoned player.
    pub fn behavior_mut(&mut self) -> &mut Behavior<PlayerWorld> {
        &mut self.behavior
    }

    /// Activation graph of the last cycle.
    pub fn activation_graph(&self) -> &ActivationGraph {
        self.behavior.activation_graph()
    }
}
