//! Four players sharing one registry and one team estimate.

use std::sync::Arc;

use hb_engine::{BehaviorConfig, BehaviorResult, DefinitionSource, Registry};

use crate::estimate::{TEAM_SIZE, TeamEstimate};
use crate::field::{Action, SensorSnapshot};
use crate::options::soccer_registry;
use crate::player::Player;
use crate::world::PlayerWorld;

/// A full team.
///
/// Each [`step`][Self::step] first folds all four snapshots into the team
/// estimate, then runs every player against it.  With the `parallel`
/// feature the players run on Rayon's thread pool; they share nothing
/// mutable, so the actions are the same either way.
pub struct Team {
    players:  Vec<Player>,
    estimate: TeamEstimate,
}

impl Team {
    /// A team running the soccer options with definitions from `source`.
    pub fn new(source: Arc<dyn DefinitionSource>) -> BehaviorResult<Self> {
        let registry = Arc::new(soccer_registry()?);
        Ok(Self::with_registry(registry, source, BehaviorConfig::default()))
    }

    pub fn with_registry(
        registry: Arc<Registry<PlayerWorld>>,
        source:   Arc<dyn DefinitionSource>,
        config:   BehaviorConfig,
    ) -> Self {
        let players = (0..TEAM_SIZE)
            .map(|i| Player::with_config(i, Arc::clone(&registry), Arc::clone(&source), config.clone()))
            .collect();
        Self { players, estimate: TeamEstimate::new() }
    }

    /// One cycle for the whole team; `snapshots[i]` belongs to player `i`.
    ///
    /// Every player runs even if another fails; the first error in player
    /// order is returned.
    pub fn step(&mut self, snapshots: &[SensorSnapshot; TEAM_SIZE]) -> BehaviorResult<[Action; TEAM_SIZE]> {
        self.estimate.update(snapshots);
        let estimate = &self.estimate;

        #[cfg(not(feature = "parallel"))]
        let results: Vec<BehaviorResult<Action>> = self
            .players
            .iter_mut()
            .zip(snapshots.iter())
            .map(|(player, snapshot)| player.execute(snapshot, estimate))
            .collect();

        #[cfg(feature = "parallel")]
        let results: Vec<BehaviorResult<Action>> = {
            use rayon::prelude::*;

            self.players
                .par_iter_mut()
                .zip(snapshots.as_slice().par_iter())
                .map(|(player, snapshot)| player.execute(snapshot, estimate))
                .collect()
        };

        let mut actions = [Action::DoNothing; TEAM_SIZE];
        for (slot, result) in actions.iter_mut().zip(results) {
            *slot = result?;
        }
        Ok(actions)
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, number: usize) -> Option<&Player> {
        self.players.get(number)
    }

    pub fn player_mut(&mut self, number: usize) -> Option<&mut Player> {
        self.players.get_mut(number)
    }

    pub fn estimate(&self) -> &TeamEstimate {
        &self.estimate
    }
}
