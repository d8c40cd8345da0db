//! The input and output symbols one player's options work on.

use crate::estimate::{Role, TeamEstimate, distance};
use crate::field::{Action, Direction, LocalArea, Occupancy, SensorSnapshot};

/// One player's view of the current cycle, plus the action slot its
/// options write.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerWorld {
    /// Index of this player in the team.
    pub number:                   usize,
    pub area:                     LocalArea,
    /// Compass heading to the ball as sensed.
    pub ball_direction:           Direction,
    pub x:                        i32,
    pub y:                        i32,
    pub ball_x:                   i32,
    pub ball_y:                   i32,
    pub ball_distance:            f64,
    /// Where the ball is in the local area, if it is there at all.
    pub ball_local_direction:     Option<Direction>,
    pub most_westerly_teammate_x: i32,
    pub role:                     Role,
    /// Written by `set_action`; read back after the cycle.
    pub next_action:              Action,
}

impl PlayerWorld {
    pub fn new(number: usize) -> Self {
        Self { number, ..Self::default() }
    }

    /// Refresh the input symbols from this cycle's snapshot and the team
    /// estimate, and clear the action slot.
    pub fn observe(&mut self, snapshot: &SensorSnapshot, team: &TeamEstimate) {
        self.area = snapshot.area;
        self.ball_direction = snapshot.ball_dir;
        self.x = snapshot.x;
        self.y = snapshot.y;

        self.ball_local_direction = snapshot.area.find(Occupancy::Ball);
        match self.ball_local_direction {
            Some(dir) => {
                let (dx, dy) = dir.offset();
                self.ball_x = self.x + dx;
                self.ball_y = self.y + dy;
                self.ball_distance = 1.0;
            }
            None => {
                (self.ball_x, self.ball_y) = team.ball();
                self.ball_distance = distance((self.x, self.y), (self.ball_x, self.ball_y));
            }
        }

        self.most_westerly_teammate_x = team.most_westerly_x();
        self.role = team.roles.get(self.number).copied().unwrap_or_default();
        self.next_action = Action::DoNothing;
    }

    pub fn ball_seen_at(&self, dirs: &[Direction]) -> bool {
        self.ball_local_direction.is_some_and(|d| dirs.contains(&d))
    }
}
