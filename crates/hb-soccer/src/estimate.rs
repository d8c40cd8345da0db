//! The team's shared picture of the pitch.
//!
//! Players only sense a compass heading to the ball.  Once per cycle the
//! team intersects all four headings on the grid to estimate where the ball
//! is, then ranks the players by distance to that estimate to hand out
//! roles.  The estimate is built sequentially before any player runs; the
//! players only read it.

use std::fmt;

use crate::field::{Direction, MAX_X, MAX_Y, Occupancy, SensorSnapshot};

/// Players per team.
pub const TEAM_SIZE: usize = 4;

/// Players closer to the ball than this always play midfield.
const CLOSE_TO_BALL: f64 = 3.0;
/// Players this far east always play midfield.
const EAST_LIMIT: i32 = 73;

// ── Role ──────────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Role {
    Defender,
    #[default]
    Midfielder,
    Striker,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Role::Defender => "defender",
            Role::Midfielder => "midfielder",
            Role::Striker => "striker",
        })
    }
}

// ── TeamEstimate ──────────────────────────────────────────────────────────────

/// Positions, headings, ball estimate and roles of one team.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TeamEstimate {
    pub xs:        [i32; TEAM_SIZE],
    pub ys:        [i32; TEAM_SIZE],
    pub headings:  [Direction; TEAM_SIZE],
    /// Estimated ball position.  Kept from the previous cycle when the
    /// headings do not intersect.
    pub ball_x:    i32,
    pub ball_y:    i32,
    pub roles:     [Role; TEAM_SIZE],
    pub cycles:    u64,
}

impl Default for TeamEstimate {
    fn default() -> Self {
        Self::new()
    }
}

impl TeamEstimate {
    pub fn new() -> Self {
        Self {
            xs:       [0; TEAM_SIZE],
            ys:       [0; TEAM_SIZE],
            headings: [Direction::Here; TEAM_SIZE],
            ball_x:   0,
            ball_y:   0,
            roles:    [Role::Midfielder; TEAM_SIZE],
            cycles:   0,
        }
    }

    /// Fold in this cycle's snapshots, player `i` at index `i`.
    pub fn update(&mut self, snapshots: &[SensorSnapshot; TEAM_SIZE]) {
        for (i, s) in snapshots.iter().enumerate() {
            self.xs[i] = s.x;
            self.ys[i] = s.y;
            self.headings[i] = s.ball_dir;
        }

        if let Some((x, y)) = self.triangulate() {
            self.ball_x = x;
            self.ball_y = y;
        }
        // A player touching the ball knows exactly where it is.
        for s in snapshots {
            if let Some(dir) = s.area.find(Occupancy::Ball) {
                let (dx, dy) = dir.offset();
                self.ball_x = s.x + dx;
                self.ball_y = s.y + dy;
            }
        }

        self.assign_roles();
        self.cycles += 1;
        tracing::trace!(
            ball_x = self.ball_x,
            ball_y = self.ball_y,
            roles = ?self.roles,
            "team estimate updated"
        );
    }

    pub fn ball(&self) -> (i32, i32) {
        (self.ball_x, self.ball_y)
    }

    /// Distance of player `i` to the estimated ball.
    pub fn ball_distance(&self, i: usize) -> f64 {
        distance((self.xs[i], self.ys[i]), self.ball())
    }

    /// The smallest x of any player, capped at the last playable column.
    pub fn most_westerly_x(&self) -> i32 {
        self.xs.iter().copied().fold(MAX_X - 2, i32::min)
    }

    /// Centroid of the playable cells every player's heading points at, or
    /// failing that, all but one player's.
    fn triangulate(&self) -> Option<(i32, i32)> {
        let mut votes = vec![0u8; (MAX_X * MAX_Y) as usize];
        for y in 1..MAX_Y - 1 {
            for x in 1..MAX_X - 1 {
                let n = (0..TEAM_SIZE)
                    .filter(|&k| Direction::heading((self.xs[k], self.ys[k]), (x, y)) == self.headings[k])
                    .count();
                votes[(y * MAX_X + x) as usize] = n as u8;
            }
        }

        let centroid = |wanted: u8| {
            let (mut sx, mut sy, mut n) = (0i32, 0i32, 0i32);
            for (idx, &v) in votes.iter().enumerate() {
                if v == wanted {
                    sx += idx as i32 % MAX_X;
                    sy += idx as i32 / MAX_X;
                    n += 1;
                }
            }
            (n > 0).then(|| (sx / n, sy / n))
        };
        centroid(TEAM_SIZE as u8).or_else(|| centroid(TEAM_SIZE as u8 - 1))
    }

    /// The two players nearest the ball play midfield.  Of the other two,
    /// the one further east defends and the other strikes.
    fn assign_roles(&mut self) {
        let distances: [f64; TEAM_SIZE] = std::array::from_fn(|i| self.ball_distance(i));
        let mut rank: [usize; TEAM_SIZE] = std::array::from_fn(|i| i);
        rank.sort_by(|&a, &b| distances[a].total_cmp(&distances[b]));

        let (third, fourth) = (rank[2], rank[3]);
        for (place, &player) in rank.iter().enumerate() {
            let role = match place {
                0 | 1 => Role::Midfielder,
                2 if self.xs[third] >= self.xs[fourth] => Role::Defender,
                2 => Role::Striker,
                _ if self.xs[fourth] > self.xs[third] => Role::Defender,
                _ => Role::Striker,
            };
            self.roles[player] = if distances[player] < CLOSE_TO_BALL || self.xs[player] > EAST_LIMIT {
                Role::Midfielder
            } else {
                role
            };
        }
    }
}

pub(crate) fn distance(a: (i32, i32), b: (i32, i32)) -> f64 {
    let (dx, dy) = ((a.0 - b.0) as f64, (a.1 - b.1) as f64);
    (dx * dx + dy * dy).sqrt()
}
