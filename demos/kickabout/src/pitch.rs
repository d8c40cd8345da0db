//! A toy pitch: one ball, the home team driven by the behavior, and four
//! opponents wandering toward the ball at random.
//!
//! The home team attacks the west goal line, the opponents the east one.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use hb_soccer::{Action, Direction, LocalArea, MAX_X, MAX_Y, MID_Y, Occupancy, SensorSnapshot, TEAM_SIZE};

/// Cells a kicked ball travels at most.
const KICK_DISTANCE: i32 = 10;
/// Chance an opponent next to the ball kicks it.
const OPPONENT_KICK_CHANCE: f64 = 0.3;
/// Chance an opponent steps toward the ball rather than at random.
const OPPONENT_CHASE_CHANCE: f64 = 0.6;

pub type Pos = (i32, i32);

pub struct Pitch {
    pub ball:       Pos,
    pub home:       [Pos; TEAM_SIZE],
    pub away:       [Pos; TEAM_SIZE],
    pub home_goals: u32,
    pub away_goals: u32,
    pub kicks:      u32,
    rng:            SmallRng,
}

impl Pitch {
    pub fn new(seed: u64) -> Self {
        let mut pitch = Self {
            ball:       (0, 0),
            home:       [(0, 0); TEAM_SIZE],
            away:       [(0, 0); TEAM_SIZE],
            home_goals: 0,
            away_goals: 0,
            kicks:      0,
            rng:        SmallRng::seed_from_u64(seed),
        };
        pitch.kick_off();
        pitch
    }

    /// Ball on the centre spot, teams in their own halves.
    pub fn kick_off(&mut self) {
        let centre = MAX_X / 2;
        self.ball = (centre, MID_Y);
        self.home = [(centre + 5, 5), (centre + 5, 17), (centre + 15, 8), (centre + 25, 14)];
        self.away = [(centre - 5, 5), (centre - 5, 17), (centre - 15, 8), (centre - 25, 14)];
    }

    /// What home player `i` senses.
    pub fn snapshot(&self, i: usize) -> SensorSnapshot {
        let (x, y) = self.home[i];
        let mut cells = [Occupancy::Empty; 9];
        for dir in Direction::ALL {
            let (dx, dy) = dir.offset();
            cells[dir.index()] = match dir {
                Direction::Here => Occupancy::Myself,
                _ => self.occupancy((x + dx, y + dy)),
            };
        }
        SensorSnapshot {
            area:     LocalArea::new(cells),
            ball_dir: Direction::heading((x, y), self.ball),
            x,
            y,
        }
    }

    pub fn snapshots(&self) -> [SensorSnapshot; TEAM_SIZE] {
        std::array::from_fn(|i| self.snapshot(i))
    }

    /// Apply the home team's actions, move the opponents, and score.
    /// Returns `true` when a goal was scored this step.
    pub fn apply(&mut self, actions: &[Action; TEAM_SIZE]) -> bool {
        for (i, action) in actions.iter().enumerate() {
            let pos = self.home[i];
            if let Some(next) = self.resolve(pos, *action) {
                self.home[i] = next;
            }
            if self.scored() {
                return true;
            }
        }
        for i in 0..TEAM_SIZE {
            let pos = self.away[i];
            let action = self.opponent_action(pos);
            if let Some(next) = self.resolve(pos, action) {
                self.away[i] = next;
            }
            if self.scored() {
                return true;
            }
        }
        false
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn occupancy(&self, p: Pos) -> Occupancy {
        if p.0 <= 0 || p.0 >= MAX_X - 1 || p.1 <= 0 || p.1 >= MAX_Y - 1 {
            Occupancy::Boundary
        } else if p == self.ball {
            Occupancy::Ball
        } else if self.home.contains(&p) {
            Occupancy::Teammate
        } else if self.away.contains(&p) {
            Occupancy::Opponent
        } else {
            Occupancy::Empty
        }
    }

    /// New position of a player at `pos` performing `action`, if it moved.
    fn resolve(&mut self, pos: Pos, action: Action) -> Option<Pos> {
        match action {
            Action::Kick => {
                self.kick(pos);
                None
            }
            Action::DoNothing => None,
            step => {
                let (dx, dy) = step.direction()?.offset();
                let next = (pos.0 + dx, pos.1 + dy);
                (self.occupancy(next) == Occupancy::Empty).then_some(next)
            }
        }
    }

    /// Kick the ball away from `from` if it is adjacent.
    fn kick(&mut self, from: Pos) {
        let (dx, dy) = (self.ball.0 - from.0, self.ball.1 - from.1);
        if dx.abs() > 1 || dy.abs() > 1 {
            return;
        }
        self.kicks += 1;
        for _ in 0..KICK_DISTANCE {
            let next = (self.ball.0 + dx, self.ball.1 + dy);
            // A ball reaching a goal line stops there to be scored.
            if next.0 <= 0 || next.0 >= MAX_X - 1 {
                self.ball = (next.0.clamp(0, MAX_X - 1), next.1);
                return;
            }
            if self.occupancy(next) != Occupancy::Empty {
                return;
            }
            self.ball = next;
        }
    }

    fn scored(&mut self) -> bool {
        let goal = if self.ball.0 <= 1 {
            self.home_goals += 1;
            true
        } else if self.ball.0 >= MAX_X - 2 {
            self.away_goals += 1;
            true
        } else {
            false
        };
        if goal {
            tracing::info!(home = self.home_goals, away = self.away_goals, "goal");
            self.kick_off();
        }
        goal
    }

    fn opponent_action(&mut self, pos: Pos) -> Action {
        let (dx, dy) = (self.ball.0 - pos.0, self.ball.1 - pos.1);
        if dx.abs() <= 1 && dy.abs() <= 1 && self.rng.gen_bool(OPPONENT_KICK_CHANCE) {
            return Action::Kick;
        }
        if self.rng.gen_bool(OPPONENT_CHASE_CHANCE) {
            return Action::toward(Direction::heading(pos, self.ball));
        }
        let dir = Direction::ALL[self.rng.gen_range(0..Direction::ALL.len())];
        Action::toward(dir)
    }
}
