//! Pitch geometry and the sensor/action vocabulary shared with a simulator.
//!
//! # Coordinates
//!
//! `x` grows eastward over `0..MAX_X`, `y` grows southward over `0..MAX_Y`.
//! The outermost ring is boundary.  The team attacks the goal at the west
//! end of the pitch.

use std::fmt;
use std::ops::Index;

/// Pitch width including the boundary columns.
pub const MAX_X: i32 = 80;
/// Pitch height including the boundary rows.
pub const MAX_Y: i32 = 23;
/// Middle row of the playable area.
pub const MID_Y: i32 = 11;

// ── Direction ─────────────────────────────────────────────────────────────────

/// A compass heading, or the cell itself.
///
/// The discriminants are the cell indices of a [`LocalArea`], read row by row
/// from the north-west corner.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    NW = 0,
    N  = 1,
    NE = 2,
    W  = 3,
    #[default]
    Here = 4,
    E  = 5,
    SW = 6,
    S  = 7,
    SE = 8,
}

impl Direction {
    pub const ALL: [Direction; 9] = [
        Direction::NW, Direction::N, Direction::NE,
        Direction::W, Direction::Here, Direction::E,
        Direction::SW, Direction::S, Direction::SE,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(i: usize) -> Option<Direction> {
        Self::ALL.get(i).copied()
    }

    /// Grid offset `(dx, dy)` of one step in this direction.
    pub fn offset(self) -> (i32, i32) {
        let i = self.index() as i32;
        (i % 3 - 1, i / 3 - 1)
    }

    /// The eight-way compass heading from `from` to `to`.
    ///
    /// Each heading covers a 45° sector centred on its axis.  Equal
    /// positions yield [`Direction::Here`].
    pub fn heading(from: (i32, i32), to: (i32, i32)) -> Direction {
        let (dx, dy) = (to.0 - from.0, to.1 - from.1);
        if dx == 0 && dy == 0 {
            return Direction::Here;
        }
        // 0° points south, angles grow clockwise through west.
        let angle = (dx as f64).atan2(dy as f64) + std::f64::consts::PI;
        let degrees = angle.to_degrees();
        const SECTORS: [Direction; 8] = [
            Direction::NW, Direction::W, Direction::SW, Direction::S,
            Direction::SE, Direction::E, Direction::NE, Direction::N,
        ];
        let mut heading = Direction::N;
        for (k, dir) in SECTORS.iter().enumerate() {
            if degrees > 22.5 + 45.0 * k as f64 {
                heading = *dir;
            }
        }
        heading
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::NW => "NW",
            Direction::N => "N",
            Direction::NE => "NE",
            Direction::W => "W",
            Direction::Here => "HERE",
            Direction::E => "E",
            Direction::SW => "SW",
            Direction::S => "S",
            Direction::SE => "SE",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Occupancy ─────────────────────────────────────────────────────────────────

/// What a player senses in one neighbouring cell.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Occupancy {
    #[default]
    Empty,
    Boundary,
    Ball,
    Teammate,
    Opponent,
    /// The sensing player's own cell.
    Myself,
}

// ── LocalArea ─────────────────────────────────────────────────────────────────

/// The 3×3 neighbourhood around a player, indexed by [`Direction`].
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LocalArea([Occupancy; 9]);

impl Default for LocalArea {
    /// Empty surroundings.
    fn default() -> Self {
        let mut cells = [Occupancy::Empty; 9];
        cells[Direction::Here.index()] = Occupancy::Myself;
        Self(cells)
    }
}

impl LocalArea {
    pub fn new(cells: [Occupancy; 9]) -> Self {
        Self(cells)
    }

    /// Copy of `self` with `dir` set to `occupancy`.
    pub fn with(mut self, dir: Direction, occupancy: Occupancy) -> Self {
        self.0[dir.index()] = occupancy;
        self
    }

    pub fn get(&self, dir: Direction) -> Occupancy {
        self.0[dir.index()]
    }

    pub fn is_empty(&self, dir: Direction) -> bool {
        self.get(dir) == Occupancy::Empty
    }

    /// The last cell, in index order, holding `occupancy`.
    pub fn find(&self, occupancy: Occupancy) -> Option<Direction> {
        self.0
            .iter()
            .rposition(|&o| o == occupancy)
            .and_then(Direction::from_index)
    }

    pub fn cells(&self) -> &[Occupancy; 9] {
        &self.0
    }
}

impl Index<Direction> for LocalArea {
    type Output = Occupancy;

    fn index(&self, dir: Direction) -> &Occupancy {
        &self.0[dir.index()]
    }
}

// ── SensorSnapshot ────────────────────────────────────────────────────────────

/// Everything one player senses in one cycle.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SensorSnapshot {
    pub area:     LocalArea,
    /// Compass heading to the ball.
    pub ball_dir: Direction,
    pub x:        i32,
    pub y:        i32,
}

impl SensorSnapshot {
    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }
}

// ── Action ────────────────────────────────────────────────────────────────────

/// What a player does in one cycle.
///
/// Returned to the simulator as is; nothing here checks that a move is
/// possible.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Action {
    NW,
    N,
    NE,
    W,
    E,
    SW,
    S,
    SE,
    Kick,
    #[default]
    DoNothing,
}

impl Action {
    /// A step toward `dir`.  [`Direction::Here`] means standing still.
    pub fn toward(dir: Direction) -> Action {
        match dir {
            Direction::NW => Action::NW,
            Direction::N => Action::N,
            Direction::NE => Action::NE,
            Direction::W => Action::W,
            Direction::Here => Action::DoNothing,
            Direction::E => Action::E,
            Direction::SW => Action::SW,
            Direction::S => Action::S,
            Direction::SE => Action::SE,
        }
    }

    /// The direction moved, for movement actions.
    pub fn direction(self) -> Option<Direction> {
        match self {
            Action::NW => Some(Direction::NW),
            Action::N => Some(Direction::N),
            Action::NE => Some(Direction::NE),
            Action::W => Some(Direction::W),
            Action::E => Some(Direction::E),
            Action::SW => Some(Direction::SW),
            Action::S => Some(Direction::S),
            Action::SE => Some(Direction::SE),
            Action::Kick | Action::DoNothing => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Action::Kick => "KICK",
            Action::DoNothing => "DO_NOTHING",
            other => match other.direction() {
                Some(dir) => dir.as_str(),
                None => "DO_NOTHING",
            },
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
