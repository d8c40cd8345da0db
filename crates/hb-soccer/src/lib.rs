//! `hb-soccer` — a grid-soccer team written as rust_hb options.
//!
//! Each cycle a simulator hands every player a [`SensorSnapshot`] (its 3×3
//! neighbourhood, a compass heading to the ball, its position) and expects
//! an [`Action`] back.  [`Team::step`] does that for four players at once.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                |
//! |--------------|---------------------------------------------------------|
//! | [`field`]    | `Direction`, `Occupancy`, `LocalArea`, `SensorSnapshot`, `Action` |
//! | [`estimate`] | `TeamEstimate` (ball triangulation, roles), `Role`      |
//! | [`world`]    | `PlayerWorld`, the symbols the options read and write   |
//! | [`options`]  | the ten options, `soccer_registry`, built-in definitions |
//! | [`player`]   | `Player` (one behavior instance)                        |
//! | [`team`]     | `Team` (four players)                                   |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                             |
//! |------------|----------------------------------------------------|
//! | `parallel` | `Team::step` runs the players on Rayon's pool.     |
//! | `serde`    | Serde derives on the field and world types.        |
//!
//! # Usage
//!
//! ```rust,ignore
//! let mut team = Team::new(Arc::new(DirSource::new("config")))?;
//! let actions = team.step(&snapshots)?;
//! ```

pub mod estimate;
pub mod field;
pub mod options;
pub mod player;
pub mod team;
pub mod world;


pub use estimate::{Role, TEAM_SIZE, TeamEstimate};
pub use field::{Action, Direction, LocalArea, MAX_X, MAX_Y, MID_Y, Occupancy, SensorSnapshot};
pub use options::{ROOT, builtin_definitions, soccer_registry};
pub use player::Player;
pub use team::Team;
pub use world::PlayerWorld;
