//! `hb-core` — foundational types for the `rust_hb` hierarchical behavior engine.
//!
//! This crate is a dependency of every other `hb-*` crate.  It intentionally
//! has no `hb-*` dependencies and no required external ones (only optional
//! `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | [`ids`]     | `InstanceId`                                              |
//! | [`time`]    | `FrameTime`, `FrameClock`                                 |
//! | [`state`]   | `StateKind` (initial / normal / target / aborted)         |
//! | [`trace`]   | `ActivationNode`, `ActivationGraph`                       |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize` (and `Deserialize` where owned) to public |
//!           | types.                                                     |

pub mod ids;
pub mod state;
pub mod time;
pub mod trace;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use ids::InstanceId;
pub use state::StateKind;
pub use time::{FrameClock, FrameTime};
pub use trace::{ActivationGraph, ActivationNode};
