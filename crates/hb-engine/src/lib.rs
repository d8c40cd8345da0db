//! `hb-engine` — hierarchical state-machine options and the behavior container.
//!
//! # Model
//!
//! An *option* is a named state machine.  Every control cycle the container
//! calls one or more root options; an option's action may call sub-options,
//! so each cycle walks a call tree from the roots down.  Between cycles each
//! option keeps its current state, start times and variables in an
//! [`OptionContext`][context::OptionContext] owned by the [`Behavior`].
//!
//! ```text
//! Behavior::begin_cycle(now)
//!   └─ play_soccer            [common → transition → action]
//!        └─ striker           [transition → action]
//!             └─ go_to(x, y)  [action]
//! Behavior::end_cycle()
//! ```
//!
//! # Crate layout
//!
//! | Module        | Contents                                                      |
//! |---------------|---------------------------------------------------------------|
//! | [`option`]    | `BehaviorOption`, `StateId`, `OptionArgs`, `states!`          |
//! | [`execution`] | call dispatch, `Transition` and `ActionCx` handles, `CallReport` |
//! | [`context`]   | `OptionContext`, `ContextStore`, `ContextSnapshot`            |
//! | [`registry`]  | `Registry` (name lookup, selector)                            |
//! | [`behavior`]  | `Behavior` container and cycle bracketing                     |
//! | [`builder`]   | `BehaviorBuilder`                                             |
//! | [`config`]    | `BehaviorConfig`, `DefinitionsInit`, `RefreshPolicy`          |
//! | [`observer`]  | `CycleObserver`, `NoopObserver`                               |
//! | [`error`]     | `BehaviorError`, `BehaviorResult<T>`                          |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                      |
//! |---------|-------------------------------------------------------------|
//! | `serde` | Serde derives on `BehaviorConfig` and `ContextSnapshot`.    |

pub mod behavior;
pub mod builder;
pub mod config;
pub mod context;
pub mod error;
pub mod execution;
pub mod observer;
pub mod option;
pub mod registry;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use behavior::Behavior;
pub use builder::BehaviorBuilder;
pub use config::{BehaviorConfig, DefinitionsInit, RefreshPolicy};
pub use context::{ContextSnapshot, ContextStore};
pub use error::{BehaviorError, BehaviorResult};
pub use execution::{ActionCx, CallReport, Transition};
pub use observer::{CycleObserver, NoopObserver};
pub use option::{BehaviorOption, OptionArgs, StateId, describe_arg};
pub use registry::Registry;

pub use hb_core::{ActivationGraph, ActivationNode, FrameTime, InstanceId, StateKind};
pub use hb_defs::{DefinitionLoader, DefinitionSource, Definitions, DefsError, DefsResult};
