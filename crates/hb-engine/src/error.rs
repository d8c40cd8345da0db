use hb_core::{FrameTime, InstanceId};
use hb_defs::DefsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BehaviorError {
    #[error("option `{option}` declares no initial state")]
    MissingInitialState { option: &'static str },

    #[error("option `{option}` declares {count} initial states, expected exactly one")]
    MultipleInitialStates { option: &'static str, count: usize },

    #[error("option name `{name}` registered twice")]
    DuplicateOption { name: &'static str },

    /// A second transition was accepted by the same option call.
    #[error("option `{option}`: transition `{from}` -> `{to}` after a transition was already taken")]
    TransitionConflict {
        option: &'static str,
        from:   &'static str,
        to:     &'static str,
    },

    /// `goto` outside exactly one of {common transition, state transition}.
    #[error("option `{option}`: transition to `{to}` requested outside its transition block")]
    MisplacedTransition { option: &'static str, to: &'static str },

    #[error("option `{option}` called while already executing")]
    ReentrantCall { option: &'static str },

    #[error("definitions of option `{option}`: {source}")]
    Definitions {
        option: &'static str,
        #[source]
        source: DefsError,
    },

    #[error("no cycle in progress")]
    NoActiveCycle,

    #[error("cycle {now} still in progress")]
    CycleInProgress { now: FrameTime },

    #[error("frame time went from {last} to {now}; timestamps must increase")]
    NonMonotonicTime { last: FrameTime, now: FrameTime },

    #[error("{instance} is poisoned: {reason}")]
    Poisoned { instance: InstanceId, reason: String },

    #[error("context of option `{option}` holds a different option type")]
    ContextTypeMismatch { option: &'static str },
}

impl BehaviorError {
    /// Defects of the option tree or its configuration.  A fatal error
    /// poisons the behavior instance it occurred in.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            BehaviorError::NoActiveCycle
                | BehaviorError::CycleInProgress { .. }
                | BehaviorError::NonMonotonicTime { .. }
                | BehaviorError::Poisoned { .. }
        )
    }
}

pub type BehaviorResult<T> = Result<T, BehaviorError>;
