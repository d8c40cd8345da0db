//! State tags shared by every option's state machine.

/// The role a state plays inside its option.
///
/// Every option has exactly one `Initial` state.  A parent can observe
/// whether the sub-option it called last ended in a `Target` state
/// (`action_done`) or an `Aborted` state (`action_aborted`).
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StateKind {
    /// An ordinary state.
    #[default]
    Normal,
    /// The state an option enters on every cold entry.
    Initial,
    /// The option reached its goal.
    Target,
    /// The option gave up.
    Aborted,
}

impl StateKind {
    #[inline]
    pub fn is_initial(self) -> bool {
        matches!(self, StateKind::Initial)
    }

    #[inline]
    pub fn is_target(self) -> bool {
        matches!(self, StateKind::Target)
    }

    #[inline]
    pub fn is_aborted(self) -> bool {
        matches!(self, StateKind::Aborted)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StateKind::Normal  => "normal",
            StateKind::Initial => "initial",
            StateKind::Target  => "target",
            StateKind::Aborted => "aborted",
        }
    }
}

impl std::fmt::Display for StateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
