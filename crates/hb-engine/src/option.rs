//! The option contract: state enums, argument objects, and the
//! `BehaviorOption` trait every option implements.

use std::fmt::{self, Display};

use hb_core::StateKind;
use hb_defs::Definitions;

use crate::{ActionCx, BehaviorError, BehaviorResult, Transition};

// ── States ────────────────────────────────────────────────────────────────────

/// The closed set of states of one option.
///
/// Usually generated with [`states!`][crate::states].  Exactly one member of
/// `ALL` must be tagged [`StateKind::Initial`].
pub trait StateId: Copy + Eq + fmt::Debug + Send + 'static {
    /// Every state, in declaration order.
    const ALL: &'static [Self];

    /// Name shown in the activation trace.
    fn name(self) -> &'static str;

    fn kind(self) -> StateKind;

    /// States without action logic report `false`.  Under a selector, an
    /// initial state without action does not count as executed.
    fn has_action(self) -> bool {
        true
    }
}

/// The unique initial state of `S`.
pub(crate) fn initial_state<S: StateId>(option: &'static str) -> BehaviorResult<S> {
    let mut initials = S::ALL.iter().copied().filter(|s| s.kind().is_initial());
    let first = initials
        .next()
        .ok_or(BehaviorError::MissingInitialState { option })?;
    let others = initials.count();
    if others > 0 {
        return Err(BehaviorError::MultipleInitialStates { option, count: others + 1 });
    }
    Ok(first)
}

/// Define a state enum and its [`StateId`] impl.
///
/// ```rust,ignore
/// hb_engine::states! {
///     pub enum PingState {
///         Idle   => ("idle", Initial),
///         Active => ("active", Normal),
///         Done   => ("done", Target, no_action),
///     }
/// }
/// ```
#[macro_export]
macro_rules! states {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $variant:ident => ($label:literal, $kind:ident $(, $flag:ident)?) ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
        $vis enum $name {
            $( $variant ),+
        }

        impl $crate::StateId for $name {
            const ALL: &'static [Self] = &[ $( $name::$variant ),+ ];

            fn name(self) -> &'static str {
                match self {
                    $( $name::$variant => $label ),+
                }
            }

            fn kind(self) -> $crate::StateKind {
                match self {
                    $( $name::$variant => $crate::StateKind::$kind ),+
                }
            }

            fn has_action(self) -> bool {
                match self {
                    $( $name::$variant => $crate::__state_has_action!($($flag)?) ),+
                }
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __state_has_action {
    () => {
        true
    };
    (no_action) => {
        false
    };
}

// ── Arguments ─────────────────────────────────────────────────────────────────

/// Per-call parameter object.
///
/// Every field has a default; call sites override what they need with
/// struct-update syntax.  Arguments are not persisted between calls.
pub trait OptionArgs: Default + Clone + 'static {
    /// Push one `"name = value"` line per argument for the activation trace.
    fn describe(&self, _out: &mut Vec<String>) {}
}

impl OptionArgs for () {}

/// Helper for [`OptionArgs::describe`].
pub fn describe_arg(out: &mut Vec<String>, name: &str, value: impl Display) {
    out.push(format!("{name} = {value}"));
}

// ── Options ───────────────────────────────────────────────────────────────────

/// A hierarchical state-machine option over world type `W`.
///
/// Options are marker types; all per-instance data lives in the context the
/// container keeps for them.  Each call runs, in order:
///
/// 1. [`common_transition`][Self::common_transition], when
///    `HAS_COMMON_TRANSITION` is set;
/// 2. [`transition`][Self::transition] for the current state;
/// 3. [`action`][Self::action] for the resulting state, when it has one.
///
/// At most one `goto` per call is accepted.  A second one is a
/// [`BehaviorError::TransitionConflict`].
///
/// ```rust,ignore
/// struct Ping;
///
/// impl BehaviorOption<World> for Ping {
///     const NAME: &'static str = "ping";
///     type State = PingState;
///     type Args = PingArgs;
///     type Defs = ();
///     type Vars = ();
///
///     fn transition(state: PingState, t: &mut Transition<'_, World, Self>) -> BehaviorResult<()> {
///         match state {
///             PingState::Idle if t.args().flag => t.goto(PingState::Active),
///             _ => Ok(()),
///         }
///     }
/// }
/// ```
pub trait BehaviorOption<W>: Sized + 'static {
    /// Registry name and activation-trace label.
    const NAME: &'static str;

    /// Whether `common_transition` runs before the state transition.
    const HAS_COMMON_TRANSITION: bool = false;

    type State: StateId;
    type Args: OptionArgs;
    type Defs: Definitions;
    /// Locals kept while the option stays active; reset on cold entry.
    type Vars: Default + Send + 'static;

    fn common_transition(_t: &mut Transition<'_, W, Self>) -> BehaviorResult<()> {
        Ok(())
    }

    fn transition(_state: Self::State, _t: &mut Transition<'_, W, Self>) -> BehaviorResult<()> {
        Ok(())
    }

    fn action(_state: Self::State, _cx: &mut ActionCx<'_, '_, W, Self>) -> BehaviorResult<()> {
        Ok(())
    }
}
