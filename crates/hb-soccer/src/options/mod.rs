//! The ten options of the soccer agent.
//!
//! ```text
//! play_soccer
//!  ├─ striker ─── go_to
//!  ├─ defender ── go_to
//!  └─ midfielder
//!       ├─ go_to ──────────── go_dir ─── set_action
//!       ├─ pass ──┬────────── set_action
//!       │         └─ get_behind_ball ─── set_action
//!       └─ dribble (same as pass)
//! ```

mod ball;
mod motion;
mod roles;

use hb_defs::MemorySource;
use hb_engine::{ActionCx, BehaviorOption, BehaviorResult, Registry, Transition};

use crate::world::PlayerWorld;

pub use ball::{Dribble, DribbleState, GetBehindBall, GetBehindBallState, Pass, PassState, PassVars};
pub use motion::{
    GoDir, GoDirArgs, GoDirState, GoTo, GoToArgs, GoToState, SetAction, SetActionArgs,
    SetActionState,
};
pub use roles::{
    Defender, DefenderDefs, DefenderState, Midfielder, MidfielderState, PlaySoccer,
    PlaySoccerState, Striker, StrikerDefs, StrikerState,
};

pub(crate) type T<'c, O> = Transition<'c, PlayerWorld, O>;
pub(crate) type A<'c, 'f, O> = ActionCx<'c, 'f, PlayerWorld, O>;

/// Name of the root option.
pub const ROOT: &str = <PlaySoccer as BehaviorOption<PlayerWorld>>::NAME;

/// Compiled-in content of `striker.cfg`.
pub const STRIKER_CFG: &str = "lead_distance: 8\nlane_y: 11\n";
/// Compiled-in content of `defender.cfg`.
pub const DEFENDER_CFG: &str = "own_ball_gap: 12\nopponent_ball_gap: 10\n";

/// Register the parameterless options by name and declare the rest.
pub fn soccer_registry() -> BehaviorResult<Registry<PlayerWorld>> {
    let mut registry = Registry::new();
    registry
        .register::<PlaySoccer>()?
        .register::<Striker>()?
        .register::<Midfielder>()?
        .register::<Defender>()?
        .register::<Pass>()?
        .register::<Dribble>()?
        .register::<GetBehindBall>()?
        .declare::<GoTo>()?
        .declare::<GoDir>()?
        .declare::<SetAction>()?;
    Ok(registry)
}

/// The definitions this crate ships with, for players without a config
/// directory.
pub fn builtin_definitions() -> MemorySource {
    MemorySource::new()
        .with(<Striker as BehaviorOption<PlayerWorld>>::NAME, STRIKER_CFG)
        .with(<Defender as BehaviorOption<PlayerWorld>>::NAME, DEFENDER_CFG)
}
