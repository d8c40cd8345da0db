//! The root option and the three roles it switches between.

use hb_engine::{BehaviorOption, BehaviorResult, DefinitionLoader, Definitions, DefsResult, states};

use super::ball::{Dribble, Pass};
use super::motion::GoTo;
use super::{A, T};
use crate::estimate::Role;
use crate::world::PlayerWorld;

/// Within this distance the midfielder plays the ball instead of chasing it.
const BALL_IN_REACH: f64 = 3.0;

// ── play_soccer ───────────────────────────────────────────────────────────────

states! {
    pub enum PlaySoccerState {
        Striker    => ("striker", Normal),
        Midfielder => ("midfielder", Initial),
        Defender   => ("defender", Normal),
    }
}

/// Root: play whatever role the team estimate assigned.
pub struct PlaySoccer;

impl BehaviorOption<PlayerWorld> for PlaySoccer {
    const NAME: &'static str = "play_soccer";
    const HAS_COMMON_TRANSITION: bool = true;
    type State = PlaySoccerState;
    type Args = ();
    type Defs = ();
    type Vars = ();

    fn common_transition(t: &mut T<'_, Self>) -> BehaviorResult<()> {
        let next = match t.world().role {
            Role::Striker => PlaySoccerState::Striker,
            Role::Defender => PlaySoccerState::Defender,
            Role::Midfielder => PlaySoccerState::Midfielder,
        };
        t.goto(next)
    }

    fn action(state: PlaySoccerState, cx: &mut A<'_, '_, Self>) -> BehaviorResult<()> {
        match state {
            PlaySoccerState::Striker => cx.call_default::<Striker>()?,
            PlaySoccerState::Midfielder => cx.call_default::<Midfielder>()?,
            PlaySoccerState::Defender => cx.call_default::<Defender>()?,
        };
        Ok(())
    }
}

// ── striker ───────────────────────────────────────────────────────────────────

/// Loaded from `striker.cfg`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StrikerDefs {
    /// How far west of the ball the striker waits.
    pub lead_distance: i32,
    /// Row the striker waits on.
    pub lane_y:        i32,
}

impl Definitions for StrikerDefs {
    fn init(loader: &DefinitionLoader<'_>) -> DefsResult<Self> {
        let kv = loader.load()?;
        Ok(Self {
            lead_distance: kv.get("lead_distance")?,
            lane_y:        kv.get("lane_y")?,
        })
    }
}

states! {
    pub enum StrikerState {
        Initial => ("initial", Initial),
    }
}

/// Wait ahead of the other players for a pass.
pub struct Striker;

impl BehaviorOption<PlayerWorld> for Striker {
    const NAME: &'static str = "striker";
    type State = StrikerState;
    type Args = ();
    type Defs = StrikerDefs;
    type Vars = ();

    fn action(_state: StrikerState, cx: &mut A<'_, '_, Self>) -> BehaviorResult<()> {
        let x = cx.world().ball_x - cx.defs().lead_distance;
        let y = cx.defs().lane_y;
        cx.call::<GoTo>(GoTo::args(x, y))?;
        Ok(())
    }
}

// ── midfielder ────────────────────────────────────────────────────────────────

states! {
    pub enum MidfielderState {
        GetToBall => ("get_to_ball", Initial),
        Pass      => ("pass", Normal),
        Dribble   => ("dribble", Normal),
    }
}

/// Chase the ball, then pass it or dribble it.
pub struct Midfielder;

impl BehaviorOption<PlayerWorld> for Midfielder {
    const NAME: &'static str = "midfielder";
    type State = MidfielderState;
    type Args = ();
    type Defs = ();
    type Vars = ();

    fn transition(state: MidfielderState, t: &mut T<'_, Self>) -> BehaviorResult<()> {
        let w = t.world();
        let in_reach = w.ball_distance <= BALL_IN_REACH;
        // Nobody west of the ball to pass to.
        let alone = w.most_westerly_teammate_x > w.ball_x + 2;
        match state {
            MidfielderState::GetToBall if in_reach && alone => t.goto(MidfielderState::Dribble),
            MidfielderState::GetToBall if in_reach => t.goto(MidfielderState::Pass),
            MidfielderState::Pass | MidfielderState::Dribble if !in_reach => {
                t.goto(MidfielderState::GetToBall)
            }
            _ => Ok(()),
        }
    }

    fn action(state: MidfielderState, cx: &mut A<'_, '_, Self>) -> BehaviorResult<()> {
        match state {
            MidfielderState::GetToBall => {
                let (x, y) = (cx.world().ball_x, cx.world().ball_y);
                cx.call::<GoTo>(GoTo::args(x, y))?
            }
            MidfielderState::Pass => cx.call_default::<Pass>()?,
            MidfielderState::Dribble => cx.call_default::<Dribble>()?,
        };
        Ok(())
    }
}

// ── defender ──────────────────────────────────────────────────────────────────

/// Loaded from `defender.cfg`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DefenderDefs {
    /// Columns east of the ball the defender keeps while the team has it.
    pub own_ball_gap:      i32,
    pub opponent_ball_gap: i32,
}

impl Definitions for DefenderDefs {
    fn init(loader: &DefinitionLoader<'_>) -> DefsResult<Self> {
        let kv = loader.load()?;
        Ok(Self {
            own_ball_gap:      kv.get("own_ball_gap")?,
            opponent_ball_gap: kv.get("opponent_ball_gap")?,
        })
    }
}

states! {
    pub enum DefenderState {
        OwnTeamHasBall      => ("own_team_has_ball", Initial),
        OpponentTeamHasBall => ("opponent_team_has_ball", Normal),
    }
}

/// Wait behind the ball, closer when the opponents have it.
pub struct Defender;

impl BehaviorOption<PlayerWorld> for Defender {
    const NAME: &'static str = "defender";
    type State = DefenderState;
    type Args = ();
    type Defs = DefenderDefs;
    type Vars = ();

    fn transition(state: DefenderState, t: &mut T<'_, Self>) -> BehaviorResult<()> {
        let w = t.world();
        // Some teammate is already west of the ball.
        let opponents_have_it = w.most_westerly_teammate_x < w.ball_x;
        match state {
            DefenderState::OwnTeamHasBall if opponents_have_it => t.goto(DefenderState::OpponentTeamHasBall),
            DefenderState::OpponentTeamHasBall if !opponents_have_it => t.goto(DefenderState::OwnTeamHasBall),
            _ => Ok(()),
        }
    }

    fn action(state: DefenderState, cx: &mut A<'_, '_, Self>) -> BehaviorResult<()> {
        let gap = match state {
            DefenderState::OwnTeamHasBall => cx.defs().own_ball_gap,
            DefenderState::OpponentTeamHasBall => cx.defs().opponent_ball_gap,
        };
        let (x, y) = (cx.world().ball_x + gap, cx.world().ball_y);
        cx.call::<GoTo>(GoTo::args(x, y))?;
        Ok(())
    }
}
