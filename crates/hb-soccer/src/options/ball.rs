//! Ball handling: `get_behind_ball`, `dribble`, `pass`.

use hb_engine::{BehaviorOption, BehaviorResult, states};

use super::motion::set_action;
use super::{A, T};
use crate::field::{Action, Direction, MID_Y};
use crate::world::PlayerWorld;

/// Columns west of this count as in front of the opponent goal.
const NEAR_GOAL_X: i32 = 13;

// ── get_behind_ball ───────────────────────────────────────────────────────────

states! {
    pub enum GetBehindBallState {
        UseDirection => ("use_direction", Initial),
        North        => ("north", Normal),
        NorthEast    => ("north_east", Normal),
        East         => ("east", Normal),
        SouthEast    => ("south_east", Normal),
        South        => ("south", Normal),
        West         => ("west", Normal),
    }
}

/// Move so the ball ends up west of the player.
pub struct GetBehindBall;

impl BehaviorOption<PlayerWorld> for GetBehindBall {
    const NAME: &'static str = "get_behind_ball";
    const HAS_COMMON_TRANSITION: bool = true;
    type State = GetBehindBallState;
    type Args = ();
    type Defs = ();
    type Vars = ();

    fn common_transition(t: &mut T<'_, Self>) -> BehaviorResult<()> {
        use GetBehindBallState as S;

        let w = t.world();
        let Some(ball) = w.ball_local_direction else {
            return Ok(());
        };
        let next = match ball {
            Direction::E if w.y < MID_Y => S::SouthEast,
            Direction::E => S::NorthEast,
            Direction::SE | Direction::NE | Direction::Here => S::East,
            Direction::N if w.area.is_empty(Direction::NE) => S::NorthEast,
            Direction::S if w.area.is_empty(Direction::SE) => S::SouthEast,
            Direction::N | Direction::S => S::East,
            Direction::SW => S::South,
            Direction::NW => S::North,
            Direction::W => S::West,
        };
        t.goto(next)
    }

    fn action(state: GetBehindBallState, cx: &mut A<'_, '_, Self>) -> BehaviorResult<()> {
        use GetBehindBallState as S;

        let action = match state {
            S::UseDirection => Action::toward(cx.world().ball_direction),
            S::North => Action::N,
            S::NorthEast => Action::NE,
            S::East => Action::E,
            S::SouthEast => Action::SE,
            S::South => Action::S,
            S::West => Action::W,
        };
        set_action(cx, action)
    }
}

// ── dribble ───────────────────────────────────────────────────────────────────

states! {
    pub enum DribbleState {
        BehindBall             => ("behind_ball", Initial),
        BehindBallNearGoal     => ("behind_ball_near_opponent_goal", Normal),
        NotBehindBall          => ("not_behind_ball", Normal),
    }
}

/// Push the ball west without kicking, then kick in front of the goal.
pub struct Dribble;

impl BehaviorOption<PlayerWorld> for Dribble {
    const NAME: &'static str = "dribble";
    type State = DribbleState;
    type Args = ();
    type Defs = ();
    type Vars = ();

    fn transition(state: DribbleState, t: &mut T<'_, Self>) -> BehaviorResult<()> {
        let w = t.world();
        let behind = w.ball_local_direction == Some(Direction::W);
        let near_goal = w.x < NEAR_GOAL_X;
        match state {
            DribbleState::BehindBall if !behind => t.goto(DribbleState::NotBehindBall),
            DribbleState::BehindBall if near_goal => t.goto(DribbleState::BehindBallNearGoal),
            DribbleState::BehindBallNearGoal => t.goto(DribbleState::BehindBall),
            DribbleState::NotBehindBall if behind => t.goto(DribbleState::BehindBall),
            _ => Ok(()),
        }
    }

    fn action(state: DribbleState, cx: &mut A<'_, '_, Self>) -> BehaviorResult<()> {
        match state {
            DribbleState::BehindBall => set_action(cx, Action::W),
            DribbleState::BehindBallNearGoal => set_action(cx, Action::Kick),
            DribbleState::NotBehindBall => {
                cx.call_default::<GetBehindBall>()?;
                Ok(())
            }
        }
    }
}

// ── pass ──────────────────────────────────────────────────────────────────────

states! {
    pub enum PassState {
        GetBehindBall => ("get_behind_ball", Initial),
        Kick          => ("kick", Target),
    }
}

/// Kept while `pass` stays active.
#[derive(Debug, Default)]
pub struct PassVars {
    /// Kicks issued since the option was entered.
    pub kicks: u32,
}

/// Get behind the ball and kick it west toward a teammate.
pub struct Pass;

impl BehaviorOption<PlayerWorld> for Pass {
    const NAME: &'static str = "pass";
    type State = PassState;
    type Args = ();
    type Defs = ();
    type Vars = PassVars;

    fn transition(state: PassState, t: &mut T<'_, Self>) -> BehaviorResult<()> {
        use Direction::{N, NW, S, SW, W};

        let w = t.world();
        match state {
            PassState::GetBehindBall if w.ball_seen_at(&[NW, W, SW]) => t.goto(PassState::Kick),
            PassState::Kick if !w.ball_seen_at(&[N, NW, W, SW, S]) => t.goto(PassState::GetBehindBall),
            _ => Ok(()),
        }
    }

    fn action(state: PassState, cx: &mut A<'_, '_, Self>) -> BehaviorResult<()> {
        match state {
            PassState::GetBehindBall => {
                cx.call_default::<GetBehindBall>()?;
            }
            PassState::Kick => {
                cx.vars_mut().kicks += 1;
                tracing::trace!(player = cx.world().number, kicks = cx.vars().kicks, "pass kick");
                set_action(cx, Action::Kick)?;
            }
        }
        Ok(())
    }
}
