//! Movement primitives: `go_to`, `go_dir`, `set_action`.

use hb_engine::{BehaviorOption, BehaviorResult, OptionArgs, describe_arg, states};

use super::{A, T};
use crate::field::{Action, Direction, MAX_X, MAX_Y, MID_Y};
use crate::world::PlayerWorld;

// ── set_action ────────────────────────────────────────────────────────────────

states! {
    pub enum SetActionState {
        Set => ("set", Initial),
    }
}

#[derive(Clone, Debug, Default)]
pub struct SetActionArgs {
    pub action: Action,
}

impl OptionArgs for SetActionArgs {
    fn describe(&self, out: &mut Vec<String>) {
        describe_arg(out, "action", self.action);
    }
}

/// Writes the action the player performs this cycle.
pub struct SetAction;

impl SetAction {
    pub fn args(action: Action) -> SetActionArgs {
        SetActionArgs { action }
    }
}

impl BehaviorOption<PlayerWorld> for SetAction {
    const NAME: &'static str = "set_action";
    type State = SetActionState;
    type Args = SetActionArgs;
    type Defs = ();
    type Vars = ();

    fn action(_state: SetActionState, cx: &mut A<'_, '_, Self>) -> BehaviorResult<()> {
        let action = cx.args().action;
        cx.world_mut().next_action = action;
        Ok(())
    }
}

/// `set_action(action)` from inside another option's action.
pub(crate) fn set_action<O: BehaviorOption<PlayerWorld>>(
    cx:     &mut A<'_, '_, O>,
    action: Action,
) -> BehaviorResult<()> {
    cx.call::<SetAction>(SetAction::args(action))?;
    Ok(())
}

// ── go_dir ────────────────────────────────────────────────────────────────────

states! {
    pub enum GoDirState {
        IsEmpty   => ("is_empty", Initial),
        DoNothing => ("do_nothing", Normal),
        North     => ("north", Normal),
        NorthEast => ("north_east", Normal),
        East      => ("east", Normal),
        SouthEast => ("south_east", Normal),
        South     => ("south", Normal),
    }
}

#[derive(Clone, Debug, Default)]
pub struct GoDirArgs {
    pub dir: Direction,
}

impl OptionArgs for GoDirArgs {
    fn describe(&self, out: &mut Vec<String>) {
        describe_arg(out, "dir", self.dir);
    }
}

/// Step toward `dir`, sidestepping when that cell is taken.
pub struct GoDir;

impl BehaviorOption<PlayerWorld> for GoDir {
    const NAME: &'static str = "go_dir";
    const HAS_COMMON_TRANSITION: bool = true;
    type State = GoDirState;
    type Args = GoDirArgs;
    type Defs = ();
    type Vars = ();

    fn common_transition(t: &mut T<'_, Self>) -> BehaviorResult<()> {
        let dir = t.args().dir;
        let w = t.world();
        if w.area.is_empty(dir) {
            return t.goto(GoDirState::IsEmpty);
        }
        let free = |d: Direction| w.area.is_empty(d);
        let next = match dir {
            Direction::N if free(Direction::NE) => GoDirState::NorthEast,
            Direction::NE if free(Direction::E) => GoDirState::East,
            Direction::E if w.y < MID_Y && free(Direction::SE) => GoDirState::SouthEast,
            Direction::E if w.y >= MID_Y && free(Direction::NE) => GoDirState::NorthEast,
            Direction::SE if free(Direction::E) => GoDirState::East,
            Direction::S if free(Direction::SE) => GoDirState::SouthEast,
            Direction::SW if free(Direction::S) => GoDirState::South,
            Direction::NW if free(Direction::N) => GoDirState::North,
            _ => GoDirState::DoNothing,
        };
        t.goto(next)
    }

    fn action(state: GoDirState, cx: &mut A<'_, '_, Self>) -> BehaviorResult<()> {
        let action = match state {
            GoDirState::IsEmpty => Action::toward(cx.args().dir),
            GoDirState::DoNothing => Action::DoNothing,
            GoDirState::North => Action::N,
            GoDirState::NorthEast => Action::NE,
            GoDirState::East => Action::E,
            GoDirState::SouthEast => Action::SE,
            GoDirState::South => Action::S,
        };
        set_action(cx, action)
    }
}

// ── go_to ─────────────────────────────────────────────────────────────────────

states! {
    pub enum GoToState {
        DoNothing => ("do_nothing", Initial),
        NorthEast => ("north_east", Normal),
        NorthWest => ("north_west", Normal),
        SouthEast => ("south_east", Normal),
        SouthWest => ("south_west", Normal),
        East      => ("east", Normal),
        West      => ("west", Normal),
    }
}

#[derive(Clone, Debug, Default)]
pub struct GoToArgs {
    pub x: i32,
    pub y: i32,
}

impl OptionArgs for GoToArgs {
    fn describe(&self, out: &mut Vec<String>) {
        describe_arg(out, "x", self.x);
        describe_arg(out, "y", self.y);
    }
}

/// Walk to a pitch position without running through the ball from the
/// west.
pub struct GoTo;

impl GoTo {
    pub fn args(x: i32, y: i32) -> GoToArgs {
        GoToArgs { x, y }
    }
}

impl BehaviorOption<PlayerWorld> for GoTo {
    const NAME: &'static str = "go_to";
    const HAS_COMMON_TRANSITION: bool = true;
    type State = GoToState;
    type Args = GoToArgs;
    type Defs = ();
    type Vars = ();

    fn common_transition(t: &mut T<'_, Self>) -> BehaviorResult<()> {
        let (ball_x, ball_y, px, py) = {
            let w = t.world();
            (w.ball_x, w.ball_y, w.x, w.y)
        };
        let target = t.args_mut();
        target.x = target.x.clamp(1, MAX_X - 2);
        target.y = target.y.clamp(1, MAX_Y - 2);
        // Pass the ball on the side instead of pushing it east.
        if target.x < ball_x && target.y == ball_y {
            target.y += if target.y < MID_Y { 1 } else { -1 };
        }
        let (dx, dy) = (target.x - px, target.y - py);

        let steep = dx >= 0 || dx.abs() < dy.abs();
        let next = match dy.signum() {
            -1 if steep => GoToState::NorthEast,
            -1 => GoToState::NorthWest,
            1 if steep => GoToState::SouthEast,
            1 => GoToState::SouthWest,
            _ => match dx.signum() {
                1 => GoToState::East,
                -1 => GoToState::West,
                _ => GoToState::DoNothing,
            },
        };
        t.goto(next)
    }

    fn action(state: GoToState, cx: &mut A<'_, '_, Self>) -> BehaviorResult<()> {
        let dir = match state {
            GoToState::DoNothing => return set_action(cx, Action::DoNothing),
            GoToState::NorthEast => Direction::NE,
            GoToState::NorthWest => Direction::NW,
            GoToState::SouthEast => Direction::SE,
            GoToState::SouthWest => Direction::SW,
            GoToState::East => Direction::E,
            GoToState::West => Direction::W,
        };
        cx.call::<GoDir>(GoDirArgs { dir })?;
        Ok(())
    }
}
