//! Unit tests for hb-engine.
//!
//! All tests drive real options over a small `TestWorld`; the fixtures
//! module holds the options shared by several topics.

#[cfg(test)]
mod fixtures {
    use std::sync::Arc;

    use crate::{
        ActionCx, Behavior, BehaviorBuilder, BehaviorOption, BehaviorResult, DefinitionLoader,
        Definitions, DefsResult, FrameTime, OptionArgs, Registry, StateId, Transition, describe_arg,
        states,
    };

    #[derive(Default)]
    pub struct TestWorld {
        pub flag:      bool,
        pub step_to_b: bool,
        pub step_stay: bool,
        pub hits:      Vec<&'static str>,
        pub gain:      i32,
    }

    pub type T<'c, O> = Transition<'c, TestWorld, O>;
    pub type A<'c, 'f, O> = ActionCx<'c, 'f, TestWorld, O>;

    // ── Helpers ───────────────────────────────────────────────────────────

    pub fn behavior(registry: Registry<TestWorld>) -> Behavior<TestWorld> {
        BehaviorBuilder::new(Arc::new(registry), TestWorld::default()).build()
    }

    pub fn standard_registry() -> Registry<TestWorld> {
        let mut r = Registry::new();
        r.register::<Counter>().unwrap()
            .register::<Quiet>().unwrap()
            .register::<Busy>().unwrap()
            .register::<Other>().unwrap()
            .register::<Leaver>().unwrap()
            .register::<Parent>().unwrap()
            .register::<Chooser>().unwrap()
            .declare::<Ping>().unwrap();
        r
    }

    /// One cycle at `t` running `f` between begin and end.
    pub fn cycle<R>(
        b: &mut Behavior<TestWorld>,
        t: u64,
        f: impl FnOnce(&mut Behavior<TestWorld>) -> R,
    ) -> R {
        b.begin_cycle(FrameTime(t)).unwrap();
        let out = f(&mut *b);
        b.end_cycle().unwrap();
        out
    }

    // ── Ping: idle → active on `flag` ─────────────────────────────────────

    states! {
        pub enum PingState {
            Idle   => ("idle", Initial),
            Active => ("active", Normal),
        }
    }

    #[derive(Default, Clone)]
    pub struct PingArgs {
        pub flag: bool,
    }

    impl OptionArgs for PingArgs {
        fn describe(&self, out: &mut Vec<String>) {
            describe_arg(out, "flag", self.flag);
        }
    }

    pub struct Ping;

    impl BehaviorOption<TestWorld> for Ping {
        const NAME: &'static str = "ping";
        type State = PingState;
        type Args = PingArgs;
        type Defs = ();
        type Vars = ();

        fn transition(state: PingState, t: &mut T<'_, Self>) -> BehaviorResult<()> {
            match state {
                PingState::Idle if t.args().flag => t.goto(PingState::Active),
                _ => Ok(()),
            }
        }

        fn action(state: PingState, cx: &mut A<'_, '_, Self>) -> BehaviorResult<()> {
            cx.world_mut().hits.push(state.name());
            Ok(())
        }
    }

    // ── Counter: variables ────────────────────────────────────────────────

    states! {
        pub enum CounterState {
            Counting => ("counting", Initial),
        }
    }

    #[derive(Default, Debug)]
    pub struct CounterVars {
        pub count: u32,
    }

    pub struct Counter;

    impl BehaviorOption<TestWorld> for Counter {
        const NAME: &'static str = "counter";
        type State = CounterState;
        type Args = ();
        type Defs = ();
        type Vars = CounterVars;

        fn action(_state: CounterState, cx: &mut A<'_, '_, Self>) -> BehaviorResult<()> {
            cx.vars_mut().count += 1;
            Ok(())
        }
    }

    // ── Stepper: A→B and A→A ──────────────────────────────────────────────

    states! {
        pub enum StepperState {
            A => ("a", Initial),
            B => ("b", Normal),
        }
    }

    pub struct Stepper;

    impl BehaviorOption<TestWorld> for Stepper {
        const NAME: &'static str = "stepper";
        type State = StepperState;
        type Args = ();
        type Defs = ();
        type Vars = ();

        fn transition(state: StepperState, t: &mut T<'_, Self>) -> BehaviorResult<()> {
            let (to_b, stay) = (t.world().step_to_b, t.world().step_stay);
            match state {
                StepperState::A if to_b => t.goto(StepperState::B),
                s if stay => t.goto(s),
                _ => Ok(()),
            }
        }
    }

    // ── Clash: common + state transition both change state ────────────────

    states! {
        pub enum ClashState {
            X => ("x", Initial),
            Y => ("y", Normal),
            Z => ("z", Normal),
        }
    }

    pub struct Clash;

    impl BehaviorOption<TestWorld> for Clash {
        const NAME: &'static str = "clash";
        const HAS_COMMON_TRANSITION: bool = true;
        type State = ClashState;
        type Args = ();
        type Defs = ();
        type Vars = ();

        fn common_transition(t: &mut T<'_, Self>) -> BehaviorResult<()> {
            if t.world().flag {
                t.goto(ClashState::Y)?;
            }
            Ok(())
        }

        fn transition(state: ClashState, t: &mut T<'_, Self>) -> BehaviorResult<()> {
            match state {
                ClashState::Y => t.goto(ClashState::Z),
                _ => Ok(()),
            }
        }
    }

    // ── Stray: common transition without declaring one ────────────────────

    pub struct Stray;

    impl BehaviorOption<TestWorld> for Stray {
        const NAME: &'static str = "stray";
        type State = ClashState;
        type Args = ();
        type Defs = ();
        type Vars = ();

        fn common_transition(t: &mut T<'_, Self>) -> BehaviorResult<()> {
            t.goto(ClashState::Y)
        }
    }

    // ── Selector candidates ───────────────────────────────────────────────

    states! {
        pub enum QuietState {
            Wait => ("wait", Initial, no_action),
        }
    }

    /// Never leaves its actionless initial state.
    pub struct Quiet;

    impl BehaviorOption<TestWorld> for Quiet {
        const NAME: &'static str = "quiet";
        type State = QuietState;
        type Args = ();
        type Defs = ();
        type Vars = ();
    }

    states! {
        pub enum RunState {
            Run => ("run", Initial),
        }
    }

    /// Stays initial but has an action.
    pub struct Busy;

    impl BehaviorOption<TestWorld> for Busy {
        const NAME: &'static str = "busy";
        type State = RunState;
        type Args = ();
        type Defs = ();
        type Vars = ();

        fn action(_state: RunState, cx: &mut A<'_, '_, Self>) -> BehaviorResult<()> {
            cx.world_mut().hits.push("busy");
            Ok(())
        }
    }

    pub struct Other;

    impl BehaviorOption<TestWorld> for Other {
        const NAME: &'static str = "other";
        type State = RunState;
        type Args = ();
        type Defs = ();
        type Vars = ();

        fn action(_state: RunState, cx: &mut A<'_, '_, Self>) -> BehaviorResult<()> {
            cx.world_mut().hits.push("other");
            Ok(())
        }
    }

    states! {
        pub enum LeaverState {
            Start => ("start", Initial, no_action),
            Moved => ("moved", Normal, no_action),
        }
    }

    /// Leaves its initial state immediately.
    pub struct Leaver;

    impl BehaviorOption<TestWorld> for Leaver {
        const NAME: &'static str = "leaver";
        type State = LeaverState;
        type Args = ();
        type Defs = ();
        type Vars = ();

        fn transition(state: LeaverState, t: &mut T<'_, Self>) -> BehaviorResult<()> {
            match state {
                LeaverState::Start => t.goto(LeaverState::Moved),
                LeaverState::Moved => Ok(()),
            }
        }
    }

    // ── Parent / Child: trace order ───────────────────────────────────────

    pub struct Parent;

    impl BehaviorOption<TestWorld> for Parent {
        const NAME: &'static str = "parent";
        type State = RunState;
        type Args = ();
        type Defs = ();
        type Vars = ();

        fn action(_state: RunState, cx: &mut A<'_, '_, Self>) -> BehaviorResult<()> {
            cx.call_default::<Child>()?;
            Ok(())
        }
    }

    pub struct Child;

    impl BehaviorOption<TestWorld> for Child {
        const NAME: &'static str = "child";
        type State = RunState;
        type Args = ();
        type Defs = ();
        type Vars = ();

        fn action(_state: RunState, cx: &mut A<'_, '_, Self>) -> BehaviorResult<()> {
            cx.world_mut().hits.push("child");
            Ok(())
        }
    }

    /// Runs the selector from inside an action.
    pub struct Chooser;

    impl BehaviorOption<TestWorld> for Chooser {
        const NAME: &'static str = "chooser";
        type State = RunState;
        type Args = ();
        type Defs = ();
        type Vars = ();

        fn action(_state: RunState, cx: &mut A<'_, '_, Self>) -> BehaviorResult<()> {
            if cx.select_first(&["quiet", "busy", "other"])? {
                cx.world_mut().hits.push("chose");
            }
            Ok(())
        }
    }

    // ── Boss / Worker: action_done ────────────────────────────────────────

    states! {
        pub enum BossState {
            Delegate => ("delegate", Initial),
            Finished => ("finished", Target, no_action),
        }
    }

    pub struct Boss;

    impl BehaviorOption<TestWorld> for Boss {
        const NAME: &'static str = "boss";
        type State = BossState;
        type Args = ();
        type Defs = ();
        type Vars = ();

        fn transition(state: BossState, t: &mut T<'_, Self>) -> BehaviorResult<()> {
            match state {
                BossState::Delegate if t.action_done() => t.goto(BossState::Finished),
                _ => Ok(()),
            }
        }

        fn action(_state: BossState, cx: &mut A<'_, '_, Self>) -> BehaviorResult<()> {
            let kind = cx.call_default::<Worker>()?;
            cx.world_mut().hits.push(kind.as_str());
            Ok(())
        }
    }

    states! {
        pub enum WorkerState {
            Working => ("working", Initial),
            Done    => ("done", Target),
        }
    }

    pub struct Worker;

    impl BehaviorOption<TestWorld> for Worker {
        const NAME: &'static str = "worker";
        type State = WorkerState;
        type Args = ();
        type Defs = ();
        type Vars = ();

        fn transition(state: WorkerState, t: &mut T<'_, Self>) -> BehaviorResult<()> {
            match state {
                WorkerState::Working if t.option_time() >= 1 => t.goto(WorkerState::Done),
                _ => Ok(()),
            }
        }
    }

    // ── Manager / Quitter: action_aborted ─────────────────────────────────

    states! {
        pub enum ManagerState {
            Delegate => ("delegate", Initial),
            Recover  => ("recover", Normal, no_action),
        }
    }

    pub struct Manager;

    impl BehaviorOption<TestWorld> for Manager {
        const NAME: &'static str = "manager";
        type State = ManagerState;
        type Args = ();
        type Defs = ();
        type Vars = ();

        fn transition(state: ManagerState, t: &mut T<'_, Self>) -> BehaviorResult<()> {
            match state {
                ManagerState::Delegate if t.action_aborted() => t.goto(ManagerState::Recover),
                _ => Ok(()),
            }
        }

        fn action(_state: ManagerState, cx: &mut A<'_, '_, Self>) -> BehaviorResult<()> {
            let kind = cx.call_default::<Quitter>()?;
            cx.world_mut().hits.push(kind.as_str());
            Ok(())
        }
    }

    states! {
        pub enum QuitterState {
            Trying => ("trying", Initial),
            GaveUp => ("gave_up", Aborted),
        }
    }

    pub struct Quitter;

    impl BehaviorOption<TestWorld> for Quitter {
        const NAME: &'static str = "quitter";
        type State = QuitterState;
        type Args = ();
        type Defs = ();
        type Vars = ();

        fn transition(state: QuitterState, t: &mut T<'_, Self>) -> BehaviorResult<()> {
            match state {
                QuitterState::Trying if t.option_time() >= 1 => t.goto(QuitterState::GaveUp),
                _ => Ok(()),
            }
        }
    }

    // ── Lookout / Scout / Arrive: sub-option result under the selector ────

    /// Selects `scout`, which stays initial but acts.
    pub struct Lookout;

    impl BehaviorOption<TestWorld> for Lookout {
        const NAME: &'static str = "lookout";
        type State = RunState;
        type Args = ();
        type Defs = ();
        type Vars = ();

        fn action(_state: RunState, cx: &mut A<'_, '_, Self>) -> BehaviorResult<()> {
            cx.select_first(&["scout"])?;
            Ok(())
        }
    }

    /// Notes whether its last sub-option was done, then calls `arrive`.
    pub struct Scout;

    impl BehaviorOption<TestWorld> for Scout {
        const NAME: &'static str = "scout";
        type State = RunState;
        type Args = ();
        type Defs = ();
        type Vars = ();

        fn action(_state: RunState, cx: &mut A<'_, '_, Self>) -> BehaviorResult<()> {
            if cx.action_done() {
                cx.world_mut().hits.push("scout saw done");
            }
            cx.call_default::<Arrive>()?;
            Ok(())
        }
    }

    states! {
        pub enum ArriveState {
            Go      => ("go", Initial, no_action),
            Arrived => ("arrived", Target, no_action),
        }
    }

    pub struct Arrive;

    impl BehaviorOption<TestWorld> for Arrive {
        const NAME: &'static str = "arrive";
        type State = ArriveState;
        type Args = ();
        type Defs = ();
        type Vars = ();

        fn transition(state: ArriveState, t: &mut T<'_, Self>) -> BehaviorResult<()> {
            match state {
                ArriveState::Go => t.goto(ArriveState::Arrived),
                ArriveState::Arrived => Ok(()),
            }
        }
    }

    pub fn lookout_registry() -> Registry<TestWorld> {
        let mut r = Registry::new();
        r.register::<Lookout>().unwrap().register::<Scout>().unwrap();
        r
    }

    // ── Swallow: discards a failing sub-call ──────────────────────────────

    pub struct Swallow;

    impl BehaviorOption<TestWorld> for Swallow {
        const NAME: &'static str = "swallow";
        type State = RunState;
        type Args = ();
        type Defs = ();
        type Vars = ();

        fn action(_state: RunState, cx: &mut A<'_, '_, Self>) -> BehaviorResult<()> {
            let clash = cx.call_default::<Clash>();
            cx.world_mut().hits.push(if clash.is_err() { "clash failed" } else { "clash ran" });
            cx.call_default::<Child>()?;
            Ok(())
        }
    }

    // ── Looping: calls itself ─────────────────────────────────────────────

    pub struct Looping;

    impl BehaviorOption<TestWorld> for Looping {
        const NAME: &'static str = "looping";
        type State = RunState;
        type Args = ();
        type Defs = ();
        type Vars = ();

        fn action(_state: RunState, cx: &mut A<'_, '_, Self>) -> BehaviorResult<()> {
            cx.call_default::<Looping>()?;
            Ok(())
        }
    }

    // ── Tuned: loaded definitions ─────────────────────────────────────────

    #[derive(Debug)]
    pub struct TunedDefs {
        pub gain:      i32,
        pub refreshed: u32,
        pub last:      Option<FrameTime>,
    }

    impl Definitions for TunedDefs {
        fn init(loader: &DefinitionLoader<'_>) -> DefsResult<Self> {
            let kv = loader.load()?;
            Ok(Self { gain: kv.get("gain")?, refreshed: 0, last: None })
        }

        fn refresh(&mut self, now: FrameTime) {
            self.refreshed += 1;
            self.last = Some(now);
        }
    }

    pub struct Tuned;

    impl BehaviorOption<TestWorld> for Tuned {
        const NAME: &'static str = "tuned";
        type State = RunState;
        type Args = ();
        type Defs = TunedDefs;
        type Vars = ();

        fn action(_state: RunState, cx: &mut A<'_, '_, Self>) -> BehaviorResult<()> {
            let gain = cx.defs().gain;
            cx.world_mut().gain = gain;
            Ok(())
        }
    }

    // ── Aim: described arguments ──────────────────────────────────────────

    #[derive(Default, Clone)]
    pub struct AimArgs {
        pub x: i32,
        pub y: i32,
    }

    impl OptionArgs for AimArgs {
        fn describe(&self, out: &mut Vec<String>) {
            describe_arg(out, "x", self.x);
            describe_arg(out, "y", self.y);
        }
    }

    pub struct Aim;

    impl BehaviorOption<TestWorld> for Aim {
        const NAME: &'static str = "aim";
        type State = RunState;
        type Args = AimArgs;
        type Defs = ();
        type Vars = ();
    }
}

// ── States ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod states {
    use super::fixtures::*;
    use crate::{BehaviorError, BehaviorOption, BehaviorResult, Registry, StateId, StateKind, states};

    states! {
        enum Headless {
            Only => ("only", Normal),
        }
    }

    states! {
        enum TwoHeads {
            First  => ("first", Initial),
            Second => ("second", Initial),
        }
    }

    struct NoInit;

    impl BehaviorOption<TestWorld> for NoInit {
        const NAME: &'static str = "no_init";
        type State = Headless;
        type Args = ();
        type Defs = ();
        type Vars = ();
    }

    struct TooMany;

    impl BehaviorOption<TestWorld> for TooMany {
        const NAME: &'static str = "too_many";
        type State = TwoHeads;
        type Args = ();
        type Defs = ();
        type Vars = ();

        fn action(_state: TwoHeads, _cx: &mut A<'_, '_, Self>) -> BehaviorResult<()> {
            Ok(())
        }
    }

    #[test]
    fn macro_generates_state_id() {
        assert_eq!(PingState::ALL, &[PingState::Idle, PingState::Active]);
        assert_eq!(PingState::Idle.name(), "idle");
        assert_eq!(PingState::Idle.kind(), StateKind::Initial);
        assert_eq!(PingState::Active.kind(), StateKind::Normal);
        assert!(PingState::Active.has_action());
        assert!(!QuietState::Wait.has_action());
        assert_eq!(BossState::Finished.kind(), StateKind::Target);
    }

    #[test]
    fn missing_initial_state_rejected() {
        let err = Registry::<TestWorld>::new().register::<NoInit>().err().unwrap();
        assert!(matches!(err, BehaviorError::MissingInitialState { option: "no_init" }));
    }

    #[test]
    fn multiple_initial_states_rejected() {
        let err = Registry::<TestWorld>::new().declare::<TooMany>().err().unwrap();
        assert!(matches!(err, BehaviorError::MultipleInitialStates { count: 2, .. }));
    }

    #[test]
    fn unregistered_option_without_initial_fails_on_first_call() {
        let mut b = behavior(Registry::new());
        b.begin_cycle(crate::FrameTime(0)).unwrap();
        let err = b.execute_option::<NoInit>(()).unwrap_err();
        assert!(matches!(err, BehaviorError::MissingInitialState { .. }));
        assert!(b.is_poisoned());
    }
}

// ── Context lifecycle ─────────────────────────────────────────────────────────

#[cfg(test)]
mod lifecycle {
    use super::fixtures::*;
    use crate::{FrameTime, Registry, StateKind};

    #[test]
    fn first_call_starts_in_initial_state_with_zero_times() {
        let mut b = behavior(Registry::new());
        assert!(b.context_snapshot::<Ping>().is_none());

        cycle(&mut b, 7, |b| b.execute_option::<Ping>(PingArgs::default()).unwrap());

        let snap = b.context_snapshot::<Ping>().unwrap();
        assert_eq!(snap.state, "idle");
        assert_eq!(snap.kind, StateKind::Initial);
        assert_eq!(snap.option_time(FrameTime(7)), 0);
        assert_eq!(snap.state_time(FrameTime(7)), 0);
        assert_eq!(snap.last_active, Some(FrameTime(7)));
    }

    #[test]
    fn ping_scenario() {
        let mut b = behavior(Registry::new());
        let mut states = Vec::new();
        let mut active_state_times = Vec::new();
        let mut option_times = Vec::new();

        for (t, flag) in [false, true, true].into_iter().enumerate() {
            cycle(&mut b, t as u64, |b| b.execute_option::<Ping>(PingArgs { flag }).unwrap());
            let node = b.activation_graph().find("ping").unwrap();
            states.push(node.state);
            active_state_times.push((node.state == "active").then_some(node.state_time));
            option_times.push(node.option_time);
        }

        assert_eq!(states, ["idle", "active", "active"]);
        assert_eq!(active_state_times, [None, Some(0), Some(1)]);
        assert_eq!(option_times, [0, 1, 2]);
    }

    #[test]
    fn skipped_cycle_forces_cold_reentry() {
        let mut b = behavior(Registry::new());
        for t in 0..4 {
            cycle(&mut b, t, |b| b.execute_option::<Ping>(PingArgs { flag: true }).unwrap());
        }
        assert_eq!(b.context_snapshot::<Ping>().unwrap().state, "active");

        // Cycle 4: not called.
        cycle(&mut b, 4, |_| ());

        cycle(&mut b, 5, |b| b.execute_option::<Ping>(PingArgs { flag: false }).unwrap());
        let snap = b.context_snapshot::<Ping>().unwrap();
        assert_eq!(snap.state, "idle");
        assert_eq!(snap.option_start, FrameTime(5));
        assert_eq!(snap.state_start, FrameTime(5));
    }

    #[test]
    fn consecutive_calls_keep_option_time_running() {
        let mut b = behavior(Registry::new());
        for t in 10..15 {
            cycle(&mut b, t, |b| b.execute_option::<Ping>(PingArgs::default()).unwrap());
        }
        let node = b.activation_graph().find("ping").unwrap();
        assert_eq!(node.option_time, 4);
        assert_eq!(node.state_time, 4);
    }

    #[test]
    fn variables_persist_then_reset_after_a_gap() {
        let mut b = behavior(standard_registry());
        for t in 0..5 {
            cycle(&mut b, t, |b| b.execute_root("counter").unwrap());
        }
        assert_eq!(b.variables::<Counter>().unwrap().count, 5);

        cycle(&mut b, 5, |_| ());
        assert_eq!(b.variables::<Counter>().unwrap().count, 5);

        cycle(&mut b, 6, |b| b.execute_root("counter").unwrap());
        assert_eq!(b.variables::<Counter>().unwrap().count, 1);
    }

    #[test]
    fn state_change_resets_state_time_only() {
        let mut b = behavior(Registry::new());
        cycle(&mut b, 0, |b| b.execute_option::<Stepper>(()).unwrap());

        // A -> A: state time keeps counting.
        b.world_mut().step_stay = true;
        cycle(&mut b, 1, |b| b.execute_option::<Stepper>(()).unwrap());
        let snap = b.context_snapshot::<Stepper>().unwrap();
        assert_eq!(snap.state, "a");
        assert_eq!(snap.state_time(FrameTime(1)), 1);

        // A -> B: state time restarts, option time does not.
        b.world_mut().step_stay = false;
        b.world_mut().step_to_b = true;
        cycle(&mut b, 2, |b| b.execute_option::<Stepper>(()).unwrap());
        let snap = b.context_snapshot::<Stepper>().unwrap();
        assert_eq!(snap.state, "b");
        assert_eq!(snap.state_time(FrameTime(2)), 0);
        assert_eq!(snap.option_time(FrameTime(2)), 2);

        // B -> B.
        b.world_mut().step_to_b = false;
        b.world_mut().step_stay = true;
        cycle(&mut b, 3, |b| b.execute_option::<Stepper>(()).unwrap());
        let node = b.activation_graph().find("stepper").unwrap();
        assert_eq!((node.state, node.state_time, node.option_time), ("b", 1, 3));
    }

    #[test]
    fn action_done_reflects_last_sub_option() {
        let mut b = behavior(Registry::new());
        let kinds: Vec<StateKind> = (0..3)
            .map(|t| cycle(&mut b, t, |b| b.execute_option::<Boss>(()).unwrap()))
            .collect();

        assert_eq!(kinds, [StateKind::Initial, StateKind::Initial, StateKind::Target]);
        // What `call` returned to the boss in cycles 0 and 1.
        assert_eq!(b.world().hits, ["initial", "target"]);
        assert_eq!(b.context_snapshot::<Boss>().unwrap().state, "finished");
    }

    #[test]
    fn action_aborted_reflects_last_sub_option() {
        let mut b = behavior(Registry::new());
        for t in 0..3 {
            cycle(&mut b, t, |b| b.execute_option::<Manager>(()).unwrap());
        }

        assert_eq!(b.world().hits, ["initial", "aborted"]);
        let snap = b.context_snapshot::<Manager>().unwrap();
        assert_eq!(snap.state, "recover");
        assert_eq!(snap.sub_option_kind, StateKind::Normal);
        assert_eq!(b.context_snapshot::<Quitter>().unwrap().state, "gave_up");
    }
}

// ── Transition exclusivity ────────────────────────────────────────────────────

#[cfg(test)]
mod transitions {
    use super::fixtures::*;
    use crate::{BehaviorError, FrameTime, Registry};

    #[test]
    fn common_transition_alone_is_accepted() {
        let mut b = behavior(Registry::new());
        cycle(&mut b, 0, |b| b.execute_option::<Clash>(()).unwrap());
        assert_eq!(b.context_snapshot::<Clash>().unwrap().state, "x");
    }

    #[test]
    fn common_and_state_transition_both_changing_state_is_fatal() {
        let mut b = behavior(Registry::new());
        b.world_mut().flag = true;
        b.begin_cycle(FrameTime(0)).unwrap();

        let err = b.execute_option::<Clash>(()).unwrap_err();
        assert!(
            matches!(err, BehaviorError::TransitionConflict { option: "clash", from: "y", to: "z" }),
            "{err}"
        );
        assert!(err.is_fatal());
        assert!(b.is_poisoned());

        b.end_cycle().unwrap();
        let err = b.begin_cycle(FrameTime(1)).unwrap_err();
        assert!(matches!(err, BehaviorError::Poisoned { .. }));
    }

    #[test]
    fn goto_from_undeclared_common_transition_is_fatal() {
        let mut b = behavior(Registry::new());
        b.begin_cycle(FrameTime(0)).unwrap();
        let err = b.execute_option::<Stray>(()).unwrap_err();
        assert!(matches!(err, BehaviorError::MisplacedTransition { option: "stray", to: "y" }));
    }

    #[test]
    fn poisoned_instance_rejects_calls_until_reset() {
        let mut b = behavior(standard_registry());
        b.world_mut().flag = true;
        b.begin_cycle(FrameTime(0)).unwrap();
        assert!(b.execute_option::<Clash>(()).is_err());
        assert!(matches!(b.execute_root("counter"), Err(BehaviorError::Poisoned { .. })));
        b.end_cycle().unwrap();

        b.reset();
        b.world_mut().flag = false;
        assert!(!b.is_poisoned());
        cycle(&mut b, 0, |b| b.execute_option::<Clash>(()).unwrap());
    }

    #[test]
    fn reentrant_call_is_fatal() {
        let mut b = behavior(Registry::new());
        b.begin_cycle(FrameTime(0)).unwrap();
        let err = b.execute_option::<Looping>(()).unwrap_err();
        assert!(matches!(err, BehaviorError::ReentrantCall { option: "looping" }));
    }

    #[test]
    fn discarded_conflict_still_poisons() {
        let mut b = behavior(Registry::new());
        b.world_mut().flag = true;
        b.begin_cycle(FrameTime(0)).unwrap();

        let err = b.execute_option::<Swallow>(()).unwrap_err();
        assert!(matches!(err, BehaviorError::Poisoned { .. }), "{err}");
        assert!(err.to_string().contains("after a transition was already taken"), "{err}");
        assert!(b.is_poisoned());
        b.end_cycle().unwrap();

        // The caller kept going at the right depth.
        assert_eq!(b.world().hits, ["clash failed", "child"]);
        let graph = b.activation_graph();
        assert_eq!(graph.option_names(), ["swallow", "child"]);
        assert_eq!(graph.find("child").unwrap().depth, 2);

        // The failed call returned its context.
        assert!(b.context_snapshot::<Clash>().is_some());
        assert!(matches!(b.begin_cycle(FrameTime(1)), Err(BehaviorError::Poisoned { .. })));
    }

    #[test]
    fn failed_call_leaves_option_callable_after_reset() {
        let mut b = behavior(Registry::new());
        b.world_mut().flag = true;
        b.begin_cycle(FrameTime(0)).unwrap();
        assert!(b.execute_option::<Swallow>(()).is_err());
        b.end_cycle().unwrap();

        b.reset();
        b.world_mut().flag = false;
        b.world_mut().hits.clear();
        cycle(&mut b, 0, |b| b.execute_option::<Swallow>(()).unwrap());
        cycle(&mut b, 1, |b| b.execute_option::<Clash>(()).unwrap());
        assert_eq!(b.world().hits, ["clash ran", "child"]);
        assert!(!b.is_poisoned());
    }
}

// ── Registry & selector ───────────────────────────────────────────────────────

#[cfg(test)]
mod selector {
    use super::fixtures::*;
    use crate::{BehaviorError, BehaviorOption, FrameTime, Registry, StateKind};

    struct BusyTwin;

    impl BehaviorOption<TestWorld> for BusyTwin {
        const NAME: &'static str = "busy";
        type State = RunState;
        type Args = ();
        type Defs = ();
        type Vars = ();
    }

    #[test]
    fn duplicate_names_rejected() {
        let mut r = Registry::<TestWorld>::new();
        r.register::<Busy>().unwrap();
        assert!(matches!(r.register::<Busy>(), Err(BehaviorError::DuplicateOption { name: "busy" })));
        assert!(matches!(r.declare::<BusyTwin>(), Err(BehaviorError::DuplicateOption { .. })));
    }

    #[test]
    fn declared_options_are_not_callable_by_name() {
        let r = standard_registry();
        assert!(r.contains("counter"));
        assert!(!r.contains("ping"));
        assert_eq!(r.names().last(), Some("ping"));

        let mut b = behavior(r);
        assert!(!cycle(&mut b, 0, |b| b.execute_root("ping").unwrap()));
        assert!(b.context_snapshot::<Ping>().is_none());
    }

    #[test]
    fn unknown_name_is_not_executed() {
        let mut b = behavior(standard_registry());
        assert!(!cycle(&mut b, 0, |b| b.execute_root("ghost").unwrap()));
        assert!(!b.is_poisoned());
        assert!(b.activation_graph().is_empty());
    }

    #[test]
    fn execute_root_reports_leaving_initial() {
        let mut b = behavior(standard_registry());
        let (busy, leaver) = cycle(&mut b, 0, |b| {
            (b.execute_root("busy").unwrap(), b.execute_root("leaver").unwrap())
        });
        assert!(!busy);
        assert!(leaver);
    }

    #[test]
    fn actionless_initial_candidate_is_skipped() {
        let mut b = behavior(standard_registry());
        let picked = cycle(&mut b, 0, |b| b.select_root(&["quiet", "busy", "other"]).unwrap());

        assert_eq!(picked, Some("busy"));
        assert_eq!(b.world().hits, ["busy"]);
        assert!(b.context_snapshot::<Other>().is_none());
        assert_eq!(b.activation_graph().option_names(), ["busy"]);
    }

    #[test]
    fn initial_candidate_with_action_is_selected() {
        let mut b = behavior(standard_registry());
        let picked = cycle(&mut b, 0, |b| b.select_root(&["busy", "other", "quiet"]).unwrap());

        assert_eq!(picked, Some("busy"));
        assert_eq!(b.world().hits, ["busy"]);
        assert!(b.context_snapshot::<Other>().is_none());
        assert!(b.context_snapshot::<Quiet>().is_none());
    }

    #[test]
    fn candidate_leaving_initial_is_selected() {
        let mut b = behavior(standard_registry());
        let picked = cycle(&mut b, 0, |b| b.select_root(&["quiet", "leaver", "busy"]).unwrap());
        assert_eq!(picked, Some("leaver"));
        assert!(b.world().hits.is_empty());
    }

    #[test]
    fn unknown_candidates_are_skipped() {
        let mut b = behavior(standard_registry());
        let picked = cycle(&mut b, 0, |b| b.select_root(&["ghost", "busy"]).unwrap());
        assert_eq!(picked, Some("busy"));

        let none = cycle(&mut b, 1, |b| b.select_root(&["ghost", "quiet"]).unwrap());
        assert_eq!(none, None);
    }

    #[test]
    fn selected_initial_option_does_not_age() {
        let mut b = behavior(standard_registry());
        for t in 0..3 {
            cycle(&mut b, t, |b| b.select_root(&["busy"]).unwrap());
            let node = b.activation_graph().find("busy").unwrap();
            assert_eq!((node.option_time, node.state_time), (0, 0));
        }
        let snap = b.context_snapshot::<Busy>().unwrap();
        assert_eq!(snap.last_active, None);
        assert_eq!(snap.last_selected, Some(FrameTime(2)));
    }

    #[test]
    fn selector_inside_action() {
        let mut b = behavior(standard_registry());
        cycle(&mut b, 0, |b| b.execute_root("chooser").unwrap());

        assert_eq!(b.world().hits, ["busy", "chose"]);
        let nodes = b.activation_graph().nodes();
        assert_eq!(nodes.len(), 2);
        assert_eq!((nodes[0].option, nodes[0].depth), ("chooser", 1));
        assert_eq!((nodes[1].option, nodes[1].depth), ("busy", 2));
    }

    #[test]
    fn selected_initial_option_keeps_sub_option_result() {
        let mut b = behavior(lookout_registry());
        cycle(&mut b, 0, |b| b.execute_root("lookout").unwrap());
        let snap = b.context_snapshot::<Scout>().unwrap();
        assert_eq!(snap.last_active, None);
        assert_eq!(snap.sub_option_kind, StateKind::Target);

        // Cold again (never active), but selected last cycle.
        cycle(&mut b, 1, |b| b.execute_root("lookout").unwrap());
        assert_eq!(b.world().hits, ["scout saw done"]);
        assert_eq!(b.context_snapshot::<Scout>().unwrap().option_start, FrameTime(1));
    }

    #[test]
    fn sub_option_result_cleared_after_a_gap() {
        let mut b = behavior(lookout_registry());
        cycle(&mut b, 0, |b| b.execute_root("lookout").unwrap());
        cycle(&mut b, 1, |_| ());
        cycle(&mut b, 2, |_| ());
        cycle(&mut b, 3, |b| b.execute_root("lookout").unwrap());

        assert!(b.world().hits.is_empty());
        let snap = b.context_snapshot::<Scout>().unwrap();
        assert_eq!(snap.last_selected, Some(FrameTime(3)));
        assert_eq!(snap.sub_option_kind, StateKind::Target);
    }
}

// ── Activation graph ──────────────────────────────────────────────────────────

#[cfg(test)]
mod activation {
    use std::sync::Arc;

    use super::fixtures::*;
    use crate::{
        ActivationGraph, BehaviorBuilder, BehaviorError, CycleObserver, FrameTime, InstanceId,
        Registry,
    };

    #[test]
    fn parent_recorded_before_child() {
        let mut b = behavior(standard_registry());
        cycle(&mut b, 0, |b| b.execute_root("parent").unwrap());

        let graph = b.activation_graph();
        assert_eq!(graph.option_names(), ["parent", "child"]);
        assert_eq!(graph.nodes()[0].depth, 1);
        assert_eq!(graph.nodes()[1].depth, 2);
    }

    #[test]
    fn repeated_call_in_one_cycle_recorded_once() {
        let mut b = behavior(standard_registry());
        cycle(&mut b, 0, |b| {
            b.execute_root("parent").unwrap();
            b.execute_root("parent").unwrap();
        });
        assert_eq!(b.activation_graph().option_names(), ["parent", "child"]);
        assert_eq!(b.world().hits, ["child", "child"]);
    }

    #[test]
    fn graph_replaced_every_cycle() {
        let mut b = behavior(standard_registry());
        cycle(&mut b, 0, |b| b.execute_root("parent").unwrap());
        cycle(&mut b, 1, |b| b.execute_root("counter").unwrap());
        assert_eq!(b.activation_graph().option_names(), ["counter"]);
    }

    #[test]
    fn arguments_are_described() {
        let mut b = behavior(Registry::new());
        cycle(&mut b, 0, |b| b.execute_option::<Aim>(AimArgs { x: 1, y: -2 }).unwrap());
        let node = b.activation_graph().find("aim").unwrap();
        assert_eq!(node.arguments, ["x = 1", "y = -2"]);
    }

    #[test]
    fn recording_can_be_disabled() {
        let registry = Arc::new(standard_registry());
        let mut b = BehaviorBuilder::new(registry, TestWorld::default())
            .record_activation(false)
            .build();
        cycle(&mut b, 0, |b| b.execute_root("parent").unwrap());
        assert!(b.activation_graph().is_empty());
        assert_eq!(b.world().hits, ["child"]);
    }

    #[derive(Default)]
    struct Collect {
        starts: Vec<FrameTime>,
        ends:   Vec<(InstanceId, FrameTime, Vec<&'static str>)>,
    }

    impl CycleObserver for Collect {
        fn on_cycle_start(&mut self, _instance: InstanceId, now: FrameTime) {
            self.starts.push(now);
        }

        fn on_cycle_end(&mut self, instance: InstanceId, now: FrameTime, graph: &ActivationGraph) {
            self.ends.push((instance, now, graph.option_names()));
        }
    }

    #[test]
    fn run_cycle_notifies_observer() {
        let mut b = BehaviorBuilder::new(Arc::new(standard_registry()), TestWorld::default())
            .id(InstanceId(3))
            .build();
        let mut obs = Collect::default();
        for t in [0, 5] {
            b.run_cycle(FrameTime(t), &["counter", "parent"], &mut obs).unwrap();
        }
        assert_eq!(obs.starts, [FrameTime(0), FrameTime(5)]);
        assert_eq!(obs.ends.len(), 2);
        assert_eq!(obs.ends[1], (InstanceId(3), FrameTime(5), vec!["counter", "parent", "child"]));
        assert!(!b.in_cycle());
        assert_eq!(b.last_cycle(), Some(FrameTime(5)));
    }

    #[test]
    fn rejected_cycle_is_not_observed() {
        let mut b = behavior(standard_registry());
        let mut obs = Collect::default();
        b.run_cycle(FrameTime(4), &["counter"], &mut obs).unwrap();
        assert!(b.run_cycle(FrameTime(4), &["counter"], &mut obs).is_err());

        assert_eq!(obs.starts, [FrameTime(4)]);
        assert_eq!(obs.ends.len(), 1);
    }

    #[test]
    fn failing_root_still_closes_and_reports_the_cycle() {
        let mut r = standard_registry();
        r.register::<Clash>().unwrap();
        let mut b = behavior(r);
        b.world_mut().flag = true;
        let mut obs = Collect::default();

        let err = b.run_cycle(FrameTime(0), &["counter", "clash", "parent"], &mut obs).unwrap_err();
        assert!(matches!(err, BehaviorError::TransitionConflict { .. }), "{err}");
        assert!(!b.in_cycle());
        assert_eq!(b.last_cycle(), Some(FrameTime(0)));
        assert_eq!(obs.starts, [FrameTime(0)]);
        assert_eq!(obs.ends, [(InstanceId(0), FrameTime(0), vec!["counter"])]);
    }
}

// ── Definitions ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod definitions {
    use std::sync::Arc;

    use hb_defs::{MemorySource, NoSource};

    use super::fixtures::*;
    use crate::{Behavior, BehaviorBuilder, BehaviorError, FrameTime, Registry};

    fn tuned(configure: impl FnOnce(BehaviorBuilder<TestWorld>) -> BehaviorBuilder<TestWorld>) -> Behavior<TestWorld> {
        let mut r = Registry::new();
        r.register::<Tuned>().unwrap();
        let builder = BehaviorBuilder::new(Arc::new(r), TestWorld::default())
            .definitions(Arc::new(MemorySource::new().with("tuned", "gain: 3\n")));
        configure(builder).build()
    }

    #[test]
    fn lazy_definitions_built_on_first_call() {
        let mut b = tuned(|b| b);
        b.begin_cycle(FrameTime(0)).unwrap();
        assert!(b.definitions::<Tuned>().is_none());
        b.execute_root("tuned").unwrap();
        b.end_cycle().unwrap();

        assert_eq!(b.definitions::<Tuned>().unwrap().gain, 3);
        assert_eq!(b.world().gain, 3);
    }

    #[test]
    fn eager_definitions_built_at_first_cycle() {
        let mut b = tuned(|b| b.eager_definitions());
        b.begin_cycle(FrameTime(0)).unwrap();
        assert_eq!(b.definitions::<Tuned>().unwrap().gain, 3);
        assert!(b.context_snapshot::<Tuned>().unwrap().last_active.is_none());
        b.end_cycle().unwrap();
    }

    #[test]
    fn computed_once_by_default() {
        let mut b = tuned(|b| b);
        for t in 0..4 {
            cycle(&mut b, t, |b| b.execute_root("tuned").unwrap());
        }
        let defs = b.definitions::<Tuned>().unwrap();
        assert_eq!(defs.refreshed, 0);
        assert_eq!(defs.last, None);
    }

    #[test]
    fn refreshed_every_cycle_when_configured() {
        let mut b = tuned(|b| b.refresh_every_cycle());
        for t in 0..4 {
            cycle(&mut b, t, |b| b.execute_root("tuned").unwrap());
        }
        // Built during cycle 0, refreshed at the start of cycles 1..=3.
        let defs = b.definitions::<Tuned>().unwrap();
        assert_eq!(defs.refreshed, 3);
        assert_eq!(defs.last, Some(FrameTime(3)));
        assert_eq!(defs.gain, 3);
    }

    #[test]
    fn eager_and_refresh_compose() {
        let mut b = tuned(|b| b.eager_definitions().refresh_every_cycle());
        cycle(&mut b, 0, |_| ());
        cycle(&mut b, 1, |_| ());
        assert_eq!(b.definitions::<Tuned>().unwrap().refreshed, 2);
    }

    #[test]
    fn missing_resource_is_fatal_at_first_use() {
        let mut r = Registry::new();
        r.register::<Tuned>().unwrap();
        let mut b = BehaviorBuilder::new(Arc::new(r), TestWorld::default())
            .definitions(Arc::new(NoSource))
            .build();

        b.begin_cycle(FrameTime(0)).unwrap();
        let err = b.execute_root("tuned").unwrap_err();
        assert!(matches!(err, BehaviorError::Definitions { option: "tuned", .. }), "{err}");
        assert!(b.is_poisoned());
    }

    #[test]
    fn malformed_resource_fails_eager_init() {
        let mut r = Registry::new();
        r.register::<Tuned>().unwrap();
        let mut b = BehaviorBuilder::new(Arc::new(r), TestWorld::default())
            .definitions(Arc::new(MemorySource::new().with("tuned", "gain = 3\n")))
            .eager_definitions()
            .build();

        let err = b.begin_cycle(FrameTime(0)).unwrap_err();
        assert!(matches!(err, BehaviorError::Definitions { .. }));
        assert!(b.is_poisoned());
        assert!(!b.in_cycle());
    }
}

// ── Cycle protocol ────────────────────────────────────────────────────────────

#[cfg(test)]
mod protocol {
    use super::fixtures::*;
    use crate::{BehaviorError, FrameTime};

    #[test]
    fn calls_outside_a_cycle_rejected() {
        let mut b = behavior(standard_registry());
        assert!(matches!(b.execute_root("counter"), Err(BehaviorError::NoActiveCycle)));
        assert!(matches!(b.select_root(&["busy"]), Err(BehaviorError::NoActiveCycle)));
        assert!(matches!(b.end_cycle(), Err(BehaviorError::NoActiveCycle)));
        assert!(!b.is_poisoned());
    }

    #[test]
    fn nested_begin_rejected() {
        let mut b = behavior(standard_registry());
        b.begin_cycle(FrameTime(0)).unwrap();
        let err = b.begin_cycle(FrameTime(1)).unwrap_err();
        assert!(matches!(err, BehaviorError::CycleInProgress { now: FrameTime(0) }));
        assert!(!err.is_fatal());
    }

    #[test]
    fn time_must_increase() {
        let mut b = behavior(standard_registry());
        cycle(&mut b, 4, |_| ());
        let err = b.begin_cycle(FrameTime(4)).unwrap_err();
        assert!(matches!(err, BehaviorError::NonMonotonicTime { .. }));
        b.begin_cycle(FrameTime(9)).unwrap();
    }

    #[test]
    fn reset_forgets_contexts() {
        let mut b = behavior(standard_registry());
        cycle(&mut b, 0, |b| b.execute_root("counter").unwrap());
        assert_eq!(b.context_snapshots().len(), 1);

        b.reset();
        assert!(b.context_snapshots().is_empty());
        assert_eq!(b.last_cycle(), None);
        cycle(&mut b, 0, |b| b.execute_root("counter").unwrap());
        assert_eq!(b.variables::<Counter>().unwrap().count, 1);
    }
}
