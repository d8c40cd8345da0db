//! One option call: entry, transitions, action, exit.
//!
//! # Call sequence
//!
//! ```text
//! checkout context ─► enter (cold reset) ─► common_transition?
//!        ─► transition(state) ─► record + action(state)? ─► exit ─► checkin
//! ```
//!
//! The cycle-wide data a call needs (world, context store, registry,
//! activation graph, timestamps, depth) travels in a [`Frame`] passed down
//! the call tree explicitly; there is no ambient instance.
//!
//! A failing call still checks its context back in and restores the depth.
//! The first fatal error is also kept on the frame, so the container poisons
//! the instance even when an option drops the `Err` of a sub-call.

use hb_core::{ActivationGraph, ActivationNode, FrameTime, StateKind};
use hb_defs::DefinitionSource;

use crate::context::{ContextOf, ContextStore, OptionContext};
use crate::{BehaviorError, BehaviorOption, BehaviorResult, OptionArgs, Registry, StateId};

// ── Frame ─────────────────────────────────────────────────────────────────────

/// Borrowed state of one behavior instance for the duration of a root call.
pub(crate) struct Frame<'f, W> {
    pub(crate) world:    &'f mut W,
    pub(crate) contexts: &'f mut ContextStore,
    pub(crate) registry: &'f Registry<W>,
    /// `None` when activation recording is disabled.
    pub(crate) graph:    Option<&'f mut ActivationGraph>,
    pub(crate) source:   &'f dyn DefinitionSource,
    pub(crate) now:      FrameTime,
    pub(crate) prev:     Option<FrameTime>,
    pub(crate) depth:    u32,
    /// First fatal error raised below the root, even if an option
    /// discarded the `Err`.
    pub(crate) fault:    Option<String>,
}

impl<W> Frame<'_, W> {
    fn note_fault(&mut self, err: &BehaviorError) {
        if err.is_fatal() && self.fault.is_none() {
            self.fault = Some(err.to_string());
        }
    }

    /// Append the activation node of the running option, once per cycle.
    fn record<S: StateId, D, V>(
        &mut self,
        ctx:  &mut OptionContext<S, D, V>,
        args: &impl OptionArgs,
    ) {
        if ctx.recorded_at == Some(self.now) {
            return;
        }
        ctx.recorded_at = Some(self.now);
        if let Some(graph) = self.graph.as_deref_mut() {
            let mut arguments = Vec::new();
            args.describe(&mut arguments);
            graph.push(ActivationNode {
                option:      ctx.option,
                depth:       self.depth,
                state:       ctx.state.name(),
                option_time: self.now.since(ctx.option_start),
                state_time:  self.now.since(ctx.state_start),
                arguments,
            });
        }
    }
}

/// Outcome of one option call.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CallReport {
    /// Kind of the state the option ended the call in.
    pub kind:  StateKind,
    /// Whether the action of that state ran.
    pub acted: bool,
}

impl CallReport {
    /// The option left its initial state.
    pub fn left_initial(&self) -> bool {
        !self.kind.is_initial()
    }

    /// Selector rule: left the initial state, or ran the initial state's action.
    pub fn executed(&self) -> bool {
        self.left_initial() || self.acted
    }
}

// ── Dispatch ──────────────────────────────────────────────────────────────────

pub(crate) fn execute<W, O: BehaviorOption<W>>(
    frame:       &mut Frame<'_, W>,
    args:        O::Args,
    from_select: bool,
) -> BehaviorResult<CallReport> {
    let source = frame.source;
    let result = frame.contexts.checkout::<W, O>(source).and_then(|mut ctx| {
        frame.depth += 1;
        let result = run::<W, O>(frame, &mut ctx, args, from_select);
        frame.depth -= 1;
        frame.contexts.checkin::<W, O>(ctx);
        result
    });
    if let Err(err) = &result {
        frame.note_fault(err);
    }
    result
}

/// Body of one call.  The context is checked out and the depth already
/// counts this call; both are restored by [`execute`] on every path.
fn run<W, O: BehaviorOption<W>>(
    frame:       &mut Frame<'_, W>,
    ctx:         &mut ContextOf<W, O>,
    args:        O::Args,
    from_select: bool,
) -> BehaviorResult<CallReport> {
    let now = frame.now;
    let cold = ctx.enter(now, frame.prev)?;
    tracing::trace!(option = O::NAME, depth = frame.depth, state = ctx.state.name(), cold, "enter");

    let mut args = args;

    // Transitions.
    {
        let mut t = Transition::<W, O> {
            world:      &*frame.world,
            args:       &mut args,
            ctx:        &mut *ctx,
            now,
            has_common: O::HAS_COMMON_TRANSITION,
            in_state:   false,
        };
        O::common_transition(&mut t)?;
        t.has_common = false;
        t.in_state = true;
        let state = t.ctx.state;
        O::transition(state, &mut t)?;
    }

    // Action.
    let state = ctx.state;
    let mut acted = false;
    let mut last_sub = None;
    if state.has_action() {
        frame.record(&mut *ctx, &args);
        let mut cx = ActionCx::<W, O> {
            frame:    &mut *frame,
            args:     &mut args,
            ctx:      &mut *ctx,
            last_sub: None,
        };
        O::action(state, &mut cx)?;
        last_sub = cx.last_sub;
        acted = true;
    }

    // Exit.
    let kind = ctx.state.kind();
    if !from_select || !kind.is_initial() {
        frame.record(&mut *ctx, &args);
        ctx.last_active = Some(now);
    }
    ctx.last_selected = Some(now);
    ctx.sub_option_kind = last_sub.unwrap_or(StateKind::Normal);
    tracing::trace!(option = O::NAME, depth = frame.depth, state = ctx.state.name(), "exit");

    Ok(CallReport { kind, acted })
}

// ── Transition handle ─────────────────────────────────────────────────────────

/// Handle passed to `common_transition` and `transition`.
///
/// Reads everything an option may base a decision on; the only mutation of
/// control state it offers is [`goto`][Self::goto].
pub struct Transition<'c, W, O: BehaviorOption<W>> {
    world:      &'c W,
    args:       &'c mut O::Args,
    ctx:        &'c mut ContextOf<W, O>,
    now:        FrameTime,
    has_common: bool,
    in_state:   bool,
}

impl<W, O: BehaviorOption<W>> Transition<'_, W, O> {
    /// Request a change to `next`.
    ///
    /// Same-state requests count as the call's transition but keep the
    /// state time running.
    pub fn goto(&mut self, next: O::State) -> BehaviorResult<()> {
        if self.has_common == self.in_state {
            return Err(BehaviorError::MisplacedTransition { option: O::NAME, to: next.name() });
        }
        if self.ctx.transition_executed {
            return Err(BehaviorError::TransitionConflict {
                option: O::NAME,
                from:   self.ctx.state.name(),
                to:     next.name(),
            });
        }
        self.ctx.transition_executed = true;
        if self.ctx.state != next {
            tracing::debug!(
                option = O::NAME,
                from = self.ctx.state.name(),
                to = next.name(),
                "state change"
            );
            self.ctx.state = next;
            self.ctx.state_start = self.now;
        }
        Ok(())
    }

    pub fn state(&self) -> O::State {
        self.ctx.state
    }

    /// Whether a transition was already accepted in this call.
    pub fn transitioned(&self) -> bool {
        self.ctx.transition_executed
    }

    pub fn world(&self) -> &W {
        self.world
    }

    pub fn args(&self) -> &O::Args {
        &*self.args
    }

    /// Call-local copy; changes are seen by the action of this call only.
    pub fn args_mut(&mut self) -> &mut O::Args {
        &mut *self.args
    }

    pub fn defs(&self) -> &O::Defs {
        &self.ctx.defs
    }

    pub fn vars(&self) -> &O::Vars {
        &self.ctx.vars
    }

    pub fn vars_mut(&mut self) -> &mut O::Vars {
        &mut self.ctx.vars
    }

    pub fn now(&self) -> FrameTime {
        self.now
    }

    pub fn option_time(&self) -> u64 {
        self.ctx.option_time(self.now)
    }

    pub fn state_time(&self) -> u64 {
        self.ctx.state_time(self.now)
    }

    /// The sub-option called last reached a target state.
    pub fn action_done(&self) -> bool {
        self.ctx.sub_option_kind.is_target()
    }

    /// The sub-option called last reached an aborted state.
    pub fn action_aborted(&self) -> bool {
        self.ctx.sub_option_kind.is_aborted()
    }
}

// ── Action handle ─────────────────────────────────────────────────────────────

/// Handle passed to `action`: mutable world access and sub-option calls.
pub struct ActionCx<'c, 'f, W, O: BehaviorOption<W>> {
    frame:    &'c mut Frame<'f, W>,
    args:     &'c mut O::Args,
    ctx:      &'c mut ContextOf<W, O>,
    last_sub: Option<StateKind>,
}

impl<W, O: BehaviorOption<W>> ActionCx<'_, '_, W, O> {
    /// Call sub-option `C` and return the kind of the state it ended in.
    pub fn call<C: BehaviorOption<W>>(&mut self, args: C::Args) -> BehaviorResult<StateKind> {
        let report = execute::<W, C>(self.frame, args, false)?;
        self.last_sub = Some(report.kind);
        Ok(report.kind)
    }

    /// Call a parameterless sub-option with its default arguments.
    pub fn call_default<C: BehaviorOption<W>>(&mut self) -> BehaviorResult<StateKind> {
        self.call::<C>(C::Args::default())
    }

    /// Call a registered option by name.  Unknown names return `Ok(false)`.
    pub fn execute_by_name(&mut self, name: &str) -> BehaviorResult<bool> {
        let registry = self.frame.registry;
        let report = registry.execute_in(self.frame, name, false)?;
        if let Some(report) = report {
            self.last_sub = Some(report.kind);
        }
        Ok(report.is_some_and(|r| r.left_initial()))
    }

    /// Try registered options in order; stop at the first that executes.
    pub fn select_first(&mut self, names: &[&str]) -> BehaviorResult<bool> {
        let registry = self.frame.registry;
        let outcome = registry.select_in(self.frame, names)?;
        if let Some(kind) = outcome.last_kind {
            self.last_sub = Some(kind);
        }
        Ok(outcome.selected.is_some())
    }

    pub fn state(&self) -> O::State {
        self.ctx.state
    }

    pub fn world(&self) -> &W {
        &*self.frame.world
    }

    pub fn world_mut(&mut self) -> &mut W {
        &mut *self.frame.world
    }

    pub fn args(&self) -> &O::Args {
        &*self.args
    }

    pub fn defs(&self) -> &O::Defs {
        &self.ctx.defs
    }

    pub fn vars(&self) -> &O::Vars {
        &self.ctx.vars
    }

    pub fn vars_mut(&mut self) -> &mut O::Vars {
        &mut self.ctx.vars
    }

    pub fn now(&self) -> FrameTime {
        self.frame.now
    }

    pub fn depth(&self) -> u32 {
        self.frame.depth
    }

    pub fn option_time(&self) -> u64 {
        self.ctx.option_time(self.frame.now)
    }

    pub fn state_time(&self) -> u64 {
        self.ctx.state_time(self.frame.now)
    }

    pub fn action_done(&self) -> bool {
        self.ctx.sub_option_kind.is_target()
    }

    pub fn action_aborted(&self) -> bool {
        self.ctx.sub_option_kind.is_aborted()
    }
}
