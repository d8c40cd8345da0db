//! The behavior container: one instance's contexts, world, and cycle clock.

use std::sync::Arc;

use hb_core::{ActivationGraph, FrameTime, InstanceId, StateKind};
use hb_defs::DefinitionSource;

use crate::context::{ContextSnapshot, ContextStore};
use crate::execution::{self, Frame};
use crate::{
    BehaviorConfig, BehaviorError, BehaviorOption, BehaviorResult, CycleObserver, DefinitionsInit,
    Registry, RefreshPolicy,
};

/// One running behavior: a world value `W` read and written by the options,
/// the option contexts, and the activation graph of the last cycle.
///
/// # Cycle protocol
///
/// ```text
/// begin_cycle(now)  →  execute_root / select_root …  →  end_cycle()
/// ```
///
/// `now` must increase from cycle to cycle.  An option that was not called
/// in the previous cycle restarts in its initial state.
///
/// A fatal error (see [`BehaviorError::is_fatal`]) poisons the instance:
/// every later `begin_cycle` fails with [`BehaviorError::Poisoned`] until
/// [`reset`][Self::reset] is called.
///
/// Independent instances share nothing mutable, so a team of agents can be
/// stepped on separate threads.
pub struct Behavior<W> {
    id:                  InstanceId,
    world:               W,
    registry:            Arc<Registry<W>>,
    source:              Arc<dyn DefinitionSource>,
    config:              BehaviorConfig,
    contexts:            ContextStore,
    graph:               ActivationGraph,
    current:             Option<FrameTime>,
    last:                Option<FrameTime>,
    prepared:            bool,
    poisoned:            Option<String>,
}

impl<W> Behavior<W> {
    pub(crate) fn new(
        id:       InstanceId,
        world:    W,
        registry: Arc<Registry<W>>,
        source:   Arc<dyn DefinitionSource>,
        config:   BehaviorConfig,
    ) -> Self {
        Self {
            id,
            world,
            registry,
            source,
            config,
            contexts: ContextStore::new(),
            graph: ActivationGraph::new(),
            current: None,
            last: None,
            prepared: false,
            poisoned: None,
        }
    }

    // ── Cycle bracketing ──────────────────────────────────────────────────

    /// Start the cycle stamped `now`: clear the activation graph and run
    /// pending definitions work.
    pub fn begin_cycle(&mut self, now: FrameTime) -> BehaviorResult<()> {
        self.check_poison()?;
        if let Some(current) = self.current {
            return Err(BehaviorError::CycleInProgress { now: current });
        }
        match self.last {
            Some(last) if now <= last => return Err(BehaviorError::NonMonotonicTime { last, now }),
            _ => {}
        }

        self.graph.clear();

        if self.config.definitions_init == DefinitionsInit::Eager && !self.prepared {
            let result = self.registry.prepare_all(&mut self.contexts, self.source.as_ref());
            self.guard(result, None)?;
            self.prepared = true;
        }
        if self.config.definitions_refresh == RefreshPolicy::EveryCycle {
            self.contexts.refresh_all(now);
        }

        self.current = Some(now);
        Ok(())
    }

    /// Call the registered option `name` as a root.
    ///
    /// Returns whether it ended the call outside its initial state; unknown
    /// names return `Ok(false)`.
    pub fn execute_root(&mut self, name: &str) -> BehaviorResult<bool> {
        let now = self.active_cycle()?;
        let registry = Arc::clone(&self.registry);
        let report = self.in_frame(now, |frame| registry.execute_in(frame, name, false))?;
        Ok(report.is_some_and(|r| r.left_initial()))
    }

    /// Call the root option `O` directly with `args`.  Works for
    /// parameterized options, which cannot be called by name.
    pub fn execute_option<O: BehaviorOption<W>>(&mut self, args: O::Args) -> BehaviorResult<StateKind> {
        let now = self.active_cycle()?;
        let report = self.in_frame(now, |frame| execution::execute::<W, O>(frame, args, false))?;
        Ok(report.kind)
    }

    /// Top-level selector: try `names` in order, commit to the first that
    /// executes.  Returns the selected name.
    pub fn select_root(&mut self, names: &[&str]) -> BehaviorResult<Option<&'static str>> {
        let now = self.active_cycle()?;
        let registry = Arc::clone(&self.registry);
        let selection = self.in_frame(now, |frame| registry.select_in(frame, names))?;
        Ok(selection.selected)
    }

    /// Close the current cycle and remember its timestamp for cold-entry
    /// detection in the next one.
    pub fn end_cycle(&mut self) -> BehaviorResult<FrameTime> {
        let now = self.current.take().ok_or(BehaviorError::NoActiveCycle)?;
        self.last = Some(now);
        Ok(now)
    }

    /// `begin_cycle`, every root in order, `end_cycle`.
    ///
    /// The observer hears about the cycle only once `begin_cycle` accepted
    /// it.  From then on the cycle is always closed and `on_cycle_end`
    /// always fires; a failing root stops the remaining roots and its error
    /// is returned after the end notification.
    pub fn run_cycle<Obs: CycleObserver>(
        &mut self,
        now:      FrameTime,
        roots:    &[&str],
        observer: &mut Obs,
    ) -> BehaviorResult<()> {
        self.begin_cycle(now)?;
        observer.on_cycle_start(self.id, now);
        let result = roots.iter().try_for_each(|root| self.execute_root(root).map(|_| ()));
        self.end_cycle()?;
        observer.on_cycle_end(self.id, now, &self.graph);
        result
    }

    /// Drop every context and clear the poison flag.  The next cycle runs as
    /// on a fresh instance.
    pub fn reset(&mut self) {
        self.contexts.clear();
        self.graph.clear();
        self.current = None;
        self.last = None;
        self.prepared = false;
        self.poisoned = None;
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn id(&self) -> InstanceId {
        self.id
    }

    pub fn world(&self) -> &W {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut W {
        &mut self.world
    }

    pub fn into_world(self) -> W {
        self.world
    }

    pub fn config(&self) -> &BehaviorConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<Registry<W>> {
        &self.registry
    }

    /// The activation graph of the current (or, after `end_cycle`, the last)
    /// cycle.
    pub fn activation_graph(&self) -> &ActivationGraph {
        &self.graph
    }

    pub fn in_cycle(&self) -> bool {
        self.current.is_some()
    }

    /// Timestamp of the last completed cycle.
    pub fn last_cycle(&self) -> Option<FrameTime> {
        self.last
    }

    pub fn is_poisoned(&self) -> bool {
        self.poisoned.is_some()
    }

    /// State of the context of `O`, if the option has one.
    pub fn context_snapshot<O: BehaviorOption<W>>(&self) -> Option<ContextSnapshot> {
        self.contexts.entry::<W, O>().map(|e| e.snapshot())
    }

    /// Snapshots of every context, sorted by option name.
    pub fn context_snapshots(&self) -> Vec<ContextSnapshot> {
        self.contexts.snapshots()
    }

    /// Definitions block of `O`, once built.
    pub fn definitions<O: BehaviorOption<W>>(&self) -> Option<&O::Defs> {
        self.contexts.get::<W, O>().map(|ctx| &ctx.defs)
    }

    /// Variables block of `O`, once built.
    pub fn variables<O: BehaviorOption<W>>(&self) -> Option<&O::Vars> {
        self.contexts.get::<W, O>().map(|ctx| &ctx.vars)
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn frame(&mut self, now: FrameTime) -> Frame<'_, W> {
        Frame {
            world:    &mut self.world,
            contexts: &mut self.contexts,
            registry: self.registry.as_ref(),
            graph:    self.config.record_activation.then_some(&mut self.graph),
            source:   self.source.as_ref(),
            now,
            prev:     self.last,
            depth:    0,
            fault:    None,
        }
    }

    /// Run `f` over a fresh frame and poison on whatever fatal error it
    /// raised, returned or not.
    fn in_frame<T>(
        &mut self,
        now: FrameTime,
        f:   impl FnOnce(&mut Frame<'_, W>) -> BehaviorResult<T>,
    ) -> BehaviorResult<T> {
        let mut frame = self.frame(now);
        let result = f(&mut frame);
        let fault = frame.fault.take();
        self.guard(result, fault)
    }

    fn check_poison(&self) -> BehaviorResult<()> {
        match &self.poisoned {
            Some(reason) => Err(BehaviorError::Poisoned { instance: self.id, reason: reason.clone() }),
            None => Ok(()),
        }
    }

    fn active_cycle(&self) -> BehaviorResult<FrameTime> {
        self.check_poison()?;
        self.current.ok_or(BehaviorError::NoActiveCycle)
    }

    /// Poison the instance on fatal errors.  A `fault` an option swallowed
    /// turns an `Ok` into [`BehaviorError::Poisoned`].
    fn guard<T>(&mut self, result: BehaviorResult<T>, fault: Option<String>) -> BehaviorResult<T> {
        match result {
            Err(err) => {
                if err.is_fatal() {
                    tracing::error!(instance = %self.id, error = %err, "behavior poisoned");
                    self.poisoned = Some(err.to_string());
                }
                Err(err)
            }
            Ok(value) => match fault {
                Some(reason) => {
                    tracing::error!(instance = %self.id, error = %reason, "behavior poisoned by a discarded error");
                    self.poisoned = Some(reason.clone());
                    Err(BehaviorError::Poisoned { instance: self.id, reason })
                }
                None => Ok(value),
            },
        }
    }
}
