//! Per-option execution records and the store that owns them.
//!
//! # Design
//!
//! Each option `O` gets one `OptionContext` per behavior instance, stored
//! behind a `Box<dyn ContextEntry>` in a map keyed by `TypeId::of::<O>()`.
//! A call checks the context *out* of the store for its duration and back
//! in on exit.  Finding the slot empty means the option is already on the
//! call stack, which is reported as [`BehaviorError::ReentrantCall`].

use std::any::{Any, TypeId};

use hb_core::{FrameTime, StateKind};
use hb_defs::{DefinitionLoader, DefinitionSource, Definitions};
use rustc_hash::FxHashMap;

use crate::option::initial_state;
use crate::{BehaviorError, BehaviorOption, BehaviorResult, StateId};

// ── OptionContext ─────────────────────────────────────────────────────────────

/// The long-lived execution record of one option.
pub struct OptionContext<S, D, V> {
    pub(crate) option:          &'static str,
    pub(crate) state:           S,
    pub(crate) option_start:    FrameTime,
    pub(crate) state_start:     FrameTime,
    /// Last cycle the option ran, except initial-state selector probes.
    pub(crate) last_active:     Option<FrameTime>,
    /// Last cycle the option ran in any way.
    pub(crate) last_selected:   Option<FrameTime>,
    /// Kind of the last sub-option called, as seen by `action_done`.
    pub(crate) sub_option_kind: StateKind,
    pub(crate) recorded_at:     Option<FrameTime>,
    pub(crate) transition_executed: bool,
    pub(crate) defs:            D,
    pub(crate) vars:            V,
}

impl<S, D, V> OptionContext<S, D, V>
where
    S: StateId,
    D: Definitions,
    V: Default + Send + 'static,
{
    /// Build a fresh context: initial state, definitions block, default vars.
    pub(crate) fn create(option: &'static str, source: &dyn DefinitionSource) -> BehaviorResult<Self> {
        let state = initial_state::<S>(option)?;
        tracing::debug!(option, "building definitions");
        let defs = D::init(&DefinitionLoader::new(option, source))
            .map_err(|source| BehaviorError::Definitions { option, source })?;
        Ok(Self {
            option,
            state,
            option_start: FrameTime::ZERO,
            state_start: FrameTime::ZERO,
            last_active: None,
            last_selected: None,
            sub_option_kind: StateKind::Normal,
            recorded_at: None,
            transition_executed: false,
            defs,
            vars: V::default(),
        })
    }

    /// Entry bookkeeping.  Returns whether this is a cold entry.
    pub(crate) fn enter(&mut self, now: FrameTime, prev: Option<FrameTime>) -> BehaviorResult<bool> {
        let recent = |mark: Option<FrameTime>| mark.is_some() && (mark == prev || mark == Some(now));

        let cold = !recent(self.last_active);
        if cold {
            self.state = initial_state::<S>(self.option)?;
            self.option_start = now;
            self.state_start = now;
            self.vars = V::default();
        }
        if !recent(self.last_selected) {
            self.sub_option_kind = StateKind::Normal;
        }
        self.transition_executed = false;
        Ok(cold)
    }

    pub(crate) fn option_time(&self, now: FrameTime) -> u64 {
        now.since(self.option_start)
    }

    pub(crate) fn state_time(&self, now: FrameTime) -> u64 {
        now.since(self.state_start)
    }
}

// ── Snapshot ──────────────────────────────────────────────────────────────────

/// Read-only view of a context, for tests and tools.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ContextSnapshot {
    pub option:          &'static str,
    pub state:           &'static str,
    pub kind:            StateKind,
    pub option_start:    FrameTime,
    pub state_start:     FrameTime,
    pub last_active:     Option<FrameTime>,
    pub last_selected:   Option<FrameTime>,
    pub sub_option_kind: StateKind,
}

impl ContextSnapshot {
    pub fn option_time(&self, now: FrameTime) -> u64 {
        now.since(self.option_start)
    }

    pub fn state_time(&self, now: FrameTime) -> u64 {
        now.since(self.state_start)
    }
}

// ── Trait object ──────────────────────────────────────────────────────────────

/// Type-erased interface to an [`OptionContext`].
///
/// Sealed: only `OptionContext` implements it.
pub trait ContextEntry: Send + 'static + sealed::Sealed {
    fn option(&self) -> &'static str;

    fn snapshot(&self) -> ContextSnapshot;

    /// Run the definitions block's per-cycle hook.
    fn refresh_definitions(&mut self, now: FrameTime);

    #[doc(hidden)]
    fn as_any(&self) -> &dyn Any;

    #[doc(hidden)]
    fn into_any(self: Box<Self>) -> Box<dyn Any + Send>;
}

mod sealed {
    pub trait Sealed {}
}

impl<S, D, V> sealed::Sealed for OptionContext<S, D, V> {}

impl<S, D, V> ContextEntry for OptionContext<S, D, V>
where
    S: StateId,
    D: Definitions,
    V: Default + Send + 'static,
{
    fn option(&self) -> &'static str {
        self.option
    }

    fn snapshot(&self) -> ContextSnapshot {
        ContextSnapshot {
            option:          self.option,
            state:           self.state.name(),
            kind:            self.state.kind(),
            option_start:    self.option_start,
            state_start:     self.state_start,
            last_active:     self.last_active,
            last_selected:   self.last_selected,
            sub_option_kind: self.sub_option_kind,
        }
    }

    fn refresh_definitions(&mut self, now: FrameTime) {
        self.defs.refresh(now);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any + Send> {
        self
    }
}

/// The concrete context type of option `O`.
pub(crate) type ContextOf<W, O> = OptionContext<
    <O as BehaviorOption<W>>::State,
    <O as BehaviorOption<W>>::Defs,
    <O as BehaviorOption<W>>::Vars,
>;

// ── ContextStore ──────────────────────────────────────────────────────────────

enum Slot {
    Idle(Box<dyn ContextEntry>),
    /// Checked out by a call in progress.
    Busy(&'static str),
}

/// All option contexts of one behavior instance.
#[derive(Default)]
pub struct ContextStore {
    slots: FxHashMap<TypeId, Slot>,
}

impl ContextStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn contains<W, O: BehaviorOption<W>>(&self) -> bool {
        self.slots.contains_key(&TypeId::of::<O>())
    }

    /// Drop every context.
    pub fn clear(&mut self) {
        self.slots.clear();
    }

    /// Take the context of `O` out of the store, creating it on first use.
    pub(crate) fn checkout<W, O: BehaviorOption<W>>(
        &mut self,
        source: &dyn DefinitionSource,
    ) -> BehaviorResult<Box<ContextOf<W, O>>> {
        let key = TypeId::of::<O>();
        let Some(slot) = self.slots.get_mut(&key) else {
            let ctx = ContextOf::<W, O>::create(O::NAME, source)?;
            self.slots.insert(key, Slot::Busy(O::NAME));
            return Ok(Box::new(ctx));
        };
        match std::mem::replace(slot, Slot::Busy(O::NAME)) {
            Slot::Idle(entry) => entry
                .into_any()
                .downcast::<ContextOf<W, O>>()
                .map_err(|_| BehaviorError::ContextTypeMismatch { option: O::NAME }),
            Slot::Busy(option) => Err(BehaviorError::ReentrantCall { option }),
        }
    }

    /// Return a checked-out context.
    pub(crate) fn checkin<W, O: BehaviorOption<W>>(&mut self, ctx: Box<ContextOf<W, O>>) {
        self.slots.insert(TypeId::of::<O>(), Slot::Idle(ctx));
    }

    /// Build the context of `O` now if it does not exist yet.
    pub(crate) fn prepare<W, O: BehaviorOption<W>>(&mut self, source: &dyn DefinitionSource) -> BehaviorResult<()> {
        let key = TypeId::of::<O>();
        if !self.slots.contains_key(&key) {
            let ctx = ContextOf::<W, O>::create(O::NAME, source)?;
            self.slots.insert(key, Slot::Idle(Box::new(ctx)));
        }
        Ok(())
    }

    /// Run every existing definitions block's refresh hook.
    pub(crate) fn refresh_all(&mut self, now: FrameTime) {
        for slot in self.slots.values_mut() {
            if let Slot::Idle(entry) = slot {
                tracing::debug!(option = entry.option(), %now, "refreshing definitions");
                entry.refresh_definitions(now);
            }
        }
    }

    pub(crate) fn entry<W, O: BehaviorOption<W>>(&self) -> Option<&dyn ContextEntry> {
        match self.slots.get(&TypeId::of::<O>()) {
            Some(Slot::Idle(entry)) => Some(entry.as_ref()),
            _ => None,
        }
    }

    /// Typed read access to the context of `O`.
    pub(crate) fn get<W, O: BehaviorOption<W>>(&self) -> Option<&ContextOf<W, O>> {
        self.entry::<W, O>()?.as_any().downcast_ref::<ContextOf<W, O>>()
    }

    /// Snapshots of every idle context, sorted by option name.
    pub fn snapshots(&self) -> Vec<ContextSnapshot> {
        let mut out: Vec<ContextSnapshot> = self
            .slots
            .values()
            .filter_map(|slot| match slot {
                Slot::Idle(entry) => Some(entry.snapshot()),
                Slot::Busy(_) => None,
            })
            .collect();
        out.sort_by_key(|s| s.option);
        out
    }
}
