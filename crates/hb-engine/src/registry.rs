//! Name-indexed option lookup and the priority selector.

use std::any::TypeId;

use hb_defs::DefinitionSource;
use rustc_hash::FxHashMap;

use crate::context::ContextStore;
use crate::execution::{self, CallReport, Frame};
use crate::option::initial_state;
use crate::{BehaviorError, BehaviorOption, BehaviorResult};

type RunFn<W> = for<'f, 'a> fn(&'a mut Frame<'f, W>, bool) -> BehaviorResult<CallReport>;
type PrepareFn = fn(&mut ContextStore, &dyn DefinitionSource) -> BehaviorResult<()>;

struct Entry<W> {
    type_id: TypeId,
    /// `None` for options declared but not callable by name.
    run:     Option<RunFn<W>>,
    prepare: PrepareFn,
}

fn run_by_name<W, O: BehaviorOption<W, Args = ()>>(
    frame:       &mut Frame<'_, W>,
    from_select: bool,
) -> BehaviorResult<CallReport> {
    execution::execute::<W, O>(frame, (), from_select)
}

fn prepare<W, O: BehaviorOption<W>>(store: &mut ContextStore, source: &dyn DefinitionSource) -> BehaviorResult<()> {
    store.prepare::<W, O>(source)
}

/// Result of one selector pass.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Selection {
    /// Name of the first candidate that executed.
    pub(crate) selected:  Option<&'static str>,
    /// Kind reported by the last candidate that ran.
    pub(crate) last_kind: Option<hb_core::StateKind>,
}

/// The options of one behavior program, built once before any cycle and
/// shared by every instance that runs it.
///
/// ```rust,ignore
/// let mut registry = Registry::new();
/// registry.register::<PlaySoccer>()?;
/// registry.declare::<GoTo>()?;
/// let registry = Arc::new(registry);
/// ```
pub struct Registry<W> {
    entries: FxHashMap<&'static str, Entry<W>>,
    /// Names in registration order.
    order:   Vec<&'static str>,
}

impl<W> Default for Registry<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W> Registry<W> {
    pub fn new() -> Self {
        Self { entries: FxHashMap::default(), order: Vec::new() }
    }

    /// Register a parameterless option under its name.
    ///
    /// Fails if the option's states are malformed or the name is taken by a
    /// different option.
    pub fn register<O>(&mut self) -> BehaviorResult<&mut Self>
    where
        O: BehaviorOption<W, Args = ()>,
    {
        let run: RunFn<W> = run_by_name::<W, O>;
        self.insert::<O>(Some(run))?;
        Ok(self)
    }

    /// Make an option known without making it callable by name.
    ///
    /// Parameterized options are declared so their states are validated up
    /// front and their definitions can be built eagerly.
    pub fn declare<O: BehaviorOption<W>>(&mut self) -> BehaviorResult<&mut Self> {
        self.insert::<O>(None)?;
        Ok(self)
    }

    fn insert<O: BehaviorOption<W>>(&mut self, run: Option<RunFn<W>>) -> BehaviorResult<()> {
        initial_state::<O::State>(O::NAME)?;
        let type_id = TypeId::of::<O>();
        match self.entries.get_mut(O::NAME) {
            Some(entry) if entry.type_id != type_id => {
                Err(BehaviorError::DuplicateOption { name: O::NAME })
            }
            Some(entry) if entry.run.is_some() && run.is_some() => {
                Err(BehaviorError::DuplicateOption { name: O::NAME })
            }
            Some(entry) => {
                entry.run = entry.run.or(run);
                Ok(())
            }
            None => {
                self.entries.insert(O::NAME, Entry { type_id, run, prepare: prepare::<W, O> });
                self.order.push(O::NAME);
                Ok(())
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `name` can be called by name.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.get(name).is_some_and(|e| e.run.is_some())
    }

    /// Every registered or declared name, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.order.iter().copied()
    }

    /// Build the context, and with it the definitions, of every known option.
    pub(crate) fn prepare_all(
        &self,
        store:  &mut ContextStore,
        source: &dyn DefinitionSource,
    ) -> BehaviorResult<()> {
        for name in &self.order {
            if let Some(entry) = self.entries.get(name) {
                (entry.prepare)(store, source)?;
            }
        }
        Ok(())
    }

    /// Run `name`.  `Ok(None)` when no callable option has that name.
    pub(crate) fn execute_in(
        &self,
        frame:       &mut Frame<'_, W>,
        name:        &str,
        from_select: bool,
    ) -> BehaviorResult<Option<CallReport>> {
        match self.entries.get(name).and_then(|e| e.run) {
            Some(run) => run(frame, from_select).map(Some),
            None => {
                tracing::warn!(option = name, "unknown option name");
                Ok(None)
            }
        }
    }

    /// Run candidates in order until one executes.
    pub(crate) fn select_in(&self, frame: &mut Frame<'_, W>, names: &[&str]) -> BehaviorResult<Selection> {
        let mut selection = Selection::default();
        for &name in names {
            let Some(report) = self.execute_in(frame, name, true)? else {
                continue;
            };
            selection.last_kind = Some(report.kind);
            if report.executed() {
                selection.selected = self.entries.get_key_value(name).map(|(k, _)| *k);
                break;
            }
        }
        Ok(selection)
    }
}
