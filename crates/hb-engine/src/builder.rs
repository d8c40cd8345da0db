//! Fluent builder for constructing a [`Behavior`].

use std::path::PathBuf;
use std::sync::Arc;

use hb_core::InstanceId;
use hb_defs::{DefinitionSource, DirSource, NoSource};

use crate::{Behavior, BehaviorConfig, DefinitionsInit, RefreshPolicy, Registry};

/// Fluent builder for [`Behavior<W>`].
///
/// # Required inputs
///
/// - `Arc<Registry<W>>`, shared by every instance running the same options
/// - `W`, the world value the options read and write
///
/// # Optional inputs (have defaults)
///
/// | Method                     | Default                      |
/// |----------------------------|------------------------------|
/// | `.id(id)`                  | `InstanceId(0)`              |
/// | `.config(c)`               | `BehaviorConfig::default()`  |
/// | `.definitions(source)`     | `NoSource`                   |
/// | `.definitions_dir(path)`   | —                            |
/// | `.eager_definitions()`     | lazy                         |
/// | `.refresh_every_cycle()`   | computed once                |
/// | `.record_activation(b)`    | `true`                       |
///
/// # Example
///
/// ```rust,ignore
/// let mut behavior = BehaviorBuilder::new(Arc::clone(&registry), PlayerWorld::default())
///     .id(InstanceId(2))
///     .definitions_dir("config")
///     .build();
/// behavior.run_cycle(FrameTime(0), &["play_soccer"], &mut NoopObserver)?;
/// ```
pub struct BehaviorBuilder<W> {
    registry: Arc<Registry<W>>,
    world:    W,
    id:       InstanceId,
    config:   BehaviorConfig,
    source:   Option<Arc<dyn DefinitionSource>>,
}

impl<W> BehaviorBuilder<W> {
    pub fn new(registry: Arc<Registry<W>>, world: W) -> Self {
        Self {
            registry,
            world,
            id:     InstanceId(0),
            config: BehaviorConfig::default(),
            source: None,
        }
    }

    pub fn id(mut self, id: InstanceId) -> Self {
        self.id = id;
        self
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: BehaviorConfig) -> Self {
        self.config = config;
        self
    }

    /// Where options with loaded definitions read their resources.  The
    /// source can be shared between instances.
    pub fn definitions(mut self, source: Arc<dyn DefinitionSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Shorthand for a [`DirSource`] over `dir`.
    pub fn definitions_dir(self, dir: impl Into<PathBuf>) -> Self {
        self.definitions(Arc::new(DirSource::new(dir)))
    }

    pub fn eager_definitions(mut self) -> Self {
        self.config.definitions_init = DefinitionsInit::Eager;
        self
    }

    pub fn refresh_every_cycle(mut self) -> Self {
        self.config.definitions_refresh = RefreshPolicy::EveryCycle;
        self
    }

    pub fn record_activation(mut self, record: bool) -> Self {
        self.config.record_activation = record;
        self
    }

    pub fn build(self) -> Behavior<W> {
        let source: Arc<dyn DefinitionSource> = match self.source {
            Some(source) => source,
            None => Arc::new(NoSource),
        };
        tracing::debug!(
            instance = %self.id,
            options = self.registry.len(),
            definitions_init = ?self.config.definitions_init,
            definitions_refresh = ?self.config.definitions_refresh,
            "behavior built"
        );
        Behavior::new(self.id, self.world, self.registry, source, self.config)
    }
}
