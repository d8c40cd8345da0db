//! The `Definitions` trait implemented by every option's definitions block.

use hb_core::FrameTime;

use crate::{DefinitionSource, DefsResult, KeyValues};

/// Constant parameters private to one option.
///
/// A block is built once per behavior instance, either from compiled-in
/// defaults (ignore the loader) or from the option's resource:
///
/// ```rust,ignore
/// #[derive(Debug)]
/// struct StrikerDefs { lead_distance: i32, lane_y: i32 }
///
/// impl Definitions for StrikerDefs {
///     fn init(loader: &DefinitionLoader<'_>) -> DefsResult<Self> {
///         let kv = loader.load()?;
///         Ok(Self { lead_distance: kv.get("lead_distance")?, lane_y: kv.get("lane_y")? })
///     }
/// }
/// ```
///
/// After `init` the block is immutable to the option.  The container may
/// call [`refresh`][Self::refresh] at the start of every cycle when the
/// `EveryCycle` refresh policy is configured.
pub trait Definitions: Sized + Send + 'static {
    /// Build the block.
    fn init(loader: &DefinitionLoader<'_>) -> DefsResult<Self>;

    /// Per-cycle hook under the `EveryCycle` policy.  Default: no-op.
    fn refresh(&mut self, _now: FrameTime) {}
}

/// Options without definitions use `()`.
impl Definitions for () {
    fn init(_loader: &DefinitionLoader<'_>) -> DefsResult<Self> {
        Ok(())
    }
}

/// Gives a [`Definitions::init`] call access to the option's resource.
pub struct DefinitionLoader<'a> {
    option: &'static str,
    source: &'a dyn DefinitionSource,
}

impl<'a> DefinitionLoader<'a> {
    pub fn new(option: &'static str, source: &'a dyn DefinitionSource) -> Self {
        Self { option, source }
    }

    /// Name of the option whose block is being built.
    pub fn option(&self) -> &'static str {
        self.option
    }

    /// Read and parse the option's resource.
    pub fn load(&self) -> DefsResult<KeyValues> {
        let text = self.source.open(self.option)?;
        KeyValues::parse(self.option, &text)
    }
}
