//! Per-instance engine configuration.

/// When definitions blocks are built.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DefinitionsInit {
    /// On each option's first call.
    #[default]
    Lazy,
    /// For every registered and declared option at the first `begin_cycle`.
    Eager,
}

/// Whether definitions blocks are revisited after they are built.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RefreshPolicy {
    /// Computed once, then immutable.
    #[default]
    Once,
    /// `Definitions::refresh` runs for every built block at `begin_cycle`.
    EveryCycle,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BehaviorConfig {
    /// Fill the activation graph every cycle.  Default: `true`.
    pub record_activation: bool,
    pub definitions_init: DefinitionsInit,
    pub definitions_refresh: RefreshPolicy,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            record_activation: true,
            definitions_init: DefinitionsInit::Lazy,
            definitions_refresh: RefreshPolicy::Once,
        }
    }
}
