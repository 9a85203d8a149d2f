//! Planner Tuner Module
//!
//! Session-level index visibility overrides for the planner. A `PlanTuner`
//! owns the disabled and enabled index lists and the empty-table flag,
//! exposes them as settings, and installs an `IndexFilter` on the
//! relation-info hook chain.
//!
//! ```text
//! SET plantuner.disable_index = 'idx_a, idx_b'   -- check, then commit
//! SET plantuner.enable_index  = 'idx_b'          -- overrides the disable
//! planning t(idx_a, idx_b, idx_c)  ->  candidates idx_b, idx_c
//! ```

pub mod binder;
pub mod index_filter;
pub mod reference_set;
pub mod size_override;
pub mod state;

pub use self::binder::{IndexListBinder, IndexListKind};
pub use self::index_filter::{filter_indexes, IndexFilter, INDEX_FILTER_HOOK_NAME};
pub use self::reference_set::{parse_reference_set, Notice, ParsedReferences, ReferenceSet};
pub use self::size_override::{apply_size_override, SizeEstimate};
pub use self::state::TunerState;

use std::sync::Arc;

use log::warn;

use crate::catalog::CatalogAccess;
use crate::config::{
    AssignHook, CheckHook, SettingDefinition, SettingError, SettingResult, SettingsRegistry, ShowHook,
};
use crate::query::planner::{HookChain, RelationInfoHook};

/// Deprecated alias of `DISABLE_INDEX`
pub const FORBID_INDEX: &str = "plantuner.forbid_index";
pub const DISABLE_INDEX: &str = "plantuner.disable_index";
pub const ENABLE_INDEX: &str = "plantuner.enable_index";
pub const FIX_EMPTY_TABLE: &str = "plantuner.fix_empty_table";

/// Build the check/assign/show hooks binding a setting to one index list
fn index_list_hooks(
    state: &Arc<TunerState>,
    kind: IndexListKind,
    name: &'static str,
    deprecated_for: Option<&'static str>,
) -> (CheckHook, AssignHook, ShowHook) {
    let check_state = state.clone();
    let check: CheckHook = Box::new(move |value: &str| {
        check_state.binder(kind).validate(value)
            .map(|_| value.to_string())
            .map_err(|source| SettingError::Rejected { name: name.to_string(), source })
    });

    let assign_state = state.clone();
    let assign: AssignHook = Box::new(move |value: &str| {
        if let Some(replacement) = deprecated_for {
            if !value.trim().is_empty() {
                warn!("{} is deprecated, use {}", name, replacement);
            }
        }
        assign_state.binder(kind).commit(value)
            .map_err(|source| SettingError::Rejected { name: name.to_string(), source })
    });

    let show_state = state.clone();
    let show: ShowHook = Box::new(move || show_state.binder(kind).show());

    (check, assign, show)
}

/// Session-level planner tuner
pub struct PlanTuner {
    state: Arc<TunerState>,
    filter: Arc<IndexFilter>,
}

impl PlanTuner {
    /// Create a tuner with empty index lists and the flag off
    pub fn new(catalog: Arc<dyn CatalogAccess>) -> Self {
        let state = Arc::new(TunerState::new(catalog.clone()));
        let filter = Arc::new(IndexFilter::new(state.clone(), catalog));
        PlanTuner { state, filter }
    }

    /// Create a tuner, define its settings and install its filter
    pub fn init(
        catalog: Arc<dyn CatalogAccess>,
        registry: &mut SettingsRegistry,
        hooks: &mut HookChain,
    ) -> SettingResult<Self> {
        let tuner = PlanTuner::new(catalog);
        tuner.register_settings(registry)?;
        tuner.install(hooks);
        Ok(tuner)
    }

    /// Define the tuner's settings. `forbid_index` and `disable_index` are two
    /// names for the same disabled list.
    pub fn register_settings(&self, registry: &mut SettingsRegistry) -> SettingResult<()> {
        let (check, assign, show) =
            index_list_hooks(&self.state, IndexListKind::Disabled, FORBID_INDEX, Some(DISABLE_INDEX));
        registry.define_string(
            SettingDefinition::new(
                FORBID_INDEX,
                "List of forbidden indexes (deprecated)",
                "Listed indexes will not be used in queries (deprecated, use plantuner.disable_index)",
            ),
            "",
            Some(check),
            Some(assign),
            Some(show),
        )?;

        let (check, assign, show) =
            index_list_hooks(&self.state, IndexListKind::Disabled, DISABLE_INDEX, None);
        registry.define_string(
            SettingDefinition::new(
                DISABLE_INDEX,
                "List of disabled indexes",
                "Listed indexes will not be used in queries",
            ),
            "",
            Some(check),
            Some(assign),
            Some(show),
        )?;

        let (check, assign, show) =
            index_list_hooks(&self.state, IndexListKind::Enabled, ENABLE_INDEX, None);
        registry.define_string(
            SettingDefinition::new(
                ENABLE_INDEX,
                "List of enabled indexes (overload plantuner.disable_index)",
                "Listed indexes which could be used in queries even they are listed in plantuner.disable_index",
            ),
            "",
            Some(check),
            Some(assign),
            Some(show),
        )?;

        let flag_state = self.state.clone();
        registry.define_bool(
            SettingDefinition::new(
                FIX_EMPTY_TABLE,
                "Sets to zero estimations for empty tables",
                "Sets to zero estimations for empty or newly created tables",
            )
            .not_in_sample(),
            self.state.fix_empty_table(),
            Some(Box::new(move |value| flag_state.set_fix_empty_table(value))),
        )
    }

    /// Install the index filter on the hook chain; a second install is a no-op
    pub fn install(&self, hooks: &mut HookChain) -> bool {
        let hook: Arc<dyn RelationInfoHook> = self.filter.clone();
        hooks.install(hook)
    }

    pub fn state(&self) -> &Arc<TunerState> {
        &self.state
    }

    pub fn filter(&self) -> Arc<IndexFilter> {
        self.filter.clone()
    }
}
