use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::catalog::CatalogAccess;
use super::binder::{IndexListBinder, IndexListKind};

/// Per-session tuner state: the two index lists and the empty-table flag
pub struct TunerState {
    pub disabled: IndexListBinder,
    pub enabled: IndexListBinder,
    fix_empty_table: AtomicBool,
}

impl TunerState {
    pub fn new(catalog: Arc<dyn CatalogAccess>) -> Self {
        TunerState {
            disabled: IndexListBinder::new(IndexListKind::Disabled, catalog.clone()),
            enabled: IndexListBinder::new(IndexListKind::Enabled, catalog),
            fix_empty_table: AtomicBool::new(false),
        }
    }

    pub fn fix_empty_table(&self) -> bool {
        self.fix_empty_table.load(Ordering::Acquire)
    }

    pub fn set_fix_empty_table(&self, value: bool) {
        self.fix_empty_table.store(value, Ordering::Release);
    }

    pub fn binder(&self, kind: IndexListKind) -> &IndexListBinder {
        match kind {
            IndexListKind::Disabled => &self.disabled,
            IndexListKind::Enabled => &self.enabled,
        }
    }
}
