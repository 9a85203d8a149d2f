#![allow(dead_code)]

use std::sync::Arc;

use plantuner::catalog::Catalog;
use plantuner::common::types::ObjectId;
use plantuner::config::SettingsRegistry;
use plantuner::query::planner::HookChain;
use plantuner::tuner::PlanTuner;

/// A catalog with one table `orders` and three indexes on it
pub struct Fixture {
    pub catalog: Arc<Catalog>,
    pub registry: SettingsRegistry,
    pub hooks: HookChain,
    pub tuner: PlanTuner,
    pub orders: ObjectId,
    pub idx_a: ObjectId,
    pub idx_b: ObjectId,
    pub idx_c: ObjectId,
}

pub fn create_fixture() -> Fixture {
    let catalog = Arc::new(Catalog::new());
    let orders = catalog.create_table(None, "orders").unwrap();
    let idx_a = catalog.create_index("idx_a", orders).unwrap();
    let idx_b = catalog.create_index("idx_b", orders).unwrap();
    let idx_c = catalog.create_index("idx_c", orders).unwrap();
    catalog.set_block_count(orders, 8).unwrap();

    let mut registry = SettingsRegistry::new();
    let mut hooks = HookChain::new();
    let tuner = PlanTuner::init(catalog.clone(), &mut registry, &mut hooks).unwrap();

    Fixture { catalog, registry, hooks, tuner, orders, idx_a, idx_b, idx_c }
}
