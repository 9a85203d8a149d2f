// Planner Hook Chain Integration Tests

use std::sync::Arc;

use anyhow::Result;
use parking_lot::Mutex;
use plantuner::common::types::ObjectId;
use plantuner::query::planner::{get_relation_info, PlanResult, RelOptInfo, RelationInfoHook};
use plantuner::tuner::{DISABLE_INDEX, INDEX_FILTER_HOOK_NAME};

#[path = "../common/mod.rs"]
mod common;
use common::create_fixture;

/// Records the candidate list it was handed
struct Observer {
    seen: Arc<Mutex<Vec<Vec<ObjectId>>>>,
}

impl RelationInfoHook for Observer {
    fn name(&self) -> &str {
        "observer"
    }

    fn get_relation_info(&self, _relation: ObjectId, _inhparent: bool, rel: &mut RelOptInfo) -> PlanResult<()> {
        self.seen.lock().push(rel.index_ids());
        Ok(())
    }
}

#[test]
fn test_previous_hook_sees_filtered_list() -> Result<()> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let mut f = create_fixture();

    // Rebuild the chain so the observer was installed before the tuner
    f.hooks = plantuner::query::planner::HookChain::new();
    f.hooks.install(Arc::new(Observer { seen: seen.clone() }));
    assert!(f.tuner.install(&mut f.hooks));
    assert!(!f.tuner.install(&mut f.hooks));
    assert_eq!(f.hooks.names(), vec!["observer".to_string(), INDEX_FILTER_HOOK_NAME.to_string()]);

    f.registry.set(DISABLE_INDEX, "idx_b")?;
    get_relation_info(&f.catalog, &f.hooks, f.orders, false)?;

    assert_eq!(*seen.lock(), vec![vec![f.idx_a, f.idx_c]]);
    Ok(())
}

#[test]
fn test_chain_runs_for_non_tables() -> Result<()> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let mut f = create_fixture();
    f.hooks = plantuner::query::planner::HookChain::new();
    f.hooks.install(Arc::new(Observer { seen: seen.clone() }));
    f.tuner.install(&mut f.hooks);

    let view = f.catalog.create_view(None, "v")?;
    get_relation_info(&f.catalog, &f.hooks, view, false)?;
    assert_eq!(seen.lock().len(), 1);
    Ok(())
}

#[test]
fn test_filtering_twice_is_stable() -> Result<()> {
    let mut f = create_fixture();
    f.registry.set(DISABLE_INDEX, "idx_a, idx_a, idx_c")?;

    let mut rel = get_relation_info(&f.catalog, &f.hooks, f.orders, false)?;
    let once = rel.clone();
    f.hooks.run(f.orders, false, &mut rel)?;
    assert_eq!(rel, once);
    assert_eq!(rel.index_ids(), vec![f.idx_b]);
    Ok(())
}

#[test]
fn test_inheritance_parent_is_filtered_too() -> Result<()> {
    let mut f = create_fixture();
    f.registry.set(DISABLE_INDEX, "idx_a")?;
    let rel = get_relation_info(&f.catalog, &f.hooks, f.orders, true)?;
    assert!(!rel.has_index(f.idx_a));
    Ok(())
}
