// Index Filter Integration Tests
//
// Exercises the disabled/enabled lists and the empty-table rule through the
// settings surface and the planner hook chain.

use anyhow::Result;
use plantuner::query::planner::get_relation_info;
use plantuner::tuner::{DISABLE_INDEX, ENABLE_INDEX, FIX_EMPTY_TABLE, FORBID_INDEX};

#[path = "../common/mod.rs"]
mod common;
use common::create_fixture;

#[test]
fn test_no_settings_is_a_no_op() -> Result<()> {
    let f = create_fixture();
    let rel = get_relation_info(&f.catalog, &f.hooks, f.orders, false)?;
    assert_eq!(rel.index_ids(), vec![f.idx_a, f.idx_b, f.idx_c]);
    assert_eq!(rel.pages, 8);
    Ok(())
}

#[test]
fn test_enable_overrides_disable() -> Result<()> {
    let mut f = create_fixture();
    f.registry.set(DISABLE_INDEX, "idx_a, idx_b")?;
    f.registry.set(ENABLE_INDEX, "idx_b")?;

    let rel = get_relation_info(&f.catalog, &f.hooks, f.orders, false)?;
    assert_eq!(rel.index_ids(), vec![f.idx_b, f.idx_c]);
    Ok(())
}

#[test]
fn test_unknown_names_do_not_block_valid_ones() -> Result<()> {
    let mut f = create_fixture();
    f.registry.set(DISABLE_INDEX, "bad_name, idx_c, orders")?;

    assert_eq!(f.tuner.state().disabled.snapshot().as_slice(), &[f.idx_c]);
    assert_eq!(f.registry.show(DISABLE_INDEX)?, "public.idx_c");
    Ok(())
}

#[test]
fn test_malformed_value_keeps_previous_lists() -> Result<()> {
    let mut f = create_fixture();
    f.registry.set(DISABLE_INDEX, "idx_a")?;
    assert!(f.registry.set(DISABLE_INDEX, "idx_b, \"idx_c").is_err());

    let rel = get_relation_info(&f.catalog, &f.hooks, f.orders, false)?;
    assert_eq!(rel.index_ids(), vec![f.idx_b, f.idx_c]);
    Ok(())
}

#[test]
fn test_forbid_index_is_an_alias() -> Result<()> {
    let mut f = create_fixture();
    f.registry.set(FORBID_INDEX, "idx_a")?;
    assert_eq!(f.registry.show(DISABLE_INDEX)?, "public.idx_a");

    f.registry.set(DISABLE_INDEX, "idx_b")?;
    assert_eq!(f.registry.show(FORBID_INDEX)?, "public.idx_b");

    let rel = get_relation_info(&f.catalog, &f.hooks, f.orders, false)?;
    assert_eq!(rel.index_ids(), vec![f.idx_a, f.idx_c]);
    Ok(())
}

#[test]
fn test_reset_restores_all_indexes() -> Result<()> {
    let mut f = create_fixture();
    f.registry.set(DISABLE_INDEX, "idx_a, idx_b, idx_c")?;
    f.registry.reset(DISABLE_INDEX)?;

    let rel = get_relation_info(&f.catalog, &f.hooks, f.orders, false)?;
    assert_eq!(rel.index_ids().len(), 3);
    assert_eq!(f.registry.show(DISABLE_INDEX)?, "");
    Ok(())
}

#[test]
fn test_fix_empty_table() -> Result<()> {
    let mut f = create_fixture();
    let empty = f.catalog.create_table(None, "fresh")?;

    let before = get_relation_info(&f.catalog, &f.hooks, empty, false)?;
    assert!(before.pages > 0);
    assert!(before.tuples > 0.0);

    f.registry.set(FIX_EMPTY_TABLE, "on")?;
    let after = get_relation_info(&f.catalog, &f.hooks, empty, false)?;
    assert_eq!(after.pages, 0);
    assert_eq!(after.tuples, 0.0);

    // Tables with storage keep their estimates
    let orders = get_relation_info(&f.catalog, &f.hooks, f.orders, false)?;
    assert_eq!(orders.pages, 8);
    Ok(())
}

#[test]
fn test_fix_empty_table_independent_of_lists() -> Result<()> {
    let mut f = create_fixture();
    f.registry.set(FIX_EMPTY_TABLE, "true")?;
    f.registry.set(DISABLE_INDEX, "")?;
    f.registry.set(ENABLE_INDEX, "")?;
    f.catalog.set_block_count(f.orders, 0)?;

    let rel = get_relation_info(&f.catalog, &f.hooks, f.orders, false)?;
    assert_eq!(rel.index_ids().len(), 3);
    assert_eq!(rel.pages, 0);
    Ok(())
}

#[test]
fn test_indexes_of_other_tables_unaffected() -> Result<()> {
    let mut f = create_fixture();
    let items = f.catalog.create_table(None, "items")?;
    let items_idx = f.catalog.create_index("items_idx", items)?;
    f.registry.set(DISABLE_INDEX, "idx_a")?;

    let rel = get_relation_info(&f.catalog, &f.hooks, items, false)?;
    assert_eq!(rel.index_ids(), vec![items_idx]);
    Ok(())
}

#[test]
fn test_show_after_index_dropped() -> Result<()> {
    let mut f = create_fixture();
    f.registry.set(ENABLE_INDEX, "idx_a, idx_b")?;
    f.catalog.drop_relation(f.idx_a)?;
    assert_eq!(f.registry.show(ENABLE_INDEX)?, "public.idx_b");
    Ok(())
}
