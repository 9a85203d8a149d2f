// Configuration File Integration Tests

use std::io::Write;

use anyhow::Result;
use plantuner::config::{ConfigError, TunerConfig};
use plantuner::query::planner::get_relation_info;
use plantuner::tuner::{DISABLE_INDEX, FIX_EMPTY_TABLE};
use tempfile::NamedTempFile;

#[path = "../common/mod.rs"]
mod common;
use common::create_fixture;

#[test]
fn test_load_and_apply_config_file() -> Result<()> {
    let mut f = create_fixture();

    let mut file = NamedTempFile::new()?;
    write!(file, r#"{{ "disable_index": "idx_a, idx_b", "enable_index": "idx_a", "fix_empty_table": true }}"#)?;

    let config = TunerConfig::load(file.path())?;
    config.apply(&mut f.registry)?;

    assert_eq!(f.registry.show(DISABLE_INDEX)?, "public.idx_a, public.idx_b");
    assert_eq!(f.registry.show(FIX_EMPTY_TABLE)?, "on");

    let rel = get_relation_info(&f.catalog, &f.hooks, f.orders, false)?;
    assert_eq!(rel.index_ids(), vec![f.idx_a, f.idx_c]);
    Ok(())
}

#[test]
fn test_malformed_list_in_config_is_rejected() -> Result<()> {
    let mut f = create_fixture();
    let config = TunerConfig::from_json(r#"{ "disable_index": "idx_a,," }"#)?;
    assert!(matches!(config.apply(&mut f.registry), Err(ConfigError::Setting(_))));
    assert!(f.tuner.state().disabled.snapshot().is_empty());
    Ok(())
}

#[test]
fn test_missing_file() {
    assert!(matches!(
        TunerConfig::load("/nonexistent/plantuner.json"),
        Err(ConfigError::Io(_))
    ));
}
