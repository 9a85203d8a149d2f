// Settings Surface Integration Tests

use anyhow::Result;
use plantuner::config::SettingError;
use plantuner::query::parser::IdentifierError;
use plantuner::tuner::{DISABLE_INDEX, ENABLE_INDEX, FIX_EMPTY_TABLE, FORBID_INDEX};

#[path = "../common/mod.rs"]
mod common;
use common::create_fixture;

#[test]
fn test_all_settings_defined() {
    let f = create_fixture();
    let names: Vec<String> = f.registry.describe().into_iter().map(|d| d.name).collect();
    assert_eq!(names, vec![
        DISABLE_INDEX.to_string(),
        ENABLE_INDEX.to_string(),
        FIX_EMPTY_TABLE.to_string(),
        FORBID_INDEX.to_string(),
    ]);

    let flag = f.registry.describe().into_iter().find(|d| d.name == FIX_EMPTY_TABLE).unwrap();
    assert!(flag.not_in_sample);
    assert_eq!(flag.setting, "off");
}

#[test]
fn test_show_normalizes_names() -> Result<()> {
    let mut f = create_fixture();
    f.catalog.create_schema("Sales")?;
    let t = f.catalog.create_table(Some("Sales"), "t")?;
    f.catalog.create_index("By Date", t)?;

    f.registry.set(ENABLE_INDEX, " IDX_C ,\"Sales\".\"By Date\" ")?;
    assert_eq!(f.registry.show(ENABLE_INDEX)?, "public.idx_c, \"Sales\".\"By Date\"");
    Ok(())
}

#[test]
fn test_show_round_trip_resolves_same_set() -> Result<()> {
    let mut f = create_fixture();
    f.registry.set(DISABLE_INDEX, "idx_c, public.idx_a")?;
    let before = f.tuner.state().disabled.snapshot();

    let shown = f.registry.show(DISABLE_INDEX)?;
    f.registry.set(DISABLE_INDEX, &shown)?;
    assert_eq!(f.tuner.state().disabled.snapshot(), before);
    Ok(())
}

#[test]
fn test_malformed_value_is_rejected() {
    let mut f = create_fixture();
    let err = f.registry.set(ENABLE_INDEX, "idx_a idx_b").unwrap_err();
    assert!(matches!(
        err,
        SettingError::Rejected { source: IdentifierError::UnexpectedCharacter { .. }, .. }
    ));
}

#[test]
fn test_invalid_bool_is_rejected() {
    let mut f = create_fixture();
    assert!(matches!(
        f.registry.set(FIX_EMPTY_TABLE, "sometimes"),
        Err(SettingError::InvalidValue { .. })
    ));
    assert!(!f.tuner.state().fix_empty_table());
}

#[test]
fn test_reset_all() -> Result<()> {
    let mut f = create_fixture();
    f.registry.set(DISABLE_INDEX, "idx_a")?;
    f.registry.set(ENABLE_INDEX, "idx_a")?;
    f.registry.set(FIX_EMPTY_TABLE, "on")?;

    f.registry.reset_all()?;
    assert!(f.tuner.state().disabled.snapshot().is_empty());
    assert!(f.tuner.state().enabled.snapshot().is_empty());
    assert!(!f.tuner.state().fix_empty_table());
    Ok(())
}

#[test]
fn test_settings_cannot_be_registered_twice() {
    let mut f = create_fixture();
    assert!(matches!(
        f.tuner.register_settings(&mut f.registry),
        Err(SettingError::AlreadyDefined(_))
    ));
}
