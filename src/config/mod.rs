// Configuration Module
//
// Session settings registry and configuration file loading.

pub mod settings;
pub mod tuner_config;

pub use self::settings::{
    parse_bool, AssignHook, BoolAssignHook, CheckHook, SettingDefinition, SettingDescription,
    SettingError, SettingResult, SettingsRegistry, ShowHook,
};
pub use self::tuner_config::{ConfigError, ConfigResult, TunerConfig};
