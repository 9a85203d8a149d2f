// Settings Registry
//
// This module keeps named session settings with their check, assign and show
// hooks, the way the host's configuration subsystem drives extensions.

use std::collections::BTreeMap;

use log::debug;
use thiserror::Error;

use crate::query::parser::IdentifierError;

/// Errors raised when defining or changing settings
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SettingError {
    #[error("unrecognized configuration parameter \"{0}\"")]
    Unrecognized(String),

    #[error("configuration parameter \"{0}\" is already defined")]
    AlreadyDefined(String),

    #[error("parameter \"{name}\" requires a {expected} value, got \"{value}\"")]
    InvalidValue {
        name: String,
        value: String,
        expected: &'static str,
    },

    #[error("invalid value for parameter \"{name}\": {source}")]
    Rejected {
        name: String,
        #[source]
        source: IdentifierError,
    },
}

/// Result type for settings operations
pub type SettingResult<T> = Result<T, SettingError>;

/// Validates a proposed string value, possibly normalizing it
pub type CheckHook = Box<dyn Fn(&str) -> SettingResult<String> + Send + Sync>;

/// Applies a validated string value
pub type AssignHook = Box<dyn Fn(&str) -> SettingResult<()> + Send + Sync>;

/// Applies a boolean value
pub type BoolAssignHook = Box<dyn Fn(bool) + Send + Sync>;

/// Renders the effective value for display
pub type ShowHook = Box<dyn Fn() -> String + Send + Sync>;

/// Descriptive part of a setting definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingDefinition {
    pub name: String,
    pub short_desc: String,
    pub long_desc: String,
    /// Leave out of generated sample configuration
    pub not_in_sample: bool,
}

impl SettingDefinition {
    pub fn new(name: &str, short_desc: &str, long_desc: &str) -> Self {
        SettingDefinition {
            name: name.to_string(),
            short_desc: short_desc.to_string(),
            long_desc: long_desc.to_string(),
            not_in_sample: false,
        }
    }

    pub fn not_in_sample(mut self) -> Self {
        self.not_in_sample = true;
        self
    }
}

/// One row of `SHOW ALL`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingDescription {
    pub name: String,
    pub setting: String,
    pub short_desc: String,
    pub long_desc: String,
    pub not_in_sample: bool,
}

enum SettingValue {
    String {
        boot: String,
        current: String,
        check: Option<CheckHook>,
        assign: Option<AssignHook>,
        show: Option<ShowHook>,
    },
    Bool {
        boot: bool,
        current: bool,
        assign: Option<BoolAssignHook>,
    },
}

struct Setting {
    definition: SettingDefinition,
    value: SettingValue,
}

/// Parse a boolean setting value.
///
/// Accepts `on`/`off`, `1`/`0` and any unique prefix of `true`, `false`,
/// `yes`, `no`, ignoring case and surrounding whitespace.
pub fn parse_bool(value: &str) -> Option<bool> {
    let v = value.trim().to_ascii_lowercase();
    if v.is_empty() {
        return None;
    }
    match v.as_str() {
        "on" | "1" => return Some(true),
        "off" | "of" | "0" => return Some(false),
        _ => {}
    }
    if "true".starts_with(&v) || "yes".starts_with(&v) {
        Some(true)
    } else if "false".starts_with(&v) || "no".starts_with(&v) {
        Some(false)
    } else {
        None
    }
}

fn bool_to_str(value: bool) -> &'static str {
    if value { "on" } else { "off" }
}

/// Registry of session settings keyed by lower-cased name
#[derive(Default)]
pub struct SettingsRegistry {
    settings: BTreeMap<String, Setting>,
}

impl SettingsRegistry {
    pub fn new() -> Self {
        SettingsRegistry { settings: BTreeMap::new() }
    }

    fn key(name: &str) -> String {
        name.trim().to_ascii_lowercase()
    }

    fn insert(&mut self, definition: SettingDefinition, value: SettingValue) -> SettingResult<()> {
        let key = Self::key(&definition.name);
        if self.settings.contains_key(&key) {
            return Err(SettingError::AlreadyDefined(definition.name));
        }
        debug!("defined configuration parameter {}", definition.name);
        self.settings.insert(key, Setting { definition, value });
        Ok(())
    }

    /// Define a string setting. The boot value becomes the current value
    /// without running the hooks.
    pub fn define_string(
        &mut self,
        definition: SettingDefinition,
        boot: &str,
        check: Option<CheckHook>,
        assign: Option<AssignHook>,
        show: Option<ShowHook>,
    ) -> SettingResult<()> {
        self.insert(definition, SettingValue::String {
            boot: boot.to_string(),
            current: boot.to_string(),
            check,
            assign,
            show,
        })
    }

    /// Define a boolean setting
    pub fn define_bool(
        &mut self,
        definition: SettingDefinition,
        boot: bool,
        assign: Option<BoolAssignHook>,
    ) -> SettingResult<()> {
        self.insert(definition, SettingValue::Bool { boot, current: boot, assign })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.settings.contains_key(&Self::key(name))
    }

    fn get_mut(&mut self, name: &str) -> SettingResult<&mut Setting> {
        self.settings.get_mut(&Self::key(name))
            .ok_or_else(|| SettingError::Unrecognized(name.to_string()))
    }

    /// Set a value: check it, then assign it. A failed check leaves the
    /// setting and everything behind it unchanged.
    pub fn set(&mut self, name: &str, value: &str) -> SettingResult<()> {
        let setting = self.get_mut(name)?;
        let setting_name = setting.definition.name.clone();

        match &mut setting.value {
            SettingValue::String { current, check, assign, .. } => {
                let checked = match check {
                    Some(check) => check(value)?,
                    None => value.to_string(),
                };
                if let Some(assign) = assign {
                    assign(&checked)?;
                }
                *current = checked;
            }
            SettingValue::Bool { current, assign, .. } => {
                let parsed = parse_bool(value).ok_or_else(|| SettingError::InvalidValue {
                    name: setting_name.clone(),
                    value: value.to_string(),
                    expected: "Boolean",
                })?;
                if let Some(assign) = assign {
                    assign(parsed);
                }
                *current = parsed;
            }
        }

        debug!("set {} = '{}'", setting_name, value);
        Ok(())
    }

    /// Display value: the show hook's output if there is one, otherwise the
    /// stored value
    pub fn show(&self, name: &str) -> SettingResult<String> {
        let setting = self.settings.get(&Self::key(name))
            .ok_or_else(|| SettingError::Unrecognized(name.to_string()))?;
        Ok(Self::display(setting))
    }

    fn display(setting: &Setting) -> String {
        match &setting.value {
            SettingValue::String { current, show, .. } => match show {
                Some(show) => show(),
                None => current.clone(),
            },
            SettingValue::Bool { current, .. } => bool_to_str(*current).to_string(),
        }
    }

    /// Set a setting back to its boot value
    pub fn reset(&mut self, name: &str) -> SettingResult<()> {
        let boot = match &self.get_mut(name)?.value {
            SettingValue::String { boot, .. } => boot.clone(),
            SettingValue::Bool { boot, .. } => bool_to_str(*boot).to_string(),
        };
        self.set(name, &boot)
    }

    /// Reset every setting
    pub fn reset_all(&mut self) -> SettingResult<()> {
        let names: Vec<String> = self.settings.keys().cloned().collect();
        for name in names {
            self.reset(&name)?;
        }
        Ok(())
    }

    /// All settings in name order
    pub fn describe(&self) -> Vec<SettingDescription> {
        self.settings.values()
            .map(|s| SettingDescription {
                name: s.definition.name.clone(),
                setting: Self::display(s),
                short_desc: s.definition.short_desc.clone(),
                long_desc: s.definition.long_desc.clone(),
                not_in_sample: s.definition.not_in_sample,
            })
            .collect()
    }
}
