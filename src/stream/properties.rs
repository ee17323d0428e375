//! Stream graph property definitions with defaults from streamgraph.json
//!
//! streamgraph.json is embedded at compile time, so defaults live in one place
//! and the rest of the crate never hardcodes a fallback value.

use super::error::{Result, StreamGraphError};
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;

/// streamgraph.json embedded at compile time
const PROPERTIES_JSON: &str = include_str!("../../streamgraph.json");

/// Property definition from streamgraph.json
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDef {
    pub name: String,
    pub kind: PropertyKind,
    #[serde(default)]
    pub default_value: String,
    #[serde(default)]
    pub description: String,
    /// For EnumeratedProperty, the valid values
    #[serde(default, rename = "values")]
    pub valid_values: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum PropertyKind {
    #[serde(rename = "StringProperty")]
    String,
    #[serde(rename = "DoubleProperty")]
    Double,
    #[serde(rename = "EnumeratedProperty")]
    Enumerated,
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            PropertyKind::String => "string",
            PropertyKind::Double => "double",
            PropertyKind::Enumerated => "enum",
        })
    }
}

#[derive(Deserialize)]
struct PropertyFile {
    properties: Vec<PropertyDef>,
}

/// Registry of all properties with their defaults
#[derive(Debug, Clone, Default)]
pub struct PropertyRegistry {
    /// Definitions in file order
    definitions: Vec<PropertyDef>,
    by_name: HashMap<String, usize>,
}

impl PropertyRegistry {
    /// Build a registry from a property file
    ///
    /// Fails on duplicate names and on enumerated properties without values.
    pub fn from_json(json: &str) -> Result<Self> {
        let file: PropertyFile = serde_json::from_str(json)?;

        let mut registry = Self::default();
        for def in file.properties {
            if registry.by_name.contains_key(&def.name) {
                return Err(StreamGraphError::Config(format!(
                    "Duplicate property '{}'",
                    def.name
                )));
            }
            if def.kind == PropertyKind::Enumerated && def.valid_values.is_none() {
                return Err(StreamGraphError::Config(format!(
                    "Enumerated property '{}' has no values",
                    def.name
                )));
            }
            registry
                .by_name
                .insert(def.name.clone(), registry.definitions.len());
            registry.definitions.push(def);
        }

        tracing::debug!(count = registry.definitions.len(), "Loaded properties");
        Ok(registry)
    }

    pub fn get_default(&self, name: &str) -> Option<&str> {
        self.get_property(name).map(|p| p.default_value.as_str())
    }

    pub fn get_property(&self, name: &str) -> Option<&PropertyDef> {
        self.by_name.get(name).map(|&i| &self.definitions[i])
    }

    /// All definitions in file order
    pub fn definitions(&self) -> impl Iterator<Item = &PropertyDef> {
        self.definitions.iter()
    }

    /// Check if a value is valid for an enumerated property
    pub fn is_valid_enum_value(&self, name: &str, value: &str) -> bool {
        self.get_property(name)
            .and_then(|p| p.valid_values.as_ref())
            .map(|values| values.iter().any(|v| v.eq_ignore_ascii_case(value)))
            .unwrap_or(true)
    }
}

static REGISTRY: Lazy<PropertyRegistry> = Lazy::new(|| {
    PropertyRegistry::from_json(PROPERTIES_JSON).unwrap_or_else(|e| {
        tracing::error!("Failed to load streamgraph.json: {}", e);
        PropertyRegistry::default()
    })
});

/// Global property registry
pub fn registry() -> &'static PropertyRegistry {
    &REGISTRY
}

/// Typed property reader
///
/// User values win over registry defaults. Values that fail to parse or
/// validate are reported and replaced by the default.
#[derive(Debug, Clone, Default)]
pub struct PropertyReader {
    user_values: HashMap<String, String>,
}

impl PropertyReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a user value; empty values mean "not set"
    ///
    /// Fails for names the registry does not define.
    pub fn set(&mut self, name: &str, value: &str) -> Result<()> {
        if registry().get_property(name).is_none() {
            return Err(StreamGraphError::Config(format!(
                "unknown property '{}'",
                name
            )));
        }
        if value.is_empty() {
            self.user_values.remove(name);
        } else {
            self.user_values.insert(name.to_string(), value.to_string());
        }
        Ok(())
    }

    /// Parse and set a `name=value` assignment
    pub fn set_assignment(&mut self, assignment: &str) -> Result<()> {
        let (name, value) = assignment.split_once('=').ok_or_else(|| {
            StreamGraphError::Config(format!(
                "expected 'name=value', got '{}'",
                assignment
            ))
        })?;
        self.set(name.trim(), value.trim())
    }

    /// Merge a flat JSON object of `name: value` pairs
    ///
    /// Numbers and booleans are accepted and stored in their JSON text form.
    pub fn merge_json(&mut self, json: &str) -> Result<()> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let object = value.as_object().ok_or_else(|| {
            StreamGraphError::Config("property file must hold a JSON object".to_string())
        })?;

        for (name, value) in object {
            let text = match value {
                serde_json::Value::String(s) => s.clone(),
                serde_json::Value::Number(n) => n.to_string(),
                serde_json::Value::Bool(b) => b.to_string(),
                other => {
                    return Err(StreamGraphError::Config(format!(
                        "property '{}' has unsupported value {}",
                        name, other
                    )))
                }
            };
            self.set(name, &text)?;
        }
        Ok(())
    }

    /// User value, or the registry default
    pub fn get_string(&self, name: &str) -> String {
        if let Some(value) = self.user_values.get(name) {
            return value.clone();
        }
        registry().get_default(name).unwrap_or("").to_string()
    }

    /// Enumerated value, lowercased; invalid user values fall back to the default
    pub fn get_enum(&self, name: &str) -> String {
        let reg = registry();
        let default = reg.get_default(name).unwrap_or("");

        if let Some(value) = self.user_values.get(name) {
            if reg.is_valid_enum_value(name, value) {
                return value.to_lowercase();
            }
            let valid_values = reg
                .get_property(name)
                .and_then(|p| p.valid_values.as_ref())
                .map(|v| v.join(", "))
                .unwrap_or_default();
            tracing::warn!(
                "Invalid value '{}' for property '{}'. Valid values: [{}]. Using default: '{}'",
                value,
                name,
                valid_values,
                default
            );
        }

        default.to_string()
    }

    pub fn get_f64(&self, name: &str) -> f64 {
        let default = default_f64(name);
        let value = self.get_string(name);
        if value.is_empty() {
            return default;
        }

        match value.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => v,
            _ => {
                tracing::warn!(
                    "Invalid numeric value '{}' for property '{}'. Using default: {}",
                    value,
                    name,
                    default
                );
                default
            }
        }
    }

    pub fn get_f64_in_range(&self, name: &str, min: f64, max: f64) -> f64 {
        let value = self.get_f64(name);
        if (min..=max).contains(&value) {
            value
        } else {
            let default = default_f64(name);
            tracing::warn!(
                "Value {} for property '{}' out of range [{}, {}]. Using default: {}",
                value,
                name,
                min,
                max,
                default
            );
            default
        }
    }

    /// Non-negative integer property; fractional values are truncated
    pub fn get_usize(&self, name: &str) -> usize {
        let value = self.get_f64_in_range(name, 0.0, u32::MAX as f64);
        value as usize
    }
}

fn default_f64(name: &str) -> f64 {
    registry()
        .get_default(name)
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(0.0)
}
