//! Field profiles: what each measurement key can be compared with.
//!
//! The editor consults the catalog whenever a row's field key changes, and
//! the validation pass uses it to tell boolean fields from numeric ones.

use crate::error::{ProfileError, Result};
use crate::types::Operator;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Value domain of a measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    #[default]
    Numeric,
    Boolean,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldProfile {
    pub key: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub value_kind: ValueKind,
    /// Operators offered for this field. Empty means every operator.
    #[serde(default)]
    pub operators: Vec<Operator>,
    #[serde(default)]
    pub default_operator: Option<Operator>,
}

impl FieldProfile {
    pub fn numeric(key: &str) -> Self {
        Self {
            key: key.to_string(),
            label: None,
            unit: None,
            value_kind: ValueKind::Numeric,
            operators: Vec::new(),
            default_operator: None,
        }
    }

    pub fn boolean(key: &str) -> Self {
        Self {
            value_kind: ValueKind::Boolean,
            operators: vec![Operator::BOOLEAN],
            default_operator: Some(Operator::BOOLEAN),
            ..Self::numeric(key)
        }
    }

    pub fn is_boolean(&self) -> bool {
        self.value_kind == ValueKind::Boolean
    }

    pub fn allows(&self, op: Operator) -> bool {
        if self.is_boolean() {
            return op == Operator::BOOLEAN;
        }
        self.operators.is_empty() || self.operators.contains(&op)
    }

    /// Operator a single-value row of this field falls back to.
    pub fn default_single_operator(&self) -> Operator {
        if self.is_boolean() {
            return Operator::BOOLEAN;
        }
        if let Some(op) = self.default_operator.filter(|op| !op.is_range()) {
            return op;
        }
        if self.allows(Operator::DEFAULT_SINGLE) {
            return Operator::DEFAULT_SINGLE;
        }
        self.operators
            .iter()
            .copied()
            .find(|op| !op.is_range())
            .unwrap_or(Operator::DEFAULT_SINGLE)
    }
}

#[derive(Deserialize)]
struct ProfilesFile {
    #[serde(default)]
    fields: Vec<FieldProfile>,
}

/// Catalog of field profiles keyed by field key.
#[derive(Debug, Clone, Default)]
pub struct FieldProfiles {
    fields: HashMap<String, FieldProfile>,
}

impl FieldProfiles {
    /// Builds a catalog, rejecting empty or repeated keys.
    pub fn new(profiles: Vec<FieldProfile>) -> Result<Self> {
        let mut fields = HashMap::with_capacity(profiles.len());
        for profile in profiles {
            if profile.key.trim().is_empty() {
                return Err(ProfileError::EmptyKey);
            }
            if fields.contains_key(&profile.key) {
                return Err(ProfileError::DuplicateField(profile.key));
            }
            fields.insert(profile.key.clone(), profile);
        }
        Ok(Self { fields })
    }

    /// Parses `[[fields]]` tables.
    ///
    /// # Examples
    ///
    /// ```
    /// use evset_common::profile::FieldProfiles;
    ///
    /// let profiles = FieldProfiles::from_toml_str(r#"
    ///     [[fields]]
    ///     key = "door_open"
    ///     value_kind = "boolean"
    /// "#).unwrap();
    /// assert!(profiles.is_boolean("door_open"));
    /// ```
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: ProfilesFile = toml::from_str(content)?;
        Self::new(file.fields)
    }

    /// Measurements every installation knows about.
    pub fn builtin() -> Self {
        let with_unit = |mut p: FieldProfile, label: &str, unit: &str| {
            p.label = Some(label.to_string());
            p.unit = Some(unit.to_string());
            p
        };
        let mut door = FieldProfile::boolean("door_open");
        door.label = Some("Door open".to_string());
        let mut leak = FieldProfile::boolean("water_leak");
        leak.label = Some("Water leak".to_string());

        let profiles = vec![
            with_unit(FieldProfile::numeric("temperature"), "Temperature", "°C"),
            with_unit(FieldProfile::numeric("humidity"), "Humidity", "%"),
            with_unit(FieldProfile::numeric("co2"), "CO2", "ppm"),
            with_unit(FieldProfile::numeric("pm25"), "PM2.5", "µg/m³"),
            with_unit(FieldProfile::numeric("battery"), "Battery", "%"),
            door,
            leak,
        ];
        Self {
            fields: profiles.into_iter().map(|p| (p.key.clone(), p)).collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&FieldProfile> {
        self.fields.get(key)
    }

    /// Unknown keys are treated as numeric.
    pub fn is_boolean(&self, key: &str) -> bool {
        self.get(key).is_some_and(FieldProfile::is_boolean)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Profiles ordered by key.
    pub fn to_vec(&self) -> Vec<FieldProfile> {
        let mut out: Vec<FieldProfile> = self.fields.values().cloned().collect();
        out.sort_by(|a, b| a.key.cmp(&b.key));
        out
    }
}
