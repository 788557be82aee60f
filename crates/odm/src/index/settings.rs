//! Index settings.
//!
//! [`Settings`] keeps settings as a nested JSON object. Keys given with dots
//! (`index.number_of_shards`) are expanded into nested objects on the way in, so
//! settings written either way merge cleanly.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::entity::{EntityDescriptor, SettingAnnotation};
use crate::error::{MappingResult, MisuseError, ResourceError};
use crate::resource::ResourceLoader;

const KEY_SHARDS: &str = "index.number_of_shards";
const KEY_REPLICAS: &str = "index.number_of_replicas";
const KEY_REFRESH_INTERVAL: &str = "index.refresh_interval";
const KEY_STORE_TYPE: &str = "index.store.type";
const KEY_SORT_FIELD: &str = "index.sort.field";
const KEY_SORT_ORDER: &str = "index.sort.order";
const KEY_SORT_MODE: &str = "index.sort.mode";
const KEY_SORT_MISSING: &str = "index.sort.missing";

/// Settings of an index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Settings(Map<String, Value>);

impl Settings {
    /// Creates empty settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates settings from a JSON value, expanding dotted keys.
    ///
    /// Anything but an object yields empty settings.
    pub fn from_value(value: Value) -> Self {
        let mut settings = Self::new();
        if let Value::Object(map) = value {
            for (key, value) in map {
                settings.insert(&key, value);
            }
        }
        settings
    }

    /// Parses settings from a JSON string.
    pub fn parse(json: &str) -> MappingResult<Self> {
        Ok(Self::from_value(serde_json::from_str(json)?))
    }

    /// Sets `key` to `value`; dots in the key address nested objects.
    pub fn append(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.insert(key, value.into());
        self
    }

    /// Sets `key` to `value` in place; see [`Settings::append`].
    pub fn insert(&mut self, key: &str, value: Value) {
        let mut parts = key.split('.').peekable();
        let mut current = &mut self.0;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                match (current.get_mut(part), value) {
                    (Some(Value::Object(existing)), Value::Object(incoming)) => {
                        let mut nested = Settings(std::mem::take(existing));
                        nested.merge(&Settings::from_value(Value::Object(incoming)));
                        *existing = nested.0;
                    }
                    (_, value @ Value::Object(_)) => {
                        current.insert(part.to_string(), Settings::from_value(value).into_value());
                    }
                    (_, value) => {
                        current.insert(part.to_string(), value);
                    }
                }
                return;
            }

            let entry = current
                .entry(part.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            let Value::Object(next) = entry else {
                return;
            };
            current = next;
        }
    }

    /// Returns the value at a dotted key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        let mut parts = key.split('.');
        let first = parts.next()?;
        parts.try_fold(self.0.get(first)?, |value, part| value.get(part))
    }

    /// Deep-merges `other` into these settings; values from `other` win.
    pub fn merge(&mut self, other: &Settings) {
        merge_maps(&mut self.0, &other.0);
    }

    /// Returns the settings with nested objects collapsed into dotted keys.
    pub fn flatten(&self) -> Map<String, Value> {
        let mut flat = Map::new();
        flatten_into(&mut flat, "", &self.0);
        flat
    }

    /// Returns true when no setting is present.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the nested settings object.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Returns the settings as a JSON value.
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// Serializes the settings to a JSON string.
    pub fn to_json(&self) -> MappingResult<String> {
        Ok(serde_json::to_string(&self.0)?)
    }

    /// Derives the settings of an index from a setting annotation.
    ///
    /// With `use_server_configuration` nothing is derived. The `setting_path`
    /// resource, when present, is merged over the derived values.
    pub fn from_annotation(
        setting: &SettingAnnotation,
        resources: &dyn ResourceLoader,
    ) -> MappingResult<Self> {
        let mut settings = if setting.use_server_configuration {
            Settings::new()
        } else {
            derived_settings(setting)?
        };

        if let Some(path) = setting
            .setting_path
            .as_deref()
            .filter(|p| !p.trim().is_empty())
        {
            tracing::debug!(path, "Loading index settings");
            let file_settings = resources.read_json(path)?;
            if !file_settings.is_object() {
                return Err(ResourceError::InvalidJson {
                    path: path.to_string(),
                    message: "settings must be a JSON object".to_string(),
                }
                .into());
            }
            settings.merge(&Settings::from_value(file_settings));
        }

        Ok(settings)
    }

    /// Derives the settings of an entity's index; entities without a setting
    /// annotation get the defaults.
    pub fn for_entity(
        entity: &EntityDescriptor,
        resources: &dyn ResourceLoader,
    ) -> MappingResult<Self> {
        match &entity.setting {
            Some(setting) => Self::from_annotation(setting, resources),
            None => Self::from_annotation(&SettingAnnotation::default(), resources),
        }
    }
}

impl From<Map<String, Value>> for Settings {
    fn from(map: Map<String, Value>) -> Self {
        Settings::from_value(Value::Object(map))
    }
}

fn derived_settings(setting: &SettingAnnotation) -> Result<Settings, MisuseError> {
    let mut settings = Settings::new()
        .append(KEY_SHARDS, setting.shards)
        .append(KEY_REPLICAS, setting.replicas);

    if let Some(refresh_interval) = setting
        .refresh_interval
        .as_deref()
        .filter(|r| !r.trim().is_empty())
    {
        settings.insert(KEY_REFRESH_INTERVAL, refresh_interval.into());
    }

    if let Some(store_type) = setting
        .index_store_type
        .as_deref()
        .filter(|s| !s.trim().is_empty())
    {
        settings.insert(KEY_STORE_TYPE, store_type.into());
    }

    if !setting.sort_fields.is_empty() {
        let fields = setting.sort_fields.len();
        check_sort_len("sort_orders", setting.sort_orders.len(), fields)?;
        check_sort_len("sort_modes", setting.sort_modes.len(), fields)?;
        check_sort_len("sort_missing_values", setting.sort_missing_values.len(), fields)?;

        settings.insert(KEY_SORT_FIELD, serde_json::json!(setting.sort_fields));
        if !setting.sort_orders.is_empty() {
            settings.insert(KEY_SORT_ORDER, serde_json::json!(setting.sort_orders));
        }
        if !setting.sort_modes.is_empty() {
            settings.insert(KEY_SORT_MODE, serde_json::json!(setting.sort_modes));
        }
        if !setting.sort_missing_values.is_empty() {
            settings.insert(KEY_SORT_MISSING, serde_json::json!(setting.sort_missing_values));
        }
    } else if !setting.sort_orders.is_empty()
        || !setting.sort_modes.is_empty()
        || !setting.sort_missing_values.is_empty()
    {
        return Err(MisuseError::InvalidIndexSort {
            message: "sort orders, modes or missing values given without sort fields".to_string(),
        });
    }

    Ok(settings)
}

fn check_sort_len(name: &str, len: usize, fields: usize) -> Result<(), MisuseError> {
    if len != 0 && len != fields {
        return Err(MisuseError::InvalidIndexSort {
            message: format!("{name} has {len} entries but there are {fields} sort fields"),
        });
    }
    Ok(())
}

fn merge_maps(target: &mut Map<String, Value>, source: &Map<String, Value>) {
    for (key, value) in source {
        match (target.get_mut(key), value) {
            (Some(Value::Object(existing)), Value::Object(incoming)) => {
                merge_maps(existing, incoming);
            }
            _ => {
                target.insert(key.clone(), value.clone());
            }
        }
    }
}

fn flatten_into(flat: &mut Map<String, Value>, prefix: &str, map: &Map<String, Value>) {
    for (key, value) in map {
        let key = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            Value::Object(nested) if !nested.is_empty() => flatten_into(flat, &key, nested),
            other => {
                flat.insert(key, other.clone());
            }
        }
    }
}
