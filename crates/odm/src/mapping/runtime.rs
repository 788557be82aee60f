//! Runtime field descriptors.
//!
//! A runtime field is evaluated at query time from a script. Fields can be
//! declared in code with [`RuntimeField`] or loaded as a whole document from a
//! resource (see [`MappingAnnotation::runtime_fields_path`](crate::entity::MappingAnnotation)).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::FieldType;

/// A field computed at query time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeField {
    /// Field name, the key of the field in the runtime document.
    pub name: String,
    /// Type of the emitted values.
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Painless source; without it the value is read from `_source`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
    /// Script parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Map<String, Value>>,
}

impl RuntimeField {
    /// Creates a runtime field computed by `script`.
    pub fn new(name: impl Into<String>, field_type: FieldType, script: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type,
            script: Some(script.into()),
            params: None,
        }
    }

    /// Creates a runtime field that reads the value of the same name from `_source`.
    pub fn without_script(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            script: None,
            params: None,
        }
    }

    /// Sets the script parameters.
    pub fn with_params(mut self, params: Map<String, Value>) -> Self {
        self.params = Some(params);
        self
    }

    /// Returns the mapping of this field: `{type, [script], [params]}`.
    pub fn mapping(&self) -> Value {
        let mut node = Map::new();
        node.insert("type".into(), self.field_type.mapped_name().into());
        if let Some(script) = &self.script {
            node.insert("script".into(), script.as_str().into());
        }
        if let Some(params) = &self.params {
            node.insert("params".into(), Value::Object(params.clone()));
        }
        Value::Object(node)
    }
}

/// Builds a runtime document keyed by field name.
pub fn runtime_document(fields: &[RuntimeField]) -> Map<String, Value> {
    fields
        .iter()
        .map(|field| (field.name.clone(), field.mapping()))
        .collect()
}
