//! Index definitions.
//!
//! An [`IndexDefinition`] is everything needed to create the index of an entity:
//! its name, settings and mapping. It renders the body of an index-creation
//! request and, for templated indices, the body of a legacy index template.

use serde_json::{Map, Value, json};

use crate::entity::EntityDescriptor;
use crate::error::{MappingResult, MappingWarning, ResourceError};
use crate::mapping::MappingBuilder;

use super::settings::Settings;

/// Name, settings and mapping of an entity's index.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexDefinition {
    pub index_name: String,
    pub settings: Settings,
    pub mapping: Value,
    /// Whether the index is created on startup.
    pub create_index: bool,
    /// Properties left out of the mapping.
    pub warnings: Vec<MappingWarning>,
}

impl IndexDefinition {
    /// Builds the definition of the index of `entity`.
    ///
    /// A `mapping_path` on the entity's mapping directives is used verbatim;
    /// otherwise the mapping is built from the entity's properties.
    pub fn for_entity(
        entity: &EntityDescriptor,
        builder: &MappingBuilder<'_>,
    ) -> MappingResult<Self> {
        let resources = builder.resources();
        let settings = Settings::for_entity(entity, resources)?;

        let mapping_path = entity
            .mapping
            .as_ref()
            .and_then(|m| m.mapping_path.as_deref())
            .filter(|p| !p.trim().is_empty());

        let (mapping, warnings) = match mapping_path {
            Some(path) => {
                tracing::debug!(entity = %entity.name, path, "Using mapping from resource");
                let mapping = resources.read_json(path)?;
                if !mapping.is_object() {
                    return Err(ResourceError::InvalidJson {
                        path: path.to_string(),
                        message: "mapping must be a JSON object".to_string(),
                    }
                    .into());
                }
                (mapping, Vec::new())
            }
            None => builder.build_mapping_with_warnings(entity, None)?,
        };

        Ok(Self {
            index_name: entity.index_name(),
            settings,
            mapping,
            create_index: entity.create_index(),
            warnings,
        })
    }

    /// Body of the `PUT /<index>` request.
    pub fn create_body(&self) -> Value {
        let mut body = Map::new();
        if !self.settings.is_empty() {
            body.insert("settings".into(), self.settings.clone().into_value());
        }
        body.insert("mappings".into(), self.mapping.clone());
        Value::Object(body)
    }

    /// Body of a legacy index template applying these settings and mapping to
    /// every index matching `index_patterns`.
    pub fn template_body(&self, index_patterns: &[String]) -> Value {
        let mut body = json!({ "index_patterns": index_patterns });
        if let (Value::Object(body), Value::Object(content)) = (&mut body, self.create_body()) {
            body.extend(content);
        }
        body
    }
}
