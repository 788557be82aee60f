//! Entity registry.
//!
//! The registry resolves entity names to descriptors. Properties refer to other
//! entities by name, so self-references and cycles between types are plain data
//! here; breaking them during mapping is the job of `ignore_fields`.

use std::collections::HashMap;

use serde_json::Value;

use crate::error::{MappingResult, MisuseError};

use super::descriptor::EntityDescriptor;

/// Name-keyed collection of entity descriptors.
#[derive(Debug, Clone, Default)]
pub struct EntityRegistry {
    entities: HashMap<String, EntityDescriptor>,
}

impl EntityRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an entity, replacing any previous entity of the same name.
    pub fn register(&mut self, entity: EntityDescriptor) -> &mut Self {
        self.entities.insert(entity.name.clone(), entity);
        self
    }

    /// Registers an entity, builder style.
    pub fn with_entity(mut self, entity: EntityDescriptor) -> Self {
        self.register(entity);
        self
    }

    /// Returns the entity with the given name.
    pub fn get(&self, name: &str) -> Option<&EntityDescriptor> {
        self.entities.get(name)
    }

    /// Returns the entity with the given name, or a misuse error.
    pub fn require(&self, name: &str) -> Result<&EntityDescriptor, MisuseError> {
        self.get(name).ok_or_else(|| MisuseError::UnknownEntity {
            name: name.to_string(),
        })
    }

    /// Returns the registered entity names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entities.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Returns the number of registered entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns true when no entity is registered.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Loads entities from JSON.
    ///
    /// Accepts a single entity object, an array of entities, or an object with an
    /// `entities` array.
    pub fn load_from_json(&mut self, json: &Value) -> MappingResult<usize> {
        let entities: Vec<EntityDescriptor> = if let Some(list) = json.get("entities") {
            serde_json::from_value(list.clone())?
        } else if json.is_array() {
            serde_json::from_value(json.clone())?
        } else {
            vec![serde_json::from_value(json.clone())?]
        };

        let count = entities.len();
        for entity in entities {
            tracing::debug!(entity = %entity.name, "Registered entity");
            self.register(entity);
        }
        Ok(count)
    }

    /// Creates a registry from a JSON string; see [`EntityRegistry::load_from_json`].
    pub fn from_json_str(json: &str) -> MappingResult<Self> {
        let value: Value = serde_json::from_str(json)?;
        let mut registry = Self::new();
        registry.load_from_json(&value)?;
        Ok(registry)
    }
}
