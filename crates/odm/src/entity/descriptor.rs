//! Entity descriptors.

use serde::{Deserialize, Serialize};

use crate::types::{Dynamic, WriteTypeHint};

use super::annotations::{
    DocumentAnnotation, DynamicTemplatesAnnotation, MappingAnnotation, SettingAnnotation,
};
use super::property::PropertyDescriptor;

/// A mapped type: its entity-level annotations and its properties in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityDescriptor {
    /// Registered type name; properties refer to entities by this name.
    pub name: String,
    #[serde(default)]
    pub document: Option<DocumentAnnotation>,
    #[serde(default)]
    pub mapping: Option<MappingAnnotation>,
    /// Dynamic policy applied at the root when the document declares none.
    #[serde(default)]
    pub dynamic_mapping: Option<Dynamic>,
    #[serde(default)]
    pub dynamic_templates: Option<DynamicTemplatesAnnotation>,
    #[serde(default)]
    pub setting: Option<SettingAnnotation>,
    #[serde(default)]
    pub properties: Vec<PropertyDescriptor>,
}

impl EntityDescriptor {
    /// Creates an entity without annotations or properties.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            document: None,
            mapping: None,
            dynamic_mapping: None,
            dynamic_templates: None,
            setting: None,
            properties: Vec::new(),
        }
    }

    /// Appends a property.
    pub fn with_property(mut self, property: PropertyDescriptor) -> Self {
        self.properties.push(property);
        self
    }

    /// Sets the document directives.
    pub fn with_document(mut self, document: DocumentAnnotation) -> Self {
        self.document = Some(document);
        self
    }

    /// Sets the entity-level mapping directives.
    pub fn with_mapping(mut self, mapping: MappingAnnotation) -> Self {
        self.mapping = Some(mapping);
        self
    }

    /// Sets the root dynamic policy used when the document declares none.
    pub fn with_dynamic_mapping(mut self, dynamic: Dynamic) -> Self {
        self.dynamic_mapping = Some(dynamic);
        self
    }

    /// Sets the dynamic templates resource.
    pub fn with_dynamic_templates(mut self, mapping_path: impl Into<String>) -> Self {
        self.dynamic_templates = Some(DynamicTemplatesAnnotation {
            mapping_path: mapping_path.into(),
        });
        self
    }

    /// Sets the index settings directives.
    pub fn with_setting(mut self, setting: SettingAnnotation) -> Self {
        self.setting = Some(setting);
        self
    }

    /// Returns the document-level dynamic policy.
    pub fn dynamic(&self) -> Dynamic {
        self.document
            .as_ref()
            .map(|d| d.dynamic)
            .unwrap_or(Dynamic::Inherit)
    }

    /// Returns whether the mapping of this entity carries the type-hint property.
    pub fn write_type_hints(&self, global_default: bool) -> bool {
        self.document
            .as_ref()
            .map(|d| d.write_type_hint)
            .unwrap_or(WriteTypeHint::Default)
            .resolve(global_default)
    }

    /// Returns the index name: the declared one, or the lowercased type name.
    pub fn index_name(&self) -> String {
        self.document
            .as_ref()
            .and_then(|d| d.index_name.clone())
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| self.name.to_lowercase())
    }

    /// Returns true when the index should be created on startup.
    pub fn create_index(&self) -> bool {
        self.document.as_ref().is_none_or(|d| d.create_index)
    }

    /// Returns true when at least one property carries a field annotation.
    pub fn has_field_annotated_property(&self) -> bool {
        self.properties.iter().any(|p| p.field.is_some())
    }

    /// Returns the identifier property, if any.
    pub fn id_property(&self) -> Option<&PropertyDescriptor> {
        self.properties.iter().find(|p| p.id)
    }
}
