//! Property descriptors.

use serde::{Deserialize, Serialize};

use crate::config::FieldNamingStrategy;
use crate::types::Dynamic;

use super::annotations::{
    CompletionField, FieldAnnotation, GeoShapeField, JoinTypeRelation, MappingAnnotation,
    MultiField,
};

/// What kind of value a property holds, decided once when the descriptor is built.
///
/// The kind selects the special mapping stubs (geo, join, completion) and whether the
/// property refers to another entity. Field and multi-field annotations are kept next
/// to the kind on [`PropertyDescriptor`] because they combine with any kind.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyKind {
    /// A plain value mapped only through its field annotations.
    #[default]
    Value,
    /// A geo point.
    GeoPoint,
    /// A geo shape.
    GeoShape(GeoShapeField),
    /// A join field; an empty relation list marks a missing relations annotation.
    Join {
        #[serde(default)]
        relations: Vec<JoinTypeRelation>,
    },
    /// A completion suggester input.
    Completion(CompletionField),
    /// Another entity, directly or as the element type of a collection.
    Entity {
        /// Registered name of the referenced entity.
        entity: String,
    },
}

/// A property of an entity together with its annotations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDescriptor {
    /// Property name as declared on the type.
    pub name: String,
    #[serde(default)]
    pub kind: PropertyKind,
    #[serde(default)]
    pub field: Option<FieldAnnotation>,
    #[serde(default)]
    pub multi_field: Option<MultiField>,
    /// Property-level mapping override (raw fragment or disabled object).
    #[serde(default)]
    pub mapping: Option<MappingAnnotation>,
    /// Dynamic policy for the object behind a nested or object property.
    #[serde(default)]
    pub dynamic_mapping: Option<Dynamic>,
    #[serde(default)]
    pub id: bool,
    #[serde(default)]
    pub seq_no_primary_term: bool,
    #[serde(default)]
    pub transient: bool,
}

impl PropertyDescriptor {
    /// Creates an unannotated value property.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: PropertyKind::Value,
            field: None,
            multi_field: None,
            mapping: None,
            dynamic_mapping: None,
            id: false,
            seq_no_primary_term: false,
            transient: false,
        }
    }

    /// Sets the property kind.
    pub fn with_kind(mut self, kind: PropertyKind) -> Self {
        self.kind = kind;
        self
    }

    /// Marks the property as referring to the named entity.
    pub fn referencing(self, entity: impl Into<String>) -> Self {
        self.with_kind(PropertyKind::Entity {
            entity: entity.into(),
        })
    }

    /// Attaches a field annotation.
    pub fn with_field(mut self, field: FieldAnnotation) -> Self {
        self.field = Some(field);
        self
    }

    /// Attaches a multi-field annotation.
    pub fn with_multi_field(mut self, multi_field: MultiField) -> Self {
        self.multi_field = Some(multi_field);
        self
    }

    /// Attaches a property-level mapping override.
    pub fn with_mapping(mut self, mapping: MappingAnnotation) -> Self {
        self.mapping = Some(mapping);
        self
    }

    /// Sets the dynamic policy passed to the nested object.
    pub fn with_dynamic_mapping(mut self, dynamic: Dynamic) -> Self {
        self.dynamic_mapping = Some(dynamic);
        self
    }

    /// Marks the property as the document identifier.
    pub fn as_id(mut self) -> Self {
        self.id = true;
        self
    }

    /// Marks the property as the seq-no/primary-term holder.
    pub fn as_seq_no_primary_term(mut self) -> Self {
        self.seq_no_primary_term = true;
        self
    }

    /// Marks the property as transient.
    pub fn as_transient(mut self) -> Self {
        self.transient = true;
        self
    }

    /// Returns the name of the field in the index.
    ///
    /// An explicit name on the field or multi-field annotation wins over the
    /// naming strategy.
    pub fn field_name(&self, strategy: FieldNamingStrategy) -> String {
        let explicit = self
            .field
            .as_ref()
            .and_then(|f| f.name.as_deref())
            .or_else(|| {
                self.multi_field
                    .as_ref()
                    .and_then(|m| m.main_field.name.as_deref())
            })
            .filter(|name| !name.trim().is_empty());

        match explicit {
            Some(name) => name.to_string(),
            None => strategy.apply(&self.name),
        }
    }

    /// Returns the referenced entity name for entity properties.
    pub fn entity_reference(&self) -> Option<&str> {
        match &self.kind {
            PropertyKind::Entity { entity } => Some(entity),
            _ => None,
        }
    }

    /// Returns true when the field annotation declares a nested or object type.
    pub fn is_nested_or_object(&self) -> bool {
        self.field
            .as_ref()
            .is_some_and(|f| f.field_type.is_nested_or_object())
    }

    /// Returns true when the property carries an annotation that makes it mappable.
    pub fn has_relevant_annotation(&self) -> bool {
        self.field.is_some()
            || self.multi_field.is_some()
            || matches!(
                self.kind,
                PropertyKind::GeoPoint | PropertyKind::Completion(_)
            )
    }

    /// Returns true when the field annotation asks to keep the value out of `_source`.
    pub fn is_excluded_from_source(&self) -> bool {
        self.field.as_ref().is_some_and(|f| f.exclude_from_source)
    }
}
