//! Annotation records attached to entities and properties.
//!
//! Each record carries the documented default for every attribute, so a descriptor
//! only has to spell out what deviates. All records deserialize from JSON with
//! missing attributes taking their defaults.

// Attribute and variant names mirror the Elasticsearch parameters they stand for
#![allow(missing_docs)]

use serde::{Deserialize, Serialize};

use crate::types::{
    CompletionContextType, DateFormat, Detection, Dynamic, FieldType, IndexOptions,
    NullValueType, Orientation, Similarity, TermVector, WriteTypeHint,
};

/// Field-level mapping annotation.
///
/// Used for main fields and, through [`InnerField`], for the inner fields of a
/// multi-field. `enabled`, `copy_to`, `ignore_fields`, `include_in_parent` and
/// `exclude_from_source` only apply to main fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldAnnotation {
    /// Explicit field name; the property name is used when absent.
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub index: bool,
    /// Built-in date formats (date types only).
    pub format: Vec<DateFormat>,
    /// Custom date patterns (date types only).
    pub pattern: Vec<String>,
    pub store: bool,
    pub fielddata: bool,
    pub search_analyzer: Option<String>,
    pub analyzer: Option<String>,
    pub normalizer: Option<String>,
    /// Field names to skip when mapping the nested entity behind this field.
    pub ignore_fields: Vec<String>,
    pub include_in_parent: bool,
    pub copy_to: Vec<String>,
    pub ignore_above: Option<u32>,
    pub coerce: bool,
    pub doc_values: bool,
    pub ignore_malformed: bool,
    pub index_options: IndexOptions,
    pub index_phrases: bool,
    pub index_prefixes: Option<IndexPrefixes>,
    pub norms: bool,
    pub null_value: Option<String>,
    pub null_value_type: NullValueType,
    pub position_increment_gap: Option<u32>,
    pub similarity: Similarity,
    pub term_vector: TermVector,
    pub scaling_factor: f64,
    pub max_shingle_size: Option<u32>,
    pub positive_score_impact: bool,
    pub enabled: bool,
    pub eager_global_ordinals: bool,
    /// Vector dimensions (`dense_vector` only).
    pub dims: Option<u32>,
    pub exclude_from_source: bool,
}

impl Default for FieldAnnotation {
    fn default() -> Self {
        Self {
            name: None,
            field_type: FieldType::Auto,
            index: true,
            format: Vec::new(),
            pattern: Vec::new(),
            store: false,
            fielddata: false,
            search_analyzer: None,
            analyzer: None,
            normalizer: None,
            ignore_fields: Vec::new(),
            include_in_parent: false,
            copy_to: Vec::new(),
            ignore_above: None,
            coerce: true,
            doc_values: true,
            ignore_malformed: false,
            index_options: IndexOptions::None,
            index_phrases: false,
            index_prefixes: None,
            norms: true,
            null_value: None,
            null_value_type: NullValueType::String,
            position_increment_gap: None,
            similarity: Similarity::Default,
            term_vector: TermVector::None,
            scaling_factor: 1.0,
            max_shingle_size: None,
            positive_score_impact: true,
            enabled: true,
            eager_global_ordinals: false,
            dims: None,
            exclude_from_source: false,
        }
    }
}

impl FieldAnnotation {
    /// Creates an annotation of the given type with all other attributes at their defaults.
    pub fn of(field_type: FieldType) -> Self {
        Self {
            field_type,
            ..Default::default()
        }
    }

    /// Sets the explicit field name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Adds field names to skip on the nested entity.
    pub fn ignoring<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore_fields.extend(fields.into_iter().map(Into::into));
        self
    }
}

/// Bounds of the `index_prefixes` text option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexPrefixes {
    pub min_chars: u32,
    pub max_chars: u32,
}

impl IndexPrefixes {
    /// Elasticsearch default for `min_chars`.
    pub const MIN_DEFAULT: u32 = 2;
    /// Elasticsearch default for `max_chars`.
    pub const MAX_DEFAULT: u32 = 5;
}

impl Default for IndexPrefixes {
    fn default() -> Self {
        Self {
            min_chars: Self::MIN_DEFAULT,
            max_chars: Self::MAX_DEFAULT,
        }
    }
}

/// One inner field of a multi-field, addressed as `<field>.<suffix>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InnerField {
    pub suffix: String,
    #[serde(flatten)]
    pub field: FieldAnnotation,
}

impl InnerField {
    /// Creates an inner field of the given type.
    pub fn new(suffix: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            suffix: suffix.into(),
            field: FieldAnnotation::of(field_type),
        }
    }
}

/// A main field plus inner fields indexed from the same value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiField {
    pub main_field: FieldAnnotation,
    #[serde(default)]
    pub other_fields: Vec<InnerField>,
}

/// Geo-shape field parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeoShapeField {
    pub coerce: bool,
    pub ignore_malformed: bool,
    pub ignore_z_value: bool,
    pub orientation: Orientation,
}

impl Default for GeoShapeField {
    fn default() -> Self {
        Self {
            coerce: false,
            ignore_malformed: false,
            ignore_z_value: true,
            orientation: Orientation::Ccw,
        }
    }
}

/// Completion suggester field parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionField {
    pub analyzer: Option<String>,
    pub search_analyzer: Option<String>,
    pub preserve_separators: bool,
    pub preserve_position_increments: bool,
    pub max_input_length: u32,
    pub contexts: Vec<CompletionContext>,
}

impl Default for CompletionField {
    fn default() -> Self {
        Self {
            analyzer: Some("simple".to_string()),
            search_analyzer: Some("simple".to_string()),
            preserve_separators: true,
            preserve_position_increments: true,
            max_input_length: 50,
            contexts: Vec::new(),
        }
    }
}

/// A named context of a completion suggester.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionContext {
    pub name: String,
    #[serde(rename = "type")]
    pub context_type: CompletionContextType,
    #[serde(default)]
    pub precision: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
}

/// A parent and its children in a join field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinTypeRelation {
    pub parent: String,
    #[serde(default)]
    pub children: Vec<String>,
}

impl JoinTypeRelation {
    /// Creates a relation from a parent to its children.
    pub fn new<I, S>(parent: impl Into<String>, children: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            parent: parent.into(),
            children: children.into_iter().map(Into::into).collect(),
        }
    }
}

/// Mapping directives of an entity, or of a single property.
///
/// On a property only `enabled` and `mapping_path` are considered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MappingAnnotation {
    pub enabled: bool,
    pub date_detection: Detection,
    pub numeric_detection: Detection,
    pub dynamic_date_formats: Vec<String>,
    /// Resource holding the runtime fields document.
    pub runtime_fields_path: Option<String>,
    /// Resource holding a complete mapping (entity) or a raw field mapping (property).
    pub mapping_path: Option<String>,
}

impl Default for MappingAnnotation {
    fn default() -> Self {
        Self {
            enabled: true,
            date_detection: Detection::Default,
            numeric_detection: Detection::Default,
            dynamic_date_formats: Vec::new(),
            runtime_fields_path: None,
            mapping_path: None,
        }
    }
}

impl MappingAnnotation {
    /// A directive that switches mapping off for the annotated entity or property.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }

    /// A directive that takes the mapping from a resource.
    pub fn from_path(path: impl Into<String>) -> Self {
        Self {
            mapping_path: Some(path.into()),
            ..Default::default()
        }
    }
}

/// Document-level directives of an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentAnnotation {
    pub index_name: Option<String>,
    pub dynamic: Dynamic,
    pub write_type_hint: WriteTypeHint,
    pub create_index: bool,
}

impl Default for DocumentAnnotation {
    fn default() -> Self {
        Self {
            index_name: None,
            dynamic: Dynamic::Inherit,
            write_type_hint: WriteTypeHint::Default,
            create_index: true,
        }
    }
}

/// Reference to a resource holding `{"dynamic_templates": [...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DynamicTemplatesAnnotation {
    pub mapping_path: String,
}

/// Sort order of an index sort field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Value picked from multi-valued sort fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    Min,
    Max,
}

/// Placement of documents missing the sort field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortMissingValue {
    #[serde(rename = "_last")]
    Last,
    #[serde(rename = "_first")]
    First,
}

/// Index settings directives of an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingAnnotation {
    /// Resource holding settings merged over the derived values.
    pub setting_path: Option<String>,
    pub shards: u32,
    pub replicas: u32,
    pub refresh_interval: Option<String>,
    pub index_store_type: Option<String>,
    /// Leave all settings to the cluster.
    pub use_server_configuration: bool,
    pub sort_fields: Vec<String>,
    pub sort_orders: Vec<SortOrder>,
    pub sort_modes: Vec<SortMode>,
    pub sort_missing_values: Vec<SortMissingValue>,
}

impl Default for SettingAnnotation {
    fn default() -> Self {
        Self {
            setting_path: None,
            shards: 1,
            replicas: 1,
            refresh_interval: Some("1s".to_string()),
            index_store_type: Some("fs".to_string()),
            use_server_configuration: false,
            sort_fields: Vec::new(),
            sort_orders: Vec::new(),
            sort_modes: Vec::new(),
            sort_missing_values: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_field_annotation_defaults_from_empty_json() {
        let field: FieldAnnotation = serde_json::from_value(json!({})).unwrap();
        assert_eq!(field, FieldAnnotation::default());
        assert!(field.index);
        assert!(field.doc_values);
        assert!(field.positive_score_impact);
        assert_eq!(field.scaling_factor, 1.0);
    }

    #[test]
    fn test_inner_field_flattens_parameters() {
        let inner: InnerField = serde_json::from_value(json!({
            "suffix": "raw",
            "type": "keyword",
            "ignore_above": 256
        }))
        .unwrap();
        assert_eq!(inner.suffix, "raw");
        assert_eq!(inner.field.field_type, FieldType::Keyword);
        assert_eq!(inner.field.ignore_above, Some(256));
    }

    #[test]
    fn test_completion_defaults() {
        let completion = CompletionField::default();
        assert_eq!(completion.max_input_length, 50);
        assert_eq!(completion.analyzer.as_deref(), Some("simple"));
        assert!(completion.preserve_separators);
    }

    #[test]
    fn test_document_annotation_from_json() {
        let document: DocumentAnnotation = serde_json::from_value(json!({
            "index_name": "books",
            "dynamic": "strict"
        }))
        .unwrap();
        assert_eq!(document.index_name.as_deref(), Some("books"));
        assert_eq!(document.dynamic, Dynamic::Strict);
        assert!(document.create_index);
    }

    #[test]
    fn test_geo_shape_defaults() {
        let shape = GeoShapeField::default();
        assert!(shape.ignore_z_value);
        assert_eq!(shape.orientation, Orientation::Ccw);
    }
}
