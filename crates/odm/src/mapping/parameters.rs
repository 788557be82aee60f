//! Field mapping parameters.
//!
//! [`MappingParameters`] is the validated form of a [`FieldAnnotation`]. Main fields
//! and inner fields of a multi-field share the same extraction; the
//! [`FieldContext`] decides which attributes apply.
//!
//! Only attributes that deviate from their documented default are written, so an
//! annotation with every attribute at its default writes nothing at all.

use serde_json::{Map, Number, Value};

use crate::entity::{FieldAnnotation, IndexPrefixes, InnerField};
use crate::error::{ConfigurationError, PropertyWriteError};
use crate::types::{
    DateFormat, FieldType, IndexOptions, NullValueType, Similarity, TermVector,
};

pub(crate) const FIELD_PARAM_TYPE: &str = "type";
pub(crate) const FIELD_PARAM_STORE: &str = "store";
pub(crate) const FIELD_PARAM_INDEX: &str = "index";
pub(crate) const FIELD_PARAM_DOC_VALUES: &str = "doc_values";
pub(crate) const FIELD_PARAM_ANALYZER: &str = "analyzer";
pub(crate) const FIELD_PARAM_SEARCH_ANALYZER: &str = "search_analyzer";
pub(crate) const FIELD_PARAM_ENABLED: &str = "enabled";
const FIELD_PARAM_FORMAT: &str = "format";
const FIELD_PARAM_FIELDDATA: &str = "fielddata";
const FIELD_PARAM_NORMALIZER: &str = "normalizer";
const FIELD_PARAM_COPY_TO: &str = "copy_to";
const FIELD_PARAM_IGNORE_ABOVE: &str = "ignore_above";
const FIELD_PARAM_COERCE: &str = "coerce";
const FIELD_PARAM_IGNORE_MALFORMED: &str = "ignore_malformed";
const FIELD_PARAM_INDEX_OPTIONS: &str = "index_options";
const FIELD_PARAM_INDEX_PHRASES: &str = "index_phrases";
const FIELD_PARAM_INDEX_PREFIXES: &str = "index_prefixes";
const FIELD_PARAM_INDEX_PREFIXES_MIN_CHARS: &str = "min_chars";
const FIELD_PARAM_INDEX_PREFIXES_MAX_CHARS: &str = "max_chars";
const FIELD_PARAM_NORMS: &str = "norms";
const FIELD_PARAM_NULL_VALUE: &str = "null_value";
const FIELD_PARAM_POSITION_INCREMENT_GAP: &str = "position_increment_gap";
const FIELD_PARAM_SIMILARITY: &str = "similarity";
const FIELD_PARAM_TERM_VECTOR: &str = "term_vector";
const FIELD_PARAM_SCALING_FACTOR: &str = "scaling_factor";
const FIELD_PARAM_MAX_SHINGLE_SIZE: &str = "max_shingle_size";
const FIELD_PARAM_POSITIVE_SCORE_IMPACT: &str = "positive_score_impact";
const FIELD_PARAM_DIMS: &str = "dims";
const FIELD_PARAM_EAGER_GLOBAL_ORDINALS: &str = "eager_global_ordinals";

const MIN_SHINGLE_SIZE: u32 = 2;
const MAX_SHINGLE_SIZE: u32 = 4;
const MAX_INDEX_PREFIX_CHARS: u32 = 19;

/// Where a field annotation is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldContext {
    /// The field of a property, or the main field of a multi-field.
    Main,
    /// An inner field of a multi-field; `enabled` and `copy_to` do not apply.
    Inner,
}

/// Validated mapping parameters of one field.
#[derive(Debug, Clone, PartialEq)]
pub struct MappingParameters {
    field_type: FieldType,
    index: bool,
    store: bool,
    fielddata: bool,
    date_formats: Vec<DateFormat>,
    date_patterns: Vec<String>,
    analyzer: Option<String>,
    search_analyzer: Option<String>,
    normalizer: Option<String>,
    copy_to: Vec<String>,
    ignore_above: Option<u32>,
    coerce: bool,
    doc_values: bool,
    ignore_malformed: bool,
    index_options: IndexOptions,
    index_phrases: bool,
    index_prefixes: Option<IndexPrefixes>,
    norms: bool,
    null_value: Option<String>,
    null_value_type: NullValueType,
    position_increment_gap: Option<u32>,
    similarity: Similarity,
    term_vector: TermVector,
    scaling_factor: f64,
    max_shingle_size: Option<u32>,
    positive_score_impact: bool,
    dims: Option<u32>,
    enabled: bool,
    eager_global_ordinals: bool,
}

impl MappingParameters {
    /// Extracts the parameters of a main field.
    pub fn from_field(field: &FieldAnnotation) -> Result<Self, ConfigurationError> {
        Self::extract(field, FieldContext::Main)
    }

    /// Extracts the parameters of an inner field.
    pub fn from_inner_field(inner: &InnerField) -> Result<Self, ConfigurationError> {
        Self::extract(&inner.field, FieldContext::Inner)
    }

    /// Extracts and validates parameters for the given context.
    pub fn extract(
        field: &FieldAnnotation,
        context: FieldContext,
    ) -> Result<Self, ConfigurationError> {
        let field_type = field.field_type;
        let is_main = context == FieldContext::Main;
        let enabled = !is_main || field.enabled;

        if !field.doc_values && matches!(field_type, FieldType::Text | FieldType::Nested) {
            return Err(ConfigurationError::DocValuesNotAllowed { field_type });
        }

        if !enabled && field_type != FieldType::Object {
            return Err(ConfigurationError::EnabledNotAllowed { field_type });
        }

        // max_shingle_size only means something for search_as_you_type; elsewhere it is dropped.
        let max_shingle_size = match field.max_shingle_size {
            Some(size) if field_type == FieldType::SearchAsYouType => {
                if !(MIN_SHINGLE_SIZE..=MAX_SHINGLE_SIZE).contains(&size) {
                    return Err(ConfigurationError::MaxShingleSizeOutOfRange { value: size });
                }
                Some(size)
            }
            _ => None,
        };

        if let Some(prefixes) = field.index_prefixes {
            if prefixes.min_chars == 0
                || prefixes.min_chars > prefixes.max_chars
                || prefixes.max_chars > MAX_INDEX_PREFIX_CHARS
            {
                return Err(ConfigurationError::InvalidIndexPrefixes {
                    min_chars: prefixes.min_chars,
                    max_chars: prefixes.max_chars,
                });
            }
        }

        if field_type == FieldType::ScaledFloat
            && !(field.scaling_factor.is_finite() && field.scaling_factor > 0.0)
        {
            return Err(ConfigurationError::InvalidScalingFactor {
                value: field.scaling_factor,
            });
        }

        Ok(Self {
            field_type,
            index: field.index,
            store: field.store,
            fielddata: field.fielddata,
            date_formats: field.format.clone(),
            date_patterns: field.pattern.clone(),
            analyzer: non_blank(&field.analyzer),
            search_analyzer: non_blank(&field.search_analyzer),
            normalizer: non_blank(&field.normalizer),
            copy_to: if is_main {
                field.copy_to.clone()
            } else {
                Vec::new()
            },
            ignore_above: field.ignore_above,
            coerce: field.coerce,
            doc_values: field.doc_values,
            ignore_malformed: field.ignore_malformed,
            index_options: field.index_options,
            index_phrases: field.index_phrases,
            index_prefixes: field.index_prefixes,
            norms: field.norms,
            null_value: non_blank(&field.null_value),
            null_value_type: field.null_value_type,
            position_increment_gap: field.position_increment_gap,
            similarity: field.similarity,
            term_vector: field.term_vector,
            scaling_factor: field.scaling_factor,
            max_shingle_size,
            positive_score_impact: field.positive_score_impact,
            dims: field.dims,
            enabled,
            eager_global_ordinals: field.eager_global_ordinals,
        })
    }

    /// Returns the field type.
    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    /// Returns true when the value is stored separately from `_source`.
    pub fn is_store(&self) -> bool {
        self.store
    }

    /// Writes the type and every non-default parameter into `node`.
    ///
    /// `store` is not written here; whether it applies depends on where the field sits.
    pub fn write_type_and_parameters(
        &self,
        node: &mut Map<String, Value>,
    ) -> Result<(), PropertyWriteError> {
        if self.field_type != FieldType::Auto {
            node.insert(FIELD_PARAM_TYPE.into(), self.field_type.mapped_name().into());

            if self.field_type.is_date() {
                let formats: Vec<String> = self
                    .date_formats
                    .iter()
                    .filter_map(DateFormat::name)
                    .chain(
                        self.date_patterns
                            .iter()
                            .filter(|p| !p.trim().is_empty())
                            .cloned(),
                    )
                    .collect();
                if !formats.is_empty() {
                    node.insert(FIELD_PARAM_FORMAT.into(), formats.join("||").into());
                }
            }
        }

        if self.fielddata {
            node.insert(FIELD_PARAM_FIELDDATA.into(), true.into());
        }

        if !self.index {
            node.insert(FIELD_PARAM_INDEX.into(), false.into());
        }

        if let Some(analyzer) = &self.analyzer {
            node.insert(FIELD_PARAM_ANALYZER.into(), analyzer.as_str().into());
        }

        if let Some(search_analyzer) = &self.search_analyzer {
            node.insert(
                FIELD_PARAM_SEARCH_ANALYZER.into(),
                search_analyzer.as_str().into(),
            );
        }

        if let Some(normalizer) = &self.normalizer {
            node.insert(FIELD_PARAM_NORMALIZER.into(), normalizer.as_str().into());
        }

        if !self.copy_to.is_empty() {
            node.insert(
                FIELD_PARAM_COPY_TO.into(),
                Value::Array(self.copy_to.iter().map(|f| f.as_str().into()).collect()),
            );
        }

        if let Some(ignore_above) = self.ignore_above {
            node.insert(FIELD_PARAM_IGNORE_ABOVE.into(), ignore_above.into());
        }

        if !self.coerce {
            node.insert(FIELD_PARAM_COERCE.into(), false.into());
        }

        if !self.doc_values {
            node.insert(FIELD_PARAM_DOC_VALUES.into(), false.into());
        }

        if self.ignore_malformed {
            node.insert(FIELD_PARAM_IGNORE_MALFORMED.into(), true.into());
        }

        if self.index_options != IndexOptions::None {
            node.insert(
                FIELD_PARAM_INDEX_OPTIONS.into(),
                self.index_options.to_string().into(),
            );
        }

        if self.index_phrases {
            node.insert(FIELD_PARAM_INDEX_PHRASES.into(), true.into());
        }

        if let Some(prefixes) = self.index_prefixes {
            let mut prefixes_node = Map::new();
            if prefixes.min_chars != IndexPrefixes::MIN_DEFAULT {
                prefixes_node.insert(
                    FIELD_PARAM_INDEX_PREFIXES_MIN_CHARS.into(),
                    prefixes.min_chars.into(),
                );
            }
            if prefixes.max_chars != IndexPrefixes::MAX_DEFAULT {
                prefixes_node.insert(
                    FIELD_PARAM_INDEX_PREFIXES_MAX_CHARS.into(),
                    prefixes.max_chars.into(),
                );
            }
            node.insert(FIELD_PARAM_INDEX_PREFIXES.into(), Value::Object(prefixes_node));
        }

        if !self.norms {
            node.insert(FIELD_PARAM_NORMS.into(), false.into());
        }

        if let Some(null_value) = &self.null_value {
            node.insert(
                FIELD_PARAM_NULL_VALUE.into(),
                coerce_null_value(null_value, self.null_value_type)?,
            );
        }

        if let Some(gap) = self.position_increment_gap {
            node.insert(FIELD_PARAM_POSITION_INCREMENT_GAP.into(), gap.into());
        }

        if self.similarity != Similarity::Default {
            node.insert(
                FIELD_PARAM_SIMILARITY.into(),
                self.similarity.to_string().into(),
            );
        }

        if self.term_vector != TermVector::None {
            node.insert(
                FIELD_PARAM_TERM_VECTOR.into(),
                self.term_vector.to_string().into(),
            );
        }

        if self.field_type == FieldType::ScaledFloat {
            let factor = Number::from_f64(self.scaling_factor).ok_or(
                PropertyWriteError::NonFiniteNumber {
                    parameter: FIELD_PARAM_SCALING_FACTOR,
                },
            )?;
            node.insert(FIELD_PARAM_SCALING_FACTOR.into(), Value::Number(factor));
        }

        if let Some(size) = self.max_shingle_size {
            node.insert(FIELD_PARAM_MAX_SHINGLE_SIZE.into(), size.into());
        }

        if !self.positive_score_impact {
            node.insert(FIELD_PARAM_POSITIVE_SCORE_IMPACT.into(), false.into());
        }

        if self.field_type == FieldType::DenseVector {
            if let Some(dims) = self.dims {
                node.insert(FIELD_PARAM_DIMS.into(), dims.into());
            }
        }

        if !self.enabled {
            node.insert(FIELD_PARAM_ENABLED.into(), false.into());
        }

        if self.eager_global_ordinals {
            node.insert(FIELD_PARAM_EAGER_GLOBAL_ORDINALS.into(), true.into());
        }

        Ok(())
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.trim().is_empty()).cloned()
}

fn coerce_null_value(value: &str, null_value_type: NullValueType) -> Result<Value, PropertyWriteError> {
    let not_coercible = || PropertyWriteError::NullValueNotCoercible {
        value: value.to_string(),
        null_value_type,
    };

    match null_value_type {
        NullValueType::String => Ok(Value::String(value.to_string())),
        NullValueType::Integer => value
            .trim()
            .parse::<i32>()
            .map(Value::from)
            .map_err(|_| not_coercible()),
        NullValueType::Long => value
            .trim()
            .parse::<i64>()
            .map(Value::from)
            .map_err(|_| not_coercible()),
        NullValueType::Double => {
            let parsed = value.trim().parse::<f64>().map_err(|_| not_coercible())?;
            Number::from_f64(parsed)
                .map(Value::Number)
                .ok_or(PropertyWriteError::NonFiniteNumber {
                    parameter: FIELD_PARAM_NULL_VALUE,
                })
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn written(field: &FieldAnnotation) -> Value {
        let parameters = MappingParameters::from_field(field).unwrap();
        let mut node = Map::new();
        parameters.write_type_and_parameters(&mut node).unwrap();
        Value::Object(node)
    }

    #[test]
    fn test_defaults_write_nothing() {
        assert_eq!(written(&FieldAnnotation::default()), json!({}));
    }

    #[test]
    fn test_doc_values_false_rejected_for_text_and_nested() {
        for field_type in [FieldType::Text, FieldType::Nested] {
            let field = FieldAnnotation {
                doc_values: false,
                ..FieldAnnotation::of(field_type)
            };
            assert_eq!(
                MappingParameters::from_field(&field).unwrap_err(),
                ConfigurationError::DocValuesNotAllowed { field_type }
            );
        }
    }

    #[test]
    fn test_doc_values_false_allowed_for_keyword() {
        let field = FieldAnnotation {
            doc_values: false,
            ..FieldAnnotation::of(FieldType::Keyword)
        };
        assert_eq!(
            written(&field),
            json!({"type": "keyword", "doc_values": false})
        );
    }

    #[test]
    fn test_max_shingle_size_bounds() {
        let field = FieldAnnotation {
            max_shingle_size: Some(5),
            ..FieldAnnotation::of(FieldType::SearchAsYouType)
        };
        assert_eq!(
            MappingParameters::from_field(&field).unwrap_err(),
            ConfigurationError::MaxShingleSizeOutOfRange { value: 5 }
        );

        let field = FieldAnnotation {
            max_shingle_size: Some(3),
            ..FieldAnnotation::of(FieldType::SearchAsYouType)
        };
        assert_eq!(
            written(&field),
            json!({"type": "search_as_you_type", "max_shingle_size": 3})
        );
    }

    #[test]
    fn test_max_shingle_size_ignored_for_other_types() {
        let field = FieldAnnotation {
            max_shingle_size: Some(9),
            ..FieldAnnotation::of(FieldType::Text)
        };
        assert_eq!(written(&field), json!({"type": "text"}));
    }

    #[test]
    fn test_enabled_false_only_for_object() {
        let field = FieldAnnotation {
            enabled: false,
            ..FieldAnnotation::of(FieldType::Keyword)
        };
        assert!(matches!(
            MappingParameters::from_field(&field),
            Err(ConfigurationError::EnabledNotAllowed { .. })
        ));

        let field = FieldAnnotation {
            enabled: false,
            ..FieldAnnotation::of(FieldType::Object)
        };
        assert_eq!(written(&field), json!({"type": "object", "enabled": false}));
    }

    #[test]
    fn test_inner_field_ignores_enabled_and_copy_to() {
        let inner = InnerField {
            suffix: "raw".to_string(),
            field: FieldAnnotation {
                enabled: false,
                copy_to: vec!["all".to_string()],
                ..FieldAnnotation::of(FieldType::Keyword)
            },
        };
        let parameters = MappingParameters::from_inner_field(&inner).unwrap();
        let mut node = Map::new();
        parameters.write_type_and_parameters(&mut node).unwrap();
        assert_eq!(Value::Object(node), json!({"type": "keyword"}));
    }

    #[test]
    fn test_date_formats() {
        let field = FieldAnnotation {
            format: vec![DateFormat::Custom],
            pattern: vec!["dd.MM.uuuu".to_string()],
            ..FieldAnnotation::of(FieldType::Date)
        };
        assert_eq!(
            written(&field),
            json!({"type": "date", "format": "dd.MM.uuuu"})
        );

        let field = FieldAnnotation {
            format: vec![DateFormat::BasicDate, DateFormat::EpochMillis],
            pattern: vec!["uuuu".to_string()],
            ..FieldAnnotation::of(FieldType::DateNanos)
        };
        assert_eq!(
            written(&field),
            json!({"type": "date_nanos", "format": "basic_date||epoch_millis||uuuu"})
        );
    }

    #[test]
    fn test_format_ignored_for_non_date_types() {
        let field = FieldAnnotation {
            format: vec![DateFormat::BasicDate],
            ..FieldAnnotation::of(FieldType::Keyword)
        };
        assert_eq!(written(&field), json!({"type": "keyword"}));
    }

    #[test]
    fn test_null_value_coercion() {
        let field = FieldAnnotation {
            null_value: Some("42".to_string()),
            null_value_type: NullValueType::Integer,
            ..FieldAnnotation::of(FieldType::Integer)
        };
        assert_eq!(written(&field), json!({"type": "integer", "null_value": 42}));

        let field = FieldAnnotation {
            null_value: Some("1.5".to_string()),
            null_value_type: NullValueType::Double,
            ..FieldAnnotation::of(FieldType::Double)
        };
        assert_eq!(written(&field), json!({"type": "double", "null_value": 1.5}));

        let field = FieldAnnotation {
            null_value: Some("NULL".to_string()),
            ..FieldAnnotation::of(FieldType::Keyword)
        };
        assert_eq!(
            written(&field),
            json!({"type": "keyword", "null_value": "NULL"})
        );
    }

    #[test]
    fn test_null_value_not_coercible_is_a_write_error() {
        let field = FieldAnnotation {
            null_value: Some("many".to_string()),
            null_value_type: NullValueType::Long,
            ..FieldAnnotation::of(FieldType::Long)
        };
        let parameters = MappingParameters::from_field(&field).unwrap();
        let err = parameters
            .write_type_and_parameters(&mut Map::new())
            .unwrap_err();
        assert_eq!(
            err,
            PropertyWriteError::NullValueNotCoercible {
                value: "many".to_string(),
                null_value_type: NullValueType::Long,
            }
        );
    }

    #[test]
    fn test_text_parameters() {
        let field = FieldAnnotation {
            index: false,
            analyzer: Some("standard".to_string()),
            search_analyzer: Some("whitespace".to_string()),
            copy_to: vec!["all_text".to_string()],
            index_options: IndexOptions::Offsets,
            index_phrases: true,
            index_prefixes: Some(IndexPrefixes {
                min_chars: 1,
                max_chars: 10,
            }),
            norms: false,
            position_increment_gap: Some(42),
            similarity: Similarity::Boolean,
            term_vector: TermVector::WithPositionsOffsets,
            eager_global_ordinals: true,
            ..FieldAnnotation::of(FieldType::Text)
        };
        assert_eq!(
            written(&field),
            json!({
                "type": "text",
                "index": false,
                "analyzer": "standard",
                "search_analyzer": "whitespace",
                "copy_to": ["all_text"],
                "index_options": "offsets",
                "index_phrases": true,
                "index_prefixes": {"min_chars": 1, "max_chars": 10},
                "norms": false,
                "position_increment_gap": 42,
                "similarity": "boolean",
                "term_vector": "with_positions_offsets",
                "eager_global_ordinals": true
            })
        );
    }

    #[test]
    fn test_default_index_prefixes_write_empty_object() {
        let field = FieldAnnotation {
            index_prefixes: Some(IndexPrefixes::default()),
            ..FieldAnnotation::of(FieldType::Text)
        };
        assert_eq!(
            written(&field),
            json!({"type": "text", "index_prefixes": {}})
        );
    }

    #[test]
    fn test_invalid_index_prefixes() {
        let field = FieldAnnotation {
            index_prefixes: Some(IndexPrefixes {
                min_chars: 6,
                max_chars: 3,
            }),
            ..FieldAnnotation::of(FieldType::Text)
        };
        assert!(matches!(
            MappingParameters::from_field(&field),
            Err(ConfigurationError::InvalidIndexPrefixes { .. })
        ));
    }

    #[test]
    fn test_numeric_parameters() {
        let field = FieldAnnotation {
            scaling_factor: 100.0,
            coerce: false,
            ignore_malformed: true,
            ..FieldAnnotation::of(FieldType::ScaledFloat)
        };
        assert_eq!(
            written(&field),
            json!({
                "type": "scaled_float",
                "coerce": false,
                "ignore_malformed": true,
                "scaling_factor": 100.0
            })
        );

        let field = FieldAnnotation {
            scaling_factor: 0.0,
            ..FieldAnnotation::of(FieldType::ScaledFloat)
        };
        assert!(matches!(
            MappingParameters::from_field(&field),
            Err(ConfigurationError::InvalidScalingFactor { .. })
        ));
    }

    #[test]
    fn test_rank_feature_and_dense_vector() {
        let field = FieldAnnotation {
            positive_score_impact: false,
            ..FieldAnnotation::of(FieldType::RankFeature)
        };
        assert_eq!(
            written(&field),
            json!({"type": "rank_feature", "positive_score_impact": false})
        );

        let field = FieldAnnotation {
            dims: Some(16),
            ..FieldAnnotation::of(FieldType::DenseVector)
        };
        assert_eq!(written(&field), json!({"type": "dense_vector", "dims": 16}));
    }

    #[test]
    fn test_blank_analyzer_is_not_written() {
        let field = FieldAnnotation {
            analyzer: Some("  ".to_string()),
            ..FieldAnnotation::of(FieldType::Text)
        };
        assert_eq!(written(&field), json!({"type": "text"}));
    }
}
