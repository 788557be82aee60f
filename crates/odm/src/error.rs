//! Error types for mapping compilation.
//!
//! Errors are split by category so callers can tell an annotation mistake from a
//! missing resource:
//! - [`ConfigurationError`]: an annotation violates a parameter rule
//! - [`ResourceError`]: an external JSON fragment is missing or malformed
//! - [`MisuseError`]: a descriptor or request is used in a way that cannot be mapped
//!
//! Per-property serialization problems are not errors; they are reported as
//! [`MappingWarning`]s and the property is left out of the mapping.

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use std::fmt;

use thiserror::Error;

use crate::types::{FieldType, NullValueType};

/// The primary error type for all mapping operations.
#[derive(Error, Debug)]
pub enum MappingError {
    /// Annotation parameter errors
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// External resource errors
    #[error(transparent)]
    Resource(#[from] ResourceError),

    /// Descriptor or request misuse
    #[error(transparent)]
    Misuse(#[from] MisuseError),

    /// A configuration error raised while mapping a specific property.
    #[error("invalid mapping for property {entity}.{property}: {source}")]
    Property {
        entity: String,
        property: String,
        #[source]
        source: ConfigurationError,
    },

    /// The mapping tree could not be written as JSON.
    #[error("could not serialize mapping: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl MappingError {
    /// Wraps a configuration error with the property that caused it.
    pub fn property(
        entity: impl Into<String>,
        property: impl Into<String>,
        source: ConfigurationError,
    ) -> Self {
        MappingError::Property {
            entity: entity.into(),
            property: property.into(),
            source,
        }
    }
}

/// Errors raised when an annotation violates a parameter rule.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    /// `doc_values` cannot be switched off for this field type.
    #[error("doc_values=false is not allowed for field type {field_type}")]
    DocValuesNotAllowed { field_type: FieldType },

    /// `max_shingle_size` must lie between 2 and 4.
    #[error("max_shingle_size must be between 2 and 4, got {value}")]
    MaxShingleSizeOutOfRange { value: u32 },

    /// `enabled=false` is only meaningful for object fields.
    #[error("enabled=false is only allowed for field type object, not {field_type}")]
    EnabledNotAllowed { field_type: FieldType },

    /// Index prefix bounds are inverted or out of range.
    #[error("invalid index_prefixes: min_chars={min_chars}, max_chars={max_chars}")]
    InvalidIndexPrefixes { min_chars: u32, max_chars: u32 },

    /// Scaled floats need a positive, finite scaling factor.
    #[error("scaling_factor must be positive and finite, got {value}")]
    InvalidScalingFactor { value: f64 },
}

/// Errors reading external JSON fragments.
#[derive(Error, Debug)]
pub enum ResourceError {
    /// The resource does not exist.
    #[error("resource not found: {path}")]
    NotFound { path: String },

    /// The resource exists but could not be read.
    #[error("could not read resource {path}: {message}")]
    Unreadable { path: String, message: String },

    /// The resource is not valid JSON (or not the expected JSON shape).
    #[error("invalid JSON in resource {path}: {message}")]
    InvalidJson { path: String, message: String },

    /// A dynamic templates resource has no `dynamic_templates` array.
    #[error("resource {path} does not contain a dynamic_templates array")]
    MissingDynamicTemplates { path: String },
}

/// Errors raised when a descriptor or request cannot be used as given.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MisuseError {
    /// A property with disabled mapping must be declared as an object field.
    #[error(
        "could not write enabled=false mapping for {entity}.{property}: field type must be object, not {field_type}"
    )]
    DisabledPropertyNotObject {
        entity: String,
        property: String,
        field_type: FieldType,
    },

    /// A property with disabled mapping has no field annotation.
    #[error("could not write enabled=false mapping for {entity}.{property}: no field annotation")]
    DisabledPropertyWithoutField { entity: String, property: String },

    /// A property refers to an entity that is not registered.
    #[error("unknown entity: {name}")]
    UnknownEntity { name: String },

    /// An alias action is missing required parameters.
    #[error("invalid alias action: {message}")]
    InvalidAliasAction { message: String },

    /// Index sort orders, modes or missing values do not line up with the sort fields.
    #[error("invalid index sort: {message}")]
    InvalidIndexSort { message: String },

    /// A template request is incomplete.
    #[error("invalid template request: {message}")]
    InvalidTemplate { message: String },
}

/// Errors writing the parameters of a single property.
///
/// These never abort a build; the property is skipped and reported as a
/// [`MappingWarning`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PropertyWriteError {
    /// The `null_value` cannot be coerced to its declared type.
    #[error("null_value '{value}' is not a valid {null_value_type:?}")]
    NullValueNotCoercible {
        value: String,
        null_value_type: NullValueType,
    },

    /// A number has no JSON representation (NaN or infinite).
    #[error("{parameter} is not a finite number")]
    NonFiniteNumber { parameter: &'static str },
}

/// A property that was left out of a mapping because it could not be serialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingWarning {
    /// The entity declaring the property.
    pub entity: String,
    /// The property name.
    pub property: String,
    /// What went wrong.
    pub message: String,
}

impl fmt::Display for MappingWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "property {}.{} was skipped: {}",
            self.entity, self.property, self.message
        )
    }
}

/// Result type for mapping operations.
pub type MappingResult<T> = Result<T, MappingError>;
