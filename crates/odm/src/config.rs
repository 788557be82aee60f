//! Mapping configuration.
//!
//! [`MappingConfig`] holds the settings that apply to every entity mapped by a
//! [`MappingBuilder`](crate::mapping::MappingBuilder): the type-hint property and
//! how property names become field names.
//!
//! # Example
//!
//! ```
//! use helios_odm::config::{FieldNamingStrategy, MappingConfig};
//!
//! let config = MappingConfig {
//!     field_naming_strategy: FieldNamingStrategy::SnakeCase,
//!     ..Default::default()
//! };
//! assert_eq!(config.type_hint_key, "_class");
//! assert_eq!(config.field_naming_strategy.apply("publishedAt"), "published_at");
//! ```

use std::fmt;
use std::str::FromStr;

use heck::{ToKebabCase, ToLowerCamelCase, ToSnakeCase};
use serde::{Deserialize, Serialize};

/// Default name of the type-hint property.
pub const DEFAULT_TYPE_HINT_KEY: &str = "_class";

/// How property names are turned into field names when no explicit name is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldNamingStrategy {
    /// Use the property name as is.
    #[default]
    Identity,
    /// `publishedAt` becomes `published_at`.
    SnakeCase,
    /// `published_at` becomes `publishedAt`.
    CamelCase,
    /// `publishedAt` becomes `published-at`.
    KebabCase,
}

impl FieldNamingStrategy {
    /// Applies the strategy to a property name.
    pub fn apply(&self, property_name: &str) -> String {
        match self {
            FieldNamingStrategy::Identity => property_name.to_string(),
            FieldNamingStrategy::SnakeCase => property_name.to_snake_case(),
            FieldNamingStrategy::CamelCase => property_name.to_lower_camel_case(),
            FieldNamingStrategy::KebabCase => property_name.to_kebab_case(),
        }
    }
}

impl fmt::Display for FieldNamingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldNamingStrategy::Identity => write!(f, "identity"),
            FieldNamingStrategy::SnakeCase => write!(f, "snake_case"),
            FieldNamingStrategy::CamelCase => write!(f, "camel_case"),
            FieldNamingStrategy::KebabCase => write!(f, "kebab_case"),
        }
    }
}

impl FromStr for FieldNamingStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "identity" => Ok(FieldNamingStrategy::Identity),
            "snake_case" | "snake" => Ok(FieldNamingStrategy::SnakeCase),
            "camel_case" | "camel" => Ok(FieldNamingStrategy::CamelCase),
            "kebab_case" | "kebab" => Ok(FieldNamingStrategy::KebabCase),
            _ => Err(format!("unknown field naming strategy: {}", s)),
        }
    }
}

/// Settings shared by all mapping builds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MappingConfig {
    /// Name of the property that stores the entity type of a document.
    pub type_hint_key: String,
    /// Whether mappings carry the type-hint property unless an entity says otherwise.
    pub write_type_hints: bool,
    /// Naming strategy for properties without an explicit field name.
    pub field_naming_strategy: FieldNamingStrategy,
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            type_hint_key: DEFAULT_TYPE_HINT_KEY.to_string(),
            write_type_hints: true,
            field_naming_strategy: FieldNamingStrategy::Identity,
        }
    }
}
