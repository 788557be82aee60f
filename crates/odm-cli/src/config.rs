//! Command-line configuration.
//!
//! Every option can also be given through the environment.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `ODM_ENTITIES` | - | JSON file with the entity descriptors |
//! | `ODM_RESOURCE_ROOT` | . | Root directory of mapping, settings and template fragments |
//! | `ODM_TYPE_HINT_KEY` | _class | Name of the type-hint property |
//! | `ODM_WRITE_TYPE_HINTS` | true | Whether mappings carry the type-hint property |
//! | `ODM_FIELD_NAMING` | identity | Field naming strategy |
//! | `ODM_LOG_LEVEL` | warn | Log level |

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use helios_odm::config::{DEFAULT_TYPE_HINT_KEY, FieldNamingStrategy, MappingConfig};

/// Command-line configuration of `helios-odm`.
#[derive(Debug, Clone, Parser)]
#[command(name = "helios-odm")]
#[command(about = "Prints Elasticsearch mappings, settings and index bodies for entity descriptors")]
pub struct CliConfig {
    /// JSON file with the entity descriptors.
    #[arg(short, long, env = "ODM_ENTITIES")]
    pub entities: PathBuf,

    /// Root directory that resource paths are resolved against.
    #[arg(long, env = "ODM_RESOURCE_ROOT", default_value = ".")]
    pub resource_root: PathBuf,

    /// Name of the type-hint property.
    #[arg(long, env = "ODM_TYPE_HINT_KEY", default_value = DEFAULT_TYPE_HINT_KEY)]
    pub type_hint_key: String,

    /// Write the type-hint property unless an entity says otherwise.
    #[arg(long, env = "ODM_WRITE_TYPE_HINTS", default_value = "true", action = ArgAction::Set)]
    pub write_type_hints: bool,

    /// Field naming strategy (identity, snake_case, camel_case, kebab_case).
    #[arg(long, env = "ODM_FIELD_NAMING", default_value = "identity")]
    pub field_naming: FieldNamingStrategy,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "ODM_LOG_LEVEL", default_value = "warn")]
    pub log_level: String,

    /// Pretty-print the output.
    #[arg(long)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// What to print.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// The mapping of an entity.
    Mapping {
        /// Registered entity name.
        entity: String,
    },
    /// The index settings of an entity.
    Settings {
        /// Registered entity name.
        entity: String,
    },
    /// The index-creation body of an entity, or a legacy template body when
    /// index patterns are given.
    Index {
        /// Registered entity name.
        entity: String,

        /// Index patterns of a template wrapping the index body.
        #[arg(long = "template-pattern")]
        template_patterns: Vec<String>,
    },
}

impl Command {
    /// Returns the entity the command is about.
    pub fn entity(&self) -> &str {
        match self {
            Command::Mapping { entity }
            | Command::Settings { entity }
            | Command::Index { entity, .. } => entity,
        }
    }
}

impl CliConfig {
    /// Returns the library configuration selected by the options.
    pub fn mapping_config(&self) -> MappingConfig {
        MappingConfig {
            type_hint_key: self.type_hint_key.clone(),
            write_type_hints: self.write_type_hints,
            field_naming_strategy: self.field_naming,
        }
    }

    /// Validates the configuration and returns errors if any.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if !self.entities.is_file() {
            errors.push(format!(
                "Entity file {} does not exist",
                self.entities.display()
            ));
        }

        if !self.resource_root.is_dir() {
            errors.push(format!(
                "Resource root {} is not a directory",
                self.resource_root.display()
            ));
        }

        if self.type_hint_key.trim().is_empty() {
            errors.push("Type hint key cannot be empty".to_string());
        }

        if self.command.entity().trim().is_empty() {
            errors.push("Entity name cannot be empty".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults() {
        let config =
            CliConfig::try_parse_from(["helios-odm", "--entities", "e.json", "mapping", "Book"])
                .unwrap();
        assert_eq!(config.resource_root, PathBuf::from("."));
        assert_eq!(config.type_hint_key, "_class");
        assert!(config.write_type_hints);
        assert_eq!(config.field_naming, FieldNamingStrategy::Identity);
        assert!(!config.pretty);
        assert_eq!(
            config.command,
            Command::Mapping {
                entity: "Book".to_string()
            }
        );
    }

    #[test]
    fn test_parse_overrides() {
        let config = CliConfig::try_parse_from([
            "helios-odm",
            "-e",
            "e.json",
            "--write-type-hints",
            "false",
            "--field-naming",
            "snake_case",
            "--pretty",
            "index",
            "Book",
            "--template-pattern",
            "books-*",
        ])
        .unwrap();

        let mapping_config = config.mapping_config();
        assert!(!mapping_config.write_type_hints);
        assert_eq!(
            mapping_config.field_naming_strategy,
            FieldNamingStrategy::SnakeCase
        );
        assert!(config.pretty);
        assert_eq!(
            config.command,
            Command::Index {
                entity: "Book".to_string(),
                template_patterns: vec!["books-*".to_string()],
            }
        );
    }

    #[test]
    fn test_unknown_field_naming_is_rejected() {
        let result = CliConfig::try_parse_from([
            "helios-odm",
            "-e",
            "e.json",
            "--field-naming",
            "shouting",
            "mapping",
            "Book",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_missing_entity_file() {
        let config = CliConfig::try_parse_from([
            "helios-odm",
            "-e",
            "/does/not/exist.json",
            "settings",
            "Book",
        ])
        .unwrap();
        let errors = config.validate().unwrap_err();
        assert!(errors.iter().any(|e| e.contains("Entity file")));
    }
}
