//! Helios ODM command line
//!
//! Prints the Elasticsearch mapping, settings or index-creation body of an entity
//! described in a JSON file.

mod config;

use std::fs;

use anyhow::Context;
use clap::Parser;
use helios_odm::MappingWarning;
use helios_odm::entity::EntityRegistry;
use helios_odm::index::{IndexDefinition, Settings};
use helios_odm::mapping::MappingBuilder;
use helios_odm::resource::FileSystemResourceLoader;
use serde_json::Value;
use tracing::{info, warn};

use crate::config::{CliConfig, Command};

/// Initializes logging to stderr, keeping stdout for the generated JSON.
///
/// `RUST_LOG` overrides the configured level.
fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("helios_odm={},helios_odm_cli={}", level, level))
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Reads the entity descriptors from the configured file.
fn load_registry(config: &CliConfig) -> anyhow::Result<EntityRegistry> {
    let content = fs::read_to_string(&config.entities)
        .with_context(|| format!("Failed to read {}", config.entities.display()))?;
    let registry = EntityRegistry::from_json_str(&content)
        .with_context(|| format!("Invalid entity file {}", config.entities.display()))?;
    info!(
        entities = registry.len(),
        file = %config.entities.display(),
        "Loaded entity descriptors"
    );
    Ok(registry)
}

fn log_warnings(warnings: &[MappingWarning]) {
    for warning in warnings {
        warn!(
            entity = %warning.entity,
            property = %warning.property,
            "{}",
            warning.message
        );
    }
}

/// Runs the configured command and returns the JSON document to print.
fn run(config: &CliConfig) -> anyhow::Result<Value> {
    let registry = load_registry(config)?;
    let resources = FileSystemResourceLoader::new(&config.resource_root);
    let mapping_config = config.mapping_config();
    let builder = MappingBuilder::new(&registry, &resources, &mapping_config);

    let entity = registry.require(config.command.entity())?;

    let output = match &config.command {
        Command::Mapping { .. } => {
            let (mapping, warnings) = builder.build_mapping_with_warnings(entity, None)?;
            log_warnings(&warnings);
            mapping
        }
        Command::Settings { .. } => Settings::for_entity(entity, &resources)?.into_value(),
        Command::Index {
            template_patterns, ..
        } => {
            let definition = IndexDefinition::for_entity(entity, &builder)?;
            log_warnings(&definition.warnings);
            if template_patterns.is_empty() {
                definition.create_body()
            } else {
                definition.template_body(template_patterns)
            }
        }
    };

    Ok(output)
}

fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();
    init_logging(&config.log_level);

    if let Err(errors) = config.validate() {
        for error in &errors {
            eprintln!("Configuration error: {}", error);
        }
        std::process::exit(1);
    }

    let output = run(&config)?;
    let rendered = if config.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{}", rendered);

    Ok(())
}
