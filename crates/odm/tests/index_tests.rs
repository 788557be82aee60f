//! Index definition integration tests.
//!
//! Settings, mappings and templates assembled from resources on disk.

mod common;

use std::fs;
use std::path::Path;

use serde_json::json;

use common::*;
use helios_odm::config::MappingConfig;
use helios_odm::entity::{
    EntityDescriptor, EntityRegistry, FieldAnnotation, MappingAnnotation, PropertyDescriptor,
    SettingAnnotation,
};
use helios_odm::error::{MappingError, MisuseError, ResourceError};
use helios_odm::index::{
    AliasAction, AliasActionParameters, AliasActions, IndexDefinition, PutIndexTemplateRequest,
    Settings,
};
use helios_odm::mapping::MappingBuilder;
use helios_odm::resource::FileSystemResourceLoader;
use helios_odm::types::FieldType;

fn write_resource(root: &Path, path: &str, content: &str) {
    let full_path = root.join(path);
    if let Some(parent) = full_path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(full_path, content).unwrap();
}

fn no_hints() -> MappingConfig {
    MappingConfig {
        write_type_hints: false,
        ..Default::default()
    }
}

// ============================================================================
// Settings
// ============================================================================

#[test]
fn test_settings_resource_is_merged_over_derived_values() {
    let dir = tempfile::tempdir().unwrap();
    write_resource(
        dir.path(),
        "settings/book.json",
        r#"{"index.number_of_replicas": 2, "analysis": {"analyzer": {"folding": {"tokenizer": "standard"}}}}"#,
    );
    let resources = FileSystemResourceLoader::new(dir.path());

    let setting = SettingAnnotation {
        setting_path: Some("/settings/book.json".to_string()),
        shards: 3,
        ..Default::default()
    };
    let settings = Settings::from_annotation(&setting, &resources).unwrap();

    assert_eq!(settings.get("index.number_of_shards"), Some(&json!(3)));
    assert_eq!(settings.get("index.number_of_replicas"), Some(&json!(2)));
    assert_eq!(
        settings.get("analysis.analyzer.folding.tokenizer"),
        Some(&json!("standard"))
    );
}

#[test]
fn test_server_configuration_derives_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let resources = FileSystemResourceLoader::new(dir.path());

    let setting = SettingAnnotation {
        use_server_configuration: true,
        ..Default::default()
    };
    let settings = Settings::from_annotation(&setting, &resources).unwrap();

    assert!(settings.is_empty());
}

#[test]
fn test_missing_settings_resource_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let resources = FileSystemResourceLoader::new(dir.path());

    let setting = SettingAnnotation {
        setting_path: Some("settings/missing.json".to_string()),
        ..Default::default()
    };
    let err = Settings::from_annotation(&setting, &resources).unwrap_err();

    assert!(matches!(
        err,
        MappingError::Resource(ResourceError::NotFound { .. })
    ));
}

#[test]
fn test_index_sort_lengths_must_line_up() {
    let dir = tempfile::tempdir().unwrap();
    let resources = FileSystemResourceLoader::new(dir.path());

    let setting = SettingAnnotation {
        sort_fields: vec!["published".to_string(), "title".to_string()],
        sort_orders: vec![helios_odm::entity::SortOrder::Desc],
        ..Default::default()
    };
    let err = Settings::from_annotation(&setting, &resources).unwrap_err();

    assert!(matches!(
        err,
        MappingError::Misuse(MisuseError::InvalidIndexSort { .. })
    ));
}

// ============================================================================
// Index definitions
// ============================================================================

#[test]
fn test_index_definition_from_file_resources() {
    let dir = tempfile::tempdir().unwrap();
    write_resource(
        dir.path(),
        "settings/book.json",
        r#"{"index": {"max_result_window": 50000}}"#,
    );
    write_resource(
        dir.path(),
        "mappings/isbn.json",
        r#"{"type": "keyword", "normalizer": "lowercase"}"#,
    );

    let entity = EntityDescriptor::new("Book")
        .with_setting(SettingAnnotation {
            setting_path: Some("settings/book.json".to_string()),
            ..Default::default()
        })
        .with_property(
            PropertyDescriptor::new("title").with_field(FieldAnnotation::of(FieldType::Text)),
        )
        .with_property(
            PropertyDescriptor::new("isbn").with_mapping(MappingAnnotation::from_path("mappings/isbn.json")),
        );
    let registry = EntityRegistry::new().with_entity(entity.clone());
    let resources = FileSystemResourceLoader::new(dir.path());
    let config = no_hints();
    let builder = MappingBuilder::new(&registry, &resources, &config);

    let definition = IndexDefinition::for_entity(&entity, &builder).unwrap();

    assert_eq!(definition.index_name, "book");
    assert!(definition.warnings.is_empty());
    assert_eq!(
        definition.settings.get("index.max_result_window"),
        Some(&json!(50000))
    );
    assert_eq!(definition.settings.get("index.number_of_shards"), Some(&json!(1)));
    assert_property(
        &definition.mapping,
        "isbn",
        &json!({"type": "keyword", "normalizer": "lowercase"}),
    );
    assert_eq!(property_names(&definition.mapping), vec!["title", "isbn"]);
}

#[test]
fn test_index_definition_reports_skipped_properties() {
    let entity = EntityDescriptor::new("Reading").with_property(
        PropertyDescriptor::new("value").with_field(FieldAnnotation {
            null_value: Some("none".to_string()),
            null_value_type: helios_odm::types::NullValueType::Long,
            ..FieldAnnotation::of(FieldType::Long)
        }),
    );
    let harness = MappingHarness::new().with_entity(entity.clone());

    let definition = IndexDefinition::for_entity(&entity, &harness.builder()).unwrap();

    assert_eq!(definition.warnings.len(), 1);
    assert_eq!(definition.create_body()["mappings"], json!({"properties": {}}));
}

// ============================================================================
// Templates and aliases
// ============================================================================

#[test]
fn test_composable_template_from_index_definition() {
    let harness = MappingHarness::new()
        .with_entity(book())
        .with_entity(author());
    let definition = IndexDefinition::for_entity(harness.entity("Book"), &harness.builder()).unwrap();

    let aliases = AliasActions::new().with_action(
        AliasAction::add(AliasActionParameters::new(["books-*"], ["books"])).unwrap(),
    );
    let request = PutIndexTemplateRequest::new("books", ["books-*"])
        .unwrap()
        .with_settings(definition.settings.clone())
        .with_mapping(definition.mapping.clone())
        .with_aliases(aliases)
        .with_priority(10);

    let body = request.to_request_body();

    assert_eq!(body["index_patterns"], json!(["books-*"]));
    assert_eq!(body["priority"], json!(10));
    assert_eq!(body["template"]["aliases"], json!({"books": {}}));
    assert_eq!(body["template"]["mappings"], definition.mapping);
    assert_eq!(
        body["template"]["settings"]["index"]["number_of_shards"],
        json!(1)
    );
}

#[test]
fn test_rollover_alias_actions() {
    let actions = AliasActions::new()
        .with_action(
            AliasAction::add(AliasActionParameters::new(["books-2"], ["books"]).write_index(true))
                .unwrap(),
        )
        .with_action(
            AliasAction::add(AliasActionParameters::new(["books-1"], ["books"]).write_index(false))
                .unwrap(),
        );

    let body = actions.to_request_body().unwrap();

    assert_eq!(
        body,
        json!({"actions": [
            {"add": {"indices": ["books-2"], "aliases": ["books"], "is_write_index": true}},
            {"add": {"indices": ["books-1"], "aliases": ["books"], "is_write_index": false}}
        ]})
    );
}
