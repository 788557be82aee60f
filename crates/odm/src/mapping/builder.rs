//! Mapping tree builder.
//!
//! Walks an entity and the entities reachable from it and produces the mapping
//! document Elasticsearch expects in an index-creation or put-mapping request.
//!
//! The walk follows nested and object properties into the entities they refer to.
//! Entity graphs may be cyclic; the builder does no cycle detection of its own and
//! relies on the `ignore_fields` list of the referencing field annotation to stop
//! the recursion.
//!
//! Per-build state (type-hint flag, collected `_source` excludes, warnings) lives in
//! a [`BuildContext`] created for every call, so a single builder can be shared by
//! concurrent builds.

use serde_json::{Map, Value, json};
use tracing::{debug, warn};

use crate::config::MappingConfig;
use crate::entity::{
    CompletionField, EntityDescriptor, EntityRegistry, FieldAnnotation, JoinTypeRelation,
    MultiField, PropertyDescriptor, PropertyKind,
};
use crate::error::{
    ConfigurationError, MappingError, MappingResult, MappingWarning, MisuseError,
    PropertyWriteError, ResourceError,
};
use crate::resource::ResourceLoader;
use crate::types::{Dynamic, FieldType};

use super::geo_shape::GeoShapeMappingParameters;
use super::parameters::{
    FIELD_PARAM_ANALYZER, FIELD_PARAM_DOC_VALUES, FIELD_PARAM_ENABLED, FIELD_PARAM_INDEX,
    FIELD_PARAM_SEARCH_ANALYZER, FIELD_PARAM_STORE, FIELD_PARAM_TYPE, MappingParameters,
};

const FIELD_PROPERTIES: &str = "properties";
const FIELD_PARAM_FIELDS: &str = "fields";
const FIELD_PARAM_INCLUDE_IN_PARENT: &str = "include_in_parent";
const TYPE_DYNAMIC: &str = "dynamic";
const DATE_DETECTION: &str = "date_detection";
const NUMERIC_DETECTION: &str = "numeric_detection";
const DYNAMIC_DATE_FORMATS: &str = "dynamic_date_formats";
const DYNAMIC_TEMPLATES: &str = "dynamic_templates";
const RUNTIME: &str = "runtime";
const SOURCE: &str = "_source";
const SOURCE_EXCLUDES: &str = "excludes";

const TYPE_VALUE_KEYWORD: &str = "keyword";
const TYPE_VALUE_OBJECT: &str = "object";
const TYPE_VALUE_GEO_POINT: &str = "geo_point";
const TYPE_VALUE_JOIN: &str = "join";
const TYPE_VALUE_COMPLETION: &str = "completion";

const JOIN_TYPE_RELATIONS: &str = "relations";

const COMPLETION_MAX_INPUT_LENGTH: &str = "max_input_length";
const COMPLETION_PRESERVE_POSITION_INCREMENTS: &str = "preserve_position_increments";
const COMPLETION_PRESERVE_SEPARATORS: &str = "preserve_separators";
const COMPLETION_CONTEXTS: &str = "contexts";
const CONTEXT_NAME: &str = "name";
const CONTEXT_TYPE: &str = "type";
const CONTEXT_PRECISION: &str = "precision";
const CONTEXT_PATH: &str = "path";

/// Builds mapping documents for registered entities.
///
/// # Example
///
/// ```
/// use helios_odm::config::MappingConfig;
/// use helios_odm::entity::{EntityDescriptor, EntityRegistry, FieldAnnotation, PropertyDescriptor};
/// use helios_odm::mapping::MappingBuilder;
/// use helios_odm::resource::InMemoryResourceLoader;
/// use helios_odm::types::FieldType;
///
/// let book = EntityDescriptor::new("Book").with_property(
///     PropertyDescriptor::new("title").with_field(FieldAnnotation::of(FieldType::Text)),
/// );
/// let registry = EntityRegistry::new().with_entity(book.clone());
/// let resources = InMemoryResourceLoader::new();
/// let config = MappingConfig::default();
///
/// let builder = MappingBuilder::new(&registry, &resources, &config);
/// let mapping = builder.build_mapping_tree(&book).unwrap();
/// assert_eq!(mapping["properties"]["title"]["type"], "text");
/// ```
pub struct MappingBuilder<'a> {
    registry: &'a EntityRegistry,
    resources: &'a dyn ResourceLoader,
    config: &'a MappingConfig,
}

/// Mutable state of one build.
#[derive(Debug, Default)]
struct BuildContext {
    write_type_hints: bool,
    /// Dotted field paths, relative to the root, to exclude from `_source`.
    excludes: Vec<String>,
    warnings: Vec<MappingWarning>,
}

/// Where in the tree an entity is being mapped.
#[derive(Debug, Clone, Copy)]
struct EntityLevel<'p> {
    root: bool,
    /// Field annotation of the property that led to this entity.
    parent_field: Option<&'p FieldAnnotation>,
    /// Dynamic policy handed down when the entity declares none.
    dynamic_mapping: Option<Dynamic>,
    /// Dotted path of the property that led to this entity; empty at the root.
    path: &'p str,
}

impl EntityLevel<'_> {
    fn root(entity: &EntityDescriptor) -> EntityLevel<'static> {
        EntityLevel {
            root: true,
            parent_field: None,
            dynamic_mapping: entity.dynamic_mapping,
            path: "",
        }
    }

    fn is_ignored(&self, field_name: &str) -> bool {
        self.parent_field
            .is_some_and(|f| f.ignore_fields.iter().any(|ignored| ignored == field_name))
    }

    fn child_path(&self, field_name: &str) -> String {
        if self.path.is_empty() {
            field_name.to_string()
        } else {
            format!("{}.{}", self.path, field_name)
        }
    }
}

/// Failure while mapping a single property.
enum PropertyError {
    /// Aborts the whole build.
    Fatal(MappingError),
    /// Drops the property and is reported as a warning.
    Write(PropertyWriteError),
}

impl From<MappingError> for PropertyError {
    fn from(err: MappingError) -> Self {
        PropertyError::Fatal(err)
    }
}

impl From<MisuseError> for PropertyError {
    fn from(err: MisuseError) -> Self {
        PropertyError::Fatal(err.into())
    }
}

impl From<ResourceError> for PropertyError {
    fn from(err: ResourceError) -> Self {
        PropertyError::Fatal(err.into())
    }
}

/// Failure while extracting or writing field parameters.
enum FieldError {
    Configuration(ConfigurationError),
    Write(PropertyWriteError),
}

impl From<ConfigurationError> for FieldError {
    fn from(err: ConfigurationError) -> Self {
        FieldError::Configuration(err)
    }
}

impl From<PropertyWriteError> for FieldError {
    fn from(err: PropertyWriteError) -> Self {
        FieldError::Write(err)
    }
}

impl FieldError {
    fn into_property_error(self, entity: &str, property: &str) -> PropertyError {
        match self {
            FieldError::Configuration(err) => {
                PropertyError::Fatal(MappingError::property(entity, property, err))
            }
            FieldError::Write(err) => PropertyError::Write(err),
        }
    }
}

impl<'a> MappingBuilder<'a> {
    /// Creates a builder resolving entity references through `registry` and
    /// mapping fragments through `resources`.
    pub fn new(
        registry: &'a EntityRegistry,
        resources: &'a dyn ResourceLoader,
        config: &'a MappingConfig,
    ) -> Self {
        Self {
            registry,
            resources,
            config,
        }
    }

    /// Returns the configuration used by this builder.
    pub fn config(&self) -> &MappingConfig {
        self.config
    }

    /// Returns the loader used for mapping fragments.
    pub fn resources(&self) -> &'a dyn ResourceLoader {
        self.resources
    }

    /// Returns the registry used to resolve entity references.
    pub fn registry(&self) -> &'a EntityRegistry {
        self.registry
    }

    /// Builds the mapping of `entity` as a JSON string.
    ///
    /// Runtime fields are taken from the entity's `runtime_fields_path`, if any.
    /// Skipped properties are logged.
    pub fn build_mapping(&self, entity: &EntityDescriptor) -> MappingResult<String> {
        self.build_mapping_with_runtime_fields(entity, None)
    }

    /// Builds the mapping of `entity` as a JSON string with an explicit runtime
    /// fields document.
    ///
    /// A supplied document takes precedence over the entity's `runtime_fields_path`.
    pub fn build_mapping_with_runtime_fields(
        &self,
        entity: &EntityDescriptor,
        runtime_fields: Option<Map<String, Value>>,
    ) -> MappingResult<String> {
        let (mapping, _warnings) = self.build_mapping_with_warnings(entity, runtime_fields)?;
        Ok(serde_json::to_string(&mapping)?)
    }

    /// Builds the mapping of `entity` as a JSON tree.
    pub fn build_mapping_tree(&self, entity: &EntityDescriptor) -> MappingResult<Value> {
        let (mapping, _warnings) = self.build_mapping_with_warnings(entity, None)?;
        Ok(mapping)
    }

    /// Builds the mapping of `entity` and returns it together with the properties
    /// that were skipped because their parameters could not be written.
    pub fn build_mapping_with_warnings(
        &self,
        entity: &EntityDescriptor,
        runtime_fields: Option<Map<String, Value>>,
    ) -> MappingResult<(Value, Vec<MappingWarning>)> {
        debug!(entity = %entity.name, "Building mapping");

        let runtime_fields = match runtime_fields {
            Some(document) => Some(document),
            None => self.load_runtime_fields(entity)?,
        };

        let mut ctx = BuildContext {
            write_type_hints: entity.write_type_hints(self.config.write_type_hints),
            ..Default::default()
        };

        let mut root = Map::new();
        self.add_dynamic_templates(&mut root, entity)?;
        self.map_entity(
            &mut root,
            entity,
            EntityLevel::root(entity),
            runtime_fields,
            &mut ctx,
        )?;

        if !ctx.excludes.is_empty() {
            let excludes: Vec<Value> = ctx.excludes.drain(..).map(Value::String).collect();
            root.insert(SOURCE.into(), json!({ SOURCE_EXCLUDES: excludes }));
        }

        debug!(
            entity = %entity.name,
            skipped = ctx.warnings.len(),
            "Finished building mapping"
        );

        Ok((Value::Object(root), ctx.warnings))
    }

    fn load_runtime_fields(
        &self,
        entity: &EntityDescriptor,
    ) -> MappingResult<Option<Map<String, Value>>> {
        let Some(path) = entity
            .mapping
            .as_ref()
            .and_then(|m| m.runtime_fields_path.as_deref())
            .filter(|p| !p.trim().is_empty())
        else {
            return Ok(None);
        };

        debug!(entity = %entity.name, path, "Loading runtime fields");
        match self.resources.read_json(path)? {
            Value::Object(document) => Ok(Some(document)),
            _ => Err(ResourceError::InvalidJson {
                path: path.to_string(),
                message: "runtime fields must be a JSON object".to_string(),
            }
            .into()),
        }
    }

    fn add_dynamic_templates(
        &self,
        node: &mut Map<String, Value>,
        entity: &EntityDescriptor,
    ) -> MappingResult<()> {
        let Some(path) = entity
            .dynamic_templates
            .as_ref()
            .map(|t| t.mapping_path.as_str())
            .filter(|p| !p.trim().is_empty())
        else {
            return Ok(());
        };

        debug!(entity = %entity.name, path, "Loading dynamic templates");
        let document = self.resources.read_json(path)?;
        match document.get(DYNAMIC_TEMPLATES) {
            Some(templates @ Value::Array(_)) => {
                node.insert(DYNAMIC_TEMPLATES.into(), templates.clone());
                Ok(())
            }
            _ => Err(ResourceError::MissingDynamicTemplates {
                path: path.to_string(),
            }
            .into()),
        }
    }

    /// Writes the mapping of `entity` into `node`.
    ///
    /// For nested levels `node` is the already typed object or nested field.
    fn map_entity(
        &self,
        node: &mut Map<String, Value>,
        entity: &EntityDescriptor,
        level: EntityLevel<'_>,
        runtime_fields: Option<Map<String, Value>>,
        ctx: &mut BuildContext,
    ) -> MappingResult<()> {
        if let Some(mapping) = &entity.mapping {
            if !mapping.enabled {
                node.insert(FIELD_PARAM_ENABLED.into(), false.into());
                return Ok(());
            }
            if let Some(detection) = mapping.date_detection.as_bool() {
                node.insert(DATE_DETECTION.into(), detection.into());
            }
            if let Some(detection) = mapping.numeric_detection.as_bool() {
                node.insert(NUMERIC_DETECTION.into(), detection.into());
            }
            if !mapping.dynamic_date_formats.is_empty() {
                node.insert(
                    DYNAMIC_DATE_FORMATS.into(),
                    mapping.dynamic_date_formats.clone().into(),
                );
            }
        }

        if level.root {
            if let Some(runtime_fields) = runtime_fields {
                node.insert(RUNTIME.into(), Value::Object(runtime_fields));
            }
        }

        let dynamic = entity
            .dynamic()
            .mapped_name()
            .or_else(|| level.dynamic_mapping.and_then(|d| d.mapped_name()));
        if let Some(dynamic) = dynamic {
            node.insert(TYPE_DYNAMIC.into(), dynamic.into());
        }

        let mut properties = Map::new();

        if ctx.write_type_hints {
            properties.insert(
                self.config.type_hint_key.clone(),
                json!({
                    FIELD_PARAM_TYPE: TYPE_VALUE_KEYWORD,
                    FIELD_PARAM_INDEX: false,
                    FIELD_PARAM_DOC_VALUES: false
                }),
            );
        }

        for property in &entity.properties {
            let field_name = property.field_name(self.config.field_naming_strategy);

            if property.transient || level.is_ignored(&field_name) {
                continue;
            }

            if property.seq_no_primary_term {
                if property.field.is_some() {
                    warn!(
                        entity = %entity.name,
                        property = %property.name,
                        "Property is a seq_no/primary_term holder; its field annotation is ignored"
                    );
                }
                continue;
            }

            let existed = properties.contains_key(&field_name);
            match self.map_property(&mut properties, entity, property, &field_name, level, ctx) {
                Ok(()) => {}
                Err(PropertyError::Fatal(err)) => return Err(err),
                Err(PropertyError::Write(err)) => {
                    warn!(
                        entity = %entity.name,
                        property = %property.name,
                        error = %err,
                        "Error mapping property, skipping it"
                    );
                    if !existed {
                        properties.shift_remove(&field_name);
                    }
                    ctx.warnings.push(MappingWarning {
                        entity: entity.name.clone(),
                        property: property.name.clone(),
                        message: err.to_string(),
                    });
                }
            }
        }

        node.insert(FIELD_PROPERTIES.into(), Value::Object(properties));
        Ok(())
    }

    /// Writes the mapping of one property into the `properties` object of its entity.
    fn map_property(
        &self,
        properties: &mut Map<String, Value>,
        entity: &EntityDescriptor,
        property: &PropertyDescriptor,
        field_name: &str,
        level: EntityLevel<'_>,
        ctx: &mut BuildContext,
    ) -> Result<(), PropertyError> {
        if let Some(mapping) = &property.mapping {
            if !mapping.enabled {
                let stub = disabled_property_mapping(entity, property)?;
                properties.insert(field_name.into(), stub);
                return Ok(());
            }
            if let Some(path) = mapping
                .mapping_path
                .as_deref()
                .filter(|p| !p.trim().is_empty())
            {
                debug!(entity = %entity.name, property = %property.name, path, "Loading property mapping");
                let fragment = self.resources.read_json(path)?;
                properties.insert(field_name.into(), fragment);
                return Ok(());
            }
        }

        let path = level.child_path(field_name);
        if property.is_excluded_from_source() {
            ctx.excludes.push(path.clone());
        }

        // Geo stubs do not end the dispatch; a later field annotation on the same
        // property replaces them.
        match &property.kind {
            PropertyKind::GeoPoint => {
                properties.insert(
                    field_name.into(),
                    json!({ FIELD_PARAM_TYPE: TYPE_VALUE_GEO_POINT }),
                );
            }
            PropertyKind::GeoShape(shape) => {
                let mut node = Map::new();
                GeoShapeMappingParameters::from(shape).write_type_and_parameters(&mut node);
                properties.insert(field_name.into(), Value::Object(node));
            }
            PropertyKind::Join { relations } => {
                if relations.is_empty() {
                    warn!(
                        entity = %entity.name,
                        property = %property.name,
                        "Join field has no relations, skipping it"
                    );
                    ctx.warnings.push(MappingWarning {
                        entity: entity.name.clone(),
                        property: property.name.clone(),
                        message: "join field has no relations".to_string(),
                    });
                } else {
                    properties.insert(field_name.into(), join_field_mapping(relations));
                }
                return Ok(());
            }
            PropertyKind::Entity { entity: nested_name } if property.has_relevant_annotation() => {
                let Some(field) = &property.field else {
                    return Ok(());
                };
                if field.field_type.is_nested_or_object() {
                    let nested = self.registry.require(nested_name)?;
                    let mut node = Map::new();
                    node.insert(FIELD_PARAM_TYPE.into(), field.field_type.mapped_name().into());
                    if field.field_type == FieldType::Nested && field.include_in_parent {
                        node.insert(FIELD_PARAM_INCLUDE_IN_PARENT.into(), true.into());
                    }
                    let nested_level = EntityLevel {
                        root: false,
                        parent_field: Some(field),
                        dynamic_mapping: property.dynamic_mapping,
                        path: &path,
                    };
                    self.map_entity(&mut node, nested, nested_level, None, ctx)?;
                    properties.insert(field_name.into(), Value::Object(node));
                    return Ok(());
                }
            }
            PropertyKind::Completion(completion) => {
                properties.insert(field_name.into(), completion_field_mapping(completion));
                return Ok(());
            }
            _ => {}
        }

        if level.root && property.id && property.field.is_some() {
            properties.insert(
                field_name.into(),
                json!({ FIELD_PARAM_TYPE: TYPE_VALUE_KEYWORD, FIELD_PARAM_INDEX: true }),
            );
        } else if let Some(multi_field) = &property.multi_field {
            let node = multi_field_mapping(multi_field, property.dynamic_mapping)
                .map_err(|e| e.into_property_error(&entity.name, &property.name))?;
            properties.insert(field_name.into(), node);
        } else if let Some(field) = &property.field {
            let node = single_field_mapping(field, property.dynamic_mapping)
                .map_err(|e| e.into_property_error(&entity.name, &property.name))?;
            if !node.is_empty() {
                properties.insert(field_name.into(), Value::Object(node));
            }
        }

        Ok(())
    }
}

fn disabled_property_mapping(
    entity: &EntityDescriptor,
    property: &PropertyDescriptor,
) -> Result<Value, MisuseError> {
    let field = property
        .field
        .as_ref()
        .ok_or_else(|| MisuseError::DisabledPropertyWithoutField {
            entity: entity.name.clone(),
            property: property.name.clone(),
        })?;

    if field.field_type != FieldType::Object {
        return Err(MisuseError::DisabledPropertyNotObject {
            entity: entity.name.clone(),
            property: property.name.clone(),
            field_type: field.field_type,
        });
    }

    Ok(json!({ FIELD_PARAM_TYPE: TYPE_VALUE_OBJECT, FIELD_PARAM_ENABLED: false }))
}

/// A parent with a single child maps to the child name, several children to a list.
fn join_field_mapping(relations: &[JoinTypeRelation]) -> Value {
    let mut relations_node = Map::new();
    for relation in relations {
        match relation.children.as_slice() {
            [] => {}
            [child] => {
                relations_node.insert(relation.parent.clone(), child.as_str().into());
            }
            children => {
                relations_node.insert(relation.parent.clone(), children.to_vec().into());
            }
        }
    }

    json!({
        FIELD_PARAM_TYPE: TYPE_VALUE_JOIN,
        JOIN_TYPE_RELATIONS: relations_node
    })
}

fn completion_field_mapping(completion: &CompletionField) -> Value {
    let mut node = Map::new();
    node.insert(FIELD_PARAM_TYPE.into(), TYPE_VALUE_COMPLETION.into());
    node.insert(
        COMPLETION_MAX_INPUT_LENGTH.into(),
        completion.max_input_length.into(),
    );
    node.insert(
        COMPLETION_PRESERVE_POSITION_INCREMENTS.into(),
        completion.preserve_position_increments.into(),
    );
    node.insert(
        COMPLETION_PRESERVE_SEPARATORS.into(),
        completion.preserve_separators.into(),
    );
    if let Some(search_analyzer) = completion.search_analyzer.as_deref().filter(|a| !a.is_empty()) {
        node.insert(FIELD_PARAM_SEARCH_ANALYZER.into(), search_analyzer.into());
    }
    if let Some(analyzer) = completion.analyzer.as_deref().filter(|a| !a.is_empty()) {
        node.insert(FIELD_PARAM_ANALYZER.into(), analyzer.into());
    }

    if !completion.contexts.is_empty() {
        let contexts = completion
            .contexts
            .iter()
            .map(|context| {
                let mut context_node = Map::new();
                context_node.insert(CONTEXT_NAME.into(), context.name.as_str().into());
                context_node.insert(
                    CONTEXT_TYPE.into(),
                    context.context_type.mapped_name().into(),
                );
                if let Some(precision) = context.precision.as_deref().filter(|p| !p.is_empty()) {
                    context_node.insert(CONTEXT_PRECISION.into(), precision.into());
                }
                if let Some(path) = context.path.as_deref().filter(|p| !p.trim().is_empty()) {
                    context_node.insert(CONTEXT_PATH.into(), path.into());
                }
                Value::Object(context_node)
            })
            .collect();
        node.insert(COMPLETION_CONTEXTS.into(), Value::Array(contexts));
    }

    Value::Object(node)
}

/// Writes `store` and the parameters of one field.
///
/// `store` does not apply to object and nested fields.
fn write_field(
    parameters: &MappingParameters,
    node: &mut Map<String, Value>,
) -> Result<(), PropertyWriteError> {
    if parameters.is_store() && !parameters.field_type().is_nested_or_object() {
        node.insert(FIELD_PARAM_STORE.into(), true.into());
    }
    parameters.write_type_and_parameters(node)
}

fn write_dynamic(node: &mut Map<String, Value>, field: &FieldAnnotation, dynamic: Option<Dynamic>) {
    if !field.field_type.is_nested_or_object() {
        return;
    }
    if let Some(dynamic) = dynamic.and_then(|d| d.mapped_name()) {
        node.insert(TYPE_DYNAMIC.into(), dynamic.into());
    }
}

fn single_field_mapping(
    field: &FieldAnnotation,
    dynamic: Option<Dynamic>,
) -> Result<Map<String, Value>, FieldError> {
    let parameters = MappingParameters::from_field(field)?;
    let mut node = Map::new();
    write_field(&parameters, &mut node)?;
    write_dynamic(&mut node, field, dynamic);
    Ok(node)
}

/// Inner fields are written without a dynamic directive, even below nested objects.
fn multi_field_mapping(
    multi_field: &MultiField,
    dynamic: Option<Dynamic>,
) -> Result<Value, FieldError> {
    let mut node = Map::new();
    write_dynamic(&mut node, &multi_field.main_field, dynamic);
    write_field(
        &MappingParameters::from_field(&multi_field.main_field)?,
        &mut node,
    )?;

    let mut inner_fields = Map::new();
    for inner in &multi_field.other_fields {
        let mut inner_node = Map::new();
        write_field(&MappingParameters::from_inner_field(inner)?, &mut inner_node)?;
        inner_fields.insert(inner.suffix.clone(), Value::Object(inner_node));
    }
    node.insert(FIELD_PARAM_FIELDS.into(), Value::Object(inner_fields));

    Ok(Value::Object(node))
}
