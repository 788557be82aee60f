//! Index template requests and template data.
//!
//! Three request kinds exist:
//! - [`PutTemplateRequest`]: legacy `_template`
//! - [`PutIndexTemplateRequest`]: composable `_index_template`
//! - [`PutComponentTemplateRequest`]: `_component_template`

// Attribute and variant names mirror the Elasticsearch parameters they stand for
#![allow(missing_docs)]

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{MappingResult, MisuseError};

use super::alias::{AliasActions, AliasData};
use super::settings::Settings;

fn require_name(name: &str) -> Result<(), MisuseError> {
    if name.trim().is_empty() {
        return Err(MisuseError::InvalidTemplate {
            message: "template name must not be empty".to_string(),
        });
    }
    Ok(())
}

fn require_patterns(name: &str, patterns: &[String]) -> Result<(), MisuseError> {
    if patterns.iter().all(|p| p.trim().is_empty()) {
        return Err(MisuseError::InvalidTemplate {
            message: format!("template {name} needs at least one index pattern"),
        });
    }
    Ok(())
}

/// The settings, mappings and aliases applied by a template.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateContent {
    pub settings: Option<Settings>,
    pub mapping: Option<Value>,
    pub aliases: AliasActions,
}

impl TemplateContent {
    fn write_to(&self, node: &mut Map<String, Value>) {
        if let Some(settings) = self.settings.as_ref().filter(|s| !s.is_empty()) {
            node.insert("settings".into(), settings.clone().into_value());
        }
        if let Some(mapping) = &self.mapping {
            node.insert("mappings".into(), mapping.clone());
        }
        let aliases = self.aliases.template_aliases();
        if !aliases.is_empty() {
            node.insert("aliases".into(), Value::Object(aliases));
        }
    }

    fn to_value(&self) -> Value {
        let mut node = Map::new();
        self.write_to(&mut node);
        Value::Object(node)
    }
}

/// A legacy index template.
#[derive(Debug, Clone, PartialEq)]
pub struct PutTemplateRequest {
    name: String,
    index_patterns: Vec<String>,
    content: TemplateContent,
    order: Option<i64>,
    version: Option<i64>,
}

impl PutTemplateRequest {
    pub fn new<I, S>(name: impl Into<String>, index_patterns: I) -> Result<Self, MisuseError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.into();
        let index_patterns: Vec<String> = index_patterns.into_iter().map(Into::into).collect();
        require_name(&name)?;
        require_patterns(&name, &index_patterns)?;
        Ok(Self {
            name,
            index_patterns,
            content: TemplateContent::default(),
            order: None,
            version: None,
        })
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.content.settings = Some(settings);
        self
    }

    pub fn with_mapping(mut self, mapping: Value) -> Self {
        self.content.mapping = Some(mapping);
        self
    }

    pub fn with_aliases(mut self, aliases: AliasActions) -> Self {
        self.content.aliases = aliases;
        self
    }

    pub fn with_order(mut self, order: i64) -> Self {
        self.order = Some(order);
        self
    }

    pub fn with_version(mut self, version: i64) -> Self {
        self.version = Some(version);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Body of the `PUT _template/<name>` request.
    pub fn to_request_body(&self) -> Value {
        let mut body = Map::new();
        body.insert("index_patterns".into(), self.index_patterns.clone().into());
        if let Some(order) = self.order {
            body.insert("order".into(), order.into());
        }
        if let Some(version) = self.version {
            body.insert("version".into(), version.into());
        }
        self.content.write_to(&mut body);
        Value::Object(body)
    }
}

/// A composable index template.
#[derive(Debug, Clone, PartialEq)]
pub struct PutIndexTemplateRequest {
    name: String,
    index_patterns: Vec<String>,
    content: TemplateContent,
    composed_of: Vec<String>,
    priority: Option<i64>,
    version: Option<i64>,
    meta: Option<Map<String, Value>>,
}

impl PutIndexTemplateRequest {
    pub fn new<I, S>(name: impl Into<String>, index_patterns: I) -> Result<Self, MisuseError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.into();
        let index_patterns: Vec<String> = index_patterns.into_iter().map(Into::into).collect();
        require_name(&name)?;
        require_patterns(&name, &index_patterns)?;
        Ok(Self {
            name,
            index_patterns,
            content: TemplateContent::default(),
            composed_of: Vec::new(),
            priority: None,
            version: None,
            meta: None,
        })
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.content.settings = Some(settings);
        self
    }

    pub fn with_mapping(mut self, mapping: Value) -> Self {
        self.content.mapping = Some(mapping);
        self
    }

    pub fn with_aliases(mut self, aliases: AliasActions) -> Self {
        self.content.aliases = aliases;
        self
    }

    /// Component templates merged in order before this template's own content.
    pub fn composed_of<I, S>(mut self, components: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.composed_of = components.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_priority(mut self, priority: i64) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_version(mut self, version: i64) -> Self {
        self.version = Some(version);
        self
    }

    pub fn with_meta(mut self, meta: Map<String, Value>) -> Self {
        self.meta = Some(meta);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Body of the `PUT _index_template/<name>` request.
    pub fn to_request_body(&self) -> Value {
        let mut body = Map::new();
        body.insert("index_patterns".into(), self.index_patterns.clone().into());
        let template = self.content.to_value();
        if template.as_object().is_some_and(|t| !t.is_empty()) {
            body.insert("template".into(), template);
        }
        if !self.composed_of.is_empty() {
            body.insert("composed_of".into(), self.composed_of.clone().into());
        }
        if let Some(priority) = self.priority {
            body.insert("priority".into(), priority.into());
        }
        if let Some(version) = self.version {
            body.insert("version".into(), version.into());
        }
        if let Some(meta) = &self.meta {
            body.insert("_meta".into(), Value::Object(meta.clone()));
        }
        Value::Object(body)
    }
}

/// A component template, used as a building block of composable templates.
#[derive(Debug, Clone, PartialEq)]
pub struct PutComponentTemplateRequest {
    name: String,
    content: TemplateContent,
    version: Option<i64>,
    meta: Option<Map<String, Value>>,
}

impl PutComponentTemplateRequest {
    pub fn new(name: impl Into<String>) -> Result<Self, MisuseError> {
        let name = name.into();
        require_name(&name)?;
        Ok(Self {
            name,
            content: TemplateContent::default(),
            version: None,
            meta: None,
        })
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.content.settings = Some(settings);
        self
    }

    pub fn with_mapping(mut self, mapping: Value) -> Self {
        self.content.mapping = Some(mapping);
        self
    }

    pub fn with_aliases(mut self, aliases: AliasActions) -> Self {
        self.content.aliases = aliases;
        self
    }

    pub fn with_version(mut self, version: i64) -> Self {
        self.version = Some(version);
        self
    }

    pub fn with_meta(mut self, meta: Map<String, Value>) -> Self {
        self.meta = Some(meta);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Body of the `PUT _component_template/<name>` request.
    pub fn to_request_body(&self) -> Value {
        let mut body = Map::new();
        body.insert("template".into(), self.content.to_value());
        if let Some(version) = self.version {
            body.insert("version".into(), version.into());
        }
        if let Some(meta) = &self.meta {
            body.insert("_meta".into(), Value::Object(meta.clone()));
        }
        Value::Object(body)
    }
}

/// A legacy template as returned by Elasticsearch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateData {
    pub index_patterns: Vec<String>,
    pub settings: Settings,
    pub mapping: Option<Value>,
    pub aliases: Vec<AliasData>,
    pub order: Option<i64>,
    pub version: Option<i64>,
}

#[derive(Deserialize)]
struct RawTemplate {
    #[serde(default)]
    index_patterns: Vec<String>,
    #[serde(default)]
    settings: Option<Value>,
    #[serde(default)]
    mappings: Option<Value>,
    #[serde(default)]
    aliases: Map<String, Value>,
    #[serde(default)]
    order: Option<i64>,
    #[serde(default)]
    version: Option<i64>,
}

impl TemplateData {
    /// Parses a get-template response (`{name: {index_patterns, settings, ...}}`)
    /// into the templates it contains.
    pub fn parse_response(response: &Value) -> MappingResult<BTreeMap<String, TemplateData>> {
        let templates: BTreeMap<String, RawTemplate> = serde_json::from_value(response.clone())?;
        templates
            .into_iter()
            .map(|(name, raw)| {
                let data = TemplateData {
                    index_patterns: raw.index_patterns,
                    settings: raw.settings.map(Settings::from_value).unwrap_or_default(),
                    mapping: raw.mappings.filter(|m| m.as_object().is_some_and(|o| !o.is_empty())),
                    aliases: AliasData::from_aliases(&raw.aliases)?,
                    order: raw.order,
                    version: raw.version,
                };
                Ok((name, data))
            })
            .collect()
    }
}
