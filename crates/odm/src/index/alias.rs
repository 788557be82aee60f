//! Index alias actions and alias data.

// Attribute and variant names mirror the Elasticsearch parameters they stand for
#![allow(missing_docs)]

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::error::{MappingResult, MisuseError};

/// Parameters shared by all alias actions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AliasActionParameters {
    pub indices: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_hidden: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_write_index: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routing: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_routing: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_routing: Option<String>,
}

impl AliasActionParameters {
    /// Parameters for the given indices and aliases.
    pub fn new<I, A, S, T>(indices: I, aliases: A) -> Self
    where
        I: IntoIterator<Item = S>,
        A: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        Self {
            indices: indices.into_iter().map(Into::into).collect(),
            aliases: aliases.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Parameters naming only indices, as used by `remove_index`.
    pub fn for_indices<I, S>(indices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(indices, Vec::<String>::new())
    }

    pub fn with_filter(mut self, filter: Value) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.is_hidden = Some(hidden);
        self
    }

    pub fn write_index(mut self, write_index: bool) -> Self {
        self.is_write_index = Some(write_index);
        self
    }

    pub fn with_routing(mut self, routing: impl Into<String>) -> Self {
        self.routing = Some(routing.into());
        self
    }

    pub fn with_index_routing(mut self, routing: impl Into<String>) -> Self {
        self.index_routing = Some(routing.into());
        self
    }

    pub fn with_search_routing(mut self, routing: impl Into<String>) -> Self {
        self.search_routing = Some(routing.into());
        self
    }

    /// Alias definition as used in the `aliases` section of index templates.
    fn alias_definition(&self) -> Value {
        let mut definition = Map::new();
        if let Some(filter) = &self.filter {
            definition.insert("filter".into(), filter.clone());
        }
        if let Some(routing) = &self.routing {
            definition.insert("routing".into(), routing.as_str().into());
        }
        if let Some(routing) = &self.index_routing {
            definition.insert("index_routing".into(), routing.as_str().into());
        }
        if let Some(routing) = &self.search_routing {
            definition.insert("search_routing".into(), routing.as_str().into());
        }
        if let Some(hidden) = self.is_hidden {
            definition.insert("is_hidden".into(), hidden.into());
        }
        if let Some(write_index) = self.is_write_index {
            definition.insert("is_write_index".into(), write_index.into());
        }
        Value::Object(definition)
    }
}

/// One action of an `_aliases` request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AliasAction {
    Add(AliasActionParameters),
    Remove(AliasActionParameters),
    RemoveIndex(AliasActionParameters),
}

impl AliasAction {
    /// Adds the aliases to the indices.
    pub fn add(parameters: AliasActionParameters) -> Result<Self, MisuseError> {
        require_indices("add", &parameters)?;
        require_aliases("add", &parameters)?;
        Ok(AliasAction::Add(parameters))
    }

    /// Removes the aliases from the indices.
    pub fn remove(parameters: AliasActionParameters) -> Result<Self, MisuseError> {
        require_indices("remove", &parameters)?;
        require_aliases("remove", &parameters)?;
        Ok(AliasAction::Remove(parameters))
    }

    /// Deletes the indices; only `indices` may be set.
    pub fn remove_index(parameters: AliasActionParameters) -> Result<Self, MisuseError> {
        require_indices("remove_index", &parameters)?;
        if parameters != AliasActionParameters::for_indices(parameters.indices.clone()) {
            return Err(MisuseError::InvalidAliasAction {
                message: "remove_index only takes indices".to_string(),
            });
        }
        Ok(AliasAction::RemoveIndex(parameters))
    }

    pub fn parameters(&self) -> &AliasActionParameters {
        match self {
            AliasAction::Add(p) | AliasAction::Remove(p) | AliasAction::RemoveIndex(p) => p,
        }
    }
}

fn require_indices(action: &str, parameters: &AliasActionParameters) -> Result<(), MisuseError> {
    if parameters.indices.iter().all(|i| i.trim().is_empty()) {
        return Err(MisuseError::InvalidAliasAction {
            message: format!("{action} needs at least one index"),
        });
    }
    Ok(())
}

fn require_aliases(action: &str, parameters: &AliasActionParameters) -> Result<(), MisuseError> {
    if parameters.aliases.iter().all(|a| a.trim().is_empty()) {
        return Err(MisuseError::InvalidAliasAction {
            message: format!("{action} needs at least one alias"),
        });
    }
    Ok(())
}

/// An ordered list of alias actions, executed atomically by Elasticsearch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AliasActions {
    actions: Vec<AliasAction>,
}

impl AliasActions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an action.
    pub fn with_action(mut self, action: AliasAction) -> Self {
        self.actions.push(action);
        self
    }

    pub fn push(&mut self, action: AliasAction) {
        self.actions.push(action);
    }

    pub fn actions(&self) -> &[AliasAction] {
        &self.actions
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Body of an `_aliases` request.
    pub fn to_request_body(&self) -> MappingResult<Value> {
        Ok(json!({ "actions": serde_json::to_value(&self.actions)? }))
    }

    /// The `aliases` section of an index template, built from the `add` actions.
    pub fn template_aliases(&self) -> Map<String, Value> {
        let mut aliases = Map::new();
        for action in &self.actions {
            if let AliasAction::Add(parameters) = action {
                for alias in &parameters.aliases {
                    aliases.insert(alias.clone(), parameters.alias_definition());
                }
            }
        }
        aliases
    }
}

/// An alias as returned by Elasticsearch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AliasData {
    #[serde(default)]
    pub alias: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_routing: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_routing: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_write_index: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_hidden: Option<bool>,
}

#[derive(Deserialize)]
struct IndexAliases {
    #[serde(default)]
    aliases: Map<String, Value>,
}

impl AliasData {
    /// Reads the aliases of an `aliases` object keyed by alias name.
    pub fn from_aliases(aliases: &Map<String, Value>) -> MappingResult<Vec<AliasData>> {
        aliases
            .iter()
            .map(|(name, definition)| {
                let mut data: AliasData = serde_json::from_value(definition.clone())?;
                data.alias = name.clone();
                Ok(data)
            })
            .collect()
    }

    /// Parses a get-alias response (`{index: {aliases: {alias: {...}}}}`) into the
    /// aliases of each index.
    pub fn parse_response(response: &Value) -> MappingResult<BTreeMap<String, Vec<AliasData>>> {
        let indices: BTreeMap<String, IndexAliases> = serde_json::from_value(response.clone())?;
        indices
            .into_iter()
            .map(|(index, entry)| Ok((index, Self::from_aliases(&entry.aliases)?)))
            .collect()
    }
}
