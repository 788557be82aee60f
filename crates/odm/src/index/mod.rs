//! Index-level value objects: settings, aliases, templates and index definitions.

pub mod alias;
pub mod definition;
pub mod settings;
pub mod template;

pub use alias::{AliasAction, AliasActionParameters, AliasActions, AliasData};
pub use definition::IndexDefinition;
pub use settings::Settings;
pub use template::{
    PutComponentTemplateRequest, PutIndexTemplateRequest, PutTemplateRequest, TemplateContent,
    TemplateData,
};
