use serde::{Deserialize, Serialize};

use super::types::TypeRef;

/// A URI, query, or header parameter.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Parameter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(rename = "displayName", skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub param_type: Option<TypeRef>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(rename = "default", skip_serializing_if = "Option::is_none")]
    pub default_value: Option<serde_json::Value>,

    #[serde(default)]
    pub required: bool,

    #[serde(default)]
    pub repeat: bool,

    #[serde(rename = "enum", default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<serde_json::Value>,
}

impl Parameter {
    /// The declared default, ignoring empty and null values.
    pub fn declared_default(&self) -> Option<&serde_json::Value> {
        self.default_value.as_ref().filter(|v| match v {
            serde_json::Value::Null => false,
            serde_json::Value::String(s) => !s.is_empty(),
            _ => true,
        })
    }
}
