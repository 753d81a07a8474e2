use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::annotation::Annotations;

/// The `type` facet: a single type expression, a list of supertypes, or an
/// inline declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeRef {
    Name(String),
    Names(Vec<String>),
    Inline(Box<TypeDeclaration>),
}

impl TypeRef {
    /// Named supertypes. Inline declarations have none.
    pub fn names(&self) -> Vec<&str> {
        match self {
            TypeRef::Name(name) => vec![name.as_str()],
            TypeRef::Names(names) => names.iter().map(String::as_str).collect(),
            TypeRef::Inline(_) => Vec::new(),
        }
    }

    /// The single named type, when exactly one is declared.
    pub fn single(&self) -> Option<&str> {
        match self.names().as_slice() {
            [one] => Some(*one),
            _ => None,
        }
    }
}

/// `items` of an array type: a type name or an inline declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemsRef {
    Name(String),
    Inline(Box<TypeDeclaration>),
}

/// A RAML type declaration (named type or property).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TypeDeclaration {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(rename = "displayName", skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_ref: Option<TypeRef>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, TypeDeclaration>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<ItemsRef>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub discriminator: Option<String>,

    #[serde(rename = "discriminatorValue", skip_serializing_if = "Option::is_none")]
    pub discriminator_value: Option<serde_json::Value>,

    #[serde(rename = "enum", default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<serde_json::Value>,

    #[serde(rename = "default", skip_serializing_if = "Option::is_none")]
    pub default_value: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub annotations: Annotations,
}

impl TypeDeclaration {
    /// Named supertypes of this declaration.
    pub fn supertypes(&self) -> Vec<&str> {
        self.type_ref.as_ref().map(TypeRef::names).unwrap_or_default()
    }
}
