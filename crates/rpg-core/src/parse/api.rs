use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::named::NamedMap;
use super::parameter::Parameter;
use super::resource::Resource;
use super::security::{SecuredBy, SecurityScheme};
use super::types::TypeDeclaration;

/// Root of the parsed RAML document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Api {
    pub title: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(rename = "baseUri", skip_serializing_if = "Option::is_none")]
    pub base_uri: Option<String>,

    #[serde(
        rename = "baseUriParameters",
        default,
        skip_serializing_if = "IndexMap::is_empty"
    )]
    pub base_uri_parameters: IndexMap<String, Parameter>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<Resource>,

    #[serde(default)]
    pub types: NamedMap<TypeDeclaration>,

    #[serde(rename = "securitySchemes", default)]
    pub security_schemes: NamedMap<SecurityScheme>,

    #[serde(rename = "securedBy", default, skip_serializing_if = "Vec::is_empty")]
    pub secured_by: Vec<SecuredBy>,
}
