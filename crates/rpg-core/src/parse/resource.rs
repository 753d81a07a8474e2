use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::annotation::Annotations;
use super::parameter::Parameter;
use super::security::SecuredBy;

/// A resource in the parsed document. `relativeUri` may span several path
/// segments (`/bounce/url`).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Resource {
    #[serde(rename = "relativeUri")]
    pub relative_uri: String,

    #[serde(rename = "displayName", skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(
        rename = "uriParameters",
        default,
        skip_serializing_if = "IndexMap::is_empty"
    )]
    pub uri_parameters: IndexMap<String, Parameter>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub methods: Vec<Method>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<Resource>,

    #[serde(rename = "securedBy", default, skip_serializing_if = "Vec::is_empty")]
    pub secured_by: Vec<SecuredBy>,
}

/// An HTTP method on a resource.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Method {
    pub method: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(rename = "displayName", skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    #[serde(rename = "queryParameters", skip_serializing_if = "Option::is_none")]
    pub query_parameters: Option<IndexMap<String, Parameter>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<IndexMap<String, Parameter>>,

    #[serde(rename = "securedBy", default, skip_serializing_if = "Vec::is_empty")]
    pub secured_by: Vec<SecuredBy>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub annotations: Annotations,
}
