use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// RAML security scheme type for OAuth 2.0.
pub const OAUTH2_TYPE: &str = "OAuth 2.0";

/// Security scheme settings. Only the OAuth 2.0 settings are modelled.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SecuritySettings {
    #[serde(rename = "accessTokenUri", skip_serializing_if = "Option::is_none")]
    pub access_token_uri: Option<String>,

    #[serde(rename = "authorizationUri", skip_serializing_if = "Option::is_none")]
    pub authorization_uri: Option<String>,

    #[serde(
        rename = "authorizationGrants",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub authorization_grants: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scopes: Vec<String>,
}

/// A security scheme definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityScheme {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(rename = "type")]
    pub scheme_type: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub settings: SecuritySettings,
}

impl SecurityScheme {
    pub fn is_oauth2(&self) -> bool {
        self.scheme_type == OAUTH2_TYPE
    }
}

/// One entry of `securedBy`: a scheme name, a scheme with parameters, or
/// `null` (anonymous access allowed).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SecuredBy {
    Name(String),
    Parameterized(IndexMap<String, serde_json::Value>),
    Anonymous,
}

impl SecuredBy {
    pub fn scheme_name(&self) -> Option<&str> {
        match self {
            SecuredBy::Name(name) => Some(name),
            SecuredBy::Parameterized(map) => map.keys().next().map(String::as_str),
            SecuredBy::Anonymous => None,
        }
    }
}
