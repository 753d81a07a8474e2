use std::fmt;

use super::models::{IrModel, TypeRegistry};
use super::resources::{IrEndpoint, IrResource, IrUriParameter};
use super::security::IrSecurityScheme;

/// A fully resolved, generator-ready intermediate representation of a RAML API.
#[derive(Debug, Clone)]
pub struct IrSpec {
    pub info: IrInfo,
    pub base_uri: Option<String>,
    pub base_uri_parameters: Vec<IrUriParameter>,
    /// Resource tree; the root node is the request builder itself.
    pub root: IrResource,
    /// Every method of every resource, in document order.
    pub endpoints: Vec<IrEndpoint>,
    pub models: Vec<IrModel>,
    pub registry: TypeRegistry,
    pub security_schemes: Vec<IrSecurityScheme>,
}

impl IrSpec {
    /// Security schemes the generated client can sign requests for.
    pub fn oauth2_schemes(&self) -> impl Iterator<Item = &IrSecurityScheme> {
        self.security_schemes.iter().filter(|s| s.is_oauth2())
    }

    pub fn has_oauth2(&self) -> bool {
        self.oauth2_schemes().next().is_some()
    }
}

/// API metadata.
#[derive(Debug, Clone)]
pub struct IrInfo {
    pub title: String,
    pub name: NormalizedName,
    pub description: Option<String>,
    pub version: Option<String>,
}

/// A name with multiple casing variants pre-computed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedName {
    pub original: String,
    pub pascal_case: String,
    pub camel_case: String,
    pub param_case: String,
}

impl fmt::Display for NormalizedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.original)
    }
}
