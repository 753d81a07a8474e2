use std::fmt;
use std::str::FromStr;

use super::types::NormalizedName;

/// HTTP method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Options,
    Head,
    Trace,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
            HttpMethod::Trace => "TRACE",
        }
    }

    /// Lower-case verb, as used for generated method names.
    pub fn as_lower(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Delete => "delete",
            HttpMethod::Patch => "patch",
            HttpMethod::Options => "options",
            HttpMethod::Head => "head",
            HttpMethod::Trace => "trace",
        }
    }

    /// Query-type verbs carry caller data in the query string instead of the body.
    pub fn is_query(&self) -> bool {
        matches!(self, HttpMethod::Get | HttpMethod::Head)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "get" => Ok(HttpMethod::Get),
            "post" => Ok(HttpMethod::Post),
            "put" => Ok(HttpMethod::Put),
            "delete" => Ok(HttpMethod::Delete),
            "patch" => Ok(HttpMethod::Patch),
            "options" => Ok(HttpMethod::Options),
            "head" => Ok(HttpMethod::Head),
            "trace" => Ok(HttpMethod::Trace),
            other => Err(other.to_string()),
        }
    }
}

/// A URI template parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct IrUriParameter {
    /// Placeholder name as written in the template.
    pub name: String,
    /// PHP variable name (camelCase, without `$`).
    pub variable: String,
    pub default: Option<serde_json::Value>,
}

/// One way of reaching a resource node from its parent.
#[derive(Debug, Clone, PartialEq)]
pub struct IrSegment {
    /// URI segment appended to the parent URI (`/url`, `/{id}`, `.json`).
    pub relative_uri: String,
    /// Placeholders used by this segment, in order of appearance.
    pub uri_parameters: Vec<IrUriParameter>,
}

/// A node of the request-builder tree.
///
/// A node is reachable through a fixed segment, a parameterized segment, or
/// both when the two share an accessor name.
#[derive(Debug, Clone)]
pub struct IrResource {
    /// Generated PHP class name.
    pub id: String,
    /// Accessor base name.
    pub name: NormalizedName,
    pub fixed: Option<IrSegment>,
    pub parameterized: Option<IrSegment>,
    pub methods: Vec<IrMethod>,
    pub children: Vec<IrResource>,
}

impl IrResource {
    /// Children reached through a parameterized accessor.
    pub fn with_params(&self) -> impl Iterator<Item = &IrResource> {
        self.children.iter().filter(|c| c.parameterized.is_some())
    }

    /// Children reached through a zero-argument accessor.
    pub fn no_params(&self) -> impl Iterator<Item = &IrResource> {
        self.children.iter().filter(|c| c.fixed.is_some())
    }

    /// Depth-first walk over this node and all descendants (pre-order).
    pub fn walk(&self) -> Vec<&IrResource> {
        let mut out = vec![self];
        for child in &self.children {
            out.extend(child.walk());
        }
        out
    }

    /// Look up a direct child by accessor name.
    pub fn child(&self, name: &str) -> Option<&IrResource> {
        self.children.iter().find(|c| c.name.camel_case == name)
    }
}

/// A query parameter declared on a method.
#[derive(Debug, Clone, PartialEq)]
pub struct IrQueryParameter {
    pub name: NormalizedName,
    pub original_name: String,
    pub repeat: bool,
}

/// A header with a declared default value.
#[derive(Debug, Clone, PartialEq)]
pub struct IrDefaultHeader {
    pub name: String,
    pub value: serde_json::Value,
}

/// A resolved method on a resource node.
#[derive(Debug, Clone)]
pub struct IrMethod {
    pub verb: HttpMethod,
    pub description: Option<String>,
    /// `None` when the method declares no query parameters at all.
    pub query_parameters: Option<Vec<IrQueryParameter>>,
    pub default_headers: Vec<IrDefaultHeader>,
    /// OAuth 2.0 schemes securing this method (after inheritance).
    pub security_schemes: Vec<String>,
    /// `client.methodName` annotation.
    pub method_name: Option<String>,
    /// `client.displayName` annotation.
    pub display_name: Option<String>,
}

/// One accessor call in the fluent chain leading to a resource.
#[derive(Debug, Clone, PartialEq)]
pub struct IrAccessor {
    pub method: String,
    /// Placeholder names passed as arguments (empty for fixed accessors).
    pub arguments: Vec<String>,
}

/// A method together with the full route that reaches it.
#[derive(Debug, Clone)]
pub struct IrEndpoint {
    /// Class name of the node that defines the method.
    pub resource_id: String,
    /// Full URI template relative to the base URI.
    pub path: String,
    pub uri_parameters: Vec<IrUriParameter>,
    pub chain: Vec<IrAccessor>,
    pub method: IrMethod,
}
