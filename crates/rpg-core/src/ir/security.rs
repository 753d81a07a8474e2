use super::types::NormalizedName;

/// Kind of a security scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecuritySchemeKind {
    OAuth2,
    Other(String),
}

/// A declared security scheme.
#[derive(Debug, Clone)]
pub struct IrSecurityScheme {
    pub name: NormalizedName,
    pub kind: SecuritySchemeKind,
    pub description: Option<String>,
    pub access_token_uri: Option<String>,
    pub authorization_uri: Option<String>,
    pub grants: Vec<String>,
    pub scopes: Vec<String>,
}

impl IrSecurityScheme {
    pub fn is_oauth2(&self) -> bool {
        self.kind == SecuritySchemeKind::OAuth2
    }

    /// Whether the generated client can fetch tokens for this scheme. An
    /// empty grant list places no restriction.
    pub fn allows_client_credentials(&self) -> bool {
        self.grants.is_empty() || self.grants.iter().any(|g| g == "client_credentials")
    }
}
