use minijinja::{Environment, context};
use rpg_core::GeneratorError;
use rpg_core::ir::{IrSecurityScheme, IrSpec};
use serde::Serialize;

use super::{EmitOptions, render};
use crate::type_mapper::{php_list, php_string};

#[derive(Debug, Serialize)]
struct SchemeContext {
    name: String,
    access_token_uri: String,
    authorization_uri: String,
    scopes: Option<String>,
}

impl SchemeContext {
    fn new(scheme: &IrSecurityScheme) -> Self {
        if scheme.access_token_uri.is_none() {
            log::warn!(
                "OAuth 2.0 scheme {} declares no accessTokenUri",
                scheme.name.original
            );
        }
        if !scheme.allows_client_credentials() {
            log::warn!(
                "OAuth 2.0 scheme {} does not offer client_credentials (grants: {})",
                scheme.name.original,
                scheme.grants.join(", ")
            );
        }
        Self {
            name: php_string(&scheme.name.original),
            access_token_uri: php_string(scheme.access_token_uri.as_deref().unwrap_or("")),
            authorization_uri: php_string(scheme.authorization_uri.as_deref().unwrap_or("")),
            scopes: (!scheme.scopes.is_empty())
                .then(|| php_list(scheme.scopes.iter().map(String::as_str))),
        }
    }
}

/// Emit `src/Client.php`: a Guzzle client that registers one OAuth 2.0
/// middleware per declared scheme.
pub fn emit_client(
    env: &Environment<'_>,
    ir: &IrSpec,
    options: &EmitOptions,
) -> Result<String, GeneratorError> {
    let schemes: Vec<SchemeContext> = ir.oauth2_schemes().map(SchemeContext::new).collect();
    render(
        env,
        "client.php.j2",
        context! {
            namespace => &options.namespace,
            strict_types => options.strict_types,
            title => &ir.info.title,
            schemes => schemes,
        },
    )
}

/// Emit `src/OAuth2Handler.php`.
pub fn emit_oauth2_handler(
    env: &Environment<'_>,
    options: &EmitOptions,
) -> Result<String, GeneratorError> {
    render(
        env,
        "oauth2_handler.php.j2",
        context! {
            namespace => &options.namespace,
            strict_types => options.strict_types,
        },
    )
}

/// Emit `src/TokenProvider.php`.
pub fn emit_token_provider(
    env: &Environment<'_>,
    options: &EmitOptions,
) -> Result<String, GeneratorError> {
    render(
        env,
        "token_provider.php.j2",
        context! {
            namespace => &options.namespace,
            strict_types => options.strict_types,
        },
    )
}
