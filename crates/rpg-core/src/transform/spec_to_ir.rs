use std::collections::HashSet;

use crate::error::TransformError;
use crate::ir::*;
use crate::parse::api::Api;
use crate::parse::security::SecurityScheme;

use super::name_normalizer::normalize_name;
use super::resource_tree::{TreeBuilder, collect_endpoints, uri_parameters};
use super::type_registry::build_models;

/// Transform a parsed RAML document into the fully resolved IR.
pub fn transform(api: &Api) -> Result<IrSpec, TransformError> {
    // Phase 1: Security schemes
    let security_schemes: Vec<IrSecurityScheme> = api
        .security_schemes
        .iter()
        .map(|(name, scheme)| resolve_scheme(name, scheme))
        .collect();
    let oauth2: HashSet<String> = security_schemes
        .iter()
        .filter(|s| s.is_oauth2())
        .map(|s| s.name.original.clone())
        .collect();

    // Phase 2: Resource tree and the flattened endpoint list
    let root = TreeBuilder::new(&oauth2, &api.secured_by).build(&api.resources)?;
    let endpoints = collect_endpoints(&root);

    // Phase 3: Models and the type registry
    let (models, registry) = build_models(&api.types);

    // Phase 4: API info and base URI
    let info = IrInfo {
        title: api.title.clone(),
        name: normalize_name(&api.title),
        description: api.description.clone(),
        version: api.version.clone(),
    };

    let mut base_uri_parameters = api
        .base_uri
        .as_deref()
        .map(|uri| uri_parameters(uri, &api.base_uri_parameters))
        .unwrap_or_default();
    for param in &mut base_uri_parameters {
        if param.name == "version" && param.default.is_none() {
            param.default = api.version.clone().map(serde_json::Value::String);
        }
    }

    log::debug!(
        "transformed {}: {} endpoints, {} models, {} security schemes",
        info.title,
        endpoints.len(),
        models.len(),
        security_schemes.len()
    );

    Ok(IrSpec {
        info,
        base_uri: api.base_uri.clone(),
        base_uri_parameters,
        root,
        endpoints,
        models,
        registry,
        security_schemes,
    })
}

fn resolve_scheme(name: &str, scheme: &SecurityScheme) -> IrSecurityScheme {
    let kind = if scheme.is_oauth2() {
        SecuritySchemeKind::OAuth2
    } else {
        log::debug!("security scheme {name} ({}) is not signed by the client", scheme.scheme_type);
        SecuritySchemeKind::Other(scheme.scheme_type.clone())
    };
    IrSecurityScheme {
        name: normalize_name(name),
        kind,
        description: scheme.description.clone(),
        access_token_uri: scheme.settings.access_token_uri.clone(),
        authorization_uri: scheme.settings.authorization_uri.clone(),
        grants: scheme.settings.authorization_grants.clone(),
        scopes: scheme.settings.scopes.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    #[test]
    fn test_base_uri_version_default() {
        let api = parse::from_yaml(
            r#"
title: Versioned
version: v2
baseUri: https://{host}/{version}
baseUriParameters:
  host: { default: api.example.com }
"#,
        )
        .unwrap();
        let ir = transform(&api).unwrap();
        let defaults: Vec<(&str, Option<&serde_json::Value>)> = ir
            .base_uri_parameters
            .iter()
            .map(|p| (p.name.as_str(), p.default.as_ref()))
            .collect();
        assert_eq!(
            defaults,
            vec![
                ("host", Some(&serde_json::json!("api.example.com"))),
                ("version", Some(&serde_json::json!("v2"))),
            ]
        );
        assert_eq!(ir.info.name.pascal_case, "Versioned");
    }

    #[test]
    fn test_oauth2_schemes() {
        let api = parse::from_yaml(
            r#"
title: Secured
securitySchemes:
  - oauth_2_0:
      type: OAuth 2.0
      settings:
        accessTokenUri: https://auth.example.com/token
        authorizationUri: https://auth.example.com/authorize
        authorizationGrants: [client_credentials]
  - basic:
      type: Basic Authentication
"#,
        )
        .unwrap();
        let ir = transform(&api).unwrap();
        assert_eq!(ir.security_schemes.len(), 2);
        let oauth: Vec<&str> = ir.oauth2_schemes().map(|s| s.name.original.as_str()).collect();
        assert_eq!(oauth, vec!["oauth_2_0"]);
        assert!(ir.has_oauth2());
    }
}
