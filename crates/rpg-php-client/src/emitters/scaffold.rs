use minijinja::{Environment, context};
use rpg_core::GeneratorError;
use rpg_core::ir::{IrEndpoint, IrSpec};
use rpg_core::transform::name_normalizer::{normalize_name, php_variable_name};
use serde::Serialize;
use serde_json::json;

use super::{EmitOptions, endpoint_call, render};
use crate::type_mapper::php_literal;

/// Emit `composer.json`.
pub fn emit_composer_json(ir: &IrSpec, options: &EmitOptions) -> Result<String, GeneratorError> {
    let description = options
        .description
        .clone()
        .or_else(|| ir.info.description.clone())
        .unwrap_or_else(|| format!("PHP client for the {}", ir.info.title));

    let psr4 = format!("{}\\", options.namespace);
    let psr4_tests = format!("{}\\Tests\\", options.namespace);

    let composer = json!({
        "name": options.package_name,
        "description": description,
        "type": "library",
        "license": options.license,
        "require": {
            "php": options.php_constraint,
            "cache/filesystem-adapter": "^1.0",
            "guzzlehttp/guzzle": "^7.0",
            "guzzlehttp/psr7": "^2.0",
            "league/flysystem": "^1.0",
            "league/oauth2-client": "^2.6",
            "psr/cache": "^1.0"
        },
        "require-dev": {
            "phpunit/phpunit": "^9.6"
        },
        "autoload": {
            "files": ["classes.php"],
            "psr-4": { psr4: "src/" }
        },
        "autoload-dev": {
            "psr-4": { psr4_tests: "tests/" }
        }
    });

    let mut content = serde_json::to_string_pretty(&composer)
        .map_err(|e| GeneratorError::Other(format!("composer.json: {e}")))?;
    content.push('\n');
    Ok(content)
}

/// Emit `.gitignore`.
pub fn emit_gitignore() -> &'static str {
    "/vendor/\ncomposer.lock\n.phpunit.result.cache\n"
}

#[derive(Debug, Serialize)]
struct EndpointDoc {
    heading: String,
    description: Option<String>,
    uri_parameters: Vec<UriParameterDoc>,
    snippet: String,
}

#[derive(Debug, Serialize)]
struct UriParameterDoc {
    variable: String,
    default: Option<String>,
}

/// Emit `README.md` with installation, authentication and per-method usage.
pub fn emit_readme(
    env: &Environment<'_>,
    ir: &IrSpec,
    options: &EmitOptions,
) -> Result<String, GeneratorError> {
    let endpoints: Vec<EndpointDoc> = ir.endpoints.iter().map(endpoint_doc).collect();
    let schemes: Vec<&str> = ir
        .oauth2_schemes()
        .map(|s| s.name.original.as_str())
        .collect();
    let base_uri_parameters: Vec<&str> = ir
        .base_uri_parameters
        .iter()
        .map(|p| p.name.as_str())
        .collect();

    render(
        env,
        "readme.md.j2",
        context! {
            title => &ir.info.title,
            description => &ir.info.description,
            base_uri => &ir.base_uri,
            base_uri_parameters => base_uri_parameters,
            namespace => &options.namespace,
            package_name => &options.package_name,
            license => &options.license,
            schemes => schemes,
            endpoints => endpoints,
        },
    )
}

fn endpoint_doc(endpoint: &IrEndpoint) -> EndpointDoc {
    let method = &endpoint.method;
    let heading = method
        .display_name
        .clone()
        .or_else(|| method.method_name.clone())
        .unwrap_or_else(|| format!("`{} {}`", method.verb, endpoint.path));

    EndpointDoc {
        heading,
        description: method.description.as_ref().map(|d| d.trim().to_string()),
        uri_parameters: endpoint
            .uri_parameters
            .iter()
            .map(|p| UriParameterDoc {
                variable: p.variable.clone(),
                default: p.default.as_ref().map(php_literal),
            })
            .collect(),
        snippet: endpoint_call(endpoint, |name| {
            format!("${}", php_variable_name(&normalize_name(name).camel_case))
        }),
    }
}
