use std::collections::HashMap;

use minijinja::{Environment, context};
use rpg_core::GeneratorError;
use rpg_core::ir::{HttpMethod, IrEndpoint, IrSpec};
use serde::Serialize;
use serde_json::Value;

use super::{EmitOptions, endpoint_call, endpoint_call_with, render};
use crate::type_mapper::{php_list, php_string};

/// Query passed to every `get` in the merge test, before the options query.
const QUERY_ARGS: &str = "['test' => 'test', 'abc' => 123, 'key' => [1, 2, 3]], ['query' => ['xyz' => '123']]";

#[derive(Debug, Serialize)]
struct TestCase {
    label: String,
    call: String,
    verb: String,
    path: String,
    schemes: String,
}

#[derive(Debug, Serialize)]
struct QueryCase {
    label: String,
    call: String,
}

#[derive(Debug, Serialize)]
struct HeaderCase {
    label: String,
    call: String,
    header: String,
    value: String,
}

#[derive(Debug, Serialize)]
struct DefaultsCase {
    label: String,
    call: String,
    path: String,
}

/// Emit `tests/RequestBuilderTest.php`.
///
/// Every endpoint gets a data set with URI parameters filled with their own
/// names, so the expected path is the template with its braces removed.
/// `GET` endpoints also check query merging and ordering, methods with
/// default headers check the override rules, and endpoints whose URI
/// parameters all declare simple defaults check the defaulted path.
pub fn emit_request_builder_test(
    env: &Environment<'_>,
    ir: &IrSpec,
    options: &EmitOptions,
) -> Result<String, GeneratorError> {
    let labels = labels(&ir.endpoints);

    let cases: Vec<TestCase> = ir
        .endpoints
        .iter()
        .zip(&labels)
        .map(|(endpoint, label)| TestCase {
            label: php_string(label),
            call: endpoint_call(endpoint, php_string),
            verb: php_string(endpoint.method.verb.as_str()),
            path: php_string(&endpoint.path.replace(['{', '}'], "")),
            schemes: php_list(endpoint.method.security_schemes.iter().map(String::as_str)),
        })
        .collect();

    let query_cases: Vec<QueryCase> = ir
        .endpoints
        .iter()
        .zip(&labels)
        .filter(|(endpoint, _)| endpoint.method.verb == HttpMethod::Get)
        .map(|(endpoint, label)| QueryCase {
            label: php_string(label),
            call: endpoint_call_with(endpoint, php_string, QUERY_ARGS),
        })
        .collect();

    let header_cases: Vec<HeaderCase> = ir
        .endpoints
        .iter()
        .zip(&labels)
        .flat_map(|(endpoint, label)| {
            endpoint.method.default_headers.iter().filter_map(move |h| {
                Some(HeaderCase {
                    label: php_string(&format!("{label} {}", h.name)),
                    call: endpoint_call_with(endpoint, php_string, "null, $options"),
                    header: php_string(&h.name),
                    value: php_string(&plain_value(&h.value)?),
                })
            })
        })
        .collect();

    let defaults_cases: Vec<DefaultsCase> = ir
        .endpoints
        .iter()
        .zip(&labels)
        .filter_map(|(endpoint, label)| {
            let path = defaulted_path(endpoint)?;
            Some(DefaultsCase {
                label: php_string(label),
                call: endpoint_call(endpoint, |_| "null".to_string()),
                path: php_string(&path),
            })
        })
        .collect();

    render(
        env,
        "request_builder_test.php.j2",
        context! {
            namespace => &options.namespace,
            strict_types => options.strict_types,
            cases => cases,
            query_cases => query_cases,
            header_cases => header_cases,
            defaults_cases => defaults_cases,
        },
    )
}

/// `VERB path` per endpoint, suffixed with ` #n` when repeated.
fn labels(endpoints: &[IrEndpoint]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    endpoints
        .iter()
        .map(|endpoint| {
            let label = format!("{} {}", endpoint.method.verb, endpoint.path);
            let count = seen.entry(label.clone()).or_insert(0);
            *count += 1;
            if *count > 1 {
                format!("{label} #{count}")
            } else {
                label
            }
        })
        .collect()
}

/// Header or path value as sent on the wire, for strings and numbers.
fn plain_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Path with every placeholder replaced by its default. `None` unless the
/// endpoint has parameters and every default survives URL encoding as-is.
fn defaulted_path(endpoint: &IrEndpoint) -> Option<String> {
    if endpoint.uri_parameters.is_empty() {
        return None;
    }
    let mut path = endpoint.path.clone();
    for param in &endpoint.uri_parameters {
        let value = plain_value(param.default.as_ref()?)?;
        if value.is_empty()
            || !value
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        {
            return None;
        }
        path = path.replace(&format!("{{{}}}", param.name), &value);
    }
    Some(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_value() {
        assert_eq!(plain_value(&serde_json::json!("Hello")).as_deref(), Some("Hello"));
        assert_eq!(plain_value(&serde_json::json!(20)).as_deref(), Some("20"));
        assert_eq!(plain_value(&serde_json::json!(true)), None);
        assert_eq!(plain_value(&serde_json::json!(null)), None);
    }
}
