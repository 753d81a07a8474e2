use std::collections::HashSet;

use minijinja::{Environment, context};
use rpg_core::GeneratorError;
use rpg_core::ir::{IrMethod, IrResource, IrSegment, IrSpec};
use rpg_core::transform::name_normalizer::{
    normalize_name, php_method_name, php_variable_name,
};
use serde::Serialize;

use super::{EmitOptions, render};
use crate::type_mapper::{php_list, php_literal, php_map, php_string};

/// Methods of PSR-7 requests that query setters must not shadow.
const PSR7_METHODS: &[&str] = &[
    "withAddedHeader",
    "withBody",
    "withHeader",
    "withMethod",
    "withProtocolVersion",
    "withRequestTarget",
    "withUri",
    "withoutHeader",
];

#[derive(Debug, Serialize)]
struct NodeContext {
    id: String,
    root: bool,
    accessors: Vec<AccessorContext>,
    methods: Vec<MethodContext>,
    requests: Vec<RequestContext>,
}

#[derive(Debug, Serialize)]
struct AccessorContext {
    method: String,
    target: String,
    uri: String,
    parameterized: bool,
    signature: String,
    interpolate: String,
    defaults: String,
}

#[derive(Debug, Serialize)]
struct MethodContext {
    name: String,
    verb: String,
    query: bool,
    description: Option<String>,
    return_type: String,
    request_class: Option<String>,
    default_headers: Vec<HeaderContext>,
    security_schemes: Option<String>,
}

#[derive(Debug, Serialize)]
struct HeaderContext {
    lower: String,
    upper: String,
    value: String,
}

#[derive(Debug, Serialize)]
struct RequestContext {
    class: String,
    params: Vec<QuerySetterContext>,
}

#[derive(Debug, Serialize)]
struct QuerySetterContext {
    name: String,
    key: String,
    variable: String,
    setter: String,
}

/// Emit `classes.php`: the resource base class, the request class, the
/// request builder and one class per resource node.
pub fn emit_classes(
    env: &Environment<'_>,
    ir: &IrSpec,
    options: &EmitOptions,
) -> Result<String, GeneratorError> {
    let nodes: Vec<NodeContext> = ir
        .root
        .walk()
        .into_iter()
        .map(|node| build_node(node, node.id == ir.root.id))
        .collect();

    let base_uri_defaults = php_map(ir.base_uri_parameters.iter().filter_map(|p| {
        p.default.as_ref().map(|d| (p.name.as_str(), php_literal(d)))
    }));

    render(
        env,
        "classes.php.j2",
        context! {
            namespace => &options.namespace,
            strict_types => options.strict_types,
            base_uri => php_string(ir.base_uri.as_deref().unwrap_or("")),
            base_uri_defaults => base_uri_defaults,
            nodes => nodes,
        },
    )
}

fn build_node(node: &IrResource, root: bool) -> NodeContext {
    let mut accessors = Vec::new();
    for child in &node.children {
        if let Some(fixed) = &child.fixed {
            accessors.push(fixed_accessor(child, fixed));
        }
        if let Some(param) = &child.parameterized {
            accessors.push(param_accessor(child, param));
        }
    }

    let mut methods = Vec::new();
    let mut requests = Vec::new();
    for method in &node.methods {
        let request = query_request(&node.id, method);
        methods.push(MethodContext {
            name: method.verb.as_lower().to_string(),
            verb: php_string(method.verb.as_str()),
            query: method.verb.is_query(),
            description: method.description.clone(),
            return_type: request
                .as_ref()
                .map_or_else(|| "RequestInterface".to_string(), |r| r.class.clone()),
            request_class: request.as_ref().map(|r| r.class.clone()),
            default_headers: method
                .default_headers
                .iter()
                .map(|h| HeaderContext {
                    lower: php_string(&h.name.to_ascii_lowercase()),
                    upper: php_string(&h.name.to_ascii_uppercase()),
                    value: php_literal(&h.value),
                })
                .collect(),
            security_schemes: (!method.security_schemes.is_empty())
                .then(|| php_list(method.security_schemes.iter().map(String::as_str))),
        });
        requests.extend(request);
    }

    NodeContext {
        id: node.id.clone(),
        root,
        accessors,
        methods,
        requests,
    }
}

fn fixed_accessor(child: &IrResource, segment: &IrSegment) -> AccessorContext {
    AccessorContext {
        method: php_method_name(&child.name.camel_case),
        target: child.id.clone(),
        uri: php_string(&segment.relative_uri),
        parameterized: false,
        signature: String::new(),
        interpolate: "[]".to_string(),
        defaults: "[]".to_string(),
    }
}

fn param_accessor(child: &IrResource, segment: &IrSegment) -> AccessorContext {
    let params = &segment.uri_parameters;
    AccessorContext {
        method: format!("with{}", child.name.pascal_case),
        target: child.id.clone(),
        uri: php_string(&segment.relative_uri),
        parameterized: true,
        signature: params
            .iter()
            .map(|p| format!("${} = null", p.variable))
            .collect::<Vec<_>>()
            .join(", "),
        interpolate: php_map(
            params
                .iter()
                .map(|p| (p.name.as_str(), format!("${}", p.variable))),
        ),
        defaults: php_map(params.iter().filter_map(|p| {
            p.default.as_ref().map(|d| (p.name.as_str(), php_literal(d)))
        })),
    }
}

/// Request subclass with query setters, for methods declaring query parameters.
fn query_request(node_id: &str, method: &IrMethod) -> Option<RequestContext> {
    let declared = method.query_parameters.as_ref()?;
    if declared.is_empty() {
        return None;
    }

    let mut seen = HashSet::new();
    let params = declared
        .iter()
        .filter_map(|param| {
            let mut setter = format!("with{}", param.name.pascal_case);
            if PSR7_METHODS.contains(&setter.as_str()) {
                setter.push_str("Param");
            }
            if !seen.insert(setter.clone()) {
                log::warn!(
                    "query parameter {} of {node_id} maps to existing setter {setter}",
                    param.original_name
                );
                return None;
            }
            Some(QuerySetterContext {
                name: param.original_name.clone(),
                key: php_string(&param.original_name),
                variable: php_variable_name(&param.name.camel_case),
                setter,
            })
        })
        .collect();

    Some(RequestContext {
        class: format!(
            "{node_id}{}Request",
            normalize_name(method.verb.as_lower()).pascal_case
        ),
        params,
    })
}
