use std::collections::HashSet;

use indexmap::IndexMap;

use crate::error::TransformError;
use crate::ir::{
    HttpMethod, IrAccessor, IrDefaultHeader, IrEndpoint, IrMethod, IrQueryParameter, IrResource,
    IrSegment, IrUriParameter,
};
use crate::parse::annotation::{self, names};
use crate::parse::parameter::Parameter;
use crate::parse::resource::{Method, Resource};
use crate::parse::security::SecuredBy;

use super::name_normalizer::{
    normalize_name, php_class_name, php_method_name, php_variable_name, placeholders,
    segment_name, split_segments,
};

/// Class name of the tree root.
pub const ROOT_CLASS: &str = "RequestBuilder";

/// Class names declared by the runtime support code.
const RESERVED_CLASSES: &[&str] = &[
    "Resource",
    "Request",
    ROOT_CLASS,
    "Client",
    "OAuth2Handler",
    "TokenProvider",
];

/// Builds the request-builder tree from the parsed resource list.
pub struct TreeBuilder<'a> {
    /// Names of declared OAuth 2.0 schemes.
    oauth2: &'a HashSet<String>,
    /// `securedBy` declared at API level.
    api_security: &'a [SecuredBy],
    used_ids: HashSet<String>,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(oauth2: &'a HashSet<String>, api_security: &'a [SecuredBy]) -> Self {
        Self {
            oauth2,
            api_security,
            used_ids: RESERVED_CLASSES.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn build(mut self, resources: &[Resource]) -> Result<IrResource, TransformError> {
        let mut root = IrResource {
            id: ROOT_CLASS.to_string(),
            name: normalize_name(ROOT_CLASS),
            fixed: None,
            parameterized: None,
            methods: Vec::new(),
            children: Vec::new(),
        };
        for resource in resources {
            self.insert(&mut root, "", resource)?;
        }
        Ok(root)
    }

    /// Attach `resource` below `parent`. `key` is the accumulated PascalCase
    /// path of `parent` (empty for the root).
    fn insert(
        &mut self,
        parent: &mut IrResource,
        key: &str,
        resource: &Resource,
    ) -> Result<(), TransformError> {
        // `/` addresses the parent itself.
        let segments: Vec<&str> = split_segments(&resource.relative_uri)
            .into_iter()
            .filter(|s| *s != "/")
            .collect();

        let mut node = parent;
        let mut node_key = key.to_string();
        for segment in &segments {
            let (child, child_key) =
                self.child_for(node, &node_key, segment, &resource.uri_parameters);
            node = child;
            node_key = child_key;
        }

        let security: &[SecuredBy] = if resource.secured_by.is_empty() {
            self.api_security
        } else {
            &resource.secured_by
        };
        for method in &resource.methods {
            let ir_method = self.method(method, security, &resource.relative_uri)?;
            if node.methods.iter().any(|m| m.verb == ir_method.verb) {
                log::warn!(
                    "{} already defines {}; ignoring the one from {}",
                    node.id,
                    ir_method.verb,
                    resource.relative_uri
                );
                continue;
            }
            node.methods.push(ir_method);
        }

        for child in &resource.resources {
            self.insert(node, &node_key, child)?;
        }
        Ok(())
    }

    /// Find the child reached through `segment`, creating it when missing.
    ///
    /// A fixed and a parameterized segment with the same accessor name share
    /// one node.
    fn child_for<'n>(
        &mut self,
        parent: &'n mut IrResource,
        key: &str,
        segment: &str,
        declared: &IndexMap<String, Parameter>,
    ) -> (&'n mut IrResource, String) {
        let name = segment_name(segment);
        let child_key = format!("{key}{}", name.pascal_case);
        let ir_segment = IrSegment {
            relative_uri: segment.to_string(),
            uri_parameters: uri_parameters(segment, declared),
        };
        let parameterized = !ir_segment.uri_parameters.is_empty();

        let index = match parent
            .children
            .iter()
            .position(|c| c.name.camel_case == name.camel_case)
        {
            Some(index) => {
                let child = &mut parent.children[index];
                let slot = if parameterized {
                    &mut child.parameterized
                } else {
                    &mut child.fixed
                };
                match slot {
                    None => {
                        log::debug!("merging {segment} into {}", child.id);
                        *slot = Some(ir_segment);
                    }
                    Some(existing) if existing.relative_uri != segment => {
                        log::warn!(
                            "{segment} conflicts with {} on {}; keeping the first",
                            existing.relative_uri,
                            child.id
                        );
                    }
                    Some(_) => {}
                }
                index
            }
            None => {
                let id = self.class_id(&child_key);
                log::debug!("resource node {id} ({segment})");
                let (fixed, param) = if parameterized {
                    (None, Some(ir_segment))
                } else {
                    (Some(ir_segment), None)
                };
                parent.children.push(IrResource {
                    id,
                    name,
                    fixed,
                    parameterized: param,
                    methods: Vec::new(),
                    children: Vec::new(),
                });
                parent.children.len() - 1
            }
        };
        (&mut parent.children[index], child_key)
    }

    fn class_id(&mut self, key: &str) -> String {
        let base = php_class_name(key);
        let mut id = base.clone();
        let mut suffix = 2;
        while self.used_ids.contains(&id) {
            id = format!("{base}{suffix}");
            suffix += 1;
        }
        self.used_ids.insert(id.clone());
        id
    }

    fn method(
        &self,
        method: &Method,
        inherited: &[SecuredBy],
        uri: &str,
    ) -> Result<IrMethod, TransformError> {
        let verb: HttpMethod =
            method
                .method
                .parse()
                .map_err(|method| TransformError::UnsupportedMethod {
                    method,
                    uri: uri.to_string(),
                })?;

        let query_parameters = method.query_parameters.as_ref().map(|params| {
            params
                .iter()
                .map(|(name, param)| IrQueryParameter {
                    name: normalize_name(name),
                    original_name: name.clone(),
                    repeat: param.repeat,
                })
                .collect()
        });

        let default_headers = method
            .headers
            .iter()
            .flatten()
            .filter_map(|(name, param)| {
                param.declared_default().map(|value| IrDefaultHeader {
                    name: name.clone(),
                    value: value.clone(),
                })
            })
            .collect();

        let secured_by: &[SecuredBy] = if method.secured_by.is_empty() {
            inherited
        } else {
            &method.secured_by
        };
        let security_schemes = secured_by
            .iter()
            .filter_map(SecuredBy::scheme_name)
            .filter(|name| self.oauth2.contains(*name))
            .map(str::to_string)
            .collect();

        let annotated = |name: &str| {
            annotation::enabled(&method.annotations, name)
                .and_then(|a| a.as_str())
                .map(str::to_string)
        };

        Ok(IrMethod {
            verb,
            description: method.description.clone(),
            query_parameters,
            default_headers,
            security_schemes,
            method_name: annotated(names::METHOD_NAME),
            display_name: annotated(names::DISPLAY_NAME),
        })
    }
}

/// URI parameters used by a template, with their declared defaults.
pub fn uri_parameters(template: &str, declared: &IndexMap<String, Parameter>) -> Vec<IrUriParameter> {
    placeholders(template)
        .into_iter()
        .map(|name| IrUriParameter {
            name: name.to_string(),
            variable: php_variable_name(&normalize_name(name).camel_case),
            default: declared
                .get(name)
                .and_then(Parameter::declared_default)
                .cloned(),
        })
        .collect()
}

/// Flatten the tree into endpoints, one per method, in document order.
///
/// Nodes reachable both ways are addressed through their fixed accessor.
pub fn collect_endpoints(root: &IrResource) -> Vec<IrEndpoint> {
    let mut out: Vec<IrEndpoint> = root
        .methods
        .iter()
        .map(|method| IrEndpoint {
            resource_id: root.id.clone(),
            path: "/".to_string(),
            uri_parameters: Vec::new(),
            chain: Vec::new(),
            method: method.clone(),
        })
        .collect();
    let mut route = Route::default();
    for child in &root.children {
        visit(child, &mut route, &mut out);
    }
    out
}

#[derive(Default)]
struct Route {
    path: String,
    uri_parameters: Vec<IrUriParameter>,
    chain: Vec<IrAccessor>,
}

fn visit(node: &IrResource, route: &mut Route, out: &mut Vec<IrEndpoint>) {
    let (segment, accessor) = match (&node.fixed, &node.parameterized) {
        (Some(fixed), _) => (
            fixed,
            IrAccessor {
                method: php_method_name(&node.name.camel_case),
                arguments: Vec::new(),
            },
        ),
        (None, Some(param)) => (
            param,
            IrAccessor {
                method: format!("with{}", node.name.pascal_case),
                arguments: param.uri_parameters.iter().map(|p| p.name.clone()).collect(),
            },
        ),
        (None, None) => return,
    };

    let path_len = route.path.len();
    let params_len = route.uri_parameters.len();
    route.path.push_str(&segment.relative_uri);
    route.uri_parameters.extend(segment.uri_parameters.iter().cloned());
    route.chain.push(accessor);

    for method in &node.methods {
        out.push(IrEndpoint {
            resource_id: node.id.clone(),
            path: route.path.clone(),
            uri_parameters: route.uri_parameters.clone(),
            chain: route.chain.clone(),
            method: method.clone(),
        });
    }
    for child in &node.children {
        visit(child, route, out);
    }

    route.chain.pop();
    route.uri_parameters.truncate(params_len);
    route.path.truncate(path_len);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resource(uri: &str, verbs: &[&str], children: Vec<Resource>) -> Resource {
        Resource {
            relative_uri: uri.to_string(),
            methods: verbs
                .iter()
                .map(|v| Method {
                    method: v.to_string(),
                    ..Method::default()
                })
                .collect(),
            resources: children,
            ..Resource::default()
        }
    }

    fn build(resources: &[Resource]) -> IrResource {
        let oauth2 = HashSet::new();
        TreeBuilder::new(&oauth2, &[]).build(resources).unwrap()
    }

    #[test]
    fn test_multi_segment_uri_nests() {
        let root = build(&[resource("/bounce/url", &["get"], vec![])]);
        let bounce = root.child("bounce").unwrap();
        assert_eq!(bounce.id, "Bounce");
        assert!(bounce.methods.is_empty());
        let url = bounce.child("url").unwrap();
        assert_eq!(url.id, "BounceUrl");
        assert_eq!(url.methods[0].verb, HttpMethod::Get);
    }

    #[test]
    fn test_extension_split_and_keyword_class() {
        let root = build(&[resource("/static.json", &["get"], vec![])]);
        let stat = root.child("static").unwrap();
        assert_eq!(stat.id, "StaticResource");
        assert_eq!(stat.child("json").unwrap().id, "StaticJson");
    }

    #[test]
    fn test_fixed_and_parameterized_merge() {
        let root = build(&[resource(
            "/conflicts",
            &[],
            vec![
                resource("/media", &["get"], vec![]),
                resource("/{media}", &["post"], vec![]),
            ],
        )]);
        let conflicts = root.child("conflicts").unwrap();
        assert_eq!(conflicts.children.len(), 1);
        let media = &conflicts.children[0];
        assert!(media.fixed.is_some());
        assert!(media.parameterized.is_some());
        assert_eq!(media.methods.len(), 2);
        assert_eq!(conflicts.with_params().count(), 1);
        assert_eq!(conflicts.no_params().count(), 1);
    }

    #[test]
    fn test_duplicate_ids_are_suffixed() {
        let root = build(&[
            resource("/request", &["get"], vec![]),
            resource("/foo-bar", &["get"], vec![]),
            resource("/foo_bar", &["get"], vec![]),
        ]);
        assert_eq!(root.child("request").unwrap().id, "Request2");
        // both spell `fooBar`, so they share a node
        assert_eq!(root.children.len(), 2);
    }

    #[test]
    fn test_root_resource_methods() {
        let root = build(&[resource("/", &["get"], vec![resource("/hello", &["get"], vec![])])]);
        assert_eq!(root.methods.len(), 1);
        assert_eq!(root.child("hello").unwrap().id, "Hello");
        let endpoints = collect_endpoints(&root);
        assert_eq!(endpoints[0].path, "/");
        assert!(endpoints[0].chain.is_empty());
        assert_eq!(endpoints[1].path, "/hello");
    }

    #[test]
    fn test_unsupported_method() {
        let oauth2 = HashSet::new();
        let err = TreeBuilder::new(&oauth2, &[])
            .build(&[resource("/x", &["fetch"], vec![])])
            .unwrap_err();
        assert!(matches!(err, TransformError::UnsupportedMethod { ref method, .. } if method == "fetch"));
    }

    #[test]
    fn test_security_inheritance() {
        let oauth2: HashSet<String> = ["oauth".to_string()].into();
        let api = vec![SecuredBy::Name("oauth".to_string())];
        let mut secured = resource("/secured", &["get"], vec![]);
        secured.methods.push(Method {
            method: "post".to_string(),
            secured_by: vec![SecuredBy::Anonymous],
            ..Method::default()
        });
        let root = TreeBuilder::new(&oauth2, &api).build(&[secured]).unwrap();
        let node = root.child("secured").unwrap();
        assert_eq!(node.methods[0].security_schemes, vec!["oauth"]);
        assert!(node.methods[1].security_schemes.is_empty());
    }

    #[test]
    fn test_endpoints_chain() {
        let mut param = resource("/{id}", &["get"], vec![]);
        param.uri_parameters.insert(
            "id".to_string(),
            Parameter {
                default_value: Some(serde_json::json!("default")),
                ..Parameter::default()
            },
        );
        let root = build(&[resource("/users", &["get"], vec![param])]);
        let endpoints = collect_endpoints(&root);
        assert_eq!(endpoints.len(), 2);
        assert_eq!(endpoints[1].path, "/users/{id}");
        assert_eq!(
            endpoints[1].chain,
            vec![
                IrAccessor {
                    method: "users".to_string(),
                    arguments: vec![],
                },
                IrAccessor {
                    method: "withId".to_string(),
                    arguments: vec!["id".to_string()],
                },
            ]
        );
        assert_eq!(
            endpoints[1].uri_parameters[0].default,
            Some(serde_json::json!("default"))
        );
    }
}
