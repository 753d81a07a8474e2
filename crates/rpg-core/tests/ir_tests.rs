use rpg_core::ir::{HttpMethod, IrAccessor, IrParent, IrType};
use rpg_core::parse;
use rpg_core::transform;

const EXAMPLE: &str = include_str!("fixtures/example-api.yaml");
const MINIMAL: &str = include_str!("fixtures/minimal.json");

fn example() -> rpg_core::ir::IrSpec {
    let api = parse::from_yaml(EXAMPLE).unwrap();
    transform::transform(&api).unwrap()
}

#[test]
fn transform_example_info() {
    let ir = example();
    assert_eq!(ir.info.title, "Example API");
    assert_eq!(ir.info.name.pascal_case, "ExampleApi");
    assert_eq!(ir.info.name.param_case, "example-api");
    assert_eq!(ir.base_uri_parameters.len(), 1);
    assert_eq!(ir.base_uri_parameters[0].name, "version");
    assert_eq!(
        ir.base_uri_parameters[0].default,
        Some(serde_json::json!("v1"))
    );
}

#[test]
fn transform_resource_tree() {
    let ir = example();
    let root = &ir.root;
    assert_eq!(root.id, "RequestBuilder");
    assert_eq!(root.methods.len(), 1, "`/` attaches to the root");

    let url = root.child("bounce").and_then(|b| b.child("url")).unwrap();
    assert_eq!(url.id, "BounceUrl");
    let verbs: Vec<HttpMethod> = url.methods.iter().map(|m| m.verb).collect();
    assert_eq!(verbs, vec![HttpMethod::Get, HttpMethod::Post]);

    let variable = root
        .child("defaults")
        .and_then(|d| d.child("parameter"))
        .and_then(|p| p.child("variable"))
        .unwrap();
    let segment = variable.parameterized.as_ref().unwrap();
    assert_eq!(segment.relative_uri, "/{variable}");
    assert_eq!(
        segment.uri_parameters[0].default,
        Some(serde_json::json!("default"))
    );

    let stat = root.child("extensions").and_then(|e| e.child("static")).unwrap();
    assert_eq!(stat.id, "ExtensionsStatic");
    assert_eq!(stat.child("json").unwrap().fixed.as_ref().unwrap().relative_uri, ".json");

    let basic = root
        .child("extensions")
        .and_then(|e| e.child("mediaType"))
        .and_then(|m| m.child("basic"))
        .unwrap();
    assert!(basic.fixed.is_none());
    assert_eq!(
        basic.parameterized.as_ref().unwrap().uri_parameters[0].variable,
        "mediaTypeExtension"
    );
}

#[test]
fn transform_merges_conflicting_routes() {
    let ir = example();
    let conflicts = ir.root.child("conflicts").unwrap();
    assert_eq!(conflicts.children.len(), 1);

    let media_type = &conflicts.children[0];
    assert_eq!(media_type.id, "ConflictsMediaType");
    assert_eq!(media_type.fixed.as_ref().unwrap().relative_uri, "/media-type");
    assert_eq!(
        media_type.parameterized.as_ref().unwrap().relative_uri,
        "{mediaTypeExtension}"
    );
    assert_eq!(media_type.methods.len(), 1);
    assert_eq!(media_type.child("route").unwrap().id, "ConflictsMediaTypeRoute");
}

#[test]
fn transform_ids_are_unique() {
    let ir = example();
    let nodes = ir.root.walk();
    let mut ids: Vec<&str> = nodes.iter().map(|r| r.id.as_str()).collect();
    let total = ids.len();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), total);
}

#[test]
fn transform_endpoints() {
    let ir = example();
    assert_eq!(ir.endpoints.len(), 17);

    let variable = ir
        .endpoints
        .iter()
        .find(|e| e.resource_id == "BounceParameterVariable")
        .unwrap();
    assert_eq!(variable.path, "/bounce/parameter/{variable}");
    let chain: Vec<&str> = variable.chain.iter().map(|a| a.method.as_str()).collect();
    assert_eq!(chain, vec!["bounce", "parameter", "withVariable"]);

    let json = ir
        .endpoints
        .iter()
        .find(|e| e.resource_id == "ExtensionsStaticJson")
        .unwrap();
    assert_eq!(json.path, "/extensions/static.json");
    assert_eq!(
        json.chain[1],
        IrAccessor {
            method: "_static".to_string(),
            arguments: vec![],
        }
    );
}

#[test]
fn transform_methods() {
    let ir = example();
    let search = &ir.root.child("search").unwrap().methods[0];
    let params: Vec<&str> = search
        .query_parameters
        .as_ref()
        .unwrap()
        .iter()
        .map(|p| p.original_name.as_str())
        .collect();
    assert_eq!(params, vec!["term", "page-size"]);
    assert_eq!(search.method_name.as_deref(), Some("search"));

    let headers = &ir
        .root
        .child("defaults")
        .and_then(|d| d.child("headers"))
        .unwrap()
        .methods[0];
    assert_eq!(headers.default_headers[0].name, "X-Default-Header");
    assert!(headers.query_parameters.is_none());

    let secured = ir.root.child("secured").unwrap();
    assert_eq!(secured.methods[0].security_schemes, vec!["oauth_2_0"]);
    assert!(secured.methods[1].security_schemes.is_empty());
}

#[test]
fn transform_models() {
    let ir = example();
    assert_eq!(ir.models.len(), 6);

    let owner = ir.models.iter().find(|m| m.key == "Owner").unwrap();
    assert_eq!(owner.parent, IrParent::JsonObject);
    let fields: Vec<&str> = owner.properties.iter().map(|p| p.field.as_str()).collect();
    assert_eq!(
        fields,
        vec!["name", "weight", "status", "pets", "favorite", "tags", "metadata"]
    );
    let status = owner.properties.iter().find(|p| p.field == "status").unwrap();
    assert_eq!(status.prop_type, IrType::String);
    let pets = owner.properties.iter().find(|p| p.field == "pets").unwrap();
    assert_eq!(
        pets.prop_type,
        IrType::Array(Some(Box::new(IrType::Ref("Animal".to_string()))))
    );

    let cat = ir.models.iter().find(|m| m.key == "Cat").unwrap();
    assert_eq!(cat.parent, IrParent::Model("Animal".to_string()));
    assert_eq!(cat.discriminator_value.as_deref(), Some("cat"));

    assert!(ir.models.iter().find(|m| m.key == "Internal").unwrap().ignored);
}

#[test]
fn transform_registry() {
    let ir = example();
    let family = ir.registry.discriminator("Animal").unwrap();
    assert_eq!(family.property, "kind");
    let variants: Vec<(&str, &str)> = family
        .variants
        .iter()
        .map(|v| (v.value.as_str(), v.class.as_str()))
        .collect();
    assert_eq!(variants, vec![("cat", "Cat"), ("dog", "Dog")]);
    assert!(ir.registry.has_collection("Animal"));
    assert_eq!(ir.registry.display_name("Status"), Some("Status"));
}

#[test]
fn transform_oauth2_schemes() {
    let ir = example();
    let schemes: Vec<_> = ir.oauth2_schemes().collect();
    assert_eq!(schemes.len(), 1);
    assert_eq!(schemes[0].grants, vec!["client_credentials"]);
    assert!(schemes[0].allows_client_credentials());

    let mut code_only = schemes[0].clone();
    code_only.grants = vec!["authorization_code".to_string()];
    assert!(!code_only.allows_client_credentials());
}

#[test]
fn transform_minimal_json() {
    let api = parse::from_json(MINIMAL).unwrap();
    let ir = transform::transform(&api).unwrap();
    assert!(ir.base_uri_parameters.is_empty());
    assert!(!ir.has_oauth2());
    let item = ir.root.child("items").and_then(|i| i.child("itemId")).unwrap();
    assert_eq!(item.id, "ItemsItemId");
    assert_eq!(ir.endpoints.len(), 3);
}
