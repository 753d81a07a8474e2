use std::collections::HashSet;

use minijinja::{Environment, context};
use rpg_core::GeneratorError;
use rpg_core::ir::{IrModel, IrParent, IrSpec, TypeRegistry};
use rpg_core::transform::name_normalizer::normalize_name;
use serde::Serialize;

use super::{EmitOptions, render};
use crate::type_mapper::{is_php_identifier, map_property, php_map, php_string};

#[derive(Debug, Serialize)]
struct ConstantContext {
    name: String,
    value: String,
}

#[derive(Debug, Serialize)]
struct DiscriminatorContext {
    key: String,
    field: String,
    /// The discriminator is not one of the declared properties.
    declare_field: bool,
    variants: Vec<VariantContext>,
}

#[derive(Debug, Serialize)]
struct VariantContext {
    value: String,
    class: String,
}

#[derive(Debug, Serialize)]
struct PropertyContext {
    field: String,
    getter: String,
    key: String,
    description: Option<String>,
    doc_type: String,
    return_type: Option<String>,
    hydrate: String,
    zero: String,
}

/// Emit `src/Model/<Class>.php` for every model not marked `generator-ignore`.
pub fn emit_models(
    env: &Environment<'_>,
    ir: &IrSpec,
    options: &EmitOptions,
) -> Result<Vec<(String, String)>, GeneratorError> {
    ir.models
        .iter()
        .filter(|model| !model.ignored)
        .map(|model| {
            let content = emit_model(env, model, &ir.registry, options)?;
            Ok((model.name.clone(), content))
        })
        .collect()
}

fn emit_model(
    env: &Environment<'_>,
    model: &IrModel,
    registry: &TypeRegistry,
    options: &EmitOptions,
) -> Result<String, GeneratorError> {
    let parent = match &model.parent {
        IrParent::JsonObject => "JsonObject".to_string(),
        IrParent::Model(class) | IrParent::Custom(class) => class.clone(),
    };

    let mut fields = HashSet::new();
    let mut properties = Vec::new();
    for prop in &model.properties {
        if !fields.insert(prop.field.clone()) {
            log::warn!(
                "{}: property `{}` maps to existing field ${}; skipped",
                model.name,
                prop.name.original,
                prop.field
            );
            continue;
        }
        let mapping = map_property(&prop.prop_type, registry);
        let return_type = if options.strict_types && !prop.ignore_strict {
            mapping.return_type
        } else {
            None
        };
        properties.push(PropertyContext {
            field: prop.field.clone(),
            getter: prop.getter.clone(),
            key: php_string(&prop.name.original),
            description: prop.description.clone(),
            doc_type: mapping.doc_type,
            return_type,
            hydrate: mapping.hydrate,
            zero: mapping.zero,
        });
    }

    let discriminator = model.discriminator.as_ref().map(|key| {
        let field = model
            .properties
            .iter()
            .find(|p| &p.name.original == key)
            .map(|p| p.field.clone());
        let declare_field = field.is_none();
        let field = field.unwrap_or_else(|| discriminator_field(key));
        let variants = registry
            .discriminator(&model.name)
            .map(|d| {
                d.variants
                    .iter()
                    .map(|v| VariantContext {
                        value: php_string(&v.value),
                        class: v.class.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default();
        DiscriminatorContext {
            key: php_string(key),
            field,
            declare_field,
            variants,
        }
    });

    // Fields whose PHP name differs from the raw data key they serialize to.
    let mut renamed: Vec<(&str, String)> = properties
        .iter()
        .filter(|p| p.key != php_string(&p.field))
        .map(|p| (p.field.as_str(), p.key.clone()))
        .collect();
    if let Some(d) = discriminator.as_ref().filter(|d| d.declare_field) {
        if let Some(key) = model.discriminator.as_deref().filter(|k| *k != d.field) {
            renamed.push((d.field.as_str(), php_string(key)));
        }
    }
    let field_keys = (!renamed.is_empty()).then(|| php_map(renamed));

    let family = discriminator.is_some() || model.discriminator_value.is_some();
    let discriminator_value = model
        .discriminator_value
        .as_deref()
        .map_or_else(|| "null".to_string(), php_string);

    let constants: Vec<ConstantContext> = model
        .constants
        .iter()
        .map(|c| ConstantContext {
            name: c.name.clone(),
            value: php_string(&c.value),
        })
        .collect();

    render(
        env,
        "model.php.j2",
        context! {
            namespace => options.model_namespace(),
            strict_types => options.strict_types,
            key => &model.key,
            name => &model.name,
            description => &model.description,
            parent => parent,
            constants => constants,
            discriminator => discriminator,
            family => family,
            discriminator_value => discriminator_value,
            properties => properties,
            field_keys => field_keys,
            inherits_field_keys => !matches!(model.parent, IrParent::Custom(_)),
        },
    )
}

fn discriminator_field(key: &str) -> String {
    if is_php_identifier(key) {
        key.to_string()
    } else {
        normalize_name(key).camel_case
    }
}

/// Emit `src/Model/<Class>Collection.php` for every model with
/// `generate-collection`.
pub fn emit_collections(
    env: &Environment<'_>,
    ir: &IrSpec,
    options: &EmitOptions,
) -> Result<Vec<(String, String)>, GeneratorError> {
    ir.models
        .iter()
        .filter(|model| model.generate_collection && !model.ignored)
        .map(|model| {
            let content = render(
                env,
                "collection.php.j2",
                context! {
                    namespace => options.model_namespace(),
                    strict_types => options.strict_types,
                    class => &model.name,
                    discriminated => ir.registry.discriminator(&model.name).is_some(),
                },
            )?;
            Ok((format!("{}Collection", model.name), content))
        })
        .collect()
}
