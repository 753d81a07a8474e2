use minijinja::{Environment, context};
use rpg_core::GeneratorError;
use rpg_core::ir::IrSpec;

use super::{EmitOptions, render};

/// Runtime classes every model relies on, as `(class, template)` pairs.
const SUPPORT_CLASSES: &[(&str, &str)] = &[
    ("HydrationInterface", "hydration_interface.php.j2"),
    ("JsonObject", "json_object.php.j2"),
    ("Collection", "base_collection.php.j2"),
    ("Mapper", "mapper.php.j2"),
];

/// Emit the model runtime: `HydrationInterface`, `JsonObject`, `Collection`,
/// `Mapper` and the `HydratorGenerator` lookup table.
pub fn emit_support(
    env: &Environment<'_>,
    ir: &IrSpec,
    options: &EmitOptions,
) -> Result<Vec<(String, String)>, GeneratorError> {
    let namespace = options.model_namespace();
    let mut files = Vec::with_capacity(SUPPORT_CLASSES.len() + 1);
    for &(class, template) in SUPPORT_CLASSES {
        let content = render(
            env,
            template,
            context! {
                namespace => &namespace,
                strict_types => options.strict_types,
            },
        )?;
        files.push((class.to_string(), content));
    }

    let classes: Vec<String> = ir
        .models
        .iter()
        .filter(|model| !model.ignored)
        .flat_map(|model| {
            let collection = model
                .generate_collection
                .then(|| format!("{}Collection", model.name));
            std::iter::once(model.name.clone()).chain(collection)
        })
        .collect();
    let content = render(
        env,
        "hydrator_generator.php.j2",
        context! {
            namespace => &namespace,
            strict_types => options.strict_types,
            classes => classes,
        },
    )?;
    files.push(("HydratorGenerator".to_string(), content));

    Ok(files)
}
