pub mod client;
pub mod models;
pub mod request_builder;
pub mod scaffold;
pub mod support;
pub mod tests;

use minijinja::{AutoEscape, Environment, Value};
use rpg_core::GeneratorError;
use rpg_core::ir::IrEndpoint;

/// Settings shared by every emitter.
#[derive(Debug, Clone)]
pub struct EmitOptions {
    /// Root namespace without leading or trailing backslashes.
    pub namespace: String,
    pub strict_types: bool,
    /// `require.php` constraint for composer.json.
    pub php_constraint: String,
    /// Composer package name (`vendor/name`).
    pub package_name: String,
    pub license: String,
    pub description: Option<String>,
}

impl EmitOptions {
    /// Namespace holding models and runtime support classes.
    pub fn model_namespace(&self) -> String {
        format!("{}\\Model", self.namespace)
    }
}

const TEMPLATES: &[(&str, &str)] = &[
    ("header.php.j2", include_str!("../../templates/header.php.j2")),
    ("classes.php.j2", include_str!("../../templates/classes.php.j2")),
    ("client.php.j2", include_str!("../../templates/client.php.j2")),
    ("oauth2_handler.php.j2", include_str!("../../templates/oauth2_handler.php.j2")),
    ("token_provider.php.j2", include_str!("../../templates/token_provider.php.j2")),
    ("model.php.j2", include_str!("../../templates/model.php.j2")),
    ("collection.php.j2", include_str!("../../templates/collection.php.j2")),
    ("json_object.php.j2", include_str!("../../templates/json_object.php.j2")),
    ("base_collection.php.j2", include_str!("../../templates/base_collection.php.j2")),
    ("hydration_interface.php.j2", include_str!("../../templates/hydration_interface.php.j2")),
    ("mapper.php.j2", include_str!("../../templates/mapper.php.j2")),
    ("hydrator_generator.php.j2", include_str!("../../templates/hydrator_generator.php.j2")),
    ("readme.md.j2", include_str!("../../templates/readme.md.j2")),
    ("request_builder_test.php.j2", include_str!("../../templates/request_builder_test.php.j2")),
];

/// Escape `*/` sequences that would prematurely close PHPDoc blocks, and keep
/// multi-line text inside the block.
fn php_doc(value: String) -> String {
    value
        .trim()
        .replace("*/", "*\\/")
        .replace('\n', "\n     * ")
}

/// Build the template environment used by all emitters.
pub fn environment() -> Result<Environment<'static>, GeneratorError> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.set_keep_trailing_newline(true);
    env.set_auto_escape_callback(|_| AutoEscape::None);
    env.add_filter("php_doc", php_doc);
    for &(name, source) in TEMPLATES {
        env.add_template(name, source)
            .map_err(|e| template_error(name, &e))?;
    }
    Ok(env)
}

/// Render a registered template.
pub fn render(env: &Environment<'_>, name: &str, ctx: Value) -> Result<String, GeneratorError> {
    let tmpl = env.get_template(name).map_err(|e| template_error(name, &e))?;
    tmpl.render(ctx).map_err(|e| template_error(name, &e))
}

/// Fluent call reaching the endpoint's method, e.g. `bounce()->url()->get()`.
///
/// `argument` renders each URI parameter passed to a parameterized accessor.
pub fn endpoint_call(endpoint: &IrEndpoint, argument: impl Fn(&str) -> String) -> String {
    endpoint_call_with(endpoint, argument, "")
}

/// Like [`endpoint_call`], passing `verb_args` to the final verb method.
pub fn endpoint_call_with(
    endpoint: &IrEndpoint,
    argument: impl Fn(&str) -> String,
    verb_args: &str,
) -> String {
    let mut calls: Vec<String> = endpoint
        .chain
        .iter()
        .map(|accessor| {
            let args: Vec<String> = accessor.arguments.iter().map(|a| argument(a)).collect();
            format!("{}({})", accessor.method, args.join(", "))
        })
        .collect();
    calls.push(format!("{}({verb_args})", endpoint.method.verb.as_lower()));
    calls.join("->")
}

fn template_error(name: &str, err: &minijinja::Error) -> GeneratorError {
    log::error!("template {name} failed: {err:#}");
    GeneratorError::Template {
        template: name.to_string(),
        message: err.to_string(),
    }
}

#[cfg(test)]
mod unit {
    use super::*;

    #[test]
    fn test_php_doc_escapes_comment_end() {
        assert_eq!(php_doc("a */ b".into()), "a *\\/ b");
        assert_eq!(php_doc("one\ntwo\n".into()), "one\n     * two");
    }

    #[test]
    fn test_all_templates_register() {
        let env = environment().unwrap();
        for &(name, _) in TEMPLATES {
            assert!(env.get_template(name).is_ok(), "{name}");
        }
    }
}
