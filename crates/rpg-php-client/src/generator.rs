use rpg_core::config::RpgConfig;
use rpg_core::ir::IrSpec;
use rpg_core::{CodeGenerator, FileSet, GeneratedFile, GeneratorError};

use crate::emitters::{self, EmitOptions};

/// PHP client SDK generator.
pub struct PhpClientGenerator;

impl PhpClientGenerator {
    /// Resolve emitter settings from the project config.
    pub fn options(ir: &IrSpec, config: &RpgConfig) -> Result<EmitOptions, GeneratorError> {
        let namespace = match &config.php.namespace {
            Some(ns) => ns.trim_matches('\\').to_string(),
            None => ir.info.name.pascal_case.clone(),
        };
        if !is_valid_namespace(&namespace) {
            return Err(GeneratorError::InvalidConfig(format!(
                "`{namespace}` is not a valid PHP namespace"
            )));
        }

        let package_name = match &config.package.name {
            Some(name) => name.clone(),
            None => format!("{}/{}", config.package.vendor, ir.info.name.param_case),
        };
        if !package_name.contains('/') {
            return Err(GeneratorError::InvalidConfig(format!(
                "package name `{package_name}` must have the form vendor/name"
            )));
        }

        Ok(EmitOptions {
            namespace,
            strict_types: config.php.strict_types_enabled(),
            php_constraint: config.php.php_constraint(),
            package_name,
            license: config.package.license.clone(),
            description: config.package.description.clone(),
        })
    }
}

fn is_valid_namespace(namespace: &str) -> bool {
    !namespace.is_empty()
        && namespace.split('\\').all(|part| {
            let mut chars = part.chars();
            matches!(chars.next(), Some(c) if c == '_' || c.is_ascii_alphabetic())
                && chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
        })
}

impl CodeGenerator for PhpClientGenerator {
    type Config = RpgConfig;

    fn generate(
        &self,
        ir: &IrSpec,
        config: &RpgConfig,
    ) -> Result<Vec<GeneratedFile>, GeneratorError> {
        let options = Self::options(ir, config)?;
        let env = emitters::environment()?;
        log::info!(
            "generating {} (namespace {}, strict types {})",
            options.package_name,
            options.namespace,
            if options.strict_types { "on" } else { "off" }
        );

        let mut files = FileSet::new();
        files.insert(GeneratedFile::new(
            "composer.json",
            emitters::scaffold::emit_composer_json(ir, &options)?,
        ))?;
        files.insert(GeneratedFile::new(
            "README.md",
            emitters::scaffold::emit_readme(&env, ir, &options)?,
        ))?;
        files.insert(GeneratedFile::new(
            ".gitignore",
            emitters::scaffold::emit_gitignore(),
        ))?;
        files.insert(GeneratedFile::new(
            "classes.php",
            emitters::request_builder::emit_classes(&env, ir, &options)?,
        ))?;
        files.insert(GeneratedFile::new(
            "src/Client.php",
            emitters::client::emit_client(&env, ir, &options)?,
        ))?;
        files.insert(GeneratedFile::new(
            "src/OAuth2Handler.php",
            emitters::client::emit_oauth2_handler(&env, &options)?,
        ))?;
        files.insert(GeneratedFile::new(
            "src/TokenProvider.php",
            emitters::client::emit_token_provider(&env, &options)?,
        ))?;

        let model_files = emitters::support::emit_support(&env, ir, &options)?
            .into_iter()
            .chain(emitters::models::emit_models(&env, ir, &options)?)
            .chain(emitters::models::emit_collections(&env, ir, &options)?);
        files.extend(
            model_files.map(|(class, content)| {
                GeneratedFile::new(format!("src/Model/{class}.php"), content)
            }),
        )?;

        files.insert(GeneratedFile::new(
            "tests/RequestBuilderTest.php",
            emitters::tests::emit_request_builder_test(&env, ir, &options)?,
        ))?;

        log::debug!("generated {} files", files.len());
        Ok(files.into_files())
    }
}
