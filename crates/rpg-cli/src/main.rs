use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use rpg_core::config::{self, CONFIG_FILE_NAME, RpgConfig};
use rpg_core::ir::{IrParent, IrSpec};
use rpg_core::parse::{self, api::Api};
use rpg_core::transform;
use rpg_core::{CodeGenerator, GeneratedFile};
use rpg_php_client::PhpClientGenerator;
use rpg_php_client::emitters::endpoint_call;

#[derive(Parser)]
#[command(name = "rpg", about = "RAML to PHP client SDK generator", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the PHP client from a parsed RAML document
    Generate {
        /// Path to the parsed RAML document (YAML or JSON)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate a parsed RAML document
    Validate {
        /// Path to the parsed RAML document
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Inspect the resolved resource tree and models
    Inspect {
        /// Path to the parsed RAML document
        #[arg(short, long)]
        input: PathBuf,

        /// Output format
        #[arg(long, default_value = "yaml")]
        format: InspectFormat,
    },

    /// Initialize a new rpg configuration
    Init {
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Clone, ValueEnum)]
enum InspectFormat {
    Yaml,
    Json,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate { input, output } => cmd_generate(input, output),

        Commands::Validate { input } => cmd_validate(input),

        Commands::Inspect { input, format } => cmd_inspect(input, format),

        Commands::Init { force } => cmd_init(force),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "rpg", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Try to load the project config file from the current directory.
fn try_load_config() -> Result<Option<RpgConfig>> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);
    config::load_config(&config_path).map_err(|e| anyhow::anyhow!(e))
}

fn read_api(path: &Path) -> Result<Api> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("yaml");

    let parsed = match ext {
        "json" => parse::from_json(&content),
        _ => parse::from_yaml(&content),
    }
    .with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(parsed)
}

fn load_spec(path: &Path) -> Result<IrSpec> {
    let parsed = read_api(path)?;
    let ir = transform::transform(&parsed)
        .with_context(|| format!("failed to resolve {}", path.display()))?;
    Ok(ir)
}

/// Write generated files to disk under the given base directory.
fn write_files(base: &Path, files: &[GeneratedFile]) -> Result<()> {
    for file in files {
        let path = base.join(&file.path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        fs::write(&path, &file.content)
            .with_context(|| format!("failed to write {}", path.display()))?;
        eprintln!("  wrote {}", path.display());
    }
    Ok(())
}

fn cmd_generate(input: Option<PathBuf>, output: Option<PathBuf>) -> Result<()> {
    let cfg = try_load_config()?.unwrap_or_default();
    let input = input.unwrap_or_else(|| PathBuf::from(&cfg.input));
    let output_dir = output.unwrap_or_else(|| PathBuf::from(&cfg.output));
    let ir = load_spec(&input)?;
    log::debug!(
        "{} endpoints, {} models from {}",
        ir.endpoints.len(),
        ir.models.len(),
        input.display()
    );

    eprintln!("Generating {} → {}", ir.info.title, output_dir.display());
    let files = PhpClientGenerator
        .generate(&ir, &cfg)
        .with_context(|| format!("failed to generate the client for {}", input.display()))?;

    fs::create_dir_all(&output_dir).with_context(|| {
        format!("failed to create output directory {}", output_dir.display())
    })?;
    write_files(&output_dir, &files)?;

    eprintln!("Generated {} files in {}", files.len(), output_dir.display());
    eprintln!("Run `composer install` in {} to fetch dependencies.", output_dir.display());
    Ok(())
}

fn cmd_validate(input: PathBuf) -> Result<()> {
    let parsed = read_api(&input)?;

    eprintln!("Valid RAML document: {}", parsed.title);
    if let Some(ref version) = parsed.version {
        eprintln!("  Version: {version}");
    }
    if let Some(ref base_uri) = parsed.base_uri {
        eprintln!("  Base URI: {base_uri}");
    }
    eprintln!("  Resources: {}", parsed.resources.len());
    eprintln!("  Types: {}", parsed.types.len());
    eprintln!("  Security schemes: {}", parsed.security_schemes.len());

    // Also validate that it resolves to IR successfully
    let ir = transform::transform(&parsed)?;
    eprintln!("  Resource classes: {}", ir.root.walk().len());
    eprintln!("  Endpoints: {}", ir.endpoints.len());
    eprintln!("  Models: {}", ir.models.iter().filter(|m| !m.ignored).count());

    eprintln!("Validation successful.");
    Ok(())
}

fn cmd_inspect(input: PathBuf, format: InspectFormat) -> Result<()> {
    let ir = load_spec(&input)?;

    let summary = build_inspect_summary(&ir);

    match format {
        InspectFormat::Yaml => {
            let yaml = serde_yaml_ng::to_string(&summary)?;
            print!("{}", yaml);
        }
        InspectFormat::Json => {
            let json = serde_json::to_string_pretty(&summary)?;
            println!("{}", json);
        }
    }

    Ok(())
}

fn build_inspect_summary(ir: &IrSpec) -> serde_json::Value {
    let resources: Vec<serde_json::Value> = ir
        .root
        .walk()
        .into_iter()
        .map(|node| {
            serde_json::json!({
                "class": node.id,
                "fixed": node.fixed.as_ref().map(|s| &s.relative_uri),
                "parameterized": node.parameterized.as_ref().map(|s| &s.relative_uri),
                "methods": node.methods.iter().map(|m| m.verb.as_str()).collect::<Vec<_>>(),
            })
        })
        .collect();

    let endpoints: Vec<serde_json::Value> = ir
        .endpoints
        .iter()
        .map(|endpoint| {
            serde_json::json!({
                "method": endpoint.method.verb.as_str(),
                "path": endpoint.path,
                "call": endpoint_call(endpoint, |name| format!("${name}")),
                "security": endpoint.method.security_schemes,
            })
        })
        .collect();

    let models: Vec<serde_json::Value> = ir
        .models
        .iter()
        .map(|model| {
            serde_json::json!({
                "class": model.name,
                "type": model.key,
                "extends": match &model.parent {
                    IrParent::JsonObject => "JsonObject",
                    IrParent::Model(class) | IrParent::Custom(class) => class.as_str(),
                },
                "properties": model.properties.iter().map(|p| &p.name.original).collect::<Vec<_>>(),
                "discriminator": model.discriminator,
                "discriminator_value": model.discriminator_value,
                "collection": model.generate_collection,
                "ignored": model.ignored,
            })
        })
        .collect();

    serde_json::json!({
        "info": {
            "title": ir.info.title,
            "version": ir.info.version,
            "base_uri": ir.base_uri,
        },
        "security_schemes": ir
            .oauth2_schemes()
            .map(|s| serde_json::json!({ "name": s.name.original, "grants": s.grants }))
            .collect::<Vec<_>>(),
        "resources": resources,
        "endpoints": endpoints,
        "models": models,
    })
}

fn cmd_init(force: bool) -> Result<()> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, config::default_config_content())?;
    eprintln!("Created {}", config_path.display());
    Ok(())
}
