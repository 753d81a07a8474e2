use std::env;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

/// Top-level project configuration loaded from `.rpg.yaml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RpgConfig {
    pub input: String,
    pub output: String,
    pub php: PhpConfig,
    pub package: PackageConfig,
}

impl Default for RpgConfig {
    fn default() -> Self {
        Self {
            input: "api.yaml".to_string(),
            output: "sdk".to_string(),
            php: PhpConfig::default(),
            package: PackageConfig::default(),
        }
    }
}

/// Options for the emitted PHP code.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PhpConfig {
    /// Root namespace (defaults to the PascalCased API title).
    pub namespace: Option<String>,
    /// Emit `declare(strict_types=1)` and return type declarations.
    /// Falls back to the `USE_STRICT_TYPES` environment variable when unset.
    pub strict_types: Option<bool>,
    /// Minimum PHP version for composer.json.
    pub php_version: Option<String>,
}

/// Environment variable consulted when `php.strict_types` is not configured.
pub const STRICT_TYPES_ENV: &str = "USE_STRICT_TYPES";

impl PhpConfig {
    pub fn strict_types_enabled(&self) -> bool {
        match self.strict_types {
            Some(enabled) => enabled,
            None => env::var(STRICT_TYPES_ENV).is_ok_and(|v| v == "true"),
        }
    }

    /// Minimum PHP version constraint, which depends on strict typing.
    pub fn php_constraint(&self) -> String {
        match &self.php_version {
            Some(version) => version.clone(),
            None if self.strict_types_enabled() => ">=7.4".to_string(),
            None => ">=7.2".to_string(),
        }
    }
}

/// composer.json metadata.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PackageConfig {
    /// Full package name (`vendor/name`); derived from the title when unset.
    pub name: Option<String>,
    /// Vendor prefix used when deriving the package name.
    pub vendor: String,
    pub license: String,
    /// Overrides the API description in composer.json.
    pub description: Option<String>,
}

impl Default for PackageConfig {
    fn default() -> Self {
        Self {
            name: None,
            vendor: "raml".to_string(),
            license: "MIT".to_string(),
            description: None,
        }
    }
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".rpg.yaml";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<RpgConfig>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config: RpgConfig =
        serde_yaml_ng::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(Some(config))
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r#"# rpg configuration
input: api.yaml       # parsed RAML document (YAML or JSON)
output: sdk

php:
  # namespace: ExampleApi      # defaults to the PascalCased API title
  # strict_types: true         # defaults to USE_STRICT_TYPES=true in the environment
  # php_version: ">=7.4"

package:
  # name: acme/example-api-sdk # defaults to <vendor>/<param-cased title>
  vendor: raml
  license: MIT
  # description: Client SDK for the Example API
"#
}
