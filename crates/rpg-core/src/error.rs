use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("missing required field: {0}")]
    MissingField(String),
}

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("unsupported HTTP method `{method}` on {uri}")]
    UnsupportedMethod { method: String, uri: String },
}

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("template error in {template}: {message}")]
    Template { template: String, message: String },

    #[error("duplicate output path: {0}")]
    DuplicatePath(String),

    #[error("invalid generator config: {0}")]
    InvalidConfig(String),

    #[error("generation failed: {0}")]
    Other(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_yaml_ng::Error,
    },
}
