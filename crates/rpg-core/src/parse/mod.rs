pub mod annotation;
pub mod api;
pub mod named;
pub mod parameter;
pub mod resource;
pub mod security;
pub mod types;

use crate::error::ParseError;
use api::Api;

/// Parse a RAML API document (as serialized by the RAML parser) from YAML.
pub fn from_yaml(input: &str) -> Result<Api, ParseError> {
    let api: Api = serde_yaml_ng::from_str(input)?;
    validate(&api)?;
    Ok(api)
}

/// Parse a RAML API document from JSON.
pub fn from_json(input: &str) -> Result<Api, ParseError> {
    let api: Api = serde_json::from_str(input)?;
    validate(&api)?;
    Ok(api)
}

fn validate(api: &Api) -> Result<(), ParseError> {
    if api.title.trim().is_empty() {
        return Err(ParseError::MissingField("title".to_string()));
    }
    Ok(())
}
