use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// An annotation application (`(generator-type): Foo`).
///
/// The RAML parser wraps values as `{ name, structuredValue }`; plain values
/// are accepted as well.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Annotation {
    Structured {
        #[serde(default)]
        name: Option<String>,
        #[serde(rename = "structuredValue")]
        structured_value: serde_json::Value,
    },
    Plain(serde_json::Value),
}

impl Annotation {
    pub fn value(&self) -> &serde_json::Value {
        match self {
            Annotation::Structured {
                structured_value, ..
            } => structured_value,
            Annotation::Plain(value) => value,
        }
    }

    /// Annotation value as a string, if it is one.
    pub fn as_str(&self) -> Option<&str> {
        self.value().as_str()
    }

    /// Whether the annotation is switched on. A bare annotation (null value)
    /// counts as enabled; only an explicit `false` disables it.
    pub fn is_enabled(&self) -> bool {
        !matches!(self.value(), serde_json::Value::Bool(false))
    }
}

pub type Annotations = IndexMap<String, Annotation>;

/// Annotation names understood by the generator.
pub mod names {
    pub const METHOD_NAME: &str = "client.methodName";
    pub const DISPLAY_NAME: &str = "client.displayName";
    pub const GENERATOR_IGNORE: &str = "generator-ignore";
    pub const GENERATOR_TYPE: &str = "generator-type";
    pub const GENERATE_COLLECTION: &str = "generate-collection";
    pub const IGNORE_STRICT: &str = "generator-ignore-strict";
}

/// Look up an enabled annotation.
pub fn enabled<'a>(annotations: &'a Annotations, name: &str) -> Option<&'a Annotation> {
    annotations.get(name).filter(|a| a.is_enabled())
}
