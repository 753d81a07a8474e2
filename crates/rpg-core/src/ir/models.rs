use std::collections::HashSet;

use indexmap::IndexMap;

use super::types::NormalizedName;

/// A resolved property type.
#[derive(Debug, Clone, PartialEq)]
pub enum IrType {
    String,
    Boolean,
    Integer,
    Number,
    /// `datetime`, `date-only`, `time-only`, `datetime-only`.
    DateTime,
    /// Untyped object.
    Object,
    /// Array with optional item type.
    Array(Option<Box<IrType>>),
    /// Reference to a declared type by its key.
    Ref(String),
    Any,
}

/// What a generated model class extends.
#[derive(Debug, Clone, PartialEq)]
pub enum IrParent {
    /// The untyped-data base class.
    JsonObject,
    /// Another generated model (class name).
    Model(String),
    /// Explicit `generator-type` override, emitted verbatim.
    Custom(String),
}

/// A property of a model.
#[derive(Debug, Clone)]
pub struct IrProperty {
    /// `original` is the raw data key.
    pub name: NormalizedName,
    /// PHP property name; equals the raw key whenever that is a valid identifier.
    pub field: String,
    pub getter: String,
    pub prop_type: IrType,
    pub description: Option<String>,
    /// Skip the return type declaration under strict types.
    pub ignore_strict: bool,
}

/// A class constant generated from a string enum value.
#[derive(Debug, Clone, PartialEq)]
pub struct IrEnumConstant {
    pub name: String,
    pub value: String,
}

/// A declared type turned into a model class.
#[derive(Debug, Clone)]
pub struct IrModel {
    /// Key the type is declared under.
    pub key: String,
    /// Generated class name.
    pub name: String,
    pub description: Option<String>,
    pub parent: IrParent,
    pub properties: Vec<IrProperty>,
    pub constants: Vec<IrEnumConstant>,
    /// Discriminator property, set on the base of a polymorphic family.
    pub discriminator: Option<String>,
    /// Value selecting this class within its family.
    pub discriminator_value: Option<String>,
    pub generate_collection: bool,
    /// `generator-ignore`: registered for lookups but not emitted.
    pub ignored: bool,
}

/// A concrete subclass selected by a discriminator value.
#[derive(Debug, Clone, PartialEq)]
pub struct IrDiscriminatorVariant {
    pub value: String,
    pub class: String,
}

/// Discriminator of a polymorphic family.
#[derive(Debug, Clone, PartialEq)]
pub struct IrDiscriminator {
    pub property: String,
    pub variants: Vec<IrDiscriminatorVariant>,
}

/// Cross-type lookup tables built once per generation run.
///
/// Maps declared type keys to class names (the display-name map) and base
/// classes to their discriminator variants (the discriminator map). Renderers
/// receive it read-only.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    display_names: IndexMap<String, String>,
    collections: HashSet<String>,
    discriminators: IndexMap<String, IrDiscriminator>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_type(&mut self, key: &str, class: &str) {
        self.display_names.insert(key.to_string(), class.to_string());
    }

    pub fn mark_collection(&mut self, key: &str) {
        self.collections.insert(key.to_string());
    }

    pub fn insert_discriminator(&mut self, class: &str, property: &str) {
        self.discriminators
            .entry(class.to_string())
            .or_insert_with(|| IrDiscriminator {
                property: property.to_string(),
                variants: Vec::new(),
            })
            .property = property.to_string();
    }

    pub fn insert_variant(&mut self, base_class: &str, value: &str, class: &str) {
        if let Some(entry) = self.discriminators.get_mut(base_class) {
            entry.variants.push(IrDiscriminatorVariant {
                value: value.to_string(),
                class: class.to_string(),
            });
        }
    }

    /// Class name generated for a declared type key.
    pub fn display_name(&self, key: &str) -> Option<&str> {
        self.display_names.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.display_names.contains_key(key)
    }

    /// Whether a `<Class>Collection` is generated for the type key.
    pub fn has_collection(&self, key: &str) -> bool {
        self.collections.contains(key)
    }

    /// Discriminator of the family whose base class is `class`.
    pub fn discriminator(&self, class: &str) -> Option<&IrDiscriminator> {
        self.discriminators.get(class)
    }

    pub fn display_names(&self) -> impl Iterator<Item = (&str, &str)> {
        self.display_names
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn discriminators(&self) -> impl Iterator<Item = (&str, &IrDiscriminator)> {
        self.discriminators.iter().map(|(k, v)| (k.as_str(), v))
    }
}
