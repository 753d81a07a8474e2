use std::collections::HashSet;

use indexmap::IndexMap;

use crate::ir::{IrEnumConstant, IrModel, IrParent, IrProperty, IrType, TypeRegistry};
use crate::parse::annotation::{self, names};
use crate::parse::named::NamedMap;
use crate::parse::types::{ItemsRef, TypeDeclaration, TypeRef};

use super::name_normalizer::{normalize_name, php_class_name, php_constant_name};

/// Class names declared by the model support files.
const RESERVED_MODEL_CLASSES: &[&str] = &[
    "JsonObject",
    "Collection",
    "HydrationInterface",
    "Mapper",
    "HydratorGenerator",
];

/// Resolve the declared types into model classes and the lookup tables
/// shared by every renderer.
pub fn build_models(types: &NamedMap<TypeDeclaration>) -> (Vec<IrModel>, TypeRegistry) {
    let declared: IndexMap<&str, &TypeDeclaration> =
        types.iter().map(|(k, v)| (k.as_str(), v)).collect();

    let mut registry = TypeRegistry::new();
    let mut used: HashSet<String> = RESERVED_MODEL_CLASSES.iter().map(|s| s.to_string()).collect();
    for (key, decl) in &declared {
        let class = unique_class(&mut used, &class_name(key, decl));
        log::debug!("type {key} -> {class}");
        registry.insert_type(key, &class);
        let ignored = annotation::enabled(&decl.annotations, names::GENERATOR_IGNORE).is_some();
        if !ignored
            && annotation::enabled(&decl.annotations, names::GENERATE_COLLECTION).is_some()
        {
            registry.mark_collection(key);
        }
    }

    let families: Vec<(String, String)> = declared
        .iter()
        .filter_map(|(key, decl)| {
            let property = decl.discriminator.as_ref()?;
            let class = registry.display_name(key)?;
            Some((class.to_string(), property.clone()))
        })
        .collect();
    for (class, property) in families {
        registry.insert_discriminator(&class, &property);
    }

    let resolver = Resolver {
        declared: &declared,
        registry: &registry,
    };
    let mut variants = Vec::new();
    let models: Vec<IrModel> = declared
        .iter()
        .map(|(key, decl)| {
            let model = resolver.model(key, decl);
            if let Some(owner) = resolver.discriminator_owner(key) {
                if let Some(value) = &model.discriminator_value {
                    variants.push((owner, value.clone(), model.name.clone()));
                }
            }
            model
        })
        .collect();

    for (owner, value, class) in variants {
        registry.insert_variant(&owner, &value, &class);
    }

    (models, registry)
}

/// Display name when usable as a class name, else the PascalCased key.
fn class_name(key: &str, decl: &TypeDeclaration) -> String {
    let candidate = decl
        .display_name
        .as_deref()
        .filter(|name| is_identifier(name))
        .map(str::to_string)
        .unwrap_or_else(|| normalize_name(key).pascal_case);
    php_class_name(&candidate)
}

fn unique_class(used: &mut HashSet<String>, base: &str) -> String {
    let mut class = base.to_string();
    let mut suffix = 2;
    while used.contains(&class) {
        class = format!("{base}{suffix}");
        suffix += 1;
    }
    used.insert(class.clone());
    class
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn builtin(name: &str) -> Option<IrType> {
    let ty = match name {
        "string" => IrType::String,
        "boolean" => IrType::Boolean,
        "integer" => IrType::Integer,
        "number" => IrType::Number,
        "datetime" | "date-only" | "time-only" | "datetime-only" => IrType::DateTime,
        "object" => IrType::Object,
        "array" => IrType::Array(None),
        "any" | "nil" | "file" => IrType::Any,
        _ => return None,
    };
    Some(ty)
}

fn is_scalar(ty: &IrType) -> bool {
    matches!(
        ty,
        IrType::String | IrType::Boolean | IrType::Integer | IrType::Number | IrType::DateTime
    )
}

struct Resolver<'a> {
    declared: &'a IndexMap<&'a str, &'a TypeDeclaration>,
    registry: &'a TypeRegistry,
}

impl Resolver<'_> {
    fn model(&self, key: &str, decl: &TypeDeclaration) -> IrModel {
        let name = self
            .registry
            .display_name(key)
            .map(str::to_string)
            .unwrap_or_else(|| php_class_name(&normalize_name(key).pascal_case));

        let parent = match annotation::enabled(&decl.annotations, names::GENERATOR_TYPE)
            .and_then(|a| a.as_str())
        {
            Some(custom) => IrParent::Custom(custom.to_string()),
            None => match decl.type_ref.as_ref().and_then(TypeRef::single) {
                Some(supertype) => match self.registry.display_name(supertype) {
                    Some(class) => IrParent::Model(class.to_string()),
                    None => IrParent::JsonObject,
                },
                None => IrParent::JsonObject,
            },
        };

        let properties = decl
            .properties
            .iter()
            .filter(|(raw, _)| !raw.starts_with('/'))
            .map(|(raw, prop)| self.property(raw, prop))
            .collect();

        let constants = if self.root_type(key, &mut HashSet::new()) == IrType::String {
            enum_constants(&decl.enum_values)
        } else {
            Vec::new()
        };

        let discriminator_value = match decl.discriminator_value.as_ref() {
            Some(serde_json::Value::String(value)) => Some(value.clone()),
            Some(other) => Some(other.to_string()),
            // Subtypes in a discriminated family default to their type name.
            None if self.discriminator_owner(key).is_some() => Some(key.to_string()),
            None => None,
        };

        IrModel {
            key: key.to_string(),
            name,
            description: decl.description.clone(),
            parent,
            properties,
            constants,
            discriminator: decl.discriminator.clone(),
            discriminator_value,
            generate_collection: self.registry.has_collection(key),
            ignored: annotation::enabled(&decl.annotations, names::GENERATOR_IGNORE).is_some(),
        }
    }

    fn property(&self, raw: &str, decl: &TypeDeclaration) -> IrProperty {
        let raw = raw.strip_suffix('?').unwrap_or(raw);
        let name = normalize_name(raw);
        let field = if is_identifier(raw) {
            raw.to_string()
        } else {
            name.camel_case.clone()
        };
        let getter = format!("get{}", upper_first(&field));

        let prop_type = match annotation::enabled(&decl.annotations, names::GENERATOR_TYPE)
            .and_then(|a| a.as_str())
        {
            Some(custom) => self.resolve_name(custom, &mut HashSet::new()),
            None => self.resolve_decl(decl, &mut HashSet::new()),
        };

        IrProperty {
            name,
            field,
            getter,
            prop_type,
            description: decl.description.clone(),
            ignore_strict: annotation::enabled(&decl.annotations, names::IGNORE_STRICT).is_some(),
        }
    }

    /// Type of an inline declaration (property, items, or type body).
    fn resolve_decl(&self, decl: &TypeDeclaration, seen: &mut HashSet<String>) -> IrType {
        match &decl.type_ref {
            Some(TypeRef::Name(name)) if name == "array" => self.resolve_items(decl, seen),
            Some(TypeRef::Name(name)) => self.resolve_name(name, seen),
            Some(TypeRef::Names(list)) => match list.as_slice() {
                [one] if one == "array" => self.resolve_items(decl, seen),
                [one] => self.resolve_name(one, seen),
                _ => IrType::Any,
            },
            Some(TypeRef::Inline(inner)) => self.resolve_decl(inner, seen),
            None if !decl.properties.is_empty() => IrType::Object,
            None if decl.items.is_some() => self.resolve_items(decl, seen),
            None => IrType::String,
        }
    }

    fn resolve_items(&self, decl: &TypeDeclaration, seen: &mut HashSet<String>) -> IrType {
        let item = match &decl.items {
            Some(ItemsRef::Name(name)) => Some(self.resolve_name(name, seen)),
            Some(ItemsRef::Inline(inner)) => Some(self.resolve_decl(inner, seen)),
            None => None,
        };
        IrType::Array(item.map(Box::new))
    }

    /// Type of a type expression: a builtin, `Item[]`, or a declared type.
    fn resolve_name(&self, name: &str, seen: &mut HashSet<String>) -> IrType {
        let name = name.trim();
        if let Some(item) = name.strip_suffix("[]") {
            return IrType::Array(Some(Box::new(self.resolve_name(item, seen))));
        }
        if name.contains('|') {
            return IrType::Any;
        }
        if let Some(ty) = builtin(name) {
            return ty;
        }
        let Some(decl) = self.declared.get(name) else {
            log::warn!("unknown type `{name}`, treating as untyped");
            return IrType::Any;
        };
        if !decl.properties.is_empty() || decl.discriminator.is_some() {
            return IrType::Ref(name.to_string());
        }
        if !seen.insert(name.to_string()) {
            return IrType::Ref(name.to_string());
        }
        // Aliases of scalars and arrays are used as their underlying type.
        match self.resolve_decl(decl, seen) {
            ty @ IrType::Array(_) => ty,
            ty if is_scalar(&ty) => ty,
            _ => IrType::Ref(name.to_string()),
        }
    }

    /// Builtin type a declared type ultimately derives from.
    fn root_type(&self, key: &str, seen: &mut HashSet<String>) -> IrType {
        let Some(decl) = self.declared.get(key) else {
            return builtin(key).unwrap_or(IrType::Any);
        };
        if !seen.insert(key.to_string()) {
            return IrType::Any;
        }
        match decl.type_ref.as_ref().and_then(TypeRef::single) {
            Some(supertype) => self.root_type(supertype, seen),
            None if !decl.properties.is_empty() => IrType::Object,
            None => IrType::String,
        }
    }

    /// Class of the nearest proper ancestor declaring a discriminator.
    fn discriminator_owner(&self, key: &str) -> Option<String> {
        let mut seen = HashSet::from([key.to_string()]);
        let mut current = self.declared.get(key)?;
        loop {
            let parent = current.type_ref.as_ref().and_then(TypeRef::single)?;
            if !seen.insert(parent.to_string()) {
                return None;
            }
            let decl = self.declared.get(parent)?;
            if decl.discriminator.is_some() {
                return self.registry.display_name(parent).map(str::to_string);
            }
            current = decl;
        }
    }
}

fn enum_constants(values: &[serde_json::Value]) -> Vec<IrEnumConstant> {
    let mut seen = HashSet::new();
    values
        .iter()
        .map(|value| match value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .filter_map(|value| {
            let name = php_constant_name(&value);
            if seen.insert(name.clone()) {
                Some(IrEnumConstant { name, value })
            } else {
                log::warn!("enum value `{value}` maps to duplicate constant {name}");
                None
            }
        })
        .collect()
}

fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
