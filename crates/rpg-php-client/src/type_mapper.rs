use rpg_core::ir::{IrType, TypeRegistry};
use serde_json::Value;

/// How a model property is typed, hydrated and defaulted in PHP.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyMapping {
    /// Type used in `@return` doc blocks.
    pub doc_type: String,
    /// Return type declaration; `None` when the value is untyped.
    pub return_type: Option<String>,
    /// Expression converting the raw `$value`.
    pub hydrate: String,
    /// Expression returned when the raw value is missing.
    pub zero: String,
}

/// Resolved class of a referenced model.
struct ClassRef<'a> {
    class: &'a str,
    discriminated: bool,
}

fn class_ref<'a>(key: &str, registry: &'a TypeRegistry) -> Option<ClassRef<'a>> {
    let class = registry.display_name(key)?;
    Some(ClassRef {
        class,
        discriminated: registry.discriminator(class).is_some(),
    })
}

/// Map an `IrType` to its PHP getter representation.
pub fn map_property(ty: &IrType, registry: &TypeRegistry) -> PropertyMapping {
    let scalar = |php: &str, hydrate: &str, zero: &str| PropertyMapping {
        doc_type: php.to_string(),
        return_type: Some(php.to_string()),
        hydrate: hydrate.to_string(),
        zero: zero.to_string(),
    };

    match ty {
        IrType::String => scalar("string", "(string)$value", "''"),
        IrType::Boolean => scalar("bool", "(bool)$value", "false"),
        IrType::Integer => scalar("int", "(int)$value", "0"),
        IrType::Number => scalar("float", "(float)$value", "0.0"),
        IrType::DateTime => scalar(
            "\\DateTimeImmutable",
            "new \\DateTimeImmutable($value)",
            "new \\DateTimeImmutable()",
        ),
        IrType::Object => scalar("array", "$value", "[]"),
        IrType::Array(item) => map_array(item.as_deref(), registry),
        IrType::Ref(key) => match class_ref(key, registry) {
            Some(ClassRef {
                class,
                discriminated,
            }) => {
                let target = if discriminated {
                    format!("{class}::resolveDiscriminatorClass($value)")
                } else {
                    format!("{class}::class")
                };
                PropertyMapping {
                    doc_type: class.to_string(),
                    return_type: Some(class.to_string()),
                    hydrate: format!("Mapper::map($value, {target})"),
                    zero: format!("Mapper::map([], {class}::class)"),
                }
            }
            None => untyped(),
        },
        IrType::Any => untyped(),
    }
}

fn map_array(item: Option<&IrType>, registry: &TypeRegistry) -> PropertyMapping {
    if let Some(IrType::Ref(key)) = item {
        if let Some(class) = registry
            .has_collection(key)
            .then(|| registry.display_name(key))
            .flatten()
        {
            let collection = format!("{class}Collection");
            return PropertyMapping {
                doc_type: collection.clone(),
                return_type: Some(collection.clone()),
                hydrate: format!("Mapper::map($value, {collection}::class)"),
                zero: format!("Mapper::map([], {collection}::class)"),
            };
        }
    }

    let doc_type = match item {
        Some(inner) => format!("{}[]", doc_type(inner, registry)),
        None => "array".to_string(),
    };
    PropertyMapping {
        doc_type,
        return_type: Some("array".to_string()),
        hydrate: "$value".to_string(),
        zero: "[]".to_string(),
    }
}

fn doc_type(ty: &IrType, registry: &TypeRegistry) -> String {
    match ty {
        IrType::Array(Some(inner)) => format!("{}[]", doc_type(inner, registry)),
        _ => map_property(ty, registry).doc_type,
    }
}

fn untyped() -> PropertyMapping {
    PropertyMapping {
        doc_type: "mixed".to_string(),
        return_type: None,
        hydrate: "$value".to_string(),
        zero: "[]".to_string(),
    }
}

/// Single-quoted PHP string literal.
pub fn php_string(s: &str) -> String {
    format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'"))
}

/// PHP literal for a JSON value (`null`, scalars, short array syntax).
pub fn php_literal(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => php_string(s),
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(php_literal).collect();
            format!("[{}]", items.join(", "))
        }
        Value::Object(map) => {
            let entries: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{} => {}", php_string(k), php_literal(v)))
                .collect();
            format!("[{}]", entries.join(", "))
        }
    }
}

/// Associative PHP array literal from string keys and pre-rendered values.
pub fn php_map<'a>(entries: impl IntoIterator<Item = (&'a str, String)>) -> String {
    let entries: Vec<String> = entries
        .into_iter()
        .map(|(k, v)| format!("{} => {v}", php_string(k)))
        .collect();
    format!("[{}]", entries.join(", "))
}

/// List PHP array literal of strings.
pub fn php_list<'a>(items: impl IntoIterator<Item = &'a str>) -> String {
    let items: Vec<String> = items.into_iter().map(php_string).collect();
    format!("[{}]", items.join(", "))
}

/// Whether `name` can be used verbatim as a PHP property or variable name.
pub fn is_php_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c == '_' || c.is_ascii_alphabetic())
        && chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> TypeRegistry {
        let mut registry = TypeRegistry::new();
        registry.insert_type("Animal", "Animal");
        registry.mark_collection("Animal");
        registry.insert_discriminator("Animal", "kind");
        registry.insert_variant("Animal", "cat", "Cat");
        registry.insert_type("owner", "Owner");
        registry
    }

    #[test]
    fn test_scalars() {
        let reg = registry();
        let string = map_property(&IrType::String, &reg);
        assert_eq!(string.return_type.as_deref(), Some("string"));
        assert_eq!(string.hydrate, "(string)$value");
        assert_eq!(string.zero, "''");

        assert_eq!(map_property(&IrType::Boolean, &reg).zero, "false");
        assert_eq!(map_property(&IrType::Integer, &reg).hydrate, "(int)$value");
        assert_eq!(map_property(&IrType::Number, &reg).zero, "0.0");

        let date = map_property(&IrType::DateTime, &reg);
        assert_eq!(date.return_type.as_deref(), Some("\\DateTimeImmutable"));
        assert_eq!(date.hydrate, "new \\DateTimeImmutable($value)");
    }

    #[test]
    fn test_refs() {
        let reg = registry();
        let owner = map_property(&IrType::Ref("owner".into()), &reg);
        assert_eq!(owner.return_type.as_deref(), Some("Owner"));
        assert_eq!(owner.hydrate, "Mapper::map($value, Owner::class)");
        assert_eq!(owner.zero, "Mapper::map([], Owner::class)");

        let animal = map_property(&IrType::Ref("Animal".into()), &reg);
        assert_eq!(
            animal.hydrate,
            "Mapper::map($value, Animal::resolveDiscriminatorClass($value))"
        );

        let unknown = map_property(&IrType::Ref("Missing".into()), &reg);
        assert_eq!(unknown.return_type, None);
        assert_eq!(unknown.doc_type, "mixed");
        assert_eq!(unknown.zero, "[]");
    }

    #[test]
    fn test_untyped() {
        let any = map_property(&IrType::Any, &registry());
        assert_eq!(any.doc_type, "mixed");
        assert_eq!(any.return_type, None);
        assert_eq!(any.hydrate, "$value");
        assert_eq!(any.zero, "[]");
    }

    #[test]
    fn test_arrays() {
        let reg = registry();
        let animals = map_property(
            &IrType::Array(Some(Box::new(IrType::Ref("Animal".into())))),
            &reg,
        );
        assert_eq!(animals.return_type.as_deref(), Some("AnimalCollection"));
        assert_eq!(
            animals.hydrate,
            "Mapper::map($value, AnimalCollection::class)"
        );

        let owners = map_property(
            &IrType::Array(Some(Box::new(IrType::Ref("owner".into())))),
            &reg,
        );
        assert_eq!(owners.return_type.as_deref(), Some("array"));
        assert_eq!(owners.doc_type, "Owner[]");
        assert_eq!(owners.hydrate, "$value");

        let nested = map_property(
            &IrType::Array(Some(Box::new(IrType::Array(Some(Box::new(IrType::String)))))),
            &reg,
        );
        assert_eq!(nested.doc_type, "string[][]");
        assert_eq!(map_property(&IrType::Array(None), &reg).doc_type, "array");
    }

    #[test]
    fn test_literals() {
        assert_eq!(php_string("it's"), "'it\\'s'");
        assert_eq!(php_string("a\\b"), "'a\\\\b'");
        assert_eq!(php_literal(&serde_json::json!(null)), "null");
        assert_eq!(php_literal(&serde_json::json!(20)), "20");
        assert_eq!(php_literal(&serde_json::json!(true)), "true");
        assert_eq!(
            php_literal(&serde_json::json!({"a": [1, "x"]})),
            "['a' => [1, 'x']]"
        );
        assert_eq!(php_map([("variable", "$variable".to_string())]), "['variable' => $variable]");
        assert_eq!(php_list(["oauth_2_0"]), "['oauth_2_0']");
        assert_eq!(php_list(std::iter::empty::<&str>()), "[]");
    }

    #[test]
    fn test_identifiers() {
        assert!(is_php_identifier("goodBoy"));
        assert!(is_php_identifier("_id"));
        assert!(!is_php_identifier("page-size"));
        assert!(!is_php_identifier("1st"));
        assert!(!is_php_identifier(""));
    }
}
