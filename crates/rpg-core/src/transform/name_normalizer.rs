use heck::{ToKebabCase, ToLowerCamelCase, ToPascalCase, ToShoutySnakeCase};

use crate::ir::NormalizedName;

/// PHP reserved words. Class, constant and (for readability) method names
/// must not collide with these.
const PHP_KEYWORDS: &[&str] = &[
    "__halt_compiler",
    "abstract",
    "and",
    "array",
    "as",
    "break",
    "callable",
    "case",
    "catch",
    "class",
    "clone",
    "const",
    "continue",
    "declare",
    "default",
    "die",
    "do",
    "echo",
    "else",
    "elseif",
    "empty",
    "enddeclare",
    "endfor",
    "endforeach",
    "endif",
    "endswitch",
    "endwhile",
    "eval",
    "exit",
    "extends",
    "final",
    "finally",
    "fn",
    "for",
    "foreach",
    "function",
    "global",
    "goto",
    "if",
    "implements",
    "include",
    "include_once",
    "instanceof",
    "insteadof",
    "interface",
    "isset",
    "list",
    "match",
    "namespace",
    "new",
    "or",
    "print",
    "private",
    "protected",
    "public",
    "readonly",
    "require",
    "require_once",
    "return",
    "static",
    "switch",
    "throw",
    "trait",
    "try",
    "unset",
    "use",
    "var",
    "while",
    "xor",
    "yield",
];

/// Create a `NormalizedName` from an arbitrary string, computing all casing variants.
pub fn normalize_name(name: &str) -> NormalizedName {
    // Handle names that start with numbers or contain special chars
    let sanitized = sanitize_identifier(name);

    NormalizedName {
        original: name.to_string(),
        pascal_case: sanitized.to_pascal_case(),
        camel_case: sanitized.to_lower_camel_case(),
        param_case: sanitized.to_kebab_case(),
    }
}

/// Whether `word` is a PHP reserved word (case-insensitive, like PHP).
pub fn is_php_keyword(word: &str) -> bool {
    let lower = word.to_ascii_lowercase();
    PHP_KEYWORDS.contains(&lower.as_str())
}

/// Method name for a zero-argument accessor: reserved words get a `_` prefix.
pub fn php_method_name(camel: &str) -> String {
    if is_php_keyword(camel) {
        format!("_{camel}")
    } else {
        camel.to_string()
    }
}

/// Variable name (without `$`); `$this` cannot be assigned.
pub fn php_variable_name(camel: &str) -> String {
    if camel == "this" {
        "thisParam".to_string()
    } else {
        camel.to_string()
    }
}

/// Class name safe to declare: reserved words get a `Resource` suffix.
pub fn php_class_name(pascal: &str) -> String {
    if is_php_keyword(pascal) {
        format!("{pascal}Resource")
    } else {
        pascal.to_string()
    }
}

/// Constant name for an enum value (`in-progress` → `IN_PROGRESS`).
pub fn php_constant_name(value: &str) -> String {
    let name = sanitize_identifier(value).to_shouty_snake_case();
    if name.is_empty() || name.starts_with(|c: char| c.is_ascii_digit()) || is_php_keyword(&name)
    {
        format!("VALUE_{name}")
    } else {
        name
    }
}

/// Split a relative URI before every `/` and `.` outside of placeholders.
///
/// `/bounce/url` → `["/bounce", "/url"]`, `/static.json` → `["/static", ".json"]`.
pub fn split_segments(uri: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut start = 0;
    let mut depth = 0usize;

    for (i, ch) in uri.char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            '/' | '.' if depth == 0 && i > start => {
                segments.push(&uri[start..i]);
                start = i;
            }
            _ => {}
        }
    }

    if start < uri.len() {
        segments.push(&uri[start..]);
    }

    segments
}

/// Placeholder names in order of appearance (`/{a}{b}` → `["a", "b"]`).
pub fn placeholders(segment: &str) -> Vec<&str> {
    let mut names = Vec::new();
    let mut rest = segment;
    while let Some(open) = rest.find('{') {
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => {
                names.push(&after[..close]);
                rest = &after[close + 1..];
            }
            None => break,
        }
    }
    names
}

/// Accessor name derived from a URI segment.
///
/// The leading separator and all placeholders are dropped; when nothing is
/// left, the last placeholder names the accessor. `mediaTypeExtension` is
/// shortened to `mediaType`.
pub fn segment_name(segment: &str) -> NormalizedName {
    let trimmed = segment.trim_start_matches(['/', '.']);
    let mut literal = String::with_capacity(trimmed.len());
    let mut depth = 0usize;
    for ch in trimmed.chars() {
        match ch {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            _ if depth == 0 => literal.push(ch),
            _ => {}
        }
    }

    if literal.chars().any(char::is_alphanumeric) {
        return normalize_name(&literal);
    }

    let name = match placeholders(trimmed).last() {
        Some(&"mediaTypeExtension") => "mediaType",
        Some(name) => name,
        None => trimmed,
    };
    normalize_name(name)
}

/// Sanitize a string to be a valid identifier.
fn sanitize_identifier(name: &str) -> String {
    let mut result = String::with_capacity(name.len());
    let mut prev_was_separator = false;

    for (i, ch) in name.chars().enumerate() {
        if ch.is_alphanumeric() {
            if i == 0 && ch.is_ascii_digit() {
                result.push('_');
            }
            if prev_was_separator && !result.is_empty() {
                result.push('_');
            }
            result.push(ch);
            prev_was_separator = false;
        } else {
            prev_was_separator = true;
        }
    }

    if result.is_empty() {
        return "unnamed".to_string();
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_name() {
        let n = normalize_name("listModels");
        assert_eq!(n.pascal_case, "ListModels");
        assert_eq!(n.camel_case, "listModels");
        assert_eq!(n.param_case, "list-models");
    }

    #[test]
    fn test_kebab_case() {
        let n = normalize_name("url-encoded");
        assert_eq!(n.pascal_case, "UrlEncoded");
        assert_eq!(n.camel_case, "urlEncoded");
    }

    #[test]
    fn test_title() {
        let n = normalize_name("Example API");
        assert_eq!(n.pascal_case, "ExampleApi");
        assert_eq!(n.param_case, "example-api");
    }

    #[test]
    fn test_keywords() {
        assert!(is_php_keyword("static"));
        assert!(is_php_keyword("List"));
        assert!(!is_php_keyword("bounce"));
        assert_eq!(php_method_name("static"), "_static");
        assert_eq!(php_method_name("url"), "url");
        assert_eq!(php_class_name("List"), "ListResource");
        assert_eq!(php_variable_name("this"), "thisParam");
        assert_eq!(php_variable_name("id"), "id");
        assert_eq!(php_class_name("BounceUrl"), "BounceUrl");
    }

    #[test]
    fn test_constant_name() {
        assert_eq!(php_constant_name("in-progress"), "IN_PROGRESS");
        assert_eq!(php_constant_name("available"), "AVAILABLE");
        assert_eq!(php_constant_name("3d"), "VALUE_3D");
    }

    #[test]
    fn test_split_segments() {
        assert_eq!(split_segments("/bounce/url"), vec!["/bounce", "/url"]);
        assert_eq!(split_segments("/static.json"), vec!["/static", ".json"]);
        assert_eq!(split_segments("/{variable}"), vec!["/{variable}"]);
        assert_eq!(
            split_segments("/basic{mediaTypeExtension}"),
            vec!["/basic{mediaTypeExtension}"]
        );
        assert_eq!(split_segments("/{file.ext}/x"), vec!["/{file.ext}", "/x"]);
        assert!(split_segments("").is_empty());
    }

    #[test]
    fn test_placeholders() {
        assert_eq!(placeholders("/{one}{two}{three}"), vec!["one", "two", "three"]);
        assert!(placeholders("/url").is_empty());
    }

    #[test]
    fn test_segment_name() {
        assert_eq!(segment_name("/url").camel_case, "url");
        assert_eq!(segment_name("/url-encoded").camel_case, "urlEncoded");
        assert_eq!(segment_name(".json").camel_case, "json");
        assert_eq!(segment_name("/{variable}").camel_case, "variable");
        assert_eq!(segment_name("/{one}{two}{three}").camel_case, "three");
        assert_eq!(segment_name("/basic{mediaTypeExtension}").camel_case, "basic");
        assert_eq!(segment_name("{mediaTypeExtension}").camel_case, "mediaType");
    }
}
