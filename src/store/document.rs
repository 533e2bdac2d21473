//! Dotted-path access over a YAML document.
//!
//! A key like `llm.ollama.model` is split on `.` and each segment indexes
//! one level of nested mappings. Empty segments are never valid.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_yaml::{Mapping, Value};

use crate::store::error::{LoadError, LookupError, StoreError};

/// Split a dotted key into segments. `None` if any segment is empty.
pub fn segments(key: &str) -> Option<Vec<&str>> {
    let parts: Vec<&str> = key.split('.').collect();
    if parts.iter().any(|part| part.is_empty()) {
        None
    } else {
        Some(parts)
    }
}

/// Walk `doc` along `key`, reporting whether the key is absent or an
/// intermediate value is not a mapping.
pub fn lookup<'a>(doc: &'a Value, key: &str) -> Result<&'a Value, LookupError> {
    let absent = || LookupError::Absent {
        key: key.to_string(),
    };
    let parts = segments(key).ok_or_else(absent)?;

    let mut current = doc;
    for (i, part) in parts.iter().enumerate() {
        let mapping = current.as_mapping().ok_or_else(|| LookupError::NotAMapping {
            key: key.to_string(),
            at: prefix(&parts[..i]),
        })?;
        current = mapping.get(*part).ok_or_else(absent)?;
    }
    Ok(current)
}

/// Forgiving lookup: absence and type mismatch both yield `default`.
pub fn get(doc: &Value, key: &str, default: Value) -> Value {
    lookup(doc, key).map(Clone::clone).unwrap_or(default)
}

/// Typed `get`. A present value that does not convert to `T` is treated as
/// not found.
pub fn get_as<T: DeserializeOwned>(doc: &Value, key: &str, default: T) -> T {
    match lookup(doc, key) {
        Ok(value) => T::deserialize(value).unwrap_or(default),
        Err(_) => default,
    }
}

/// Assign `value` at `key`, creating empty mappings for missing segments.
///
/// Fails with [`StoreError::TypeMismatch`] when an existing intermediate
/// value is not a mapping. Mappings are only ever created below the point
/// where a mismatch could be detected, so a failed `set` leaves `doc` as it
/// was.
pub fn set(doc: &mut Value, key: &str, value: Value) -> Result<(), StoreError> {
    let parts = segments(key).ok_or_else(|| StoreError::InvalidKey {
        key: key.to_string(),
    })?;
    let Some((last, parents)) = parts.split_last() else {
        return Err(StoreError::InvalidKey {
            key: key.to_string(),
        });
    };

    let mut current = doc;
    for (i, part) in parents.iter().enumerate() {
        current = current
            .as_mapping_mut()
            .ok_or_else(|| mismatch(key, &parts[..i]))?
            .entry(Value::String((*part).to_string()))
            .or_insert_with(|| Value::Mapping(Mapping::new()));
    }

    current
        .as_mapping_mut()
        .ok_or_else(|| mismatch(key, parents))?
        .insert(Value::String((*last).to_string()), value);
    Ok(())
}

/// Parse file contents into a document whose root is a mapping.
///
/// An empty file is an empty mapping.
pub fn parse(content: &str) -> Result<Value, LoadError> {
    let value: Value = serde_yaml::from_str(content)?;
    match value {
        Value::Mapping(_) => Ok(value),
        Value::Null => Ok(Value::Mapping(Mapping::new())),
        other => Err(LoadError::NotAMapping(kind(&other))),
    }
}

/// Short name of a value's shape, for error messages.
pub fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}

fn mismatch(key: &str, parents: &[&str]) -> StoreError {
    StoreError::TypeMismatch {
        key: key.to_string(),
        at: prefix(parents),
    }
}

fn prefix(parts: &[&str]) -> String {
    if parts.is_empty() {
        "<root>".to_string()
    } else {
        parts.join(".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(text: &str) -> Value {
        serde_yaml::from_str(text).unwrap()
    }

    #[test]
    fn test_get_nested_value() {
        let doc = yaml("api:\n  port: 8000\n  host: 0.0.0.0\n");
        assert_eq!(get(&doc, "api.port", Value::Null), yaml("8000"));
        assert_eq!(get(&doc, "api.host", Value::Null), yaml("0.0.0.0"));
    }

    #[test]
    fn test_get_missing_returns_default() {
        let doc = yaml("api:\n  port: 8000\n");
        let default = yaml("fallback");
        assert_eq!(get(&doc, "api.workers", default.clone()), default);
        assert_eq!(get(&doc, "llm.provider", default.clone()), default);
        assert_eq!(get(&doc, "", default.clone()), default);
        assert_eq!(get(&doc, "api..port", default.clone()), default);
    }

    #[test]
    fn test_get_through_scalar_returns_default() {
        let doc = yaml("api: 5\n");
        assert_eq!(get(&doc, "api.port", yaml("7")), yaml("7"));
    }

    #[test]
    fn test_get_as_converts_or_falls_back() {
        let doc = yaml("api:\n  port: 9001\n  host: h\n");
        assert_eq!(get_as(&doc, "api.port", 0u16), 9001);
        assert_eq!(get_as(&doc, "api.host", 0u16), 0);
        assert_eq!(get_as(&doc, "api.workers", 4u32), 4);
        assert_eq!(get_as(&doc, "api.host.x", "d".to_string()), "d");
    }

    #[test]
    fn test_get_explicit_null_is_found() {
        let doc = yaml("security:\n  api_key:\n");
        assert_eq!(get(&doc, "security.api_key", yaml("x")), Value::Null);
    }

    #[test]
    fn test_lookup_distinguishes_absent_and_mismatch() {
        let doc = yaml("api:\n  port: 8000\nllm: ollama\n");
        assert_eq!(
            lookup(&doc, "api.host"),
            Err(LookupError::Absent {
                key: "api.host".into()
            })
        );
        assert_eq!(
            lookup(&doc, "llm.provider.name"),
            Err(LookupError::NotAMapping {
                key: "llm.provider.name".into(),
                at: "llm".into()
            })
        );
    }

    #[test]
    fn test_set_creates_intermediate_mappings() {
        let mut doc = Value::Mapping(Mapping::new());
        set(&mut doc, "a.b.c", yaml("1")).unwrap();
        assert_eq!(doc, yaml("a:\n  b:\n    c: 1\n"));
    }

    #[test]
    fn test_set_overwrites_leaf() {
        let mut doc = yaml("api:\n  port: 8000\n  host: localhost\n");
        set(&mut doc, "api.port", yaml("9000")).unwrap();
        assert_eq!(doc, yaml("api:\n  port: 9000\n  host: localhost\n"));
    }

    #[test]
    fn test_set_replaces_mapping_leaf_with_scalar() {
        let mut doc = yaml("llm:\n  ollama:\n    model: x\n");
        set(&mut doc, "llm.ollama", yaml("off")).unwrap();
        assert_eq!(doc, yaml("llm:\n  ollama: off\n"));
    }

    #[test]
    fn test_set_through_scalar_fails_and_leaves_document() {
        let mut doc = yaml("api:\n  port: 8000\n");
        let before = doc.clone();
        let err = set(&mut doc, "api.port.inner", yaml("1")).unwrap_err();
        match err {
            StoreError::TypeMismatch { key, at } => {
                assert_eq!(key, "api.port.inner");
                assert_eq!(at, "api.port");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(doc, before);
    }

    #[test]
    fn test_set_rejects_empty_segments() {
        let mut doc = Value::Mapping(Mapping::new());
        assert!(matches!(
            set(&mut doc, "a..b", yaml("1")),
            Err(StoreError::InvalidKey { .. })
        ));
        assert!(matches!(
            set(&mut doc, "", yaml("1")),
            Err(StoreError::InvalidKey { .. })
        ));
        assert_eq!(doc, Value::Mapping(Mapping::new()));
    }

    #[test]
    fn test_set_then_get() {
        let mut doc = yaml("reports:\n  formats: [markdown]\n");
        set(&mut doc, "reports.syntax_highlighting", yaml("false")).unwrap();
        assert_eq!(
            get(&doc, "reports.syntax_highlighting", yaml("true")),
            yaml("false")
        );
        assert_eq!(get(&doc, "reports.formats", Value::Null), yaml("[markdown]"));
    }

    #[test]
    fn test_parse_requires_mapping_root() {
        assert!(matches!(parse("- a\n- b\n"), Err(LoadError::NotAMapping("sequence"))));
        assert!(matches!(parse("42\n"), Err(LoadError::NotAMapping("number"))));
        assert!(matches!(parse("api: [unclosed\n"), Err(LoadError::Parse(_))));
    }

    #[test]
    fn test_parse_empty_is_empty_mapping() {
        assert_eq!(parse("").unwrap(), Value::Mapping(Mapping::new()));
        assert_eq!(parse("# only a comment\n").unwrap(), Value::Mapping(Mapping::new()));
    }
}
