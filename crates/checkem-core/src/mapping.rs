//! Mapping declarations and mapping file names.
//!
//! A mapping document is a flat JSON object from field key to one of:
//!
//! - a string, the target schema field (`""` means deliberately unmapped);
//! - `[NestType, { "Name": .., "Type": "a, b", "<field>": "<property>", .. }]`,
//!   a nesting declaration validated against the custom nest `NestType`.
//!
//! Values are classified once, here, so the rule engine matches over a
//! closed set of shapes.

use std::collections::BTreeMap;
use std::path::Path;

use serde_json::{Map, Value};

use crate::catalogs::{CONTROL_NAME, CONTROL_TYPE, FILE_NAME_DELIMITER};
use crate::error::{CheckError, Result};

/// Classified right-hand side of one mapping entry.
#[derive(Debug, Clone, PartialEq)]
pub enum MappingValue {
    Leaf(String),
    Nesting(Nesting),
    MalformedNesting(NestingDefect),
    Unknown,
}

/// Why an array value is not a usable nesting declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NestingDefect {
    MissingType,
    MissingMappings,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Nesting {
    pub type_name: String,
    pub entries: BTreeMap<String, NestingEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NestingEntry {
    Name,
    /// `None` when the value is not a string.
    Type(Option<String>),
    /// Target nested property; `None` when the value is not a string.
    Field(Option<String>),
}

impl MappingValue {
    pub fn classify(value: &Value) -> Self {
        match value {
            Value::String(target) => MappingValue::Leaf(target.clone()),
            Value::Array(items) => classify_nesting(items),
            _ => MappingValue::Unknown,
        }
    }
}

fn classify_nesting(items: &[Value]) -> MappingValue {
    let Some(type_name) = items.first().and_then(Value::as_str) else {
        return MappingValue::MalformedNesting(NestingDefect::MissingType);
    };
    let Some(properties) = items.get(1).and_then(Value::as_object) else {
        return MappingValue::MalformedNesting(NestingDefect::MissingMappings);
    };
    MappingValue::Nesting(Nesting {
        type_name: type_name.to_string(),
        entries: classify_entries(properties),
    })
}

fn classify_entries(properties: &Map<String, Value>) -> BTreeMap<String, NestingEntry> {
    properties
        .iter()
        .map(|(key, value)| {
            let entry = match key.as_str() {
                CONTROL_NAME => NestingEntry::Name,
                CONTROL_TYPE => NestingEntry::Type(value.as_str().map(str::to_string)),
                _ => NestingEntry::Field(value.as_str().map(str::to_string)),
            };
            (key.clone(), entry)
        })
        .collect()
}

/// A parsed mapping file, keys in sorted order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MappingDeclaration {
    entries: BTreeMap<String, MappingValue>,
}

impl MappingDeclaration {
    pub fn parse(content: &[u8], path: &Path) -> Result<Self> {
        let value: Value = serde_json::from_slice(content).map_err(|e| CheckError::json(path, e))?;
        Self::from_value(&value, path)
    }

    pub fn from_value(value: &Value, path: &Path) -> Result<Self> {
        let object = value.as_object().ok_or_else(|| CheckError::InvalidMapping {
            path: path.to_path_buf(),
            reason: "expected an object of field mappings".into(),
        })?;
        Ok(Self {
            entries: object
                .iter()
                .map(|(key, value)| (key.clone(), MappingValue::classify(value)))
                .collect(),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MappingValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Board, resource and class encoded in a mapping file name.
///
/// `<board>_<resource>_<class...>_<suffix>`: the second token is the raw
/// resource token, everything between it and the last token is the class.
/// The resource type is the raw token without the active prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingFileName {
    pub board: String,
    pub raw_resource: String,
    pub resource: String,
    pub class: String,
}

impl MappingFileName {
    pub fn parse(file_name: &str, active_prefix: &str) -> Result<Self> {
        let tokens: Vec<&str> = file_name.split(FILE_NAME_DELIMITER).collect();
        if tokens.len() < 3 || tokens[1].is_empty() {
            return Err(CheckError::FileName(file_name.to_string()));
        }
        let raw_resource = tokens[1];
        let resource = raw_resource
            .strip_prefix(active_prefix)
            .unwrap_or(raw_resource);
        Ok(Self {
            board: tokens[0].to_string(),
            raw_resource: raw_resource.to_string(),
            resource: resource.to_string(),
            class: tokens[2..tokens.len() - 1].join("_"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn classify_shapes() {
        assert_eq!(
            MappingValue::classify(&json!("Price")),
            MappingValue::Leaf("Price".into())
        );
        assert_eq!(MappingValue::classify(&json!(12)), MappingValue::Unknown);
        assert_eq!(MappingValue::classify(&json!({"a": 1})), MappingValue::Unknown);
        assert_eq!(MappingValue::classify(&Value::Null), MappingValue::Unknown);
    }

    #[test]
    fn classify_nesting_entries() {
        let value = json!(["PhotoNest", {"Name": "x", "Type": "string", "photos": "Url", "bad": 4}]);
        let MappingValue::Nesting(nesting) = MappingValue::classify(&value) else {
            panic!("expected nesting");
        };
        assert_eq!(nesting.type_name, "PhotoNest");
        let entries: Vec<(&str, &NestingEntry)> =
            nesting.entries.iter().map(|(k, v)| (k.as_str(), v)).collect();
        assert_eq!(
            entries,
            vec![
                ("Name", &NestingEntry::Name),
                ("Type", &NestingEntry::Type(Some("string".into()))),
                ("bad", &NestingEntry::Field(None)),
                ("photos", &NestingEntry::Field(Some("Url".into()))),
            ]
        );
    }

    #[test]
    fn classify_malformed_nesting() {
        assert_eq!(
            MappingValue::classify(&json!([3, {}])),
            MappingValue::MalformedNesting(NestingDefect::MissingType)
        );
        assert_eq!(
            MappingValue::classify(&json!([])),
            MappingValue::MalformedNesting(NestingDefect::MissingType)
        );
        assert_eq!(
            MappingValue::classify(&json!(["PhotoNest"])),
            MappingValue::MalformedNesting(NestingDefect::MissingMappings)
        );
        assert_eq!(
            MappingValue::classify(&json!(["PhotoNest", "Url"])),
            MappingValue::MalformedNesting(NestingDefect::MissingMappings)
        );
    }

    #[test]
    fn declaration_keys_are_sorted() {
        let decl = MappingDeclaration::parse(
            br#"{"zeta": "Z", "alpha": "A", "mid": ""}"#,
            Path::new("m.json"),
        )
        .unwrap();
        let keys: Vec<&str> = decl.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn declaration_must_be_object() {
        let err = MappingDeclaration::parse(b"[1, 2]", Path::new("m.json")).unwrap_err();
        assert!(matches!(err, CheckError::InvalidMapping { .. }));
        let err = MappingDeclaration::parse(b"{", Path::new("m.json")).unwrap_err();
        assert!(matches!(err, CheckError::Json { .. }));
    }

    #[test]
    fn file_name_with_active_prefix() {
        let name = MappingFileName::parse("acme_activeproperty_residential_mapping.json", "active")
            .unwrap();
        assert_eq!(
            name,
            MappingFileName {
                board: "acme".into(),
                raw_resource: "activeproperty".into(),
                resource: "property".into(),
                class: "residential".into(),
            }
        );
    }

    #[test]
    fn file_name_multi_token_class() {
        let name =
            MappingFileName::parse("acme_agent_active_member_mapping.json", "active").unwrap();
        assert_eq!(name.resource, "agent");
        assert_eq!(name.class, "active_member");
    }

    #[test]
    fn file_name_empty_class() {
        let name = MappingFileName::parse("acme_office_mapping.json", "active").unwrap();
        assert_eq!(name.resource, "office");
        assert_eq!(name.class, "");
    }

    #[test]
    fn file_name_too_short() {
        assert!(MappingFileName::parse("acme_office.json", "active").is_err());
        assert!(MappingFileName::parse("mapping.json", "active").is_err());
        assert!(MappingFileName::parse("acme__x_mapping.json", "active").is_err());
    }
}
