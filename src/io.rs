//! Reading backend records and field schemas from text.
//!
//! Whatever the syntax, the document root must be an object: a record maps
//! field names to raw values, a schema maps keywords to definitions.

use anyhow::{Context, Result, bail};
use serde_json::{Map, Value};

/// Text syntaxes a record or schema can be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    #[cfg(feature = "yaml")]
    Yaml,
    #[cfg(feature = "toml")]
    Toml,
}

impl DocumentFormat {
    fn label(self) -> &'static str {
        match self {
            DocumentFormat::Json => "JSON",
            #[cfg(feature = "yaml")]
            DocumentFormat::Yaml => "YAML",
            #[cfg(feature = "toml")]
            DocumentFormat::Toml => "TOML",
        }
    }
}

/// Parses `contents` into the attribute map of a single object.
pub fn read_object(contents: &str, format: DocumentFormat) -> Result<Map<String, Value>> {
    let label = format.label();
    let value = match format {
        DocumentFormat::Json => serde_json::from_str::<Value>(contents)
            .with_context(|| format!("record is not valid {label}"))?,
        #[cfg(feature = "yaml")]
        DocumentFormat::Yaml => serde_yaml::from_str::<Value>(contents)
            .with_context(|| format!("record is not valid {label}"))?,
        // TOML documents are tables by construction.
        #[cfg(feature = "toml")]
        DocumentFormat::Toml => {
            let table = toml::from_str::<toml::Table>(contents)
                .with_context(|| format!("record is not valid {label}"))?;
            serde_json::to_value(table).context("TOML record has no JSON equivalent")?
        }
    };
    match value {
        Value::Object(attributes) => {
            tracing::trace!(format = label, attributes = attributes.len(), "object read");
            Ok(attributes)
        }
        other => bail!("{label} document must be an object, found {}", kind_of(&other)),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_nested_json_records() {
        let record = read_object(
            r#"{"invoiceId": 4, "customer": {"customerId": 56}}"#,
            DocumentFormat::Json,
        )
        .unwrap();
        assert_eq!(record["customer"]["customerId"], json!(56));
    }

    #[test]
    fn root_must_be_an_object() {
        let err = read_object("[1, 2]", DocumentFormat::Json).unwrap_err();
        assert_eq!(err.to_string(), "JSON document must be an object, found an array");
        let err = read_object("null", DocumentFormat::Json).unwrap_err();
        assert!(err.to_string().ends_with("found null"));
    }

    #[test]
    fn reports_malformed_json() {
        let err = read_object("{", DocumentFormat::Json).unwrap_err();
        assert_eq!(err.to_string(), "record is not valid JSON");
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn reads_yaml_records() {
        let raw = "invoiceId: 4\ncustomer:\n  customerId: 56";
        let record = read_object(raw, DocumentFormat::Yaml).unwrap();
        assert_eq!(record["customer"]["customerId"], json!(56));
    }

    #[cfg(feature = "toml")]
    #[test]
    fn reads_toml_records() {
        let raw = "invoiceId = 4\n[customer]\ncustomerId = 56";
        let record = read_object(raw, DocumentFormat::Toml).unwrap();
        assert_eq!(record["customer"]["customerId"], json!(56));
    }
}
