//! Building field sets from JSON Schema documents.
//!
//! Each top-level property becomes a field. Properties typed `object`, or
//! pointing elsewhere through `$ref`, become [`ObjectField`]s configured by the
//! `x-id-attribute`, `x-display`, `x-full-name`, `x-order` and
//! `x-display-template` extensions; every other extension lands in the field's
//! extras.

use anyhow::{Context, Result, bail};
use schemars::schema::{InstanceType, RootSchema, Schema, SchemaObject, SingleOrVec};
use serde_json::Value;

use crate::field::{
    Field, FieldModel, FieldOptions, FieldSet, ObjectField, ObjectFieldOptions,
};
use crate::io::{DocumentFormat, read_object};

const ID_ATTRIBUTE_KEY: &str = "x-id-attribute";
const DISPLAY_KEY: &str = "x-display";
const FULL_NAME_KEY: &str = "x-full-name";
const ORDER_KEY: &str = "x-order";
const DISPLAY_TEMPLATE_KEY: &str = "x-display-template";

const OBJECT_KEYS: [&str; 5] = [
    ID_ATTRIBUTE_KEY,
    DISPLAY_KEY,
    FULL_NAME_KEY,
    ORDER_KEY,
    DISPLAY_TEMPLATE_KEY,
];

/// Builds a [`FieldSet`] from the top-level properties of a JSON Schema.
pub fn field_set_from_schema(schema: &Value) -> Result<FieldSet> {
    let root: RootSchema = serde_json::from_value(schema.clone())
        .context("field definitions are not a JSON Schema")?;
    let Some(object) = root.schema.object.as_ref() else {
        bail!("root schema must declare object properties");
    };

    let mut set = FieldSet::new();
    for (name, property) in &object.properties {
        let field: Box<dyn FieldModel> = match property {
            Schema::Object(property) => build_field(name, property)
                .with_context(|| format!("failed to build field '{name}'"))?,
            Schema::Bool(_) => {
                tracing::debug!(field = %name, "boolean schema treated as a string field");
                Box::new(Field::new(FieldOptions::new(name.as_str()))?)
            }
        };
        set.insert_boxed(field)?;
    }
    tracing::debug!(fields = set.len(), "field set built from schema");
    Ok(set)
}

/// Parses `contents` in `format` and builds a [`FieldSet`] from it.
pub fn field_set_from_schema_str(contents: &str, format: DocumentFormat) -> Result<FieldSet> {
    let schema = read_object(contents, format).context("failed to read field schema")?;
    field_set_from_schema(&Value::Object(schema))
}

fn build_field(name: &str, schema: &SchemaObject) -> Result<Box<dyn FieldModel>> {
    let type_name = type_name(schema);
    let mut options = FieldOptions::new(name);
    if let Some(metadata) = schema.metadata.as_ref() {
        options.label = metadata.title.clone();
        options.value = metadata.default.clone();
    }

    if type_name == Some("object") {
        for (key, value) in &schema.extensions {
            if !OBJECT_KEYS.contains(&key.as_str()) {
                options = options.with_extra(key.as_str(), value.clone());
            }
        }
        let mut object = ObjectFieldOptions {
            field: options,
            ..ObjectFieldOptions::default()
        };
        object.id_attribute = extension(schema, ID_ATTRIBUTE_KEY);
        object.display = extension(schema, DISPLAY_KEY).map(Into::into);
        object.full_name = extension(schema, FULL_NAME_KEY);
        object.order = extension(schema, ORDER_KEY);
        object.display_template = extension(schema, DISPLAY_TEMPLATE_KEY);
        return Ok(Box::new(ObjectField::new(object)?));
    }

    for (key, value) in &schema.extensions {
        options = options.with_extra(key.as_str(), value.clone());
    }
    if let Some(type_name) = type_name {
        options = options.with_type(type_name);
    }
    Ok(Box::new(Field::new(options)?))
}

fn type_name(schema: &SchemaObject) -> Option<&'static str> {
    if schema.reference.is_some() {
        return Some("object");
    }
    if schema.format.as_deref() == Some("date") {
        return Some("date");
    }
    let instance = match schema.instance_type.as_ref()? {
        SingleOrVec::Single(instance) => **instance,
        SingleOrVec::Vec(instances) => instances
            .iter()
            .copied()
            .find(|instance| *instance != InstanceType::Null)?,
    };
    match instance {
        InstanceType::Object => Some("object"),
        InstanceType::Array => Some("array"),
        InstanceType::Boolean => Some("boolean"),
        InstanceType::Integer => Some("integer"),
        InstanceType::Number => Some("number"),
        InstanceType::String => Some("string"),
        InstanceType::Null => None,
    }
}

fn extension(schema: &SchemaObject, key: &str) -> Option<String> {
    schema
        .extensions
        .get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn invoice_schema() -> Value {
        json!({
            "definitions": {
                "product": {"type": "object", "properties": {"productId": {"type": "integer"}}}
            },
            "type": "object",
            "properties": {
                "invoiceId": {"type": "integer", "title": "Invoice"},
                "customer": {
                    "type": "object",
                    "x-id-attribute": "id",
                    "x-display": "name",
                    "x-display-template": "name, address.city",
                    "x-widget": "lookup"
                },
                "product": {"$ref": "#/definitions/product"},
                "issued": {"type": "string", "format": "date"},
                "paid": {"type": ["boolean", "null"], "default": false}
            }
        })
    }

    #[test]
    fn builds_fields_in_declaration_order() {
        let set = field_set_from_schema(&invoice_schema()).unwrap();
        assert_eq!(
            set.names().collect::<Vec<_>>(),
            vec!["invoiceId", "customer", "product", "issued", "paid"]
        );
        let types = set.iter().map(|f| f.type_name().to_string()).collect::<Vec<_>>();
        assert_eq!(types, vec!["integer", "object", "object", "date", "boolean"]);
        assert_eq!(set.get("invoiceId").unwrap().field().label(), "Invoice");
        assert_eq!(set.get("paid").unwrap().val(), &json!(false));
    }

    #[test]
    fn object_extensions_configure_object_fields() {
        let set = field_set_from_schema(&invoice_schema()).unwrap();
        let customer = set.get("customer").unwrap();
        assert_eq!(customer.from_raw(&json!({"id": 7})), json!("7"));
        assert_eq!(customer.to_raw(&json!("7")), json!({"id": 7}));
        assert_eq!(customer.field().extra("x-widget"), Some(&json!("lookup")));
        assert!(customer.field().extra(ID_ATTRIBUTE_KEY).is_none());

        let mut record = serde_json::Map::new();
        record.insert("customer".into(), json!({"id": 7, "name": "Ada"}));
        let mut set = set;
        set.load(&record);
        assert_eq!(set.display_values(&record)["customer"], "Ada");

        let product = set.get("product").unwrap();
        assert_eq!(product.to_raw(&json!("3")), json!({"productId": 3}));
    }

    #[test]
    fn rejects_schemas_without_properties() {
        let err = field_set_from_schema(&json!({"type": "string"})).unwrap_err();
        assert!(err.to_string().contains("root schema"));

        let err = field_set_from_schema(&json!({"properties": 3})).unwrap_err();
        assert_eq!(err.to_string(), "field definitions are not a JSON Schema");
    }

    #[test]
    fn parses_schema_documents() {
        let set = field_set_from_schema_str(
            r#"{"type": "object", "properties": {"amount": {"type": "number"}}}"#,
            DocumentFormat::Json,
        )
        .unwrap();
        assert_eq!(set.get("amount").unwrap().to_raw(&json!("15.5")), json!(15.5));

        let err = field_set_from_schema_str("[]", DocumentFormat::Json).unwrap_err();
        assert_eq!(err.to_string(), "failed to read field schema");
    }
}
