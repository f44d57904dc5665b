use std::{fmt, sync::Arc};

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use super::ObjectField;

/// Callable used by [`ObjectField`] to turn its nested object into display text.
///
/// Arguments are the nested object (absent when the field holds no value), the
/// attributes of the owning record, and the field itself.
pub type DisplayFn =
    Arc<dyn Fn(Option<&Value>, &Map<String, Value>, &ObjectField) -> String + Send + Sync>;

/// How an [`ObjectField`] derives its display text.
#[derive(Clone)]
pub enum DisplaySpec {
    /// Show this attribute of the nested object.
    Attribute(String),
    Computed(DisplayFn),
}

impl DisplaySpec {
    pub fn computed<F>(f: F) -> Self
    where
        F: Fn(Option<&Value>, &Map<String, Value>, &ObjectField) -> String + Send + Sync + 'static,
    {
        DisplaySpec::Computed(Arc::new(f))
    }
}

impl fmt::Debug for DisplaySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplaySpec::Attribute(name) => f.debug_tuple("Attribute").field(name).finish(),
            DisplaySpec::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

impl From<&str> for DisplaySpec {
    fn from(value: &str) -> Self {
        DisplaySpec::Attribute(value.to_string())
    }
}

impl From<String> for DisplaySpec {
    fn from(value: String) -> Self {
        DisplaySpec::Attribute(value)
    }
}

impl<'de> Deserialize<'de> for DisplaySpec {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(DisplaySpec::Attribute)
    }
}

/// Options bag accepted by [`Field`](super::Field).
///
/// Unknown keys are kept in `extras` so callers can carry their own settings
/// alongside the recognised ones.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldOptions {
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "type")]
    pub type_name: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub value: Option<Value>,
    #[serde(flatten)]
    pub extras: IndexMap<String, Value>,
}

impl FieldOptions {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_type(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extras.insert(key.into(), value);
        self
    }
}

/// Options bag accepted by [`ObjectField`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectFieldOptions {
    #[serde(flatten)]
    pub field: FieldOptions,
    #[serde(default)]
    pub id_attribute: Option<String>,
    #[serde(default)]
    pub display: Option<DisplaySpec>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub order: Option<String>,
    #[serde(default)]
    pub display_template: Option<String>,
}

impl ObjectFieldOptions {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            field: FieldOptions::new(name),
            ..Self::default()
        }
    }

    pub fn with_type(mut self, type_name: impl Into<String>) -> Self {
        self.field = self.field.with_type(type_name);
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.field = self.field.with_label(label);
        self
    }

    pub fn with_value(mut self, value: Value) -> Self {
        self.field = self.field.with_value(value);
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.field = self.field.with_extra(key, value);
        self
    }

    pub fn with_id_attribute(mut self, id_attribute: impl Into<String>) -> Self {
        self.id_attribute = Some(id_attribute.into());
        self
    }

    pub fn with_display(mut self, display: impl Into<DisplaySpec>) -> Self {
        self.display = Some(display.into());
        self
    }

    pub fn with_display_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(Option<&Value>, &Map<String, Value>, &ObjectField) -> String + Send + Sync + 'static,
    {
        self.display = Some(DisplaySpec::computed(f));
        self
    }

    pub fn with_full_name(mut self, full_name: impl Into<String>) -> Self {
        self.full_name = Some(full_name.into());
        self
    }

    pub fn with_order(mut self, order: impl Into<String>) -> Self {
        self.order = Some(order.into());
        self
    }

    pub fn with_display_template(mut self, template: impl Into<String>) -> Self {
        self.display_template = Some(template.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn object_options_deserialize_from_camel_case_bag() {
        let options: ObjectFieldOptions = serde_json::from_value(json!({
            "name": "customer",
            "idAttribute": "id",
            "display": "name",
            "fullName": "customer.id",
            "displayTemplate": "name",
            "placeholder": "Pick a customer"
        }))
        .unwrap();
        assert_eq!(options.field.name, "customer");
        assert_eq!(options.id_attribute.as_deref(), Some("id"));
        assert!(matches!(options.display, Some(DisplaySpec::Attribute(ref attr)) if attr == "name"));
        assert_eq!(options.full_name.as_deref(), Some("customer.id"));
        assert_eq!(options.display_template.as_deref(), Some("name"));
        assert_eq!(
            options.field.extras.get("placeholder"),
            Some(&json!("Pick a customer"))
        );
        assert!(!options.field.extras.contains_key("idAttribute"));
    }

    #[test]
    fn field_options_read_type_key() {
        let options: FieldOptions =
            serde_json::from_value(json!({"name": "amount", "type": "number"})).unwrap();
        assert_eq!(options.type_name.as_deref(), Some("number"));
        assert!(options.extras.is_empty());
    }
}
