use std::{fmt, sync::Arc};

use serde_json::{Map, Value};

use crate::convert::{is_numeric, is_truthy, to_number, value_to_string};

use super::{DisplayFn, DisplaySpec, Field, FieldError, FieldModel, ObjectFieldOptions};

pub const OBJECT_TYPE: &str = "object";

/// A field whose raw value is a nested object referenced by a foreign id.
///
/// The formatted value is the id as a string; the raw value is the nested
/// object (or `null`). Given an invoice record
///
/// ```json
/// { "invoiceId": 4, "customer": { "customerId": 56, "name": "John Palmer" } }
/// ```
///
/// an `ObjectField` named `customer` formats to `"56"` and converts `"56"` back
/// into `{ "customerId": 56 }`.
#[derive(Clone)]
pub struct ObjectField {
    base: Field,
    id_attribute: String,
    display: DisplayFn,
    full_name: String,
    order: String,
    display_template: Option<String>,
}

impl ObjectField {
    pub fn new(options: ObjectFieldOptions) -> Result<Self, FieldError> {
        let mut base = Field::configure(&options.field);
        base.add_supported_type(OBJECT_TYPE);
        if base.type_name().is_empty() {
            base.set_type_name(OBJECT_TYPE);
        }

        let name = base.name().to_string();
        let id_attribute = options
            .id_attribute
            .clone()
            .filter(|attr| !attr.is_empty())
            .unwrap_or_else(|| format!("{name}Id"));

        let display = match options.display.clone() {
            Some(DisplaySpec::Computed(display)) => display,
            Some(DisplaySpec::Attribute(attr)) if !attr.is_empty() => attribute_display(attr),
            _ => attribute_display(id_attribute.clone()),
        };

        let full_name = match options.full_name.as_deref() {
            Some(full_name) if !full_name.is_empty() => qualify(&name, full_name.trim()),
            _ => format!("{name}.{id_attribute}"),
        };

        let mut field = ObjectField {
            base,
            id_attribute,
            display,
            full_name,
            order: String::new(),
            display_template: options.display_template.clone(),
        };

        let order = options
            .order
            .clone()
            .filter(|order| !order.trim().is_empty())
            .or_else(|| field.display_template.clone());
        field.order = field.set_order(order.as_deref());

        field.initialize(&options.field)?;
        Ok(field)
    }

    pub fn id_attribute(&self) -> &str {
        &self.id_attribute
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn order(&self) -> &str {
        &self.order
    }

    pub fn display_template(&self) -> Option<&str> {
        self.display_template.as_deref()
    }

    /// Sort keys of [`ObjectField::order`], one per expression.
    pub fn order_keys(&self) -> impl Iterator<Item = &str> {
        self.order.split(',').filter(|key| !key.is_empty())
    }

    /// Qualifies a comma-separated list of sort expressions with this field's name.
    ///
    /// Bare expressions become `name.expr`; expressions that already contain a
    /// dot are kept. Parts are trimmed and order is preserved.
    pub fn set_order(&self, order: Option<&str>) -> String {
        let Some(order) = order.filter(|order| !order.is_empty()) else {
            return String::new();
        };
        order
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| qualify(self.base.name(), part))
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Runs the display callable against `object`.
    pub fn display(&self, object: Option<&Value>, attributes: &Map<String, Value>) -> String {
        (self.display)(object, attributes, self)
    }

    /// The current value reduced to its id attribute.
    ///
    /// `{ "id": 123, "name": "x" }` with `id_attribute = "id"` yields `{ "id": 123 }`.
    pub fn only_id(&self) -> Value {
        let mut picked = Map::new();
        if let Some(id) = self.base.val().get(&self.id_attribute) {
            picked.insert(self.id_attribute.clone(), id.clone());
        }
        Value::Object(picked)
    }
}

impl FieldModel for ObjectField {
    fn field(&self) -> &Field {
        &self.base
    }

    fn field_mut(&mut self) -> &mut Field {
        &mut self.base
    }

    /// Nested objects default to `null`; other types use the base defaults.
    fn default_value(&self, type_name: &str) -> Value {
        if type_name.eq_ignore_ascii_case(OBJECT_TYPE) {
            return Value::Null;
        }
        self.base.default_value(type_name)
    }

    fn from_raw(&self, raw: &Value) -> Value {
        match raw.get(&self.id_attribute) {
            None | Some(Value::Null) => {
                tracing::debug!(
                    field = %self.base.name(),
                    id_attribute = %self.id_attribute,
                    "nested object has no id"
                );
                Value::String(String::new())
            }
            Some(id) => Value::String(value_to_string(id)),
        }
    }

    fn to_raw(&self, formatted: &Value) -> Value {
        if !is_truthy(formatted) || !is_numeric(formatted) {
            tracing::debug!(field = %self.base.name(), %formatted, "no numeric id to embed");
            return Value::Null;
        }
        let Some(id) = to_number(formatted) else {
            return Value::Null;
        };
        let mut raw = Map::new();
        raw.insert(self.id_attribute.clone(), Value::Number(id));
        Value::Object(raw)
    }

    fn display_text(&self, attributes: &Map<String, Value>) -> String {
        let value = self.base.val();
        let object = (!value.is_null()).then_some(value);
        self.display(object, attributes)
    }
}

impl fmt::Debug for ObjectField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectField")
            .field("base", &self.base)
            .field("id_attribute", &self.id_attribute)
            .field("full_name", &self.full_name)
            .field("order", &self.order)
            .field("display_template", &self.display_template)
            .finish_non_exhaustive()
    }
}

fn attribute_display(attribute: String) -> DisplayFn {
    Arc::new(move |object, _attributes, _field| {
        object
            .and_then(|object| object.get(&attribute))
            .map(value_to_string)
            .unwrap_or_default()
    })
}

fn qualify(name: &str, expression: &str) -> String {
    if expression.contains('.') {
        expression.to_string()
    } else {
        format!("{name}.{expression}")
    }
}
