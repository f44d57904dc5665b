//! Typed form fields and their raw/formatted conversion contract.
//!
//! A field's *raw* value is the backend-shaped data (a number, a nested
//! object...), its *formatted* value is what a form edits (usually a string).
//! [`FieldModel`] is the seam every field kind implements; [`Field`] carries
//! the shared state and the base behaviour specialisations fall back to.

mod error;
mod object;
mod options;
mod set;

use indexmap::{IndexMap, IndexSet};
use serde_json::{Map, Value};

use crate::convert::{boolean_value, is_numeric, to_number, value_to_string};

pub use error::FieldError;
pub use object::ObjectField;
pub use options::{DisplayFn, DisplaySpec, FieldOptions, ObjectFieldOptions};
pub use set::FieldSet;

/// Type names every field accepts out of the box.
pub const BASE_TYPES: [&str; 7] = [
    "string", "text", "number", "integer", "boolean", "array", "date",
];

const DEFAULT_TYPE: &str = "string";

/// State and base behaviour shared by every field kind.
#[derive(Debug, Clone)]
pub struct Field {
    name: String,
    type_name: String,
    label: String,
    value: Value,
    supported_types: IndexSet<String>,
    extras: IndexMap<String, Value>,
}

impl Field {
    /// Builds and initializes a plain field. The type defaults to `string`.
    pub fn new(options: FieldOptions) -> Result<Self, FieldError> {
        let mut field = Field::configure(&options);
        if field.type_name.is_empty() {
            field.type_name = DEFAULT_TYPE.to_string();
        }
        field.initialize(&options)?;
        Ok(field)
    }

    /// Copies the options bag onto a fresh, not yet initialized field.
    pub(crate) fn configure(options: &FieldOptions) -> Self {
        Field {
            name: options.name.clone(),
            type_name: options.type_name.clone().unwrap_or_default(),
            label: options.label.clone().unwrap_or_default(),
            value: Value::Null,
            supported_types: BASE_TYPES.iter().map(|ty| ty.to_string()).collect(),
            extras: options.extras.clone(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub(crate) fn set_type_name(&mut self, type_name: impl Into<String>) {
        self.type_name = type_name.into();
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn extras(&self) -> &IndexMap<String, Value> {
        &self.extras
    }

    pub fn extra(&self, key: &str) -> Option<&Value> {
        self.extras.get(key)
    }

    /// Registers `type_name` as valid for this field. Registering twice is a no-op.
    pub fn add_supported_type(&mut self, type_name: &str) {
        self.supported_types.insert(type_name.to_ascii_lowercase());
    }

    pub fn supports(&self, type_name: &str) -> bool {
        self.supported_types
            .contains(type_name.to_ascii_lowercase().as_str())
    }

    pub fn supported_types(&self) -> impl Iterator<Item = &str> {
        self.supported_types.iter().map(String::as_str)
    }

    pub fn val(&self) -> &Value {
        &self.value
    }

    pub fn set_val(&mut self, value: Value) {
        tracing::trace!(field = %self.name, %value, "field value replaced");
        self.value = value;
    }

    /// Default value for a field of `type_name`.
    pub fn default_value(&self, type_name: &str) -> Value {
        match type_name.to_ascii_lowercase().as_str() {
            "string" | "text" => Value::String(String::new()),
            "boolean" => Value::Bool(false),
            "array" => Value::Array(Vec::new()),
            _ => Value::Null,
        }
    }

    /// Renders a raw value as its formatted string.
    pub fn from_raw(&self, raw: &Value) -> Value {
        Value::String(value_to_string(raw))
    }

    /// Coerces a formatted value back into the raw shape of this field's type.
    ///
    /// Values that cannot be coerced become `null`.
    pub fn to_raw(&self, formatted: &Value) -> Value {
        match self.type_name.to_ascii_lowercase().as_str() {
            "number" | "integer" => {
                if !is_numeric(formatted) {
                    tracing::debug!(field = %self.name, %formatted, "non-numeric input dropped");
                    return Value::Null;
                }
                match to_number(formatted) {
                    Some(num) if self.type_name.eq_ignore_ascii_case("integer") => {
                        if num.is_i64() || num.is_u64() {
                            Value::Number(num)
                        } else {
                            num.as_f64()
                                .map(f64::round)
                                .filter(|n| *n >= i64::MIN as f64 && *n < i64::MAX as f64)
                                .map(|n| Value::from(n as i64))
                                .unwrap_or(Value::Null)
                        }
                    }
                    Some(num) => Value::Number(num),
                    None => Value::Null,
                }
            }
            "boolean" => boolean_value(formatted)
                .map(Value::Bool)
                .unwrap_or(Value::Null),
            "string" | "text" => {
                let text = value_to_string(formatted);
                if text.is_empty() {
                    Value::Null
                } else {
                    Value::String(text)
                }
            }
            "array" => match formatted {
                Value::Array(_) => formatted.clone(),
                Value::String(text) => Value::Array(
                    text.split(',')
                        .map(str::trim)
                        .filter(|item| !item.is_empty())
                        .map(|item| Value::String(item.to_string()))
                        .collect(),
                ),
                _ => Value::Null,
            },
            _ => formatted.clone(),
        }
    }
}

/// Behaviour every field kind exposes to forms and field sets.
///
/// Specialisations embed a [`Field`] and override the conversion hooks; the
/// provided methods fall back to the embedded field's base behaviour.
pub trait FieldModel: std::fmt::Debug + Send + Sync {
    fn field(&self) -> &Field;

    fn field_mut(&mut self) -> &mut Field;

    fn name(&self) -> &str {
        self.field().name()
    }

    fn type_name(&self) -> &str {
        self.field().type_name()
    }

    fn default_value(&self, type_name: &str) -> Value {
        self.field().default_value(type_name)
    }

    fn from_raw(&self, raw: &Value) -> Value {
        self.field().from_raw(raw)
    }

    fn to_raw(&self, formatted: &Value) -> Value {
        self.field().to_raw(formatted)
    }

    fn val(&self) -> &Value {
        self.field().val()
    }

    fn set_val(&mut self, value: Value) {
        self.field_mut().set_val(value);
    }

    /// Human-readable text for the current value.
    fn display_text(&self, _attributes: &Map<String, Value>) -> String {
        value_to_string(&self.from_raw(self.val()))
    }

    /// Generic setup run once the field kind has applied its own defaults.
    ///
    /// Validates name and type, fills the label and seeds the value from the
    /// options bag or from [`FieldModel::default_value`].
    fn initialize(&mut self, options: &FieldOptions) -> Result<(), FieldError> {
        let field = self.field();
        if field.name.trim().is_empty() {
            return Err(FieldError::MissingName);
        }
        if !field.supports(&field.type_name) {
            return Err(FieldError::unsupported(
                &field.name,
                &field.type_name,
                &field.supported_types,
            ));
        }
        let type_name = field.type_name.clone();
        let value = match &options.value {
            Some(value) => value.clone(),
            None => self.default_value(&type_name),
        };

        let field = self.field_mut();
        if field.label.is_empty() {
            field.label = field.name.clone();
        }
        field.value = value;
        tracing::trace!(field = %field.name, type_name = %field.type_name, "field initialized");
        Ok(())
    }
}

impl FieldModel for Field {
    fn field(&self) -> &Field {
        self
    }

    fn field_mut(&mut self) -> &mut Field {
        self
    }
}
