use indexmap::IndexMap;
use serde_json::{Map, Value};

use super::{FieldError, FieldModel};

/// Ordered collection of fields keyed by their unique name.
#[derive(Debug, Default)]
pub struct FieldSet {
    fields: IndexMap<String, Box<dyn FieldModel>>,
}

impl FieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl FieldModel + 'static) -> Result<(), FieldError> {
        self.insert_boxed(Box::new(field))
    }

    pub fn insert_boxed(&mut self, field: Box<dyn FieldModel>) -> Result<(), FieldError> {
        let name = field.name().to_string();
        if self.fields.contains_key(&name) {
            return Err(FieldError::DuplicateName { name });
        }
        self.fields.insert(name, field);
        Ok(())
    }

    pub fn with_field(mut self, field: impl FieldModel + 'static) -> Result<Self, FieldError> {
        self.insert(field)?;
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&dyn FieldModel> {
        self.fields.get(name).map(|field| field.as_ref())
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut (dyn FieldModel + 'static)> {
        self.fields.get_mut(name).map(|field| field.as_mut())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn FieldModel> {
        self.fields
            .values()
            .map(|field| -> &dyn FieldModel { field.as_ref() })
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Formats every field from a backend record. Missing keys format as absent.
    pub fn formatted(&self, record: &Map<String, Value>) -> Map<String, Value> {
        self.fields
            .iter()
            .map(|(name, field)| {
                let raw = record.get(name).unwrap_or(&Value::Null);
                (name.clone(), field.from_raw(raw))
            })
            .collect()
    }

    /// Converts edited values back into a backend-shaped record.
    pub fn raw(&self, formatted: &Map<String, Value>) -> Map<String, Value> {
        self.fields
            .iter()
            .map(|(name, field)| {
                let value = formatted.get(name).unwrap_or(&Value::Null);
                (name.clone(), field.to_raw(value))
            })
            .collect()
    }

    /// Stores each field's value from `record`, falling back to the type default.
    pub fn load(&mut self, record: &Map<String, Value>) {
        for (name, field) in self.fields.iter_mut() {
            let value = match record.get(name) {
                Some(value) => value.clone(),
                None => field.default_value(field.type_name()),
            };
            field.set_val(value);
        }
    }

    /// Current values of all fields, keyed by name.
    pub fn values(&self) -> Map<String, Value> {
        self.fields
            .iter()
            .map(|(name, field)| (name.clone(), field.val().clone()))
            .collect()
    }

    pub fn display_values(&self, attributes: &Map<String, Value>) -> IndexMap<String, String> {
        self.fields
            .iter()
            .map(|(name, field)| (name.clone(), field.display_text(attributes)))
            .collect()
    }
}
