use thiserror::Error;

/// Configuration failures raised while building fields or field sets.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("field name must not be empty")]
    MissingName,
    #[error("{name}: type '{type_name}' is not supported (expected one of: {supported})")]
    UnsupportedType {
        name: String,
        type_name: String,
        supported: String,
    },
    #[error("{name}: a field with this name already exists")]
    DuplicateName { name: String },
}

impl FieldError {
    pub(crate) fn unsupported<'a>(
        name: &str,
        type_name: &str,
        supported: impl IntoIterator<Item = &'a String>,
    ) -> Self {
        FieldError::UnsupportedType {
            name: name.to_string(),
            type_name: type_name.to_string(),
            supported: supported
                .into_iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}
