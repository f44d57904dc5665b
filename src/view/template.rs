use handlebars::Handlebars;
use serde_json::{Map, Value};

use super::ViewError;

/// A compiled template. Any data it needs was captured when it was compiled.
pub type CompiledTemplate = Box<dyn Fn() -> String + Send + Sync>;

/// Turns template source into a [`CompiledTemplate`].
pub trait TemplateCompiler {
    fn compile(&self, source: &str) -> Result<CompiledTemplate, ViewError>;
}

impl<F> TemplateCompiler for F
where
    F: Fn(&str) -> Result<CompiledTemplate, ViewError>,
{
    fn compile(&self, source: &str) -> Result<CompiledTemplate, ViewError> {
        self(source)
    }
}

const TEMPLATE_NAME: &str = "view";

/// Compiles Handlebars templates against a context fixed at compile time.
///
/// Output is HTML-escaped; keys missing from the context render as nothing.
#[derive(Debug, Clone, Default)]
pub struct HandlebarsCompiler {
    context: Map<String, Value>,
}

impl HandlebarsCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    pub fn context(&self) -> &Map<String, Value> {
        &self.context
    }
}

impl TemplateCompiler for HandlebarsCompiler {
    fn compile(&self, source: &str) -> Result<CompiledTemplate, ViewError> {
        let mut registry = Handlebars::new();
        registry
            .register_template_string(TEMPLATE_NAME, source)
            .map_err(|err| ViewError::Template(err.to_string()))?;
        let context = Value::Object(self.context.clone());
        Ok(Box::new(move || {
            registry
                .render(TEMPLATE_NAME, &context)
                .unwrap_or_else(|err| {
                    tracing::warn!(error = %err, "template failed to render");
                    String::new()
                })
        }))
    }
}
