//! Views: an owned element plus a compiled template.

mod layout;
mod template;

use std::fmt;

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

pub use layout::{DEFAULT_LAYOUT_TEMPLATE, LayoutView};
pub use template::{CompiledTemplate, HandlebarsCompiler, TemplateCompiler};

const DEFAULT_TAG_NAME: &str = "div";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewError {
    #[error("View.el not specified!")]
    MissingElement,
    #[error("invalid template: {0}")]
    Template(String),
}

/// Handle to the element a view renders into.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub struct Element {
    selector: String,
    inner_html: String,
}

impl Element {
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            inner_html: String::new(),
        }
    }

    pub fn selector(&self) -> &str {
        &self.selector
    }

    pub fn inner_html(&self) -> &str {
        &self.inner_html
    }

    pub fn append(&mut self, markup: &str) {
        self.inner_html.push_str(markup);
    }

    pub fn clear(&mut self) {
        self.inner_html.clear();
    }

    fn is_resolvable(&self) -> bool {
        !self.selector.trim().is_empty()
    }
}

impl From<String> for Element {
    fn from(selector: String) -> Self {
        Element::new(selector)
    }
}

impl From<&str> for Element {
    fn from(selector: &str) -> Self {
        Element::new(selector)
    }
}

/// Options bag for views. Unrecognised keys are kept in `extras`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewOptions {
    #[serde(default)]
    pub el: Option<Element>,
    #[serde(default)]
    pub template: Option<String>,
    #[serde(default)]
    pub layout_template: Option<String>,
    #[serde(default)]
    pub tag_name: Option<String>,
    #[serde(flatten)]
    pub extras: IndexMap<String, Value>,
}

impl ViewOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_el(mut self, el: impl Into<Element>) -> Self {
        self.el = Some(el.into());
        self
    }

    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    pub fn with_layout_template(mut self, template: impl Into<String>) -> Self {
        self.layout_template = Some(template.into());
        self
    }

    pub fn with_tag_name(mut self, tag_name: impl Into<String>) -> Self {
        self.tag_name = Some(tag_name.into());
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extras.insert(key.into(), value);
        self
    }
}

/// Values a view kind falls back to when the options bag leaves them out.
#[derive(Debug, Clone)]
pub struct ViewDefaults {
    pub el: Option<Element>,
    pub tag_name: String,
    pub template: Option<String>,
}

impl Default for ViewDefaults {
    fn default() -> Self {
        Self {
            el: None,
            tag_name: DEFAULT_TAG_NAME.to_string(),
            template: None,
        }
    }
}

impl ViewDefaults {
    pub fn with_el(mut self, el: impl Into<Element>) -> Self {
        self.el = Some(el.into());
        self
    }

    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }
}

pub struct View {
    el: Element,
    tag_name: String,
    template: CompiledTemplate,
    extras: IndexMap<String, Value>,
}

impl View {
    /// Builds a view from `options`, falling back to `defaults`.
    ///
    /// Fails with [`ViewError::MissingElement`] when neither supplies an element.
    pub fn new(
        options: ViewOptions,
        defaults: &ViewDefaults,
        compiler: &dyn TemplateCompiler,
    ) -> Result<Self, ViewError> {
        let source = non_empty(options.template.clone())
            .or_else(|| non_empty(defaults.template.clone()))
            .unwrap_or_default();
        Self::with_source(options, defaults, &source, compiler)
    }

    pub(crate) fn with_source(
        options: ViewOptions,
        defaults: &ViewDefaults,
        source: &str,
        compiler: &dyn TemplateCompiler,
    ) -> Result<Self, ViewError> {
        let el = options
            .el
            .filter(Element::is_resolvable)
            .or_else(|| defaults.el.clone().filter(Element::is_resolvable));
        let Some(el) = el else {
            tracing::warn!("view constructed without an element");
            return Err(ViewError::MissingElement);
        };
        let tag_name = non_empty(options.tag_name).unwrap_or_else(|| defaults.tag_name.clone());
        tracing::trace!(selector = %el.selector(), %tag_name, "view created");
        Ok(Self {
            el,
            tag_name,
            template: compiler.compile(source)?,
            extras: options.extras,
        })
    }

    pub fn el(&self) -> &Element {
        &self.el
    }

    pub fn el_mut(&mut self) -> &mut Element {
        &mut self.el
    }

    pub fn tag_name(&self) -> &str {
        &self.tag_name
    }

    pub fn extras(&self) -> &IndexMap<String, Value> {
        &self.extras
    }

    pub fn extra(&self, key: &str) -> Option<&Value> {
        self.extras.get(key)
    }

    /// Markup produced by the compiled template.
    pub fn markup(&self) -> String {
        (self.template)()
    }
}

/// Treats empty strings like absent options.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.is_empty())
}

impl fmt::Debug for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("View")
            .field("el", &self.el)
            .field("tag_name", &self.tag_name)
            .field("extras", &self.extras)
            .finish_non_exhaustive()
    }
}
