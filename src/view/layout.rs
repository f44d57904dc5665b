use super::{
    Element, HandlebarsCompiler, TemplateCompiler, View, ViewDefaults, ViewError, ViewOptions,
    non_empty,
};

/// Page chrome used when neither `layout_template` nor `template` is given.
pub const DEFAULT_LAYOUT_TEMPLATE: &str = include_str!("layout.html");

/// Renders the page layout template into its element.
#[derive(Debug)]
pub struct LayoutView {
    view: View,
}

impl LayoutView {
    /// Builds a layout view with the default Handlebars compiler.
    pub fn new(options: ViewOptions) -> Result<Self, ViewError> {
        Self::with_compiler(options, &ViewDefaults::default(), &HandlebarsCompiler::new())
    }

    /// Builds a layout view, preferring `layout_template` over `template`.
    pub fn with_compiler(
        options: ViewOptions,
        defaults: &ViewDefaults,
        compiler: &dyn TemplateCompiler,
    ) -> Result<Self, ViewError> {
        let source = non_empty(options.layout_template.clone())
            .or_else(|| non_empty(options.template.clone()))
            .or_else(|| non_empty(defaults.template.clone()))
            .unwrap_or_else(|| DEFAULT_LAYOUT_TEMPLATE.to_string());
        let defaults = ViewDefaults {
            tag_name: "div".to_string(),
            ..defaults.clone()
        };
        let view = View::with_source(options, &defaults, &source, compiler)?;
        Ok(Self { view })
    }

    /// Appends the template output to the element. Each call appends again.
    pub fn render(&mut self) -> &mut Self {
        let markup = self.view.markup();
        self.view.el_mut().append(&markup);
        tracing::trace!(selector = %self.view.el().selector(), "layout rendered");
        self
    }

    pub fn el(&self) -> &Element {
        self.view.el()
    }

    pub fn view(&self) -> &View {
        &self.view
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_template_wins_over_template() {
        let mut layout = LayoutView::new(
            ViewOptions::new()
                .with_el("#page")
                .with_template("<p>plain</p>")
                .with_layout_template("<nav></nav>"),
        )
        .unwrap();
        assert_eq!(layout.render().el().inner_html(), "<nav></nav>");
    }

    #[test]
    fn empty_templates_fall_through() {
        let mut layout = LayoutView::new(
            ViewOptions::new()
                .with_el("#page")
                .with_layout_template("")
                .with_template("<p>x</p>"),
        )
        .unwrap();
        assert_eq!(layout.render().el().inner_html(), "<p>x</p>");

        let mut layout = LayoutView::new(
            ViewOptions::new()
                .with_el("#page")
                .with_layout_template("")
                .with_template(""),
        )
        .unwrap();
        assert!(layout.render().el().inner_html().contains("layout-header"));
    }

    #[test]
    fn falls_back_to_builtin_layout() {
        let compiler = HandlebarsCompiler::new().with_value("title", "Invoices");
        let mut layout = LayoutView::with_compiler(
            ViewOptions::new().with_el("#page"),
            &ViewDefaults::default(),
            &compiler,
        )
        .unwrap();
        let html = layout.render().el().inner_html().to_string();
        assert!(html.contains(r#"<header class="layout-header">Invoices</header>"#));
        assert!(html.contains(r#"<footer class="layout-footer"></footer>"#));
    }

    #[test]
    fn tag_name_defaults_to_div_but_can_be_overridden() {
        let defaults = ViewDefaults {
            tag_name: "span".to_string(),
            ..ViewDefaults::default()
        };
        let layout = LayoutView::with_compiler(
            ViewOptions::new().with_el("#page"),
            &defaults,
            &HandlebarsCompiler::new(),
        )
        .unwrap();
        assert_eq!(layout.view().tag_name(), "div");

        let layout =
            LayoutView::new(ViewOptions::new().with_el("#page").with_tag_name("section")).unwrap();
        assert_eq!(layout.view().tag_name(), "section");
    }
}
