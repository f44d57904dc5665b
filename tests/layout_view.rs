use fieldkit::{Element, HandlebarsCompiler, LayoutView, ViewDefaults, ViewError, ViewOptions};

#[test]
fn construction_without_element_fails() {
    let err = LayoutView::new(ViewOptions::new().with_template("<p></p>")).unwrap_err();
    assert_eq!(err, ViewError::MissingElement);
}

#[test]
fn empty_element_selector_fails() {
    let err = LayoutView::new(ViewOptions::new().with_el("")).unwrap_err();
    assert_eq!(err, ViewError::MissingElement);
}

#[test]
fn empty_layout_template_defers_to_template() {
    let mut layout = LayoutView::new(
        ViewOptions::new()
            .with_el("#app")
            .with_layout_template("")
            .with_template("<p>x</p>"),
    )
    .unwrap();
    assert_eq!(layout.render().el().inner_html(), "<p>x</p>");
}

#[test]
fn malformed_template_fails_construction() {
    let err = LayoutView::new(ViewOptions::new().with_el("#app").with_template("{{#each}}"))
        .unwrap_err();
    assert!(matches!(err, ViewError::Template(_)));
}

#[test]
fn construction_with_element_exposes_it() {
    let layout = LayoutView::new(ViewOptions::new().with_el("#app")).unwrap();
    assert_eq!(layout.el(), &Element::new("#app"));
    assert_eq!(layout.el().inner_html(), "");
}

#[test]
fn inherited_element_is_used() {
    let layout = LayoutView::with_compiler(
        ViewOptions::new(),
        &ViewDefaults::default().with_el("body"),
        &HandlebarsCompiler::new(),
    )
    .unwrap();
    assert_eq!(layout.el().selector(), "body");
}

#[test]
fn render_twice_appends_twice() {
    let mut layout =
        LayoutView::new(ViewOptions::new().with_el("#app").with_template("<main></main>")).unwrap();
    layout.render().render();
    assert_eq!(layout.el().inner_html(), "<main></main><main></main>");
}

#[test]
fn extra_options_are_kept() {
    let layout = LayoutView::new(
        ViewOptions::new()
            .with_el("#app")
            .with_extra("theme", serde_json::json!("dark")),
    )
    .unwrap();
    assert_eq!(layout.view().extra("theme"), Some(&serde_json::json!("dark")));
}
