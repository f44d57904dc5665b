#![deny(rust_2018_idioms)]
//! Form fields that convert between backend (raw) and UI (formatted) values,
//! plus a small view layer for rendering page layouts.

pub mod convert;
pub mod field;
pub mod io;
pub mod schema;
pub mod view;

pub use field::{
    DisplayFn, DisplaySpec, Field, FieldError, FieldModel, FieldOptions, FieldSet, ObjectField,
    ObjectFieldOptions,
};
pub use io::{DocumentFormat, read_object};
pub use schema::{field_set_from_schema, field_set_from_schema_str};
pub use view::{
    CompiledTemplate, Element, HandlebarsCompiler, LayoutView, TemplateCompiler, View,
    ViewDefaults, ViewError, ViewOptions,
};

pub mod prelude {
    pub use super::{
        Field, FieldModel, FieldOptions, FieldSet, LayoutView, ObjectField, ObjectFieldOptions,
        ViewOptions,
    };
}
