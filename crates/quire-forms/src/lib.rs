//! Declarative HTML form rendering for Quire
//!
//! This crate turns field declarations into form markup:
//! - Whitelisted, escaped HTML attributes
//! - Nested array submission names (`form[group][field][]`)
//! - Type-dispatched widgets for inputs, choices, text areas, buttons,
//!   rich-text editors and media uploaders
//! - Automatic labels and configurable wrappers
//! - Form tags, fieldsets, legends and CSRF hidden fields
//! - Field registries declared in code, TOML or JSON
//!
//! Token issuing, rich-text editing and validation are delegated to host
//! collaborators; see [`collaborators`].
//!
//! ## Example
//!
//! ```
//! use quire_forms::{Choices, FieldOptions, FormContext, SubmissionKind};
//!
//! let mut form = FormContext::new("settingsForm", SubmissionKind::Setting).unwrap();
//! form.set_group(["display", "colors"]);
//!
//! let html = form
//!     .render_field(
//!         "accent",
//!         FieldOptions::new()
//!             .field_type("radio")
//!             .choices(Choices::from_pairs([("r", "Red"), ("b", "Blue")]))
//!             .value("r"),
//!     )
//!     .unwrap();
//!
//! assert!(html.starts_with(r#"<div class="input radio"><label for="accent">Accent</label>"#));
//! assert!(html.contains(r#"name="settingsForm[display][colors][accent]" value="r" checked"#));
//! ```

pub mod attrs;
pub mod collaborators;
pub mod error;
pub mod field;
pub mod form;
pub mod label;
pub mod name;
pub mod settings;
pub mod widgets;

pub use attrs::{AttributeWhitelist, Attrs, escape_html, serialize_attrs};
pub use collaborators::{RichTextEditor, TokenService};
pub use error::{FormError, FormResult};
pub use field::{
	Choice, Choices, FieldOptions, FieldSpec, FieldValue, LabelSpec, WrapperSpec,
};
pub use form::{
	FieldGroupOptions, FieldsetOptions, FormContext, FormData, LegendOptions, SubmissionKind,
};
pub use label::{derive_label_text, render_label, wrap};
pub use name::{GroupPath, IntoGroupPath, compose_name, resolve_name, split_group};
pub use settings::FormSettings;
pub use widgets::{Widget, WidgetRegistry, canonical_type_key};
