//! Single-input widgets

use super::Widget;
use crate::attrs::{attrs_fragment, escape_html};
use crate::field::FieldSpec;
use crate::form::FormContext;

/// Plain `<input>` of the field's own type.
///
/// Serves text, email, number, date, color and any other input type that has
/// no dedicated widget.
#[derive(Debug, Clone, Default)]
pub struct TextInput;

impl TextInput {
	pub fn new() -> Self {
		Self
	}
}

impl Widget for TextInput {
	fn render(&self, field: &FieldSpec, _form: &FormContext) -> String {
		format!(
			r#"<input id="{}" type="{}" name="{}"{} value="{}" />"#,
			escape_html(&field.id),
			escape_html(&field.field_type),
			escape_html(&field.html_name),
			attrs_fragment(&field.attrs),
			escape_html(&field.value.as_text())
		)
	}
}

/// Range slider with a paired `<output>` showing the current value.
#[derive(Debug, Clone, Default)]
pub struct RangeInput;

impl RangeInput {
	pub fn new() -> Self {
		Self
	}
}

impl Widget for RangeInput {
	fn render(&self, field: &FieldSpec, form: &FormContext) -> String {
		let mut html = TextInput.render(field, form);
		html.push_str(&format!(
			r#"<output for="{}">{}</output>"#,
			escape_html(&field.id),
			escape_html(&field.value.as_text())
		));
		html
	}
}
