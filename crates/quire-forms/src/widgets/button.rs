//! Buttons
//!
//! Buttons carry their own caption, so they are never labeled or wrapped.

use super::Widget;
use crate::attrs::{attrs_fragment, escape_html};
use crate::field::{FieldSpec, LabelSpec};
use crate::form::FormContext;
use crate::label::derive_label_text;

/// Caption of a submit input without a value.
pub const DEFAULT_SUBMIT_TEXT: &str = "Submit";

/// `<button type="button">`
///
/// The caption is the explicit label text, else the value, else the title-cased
/// field name.
#[derive(Debug, Clone, Default)]
pub struct Button;

impl Button {
	pub fn new() -> Self {
		Self
	}
}

impl Widget for Button {
	fn render(&self, field: &FieldSpec, _form: &FormContext) -> String {
		let value = field.value.as_text();
		let caption = match &field.label {
			LabelSpec::Text(text) => text.clone(),
			_ if !value.is_empty() => value.clone(),
			_ => derive_label_text(&field.name),
		};
		format!(
			r#"<button id="{}" type="button" name="{}"{} value="{}">{}</button>"#,
			escape_html(&field.id),
			escape_html(&field.html_name),
			attrs_fragment(&field.attrs),
			escape_html(&value),
			escape_html(&caption)
		)
	}

	fn decorated(&self) -> bool {
		false
	}
}

/// `<input type="submit">` captioned by the field value.
#[derive(Debug, Clone, Default)]
pub struct SubmitButton;

impl SubmitButton {
	pub fn new() -> Self {
		Self
	}
}

impl Widget for SubmitButton {
	fn render(&self, field: &FieldSpec, _form: &FormContext) -> String {
		let value = field.value.as_text();
		let caption = if value.is_empty() {
			DEFAULT_SUBMIT_TEXT
		} else {
			value.as_str()
		};
		format!(
			r#"<input id="{}" type="submit" name="{}"{} value="{}" />"#,
			escape_html(&field.id),
			escape_html(&field.html_name),
			attrs_fragment(&field.attrs),
			escape_html(caption)
		)
	}

	fn decorated(&self) -> bool {
		false
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::field::FieldOptions;
	use crate::form::SubmissionKind;
	use rstest::rstest;

	fn form() -> FormContext {
		FormContext::new("fruit", SubmissionKind::Custom).unwrap()
	}

	#[rstest]
	#[case(FieldOptions::new(), "Squeeze Orange")]
	#[case(FieldOptions::new().value("Press an Orange!"), "Press an Orange!")]
	#[case(FieldOptions::new().value("x").label("Go"), "Go")]
	fn test_button_caption(#[case] options: FieldOptions, #[case] caption: &str) {
		// Arrange
		let form = form();
		let field = form.field_spec("squeeze_orange", options.field_type("button")).unwrap();

		// Act
		let html = Button.render(&field, &form);

		// Assert
		assert!(html.starts_with(r#"<button id="squeeze_orange" type="button" name="fruit[squeeze_orange]""#));
		assert!(html.ends_with(&format!(">{caption}</button>")));
	}

	#[rstest]
	#[case(FieldOptions::new(), "Submit")]
	#[case(FieldOptions::new().value("Save"), "Save")]
	fn test_submit_button_value(#[case] options: FieldOptions, #[case] caption: &str) {
		// Arrange
		let form = form();
		let field = form.field_spec("save", options.field_type("submitButton")).unwrap();

		// Act
		let html = SubmitButton.render(&field, &form);

		// Assert
		assert_eq!(
			html,
			format!(r#"<input id="save" type="submit" name="fruit[save]" value="{caption}" />"#)
		);
	}

	#[rstest]
	fn test_buttons_are_not_decorated() {
		assert!(!Button.decorated());
		assert!(!SubmitButton.decorated());
	}
}
