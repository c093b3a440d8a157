use super::Widget;
use crate::attrs::{attrs_fragment, escape_html};
use crate::field::FieldSpec;
use crate::form::FormContext;

/// Multi-line text area. The value is written as escaped text content.
#[derive(Debug, Clone, Default)]
pub struct Textarea;

impl Textarea {
	pub fn new() -> Self {
		Self
	}
}

impl Widget for Textarea {
	fn render(&self, field: &FieldSpec, _form: &FormContext) -> String {
		format!(
			r#"<textarea id="{}" name="{}"{}>{}</textarea>"#,
			escape_html(&field.id),
			escape_html(&field.html_name),
			attrs_fragment(&field.attrs),
			escape_html(&field.value.as_text())
		)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::field::FieldOptions;
	use crate::form::SubmissionKind;
	use rstest::rstest;

	#[rstest]
	fn test_textarea_escapes_content() {
		// Arrange
		let form = FormContext::new("notes", SubmissionKind::PostMeta).unwrap();
		let field = form
			.field_spec(
				"body",
				FieldOptions::new()
					.field_type("textarea")
					.value("</textarea><script>")
					.attr("cols", "30")
					.attr("rows", "8"),
			)
			.unwrap();

		// Act
		let html = Textarea.render(&field, &form);

		// Assert
		assert_eq!(
			html,
			r#"<textarea id="body" name="notes[body]" cols="30" rows="8">&lt;/textarea&gt;&lt;script&gt;</textarea>"#
		);
	}
}
