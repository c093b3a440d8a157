//! Widgets backed by host-side collaborators
//!
//! The rich-text editor is rendered by the form's [`RichTextEditor`]. The
//! uploader is a static scaffold that a client-side media picker script binds
//! to through the `uploader`, `set-image` and `remove-image` classes and the
//! sibling hidden input.
//!
//! [`RichTextEditor`]: crate::collaborators::RichTextEditor

use super::Widget;
use super::textarea::Textarea;
use crate::attrs::{attrs_fragment, escape_html};
use crate::field::FieldSpec;
use crate::form::FormContext;

/// Rich-text editor
///
/// Falls back to a plain textarea when the form has no editor configured.
#[derive(Debug, Clone, Default)]
pub struct Editor;

impl Editor {
	pub fn new() -> Self {
		Self
	}
}

impl Widget for Editor {
	fn render(&self, field: &FieldSpec, form: &FormContext) -> String {
		match form.editor() {
			Some(editor) => editor.render(&field.value.as_text(), &field.html_name),
			None => {
				tracing::debug!(field = %field.name, "no rich-text editor configured; rendering textarea");
				Textarea.render(field, form)
			}
		}
	}
}

/// Media uploader scaffold
#[derive(Debug, Clone, Default)]
pub struct Uploader;

impl Uploader {
	pub fn new() -> Self {
		Self
	}
}

impl Widget for Uploader {
	fn render(&self, field: &FieldSpec, _form: &FormContext) -> String {
		let value = field.value.as_text();
		let escaped_value = escape_html(&value);
		let trigger = if value.is_empty() {
			"Set Image".to_string()
		} else {
			format!(r#"<img src="{}" class="preview" />"#, escaped_value)
		};

		let mut html = format!(
			r#"<div class="uploader"{}>"#,
			attrs_fragment(&field.attrs)
		);
		html.push_str(&format!(r##"<a href="#" class="set-image">{}</a>"##, trigger));
		html.push_str(r##"<a href="#" class="remove-image">Remove Image</a>"##);
		html.push_str(&format!(
			r#"<input type="hidden" id="{}" name="{}" value="{}" />"#,
			escape_html(&field.id),
			escape_html(&field.html_name),
			escaped_value
		));
		html.push_str("</div>");
		html
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::collaborators::testing::EchoEditor;
	use crate::field::FieldOptions;
	use crate::form::SubmissionKind;
	use rstest::rstest;

	#[rstest]
	fn test_editor_delegates_value_and_name() {
		// Arrange
		let form = FormContext::new("post", SubmissionKind::PostMeta)
			.unwrap()
			.with_editor(EchoEditor);
		let field = form
			.field_spec("body", FieldOptions::new().field_type("editor").value("<p>Hi</p>"))
			.unwrap();

		// Act
		let html = Editor.render(&field, &form);

		// Assert
		assert_eq!(html, r#"<div class="editor" data-name="post[body]"><p>Hi</p></div>"#);
	}

	#[rstest]
	fn test_editor_without_collaborator_uses_textarea() {
		// Arrange
		let form = FormContext::new("post", SubmissionKind::PostMeta).unwrap();
		let field = form
			.field_spec("body", FieldOptions::new().field_type("editor").value("Hi"))
			.unwrap();

		// Act
		let html = Editor.render(&field, &form);

		// Assert
		assert_eq!(html, r#"<textarea id="body" name="post[body]">Hi</textarea>"#);
	}

	#[rstest]
	fn test_uploader_scaffold_without_value() {
		// Arrange
		let form = FormContext::new("media", SubmissionKind::Custom).unwrap();
		let field = form
			.field_spec("photo", FieldOptions::new().field_type("uploader"))
			.unwrap();

		// Act
		let html = Uploader.render(&field, &form);

		// Assert
		assert_eq!(
			html,
			concat!(
				r#"<div class="uploader">"#,
				r##"<a href="#" class="set-image">Set Image</a>"##,
				r##"<a href="#" class="remove-image">Remove Image</a>"##,
				r#"<input type="hidden" id="photo" name="media[photo]" value="" />"#,
				"</div>",
			)
		);
	}

	#[rstest]
	fn test_uploader_shows_preview_for_value() {
		// Arrange
		let form = FormContext::new("media", SubmissionKind::Custom).unwrap();
		let field = form
			.field_spec(
				"photo",
				FieldOptions::new().field_type("uploader").value("/img/a.png"),
			)
			.unwrap();

		// Act
		let html = Uploader.render(&field, &form);

		// Assert
		assert!(html.contains(r##"<a href="#" class="set-image"><img src="/img/a.png" class="preview" /></a>"##));
		assert!(html.contains(r#"value="/img/a.png""#));
	}
}
