//! Labels and wrappers around rendered controls
//!
//! Composition is always label first, then wrapper.

use crate::attrs::{Attrs, attrs_fragment, escape_html};
use crate::error::{FormError, FormResult};
use crate::field::{FieldSpec, LabelSpec, WrapperSpec};

/// Slot a wrapper template substitutes the label and control into.
pub const CONTENT_SLOT: &str = "{content}";

/// Optional slot replaced by the field type.
pub const TYPE_SLOT: &str = "{type}";

/// Wrapper used when a field does not choose one.
pub const DEFAULT_WRAPPER: &str = r#"<div class="input {type}">{content}</div>"#;

/// Title-case a field name: `-` and `_` become spaces and each word starts
/// with an uppercase letter.
///
/// # Examples
///
/// ```
/// use quire_forms::label::derive_label_text;
///
/// assert_eq!(derive_label_text("basic_text"), "Basic Text");
/// assert_eq!(derive_label_text("a-radio-button"), "A Radio Button");
/// ```
pub fn derive_label_text(name: &str) -> String {
	name.split(['-', '_', ' '])
		.filter(|word| !word.is_empty())
		.map(|word| {
			let mut chars = word.chars();
			match chars.next() {
				Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
				None => String::new(),
			}
		})
		.collect::<Vec<_>>()
		.join(" ")
}

/// `<label>` markup. An empty `for_id` omits the `for` attribute.
pub fn render_label(for_id: &str, text: &str, attrs: &Attrs) -> String {
	let for_attr = if for_id.is_empty() {
		String::new()
	} else {
		format!(r#" for="{}""#, escape_html(for_id))
	};
	format!(
		"<label{}{}>{}</label>",
		for_attr,
		attrs_fragment(attrs),
		escape_html(text)
	)
}

/// Label markup for `field` according to its label policy, or `None`.
pub fn field_label(field: &FieldSpec) -> Option<String> {
	let text = match &field.label {
		LabelSpec::Hidden => return None,
		LabelSpec::Text(text) => text.clone(),
		LabelSpec::Derive => derive_label_text(&field.name),
	};
	Some(render_label(&field.id, &text, &Attrs::new()))
}

/// Check that `template` has exactly one content slot.
pub fn check_template(template: &str) -> FormResult<()> {
	match template.matches(CONTENT_SLOT).count() {
		1 => Ok(()),
		count => Err(FormError::InvalidWrapper(format!(
			"expected exactly one {CONTENT_SLOT} slot, found {count} in {template:?}"
		))),
	}
}

fn fill(template: &str, field_type: &str, content: &str) -> String {
	// Type first, so a `{type}` inside the content is never substituted.
	template
		.replace(TYPE_SLOT, &escape_html(field_type))
		.replacen(CONTENT_SLOT, content, 1)
}

/// Prepend the label and apply the wrapper to rendered control markup.
///
/// A custom template without exactly one `{content}` slot falls back to the
/// default wrapper.
pub fn wrap(inner: &str, field: &FieldSpec) -> String {
	let mut content = field_label(field).unwrap_or_default();
	content.push_str(inner);

	match &field.wrapper {
		WrapperSpec::Bare => content,
		WrapperSpec::Default => fill(DEFAULT_WRAPPER, &field.field_type, &content),
		WrapperSpec::Template(template) => match check_template(template) {
			Ok(()) => fill(template, &field.field_type, &content),
			Err(error) => {
				tracing::warn!(field = %field.name, %error, "falling back to the default wrapper");
				fill(DEFAULT_WRAPPER, &field.field_type, &content)
			}
		},
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::field::FieldOptions;
	use crate::form::{FormContext, SubmissionKind};
	use rstest::rstest;

	fn spec(options: FieldOptions) -> FieldSpec {
		let form = FormContext::new("test", SubmissionKind::Custom).unwrap();
		FieldSpec::build("my_field", options, &form).unwrap()
	}

	#[rstest]
	#[case("basic_text", "Basic Text")]
	#[case("html5-email", "Html5 Email")]
	#[case("color", "Color")]
	#[case("already Spaced", "Already Spaced")]
	#[case("__edge__", "Edge")]
	fn test_derive_label_text(#[case] name: &str, #[case] expected: &str) {
		assert_eq!(derive_label_text(name), expected);
	}

	#[rstest]
	fn test_render_label_escapes_text() {
		// Act
		let html = render_label("x", "<b>", &Attrs::new());

		// Assert
		assert_eq!(html, r#"<label for="x">&lt;b&gt;</label>"#);
	}

	#[rstest]
	fn test_render_label_without_for() {
		assert_eq!(render_label("", "Name", &Attrs::new()), "<label>Name</label>");
	}

	#[rstest]
	fn test_wrap_default() {
		// Arrange
		let field = spec(FieldOptions::new());

		// Act
		let html = wrap("<input />", &field);

		// Assert
		assert_eq!(
			html,
			r#"<div class="input text"><label for="my_field">My Field</label><input /></div>"#
		);
	}

	#[rstest]
	fn test_wrap_bare_without_label() {
		// Arrange
		let field = spec(FieldOptions::new().label(false).wrapper(false));

		// Act
		let html = wrap("<input />", &field);

		// Assert
		assert_eq!(html, "<input />");
	}

	#[rstest]
	fn test_wrap_custom_template_and_label() {
		// Arrange
		let field = spec(
			FieldOptions::new()
				.label("Specify any label you want.")
				.wrapper("<p>{content}</p>"),
		);

		// Act
		let html = wrap("<input />", &field);

		// Assert
		assert_eq!(
			html,
			r#"<p><label for="my_field">Specify any label you want.</label><input /></p>"#
		);
	}

	#[rstest]
	#[case("<p></p>")]
	#[case("<p>{content}{content}</p>")]
	fn test_wrap_invalid_template_uses_default(#[case] template: &str) {
		// Arrange
		let field = spec(FieldOptions::new().label(false).wrapper(template));

		// Act
		let html = wrap("<input />", &field);

		// Assert
		assert_eq!(html, r#"<div class="input text"><input /></div>"#);
	}

	#[rstest]
	fn test_content_is_not_reinterpreted() {
		// Arrange
		let field = spec(FieldOptions::new().label(false));

		// Act
		let html = wrap("{type}", &field);

		// Assert
		assert_eq!(html, r#"<div class="input text">{type}</div>"#);
	}

	#[rstest]
	fn test_check_template() {
		assert!(check_template("<li>{content}</li>").is_ok());
		assert!(matches!(
			check_template("<li></li>"),
			Err(FormError::InvalidWrapper(_))
		));
	}
}
