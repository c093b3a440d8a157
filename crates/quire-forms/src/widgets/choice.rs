//! Option-based widgets: radio groups, selects and checkbox groups
//!
//! All three need a non-empty option list. Without one they render nothing
//! and log a warning, so a malformed declaration leaves a blank field instead
//! of aborting the page.

use super::Widget;
use crate::attrs::{attrs_fragment, escape_html};
use crate::field::FieldSpec;
use crate::form::FormContext;
use crate::name::with_multiplicity;

fn has_choices(field: &FieldSpec) -> bool {
	if field.choices.is_empty() {
		tracing::warn!(
			field = %field.name,
			field_type = %field.field_type,
			"option-based field has no options; rendering nothing"
		);
		return false;
	}
	true
}

/// Radio select widget
///
/// One `<label>`-wrapped radio input per option, sharing the field's name.
#[derive(Debug, Clone, Default)]
pub struct RadioSelect;

impl RadioSelect {
	pub fn new() -> Self {
		Self
	}
}

impl Widget for RadioSelect {
	fn render(&self, field: &FieldSpec, _form: &FormContext) -> String {
		if !has_choices(field) {
			return String::new();
		}

		let mut html = String::new();
		let escaped_id = escape_html(&field.id);
		let escaped_name = escape_html(&field.html_name);
		let attrs = attrs_fragment(&field.attrs);

		for (i, choice) in field.choices.iter().enumerate() {
			html.push_str(&format!(
				r#"<label><input type="radio" id="{}_{}" name="{}" value="{}""#,
				escaped_id,
				i,
				escaped_name,
				escape_html(&choice.value)
			));
			if field.value.contains(&choice.value) {
				html.push_str(" checked");
			}
			html.push_str(&attrs);
			html.push_str(" /> ");
			html.push_str(&escape_html(&choice.label));
			html.push_str("</label>");
		}

		html
	}
}

/// Select dropdown
///
/// With `multiple` set the control accepts several values and the field's
/// value is read as a set.
#[derive(Debug, Clone, Default)]
pub struct Select;

impl Select {
	pub fn new() -> Self {
		Self
	}
}

impl Widget for Select {
	fn render(&self, field: &FieldSpec, _form: &FormContext) -> String {
		if !has_choices(field) {
			return String::new();
		}

		let mut html = format!(
			r#"<select id="{}" name="{}"{}"#,
			escape_html(&field.id),
			escape_html(&field.html_name),
			attrs_fragment(&field.attrs)
		);
		if field.multiple && !field.attrs.contains_key("multiple") {
			html.push_str(" multiple");
		}
		html.push('>');

		for choice in &field.choices {
			html.push_str(&format!(r#"<option value="{}""#, escape_html(&choice.value)));
			if field.value.contains(&choice.value) {
				html.push_str(" selected");
			}
			html.push('>');
			html.push_str(&escape_html(&choice.label));
			html.push_str("</option>");
		}

		html.push_str("</select>");
		html
	}
}

/// Checkbox group
///
/// Checkbox groups are always multi-valued, so the submission name carries the
/// `[]` marker whether or not the field asked for it.
#[derive(Debug, Clone, Default)]
pub struct CheckboxSelectMultiple;

impl CheckboxSelectMultiple {
	pub fn new() -> Self {
		Self
	}
}

impl Widget for CheckboxSelectMultiple {
	fn render(&self, field: &FieldSpec, _form: &FormContext) -> String {
		if !has_choices(field) {
			return String::new();
		}

		let mut html = String::new();
		let escaped_id = escape_html(&field.id);
		let name = with_multiplicity(&field.html_name);
		let escaped_name = escape_html(&name);
		let attrs = attrs_fragment(&field.attrs);

		for (i, choice) in field.choices.iter().enumerate() {
			let input_id = format!("{}_{}", escaped_id, i);
			html.push_str(&format!(
				r#"<input type="checkbox" id="{}" name="{}" value="{}""#,
				input_id,
				escaped_name,
				escape_html(&choice.value)
			));
			if field.value.contains(&choice.value) {
				html.push_str(" checked");
			}
			html.push_str(&attrs);
			html.push_str(&format!(
				r#" /><label for="{}">{}</label>"#,
				input_id,
				escape_html(&choice.label)
			));
		}

		html
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::field::{Choices, FieldOptions};
	use crate::form::SubmissionKind;
	use rstest::rstest;

	fn form() -> FormContext {
		FormContext::new("settingsForm", SubmissionKind::Setting).unwrap()
	}

	fn colors() -> Choices {
		Choices::from_pairs([("r", "Red"), ("b", "Blue")])
	}

	#[rstest]
	fn test_radio_checks_matching_option() {
		// Arrange
		let form = form();
		let field = form
			.field_spec(
				"color",
				FieldOptions::new().field_type("radio").choices(colors()).value("b"),
			)
			.unwrap();

		// Act
		let html = RadioSelect.render(&field, &form);

		// Assert
		assert_eq!(
			html,
			concat!(
				r#"<label><input type="radio" id="color_0" name="settingsForm[color]" value="r" /> Red</label>"#,
				r#"<label><input type="radio" id="color_1" name="settingsForm[color]" value="b" checked /> Blue</label>"#,
			)
		);
	}

	#[rstest]
	fn test_select_marks_selected_option() {
		// Arrange
		let form = form();
		let field = form
			.field_spec(
				"color",
				FieldOptions::new().field_type("select").choices(colors()).value("b"),
			)
			.unwrap();

		// Act
		let html = Select.render(&field, &form);

		// Assert
		assert_eq!(
			html,
			r#"<select id="color" name="settingsForm[color]"><option value="r">Red</option><option value="b" selected>Blue</option></select>"#
		);
	}

	#[rstest]
	fn test_select_multiple_treats_value_as_set() {
		// Arrange
		let form = form();
		let field = form
			.field_spec(
				"color",
				FieldOptions::new()
					.field_type("select")
					.choices(colors())
					.multiple(true)
					.value(vec!["r", "b"]),
			)
			.unwrap();

		// Act
		let html = Select.render(&field, &form);

		// Assert
		assert_eq!(
			html,
			r#"<select id="color" name="settingsForm[color][]" multiple><option value="r" selected>Red</option><option value="b" selected>Blue</option></select>"#
		);
	}

	#[rstest]
	#[case(false)]
	#[case(true)]
	fn test_checkbox_name_has_single_marker(#[case] multiple: bool) {
		// Arrange
		let form = form();
		let field = form
			.field_spec(
				"color",
				FieldOptions::new()
					.field_type("checkbox")
					.choices(colors())
					.multiple(multiple)
					.value(vec!["b"]),
			)
			.unwrap();

		// Act
		let html = CheckboxSelectMultiple.render(&field, &form);

		// Assert
		assert_eq!(
			html,
			concat!(
				r#"<input type="checkbox" id="color_0" name="settingsForm[color][]" value="r" /><label for="color_0">Red</label>"#,
				r#"<input type="checkbox" id="color_1" name="settingsForm[color][]" value="b" checked /><label for="color_1">Blue</label>"#,
			)
		);
	}

	#[rstest]
	fn test_scalar_value_checks_one_checkbox() {
		// Arrange
		let form = form();
		let field = form
			.field_spec(
				"color",
				FieldOptions::new().field_type("checkbox").choices(colors()).value("r"),
			)
			.unwrap();

		// Act
		let html = CheckboxSelectMultiple.render(&field, &form);

		// Assert
		assert_eq!(html.matches(" checked").count(), 1);
		assert!(html.contains(r#"value="r" checked"#));
	}

	#[rstest]
	#[case("radio")]
	#[case("select")]
	#[case("checkbox")]
	fn test_missing_options_render_nothing(#[case] field_type: &str) {
		// Arrange
		let form = form();
		let field = form
			.field_spec("color", FieldOptions::new().field_type(field_type))
			.unwrap();

		// Act
		let html = form.widgets().resolve(field_type).render(&field, &form);

		// Assert
		assert_eq!(html, "");
	}

	#[rstest]
	fn test_option_labels_are_escaped() {
		// Arrange
		let form = form();
		let field = form
			.field_spec(
				"pick",
				FieldOptions::new()
					.field_type("select")
					.choices(Choices::from_pairs([("<x>", "<b>bold</b>")])),
			)
			.unwrap();

		// Act
		let html = Select.render(&field, &form);

		// Assert
		assert!(html.contains(r#"<option value="&lt;x&gt;">&lt;b&gt;bold&lt;/b&gt;</option>"#));
	}
}
