//! Field rendering strategies
//!
//! Each field type renders through a [`Widget`]. Widgets are looked up in a
//! [`WidgetRegistry`] by the canonical form of the field's type (see
//! [`canonical_type_key`]); types without a registered widget render as a
//! plain `<input>` of that type, which keeps any HTML5 input type usable
//! without registering anything.
//!
//! Widgets produce the control markup only. Labels and wrappers are added by
//! the form afterwards, unless the widget opts out through
//! [`Widget::decorated`].

pub mod button;
pub mod choice;
pub mod media;
pub mod text;
pub mod textarea;

pub use button::{Button, SubmitButton};
pub use choice::{CheckboxSelectMultiple, RadioSelect, Select};
pub use media::{Editor, Uploader};
pub use text::{RangeInput, TextInput};
pub use textarea::Textarea;

use crate::field::FieldSpec;
use crate::form::FormContext;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Base widget trait
pub trait Widget: Send + Sync {
	/// Render the control markup for `field`.
	///
	/// An empty string means the field renders nothing at all.
	fn render(&self, field: &FieldSpec, form: &FormContext) -> String;

	/// Whether the form adds a label and wrapper around this widget's markup.
	fn decorated(&self) -> bool {
		true
	}
}

/// Normalize a field type into its registry key.
///
/// Separators (`-`, `_`, whitespace) and lower-to-upper case transitions start
/// a new word; the first word is lowercased and later words are capitalized.
///
/// # Examples
///
/// ```
/// use quire_forms::widgets::canonical_type_key;
///
/// assert_eq!(canonical_type_key("datetime-local"), "datetimeLocal");
/// assert_eq!(canonical_type_key("submit_button"), "submitButton");
/// assert_eq!(canonical_type_key("submitButton"), "submitButton");
/// assert_eq!(canonical_type_key("TEXTAREA"), "textarea");
/// ```
pub fn canonical_type_key(type_name: &str) -> String {
	let mut words: Vec<String> = Vec::new();
	let mut current = String::new();
	let mut after_lower = false;

	for c in type_name.trim().chars() {
		if c == '-' || c == '_' || c.is_whitespace() {
			if !current.is_empty() {
				words.push(std::mem::take(&mut current));
			}
			after_lower = false;
			continue;
		}
		if c.is_uppercase() && after_lower {
			words.push(std::mem::take(&mut current));
		}
		after_lower = c.is_lowercase() || c.is_ascii_digit();
		current.push(c);
	}
	if !current.is_empty() {
		words.push(current);
	}

	let mut key = String::new();
	for (index, word) in words.iter().enumerate() {
		let lower = word.to_lowercase();
		if index == 0 {
			key.push_str(&lower);
		} else {
			let mut chars = lower.chars();
			if let Some(first) = chars.next() {
				key.extend(first.to_uppercase());
				key.push_str(chars.as_str());
			}
		}
	}
	key
}

/// Type-keyed widget lookup with a text-input fallback.
#[derive(Clone)]
pub struct WidgetRegistry {
	widgets: HashMap<String, Arc<dyn Widget>>,
	fallback: Arc<dyn Widget>,
}

impl WidgetRegistry {
	/// A registry where every type renders as a plain input.
	pub fn empty() -> Self {
		Self {
			widgets: HashMap::new(),
			fallback: Arc::new(TextInput),
		}
	}

	/// The built-in widget set.
	pub fn with_defaults() -> Self {
		let mut registry = Self::empty();
		registry.register("range", RangeInput);
		registry.register("radio", RadioSelect);
		registry.register("select", Select);
		registry.register("checkbox", CheckboxSelectMultiple);
		registry.register("textarea", Textarea);
		registry.register("button", Button);
		registry.register("submit", SubmitButton);
		registry.register("submitButton", SubmitButton);
		registry.register("editor", Editor);
		registry.register("uploader", Uploader);
		registry
	}

	/// Register `widget` for `type_name`, replacing any previous widget.
	pub fn register(&mut self, type_name: &str, widget: impl Widget + 'static) {
		self.register_shared(type_name, Arc::new(widget));
	}

	pub fn register_shared(&mut self, type_name: &str, widget: Arc<dyn Widget>) {
		self.widgets.insert(canonical_type_key(type_name), widget);
	}

	/// Replace the widget used for unregistered types.
	pub fn set_fallback(&mut self, widget: impl Widget + 'static) {
		self.fallback = Arc::new(widget);
	}

	pub fn contains(&self, type_name: &str) -> bool {
		self.widgets.contains_key(&canonical_type_key(type_name))
	}

	/// The widget for `type_name`, or the fallback.
	pub fn resolve(&self, type_name: &str) -> &dyn Widget {
		let key = canonical_type_key(type_name);
		match self.widgets.get(&key) {
			Some(widget) => widget.as_ref(),
			None => {
				tracing::debug!(field_type = %type_name, key = %key, "no widget registered; rendering as input");
				self.fallback.as_ref()
			}
		}
	}
}

impl Default for WidgetRegistry {
	fn default() -> Self {
		Self::with_defaults()
	}
}

impl fmt::Debug for WidgetRegistry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut keys: Vec<_> = self.widgets.keys().collect();
		keys.sort();
		f.debug_struct("WidgetRegistry").field("widgets", &keys).finish()
	}
}

/// Render the undecorated control markup of `field` with the form's widgets.
pub fn render(field: &FieldSpec, form: &FormContext) -> String {
	form.widgets().resolve(&field.field_type).render(field, form)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::field::FieldOptions;
	use crate::form::SubmissionKind;
	use rstest::rstest;

	struct Stars;

	impl Widget for Stars {
		fn render(&self, field: &FieldSpec, _form: &FormContext) -> String {
			format!("<stars name=\"{}\" />", field.html_name)
		}
	}

	#[rstest]
	#[case("text", "text")]
	#[case("datetime-local", "datetimeLocal")]
	#[case("Datetime_Local", "datetimeLocal")]
	#[case("submit button", "submitButton")]
	#[case("submitButton", "submitButton")]
	#[case("  Radio  ", "radio")]
	#[case("html5-color", "html5Color")]
	#[case("", "")]
	fn test_canonical_type_key(#[case] input: &str, #[case] expected: &str) {
		assert_eq!(canonical_type_key(input), expected);
	}

	#[rstest]
	fn test_defaults_cover_choice_and_composite_types() {
		// Arrange
		let registry = WidgetRegistry::with_defaults();

		// Assert
		for type_name in ["radio", "select", "checkbox", "textarea", "button", "submit_button", "editor", "uploader", "range"] {
			assert!(registry.contains(type_name), "missing widget for {type_name}");
		}
		assert!(!registry.contains("email"));
	}

	#[rstest]
	fn test_unknown_type_falls_back_to_input() {
		// Arrange
		let form = FormContext::new("f", SubmissionKind::Custom).unwrap();
		let field = form
			.field_spec("when", FieldOptions::new().field_type("datetime-local"))
			.unwrap();

		// Act
		let html = render(&field, &form);

		// Assert
		assert_eq!(
			html,
			r#"<input id="when" type="datetime-local" name="f[when]" value="" />"#
		);
	}

	#[rstest]
	fn test_registered_widget_is_dispatched() {
		// Arrange
		let mut form = FormContext::new("f", SubmissionKind::Custom).unwrap();
		form.register_widget("star-rating", Stars);
		let field = form
			.field_spec("score", FieldOptions::new().field_type("star_rating"))
			.unwrap();

		// Act
		let html = render(&field, &form);

		// Assert
		assert_eq!(html, r#"<stars name="f[score]" />"#);
	}

	#[rstest]
	fn test_debug_lists_sorted_keys() {
		// Arrange
		let mut registry = WidgetRegistry::empty();
		registry.register("textarea", Textarea);
		registry.register("radio", RadioSelect);

		// Act
		let debug = format!("{registry:?}");

		// Assert
		assert_eq!(debug, r#"WidgetRegistry { widgets: ["radio", "textarea"] }"#);
	}
}
