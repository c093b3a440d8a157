//! Declarative form configuration
//!
//! A form and its field registry can be declared in TOML or JSON:
//!
//! ```toml
//! name = "settingsForm"
//! kind = "setting"
//! group = "display,colors"
//!
//! [fields.color]
//! type = "select"
//! options = { r = "Red", b = "Blue" }
//! value = "b"
//!
//! [fields.notes]
//! type = "textarea"
//! attrs = { rows = "4" }
//! label = false
//! ```

use crate::attrs::Attrs;
use crate::error::{FormError, FormResult};
use crate::field::FieldOptions;
use crate::form::{FormContext, SubmissionKind};
use crate::name::GroupPath;
use serde::{Deserialize, Serialize};

fn default_prefix() -> bool {
	true
}

/// Deserialized form declaration.
///
/// Fields keep their declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FormSettings {
	pub name: String,
	#[serde(default)]
	pub kind: SubmissionKind,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub action: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub method: Option<String>,
	#[serde(default = "default_prefix")]
	pub prefix: bool,
	#[serde(default)]
	pub group: GroupPath,
	#[serde(default)]
	pub attrs: Attrs,
	#[serde(default, with = "ordered_fields")]
	pub fields: Vec<(String, FieldOptions)>,
}

impl FormSettings {
	/// Parse settings from TOML.
	///
	/// # Examples
	///
	/// ```
	/// use quire_forms::settings::FormSettings;
	///
	/// let settings = FormSettings::from_toml_str(r#"
	///     name = "profile"
	///     [fields.nickname]
	///     attrs = { maxlength = "20" }
	/// "#).unwrap();
	/// assert_eq!(settings.name, "profile");
	/// assert!(settings.prefix);
	/// assert_eq!(settings.fields.len(), 1);
	/// ```
	pub fn from_toml_str(source: &str) -> FormResult<Self> {
		toml::from_str(source).map_err(|e| FormError::Settings(e.to_string()))
	}

	pub fn from_json_value(value: serde_json::Value) -> FormResult<Self> {
		serde_json::from_value(value).map_err(|e| FormError::Settings(e.to_string()))
	}

	pub fn to_toml_string(&self) -> FormResult<String> {
		toml::to_string(self).map_err(|e| FormError::Settings(e.to_string()))
	}
}

impl FormContext {
	/// Build a form from its declaration, registering its fields.
	pub fn from_settings(settings: FormSettings) -> FormResult<Self> {
		let mut form = FormContext::new(settings.name, settings.kind)?
			.with_prefix(settings.prefix)
			.with_group(settings.group)
			.with_attrs(settings.attrs);
		if let Some(action) = settings.action {
			form = form.with_action(action);
		}
		if let Some(method) = settings.method {
			form = form.with_method(method);
		}
		form.register_fields(settings.fields);
		tracing::debug!(form = %form.name(), fields = form.registered_names().count(), "form loaded from settings");
		Ok(form)
	}
}

// The field registry is a table in configuration files but an ordered list in
// memory.
mod ordered_fields {
	use crate::field::FieldOptions;
	use serde::de::{MapAccess, Visitor};
	use serde::ser::SerializeMap;
	use serde::{Deserializer, Serializer};
	use std::fmt;

	pub(super) fn serialize<S: Serializer>(
		fields: &[(String, FieldOptions)],
		serializer: S,
	) -> Result<S::Ok, S::Error> {
		let mut map = serializer.serialize_map(Some(fields.len()))?;
		for (name, options) in fields {
			map.serialize_entry(name, options)?;
		}
		map.end()
	}

	pub(super) fn deserialize<'de, D: Deserializer<'de>>(
		deserializer: D,
	) -> Result<Vec<(String, FieldOptions)>, D::Error> {
		struct FieldsVisitor;

		impl<'de> Visitor<'de> for FieldsVisitor {
			type Value = Vec<(String, FieldOptions)>;

			fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
				f.write_str("a table of field name to field options")
			}

			fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
				let mut fields = Vec::new();
				while let Some((name, options)) = map.next_entry::<String, FieldOptions>()? {
					fields.push((name, options));
				}
				Ok(fields)
			}
		}

		deserializer.deserialize_map(FieldsVisitor)
	}
}
