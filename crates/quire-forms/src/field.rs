//! Field declarations and per-render field specifications
//!
//! [`FieldOptions`] is what callers (or settings files) declare for a field;
//! every member is optional so registry defaults and call-site options can be
//! layered. [`FieldSpec`] is the fully-resolved, validated shape a single
//! render call works on. It is built fresh for each call and never stored.

use crate::attrs::Attrs;
use crate::error::{FormError, FormResult};
use crate::form::FormContext;
use crate::name::{GroupPath, IntoGroupPath, resolve_name};
use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Type used when a field does not declare one.
pub const DEFAULT_FIELD_TYPE: &str = "text";

/// The current value of a field: a scalar, or a set of values for
/// multi-valued fields such as checkbox groups.
///
/// Deserializes from strings, numbers, booleans, `null` (empty) and lists of
/// scalars.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
	Single(String),
	Many(Vec<String>),
}

impl FieldValue {
	/// The value as written into a single `value` attribute or text node.
	///
	/// Multiple values are joined with commas.
	pub fn as_text(&self) -> String {
		match self {
			Self::Single(value) => value.clone(),
			Self::Many(values) => values.join(","),
		}
	}

	/// Membership test; a scalar behaves as a one-element set.
	pub fn contains(&self, candidate: &str) -> bool {
		match self {
			Self::Single(value) => value == candidate,
			Self::Many(values) => values.iter().any(|value| value == candidate),
		}
	}

	pub fn is_empty(&self) -> bool {
		match self {
			Self::Single(value) => value.is_empty(),
			Self::Many(values) => values.is_empty(),
		}
	}
}

impl Default for FieldValue {
	fn default() -> Self {
		Self::Single(String::new())
	}
}

impl From<&str> for FieldValue {
	fn from(value: &str) -> Self {
		Self::Single(value.to_string())
	}
}

impl From<String> for FieldValue {
	fn from(value: String) -> Self {
		Self::Single(value)
	}
}

impl<S: Into<String>> From<Vec<S>> for FieldValue {
	fn from(values: Vec<S>) -> Self {
		Self::Many(values.into_iter().map(Into::into).collect())
	}
}

impl<'de> Deserialize<'de> for FieldValue {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		struct FieldValueVisitor;

		impl<'de> Visitor<'de> for FieldValueVisitor {
			type Value = FieldValue;

			fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
				f.write_str("a scalar value or a list of scalar values")
			}

			fn visit_str<E: de::Error>(self, v: &str) -> Result<FieldValue, E> {
				Ok(FieldValue::Single(v.to_string()))
			}

			fn visit_string<E: de::Error>(self, v: String) -> Result<FieldValue, E> {
				Ok(FieldValue::Single(v))
			}

			fn visit_i64<E: de::Error>(self, v: i64) -> Result<FieldValue, E> {
				Ok(FieldValue::Single(v.to_string()))
			}

			fn visit_u64<E: de::Error>(self, v: u64) -> Result<FieldValue, E> {
				Ok(FieldValue::Single(v.to_string()))
			}

			fn visit_f64<E: de::Error>(self, v: f64) -> Result<FieldValue, E> {
				Ok(FieldValue::Single(v.to_string()))
			}

			fn visit_bool<E: de::Error>(self, v: bool) -> Result<FieldValue, E> {
				Ok(FieldValue::Single(v.to_string()))
			}

			fn visit_unit<E: de::Error>(self) -> Result<FieldValue, E> {
				Ok(FieldValue::default())
			}

			fn visit_none<E: de::Error>(self) -> Result<FieldValue, E> {
				Ok(FieldValue::default())
			}

			fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<FieldValue, A::Error> {
				let mut values = Vec::new();
				while let Some(Scalar(value)) = seq.next_element::<Scalar>()? {
					values.push(value);
				}
				Ok(FieldValue::Many(values))
			}
		}

		deserializer.deserialize_any(FieldValueVisitor)
	}
}

/// One selectable entry of a radio group, select or checkbox group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Choice {
	pub value: String,
	pub label: String,
}

impl Choice {
	pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
		Self {
			value: value.into(),
			label: label.into(),
		}
	}
}

/// Normalized, ordered option list.
///
/// Built either from `value => label` pairs or from a label-only list, in which
/// case each label's index becomes its value. Deserializes from both shapes,
/// keeping the declaration order of maps.
///
/// # Examples
///
/// ```
/// use quire_forms::field::Choices;
///
/// let pairs = Choices::from_pairs([("r", "Red"), ("b", "Blue")]);
/// assert_eq!(pairs.iter().map(|c| c.value.as_str()).collect::<Vec<_>>(), ["r", "b"]);
///
/// let labels = Choices::from_labels(["I love grapes!", "Bah. Grapes."]);
/// assert_eq!(labels.iter().map(|c| c.value.as_str()).collect::<Vec<_>>(), ["0", "1"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Choices(Vec<Choice>);

impl Choices {
	pub fn new() -> Self {
		Self(Vec::new())
	}

	pub fn from_pairs<V, L>(pairs: impl IntoIterator<Item = (V, L)>) -> Self
	where
		V: Into<String>,
		L: Into<String>,
	{
		Self(
			pairs
				.into_iter()
				.map(|(value, label)| Choice::new(value, label))
				.collect(),
		)
	}

	pub fn from_labels<L: Into<String>>(labels: impl IntoIterator<Item = L>) -> Self {
		Self(
			labels
				.into_iter()
				.enumerate()
				.map(|(index, label)| Choice::new(index.to_string(), label))
				.collect(),
		)
	}

	pub fn iter(&self) -> std::slice::Iter<'_, Choice> {
		self.0.iter()
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl<'a> IntoIterator for &'a Choices {
	type Item = &'a Choice;
	type IntoIter = std::slice::Iter<'a, Choice>;

	fn into_iter(self) -> Self::IntoIter {
		self.0.iter()
	}
}

impl FromIterator<Choice> for Choices {
	fn from_iter<I: IntoIterator<Item = Choice>>(iter: I) -> Self {
		Self(iter.into_iter().collect())
	}
}

// Scalar accepted as a choice value or label: strings, numbers and booleans.
struct Scalar(String);

impl<'de> Deserialize<'de> for Scalar {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		struct ScalarVisitor;

		impl Visitor<'_> for ScalarVisitor {
			type Value = Scalar;

			fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
				f.write_str("a string, number or boolean")
			}

			fn visit_str<E: de::Error>(self, v: &str) -> Result<Scalar, E> {
				Ok(Scalar(v.to_string()))
			}

			fn visit_string<E: de::Error>(self, v: String) -> Result<Scalar, E> {
				Ok(Scalar(v))
			}

			fn visit_i64<E: de::Error>(self, v: i64) -> Result<Scalar, E> {
				Ok(Scalar(v.to_string()))
			}

			fn visit_u64<E: de::Error>(self, v: u64) -> Result<Scalar, E> {
				Ok(Scalar(v.to_string()))
			}

			fn visit_f64<E: de::Error>(self, v: f64) -> Result<Scalar, E> {
				Ok(Scalar(v.to_string()))
			}

			fn visit_bool<E: de::Error>(self, v: bool) -> Result<Scalar, E> {
				Ok(Scalar(v.to_string()))
			}
		}

		deserializer.deserialize_any(ScalarVisitor)
	}
}

impl Serialize for Choices {
	fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		use serde::ser::SerializeMap;

		let mut map = serializer.serialize_map(Some(self.0.len()))?;
		for choice in &self.0 {
			map.serialize_entry(&choice.value, &choice.label)?;
		}
		map.end()
	}
}

impl<'de> Deserialize<'de> for Choices {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		struct ChoicesVisitor;

		impl<'de> Visitor<'de> for ChoicesVisitor {
			type Value = Choices;

			fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
				f.write_str("a map of value to label, or a list of labels")
			}

			fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Choices, A::Error> {
				let mut choices = Vec::new();
				while let Some((Scalar(value), Scalar(label))) = map.next_entry::<Scalar, Scalar>()? {
					choices.push(Choice { value, label });
				}
				Ok(Choices(choices))
			}

			fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Choices, A::Error> {
				let mut choices = Vec::new();
				while let Some(Scalar(label)) = seq.next_element::<Scalar>()? {
					choices.push(Choice {
						value: choices.len().to_string(),
						label,
					});
				}
				Ok(Choices(choices))
			}
		}

		deserializer.deserialize_any(ChoicesVisitor)
	}
}

/// Label policy of a field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LabelSpec {
	/// Derive the label text from the field name.
	#[default]
	Derive,
	/// No label.
	Hidden,
	/// Explicit label text.
	Text(String),
}

impl From<bool> for LabelSpec {
	fn from(show: bool) -> Self {
		if show { Self::Derive } else { Self::Hidden }
	}
}

impl From<&str> for LabelSpec {
	fn from(text: &str) -> Self {
		Self::from(text.to_string())
	}
}

impl From<String> for LabelSpec {
	fn from(text: String) -> Self {
		if text.is_empty() {
			Self::Derive
		} else {
			Self::Text(text)
		}
	}
}

/// Wrapper policy of a field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum WrapperSpec {
	/// The form's default wrapper.
	#[default]
	Default,
	/// Label and control returned bare.
	Bare,
	/// A custom template with exactly one `{content}` slot.
	Template(String),
}

impl From<bool> for WrapperSpec {
	fn from(wrap: bool) -> Self {
		if wrap { Self::Default } else { Self::Bare }
	}
}

impl From<&str> for WrapperSpec {
	fn from(template: &str) -> Self {
		Self::Template(template.to_string())
	}
}

impl From<String> for WrapperSpec {
	fn from(template: String) -> Self {
		Self::Template(template)
	}
}

// `false`/`true` or a string, shared by label and wrapper settings.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum FlagOrText {
	Flag(bool),
	Text(String),
}

impl<'de> Deserialize<'de> for LabelSpec {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		Ok(match FlagOrText::deserialize(deserializer)? {
			FlagOrText::Flag(show) => show.into(),
			FlagOrText::Text(text) => text.into(),
		})
	}
}

impl Serialize for LabelSpec {
	fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		match self {
			Self::Derive => FlagOrText::Flag(true),
			Self::Hidden => FlagOrText::Flag(false),
			Self::Text(text) => FlagOrText::Text(text.clone()),
		}
		.serialize(serializer)
	}
}

impl<'de> Deserialize<'de> for WrapperSpec {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		Ok(match FlagOrText::deserialize(deserializer)? {
			FlagOrText::Flag(wrap) => wrap.into(),
			FlagOrText::Text(template) => template.into(),
		})
	}
}

impl Serialize for WrapperSpec {
	fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		match self {
			Self::Default => FlagOrText::Flag(true),
			Self::Bare => FlagOrText::Flag(false),
			Self::Template(template) => FlagOrText::Text(template.clone()),
		}
		.serialize(serializer)
	}
}

/// Options declared for a field, at the call site or in the field registry.
///
/// # Examples
///
/// ```
/// use quire_forms::field::{Choices, FieldOptions};
///
/// let options = FieldOptions::new()
///     .field_type("select")
///     .choices(Choices::from_pairs([("r", "Red"), ("b", "Blue")]))
///     .value("b")
///     .label(false);
/// assert_eq!(options.field_type.as_deref(), Some("select"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FieldOptions {
	#[serde(rename = "type", skip_serializing_if = "Option::is_none")]
	pub field_type: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub value: Option<FieldValue>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub attrs: Option<Attrs>,
	#[serde(rename = "options", skip_serializing_if = "Option::is_none")]
	pub choices: Option<Choices>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub group: Option<GroupPath>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub multiple: Option<bool>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub label: Option<LabelSpec>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub wrapper: Option<WrapperSpec>,
	/// Fully-qualified submission name; bypasses name resolution.
	#[serde(rename = "name", skip_serializing_if = "Option::is_none")]
	pub name_override: Option<String>,
	/// Element id; defaults to the field name.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub id: Option<String>,
}

impl FieldOptions {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn field_type(mut self, field_type: impl Into<String>) -> Self {
		self.field_type = Some(field_type.into());
		self
	}

	pub fn value(mut self, value: impl Into<FieldValue>) -> Self {
		self.value = Some(value.into());
		self
	}

	pub fn attrs(mut self, attrs: Attrs) -> Self {
		self.attrs = Some(attrs);
		self
	}

	/// Add a single HTML attribute.
	pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.attrs
			.get_or_insert_with(Attrs::new)
			.insert(key.into(), value.into());
		self
	}

	pub fn choices(mut self, choices: Choices) -> Self {
		self.choices = Some(choices);
		self
	}

	pub fn group(mut self, group: impl IntoGroupPath) -> Self {
		self.group = Some(group.into_group_path());
		self
	}

	pub fn multiple(mut self, multiple: bool) -> Self {
		self.multiple = Some(multiple);
		self
	}

	pub fn label(mut self, label: impl Into<LabelSpec>) -> Self {
		self.label = Some(label.into());
		self
	}

	pub fn wrapper(mut self, wrapper: impl Into<WrapperSpec>) -> Self {
		self.wrapper = Some(wrapper.into());
		self
	}

	pub fn name_override(mut self, name: impl Into<String>) -> Self {
		self.name_override = Some(name.into());
		self
	}

	pub fn id(mut self, id: impl Into<String>) -> Self {
		self.id = Some(id.into());
		self
	}

	/// Layer these options over `defaults`.
	///
	/// Every member set here wins; unset members fall back to `defaults`.
	/// Attribute maps are merged key by key.
	pub fn merged_over(self, defaults: &FieldOptions) -> FieldOptions {
		let attrs = match (self.attrs, &defaults.attrs) {
			(Some(own), Some(base)) => {
				let mut merged = base.clone();
				merged.extend(own);
				Some(merged)
			}
			(own, base) => own.or_else(|| base.clone()),
		};
		FieldOptions {
			field_type: self.field_type.or_else(|| defaults.field_type.clone()),
			value: self.value.or_else(|| defaults.value.clone()),
			attrs,
			choices: self.choices.or_else(|| defaults.choices.clone()),
			group: self.group.or_else(|| defaults.group.clone()),
			multiple: self.multiple.or(defaults.multiple),
			label: self.label.or_else(|| defaults.label.clone()),
			wrapper: self.wrapper.or_else(|| defaults.wrapper.clone()),
			name_override: self.name_override.or_else(|| defaults.name_override.clone()),
			id: self.id.or_else(|| defaults.id.clone()),
		}
	}
}

/// A field ready to render: defaults applied, attributes validated, choices
/// normalized and submission name resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
	pub name: String,
	pub field_type: String,
	pub value: FieldValue,
	pub attrs: Attrs,
	pub choices: Choices,
	pub group_override: Option<GroupPath>,
	pub multiple: bool,
	pub label: LabelSpec,
	pub wrapper: WrapperSpec,
	pub id: String,
	/// Resolved submission name.
	pub html_name: String,
}

impl FieldSpec {
	/// Build the spec for `name` from already-merged `options`.
	///
	/// Attributes are filtered through the form's whitelist and the submission
	/// name is resolved against the form, unless `options` carries an explicit
	/// name.
	pub fn build(name: &str, options: FieldOptions, form: &FormContext) -> FormResult<Self> {
		if name.is_empty() {
			return Err(FormError::InvalidField(
				"field name must not be empty".to_string(),
			));
		}

		let field_type = options
			.field_type
			.map(|t| t.trim().to_string())
			.filter(|t| !t.is_empty())
			.unwrap_or_else(|| DEFAULT_FIELD_TYPE.to_string());
		let attrs = options
			.attrs
			.map(|attrs| form.whitelist().validate(&attrs))
			.unwrap_or_default();

		let mut spec = Self {
			name: name.to_string(),
			field_type,
			value: options.value.unwrap_or_default(),
			attrs,
			choices: options.choices.unwrap_or_default(),
			group_override: options.group,
			multiple: options.multiple.unwrap_or(false),
			label: options.label.unwrap_or_default(),
			wrapper: options.wrapper.unwrap_or_default(),
			id: options
				.id
				.filter(|id| !id.is_empty())
				.unwrap_or_else(|| name.to_string()),
			html_name: String::new(),
		};
		spec.html_name = match options.name_override.filter(|n| !n.is_empty()) {
			Some(explicit) => explicit,
			None => resolve_name(form, &spec)?,
		};
		Ok(spec)
	}
}
