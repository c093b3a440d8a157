//! Submission name resolution
//!
//! Field names are composed into HTML form-encoded nested-array names such as
//! `settings[display][colors][]`, which server-side form decoders turn back
//! into nested maps. The composition is:
//!
//! ```text
//! prefix + "[g1]" + "[g2]" + ... + name-part + multiplicity
//! ```
//!
//! where `prefix` is the form name when prefixing is enabled, the name part is
//! bracketed whenever a prefix or a group precedes it, and multiplicity is
//! `[]` for multi-valued fields. With no prefix and no group the field name is
//! returned bare, so ungrouped metadata keys still submit under their own name.

use crate::error::{FormError, FormResult};
use crate::field::FieldSpec;
use crate::form::FormContext;
use serde::{Deserialize, Serialize};

/// Separator used when a group path is given as a single string.
pub const GROUP_DELIMITER: char = ',';

/// Suffix marking a multi-valued submission name.
pub const MULTIPLICITY_MARKER: &str = "[]";

/// An ordered list of nesting segments.
///
/// Always normalized: segments are trimmed, never empty and never contain the
/// [`GROUP_DELIMITER`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "GroupRepr", into = "Vec<String>")]
pub struct GroupPath(Vec<String>);

impl GroupPath {
	/// The empty path.
	pub fn new() -> Self {
		Self(Vec::new())
	}

	pub fn segments(&self) -> &[String] {
		&self.0
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Append one level of nesting. The segment is normalized like any other input.
	pub fn push(&mut self, segment: &str) {
		self.0.extend(normalize_segment(segment));
	}

	fn from_pieces<'a>(pieces: impl IntoIterator<Item = &'a str>) -> Self {
		Self(pieces.into_iter().flat_map(normalize_segment).collect())
	}
}

fn normalize_segment(segment: &str) -> impl Iterator<Item = String> + '_ {
	segment
		.split(GROUP_DELIMITER)
		.map(str::trim)
		.filter(|piece| !piece.is_empty())
		.map(str::to_string)
}

impl From<GroupPath> for Vec<String> {
	fn from(path: GroupPath) -> Self {
		path.0
	}
}

#[derive(Deserialize)]
#[serde(untagged)]
enum GroupRepr {
	Delimited(String),
	Segments(Vec<String>),
}

impl From<GroupRepr> for GroupPath {
	fn from(repr: GroupRepr) -> Self {
		match repr {
			GroupRepr::Delimited(s) => split_group(s.as_str()),
			GroupRepr::Segments(v) => split_group(v),
		}
	}
}

/// Anything that can be normalized into a [`GroupPath`].
///
/// Strings are split on [`GROUP_DELIMITER`]; sequences have each element split
/// the same way, so normalizing an already-normal path is a no-op.
pub trait IntoGroupPath {
	fn into_group_path(self) -> GroupPath;
}

impl IntoGroupPath for GroupPath {
	fn into_group_path(self) -> GroupPath {
		self
	}
}

impl IntoGroupPath for &GroupPath {
	fn into_group_path(self) -> GroupPath {
		self.clone()
	}
}

impl IntoGroupPath for &str {
	fn into_group_path(self) -> GroupPath {
		GroupPath::from_pieces([self])
	}
}

impl IntoGroupPath for String {
	fn into_group_path(self) -> GroupPath {
		GroupPath::from_pieces([self.as_str()])
	}
}

impl IntoGroupPath for &String {
	fn into_group_path(self) -> GroupPath {
		GroupPath::from_pieces([self.as_str()])
	}
}

impl<S: AsRef<str>> IntoGroupPath for Vec<S> {
	fn into_group_path(self) -> GroupPath {
		GroupPath::from_pieces(self.iter().map(AsRef::as_ref))
	}
}

impl<S: AsRef<str>> IntoGroupPath for &[S] {
	fn into_group_path(self) -> GroupPath {
		GroupPath::from_pieces(self.iter().map(AsRef::as_ref))
	}
}

impl<S: AsRef<str>, const N: usize> IntoGroupPath for [S; N] {
	fn into_group_path(self) -> GroupPath {
		GroupPath::from_pieces(self.iter().map(AsRef::as_ref))
	}
}

impl<T: IntoGroupPath> IntoGroupPath for Option<T> {
	fn into_group_path(self) -> GroupPath {
		self.map(IntoGroupPath::into_group_path).unwrap_or_default()
	}
}

/// Normalize a group argument into a [`GroupPath`].
///
/// # Examples
///
/// ```
/// use quire_forms::name::split_group;
///
/// let path = split_group("Nested,like,Russian,tea,dolls");
/// assert_eq!(path.segments(), ["Nested", "like", "Russian", "tea", "dolls"]);
/// assert_eq!(split_group(path.clone()), path);
/// assert!(split_group(None::<&str>).is_empty());
/// ```
pub fn split_group(group: impl IntoGroupPath) -> GroupPath {
	group.into_group_path()
}

/// Compose a submission name from its parts.
///
/// `prefix` is `None` when form prefixing is disabled. Fails with
/// [`FormError::InvalidField`] when `field` is empty.
///
/// # Examples
///
/// ```
/// use quire_forms::name::{compose_name, split_group};
///
/// let group = split_group(["grp", "sub"]);
/// assert_eq!(compose_name(Some("myform"), &group, "field", true).unwrap(), "myform[grp][sub][field][]");
/// assert_eq!(compose_name(None, &split_group(["a", "b"]), "x", false).unwrap(), "[a][b][x]");
/// assert_eq!(compose_name(None, &split_group(None::<&str>), "x", false).unwrap(), "x");
/// ```
pub fn compose_name(
	prefix: Option<&str>,
	group: &GroupPath,
	field: &str,
	multiple: bool,
) -> FormResult<String> {
	if field.is_empty() {
		return Err(FormError::InvalidField(
			"cannot resolve a submission name without a field name".to_string(),
		));
	}

	let mut name = String::new();
	if let Some(prefix) = prefix {
		name.push_str(prefix);
	}
	for segment in group.segments() {
		name.push('[');
		name.push_str(segment);
		name.push(']');
	}
	if prefix.is_some() || !group.is_empty() {
		name.push('[');
		name.push_str(field);
		name.push(']');
	} else {
		name.push_str(field);
	}
	if multiple {
		name.push_str(MULTIPLICITY_MARKER);
	}
	Ok(name)
}

/// Resolve the fully-qualified submission name of `field` within `form`.
///
/// The field's own group override wins over the form's current group path.
pub fn resolve_name(form: &FormContext, field: &FieldSpec) -> FormResult<String> {
	let prefix = form.prefix_enabled().then(|| form.name());
	let group = field.group_override.as_ref().unwrap_or(form.group_path());
	compose_name(prefix, group, &field.name, field.multiple)
}

/// Append the multiplicity marker unless `name` already ends with one.
pub fn with_multiplicity(name: &str) -> String {
	if name.ends_with(MULTIPLICITY_MARKER) {
		name.to_string()
	} else {
		format!("{name}{MULTIPLICITY_MARKER}")
	}
}
