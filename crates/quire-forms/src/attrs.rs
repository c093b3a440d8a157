//! HTML attribute validation and serialization
//!
//! Attribute maps handed to a form or a field are filtered through an
//! [`AttributeWhitelist`] before they are serialized. A pair survives only when
//! its key is known to the whitelist and its value matches the key's pattern.
//! Everything else is dropped without error. Serialized values are always
//! HTML-escaped, so attributes taken from admin input cannot break out of the
//! tag they are written into.

use crate::error::{FormError, FormResult};
use regex::Regex;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Attribute map, ordered by key so rendered markup is deterministic.
pub type Attrs = BTreeMap<String, String>;

// Keys that may be written at all: a letter, `_` or `:` followed by name characters.
static ATTRIBUTE_NAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^[A-Za-z_:][A-Za-z0-9_:.\-]*$")
		.expect("ATTRIBUTE_NAME_REGEX: invalid regex pattern")
});

// Suffix allowed after a family prefix such as `data-` or `aria-`.
static FAMILY_SUFFIX_REGEX: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^[a-z0-9][a-z0-9\-]*$").expect("FAMILY_SUFFIX_REGEX: invalid regex pattern")
});

/// Non-negative integers.
pub const NUMERIC_PATTERN: &str = r"^[0-9]+$";

/// Letters, digits, whitespace and common punctuation. Excludes `<`, `>`, `"`
/// and backticks.
pub const FREE_TEXT_PATTERN: &str = r"^[\p{L}\p{N}\p{Zs}.,:;!?'()\[\]_\-/@#%&+*=~]*$";

/// Longest attribute value, in characters, that any rule accepts.
pub const MAX_VALUE_LEN: usize = 512;

/// CSS class lists: space separated identifiers.
pub const CLASS_PATTERN: &str = r"^[A-Za-z0-9_\- ]{0,256}$";

/// Element identifiers referenced by `list`.
pub const IDENTIFIER_PATTERN: &str = r"^[A-Za-z][A-Za-z0-9_\-:.]{0,127}$";

/// Bounds for `min`/`max`: numbers, dates and times.
pub const BOUND_PATTERN: &str = r"^-?[0-9][0-9:.\-T]{0,31}$";

/// `step` is numeric only, or the keyword `any`.
pub const STEP_PATTERN: &str = r"^(?:any|[0-9]+(?:\.[0-9]+)?)$";

const BOOLEAN_ATTRIBUTES: &[&str] = &[
	"autofocus",
	"required",
	"disabled",
	"readonly",
	"multiple",
];

static DEFAULT_WHITELIST: LazyLock<AttributeWhitelist> = LazyLock::new(|| {
	let mut whitelist = AttributeWhitelist::empty();
	let rules: &[(&str, &str)] = &[
		("accesskey", r"^[A-Za-z0-9]$"),
		("class", CLASS_PATTERN),
		("tabindex", r"^-?[0-9]{1,5}$"),
		("width", NUMERIC_PATTERN),
		("height", NUMERIC_PATTERN),
		("size", NUMERIC_PATTERN),
		("maxlength", NUMERIC_PATTERN),
		("cols", NUMERIC_PATTERN),
		("rows", NUMERIC_PATTERN),
		("results", NUMERIC_PATTERN),
		("autocomplete", r"^[A-Za-z0-9 \-]{1,64}$"),
		("autosave", FREE_TEXT_PATTERN),
		("list", IDENTIFIER_PATTERN),
		("min", BOUND_PATTERN),
		("max", BOUND_PATTERN),
		("step", STEP_PATTERN),
		("placeholder", FREE_TEXT_PATTERN),
		("title", FREE_TEXT_PATTERN),
		("pattern", r#"^[^"<>`]+$"#),
	];
	for (key, pattern) in rules {
		whitelist.insert_compiled(
			key,
			Regex::new(pattern).expect("DEFAULT_WHITELIST: invalid regex pattern"),
		);
	}
	for key in BOOLEAN_ATTRIBUTES {
		let pattern = format!("^(?:true|{key})?$");
		whitelist.insert_compiled(
			key,
			Regex::new(&pattern).expect("DEFAULT_WHITELIST: invalid boolean pattern"),
		);
	}
	let free_text = Regex::new(FREE_TEXT_PATTERN).expect("FREE_TEXT_PATTERN: invalid regex pattern");
	whitelist.families.push(("data-".to_string(), free_text.clone()));
	whitelist.families.push(("aria-".to_string(), free_text));
	whitelist
});

/// Allowed attribute keys, each paired with the pattern its value must match.
///
/// Besides exact keys, a whitelist may hold attribute *families* (`data-`,
/// `aria-`): any key made of the family prefix followed by lowercase letters,
/// digits and hyphens is checked against the family pattern.
///
/// # Examples
///
/// ```
/// use quire_forms::attrs::{Attrs, AttributeWhitelist};
///
/// let whitelist = AttributeWhitelist::default();
/// let mut attrs = Attrs::new();
/// attrs.insert("class".to_string(), "wide".to_string());
/// attrs.insert("onclick".to_string(), "steal()".to_string());
///
/// let kept = whitelist.validate(&attrs);
/// assert_eq!(kept.len(), 1);
/// assert_eq!(kept.get("class").map(String::as_str), Some("wide"));
/// ```
#[derive(Debug, Clone)]
pub struct AttributeWhitelist {
	rules: BTreeMap<String, Regex>,
	families: Vec<(String, Regex)>,
}

impl AttributeWhitelist {
	/// A whitelist that accepts nothing.
	pub fn empty() -> Self {
		Self {
			rules: BTreeMap::new(),
			families: Vec::new(),
		}
	}

	/// The default HTML5 whitelist.
	pub fn html5() -> Self {
		DEFAULT_WHITELIST.clone()
	}

	/// Add or replace the rule for `key`.
	///
	/// # Examples
	///
	/// ```
	/// use quire_forms::attrs::AttributeWhitelist;
	///
	/// let whitelist = AttributeWhitelist::empty()
	///     .with_rule("step", r"^[0-9\-\/]{1,20}$")
	///     .unwrap();
	/// assert!(whitelist.allows("step", "-5"));
	/// assert!(!whitelist.allows("class", "wide"));
	/// ```
	pub fn with_rule(mut self, key: impl Into<String>, pattern: &str) -> FormResult<Self> {
		let key = key.into();
		let regex = Regex::new(pattern).map_err(|source| FormError::InvalidPattern {
			attribute: key.clone(),
			source,
		})?;
		self.rules.insert(key, regex);
		Ok(self)
	}

	/// Add or replace an attribute family such as `data-`.
	pub fn with_family(mut self, prefix: impl Into<String>, pattern: &str) -> FormResult<Self> {
		let prefix = prefix.into();
		let regex = Regex::new(pattern).map_err(|source| FormError::InvalidPattern {
			attribute: format!("{prefix}*"),
			source,
		})?;
		self.families.retain(|(existing, _)| existing != &prefix);
		self.families.push((prefix, regex));
		Ok(self)
	}

	/// Remove the rule for `key`, returning whether one existed.
	pub fn remove_rule(&mut self, key: &str) -> bool {
		self.rules.remove(key).is_some()
	}

	fn insert_compiled(&mut self, key: &str, regex: Regex) {
		self.rules.insert(key.to_string(), regex);
	}

	fn pattern_for(&self, key: &str) -> Option<&Regex> {
		if let Some(regex) = self.rules.get(key) {
			return Some(regex);
		}
		self.families.iter().find_map(|(prefix, regex)| {
			key.strip_prefix(prefix.as_str())
				.filter(|suffix| FAMILY_SUFFIX_REGEX.is_match(suffix))
				.map(|_| regex)
		})
	}

	/// Whether `key` is known and `value` fits [`MAX_VALUE_LEN`] and matches
	/// its pattern.
	pub fn allows(&self, key: &str, value: &str) -> bool {
		value.chars().count() <= MAX_VALUE_LEN
			&& self
				.pattern_for(key)
				.is_some_and(|regex| regex.is_match(value))
	}

	/// Keep only the pairs this whitelist allows.
	pub fn validate(&self, attrs: &Attrs) -> Attrs {
		attrs
			.iter()
			.filter(|(key, value)| {
				let allowed = self.allows(key, value);
				if !allowed {
					tracing::debug!(attribute = %key, "dropping attribute rejected by whitelist");
				}
				allowed
			})
			.map(|(key, value)| (key.clone(), value.clone()))
			.collect()
	}
}

impl Default for AttributeWhitelist {
	fn default() -> Self {
		Self::html5()
	}
}

/// Escapes HTML special characters for use in attribute values and text content.
///
/// Returns a borrowed reference if no escaping is needed.
pub fn escape_html(s: &str) -> Cow<'_, str> {
	if s.contains(['&', '<', '>', '"', '\'']) {
		let mut escaped = String::with_capacity(s.len() + 8);
		for c in s.chars() {
			match c {
				'&' => escaped.push_str("&amp;"),
				'<' => escaped.push_str("&lt;"),
				'>' => escaped.push_str("&gt;"),
				'"' => escaped.push_str("&quot;"),
				'\'' => escaped.push_str("&#x27;"),
				_ => escaped.push(c),
			}
		}
		Cow::Owned(escaped)
	} else {
		Cow::Borrowed(s)
	}
}

/// Serialize attributes as `key="value"` pairs joined by single spaces.
///
/// Values are HTML-escaped. Keys that are not valid attribute names are
/// skipped. An empty map yields an empty string.
///
/// # Examples
///
/// ```
/// use quire_forms::attrs::{serialize_attrs, Attrs};
///
/// let mut attrs = Attrs::new();
/// attrs.insert("class".to_string(), "a \"b\"".to_string());
/// attrs.insert("rows".to_string(), "8".to_string());
///
/// assert_eq!(serialize_attrs(&attrs), r#"class="a &quot;b&quot;" rows="8""#);
/// assert_eq!(serialize_attrs(&Attrs::new()), "");
/// ```
pub fn serialize_attrs(attrs: &Attrs) -> String {
	attrs
		.iter()
		.filter(|(key, _)| {
			let valid = ATTRIBUTE_NAME_REGEX.is_match(key);
			if !valid {
				tracing::debug!(attribute = %key, "skipping malformed attribute name");
			}
			valid
		})
		.map(|(key, value)| format!(r#"{}="{}""#, key, escape_html(value)))
		.collect::<Vec<_>>()
		.join(" ")
}

/// Serialized attributes with a leading space, or nothing when empty.
///
/// Used when splicing attributes into a tag after its fixed attributes.
pub(crate) fn attrs_fragment(attrs: &Attrs) -> String {
	let serialized = serialize_attrs(attrs);
	if serialized.is_empty() {
		serialized
	} else {
		format!(" {serialized}")
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn attrs(pairs: &[(&str, &str)]) -> Attrs {
		pairs
			.iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect()
	}

	#[rstest]
	#[case("class", "custom classes")]
	#[case("tabindex", "-1")]
	#[case("maxlength", "40")]
	#[case("cols", "40")]
	#[case("step", "0.5")]
	#[case("step", "any")]
	#[case("min", "2024-01-01")]
	#[case("placeholder", "Your name, please")]
	#[case("required", "")]
	#[case("required", "required")]
	#[case("data-nana-nana", "boo-boo")]
	#[case("aria-label", "Search")]
	fn test_default_whitelist_accepts(#[case] key: &str, #[case] value: &str) {
		// Arrange
		let whitelist = AttributeWhitelist::default();

		// Act
		let allowed = whitelist.allows(key, value);

		// Assert
		assert!(allowed, "Expected {key}={value:?} to be allowed");
	}

	#[rstest]
	#[case("class", "<script>alert(1)</script>")]
	#[case("step", "-5")]
	#[case("maxlength", "ten")]
	#[case("onclick", "steal()")]
	#[case("id", "custom")]
	#[case("required", "false")]
	#[case("data-", "empty family suffix")]
	#[case("data-X", "uppercase suffix")]
	#[case("placeholder", "say \"hi\"")]
	fn test_default_whitelist_rejects(#[case] key: &str, #[case] value: &str) {
		// Arrange
		let whitelist = AttributeWhitelist::default();

		// Act
		let allowed = whitelist.allows(key, value);

		// Assert
		assert!(!allowed, "Expected {key}={value:?} to be rejected");
	}

	#[rstest]
	fn test_default_whitelist_builds_every_rule() {
		// Act
		let whitelist = AttributeWhitelist::html5();

		// Assert
		assert_eq!(whitelist.rules.len(), 19 + BOOLEAN_ATTRIBUTES.len());
		let prefixes: Vec<&str> = whitelist
			.families
			.iter()
			.map(|(prefix, _)| prefix.as_str())
			.collect();
		assert_eq!(prefixes, ["data-", "aria-"]);
		for key in ["placeholder", "title", "autosave", "data-note", "aria-label"] {
			assert!(whitelist.allows(key, "Süße Grüße, 42"), "Expected {key} to accept free text");
		}
		assert!(whitelist.allows("pattern", "[0-9]{3}"));
	}

	#[rstest]
	#[case("placeholder", MAX_VALUE_LEN, true)]
	#[case("placeholder", MAX_VALUE_LEN + 1, false)]
	#[case("data-note", MAX_VALUE_LEN + 1, false)]
	#[case("pattern", MAX_VALUE_LEN + 1, false)]
	fn test_value_length_cap(#[case] key: &str, #[case] len: usize, #[case] expected: bool) {
		// Arrange
		let whitelist = AttributeWhitelist::default();
		let value = "é".repeat(len);

		// Act
		let allowed = whitelist.allows(key, &value);

		// Assert
		assert_eq!(allowed, expected);
	}

	#[rstest]
	fn test_validate_drops_invalid_pairs_silently() {
		// Arrange
		let whitelist = AttributeWhitelist::default();
		let input = attrs(&[
			("class", "<script>"),
			("rows", "8"),
			("onload", "x()"),
		]);

		// Act
		let kept = whitelist.validate(&input);

		// Assert
		assert_eq!(kept, attrs(&[("rows", "8")]));
	}

	#[rstest]
	fn test_custom_rule_overrides_default() {
		// Arrange
		let whitelist = AttributeWhitelist::default()
			.with_rule("step", r"^[0-9\-\/]{1,20}$")
			.unwrap();

		// Act
		let kept = whitelist.validate(&attrs(&[("step", "-5")]));

		// Assert
		assert_eq!(kept.get("step").map(String::as_str), Some("-5"));
	}

	#[rstest]
	fn test_invalid_rule_pattern_is_reported() {
		// Act
		let result = AttributeWhitelist::empty().with_rule("class", "[");

		// Assert
		assert!(matches!(result, Err(FormError::InvalidPattern { ref attribute, .. }) if attribute == "class"));
	}

	#[rstest]
	fn test_remove_rule() {
		// Arrange
		let mut whitelist = AttributeWhitelist::default();

		// Act
		let removed = whitelist.remove_rule("class");

		// Assert
		assert!(removed);
		assert!(!whitelist.allows("class", "wide"));
	}

	#[rstest]
	fn test_serialize_escapes_values() {
		// Arrange
		let input = attrs(&[("title", r#""><script>alert('x')</script>"#)]);

		// Act
		let html = serialize_attrs(&input);

		// Assert
		assert!(!html.contains("<script>"));
		assert_eq!(
			html,
			r#"title="&quot;&gt;&lt;script&gt;alert(&#x27;x&#x27;)&lt;/script&gt;""#
		);
	}

	#[rstest]
	fn test_serialize_skips_malformed_keys() {
		// Arrange
		let input = attrs(&[("bad key\"", "1"), ("rows", "2")]);

		// Act
		let html = serialize_attrs(&input);

		// Assert
		assert_eq!(html, r#"rows="2""#);
	}

	#[rstest]
	fn test_attrs_fragment() {
		assert_eq!(attrs_fragment(&Attrs::new()), "");
		assert_eq!(attrs_fragment(&attrs(&[("rows", "2")])), r#" rows="2""#);
	}

	#[rstest]
	fn test_escape_html_borrows_clean_input() {
		assert!(matches!(escape_html("plain"), Cow::Borrowed("plain")));
		assert_eq!(escape_html("A & B"), "A &amp; B");
	}
}
