//! Form context
//!
//! A [`FormContext`] carries everything a render call reads: the form's name
//! and submission target, the prefixing policy, the current group path, the
//! field registry, the attribute whitelist, the widget registry and the
//! optional host collaborators.
//!
//! The group path is the only mutable render state. It is changed explicitly
//! with [`FormContext::set_group`] and read by every later name resolution, so
//! one context must not be shared between concurrent renders. Construct one
//! per request instead.

use crate::attrs::{AttributeWhitelist, Attrs, attrs_fragment, escape_html};
use crate::collaborators::{RichTextEditor, TokenService};
use crate::error::{FormError, FormResult};
use crate::field::{FieldOptions, FieldSpec};
use crate::label::{self, derive_label_text, render_label};
use crate::name::{self, GroupPath, IntoGroupPath};
use crate::widgets::{self, Widget, WidgetRegistry};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Submitted form data handed to a validator.
pub type FormData = serde_json::Map<String, serde_json::Value>;

type Validator = dyn Fn(&FormData) -> FormData + Send + Sync;

/// Suffix of the hidden field carrying a form's CSRF token.
pub const NONCE_SUFFIX: &str = "_nonce";

/// Field name used by [`FormContext::submit_button`].
pub const SUBMIT_FIELD: &str = "submit";

/// Where the submitted values end up, which decides the default target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionKind {
	/// A site-wide settings page.
	Setting,
	/// Metadata attached to a content item.
	PostMeta,
	/// Anything else; the caller supplies the action.
	#[default]
	Custom,
}

impl SubmissionKind {
	pub fn default_action(&self) -> &'static str {
		match self {
			Self::Setting => "options.php",
			Self::PostMeta => "post.php",
			Self::Custom => "",
		}
	}

	pub fn default_method(&self) -> &'static str {
		"post"
	}
}

/// A `<legend>`: title and attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegendOptions {
	pub title: String,
	pub attrs: Attrs,
}

impl From<&str> for LegendOptions {
	fn from(title: &str) -> Self {
		Self::from(title.to_string())
	}
}

impl From<String> for LegendOptions {
	fn from(title: String) -> Self {
		Self {
			title,
			attrs: Attrs::new(),
		}
	}
}

/// A `<fieldset>` opened around a group of fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldsetOptions {
	pub legend: Option<LegendOptions>,
	pub attrs: Attrs,
	pub disabled: bool,
}

impl FieldsetOptions {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn legend(mut self, legend: impl Into<LegendOptions>) -> Self {
		self.legend = Some(legend.into());
		self
	}

	pub fn disabled(mut self, disabled: bool) -> Self {
		self.disabled = disabled;
		self
	}
}

/// Options of a group render with [`FormContext::render_fields`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldGroupOptions {
	/// Wrap the fields in a fieldset.
	pub fieldset: Option<FieldsetOptions>,
	/// Group path for members that do not set their own.
	pub group: Option<GroupPath>,
	/// Token scope; emits the hidden CSRF field before the members.
	pub nonce: Option<String>,
}

impl FieldGroupOptions {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn fieldset(mut self, fieldset: FieldsetOptions) -> Self {
		self.fieldset = Some(fieldset);
		self
	}

	pub fn group(mut self, group: impl IntoGroupPath) -> Self {
		self.group = Some(group.into_group_path());
		self
	}

	pub fn nonce(mut self, scope: impl Into<String>) -> Self {
		self.nonce = Some(scope.into());
		self
	}
}

/// Rendering context of one form.
///
/// # Examples
///
/// ```
/// use quire_forms::field::{Choices, FieldOptions};
/// use quire_forms::form::{FormContext, SubmissionKind};
///
/// let form = FormContext::new("settingsForm", SubmissionKind::Setting).unwrap();
/// let html = form
///     .render_field(
///         "color",
///         FieldOptions::new()
///             .field_type("select")
///             .choices(Choices::from_pairs([("r", "Red"), ("b", "Blue")]))
///             .value("b"),
///     )
///     .unwrap();
///
/// assert!(html.contains(r#"name="settingsForm[color]""#));
/// assert!(html.contains(r#"<option value="b" selected>Blue</option>"#));
/// assert_eq!(form.open(), r#"<form id="settingsForm" action="options.php" method="post">"#);
/// ```
#[derive(Clone)]
pub struct FormContext {
	name: String,
	kind: SubmissionKind,
	action: Option<String>,
	method: Option<String>,
	attrs: Attrs,
	prefix_enabled: bool,
	group_path: GroupPath,
	fields: Vec<(String, FieldOptions)>,
	whitelist: AttributeWhitelist,
	widgets: WidgetRegistry,
	tokens: Option<Arc<dyn TokenService>>,
	editor: Option<Arc<dyn RichTextEditor>>,
	validator: Option<Arc<Validator>>,
}

impl FormContext {
	/// Create a form context with prefixing enabled and no group.
	///
	/// Fails with [`FormError::InvalidForm`] when `name` is empty.
	pub fn new(name: impl Into<String>, kind: SubmissionKind) -> FormResult<Self> {
		let name = name.into();
		if name.trim().is_empty() {
			return Err(FormError::InvalidForm(
				"form name must not be empty".to_string(),
			));
		}
		Ok(Self {
			name,
			kind,
			action: None,
			method: None,
			attrs: Attrs::new(),
			prefix_enabled: true,
			group_path: GroupPath::new(),
			fields: Vec::new(),
			whitelist: AttributeWhitelist::default(),
			widgets: WidgetRegistry::with_defaults(),
			tokens: None,
			editor: None,
			validator: None,
		})
	}

	pub fn with_action(mut self, action: impl Into<String>) -> Self {
		self.action = Some(action.into());
		self
	}

	pub fn with_method(mut self, method: impl Into<String>) -> Self {
		self.method = Some(method.into());
		self
	}

	/// Attributes of the `<form>` tag. Pairs the whitelist rejects are dropped
	/// here, so [`FormContext::attrs`] only ever holds allowed pairs.
	pub fn with_attrs(mut self, attrs: Attrs) -> Self {
		self.attrs = self.whitelist.validate(&attrs);
		self
	}

	/// Enable or disable the form-name prefix on submission names.
	pub fn with_prefix(mut self, enabled: bool) -> Self {
		self.prefix_enabled = enabled;
		self
	}

	pub fn with_group(mut self, group: impl IntoGroupPath) -> Self {
		self.set_group(group);
		self
	}

	/// Replace the whitelist. Form attributes already set are filtered again.
	pub fn with_whitelist(mut self, whitelist: AttributeWhitelist) -> Self {
		self.attrs = whitelist.validate(&self.attrs);
		self.whitelist = whitelist;
		self
	}

	pub fn with_widgets(mut self, widgets: WidgetRegistry) -> Self {
		self.widgets = widgets;
		self
	}

	pub fn with_token_service(mut self, tokens: impl TokenService + 'static) -> Self {
		self.tokens = Some(Arc::new(tokens));
		self
	}

	pub fn with_editor(mut self, editor: impl RichTextEditor + 'static) -> Self {
		self.editor = Some(Arc::new(editor));
		self
	}

	/// Install the callback [`validate`](Self::validate) hands submitted data to.
	pub fn with_validator<F>(mut self, validator: F) -> Self
	where
		F: Fn(&FormData) -> FormData + Send + Sync + 'static,
	{
		self.validator = Some(Arc::new(validator));
		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn kind(&self) -> SubmissionKind {
		self.kind
	}

	/// The explicit action, else the submission kind's default.
	pub fn action(&self) -> &str {
		self.action
			.as_deref()
			.unwrap_or_else(|| self.kind.default_action())
	}

	pub fn method(&self) -> &str {
		self.method
			.as_deref()
			.unwrap_or_else(|| self.kind.default_method())
	}

	pub fn attrs(&self) -> &Attrs {
		&self.attrs
	}

	pub fn prefix_enabled(&self) -> bool {
		self.prefix_enabled
	}

	pub fn group_path(&self) -> &GroupPath {
		&self.group_path
	}

	pub fn whitelist(&self) -> &AttributeWhitelist {
		&self.whitelist
	}

	pub fn widgets(&self) -> &WidgetRegistry {
		&self.widgets
	}

	pub fn editor(&self) -> Option<&dyn RichTextEditor> {
		self.editor.as_deref()
	}

	/// Replace the current group path; applies to every later resolution.
	pub fn set_group(&mut self, group: impl IntoGroupPath) {
		self.group_path = group.into_group_path();
	}

	/// Merge `fields` into the field registry.
	///
	/// A name registered again has its defaults replaced but keeps its place
	/// in registration order.
	pub fn register_fields<I, S>(&mut self, fields: I)
	where
		I: IntoIterator<Item = (S, FieldOptions)>,
		S: Into<String>,
	{
		for (name, options) in fields {
			let name = name.into();
			match self.fields.iter_mut().find(|(existing, _)| *existing == name) {
				Some((_, slot)) => *slot = options,
				None => self.fields.push((name, options)),
			}
		}
	}

	/// Registered defaults of `name`.
	pub fn registered_field(&self, name: &str) -> Option<&FieldOptions> {
		self.fields
			.iter()
			.find(|(existing, _)| existing == name)
			.map(|(_, options)| options)
	}

	pub fn registered_names(&self) -> impl Iterator<Item = &str> {
		self.fields.iter().map(|(name, _)| name.as_str())
	}

	/// Add or replace the widget rendering `type_name` in this form.
	pub fn register_widget(&mut self, type_name: &str, widget: impl Widget + 'static) {
		self.widgets.register(type_name, widget);
	}

	/// Fully-qualified submission name of `field` in this form.
	pub fn resolve_name(&self, field: &FieldSpec) -> FormResult<String> {
		name::resolve_name(self, field)
	}

	/// The opening `<form>` tag, with the form name as id.
	pub fn open(&self) -> String {
		self.open_with_id(&self.name)
	}

	pub fn open_with_id(&self, id: &str) -> String {
		let id = if id.is_empty() { self.name.as_str() } else { id };
		format!(
			r#"<form id="{}" action="{}" method="{}"{}>"#,
			escape_html(id),
			escape_html(self.action()),
			escape_html(self.method()),
			attrs_fragment(&self.attrs)
		)
	}

	pub fn close(&self) -> String {
		"</form>".to_string()
	}

	/// Build the render-ready spec of `name`, layering `options` over the
	/// registered defaults.
	pub fn field_spec(&self, name: &str, options: FieldOptions) -> FormResult<FieldSpec> {
		FieldSpec::build(name, self.layer_registered(name, options), self)
	}

	fn layer_registered(&self, name: &str, options: FieldOptions) -> FieldOptions {
		match self.registered_field(name) {
			Some(defaults) => options.merged_over(defaults),
			None => options,
		}
	}

	/// Render one field: control markup, then label, then wrapper.
	///
	/// Fails with [`FormError::InvalidField`] when `name` is empty. A field
	/// whose widget renders nothing yields an empty string with no label or
	/// wrapper.
	pub fn render_field(&self, name: &str, options: FieldOptions) -> FormResult<String> {
		let field = self.field_spec(name, options)?;
		Ok(self.render_spec(&field))
	}

	/// Render an already-built spec.
	pub fn render_spec(&self, field: &FieldSpec) -> String {
		let widget = self.widgets.resolve(&field.field_type);
		let inner = widget.render(field, self);
		if inner.is_empty() || !widget.decorated() {
			return inner;
		}
		label::wrap(&inner, field)
	}

	/// Render a group of fields in order.
	///
	/// A member that fails to render is logged and skipped, so one bad member
	/// never aborts the group.
	pub fn render_fields<I, S>(&self, fields: I, options: &FieldGroupOptions) -> String
	where
		I: IntoIterator<Item = (S, FieldOptions)>,
		S: AsRef<str>,
	{
		let mut html = String::new();
		if let Some(fieldset) = &options.fieldset {
			html.push_str(&self.fieldset_open(fieldset));
		}
		if let Some(scope) = &options.nonce {
			html.push_str(&self.hidden_fields(scope));
		}

		for (name, field_options) in fields {
			let name = name.as_ref();
			// The group default applies only when neither the caller nor the
			// registry places the field.
			let mut field_options = self.layer_registered(name, field_options);
			if field_options.group.is_none() {
				field_options.group = options.group.clone();
			}
			match FieldSpec::build(name, field_options, self) {
				Ok(field) => html.push_str(&self.render_spec(&field)),
				Err(error) => {
					tracing::warn!(form = %self.name, field = %name, %error, "skipping group member");
				}
			}
		}

		if options.fieldset.is_some() {
			html.push_str(&self.fieldset_close());
		}
		html
	}

	/// Render every registered field in registration order.
	pub fn render_registered(&self) -> String {
		let fields: Vec<_> = self
			.fields
			.iter()
			.map(|(name, _)| (name.as_str(), FieldOptions::new()))
			.collect();
		self.render_fields(fields, &FieldGroupOptions::default())
	}

	/// An `<input type="submit">` captioned `text`, or `Submit` when empty.
	///
	/// Never labeled or wrapped.
	pub fn submit_button(&self, text: &str, options: FieldOptions) -> FormResult<String> {
		let mut options = options.field_type("submitButton");
		if !text.is_empty() {
			options = options.value(text);
		}
		self.render_field(SUBMIT_FIELD, options)
	}

	/// A standalone `<label>`. Without `text` the label is derived from `for_id`.
	pub fn label(&self, for_id: &str, text: Option<&str>, attrs: &Attrs) -> String {
		let text = match text {
			Some(text) if !text.is_empty() => text.to_string(),
			_ => derive_label_text(for_id),
		};
		render_label(for_id, &text, &self.whitelist.validate(attrs))
	}

	/// A `<legend>`, or nothing when the title is empty.
	pub fn legend(&self, legend: &LegendOptions) -> String {
		if legend.title.is_empty() {
			return String::new();
		}
		format!(
			"<legend{}>{}</legend>",
			attrs_fragment(&self.whitelist.validate(&legend.attrs)),
			escape_html(&legend.title)
		)
	}

	pub fn fieldset_open(&self, fieldset: &FieldsetOptions) -> String {
		let attrs = self.whitelist.validate(&fieldset.attrs);
		let mut html = format!("<fieldset{}", attrs_fragment(&attrs));
		if fieldset.disabled && !attrs.contains_key("disabled") {
			html.push_str(" disabled");
		}
		html.push('>');
		if let Some(legend) = &fieldset.legend {
			html.push_str(&self.legend(legend));
		}
		html
	}

	pub fn fieldset_close(&self) -> String {
		"</fieldset>".to_string()
	}

	/// Hidden CSRF field for `scope`, submitted as `{form name}_nonce`.
	///
	/// Empty when no token service is configured.
	pub fn hidden_fields(&self, scope: &str) -> String {
		match &self.tokens {
			Some(tokens) => tokens.issue(scope, &format!("{}{}", self.name, NONCE_SUFFIX)),
			None => {
				tracing::debug!(form = %self.name, "no token service configured; emitting no hidden fields");
				String::new()
			}
		}
	}

	/// Check a submitted token. Always false without a token service.
	pub fn verify_token(&self, token: &str, scope: &str) -> bool {
		self.tokens
			.as_ref()
			.is_some_and(|tokens| tokens.verify(token, scope))
	}

	/// Hand submitted data to the validator, or return it unchanged.
	pub fn validate(&self, data: &FormData) -> FormData {
		match &self.validator {
			Some(validator) => validator(data),
			None => data.clone(),
		}
	}

	/// Undecorated control markup of `field`.
	pub fn render_control(&self, field: &FieldSpec) -> String {
		widgets::render(field, self)
	}
}

impl fmt::Debug for FormContext {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FormContext")
			.field("name", &self.name)
			.field("kind", &self.kind)
			.field("action", &self.action())
			.field("method", &self.method())
			.field("prefix_enabled", &self.prefix_enabled)
			.field("group_path", &self.group_path)
			.field("fields", &self.fields.len())
			.field("widgets", &self.widgets)
			.field("tokens", &self.tokens.is_some())
			.field("editor", &self.editor.is_some())
			.field("validator", &self.validator.is_some())
			.finish()
	}
}
