//! # Quire
//!
//! Declarative HTML form rendering for admin and settings pages.
//!
//! Quire turns field declarations into consistent, escaped form markup with
//! nested array submission names that server-side form decoders map straight
//! back onto nested settings structures.
//!
//! ## Feature Flags
//!
//! - `forms` (default) - The form rendering engine
//! - `full` - All features enabled
//!
//! ## Quick Example
//!
//! ```
//! # #[cfg(feature = "forms")]
//! # {
//! use quire::prelude::*;
//!
//! let form = FormContext::new("settingsForm", SubmissionKind::Setting).unwrap();
//! let mut html = form.open();
//! html.push_str(
//!     &form
//!         .render_field("site_title", FieldOptions::new().attr("maxlength", "60"))
//!         .unwrap(),
//! );
//! html.push_str(&form.submit_button("Save", FieldOptions::new()).unwrap());
//! html.push_str(&form.close());
//!
//! assert!(html.contains(r#"name="settingsForm[site_title]""#));
//! # }
//! ```

// Re-export forms (forms feature)
#[cfg(feature = "forms")]
pub use quire_forms as forms;

#[cfg(feature = "forms")]
pub use quire_forms::{
	AttributeWhitelist, Attrs, Choice, Choices, FieldGroupOptions, FieldOptions, FieldSpec,
	FieldValue, FieldsetOptions, FormContext, FormData, FormError, FormResult, FormSettings,
	GroupPath, LabelSpec, LegendOptions, RichTextEditor, SubmissionKind, TokenService, Widget,
	WidgetRegistry, WrapperSpec,
};

/// Commonly used types for building forms.
pub mod prelude {
	#[cfg(feature = "forms")]
	pub use crate::{
		Choices, FieldGroupOptions, FieldOptions, FieldsetOptions, FormContext, FormError,
		FormResult, FormSettings, LegendOptions, SubmissionKind,
	};
}
