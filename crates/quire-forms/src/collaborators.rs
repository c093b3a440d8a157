//! Services the engine calls but never implements
//!
//! CSRF tokens and rich-text editors belong to the host platform. A form is
//! given implementations of these traits and passes names and values through.

/// Issues and verifies CSRF tokens for a submission scope.
pub trait TokenService: Send + Sync {
	/// Hidden-field markup carrying a fresh token for `scope`, submitted under
	/// `field_name`.
	fn issue(&self, scope: &str, field_name: &str) -> String;

	/// Whether `token` is valid for `scope`.
	fn verify(&self, token: &str, scope: &str) -> bool;
}

/// Renders a rich-text editor bound to a submission name.
///
/// The returned markup is inserted as is.
pub trait RichTextEditor: Send + Sync {
	fn render(&self, value: &str, element_name: &str) -> String;
}

#[cfg(test)]
pub(crate) mod testing {
	use super::*;

	/// Deterministic token service: the token is `"{scope}-token"`.
	pub(crate) struct StaticTokens;

	impl TokenService for StaticTokens {
		fn issue(&self, scope: &str, field_name: &str) -> String {
			format!(r#"<input type="hidden" name="{field_name}" value="{scope}-token" />"#)
		}

		fn verify(&self, token: &str, scope: &str) -> bool {
			token == format!("{scope}-token")
		}
	}

	/// Editor stub that echoes its inputs.
	pub(crate) struct EchoEditor;

	impl RichTextEditor for EchoEditor {
		fn render(&self, value: &str, element_name: &str) -> String {
			format!(r#"<div class="editor" data-name="{element_name}">{value}</div>"#)
		}
	}
}
