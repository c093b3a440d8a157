//! Error types for form construction and field rendering.
//!
//! Only programming errors surface here. Unsupported attributes, missing
//! option lists and unknown field types are handled in place (dropped,
//! rendered empty, or rendered as text) and reported through `tracing`.

/// Errors raised while building a form or rendering one of its fields.
#[derive(Debug, thiserror::Error)]
pub enum FormError {
	/// A field was rendered or resolved without a name.
	#[error("Invalid field: {0}")]
	InvalidField(String),
	/// A form was constructed without a name.
	#[error("Invalid form: {0}")]
	InvalidForm(String),
	/// A custom wrapper template does not contain exactly one `{content}` slot.
	#[error("Invalid wrapper template: {0}")]
	InvalidWrapper(String),
	/// A whitelist rule was registered with a pattern that does not compile.
	#[error("Invalid pattern for attribute {attribute}: {source}")]
	InvalidPattern {
		attribute: String,
		#[source]
		source: regex::Error,
	},
	/// Form settings could not be parsed.
	#[error("Settings error: {0}")]
	Settings(String),
}

pub type FormResult<T> = Result<T, FormError>;

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_invalid_field_message() {
		// Arrange
		let error = FormError::InvalidField("field name must not be empty".to_string());

		// Act
		let message = error.to_string();

		// Assert
		assert_eq!(message, "Invalid field: field name must not be empty");
	}

	#[rstest]
	fn test_invalid_pattern_keeps_source() {
		// Arrange
		let source = regex::Regex::new("(").unwrap_err();
		let error = FormError::InvalidPattern {
			attribute: "class".to_string(),
			source,
		};

		// Act
		let has_source = std::error::Error::source(&error).is_some();

		// Assert
		assert!(has_source);
		assert!(error.to_string().starts_with("Invalid pattern for attribute class"));
	}
}
