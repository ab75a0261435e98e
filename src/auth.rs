//! Bearer credential wrapper that keeps the token out of logs.

// crates.io
use http::header::HeaderValue;
// self
use crate::{_prelude::*, error::ConstructionError};

/// Redacted bearer token used to authenticate every feed request.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);
impl BearerToken {
	/// Wraps a new token string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner token value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Formats the `Authorization` header value, marked sensitive so HTTP stacks skip it in
	/// their own debug output.
	pub fn header_value(&self) -> Result<HeaderValue, ConstructionError> {
		let mut value = HeaderValue::try_from(format!("Bearer {}", self.0))
			.map_err(|source| ConstructionError::InvalidToken { source })?;

		value.set_sensitive(true);

		Ok(value)
	}
}
impl From<String> for BearerToken {
	fn from(value: String) -> Self {
		Self(value)
	}
}
impl From<&str> for BearerToken {
	fn from(value: &str) -> Self {
		Self(value.to_owned())
	}
}
impl Debug for BearerToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("BearerToken").field(&"<redacted>").finish()
	}
}
impl Display for BearerToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}
