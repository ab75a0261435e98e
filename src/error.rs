//! Client-level error types shared across the limiter, transport, and feed layers.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
///
/// Every layer hands these back to its caller unchanged; nothing in the crate retries.
#[derive(Debug, ThisError)]
pub enum Error {
	/// The request could not be built locally.
	#[error(transparent)]
	Construction(#[from] ConstructionError),
	/// Transport failure (DNS, TCP, TLS) or a closed rate limiter.
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Response body could not be decoded as a feed.
	#[error(transparent)]
	Decode(#[from] DecodeError),

	/// Service answered with an HTTP status of 400 or above.
	#[error("{status_line}")]
	Api {
		/// Numeric HTTP status code.
		status: u16,
		/// Raw status text, for example `404 Not Found`.
		status_line: String,
	},
}
impl Error {
	/// Builds an [`Error::Api`] from a response status.
	pub fn api(status: http::StatusCode) -> Self {
		let status_line = match status.canonical_reason() {
			Some(reason) => format!("{} {reason}", status.as_u16()),
			None => status.as_u16().to_string(),
		};

		Self::Api { status: status.as_u16(), status_line }
	}

	/// Returns the HTTP status code when the service rejected the request.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Api { status, .. } => Some(*status),
			Self::Decode(DecodeError::Body { status, .. }) => Some(*status),
			_ => None,
		}
	}
}

/// Local construction failures: malformed targets, credentials, or limiter settings.
#[derive(Debug, ThisError)]
pub enum ConstructionError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] http::Error),
	/// Resource path could not be joined onto the base URL.
	#[error("Feed endpoint `{path}` is not a valid URL.")]
	InvalidEndpoint {
		/// Resource path that failed to resolve.
		path: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Bearer token cannot be carried in an HTTP header.
	#[error("Bearer token contains characters that are not valid in an HTTP header.")]
	InvalidToken {
		/// Underlying header validation failure.
		#[source]
		source: http::header::InvalidHeaderValue,
	},

	/// Rate limiter refill period must be positive.
	#[error("Rate limiter refill period must be greater than zero.")]
	ZeroRefillPeriod,
	/// Rate limiter capacity exceeds what the bucket can hold.
	#[error("Rate limiter capacity {capacity} exceeds the supported maximum of {max}.")]
	CapacityTooLarge {
		/// Requested capacity.
		capacity: usize,
		/// Largest supported capacity.
		max: usize,
	},
	/// Rate limiter was created outside a tokio runtime.
	#[error("Rate limiter must be created inside a tokio runtime.")]
	MissingRuntime,
}
impl ConstructionError {
	/// Wraps a transport's builder failure inside [`ConstructionError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConstructionError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, limiter lifecycle).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the feed endpoint.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// The rate limiter was closed while a permit was requested.
	#[error("Rate limiter has been closed.")]
	LimiterClosed,
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

/// Response bodies that are not well-formed feed documents.
#[derive(Debug, ThisError)]
pub enum DecodeError {
	/// Feed endpoint responded with malformed JSON or an unexpected shape.
	#[error("Feed endpoint returned a malformed body.")]
	Body {
		/// Structured parsing failure, including the path to the offending field.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code of the response.
		status: u16,
	},
}
impl DecodeError {
	/// Returns the JSON path at which decoding failed.
	pub fn path(&self) -> String {
		match self {
			Self::Body { source, .. } => source.path().to_string(),
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn api_error_carries_raw_status_text() {
		let err = Error::api(http::StatusCode::NOT_FOUND);

		assert_eq!(err.to_string(), "404 Not Found");
		assert_eq!(err.status(), Some(404));
		assert!(matches!(err, Error::Api { status: 404, .. }));
	}

	#[test]
	fn api_error_without_reason_uses_code() {
		let status = http::StatusCode::from_u16(599).expect("599 should be a valid status code.");

		match Error::api(status) {
			Error::Api { status_line, .. } => assert_eq!(status_line, "599"),
			other => panic!("Unexpected error variant: {other:?}."),
		}
	}

	#[test]
	fn decode_error_reports_path() {
		#[derive(Debug, Deserialize)]
		struct Probe {
			#[allow(dead_code)]
			messages: Vec<u64>,
		}

		let body = br#"{"messages":[1,"two"]}"#;
		let source = serde_path_to_error::deserialize::<_, Probe>(
			&mut serde_json::Deserializer::from_slice(body),
		)
		.expect_err("String entry should fail to decode as an integer.");
		let err = DecodeError::Body { source, status: 200 };

		assert_eq!(err.path(), "messages[1]");
	}
}
