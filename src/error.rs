//! Courier-level error types shared across the client, transport, and store layers.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Generic notification text used when a failure carries no caller-facing message.
const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong. Please try again.";

/// Canonical courier error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS, malformed payloads).
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// The credential was absent or rejected and a refresh did not recover it.
	#[error("Session has expired; sign in again to continue.")]
	SessionExpired,
	/// The API answered with a non-2xx status other than an authentication failure.
	#[error("Request failed with status {status}: {message}")]
	RequestFailed {
		/// HTTP status code returned by the endpoint.
		status: u16,
		/// Human-readable message resolved from the response body or status line.
		message: String,
		/// Structured error body, when the endpoint returned parseable JSON.
		body: Option<JsonValue>,
	},
}
impl Error {
	/// Resolves the user-facing text forwarded to the notification sink.
	///
	/// Structured failures surface their own message; transport and configuration
	/// failures collapse into a generic line, since their details are only
	/// actionable programmatically.
	pub fn user_message(&self) -> String {
		match self {
			Self::SessionExpired => self.to_string(),
			Self::RequestFailed { message, .. } => message.clone(),
			Self::Config(_) | Self::Transport(_) => GENERIC_FAILURE_MESSAGE.into(),
		}
	}
}

/// Configuration and validation failures raised on the caller's side of the wire.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// The endpoint path cannot be appended to the configured base URL.
	#[error("Endpoint `{endpoint}` does not form a valid URL against the base.")]
	InvalidEndpoint {
		/// Endpoint path supplied by the caller.
		endpoint: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// The request body could not be serialized to JSON.
	#[error("Request body could not be serialized to JSON.")]
	BodySerialization {
		/// Underlying serialization failure.
		#[source]
		source: serde_json::Error,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO, unusable payloads).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the API.")]
	Io(#[from] std::io::Error),
	/// A 2xx response carried a body that could not be parsed as the expected JSON.
	#[error("API returned a malformed JSON body.")]
	MalformedBody {
		/// Structured parsing failure with the offending path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code of the response, when available.
		status: Option<u16>,
	},
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

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn user_message_prefers_structured_payloads() {
		let failed =
			Error::RequestFailed { status: 403, message: "Forbidden resource".into(), body: None };

		assert_eq!(failed.user_message(), "Forbidden resource");
		assert!(Error::SessionExpired.user_message().contains("expired"));
	}

	#[test]
	fn user_message_is_generic_for_transport_failures() {
		let err = Error::from(TransportError::Io(std::io::Error::other("boom")));

		assert_eq!(err.user_message(), GENERIC_FAILURE_MESSAGE);
	}

	#[test]
	fn transport_error_preserves_source() {
		let err = Error::from(TransportError::network(std::io::Error::other("refused")));
		let source = StdError::source(&err).expect("Transport error should expose its source.");

		assert!(source.to_string().contains("refused"));
	}
}
