//! Client-level error types shared across configuration, token exchanges, and resource calls.

// self
use crate::_prelude::*;

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn StdError + Send + Sync>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Token endpoint failure while acquiring or refreshing credentials.
	#[error(transparent)]
	Auth(#[from] AuthError),
	/// Transport failure (DNS, TCP, TLS, timeout) while calling a resource endpoint.
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// Resource endpoint answered with a status other than 200.
	#[error("Resource endpoint returned unexpected status {status}.")]
	Request {
		/// HTTP status code returned by the resource endpoint.
		status: u16,
	},
	/// Endpoint and path did not form a valid URL.
	#[error("Resource URL `{url}` is invalid.")]
	InvalidUrl {
		/// URL text that failed to parse.
		url: String,
		/// Underlying parser failure.
		#[source]
		source: url::ParseError,
	},
	/// Resource request could not be assembled.
	#[error("Resource request could not be built.")]
	RequestBuild {
		/// Underlying HTTP builder failure.
		#[source]
		source: oauth2::http::Error,
	},
	/// Request body could not be serialized.
	#[error("Request body could not be encoded as JSON.")]
	Encode {
		/// Underlying serializer failure.
		#[source]
		source: serde_json::Error,
	},
}
impl Error {
	/// Returns the HTTP status attached to a request or token endpoint failure, if any.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Request { status } => Some(*status),
			Self::Auth(err) => err.status(),
			_ => None,
		}
	}
}

/// Configuration and validation failures raised while building a client.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// A required setting was empty.
	#[error("The {field} setting is required.")]
	MissingField {
		/// Name of the missing setting.
		field: &'static str,
	},
	/// A required environment variable was unset or empty.
	#[error("Environment variable `{name}` must be set.")]
	MissingVariable {
		/// Name of the missing variable.
		name: &'static str,
	},
	/// Endpoint does not parse as an absolute URL.
	#[error("Endpoint `{endpoint}` is not a valid URL.")]
	InvalidEndpoint {
		/// Endpoint after trailing-slash normalization.
		endpoint: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + StdError) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Token endpoint failures raised by acquisition and refresh.
#[derive(Debug, ThisError)]
pub enum AuthError {
	/// Token endpoint answered with a status other than 200.
	#[error("Token endpoint returned unexpected status {status} for the {grant} grant.")]
	Status {
		/// HTTP status code returned by the token endpoint.
		status: u16,
		/// Grant type label used for the exchange.
		grant: &'static str,
	},
	/// Token endpoint responded with JSON that does not describe a token.
	#[error("Token endpoint returned a malformed token response.")]
	TokenResponseParse {
		/// Structured parsing failure, including the offending JSON path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Token endpoint could not be reached.
	#[error("Token endpoint could not be reached.")]
	Transport(#[from] TransportError),
	/// Token request could not be constructed.
	#[error("Token request could not be constructed.")]
	RequestBuild(#[source] oauth2::http::Error),
}
impl AuthError {
	/// Returns the HTTP status reported by the token endpoint, if any.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Status { status, .. } => Some(*status),
			_ => None,
		}
	}
}

/// Transport-level failures (network, timeout, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// The transport gave up after its configured timeout.
	#[error("Request timed out while calling the API.")]
	Timeout {
		/// Transport-specific timeout error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the API.")]
	Io(#[from] std::io::Error),
	/// Transport reported a failure that carries only a message.
	#[error("HTTP client error occurred while calling the API: {message}.")]
	Other {
		/// Transport-supplied message.
		message: String,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + StdError) -> Self {
		Self::Network { source: Box::new(src) }
	}

	/// Wraps a transport-specific timeout error.
	pub fn timeout(src: impl 'static + Send + Sync + StdError) -> Self {
		Self::Timeout { source: Box::new(src) }
	}

	/// Returns `true` when the failure was a transport timeout.
	pub fn is_timeout(&self) -> bool {
		matches!(self, Self::Timeout { .. })
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		if e.is_timeout() { Self::timeout(e) } else { Self::network(e) }
	}
}
