//! Transport primitives for token exchanges and resource calls.
//!
//! [`HttpTransport`] is the client's only dependency on an HTTP stack. Requests and responses use
//! the `oauth2` crate's [`HttpRequest`]/[`HttpResponse`] aliases (plain `http` types with `Vec<u8>`
//! bodies) and its [`AsyncHttpClient`] contract, so any client that already speaks that contract
//! can be plugged in. The default implementation wraps `reqwest` with a bounded timeout.

pub use oauth2::{
	self, AsyncHttpClient, HttpClientError, HttpRequest, HttpResponse,
	http::{Method, StatusCode},
};

// self
use crate::{_prelude::*, error::TransportError};

/// Abstraction over HTTP transports used by the client.
///
/// Implementations must be `Send + Sync + 'static` so one transport can be shared by many
/// clients. The handles they return own whatever state the in-flight request needs, and their
/// request futures must be `Send`.
pub trait HttpTransport
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type TransportError: 'static + Send + Sync + StdError;

	/// [`AsyncHttpClient`] handle used for a single call.
	type Handle: for<'c> AsyncHttpClient<
			'c,
			Error = HttpClientError<Self::TransportError>,
			Future: 'c + Send,
		>
		+ 'static
		+ Send
		+ Sync;

	/// Returns a handle for the next call.
	fn handle(&self) -> Self::Handle;

	/// Classifies a transport-specific failure.
	///
	/// The default treats every failure as a network error; transports that can tell timeouts
	/// apart should override it.
	fn map_transport_error(&self, error: Self::TransportError) -> TransportError {
		TransportError::network(error)
	}
}

/// Converts an [`HttpClientError`] raised by `transport` into a [`TransportError`].
pub(crate) fn map_http_client_error<C>(
	transport: &C,
	error: HttpClientError<C::TransportError>,
) -> TransportError
where
	C: ?Sized + HttpTransport,
{
	match error {
		HttpClientError::Reqwest(inner) => transport.map_transport_error(*inner),
		HttpClientError::Http(inner) => TransportError::network(inner),
		HttpClientError::Io(inner) => TransportError::Io(inner),
		HttpClientError::Other(message) => TransportError::Other { message },
		other => TransportError::Other { message: format!("{other:?}") },
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a reqwest client that gives up on any call after `timeout`.
	pub fn with_timeout(timeout: std::time::Duration) -> Result<Self, crate::error::ConfigError> {
		let client = ReqwestClient::builder().timeout(timeout).build()?;

		Ok(Self(client))
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl HttpTransport for ReqwestHttpClient {
	type Handle = ReqwestHandle;
	type TransportError = ReqwestError;

	fn handle(&self) -> Self::Handle {
		ReqwestHandle(self.0.clone())
	}

	fn map_transport_error(&self, error: ReqwestError) -> TransportError {
		TransportError::from(error)
	}
}

/// Per-call handle returned by [`ReqwestHttpClient`].
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug)]
pub struct ReqwestHandle(ReqwestClient);
#[cfg(feature = "reqwest")]
impl<'c> AsyncHttpClient<'c> for ReqwestHandle {
	type Error = HttpClientError<ReqwestError>;
	type Future =
		Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'c + Send + Sync>>;

	fn call(&'c self, request: HttpRequest) -> Self::Future {
		let client = self.0.clone();

		Box::pin(async move {
			let response =
				client.execute(request.try_into().map_err(Box::new)?).await.map_err(Box::new)?;
			let status = response.status();
			let headers = response.headers().to_owned();
			let mut response_new =
				HttpResponse::new(response.bytes().await.map_err(Box::new)?.to_vec());

			*response_new.status_mut() = status;
			*response_new.headers_mut() = headers;

			Ok(response_new)
		})
	}
}
