//! Authenticated RAPID API client: bearer token acquisition, expiry tracking, refresh, and JSON
//! request verbs behind one handle.
//!
//! ```no_run
//! # async fn demo() -> rapid_client::error::Result<()> {
//! use rapid_client::{client::RapidClient, config::ClientConfig};
//!
//! let client = RapidClient::new(ClientConfig::new("https://rapid.example.com/", "key", "secret"))?;
//! let widgets = client.get("/widgets", Some(&[("page", "2")])).await?;
//!
//! println!("{}", String::from_utf8_lossy(&widgets));
//! # Ok(())
//! # }
//! ```

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod obs;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and a scripted in-memory transport for tests; enabled via
	//! `cfg(test)` or the `test` crate feature.

	pub use crate::_prelude::*;

	// std
	use std::collections::VecDeque;
	// self
	use crate::{
		client::RapidClient,
		config::ClientConfig,
		http::{
			AsyncHttpClient, HttpClientError, HttpRequest, HttpResponse, HttpTransport, Method,
			StatusCode,
		},
	};
	#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

	/// Error returned by [`ScriptedTransport`] once its scripted responses run out.
	#[derive(Debug)]
	pub struct ScriptExhausted;
	impl Display for ScriptExhausted {
		fn fmt(&self, f: &mut Formatter) -> FmtResult {
			f.write_str("No scripted response left.")
		}
	}
	impl StdError for ScriptExhausted {}

	/// Request captured by [`ScriptedTransport`].
	#[derive(Clone, Debug, PartialEq)]
	pub struct RecordedRequest {
		/// HTTP method.
		pub method: Method,
		/// Full request URI.
		pub uri: String,
		/// Request headers.
		pub headers: oauth2::http::HeaderMap,
		/// Raw request body.
		pub body: Vec<u8>,
	}
	impl RecordedRequest {
		/// Returns a header value as text.
		pub fn header(&self, name: &str) -> Option<&str> {
			self.headers.get(name).and_then(|value| value.to_str().ok())
		}

		/// Returns the body as UTF-8 text.
		pub fn body_text(&self) -> String {
			String::from_utf8_lossy(&self.body).into_owned()
		}
	}
	impl From<HttpRequest> for RecordedRequest {
		fn from(request: HttpRequest) -> Self {
			let (parts, body) = request.into_parts();

			Self { method: parts.method, uri: parts.uri.to_string(), headers: parts.headers, body }
		}
	}

	/// Transport that records every request and answers from a queue of scripted responses.
	#[derive(Clone, Debug, Default)]
	pub struct ScriptedTransport {
		responses: Arc<Mutex<VecDeque<(u16, Vec<u8>)>>>,
		requests: Arc<Mutex<Vec<RecordedRequest>>>,
	}
	impl ScriptedTransport {
		/// Queues a response.
		pub fn respond(&self, status: u16, body: impl Into<Vec<u8>>) -> &Self {
			self.responses.lock().push_back((status, body.into()));

			self
		}

		/// Returns the requests sent so far, in order.
		pub fn requests(&self) -> Vec<RecordedRequest> {
			self.requests.lock().clone()
		}
	}
	impl HttpTransport for ScriptedTransport {
		type Handle = ScriptedTransport;
		type TransportError = ScriptExhausted;

		fn handle(&self) -> Self::Handle {
			self.clone()
		}
	}
	impl<'c> AsyncHttpClient<'c> for ScriptedTransport {
		type Error = HttpClientError<ScriptExhausted>;
		type Future =
			Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'c + Send + Sync>>;

		fn call(&'c self, request: HttpRequest) -> Self::Future {
			let transport = self.clone();

			Box::pin(async move {
				transport.requests.lock().push(RecordedRequest::from(request));

				let next = transport.responses.lock().pop_front();
				let (status, body) = next.ok_or_else(|| Box::new(ScriptExhausted))?;
				let mut response = HttpResponse::new(body);

				*response.status_mut() = StatusCode::from_u16(status)
					.map_err(|err| HttpClientError::<ScriptExhausted>::Other(err.to_string()))?;

				Ok(response)
			})
		}
	}

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	#[cfg(feature = "reqwest")]
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		test_reqwest_http_client_with_timeout(std::time::Duration::from_secs(10))
	}

	/// Same as [`test_reqwest_http_client`] with a caller-chosen timeout.
	#[cfg(feature = "reqwest")]
	pub fn test_reqwest_http_client_with_timeout(timeout: std::time::Duration) -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.timeout(timeout)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Builds a client over a fresh [`ScriptedTransport`] and returns both.
	pub fn scripted_client(
		config: ClientConfig,
	) -> (RapidClient<ScriptedTransport>, ScriptedTransport) {
		let transport = ScriptedTransport::default();
		let client = RapidClient::<ScriptedTransport>::with_http_client(config, transport.clone())
			.expect("Scripted client configuration should be valid.");

		(client, transport)
	}
}

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
