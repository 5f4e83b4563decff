//! Authenticated resource requests and the verb wrappers built on them.

// crates.io
use oauth2::http::{
	Request,
	header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
};
use url::form_urlencoded;
// self
use crate::{
	_prelude::*,
	auth::Token,
	client::RapidClient,
	error::AuthError,
	http::{AsyncHttpClient, HttpTransport, Method, StatusCode, map_http_client_error},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};

const JSON_CONTENT_TYPE: &str = "application/json";

impl<C> RapidClient<C>
where
	C: ?Sized + HttpTransport,
{
	/// Sends an authenticated request to `<endpoint>/<path>` and returns the raw response body.
	///
	/// Acquires a token first when none is held or the held one has expired; acquisition failures
	/// surface as [`Error::Auth`]. Leading slashes in `path` are ignored. `body`, when present, is
	/// sent as JSON. Any status other than 200 fails with [`Error::Request`] and the response body
	/// is discarded.
	pub async fn request<B>(
		&self,
		method: Method,
		path: &str,
		body: Option<&B>,
		query: Option<&[(&str, &str)]>,
	) -> Result<Vec<u8>>
	where
		B: ?Sized + Serialize,
	{
		const KIND: FlowKind = FlowKind::Request;

		let span = FlowSpan::new(KIND, "request");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span.instrument(self.request_inner(method, path, body, query)).await;

		obs::record_flow_outcome(KIND, FlowOutcome::of(&result));

		result
	}

	/// Sends a GET request with optional query parameters.
	pub async fn get(&self, path: &str, query: Option<&[(&str, &str)]>) -> Result<Vec<u8>> {
		self.request::<()>(Method::GET, path, None, query).await
	}

	/// Sends a POST request with a JSON body.
	pub async fn post<B>(&self, path: &str, body: &B) -> Result<Vec<u8>>
	where
		B: ?Sized + Serialize,
	{
		self.request(Method::POST, path, Some(body), None).await
	}

	/// Sends a PUT request with a JSON body.
	pub async fn put<B>(&self, path: &str, body: &B) -> Result<Vec<u8>>
	where
		B: ?Sized + Serialize,
	{
		self.request(Method::PUT, path, Some(body), None).await
	}

	/// Sends a DELETE request.
	pub async fn delete(&self, path: &str) -> Result<Vec<u8>> {
		self.request::<()>(Method::DELETE, path, None, None).await
	}

	async fn request_inner<B>(
		&self,
		method: Method,
		path: &str,
		body: Option<&B>,
		query: Option<&[(&str, &str)]>,
	) -> Result<Vec<u8>>
	where
		B: ?Sized + Serialize,
	{
		let authorization = self.ensure_authorization().await?;
		let url = self.resource_url(path, query)?;
		let payload = body
			.map(|value| serde_json::to_vec(value))
			.transpose()
			.map_err(|source| Error::Encode { source })?;
		let mut builder = Request::builder()
			.method(method)
			.uri(url.as_str())
			.header(ACCEPT, JSON_CONTENT_TYPE)
			.header(AUTHORIZATION, authorization);

		if payload.is_some() {
			builder = builder.header(CONTENT_TYPE, JSON_CONTENT_TYPE);
		}

		let request = builder
			.body(payload.unwrap_or_default())
			.map_err(|source| Error::RequestBuild { source })?;
		let handle = self.http_client.handle();
		let response = handle
			.call(request)
			.await
			.map_err(|err| map_http_client_error(self.http_client.as_ref(), err))?;

		if response.status() != StatusCode::OK {
			return Err(Error::Request { status: response.status().as_u16() });
		}

		Ok(response.into_body())
	}

	/// Returns the `Authorization` value of a usable token, acquiring one if needed.
	async fn ensure_authorization(&self) -> Result<String, AuthError> {
		if let Some(value) = self.usable_authorization() {
			return Ok(value);
		}

		let _singleflight = self.exchange_gate.lock().await;

		// Another caller may have finished an exchange while this one waited.
		if let Some(value) = self.usable_authorization() {
			return Ok(value);
		}

		let token = self.acquire_locked().await?;

		Ok(token.authorization_header_value())
	}

	fn usable_authorization(&self) -> Option<String> {
		self.state
			.read()
			.usable_at(OffsetDateTime::now_utc())
			.map(Token::authorization_header_value)
	}

	/// Joins `path` onto the endpoint and parses the result, percent-encoding characters that
	/// cannot appear in a URI as-is.
	fn resource_url(&self, path: &str, query: Option<&[(&str, &str)]>) -> Result<Url> {
		let mut raw = format!("{}/{}", self.endpoint, path.trim_start_matches('/'));

		if let Some(pairs) = query.filter(|pairs| !pairs.is_empty()) {
			raw.push('?');
			raw.push_str(&form_urlencoded::Serializer::new(String::new()).extend_pairs(pairs).finish());
		}

		Url::parse(&raw).map_err(|source| Error::InvalidUrl { url: raw, source })
	}
}
