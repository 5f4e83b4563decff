//! Token acquisition: grant selection plus the token endpoint exchange shared with refresh.
//!
//! [`RapidClient::acquire`] always contacts `<endpoint>/token` with the grant chosen by
//! [`RapidClient::grant`], authenticating with HTTP Basic credentials. A 200 response is decoded
//! into a new [`Token`] that replaces the held one; any other status fails without touching the
//! held token or decoding the body.

// crates.io
use oauth2::http::{
	Request,
	header::{AUTHORIZATION, CONTENT_TYPE},
};
// self
use crate::{
	_prelude::*,
	auth::{Token, TokenGrant},
	client::RapidClient,
	error::AuthError,
	http::{AsyncHttpClient, HttpTransport, Method, StatusCode, map_http_client_error},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Successful token endpoint payload.
#[derive(Deserialize)]
struct TokenEndpointResponse {
	access_token: String,
	expires_in: i64,
	token_type: String,
	#[serde(default)]
	refresh_token: Option<String>,
}

impl<C> RapidClient<C>
where
	C: ?Sized + HttpTransport,
{
	/// Returns the grant used for fresh acquisitions.
	///
	/// Evaluated on every acquisition: a configured user assertion selects the JWT bearer grant,
	/// otherwise the client-credentials grant with the application scope.
	pub fn grant(&self) -> TokenGrant {
		TokenGrant::select(self.user_assertion.as_ref())
	}

	/// Acquires a new token and makes it the held token, even if the current one is still valid.
	pub async fn acquire(&self) -> Result<Token> {
		const KIND: FlowKind = FlowKind::Acquire;

		let span = FlowSpan::new(KIND, "acquire");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let _singleflight = self.exchange_gate.lock().await;

				self.acquire_locked().await
			})
			.await
			.map_err(Error::from);

		obs::record_flow_outcome(KIND, FlowOutcome::of(&result));

		result
	}

	/// Acquires a token; callers must hold the exchange gate.
	pub(super) async fn acquire_locked(&self) -> Result<Token, AuthError> {
		let grant = self.grant();

		self.exchange(&grant).await
	}

	/// Runs one token endpoint exchange and stores the issued token on success.
	pub(super) async fn exchange(&self, grant: &TokenGrant) -> Result<Token, AuthError> {
		self.token_metrics.record_exchange(grant);

		let result = self.exchange_inner(grant).await;

		match &result {
			Ok(token) => {
				obs::trace_token_replaced(grant.grant_type(), token.expires_at());
				self.store_token(token.clone());
			},
			Err(_) => self.token_metrics.record_failure(),
		}

		result
	}

	async fn exchange_inner(&self, grant: &TokenGrant) -> Result<Token, AuthError> {
		let request = Request::builder()
			.method(Method::POST)
			.uri(self.token_url())
			.header(AUTHORIZATION, self.basic_authorization())
			.header(CONTENT_TYPE, FORM_CONTENT_TYPE)
			.body(grant.encode_form().into_bytes())
			.map_err(AuthError::RequestBuild)?;
		let handle = self.http_client.handle();
		let response = handle
			.call(request)
			.await
			.map_err(|err| map_http_client_error(self.http_client.as_ref(), err))?;
		let status = response.status();

		obs::trace_token_exchange(grant.grant_type(), status.as_u16());

		if status != StatusCode::OK {
			return Err(AuthError::Status { status: status.as_u16(), grant: grant.grant_type() });
		}

		decode_token_response(response.body())
	}
}

/// Decodes a 200 token endpoint body into a [`Token`] issued now.
fn decode_token_response(body: &[u8]) -> Result<Token, AuthError> {
	let mut deserializer = serde_json::Deserializer::from_slice(body);
	let response: TokenEndpointResponse = serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|source| AuthError::TokenResponseParse { source })?;

	Ok(Token::new(
		response.access_token,
		response.expires_in,
		response.token_type,
		response.refresh_token,
	))
}
