//! Authenticated API client: owns the configuration and the held token, and composes token
//! acquisition with every outbound request.

mod acquire;
mod metrics;
mod refresh;
mod request;

pub use metrics::TokenMetrics;

// crates.io
use base64::{Engine, engine::general_purpose::STANDARD};
// self
use crate::{
	_prelude::*,
	auth::{Token, TokenSecret, TokenState},
	config::ClientConfig,
	http::HttpTransport,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type ReqwestRapidClient = RapidClient<ReqwestHttpClient>;

/// Client for a RAPID-style API behind an OAuth2 token endpoint.
///
/// The client holds at most one [`Token`]. Every request checks it first and acquires a new one
/// from `<endpoint>/token` when it is absent or expired, so callers never deal with
/// authentication directly. Token exchanges are serialized per client; requests that find a valid
/// token proceed without waiting.
pub struct RapidClient<C>
where
	C: ?Sized + HttpTransport,
{
	/// HTTP transport used for every outbound call.
	pub http_client: Arc<C>,
	endpoint: String,
	client_id: String,
	client_secret: TokenSecret,
	user_assertion: Option<TokenSecret>,
	token_metrics: Arc<TokenMetrics>,
	state: RwLock<TokenState>,
	exchange_gate: AsyncMutex<()>,
}
impl<C> RapidClient<C>
where
	C: ?Sized + HttpTransport,
{
	/// Creates a client that sends every call through `http_client`.
	///
	/// Fails when the endpoint, client id, or client secret is empty, or when the endpoint is not
	/// an absolute URL. Trailing slashes are stripped from the endpoint. The transport owns the
	/// timeout; [`ClientConfig::timeout`] only applies to transports built by [`RapidClient::new`].
	pub fn with_http_client(config: ClientConfig, http_client: impl Into<Arc<C>>) -> Result<Self> {
		let validated = config.validate()?;

		Ok(Self {
			http_client: http_client.into(),
			endpoint: validated.endpoint,
			client_id: validated.client_id,
			client_secret: validated.client_secret,
			user_assertion: validated.user_assertion,
			token_metrics: Default::default(),
			state: RwLock::new(TokenState::Absent),
			exchange_gate: AsyncMutex::new(()),
		})
	}

	/// Base URL with trailing slashes removed.
	pub fn endpoint(&self) -> &str {
		&self.endpoint
	}

	/// Client identifier presented to the token endpoint.
	pub fn client_id(&self) -> &str {
		&self.client_id
	}

	/// Returns `true` when a user assertion selects the delegated grant.
	pub fn has_user_assertion(&self) -> bool {
		self.user_assertion.is_some()
	}

	/// Counters for token exchanges performed by this client.
	pub fn token_metrics(&self) -> &TokenMetrics {
		&self.token_metrics
	}

	/// Snapshot of the held token, if any.
	pub fn token(&self) -> Option<Token> {
		self.state.read().token().cloned()
	}

	/// Snapshot of the authentication state.
	pub fn token_state(&self) -> TokenState {
		self.state.read().clone()
	}

	/// Drops the held token; the next request acquires a new one.
	pub fn clear_token(&self) {
		*self.state.write() = TokenState::Absent;
	}

	fn token_url(&self) -> String {
		format!("{}/token", self.endpoint)
	}

	fn basic_authorization(&self) -> String {
		let credentials = format!("{}:{}", self.client_id, self.client_secret.expose());

		format!("Basic {}", STANDARD.encode(credentials))
	}

	fn store_token(&self, token: Token) {
		*self.state.write() = TokenState::Present(token);
	}
}
#[cfg(feature = "reqwest")]
impl RapidClient<ReqwestHttpClient> {
	/// Creates a client backed by a reqwest transport that times out after
	/// [`ClientConfig::timeout`] (600 seconds unless overridden).
	pub fn new(config: ClientConfig) -> Result<Self> {
		let http_client = ReqwestHttpClient::with_timeout(config.timeout)?;

		Self::with_http_client(config, http_client)
	}

	/// Creates a client from the `RAPID_*` environment variables.
	pub fn from_env() -> Result<Self> {
		Self::new(ClientConfig::from_env()?)
	}
}
impl<C> Debug for RapidClient<C>
where
	C: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RapidClient")
			.field("endpoint", &self.endpoint)
			.field("client_id", &self.client_id)
			.field("user_assertion_set", &self.user_assertion.is_some())
			.field("token", &*self.state.read())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::_preludet::*;

	#[test]
	fn construction_normalizes_the_endpoint_and_starts_without_a_token() {
		let (client, _transport) = scripted_client(ClientConfig::new("https://api.test//", "k", "s"));

		assert_eq!(client.endpoint(), "https://api.test");
		assert_eq!(client.client_id(), "k");
		assert!(!client.has_user_assertion());
		assert_eq!(client.token_state(), TokenState::Absent);
	}

	#[test]
	fn construction_rejects_missing_credentials() {
		let err = RapidClient::<ScriptedTransport>::with_http_client(
			ClientConfig::new("https://api.test", "k", ""),
			ScriptedTransport::default(),
		)
		.expect_err("Empty secret should be rejected.");

		assert!(matches!(
			err,
			Error::Config(crate::error::ConfigError::MissingField { field: "client_secret" })
		));
	}

	#[test]
	fn basic_authorization_encodes_id_and_secret() {
		let (client, _transport) = scripted_client(ClientConfig::new("https://api.test", "k", "s"));

		assert_eq!(client.basic_authorization(), "Basic azpz");
		assert_eq!(client.token_url(), "https://api.test/token");
	}

	#[test]
	fn clear_token_returns_to_absent() {
		let (client, _transport) = scripted_client(ClientConfig::new("https://api.test", "k", "s"));

		client.store_token(Token::new("abc", 60, "Bearer", None));

		assert!(client.token().is_some());

		client.clear_token();

		assert_eq!(client.token_state(), TokenState::Absent);
	}

	#[test]
	fn debug_omits_credentials() {
		let (client, _transport) = scripted_client(
			ClientConfig::new("https://api.test", "k", "top-secret").with_user_assertion("jwt-value"),
		);
		let rendered = format!("{client:?}");

		assert!(!rendered.contains("top-secret"));
		assert!(!rendered.contains("jwt-value"));
		assert!(rendered.contains("user_assertion_set: true"));
	}
}
