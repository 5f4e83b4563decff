//! Client configuration: required credentials, optional user assertion, transport timeout, and
//! environment loading.

// std
use std::time::Duration as StdDuration;
// self
use crate::{_prelude::*, auth::TokenSecret, error::ConfigError};

/// Environment variable holding the API base URL.
pub const ENV_BASE_URL: &str = "RAPID_BASE_URL";
/// Environment variable holding the client identifier.
pub const ENV_CLIENT_ID: &str = "RAPID_KEY";
/// Environment variable holding the client secret.
pub const ENV_CLIENT_SECRET: &str = "RAPID_SECRET";
/// Optional environment variable holding a pre-issued user assertion.
pub const ENV_USER_ASSERTION: &str = "RAPID_USER_WEB_TOKEN";

/// Settings used to construct a [`RapidClient`](crate::client::RapidClient).
#[derive(Clone)]
pub struct ClientConfig {
	/// Base URL every request path is resolved against.
	pub endpoint: String,
	/// Client identifier sent through Basic auth to the token endpoint.
	pub client_id: String,
	/// Client secret sent through Basic auth to the token endpoint.
	pub client_secret: String,
	/// Pre-issued user assertion enabling the delegated grant.
	pub user_assertion: Option<String>,
	/// Timeout applied by the default transport to every call.
	pub timeout: StdDuration,
}
impl ClientConfig {
	/// Timeout used unless [`with_timeout`](Self::with_timeout) overrides it.
	pub const DEFAULT_TIMEOUT: StdDuration = StdDuration::from_secs(600);

	/// Creates a configuration for the given endpoint and client credentials.
	pub fn new(
		endpoint: impl Into<String>,
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
	) -> Self {
		Self {
			endpoint: endpoint.into(),
			client_id: client_id.into(),
			client_secret: client_secret.into(),
			user_assertion: None,
			timeout: Self::DEFAULT_TIMEOUT,
		}
	}

	/// Attaches a pre-issued user assertion.
	pub fn with_user_assertion(mut self, assertion: impl Into<String>) -> Self {
		self.user_assertion = Some(assertion.into());

		self
	}

	/// Overrides the transport timeout.
	pub fn with_timeout(mut self, timeout: StdDuration) -> Self {
		self.timeout = timeout;

		self
	}

	/// Loads the configuration from the process environment.
	///
	/// Reads [`ENV_BASE_URL`], [`ENV_CLIENT_ID`], [`ENV_CLIENT_SECRET`] and, optionally,
	/// [`ENV_USER_ASSERTION`].
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_lookup(|name| std::env::var(name).ok())
	}

	/// Loads the configuration through `lookup`, which maps a variable name to its value.
	pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let required = |name: &'static str| {
			lookup(name)
				.filter(|value| !value.is_empty())
				.ok_or(ConfigError::MissingVariable { name })
		};
		let mut config =
			Self::new(required(ENV_BASE_URL)?, required(ENV_CLIENT_ID)?, required(ENV_CLIENT_SECRET)?);

		config.user_assertion = lookup(ENV_USER_ASSERTION).filter(|value| !value.is_empty());

		Ok(config)
	}

	/// Checks required settings and normalizes the endpoint.
	pub(crate) fn validate(self) -> Result<ValidatedConfig, ConfigError> {
		let endpoint = self.endpoint.trim_end_matches('/');

		if endpoint.is_empty() {
			return Err(ConfigError::MissingField { field: "endpoint" });
		}
		if self.client_id.is_empty() {
			return Err(ConfigError::MissingField { field: "client_id" });
		}
		if self.client_secret.is_empty() {
			return Err(ConfigError::MissingField { field: "client_secret" });
		}

		Url::parse(endpoint).map_err(|source| ConfigError::InvalidEndpoint {
			endpoint: endpoint.to_owned(),
			source,
		})?;

		Ok(ValidatedConfig {
			endpoint: endpoint.to_owned(),
			client_id: self.client_id,
			client_secret: TokenSecret::new(self.client_secret),
			user_assertion: self.user_assertion.and_then(TokenSecret::non_empty),
		})
	}
}
impl Debug for ClientConfig {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ClientConfig")
			.field("endpoint", &self.endpoint)
			.field("client_id", &self.client_id)
			.field("client_secret", &"<redacted>")
			.field("user_assertion_set", &self.user_assertion.is_some())
			.field("timeout", &self.timeout)
			.finish()
	}
}

/// Configuration that passed [`ClientConfig::validate`].
#[derive(Debug)]
pub(crate) struct ValidatedConfig {
	pub(crate) endpoint: String,
	pub(crate) client_id: String,
	pub(crate) client_secret: TokenSecret,
	pub(crate) user_assertion: Option<TokenSecret>,
}
