// std
use std::time::Duration;
// crates.io
use httpmock::prelude::*;
// self
use rapid_client::{
	_preludet::*,
	client::RapidClient,
	config::{ClientConfig, ENV_BASE_URL, ENV_CLIENT_ID, ENV_CLIENT_SECRET, ENV_USER_ASSERTION},
	error::{AuthError, ConfigError, Error, TransportError},
	http::ReqwestHttpClient,
};

fn build_client(config: ClientConfig) -> RapidClient<ReqwestHttpClient> {
	RapidClient::<ReqwestHttpClient>::with_http_client(config, test_reqwest_http_client())
		.expect("Client configuration should be valid.")
}

#[tokio::test]
async fn delegated_grant_is_used_when_an_assertion_is_configured() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/token").header("authorization", "Basic azpz").body(
				"assertion=user.jwt&grant_type=urn%3Aietf%3Aparams%3Aoauth%3Agrant-type%3Ajwt-bearer",
			);
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"delegated\",\"expires_in\":600,\"token_type\":\"Bearer\",\"refresh_token\":\"r1\"}",
			);
		})
		.await;
	let client = build_client(ClientConfig::new(server.url(""), "k", "s").with_user_assertion("user.jwt"));
	let token = client.acquire().await.expect("Delegated acquisition should succeed.");

	assert_eq!(token.authorization_header_value(), "Bearer delegated");
	assert_eq!(token.refresh_token().map(|secret| secret.expose()), Some("r1"));
	assert!(token.is_valid());

	mock.assert_async().await;
}

#[tokio::test]
async fn refresh_rotates_with_the_refresh_credential() {
	let server = MockServer::start_async().await;
	let acquire_mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/token")
				.body("grant_type=client_credentials&scope=am_application_scope%2Cdefault");
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"first\",\"expires_in\":1,\"token_type\":\"Bearer\",\"refresh_token\":\"r1\"}",
			);
		})
		.await;
	let refresh_mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/token")
				.header("authorization", "Basic azpz")
				.body("grant_type=refresh_token&refresh_token=r1");
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"second\",\"expires_in\":3600,\"token_type\":\"Bearer\"}",
			);
		})
		.await;
	let client = build_client(ClientConfig::new(server.url("/"), "k", "s"));

	client.acquire().await.expect("Initial acquisition should succeed.");

	let refreshed = client.refresh().await.expect("Refresh should succeed.");

	assert_eq!(refreshed.access_token().expose(), "second");
	assert!(refreshed.refresh_token().is_none());
	assert_eq!(client.token(), Some(refreshed));
	assert_eq!(client.token_metrics().acquisitions(), 1);
	assert_eq!(client.token_metrics().refreshes(), 1);

	acquire_mock.assert_calls_async(1).await;
	refresh_mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn refresh_without_a_token_acquires() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/token")
				.header("content-type", "application/x-www-form-urlencoded")
				.body("grant_type=client_credentials&scope=am_application_scope%2Cdefault");
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"abc\",\"expires_in\":3600,\"token_type\":\"Bearer\"}",
			);
		})
		.await;
	let client = build_client(ClientConfig::new(server.url("/"), "k", "s"));

	client.refresh().await.expect("Refresh fallback should succeed.");

	mock.assert_async().await;
}

#[tokio::test]
async fn malformed_token_response_is_an_auth_error() {
	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(POST).path("/token");
			then.status(200).header("content-type", "application/json").body("{\"access_token\":42}");
		})
		.await;

	let client = build_client(ClientConfig::new(server.url("/"), "k", "s"));
	let err = client.acquire().await.expect_err("Malformed body should fail.");

	assert!(matches!(err, Error::Auth(AuthError::TokenResponseParse { .. })));
	assert!(client.token().is_none());
}

#[tokio::test]
async fn unreachable_token_endpoint_is_a_transport_failure() {
	let client = build_client(ClientConfig::new("http://127.0.0.1:9", "k", "s"));
	let err = client.acquire().await.expect_err("Closed port should fail.");

	assert!(matches!(err, Error::Auth(AuthError::Transport(_))));
}

#[tokio::test]
async fn slow_token_endpoint_surfaces_a_transport_timeout() {
	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(POST).path("/token");
			then.status(200).delay(Duration::from_secs(5)).body(
				"{\"access_token\":\"late\",\"expires_in\":3600,\"token_type\":\"Bearer\"}",
			);
		})
		.await;

	let client = RapidClient::<ReqwestHttpClient>::with_http_client(
		ClientConfig::new(server.url("/"), "k", "s"),
		test_reqwest_http_client_with_timeout(Duration::from_secs(1)),
	)
	.expect("Client configuration should be valid.");
	let err = client.acquire().await.expect_err("Slow token endpoint should time out.");

	assert!(
		matches!(err, Error::Auth(AuthError::Transport(TransportError::Timeout { .. }))),
		"Got {err:?}."
	);
	assert!(client.token().is_none());
}

#[test]
fn construction_rejects_missing_inputs() {
	for (config, field) in [
		(ClientConfig::new("", "k", "s"), "endpoint"),
		(ClientConfig::new("https://api.test", "", "s"), "client_id"),
		(ClientConfig::new("https://api.test", "k", ""), "client_secret"),
	] {
		let err = RapidClient::new(config).expect_err("Incomplete configuration should fail.");

		assert!(
			matches!(err, Error::Config(ConfigError::MissingField { field: actual }) if actual == field),
			"Expected missing {field}, got {err:?}."
		);
	}
}

#[test]
fn environment_lookup_builds_a_client() {
	let vars = [
		(ENV_BASE_URL, "https://rapid.example.com//"),
		(ENV_CLIENT_ID, "key"),
		(ENV_CLIENT_SECRET, "secret"),
		(ENV_USER_ASSERTION, ""),
	];
	let config = ClientConfig::from_lookup(|name: &str| {
		vars.iter().find(|(key, _)| *key == name).map(|(_, value)| (*value).to_owned())
	})
	.expect("Environment should load.");
	let client = RapidClient::new(config).expect("Client should build.");

	assert_eq!(client.endpoint(), "https://rapid.example.com");
	assert!(!client.has_user_assertion());
}
