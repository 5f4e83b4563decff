//! Issued bearer token with an expiry fixed at construction time.

// crates.io
use time::PrimitiveDateTime;
// self
use crate::{_prelude::*, auth::TokenSecret};

/// Bearer token issued by the token endpoint.
///
/// The expiry instant is derived once, from the issue instant plus the server-declared lifetime,
/// and never changes afterwards. A token is valid strictly before its expiry instant; a
/// non-positive lifetime therefore yields a token that is already expired.
#[derive(Clone, PartialEq, Eq)]
pub struct Token {
	access_token: TokenSecret,
	token_type: String,
	refresh_token: Option<TokenSecret>,
	lifetime_secs: i64,
	issued_at: OffsetDateTime,
	expires_at: OffsetDateTime,
}
impl Token {
	/// Creates a token issued now.
	pub fn new(
		access_token: impl Into<String>,
		lifetime_secs: i64,
		token_type: impl Into<String>,
		refresh_token: Option<String>,
	) -> Self {
		Self::new_at(OffsetDateTime::now_utc(), access_token, lifetime_secs, token_type, refresh_token)
	}

	/// Creates a token issued at `issued_at`.
	///
	/// An empty refresh credential is treated as absent.
	pub fn new_at(
		issued_at: OffsetDateTime,
		access_token: impl Into<String>,
		lifetime_secs: i64,
		token_type: impl Into<String>,
		refresh_token: Option<String>,
	) -> Self {
		Self {
			access_token: TokenSecret::new(access_token),
			token_type: token_type.into(),
			refresh_token: refresh_token.and_then(TokenSecret::non_empty),
			lifetime_secs,
			issued_at,
			expires_at: expiry_from(issued_at, lifetime_secs),
		}
	}

	/// Returns the `Authorization` header value, `"<type> <value>"`.
	pub fn authorization_header_value(&self) -> String {
		format!("{} {}", self.token_type, self.access_token.expose())
	}

	/// Returns `true` while the current clock is before the expiry instant.
	pub fn is_valid(&self) -> bool {
		self.is_valid_at(OffsetDateTime::now_utc())
	}

	/// Returns `true` if `instant` is strictly before the expiry instant.
	pub fn is_valid_at(&self, instant: OffsetDateTime) -> bool {
		instant < self.expires_at
	}

	/// Access token secret; callers must avoid logging it.
	pub fn access_token(&self) -> &TokenSecret {
		&self.access_token
	}

	/// Scheme name used verbatim in the `Authorization` header.
	pub fn token_type(&self) -> &str {
		&self.token_type
	}

	/// Refresh token secret, if the issuing grant supplied one.
	pub fn refresh_token(&self) -> Option<&TokenSecret> {
		self.refresh_token.as_ref()
	}

	/// Server-declared lifetime in seconds.
	pub fn lifetime_secs(&self) -> i64 {
		self.lifetime_secs
	}

	/// Instant the token was constructed.
	pub fn issued_at(&self) -> OffsetDateTime {
		self.issued_at
	}

	/// Instant from which the token is no longer valid.
	pub fn expires_at(&self) -> OffsetDateTime {
		self.expires_at
	}
}
impl Debug for Token {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Token")
			.field("access_token", &"<redacted>")
			.field("token_type", &self.token_type)
			.field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
			.field("lifetime_secs", &self.lifetime_secs)
			.field("issued_at", &self.issued_at)
			.field("expires_at", &self.expires_at)
			.finish()
	}
}

// Saturates instead of panicking when the lifetime runs past the calendar.
fn expiry_from(issued_at: OffsetDateTime, lifetime_secs: i64) -> OffsetDateTime {
	issued_at.checked_add(Duration::seconds(lifetime_secs)).unwrap_or_else(|| {
		if lifetime_secs > 0 {
			PrimitiveDateTime::MAX.assume_utc()
		} else {
			PrimitiveDateTime::MIN.assume_utc()
		}
	})
}
