//! Authentication state held by a client: no token yet, or exactly one issued token.

// self
use crate::{
	_prelude::*,
	auth::{Token, TokenSecret},
};

/// Token held by a client.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum TokenState {
	/// No token has been issued yet (or it was cleared).
	#[default]
	Absent,
	/// The most recently issued token, valid or not.
	Present(Token),
}
impl TokenState {
	/// Returns the held token regardless of validity.
	pub fn token(&self) -> Option<&Token> {
		match self {
			Self::Absent => None,
			Self::Present(token) => Some(token),
		}
	}

	/// Returns the held token only if it is still valid at `instant`.
	pub fn usable_at(&self, instant: OffsetDateTime) -> Option<&Token> {
		match self {
			Self::Present(token) if token.is_valid_at(instant) => Some(token),
			_ => None,
		}
	}

	/// Returns `true` when a request at `instant` must acquire a new token first.
	pub fn needs_acquisition_at(&self, instant: OffsetDateTime) -> bool {
		self.usable_at(instant).is_none()
	}

	/// Returns the refresh credential of the held token, if any.
	pub fn refresh_token(&self) -> Option<&TokenSecret> {
		self.token().and_then(Token::refresh_token)
	}
}
impl From<Token> for TokenState {
	fn from(token: Token) -> Self {
		Self::Present(token)
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;

	#[test]
	fn acquisition_trigger_covers_every_state() {
		let issued = macros::datetime!(2025-01-01 00:00 UTC);
		let during = macros::datetime!(2025-01-01 00:30 UTC);
		let after = macros::datetime!(2025-01-01 02:00 UTC);
		let present = TokenState::from(Token::new_at(issued, "abc", 3600, "Bearer", None));

		assert!(TokenState::Absent.needs_acquisition_at(during));
		assert!(!present.needs_acquisition_at(during));
		assert!(present.needs_acquisition_at(after));
		assert!(present.token().is_some());
		assert!(present.usable_at(after).is_none());
	}

	#[test]
	fn refresh_credential_requires_a_token_that_carries_one() {
		let with_refresh = TokenState::from(Token::new("a", 60, "Bearer", Some("r1".into())));
		let without_refresh = TokenState::from(Token::new("a", 60, "Bearer", None));

		assert_eq!(with_refresh.refresh_token().map(TokenSecret::expose), Some("r1"));
		assert!(without_refresh.refresh_token().is_none());
		assert!(TokenState::Absent.refresh_token().is_none());
	}
}
