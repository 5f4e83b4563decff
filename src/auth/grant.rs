//! Grant selection and form encoding for token endpoint requests.

// crates.io
use url::form_urlencoded;
// self
use crate::{_prelude::*, auth::TokenSecret};

/// Grant type identifier for delegated JWT assertions.
pub const JWT_BEARER_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
/// Scope requested by the client-credentials grant.
pub const APPLICATION_SCOPE: &str = "am_application_scope,default";

/// Parameter set sent to the token endpoint.
#[derive(Clone, PartialEq, Eq)]
pub enum TokenGrant {
	/// App-only token for the client identity.
	ClientCredentials,
	/// Delegated token exchanged for a pre-issued user assertion.
	JwtBearer {
		/// Signed assertion forwarded to the token endpoint.
		assertion: TokenSecret,
	},
	/// Renewal of a previously issued token.
	RefreshToken {
		/// Refresh credential from the held token.
		refresh_token: TokenSecret,
	},
}
impl TokenGrant {
	/// Picks the acquisition grant: the delegated grant whenever a user assertion is configured,
	/// client credentials otherwise.
	pub fn select(user_assertion: Option<&TokenSecret>) -> Self {
		match user_assertion {
			Some(assertion) => Self::JwtBearer { assertion: assertion.clone() },
			None => Self::ClientCredentials,
		}
	}

	/// Returns the `grant_type` form value.
	pub fn grant_type(&self) -> &'static str {
		match self {
			Self::ClientCredentials => "client_credentials",
			Self::JwtBearer { .. } => JWT_BEARER_GRANT_TYPE,
			Self::RefreshToken { .. } => "refresh_token",
		}
	}

	/// Returns the form parameters, keyed and ordered by name.
	pub fn form(&self) -> BTreeMap<&'static str, String> {
		let mut form = BTreeMap::new();

		form.insert("grant_type", self.grant_type().to_owned());

		match self {
			Self::ClientCredentials => {
				form.insert("scope", APPLICATION_SCOPE.to_owned());
			},
			Self::JwtBearer { assertion } => {
				form.insert("assertion", assertion.expose().to_owned());
			},
			Self::RefreshToken { refresh_token } => {
				form.insert("refresh_token", refresh_token.expose().to_owned());
			},
		}

		form
	}

	/// Encodes [`form`](Self::form) as `application/x-www-form-urlencoded`.
	pub fn encode_form(&self) -> String {
		form_urlencoded::Serializer::new(String::new()).extend_pairs(self.form()).finish()
	}
}
impl Debug for TokenGrant {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("TokenGrant").field(&self.grant_type()).finish()
	}
}
impl Display for TokenGrant {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.grant_type())
	}
}
