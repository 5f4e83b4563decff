//! Refresh of the held token.
//!
//! Refresh is an optimization rather than a capability: without a held token, or when the held
//! token carries no refresh credential, it performs a regular acquisition instead. The request
//! path never refreshes on its own; callers that want proactive rotation call
//! [`RapidClient::refresh`] themselves.

// self
use crate::{
	_prelude::*,
	auth::{Token, TokenGrant},
	client::RapidClient,
	http::HttpTransport,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};

impl<C> RapidClient<C>
where
	C: ?Sized + HttpTransport,
{
	/// Renews the held token with its refresh credential, falling back to a fresh acquisition.
	pub async fn refresh(&self) -> Result<Token> {
		const KIND: FlowKind = FlowKind::Refresh;

		let span = FlowSpan::new(KIND, "refresh");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let _singleflight = self.exchange_gate.lock().await;
				let refresh_token = self.state.read().refresh_token().cloned();
				let grant = match refresh_token {
					Some(refresh_token) => TokenGrant::RefreshToken { refresh_token },
					None => self.grant(),
				};

				self.exchange(&grant).await
			})
			.await
			.map_err(Error::from);

		obs::record_flow_outcome(KIND, FlowOutcome::of(&result));

		result
	}
}
