//! Refresh-token grant.
//!
//! Each call performs exactly one `grant_type=refresh_token` request; failures are surfaced to
//! the caller without retries. When Xero does not rotate the refresh token, the returned
//! [`Token`] carries the one that was presented so callers can always persist
//! `token.refresh_token`.

// self
use crate::{
	_prelude::*,
	auth::{Token, TokenSecret},
	flows::XeroProvider,
	http::ProviderHttpClient,
	oauth::{BasicFacade, OAuth2Facade},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};

impl<C> XeroProvider<C>
where
	C: ?Sized + ProviderHttpClient,
{
	/// Exchanges `refresh_token` for a new token set.
	pub async fn refresh_token(&self, refresh_token: &str) -> Result<Token> {
		const KIND: FlowKind = FlowKind::Refresh;

		let span = FlowSpan::new(KIND, "refresh_token");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let facade = <BasicFacade<C>>::from_endpoints(
					&self.name,
					&self.endpoints,
					&self.client_key,
					&self.secret,
					self.http_client.clone(),
				)?;
				let mut token = facade.refresh_token(refresh_token).await?;

				if token.refresh_token.is_none() {
					token.refresh_token = Some(TokenSecret::new(refresh_token));
				}

				Ok(token)
			})
			.await;

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}
}
