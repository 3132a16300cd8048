//! Authorization URL issuance and the authorization-code exchange.

// crates.io
use rand::{Rng, distr::Alphanumeric};
// self
use crate::{
	_prelude::*,
	error::ConfigError,
	flows::XeroProvider,
	http::ProviderHttpClient,
	oauth::{BasicFacade, OAuth2Facade},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	session::Session,
};

const STATE_LEN: usize = 32;

/// Generates an unpredictable alphanumeric `state` value for [`XeroProvider::begin_auth`].
pub fn random_state() -> String {
	rand::rng().sample_iter(Alphanumeric).take(STATE_LEN).map(char::from).collect()
}

impl<C> XeroProvider<C>
where
	C: ?Sized + ProviderHttpClient,
{
	/// Starts an authentication attempt by issuing the authorization URL.
	///
	/// `state` is echoed back by Xero on the callback. It is passed through untouched; CSRF
	/// protection is the caller's responsibility (see [`random_state`]). No network traffic
	/// happens here.
	pub fn begin_auth(&self, state: &str) -> Result<Session> {
		const KIND: FlowKind = FlowKind::Authorize;

		let _guard = FlowSpan::new(KIND, "begin_auth").entered();

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = build_authorize_url(
			&self.endpoints.authorization,
			&self.client_key,
			&self.callback_url,
			&self.scopes,
			state,
		)
		.map(Session::with_auth_url);

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}

	/// Exchanges the callback `code` for tokens and stores them in `session`.
	///
	/// Returns the new access token. The session is left untouched when the exchange fails.
	pub async fn authorize(&self, session: &mut Session, code: &str) -> Result<String> {
		const KIND: FlowKind = FlowKind::Authorize;

		let span = FlowSpan::new(KIND, "authorize");

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
				let token = facade.exchange_authorization_code(code, &self.callback_url).await?;

				session.apply_token(&token);

				Ok(session.access_token.clone())
			})
			.await;

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}
}

// Pairs are appended in the same sorted order other OAuth clients emit. Scope strings already
// carry their trailing space, so joining them with a single space yields the double-spaced wire
// form Xero expects. Empty scope and state values are omitted.
fn build_authorize_url(
	authorization: &str,
	client_key: &str,
	callback_url: &str,
	scopes: &[String],
	state: &str,
) -> Result<String> {
	let mut url = Url::parse(authorization)
		.map_err(|source| ConfigError::InvalidEndpoint { endpoint: "authorization", source })?;
	let mut pairs = url.query_pairs_mut();

	pairs.append_pair("client_id", client_key);

	if !callback_url.is_empty() {
		pairs.append_pair("redirect_uri", callback_url);
	}

	pairs.append_pair("response_type", "code");

	if !scopes.is_empty() {
		pairs.append_pair("scope", &scopes.join(" "));
	}
	if !state.is_empty() {
		pairs.append_pair("state", state);
	}

	drop(pairs);

	Ok(url.into())
}
