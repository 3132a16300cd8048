//! Xero provider adapter and the flows it drives.
//!
//! [`XeroProvider`] owns the client credentials, the requested scopes, and the HTTP transport.
//! Each flow lives in its own module:
//!
//! - `authorize`: authorization URL issuance ([`XeroProvider::begin_auth`]) and the
//!   authorization-code exchange ([`XeroProvider::authorize`]).
//! - `refresh`: single-attempt refresh-token grant ([`XeroProvider::refresh_token`]).
//! - `identity`: tenant discovery followed by the tenant-scoped organisation lookup
//!   ([`XeroProvider::fetch_user`]).

mod authorize;
mod identity;
mod refresh;

pub use authorize::random_state;

// self
use crate::{
	_prelude::*,
	auth::{self, Token},
	http::ProviderHttpClient,
	identity::IdentityRecord,
	provider::{IdentityProvider, PROVIDER_NAME, ProviderEndpoints, ProviderFuture},
	session::Session,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

#[cfg(feature = "reqwest")]
/// Provider specialized for the crate's default reqwest transport.
pub type ReqwestXeroProvider = XeroProvider<ReqwestHttpClient>;

/// Settings a host can load from its own configuration files.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
	/// OAuth client identifier issued by Xero.
	pub client_key: String,
	/// OAuth client secret; leave empty for public clients.
	pub secret: String,
	/// Redirect URI registered with Xero.
	pub callback_url: String,
	/// Scope wire strings; empty means the default scope set.
	pub scopes: Vec<String>,
	/// Registration name override.
	pub name: Option<String>,
}
impl Debug for ProviderConfig {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ProviderConfig")
			.field("client_key", &self.client_key)
			.field("secret_set", &!self.secret.is_empty())
			.field("callback_url", &self.callback_url)
			.field("scopes", &self.scopes)
			.field("name", &self.name)
			.finish()
	}
}

/// Identity provider adapter for Xero.
///
/// Construction is pure: no network traffic happens until a flow runs. Apart from
/// [`XeroProvider::set_name`] the adapter is immutable, so a configured instance can be shared
/// behind an [`Arc`] across tasks.
#[derive(Clone)]
pub struct XeroProvider<C>
where
	C: ?Sized + ProviderHttpClient,
{
	client_key: String,
	secret: String,
	callback_url: String,
	scopes: Vec<String>,
	name: String,
	endpoints: ProviderEndpoints,
	http_client: Arc<C>,
}
impl<C> XeroProvider<C>
where
	C: ?Sized + ProviderHttpClient,
{
	/// Creates a provider that sends every request through the caller-supplied transport.
	///
	/// Each scope is converted to its trailing-space wire form; an empty list selects
	/// [`DEFAULT_SCOPES`](crate::auth::DEFAULT_SCOPES).
	pub fn with_http_client<I>(
		client_key: impl Into<String>,
		secret: impl Into<String>,
		callback_url: impl Into<String>,
		scopes: I,
		http_client: impl Into<Arc<C>>,
	) -> Self
	where
		I: IntoIterator<Item: AsRef<str>>,
	{
		let mut scopes = auth::scopes_to_strings(scopes);

		if scopes.is_empty() {
			scopes = auth::default_scope_strings();
		}

		Self {
			client_key: client_key.into(),
			secret: secret.into(),
			callback_url: callback_url.into(),
			scopes,
			name: PROVIDER_NAME.into(),
			endpoints: ProviderEndpoints::default(),
			http_client: http_client.into(),
		}
	}

	/// Builds a provider from loaded settings and the caller-supplied transport.
	pub fn from_config_with_http_client(
		config: &ProviderConfig,
		http_client: impl Into<Arc<C>>,
	) -> Self {
		let mut provider = Self::with_http_client(
			config.client_key.as_str(),
			config.secret.as_str(),
			config.callback_url.as_str(),
			&config.scopes,
			http_client,
		);

		if let Some(name) = &config.name {
			provider.name = name.clone();
		}

		provider
	}

	/// Points the provider at a different endpoint set, e.g. a local mock server.
	#[cfg(any(test, feature = "test"))]
	pub fn with_endpoints(mut self, endpoints: ProviderEndpoints) -> Self {
		self.endpoints = endpoints;

		self
	}

	/// OAuth client identifier.
	pub fn client_key(&self) -> &str {
		&self.client_key
	}

	/// Redirect URI sent with the authorization request and the code exchange.
	pub fn callback_url(&self) -> &str {
		&self.callback_url
	}

	/// Scope strings exactly as they are placed on the wire.
	pub fn scopes(&self) -> &[String] {
		&self.scopes
	}

	/// Endpoint set in use.
	pub fn endpoints(&self) -> &ProviderEndpoints {
		&self.endpoints
	}

	/// Name the provider is registered under.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Renames the provider so several instances can be registered side by side.
	pub fn set_name(&mut self, name: impl Into<String>) {
		self.name = name.into();
	}

	/// Debugging has no effect on this provider.
	pub fn debug(&mut self, _enabled: bool) {}

	/// Restores a session persisted with [`Session::marshal`].
	pub fn unmarshal_session(&self, text: &str) -> Result<Session> {
		Session::unmarshal(text)
	}

	/// Refresh tokens are always supported.
	pub fn refresh_token_available(&self) -> bool {
		true
	}
}
#[cfg(feature = "reqwest")]
impl XeroProvider<ReqwestHttpClient> {
	/// Creates a provider backed by a default reqwest client.
	///
	/// Use [`XeroProvider::with_http_client`] to supply a client with custom timeouts or
	/// proxies.
	pub fn new<I>(
		client_key: impl Into<String>,
		secret: impl Into<String>,
		callback_url: impl Into<String>,
		scopes: I,
	) -> Self
	where
		I: IntoIterator<Item: AsRef<str>>,
	{
		Self::with_http_client(
			client_key,
			secret,
			callback_url,
			scopes,
			ReqwestHttpClient::default(),
		)
	}

	/// Builds a reqwest-backed provider from loaded settings.
	pub fn from_config(config: &ProviderConfig) -> Self {
		Self::from_config_with_http_client(config, ReqwestHttpClient::default())
	}
}
impl<C> Debug for XeroProvider<C>
where
	C: ?Sized + ProviderHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("XeroProvider")
			.field("name", &self.name)
			.field("client_key", &self.client_key)
			.field("secret_set", &!self.secret.is_empty())
			.field("callback_url", &self.callback_url)
			.field("scopes", &self.scopes)
			.field("endpoints", &self.endpoints)
			.finish()
	}
}
impl<C> IdentityProvider for XeroProvider<C>
where
	C: ?Sized + ProviderHttpClient,
{
	type Session = Session;

	fn name(&self) -> &str {
		XeroProvider::name(self)
	}

	fn set_name(&mut self, name: String) {
		XeroProvider::set_name(self, name);
	}

	fn debug(&mut self, enabled: bool) {
		XeroProvider::debug(self, enabled);
	}

	fn begin_auth(&self, state: &str) -> Result<Self::Session> {
		XeroProvider::begin_auth(self, state)
	}

	fn unmarshal_session(&self, text: &str) -> Result<Self::Session> {
		XeroProvider::unmarshal_session(self, text)
	}

	fn fetch_user<'a>(
		&'a self,
		session: &'a Self::Session,
	) -> ProviderFuture<'a, IdentityRecord> {
		Box::pin(XeroProvider::fetch_user(self, session))
	}

	fn refresh_token_available(&self) -> bool {
		XeroProvider::refresh_token_available(self)
	}

	fn refresh_token<'a>(&'a self, refresh_token: &'a str) -> ProviderFuture<'a, Token> {
		Box::pin(XeroProvider::refresh_token(self, refresh_token))
	}
}

#[cfg(all(test, feature = "reqwest"))]
mod tests {
	// self
	use super::*;
	use crate::auth::XeroScope;

	#[test]
	fn new_applies_default_scopes() {
		let provider = ReqwestXeroProvider::new("key", "secret", "/foo", Vec::<String>::new());

		assert_eq!(provider.client_key(), "key");
		assert_eq!(provider.callback_url(), "/foo");
		assert_eq!(provider.name(), "xero2");
		assert_eq!(provider.scopes(), auth::default_scope_strings().as_slice());
		assert_eq!(provider.endpoints(), &ProviderEndpoints::default());
		assert!(provider.refresh_token_available());
	}

	#[test]
	fn explicit_scopes_replace_defaults() {
		let provider = ReqwestXeroProvider::new(
			"key",
			"",
			"/foo",
			[XeroScope::AccountingContactsRead, XeroScope::OfflineAccess],
		);

		assert_eq!(provider.scopes(), ["accounting.contacts.read ", "offline_access "]);
	}

	#[test]
	fn set_name_is_visible_through_the_contract() {
		let mut provider = ReqwestXeroProvider::new("key", "", "/foo", Vec::<String>::new());

		IdentityProvider::set_name(&mut provider, "xero-eu".into());
		IdentityProvider::debug(&mut provider, true);

		assert_eq!(IdentityProvider::name(&provider), "xero-eu");
	}

	#[test]
	fn config_round_trips_through_json() {
		let config: ProviderConfig = serde_json::from_str(
			r#"{"client_key":"key","secret":"s3cr3t","callback_url":"https://app.example/cb","name":"xero-apac"}"#,
		)
		.expect("Provider config should decode.");
		let provider = ReqwestXeroProvider::from_config(&config);

		assert_eq!(provider.name(), "xero-apac");
		assert_eq!(provider.callback_url(), "https://app.example/cb");
		assert_eq!(provider.scopes().len(), auth::DEFAULT_SCOPES.len());
		assert!(!format!("{config:?}").contains("s3cr3t"));
		assert!(!format!("{provider:?}").contains("s3cr3t"));
	}
}
