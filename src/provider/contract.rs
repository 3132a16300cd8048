//! Capability traits a host authentication framework drives.
//!
//! Hosts keep many providers side by side and talk to each through these traits, so the
//! hooks use crate-owned types only. Network operations return boxed `Send` futures, which
//! keeps the traits usable from any executor.

// self
use crate::{_prelude::*, auth::Token, identity::IdentityRecord};

/// Boxed future returned by network-bound provider operations.
pub type ProviderFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + 'a + Send>>;

/// Per-attempt authentication state exposed to the host.
///
/// [`Display`] must render the same text as [`AuthSession::marshal`].
pub trait AuthSession: Display + Send + Sync {
	/// Authorization URL the user must visit; fails until one was issued.
	fn auth_url(&self) -> Result<&str>;

	/// Deterministic text form suitable for persisting between redirect and callback.
	fn marshal(&self) -> String;
}

/// Identity provider driven by the host framework.
pub trait IdentityProvider: Send + Sync {
	/// Session type this provider issues and consumes.
	type Session: AuthSession;

	/// Name the provider is registered under.
	fn name(&self) -> &str;

	/// Renames the provider so several instances of the same type can coexist.
	fn set_name(&mut self, name: String);

	/// Toggles provider debugging.
	fn debug(&mut self, enabled: bool);

	/// Starts an authentication attempt for the caller-supplied `state`.
	fn begin_auth(&self, state: &str) -> Result<Self::Session>;

	/// Restores a session from its persisted text.
	fn unmarshal_session(&self, text: &str) -> Result<Self::Session>;

	/// Resolves the identity behind an authenticated session.
	fn fetch_user<'a>(&'a self, session: &'a Self::Session) -> ProviderFuture<'a, IdentityRecord>;

	/// Reports whether [`IdentityProvider::refresh_token`] is supported.
	fn refresh_token_available(&self) -> bool;

	/// Exchanges a refresh token for a new token set.
	fn refresh_token<'a>(&'a self, refresh_token: &'a str) -> ProviderFuture<'a, Token>;
}
