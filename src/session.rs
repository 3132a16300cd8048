//! Per-attempt authentication state and its persisted text form.
//!
//! A [`Session`] is owned by exactly one authentication attempt. The provider creates it in
//! [`begin_auth`](crate::flows::XeroProvider::begin_auth), the host persists it between the
//! redirect and the callback with [`Session::marshal`], and restores it with
//! [`Session::unmarshal`]. The persisted form is a flat JSON object with a fixed field order:
//!
//! ```text
//! {"AuthURL":"","AccessToken":"","Hostname":"","HMAC":"","ExpiresAt":"0001-01-01T00:00:00Z"}
//! ```
//!
//! The refresh token is never written to the persisted form.

// crates.io
use time::macros::datetime;
// self
use crate::{_prelude::*, auth::Token, provider::AuthSession};

/// Expiry value meaning "unknown / not yet issued".
pub const UNKNOWN_EXPIRY: OffsetDateTime = datetime!(0001-01-01 0:00 UTC);

/// Lifecycle position derived from the fields a session carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
	/// Neither an authorization URL nor an access token exists.
	Fresh,
	/// The authorization URL was issued; the user has not been through the callback yet.
	AuthUrlIssued,
	/// An access token is available for identity resolution.
	TokenAcquired,
}

/// In-flight authorization artifacts for a single authentication attempt.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Session {
	#[serde(rename = "AuthURL")]
	auth_url: String,
	/// Bearer token; empty until a code exchange or refresh completes.
	#[serde(rename = "AccessToken")]
	pub access_token: String,
	/// Refresh token, present only when `offline_access` was granted. Not persisted.
	#[serde(skip)]
	pub refresh_token: String,
	/// Provider hostname hint.
	#[serde(rename = "Hostname")]
	pub hostname: String,
	/// Provider-supplied HMAC value, carried verbatim.
	#[serde(rename = "HMAC")]
	pub hmac: String,
	/// Access token expiry; [`UNKNOWN_EXPIRY`] until a token is issued.
	#[serde(rename = "ExpiresAt", with = "rfc3339")]
	pub expires_at: OffsetDateTime,
}
impl Session {
	/// Creates a session that already carries an authorization URL.
	///
	/// The URL cannot be changed afterwards.
	pub fn with_auth_url(auth_url: impl Into<String>) -> Self {
		Self { auth_url: auth_url.into(), ..Default::default() }
	}

	/// Returns the authorization URL, failing with [`Error::NoAuthUrl`] when none was issued.
	pub fn auth_url(&self) -> Result<&str> {
		if self.auth_url.is_empty() { Err(Error::NoAuthUrl) } else { Ok(&self.auth_url) }
	}

	/// Serializes every field, zero values included, in the fixed wire order.
	pub fn marshal(&self) -> String {
		// Every field is a string and the expiry serializer never fails.
		serde_json::to_string(self).unwrap_or_default()
	}

	/// Restores a session from text produced by [`Session::marshal`].
	///
	/// Only the leading JSON object is read, so stray characters after the closing brace are
	/// tolerated. Missing fields take their zero values.
	pub fn unmarshal(text: &str) -> Result<Self> {
		let mut de = serde_json::Deserializer::from_str(text);

		serde_path_to_error::deserialize(&mut de).map_err(|source| Error::Deserialize { source })
	}

	/// Derives the lifecycle position from the populated fields.
	pub fn state(&self) -> SessionState {
		if !self.access_token.is_empty() {
			SessionState::TokenAcquired
		} else if !self.auth_url.is_empty() {
			SessionState::AuthUrlIssued
		} else {
			SessionState::Fresh
		}
	}

	/// Copies a freshly issued token into the session.
	///
	/// A missing refresh token keeps the previous one, since providers only rotate it
	/// optionally.
	pub fn apply_token(&mut self, token: &Token) {
		self.access_token = token.access_token.expose().to_owned();

		if let Some(refresh) = &token.refresh_token {
			self.refresh_token = refresh.expose().to_owned();
		}

		self.expires_at = token.expires_at.unwrap_or(UNKNOWN_EXPIRY);
	}
}
impl Default for Session {
	fn default() -> Self {
		Self {
			auth_url: String::new(),
			access_token: String::new(),
			refresh_token: String::new(),
			hostname: String::new(),
			hmac: String::new(),
			expires_at: UNKNOWN_EXPIRY,
		}
	}
}
impl AuthSession for Session {
	fn auth_url(&self) -> Result<&str> {
		Session::auth_url(self)
	}

	fn marshal(&self) -> String {
		Session::marshal(self)
	}
}
impl Display for Session {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.marshal())
	}
}
impl Debug for Session {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Session")
			.field("auth_url", &self.auth_url)
			.field("access_token_set", &!self.access_token.is_empty())
			.field("refresh_token_set", &!self.refresh_token.is_empty())
			.field("hostname", &self.hostname)
			.field("hmac_set", &!self.hmac.is_empty())
			.field("expires_at", &self.expires_at)
			.finish()
	}
}

mod rfc3339 {
	// crates.io
	use serde::{Deserializer, Serializer, de::Error as DeError};
	use time::format_description::well_known::Rfc3339;
	// self
	use crate::_prelude::*;

	const UNKNOWN_EXPIRY_TEXT: &str = "0001-01-01T00:00:00Z";

	// Instants RFC 3339 cannot express (years outside 0000..=9999, sub-minute offsets) fall
	// back to the unknown expiry.
	pub(super) fn serialize<S>(value: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		let text = value.format(&Rfc3339).unwrap_or_else(|_| UNKNOWN_EXPIRY_TEXT.to_owned());

		serializer.serialize_str(&text)
	}

	pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<OffsetDateTime, D::Error>
	where
		D: Deserializer<'de>,
	{
		let text = String::deserialize(deserializer)?;

		OffsetDateTime::parse(&text, &Rfc3339).map_err(DeError::custom)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::auth::TokenSecret;

	#[test]
	fn auth_url_requires_begin_auth() {
		let session = Session::default();
		let err = session.auth_url().expect_err("Fresh sessions must not expose a URL.");

		assert!(matches!(err, Error::NoAuthUrl));
		assert_eq!(session.state(), SessionState::Fresh);

		let session = Session::with_auth_url("/foo");

		assert_eq!(session.auth_url().expect("Issued URL should be returned."), "/foo");
		assert_eq!(session.state(), SessionState::AuthUrlIssued);
	}

	#[test]
	fn zero_session_serializes_every_field() {
		assert_eq!(
			Session::default().marshal(),
			r#"{"AuthURL":"","AccessToken":"","Hostname":"","HMAC":"","ExpiresAt":"0001-01-01T00:00:00Z"}"#
		);
	}

	#[test]
	fn display_matches_marshal() {
		let session = Session::with_auth_url("https://login.xero.com/identity/connect/authorize");

		assert_eq!(session.to_string(), session.marshal());
	}

	#[test]
	fn unmarshal_tolerates_trailing_garbage() {
		let session = Session::unmarshal(r#"{"AuthURL":"https://x","AccessToken":"tok"}""#)
			.expect("Trailing quote after the object should be ignored.");

		assert_eq!(session.auth_url().expect("URL should be restored."), "https://x");
		assert_eq!(session.access_token, "tok");
		assert_eq!(session.expires_at, UNKNOWN_EXPIRY);
		assert_eq!(session.state(), SessionState::TokenAcquired);
	}

	#[test]
	fn unmarshal_rejects_malformed_text() {
		for text in ["", "not json", r#"{"AuthURL":42}"#, r#"{"ExpiresAt":"yesterday"}"#] {
			let err = Session::unmarshal(text).expect_err("Malformed session text must fail.");

			assert!(matches!(err, Error::Deserialize { .. }), "unexpected error for {text:?}");
		}
	}

	#[test]
	fn marshal_round_trip_is_stable() {
		let mut session =
			Session::with_auth_url("https://login.xero.com/identity/connect/authorize?state=s");

		session.access_token = "access".into();
		session.hostname = "api.xero.com".into();
		session.hmac = "mac".into();
		session.expires_at = datetime!(2024-05-06 07:08:09 UTC);

		let first = session.marshal();
		let restored = Session::unmarshal(&first).expect("Marshalled text should parse.");

		assert_eq!(restored, session);
		assert_eq!(restored.marshal(), first);
		assert!(first.ends_with(r#""ExpiresAt":"2024-05-06T07:08:09Z"}"#));
	}

	#[test]
	fn refresh_token_is_not_persisted() {
		let mut session = Session::default();

		session.refresh_token = "refresh".into();

		assert!(!session.marshal().contains("refresh"));
		let restored =
			Session::unmarshal(&session.marshal()).expect("Marshalled text should parse.");

		assert!(restored.refresh_token.is_empty());
	}

	#[test]
	fn apply_token_populates_credentials() {
		let mut session = Session::with_auth_url("https://x");

		session.refresh_token = "old-refresh".into();

		let expires_at = datetime!(2030-01-01 0:00 UTC);

		session.apply_token(&Token {
			access_token: TokenSecret::new("new-access"),
			refresh_token: None,
			token_type: "Bearer".into(),
			expires_at: Some(expires_at),
		});

		assert_eq!(session.access_token, "new-access");
		assert_eq!(session.refresh_token, "old-refresh");
		assert_eq!(session.expires_at, expires_at);
		assert_eq!(session.state(), SessionState::TokenAcquired);
	}

	#[test]
	fn debug_output_hides_tokens() {
		let mut session = Session::default();

		session.access_token = "very-secret".into();

		assert!(!format!("{session:?}").contains("very-secret"));
	}
}
