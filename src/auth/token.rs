//! Tokens issued by the provider's token endpoint.

pub mod secret;

// self
use crate::{_prelude::*, auth::token::secret::TokenSecret};

/// Token set returned by an authorization-code exchange or a refresh grant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
	/// Bearer token used on resource calls.
	pub access_token: TokenSecret,
	/// Refresh token, present only when `offline_access` was granted.
	pub refresh_token: Option<TokenSecret>,
	/// Token type reported by the provider (normally `Bearer`).
	pub token_type: String,
	/// Absolute expiry derived from `expires_in`, when the provider reported one.
	pub expires_at: Option<OffsetDateTime>,
}
impl Token {
	/// Returns `true` when the token carries an expiry at or before `instant`.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		self.expires_at.is_some_and(|expires_at| instant >= expires_at)
	}

	/// Convenience helper that checks expiry against the current UTC instant.
	pub fn is_expired(&self) -> bool {
		self.is_expired_at(OffsetDateTime::now_utc())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn token(expires_at: Option<OffsetDateTime>) -> Token {
		Token {
			access_token: TokenSecret::new("access"),
			refresh_token: None,
			token_type: "Bearer".into(),
			expires_at,
		}
	}

	#[test]
	fn expiry_checks_use_the_absolute_instant() {
		let now = OffsetDateTime::now_utc();

		assert!(!token(None).is_expired_at(now));
		assert!(!token(Some(now + Duration::minutes(5))).is_expired_at(now));
		assert!(token(Some(now)).is_expired_at(now));
		assert!(token(Some(now - Duration::seconds(1))).is_expired());
	}

	#[test]
	fn debug_output_redacts_secrets() {
		let rendered = format!("{:?}", token(None));

		assert!(!rendered.contains("access\""));
		assert!(rendered.contains("<redacted>"));
	}
}
