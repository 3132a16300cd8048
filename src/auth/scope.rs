//! Scopes supported by Xero.
//!
//! See <https://developer.xero.com/documentation/oauth2/scopes>.

// self
use crate::_prelude::*;

/// Scope set requested when the caller does not supply any.
pub const DEFAULT_SCOPES: [XeroScope; 5] = [
	XeroScope::OpenId,
	XeroScope::Profile,
	XeroScope::Email,
	XeroScope::OfflineAccess,
	XeroScope::AccountingSettingsRead,
];

/// Error returned when a wire string does not name a known scope.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("Unknown Xero scope: {scope}.")]
pub struct UnknownScopeError {
	/// The unrecognized wire string.
	pub scope: String,
}

/// Permission strings understood by the Xero authorization server.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum XeroScope {
	/// Issues a refresh token so the connection can be maintained offline.
	OfflineAccess,
	/// OpenID Connect subject scope.
	OpenId,
	/// OpenID Connect profile claims.
	Profile,
	/// OpenID Connect email claim.
	Email,
	/// Read/write invoices, payments, bank transactions, and similar.
	AccountingTransactions,
	/// Read-only variant of [`XeroScope::AccountingTransactions`].
	AccountingTransactionsRead,
	/// Read-only access to reports.
	AccountingReportsRead,
	/// Read-only access to journals.
	AccountingJournalsRead,
	/// Read/write organisation settings.
	AccountingSettings,
	/// Read-only variant of [`XeroScope::AccountingSettings`].
	AccountingSettingsRead,
	/// Read/write contacts.
	AccountingContacts,
	/// Read-only variant of [`XeroScope::AccountingContacts`].
	AccountingContactsRead,
	/// Read/write attachments.
	AccountingAttachments,
	/// Attachments read access; Xero publishes this with the same wire value as
	/// [`XeroScope::AccountingAttachments`].
	AccountingAttachmentsRead,
}
impl XeroScope {
	/// Every scope in catalog order.
	pub const ALL: [XeroScope; 14] = [
		XeroScope::OfflineAccess,
		XeroScope::OpenId,
		XeroScope::Profile,
		XeroScope::Email,
		XeroScope::AccountingTransactions,
		XeroScope::AccountingTransactionsRead,
		XeroScope::AccountingReportsRead,
		XeroScope::AccountingJournalsRead,
		XeroScope::AccountingSettings,
		XeroScope::AccountingSettingsRead,
		XeroScope::AccountingContacts,
		XeroScope::AccountingContactsRead,
		XeroScope::AccountingAttachments,
		XeroScope::AccountingAttachmentsRead,
	];

	/// Returns the wire-format scope string.
	pub const fn as_str(self) -> &'static str {
		match self {
			XeroScope::OfflineAccess => "offline_access",
			XeroScope::OpenId => "openid",
			XeroScope::Profile => "profile",
			XeroScope::Email => "email",
			XeroScope::AccountingTransactions => "accounting.transactions",
			XeroScope::AccountingTransactionsRead => "accounting.transactions.read",
			XeroScope::AccountingReportsRead => "accounting.reports.read",
			XeroScope::AccountingJournalsRead => "accounting.journals.read",
			XeroScope::AccountingSettings => "accounting.settings",
			XeroScope::AccountingSettingsRead => "accounting.settings.read",
			XeroScope::AccountingContacts => "accounting.contacts",
			XeroScope::AccountingContactsRead => "accounting.contacts.read",
			XeroScope::AccountingAttachments | XeroScope::AccountingAttachmentsRead =>
				"accounting.attachments",
		}
	}
}
impl AsRef<str> for XeroScope {
	fn as_ref(&self) -> &str {
		self.as_str()
	}
}
impl Display for XeroScope {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for XeroScope {
	type Err = UnknownScopeError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		XeroScope::ALL
			.into_iter()
			.find(|scope| scope.as_str() == s)
			.ok_or_else(|| UnknownScopeError { scope: s.to_owned() })
	}
}
impl TryFrom<String> for XeroScope {
	type Error = UnknownScopeError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		value.parse()
	}
}
impl From<XeroScope> for String {
	fn from(value: XeroScope) -> Self {
		value.as_str().to_owned()
	}
}

/// Formats scopes the way the Xero authorization server expects them on the wire.
///
/// Every token carries one trailing space. Joining the result with a single space therefore
/// yields double separators and a trailing space, which is the exact shape the provider has
/// always received.
pub fn scopes_to_strings<I, S>(scopes: I) -> Vec<String>
where
	I: IntoIterator<Item = S>,
	S: AsRef<str>,
{
	scopes.into_iter().map(|scope| format!("{} ", scope.as_ref())).collect()
}

/// Wire-formatted default scope set.
pub fn default_scope_strings() -> Vec<String> {
	scopes_to_strings(DEFAULT_SCOPES)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn every_scope_parses_back_from_its_wire_value() {
		for scope in XeroScope::ALL {
			let parsed = XeroScope::from_str(scope.as_str())
				.expect("Catalog wire values should parse successfully.");

			assert_eq!(parsed.as_str(), scope.as_str());
		}

		assert!(XeroScope::from_str("accounting.everything").is_err());
	}

	#[test]
	fn attachments_read_shares_the_write_wire_value() {
		assert_eq!(XeroScope::AccountingAttachmentsRead.as_str(), "accounting.attachments");
		assert_eq!(
			XeroScope::AccountingAttachmentsRead.as_str(),
			XeroScope::AccountingAttachments.as_str()
		);
	}

	#[test]
	fn scope_strings_carry_a_trailing_space() {
		assert_eq!(
			default_scope_strings(),
			vec![
				"openid ".to_string(),
				"profile ".to_string(),
				"email ".to_string(),
				"offline_access ".to_string(),
				"accounting.settings.read ".to_string(),
			]
		);
		assert_eq!(scopes_to_strings(["custom"]), vec!["custom ".to_string()]);
	}

	#[test]
	fn scopes_serialize_as_wire_strings() {
		let json = serde_json::to_string(&XeroScope::OfflineAccess)
			.expect("Scope should serialize successfully.");

		assert_eq!(json, "\"offline_access\"");

		let scope: XeroScope = serde_json::from_str("\"accounting.reports.read\"")
			.expect("Scope should deserialize successfully.");

		assert_eq!(scope, XeroScope::AccountingReportsRead);
	}
}
