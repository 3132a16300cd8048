//! Fixed Xero endpoints and wire constants.

// self
use crate::_prelude::*;

/// Name the adapter registers under until [`set_name`](crate::flows::XeroProvider::set_name)
/// changes it.
pub const PROVIDER_NAME: &str = "xero2";
/// Authorization endpoint used by the authorization-code flow.
pub const AUTHORIZATION_URL: &str = "https://login.xero.com/identity/connect/authorize";
/// Token endpoint used for code exchanges and refreshes.
pub const TOKEN_URL: &str = "https://identity.xero.com/connect/token";
/// Lists the tenants the user authorized.
pub const CONNECTIONS_URL: &str = "https://api.xero.com/connections";
/// Tenant-scoped organisation profile.
pub const ORGANISATION_URL: &str = "https://api.xero.com/api.xro/2.0/Organisation";
/// Header selecting the tenant on tenant-scoped requests.
pub const TENANT_HEADER: &str = "Xero-Tenant-Id";

/// Endpoint set the adapter talks to.
///
/// Production code always uses [`ProviderEndpoints::default`]; the values are only replaceable
/// under the `test` feature so mock servers can stand in for Xero.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderEndpoints {
	/// Authorization endpoint.
	pub authorization: String,
	/// Token endpoint.
	pub token: String,
	/// Tenant discovery endpoint.
	pub connections: String,
	/// Organisation profile endpoint.
	pub organisation: String,
}
impl Default for ProviderEndpoints {
	fn default() -> Self {
		Self {
			authorization: AUTHORIZATION_URL.into(),
			token: TOKEN_URL.into(),
			connections: CONNECTIONS_URL.into(),
			organisation: ORGANISATION_URL.into(),
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn default_endpoints_are_https_urls() {
		let endpoints = ProviderEndpoints::default();

		for raw in [
			&endpoints.authorization,
			&endpoints.token,
			&endpoints.connections,
			&endpoints.organisation,
		] {
			let url = Url::parse(raw).expect("Endpoint constants should parse successfully.");

			assert_eq!(url.scheme(), "https");
		}

		assert_eq!(endpoints.organisation, "https://api.xero.com/api.xro/2.0/Organisation");
	}
}
