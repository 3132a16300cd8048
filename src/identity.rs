//! Identity records and the upstream payloads they are resolved from.

// crates.io
use serde::{Deserializer, de::Error as DeError};
use serde_json::{Map, Value};
// self
use crate::{_prelude::*, auth::TokenSecret};

/// Normalized identity produced by
/// [`XeroProvider::fetch_user`](crate::flows::XeroProvider::fetch_user).
///
/// Every call builds a fresh record; nothing mutates it afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct IdentityRecord {
	/// Registered name of the provider that resolved the identity.
	pub provider: String,
	/// Access token copied from the session.
	pub access_token: TokenSecret,
	/// Refresh token copied from the session, if one was granted.
	pub refresh_token: Option<TokenSecret>,
	/// Access token expiry copied from the session.
	pub expires_at: OffsetDateTime,
	/// Organisation display name.
	pub name: String,
	/// Organisation legal name.
	pub nick_name: String,
	/// Organisation short code.
	pub user_id: String,
	/// Tenant the profile request was scoped to.
	pub tenant_id: String,
	/// Profile response exactly as the provider returned it.
	pub raw_data: Map<String, Value>,
}

/// Connection entry returned by tenant discovery.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantRecord {
	/// Connection identifier.
	#[serde(default, deserialize_with = "null_as_empty")]
	pub id: String,
	/// Tenant identifier sent on tenant-scoped requests.
	#[serde(default, deserialize_with = "null_as_empty")]
	pub tenant_id: String,
	/// Tenant kind, e.g. `ORGANISATION`.
	#[serde(default, deserialize_with = "null_as_empty")]
	pub tenant_type: String,
	/// Human-readable tenant name, when provided.
	#[serde(default)]
	pub tenant_name: Option<String>,
}

// Xero sends `null` for fields it has no value for.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
	D: Deserializer<'de>,
{
	Ok(<Option<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Organisation entry from the profile response.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Organisation {
	/// Display name.
	#[serde(default)]
	pub name: Option<String>,
	/// Registered legal name.
	#[serde(default)]
	pub legal_name: Option<String>,
	/// Organisation kind, e.g. `COMPANY`.
	#[serde(default)]
	pub organisation_type: Option<String>,
	/// ISO country code.
	#[serde(default)]
	pub country_code: Option<String>,
	/// Short code used in deep links.
	#[serde(default)]
	pub short_code: Option<String>,
}

/// Profile response decoded in a single pass.
///
/// The raw object is kept for consumers that need fields the normalized record drops, and the
/// `Organisations` array is read from it through a borrowed view.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProfileResponse {
	/// The full response object.
	pub raw: Map<String, Value>,
	/// Typed organisations, in response order.
	pub organisations: Vec<Organisation>,
}
impl ProfileResponse {
	const ORGANISATIONS_KEY: &'static str = "Organisations";

	/// First organisation in response order.
	pub fn primary(&self) -> Option<&Organisation> {
		self.organisations.first()
	}
}
impl<'de> Deserialize<'de> for ProfileResponse {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		let raw = <Map<String, Value>>::deserialize(deserializer)?;
		let organisations = match raw.get(Self::ORGANISATIONS_KEY) {
			None | Some(Value::Null) => Vec::new(),
			Some(value) => <Vec<Organisation>>::deserialize(value).map_err(DeError::custom)?,
		};

		Ok(Self { raw, organisations })
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn profile_keeps_raw_payload_and_typed_view() {
		let body = r#"{
			"Id": "b4d3",
			"Status": "OK",
			"Organisations": [
				{"Name": "Demo Company (NZ)", "LegalName": "Demo Company Ltd", "ShortCode": "!23eYt", "Timezone": "NZST"},
				{"Name": "Second Org", "ShortCode": "!zz"}
			]
		}"#;
		let profile: ProfileResponse =
			serde_json::from_str(body).expect("Profile body should decode successfully.");
		let primary = profile.primary().expect("First organisation should be present.");

		assert_eq!(primary.name.as_deref(), Some("Demo Company (NZ)"));
		assert_eq!(primary.legal_name.as_deref(), Some("Demo Company Ltd"));
		assert_eq!(primary.short_code.as_deref(), Some("!23eYt"));
		assert_eq!(profile.organisations.len(), 2);
		assert_eq!(profile.raw.get("Status"), Some(&Value::String("OK".into())));
		assert_eq!(profile.raw["Organisations"][0]["Timezone"], Value::String("NZST".into()));
	}

	#[test]
	fn missing_or_null_organisations_decode_as_empty() {
		let profile: ProfileResponse =
			serde_json::from_str(r#"{"Status":"OK"}"#).expect("Profile should decode.");

		assert!(profile.primary().is_none());

		let profile: ProfileResponse =
			serde_json::from_str(r#"{"Organisations":null}"#).expect("Profile should decode.");

		assert!(profile.organisations.is_empty());
	}

	#[test]
	fn profile_rejects_wrongly_typed_organisations() {
		assert!(serde_json::from_str::<ProfileResponse>(r#"{"Organisations":{"Name":"x"}}"#).is_err());
		assert!(serde_json::from_str::<ProfileResponse>(r#"[1,2]"#).is_err());
	}

	#[test]
	fn tenants_decode_from_camel_case() {
		let tenants: Vec<TenantRecord> = serde_json::from_str(
			r#"[{"id":"c1","tenantId":"t1","tenantType":"ORGANISATION","tenantName":"Demo"},{"tenantId":"t2"}]"#,
		)
		.expect("Tenant list should decode.");

		assert_eq!(tenants[0].tenant_id, "t1");
		assert_eq!(tenants[0].tenant_type, "ORGANISATION");
		assert_eq!(tenants[0].tenant_name.as_deref(), Some("Demo"));
		assert_eq!(tenants[1].id, "");
	}

	#[test]
	fn null_tenant_fields_decode_as_empty() {
		let tenants: Vec<TenantRecord> =
			serde_json::from_str(r#"[{"id":null,"tenantId":"t1","tenantType":null}]"#)
				.expect("Null tenant fields should decode.");

		assert_eq!(tenants[0], TenantRecord { tenant_id: "t1".into(), ..Default::default() });
	}
}
