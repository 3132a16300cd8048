//! Two-step identity resolution: tenant discovery, then the tenant-scoped organisation profile.

// crates.io
use oauth2::{
	AsyncHttpClient, HttpRequest, HttpResponse,
	http::{Method, Request, StatusCode, header},
};
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	error::{ConfigError, Step},
	flows::XeroProvider,
	http::{self, ProviderHttpClient, ResponseMetadataSlot},
	identity::{IdentityRecord, ProfileResponse, TenantRecord},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	provider::TENANT_HEADER,
	session::Session,
};

impl<C> XeroProvider<C>
where
	C: ?Sized + ProviderHttpClient,
{
	/// Resolves the organisation-scoped identity behind `session`.
	///
	/// The first authorized tenant is used and the first organisation of its profile supplies
	/// the name fields. Without an access token the call fails before any request is sent, and
	/// an empty tenant list stops resolution before the profile request.
	pub async fn fetch_user(&self, session: &Session) -> Result<IdentityRecord> {
		const KIND: FlowKind = FlowKind::FetchUser;

		let span = FlowSpan::new(KIND, "fetch_user");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span.instrument(self.resolve_identity(session)).await;

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}

	async fn resolve_identity(&self, session: &Session) -> Result<IdentityRecord> {
		let access_token = session.access_token.as_str();

		if access_token.is_empty() {
			return Err(Error::NoAccessToken { provider: self.name.clone() });
		}

		let tenant_id = {
			let tenants = self.fetch_authorized_tenants(access_token).await?;

			tenants
				.into_iter()
				.next()
				.map(|tenant| tenant.tenant_id)
				.ok_or_else(|| Error::NoAuthorizedTenants { provider: self.name.clone() })?
		};
		let profile = self.fetch_profile(access_token, &tenant_id).await?;
		let organisation = profile
			.primary()
			.ok_or_else(|| Error::NoOrganizations { provider: self.name.clone() })?;

		Ok(IdentityRecord {
			provider: self.name.clone(),
			access_token: TokenSecret::new(access_token),
			refresh_token: (!session.refresh_token.is_empty())
				.then(|| TokenSecret::new(session.refresh_token.as_str())),
			expires_at: session.expires_at,
			name: organisation.name.clone().unwrap_or_default(),
			nick_name: organisation.legal_name.clone().unwrap_or_default(),
			user_id: organisation.short_code.clone().unwrap_or_default(),
			tenant_id,
			raw_data: profile.raw,
		})
	}

	async fn fetch_authorized_tenants(&self, access_token: &str) -> Result<Vec<TenantRecord>> {
		const STEP: Step = Step::TenantDiscovery;

		let request = self.resource_request(STEP, &self.endpoints.connections, access_token, None)?;
		let response = self.send(STEP, request).await?;

		// A `null` body means the same as an empty list.
		Ok(self.decode::<Option<Vec<TenantRecord>>>(STEP, &response)?.unwrap_or_default())
	}

	async fn fetch_profile(&self, access_token: &str, tenant_id: &str) -> Result<ProfileResponse> {
		const STEP: Step = Step::ProfileFetch;

		let request = self.resource_request(
			STEP,
			&self.endpoints.organisation,
			access_token,
			Some(tenant_id),
		)?;
		let response = self.send(STEP, request).await?;

		self.decode(STEP, &response)
	}

	fn resource_request(
		&self,
		step: Step,
		endpoint: &str,
		access_token: &str,
		tenant_id: Option<&str>,
	) -> Result<HttpRequest> {
		let label = match step {
			Step::TenantDiscovery => "connections",
			_ => "organisation",
		};
		let url = Url::parse(endpoint)
			.map_err(|source| ConfigError::InvalidEndpoint { endpoint: label, source })?;
		let mut builder = Request::builder()
			.method(Method::GET)
			.uri(url.as_str())
			.header(header::AUTHORIZATION, format!("Bearer {access_token}"))
			.header(header::ACCEPT, "application/json");

		if let Some(tenant_id) = tenant_id {
			builder = builder.header(TENANT_HEADER, tenant_id);
		}

		builder.body(Vec::new()).map_err(|source| Error::InvalidRequest {
			provider: self.name.clone(),
			step,
			source,
		})
	}

	async fn send(&self, step: Step, request: HttpRequest) -> Result<HttpResponse> {
		let handle = self.http_client.with_metadata(ResponseMetadataSlot::default());
		let response = handle
			.call(request)
			.await
			.map_err(|err| http::map_http_client_error(&self.name, step, err))?;

		if response.status() != StatusCode::OK {
			return Err(Error::UpstreamStatus {
				provider: self.name.clone(),
				step,
				status: response.status().as_u16(),
			});
		}

		Ok(response)
	}

	fn decode<T>(&self, step: Step, response: &HttpResponse) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let mut de = serde_json::Deserializer::from_slice(response.body());

		serde_path_to_error::deserialize(&mut de)
			.map_err(|source| Error::Decode { provider: self.name.clone(), step, source })
	}
}
