//! Adapter-level error types shared across sessions, flows, and transports.

// self
use crate::_prelude::*;

/// Adapter-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Structured JSON failure that keeps the path of the offending field.
pub type JsonPathError = serde_path_to_error::Error<serde_json::Error>;

/// Upstream call that produced a failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Step {
	/// Authorization-code exchange at the token endpoint.
	TokenExchange,
	/// Refresh-token grant at the token endpoint.
	TokenRefresh,
	/// Listing the tenants the user authorized.
	TenantDiscovery,
	/// Tenant-scoped organisation profile request.
	ProfileFetch,
}
impl Step {
	/// Returns a stable label suitable for messages and span fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Step::TokenExchange => "token exchange",
			Step::TokenRefresh => "token refresh",
			Step::TenantDiscovery => "tenant discovery",
			Step::ProfileFetch => "profile fetch",
		}
	}
}
impl Display for Step {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Canonical adapter error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),

	/// Session has not been started, so no authorization URL exists yet.
	#[error("Session has no authorization URL; call begin_auth first.")]
	NoAuthUrl,
	/// Identity lookups require an access token.
	#[error("{provider} cannot get organisation information without an access token.")]
	NoAccessToken {
		/// Registered provider name.
		provider: String,
	},
	/// Network or IO failure while calling the provider.
	#[error("{provider} transport failed during {step}.")]
	Transport {
		/// Registered provider name.
		provider: String,
		/// Failing upstream call.
		step: Step,
		/// Transport-level cause.
		#[source]
		source: TransportError,
	},
	/// Request could not be built from session or upstream data, e.g. a token that is not a
	/// valid header value.
	#[error("{provider} could not build the {step} request.")]
	InvalidRequest {
		/// Registered provider name.
		provider: String,
		/// Failing upstream call.
		step: Step,
		/// Request builder failure.
		#[source]
		source: oauth2::http::Error,
	},
	/// Provider answered with a non-200 status.
	#[error("{provider} responded with a {status} during {step}.")]
	UpstreamStatus {
		/// Registered provider name.
		provider: String,
		/// Failing upstream call.
		step: Step,
		/// HTTP status code.
		status: u16,
	},
	/// Provider returned JSON that does not match the expected shape.
	#[error("{provider} returned malformed JSON during {step}.")]
	Decode {
		/// Registered provider name.
		provider: String,
		/// Failing upstream call.
		step: Step,
		/// Structured parsing failure.
		#[source]
		source: JsonPathError,
	},
	/// User completed consent without authorizing any tenant.
	#[error("{provider} returned no authorized tenants.")]
	NoAuthorizedTenants {
		/// Registered provider name.
		provider: String,
	},
	/// Profile response did not include any organisation.
	#[error("{provider} returned no organisations for the authorized tenant.")]
	NoOrganizations {
		/// Registered provider name.
		provider: String,
	},
	/// Token endpoint rejected the grant or answered unexpectedly.
	#[error("{provider} token endpoint failed during {step}: {message}.")]
	TokenEndpoint {
		/// Registered provider name.
		provider: String,
		/// Failing upstream call.
		step: Step,
		/// HTTP status code, when available.
		status: Option<u16>,
		/// Provider- or adapter-supplied message summarizing the failure.
		message: String,
	},
	/// Persisted session text could not be parsed.
	#[error("Session text could not be deserialized.")]
	Deserialize {
		/// Structured parsing failure.
		#[source]
		source: JsonPathError,
	},
}

/// Configuration and validation failures raised by the adapter.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// A provider endpoint is not a valid URL.
	#[error("Provider endpoint `{endpoint}` is invalid.")]
	InvalidEndpoint {
		/// Endpoint label.
		endpoint: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: oauth2::url::ParseError,
	},
	/// Callback URL cannot be parsed.
	#[error("Callback URL is invalid.")]
	InvalidRedirect {
		/// Underlying parsing failure.
		#[source]
		source: oauth2::url::ParseError,
	},
	/// Token endpoint returned an excessively large `expires_in`.
	#[error("The expires_in value exceeds the supported range.")]
	ExpiresInOutOfRange,
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the provider.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the provider.")]
	Io(#[from] std::io::Error),
	/// Transport failed without a structured cause.
	#[error("HTTP client error occurred while calling the provider: {message}.")]
	Other {
		/// Transport-supplied description.
		message: String,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}
