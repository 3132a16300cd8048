//! Xero identity adapter: drive OAuth 2.0 consent, discover the tenants a user authorized, and
//! resolve an organisation-scoped identity record behind a pluggable provider contract.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod error;
pub mod flows;
pub mod http;
pub mod identity;
pub mod oauth;
pub mod obs;
pub mod provider;
pub mod session;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{flows::XeroProvider, http::ReqwestHttpClient, provider::ProviderEndpoints};

	/// Provider type alias used by reqwest-backed integration tests.
	pub type ReqwestTestProvider = XeroProvider<ReqwestHttpClient>;

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Points every provider endpoint at the mock server rooted at `base`.
	pub fn mock_endpoints(base: &str) -> ProviderEndpoints {
		let join = |path: &str| format!("{}{path}", base.trim_end_matches('/'));

		ProviderEndpoints {
			authorization: join("/identity/connect/authorize"),
			token: join("/connect/token"),
			connections: join("/connections"),
			organisation: join("/api.xro/2.0/Organisation"),
		}
	}

	/// Constructs a [`XeroProvider`] wired to the mock server and the insecure test transport.
	pub fn build_reqwest_test_provider(
		base: &str,
		client_key: &str,
		secret: &str,
		callback_url: &str,
	) -> ReqwestTestProvider {
		XeroProvider::with_http_client(
			client_key,
			secret,
			callback_url,
			Vec::<String>::new(),
			test_reqwest_http_client(),
		)
		.with_endpoints(mock_endpoints(base))
	}
}

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::Mutex;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _, tokio as _};
