//! Internal OAuth client facade over the `oauth2` crate.

pub use oauth2;

// std
use std::borrow::Cow;
// crates.io
use oauth2::{
	AuthUrl, AuthorizationCode, ClientId, ClientSecret, EndpointNotSet, EndpointSet,
	HttpClientError, RedirectUrl, RefreshToken, RequestTokenError, TokenResponse, TokenUrl,
	basic::{BasicClient, BasicErrorResponse, BasicRequestTokenError, BasicTokenResponse},
};
// self
use crate::{
	_prelude::*,
	auth::{Token, TokenSecret},
	error::{ConfigError, Step},
	http::{self, ProviderHttpClient, ResponseMetadata, ResponseMetadataSlot},
	provider::ProviderEndpoints,
};

type ConfiguredBasicClient =
	BasicClient<EndpointSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;
type FacadeFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + 'a + Send>>;

pub(crate) trait OAuth2Facade {
	fn exchange_authorization_code<'a, 'code, 'redirect>(
		&'a self,
		code: &'code str,
		redirect_uri: &'redirect str,
	) -> FacadeFuture<'a, Token>
	where
		'code: 'a,
		'redirect: 'a;

	fn refresh_token<'a, 'refresh>(
		&'a self,
		refresh_token: &'refresh str,
	) -> FacadeFuture<'a, Token>
	where
		'refresh: 'a;
}

pub(crate) struct BasicFacade<'p, C>
where
	C: ?Sized + ProviderHttpClient,
{
	provider: &'p str,
	oauth_client: ConfiguredBasicClient,
	http_client: Arc<C>,
}
impl<'p, C> BasicFacade<'p, C>
where
	C: ?Sized + ProviderHttpClient,
{
	pub(crate) fn from_endpoints(
		provider: &'p str,
		endpoints: &ProviderEndpoints,
		client_key: &str,
		secret: &str,
		http_client: Arc<C>,
	) -> Result<Self> {
		let auth_url = AuthUrl::new(endpoints.authorization.clone()).map_err(|source| {
			ConfigError::InvalidEndpoint { endpoint: "authorization", source }
		})?;
		let token_url = TokenUrl::new(endpoints.token.clone())
			.map_err(|source| ConfigError::InvalidEndpoint { endpoint: "token", source })?;
		let mut oauth_client = BasicClient::new(ClientId::new(client_key.to_owned()))
			.set_auth_uri(auth_url)
			.set_token_uri(token_url);

		if !secret.is_empty() {
			oauth_client = oauth_client.set_client_secret(ClientSecret::new(secret.to_owned()));
		}

		Ok(Self { provider, oauth_client, http_client })
	}
}
impl<C> OAuth2Facade for BasicFacade<'_, C>
where
	C: ?Sized + ProviderHttpClient,
{
	fn exchange_authorization_code<'a, 'code, 'redirect>(
		&'a self,
		code: &'code str,
		redirect_uri: &'redirect str,
	) -> FacadeFuture<'a, Token>
	where
		'code: 'a,
		'redirect: 'a,
	{
		let meta = ResponseMetadataSlot::default();

		Box::pin(async move {
			let instrumented = self.http_client.with_metadata(meta.clone());
			let mut request =
				self.oauth_client.exchange_code(AuthorizationCode::new(code.to_owned()));

			if !redirect_uri.is_empty() {
				let redirect_url = RedirectUrl::new(redirect_uri.to_owned())
					.map_err(|source| ConfigError::InvalidRedirect { source })?;

				request = request.set_redirect_uri(Cow::Owned(redirect_url));
			}

			let response = request
				.request_async(&instrumented)
				.await
				.map_err(|err| {
					map_request_error(self.provider, Step::TokenExchange, meta.take(), err)
				})?;

			map_token_response(response)
		})
	}

	fn refresh_token<'a, 'refresh>(
		&'a self,
		refresh_token: &'refresh str,
	) -> FacadeFuture<'a, Token>
	where
		'refresh: 'a,
	{
		let meta = ResponseMetadataSlot::default();

		Box::pin(async move {
			let instrumented = self.http_client.with_metadata(meta.clone());
			let refresh_secret = RefreshToken::new(refresh_token.to_owned());
			let response = self
				.oauth_client
				.exchange_refresh_token(&refresh_secret)
				.request_async(&instrumented)
				.await
				.map_err(|err| {
					map_request_error(self.provider, Step::TokenRefresh, meta.take(), err)
				})?;

			map_token_response(response)
		})
	}
}

fn map_token_response(response: BasicTokenResponse) -> Result<Token> {
	let expires_at = match response.expires_in() {
		Some(expires_in) => {
			let secs = i64::try_from(expires_in.as_secs())
				.map_err(|_| ConfigError::ExpiresInOutOfRange)?;

			OffsetDateTime::now_utc().checked_add(Duration::seconds(secs))
		},
		None => None,
	};

	Ok(Token {
		access_token: TokenSecret::new(response.access_token().secret().to_owned()),
		refresh_token: response
			.refresh_token()
			.map(|token| TokenSecret::new(token.secret().to_owned())),
		token_type: response.token_type().as_ref().to_owned(),
		expires_at,
	})
}

fn map_request_error<E>(
	provider: &str,
	step: Step,
	meta: Option<ResponseMetadata>,
	err: BasicRequestTokenError<HttpClientError<E>>,
) -> Error
where
	E: 'static + Send + Sync + StdError,
{
	let status = meta.and_then(|value| value.status);

	match err {
		RequestTokenError::ServerResponse(response) =>
			map_server_response_error(provider, step, status, response),
		RequestTokenError::Request(error) => http::map_http_client_error(provider, step, error),
		RequestTokenError::Parse(source, _body) =>
			Error::Decode { provider: provider.to_owned(), step, source },
		RequestTokenError::Other(message) =>
			Error::TokenEndpoint { provider: provider.to_owned(), step, status, message },
	}
}

fn map_server_response_error(
	provider: &str,
	step: Step,
	status: Option<u16>,
	response: BasicErrorResponse,
) -> Error {
	let message = match response.error_description() {
		Some(description) => format!("{}: {description}", response.error().as_ref()),
		None => response.error().as_ref().to_owned(),
	};

	Error::TokenEndpoint { provider: provider.to_owned(), step, status, message }
}

#[cfg(all(test, feature = "reqwest"))]
mod tests {
	// self
	use super::*;
	use crate::http::ReqwestHttpClient;

	#[test]
	fn builds_client_from_default_endpoints() {
		let result = <BasicFacade<ReqwestHttpClient>>::from_endpoints(
			"xero2",
			&ProviderEndpoints::default(),
			"client-id",
			"secret",
			Arc::new(ReqwestHttpClient::default()),
		);

		assert!(result.is_ok());
	}

	#[test]
	fn rejects_relative_token_endpoint() {
		let endpoints =
			ProviderEndpoints { token: "/connect/token".into(), ..ProviderEndpoints::default() };
		let err = <BasicFacade<ReqwestHttpClient>>::from_endpoints(
			"xero2",
			&endpoints,
			"client-id",
			"",
			Arc::new(ReqwestHttpClient::default()),
		)
		.err()
		.expect("Relative token endpoints must be rejected.");

		assert!(matches!(
			err,
			Error::Config(ConfigError::InvalidEndpoint { endpoint: "token", .. })
		));
	}

	#[test]
	fn server_errors_keep_description_and_status() {
		let response: BasicErrorResponse = serde_json::from_str(
			r#"{"error":"invalid_grant","error_description":"refresh token expired"}"#,
		)
		.expect("Error response fixture should decode.");
		let err = map_server_response_error("xero2", Step::TokenRefresh, Some(400), response);

		match err {
			Error::TokenEndpoint { provider, step, status, message } => {
				assert_eq!(provider, "xero2");
				assert_eq!(step, Step::TokenRefresh);
				assert_eq!(status, Some(400));
				assert_eq!(message, "invalid_grant: refresh token expired");
			},
			other => panic!("unexpected error: {other:?}"),
		}
	}
}
