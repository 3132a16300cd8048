//! Plugs a reqwest client with explicit timeouts into the provider and resolves the identity
//! behind an access token taken from the environment.

// std
use std::{env, time::Duration};
// crates.io
use color_eyre::{Result, eyre::eyre};
// self
use xero_identity::{flows::XeroProvider, http::ReqwestHttpClient, reqwest::Client, session::Session};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let client = Client::builder()
		.connect_timeout(Duration::from_secs(5))
		.timeout(Duration::from_secs(20))
		.build()?;
	let provider: XeroProvider<ReqwestHttpClient> = XeroProvider::with_http_client(
		env::var("XERO_KEY").unwrap_or_default(),
		env::var("XERO_SECRET").unwrap_or_default(),
		"https://app.example.com/auth/xero/callback",
		Vec::<String>::new(),
		ReqwestHttpClient::with_client(client),
	);
	let mut session = Session::default();

	session.access_token =
		env::var("XERO_ACCESS_TOKEN").map_err(|_| eyre!("Set XERO_ACCESS_TOKEN to run this demo."))?;

	let record = provider.fetch_user(&session).await?;

	println!("Signed in to {} ({}) as tenant {}.", record.name, record.user_id, record.tenant_id);

	Ok(())
}
