//! Issues a Xero authorization URL, persists the session across the redirect, and restores it
//! in the callback handler.

// std
use std::{collections::HashMap, env};
// crates.io
use color_eyre::Result;
// self
use xero_identity::{
	auth::XeroScope,
	flows::{ReqwestXeroProvider, random_state},
	session::Session,
};

fn main() -> Result<()> {
	color_eyre::install()?;

	let client_key = env::var("XERO_KEY").unwrap_or_else(|_| "demo-client".into());
	let secret = env::var("XERO_SECRET").unwrap_or_default();
	let provider = ReqwestXeroProvider::new(
		client_key,
		secret,
		"https://app.example.com/auth/xero/callback",
		[
			XeroScope::OpenId,
			XeroScope::Profile,
			XeroScope::Email,
			XeroScope::OfflineAccess,
			XeroScope::AccountingContactsRead,
		],
	);
	let state = random_state();
	let session = provider.begin_auth(&state)?;

	println!("Send your user to {}.", session.auth_url()?);

	let mut pending: HashMap<String, String> = HashMap::new();

	pending.insert(state.clone(), session.marshal());

	// Simulate the callback handler looking up the stored session by `state`.
	match pending.remove(&state) {
		Some(text) => {
			let restored: Session = provider.unmarshal_session(&text)?;

			println!("Restored session in state {:?}.", restored.state());
			println!("Call XeroProvider::authorize with the callback `code` to finish signing in.");
		},
		None => eprintln!("State `{state}` was not recognized."),
	}

	Ok(())
}
