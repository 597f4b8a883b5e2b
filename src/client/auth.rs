//! Session lifecycle operations: sign-in, registration, identity, sign-out.

// self
use crate::{
	_prelude::*,
	api::{IdentityEnvelope, SessionEnvelope},
	auth::{LoginCredentials, Principal, RegisterRequest},
	client::{ApiClient, IDENTITY_ENDPOINT, RequestOptions, empty_payload},
	http::{Method, RestTransport},
};

const LOGIN_ENDPOINT: &str = "/auth/login";
const LOGOUT_ENDPOINT: &str = "/auth/logout";
const PASSWORD_RESET_ENDPOINT: &str = "/auth/forgot-password";
const REGISTER_ENDPOINT: &str = "/auth/register";

#[derive(Serialize)]
struct PasswordResetRequest<'a> {
	email: &'a str,
}

impl<C> ApiClient<C>
where
	C: ?Sized + RestTransport,
{
	/// Exchanges credentials for a session, persisting the issued token and
	/// principal into the credential store.
	pub async fn login(&self, credentials: &LoginCredentials) -> Result<Principal> {
		let envelope: SessionEnvelope = self
			.post(LOGIN_ENDPOINT, credentials, RequestOptions::new().without_auth())
			.await?
			.ok_or_else(|| empty_payload(LOGIN_ENDPOINT))?;

		self.establish_session(LOGIN_ENDPOINT, envelope).await
	}

	/// Registers a new account; the API signs it in directly, so the issued
	/// session is persisted exactly like a login.
	pub async fn register(&self, request: &RegisterRequest) -> Result<Principal> {
		let envelope: SessionEnvelope = self
			.post(REGISTER_ENDPOINT, request, RequestOptions::new().without_auth())
			.await?
			.ok_or_else(|| empty_payload(REGISTER_ENDPOINT))?;

		self.establish_session(REGISTER_ENDPOINT, envelope).await
	}

	/// Persists a freshly issued session and resolves its principal, falling
	/// back to the identity endpoint when the envelope omits the user block.
	async fn establish_session(
		&self,
		endpoint: &str,
		envelope: SessionEnvelope,
	) -> Result<Principal> {
		let (token, principal) = envelope.into_parts();
		let token = token.ok_or_else(|| missing_session(endpoint))?;

		self.store.set_token(token.clone());

		let principal = match principal {
			Some(principal) => principal,
			None => self.fetch_identity(&token).await.ok_or_else(|| missing_session(endpoint))?,
		};

		self.store.set_principal(principal.clone());

		Ok(principal)
	}

	/// Fetches the authenticated principal and updates the stored copy.
	pub async fn current_user(&self) -> Result<Principal> {
		let envelope: IdentityEnvelope = self
			.get(IDENTITY_ENDPOINT, RequestOptions::new())
			.await?
			.ok_or_else(|| empty_payload(IDENTITY_ENDPOINT))?;
		let principal =
			envelope.into_principal().ok_or_else(|| missing_session(IDENTITY_ENDPOINT))?;

		self.store.set_principal(principal.clone());

		Ok(principal)
	}

	/// Ends the session.
	///
	/// The server call is best-effort: the local credential is cleared no
	/// matter how the endpoint answers, and the attempt is marked as already
	/// retried so an expired session cannot mint a new one just to end itself.
	pub async fn logout(&self) -> Result<()> {
		let result = self
			.send::<JsonValue>(LOGOUT_ENDPOINT, Method::Post, None, RequestOptions {
				retry: true,
				..Default::default()
			})
			.await;

		self.store.clear();
		result.map(|_| ())
	}

	/// Requests a password-reset email for the account.
	pub async fn request_password_reset(&self, email: &str) -> Result<()> {
		self.post::<JsonValue, _>(
			PASSWORD_RESET_ENDPOINT,
			&PasswordResetRequest { email },
			RequestOptions::new().without_auth(),
		)
		.await?;

		Ok(())
	}
}

/// Error used when a session endpoint answers 2xx without usable session material.
fn missing_session(endpoint: &str) -> Error {
	Error::RequestFailed {
		status: 200,
		message: format!("{endpoint} response did not include a usable session."),
		body: None,
	}
}
