//! Core request dispatch with bearer injection and coalesced session refresh.
//!
//! Every caller-facing operation funnels through [`ApiClient::send`]: headers
//! are assembled (bearer token re-read from the store immediately before each
//! attempt), the transport executes the call, and a 401 on an authenticated
//! first attempt enters the refresh coordination protocol. The protocol keeps
//! at most one refresh call in flight process-wide; callers that queue behind
//! it adopt the settled outcome instead of issuing another. Each logical
//! request is retried at most once, and every failure pushes its resolved
//! message through the notification sink before propagating to the caller.

// self
use crate::{
	_prelude::*,
	api::{IdentityEnvelope, SessionEnvelope},
	auth::{Principal, SessionToken},
	client::{ApiClient, IDENTITY_ENDPOINT, REFRESH_ENDPOINT, RequestOptions, endpoint_url},
	error::{ConfigError, TransportError},
	http::{Method, OutboundRequest, RawResponse, RestTransport},
	obs::{self, CallKind, CallOutcome, CallSpan},
};

impl<C> ApiClient<C>
where
	C: ?Sized + RestTransport,
{
	/// Issues a GET request against the endpoint path.
	pub async fn get<T>(&self, endpoint: &str, options: RequestOptions) -> Result<Option<T>>
	where
		T: DeserializeOwned,
	{
		self.send(endpoint, Method::Get, None, options).await
	}

	/// Issues a POST request with a JSON body.
	pub async fn post<T, B>(
		&self,
		endpoint: &str,
		body: &B,
		options: RequestOptions,
	) -> Result<Option<T>>
	where
		T: DeserializeOwned,
		B: ?Sized + Serialize,
	{
		let body = self.encode(body)?;

		self.send(endpoint, Method::Post, Some(body), options).await
	}

	/// Issues a PUT request with a JSON body.
	pub async fn put<T, B>(
		&self,
		endpoint: &str,
		body: &B,
		options: RequestOptions,
	) -> Result<Option<T>>
	where
		T: DeserializeOwned,
		B: ?Sized + Serialize,
	{
		let body = self.encode(body)?;

		self.send(endpoint, Method::Put, Some(body), options).await
	}

	/// Issues a PATCH request with a JSON body.
	pub async fn patch<T, B>(
		&self,
		endpoint: &str,
		body: &B,
		options: RequestOptions,
	) -> Result<Option<T>>
	where
		T: DeserializeOwned,
		B: ?Sized + Serialize,
	{
		let body = self.encode(body)?;

		self.send(endpoint, Method::Patch, Some(body), options).await
	}

	/// Issues a DELETE request against the endpoint path.
	pub async fn delete<T>(&self, endpoint: &str, options: RequestOptions) -> Result<Option<T>>
	where
		T: DeserializeOwned,
	{
		self.send(endpoint, Method::Delete, None, options).await
	}

	/// Performs one logical request with authentication recovery.
	///
	/// Returns `Ok(None)` for 204 No Content and the parsed JSON body otherwise.
	/// A 401 on an authenticated, not-yet-retried attempt triggers the refresh
	/// protocol and at most one retry; every other non-2xx resolves into
	/// [`Error::RequestFailed`]. The resolved failure message is also pushed
	/// through the notification sink.
	pub async fn send<T>(
		&self,
		endpoint: &str,
		method: Method,
		body: Option<Vec<u8>>,
		options: RequestOptions,
	) -> Result<Option<T>>
	where
		T: DeserializeOwned,
	{
		const KIND: CallKind = CallKind::Request;

		let span = CallSpan::new(KIND, "send");

		obs::record_call_outcome(KIND, CallOutcome::Attempt);

		let result = span.instrument(self.dispatch(endpoint, method, body, options)).await;

		match &result {
			Ok(_) => obs::record_call_outcome(KIND, CallOutcome::Success),
			Err(err) => {
				obs::record_call_outcome(KIND, CallOutcome::Failure);
				self.sink.notify_error(&err.user_message());
			},
		}

		result
	}

	/// Serializes a request body, reporting failures through the sink so the
	/// notification contract holds even for calls that never reach the wire.
	fn encode<B>(&self, body: &B) -> Result<Vec<u8>>
	where
		B: ?Sized + Serialize,
	{
		serde_json::to_vec(body).map_err(|source| {
			let err = Error::from(ConfigError::BodySerialization { source });

			self.sink.notify_error(&err.user_message());

			err
		})
	}

	async fn dispatch<T>(
		&self,
		endpoint: &str,
		method: Method,
		body: Option<Vec<u8>>,
		options: RequestOptions,
	) -> Result<Option<T>>
	where
		T: DeserializeOwned,
	{
		let url = endpoint_url(&self.base_url, endpoint)?;
		let mut retried = options.retry;

		loop {
			// Re-read the credential slot for every attempt so a retry carries
			// the freshest token.
			let token = if options.no_auth { None } else { self.store.token() };
			let request = self.prepare(method, &url, body.clone(), &options, token.as_ref());
			let response =
				self.transport.execute(request).await.map_err(TransportError::network)?;

			if response.is_no_content() {
				return Ok(None);
			}
			if response.is_success() {
				return parse_json(&response).map(Some);
			}
			if response.status != 401 {
				return Err(error_from_response(&response));
			}
			if options.no_auth || retried {
				self.store.clear();

				return Err(Error::SessionExpired);
			}

			match self.recover_session(token.as_ref()).await {
				Some(_) => retried = true,
				None => {
					self.store.clear();

					return Err(Error::SessionExpired);
				},
			}
		}
	}

	fn prepare(
		&self,
		method: Method,
		url: &Url,
		body: Option<Vec<u8>>,
		options: &RequestOptions,
		token: Option<&SessionToken>,
	) -> OutboundRequest {
		let mut headers = Vec::with_capacity(options.headers.len() + 2);

		headers.push(("Content-Type".to_owned(), "application/json".to_owned()));
		headers.extend(options.headers.iter().cloned());

		if let Some(token) = token {
			headers.push(("Authorization".to_owned(), token.bearer()));
		}

		OutboundRequest { method, url: url.clone(), headers, body }
	}

	/// Coalesces concurrent refresh needs into a single refresh call.
	///
	/// `stale` is the token the failed attempt actually carried. A caller
	/// records the refresh generation before taking the guard; once inside, it
	/// adopts the store's current credential instead of refreshing when either
	/// the generation moved (a refresh settled while it waited) or the stored
	/// token no longer matches the one it failed with (the rotation happened
	/// before it even queued). Otherwise the caller becomes the sole writer,
	/// performs the refresh under the guard, and bumps the generation exactly
	/// once regardless of outcome. On failure the store is cleared inside the
	/// guarded section, so queued callers observe the expired session rather
	/// than starting a second refresh.
	async fn recover_session(&self, stale: Option<&SessionToken>) -> Option<SessionToken> {
		const KIND: CallKind = CallKind::Refresh;

		let observed_generation = self.refresh_generation.load(Ordering::Acquire);
		let _singleflight = self.refresh_guard.lock().await;
		let current = self.store.token();

		if self.refresh_generation.load(Ordering::Acquire) != observed_generation
			|| current.as_ref() != stale
		{
			self.refresh_metrics.record_coalesced();

			return current;
		}

		let span = CallSpan::new(KIND, "recover_session");

		obs::record_call_outcome(KIND, CallOutcome::Attempt);
		self.refresh_metrics.record_attempt();

		let refreshed = span.instrument(self.refresh_credential()).await;

		match &refreshed {
			Some(_) => {
				obs::record_call_outcome(KIND, CallOutcome::Success);
				self.refresh_metrics.record_success();
			},
			None => {
				self.store.clear();
				obs::record_call_outcome(KIND, CallOutcome::Failure);
				self.refresh_metrics.record_failure();
			},
		}

		self.refresh_generation.fetch_add(1, Ordering::Release);

		refreshed
	}

	/// Calls the refresh endpoint and persists any rotated credential.
	///
	/// The current token rides along for rotation when present. The new token
	/// is written to the store before this future resolves, so requests racing
	/// in after the refresh observe it without refreshing again. Returns `None`
	/// whenever the endpoint cannot produce a token, whatever the reason.
	async fn refresh_credential(&self) -> Option<SessionToken> {
		let url = endpoint_url(&self.base_url, REFRESH_ENDPOINT).ok()?;
		let mut headers = vec![("Content-Type".to_owned(), "application/json".to_owned())];

		if let Some(token) = self.store.token() {
			headers.push(("Authorization".to_owned(), token.bearer()));
		}

		let request = OutboundRequest { method: Method::Post, url, headers, body: None };
		let response = self.transport.execute(request).await.ok()?;

		if !response.is_success() {
			return None;
		}

		let envelope = serde_json::from_slice::<SessionEnvelope>(&response.body).ok()?;
		let (token, principal) = envelope.into_parts();
		let token = token?;

		self.store.set_token(token.clone());

		match principal {
			Some(principal) => self.store.set_principal(principal),
			None =>
				if let Some(principal) = self.fetch_identity(&token).await {
					self.store.set_principal(principal);
				},
		}

		Some(token)
	}

	/// Fallback principal lookup after a token-only refresh. A failure here
	/// leaves the rotated token in place; the refresh still counts as a success.
	pub(crate) async fn fetch_identity(&self, token: &SessionToken) -> Option<Principal> {
		const KIND: CallKind = CallKind::Identity;

		let span = CallSpan::new(KIND, "fetch_identity");

		obs::record_call_outcome(KIND, CallOutcome::Attempt);

		let principal = span.instrument(self.identity_request(token)).await;

		match &principal {
			Some(_) => obs::record_call_outcome(KIND, CallOutcome::Success),
			None => obs::record_call_outcome(KIND, CallOutcome::Failure),
		}

		principal
	}

	async fn identity_request(&self, token: &SessionToken) -> Option<Principal> {
		let url = endpoint_url(&self.base_url, IDENTITY_ENDPOINT).ok()?;
		let headers = vec![
			("Content-Type".to_owned(), "application/json".to_owned()),
			("Authorization".to_owned(), token.bearer()),
		];
		let request = OutboundRequest { method: Method::Get, url, headers, body: None };
		let response = self.transport.execute(request).await.ok()?;

		if !response.is_success() {
			return None;
		}

		serde_json::from_slice::<IdentityEnvelope>(&response.body).ok()?.into_principal()
	}
}

/// Deserializes a 2xx body, preserving the failing path for diagnostics.
fn parse_json<T>(response: &RawResponse) -> Result<T>
where
	T: DeserializeOwned,
{
	let mut deserializer = serde_json::Deserializer::from_slice(&response.body);

	serde_path_to_error::deserialize(&mut deserializer).map_err(|source| {
		TransportError::MalformedBody { source, status: Some(response.status) }.into()
	})
}

/// Resolves a non-2xx, non-401 response into [`Error::RequestFailed`].
///
/// The message is probed from the body's `message` then `error` field; a
/// non-JSON body falls back to the status reason phrase.
fn error_from_response(response: &RawResponse) -> Error {
	let status = response.status;
	let generic = format!("API error: {status}");

	match serde_json::from_slice::<JsonValue>(&response.body) {
		Ok(body) => {
			let message = body
				.get("message")
				.and_then(JsonValue::as_str)
				.or_else(|| body.get("error").and_then(JsonValue::as_str))
				.map(str::to_owned)
				.unwrap_or(generic);

			Error::RequestFailed { status, message, body: Some(body) }
		},
		Err(_) => {
			let message = response.reason.clone().unwrap_or(generic);

			Error::RequestFailed { status, message, body: None }
		},
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn response(status: u16, reason: Option<&str>, body: &str) -> RawResponse {
		RawResponse { status, reason: reason.map(str::to_owned), body: body.as_bytes().to_vec() }
	}

	#[test]
	fn error_resolution_prefers_message_then_error_fields() {
		let err = error_from_response(&response(403, Some("Forbidden"), r#"{"message":"X"}"#));

		assert!(
			matches!(err, Error::RequestFailed { status: 403, ref message, .. } if message == "X")
		);

		let err =
			error_from_response(&response(422, None, r#"{"error":"email already registered"}"#));

		assert!(matches!(
			err,
			Error::RequestFailed { status: 422, ref message, .. } if message == "email already registered"
		));
	}

	#[test]
	fn error_resolution_retains_the_structured_body() {
		let err = error_from_response(&response(409, None, r#"{"message":"dup","code":17}"#));

		match err {
			Error::RequestFailed { body: Some(body), .. } => assert_eq!(body["code"], 17),
			other => panic!("Unexpected error variant: {other:?}."),
		}
	}

	#[test]
	fn non_json_bodies_fall_back_to_the_reason_phrase() {
		let err =
			error_from_response(&response(500, Some("Internal Server Error"), "<html>oops</html>"));

		assert!(matches!(
			err,
			Error::RequestFailed { ref message, body: None, .. } if message == "Internal Server Error"
		));

		let err = error_from_response(&response(502, None, ""));

		assert!(matches!(
			err,
			Error::RequestFailed { ref message, .. } if message == "API error: 502"
		));
	}

	#[test]
	fn malformed_success_bodies_surface_the_status() {
		let err = parse_json::<JsonValue>(&response(200, None, "not json"))
			.expect_err("Malformed body should fail to parse.");

		assert!(matches!(
			err,
			Error::Transport(TransportError::MalformedBody { status: Some(200), .. })
		));
	}
}
