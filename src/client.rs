//! The authenticated request coordinator and its typed service operations.
//!
//! [`ApiClient`] wraps a [`RestTransport`], injects the bearer credential from
//! a shared [`CredentialStore`], and transparently recovers from an expired
//! credential by refreshing it once and retrying the original request. The
//! refresh protocol lives in the `send` submodule; `auth` and `users` add the
//! typed dashboard operations on top.

mod auth;
mod metrics;
mod send;
mod users;

pub use metrics::RefreshMetrics;
pub use users::UserQuery;

// self
use crate::{
	_prelude::*, error::ConfigError, http::RestTransport, notify::NotificationSink,
	store::CredentialStore,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

pub(crate) const IDENTITY_ENDPOINT: &str = "/auth/me";
pub(crate) const REFRESH_ENDPOINT: &str = "/auth/refresh";

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport stack.
pub type ReqwestApiClient = ApiClient<ReqwestHttpClient>;

/// Coordinates authenticated REST calls against a single API base URL.
///
/// The client owns references to the transport, credential store, and
/// notification sink so individual operations can focus on endpoint-specific
/// logic. Credential and refresh state are explicit constructor dependencies
/// rather than ambient globals; clones share all of them, so one client can be
/// handed to many tasks while the singleflight refresh invariant keeps holding
/// process-wide.
pub struct ApiClient<C>
where
	C: ?Sized + RestTransport,
{
	/// HTTP transport used for every outbound call.
	pub transport: Arc<C>,
	/// Credential slot read before each attempt and updated by refreshes.
	pub store: Arc<dyn CredentialStore>,
	/// Sink receiving one user-visible message per failed request.
	pub sink: Arc<dyn NotificationSink>,
	/// Base URL every endpoint path is appended to.
	pub base_url: Url,
	/// Shared counters describing refresh coordination traffic.
	pub refresh_metrics: Arc<RefreshMetrics>,
	refresh_guard: Arc<AsyncMutex<()>>,
	refresh_generation: Arc<AtomicU64>,
}
impl<C> ApiClient<C>
where
	C: ?Sized + RestTransport,
{
	/// Creates a client that reuses the caller-provided transport.
	pub fn with_transport(
		store: Arc<dyn CredentialStore>,
		sink: Arc<dyn NotificationSink>,
		base_url: Url,
		transport: impl Into<Arc<C>>,
	) -> Self {
		Self {
			transport: transport.into(),
			store,
			sink,
			base_url,
			refresh_metrics: Default::default(),
			refresh_guard: Default::default(),
			refresh_generation: Default::default(),
		}
	}
}
#[cfg(feature = "reqwest")]
impl ApiClient<ReqwestHttpClient> {
	/// Creates a client backed by the crate's default reqwest transport.
	///
	/// Callers that need timeouts, proxies, or custom TLS should build a
	/// [`ReqwestHttpClient`] themselves and use [`ApiClient::with_transport`].
	pub fn new(
		store: Arc<dyn CredentialStore>,
		sink: Arc<dyn NotificationSink>,
		base_url: Url,
	) -> Self {
		Self::with_transport(store, sink, base_url, ReqwestHttpClient::default())
	}
}
impl<C> Clone for ApiClient<C>
where
	C: ?Sized + RestTransport,
{
	fn clone(&self) -> Self {
		Self {
			transport: Arc::clone(&self.transport),
			store: Arc::clone(&self.store),
			sink: Arc::clone(&self.sink),
			base_url: self.base_url.clone(),
			refresh_metrics: Arc::clone(&self.refresh_metrics),
			refresh_guard: Arc::clone(&self.refresh_guard),
			refresh_generation: Arc::clone(&self.refresh_generation),
		}
	}
}
impl<C> Debug for ApiClient<C>
where
	C: ?Sized + RestTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ApiClient")
			.field("base_url", &self.base_url.as_str())
			.field("authenticated", &self.store.token().is_some())
			.finish()
	}
}

/// Per-request flags recognized by [`ApiClient::send`].
#[derive(Clone, Debug, Default)]
pub struct RequestOptions {
	/// Skips bearer injection and 401 refresh handling entirely.
	pub no_auth: bool,
	/// Marks the attempt as already retried after a refresh; a further 401 is
	/// terminal instead of triggering another refresh.
	pub retry: bool,
	/// Extra headers applied after the defaults; later entries win on conflict.
	pub headers: Vec<(String, String)>,
}
impl RequestOptions {
	/// Creates the default option set.
	pub fn new() -> Self {
		Self::default()
	}

	/// Disables bearer injection and refresh handling for this request.
	pub fn without_auth(mut self) -> Self {
		self.no_auth = true;

		self
	}

	/// Appends an extra header to the request.
	pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.push((name.into(), value.into()));

		self
	}
}

/// Appends an endpoint path (beginning with `/`) to the base URL by string
/// concatenation, so a base path prefix such as `/api/v1` survives the join.
pub(crate) fn endpoint_url(base: &Url, endpoint: &str) -> Result<Url, ConfigError> {
	let raw = format!("{}{}", base.as_str().trim_end_matches('/'), endpoint);

	Url::parse(&raw)
		.map_err(|source| ConfigError::InvalidEndpoint { endpoint: endpoint.into(), source })
}

/// Error used when an endpoint answers 204 where a payload was required.
pub(crate) fn empty_payload(endpoint: &str) -> Error {
	Error::RequestFailed {
		status: 204,
		message: format!("{endpoint} returned no content where a payload was expected."),
		body: None,
	}
}
