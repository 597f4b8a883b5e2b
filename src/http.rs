//! Transport primitives for authenticated REST calls.
//!
//! The module exposes [`RestTransport`] alongside [`OutboundRequest`] and
//! [`RawResponse`] so downstream crates can integrate custom HTTP clients. The
//! trait is the courier's only dependency on an HTTP stack: implementations
//! execute one prepared request and surface the status line plus raw body bytes,
//! leaving parsing and the 401 recovery protocol to the client layer.

// std
use std::ops::Deref;
// self
use crate::_prelude::*;

/// HTTP verbs recognized by the courier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
	/// HTTP GET.
	Get,
	/// HTTP POST.
	Post,
	/// HTTP PUT.
	Put,
	/// HTTP PATCH.
	Patch,
	/// HTTP DELETE.
	Delete,
}
impl Method {
	/// Returns the canonical uppercase verb.
	pub const fn as_str(self) -> &'static str {
		match self {
			Method::Get => "GET",
			Method::Post => "POST",
			Method::Put => "PUT",
			Method::Patch => "PATCH",
			Method::Delete => "DELETE",
		}
	}
}
impl Display for Method {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
#[cfg(feature = "reqwest")]
impl From<Method> for reqwest::Method {
	fn from(method: Method) -> Self {
		match method {
			Method::Get => reqwest::Method::GET,
			Method::Post => reqwest::Method::POST,
			Method::Put => reqwest::Method::PUT,
			Method::Patch => reqwest::Method::PATCH,
			Method::Delete => reqwest::Method::DELETE,
		}
	}
}

/// A fully prepared outbound call handed to a [`RestTransport`].
///
/// Headers are ordered; when two entries share a name the later one wins, which
/// lets caller-supplied headers override the courier's defaults.
#[derive(Clone, Debug)]
pub struct OutboundRequest {
	/// HTTP verb for the call.
	pub method: Method,
	/// Absolute request URL.
	pub url: Url,
	/// Header name/value pairs in application order.
	pub headers: Vec<(String, String)>,
	/// Serialized JSON body, when the call carries one.
	pub body: Option<Vec<u8>>,
}

/// Raw response surfaced by a transport before any JSON handling.
#[derive(Clone, Debug, Default)]
pub struct RawResponse {
	/// HTTP status code.
	pub status: u16,
	/// Status line reason phrase, when the transport knows one.
	pub reason: Option<String>,
	/// Unparsed body bytes.
	pub body: Vec<u8>,
}
impl RawResponse {
	/// Returns `true` for 2xx statuses.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}

	/// Returns `true` when the endpoint answered 204 No Content.
	pub fn is_no_content(&self) -> bool {
		self.status == 204
	}
}

/// Boxed future returned by [`RestTransport::execute`].
pub type TransportFuture<'a, E> = Pin<Box<dyn Future<Output = Result<RawResponse, E>> + 'a + Send>>;

/// Abstraction over HTTP transports capable of executing courier requests.
///
/// Implementations must be `Send + Sync + 'static` so one transport can be
/// shared behind `Arc<C>` across client clones, and the returned futures must
/// be `Send` so requests can hop executors. A transport owns connection reuse,
/// TLS, and timeouts; the courier never imposes its own deadline.
pub trait RestTransport
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type TransportError: 'static + Send + Sync + StdError;

	/// Executes one prepared request and resolves with the raw response.
	fn execute(&self, request: OutboundRequest) -> TransportFuture<'_, Self::TransportError>;
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one
/// place. Callers that need timeouts, proxies, or custom TLS configure a
/// [`ReqwestClient`] themselves and hand it to [`ReqwestHttpClient::with_client`].
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl RestTransport for ReqwestHttpClient {
	type TransportError = ReqwestError;

	fn execute(&self, request: OutboundRequest) -> TransportFuture<'_, Self::TransportError> {
		let client = self.0.clone();

		Box::pin(async move {
			let mut builder = client.request(request.method.into(), request.url);

			for (name, value) in &request.headers {
				builder = builder.header(name.as_str(), value.as_str());
			}
			if let Some(body) = request.body {
				builder = builder.body(body);
			}

			let response = builder.send().await?;
			let status = response.status();
			let reason = status.canonical_reason().map(str::to_owned);
			let body = response.bytes().await?.to_vec();

			Ok(RawResponse { status: status.as_u16(), reason, body })
		})
	}
}
