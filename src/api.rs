//! Response envelopes used by the dashboard API.
//!
//! The API wraps most payloads in a `{ success, message, data }` envelope and
//! list payloads in a paginated variant. Session-issuing endpoints are less
//! disciplined: the token may arrive at `data.token` or at the top level, and
//! the principal at `data.user`, `user`, or not at all. [`SessionEnvelope`] and
//! [`IdentityEnvelope`] model that probing so the client layer stays typed.

// self
use crate::{
	_prelude::*,
	auth::{Principal, SessionToken},
};

/// Standard `{ success, message, data }` envelope returned by the API.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
	/// Whether the API considered the operation successful.
	pub success: bool,
	/// Optional human-readable note attached to the response.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub message: Option<String>,
	/// The payload proper.
	pub data: T,
}

/// Pagination block attached to list responses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
	/// Total number of records across all pages.
	pub total: u64,
	/// 1-based index of the returned page.
	pub page: u32,
	/// Requested page size.
	pub limit: u32,
	/// Total number of pages at the requested size.
	pub total_pages: u32,
}

/// Paginated list envelope returned by collection endpoints.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
	/// Whether the API considered the operation successful.
	pub success: bool,
	/// Optional human-readable note attached to the response.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub message: Option<String>,
	/// One page of records.
	pub data: Vec<T>,
	/// Pagination block describing the full collection.
	pub meta: PageMeta,
}

/// Lenient envelope for session-issuing endpoints (login, register, refresh).
///
/// Field probing follows the API's observed behavior: the nested `data` block
/// wins over top-level fields, and a principal that fails to parse is treated
/// as absent rather than poisoning the token next to it.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct SessionEnvelope {
	#[serde(default)]
	data: Option<SessionPayload>,
	#[serde(default)]
	token: Option<SessionToken>,
	#[serde(default, deserialize_with = "lenient_principal")]
	user: Option<Principal>,
}
impl SessionEnvelope {
	/// Splits the envelope into the issued token and principal, applying the
	/// `data.token`-over-`token` and `data.user`-over-`user` precedence.
	pub fn into_parts(self) -> (Option<SessionToken>, Option<Principal>) {
		let Self { data, token, user } = self;
		let (nested_token, nested_user) = match data {
			Some(payload) => (payload.token, payload.user),
			None => (None, None),
		};

		(nested_token.or(token), nested_user.or(user))
	}
}

/// Nested `data` block of a [`SessionEnvelope`].
#[derive(Clone, Debug, Default, Deserialize)]
struct SessionPayload {
	#[serde(default)]
	token: Option<SessionToken>,
	#[serde(default, deserialize_with = "lenient_principal")]
	user: Option<Principal>,
}

/// Lenient envelope for the identity endpoint, which answers with the
/// principal at `data` or `user`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct IdentityEnvelope {
	#[serde(default, deserialize_with = "lenient_principal")]
	data: Option<Principal>,
	#[serde(default, deserialize_with = "lenient_principal")]
	user: Option<Principal>,
}
impl IdentityEnvelope {
	/// Extracts the principal, preferring the `data` slot.
	pub fn into_principal(self) -> Option<Principal> {
		self.data.or(self.user)
	}
}

/// Accepts any JSON at the field position and keeps the principal only when it
/// parses; a null, missing, or malformed principal becomes `None`.
fn lenient_principal<'de, D>(deserializer: D) -> Result<Option<Principal>, D::Error>
where
	D: serde::Deserializer<'de>,
{
	let value = JsonValue::deserialize(deserializer)?;

	Ok(serde_json::from_value(value).ok())
}
