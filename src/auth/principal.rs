//! Authenticated user profile associated with a credential.

// self
use crate::_prelude::*;

/// Role assigned to a principal by the API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
	/// Full administrative access.
	Admin,
	/// Regular account.
	User,
	/// Content-editing access.
	Editor,
}
impl Role {
	/// Returns the wire-format label for the role.
	pub const fn as_str(self) -> &'static str {
		match self {
			Role::Admin => "admin",
			Role::User => "user",
			Role::Editor => "editor",
		}
	}
}
impl Display for Role {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Profile data for the authenticated user, as the API serializes it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
	/// Opaque account identifier.
	pub id: String,
	/// Display name.
	pub name: String,
	/// Account email address.
	pub email: String,
	/// Optional avatar URL.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub avatar: Option<String>,
	/// Assigned role.
	pub role: Role,
	/// Creation instant of the account record.
	#[serde(with = "time::serde::rfc3339")]
	pub created_at: OffsetDateTime,
	/// Last modification instant of the account record.
	#[serde(with = "time::serde::rfc3339")]
	pub updated_at: OffsetDateTime,
}
