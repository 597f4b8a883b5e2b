//! Sign-in and registration payloads submitted to the auth endpoints.

// self
use crate::_prelude::*;

/// Email + password pair submitted to the login endpoint.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginCredentials {
	/// Account email address.
	pub email: String,
	/// Account password; never logged.
	pub password: String,
}
impl LoginCredentials {
	/// Builds a credentials pair.
	pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
		Self { email: email.into(), password: password.into() }
	}
}
impl Debug for LoginCredentials {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("LoginCredentials")
			.field("email", &self.email)
			.field("password", &"<redacted>")
			.finish()
	}
}

/// Payload submitted to the registration endpoint.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
	/// Display name for the new account.
	pub name: String,
	/// Account email address.
	pub email: String,
	/// Account password; never logged.
	pub password: String,
}
impl RegisterRequest {
	/// Builds a registration payload.
	pub fn new(
		name: impl Into<String>,
		email: impl Into<String>,
		password: impl Into<String>,
	) -> Self {
		Self { name: name.into(), email: email.into(), password: password.into() }
	}
}
impl Debug for RegisterRequest {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RegisterRequest")
			.field("name", &self.name)
			.field("email", &self.email)
			.field("password", &"<redacted>")
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn debug_output_redacts_passwords() {
		let login = LoginCredentials::new("ada@example.com", "hunter2");
		let register = RegisterRequest::new("Ada", "ada@example.com", "hunter2");

		assert!(!format!("{login:?}").contains("hunter2"));
		assert!(!format!("{register:?}").contains("hunter2"));
		assert!(format!("{register:?}").contains("ada@example.com"));
	}

	#[test]
	fn payloads_serialize_for_the_wire() {
		let login = LoginCredentials::new("ada@example.com", "hunter2");
		let value = serde_json::to_value(&login).expect("Login payload should serialize.");

		assert_eq!(value["email"], "ada@example.com");
		assert_eq!(value["password"], "hunter2");
	}
}
