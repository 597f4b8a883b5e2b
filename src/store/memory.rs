//! Thread-safe in-memory [`CredentialStore`] for applications and tests.

// self
use crate::{
	_prelude::*,
	auth::{Principal, SessionToken},
	store::CredentialStore,
};

#[derive(Debug, Default)]
struct CredentialSlot {
	token: Option<SessionToken>,
	principal: Option<Principal>,
}

/// Thread-safe credential slot kept in process memory.
///
/// Clones share the same underlying slot, so one store can back an
/// [`ApiClient`](crate::client::ApiClient) and still be inspected by the
/// embedding application.
#[derive(Clone, Debug, Default)]
pub struct MemoryCredentialStore(Arc<RwLock<CredentialSlot>>);
impl CredentialStore for MemoryCredentialStore {
	fn token(&self) -> Option<SessionToken> {
		self.0.read().token.clone()
	}

	fn set_token(&self, token: SessionToken) {
		self.0.write().token = Some(token);
	}

	fn principal(&self) -> Option<Principal> {
		self.0.read().principal.clone()
	}

	fn set_principal(&self, principal: Principal) {
		self.0.write().principal = Some(principal);
	}

	fn clear(&self) {
		let mut slot = self.0.write();

		slot.token = None;
		slot.principal = None;
	}
}
