//! Credential storage contract and the built-in in-memory backend.

pub mod memory;

pub use memory::MemoryCredentialStore;

// self
use crate::auth::{Principal, SessionToken};

/// Shared credential slot consulted before every authenticated request.
///
/// The slot holds at most one bearer token and one principal. It is mutated
/// only by login/registration, the refresh operation's success path, and
/// logout or a terminal authentication failure; the courier takes the store as
/// an explicit `Arc<dyn CredentialStore>` constructor dependency rather than
/// reaching for an ambient singleton. Implementations own persistence and
/// hydration (cookies, keychains, disk); the courier only reads and writes.
pub trait CredentialStore
where
	Self: Send + Sync,
{
	/// Returns the bearer token, if a session is active.
	fn token(&self) -> Option<SessionToken>;

	/// Replaces the bearer token, activating or rotating the session.
	fn set_token(&self, token: SessionToken);

	/// Returns the authenticated principal, if known.
	fn principal(&self) -> Option<Principal>;

	/// Replaces the authenticated principal.
	fn set_principal(&self, principal: Principal);

	/// Drops both the token and the principal, ending the session locally.
	fn clear(&self);
}
