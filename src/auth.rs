//! Auth-domain models: session tokens, principals, and sign-in payloads.

pub mod credentials;
pub mod principal;
pub mod session;

pub use credentials::*;
pub use principal::*;
pub use session::*;
