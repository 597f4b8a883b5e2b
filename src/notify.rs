//! Fire-and-forget sinks for user-visible failure notifications.
//!
//! Every request failure resolves a user-facing message (see
//! [`Error::user_message`](crate::error::Error::user_message)) and pushes it
//! through the configured sink exactly once, in addition to returning the error
//! to the caller. Embedding applications typically forward these messages to a
//! toast or status surface.

// self
use crate::_prelude::*;

/// Consumer of user-visible failure messages.
pub trait NotificationSink
where
	Self: Send + Sync,
{
	/// Publishes one error notification. Implementations must not block and
	/// must not fail; the courier never consumes a return value.
	fn notify_error(&self, message: &str);
}

/// Sink that drops every notification.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;
impl NotificationSink for NullSink {
	fn notify_error(&self, _message: &str) {}
}

/// Sink that forwards notifications as `tracing` error events under the
/// `api_courier.notify` target.
#[cfg(feature = "tracing")]
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;
#[cfg(feature = "tracing")]
impl NotificationSink for TracingSink {
	fn notify_error(&self, message: &str) {
		tracing::error!(target: "api_courier.notify", "{message}");
	}
}
