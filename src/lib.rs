//! Drop-in authenticated REST client for dashboard-style APIs - bearer injection,
//! singleflight session refresh, and typed admin endpoints in one crate.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod api;
pub mod auth;
pub mod client;
pub mod error;
pub mod http;
pub mod notify;
pub mod obs;
pub mod store;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::{Principal, SessionToken},
		client::{ApiClient, ReqwestApiClient},
		http::ReqwestHttpClient,
		notify::NotificationSink,
		store::{CredentialStore, MemoryCredentialStore},
	};

	/// Notification sink that records every message for assertions.
	#[derive(Clone, Debug, Default)]
	pub struct RecordingSink(Arc<Mutex<Vec<String>>>);
	impl RecordingSink {
		/// Returns the messages received so far.
		pub fn messages(&self) -> Vec<String> {
			self.0.lock().clone()
		}
	}
	impl NotificationSink for RecordingSink {
		fn notify_error(&self, message: &str) {
			self.0.lock().push(message.to_owned());
		}
	}

	/// Credential store that counts `clear` calls on top of the in-memory backend.
	#[derive(Debug, Default)]
	pub struct CountingStore {
		inner: MemoryCredentialStore,
		clears: AtomicU64,
	}
	impl CountingStore {
		/// Returns the number of times `clear` has been invoked.
		pub fn clears(&self) -> u64 {
			self.clears.load(Ordering::Relaxed)
		}
	}
	impl CredentialStore for CountingStore {
		fn token(&self) -> Option<SessionToken> {
			self.inner.token()
		}

		fn set_token(&self, token: SessionToken) {
			self.inner.set_token(token);
		}

		fn principal(&self) -> Option<Principal> {
			self.inner.principal()
		}

		fn set_principal(&self, principal: Principal) {
			self.inner.set_principal(principal);
		}

		fn clear(&self) {
			self.clears.fetch_add(1, Ordering::Relaxed);
			self.inner.clear();
		}
	}

	/// Constructs an [`ApiClient`] wired to a counting in-memory store and a
	/// recording sink, backed by the reqwest transport used across integration
	/// tests.
	pub fn build_reqwest_test_client(
		base_url: &str,
	) -> (ReqwestApiClient, Arc<CountingStore>, Arc<RecordingSink>) {
		let store_backend = Arc::new(CountingStore::default());
		let sink_backend = Arc::new(RecordingSink::default());
		let store: Arc<dyn CredentialStore> = store_backend.clone();
		let sink: Arc<dyn NotificationSink> = sink_backend.clone();
		let base_url = Url::parse(base_url).expect("Failed to parse test base URL.");
		let client = ApiClient::with_transport(store, sink, base_url, ReqwestHttpClient::default());

		(client, store_backend, sink_backend)
	}
}

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::{
			Arc,
			atomic::{AtomicU64, Ordering},
		},
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize, de::DeserializeOwned};
	pub use serde_json::Value as JsonValue;
	pub use thiserror::Error as ThisError;
	pub use time::OffsetDateTime;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(all(test, feature = "reqwest"))] use {api_courier as _, httpmock as _, tokio as _};
