//! User directory operations backing the dashboard's list and detail views.

// self
use crate::{
	_prelude::*,
	api::{ApiResponse, Paginated},
	auth::Principal,
	client::{ApiClient, RequestOptions, empty_payload},
	http::RestTransport,
};

const USERS_ENDPOINT: &str = "/users";
/// Default page size for paginated list views.
const DEFAULT_PAGE_SIZE: u32 = 10;

/// Query parameters accepted by the user listing endpoint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserQuery {
	/// 1-based page index.
	pub page: u32,
	/// Page size.
	pub limit: u32,
	/// Optional search term matched against name and email.
	pub search: Option<String>,
}
impl UserQuery {
	/// Creates a query for the given page with the default page size.
	pub fn page(page: u32) -> Self {
		Self { page, ..Self::default() }
	}

	/// Overrides the page size.
	pub fn with_limit(mut self, limit: u32) -> Self {
		self.limit = limit;

		self
	}

	/// Sets the search term.
	pub fn with_search(mut self, search: impl Into<String>) -> Self {
		self.search = Some(search.into());

		self
	}

	fn endpoint(&self) -> String {
		let mut query = url::form_urlencoded::Serializer::new(String::new());

		query.append_pair("page", &self.page.to_string());
		query.append_pair("limit", &self.limit.to_string());

		if let Some(search) = &self.search {
			query.append_pair("search", search);
		}

		format!("{USERS_ENDPOINT}?{}", query.finish())
	}
}
impl Default for UserQuery {
	fn default() -> Self {
		Self { page: 1, limit: DEFAULT_PAGE_SIZE, search: None }
	}
}

impl<C> ApiClient<C>
where
	C: ?Sized + RestTransport,
{
	/// Fetches one page of the user directory.
	pub async fn users(&self, query: &UserQuery) -> Result<Paginated<Principal>> {
		let endpoint = query.endpoint();

		self.get(&endpoint, RequestOptions::new()).await?.ok_or_else(|| empty_payload(USERS_ENDPOINT))
	}

	/// Fetches a single user by identifier.
	pub async fn user(&self, id: &str) -> Result<Principal> {
		let endpoint = format!("{USERS_ENDPOINT}/{id}");
		let response: ApiResponse<Principal> = self
			.get(&endpoint, RequestOptions::new())
			.await?
			.ok_or_else(|| empty_payload(&endpoint))?;

		Ok(response.data)
	}
}
