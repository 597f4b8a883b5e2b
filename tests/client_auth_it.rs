#![cfg(feature = "reqwest")]

// crates.io
use httpmock::prelude::*;
use serde_json::json;
// self
use api_courier::{
	_preludet::*,
	auth::{LoginCredentials, RegisterRequest, Role, SessionToken},
	store::CredentialStore,
};

fn principal_json() -> serde_json::Value {
	json!({
		"id": "u-1",
		"name": "Ada",
		"email": "ada@example.com",
		"role": "admin",
		"createdAt": "2025-01-01T00:00:00Z",
		"updatedAt": "2025-01-01T00:00:00Z",
	})
}

#[tokio::test]
async fn login_persists_token_and_principal() {
	let server = MockServer::start_async().await;
	let (client, store, _sink) = build_reqwest_test_client(&server.base_url());
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/auth/login")
				.json_body(json!({ "email": "ada@example.com", "password": "hunter2" }));
			then.status(200).header("content-type", "application/json").json_body(json!({
				"success": true,
				"data": { "token": "issued-token", "user": principal_json() },
			}));
		})
		.await;
	let principal = client
		.login(&LoginCredentials::new("ada@example.com", "hunter2"))
		.await
		.expect("Login should succeed against the mock endpoint.");

	mock.assert_async().await;

	assert_eq!(principal.role, Role::Admin);
	assert_eq!(store.token().map(|t| t.expose().to_owned()), Some("issued-token".into()));
	assert_eq!(store.principal().map(|p| p.id), Some("u-1".into()));
}

#[tokio::test]
async fn login_without_inline_user_resolves_identity() {
	let server = MockServer::start_async().await;
	let (client, store, _sink) = build_reqwest_test_client(&server.base_url());
	let _login = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/login");
			then.status(200)
				.header("content-type", "application/json")
				.json_body(json!({ "token": "issued-token" }));
		})
		.await;
	let identity = server
		.mock_async(|when, then| {
			when.method(GET).path("/auth/me").header("authorization", "Bearer issued-token");
			then.status(200)
				.header("content-type", "application/json")
				.json_body(json!({ "success": true, "data": principal_json() }));
		})
		.await;
	let principal = client
		.login(&LoginCredentials::new("ada@example.com", "hunter2"))
		.await
		.expect("Login should resolve the principal through the identity endpoint.");

	identity.assert_calls_async(1).await;

	assert_eq!(principal.email, "ada@example.com");
	assert_eq!(store.principal().map(|p| p.email), Some("ada@example.com".into()));
}

#[tokio::test]
async fn login_without_a_token_fails() {
	let server = MockServer::start_async().await;
	let (client, store, _sink) = build_reqwest_test_client(&server.base_url());
	let _login = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/login");
			then.status(200)
				.header("content-type", "application/json")
				.json_body(json!({ "success": true, "data": {} }));
		})
		.await;
	let err = client
		.login(&LoginCredentials::new("ada@example.com", "hunter2"))
		.await
		.expect_err("A session endpoint answering without a token must fail.");

	assert!(matches!(
		err,
		Error::RequestFailed { ref message, .. } if message.contains("usable session")
	));
	assert!(store.token().is_none());
}

#[tokio::test]
async fn register_persists_the_issued_session() {
	let server = MockServer::start_async().await;
	let (client, store, _sink) = build_reqwest_test_client(&server.base_url());
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/register").json_body(json!({
				"name": "Ada",
				"email": "ada@example.com",
				"password": "hunter2",
			}));
			then.status(200).header("content-type", "application/json").json_body(json!({
				"success": true,
				"data": { "token": "issued-token", "user": principal_json() },
			}));
		})
		.await;

	client
		.register(&RegisterRequest::new("Ada", "ada@example.com", "hunter2"))
		.await
		.expect("Registration should succeed against the mock endpoint.");

	mock.assert_async().await;

	assert_eq!(store.token().map(|t| t.expose().to_owned()), Some("issued-token".into()));
}

#[tokio::test]
async fn current_user_updates_the_stored_principal() {
	let server = MockServer::start_async().await;
	let (client, store, _sink) = build_reqwest_test_client(&server.base_url());

	store.set_token(SessionToken::new("active-token"));

	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/auth/me").header("authorization", "Bearer active-token");
			then.status(200)
				.header("content-type", "application/json")
				.json_body(json!({ "success": true, "data": principal_json() }));
		})
		.await;
	let principal =
		client.current_user().await.expect("The identity endpoint should resolve the principal.");

	mock.assert_async().await;

	assert_eq!(principal.name, "Ada");
	assert_eq!(store.principal().map(|p| p.name), Some("Ada".into()));
}

#[tokio::test]
async fn logout_clears_the_credential_even_when_the_server_rejects() {
	let server = MockServer::start_async().await;
	let (client, store, sink) = build_reqwest_test_client(&server.base_url());

	store.set_token(SessionToken::new("active-token"));

	let _logout = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/logout");
			then.status(500)
				.header("content-type", "application/json")
				.json_body(json!({ "message": "backend down" }));
		})
		.await;
	let err = client.logout().await.expect_err("The server failure should propagate.");

	assert!(matches!(err, Error::RequestFailed { status: 500, .. }));
	assert!(store.token().is_none(), "Logout must clear the local credential regardless.");
	assert_eq!(sink.messages(), vec!["backend down".to_owned()]);
}

#[tokio::test]
async fn logout_never_triggers_a_refresh() {
	let server = MockServer::start_async().await;
	let (client, store, _sink) = build_reqwest_test_client(&server.base_url());

	store.set_token(SessionToken::new("expired-token"));

	let _logout = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/logout");
			then.status(401);
		})
		.await;
	let refresh = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/refresh");
			then.status(200);
		})
		.await;
	let err = client.logout().await.expect_err("An expired session still reports the 401.");

	assert!(matches!(err, Error::SessionExpired));

	refresh.assert_calls_async(0).await;

	assert!(store.token().is_none());
}

#[tokio::test]
async fn password_reset_posts_the_email() {
	let server = MockServer::start_async().await;
	let (client, _store, _sink) = build_reqwest_test_client(&server.base_url());
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/auth/forgot-password")
				.json_body(json!({ "email": "ada@example.com" }));
			then.status(200)
				.header("content-type", "application/json")
				.json_body(json!({ "success": true, "message": "sent" }));
		})
		.await;

	client
		.request_password_reset("ada@example.com")
		.await
		.expect("The password reset request should succeed.");

	mock.assert_async().await;
}
