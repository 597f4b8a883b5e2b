#![cfg(feature = "reqwest")]

// crates.io
use httpmock::prelude::*;
use serde_json::json;
// self
use api_courier::{
	_preludet::*, auth::SessionToken, client::RequestOptions, store::CredentialStore,
};

#[tokio::test]
async fn get_attaches_bearer_and_parses_json() {
	let server = MockServer::start_async().await;
	let (client, store, sink) = build_reqwest_test_client(&server.base_url());

	store.set_token(SessionToken::new("active-token"));

	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/metrics").header("authorization", "Bearer active-token");
			then.status(200)
				.header("content-type", "application/json")
				.json_body(json!({ "visits": 3 }));
		})
		.await;
	let value = client
		.get::<JsonValue>("/metrics", RequestOptions::new())
		.await
		.expect("Authenticated GET should succeed.")
		.expect("A 200 response should carry a payload.");

	mock.assert_async().await;

	assert_eq!(value["visits"], 3);
	assert!(sink.messages().is_empty());
}

#[tokio::test]
async fn no_content_yields_an_empty_result() {
	let server = MockServer::start_async().await;
	let (client, _store, sink) = build_reqwest_test_client(&server.base_url());

	let mock = server
		.mock_async(|when, then| {
			when.method(DELETE).path("/users/u-9");
			then.status(204);
		})
		.await;
	let value = client
		.delete::<JsonValue>("/users/u-9", RequestOptions::new())
		.await
		.expect("DELETE should succeed.");

	mock.assert_async().await;

	assert!(value.is_none(), "A 204 response must not be parsed.");
	assert!(sink.messages().is_empty());
}

#[tokio::test]
async fn structured_error_bodies_resolve_message_and_notify() {
	let server = MockServer::start_async().await;
	let (client, _store, sink) = build_reqwest_test_client(&server.base_url());

	let _mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/forbidden");
			then.status(403)
				.header("content-type", "application/json")
				.json_body(json!({ "message": "X" }));
		})
		.await;
	let err = client
		.get::<JsonValue>("/forbidden", RequestOptions::new())
		.await
		.expect_err("A 403 must fail the request.");

	match err {
		Error::RequestFailed { status, message, body } => {
			assert_eq!(status, 403);
			assert_eq!(message, "X");
			assert_eq!(body.expect("The structured body should be retained.")["message"], "X");
		},
		other => panic!("Unexpected error variant: {other:?}."),
	}

	assert_eq!(sink.messages(), vec!["X".to_owned()]);
}

#[tokio::test]
async fn error_field_is_probed_when_message_is_absent() {
	let server = MockServer::start_async().await;
	let (client, _store, _sink) = build_reqwest_test_client(&server.base_url());

	let _mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/conflict");
			then.status(422)
				.header("content-type", "application/json")
				.json_body(json!({ "error": "email already registered" }));
		})
		.await;
	let err = client
		.get::<JsonValue>("/conflict", RequestOptions::new())
		.await
		.expect_err("A 422 must fail the request.");

	assert!(matches!(
		err,
		Error::RequestFailed { status: 422, ref message, .. } if message == "email already registered"
	));
}

#[tokio::test]
async fn non_json_errors_fall_back_to_the_status_text() {
	let server = MockServer::start_async().await;
	let (client, _store, sink) = build_reqwest_test_client(&server.base_url());

	let _mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/broken");
			then.status(500).body("<html>oops</html>");
		})
		.await;
	let err = client
		.get::<JsonValue>("/broken", RequestOptions::new())
		.await
		.expect_err("A 500 must fail the request.");

	assert!(matches!(
		err,
		Error::RequestFailed { status: 500, ref message, body: None } if message == "Internal Server Error"
	));
	assert_eq!(sink.messages(), vec!["Internal Server Error".to_owned()]);
}

#[tokio::test]
async fn caller_headers_reach_the_wire() {
	let server = MockServer::start_async().await;
	let (client, _store, _sink) = build_reqwest_test_client(&server.base_url());

	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/traced").header("x-request-id", "42");
			then.status(200).header("content-type", "application/json").json_body(json!({}));
		})
		.await;

	client
		.get::<JsonValue>("/traced", RequestOptions::new().with_header("X-Request-Id", "42"))
		.await
		.expect("The custom header should satisfy the mock.");

	mock.assert_async().await;
}

#[tokio::test]
async fn post_serializes_the_body() {
	let server = MockServer::start_async().await;
	let (client, _store, _sink) = build_reqwest_test_client(&server.base_url());

	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/notes").json_body(json!({ "title": "daily" }));
			then.status(200)
				.header("content-type", "application/json")
				.json_body(json!({ "success": true }));
		})
		.await;

	client
		.post::<JsonValue, _>("/notes", &json!({ "title": "daily" }), RequestOptions::new())
		.await
		.expect("POST with a JSON body should succeed.");

	mock.assert_async().await;
}
