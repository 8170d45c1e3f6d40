mod common;

// crates.io
use color_eyre::Result;
// self
use common::*;
use lti_tool_provider::launch::{HttpMethod, INVALID_LTI_REQUEST, LaunchResponse};

#[tokio::test]
async fn tampered_signature_is_rejected_without_side_effects() -> Result<()> {
	let harness = TestHarness::new(RecordingHookManager::new());
	let session = session_id("anonymous-tampered");
	let response = harness.controller.handle(tampered_launch(&session)).await?;

	assert_eq!(response.status(), 400);
	assert!(response.body().is_some_and(|body| body.contains(INVALID_LTI_REQUEST)));
	assert!(harness.sessions.get(&session).is_none());
	assert!(harness.store.is_empty());
	assert!(harness.hooks.calls().is_empty());
	assert_eq!(harness.controller.metrics.rejected(), 1);

	Ok(())
}

#[tokio::test]
async fn valid_launch_redirects_and_stores_parameters_in_session() -> Result<()> {
	let harness = TestHarness::new(RecordingHookManager::new());
	let session = session_id("anonymous-valid");
	let response = harness
		.controller
		.handle(signed_launch(HttpMethod::Post, launch_fixture(), &session))
		.await?;

	assert_eq!(
		response,
		LaunchResponse::Redirect { location: format!("{TEST_URL_BASE}{DEFAULT_REDIRECT}") }
	);

	let stored = harness.sessions.get(&session).expect("Session should be persisted.");

	assert!(!stored.is_authenticated());
	assert_eq!(stored.lti_parameters(), Some(&fixture_parameters()));
	assert!(harness.store.is_empty());
	assert!(harness.received().is_empty());
	assert_eq!(harness.controller.metrics.anonymous(), 1);

	Ok(())
}

#[tokio::test]
async fn get_launches_are_accepted_like_posts() -> Result<()> {
	let harness = TestHarness::new(RecordingHookManager::new());
	let session = session_id("anonymous-get");
	let response = harness
		.controller
		.handle(signed_launch(HttpMethod::Get, launch_fixture(), &session))
		.await?;

	assert_eq!(response.location(), Some("http://testserver/home"));
	assert_eq!(
		harness.sessions.get(&session).and_then(|s| s.lti_parameters().cloned()),
		Some(fixture_parameters())
	);

	Ok(())
}

#[tokio::test]
async fn plain_request_without_previous_launch_is_rejected() -> Result<()> {
	let harness = TestHarness::new(RecordingHookManager::new());
	let session = session_id("anonymous-plain");
	let response = harness.controller.handle(plain_request(HttpMethod::Get, &session)).await?;

	assert_eq!(response, LaunchResponse::invalid_request());
	assert!(harness.sessions.get(&session).is_none());
	assert!(harness.hooks.calls().is_empty());

	Ok(())
}

#[tokio::test]
async fn launch_signed_for_another_consumer_is_rejected() -> Result<()> {
	let harness = TestHarness::new(RecordingHookManager::new());
	let session = session_id("anonymous-foreign");
	let mut request = signed_launch(HttpMethod::Post, launch_fixture(), &session);

	for (key, value) in &mut request.form {
		if key == "oauth_consumer_key" {
			*value = "someone-else".into();
		}
	}

	let response = harness.controller.handle(request).await?;

	assert_eq!(response.status(), 400);
	assert!(harness.sessions.get(&session).is_none());

	Ok(())
}
