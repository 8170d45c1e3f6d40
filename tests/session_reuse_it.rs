mod common;

// crates.io
use color_eyre::Result;
// self
use common::*;
use lti_tool_provider::{launch::HttpMethod, session::Session, store::LaunchDataStore};

async fn reuse_with(method: HttpMethod) -> Result<()> {
	let harness = TestHarness::new(RecordingHookManager::new());
	let session = session_id(&format!("reuse-{method}"));
	let user = user("test");
	let mut state = Session::new(session.clone());

	state.login(user.clone());
	state.set_lti_parameters(fixture_parameters());
	harness.sessions.insert(state);
	assert!(harness.store.fetch(&user, "").await?.is_none());

	let response = harness.controller.handle(plain_request(method, &session)).await?;

	assert_eq!(response.location(), Some("http://testserver/home"));

	let record = harness.store.fetch(&user, "").await?.expect("Launch data should be stored.");

	assert_eq!(record.parameters, fixture_parameters());

	let received = harness.received();

	assert_eq!(received.len(), 1);
	assert_eq!(received[0].user, user);
	assert_eq!(received[0].lti_data, record);
	assert_eq!(harness.hooks.authentication_calls(), 0);

	Ok(())
}

#[tokio::test]
async fn session_snapshot_is_processed_on_get() -> Result<()> {
	reuse_with(HttpMethod::Get).await
}

#[tokio::test]
async fn session_snapshot_is_processed_on_post() -> Result<()> {
	reuse_with(HttpMethod::Post).await
}

#[tokio::test]
async fn reuse_matches_a_fresh_signed_launch() -> Result<()> {
	let fresh = TestHarness::new(RecordingHookManager::new());
	let reused = TestHarness::new(RecordingHookManager::new());
	let session = session_id("reuse-compare");
	let user = user("test");

	fresh.authenticated_session(&session, &user);
	fresh.controller.handle(signed_launch(HttpMethod::Post, launch_fixture(), &session)).await?;

	let mut state = Session::new(session.clone());

	state.login(user.clone());
	state.set_lti_parameters(fixture_parameters());
	reused.sessions.insert(state);
	reused.controller.handle(plain_request(HttpMethod::Get, &session)).await?;

	let fresh_record = fresh.store.fetch(&user, "").await?.map(|record| record.parameters);
	let reused_record = reused.store.fetch(&user, "").await?.map(|record| record.parameters);

	assert_eq!(fresh_record, reused_record);
	assert_eq!(fresh.received().len(), reused.received().len());

	Ok(())
}

#[tokio::test]
async fn anonymous_launch_then_plain_return_after_login() -> Result<()> {
	let harness = TestHarness::new(RecordingHookManager::new().anonymous_redirect("/login"));
	let session = session_id("reuse-login-roundtrip");
	let response = harness
		.controller
		.handle(signed_launch(HttpMethod::Post, launch_fixture(), &session))
		.await?;

	assert_eq!(response.location(), Some("http://testserver/login"));

	// The host logs the user in on its login page, then sends them back without OAuth data.
	let mut state = harness.sessions.get(&session).expect("Session should be persisted.");
	let user = user("test");

	state.login(user.clone());
	harness.sessions.insert(state);

	let response = harness.controller.handle(plain_request(HttpMethod::Get, &session)).await?;

	assert_eq!(response.location(), Some("http://testserver/home"));
	assert_eq!(
		harness.store.fetch(&user, "").await?.map(|record| record.parameters),
		Some(fixture_parameters())
	);

	Ok(())
}
