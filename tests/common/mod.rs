//! Shared fixtures for launch integration tests.

#![allow(dead_code)]

// std
use std::sync::Arc;
// crates.io
use parking_lot::Mutex;
use url::{Url, form_urlencoded};
// self
use lti_tool_provider::{
	auth::{SessionId, UserId},
	config::LtiConfig,
	controller::LaunchController,
	events::LaunchReceived,
	hooks::{HookError, HookFuture, HookManager, IdentityHints},
	launch::{HttpMethod, InboundRequest, LaunchRequest, LtiParameters},
	oauth1::{LaunchSigner, OAUTH_SIGNATURE},
	session::{MemorySessionStore, Session},
	store::MemoryStore,
};

pub const TEST_CONSUMER_KEY: &str = "qertyuiop1234567890!@#$%^&*()_+[];";
pub const TEST_CONSUMER_SECRET: &str = "1234567890!@#$%^&*()_+[];./,;qwertyuiop";
pub const TEST_LAUNCH_URL: &str = "http://testserver/lti/";
pub const TEST_URL_BASE: &str = "http://testserver";
pub const DEFAULT_REDIRECT: &str = "/home";
pub const HOOK_USERNAME: &str = "test_username";

/// Launch fields an LMS sends for a typical course link.
pub fn launch_fixture() -> Vec<(String, String)> {
	[
		("lis_result_sourcedid", "lis_result_sourcedid"),
		("context_id", "LTIX/LTI-101/now"),
		("user_id", "1234567890"),
		("lis_outcome_service_url", "lis_outcome_service_url"),
		("resource_link_id", "resource_link_id"),
		("lti_version", "LTI-1p0"),
		("lis_person_sourcedid", "username"),
		("lis_person_contact_email_primary", "username@email.com"),
	]
	.into_iter()
	.map(|(k, v)| (k.to_owned(), v.to_owned()))
	.collect()
}

/// [`launch_fixture`] as extracted parameters.
pub fn fixture_parameters() -> LtiParameters {
	LtiParameters::extract(launch_fixture().iter().map(|(k, v)| (k.as_str(), v.as_str())))
}

pub fn test_config() -> LtiConfig {
	LtiConfig::builder()
		.consumer_key(TEST_CONSUMER_KEY)
		.consumer_secret(TEST_CONSUMER_SECRET)
		.build()
		.expect("Failed to build the test LTI config.")
}

pub fn launch_url() -> Url {
	Url::parse(TEST_LAUNCH_URL).expect("Failed to parse the test launch URL.")
}

pub fn session_id(value: &str) -> SessionId {
	SessionId::new(value).expect("Failed to build session identifier fixture.")
}

pub fn user(value: &str) -> UserId {
	UserId::new(value).expect("Failed to build user identifier fixture.")
}

/// Signs `params` with the test consumer and encodes them the way a browser form post would.
///
/// `GET` launches carry the signed pairs in the query string, `POST` launches in the body.
pub fn signed_launch(
	method: HttpMethod,
	params: Vec<(String, String)>,
	session: &SessionId,
) -> InboundRequest {
	let url = launch_url();
	let signed = LaunchSigner::from_config(&test_config())
		.sign(method, &url, params)
		.expect("Failed to sign the test launch.");

	encode_launch(method, url, &signed, session)
}

/// Signs the fixture and then breaks its `oauth_signature`.
pub fn tampered_launch(session: &SessionId) -> InboundRequest {
	let url = launch_url();
	let mut signed = LaunchSigner::from_config(&test_config())
		.sign(HttpMethod::Post, &url, launch_fixture())
		.expect("Failed to sign the test launch.");

	for (key, value) in &mut signed {
		if key == OAUTH_SIGNATURE {
			value.push_str("_broken");
		}
	}

	encode_launch(HttpMethod::Post, url, &signed, session)
}

/// A request without any launch parameters.
pub fn plain_request(method: HttpMethod, session: &SessionId) -> InboundRequest {
	InboundRequest::new(method, launch_url(), session.clone())
}

fn encode_launch(
	method: HttpMethod,
	mut url: Url,
	pairs: &[(String, String)],
	session: &SessionId,
) -> InboundRequest {
	let encoded = form_urlencoded::Serializer::new(String::new()).extend_pairs(pairs).finish();

	match method {
		HttpMethod::Get => {
			url.set_query(Some(&encoded));

			InboundRequest::new(method, url, session.clone())
		},
		HttpMethod::Post =>
			InboundRequest::from_form_body(method, url, encoded.as_bytes(), session.clone()),
	}
}

/// A hook invocation captured by [`RecordingHookManager`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HookCall {
	Authentication { hints: IdentityHints, authenticated: bool, session_parameters: bool },
	AnonymousRedirect { parameters: LtiParameters, session: Session },
	AuthenticatedRedirect { parameters: LtiParameters, user: Option<UserId> },
	VaryByKey { parameters: LtiParameters },
}

/// Hook manager double with configurable answers and a call log.
#[derive(Debug)]
pub struct RecordingHookManager {
	anonymous_target: String,
	authenticated_target: String,
	vary_key: Option<String>,
	login_from_hints: bool,
	fail_authentication: bool,
	optional: Vec<(String, String)>,
	calls: Mutex<Vec<HookCall>>,
}
impl RecordingHookManager {
	pub fn new() -> Self {
		Self {
			anonymous_target: DEFAULT_REDIRECT.into(),
			authenticated_target: DEFAULT_REDIRECT.into(),
			vary_key: None,
			login_from_hints: false,
			fail_authentication: false,
			optional: Vec::new(),
			calls: Mutex::new(Vec::new()),
		}
	}

	pub fn anonymous_redirect(mut self, target: &str) -> Self {
		self.anonymous_target = target.into();

		self
	}

	pub fn authenticated_redirect(mut self, target: &str) -> Self {
		self.authenticated_target = target.into();

		self
	}

	pub fn vary_by(mut self, key: &str) -> Self {
		self.vary_key = Some(key.into());

		self
	}

	/// Makes the authentication hook log in `hints.username` (or [`HOOK_USERNAME`]).
	pub fn login_from_hints(mut self) -> Self {
		self.login_from_hints = true;

		self
	}

	pub fn failing_authentication(mut self) -> Self {
		self.fail_authentication = true;

		self
	}

	pub fn optional_parameter(mut self, field: &str, alias: &str) -> Self {
		self.optional.push((field.into(), alias.into()));

		self
	}

	pub fn calls(&self) -> Vec<HookCall> {
		self.calls.lock().clone()
	}

	pub fn authentication_calls(&self) -> usize {
		self.calls().iter().filter(|call| matches!(call, HookCall::Authentication { .. })).count()
	}

	fn record(&self, call: HookCall) {
		self.calls.lock().push(call);
	}
}
impl HookManager for RecordingHookManager {
	fn authentication_hook<'a>(
		&'a self,
		request: &'a mut LaunchRequest,
		hints: &'a IdentityHints,
	) -> HookFuture<'a> {
		Box::pin(async move {
			self.record(HookCall::Authentication {
				hints: hints.clone(),
				authenticated: request.is_authenticated(),
				session_parameters: request.session().lti_parameters().is_some(),
			});

			if self.fail_authentication {
				return Err(HookError::message("user directory is offline"));
			}
			if self.login_from_hints {
				let name = hints.username.as_deref().unwrap_or(HOOK_USERNAME);

				request.login(UserId::new(name).map_err(HookError::new)?);
			}

			Ok(())
		})
	}

	fn anonymous_redirect_to(
		&self,
		request: &LaunchRequest,
		parameters: &LtiParameters,
	) -> Result<String, HookError> {
		self.record(HookCall::AnonymousRedirect {
			parameters: parameters.clone(),
			session: request.session().clone(),
		});

		Ok(self.anonymous_target.clone())
	}

	fn authenticated_redirect_to(
		&self,
		request: &LaunchRequest,
		parameters: &LtiParameters,
	) -> Result<String, HookError> {
		self.record(HookCall::AuthenticatedRedirect {
			parameters: parameters.clone(),
			user: request.user().cloned(),
		});

		Ok(self.authenticated_target.clone())
	}

	fn vary_by_key(
		&self,
		_: &LaunchRequest,
		parameters: &LtiParameters,
	) -> Result<Option<String>, HookError> {
		self.record(HookCall::VaryByKey { parameters: parameters.clone() });

		Ok(self.vary_key.clone())
	}

	fn optional_lti_parameters(&self) -> std::collections::BTreeMap<String, String> {
		self.optional.iter().cloned().collect()
	}
}

/// Controller wired to in-memory collaborators with handles kept for assertions.
pub struct TestHarness {
	pub controller: LaunchController,
	pub hooks: Arc<RecordingHookManager>,
	pub sessions: Arc<MemorySessionStore>,
	pub store: Arc<MemoryStore>,
	pub received: Arc<Mutex<Vec<LaunchReceived>>>,
}
impl TestHarness {
	pub fn new(hooks: RecordingHookManager) -> Self {
		let hooks = Arc::new(hooks);
		let sessions = Arc::new(MemorySessionStore::default());
		let store = Arc::new(MemoryStore::default());
		let received = Arc::new(Mutex::new(Vec::new()));
		let controller =
			LaunchController::new(test_config(), hooks.clone(), sessions.clone(), store.clone());
		let sink = received.clone();

		controller.events.subscribe(Arc::new(move |event: &LaunchReceived| {
			sink.lock().push(event.clone());
		}));

		Self { controller, hooks, sessions, store, received }
	}

	/// Seeds a session that is already logged in as `user`.
	pub fn authenticated_session(&self, session: &SessionId, user: &UserId) {
		let mut state = Session::new(session.clone());

		state.login(user.clone());
		self.sessions.insert(state);
	}

	pub fn received(&self) -> Vec<LaunchReceived> {
		self.received.lock().clone()
	}
}
