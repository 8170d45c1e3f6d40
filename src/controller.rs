//! The launch state machine tying verification, sessions, hooks, and storage together.
//!
//! [`LaunchController::handle`] walks every launch through the same stages: signature check,
//! session reuse for requests without OAuth parameters, the authentication check, then either
//! anonymous or authenticated processing. A launch ends in a `302` redirect or a
//! `400 Invalid LTI Request`; collaborator failures surface as [`Error`]. Launches that share a
//! session id are serialized by a per-session guard so their session writes cannot interleave.

mod metrics;

pub use metrics::LaunchMetrics;

// self
use crate::{
	_prelude::*,
	auth::{SessionId, UserId},
	config::LtiConfig,
	events::{EventSource, LaunchEvents, LaunchReceived},
	hooks::{HookManager, IdentityHints},
	launch::{InboundRequest, LaunchRequest, LaunchResponse, LtiParameters, resolve_redirect},
	oauth1::{self, SignatureCheck},
	obs::{self, LaunchOutcome, LaunchSpan, LaunchStage},
	session::{Session, SessionStore},
	store::LaunchDataStore,
};

type GuardMap = Mutex<HashMap<SessionId, Arc<AsyncMutex<()>>>>;

const NO_LAUNCH_DATA: &str =
	"Request carries no OAuth parameters and the session holds no previous launch.";

/// Result of the authentication stage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthenticationDecision {
	/// The session was authenticated before the launch arrived; the hook was skipped.
	AlreadyAuthenticated(UserId),
	/// The authentication hook logged an identity in.
	NowAuthenticated(UserId),
	/// The session is still anonymous after the hook ran.
	Anonymous,
}
impl AuthenticationDecision {
	/// Identity the launch is processed for, if any.
	pub fn user(&self) -> Option<&UserId> {
		match self {
			Self::AlreadyAuthenticated(user) | Self::NowAuthenticated(user) => Some(user),
			Self::Anonymous => None,
		}
	}
}

/// Processes LTI launches against injected collaborators.
#[derive(Clone)]
pub struct LaunchController {
	/// Consumer credentials and verification policy.
	pub config: Arc<LtiConfig>,
	/// Application hooks deciding identity and redirect targets.
	pub hooks: Arc<dyn HookManager>,
	/// Browser session persistence.
	pub sessions: Arc<dyn SessionStore>,
	/// Per-user launch data persistence.
	pub store: Arc<dyn LaunchDataStore>,
	/// Bus notified after every authenticated launch.
	pub events: Arc<LaunchEvents>,
	/// Shared in-process counters for launch outcomes.
	pub metrics: Arc<LaunchMetrics>,
	session_guards: Arc<GuardMap>,
}
impl LaunchController {
	/// Creates a controller with a fresh event bus and counters.
	pub fn new(
		config: impl Into<Arc<LtiConfig>>,
		hooks: Arc<dyn HookManager>,
		sessions: Arc<dyn SessionStore>,
		store: Arc<dyn LaunchDataStore>,
	) -> Self {
		Self {
			config: config.into(),
			hooks,
			sessions,
			store,
			events: Default::default(),
			metrics: Default::default(),
			session_guards: Default::default(),
		}
	}

	/// Replaces the hook manager.
	pub fn with_hook_manager(mut self, hooks: Arc<dyn HookManager>) -> Self {
		self.hooks = hooks;

		self
	}

	/// Shares an existing event bus, e.g. one several controllers publish to.
	pub fn with_events(mut self, events: Arc<LaunchEvents>) -> Self {
		self.events = events;

		self
	}

	/// Handles a launch at the current wall-clock time.
	pub async fn handle(&self, inbound: InboundRequest) -> Result<LaunchResponse> {
		self.handle_at(inbound, OffsetDateTime::now_utc()).await
	}

	/// Handles a launch, evaluating timestamp tolerance against `now`.
	pub async fn handle_at(
		&self,
		inbound: InboundRequest,
		now: OffsetDateTime,
	) -> Result<LaunchResponse> {
		let span = LaunchSpan::launch();

		obs::record_launch_outcome(LaunchOutcome::Attempt);
		self.metrics.record_attempt();

		let result = span.instrument(self.process(inbound, now)).await;
		let outcome = match &result {
			Ok((outcome, _)) => *outcome,
			Err(_) => LaunchOutcome::Failure,
		};

		match outcome {
			LaunchOutcome::Rejected => self.metrics.record_rejected(),
			LaunchOutcome::Anonymous => self.metrics.record_anonymous(),
			LaunchOutcome::Authenticated => self.metrics.record_authenticated(),
			LaunchOutcome::Failure => self.metrics.record_failure(),
			LaunchOutcome::Attempt => {},
		}

		span.record_outcome(outcome);
		obs::record_launch_outcome(outcome);

		result.map(|(_, response)| response)
	}

	async fn process(
		&self,
		inbound: InboundRequest,
		now: OffsetDateTime,
	) -> Result<(LaunchOutcome, LaunchResponse)> {
		let lease = self.session_guard(&inbound.session_id);
		let _serialized = lease.guard.lock().await;

		self.process_locked(inbound, now).await
	}

	async fn process_locked(
		&self,
		inbound: InboundRequest,
		now: OffsetDateTime,
	) -> Result<(LaunchOutcome, LaunchResponse)> {
		let session = self
			.sessions
			.load(&inbound.session_id)
			.await
			.map_err(Error::Session)?
			.unwrap_or_else(|| Session::new(inbound.session_id.clone()));
		let parameters = if inbound.has_oauth_parameters() {
			LaunchSpan::stage(LaunchStage::SignatureCheck).in_scope(|| {
				match oauth1::verify_signature(
					&self.config,
					inbound.method,
					&inbound.url,
					&inbound.form,
					now,
				) {
					SignatureCheck::Valid => Some(LtiParameters::extract(inbound.pairs())),
					SignatureCheck::Invalid(reason) => {
						obs::log_rejection(&reason);

						None
					},
				}
			})
		} else {
			LaunchSpan::stage(LaunchStage::SessionReuse).in_scope(|| {
				let parameters = session.lti_parameters().cloned();

				if parameters.is_none() {
					obs::log_rejection(&NO_LAUNCH_DATA);
				}

				parameters
			})
		};
		let Some(parameters) = parameters else {
			return Ok((LaunchOutcome::Rejected, LaunchResponse::invalid_request()));
		};
		let missing = parameters.missing_required();

		if !missing.is_empty() {
			obs::log_missing_fields(&missing);
		}

		let mut request = LaunchRequest::new(inbound, session);

		request.session_mut().set_lti_parameters(parameters.clone());

		let decision = self.authenticate(&mut request, &parameters).await?;
		let (outcome, location) = match decision.user() {
			None => {
				let location =
					LaunchSpan::stage(LaunchStage::Anonymous).in_scope(|| -> Result<String> {
						let target = self.hooks.anonymous_redirect_to(&request, &parameters)?;

						Ok(resolve_redirect(request.url(), &target)?)
					})?;

				(LaunchOutcome::Anonymous, location)
			},
			Some(user) => {
				let location = LaunchSpan::stage(LaunchStage::Authenticated)
					.instrument(self.process_authenticated(&request, user, parameters))
					.await?;

				(LaunchOutcome::Authenticated, location)
			},
		};

		self.sessions.save(request.into_session()).await.map_err(Error::Session)?;

		Ok((outcome, LaunchResponse::Redirect { location }))
	}

	async fn authenticate(
		&self,
		request: &mut LaunchRequest,
		parameters: &LtiParameters,
	) -> Result<AuthenticationDecision> {
		if let Some(user) = request.user() {
			return Ok(AuthenticationDecision::AlreadyAuthenticated(user.clone()));
		}

		let optional = self.hooks.optional_lti_parameters();
		let hints = IdentityHints::from_parameters(parameters, &optional);

		LaunchSpan::stage(LaunchStage::Authentication)
			.instrument(self.hooks.authentication_hook(request, &hints))
			.await?;

		Ok(match request.user() {
			Some(user) => AuthenticationDecision::NowAuthenticated(user.clone()),
			None => AuthenticationDecision::Anonymous,
		})
	}

	async fn process_authenticated(
		&self,
		request: &LaunchRequest,
		user: &UserId,
		parameters: LtiParameters,
	) -> Result<String> {
		let custom_key = self.hooks.vary_by_key(request, &parameters)?.unwrap_or_default();
		let lti_data = self.store.upsert(user, &custom_key, parameters.clone()).await?;

		self.events.emit(&LaunchReceived {
			source: EventSource::LaunchController,
			user: user.clone(),
			lti_data,
		});

		let target = self.hooks.authenticated_redirect_to(request, &parameters)?;

		Ok(resolve_redirect(request.url(), &target)?)
	}

	/// Leases (and creates on demand) the guard serializing launches for one session.
	fn session_guard(&self, id: &SessionId) -> SessionGuardLease<'_> {
		let guard = self
			.session_guards
			.lock()
			.entry(id.clone())
			.or_insert_with(|| Arc::new(AsyncMutex::new(())))
			.clone();

		SessionGuardLease { guards: &self.session_guards, id: id.clone(), guard }
	}

	#[cfg(test)]
	fn pending_guards(&self) -> usize {
		self.session_guards.lock().len()
	}
}
/// A launch's claim on its session guard.
///
/// Dropping the lease, including when the launch future is cancelled, removes the map entry once
/// no other launch for the session holds or awaits the guard.
struct SessionGuardLease<'a> {
	guards: &'a GuardMap,
	id: SessionId,
	guard: Arc<AsyncMutex<()>>,
}
impl Drop for SessionGuardLease<'_> {
	fn drop(&mut self) {
		let mut guards = self.guards.lock();

		// Clones are only taken under the map lock: one lives in the map, one is ours.
		if Arc::strong_count(&self.guard) <= 2 {
			guards.remove(&self.id);
		}
	}
}

impl Debug for LaunchController {
	fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
		f.debug_struct("LaunchController")
			.field("config", &self.config)
			.field("events", &self.events)
			.field("metrics", &self.metrics)
			.finish_non_exhaustive()
	}
}
