//! Per-browser-session state carried across the anonymous → authenticated redirect.

pub mod memory;

pub use memory::MemorySessionStore;

// self
use crate::{
	_prelude::*,
	auth::{SessionId, UserId},
	launch::LtiParameters,
	store::StoreFuture,
};

/// Session slot name under which launch parameters are kept.
pub const LTI_PARAMETERS_KEY: &str = "lti_parameters";

/// Host session state visible to the launch controller and hooks.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
	id: SessionId,
	user: Option<UserId>,
	lti_parameters: Option<LtiParameters>,
}
impl Session {
	/// Creates an empty, anonymous session.
	pub fn new(id: SessionId) -> Self {
		Self { id, user: None, lti_parameters: None }
	}

	/// Session key.
	pub fn id(&self) -> &SessionId {
		&self.id
	}

	/// Logged-in identity, if any.
	pub fn user(&self) -> Option<&UserId> {
		self.user.as_ref()
	}

	/// Returns `true` when an identity is logged in.
	pub fn is_authenticated(&self) -> bool {
		self.user.is_some()
	}

	/// Logs `user` in, replacing any previous identity.
	pub fn login(&mut self, user: UserId) {
		self.user = Some(user);
	}

	/// Drops the logged-in identity.
	pub fn logout(&mut self) {
		self.user = None;
	}

	/// Launch parameters stored by a previous launch.
	pub fn lti_parameters(&self) -> Option<&LtiParameters> {
		self.lti_parameters.as_ref()
	}

	/// Stores launch parameters, superseding any previous snapshot.
	pub fn set_lti_parameters(&mut self, parameters: LtiParameters) {
		self.lti_parameters = Some(parameters);
	}

	/// Removes and returns the stored launch parameters.
	pub fn take_lti_parameters(&mut self) -> Option<LtiParameters> {
		self.lti_parameters.take()
	}
}

/// Session persistence contract supplied by the host.
pub trait SessionStore
where
	Self: Send + Sync,
{
	/// Loads the session for `id`, if one exists.
	fn load<'a>(&'a self, id: &'a SessionId) -> StoreFuture<'a, Option<Session>>;

	/// Persists the session, replacing any previous state under the same id.
	fn save(&self, session: Session) -> StoreFuture<'_, ()>;
}
