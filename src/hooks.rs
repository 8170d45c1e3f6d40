//! Application hooks that turn an LTI launch into a host identity and a landing page.
//!
//! The controller owns exactly one [`HookManager`]; swapping it (e.g. between tests) is done
//! with [`with_hook_manager`](crate::controller::LaunchController::with_hook_manager).
//! Hook failures are not recovered from: they surface as [`Error::Hook`].

// self
use crate::{
	_prelude::*,
	error::BoxError,
	launch::{LaunchRequest, LtiParameters},
};

/// Boxed future returned by [`HookManager::authentication_hook`].
pub type HookFuture<'a> = Pin<Box<dyn Future<Output = Result<(), HookError>> + 'a + Send>>;

/// Failure raised by a hook implementation.
#[derive(Debug, ThisError)]
#[error("Hook manager failed: {source}")]
pub struct HookError {
	#[source]
	source: BoxError,
}
impl HookError {
	/// Wraps an implementation-specific error.
	pub fn new(src: impl 'static + Send + Sync + StdError) -> Self {
		Self { source: Box::new(src) }
	}

	/// Builds an error from a plain message.
	pub fn message(message: impl Into<String>) -> Self {
		let message: String = message.into();

		Self { source: message.into() }
	}
}

/// Minimal identity hints derived from launch parameters for [`HookManager::authentication_hook`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IdentityHints {
	/// Consumer-side `user_id`.
	pub user_id: Option<String>,
	/// Consumer-side username (`lis_person_sourcedid`).
	pub username: Option<String>,
	/// Primary email (`lis_person_contact_email_primary`).
	pub email: Option<String>,
	/// Values requested via [`HookManager::optional_lti_parameters`], keyed by alias.
	pub extra: BTreeMap<String, String>,
}
impl IdentityHints {
	/// Derives hints from `parameters`; `optional` maps LTI field names to hint aliases.
	pub fn from_parameters(
		parameters: &LtiParameters,
		optional: &BTreeMap<String, String>,
	) -> Self {
		let extra = optional
			.iter()
			.filter_map(|(field, alias)| {
				parameters.get(field).map(|value| (alias.clone(), value.to_owned()))
			})
			.collect();

		Self {
			user_id: parameters.user_id().map(str::to_owned),
			username: parameters.person_sourcedid().map(str::to_owned),
			email: parameters.email().map(str::to_owned),
			extra,
		}
	}
}

/// Application-supplied policy for resolving launches.
///
/// Implementations must be `Send + Sync`; the controller calls them concurrently without
/// additional locking.
pub trait HookManager
where
	Self: Send + Sync,
{
	/// Attempts to authenticate an anonymous launch.
	///
	/// Succeeding means logging an identity into the request's session via
	/// [`LaunchRequest::login`]; leaving it anonymous is a valid outcome.
	fn authentication_hook<'a>(
		&'a self,
		request: &'a mut LaunchRequest,
		hints: &'a IdentityHints,
	) -> HookFuture<'a>;

	/// Redirect target for launches that stay anonymous.
	fn anonymous_redirect_to(
		&self,
		request: &LaunchRequest,
		parameters: &LtiParameters,
	) -> Result<String, HookError>;

	/// Redirect target for authenticated launches.
	fn authenticated_redirect_to(
		&self,
		request: &LaunchRequest,
		parameters: &LtiParameters,
	) -> Result<String, HookError>;

	/// Partition key for the stored launch data; `None` or empty selects the default partition.
	fn vary_by_key(
		&self,
		_request: &LaunchRequest,
		_parameters: &LtiParameters,
	) -> Result<Option<String>, HookError> {
		Ok(None)
	}

	/// Extra LTI fields to forward to [`HookManager::authentication_hook`], mapped to the alias
	/// they appear under in [`IdentityHints::extra`].
	fn optional_lti_parameters(&self) -> BTreeMap<String, String> {
		BTreeMap::new()
	}
}
