//! Optional observability helpers for launch processing.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to run each launch inside a span named `lti_tool_provider.launch` that
//!   records the `outcome`, with one nested `lti_tool_provider.launch.stage` span per
//!   [`LaunchStage`]. Rejections and malformed launches are logged at `warn`.
//! - Enable `metrics` to increment the `lti_tool_provider_launch_total` counter for every
//!   attempt and terminal outcome, labeled by `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Outcome labels recorded for each launch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LaunchOutcome {
	/// Entry to the controller.
	Attempt,
	/// Answered with `400 Invalid LTI Request`.
	Rejected,
	/// Redirected while still anonymous.
	Anonymous,
	/// Persisted launch data and redirected an authenticated user.
	Authenticated,
	/// A collaborator failed and the error was propagated.
	Failure,
}
impl LaunchOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			LaunchOutcome::Attempt => "attempt",
			LaunchOutcome::Rejected => "rejected",
			LaunchOutcome::Anonymous => "anonymous",
			LaunchOutcome::Authenticated => "authenticated",
			LaunchOutcome::Failure => "failure",
		}
	}
}
impl Display for LaunchOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Processing stages a launch passes through.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LaunchStage {
	/// OAuth signature verification and parameter extraction.
	SignatureCheck,
	/// Replay of the launch parameters kept in the session.
	SessionReuse,
	/// The authentication hook.
	Authentication,
	/// Redirect resolution for a launch that stayed anonymous.
	Anonymous,
	/// Upsert, event delivery, and redirect for an authenticated launch.
	Authenticated,
}
impl LaunchStage {
	/// Returns a stable label suitable for span fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			LaunchStage::SignatureCheck => "signature_check",
			LaunchStage::SessionReuse => "session_reuse",
			LaunchStage::Authentication => "authentication",
			LaunchStage::Anonymous => "anonymous",
			LaunchStage::Authenticated => "authenticated",
		}
	}
}
