// self
use crate::{
	_prelude::*,
	obs::{LaunchOutcome, LaunchStage},
};

/// Future type produced by [`LaunchSpan::instrument`]; a passthrough without `tracing`.
#[cfg(feature = "tracing")]
pub type InstrumentedLaunch<F> = tracing::instrument::Instrumented<F>;
/// Future type produced by [`LaunchSpan::instrument`]; a passthrough without `tracing`.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedLaunch<F> = F;

/// Span wrapper used by the launch controller.
///
/// One `lti_tool_provider.launch` span covers a whole launch and records its final `outcome`.
/// Each processing stage runs in a nested `lti_tool_provider.launch.stage` span.
#[derive(Clone, Debug)]
pub struct LaunchSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl LaunchSpan {
	/// Opens the span covering one launch.
	pub fn launch() -> Self {
		#[cfg(feature = "tracing")]
		{
			Self {
				span: tracing::info_span!(
					"lti_tool_provider.launch",
					outcome = tracing::field::Empty
				),
			}
		}
		#[cfg(not(feature = "tracing"))]
		{
			Self {}
		}
	}

	/// Opens a nested span for one processing stage.
	pub fn stage(stage: LaunchStage) -> Self {
		#[cfg(feature = "tracing")]
		{
			Self {
				span: tracing::debug_span!(
					"lti_tool_provider.launch.stage",
					stage = stage.as_str()
				),
			}
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = stage;

			Self {}
		}
	}

	/// Records the terminal outcome on a launch span.
	pub fn record_outcome(&self, outcome: LaunchOutcome) {
		#[cfg(feature = "tracing")]
		{
			self.span.record("outcome", outcome.as_str());
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = outcome;
		}
	}

	/// Runs synchronous work inside the span.
	pub fn in_scope<R>(&self, f: impl FnOnce() -> R) -> R {
		#[cfg(feature = "tracing")]
		{
			self.span.in_scope(f)
		}
		#[cfg(not(feature = "tracing"))]
		{
			f()
		}
	}

	/// Attaches the span to a future without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedLaunch<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Logs why a launch was answered with `400`.
pub fn log_rejection(reason: &dyn Display) {
	#[cfg(feature = "tracing")]
	{
		tracing::warn!(%reason, "rejecting LTI launch");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = reason;
	}
}

/// Logs a launch that passed verification but lacks required LTI fields.
pub fn log_missing_fields(missing: &[&'static str]) {
	#[cfg(feature = "tracing")]
	{
		tracing::warn!(?missing, "LTI launch is missing required fields");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = missing;
	}
}
