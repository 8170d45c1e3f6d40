// self
use crate::obs::LaunchOutcome;

/// Records a launch outcome via the global metrics recorder (when enabled).
pub fn record_launch_outcome(outcome: LaunchOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("lti_tool_provider_launch_total", "outcome" => outcome.as_str())
			.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = outcome;
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn record_launch_outcome_noop_without_recorder() {
		record_launch_outcome(LaunchOutcome::Rejected);
	}
}
