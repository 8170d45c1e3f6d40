// std
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters for launch outcomes.
#[derive(Debug, Default)]
pub struct LaunchMetrics {
	attempts: AtomicU64,
	rejected: AtomicU64,
	anonymous: AtomicU64,
	authenticated: AtomicU64,
	failure: AtomicU64,
}
impl LaunchMetrics {
	/// Returns the total number of launches handled.
	pub fn attempts(&self) -> u64 {
		self.attempts.load(Ordering::Relaxed)
	}

	/// Returns the number of launches answered with `400`.
	pub fn rejected(&self) -> u64 {
		self.rejected.load(Ordering::Relaxed)
	}

	/// Returns the number of launches redirected while anonymous.
	pub fn anonymous(&self) -> u64 {
		self.anonymous.load(Ordering::Relaxed)
	}

	/// Returns the number of launches that persisted data for an authenticated user.
	pub fn authenticated(&self) -> u64 {
		self.authenticated.load(Ordering::Relaxed)
	}

	/// Returns the number of launches that ended in an [`Error`](crate::error::Error).
	pub fn failures(&self) -> u64 {
		self.failure.load(Ordering::Relaxed)
	}

	pub(crate) fn record_attempt(&self) {
		self.attempts.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_rejected(&self) {
		self.rejected.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_anonymous(&self) {
		self.anonymous.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_authenticated(&self) {
		self.authenticated.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_failure(&self) {
		self.failure.fetch_add(1, Ordering::Relaxed);
	}
}
