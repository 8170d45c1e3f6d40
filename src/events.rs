//! Launch notifications for code that reacts to processed launches (enrolment sync, analytics).

// self
use crate::{_prelude::*, auth::UserId, store::LtiUserData};

/// Component that emitted an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventSource {
	/// [`LaunchController`](crate::controller::LaunchController).
	LaunchController,
}

/// Fired once per authenticated launch, after the launch data was persisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LaunchReceived {
	/// Emitting component.
	pub source: EventSource,
	/// Authenticated host identity.
	pub user: UserId,
	/// Record as persisted by the launch data store.
	pub lti_data: LtiUserData,
}

/// Subscriber contract for [`LaunchEvents`].
pub trait LaunchListener
where
	Self: Send + Sync,
{
	/// Called synchronously on the request path; keep it short.
	fn on_launch_received(&self, event: &LaunchReceived);
}
impl<F> LaunchListener for F
where
	F: Fn(&LaunchReceived) + Send + Sync,
{
	fn on_launch_received(&self, event: &LaunchReceived) {
		self(event)
	}
}

/// Fan-out bus delivering [`LaunchReceived`] to every subscriber.
#[derive(Default)]
pub struct LaunchEvents {
	listeners: RwLock<Vec<Arc<dyn LaunchListener>>>,
}
impl LaunchEvents {
	/// Registers a listener.
	pub fn subscribe(&self, listener: Arc<dyn LaunchListener>) {
		self.listeners.write().push(listener);
	}

	/// Number of registered listeners.
	pub fn listener_count(&self) -> usize {
		self.listeners.read().len()
	}

	/// Delivers `event` to all listeners and returns how many were notified.
	pub fn emit(&self, event: &LaunchReceived) -> usize {
		// Listeners may subscribe from inside a callback.
		let listeners = self.listeners.read().clone();

		for listener in &listeners {
			listener.on_launch_received(event);
		}

		listeners.len()
	}
}
impl Debug for LaunchEvents {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("LaunchEvents").field("listeners", &self.listener_count()).finish()
	}
}
