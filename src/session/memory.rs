//! In-memory [`SessionStore`] for tests and single-process hosts.

// self
use crate::{
	_prelude::*,
	auth::SessionId,
	session::{Session, SessionStore},
	store::StoreFuture,
};

/// Keeps sessions in a shared map.
#[derive(Clone, Debug, Default)]
pub struct MemorySessionStore(Arc<RwLock<HashMap<SessionId, Session>>>);
impl MemorySessionStore {
	/// Seeds or replaces a session directly, bypassing the async contract.
	pub fn insert(&self, session: Session) {
		self.0.write().insert(session.id().clone(), session);
	}

	/// Snapshot of the session for `id`.
	pub fn get(&self, id: &SessionId) -> Option<Session> {
		self.0.read().get(id).cloned()
	}
}
impl SessionStore for MemorySessionStore {
	fn load<'a>(&'a self, id: &'a SessionId) -> StoreFuture<'a, Option<Session>> {
		Box::pin(async move { Ok(self.get(id)) })
	}

	fn save(&self, session: Session) -> StoreFuture<'_, ()> {
		Box::pin(async move {
			self.insert(session);

			Ok(())
		})
	}
}
