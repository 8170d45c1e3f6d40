//! Storage contracts and built-in backends for per-user LTI launch data.

pub mod file;
pub mod memory;
pub mod record;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use record::*;

// self
use crate::{_prelude::*, auth::UserId, launch::LtiParameters};

/// Boxed future returned by store contracts.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Durable store for [`LtiUserData`], keyed by user + custom key.
pub trait LaunchDataStore
where
	Self: Send + Sync,
{
	/// Atomically creates or overwrites the record for `(user, custom_key)` and returns it.
	///
	/// Implementations must perform the get-or-create and the overwrite as one step so concurrent
	/// launches for the same pair never lose an update or create duplicates.
	fn upsert<'a>(
		&'a self,
		user: &'a UserId,
		custom_key: &'a str,
		parameters: LtiParameters,
	) -> StoreFuture<'a, LtiUserData>;

	/// Fetches the record for `(user, custom_key)`, if present.
	fn fetch<'a>(
		&'a self,
		user: &'a UserId,
		custom_key: &'a str,
	) -> StoreFuture<'a, Option<LtiUserData>>;

	/// Fetches every partition stored for `user`, ordered by custom key.
	fn fetch_for_user<'a>(&'a self, user: &'a UserId) -> StoreFuture<'a, Vec<LtiUserData>>;
}

/// Error type produced by store implementations (launch data and sessions alike).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

/// Unique key identifying a stored launch record.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LaunchDataKey {
	/// Authenticated host identity.
	pub user: UserId,
	/// Partition discriminator; empty for the default partition.
	pub custom_key: String,
}
impl LaunchDataKey {
	/// Builds a key for the provided user and custom key.
	pub fn new(user: &UserId, custom_key: &str) -> Self {
		Self { user: user.clone(), custom_key: custom_key.to_owned() }
	}
}
