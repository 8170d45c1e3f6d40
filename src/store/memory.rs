//! Thread-safe in-memory [`LaunchDataStore`] for local development and tests.

// std
use std::collections::hash_map::Entry;
// self
use crate::{
	_prelude::*,
	auth::UserId,
	launch::LtiParameters,
	store::{LaunchDataKey, LaunchDataStore, LtiUserData, StoreFuture},
};

type StoreMap = Arc<RwLock<HashMap<LaunchDataKey, LtiUserData>>>;

/// Storage backend that keeps launch records in-process.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(StoreMap);
impl MemoryStore {
	/// Number of stored records across all users.
	pub fn len(&self) -> usize {
		self.0.read().len()
	}

	/// Returns `true` when nothing has been stored.
	pub fn is_empty(&self) -> bool {
		self.0.read().is_empty()
	}

	pub(crate) fn upsert_into(
		map: &mut HashMap<LaunchDataKey, LtiUserData>,
		user: &UserId,
		custom_key: &str,
		parameters: LtiParameters,
		now: OffsetDateTime,
	) -> LtiUserData {
		match map.entry(LaunchDataKey::new(user, custom_key)) {
			Entry::Occupied(mut entry) => {
				entry.get_mut().overwrite(parameters, now);

				entry.get().clone()
			},
			Entry::Vacant(entry) =>
				entry.insert(LtiUserData::new(user.clone(), custom_key, parameters, now)).clone(),
		}
	}

	pub(crate) fn collect_for_user(
		map: &HashMap<LaunchDataKey, LtiUserData>,
		user: &UserId,
	) -> Vec<LtiUserData> {
		let mut records =
			map.values().filter(|record| &record.user == user).cloned().collect::<Vec<_>>();

		records.sort_by(|a, b| a.custom_key.cmp(&b.custom_key));

		records
	}
}
impl LaunchDataStore for MemoryStore {
	fn upsert<'a>(
		&'a self,
		user: &'a UserId,
		custom_key: &'a str,
		parameters: LtiParameters,
	) -> StoreFuture<'a, LtiUserData> {
		let map = self.0.clone();

		Box::pin(async move {
			let now = OffsetDateTime::now_utc();

			Ok(Self::upsert_into(&mut map.write(), user, custom_key, parameters, now))
		})
	}

	fn fetch<'a>(
		&'a self,
		user: &'a UserId,
		custom_key: &'a str,
	) -> StoreFuture<'a, Option<LtiUserData>> {
		let map = self.0.clone();

		Box::pin(async move { Ok(map.read().get(&LaunchDataKey::new(user, custom_key)).cloned()) })
	}

	fn fetch_for_user<'a>(&'a self, user: &'a UserId) -> StoreFuture<'a, Vec<LtiUserData>> {
		let map = self.0.clone();

		Box::pin(async move { Ok(Self::collect_for_user(&map.read(), user)) })
	}
}
