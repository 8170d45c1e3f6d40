//! Simple file-backed [`LaunchDataStore`] for single-node deployments.

// std
use std::{
	fs::{self, File},
	io::Write,
	path::{Path, PathBuf},
};
// self
use crate::{
	_prelude::*,
	auth::UserId,
	launch::LtiParameters,
	store::{LaunchDataKey, LaunchDataStore, LtiUserData, MemoryStore, StoreError, StoreFuture},
};

type Snapshot = HashMap<LaunchDataKey, LtiUserData>;

/// Persists launch records to a JSON file after each mutation.
#[derive(Clone, Debug)]
pub struct FileStore {
	path: PathBuf,
	inner: Arc<RwLock<Snapshot>>,
}
impl FileStore {
	/// Opens (or creates) a store at the provided path, eagerly loading existing data.
	pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
		let path = path.into();

		Self::ensure_parent_exists(&path)?;

		let snapshot = Self::load_snapshot(&path)?;

		Ok(Self { path, inner: Arc::new(RwLock::new(snapshot)) })
	}

	fn load_snapshot(path: &Path) -> Result<Snapshot, StoreError> {
		if !path.exists() {
			return Ok(HashMap::new());
		}

		let bytes = fs::read(path).map_err(|e| StoreError::Backend {
			message: format!("Failed to read {}: {e}", path.display()),
		})?;

		if bytes.is_empty() {
			return Ok(HashMap::new());
		}

		let deserializer = &mut serde_json::Deserializer::from_slice(&bytes);
		let entries: Vec<(LaunchDataKey, LtiUserData)> =
			serde_path_to_error::deserialize(deserializer).map_err(|e| StoreError::Serialization {
				message: format!(
					"Failed to parse {} at `{}`: {}",
					path.display(),
					e.path(),
					e.inner()
				),
			})?;

		Ok(entries.into_iter().collect())
	}

	fn ensure_parent_exists(path: &Path) -> Result<(), StoreError> {
		if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
			fs::create_dir_all(parent).map_err(|e| StoreError::Backend {
				message: format!("Failed to create store directory {}: {e}", parent.display()),
			})?;
		}

		Ok(())
	}

	fn persist_locked(&self, contents: &Snapshot) -> Result<(), StoreError> {
		Self::ensure_parent_exists(&self.path)?;

		let mut snapshot: Vec<_> = contents.iter().collect();

		snapshot.sort_by(|a, b| a.0.cmp(b.0));

		let serialized =
			serde_json::to_vec_pretty(&snapshot).map_err(|e| StoreError::Serialization {
				message: format!("Failed to serialize store snapshot: {e}"),
			})?;
		let mut tmp_path = self.path.clone();

		tmp_path.set_extension("tmp");

		{
			let mut file = File::create(&tmp_path).map_err(|e| StoreError::Backend {
				message: format!("Failed to create {}: {e}", tmp_path.display()),
			})?;

			file.write_all(&serialized).map_err(|e| StoreError::Backend {
				message: format!("Failed to write {}: {e}", tmp_path.display()),
			})?;
			file.sync_all().map_err(|e| StoreError::Backend {
				message: format!("Failed to sync {}: {e}", tmp_path.display()),
			})?;
		}

		fs::rename(&tmp_path, &self.path).map_err(|e| StoreError::Backend {
			message: format!("Failed to replace {}: {e}", self.path.display()),
		})
	}
}
impl LaunchDataStore for FileStore {
	fn upsert<'a>(
		&'a self,
		user: &'a UserId,
		custom_key: &'a str,
		parameters: LtiParameters,
	) -> StoreFuture<'a, LtiUserData> {
		Box::pin(async move {
			let mut guard = self.inner.write();
			let previous = guard.get(&LaunchDataKey::new(user, custom_key)).cloned();
			let record = MemoryStore::upsert_into(
				&mut guard,
				user,
				custom_key,
				parameters,
				OffsetDateTime::now_utc(),
			);

			if let Err(e) = self.persist_locked(&guard) {
				// Keep memory consistent with disk when the write fails.
				match previous {
					Some(previous) => guard.insert(record.key(), previous),
					None => guard.remove(&record.key()),
				};

				return Err(e);
			}

			Ok(record)
		})
	}

	fn fetch<'a>(
		&'a self,
		user: &'a UserId,
		custom_key: &'a str,
	) -> StoreFuture<'a, Option<LtiUserData>> {
		Box::pin(async move {
			Ok(self.inner.read().get(&LaunchDataKey::new(user, custom_key)).cloned())
		})
	}

	fn fetch_for_user<'a>(&'a self, user: &'a UserId) -> StoreFuture<'a, Vec<LtiUserData>> {
		Box::pin(async move { Ok(MemoryStore::collect_for_user(&self.inner.read(), user)) })
	}
}
