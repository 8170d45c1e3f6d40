//! The durable per-user launch record.

// self
use crate::{_prelude::*, auth::UserId, launch::LtiParameters, store::LaunchDataKey};

/// Latest launch parameters seen for a user within one custom-key partition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LtiUserData {
	/// Authenticated host identity.
	pub user: UserId,
	/// Partition discriminator; empty for the default partition.
	pub custom_key: String,
	/// Full parameter snapshot from the most recent launch.
	pub parameters: LtiParameters,
	/// First time this partition was written.
	#[serde(with = "time::serde::rfc3339")]
	pub created_at: OffsetDateTime,
	/// Last time the parameters were overwritten.
	#[serde(with = "time::serde::rfc3339")]
	pub updated_at: OffsetDateTime,
}
impl LtiUserData {
	/// Creates a fresh record.
	pub fn new(
		user: UserId,
		custom_key: impl Into<String>,
		parameters: LtiParameters,
		now: OffsetDateTime,
	) -> Self {
		Self { user, custom_key: custom_key.into(), parameters, created_at: now, updated_at: now }
	}

	/// Storage key for this record.
	pub fn key(&self) -> LaunchDataKey {
		LaunchDataKey::new(&self.user, &self.custom_key)
	}

	/// Replaces the parameter snapshot, keeping the creation instant.
	pub fn overwrite(&mut self, parameters: LtiParameters, now: OffsetDateTime) {
		self.parameters = parameters;
		self.updated_at = now;
	}

	/// Grade passback endpoint stored with the launch. Never called by this crate.
	pub fn outcome_service_url(&self) -> Option<&str> {
		self.parameters.outcome_service_url()
	}

	/// Result sourcedid paired with [`LtiUserData::outcome_service_url`].
	pub fn result_sourcedid(&self) -> Option<&str> {
		self.parameters.result_sourcedid()
	}
}
