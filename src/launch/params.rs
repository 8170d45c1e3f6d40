//! Normalized LTI launch parameters.

// self
use crate::{_prelude::*, oauth1::OAUTH_PREFIX};

/// `context_id` launch field.
pub const CONTEXT_ID: &str = "context_id";
/// `user_id` launch field.
pub const USER_ID: &str = "user_id";
/// `lis_result_sourcedid` launch field.
pub const LIS_RESULT_SOURCEDID: &str = "lis_result_sourcedid";
/// `lis_outcome_service_url` launch field.
pub const LIS_OUTCOME_SERVICE_URL: &str = "lis_outcome_service_url";
/// `resource_link_id` launch field.
pub const RESOURCE_LINK_ID: &str = "resource_link_id";
/// `lis_person_sourcedid` launch field.
pub const LIS_PERSON_SOURCEDID: &str = "lis_person_sourcedid";
/// `lis_person_contact_email_primary` launch field.
pub const LIS_PERSON_CONTACT_EMAIL_PRIMARY: &str = "lis_person_contact_email_primary";
/// `lti_version` launch field.
pub const LTI_VERSION: &str = "lti_version";

/// Launch fields with dedicated accessors.
pub const RECOGNIZED_PARAMETERS: [&str; 8] = [
	CONTEXT_ID,
	USER_ID,
	LIS_RESULT_SOURCEDID,
	LIS_OUTCOME_SERVICE_URL,
	RESOURCE_LINK_ID,
	LIS_PERSON_SOURCEDID,
	LIS_PERSON_CONTACT_EMAIL_PRIMARY,
	LTI_VERSION,
];
/// Fields a well-formed basic launch carries.
pub const REQUIRED_PARAMETERS: [&str; 3] = [USER_ID, LTI_VERSION, RESOURCE_LINK_ID];

/// Immutable snapshot of the LTI fields carried by a launch.
///
/// Every non-`oauth_*` field is kept; the recognized ones get typed accessors. Serializes as a
/// flat JSON object.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LtiParameters(BTreeMap<String, String>);
impl LtiParameters {
	/// Extracts launch fields from request pairs. Repeated names keep the last value.
	pub fn extract<'a, I>(pairs: I) -> Self
	where
		I: IntoIterator<Item = (&'a str, &'a str)>,
	{
		pairs
			.into_iter()
			.filter(|(key, _)| !key.starts_with(OAUTH_PREFIX))
			.map(|(key, value)| (key.to_owned(), value.to_owned()))
			.collect()
	}

	/// Looks up any field by name.
	pub fn get(&self, name: &str) -> Option<&str> {
		self.0.get(name).map(String::as_str)
	}

	/// Returns `true` if the field is present.
	pub fn contains(&self, name: &str) -> bool {
		self.0.contains_key(name)
	}

	/// Consumer-side user identifier.
	pub fn user_id(&self) -> Option<&str> {
		self.get(USER_ID)
	}

	/// Consumer-side username (`lis_person_sourcedid`).
	pub fn person_sourcedid(&self) -> Option<&str> {
		self.get(LIS_PERSON_SOURCEDID)
	}

	/// Primary contact email.
	pub fn email(&self) -> Option<&str> {
		self.get(LIS_PERSON_CONTACT_EMAIL_PRIMARY)
	}

	/// Course/context identifier.
	pub fn context_id(&self) -> Option<&str> {
		self.get(CONTEXT_ID)
	}

	/// Resource link identifier.
	pub fn resource_link_id(&self) -> Option<&str> {
		self.get(RESOURCE_LINK_ID)
	}

	/// LTI protocol version string, e.g. `LTI-1p0`.
	pub fn lti_version(&self) -> Option<&str> {
		self.get(LTI_VERSION)
	}

	/// Outcome service endpoint for grade passback.
	pub fn outcome_service_url(&self) -> Option<&str> {
		self.get(LIS_OUTCOME_SERVICE_URL)
	}

	/// Result sourcedid paired with the outcome service.
	pub fn result_sourcedid(&self) -> Option<&str> {
		self.get(LIS_RESULT_SOURCEDID)
	}

	/// Required fields absent from this snapshot, in declaration order.
	pub fn missing_required(&self) -> Vec<&'static str> {
		REQUIRED_PARAMETERS.into_iter().filter(|name| !self.contains(name)).collect()
	}

	/// Returns `true` when every required field is present.
	pub fn is_well_formed(&self) -> bool {
		self.missing_required().is_empty()
	}

	/// Iterates over `(name, value)` pairs in name order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
	}

	/// Number of fields.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns `true` when no field is present.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}
impl FromIterator<(String, String)> for LtiParameters {
	fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
		Self(iter.into_iter().collect())
	}
}
