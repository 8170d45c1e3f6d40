//! Consumer credentials and verifier policy loaded at process start.

// self
use crate::{_prelude::*, auth::ConsumerSecret, error::ConfigError, oauth1::SignatureMethod};

/// Environment variable holding the consumer key.
pub const ENV_CONSUMER_KEY: &str = "LTI_CLIENT_KEY";
/// Environment variable holding the consumer secret.
pub const ENV_CONSUMER_SECRET: &str = "LTI_CLIENT_SECRET";
/// Optional environment variable enabling the timestamp tolerance, in seconds.
pub const ENV_TIMESTAMP_TOLERANCE: &str = "LTI_TIMESTAMP_TOLERANCE_SECS";

/// Validated launch-verification settings.
///
/// Deserializing goes through [`LtiConfigBuilder`], so embedded config files get the same
/// validation as programmatic construction.
#[derive(Clone, Debug, Deserialize)]
#[serde(try_from = "LtiConfigBuilder")]
pub struct LtiConfig {
	/// Shared OAuth consumer key expected in `oauth_consumer_key`.
	pub consumer_key: String,
	/// Shared OAuth consumer secret.
	pub consumer_secret: ConsumerSecret,
	/// Signature methods accepted on inbound launches.
	pub signature_methods: Vec<SignatureMethod>,
	/// Maximum accepted distance between `oauth_timestamp` and now; `None` disables the check.
	pub timestamp_tolerance: Option<Duration>,
}
impl LtiConfig {
	/// Returns a builder with `HMAC-SHA1` enabled and no timestamp tolerance.
	pub fn builder() -> LtiConfigBuilder {
		LtiConfigBuilder::default()
	}

	/// Loads settings from `LTI_CLIENT_KEY`, `LTI_CLIENT_SECRET`, and the optional
	/// `LTI_TIMESTAMP_TOLERANCE_SECS`.
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_lookup(|name| std::env::var(name).ok())
	}

	fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
	where
		F: Fn(&'static str) -> Option<String>,
	{
		let mut builder = Self::builder()
			.consumer_key(lookup(ENV_CONSUMER_KEY).unwrap_or_default())
			.consumer_secret(lookup(ENV_CONSUMER_SECRET).unwrap_or_default());

		if let Some(raw) = lookup(ENV_TIMESTAMP_TOLERANCE) {
			let secs = raw.trim().parse::<u32>().map_err(|e| ConfigError::InvalidEnv {
				name: ENV_TIMESTAMP_TOLERANCE,
				reason: e.to_string(),
			})?;

			builder.timestamp_tolerance_secs = Some(secs);
		}

		builder.build()
	}

	/// Returns `true` when `method` is enabled.
	pub fn accepts(&self, method: SignatureMethod) -> bool {
		self.signature_methods.contains(&method)
	}
}

/// Builder (and serde shape) for [`LtiConfig`].
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct LtiConfigBuilder {
	/// Consumer key.
	pub consumer_key: String,
	/// Consumer secret.
	pub consumer_secret: ConsumerSecret,
	/// Accepted signature methods.
	pub signature_methods: Vec<SignatureMethod>,
	/// Timestamp tolerance in whole seconds.
	pub timestamp_tolerance_secs: Option<u32>,
}
impl LtiConfigBuilder {
	/// Sets the consumer key.
	pub fn consumer_key(mut self, key: impl Into<String>) -> Self {
		self.consumer_key = key.into();

		self
	}

	/// Sets the consumer secret.
	pub fn consumer_secret(mut self, secret: impl Into<String>) -> Self {
		self.consumer_secret = ConsumerSecret::new(secret);

		self
	}

	/// Replaces the accepted signature methods.
	pub fn signature_methods<I>(mut self, methods: I) -> Self
	where
		I: IntoIterator<Item = SignatureMethod>,
	{
		self.signature_methods = Vec::new();

		for method in methods {
			if !self.signature_methods.contains(&method) {
				self.signature_methods.push(method);
			}
		}

		self
	}

	/// Enables the timestamp freshness check; negative values clamp to zero.
	pub fn timestamp_tolerance(mut self, tolerance: Duration) -> Self {
		let secs = tolerance.whole_seconds().clamp(0, i64::from(u32::MAX));

		self.timestamp_tolerance_secs = u32::try_from(secs).ok();

		self
	}

	/// Validates and produces the config.
	pub fn build(self) -> Result<LtiConfig, ConfigError> {
		if self.consumer_key.trim().is_empty() {
			return Err(ConfigError::MissingConsumerKey);
		}
		if self.consumer_secret.is_empty() {
			return Err(ConfigError::MissingConsumerSecret);
		}
		if self.signature_methods.is_empty() {
			return Err(ConfigError::NoSignatureMethods);
		}

		Ok(LtiConfig {
			consumer_key: self.consumer_key,
			consumer_secret: self.consumer_secret,
			signature_methods: self.signature_methods,
			timestamp_tolerance: self
				.timestamp_tolerance_secs
				.map(|secs| Duration::seconds(i64::from(secs))),
		})
	}
}
impl Default for LtiConfigBuilder {
	fn default() -> Self {
		Self {
			consumer_key: String::new(),
			consumer_secret: ConsumerSecret::new(""),
			signature_methods: vec![SignatureMethod::HmacSha1],
			timestamp_tolerance_secs: None,
		}
	}
}
impl TryFrom<LtiConfigBuilder> for LtiConfig {
	type Error = ConfigError;

	fn try_from(builder: LtiConfigBuilder) -> Result<Self, Self::Error> {
		builder.build()
	}
}
