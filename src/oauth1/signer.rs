//! Consumer-side launch signing, used by test harnesses and LTI consumers embedding this crate.

// crates.io
use rand::{Rng, distr::Alphanumeric};
// self
use crate::{
	_prelude::*,
	auth::ConsumerSecret,
	config::LtiConfig,
	error::ConfigError,
	launch::HttpMethod,
	oauth1::{
		OAUTH_CONSUMER_KEY, OAUTH_NONCE, OAUTH_PREFIX, OAUTH_SIGNATURE, OAUTH_SIGNATURE_METHOD,
		OAUTH_TIMESTAMP, OAUTH_VERSION, OAUTH_VERSION_1, SignatureMethod, compute_signature,
		signature_base_string,
	},
};

const NONCE_LEN: usize = 32;

/// Signs launch parameters with a consumer key + secret pair.
#[derive(Clone, Debug)]
pub struct LaunchSigner {
	consumer_key: String,
	consumer_secret: ConsumerSecret,
	method: SignatureMethod,
}
impl LaunchSigner {
	/// Creates an `HMAC-SHA1` signer.
	pub fn new(consumer_key: impl Into<String>, consumer_secret: ConsumerSecret) -> Self {
		Self {
			consumer_key: consumer_key.into(),
			consumer_secret,
			method: SignatureMethod::HmacSha1,
		}
	}

	/// Creates a signer matching the credentials a verifier is configured with.
	pub fn from_config(config: &LtiConfig) -> Self {
		Self::new(config.consumer_key.clone(), config.consumer_secret.clone())
	}

	/// Overrides the signature method.
	pub fn with_signature_method(mut self, method: SignatureMethod) -> Self {
		self.method = method;

		self
	}

	/// Signs `params` for the given request line using a fresh nonce and the current time.
	pub fn sign(
		&self,
		method: HttpMethod,
		url: &Url,
		params: Vec<(String, String)>,
	) -> Result<Vec<(String, String)>, ConfigError> {
		let nonce = rand::rng()
			.sample_iter(Alphanumeric)
			.take(NONCE_LEN)
			.map(char::from)
			.collect::<String>();

		self.sign_with(method, url, params, &nonce, OffsetDateTime::now_utc())
	}

	/// Signs `params` with a caller-supplied nonce and timestamp.
	///
	/// Existing `oauth_*` pairs are replaced. Query pairs on `url` take part in the signature but
	/// are not copied into the returned list.
	pub fn sign_with(
		&self,
		method: HttpMethod,
		url: &Url,
		mut params: Vec<(String, String)>,
		nonce: &str,
		timestamp: OffsetDateTime,
	) -> Result<Vec<(String, String)>, ConfigError> {
		params.retain(|(key, _)| !key.starts_with(OAUTH_PREFIX));
		params.extend([
			(OAUTH_CONSUMER_KEY.to_owned(), self.consumer_key.clone()),
			(OAUTH_NONCE.to_owned(), nonce.to_owned()),
			(OAUTH_SIGNATURE_METHOD.to_owned(), self.method.as_str().to_owned()),
			(OAUTH_TIMESTAMP.to_owned(), timestamp.unix_timestamp().to_string()),
			(OAUTH_VERSION.to_owned(), OAUTH_VERSION_1.to_owned()),
		]);

		let mut signed_pairs = params.clone();

		signed_pairs.extend(url.query_pairs().into_owned());

		let base = signature_base_string(method, url, &signed_pairs)
			.ok_or(ConfigError::InvalidLaunchUrl { source: url::ParseError::EmptyHost })?;
		let signature =
			compute_signature(self.method, &base, self.consumer_secret.expose(), "")
				.ok_or(ConfigError::InvalidSigningKey { method: self.method.as_str() })?;

		params.push((OAUTH_SIGNATURE.to_owned(), signature));

		Ok(params)
	}
}
