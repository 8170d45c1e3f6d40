//! OAuth 1.0a signature verification for LTI launches.
//!
//! Only the HMAC family of RFC 5849 §3.4 is supported, which is what LTI 1.x consumers emit.
//! Verification never fails with an error: malformed or missing OAuth fields simply produce
//! [`SignatureCheck::Invalid`] with a loggable [`InvalidReason`].
//!
//! Replay protection is limited to an opt-in timestamp tolerance
//! ([`LtiConfig::timestamp_tolerance`]); nonces are not tracked.

pub mod base_string;
pub mod signer;

pub use base_string::*;
pub use signer::*;

// crates.io
use subtle::ConstantTimeEq;
// self
use crate::{_prelude::*, config::LtiConfig, launch::HttpMethod};

/// Prefix shared by every OAuth protocol parameter.
pub const OAUTH_PREFIX: &str = "oauth_";
/// `oauth_consumer_key` parameter name.
pub const OAUTH_CONSUMER_KEY: &str = "oauth_consumer_key";
/// `oauth_signature` parameter name.
pub const OAUTH_SIGNATURE: &str = "oauth_signature";
/// `oauth_signature_method` parameter name.
pub const OAUTH_SIGNATURE_METHOD: &str = "oauth_signature_method";
/// `oauth_timestamp` parameter name.
pub const OAUTH_TIMESTAMP: &str = "oauth_timestamp";
/// `oauth_nonce` parameter name.
pub const OAUTH_NONCE: &str = "oauth_nonce";
/// `oauth_version` parameter name.
pub const OAUTH_VERSION: &str = "oauth_version";
/// The only protocol version accepted in `oauth_version`.
pub const OAUTH_VERSION_1: &str = "1.0";

/// HMAC signature methods accepted on inbound launches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignatureMethod {
	/// `HMAC-SHA1`, mandated by LTI 1.x.
	#[serde(rename = "HMAC-SHA1")]
	HmacSha1,
	/// `HMAC-SHA256`, emitted by some newer consumers.
	#[serde(rename = "HMAC-SHA256")]
	HmacSha256,
}
impl SignatureMethod {
	/// Returns the wire name used in `oauth_signature_method`.
	pub const fn as_str(self) -> &'static str {
		match self {
			SignatureMethod::HmacSha1 => "HMAC-SHA1",
			SignatureMethod::HmacSha256 => "HMAC-SHA256",
		}
	}

	/// Parses a wire name; unknown methods yield `None`.
	pub fn from_wire(value: &str) -> Option<Self> {
		match value {
			"HMAC-SHA1" => Some(SignatureMethod::HmacSha1),
			"HMAC-SHA256" => Some(SignatureMethod::HmacSha256),
			_ => None,
		}
	}
}
impl Display for SignatureMethod {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Why a launch signature was rejected.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum InvalidReason {
	/// A mandatory OAuth parameter is absent.
	#[error("Missing OAuth parameter `{0}`.")]
	MissingParameter(&'static str),
	/// A single-valued OAuth parameter was repeated.
	#[error("OAuth parameter `{0}` appears more than once.")]
	DuplicateParameter(&'static str),
	/// `oauth_consumer_key` does not match the configured key.
	#[error("Unknown consumer key.")]
	UnknownConsumerKey,
	/// The signature method is unknown or disabled.
	#[error("Signature method `{0}` is not accepted.")]
	UnsupportedSignatureMethod(String),
	/// `oauth_version` is present but not `1.0`.
	#[error("OAuth version `{0}` is not supported.")]
	UnsupportedVersion(String),
	/// `oauth_timestamp` is not an integer.
	#[error("Timestamp `{0}` is not a valid integer.")]
	MalformedTimestamp(String),
	/// `oauth_timestamp` is outside the configured tolerance.
	#[error("Timestamp is outside the accepted window.")]
	StaleTimestamp,
	/// The launch URL has no host to build a base string URI from.
	#[error("Launch URL has no host.")]
	MissingHost,
	/// The recomputed signature differs from `oauth_signature`.
	#[error("Signature does not match.")]
	SignatureMismatch,
}

/// Outcome of [`verify_signature`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SignatureCheck {
	/// The request was signed with the configured consumer credentials.
	Valid,
	/// The request must be rejected.
	Invalid(InvalidReason),
}
impl SignatureCheck {
	/// Returns `true` for [`SignatureCheck::Valid`].
	pub fn is_valid(&self) -> bool {
		matches!(self, SignatureCheck::Valid)
	}
}

/// Recomputes the launch signature and compares it with `oauth_signature`.
///
/// `params` must hold every form and query pair exactly as received, `oauth_*` included.
pub fn verify_signature(
	config: &LtiConfig,
	method: HttpMethod,
	url: &Url,
	params: &[(String, String)],
	now: OffsetDateTime,
) -> SignatureCheck {
	match check(config, method, url, params, now) {
		Ok(()) => SignatureCheck::Valid,
		Err(reason) => SignatureCheck::Invalid(reason),
	}
}

fn check(
	config: &LtiConfig,
	method: HttpMethod,
	url: &Url,
	params: &[(String, String)],
	now: OffsetDateTime,
) -> Result<(), InvalidReason> {
	let signature = required_param(params, OAUTH_SIGNATURE)?;
	let consumer_key = required_param(params, OAUTH_CONSUMER_KEY)?;
	let signature_method = required_param(params, OAUTH_SIGNATURE_METHOD)?;
	let timestamp = required_param(params, OAUTH_TIMESTAMP)?;

	required_param(params, OAUTH_NONCE)?;

	match optional_param(params, OAUTH_VERSION)? {
		Some(version) if version != OAUTH_VERSION_1 =>
			return Err(InvalidReason::UnsupportedVersion(version.to_owned())),
		_ => {},
	}

	if consumer_key != config.consumer_key {
		return Err(InvalidReason::UnknownConsumerKey);
	}

	let signature_method = SignatureMethod::from_wire(signature_method)
		.filter(|m| config.accepts(*m))
		.ok_or_else(|| InvalidReason::UnsupportedSignatureMethod(signature_method.to_owned()))?;
	let issued_at = timestamp
		.parse::<i64>()
		.map_err(|_| InvalidReason::MalformedTimestamp(timestamp.to_owned()))?;

	if let Some(tolerance) = config.timestamp_tolerance {
		let skew = now.unix_timestamp().checked_sub(issued_at).map(i64::unsigned_abs);

		match skew {
			Some(skew) if skew <= tolerance.whole_seconds().unsigned_abs() => {},
			_ => return Err(InvalidReason::StaleTimestamp),
		}
	}

	let base = signature_base_string(method, url, params).ok_or(InvalidReason::MissingHost)?;
	let expected =
		compute_signature(signature_method, &base, config.consumer_secret.expose(), "")
			.ok_or(InvalidReason::SignatureMismatch)?;

	if bool::from(expected.as_bytes().ct_eq(signature.as_bytes())) {
		Ok(())
	} else {
		Err(InvalidReason::SignatureMismatch)
	}
}

fn optional_param<'a>(
	params: &'a [(String, String)],
	name: &'static str,
) -> Result<Option<&'a str>, InvalidReason> {
	let mut values = params.iter().filter(|(key, _)| key == name).map(|(_, value)| value.as_str());
	let first = values.next();

	if values.next().is_some() {
		return Err(InvalidReason::DuplicateParameter(name));
	}

	Ok(first)
}

fn required_param<'a>(
	params: &'a [(String, String)],
	name: &'static str,
) -> Result<&'a str, InvalidReason> {
	optional_param(params, name)?.ok_or(InvalidReason::MissingParameter(name))
}
