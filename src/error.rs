//! Crate-level error types shared across the controller, stores, and hooks.
//!
//! An invalid launch signature is not an error: it is a normal
//! [`LaunchResponse::BadRequest`](crate::launch::LaunchResponse::BadRequest) outcome. Everything
//! surfaced through [`Error`] is fatal for the current request and should map to a host-level
//! 500 response.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

pub(crate) type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Launch-data store failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Session store failure.
	#[error("Session store failure: {0}")]
	Session(#[source] crate::store::StoreError),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// The registered hook manager failed.
	#[error(transparent)]
	Hook(#[from] crate::hooks::HookError),
}

/// Configuration and validation failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Consumer key is empty or absent.
	#[error("LTI consumer key is not configured.")]
	MissingConsumerKey,
	/// Consumer secret is empty or absent.
	#[error("LTI consumer secret is not configured.")]
	MissingConsumerSecret,
	/// No signature method was enabled.
	#[error("At least one OAuth signature method must be enabled.")]
	NoSignatureMethods,
	/// An environment variable held an unusable value.
	#[error("Environment variable `{name}` is invalid: {reason}.")]
	InvalidEnv {
		/// Variable name.
		name: &'static str,
		/// Human-readable parsing failure.
		reason: String,
	},
	/// A redirect target returned by the hook manager cannot be resolved.
	#[error("Redirect target `{target}` cannot be resolved.")]
	InvalidRedirect {
		/// Target as returned by the hook manager.
		target: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// A launch URL cannot be parsed.
	#[error("Launch URL is invalid.")]
	InvalidLaunchUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// HMAC key material was rejected while signing.
	#[error("Signing key was rejected by the {method} signature method.")]
	InvalidSigningKey {
		/// Wire name of the signature method.
		method: &'static str,
	},
}
