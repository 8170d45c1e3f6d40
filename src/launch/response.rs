//! Launch responses and redirect resolution.

// self
use crate::{_prelude::*, error::ConfigError};

/// Fixed body returned for rejected launches.
pub const INVALID_LTI_REQUEST: &str = "Invalid LTI Request";

/// The two response shapes a launch can produce.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LaunchResponse {
	/// `302 Found` with a `Location` header.
	Redirect {
		/// Resolved redirect target.
		location: String,
	},
	/// `400 Bad Request` with a plain-text body.
	BadRequest {
		/// Response body.
		body: String,
	},
}
impl LaunchResponse {
	/// The rejection response for an invalid launch.
	pub fn invalid_request() -> Self {
		Self::BadRequest { body: INVALID_LTI_REQUEST.to_owned() }
	}

	/// HTTP status code.
	pub fn status(&self) -> u16 {
		match self {
			Self::Redirect { .. } => 302,
			Self::BadRequest { .. } => 400,
		}
	}

	/// `Location` header value for redirects.
	pub fn location(&self) -> Option<&str> {
		match self {
			Self::Redirect { location } => Some(location),
			Self::BadRequest { .. } => None,
		}
	}

	/// Body for bad requests.
	pub fn body(&self) -> Option<&str> {
		match self {
			Self::Redirect { .. } => None,
			Self::BadRequest { body } => Some(body),
		}
	}
}

/// Resolves a hook-supplied redirect target against the current request URL.
///
/// Absolute targets (`scheme://...`) pass through byte-for-byte; anything else is joined onto
/// the request's scheme and host.
pub fn resolve_redirect(request_url: &Url, target: &str) -> Result<String, ConfigError> {
	if is_absolute_url(target) {
		return Ok(target.to_owned());
	}

	request_url
		.join(target)
		.map(String::from)
		.map_err(|source| ConfigError::InvalidRedirect { target: target.to_owned(), source })
}

fn is_absolute_url(target: &str) -> bool {
	let Some((scheme, _)) = target.split_once("://") else {
		return false;
	};
	let mut chars = scheme.chars();

	chars.next().is_some_and(|c| c.is_ascii_alphabetic())
		&& chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}
