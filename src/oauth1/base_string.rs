//! Signature base string construction and HMAC signing (RFC 5849 §3.4).

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
use hmac::{Hmac, Mac};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use sha1::Sha1;
use sha2::Sha256;
// self
use crate::{
	_prelude::*,
	launch::HttpMethod,
	oauth1::{OAUTH_SIGNATURE, SignatureMethod},
};

// Everything except RFC 3986 unreserved characters.
const OAUTH_ENCODE_SET: &AsciiSet =
	&NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');

/// Percent-encodes a value per RFC 5849 §3.6 (uppercase hex, unreserved set kept).
pub fn percent_encode(value: &str) -> String {
	utf8_percent_encode(value, OAUTH_ENCODE_SET).to_string()
}

/// Builds the base string URI: lowercase scheme and host, no default port, no query.
///
/// Returns `None` for URLs without a host.
pub fn base_string_uri(url: &Url) -> Option<String> {
	let host = url.host_str()?;
	let scheme = url.scheme().to_ascii_lowercase();
	let host = host.to_ascii_lowercase();
	let path = url.path();

	Some(match url.port() {
		Some(port) => format!("{scheme}://{host}:{port}{path}"),
		None => format!("{scheme}://{host}{path}"),
	})
}

/// Normalizes request parameters: encode, sort by name then value, join with `&`.
///
/// `oauth_signature` is always excluded.
pub fn normalize_parameters<'a, I>(pairs: I) -> String
where
	I: IntoIterator<Item = (&'a str, &'a str)>,
{
	let mut encoded = pairs
		.into_iter()
		.filter(|(key, _)| *key != OAUTH_SIGNATURE)
		.map(|(key, value)| (percent_encode(key), percent_encode(value)))
		.collect::<Vec<_>>();

	encoded.sort();

	let mut buf = String::new();

	for (idx, (key, value)) in encoded.iter().enumerate() {
		if idx > 0 {
			buf.push('&');
		}

		buf.push_str(key);
		buf.push('=');
		buf.push_str(value);
	}

	buf
}

/// Assembles `METHOD&enc(base_uri)&enc(normalized_params)`.
///
/// `params` must already include any query-string pairs; the URL's own query is ignored.
pub fn signature_base_string(
	method: HttpMethod,
	url: &Url,
	params: &[(String, String)],
) -> Option<String> {
	let uri = base_string_uri(url)?;
	let normalized = normalize_parameters(params.iter().map(|(k, v)| (k.as_str(), v.as_str())));

	Some(format!("{}&{}&{}", method.as_str(), percent_encode(&uri), percent_encode(&normalized)))
}

/// Signs a base string and returns the base64 signature.
///
/// `token_secret` is empty for LTI launches, which are two-legged.
pub fn compute_signature(
	method: SignatureMethod,
	base_string: &str,
	consumer_secret: &str,
	token_secret: &str,
) -> Option<String> {
	let key = format!("{}&{}", percent_encode(consumer_secret), percent_encode(token_secret));
	let digest = match method {
		SignatureMethod::HmacSha1 => {
			let mut mac = Hmac::<Sha1>::new_from_slice(key.as_bytes()).ok()?;

			mac.update(base_string.as_bytes());
			mac.finalize().into_bytes().to_vec()
		},
		SignatureMethod::HmacSha256 => {
			let mut mac = Hmac::<Sha256>::new_from_slice(key.as_bytes()).ok()?;

			mac.update(base_string.as_bytes());
			mac.finalize().into_bytes().to_vec()
		},
	};

	Some(STANDARD.encode(digest))
}
