//! Host-issued identifiers for users and browser sessions.
//!
//! Both are opaque to this crate: any non-empty string is accepted, so usernames such as
//! `first last` or e-mail addresses taken from launch fields can be used as-is.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::_prelude::*;

/// Error returned when an identifier is empty.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
#[error("{kind} identifier cannot be empty.")]
pub struct IdentifierError {
	/// Kind of identifier (`User`, `Session`).
	pub kind: &'static str,
}

macro_rules! def_id {
	($name:ident, $kind:literal, $doc:literal) => {
		#[doc = $doc]
		#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		#[serde(try_from = "String", into = "String")]
		pub struct $name(String);
		impl $name {
			/// Wraps a host-issued value; only empty strings are refused.
			pub fn new(value: impl Into<String>) -> Result<Self, IdentifierError> {
				let value = value.into();

				if value.is_empty() {
					return Err(IdentifierError { kind: $kind });
				}

				Ok(Self(value))
			}
		}
		impl TryFrom<String> for $name {
			type Error = IdentifierError;

			fn try_from(value: String) -> Result<Self, Self::Error> {
				Self::new(value)
			}
		}
		impl FromStr for $name {
			type Err = IdentifierError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Self::new(s)
			}
		}
		impl From<$name> for String {
			fn from(value: $name) -> Self {
				value.0
			}
		}
		impl Deref for $name {
			type Target = str;

			fn deref(&self) -> &str {
				&self.0
			}
		}
		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}
		impl Borrow<str> for $name {
			fn borrow(&self) -> &str {
				&self.0
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str(&self.0)
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				write!(f, "{}({:?})", $kind, self.0)
			}
		}
	};
}

def_id!(UserId, "User", "Host-application identity of an authenticated user.");
def_id!(SessionId, "Session", "Opaque browser-session key issued by the host's session layer.");
