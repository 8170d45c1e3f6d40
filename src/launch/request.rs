//! Framework-agnostic inbound request types.

// self
use crate::{
	_prelude::*,
	auth::{SessionId, UserId},
	error::ConfigError,
	oauth1::OAUTH_PREFIX,
	session::Session,
};

/// HTTP methods accepted by the launch endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HttpMethod {
	/// `GET`
	Get,
	/// `POST`
	Post,
}
impl HttpMethod {
	/// Returns the uppercase method token used in signature base strings.
	pub const fn as_str(self) -> &'static str {
		match self {
			HttpMethod::Get => "GET",
			HttpMethod::Post => "POST",
		}
	}
}
impl Display for HttpMethod {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Raw request as handed over by the host's HTTP layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InboundRequest {
	/// Request method.
	pub method: HttpMethod,
	/// Full request URL including scheme and host.
	pub url: Url,
	/// Query and form pairs in arrival order; duplicates are preserved.
	pub form: Vec<(String, String)>,
	/// Browser session the request belongs to.
	pub session_id: SessionId,
}
impl InboundRequest {
	/// Creates a request whose parameters come from the URL query only.
	pub fn new(method: HttpMethod, url: Url, session_id: SessionId) -> Self {
		let form = url.query_pairs().into_owned().collect();

		Self { method, url, form, session_id }
	}

	/// Creates a request from an `application/x-www-form-urlencoded` body, merging query pairs.
	pub fn from_form_body(
		method: HttpMethod,
		url: Url,
		body: &[u8],
		session_id: SessionId,
	) -> Self {
		let mut request = Self::new(method, url, session_id);

		request.form.extend(url::form_urlencoded::parse(body).into_owned());

		request
	}

	/// Parses `url` and delegates to [`InboundRequest::from_form_body`].
	pub fn parse(
		method: HttpMethod,
		url: &str,
		body: &[u8],
		session_id: SessionId,
	) -> Result<Self, ConfigError> {
		let url = Url::parse(url).map_err(|source| ConfigError::InvalidLaunchUrl { source })?;

		Ok(Self::from_form_body(method, url, body, session_id))
	}

	/// Appends a parameter pair.
	pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.form.push((name.into(), value.into()));

		self
	}

	/// First value for `name`, if any.
	pub fn param(&self, name: &str) -> Option<&str> {
		self.form.iter().find(|(key, _)| key == name).map(|(_, value)| value.as_str())
	}

	/// Returns `true` when any `oauth_*` parameter is present, marking a fresh launch.
	pub fn has_oauth_parameters(&self) -> bool {
		self.form.iter().any(|(key, _)| key.starts_with(OAUTH_PREFIX))
	}

	/// Iterates over pairs as string slices.
	pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
		self.form.iter().map(|(k, v)| (k.as_str(), v.as_str()))
	}
}

/// An inbound request bound to its loaded session; this is what hooks observe and mutate.
#[derive(Clone, Debug)]
pub struct LaunchRequest {
	inbound: InboundRequest,
	session: Session,
}
impl LaunchRequest {
	/// Binds a request to its session.
	pub fn new(inbound: InboundRequest, session: Session) -> Self {
		Self { inbound, session }
	}

	/// The raw inbound request.
	pub fn inbound(&self) -> &InboundRequest {
		&self.inbound
	}

	/// Request method.
	pub fn method(&self) -> HttpMethod {
		self.inbound.method
	}

	/// Full request URL.
	pub fn url(&self) -> &Url {
		&self.inbound.url
	}

	/// Query and form pairs.
	pub fn form(&self) -> &[(String, String)] {
		&self.inbound.form
	}

	/// Current session state.
	pub fn session(&self) -> &Session {
		&self.session
	}

	/// Mutable session state.
	pub fn session_mut(&mut self) -> &mut Session {
		&mut self.session
	}

	/// Identity currently logged into the session.
	pub fn user(&self) -> Option<&UserId> {
		self.session.user()
	}

	/// Returns `true` when the session carries an identity.
	pub fn is_authenticated(&self) -> bool {
		self.session.is_authenticated()
	}

	/// Logs `user` into the session; this is how authentication hooks take effect.
	pub fn login(&mut self, user: UserId) {
		self.session.login(user);
	}

	/// Releases the session for persistence.
	pub fn into_session(self) -> Session {
		self.session
	}
}
