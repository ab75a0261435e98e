//! Builder that validates client settings and wires the HTTP client, limiter, and base URL.

// self
use crate::{
	_prelude::*,
	auth::BearerToken,
	client::FeedClient,
	error::ConstructionError,
	http::FeedHttpClient,
	limiter::TokenBucketLimiter,
	transport::RateLimitedTransport,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

/// Service root used when no base URL is configured.
pub const DEFAULT_BASE_URL: &str = "https://www.yammer.com";

/// Token-bucket settings for a client that owns its limiter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RateLimit {
	/// Requests that may start per period (and the burst size).
	pub capacity: usize,
	/// Refill period.
	pub period: Duration,
}
impl RateLimit {
	/// The service's message-endpoint budget: 10 requests every 30 seconds.
	pub const DEFAULT: Self = Self { capacity: 10, period: Duration::from_secs(30) };

	/// Creates a new rate limit.
	pub const fn new(capacity: usize, period: Duration) -> Self {
		Self { capacity, period }
	}
}
impl Default for RateLimit {
	fn default() -> Self {
		Self::DEFAULT
	}
}

/// Builder for [`FeedClient`] values.
#[derive(Debug)]
pub struct FeedClientBuilder {
	/// Bearer token sent with every request.
	pub token: BearerToken,
	/// Service root; [`DEFAULT_BASE_URL`] when unset.
	pub base_url: Option<Url>,
	/// Settings for a client-owned limiter.
	pub rate_limit: RateLimit,
	/// Shared limiter that overrides [`rate_limit`](Self::rate_limit) when set.
	pub limiter: Option<Arc<TokenBucketLimiter>>,
	/// Per-request timeout applied by [`build`](Self::build); custom transports manage their own.
	pub timeout: Option<Duration>,
}
impl FeedClientBuilder {
	/// Creates a new builder for the provided token.
	pub fn new(token: impl Into<BearerToken>) -> Self {
		Self {
			token: token.into(),
			base_url: None,
			rate_limit: RateLimit::default(),
			limiter: None,
			timeout: None,
		}
	}

	/// Sets the service root.
	pub fn base_url(mut self, url: Url) -> Self {
		self.base_url = Some(url);

		self
	}

	/// Sets the client-owned limiter to `capacity` requests per `period`.
	pub fn rate_limit(mut self, capacity: usize, period: Duration) -> Self {
		self.rate_limit = RateLimit::new(capacity, period);

		self
	}

	/// Shares an existing limiter instead of creating one.
	pub fn limiter(mut self, limiter: Arc<TokenBucketLimiter>) -> Self {
		self.limiter = Some(limiter);

		self
	}

	/// Sets the per-request timeout used by the reqwest transport.
	pub fn timeout(mut self, timeout: Duration) -> Self {
		self.timeout = Some(timeout);

		self
	}

	/// Validates the configuration and wires `http_client` behind a rate-limited transport.
	///
	/// Creating a client-owned limiter requires a tokio runtime.
	pub fn build_with_http_client<C>(self, http_client: impl Into<Arc<C>>) -> Result<FeedClient<C>>
	where
		C: ?Sized + FeedHttpClient,
	{
		let base_url = match self.base_url {
			Some(url) => url,
			None => Url::parse(DEFAULT_BASE_URL).map_err(|source| {
				ConstructionError::InvalidEndpoint { path: DEFAULT_BASE_URL.into(), source }
			})?,
		};

		self.token.header_value()?;

		let limiter = match self.limiter {
			Some(limiter) => limiter,
			None => Arc::new(TokenBucketLimiter::new(
				self.rate_limit.capacity,
				self.rate_limit.period,
			)?),
		};
		let transport = RateLimitedTransport::new(http_client, limiter);

		Ok(FeedClient::with_transport(normalize_base(base_url), self.token, transport))
	}

	/// Builds a reqwest-backed client.
	#[cfg(feature = "reqwest")]
	pub fn build(self) -> Result<FeedClient<ReqwestHttpClient>> {
		let http_client = match self.timeout {
			Some(timeout) => ReqwestHttpClient::with_timeout(timeout)?,
			None => ReqwestHttpClient::default(),
		};

		self.build_with_http_client(http_client)
	}
}

/// Ensures the base path ends with `/` so resource paths are appended to it.
fn normalize_base(mut url: Url) -> Url {
	if !url.cannot_be_a_base() && !url.path().ends_with('/') {
		let path = format!("{}/", url.path());

		url.set_path(&path);
	}

	url
}
