//! Authenticated feed client: builds one request per page, sends it through the rate-limited
//! transport, and decodes the response into a [`Feed`].

pub mod builder;

pub use builder::*;

// crates.io
use http::{
	Method, StatusCode,
	header::{ACCEPT, AUTHORIZATION},
};
// self
use crate::{
	_prelude::*,
	auth::BearerToken,
	error::{ConstructionError, DecodeError},
	feed::{Feed, FeedOutcome, FeedQuery, FeedResource, GroupId, MessageId},
	http::{FeedHttpClient, HttpRequest},
	limiter::TokenBucketLimiter,
	obs::{self, FeedOperation, FeedSpan, OperationOutcome},
	sync::FeedSync,
	transport::RateLimitedTransport,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport stack.
pub type ReqwestFeedClient = FeedClient<ReqwestHttpClient>;

/// Feed client bound to one service root, one bearer token, and one rate-limited transport.
///
/// All configuration lives on the instance. Two clients only share a limiter when they were
/// built with the same [`TokenBucketLimiter`] handle.
pub struct FeedClient<C>
where
	C: ?Sized + FeedHttpClient,
{
	base_url: Url,
	token: BearerToken,
	transport: RateLimitedTransport<C>,
}
impl<C> FeedClient<C>
where
	C: ?Sized + FeedHttpClient,
{
	/// Creates a client from already-assembled parts.
	///
	/// `base_url` is used as given; [`FeedClientBuilder`] additionally normalizes it to end in a
	/// slash so resource paths append rather than replace its last segment.
	pub fn with_transport(
		base_url: Url,
		token: impl Into<BearerToken>,
		transport: RateLimitedTransport<C>,
	) -> Self {
		Self { base_url, token: token.into(), transport }
	}

	/// Returns the service root.
	pub fn base_url(&self) -> &Url {
		&self.base_url
	}

	/// Returns the rate-limited transport.
	pub fn transport(&self) -> &RateLimitedTransport<C> {
		&self.transport
	}

	/// Returns the limiter gating this client.
	pub fn limiter(&self) -> &Arc<TokenBucketLimiter> {
		self.transport.limiter()
	}

	/// Builds the authenticated `GET` for `resource` with the set fields of `query`.
	pub fn build_request(
		&self,
		resource: &FeedResource,
		query: &FeedQuery,
	) -> Result<HttpRequest, ConstructionError> {
		let mut url = resource.url(&self.base_url)?;

		query.append_to(&mut url);

		let request = http::Request::builder()
			.method(Method::GET)
			.uri(url.as_str())
			.header(AUTHORIZATION, self.token.header_value()?)
			.header(ACCEPT, "application/json")
			.body(Vec::new())?;

		Ok(request)
	}

	/// Fetches one page of `resource`.
	///
	/// Failures come back as an empty feed plus the error; nothing is retried.
	pub async fn fetch(&self, resource: &FeedResource, query: &FeedQuery) -> FeedOutcome {
		const OPERATION: FeedOperation = FeedOperation::Fetch;

		let span = FeedSpan::new(OPERATION, resource.label());

		obs::record_operation_outcome(OPERATION, OperationOutcome::Attempt);

		let result = span.instrument(self.try_fetch(resource, query)).await;

		match &result {
			Ok(_) => obs::record_operation_outcome(OPERATION, OperationOutcome::Success),
			Err(_) => obs::record_operation_outcome(OPERATION, OperationOutcome::Failure),
		}

		FeedOutcome::from(result)
	}

	/// Fetches the first page of a group feed.
	pub async fn group_feed(&self, group: GroupId) -> FeedOutcome {
		self.group_feed_with(group, &FeedQuery::default()).await
	}

	/// Fetches one page of a group feed with explicit parameters.
	pub async fn group_feed_with(&self, group: GroupId, query: &FeedQuery) -> FeedOutcome {
		self.fetch(&FeedResource::Group(group), query).await
	}

	/// Fetches the first page of the inbox feed.
	pub async fn inbox_feed(&self) -> FeedOutcome {
		self.inbox_feed_with(&FeedQuery::default()).await
	}

	/// Fetches one page of the inbox feed with explicit parameters.
	pub async fn inbox_feed_with(&self, query: &FeedQuery) -> FeedOutcome {
		self.fetch(&FeedResource::Inbox, query).await
	}

	/// Collects every message of `resource` newer than `newer_than`, page by page.
	///
	/// An unset or zero cursor returns an empty feed without touching the network. See
	/// [`FeedSync`] for per-page options.
	pub async fn feed_since(
		&self,
		resource: FeedResource,
		newer_than: Option<MessageId>,
	) -> FeedOutcome {
		FeedSync::new(self, resource, newer_than).run().await
	}

	/// Collects every message of a group feed newer than `newer_than`.
	pub async fn group_feed_since(
		&self,
		group: GroupId,
		newer_than: Option<MessageId>,
	) -> FeedOutcome {
		self.feed_since(FeedResource::Group(group), newer_than).await
	}

	async fn try_fetch(&self, resource: &FeedResource, query: &FeedQuery) -> Result<Feed> {
		let request = self.build_request(resource, query)?;
		let response = self.transport.execute(request).await?;
		let status = response.status();

		if status.as_u16() >= 400 {
			return Err(Error::api(status));
		}

		decode_feed(status, response.body())
	}
}
impl<C> Clone for FeedClient<C>
where
	C: ?Sized + FeedHttpClient,
{
	fn clone(&self) -> Self {
		Self {
			base_url: self.base_url.clone(),
			token: self.token.clone(),
			transport: self.transport.clone(),
		}
	}
}
#[cfg(feature = "reqwest")]
impl FeedClient<ReqwestHttpClient> {
	/// Starts a builder for a reqwest-backed client.
	pub fn builder(token: impl Into<BearerToken>) -> FeedClientBuilder {
		FeedClientBuilder::new(token)
	}

	/// Creates a reqwest-backed client with the default service root and rate limit.
	///
	/// Must be called from within a tokio runtime.
	pub fn new(token: impl Into<BearerToken>) -> Result<Self> {
		FeedClientBuilder::new(token).build()
	}
}
impl<C> Debug for FeedClient<C>
where
	C: ?Sized + FeedHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("FeedClient")
			.field("base_url", &self.base_url.as_str())
			.field("token", &self.token)
			.field("transport", &self.transport)
			.finish()
	}
}

fn decode_feed(status: StatusCode, body: &[u8]) -> Result<Feed> {
	let mut deserializer = serde_json::Deserializer::from_slice(body);
	let feed = serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|source| DecodeError::Body { source, status: status.as_u16() })?;

	Ok(feed)
}
