//! Transport primitives for feed requests.
//!
//! The module exposes [`FeedHttpClient`], the crate's only dependency on an HTTP stack. Requests
//! and responses are plain [`http`] values with in-memory bodies so custom transports (test fakes,
//! proxies, other client libraries) can plug in without touching the feed layer.

// std
#[cfg(feature = "reqwest")] use std::ops::Deref;
// self
use crate::_prelude::*;
#[cfg(feature = "reqwest")] use crate::error::ConstructionError;

/// Outbound request handed to a [`FeedHttpClient`].
pub type HttpRequest = http::Request<Vec<u8>>;
/// Fully buffered response returned by a [`FeedHttpClient`].
pub type HttpResponse = http::Response<Vec<u8>>;
/// Boxed future returned by [`FeedHttpClient::execute`].
pub type HttpFuture<'a, E> = Pin<Box<dyn Future<Output = Result<HttpResponse, E>> + 'a + Send>>;

/// Abstraction over HTTP transports capable of executing one request.
///
/// Implementations must be `Send + Sync + 'static` so a single transport can be shared behind an
/// `Arc` by every caller of a client. Any HTTP status, including 4xx and 5xx, is a successful
/// exchange at this layer; only connectivity problems should surface as
/// [`TransportError`](FeedHttpClient::TransportError).
pub trait FeedHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type TransportError: 'static + Send + Sync + StdError;

	/// Executes `request` and buffers the full response body.
	fn execute(&self, request: HttpRequest) -> HttpFuture<'_, Self::TransportError>;
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a client whose requests give up after `timeout`.
	pub fn with_timeout(timeout: Duration) -> Result<Self, ConstructionError> {
		let client = ReqwestClient::builder().timeout(timeout).build()?;

		Ok(Self(client))
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl FeedHttpClient for ReqwestHttpClient {
	type TransportError = ReqwestError;

	fn execute(&self, request: HttpRequest) -> HttpFuture<'_, Self::TransportError> {
		let client = self.0.clone();

		Box::pin(async move {
			let response = client.execute(request.try_into()?).await?;
			let status = response.status();
			let version = response.version();
			let headers = response.headers().to_owned();
			let mut response_new = HttpResponse::new(response.bytes().await?.to_vec());

			*response_new.status_mut() = status;
			*response_new.version_mut() = version;
			*response_new.headers_mut() = headers;

			Ok(response_new)
		})
	}
}
