//! Rate-limited wrapper that gates every outbound request on a shared token bucket.

// crates.io
use http::{
	Method,
	header::{CONTENT_TYPE, HeaderValue},
};
use url::form_urlencoded;
// self
use crate::{
	_prelude::*,
	error::{ConstructionError, TransportError},
	http::{FeedHttpClient, HttpRequest, HttpResponse},
	limiter::TokenBucketLimiter,
};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// HTTP executor with the same verbs as a plain client, each taking one permit from the shared
/// [`TokenBucketLimiter`] before the request is dispatched.
///
/// Aggregate throughput across all verbs and all concurrent callers of one transport (and any
/// other transport handed the same limiter) is capped at `capacity` requests per period.
pub struct RateLimitedTransport<C>
where
	C: ?Sized + FeedHttpClient,
{
	http_client: Arc<C>,
	limiter: Arc<TokenBucketLimiter>,
}
impl<C> RateLimitedTransport<C>
where
	C: ?Sized + FeedHttpClient,
{
	/// Wraps `http_client` so every request first acquires a permit from `limiter`.
	pub fn new(http_client: impl Into<Arc<C>>, limiter: Arc<TokenBucketLimiter>) -> Self {
		Self { http_client: http_client.into(), limiter }
	}

	/// Returns the limiter gating this transport.
	pub fn limiter(&self) -> &Arc<TokenBucketLimiter> {
		&self.limiter
	}

	/// Returns the wrapped HTTP client.
	pub fn http_client(&self) -> &Arc<C> {
		&self.http_client
	}

	/// Acquires a permit, then executes `request` on the wrapped client.
	pub async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
		self.limiter.acquire().await?;

		self.http_client.execute(request).await.map_err(|e| TransportError::network(e).into())
	}

	/// Issues a `GET` for `url`.
	pub async fn get(&self, url: &Url) -> Result<HttpResponse> {
		self.execute(bodyless(Method::GET, url)?).await
	}

	/// Issues a `HEAD` for `url`.
	pub async fn head(&self, url: &Url) -> Result<HttpResponse> {
		self.execute(bodyless(Method::HEAD, url)?).await
	}

	/// Issues a `POST` with an arbitrary body and content type.
	pub async fn post(
		&self,
		url: &Url,
		content_type: &str,
		body: impl Into<Vec<u8>>,
	) -> Result<HttpResponse> {
		let content_type = HeaderValue::try_from(content_type)
			.map_err(|e| ConstructionError::HttpRequest(e.into()))?;
		let request = http::Request::builder()
			.method(Method::POST)
			.uri(url.as_str())
			.header(CONTENT_TYPE, content_type)
			.body(body.into())
			.map_err(ConstructionError::from)?;

		self.execute(request).await
	}

	/// Issues a `POST` whose body is `pairs`, form-urlencoded.
	pub async fn post_form<I, K, V>(&self, url: &Url, pairs: I) -> Result<HttpResponse>
	where
		I: IntoIterator,
		I::Item: std::borrow::Borrow<(K, V)>,
		K: AsRef<str>,
		V: AsRef<str>,
	{
		let body = form_urlencoded::Serializer::new(String::new()).extend_pairs(pairs).finish();

		self.post(url, FORM_CONTENT_TYPE, body).await
	}
}
impl<C> Clone for RateLimitedTransport<C>
where
	C: ?Sized + FeedHttpClient,
{
	fn clone(&self) -> Self {
		Self { http_client: Arc::clone(&self.http_client), limiter: Arc::clone(&self.limiter) }
	}
}
impl<C> Debug for RateLimitedTransport<C>
where
	C: ?Sized + FeedHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RateLimitedTransport").field("limiter", &self.limiter).finish()
	}
}

fn bodyless(method: Method, url: &Url) -> Result<HttpRequest, ConstructionError> {
	Ok(http::Request::builder().method(method).uri(url.as_str()).body(Vec::new())?)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::http::HttpFuture;

	#[derive(Debug)]
	struct Unreachable;
	impl Display for Unreachable {
		fn fmt(&self, f: &mut Formatter) -> FmtResult {
			f.write_str("Host unreachable.")
		}
	}
	impl StdError for Unreachable {}

	#[derive(Clone, Debug)]
	struct Recorded {
		method: Method,
		uri: String,
		content_type: Option<String>,
		body: Vec<u8>,
	}

	#[derive(Default)]
	struct RecordingHttpClient {
		requests: Mutex<Vec<Recorded>>,
		fail: bool,
	}
	impl RecordingHttpClient {
		fn failing() -> Self {
			Self { requests: Default::default(), fail: true }
		}

		fn recorded(&self) -> Vec<Recorded> {
			self.requests.lock().clone()
		}
	}
	impl FeedHttpClient for RecordingHttpClient {
		type TransportError = Unreachable;

		fn execute(&self, request: HttpRequest) -> HttpFuture<'_, Self::TransportError> {
			let content_type = request
				.headers()
				.get(CONTENT_TYPE)
				.and_then(|value| value.to_str().ok())
				.map(ToOwned::to_owned);

			self.requests.lock().push(Recorded {
				method: request.method().clone(),
				uri: request.uri().to_string(),
				content_type,
				body: request.body().clone(),
			});

			let fail = self.fail;

			Box::pin(async move {
				if fail {
					return Err(Unreachable);
				}

				Ok(HttpResponse::new(Vec::new()))
			})
		}
	}

	fn limiter(capacity: usize) -> Arc<TokenBucketLimiter> {
		Arc::new(
			TokenBucketLimiter::new(capacity, Duration::from_secs(3_600))
				.expect("Limiter should build inside a runtime."),
		)
	}

	fn url() -> Url {
		Url::parse("https://feeds.example.com/api/v1/messages.json")
			.expect("Static test URL should parse.")
	}

	#[tokio::test]
	async fn every_verb_takes_one_permit() {
		let client = Arc::new(RecordingHttpClient::default());
		let transport: RateLimitedTransport<RecordingHttpClient> =
			RateLimitedTransport::new(Arc::clone(&client), limiter(5));
		let url = url();
		let request = http::Request::get(url.as_str())
			.body(Vec::new())
			.expect("Static request should build.");

		transport.execute(request).await.expect("Execute should succeed.");
		transport.get(&url).await.expect("GET should succeed.");
		transport.head(&url).await.expect("HEAD should succeed.");
		transport
			.post(&url, "application/json", b"{}".to_vec())
			.await
			.expect("POST should succeed.");
		transport
			.post_form(&url, [("body", "hello world")])
			.await
			.expect("Form POST should succeed.");

		assert_eq!(transport.limiter().available(), 0);

		let recorded = client.recorded();
		let methods = recorded.iter().map(|r| r.method.clone()).collect::<Vec<_>>();

		assert_eq!(methods, [Method::GET, Method::GET, Method::HEAD, Method::POST, Method::POST]);
		assert!(recorded.iter().all(|r| r.uri == url.as_str()));
		assert_eq!(recorded[3].content_type.as_deref(), Some("application/json"));
		assert_eq!(recorded[4].content_type.as_deref(), Some(FORM_CONTENT_TYPE));
		assert_eq!(recorded[4].body, b"body=hello+world".to_vec());
	}

	#[tokio::test(start_paused = true)]
	async fn requests_beyond_capacity_wait_for_refill() {
		let client = Arc::new(RecordingHttpClient::default());
		let transport: RateLimitedTransport<RecordingHttpClient> =
			RateLimitedTransport::new(Arc::clone(&client), limiter(1));
		let url = url();

		transport.get(&url).await.expect("First GET should use the initial permit.");

		assert!(
			tokio::time::timeout(Duration::from_secs(60), transport.get(&url)).await.is_err(),
			"Second GET must wait for the next refill."
		);
		assert_eq!(client.recorded().len(), 1);
	}

	#[tokio::test]
	async fn closed_limiter_short_circuits_before_dispatch() {
		let client = Arc::new(RecordingHttpClient::default());
		let transport: RateLimitedTransport<RecordingHttpClient> =
			RateLimitedTransport::new(Arc::clone(&client), limiter(3));

		transport.limiter().close();

		let err = transport.get(&url()).await.expect_err("Closed limiter must reject requests.");

		assert!(matches!(err, Error::Transport(TransportError::LimiterClosed)));
		assert!(client.recorded().is_empty());
	}

	#[tokio::test]
	async fn transport_failures_map_to_network_errors() {
		let transport: RateLimitedTransport<RecordingHttpClient> =
			RateLimitedTransport::new(RecordingHttpClient::failing(), limiter(1));
		let err = transport.get(&url()).await.expect_err("Failing client should surface an error.");

		assert!(matches!(err, Error::Transport(TransportError::Network { .. })));
	}

	#[tokio::test]
	async fn invalid_content_type_is_a_construction_error() {
		let client = Arc::new(RecordingHttpClient::default());
		let transport: RateLimitedTransport<RecordingHttpClient> =
			RateLimitedTransport::new(Arc::clone(&client), limiter(1));
		let err = transport
			.post(&url(), "text/plain\n", Vec::new())
			.await
			.expect_err("Header values cannot contain newlines.");

		assert!(matches!(err, Error::Construction(ConstructionError::HttpRequest(_))));
		assert_eq!(transport.limiter().available(), 1);
	}
}
