//! Demonstrates plugging a custom HTTP client into the feed client.
//!
//! 1. Implement [`FeedHttpClient`] for any type that can turn an [`HttpRequest`] into an
//!    [`HttpResponse`]; here an in-memory group feed answers cursor queries itself.
//! 2. Hand it to [`FeedClientBuilder::build_with_http_client`] together with a rate limit.
//! 3. Run a catch-up sync and inspect the merged feed, then repeat against a client whose
//!    transport always fails to see how partial results are reported.

// std
use std::{
	error::Error as StdError,
	fmt::{Display, Formatter, Result as FmtResult},
	sync::Arc,
	time::Duration,
};
// crates.io
use color_eyre::Result;
// self
use yammer_feed::{
	FeedClient, FeedClientBuilder, GroupId, MessageId,
	http::{FeedHttpClient, HttpFuture, HttpRequest, HttpResponse},
	url::{Url, form_urlencoded},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let base_url = Url::parse("https://yammer.internal.example.com")?;
	let feed = Arc::new(InMemoryGroupFeed::new((1..=25).rev()));
	let client: FeedClient<InMemoryGroupFeed> = FeedClientBuilder::new("demo-token")
		.base_url(base_url.clone())
		.rate_limit(3, Duration::from_millis(200))
		.build_with_http_client(Arc::clone(&feed))?;
	let merged = client.group_feed_since(GroupId::new(7), Some(MessageId::new(10))).await;
	let ids = merged.feed.message_ids().map(MessageId::get).collect::<Vec<_>>();

	println!("Collected {} messages newer than 10: {ids:?}.", ids.len());
	println!("The in-memory feed answered {} page requests.", feed.served());

	let failing: FeedClient<Unreachable> = FeedClientBuilder::new("demo-token")
		.base_url(base_url)
		.build_with_http_client(Unreachable)?;
	let (partial, error) =
		failing.group_feed_since(GroupId::new(7), Some(MessageId::new(10))).await.into_parts();

	match error {
		Some(e) => println!("Sync stopped with {} messages collected: {e}", partial.len()),
		None => println!("Failing transport unexpectedly produced a feed."),
	}

	Ok(())
}

#[derive(Debug)]
struct Unreachable;
impl Display for Unreachable {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("network is unreachable")
	}
}
impl StdError for Unreachable {}
impl FeedHttpClient for Unreachable {
	type TransportError = Unreachable;

	fn execute(&self, _request: HttpRequest) -> HttpFuture<'_, Self::TransportError> {
		Box::pin(async { Err(Unreachable) })
	}
}

/// Serves a newest-first list of message ids, honoring `older_than`, `newer_than`, and `limit`.
struct InMemoryGroupFeed {
	ids: Vec<u64>,
	served: parking_lot::Mutex<usize>,
}
impl InMemoryGroupFeed {
	const PAGE_SIZE: usize = 4;

	fn new(ids: impl IntoIterator<Item = u64>) -> Self {
		Self { ids: ids.into_iter().collect(), served: Default::default() }
	}

	fn served(&self) -> usize {
		*self.served.lock()
	}

	fn page(&self, request: &HttpRequest) -> Vec<u64> {
		let query = request.uri().query().unwrap_or_default();
		let param = |name: &str| {
			form_urlencoded::parse(query.as_bytes())
				.find(|(key, _)| key == name)
				.and_then(|(_, value)| value.parse::<u64>().ok())
		};
		let older_than = param("older_than").unwrap_or(u64::MAX);
		let newer_than = param("newer_than").unwrap_or(0);
		let limit = param("limit").map_or(Self::PAGE_SIZE, |limit| limit as usize);

		self.ids
			.iter()
			.copied()
			.filter(|id| *id < older_than && *id > newer_than)
			.take(limit)
			.collect()
	}
}
impl FeedHttpClient for InMemoryGroupFeed {
	type TransportError = Unreachable;

	fn execute(&self, request: HttpRequest) -> HttpFuture<'_, Self::TransportError> {
		*self.served.lock() += 1;

		let messages = self
			.page(&request)
			.into_iter()
			.map(|id| serde_json::json!({ "id": id, "body": { "plain": format!("message {id}") } }))
			.collect::<Vec<_>>();
		let body = serde_json::json!({ "messages": messages, "references": [] }).to_string();

		Box::pin(async move { Ok(HttpResponse::new(body.into_bytes())) })
	}
}
