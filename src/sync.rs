//! Cursor-driven catch-up over a paginated feed.
//!
//! [`FeedSync`] keeps `newer_than` fixed for the whole run and walks backwards through the feed:
//! each page's last (oldest) message becomes the next request's `older_than`. The run ends on the
//! first empty page or the first error. Pages are appended in fetch order as received; the run
//! neither sorts nor deduplicates, so whatever the service returns is passed through as is.

// self
use crate::{
	_prelude::*,
	client::FeedClient,
	feed::{Feed, FeedOutcome, FeedQuery, FeedResource, MessageId, ThreadingMode},
	http::FeedHttpClient,
	obs::{self, FeedOperation, FeedSpan, OperationOutcome},
};

/// Boxed future returned by [`PageSource::fetch_page`].
pub type PageFuture<'a> = Pin<Box<dyn Future<Output = FeedOutcome> + 'a + Send>>;

/// Anything that can fetch one feed page; implemented by [`FeedClient`].
pub trait PageSource
where
	Self: Send + Sync,
{
	/// Fetches one page of `resource` for `query`.
	fn fetch_page<'a>(&'a self, resource: &'a FeedResource, query: &'a FeedQuery)
	-> PageFuture<'a>;
}
impl<C> PageSource for FeedClient<C>
where
	C: ?Sized + FeedHttpClient,
{
	fn fetch_page<'a>(
		&'a self,
		resource: &'a FeedResource,
		query: &'a FeedQuery,
	) -> PageFuture<'a> {
		Box::pin(self.fetch(resource, query))
	}
}

/// One paginated run collecting every message newer than a cursor.
#[derive(Debug)]
pub struct FeedSync<'a, S>
where
	S: ?Sized + PageSource,
{
	source: &'a S,
	resource: FeedResource,
	newer_than: Option<MessageId>,
	threaded: ThreadingMode,
	limit: Option<NonZeroU32>,
}
impl<'a, S> FeedSync<'a, S>
where
	S: ?Sized + PageSource,
{
	/// Prepares a run over `resource` for messages newer than `newer_than`.
	pub fn new(source: &'a S, resource: FeedResource, newer_than: Option<MessageId>) -> Self {
		Self { source, resource, newer_than, threaded: ThreadingMode::None, limit: None }
	}

	/// Requests at most `limit` messages per page.
	pub fn limit(mut self, limit: NonZeroU32) -> Self {
		self.limit = Some(limit);

		self
	}

	/// Applies a threading mode to every page.
	pub fn threaded(mut self, mode: ThreadingMode) -> Self {
		self.threaded = mode;

		self
	}

	/// Runs the pagination loop to completion.
	///
	/// Without a lower bound (unset or zero cursor) the run ends immediately with an empty feed and
	/// issues no request. On error the feed holds every page merged before the failure.
	pub async fn run(self) -> FeedOutcome {
		const OPERATION: FeedOperation = FeedOperation::Sync;

		let span = FeedSpan::new(OPERATION, self.resource.label());

		obs::record_operation_outcome(OPERATION, OperationOutcome::Attempt);

		let outcome = span.instrument(self.drive()).await;

		if outcome.is_ok() {
			obs::record_operation_outcome(OPERATION, OperationOutcome::Success);
		} else {
			obs::record_operation_outcome(OPERATION, OperationOutcome::Failure);
		}

		outcome
	}

	async fn drive(self) -> FeedOutcome {
		let Some(newer_than) = self.newer_than.filter(|id| !id.is_unset()) else {
			return FeedOutcome::complete(Feed::default());
		};
		let mut combined = Feed::default();
		let mut pages = 0;
		let mut state = SyncState::Fetching { older_than: None };

		loop {
			state = match state {
				SyncState::Fetching { older_than } => {
					let query = self.page_query(newer_than, older_than);
					let (page, error) =
						self.source.fetch_page(&self.resource, &query).await.into_parts();

					pages += 1;

					match (error, page.last_message_id()) {
						(Some(e), _) => SyncState::Failed(e),
						(None, None) => SyncState::Done,
						(None, Some(boundary)) => {
							obs::trace_page(pages, page.len(), boundary);
							combined.append(page);

							SyncState::Fetching { older_than: Some(boundary) }
						},
					}
				},
				SyncState::Done => return FeedOutcome::complete(combined),
				SyncState::Failed(e) => return FeedOutcome::failed(combined, e),
			};
		}
	}

	fn page_query(&self, newer_than: MessageId, older_than: Option<MessageId>) -> FeedQuery {
		FeedQuery {
			older_than,
			newer_than: Some(newer_than),
			threaded: self.threaded,
			limit: self.limit,
		}
	}
}

enum SyncState {
	Fetching { older_than: Option<MessageId> },
	Done,
	Failed(Error),
}
