//! Result/error pair returned by feed operations.

// self
use crate::{_prelude::*, feed::Feed};

/// Feed paired with the error that ended the operation, if any.
///
/// The feed is always present: empty when a single fetch fails, and holding every page gathered
/// so far when a paginated run fails part way through.
#[derive(Debug, Default)]
pub struct FeedOutcome {
	/// Feed data collected by the operation.
	pub feed: Feed,
	/// Error that ended the operation.
	pub error: Option<Error>,
}
impl FeedOutcome {
	/// Successful outcome.
	pub fn complete(feed: Feed) -> Self {
		Self { feed, error: None }
	}

	/// Failed outcome carrying whatever was collected before `error`.
	pub fn failed(feed: Feed, error: Error) -> Self {
		Self { feed, error: Some(error) }
	}

	/// Returns `true` when no error occurred.
	pub fn is_ok(&self) -> bool {
		self.error.is_none()
	}

	/// Splits the outcome into its feed and optional error.
	pub fn into_parts(self) -> (Feed, Option<Error>) {
		(self.feed, self.error)
	}

	/// Converts into a [`Result`], dropping partial data on failure.
	pub fn into_result(self) -> Result<Feed> {
		match self.error {
			Some(e) => Err(e),
			None => Ok(self.feed),
		}
	}
}
impl From<Result<Feed>> for FeedOutcome {
	fn from(result: Result<Feed>) -> Self {
		match result {
			Ok(feed) => Self::complete(feed),
			Err(e) => Self::failed(Feed::default(), e),
		}
	}
}
