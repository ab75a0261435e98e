//! Optional observability helpers for feed requests and the rate limiter.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `yammer_feed.request` with the `operation`
//!   and `stage` (resource) fields, plus debug events for every aggregated page and refill tick.
//! - Enable `metrics` to increment the `yammer_feed_operation_total` counter for every
//!   attempt/success/failure, labeled by `operation` + `outcome`, and the
//!   `yammer_feed_permits_refilled_total` counter for permits returned to the bucket.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Client operations observed by the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FeedOperation {
	/// Single-page fetch.
	Fetch,
	/// Paginated catch-up run.
	Sync,
}
impl FeedOperation {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FeedOperation::Fetch => "fetch",
			FeedOperation::Sync => "sync",
		}
	}
}
impl Display for FeedOperation {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationOutcome {
	/// Entry to a client operation.
	Attempt,
	/// Completed without error.
	Success,
	/// Error returned to the caller (possibly with partial data).
	Failure,
}
impl OperationOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OperationOutcome::Attempt => "attempt",
			OperationOutcome::Success => "success",
			OperationOutcome::Failure => "failure",
		}
	}
}
impl Display for OperationOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
