// self
use crate::obs::{FeedOperation, OperationOutcome};

/// Records an operation outcome via the global metrics recorder (when enabled).
pub fn record_operation_outcome(operation: FeedOperation, outcome: OperationOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"yammer_feed_operation_total",
			"operation" => operation.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (operation, outcome);
	}
}

/// Records how many permits a refill tick returned to the bucket.
pub fn record_permits_refilled(added: usize) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("yammer_feed_permits_refilled_total").increment(added as u64);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = added;
	}
}
