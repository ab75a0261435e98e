// self
use crate::{_prelude::*, feed::MessageId, obs::FeedOperation};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedRequest<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedRequest<F> = F;

/// A span builder used by client operations.
#[derive(Clone, Debug)]
pub struct FeedSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl FeedSpan {
	/// Creates a new span tagged with the provided operation + stage.
	pub fn new(operation: FeedOperation, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span =
				tracing::info_span!("yammer_feed.request", operation = operation.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (operation, stage);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedRequest<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Emits a debug event for a page merged into an aggregated feed.
pub(crate) fn trace_page(page: usize, messages: usize, next_older_than: MessageId) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(page, messages, next_older_than = next_older_than.get(), "feed page merged");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (page, messages, next_older_than);
	}
}

/// Emits a debug event for a refill tick.
pub(crate) fn trace_refill(added: usize, available: usize) {
	#[cfg(feature = "tracing")]
	{
		tracing::trace!(added, available, "rate limiter refilled");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (added, available);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[tokio::test]
	async fn instrument_wraps_future() {
		let span = FeedSpan::new(FeedOperation::Sync, "instrument_wraps_future");
		let value = span.instrument(async { 42 }).await;

		assert_eq!(value, 42);
	}
}
