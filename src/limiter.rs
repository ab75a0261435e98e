//! Token-bucket limiter that caps how many operations may begin per refill period.
//!
//! The bucket starts full with `capacity` permits. [`TokenBucketLimiter::acquire`] waits for a
//! permit and consumes it for good; only the background refill task puts permits back. Every
//! period the refill task makes `capacity` single-permit top-off attempts, and an attempt that
//! finds the bucket full is dropped rather than saved for later. Throughput is therefore bursty:
//! up to `capacity` calls may start back to back right after a refill or an idle stretch.
//!
//! The refill task lives on the tokio runtime that was current at construction and stops when
//! the limiter is closed or dropped.

// crates.io
use tokio::{
	runtime::Handle,
	sync::Semaphore,
	task::JoinHandle,
	time::{self, Instant, MissedTickBehavior},
};
// self
use crate::{
	_prelude::*,
	error::{ConstructionError, TransportError},
	obs,
};

/// Process-local token bucket shared by every request issued through one transport.
///
/// A capacity of zero is accepted; every [`acquire`](Self::acquire) on such a limiter waits until
/// the limiter is closed.
pub struct TokenBucketLimiter {
	bucket: Arc<Bucket>,
	refill: Mutex<Option<JoinHandle<()>>>,
}
impl TokenBucketLimiter {
	/// Creates a full bucket with `capacity` permits and starts its refill task.
	///
	/// Must be called from within a tokio runtime.
	pub fn new(capacity: usize, period: Duration) -> Result<Self, ConstructionError> {
		if period.is_zero() {
			return Err(ConstructionError::ZeroRefillPeriod);
		}
		if capacity > Semaphore::MAX_PERMITS {
			return Err(ConstructionError::CapacityTooLarge {
				capacity,
				max: Semaphore::MAX_PERMITS,
			});
		}

		let runtime = Handle::try_current().map_err(|_| ConstructionError::MissingRuntime)?;
		let bucket = Arc::new(Bucket { permits: Semaphore::new(capacity), capacity, period });
		let refill = runtime.spawn(refill_loop(Arc::clone(&bucket)));

		Ok(Self { bucket, refill: Mutex::new(Some(refill)) })
	}

	/// Waits until a permit is available, then consumes it.
	///
	/// There is no timeout. The only failure is [`TransportError::LimiterClosed`], raised when the
	/// limiter is closed before or while waiting.
	pub async fn acquire(&self) -> Result<(), TransportError> {
		let permit =
			self.bucket.permits.acquire().await.map_err(|_| TransportError::LimiterClosed)?;

		permit.forget();

		Ok(())
	}

	/// Consumes a permit if one is available right now.
	pub fn try_acquire(&self) -> bool {
		match self.bucket.permits.try_acquire() {
			Ok(permit) => {
				permit.forget();

				true
			},
			Err(_) => false,
		}
	}

	/// Returns the number of permits currently in the bucket.
	pub fn available(&self) -> usize {
		self.bucket.permits.available_permits()
	}

	/// Returns the maximum number of permits the bucket holds.
	pub fn capacity(&self) -> usize {
		self.bucket.capacity
	}

	/// Returns the refill period.
	pub fn period(&self) -> Duration {
		self.bucket.period
	}

	/// Stops the refill task and closes the bucket.
	///
	/// Waiting and future [`acquire`](Self::acquire) calls fail with
	/// [`TransportError::LimiterClosed`]. Closing twice is a no-op.
	pub fn close(&self) {
		self.stop_refill();
		self.bucket.permits.close();
	}

	/// Returns `true` once [`close`](Self::close) has been called.
	pub fn is_closed(&self) -> bool {
		self.bucket.permits.is_closed()
	}

	fn stop_refill(&self) {
		if let Some(handle) = self.refill.lock().take() {
			handle.abort();
		}
	}
}
impl Drop for TokenBucketLimiter {
	fn drop(&mut self) {
		self.stop_refill();
	}
}
impl Debug for TokenBucketLimiter {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenBucketLimiter")
			.field("capacity", &self.bucket.capacity)
			.field("period", &self.bucket.period)
			.field("available", &self.available())
			.field("closed", &self.is_closed())
			.finish()
	}
}

struct Bucket {
	permits: Semaphore,
	capacity: usize,
	period: Duration,
}
impl Bucket {
	/// Makes one insert attempt per slot and returns how many permits were added.
	fn top_off(&self) -> usize {
		let mut added = 0;

		for _ in 0..self.capacity {
			// A full bucket swallows the slot; nothing carries over to the next tick.
			if self.permits.available_permits() < self.capacity {
				self.permits.add_permits(1);

				added += 1;
			}
		}

		added
	}
}

async fn refill_loop(bucket: Arc<Bucket>) {
	let mut ticker = time::interval_at(Instant::now() + bucket.period, bucket.period);

	ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

	loop {
		ticker.tick().await;

		let added = bucket.top_off();

		obs::record_permits_refilled(added);
		obs::trace_refill(added, bucket.permits.available_permits());
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::sync::atomic::{AtomicUsize, Ordering};
	// self
	use super::*;

	#[tokio::test(start_paused = true)]
	async fn bucket_starts_full() {
		let limiter = TokenBucketLimiter::new(3, Duration::from_secs(1))
			.expect("Limiter should build inside a runtime.");

		assert_eq!(limiter.available(), 3);

		for _ in 0..3 {
			assert!(limiter.try_acquire());
		}

		assert!(!limiter.try_acquire());
		assert_eq!(limiter.available(), 0);
	}

	#[tokio::test(start_paused = true)]
	async fn extra_acquire_waits_for_next_tick() {
		let start = Instant::now();
		let limiter = TokenBucketLimiter::new(2, Duration::from_secs(1))
			.expect("Limiter should build inside a runtime.");

		limiter.acquire().await.expect("First permit should be immediate.");
		limiter.acquire().await.expect("Second permit should be immediate.");

		assert_eq!(start.elapsed(), Duration::ZERO);
		assert!(
			time::timeout(Duration::from_millis(500), limiter.acquire()).await.is_err(),
			"Third permit must wait for the refill tick."
		);

		limiter.acquire().await.expect("Refill should release the waiting caller.");

		assert!(start.elapsed() >= Duration::from_secs(1));
	}

	#[tokio::test(start_paused = true)]
	async fn idle_ticks_do_not_accumulate_permits() {
		let limiter = TokenBucketLimiter::new(4, Duration::from_millis(100))
			.expect("Limiter should build inside a runtime.");

		time::sleep(Duration::from_secs(5)).await;

		assert_eq!(limiter.available(), 4);

		for _ in 0..4 {
			assert!(limiter.try_acquire());
		}

		assert!(!limiter.try_acquire());
	}

	#[tokio::test(start_paused = true)]
	async fn refill_restores_only_consumed_permits() {
		let limiter = TokenBucketLimiter::new(5, Duration::from_secs(1))
			.expect("Limiter should build inside a runtime.");

		for _ in 0..3 {
			assert!(limiter.try_acquire());
		}

		assert_eq!(limiter.available(), 2);

		time::sleep(Duration::from_millis(1_100)).await;

		assert_eq!(limiter.available(), 5);
	}

	#[test]
	fn top_off_discards_slots_when_full() {
		let bucket = Bucket {
			permits: Semaphore::new(3),
			capacity: 3,
			period: Duration::from_secs(1),
		};

		assert_eq!(bucket.top_off(), 0);
		assert_eq!(bucket.permits.available_permits(), 3);

		bucket.permits.try_acquire().expect("Fresh bucket should hand out a permit.").forget();

		assert_eq!(bucket.top_off(), 1);
		assert_eq!(bucket.permits.available_permits(), 3);
	}

	#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
	async fn concurrent_callers_never_share_a_permit() {
		let limiter = Arc::new(
			TokenBucketLimiter::new(5, Duration::from_secs(3_600))
				.expect("Limiter should build inside a runtime."),
		);
		let granted = Arc::new(AtomicUsize::new(0));
		let handles = (0..32)
			.map(|_| {
				let limiter = Arc::clone(&limiter);
				let granted = Arc::clone(&granted);

				tokio::spawn(async move {
					if limiter.try_acquire() {
						granted.fetch_add(1, Ordering::SeqCst);
					}
				})
			})
			.collect::<Vec<_>>();

		for handle in handles {
			handle.await.expect("Acquire task should not panic.");
		}

		assert_eq!(granted.load(Ordering::SeqCst), 5);
		assert_eq!(limiter.available(), 0);
	}

	#[tokio::test(start_paused = true)]
	async fn zero_capacity_waits_until_closed() {
		let limiter = Arc::new(
			TokenBucketLimiter::new(0, Duration::from_millis(10))
				.expect("Zero capacity should be accepted."),
		);

		assert!(!limiter.try_acquire());
		assert!(
			time::timeout(Duration::from_secs(10), limiter.acquire()).await.is_err(),
			"Zero capacity must never hand out a permit."
		);

		let waiter = {
			let limiter = Arc::clone(&limiter);

			tokio::spawn(async move { limiter.acquire().await })
		};

		tokio::task::yield_now().await;
		limiter.close();

		let result = waiter.await.expect("Waiting task should not panic.");

		assert!(matches!(result, Err(TransportError::LimiterClosed)));
	}

	#[tokio::test(start_paused = true)]
	async fn close_stops_refills_and_rejects_callers() {
		let limiter = TokenBucketLimiter::new(2, Duration::from_millis(100))
			.expect("Limiter should build inside a runtime.");

		limiter.close();
		limiter.close();

		assert!(limiter.is_closed());
		assert!(matches!(limiter.acquire().await, Err(TransportError::LimiterClosed)));
		assert!(!limiter.try_acquire());
		assert!(limiter.refill.lock().is_none());
	}

	#[tokio::test]
	async fn rejects_zero_period_and_oversized_capacity() {
		assert!(matches!(
			TokenBucketLimiter::new(1, Duration::ZERO),
			Err(ConstructionError::ZeroRefillPeriod)
		));
		assert!(matches!(
			TokenBucketLimiter::new(Semaphore::MAX_PERMITS + 1, Duration::from_secs(1)),
			Err(ConstructionError::CapacityTooLarge { .. })
		));
	}

	#[test]
	fn requires_a_runtime() {
		assert!(matches!(
			TokenBucketLimiter::new(1, Duration::from_secs(1)),
			Err(ConstructionError::MissingRuntime)
		));
	}
}
