// std
use std::sync::atomic::{AtomicU64, Ordering};
// self
use crate::auth::TokenGrant;

/// Thread-safe counters for token endpoint exchanges.
#[derive(Debug, Default)]
pub struct TokenMetrics {
	acquisitions: AtomicU64,
	refreshes: AtomicU64,
	failures: AtomicU64,
}
impl TokenMetrics {
	/// Returns the number of exchanges that used an acquisition grant.
	pub fn acquisitions(&self) -> u64 {
		self.acquisitions.load(Ordering::Relaxed)
	}

	/// Returns the number of exchanges that used the refresh grant.
	pub fn refreshes(&self) -> u64 {
		self.refreshes.load(Ordering::Relaxed)
	}

	/// Returns the number of exchanges that failed.
	pub fn failures(&self) -> u64 {
		self.failures.load(Ordering::Relaxed)
	}

	/// Returns the total number of token endpoint exchanges.
	pub fn exchanges(&self) -> u64 {
		self.acquisitions() + self.refreshes()
	}

	pub(crate) fn record_exchange(&self, grant: &TokenGrant) {
		let counter = match grant {
			TokenGrant::RefreshToken { .. } => &self.refreshes,
			_ => &self.acquisitions,
		};

		counter.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_failure(&self) {
		self.failures.fetch_add(1, Ordering::Relaxed);
	}
}
