//! Per-page query parameters for feed endpoints.

// self
use crate::{_prelude::*, feed::MessageId};

/// How the service should thread messages in a feed page.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ThreadingMode {
	/// No `threaded` parameter; every message is listed.
	#[default]
	None,
	/// Thread starters plus their two latest replies (`threaded=extended`).
	Extended,
	/// Thread starters only (`threaded=true`).
	TopOnly,
}
impl ThreadingMode {
	/// Returns the `threaded` parameter value, if any.
	pub const fn as_param(self) -> Option<&'static str> {
		match self {
			ThreadingMode::None => None,
			ThreadingMode::Extended => Some("extended"),
			ThreadingMode::TopOnly => Some("true"),
		}
	}
}

/// Query for a single feed page. Only fields that are set are sent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FeedQuery {
	/// Return messages older than this identifier.
	pub older_than: Option<MessageId>,
	/// Return messages newer than this identifier.
	pub newer_than: Option<MessageId>,
	/// Threading mode.
	pub threaded: ThreadingMode,
	/// Maximum number of messages in the page.
	pub limit: Option<NonZeroU32>,
}
impl FeedQuery {
	/// Creates an empty query.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the `older_than` cursor.
	pub fn older_than(mut self, id: MessageId) -> Self {
		self.older_than = Some(id);

		self
	}

	/// Sets the `newer_than` cursor.
	pub fn newer_than(mut self, id: MessageId) -> Self {
		self.newer_than = Some(id);

		self
	}

	/// Sets the threading mode.
	pub fn threaded(mut self, mode: ThreadingMode) -> Self {
		self.threaded = mode;

		self
	}

	/// Sets the page size limit.
	pub fn limit(mut self, limit: NonZeroU32) -> Self {
		self.limit = Some(limit);

		self
	}

	/// Returns the URL parameters for every set field.
	///
	/// Zero cursors count as unset and are never sent.
	pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
		let mut pairs = Vec::with_capacity(4);

		if let Some(id) = self.older_than.filter(|id| !id.is_unset()) {
			pairs.push(("older_than", id.to_string()));
		}
		if let Some(id) = self.newer_than.filter(|id| !id.is_unset()) {
			pairs.push(("newer_than", id.to_string()));
		}
		if let Some(mode) = self.threaded.as_param() {
			pairs.push(("threaded", mode.to_owned()));
		}
		if let Some(limit) = self.limit {
			pairs.push(("limit", limit.to_string()));
		}

		pairs
	}

	/// Appends the set parameters to `url`, leaving it untouched when nothing is set.
	pub fn append_to(&self, url: &mut Url) {
		let pairs = self.to_query_pairs();

		if pairs.is_empty() {
			return;
		}

		url.query_pairs_mut().extend_pairs(pairs);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn base() -> Url {
		Url::parse("https://www.yammer.com/api/v1/messages/inbox.json")
			.expect("Static feed URL should parse.")
	}

	fn limit(value: u32) -> NonZeroU32 {
		NonZeroU32::new(value).expect("Test limit should be non-zero.")
	}

	#[test]
	fn limit_only_query_encodes_only_limit() {
		let mut url = base();

		FeedQuery::new().limit(limit(20)).append_to(&mut url);

		let pairs = url.query_pairs().into_owned().collect::<Vec<_>>();

		assert_eq!(pairs, [("limit".to_owned(), "20".to_owned())]);
	}

	#[test]
	fn empty_query_leaves_url_untouched() {
		let mut url = base();

		FeedQuery::new().append_to(&mut url);

		assert_eq!(url, base());
		assert_eq!(url.query(), None);
	}

	#[test]
	fn zero_cursors_are_never_sent() {
		let query = FeedQuery::new().older_than(MessageId::new(0)).newer_than(MessageId::new(0));

		assert!(query.to_query_pairs().is_empty());
	}

	#[test]
	fn every_field_is_encoded_in_order() {
		let query = FeedQuery::new()
			.older_than(MessageId::new(80))
			.newer_than(MessageId::new(50))
			.threaded(ThreadingMode::Extended)
			.limit(limit(5));

		assert_eq!(
			query.to_query_pairs(),
			[
				("older_than", "80".to_owned()),
				("newer_than", "50".to_owned()),
				("threaded", "extended".to_owned()),
				("limit", "5".to_owned()),
			]
		);
	}

	#[test]
	fn threading_modes_map_to_service_values() {
		assert_eq!(ThreadingMode::None.as_param(), None);
		assert_eq!(ThreadingMode::Extended.as_param(), Some("extended"));
		assert_eq!(ThreadingMode::TopOnly.as_param(), Some("true"));
	}
}
