//! Feed endpoints exposed by the service.

// self
use crate::{_prelude::*, error::ConstructionError, feed::GroupId};

/// Feed endpoint to read from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FeedResource {
	/// Messages posted in one group.
	Group(GroupId),
	/// The authenticated user's inbox.
	Inbox,
}
impl FeedResource {
	/// Returns the endpoint path relative to the service root.
	pub fn path(&self) -> String {
		match self {
			FeedResource::Group(id) => format!("api/v1/messages/in_group/{id}.json"),
			FeedResource::Inbox => "api/v1/messages/inbox.json".into(),
		}
	}

	/// Returns a stable label suitable for span or metric fields.
	pub const fn label(&self) -> &'static str {
		match self {
			FeedResource::Group(_) => "group",
			FeedResource::Inbox => "inbox",
		}
	}

	/// Resolves the endpoint against `base`.
	pub fn url(&self, base: &Url) -> Result<Url, ConstructionError> {
		let path = self.path();

		base.join(&path).map_err(|source| ConstructionError::InvalidEndpoint { path, source })
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn resources_resolve_against_base() {
		let base = Url::parse("https://www.yammer.com/").expect("Static base URL should parse.");

		assert_eq!(
			FeedResource::Group(GroupId::new(7))
				.url(&base)
				.expect("Group feed URL should resolve.")
				.as_str(),
			"https://www.yammer.com/api/v1/messages/in_group/7.json"
		);
		assert_eq!(
			FeedResource::Inbox.url(&base).expect("Inbox URL should resolve.").as_str(),
			"https://www.yammer.com/api/v1/messages/inbox.json"
		);
	}

	#[test]
	fn opaque_base_is_a_construction_error() {
		let base = Url::parse("mailto:feeds@example.com").expect("Mailto URL should parse.");
		let err = FeedResource::Inbox.url(&base).expect_err("Opaque URLs cannot be joined.");

		assert!(matches!(err, ConstructionError::InvalidEndpoint { .. }));
	}
}
