//! Feed payloads as returned by the message endpoints.

// self
use crate::{_prelude::*, feed::MessageId};

/// Map of every message field other than `id`, kept verbatim.
pub type MessageFields = serde_json::Map<String, Value>;

/// One message; only the identifier is interpreted, every other field passes through untouched.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
	/// Identifier used as the pagination cursor.
	pub id: MessageId,
	/// Remaining message fields.
	#[serde(flatten)]
	pub fields: MessageFields,
}
impl Message {
	/// Creates a message with no extra fields.
	pub fn new(id: MessageId) -> Self {
		Self { id, fields: MessageFields::new() }
	}

	/// Adds or replaces a field.
	pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
		self.fields.insert(key.into(), value.into());

		self
	}

	/// Returns a field by name.
	pub fn field(&self, key: &str) -> Option<&Value> {
		self.fields.get(key)
	}
}

/// Opaque reference object (users, groups, threads) attached to a feed page.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Reference(pub Value);

/// One feed page, or the concatenation of several.
///
/// Messages arrive newest first within a page. Aggregation appends pages in fetch order and never
/// sorts or deduplicates.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Feed {
	/// Messages in service order.
	pub messages: Vec<Message>,
	/// Reference objects in service order.
	#[serde(default)]
	pub references: Vec<Reference>,
	/// Page metadata object; an aggregated feed keeps the first page's value.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub meta: Option<Value>,
}
impl Feed {
	/// Returns `true` when the feed holds no messages.
	pub fn is_empty(&self) -> bool {
		self.messages.is_empty()
	}

	/// Number of messages in the feed.
	pub fn len(&self) -> usize {
		self.messages.len()
	}

	/// Identifier of the last (oldest) message, the next page boundary.
	pub fn last_message_id(&self) -> Option<MessageId> {
		self.messages.last().map(|message| message.id)
	}

	/// Iterates message identifiers in feed order.
	pub fn message_ids(&self) -> impl Iterator<Item = MessageId> + '_ {
		self.messages.iter().map(|message| message.id)
	}

	/// Appends `page` after the current contents.
	pub fn append(&mut self, page: Feed) {
		let Feed { messages, references, meta } = page;

		self.messages.extend(messages);
		self.references.extend(references);

		if self.meta.is_none() {
			self.meta = meta;
		}
	}
}
