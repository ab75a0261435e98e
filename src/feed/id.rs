//! Strongly typed numeric identifiers used by feed endpoints.

// std
use std::str::FromStr;
// self
use crate::_prelude::*;

macro_rules! def_id {
	($name:ident, $doc:literal, $kind:literal) => {
		#[doc = $doc]
		#[derive(
			Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
		)]
		#[serde(transparent)]
		pub struct $name(u64);
		impl $name {
			/// Wraps a raw identifier.
			pub const fn new(value: u64) -> Self {
				Self(value)
			}

			/// Returns the raw identifier.
			pub const fn get(self) -> u64 {
				self.0
			}

			/// Returns `true` for zero, which the service treats as "no identifier".
			pub const fn is_unset(self) -> bool {
				self.0 == 0
			}
		}
		impl From<u64> for $name {
			fn from(value: u64) -> Self {
				Self(value)
			}
		}
		impl From<$name> for u64 {
			fn from(value: $name) -> Self {
				value.0
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				write!(f, concat!($kind, "({})"), self.0)
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				Display::fmt(&self.0, f)
			}
		}
		impl FromStr for $name {
			type Err = std::num::ParseIntError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				s.parse().map(Self)
			}
		}
	};
}

def_id!(MessageId, "Service-assigned, monotonically increasing message identifier.", "MessageId");
def_id!(GroupId, "Identifier of a group whose feed can be fetched.", "GroupId");
