//! Feed domain types: identifiers, messages, page queries, resources, and outcomes.

pub mod id;
pub mod model;
pub mod outcome;
pub mod query;
pub mod resource;

pub use id::*;
pub use model::*;
pub use outcome::*;
pub use query::*;
pub use resource::*;
