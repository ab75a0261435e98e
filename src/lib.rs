//! Rate-limited client for Yammer message feeds: a token-bucket guard on every outbound request,
//! cursor-driven pagination that stitches feed pages back together, and a pluggable HTTP transport.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod client;
pub mod error;
pub mod feed;
pub mod http;
pub mod limiter;
pub mod obs;
pub mod sync;
pub mod transport;

pub use client::*;
pub use feed::*;
pub use limiter::TokenBucketLimiter;
pub use sync::{FeedSync, PageSource};
pub use transport::RateLimitedTransport;

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		num::NonZeroU32,
		pin::Pin,
		sync::Arc,
		time::Duration,
	};

	pub use parking_lot::Mutex;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use serde_json::Value;
	pub use thiserror::Error as ThisError;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
