//! Typed HTTP client for the Gorse recommender system.
//!
//! Every endpoint of the Gorse REST API is available as a method on
//! [`GorseClient`] (async, reqwest) and, with the default `blocking`
//! feature, on [`blocking::GorseClient`]. Both share one request/response
//! contract (see [`contract`]): endpoints are described once as
//! [`Operation`] values and executed by either client.
//!
//! # Example
//!
//! ```no_run
//! use gorse_client::{GorseClient, ItemPatch, Labels, Result};
//!
//! # async fn example() -> Result<()> {
//! let client = GorseClient::new("http://127.0.0.1:8088", "api-key")?;
//!
//! client
//!     .insert_feedback("like", "100", "200", "2022-01-01T00:00:00Z")
//!     .await?
//!     .expect(1)?;
//!
//! let recommended = client.get_recommend("100").await?;
//! println!("{:?}", recommended);
//!
//! client
//!     .update_item("200", ItemPatch::new().labels(Labels::list(["x", "y"])))
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Errors
//!
//! Only a 200 status counts as success. Any other status becomes
//! [`Error::Api`] carrying the status and the raw body. Transport failures
//! (including timeouts) are [`Error::Http`] and are never retried.

pub mod api;
#[cfg(feature = "blocking")]
pub mod blocking;
pub mod client;
pub mod config;
pub mod contract;
pub mod error;
pub mod types;

pub use api::*;
pub use client::{ClientBuilder, GorseClient};
pub use config::ClientConfig;
pub use contract::{ApiRequest, Operation};
pub use error::{Error, Result};
pub use types::*;
