//! Demo API over a WebhookDB-replicated Stripe dataset
//!
//! Two routes back the demo:
//! - `POST /create` proxies product creation to the Stripe API
//! - `GET /search` matches the replicated `data` payloads in Postgres
//!
//! Mutations always go through Stripe itself; reads never do. The searched
//! table is owned and kept current by an external WebhookDB ingestion
//! process, so this crate only ever reads it.

pub mod api;
pub mod config;
pub mod error;
pub mod search;
pub mod stripe;

pub use error::{Error, Result};
