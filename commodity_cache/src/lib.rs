//! Cache-aside pipeline serving commodity price series.
//!
//! A request for a commodity is answered from the document store while the stored
//! record is fresh, and refreshed from the upstream provider otherwise. Batches of
//! commodities are resolved concurrently, with failures isolated per key.
//!
//! Layout, leaves first:
//! - [`retention`] and [`record`]: trimming and building the stored document.
//! - [`freshness`]: whether a stored document can be served.
//! - [`store`]: the document store seam and the per-commodity gateway.
//! - [`orchestrator`]: single-key cache-aside resolution.
//! - [`fanout`]: concurrent batch resolution.
//! - [`request`]: request parsing and response shapes.

#![deny(missing_docs)]

pub mod clock;
pub mod config;
pub mod db;
pub mod fanout;
pub mod freshness;
pub mod orchestrator;
pub mod providers;
pub mod record;
pub mod request;
pub mod retention;
mod schema;
pub mod store;
