//! # linkwatch-tracker
//!
//! The ingestion and classification pipeline: URL extraction, link
//! classification, update detection, and the per-chat ledger registry.
//!
//! Split into focused modules:
//! - `extract`: URL spans in free-form text
//! - `classify`: ordered host/path rule table mapping a URL to a category
//! - `detect`: keyword heuristic for important updates
//! - `ledger`: per-chat accumulated state
//! - `registry`: chat id → ledger map with register/record/populate
//! - `pipeline`: stream entry point
//! - `connect`: one-time metadata capture and backfill
//! - `report`: `/status` snapshot

pub mod classify;
pub mod connect;
pub mod detect;
pub mod extract;
pub mod ledger;
pub mod pipeline;
pub mod registry;
pub mod report;

pub use classify::{classify, classify_with_context, ClassifiedLink, LinkCategory};
pub use connect::{connect, ChatSnapshot, ConnectSummary};
pub use detect::is_update;
pub use extract::extract_urls;
pub use pipeline::on_message;
pub use ledger::{ChannelLedger, ChannelMetadata, Update};
pub use registry::{Ingested, Registry};
pub use report::{status, StatusReport};
