// meshscout-api: Async client for the letsmesh.net MeshCore analyzer API.
//
// The analyzer exposes three read-only surfaces this crate wraps:
// a bulk nodes index, per-node advert history, and a generic packet
// stream filterable by payload type. All responses are JSON.

pub mod client;
pub mod error;
pub mod models;
pub mod transport;

// ── Primary re-exports ──────────────────────────────────────────────
pub use client::{AnalyzerClient, DEFAULT_BASE_URL};
pub use error::Error;
pub use models::{DecodedPayload, IndexMeta, NodeEntry, NodesResponse, RawAdvert};
pub use transport::TransportConfig;
