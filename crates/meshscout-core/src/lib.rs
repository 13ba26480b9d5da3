// meshscout-core: the node-discovery pipeline between meshscout-api and
// consumers (CLI, reporting).
//
// The analyzer API has no "active nodes in region X" endpoint, so the
// pipeline reconstructs that answer from two inconsistent sources: the
// bulk nodes index (primary) and the advert packet stream (fallback),
// region- and recency-filtered locally, deduplicated by public key, and
// optionally enriched with per-node advert history.

pub mod convert;
pub mod discover;
pub mod enrich;
pub mod extract;
pub mod filter;
pub mod model;
pub mod pipeline;

// ── Primary re-exports ──────────────────────────────────────────────
pub use discover::{DiscoveryMap, SEED_NODES_SEA, discover};
pub use enrich::{ModeSummary, Snapshot, enrich};
pub use pipeline::{fetch_region_nodes, fetch_specific_nodes};

// Re-export model types at the crate root for ergonomics.
pub use model::{Advert, DeviceMode, Location, NodeRecord, PublicKey, RegionSpec, VALID_REGIONS, known_groups};
