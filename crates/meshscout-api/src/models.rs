// ── Raw analyzer response types ──
//
// Deliberately permissive: every field is optional or defaulted, because
// the analyzer serves a mix of current and legacy records and omits
// fields freely. Normalization into strong domain types happens in
// meshscout-core, not here.

use serde::Deserialize;

/// The `/nodes` endpoint answers either `{ "nodes": [...], "meta": {...} }`
/// or a bare array, depending on analyzer version. Accept both.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum NodesResponse {
    Envelope {
        #[serde(default)]
        nodes: Vec<NodeEntry>,
        #[serde(default)]
        meta: Option<IndexMeta>,
    },
    Bare(Vec<NodeEntry>),
}

impl NodesResponse {
    /// Flatten into the node list plus the envelope meta, if any.
    pub fn into_parts(self) -> (Vec<NodeEntry>, Option<IndexMeta>) {
        match self {
            Self::Envelope { nodes, meta } => (nodes, meta),
            Self::Bare(nodes) => (nodes, None),
        }
    }
}

/// Pagination metadata from the nodes index envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct IndexMeta {
    #[serde(default)]
    pub total_count: Option<i64>,
}

/// One entry from the bulk nodes index.
#[derive(Debug, Clone, Deserialize)]
pub struct NodeEntry {
    #[serde(default)]
    pub public_key: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub device_role: Option<String>,
    #[serde(default)]
    pub regions: Vec<String>,
    #[serde(default)]
    pub first_seen: Option<String>,
    #[serde(default)]
    pub last_seen: Option<String>,
    #[serde(default)]
    pub is_mqtt_connected: Option<bool>,
    #[serde(default)]
    pub location: Option<RawLocation>,
    #[serde(default)]
    pub decoded_payload: Option<DecodedPayload>,
}

/// One advert record, as returned both by `/nodes/{key}/adverts` and by
/// the `/packets?payload_type=Advert` stream (same wire shape).
#[derive(Debug, Clone, Deserialize)]
pub struct RawAdvert {
    #[serde(default)]
    pub regions: Vec<String>,
    #[serde(default)]
    pub heard_at: Option<String>,
    #[serde(default)]
    pub decoded_payload: Option<DecodedPayload>,
}

/// The analyzer's already-decoded advert payload.
#[derive(Debug, Clone, Deserialize)]
pub struct DecodedPayload {
    #[serde(default)]
    pub public_key: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    #[serde(default)]
    pub flags: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawLocation {
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
}
