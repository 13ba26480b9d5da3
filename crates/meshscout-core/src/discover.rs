// ── Node discovery engine ──
//
// Two strategies, run as an explicit try-primary / try-fallback sequence:
//
//   A. Nodes index: one bulk fetch, filtered locally by each entry's
//      region set and last_seen. Richest fields.
//   B. Packet scan: a window of recent advert packets, filtered locally,
//      one provisional record per unique key. Used ONLY when A yields
//      no usable list at all -- an index that IS available but filters
//      down to zero is a legitimate "no nodes in region" answer.
//
// Both strategies dedup strictly by canonical public key; repeats keep
// the earlier record and may only fill still-unknown fields.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use indexmap::map::Entry;
use tracing::{info, warn};

use meshscout_api::AnalyzerClient;

use crate::convert;
use crate::filter;
use crate::model::{Advert, NodeRecord, PublicKey, RegionSpec};

/// Discovery results, keyed by canonical public key. Insertion order is
/// preserved so enrichment processes nodes in the order they were found.
pub type DiscoveryMap = IndexMap<PublicKey, NodeRecord>;

/// Known nodes in the SEA area, used to bootstrap discovery of the home
/// regions when the live API has nothing.
pub const SEED_NODES_SEA: [&str; 2] = [
    // VE7RSC North Repeater
    "077E8710C40E04634037CF75CEEC2A2F0F6733BFBB49A720EC44BBE9E6738830",
    // HOWL Repeater
    "010101C0CDAF7A46D0E4B8B2E1EFD8143F6896E7AC264233686C1BDCFB17205",
];

/// Page size for the one-shot bulk index fetch.
const NODE_INDEX_LIMIT: u32 = 10_000;

/// Window size for the fallback packet scan.
const PACKET_SCAN_LIMIT: u32 = 10_000;

/// Discover the nodes active in `spec` since `since`.
///
/// Never fails: upstream unavailability degrades to the fallback
/// strategy, and if that also yields nothing the result is simply empty
/// (plus seeds for home regions).
pub async fn discover(
    client: &AnalyzerClient,
    spec: &RegionSpec,
    since: DateTime<Utc>,
) -> DiscoveryMap {
    info!(region = spec.name(), "fetching nodes index");

    let index = match client.list_nodes(NODE_INDEX_LIMIT).await {
        Ok(Some(resp)) => {
            let (nodes, meta) = resp.into_parts();
            if let Some(total) = meta.and_then(|m| m.total_count) {
                info!("API reports {total} total nodes, {} returned", nodes.len());
            }
            nodes
        }
        Ok(None) => Vec::new(),
        Err(e) => {
            warn!("nodes index fetch failed: {e}");
            Vec::new()
        }
    };

    if index.is_empty() {
        warn!("nodes index unavailable, falling back to packet discovery");
        return discover_from_packets(client, spec, since).await;
    }

    let mut discovered = DiscoveryMap::new();
    for entry in index {
        let Some(record) = convert::node_entry_to_record(entry) else {
            continue;
        };
        if !filter::in_scope(&record.regions_seen, record.last_seen, spec, since) {
            continue;
        }
        merge_into(&mut discovered, record);
    }

    info!(
        count = discovered.len(),
        regions = ?spec.codes(),
        "nodes matched from index"
    );
    discovered
}

/// Strategy B: enumerate candidates from the advert packet stream.
///
/// Fetches unfiltered by region -- the analyzer's `region` parameter is
/// unreliable for the packet endpoint -- and re-filters every packet
/// locally by region and heard_at.
async fn discover_from_packets(
    client: &AnalyzerClient,
    spec: &RegionSpec,
    since: DateTime<Utc>,
) -> DiscoveryMap {
    info!(regions = ?spec.codes(), "discovering nodes from advert packets");

    let packets = match client.advert_packets(PACKET_SCAN_LIMIT, None).await {
        Ok(Some(packets)) => packets,
        Ok(None) => Vec::new(),
        Err(e) => {
            warn!("advert packet fetch failed: {e}");
            Vec::new()
        }
    };

    let mut discovered = DiscoveryMap::new();
    for raw in packets {
        let advert = Advert::from(raw);
        if !filter::in_scope(&advert.regions, advert.heard_at, spec, since) {
            continue;
        }
        let Some(key) = advert.public_key.clone() else {
            continue;
        };

        let mut record = NodeRecord::new(key);
        if let Some(name) = advert.name.filter(|n| !n.is_empty()) {
            record.name = name;
        }
        record.mode = advert.mode;
        record.location = advert.location;
        record.last_seen = advert.heard_at;
        record.regions_seen = advert.regions;
        merge_into(&mut discovered, record);
    }
    info!(count = discovered.len(), "unique nodes from packets");

    // Seeds go in last and only when absent, so any real observation of
    // a seed key above already won.
    if spec.is_home() {
        info!("adding {} seed nodes", SEED_NODES_SEA.len());
        for pk in SEED_NODES_SEA {
            let key = PublicKey::new(pk);
            discovered
                .entry(key.clone())
                .or_insert_with(|| NodeRecord::placeholder(key));
        }
    }

    discovered
}

/// Insert or fill-merge one record, keyed by its canonical public key.
fn merge_into(map: &mut DiscoveryMap, record: NodeRecord) {
    match map.entry(record.public_key.clone()) {
        Entry::Occupied(mut occupied) => occupied.get_mut().merge_missing_from(&record),
        Entry::Vacant(vacant) => {
            vacant.insert(record);
        }
    }
}
