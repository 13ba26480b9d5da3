// ── Per-node enrichment and summary aggregation ──

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use meshscout_api::AnalyzerClient;

use crate::discover::DiscoveryMap;
use crate::extract;
use crate::filter;
use crate::model::{Advert, DeviceMode, NodeRecord, RegionSpec};

/// How many adverts a discovery-run record keeps.
pub const RECENT_ADVERTS_KEPT: usize = 5;

/// Per-node advert history page size during enrichment.
const DETAIL_FETCH_LIMIT: u32 = 100;

/// Pause between per-node detail fetches. Detail fetches fan out one
/// request per discovered node, so the run stays deliberately sequential
/// and polite to the analyzer instead of optimizing wall-clock time.
const POLITENESS_DELAY: Duration = Duration::from_millis(300);

/// Final node counts by device mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ModeSummary {
    pub total: usize,
    pub repeaters: usize,
    pub companions: usize,
    pub rooms: usize,
    pub other: usize,
}

impl ModeSummary {
    /// Tally records by the four-way mode partition.
    pub fn tally(nodes: &[NodeRecord]) -> Self {
        let mut summary = Self {
            total: nodes.len(),
            ..Self::default()
        };
        for node in nodes {
            match node.mode {
                DeviceMode::Repeater => summary.repeaters += 1,
                DeviceMode::Companion => summary.companions += 1,
                DeviceMode::RoomServer => summary.rooms += 1,
                DeviceMode::Unknown => summary.other += 1,
            }
        }
        summary
    }
}

/// The snapshot handed to reporting/storage: the sole data handoff out
/// of the pipeline. How it is persisted or displayed is the caller's
/// concern.
#[derive(Debug, Serialize)]
pub struct Snapshot {
    pub fetched_at: DateTime<Utc>,
    pub region: String,
    pub target_regions: Vec<String>,
    pub days: u32,
    pub summary: ModeSummary,
    pub nodes: Vec<NodeRecord>,
}

impl Snapshot {
    pub fn new(spec: &RegionSpec, days: u32, nodes: Vec<NodeRecord>) -> Self {
        Self {
            fetched_at: Utc::now(),
            region: spec.name().to_owned(),
            target_regions: spec.codes().to_vec(),
            days,
            summary: ModeSummary::tally(&nodes),
            nodes,
        }
    }
}

/// Enrich each discovered record with its recent advert history and
/// aggregate the final mode summary.
///
/// With `fetch_detail` off, records pass through unchanged (and no
/// politeness delays apply). Otherwise, per node:
/// - at least one advert survives the region/time filter: the record is
///   rebuilt by the extractor from the surviving adverts, then
///   `mqtt_connected` and `first_seen` -- which adverts cannot know --
///   are spliced back in from the discovered record;
/// - adverts exist but none survive: the node is dropped ("not actually
///   active in scope");
/// - no adverts at all (404, empty, or the fetch failed): the discovered
///   record is kept as-is. A single node's failure never aborts the run.
pub async fn enrich(
    client: &AnalyzerClient,
    discovered: DiscoveryMap,
    spec: &RegionSpec,
    since: DateTime<Utc>,
    fetch_detail: bool,
) -> (Vec<NodeRecord>, ModeSummary) {
    let total = discovered.len();
    let mut results = Vec::with_capacity(total);

    for (i, (key, record)) in discovered.into_iter().enumerate() {
        info!("[{}/{total}] {} ({})", i + 1, record.name, key.abbrev());

        if !fetch_detail {
            results.push(record);
            continue;
        }

        let adverts: Vec<Advert> = match client.node_adverts(key.as_str(), DETAIL_FETCH_LIMIT).await
        {
            Ok(Some(raw)) => raw.into_iter().map(Advert::from).collect(),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(node = key.abbrev(), "advert fetch failed, keeping discovered data: {e}");
                Vec::new()
            }
        };

        if adverts.is_empty() {
            // No adverts available is not the same as "filtered out".
            info!(node = key.abbrev(), "no adverts fetched, using index data");
            results.push(record);
        } else {
            let surviving = filter::filter_adverts(&adverts, spec, since);
            match extract::extract(&surviving) {
                Some(mut enriched) => {
                    enriched.advert_count = surviving.len();
                    enriched.recent_adverts =
                        surviving.iter().take(RECENT_ADVERTS_KEPT).cloned().collect();
                    enriched.mqtt_connected = record.mqtt_connected;
                    enriched.first_seen = record.first_seen;
                    info!(
                        node = key.abbrev(),
                        mode = %enriched.mode,
                        adverts = enriched.advert_count,
                        "enriched"
                    );
                    results.push(enriched);
                }
                None if surviving.is_empty() => {
                    // Adverts exist but none match the window.
                    info!(node = key.abbrev(), "no adverts in region/time, dropping");
                }
                None => {
                    info!(node = key.abbrev(), "no usable adverts, dropping");
                }
            }
        }

        // Be nice to the analyzer between detail fetches.
        tokio::time::sleep(POLITENESS_DELAY).await;
    }

    let summary = ModeSummary::tally(&results);
    (results, summary)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::PublicKey;

    fn node(mode: DeviceMode) -> NodeRecord {
        let mut record = NodeRecord::new(PublicKey::new("AA"));
        record.mode = mode;
        record
    }

    #[test]
    fn summary_partitions_by_mode() {
        let nodes = vec![
            node(DeviceMode::Repeater),
            node(DeviceMode::Repeater),
            node(DeviceMode::Companion),
            node(DeviceMode::RoomServer),
            node(DeviceMode::Unknown),
        ];

        let summary = ModeSummary::tally(&nodes);

        assert_eq!(summary.total, 5);
        assert_eq!(summary.repeaters, 2);
        assert_eq!(summary.companions, 1);
        assert_eq!(summary.rooms, 1);
        assert_eq!(summary.other, 1);
    }

    #[test]
    fn snapshot_records_request_and_expansion() {
        let spec = RegionSpec::new("BC");
        let snapshot = Snapshot::new(&spec, 7, Vec::new());

        assert_eq!(snapshot.region, "BC");
        assert_eq!(snapshot.target_regions.len(), 6);
        assert_eq!(snapshot.days, 7);
        assert_eq!(snapshot.summary.total, 0);
    }
}
