// ── Top-level pipeline entry points ──

use chrono::{Duration, Utc};
use tracing::info;

use meshscout_api::AnalyzerClient;

use crate::discover;
use crate::enrich::{self, Snapshot};
use crate::extract;
use crate::filter;
use crate::model::{Advert, PublicKey, RegionSpec};

/// Adverts kept per node on the targeted-key path.
const TARGETED_ADVERTS_KEPT: usize = 10;

/// Advert page size on the targeted-key path.
const TARGETED_FETCH_LIMIT: u32 = 500;

/// One full discovery run: discover, enrich, snapshot.
///
/// `since` is computed exactly once here and reused for every filter
/// decision in the run, so comparisons stay consistent even when the
/// wall clock advances during a long fetch.
pub async fn fetch_region_nodes(
    client: &AnalyzerClient,
    spec: &RegionSpec,
    days: u32,
    fetch_detail: bool,
) -> Snapshot {
    let since = Utc::now() - Duration::days(i64::from(days));
    info!(
        region = spec.name(),
        regions = ?spec.codes(),
        since = %since.to_rfc3339(),
        "fetching nodes"
    );

    let discovered = discover::discover(client, spec, since).await;
    let (nodes, summary) = enrich::enrich(client, discovered, spec, since, fetch_detail).await;

    info!(
        total = summary.total,
        repeaters = summary.repeaters,
        companions = summary.companions,
        rooms = summary.rooms,
        other = summary.other,
        "discovery run complete"
    );

    Snapshot::new(spec, days, nodes)
}

/// Targeted path: skip discovery and fetch specific keys directly.
///
/// Keys whose adverts are absent or entirely out of scope produce no
/// record; the snapshot covers only keys with usable in-scope history.
pub async fn fetch_specific_nodes(
    client: &AnalyzerClient,
    keys: &[PublicKey],
    spec: &RegionSpec,
    days: u32,
) -> Snapshot {
    let since = Utc::now() - Duration::days(i64::from(days));
    let mut nodes = Vec::new();

    for key in keys {
        info!("fetching {}...", key.abbrev());

        let adverts: Vec<Advert> = match client
            .node_adverts(key.as_str(), TARGETED_FETCH_LIMIT)
            .await
        {
            Ok(Some(raw)) => raw.into_iter().map(Advert::from).collect(),
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(node = key.abbrev(), "advert fetch failed: {e}");
                Vec::new()
            }
        };

        let surviving = filter::filter_adverts(&adverts, spec, since);
        if let Some(mut record) = extract::extract(&surviving) {
            record.advert_count = surviving.len();
            record.recent_adverts = surviving
                .iter()
                .take(TARGETED_ADVERTS_KEPT)
                .cloned()
                .collect();
            info!(node = key.abbrev(), name = %record.name, mode = %record.mode, "found");
            nodes.push(record);
        }
    }

    Snapshot::new(spec, days, nodes)
}
