// ── Region/time filter ──
//
// One pure predicate applied to everything discovery and enrichment
// touch: index entries, packets, and per-node adverts. The upstream
// API's own filters are either absent or unreliable, so every record
// is re-checked locally.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use crate::model::{Advert, RegionSpec};

/// Decide whether one record falls inside the target region set and the
/// recency window.
///
/// Two deliberately permissive policies (do not tighten on refactor):
/// - an empty region spec matches everything, including records that
///   carry no regions at all;
/// - a missing timestamp passes the time check. Legacy and partial
///   records are expected, and absence of a timestamp must never
///   silently exclude one. Unparseable timestamps were already mapped
///   to `None` during conversion and pass for the same reason.
///
/// The window's lower bound is inclusive: `heard_at == since` is kept.
pub fn in_scope(
    regions: &BTreeSet<String>,
    heard_at: Option<DateTime<Utc>>,
    spec: &RegionSpec,
    since: DateTime<Utc>,
) -> bool {
    if !spec.matches(regions) {
        return false;
    }
    match heard_at {
        Some(at) => at >= since,
        None => true,
    }
}

/// Keep only the adverts inside the region/time scope, preserving the
/// newest-first input order.
pub fn filter_adverts(adverts: &[Advert], spec: &RegionSpec, since: DateTime<Utc>) -> Vec<Advert> {
    adverts
        .iter()
        .filter(|a| in_scope(&a.regions, a.heard_at, spec, since))
        .cloned()
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;
    use crate::model::DeviceMode;

    fn set(codes: &[&str]) -> BTreeSet<String> {
        codes.iter().map(|c| (*c).to_owned()).collect()
    }

    #[test]
    fn time_lower_bound_is_inclusive() {
        let since = Utc::now();
        let spec = RegionSpec::any();

        assert!(in_scope(&set(&[]), Some(since), &spec, since));
        assert!(!in_scope(
            &set(&[]),
            Some(since - Duration::microseconds(1)),
            &spec,
            since
        ));
    }

    #[test]
    fn missing_timestamp_passes() {
        let spec = RegionSpec::new("SEA");
        assert!(in_scope(&set(&["SEA"]), None, &spec, Utc::now()));
    }

    #[test]
    fn empty_spec_is_universal() {
        let since = Utc::now() - Duration::days(7);
        let spec = RegionSpec::any();

        // One record with no regions at all, one with several.
        assert!(in_scope(&set(&[]), Some(Utc::now()), &spec, since));
        assert!(in_scope(
            &set(&["SEA", "PDX", "YVR"]),
            Some(Utc::now()),
            &spec,
            since
        ));
    }

    #[test]
    fn region_mismatch_excludes() {
        let since = Utc::now() - Duration::days(7);
        let spec = RegionSpec::new("SEA");
        assert!(!in_scope(&set(&["PDX"]), Some(Utc::now()), &spec, since));
    }

    #[test]
    fn filter_keeps_order() {
        let since = Utc::now() - Duration::days(7);
        let spec = RegionSpec::new("SEA");
        let advert = |name: &str, days_ago: i64| Advert {
            public_key: None,
            name: Some(name.to_owned()),
            mode: DeviceMode::Unknown,
            location: None,
            flags: None,
            regions: set(&["SEA"]),
            heard_at: Some(Utc::now() - Duration::days(days_ago)),
        };

        let adverts = vec![advert("a", 1), advert("b", 10), advert("c", 2)];
        let kept = filter_adverts(&adverts, &spec, since);

        let names: Vec<_> = kept.iter().filter_map(|a| a.name.as_deref()).collect();
        assert_eq!(names, ["a", "c"]);
    }
}
