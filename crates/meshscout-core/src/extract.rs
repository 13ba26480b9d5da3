// ── Advert extractor ──

use std::collections::BTreeSet;

use crate::model::{Advert, NodeRecord};

/// Project an ordered (newest-first) advert sequence into a node record.
///
/// Identity and metadata -- name, key, mode, location, flags, last_seen --
/// come from the single most-recent advert. `regions_seen` is the union
/// across ALL supplied adverts: a deliberate asymmetry, since region
/// coverage reflects the whole observed history while identity reflects
/// the latest observation.
///
/// `None` on empty input, or when the newest advert carries no key.
pub fn extract(adverts: &[Advert]) -> Option<NodeRecord> {
    let latest = adverts.first()?;
    let public_key = latest.public_key.clone()?;

    let regions_seen: BTreeSet<String> = adverts
        .iter()
        .flat_map(|a| a.regions.iter().cloned())
        .collect();

    let mut record = NodeRecord::new(public_key);
    if let Some(name) = latest.name.clone().filter(|n| !n.is_empty()) {
        record.name = name;
    }
    record.mode = latest.mode;
    record.location = latest.location;
    record.flags = latest.flags;
    record.last_seen = latest.heard_at;
    record.regions_seen = regions_seen;

    Some(record)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{Duration, Utc};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::{DeviceMode, PublicKey};

    fn advert(name: &str, regions: &[&str], days_ago: i64) -> Advert {
        Advert {
            public_key: Some(PublicKey::new("AB12")),
            name: Some(name.to_owned()),
            mode: DeviceMode::Repeater,
            location: None,
            flags: Some(1),
            regions: regions.iter().map(|r| (*r).to_owned()).collect(),
            heard_at: Some(Utc::now() - Duration::days(days_ago)),
        }
    }

    #[test]
    fn empty_input_is_none() {
        assert!(extract(&[]).is_none());
    }

    #[test]
    fn no_key_on_latest_is_none() {
        let mut a = advert("x", &["SEA"], 0);
        a.public_key = None;
        assert!(extract(&[a]).is_none());
    }

    #[test]
    fn identity_from_latest_regions_from_all() {
        let adverts = vec![
            advert("current name", &["SEA"], 0),
            advert("old name", &["PDX"], 3),
            advert("older name", &["SEA", "BLI"], 6),
        ];

        let record = extract(&adverts).unwrap();

        assert_eq!(record.name, "current name");
        assert_eq!(record.mode, DeviceMode::Repeater);
        assert_eq!(record.last_seen, adverts[0].heard_at);
        assert_eq!(
            record.regions_seen.iter().collect::<Vec<_>>(),
            ["BLI", "PDX", "SEA"]
        );
    }
}
