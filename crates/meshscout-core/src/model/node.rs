// ── Node domain types ──

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::key::PublicKey;

/// Name used when a node has never announced one.
pub const UNKNOWN_NAME: &str = "Unknown";

/// Name used for bootstrap seed placeholders (see `discover`).
pub const SEED_NAME: &str = "Unknown (seed)";

/// Declared role of a mesh device, from its advert payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
pub enum DeviceMode {
    Repeater,
    Companion,
    #[serde(rename = "Room Server")]
    #[strum(serialize = "Room Server")]
    RoomServer,
    Unknown,
}

/// Last reported position. Adverts may carry one coordinate without the
/// other, so both stay optional.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

impl Location {
    /// Build from optional coordinates; `None` when neither is known.
    pub fn from_coords(lat: Option<f64>, lon: Option<f64>) -> Option<Self> {
        if lat.is_none() && lon.is_none() {
            None
        } else {
            Some(Self { lat, lon })
        }
    }
}

/// One broadcast observation of a node. Immutable once fetched; ordering
/// within a node's sequence is newest first (source-provided order).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Advert {
    pub public_key: Option<PublicKey>,
    pub name: Option<String>,
    pub mode: DeviceMode,
    pub location: Option<Location>,
    pub flags: Option<u32>,
    pub regions: BTreeSet<String>,
    /// Missing or unparseable timestamps map to `None`, which the
    /// region/time filter treats as passing.
    pub heard_at: Option<DateTime<Utc>>,
}

/// The canonical per-device record produced by discovery and enrichment.
///
/// Created when a key is first observed by any strategy; later merges
/// only ever fill fields that are still unknown -- populated data is
/// never discarded for a blank.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeRecord {
    pub public_key: PublicKey,
    pub name: String,
    pub mode: DeviceMode,
    pub location: Option<Location>,
    pub device_role: Option<String>,
    pub flags: Option<u32>,
    pub regions_seen: BTreeSet<String>,
    pub first_seen: Option<DateTime<Utc>>,
    pub last_seen: Option<DateTime<Utc>>,
    pub mqtt_connected: Option<bool>,
    pub advert_count: usize,
    /// Newest first, bounded (5 from discovery runs, 10 for targeted
    /// key fetches).
    pub recent_adverts: Vec<Advert>,
}

impl NodeRecord {
    /// A record with nothing known beyond its key.
    pub fn new(public_key: PublicKey) -> Self {
        Self {
            public_key,
            name: UNKNOWN_NAME.to_owned(),
            mode: DeviceMode::Unknown,
            location: None,
            device_role: None,
            flags: None,
            regions_seen: BTreeSet::new(),
            first_seen: None,
            last_seen: None,
            mqtt_connected: None,
            advert_count: 0,
            recent_adverts: Vec::new(),
        }
    }

    /// Bootstrap placeholder for a seed key. Any later real observation
    /// of the same key wins over this on merge.
    pub fn placeholder(public_key: PublicKey) -> Self {
        Self {
            name: SEED_NAME.to_owned(),
            ..Self::new(public_key)
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.name == SEED_NAME
    }

    fn name_is_unknown(&self) -> bool {
        self.name.is_empty() || self.name == UNKNOWN_NAME || self.name == SEED_NAME
    }

    /// Fill-only merge: adopt `other`'s data wherever this record still
    /// holds a placeholder/unknown value, and union region coverage.
    /// Populated fields are never overwritten (monotonic enrichment).
    pub fn merge_missing_from(&mut self, other: &Self) {
        if self.name_is_unknown() && !other.name_is_unknown() {
            self.name.clone_from(&other.name);
        }
        if self.mode == DeviceMode::Unknown {
            self.mode = other.mode;
        }
        if self.location.is_none() {
            self.location = other.location;
        }
        if self.device_role.is_none() {
            self.device_role.clone_from(&other.device_role);
        }
        if self.flags.is_none() {
            self.flags = other.flags;
        }
        if self.first_seen.is_none() {
            self.first_seen = other.first_seen;
        }
        if self.last_seen.is_none() {
            self.last_seen = other.last_seen;
        }
        if self.mqtt_connected.is_none() {
            self.mqtt_connected = other.mqtt_connected;
        }
        if self.advert_count == 0 {
            self.advert_count = other.advert_count;
        }
        if self.recent_adverts.is_empty() {
            self.recent_adverts.clone_from(&other.recent_adverts);
        }
        self.regions_seen
            .extend(other.regions_seen.iter().cloned());
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn record(key: &str) -> NodeRecord {
        NodeRecord::new(PublicKey::new(key))
    }

    #[test]
    fn merge_fills_unknown_fields() {
        let mut earlier = record("AA");
        earlier.regions_seen.insert("SEA".into());

        let mut later = record("AA");
        later.name = "Cougar Mtn".into();
        later.mode = DeviceMode::Repeater;
        later.mqtt_connected = Some(true);
        later.regions_seen.insert("PDX".into());

        earlier.merge_missing_from(&later);

        assert_eq!(earlier.name, "Cougar Mtn");
        assert_eq!(earlier.mode, DeviceMode::Repeater);
        assert_eq!(earlier.mqtt_connected, Some(true));
        assert_eq!(
            earlier.regions_seen.iter().collect::<Vec<_>>(),
            ["PDX", "SEA"]
        );
    }

    #[test]
    fn merge_never_discards_populated_fields() {
        let mut earlier = record("AA");
        earlier.name = "North Hill".into();
        earlier.mode = DeviceMode::Companion;
        earlier.advert_count = 4;

        let mut later = record("AA");
        later.name = "Impostor".into();
        later.mode = DeviceMode::Repeater;
        later.advert_count = 1;

        earlier.merge_missing_from(&later);

        assert_eq!(earlier.name, "North Hill");
        assert_eq!(earlier.mode, DeviceMode::Companion);
        assert_eq!(earlier.advert_count, 4);
    }

    #[test]
    fn real_data_beats_seed_placeholder() {
        let mut seed = NodeRecord::placeholder(PublicKey::new("AA"));
        let mut real = record("AA");
        real.name = "HOWL Repeater".into();

        seed.merge_missing_from(&real);

        assert_eq!(seed.name, "HOWL Repeater");
        assert!(!seed.is_placeholder());
    }

    #[test]
    fn room_server_mode_round_trips_with_space() {
        let json = serde_json::to_string(&DeviceMode::RoomServer).unwrap();
        assert_eq!(json, "\"Room Server\"");
        assert_eq!(DeviceMode::RoomServer.to_string(), "Room Server");
    }

    #[test]
    fn location_requires_at_least_one_coordinate() {
        assert!(Location::from_coords(None, None).is_none());
        let loc = Location::from_coords(Some(47.6), None).unwrap();
        assert_eq!(loc.lat, Some(47.6));
        assert_eq!(loc.lon, None);
    }
}
