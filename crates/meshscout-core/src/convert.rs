// ── API-to-domain conversions ──
//
// Bridges raw `meshscout_api` response types into domain types. Each
// helper normalizes field names, parses strings into strong types, and
// fills unknowns for missing optional data.

use chrono::{DateTime, Utc};

use meshscout_api::{NodeEntry, RawAdvert};

use crate::model::{Advert, DeviceMode, Location, NodeRecord, PublicKey};

/// Parse an analyzer timestamp (RFC 3339, usually `...Z`).
///
/// Missing AND malformed both yield `None`: the time filter treats
/// `None` as passing, so a bad timestamp never excludes a record.
pub fn parse_timestamp(raw: Option<&str>) -> Option<DateTime<Utc>> {
    raw.and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

/// Map the analyzer's mode string onto `DeviceMode`.
///
/// Rooms appear as both `"Room Server"` and `"Room"` depending on
/// firmware; both fold into `RoomServer`.
pub fn parse_mode(raw: Option<&str>) -> DeviceMode {
    match raw {
        Some("Repeater") => DeviceMode::Repeater,
        Some("Companion") => DeviceMode::Companion,
        Some("Room Server" | "Room") => DeviceMode::RoomServer,
        _ => DeviceMode::Unknown,
    }
}

impl From<RawAdvert> for Advert {
    fn from(raw: RawAdvert) -> Self {
        let heard_at = parse_timestamp(raw.heard_at.as_deref());
        let regions = raw.regions.into_iter().collect();

        match raw.decoded_payload {
            Some(decoded) => Self {
                public_key: decoded
                    .public_key
                    .as_deref()
                    .filter(|k| !k.is_empty())
                    .map(PublicKey::new),
                name: decoded.name,
                mode: parse_mode(decoded.mode.as_deref()),
                location: Location::from_coords(decoded.lat, decoded.lon),
                flags: decoded.flags,
                regions,
                heard_at,
            },
            None => Self {
                public_key: None,
                name: None,
                mode: DeviceMode::Unknown,
                location: None,
                flags: None,
                regions,
                heard_at,
            },
        }
    }
}

/// Build a `NodeRecord` from one bulk-index entry.
///
/// The index is the richest source: it knows device_role, the MQTT
/// flag, and first/last seen. `None` when the entry has no key.
pub fn node_entry_to_record(entry: NodeEntry) -> Option<NodeRecord> {
    if entry.public_key.is_empty() {
        return None;
    }

    let decoded = entry.decoded_payload;
    let mut record = NodeRecord::new(PublicKey::new(&entry.public_key));

    if let Some(name) = entry.name.filter(|n| !n.is_empty()) {
        record.name = name;
    }
    record.mode = parse_mode(decoded.as_ref().and_then(|d| d.mode.as_deref()));
    record.device_role = entry.device_role;
    record.regions_seen = entry.regions.into_iter().collect();
    record.first_seen = parse_timestamp(entry.first_seen.as_deref());
    record.last_seen = parse_timestamp(entry.last_seen.as_deref());
    record.mqtt_connected = entry.is_mqtt_connected;

    // Prefer the index's own location; fall back to decoded coordinates.
    record.location = entry
        .location
        .and_then(|l| Location::from_coords(l.lat, l.lon))
        .or_else(|| {
            decoded
                .as_ref()
                .and_then(|d| Location::from_coords(d.lat, d.lon))
        });

    Some(record)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_zulu_timestamps() {
        let ts = parse_timestamp(Some("2025-06-01T12:00:00Z")).unwrap();
        assert_eq!(ts.to_rfc3339(), "2025-06-01T12:00:00+00:00");
    }

    #[test]
    fn malformed_timestamp_is_none() {
        assert!(parse_timestamp(Some("last tuesday")).is_none());
        assert!(parse_timestamp(None).is_none());
    }

    #[test]
    fn room_variants_fold_together() {
        assert_eq!(parse_mode(Some("Room Server")), DeviceMode::RoomServer);
        assert_eq!(parse_mode(Some("Room")), DeviceMode::RoomServer);
        assert_eq!(parse_mode(Some("Repeater")), DeviceMode::Repeater);
        assert_eq!(parse_mode(Some("gateway")), DeviceMode::Unknown);
        assert_eq!(parse_mode(None), DeviceMode::Unknown);
    }

    #[test]
    fn advert_without_payload_still_carries_regions() {
        let raw: RawAdvert = serde_json::from_str(
            r#"{"regions":["SEA","PDX"],"heard_at":"2025-06-01T00:00:00Z"}"#,
        )
        .unwrap();
        let advert = Advert::from(raw);

        assert!(advert.public_key.is_none());
        assert_eq!(advert.regions.len(), 2);
        assert!(advert.heard_at.is_some());
    }

    #[test]
    fn entry_without_key_is_rejected() {
        let entry: NodeEntry = serde_json::from_str(r#"{"name":"ghost"}"#).unwrap();
        assert!(node_entry_to_record(entry).is_none());
    }

    #[test]
    fn entry_location_falls_back_to_decoded() {
        let entry: NodeEntry = serde_json::from_str(
            r#"{"public_key":"ab12","decoded_payload":{"lat":47.6,"lon":-122.3}}"#,
        )
        .unwrap();
        let record = node_entry_to_record(entry).unwrap();

        assert_eq!(record.public_key.as_str(), "AB12");
        let loc = record.location.unwrap();
        assert_eq!(loc.lat, Some(47.6));
        assert_eq!(loc.lon, Some(-122.3));
    }
}
