// ── Region vocabulary ──
//
// Leaf region codes and named groups as used by the analyzer. Both
// tables are process-wide immutable configuration; nothing mutates
// them at runtime.

use std::collections::BTreeSet;

use serde::Serialize;

/// Region codes known to the analyzer.
pub const VALID_REGIONS: [&str; 11] = [
    "SEA", "PDX", "MFR", "CVO", "EUG", // Pacific Northwest US
    "YVR", "YYJ", "YCD", "BLI", "KEH", "YSE", // Canada/BC area
];

/// Named groups expanding to sets of region codes.
static REGION_GROUPS: &[(&str, &[&str])] = &[
    (
        "PNW",
        &[
            "SEA", "PDX", "MFR", "CVO", "EUG", "YVR", "YYJ", "YCD", "BLI", "KEH", "YSE",
        ],
    ),
    ("SEA", &["SEA"]),
    ("PDX", &["PDX"]),
    ("BC", &["YVR", "YYJ", "YCD", "BLI", "KEH", "YSE"]),
];

/// Requested region names whose discovery runs get the bootstrap seed
/// list merged in.
const HOME_REGIONS: [&str; 2] = ["SEA", "PNW"];

/// The named groups and their expansions, for help/listing output.
pub fn known_groups() -> &'static [(&'static str, &'static [&'static str])] {
    REGION_GROUPS
}

/// A target region: the requested name plus its expansion to leaf codes.
///
/// An empty expansion means "no region constraint" and matches every
/// record. A name that is neither a known group nor a known code
/// degenerates to the singleton set containing itself -- never empty --
/// preserving "unknown code = regionless single region" semantics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionSpec {
    name: String,
    codes: Vec<String>,
}

impl RegionSpec {
    /// Expand a region name or group.
    pub fn new(name: &str) -> Self {
        let codes = REGION_GROUPS
            .iter()
            .find(|(group, _)| *group == name)
            .map_or_else(
                || vec![name.to_owned()],
                |(_, codes)| codes.iter().map(|c| (*c).to_owned()).collect(),
            );
        Self {
            name: name.to_owned(),
            codes,
        }
    }

    /// A spec with no region constraint at all.
    pub fn any() -> Self {
        Self {
            name: String::new(),
            codes: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn codes(&self) -> &[String] {
        &self.codes
    }

    /// True when the record's region set intersects the expansion, or
    /// the expansion is empty (universal match). Intentionally permissive:
    /// an empty spec must match records with no regions at all.
    pub fn matches(&self, regions: &BTreeSet<String>) -> bool {
        self.codes.is_empty() || self.codes.iter().any(|c| regions.contains(c))
    }

    /// True for the home regions that get seed-node bootstrap.
    pub fn is_home(&self) -> bool {
        HOME_REGIONS.contains(&self.name.as_str())
    }
}
