//! Output formatting: table, JSON, plain.
//!
//! Renders a discovery snapshot in the format selected by `--format`.
//! Table uses `tabled`, structured formats use serde, plain emits one
//! public key per line for scripting.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use meshscout_core::{NodeRecord, Snapshot};

use crate::cli::OutputFormat;

// ── Table row ────────────────────────────────────────────────────────

#[derive(Tabled)]
struct NodeRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Mode")]
    mode: String,
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Regions")]
    regions: String,
    #[tabled(rename = "Last Seen")]
    last_seen: String,
    #[tabled(rename = "Adverts")]
    adverts: String,
}

impl From<&NodeRecord> for NodeRow {
    fn from(n: &NodeRecord) -> Self {
        Self {
            name: n.name.clone(),
            mode: n.mode.to_string(),
            key: abbrev_key(&n.public_key),
            regions: n.regions_seen.iter().cloned().collect::<Vec<_>>().join(","),
            last_seen: n
                .last_seen
                .map_or_else(|| "-".into(), |t| t.format("%Y-%m-%d %H:%M").to_string()),
            adverts: n.advert_count.to_string(),
        }
    }
}

fn abbrev_key(key: &meshscout_core::PublicKey) -> String {
    let short = key.abbrev();
    if short.len() < key.as_str().len() {
        format!("{short}\u{2026}")
    } else {
        short.to_owned()
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color() -> bool {
    io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err()
}

/// Render a full snapshot in the chosen format.
///
/// - `table`: colored summary header + a `tabled` listing
/// - `json` / `json-compact`: the entire snapshot via serde
/// - `plain`: one public key per line
pub fn render_snapshot(format: &OutputFormat, snapshot: &Snapshot) -> String {
    match format {
        OutputFormat::Table => render_summary_table(snapshot),
        OutputFormat::Json => render_json_pretty(snapshot),
        OutputFormat::JsonCompact => render_json_compact(snapshot),
        OutputFormat::Plain => snapshot
            .nodes
            .iter()
            .map(|n| n.public_key.to_string())
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

fn render_summary_table(snapshot: &Snapshot) -> String {
    let s = &snapshot.summary;
    let header = format!(
        "{} node(s) in {} over {} day(s): {} repeaters, {} companions, {} rooms, {} other",
        s.total,
        if snapshot.region.is_empty() {
            "all regions"
        } else {
            &snapshot.region
        },
        snapshot.days,
        s.repeaters,
        s.companions,
        s.rooms,
        s.other,
    );
    let header = if should_color() {
        header.bold().cyan().to_string()
    } else {
        header
    };

    if snapshot.nodes.is_empty() {
        return header;
    }

    let rows: Vec<NodeRow> = snapshot.nodes.iter().map(NodeRow::from).collect();
    format!("{header}\n{}", render_table(&rows))
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Format-specific renderers ────────────────────────────────────────

pub fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

/// Pretty-printed JSON.
pub fn render_json_pretty<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_json::to_string_pretty(data).expect("serialization should not fail")
}

/// Compact single-line JSON.
pub fn render_json_compact<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_json::to_string(data).expect("serialization should not fail")
}
