//! Region listing command handler.

use tabled::Tabled;

use meshscout_core::{RegionSpec, VALID_REGIONS, known_groups};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

#[derive(Tabled, serde::Serialize)]
struct RegionRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Codes")]
    codes: String,
    #[tabled(rename = "Seeded")]
    seeded: String,
}

pub fn handle(global: &GlobalOpts) -> Result<(), CliError> {
    let rows: Vec<RegionRow> = known_groups()
        .iter()
        .map(|(name, codes)| {
            let kind = if codes.len() == 1 && codes[0] == *name {
                "region"
            } else {
                "group"
            };
            RegionRow {
                name: (*name).to_owned(),
                kind: kind.to_owned(),
                codes: codes.join(","),
                seeded: if RegionSpec::new(name).is_home() {
                    "yes".into()
                } else {
                    String::new()
                },
            }
        })
        .collect();

    let rendered = match global.format {
        OutputFormat::Table => format!(
            "{}\nValid region codes: {}",
            output::render_table(&rows),
            VALID_REGIONS.join(", ")
        ),
        OutputFormat::Json => output::render_json_pretty(&rows),
        OutputFormat::JsonCompact => output::render_json_compact(&rows),
        OutputFormat::Plain => VALID_REGIONS.join("\n"),
    };

    output::print_output(&rendered, global.quiet);
    Ok(())
}
