//! Node discovery command handler.

use std::fs;

use meshscout_api::AnalyzerClient;
use meshscout_core::{PublicKey, RegionSpec, Snapshot, fetch_region_nodes, fetch_specific_nodes};

use crate::cli::{GlobalOpts, NodesArgs};
use crate::config;
use crate::error::CliError;
use crate::output;

pub async fn handle(args: NodesArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = config::load(global.config.as_ref())?;
    let resolved = config::resolve(&cfg, global);

    let region = args.region.as_deref().unwrap_or(&cfg.region);
    let days = args.days.unwrap_or(cfg.days);
    let spec = RegionSpec::new(region);

    let client = AnalyzerClient::new(&resolved.base_url, &resolved.transport)
        .map_err(|e| crate::error::from_api(e, &resolved.base_url))?;

    let snapshot = if args.public_keys.is_empty() {
        fetch_region_nodes(&client, &spec, days, !args.no_adverts).await
    } else {
        let keys = parse_keys(&args.public_keys)?;
        fetch_specific_nodes(&client, &keys, &spec, days).await
    };

    if let Some(ref path) = args.output {
        write_snapshot(path, &snapshot)?;
        tracing::info!(path = %path.display(), "snapshot written");
    }

    let rendered = output::render_snapshot(&global.format, &snapshot);
    output::print_output(&rendered, global.quiet);
    Ok(())
}

fn parse_keys(raw: &[String]) -> Result<Vec<PublicKey>, CliError> {
    raw.iter()
        .map(|k| {
            let key = PublicKey::new(k);
            if key.is_empty() {
                return Err(CliError::Validation {
                    field: "public-keys".into(),
                    reason: "public key must not be empty".into(),
                });
            }
            if !key.as_str().chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(CliError::Validation {
                    field: "public-keys".into(),
                    reason: format!("'{k}' is not a hex public key"),
                });
            }
            Ok(key)
        })
        .collect()
}

fn write_snapshot(path: &std::path::Path, snapshot: &Snapshot) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(snapshot)?;
    fs::write(path, json)?;
    Ok(())
}
