use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};

use eurostats_terminal::aggregate;
use eurostats_terminal::config::{self, DbConfig};
use eurostats_terminal::export;
use eurostats_terminal::provider::{self, Backend};
use eurostats_terminal::state::DEFAULT_MINIMUM_SEASONS;

// Headless run of the dashboard pipeline: same queries, same aggregation,
// written to a workbook or JSON instead of the terminal.
//
//   export_overview --player "J. van Dam" [--competition "Champions League"]...
//                   [--min-seasons 3] [--season 2015/2016]...
//                   [--out overview.xlsx] [--sample]

fn main() -> Result<()> {
    config::load_env_files();

    let player = arg_value("--player").ok_or_else(|| anyhow!("--player is required"))?;
    let mut comps = arg_values("--competition");
    if comps.is_empty() {
        comps.push("Champions League".to_string());
    }
    let minimum_seasons = arg_value("--min-seasons")
        .and_then(|raw| raw.parse::<i32>().ok())
        .unwrap_or(DEFAULT_MINIMUM_SEASONS);
    let seasons = arg_values("--season");

    let backend = if has_flag("--sample") {
        Backend::Sample
    } else {
        match DbConfig::from_env_opt()? {
            Some(cfg) => Backend::Live(cfg),
            None => Backend::Sample,
        }
    };

    let rows = provider::player_rows(&backend, minimum_seasons, &player, &comps)?;
    let aggregate = aggregate::aggregate_player(&rows, &seasons).ok_or_else(|| {
        anyhow!("no data for {player} in {comps:?} at minimum seasons {minimum_seasons}")
    })?;

    let out = arg_value("--out")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("player_overview.xlsx"));
    match out.extension().and_then(|ext| ext.to_str()) {
        Some("json") => export::export_json(&out, &player, &aggregate)
            .with_context(|| format!("export json {}", out.display()))?,
        _ => export::export_xlsx(&out, &player, &aggregate)
            .with_context(|| format!("export xlsx {}", out.display()))?,
    }

    println!("Exported overview for {player} ({} data)", backend.label());
    println!("Out: {}", out.display());
    println!(
        "Appearances: {}  Goals: {}  Seasons charted: {}",
        aggregate.overview.appearances,
        aggregate.overview.goals,
        aggregate.seasons.len()
    );
    Ok(())
}

fn arg_value(name: &str) -> Option<String> {
    arg_values(name).into_iter().next()
}

fn arg_values(name: &str) -> Vec<String> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let prefix = format!("{name}=");
    let mut out = Vec::new();
    for (idx, arg) in args.iter().enumerate() {
        if let Some(raw) = arg.strip_prefix(&prefix) {
            if !raw.trim().is_empty() {
                out.push(raw.trim().to_string());
            }
        }
        if arg == name
            && let Some(next) = args.get(idx + 1)
            && !next.trim().is_empty()
        {
            out.push(next.trim().to_string());
        }
    }
    out
}

fn has_flag(name: &str) -> bool {
    std::env::args().skip(1).any(|arg| arg == name)
}
