use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};
use serde::Serialize;

use crate::aggregate::PlayerAggregate;
use crate::chart::{self, MetricTile, SeasonChartSpec};

// Everything the presentation boundary hands to a renderer, in one payload.
#[derive(Debug, Clone, Serialize)]
pub struct OverviewPayload {
    pub player: String,
    pub tiles: Vec<MetricTile>,
    pub teams_played_for: String,
    pub chart: SeasonChartSpec,
}

pub fn overview_payload(player: &str, aggregate: &PlayerAggregate) -> OverviewPayload {
    OverviewPayload {
        player: chart::display_name(player).to_string(),
        tiles: chart::overview_tiles(&aggregate.overview),
        teams_played_for: aggregate.overview.teams.clone(),
        chart: chart::season_chart_spec(player, &aggregate.seasons),
    }
}

pub fn export_xlsx(path: &Path, player: &str, aggregate: &PlayerAggregate) -> Result<()> {
    let payload = overview_payload(player, aggregate);

    let mut overview_rows = vec![vec!["Metric".to_string(), "Value".to_string()]];
    overview_rows.push(vec!["Player".to_string(), payload.player.clone()]);
    for tile in &payload.tiles {
        overview_rows.push(vec![tile.label.clone(), tile.value.clone()]);
    }
    overview_rows.push(vec![
        "Teams played for".to_string(),
        payload.teams_played_for.clone(),
    ]);

    let mut season_rows = vec![vec![
        "Season".to_string(),
        "Appearances".to_string(),
        "Goals".to_string(),
    ]];
    for stat in &aggregate.seasons {
        season_rows.push(vec![
            stat.season.clone(),
            stat.appearances.to_string(),
            stat.goals.to_string(),
        ]);
    }

    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Overview")?;
        write_rows(sheet, &overview_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Seasons")?;
        write_rows(sheet, &season_rows)?;
    }
    workbook
        .save(path)
        .with_context(|| format!("save workbook {}", path.display()))?;
    Ok(())
}

pub fn export_json(path: &Path, player: &str, aggregate: &PlayerAggregate) -> Result<()> {
    let payload = overview_payload(player, aggregate);
    let json = serde_json::to_string_pretty(&payload).context("serialize overview payload")?;
    fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            worksheet
                .write_string(row_idx as u32, col_idx as u16, value)
                .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}
