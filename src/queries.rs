use anyhow::{Context, Result};
use chrono::NaiveDate;
use postgres::Row;
use postgres::types::ToSql;
use serde::Serialize;

use crate::config::DbConfig;
use crate::db;
use crate::query_cache;

// Read-only fact table maintained by an external ingestion pipeline.
pub const APPEARANCES_TABLE: &str = "streamlit.\"Fbref_Appearances\"";

// One row per player per match. Stat columns carry a -1 sentinel for
// "not tracked"; the scrub to null happens in the aggregation stage, not here.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppearanceRow {
    pub player_name: String,
    pub competition_name: String,
    pub season_name: String,
    pub team_name: String,
    pub nationality: String,
    pub player_position: String,
    pub shirt_number: Option<i32>,
    pub minutes_played: Option<i32>,
    pub goals: Option<i32>,
    pub assists: Option<i32>,
    pub yellow_cards: Option<i32>,
    pub red_cards: Option<i32>,
    pub number_of_seasons: i32,
}

pub fn load_latest_game_date(cfg: &DbConfig) -> Result<Option<NaiveDate>> {
    if let Some(cached) = query_cache::cached_latest_game_date() {
        return Ok(cached);
    }

    let mut client = db::connect(cfg)?;
    let sql = format!("SELECT MAX(game_date) AS latest_game_date FROM {APPEARANCES_TABLE}");
    let row = client
        .query_one(sql.as_str(), &[])
        .context("query latest game date")?;
    let latest: Option<NaiveDate> = row.try_get(0).context("decode latest game date")?;

    query_cache::store_latest_game_date(latest);
    Ok(latest)
}

pub fn load_competitions(cfg: &DbConfig) -> Result<Vec<String>> {
    if let Some(cached) = query_cache::cached_competitions() {
        return Ok(cached);
    }

    let mut client = db::connect(cfg)?;
    let sql = format!("SELECT DISTINCT competition_name FROM {APPEARANCES_TABLE}");
    let rows = client.query(sql.as_str(), &[]).context("query competitions")?;
    let mut competitions = Vec::with_capacity(rows.len());
    for row in &rows {
        competitions.push(row.try_get::<_, String>(0).context("decode competition name")?);
    }

    query_cache::store_competitions(competitions.clone());
    Ok(competitions)
}

// Max seasons any player has played across the selected competitions.
// Empty competition set short-circuits before a connection is opened.
pub fn load_number_of_seasons(cfg: &DbConfig, selected_comps: &[String]) -> Result<Option<i32>> {
    if selected_comps.is_empty() {
        return Ok(None);
    }
    if let Some(cached) = query_cache::cached_max_seasons(selected_comps) {
        return Ok(cached);
    }

    let mut client = db::connect(cfg)?;
    let sql = format!(
        "SELECT MAX(number_of_seasons) AS max_seasons FROM {APPEARANCES_TABLE} \
         WHERE competition_name IN ({})",
        in_list_placeholders(1, selected_comps.len())
    );
    let params = comp_params(selected_comps);
    let row = client
        .query_one(sql.as_str(), &params)
        .context("query max seasons")?;
    let max_seasons: Option<i32> = row.try_get(0).context("decode max seasons")?;

    query_cache::store_max_seasons(selected_comps, max_seasons);
    Ok(max_seasons)
}

// Distinct players with at least `minimum_seasons` seasons in the selected
// competitions, ascending by name. Empty set in, empty set out.
pub fn load_players(
    cfg: &DbConfig,
    minimum_seasons: i32,
    selected_comps: &[String],
) -> Result<Vec<String>> {
    if selected_comps.is_empty() {
        return Ok(Vec::new());
    }
    if let Some(cached) = query_cache::cached_players(minimum_seasons, selected_comps) {
        return Ok(cached);
    }

    let mut client = db::connect(cfg)?;
    let sql = format!(
        "SELECT DISTINCT player_name FROM {APPEARANCES_TABLE} \
         WHERE number_of_seasons >= $1 AND competition_name IN ({})",
        in_list_placeholders(2, selected_comps.len())
    );
    let mut params: Vec<&(dyn ToSql + Sync)> = vec![&minimum_seasons];
    params.extend(selected_comps.iter().map(|comp| comp as &(dyn ToSql + Sync)));
    let rows = client.query(sql.as_str(), &params).context("query players")?;

    let mut players = Vec::with_capacity(rows.len());
    for row in &rows {
        players.push(row.try_get::<_, String>(0).context("decode player name")?);
    }
    players.sort();
    players.dedup();

    query_cache::store_players(minimum_seasons, selected_comps, players.clone());
    Ok(players)
}

// Full row set for one player in the selected competitions. Empty player or
// competition set yields an empty row set without touching the database.
pub fn load_player_data(
    cfg: &DbConfig,
    minimum_seasons: i32,
    player: &str,
    selected_comps: &[String],
) -> Result<Vec<AppearanceRow>> {
    if player.is_empty() || selected_comps.is_empty() {
        return Ok(Vec::new());
    }
    if let Some(cached) = query_cache::cached_player_rows(minimum_seasons, player, selected_comps) {
        return Ok(cached);
    }

    let mut client = db::connect(cfg)?;
    let sql = format!(
        "SELECT \
            player_name, competition_name, season_name, team_name, \
            nationality, player_position, shirt_number, minutes_played, \
            goals, assists, yellow_cards, red_cards, number_of_seasons \
         FROM {APPEARANCES_TABLE} \
         WHERE number_of_seasons >= $1 AND player_name = $2 \
           AND competition_name IN ({})",
        in_list_placeholders(3, selected_comps.len())
    );
    let mut params: Vec<&(dyn ToSql + Sync)> = vec![&minimum_seasons, &player];
    params.extend(selected_comps.iter().map(|comp| comp as &(dyn ToSql + Sync)));
    let rows = client.query(sql.as_str(), &params).context("query player data")?;

    let mut out = Vec::with_capacity(rows.len());
    for row in &rows {
        out.push(decode_appearance(row).context("decode appearance row")?);
    }

    query_cache::store_player_rows(minimum_seasons, player, selected_comps, out.clone());
    Ok(out)
}

fn decode_appearance(row: &Row) -> Result<AppearanceRow, postgres::Error> {
    Ok(AppearanceRow {
        player_name: row.try_get(0)?,
        competition_name: row.try_get(1)?,
        season_name: row.try_get(2)?,
        team_name: row.try_get(3)?,
        nationality: row.try_get(4)?,
        player_position: row.try_get(5)?,
        shirt_number: row.try_get(6)?,
        minutes_played: row.try_get(7)?,
        goals: row.try_get(8)?,
        assists: row.try_get(9)?,
        yellow_cards: row.try_get(10)?,
        red_cards: row.try_get(11)?,
        number_of_seasons: row.try_get(12)?,
    })
}

// One numbered placeholder per IN-list element; values are always bound,
// never interpolated.
pub fn in_list_placeholders(start: usize, count: usize) -> String {
    let mut out = String::new();
    for idx in 0..count {
        if idx > 0 {
            out.push(',');
        }
        out.push('$');
        out.push_str(&(start + idx).to_string());
    }
    out
}

fn comp_params(selected_comps: &[String]) -> Vec<&(dyn ToSql + Sync)> {
    selected_comps
        .iter()
        .map(|comp| comp as &(dyn ToSql + Sync))
        .collect()
}
