use std::cmp::Reverse;
use std::collections::HashMap;
use std::hash::Hash;

use serde::Serialize;

use crate::queries::AppearanceRow;

// Stat columns use -1 for "not tracked"; position uses a textual marker.
pub const STAT_SENTINEL: i32 = -1;
pub const POSITION_NA: &str = "N/A";
pub const UNKNOWN: &str = "Unknown";

pub const TEAM_SEPARATOR: &str = " – ";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerOverview {
    pub appearances: usize,
    pub goals: i64,
    pub assists: i64,
    pub yellow_cards: i64,
    pub red_cards: i64,
    pub minutes_played: i64,
    pub nationality: String,
    pub seasons_played: i32,
    pub main_position: String,
    pub shirt_number: String,
    pub teams: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonStat {
    pub season: String,
    pub appearances: u32,
    pub goals: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerAggregate {
    pub overview: PlayerOverview,
    pub seasons: Vec<SeasonStat>,
}

// The full aggregation stage: optional season narrowing, sentinel scrub,
// summary statistics, densified per-season table. Returns None when the
// filtered row set is empty (the "no data for player" state).
pub fn aggregate_player(
    rows: &[AppearanceRow],
    selected_seasons: &[String],
) -> Option<PlayerAggregate> {
    let mut filtered = filter_seasons(rows, selected_seasons);
    if filtered.is_empty() {
        return None;
    }
    scrub_sentinels(&mut filtered);

    let overview = compute_overview(&filtered)?;
    let seasons = season_stats(&filtered);
    Some(PlayerAggregate { overview, seasons })
}

pub fn filter_seasons(rows: &[AppearanceRow], selected_seasons: &[String]) -> Vec<AppearanceRow> {
    if selected_seasons.is_empty() {
        return rows.to_vec();
    }
    rows.iter()
        .filter(|row| selected_seasons.iter().any(|s| *s == row.season_name))
        .cloned()
        .collect()
}

// -1 becomes null across all numeric columns so the reducers below can skip
// missing values instead of summing the sentinel.
pub fn scrub_sentinels(rows: &mut [AppearanceRow]) {
    for row in rows {
        row.shirt_number = null_sentinel(row.shirt_number);
        row.minutes_played = null_sentinel(row.minutes_played);
        row.goals = null_sentinel(row.goals);
        row.assists = null_sentinel(row.assists);
        row.yellow_cards = null_sentinel(row.yellow_cards);
        row.red_cards = null_sentinel(row.red_cards);
    }
}

fn null_sentinel(value: Option<i32>) -> Option<i32> {
    value.filter(|v| *v != STAT_SENTINEL)
}

// Expects scrubbed rows; None only for an empty row set.
pub fn compute_overview(rows: &[AppearanceRow]) -> Option<PlayerOverview> {
    if rows.is_empty() {
        return None;
    }

    let nationality = mode_first(rows.iter().map(|row| row.nationality.as_str()))?.to_string();
    let seasons_played = mode_first(rows.iter().map(|row| row.number_of_seasons))?;

    let main_position = mode_first(
        rows.iter()
            .map(|row| row.player_position.as_str())
            .filter(|pos| !pos.is_empty() && *pos != POSITION_NA),
    )
    .map(str::to_string)
    .unwrap_or_else(|| UNKNOWN.to_string());

    let shirt_number = mode_first(rows.iter().filter_map(|row| row.shirt_number))
        .map(|n| n.to_string())
        .unwrap_or_else(|| UNKNOWN.to_string());

    Some(PlayerOverview {
        appearances: rows.len(),
        goals: sum_column(rows, |row| row.goals),
        assists: sum_column(rows, |row| row.assists),
        yellow_cards: sum_column(rows, |row| row.yellow_cards),
        red_cards: sum_column(rows, |row| row.red_cards),
        minutes_played: sum_column(rows, |row| row.minutes_played),
        nationality,
        seasons_played,
        main_position,
        shirt_number,
        teams: team_order(rows).join(TEAM_SEPARATOR),
    })
}

// Null-skipping sum: missing values contribute nothing, a true zero counts.
fn sum_column(rows: &[AppearanceRow], col: impl Fn(&AppearanceRow) -> Option<i32>) -> i64 {
    rows.iter().filter_map(|row| col(row)).map(i64::from).sum()
}

// Most frequent value, ties broken by first occurrence in input order.
fn mode_first<T: Eq + Hash + Clone>(values: impl IntoIterator<Item = T>) -> Option<T> {
    let mut counts: HashMap<T, (usize, usize)> = HashMap::new();
    for (idx, value) in values.into_iter().enumerate() {
        counts.entry(value).or_insert((0, idx)).0 += 1;
    }
    counts
        .into_iter()
        .max_by_key(|(_, (count, first_seen))| (*count, Reverse(*first_seen)))
        .map(|(value, _)| value)
}

// Teams in the order the player first appeared for them, earliest season
// first. Seasons compare by their 4-digit start year; labels that do not
// carry one sort last.
pub fn team_order(rows: &[AppearanceRow]) -> Vec<String> {
    let mut first_season: HashMap<&str, &str> = HashMap::new();
    let mut teams: Vec<&str> = Vec::new();
    for row in rows {
        if !first_season.contains_key(row.team_name.as_str()) {
            teams.push(&row.team_name);
        }
        let season = first_season
            .entry(&row.team_name)
            .or_insert(&row.season_name);
        if row.season_name.as_str() < *season {
            *season = &row.season_name;
        }
    }

    teams.sort_by_key(|team| {
        first_season
            .get(team)
            .and_then(|season| season_start_year(season))
            .unwrap_or(i32::MAX)
    });
    teams.into_iter().map(str::to_string).collect()
}

// Group by season, count appearances, sum goals, then densify: every season
// between the player's first and last gets a row, zero-filled when the
// player has no recorded appearance that year.
pub fn season_stats(rows: &[AppearanceRow]) -> Vec<SeasonStat> {
    let mut grouped: HashMap<i32, (u32, i64)> = HashMap::new();
    for row in rows {
        let Some(year) = season_start_year(&row.season_name) else {
            continue;
        };
        let entry = grouped.entry(year).or_insert((0, 0));
        entry.0 += 1;
        entry.1 += row.goals.map(i64::from).unwrap_or(0);
    }

    let Some(first) = grouped.keys().min().copied() else {
        return Vec::new();
    };
    let last = grouped.keys().max().copied().unwrap_or(first);

    (first..=last)
        .map(|year| {
            let (appearances, goals) = grouped.get(&year).copied().unwrap_or((0, 0));
            SeasonStat {
                season: season_label(year),
                appearances,
                goals,
            }
        })
        .collect()
}

// "2015/2016" -> 2015.
pub fn season_start_year(season: &str) -> Option<i32> {
    let prefix = season.get(..4)?;
    if !prefix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    prefix.parse().ok()
}

// 2015 -> "2015/2016".
pub fn season_label(start_year: i32) -> String {
    format!("{start_year}/{}", start_year + 1)
}
