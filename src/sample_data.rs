use chrono::NaiveDate;
use once_cell::sync::Lazy;
use rand::Rng;
use rand::seq::SliceRandom;

use crate::queries::AppearanceRow;

// Offline stand-in for the appearances table, used when no database
// credentials are configured. Answers the same five query shapes with the
// same guards so the whole pipeline stays exercisable without a server.

const COMPETITIONS: &[&str] = &[
    "Champions League",
    "Europa League",
    "UEFA Cup",
    "Europa Conference League",
    "European Cup",
];

const TEAMS: &[&str] = &[
    "Albion Rovers",
    "Real Oriente",
    "FC Aurora",
    "Sporting Vela",
    "Olympique Nord",
    "Dynamo East",
    "Union Arsenale",
    "Atlético Sur",
];

const PLAYER_POOL: &[(&str, &str, &str)] = &[
    ("L. Ferreira", "Portugal", "FW"),
    ("A. Kovač", "Croatia", "MF"),
    ("J. van Dam", "Netherlands", "DF"),
    ("M. Rossi", "Italy", "FW"),
    ("K. Schmidt", "Germany", "GK"),
    ("D. Moreau", "France", "MF"),
    ("S. Novak", "Czechia", "DF"),
    ("P. Johansson", "Sweden", "FW"),
    ("T. O'Neill", "Ireland", "MF"),
    ("R. García", "Spain", "DF"),
    ("E. Papadopoulos", "Greece", "FW"),
    ("B. Kowalski", "Poland", "MF"),
    ("H. Jensen", "Denmark", "DF"),
    ("C. Silva", "Brazil", "FW"),
    ("N. Petrov", "Bulgaria", "GK"),
    ("F. Weber", "Austria", "MF"),
    ("G. Costa", "Portugal", "DF"),
    ("V. Marchetti", "Italy", "MF"),
    ("O. Andersen", "Norway", "FW"),
    ("I. Horvat", "Croatia", "DF"),
];

// Assists are only tracked from this season onwards; earlier rows carry the
// -1 sentinel, same as the live table.
const ASSISTS_TRACKED_FROM: i32 = 2015;

struct SampleDataset {
    rows: Vec<AppearanceRow>,
    latest_game_date: NaiveDate,
}

static DATASET: Lazy<SampleDataset> = Lazy::new(generate);

pub fn latest_game_date() -> Option<NaiveDate> {
    Some(DATASET.latest_game_date)
}

pub fn competitions() -> Vec<String> {
    let mut out = Vec::new();
    for row in &DATASET.rows {
        if !out.contains(&row.competition_name) {
            out.push(row.competition_name.clone());
        }
    }
    out
}

pub fn max_seasons(selected_comps: &[String]) -> Option<i32> {
    if selected_comps.is_empty() {
        return None;
    }
    DATASET
        .rows
        .iter()
        .filter(|row| selected_comps.contains(&row.competition_name))
        .map(|row| row.number_of_seasons)
        .max()
}

pub fn players(minimum_seasons: i32, selected_comps: &[String]) -> Vec<String> {
    if selected_comps.is_empty() {
        return Vec::new();
    }
    let mut out: Vec<String> = DATASET
        .rows
        .iter()
        .filter(|row| {
            row.number_of_seasons >= minimum_seasons
                && selected_comps.contains(&row.competition_name)
        })
        .map(|row| row.player_name.clone())
        .collect();
    out.sort();
    out.dedup();
    out
}

pub fn player_rows(
    minimum_seasons: i32,
    player: &str,
    selected_comps: &[String],
) -> Vec<AppearanceRow> {
    if player.is_empty() || selected_comps.is_empty() {
        return Vec::new();
    }
    DATASET
        .rows
        .iter()
        .filter(|row| {
            row.number_of_seasons >= minimum_seasons
                && row.player_name == player
                && selected_comps.contains(&row.competition_name)
        })
        .cloned()
        .collect()
}

fn generate() -> SampleDataset {
    let mut rng = rand::thread_rng();
    let mut rows = Vec::new();
    let mut latest_year = 0;

    for (idx, &(name, nationality, position)) in PLAYER_POOL.iter().enumerate() {
        let shirt = rng.gen_range(1..=30);
        let mut comps: Vec<&str> = vec![COMPETITIONS[0]];
        for comp in COMPETITIONS[1..].iter().copied() {
            if rng.gen_bool(0.35) {
                comps.push(comp);
            }
        }

        for comp in comps {
            // The first half of the pool always clears the default filter
            // (three or more Champions League seasons).
            let min_span = if idx < PLAYER_POOL.len() / 2 && comp == COMPETITIONS[0] {
                4
            } else {
                1
            };
            let span = rng.gen_range(min_span..=8);
            let start = rng.gen_range(2004..=2024 - span);

            // Occasional missed season, so densification has gaps to fill.
            let mut seasons: Vec<i32> = (start..start + span)
                .filter(|year| *year == start || !rng.gen_bool(0.15))
                .collect();
            if seasons.is_empty() {
                seasons.push(start);
            }
            let number_of_seasons = seasons.len() as i32;

            let mut team: &str = TEAMS.choose(&mut rng).copied().unwrap_or(TEAMS[0]);
            for year in seasons {
                latest_year = latest_year.max(year);
                if rng.gen_bool(0.2) {
                    team = TEAMS.choose(&mut rng).copied().unwrap_or(TEAMS[0]);
                }
                let matches = rng.gen_range(2..=8);
                for _ in 0..matches {
                    rows.push(appearance(
                        &mut rng,
                        name,
                        comp,
                        year,
                        team,
                        nationality,
                        position,
                        shirt,
                        number_of_seasons,
                    ));
                }
            }
        }
    }

    let latest_game_date = NaiveDate::from_ymd_opt(latest_year + 1, 5, 28)
        .unwrap_or_else(|| NaiveDate::from_ymd_opt(2025, 5, 28).expect("valid fallback date"));

    SampleDataset {
        rows,
        latest_game_date,
    }
}

#[allow(clippy::too_many_arguments)]
fn appearance(
    rng: &mut impl Rng,
    player: &str,
    competition: &str,
    season_start: i32,
    team: &str,
    nationality: &str,
    position: &str,
    shirt: i32,
    number_of_seasons: i32,
) -> AppearanceRow {
    let scoring = matches!(position, "FW" | "MF");
    let goals = if scoring {
        rng.gen_range(0..=2)
    } else {
        i32::from(rng.gen_bool(0.05))
    };
    let assists = if season_start < ASSISTS_TRACKED_FROM {
        -1
    } else {
        rng.gen_range(0..=2)
    };
    let position = if rng.gen_bool(0.05) { "N/A" } else { position };

    AppearanceRow {
        player_name: player.to_string(),
        competition_name: competition.to_string(),
        season_name: crate::aggregate::season_label(season_start),
        team_name: team.to_string(),
        nationality: nationality.to_string(),
        player_position: position.to_string(),
        shirt_number: Some(if rng.gen_bool(0.05) { -1 } else { shirt }),
        minutes_played: Some(rng.gen_range(8..=90)),
        goals: Some(goals),
        assists: Some(assists),
        yellow_cards: Some(i32::from(rng.gen_bool(0.2))),
        red_cards: Some(i32::from(rng.gen_bool(0.02))),
        number_of_seasons,
    }
}
