use std::collections::VecDeque;

use chrono::NaiveDate;

use crate::aggregate::{self, PlayerAggregate};
use crate::queries::AppearanceRow;

pub const DEFAULT_COMPETITION: &str = "Champions League";
pub const DEFAULT_MINIMUM_SEASONS: i32 = 3;

const LOG_CAPACITY: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Competitions,
    MinimumSeasons,
    Players,
    Seasons,
}

// Distinguishable non-fatal empty states, rendered as prompts rather than
// errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    SelectCompetition,
    SelectPlayer,
    NoRowsForPlayer,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProviderCommand {
    LoadInitial,
    LoadSeasonBounds {
        comps: Vec<String>,
    },
    LoadPlayers {
        minimum_seasons: i32,
        comps: Vec<String>,
    },
    LoadPlayerRows {
        minimum_seasons: i32,
        player: String,
        comps: Vec<String>,
    },
}

// Deltas echo the request arguments so stale responses (from a selection
// that changed while the query ran) can be dropped on arrival.
#[derive(Debug, Clone)]
pub enum Delta {
    LatestGameDate(Option<NaiveDate>),
    Competitions(Vec<String>),
    MaxSeasons {
        comps: Vec<String>,
        value: Option<i32>,
    },
    Players {
        minimum_seasons: i32,
        comps: Vec<String>,
        players: Vec<String>,
    },
    PlayerRows {
        minimum_seasons: i32,
        player: String,
        comps: Vec<String>,
        rows: Vec<AppearanceRow>,
    },
    Log(String),
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub latest_game_date: Option<NaiveDate>,
    pub competition_options: Vec<String>,
    pub selected_comps: Vec<String>,
    pub max_seasons: Option<i32>,
    pub minimum_seasons: i32,
    pub player_options: Vec<String>,
    pub selected_player: Option<String>,
    pub player_rows: Vec<AppearanceRow>,
    pub player_rows_loaded: bool,
    pub season_options: Vec<String>,
    pub selected_seasons: Vec<String>,
    pub aggregate: Option<PlayerAggregate>,
    pub focus: Focus,
    pub competition_cursor: usize,
    pub player_cursor: usize,
    pub season_cursor: usize,
    pub players_loading: bool,
    pub rows_loading: bool,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
    // Follow-up queries produced by state transitions; the UI loop drains
    // these into the provider channel.
    pub pending: Vec<ProviderCommand>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            latest_game_date: None,
            competition_options: Vec::new(),
            selected_comps: Vec::new(),
            max_seasons: None,
            minimum_seasons: DEFAULT_MINIMUM_SEASONS,
            player_options: Vec::new(),
            selected_player: None,
            player_rows: Vec::new(),
            player_rows_loaded: false,
            season_options: Vec::new(),
            selected_seasons: Vec::new(),
            aggregate: None,
            focus: Focus::Competitions,
            competition_cursor: 0,
            player_cursor: 0,
            season_cursor: 0,
            players_loading: false,
            rows_loading: false,
            logs: VecDeque::with_capacity(LOG_CAPACITY),
            help_overlay: false,
            pending: vec![ProviderCommand::LoadInitial],
        }
    }

    pub fn notice(&self) -> Option<Notice> {
        if self.selected_comps.is_empty() {
            return Some(Notice::SelectCompetition);
        }
        if self.selected_player.is_none() {
            return Some(Notice::SelectPlayer);
        }
        if self.player_rows_loaded && self.aggregate.is_none() {
            return Some(Notice::NoRowsForPlayer);
        }
        None
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        if self.logs.len() == LOG_CAPACITY {
            self.logs.pop_front();
        }
        self.logs.push_back(msg.into());
    }

    pub fn cycle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Competitions => Focus::MinimumSeasons,
            Focus::MinimumSeasons => Focus::Players,
            Focus::Players => Focus::Seasons,
            Focus::Seasons => Focus::Competitions,
        };
    }

    pub fn select_next(&mut self) {
        match self.focus {
            Focus::Competitions => bump_cursor(
                &mut self.competition_cursor,
                self.competition_options.len(),
                1,
            ),
            Focus::Players => bump_cursor(&mut self.player_cursor, self.player_options.len(), 1),
            Focus::Seasons => bump_cursor(&mut self.season_cursor, self.season_options.len(), 1),
            Focus::MinimumSeasons => {}
        }
    }

    pub fn select_prev(&mut self) {
        match self.focus {
            Focus::Competitions => bump_cursor(
                &mut self.competition_cursor,
                self.competition_options.len(),
                -1,
            ),
            Focus::Players => bump_cursor(&mut self.player_cursor, self.player_options.len(), -1),
            Focus::Seasons => bump_cursor(&mut self.season_cursor, self.season_options.len(), -1),
            Focus::MinimumSeasons => {}
        }
    }

    // Stage 1: competition multiselect. Any change resets every downstream
    // stage and re-queries season bounds and players.
    pub fn toggle_competition_at_cursor(&mut self) {
        let Some(comp) = self
            .competition_options
            .get(self.competition_cursor)
            .cloned()
        else {
            return;
        };
        match self.selected_comps.iter().position(|c| *c == comp) {
            Some(idx) => {
                self.selected_comps.remove(idx);
            }
            None => self.selected_comps.push(comp),
        }
        self.reset_after_competition_change();
        self.request_season_bounds_and_players();
    }

    // Stage 2: minimum-seasons slider, clamped to [1, max_seasons].
    pub fn bump_minimum_seasons(&mut self, delta: i32) {
        let upper = self.max_seasons.unwrap_or(1).max(1);
        let next = (self.minimum_seasons + delta).clamp(1, upper);
        if next == self.minimum_seasons {
            return;
        }
        self.minimum_seasons = next;
        self.reset_after_minimum_change();
        self.request_players();
    }

    // Stage 3: player select.
    pub fn choose_player_at_cursor(&mut self) {
        let Some(player) = self.player_options.get(self.player_cursor).cloned() else {
            return;
        };
        if self.selected_player.as_deref() == Some(player.as_str()) {
            return;
        }
        self.selected_player = Some(player);
        self.reset_after_player_change();
        self.request_player_rows();
    }

    // Stage 4: optional season narrowing; a local re-aggregation, no query.
    pub fn toggle_season_at_cursor(&mut self) {
        let Some(season) = self.season_options.get(self.season_cursor).cloned() else {
            return;
        };
        match self.selected_seasons.iter().position(|s| *s == season) {
            Some(idx) => {
                self.selected_seasons.remove(idx);
            }
            None => self.selected_seasons.push(season),
        }
        self.recompute_aggregate();
    }

    pub fn refresh(&mut self) {
        self.pending.push(ProviderCommand::LoadInitial);
        self.request_season_bounds_and_players();
        self.request_player_rows();
    }

    pub fn recompute_aggregate(&mut self) {
        self.aggregate = aggregate::aggregate_player(&self.player_rows, &self.selected_seasons);
    }

    fn reset_after_competition_change(&mut self) {
        self.max_seasons = None;
        self.reset_after_minimum_change();
    }

    fn reset_after_minimum_change(&mut self) {
        self.player_options.clear();
        self.player_cursor = 0;
        self.selected_player = None;
        self.reset_after_player_change();
    }

    fn reset_after_player_change(&mut self) {
        self.player_rows.clear();
        self.player_rows_loaded = false;
        self.season_options.clear();
        self.selected_seasons.clear();
        self.season_cursor = 0;
        self.aggregate = None;
    }

    fn request_season_bounds_and_players(&mut self) {
        if self.selected_comps.is_empty() {
            return;
        }
        self.pending.push(ProviderCommand::LoadSeasonBounds {
            comps: self.selected_comps.clone(),
        });
        self.request_players();
    }

    fn request_players(&mut self) {
        if self.selected_comps.is_empty() {
            return;
        }
        self.players_loading = true;
        self.pending.push(ProviderCommand::LoadPlayers {
            minimum_seasons: self.minimum_seasons,
            comps: self.selected_comps.clone(),
        });
    }

    fn request_player_rows(&mut self) {
        let Some(player) = self.selected_player.clone() else {
            return;
        };
        if self.selected_comps.is_empty() {
            return;
        }
        self.rows_loading = true;
        self.pending.push(ProviderCommand::LoadPlayerRows {
            minimum_seasons: self.minimum_seasons,
            player,
            comps: self.selected_comps.clone(),
        });
    }
}

fn bump_cursor(cursor: &mut usize, len: usize, delta: isize) {
    if len == 0 {
        *cursor = 0;
        return;
    }
    let next = (*cursor as isize + delta).clamp(0, len as isize - 1);
    *cursor = next as usize;
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::LatestGameDate(date) => state.latest_game_date = date,
        Delta::Competitions(mut competitions) => {
            competitions.sort();
            state.competition_options = competitions;
            state.competition_cursor = state
                .competition_cursor
                .min(state.competition_options.len().saturating_sub(1));
            // First load: preselect the default competition.
            if state.selected_comps.is_empty()
                && state
                    .competition_options
                    .iter()
                    .any(|c| c == DEFAULT_COMPETITION)
            {
                state.selected_comps.push(DEFAULT_COMPETITION.to_string());
                state.request_season_bounds_and_players();
            }
        }
        Delta::MaxSeasons { comps, value } => {
            if comps != state.selected_comps {
                return;
            }
            state.max_seasons = value;
            let upper = value.unwrap_or(1).max(1);
            if state.minimum_seasons > upper {
                state.minimum_seasons = upper;
                state.reset_after_minimum_change();
                state.request_players();
            }
        }
        Delta::Players {
            minimum_seasons,
            comps,
            players,
        } => {
            if comps != state.selected_comps || minimum_seasons != state.minimum_seasons {
                return;
            }
            state.players_loading = false;
            state.player_options = players;
            state.player_cursor = state
                .player_cursor
                .min(state.player_options.len().saturating_sub(1));
            match &state.selected_player {
                Some(player) if state.player_options.contains(player) => {}
                _ => {
                    // Mirror the select widget: the first option is chosen
                    // as soon as options exist.
                    state.selected_player = state.player_options.first().cloned();
                    state.reset_after_player_change();
                    state.request_player_rows();
                }
            }
        }
        Delta::PlayerRows {
            minimum_seasons,
            player,
            comps,
            rows,
        } => {
            if comps != state.selected_comps
                || minimum_seasons != state.minimum_seasons
                || state.selected_player.as_deref() != Some(player.as_str())
            {
                return;
            }
            state.rows_loading = false;
            state.player_rows = rows;
            state.player_rows_loaded = true;
            state.season_options = season_options(&state.player_rows);
            state
                .selected_seasons
                .retain(|s| state.season_options.contains(s));
            state.season_cursor = state
                .season_cursor
                .min(state.season_options.len().saturating_sub(1));
            state.recompute_aggregate();
        }
        Delta::Log(msg) => state.push_log(msg),
    }
}

// Distinct seasons from the loaded rows, most recent first.
fn season_options(rows: &[AppearanceRow]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for row in rows {
        if !out.contains(&row.season_name) {
            out.push(row.season_name.clone());
        }
    }
    out.sort_by(|a, b| b.cmp(a));
    out
}
