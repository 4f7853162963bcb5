use std::sync::mpsc::{Receiver, Sender};
use std::thread;

use anyhow::Result;
use chrono::NaiveDate;

use crate::config::DbConfig;
use crate::queries::{self, AppearanceRow};
use crate::sample_data;
use crate::state::{Delta, ProviderCommand};

// Where the five queries are answered from: the live appearances table, or
// the generated offline dataset when no credentials are configured.
pub enum Backend {
    Live(DbConfig),
    Sample,
}

impl Backend {
    pub fn label(&self) -> &'static str {
        match self {
            Backend::Live(_) => "live",
            Backend::Sample => "sample",
        }
    }
}

// Commands are handled strictly one at a time; a filter change never races
// another query within the session.
pub fn spawn_provider(backend: Backend, tx: Sender<Delta>, cmd_rx: Receiver<ProviderCommand>) {
    thread::spawn(move || {
        while let Ok(cmd) = cmd_rx.recv() {
            handle_command(&backend, &tx, cmd);
        }
    });
}

fn handle_command(backend: &Backend, tx: &Sender<Delta>, cmd: ProviderCommand) {
    match cmd {
        ProviderCommand::LoadInitial => {
            match latest_game_date(backend) {
                Ok(date) => {
                    let _ = tx.send(Delta::LatestGameDate(date));
                }
                Err(err) => warn(tx, "latest game date", err),
            }
            match competitions(backend) {
                Ok(competitions) => {
                    let _ = tx.send(Delta::Competitions(competitions));
                }
                Err(err) => warn(tx, "competitions", err),
            }
        }
        ProviderCommand::LoadSeasonBounds { comps } => match max_seasons(backend, &comps) {
            Ok(value) => {
                let _ = tx.send(Delta::MaxSeasons { comps, value });
            }
            Err(err) => warn(tx, "season bounds", err),
        },
        ProviderCommand::LoadPlayers {
            minimum_seasons,
            comps,
        } => match players(backend, minimum_seasons, &comps) {
            Ok(players) => {
                let _ = tx.send(Delta::Players {
                    minimum_seasons,
                    comps,
                    players,
                });
            }
            Err(err) => warn(tx, "players", err),
        },
        ProviderCommand::LoadPlayerRows {
            minimum_seasons,
            player,
            comps,
        } => match player_rows(backend, minimum_seasons, &player, &comps) {
            Ok(rows) => {
                let _ = tx.send(Delta::PlayerRows {
                    minimum_seasons,
                    player,
                    comps,
                    rows,
                });
            }
            Err(err) => warn(tx, "player data", err),
        },
    }
}

fn warn(tx: &Sender<Delta>, what: &str, err: anyhow::Error) {
    let _ = tx.send(Delta::Log(format!("[WARN] {what} query failed: {err:#}")));
}

pub fn latest_game_date(backend: &Backend) -> Result<Option<NaiveDate>> {
    match backend {
        Backend::Live(cfg) => queries::load_latest_game_date(cfg),
        Backend::Sample => Ok(sample_data::latest_game_date()),
    }
}

pub fn competitions(backend: &Backend) -> Result<Vec<String>> {
    match backend {
        Backend::Live(cfg) => queries::load_competitions(cfg),
        Backend::Sample => Ok(sample_data::competitions()),
    }
}

pub fn max_seasons(backend: &Backend, comps: &[String]) -> Result<Option<i32>> {
    match backend {
        Backend::Live(cfg) => queries::load_number_of_seasons(cfg, comps),
        Backend::Sample => Ok(sample_data::max_seasons(comps)),
    }
}

pub fn players(backend: &Backend, minimum_seasons: i32, comps: &[String]) -> Result<Vec<String>> {
    match backend {
        Backend::Live(cfg) => queries::load_players(cfg, minimum_seasons, comps),
        Backend::Sample => Ok(sample_data::players(minimum_seasons, comps)),
    }
}

pub fn player_rows(
    backend: &Backend,
    minimum_seasons: i32,
    player: &str,
    comps: &[String],
) -> Result<Vec<AppearanceRow>> {
    match backend {
        Backend::Live(cfg) => queries::load_player_data(cfg, minimum_seasons, player, comps),
        Backend::Sample => Ok(sample_data::player_rows(minimum_seasons, player, comps)),
    }
}
