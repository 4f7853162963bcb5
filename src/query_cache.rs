use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use chrono::NaiveDate;

use crate::queries::AppearanceRow;

// The dataset changes slowly; staleness inside the window is acceptable.
pub const QUERY_TTL: Duration = Duration::from_secs(600);

static CACHE: Mutex<Option<QueryCache>> = Mutex::new(None);

#[derive(Debug, Clone)]
struct Timed<T> {
    value: T,
    stored_at: Instant,
}

impl<T: Clone> Timed<T> {
    fn new(value: T) -> Self {
        Self {
            value,
            stored_at: Instant::now(),
        }
    }

    fn fresh(&self, ttl: Duration) -> Option<T> {
        if self.stored_at.elapsed() < ttl {
            Some(self.value.clone())
        } else {
            None
        }
    }
}

type PlayersKey = (i32, Vec<String>);
type PlayerRowsKey = (i32, String, Vec<String>);

// Keyed by operation identity plus the operation's own argument tuple.
// Eviction on expiry only; stale entries are overwritten on the next store.
#[derive(Debug, Default)]
struct QueryCache {
    latest_game_date: Option<Timed<Option<NaiveDate>>>,
    competitions: Option<Timed<Vec<String>>>,
    max_seasons: HashMap<Vec<String>, Timed<Option<i32>>>,
    players: HashMap<PlayersKey, Timed<Vec<String>>>,
    player_rows: HashMap<PlayerRowsKey, Timed<Vec<AppearanceRow>>>,
}

fn with_cache<R>(f: impl FnOnce(&mut QueryCache) -> R) -> R {
    let mut guard = CACHE.lock().expect("query cache lock poisoned");
    let cache = guard.get_or_insert_with(QueryCache::default);
    f(cache)
}

pub fn cached_latest_game_date() -> Option<Option<NaiveDate>> {
    with_cache(|cache| {
        cache
            .latest_game_date
            .as_ref()
            .and_then(|entry| entry.fresh(QUERY_TTL))
    })
}

pub fn store_latest_game_date(value: Option<NaiveDate>) {
    with_cache(|cache| cache.latest_game_date = Some(Timed::new(value)));
}

pub fn cached_competitions() -> Option<Vec<String>> {
    with_cache(|cache| {
        cache
            .competitions
            .as_ref()
            .and_then(|entry| entry.fresh(QUERY_TTL))
    })
}

pub fn store_competitions(value: Vec<String>) {
    with_cache(|cache| cache.competitions = Some(Timed::new(value)));
}

pub fn cached_max_seasons(comps: &[String]) -> Option<Option<i32>> {
    with_cache(|cache| {
        cache
            .max_seasons
            .get(comps)
            .and_then(|entry| entry.fresh(QUERY_TTL))
    })
}

pub fn store_max_seasons(comps: &[String], value: Option<i32>) {
    with_cache(|cache| {
        cache.max_seasons.insert(comps.to_vec(), Timed::new(value));
    });
}

pub fn cached_players(minimum_seasons: i32, comps: &[String]) -> Option<Vec<String>> {
    with_cache(|cache| {
        cache
            .players
            .get(&(minimum_seasons, comps.to_vec()))
            .and_then(|entry| entry.fresh(QUERY_TTL))
    })
}

pub fn store_players(minimum_seasons: i32, comps: &[String], value: Vec<String>) {
    with_cache(|cache| {
        cache
            .players
            .insert((minimum_seasons, comps.to_vec()), Timed::new(value));
    });
}

pub fn cached_player_rows(
    minimum_seasons: i32,
    player: &str,
    comps: &[String],
) -> Option<Vec<AppearanceRow>> {
    with_cache(|cache| {
        cache
            .player_rows
            .get(&(minimum_seasons, player.to_string(), comps.to_vec()))
            .and_then(|entry| entry.fresh(QUERY_TTL))
    })
}

pub fn store_player_rows(
    minimum_seasons: i32,
    player: &str,
    comps: &[String],
    value: Vec<AppearanceRow>,
) {
    with_cache(|cache| {
        cache.player_rows.insert(
            (minimum_seasons, player.to_string(), comps.to_vec()),
            Timed::new(value),
        );
    });
}
