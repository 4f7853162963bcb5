use eurostats_terminal::queries::AppearanceRow;
use eurostats_terminal::state::{
    AppState, DEFAULT_COMPETITION, Delta, Focus, Notice, ProviderCommand, apply_delta,
};

fn row(season: &str, goals: Option<i32>) -> AppearanceRow {
    AppearanceRow {
        player_name: "M. Rossi".to_string(),
        competition_name: DEFAULT_COMPETITION.to_string(),
        season_name: season.to_string(),
        team_name: "FC Aurora".to_string(),
        nationality: "Italy".to_string(),
        player_position: "FW".to_string(),
        shirt_number: Some(10),
        minutes_played: Some(90),
        goals,
        assists: Some(0),
        yellow_cards: Some(0),
        red_cards: Some(0),
        number_of_seasons: 4,
    }
}

fn competitions() -> Vec<String> {
    vec![
        "Europa League".to_string(),
        DEFAULT_COMPETITION.to_string(),
    ]
}

#[test]
fn startup_requests_the_initial_load() {
    let state = AppState::new();
    assert_eq!(state.pending, vec![ProviderCommand::LoadInitial]);
    assert_eq!(state.notice(), Some(Notice::SelectCompetition));
}

#[test]
fn competitions_delta_preselects_the_default_and_chains_queries() {
    let mut state = AppState::new();
    state.pending.clear();

    apply_delta(&mut state, Delta::Competitions(competitions()));

    // Options are sorted for display.
    assert_eq!(
        state.competition_options,
        vec![DEFAULT_COMPETITION.to_string(), "Europa League".to_string()]
    );
    assert_eq!(state.selected_comps, vec![DEFAULT_COMPETITION.to_string()]);
    assert_eq!(
        state.pending,
        vec![
            ProviderCommand::LoadSeasonBounds {
                comps: vec![DEFAULT_COMPETITION.to_string()],
            },
            ProviderCommand::LoadPlayers {
                minimum_seasons: state.minimum_seasons,
                comps: vec![DEFAULT_COMPETITION.to_string()],
            },
        ]
    );
}

#[test]
fn players_delta_auto_selects_the_first_option() {
    let mut state = AppState::new();
    apply_delta(&mut state, Delta::Competitions(competitions()));
    state.pending.clear();

    let delta = Delta::Players {
        minimum_seasons: state.minimum_seasons,
        comps: state.selected_comps.clone(),
        players: vec!["A. Kovač".to_string(), "M. Rossi".to_string()],
    };
    apply_delta(&mut state, delta);

    assert_eq!(state.selected_player.as_deref(), Some("A. Kovač"));
    assert!(matches!(
        state.pending.as_slice(),
        [ProviderCommand::LoadPlayerRows { player, .. }] if player == "A. Kovač"
    ));
}

#[test]
fn stale_players_delta_is_dropped() {
    let mut state = AppState::new();
    apply_delta(&mut state, Delta::Competitions(competitions()));
    state.pending.clear();

    // Arrived for a threshold the user has already moved away from.
    let delta = Delta::Players {
        minimum_seasons: state.minimum_seasons + 1,
        comps: state.selected_comps.clone(),
        players: vec!["Stale Player".to_string()],
    };
    apply_delta(&mut state, delta);

    assert!(state.player_options.is_empty());
    assert!(state.selected_player.is_none());
    assert!(state.pending.is_empty());
}

#[test]
fn player_rows_delta_builds_the_aggregate_and_season_options() {
    let mut state = AppState::new();
    apply_delta(&mut state, Delta::Competitions(competitions()));
    let delta = Delta::Players {
        minimum_seasons: state.minimum_seasons,
        comps: state.selected_comps.clone(),
        players: vec!["M. Rossi".to_string()],
    };
    apply_delta(&mut state, delta);
    state.pending.clear();

    let delta = Delta::PlayerRows {
        minimum_seasons: state.minimum_seasons,
        player: "M. Rossi".to_string(),
        comps: state.selected_comps.clone(),
        rows: vec![row("2015/2016", Some(2)), row("2017/2018", Some(1))],
    };
    apply_delta(&mut state, delta);

    assert!(state.player_rows_loaded);
    let aggregate = state.aggregate.as_ref().expect("aggregate computed");
    assert_eq!(aggregate.overview.appearances, 2);
    // Most recent season first.
    assert_eq!(
        state.season_options,
        vec!["2017/2018".to_string(), "2015/2016".to_string()]
    );
    assert_eq!(state.notice(), None);
}

#[test]
fn empty_player_rows_surface_the_no_data_warning() {
    let mut state = AppState::new();
    apply_delta(&mut state, Delta::Competitions(competitions()));
    let delta = Delta::Players {
        minimum_seasons: state.minimum_seasons,
        comps: state.selected_comps.clone(),
        players: vec!["M. Rossi".to_string()],
    };
    apply_delta(&mut state, delta);

    let delta = Delta::PlayerRows {
        minimum_seasons: state.minimum_seasons,
        player: "M. Rossi".to_string(),
        comps: state.selected_comps.clone(),
        rows: Vec::new(),
    };
    apply_delta(&mut state, delta);

    assert_eq!(state.notice(), Some(Notice::NoRowsForPlayer));
}

#[test]
fn toggling_a_competition_resets_every_downstream_stage() {
    let mut state = AppState::new();
    apply_delta(&mut state, Delta::Competitions(competitions()));
    let delta = Delta::Players {
        minimum_seasons: state.minimum_seasons,
        comps: state.selected_comps.clone(),
        players: vec!["M. Rossi".to_string()],
    };
    apply_delta(&mut state, delta);
    let delta = Delta::PlayerRows {
        minimum_seasons: state.minimum_seasons,
        player: "M. Rossi".to_string(),
        comps: state.selected_comps.clone(),
        rows: vec![row("2015/2016", Some(2))],
    };
    apply_delta(&mut state, delta);
    state.pending.clear();

    // Deselect the only competition.
    state.focus = Focus::Competitions;
    state.competition_cursor = 0;
    state.toggle_competition_at_cursor();

    assert!(state.selected_comps.is_empty());
    assert!(state.player_options.is_empty());
    assert!(state.selected_player.is_none());
    assert!(state.player_rows.is_empty());
    assert!(state.season_options.is_empty());
    assert!(state.aggregate.is_none());
    assert_eq!(state.notice(), Some(Notice::SelectCompetition));
    // No competitions selected: nothing to query.
    assert!(state.pending.is_empty());
}

#[test]
fn minimum_seasons_clamps_to_the_reported_maximum() {
    let mut state = AppState::new();
    apply_delta(&mut state, Delta::Competitions(competitions()));
    let delta = Delta::MaxSeasons {
        comps: state.selected_comps.clone(),
        value: Some(5),
    };
    apply_delta(&mut state, delta);
    state.pending.clear();

    state.bump_minimum_seasons(10);
    assert_eq!(state.minimum_seasons, 5);

    state.bump_minimum_seasons(-10);
    assert_eq!(state.minimum_seasons, 1);
}

#[test]
fn shrinking_maximum_pulls_the_threshold_down() {
    let mut state = AppState::new();
    apply_delta(&mut state, Delta::Competitions(competitions()));
    state.pending.clear();

    // Default threshold is 3; a two-season competition set caps it.
    let delta = Delta::MaxSeasons {
        comps: state.selected_comps.clone(),
        value: Some(2),
    };
    apply_delta(&mut state, delta);
    assert_eq!(state.minimum_seasons, 2);
    assert!(
        state
            .pending
            .iter()
            .any(|cmd| matches!(cmd, ProviderCommand::LoadPlayers { minimum_seasons: 2, .. }))
    );
}

#[test]
fn season_toggle_reaggregates_without_a_query() {
    let mut state = AppState::new();
    apply_delta(&mut state, Delta::Competitions(competitions()));
    let delta = Delta::Players {
        minimum_seasons: state.minimum_seasons,
        comps: state.selected_comps.clone(),
        players: vec!["M. Rossi".to_string()],
    };
    apply_delta(&mut state, delta);
    let delta = Delta::PlayerRows {
        minimum_seasons: state.minimum_seasons,
        player: "M. Rossi".to_string(),
        comps: state.selected_comps.clone(),
        rows: vec![row("2015/2016", Some(2)), row("2017/2018", Some(1))],
    };
    apply_delta(&mut state, delta);
    state.pending.clear();

    state.focus = Focus::Seasons;
    state.season_cursor = 0; // "2017/2018", most recent first
    state.toggle_season_at_cursor();

    assert_eq!(state.selected_seasons, vec!["2017/2018".to_string()]);
    let aggregate = state.aggregate.as_ref().expect("aggregate recomputed");
    assert_eq!(aggregate.overview.appearances, 1);
    assert_eq!(aggregate.overview.goals, 1);
    assert!(state.pending.is_empty());
}
