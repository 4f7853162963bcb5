use eurostats_terminal::aggregate::{aggregate_player, compute_overview, scrub_sentinels, team_order};
use eurostats_terminal::queries::AppearanceRow;

fn row(season: &str, team: &str, goals: Option<i32>) -> AppearanceRow {
    AppearanceRow {
        player_name: "John Doe".to_string(),
        competition_name: "Champions League".to_string(),
        season_name: season.to_string(),
        team_name: team.to_string(),
        nationality: "Ireland".to_string(),
        player_position: "FW".to_string(),
        shirt_number: Some(9),
        minutes_played: Some(90),
        goals,
        assists: Some(1),
        yellow_cards: Some(0),
        red_cards: Some(0),
        number_of_seasons: 3,
    }
}

#[test]
fn sentinel_goals_contribute_nothing_to_the_sum() {
    let mut rows = vec![
        row("2015/2016", "Albion Rovers", Some(2)),
        row("2016/2017", "Albion Rovers", Some(-1)),
        row("2017/2018", "Albion Rovers", Some(0)),
    ];
    scrub_sentinels(&mut rows);

    let overview = compute_overview(&rows).expect("non-empty rows");
    // -1 is missing data, not a value; the true zero still counts as a row.
    assert_eq!(overview.goals, 2);
    assert_eq!(overview.appearances, 3);
}

#[test]
fn sentinel_shirt_numbers_are_excluded_from_the_mode() {
    let mut rows = vec![
        row("2015/2016", "Albion Rovers", Some(1)),
        row("2016/2017", "Albion Rovers", Some(1)),
        row("2017/2018", "Albion Rovers", Some(1)),
    ];
    rows[0].shirt_number = Some(-1);
    rows[1].shirt_number = Some(-1);
    rows[2].shirt_number = Some(7);
    scrub_sentinels(&mut rows);

    let overview = compute_overview(&rows).expect("non-empty rows");
    assert_eq!(overview.shirt_number, "7");
}

#[test]
fn all_missing_shirt_numbers_fall_back_to_unknown() {
    let mut rows = vec![row("2015/2016", "Albion Rovers", Some(1))];
    rows[0].shirt_number = Some(-1);
    scrub_sentinels(&mut rows);

    let overview = compute_overview(&rows).expect("non-empty rows");
    assert_eq!(overview.shirt_number, "Unknown");
}

#[test]
fn position_mode_skips_na_and_falls_back_to_unknown() {
    let mut rows = vec![
        row("2015/2016", "Albion Rovers", Some(0)),
        row("2016/2017", "Albion Rovers", Some(0)),
        row("2017/2018", "Albion Rovers", Some(0)),
    ];
    rows[0].player_position = "N/A".to_string();
    rows[1].player_position = "N/A".to_string();
    rows[2].player_position = "MF".to_string();
    let overview = compute_overview(&rows).expect("non-empty rows");
    assert_eq!(overview.main_position, "MF");

    for r in &mut rows {
        r.player_position = "N/A".to_string();
    }
    let overview = compute_overview(&rows).expect("non-empty rows");
    assert_eq!(overview.main_position, "Unknown");
}

#[test]
fn nationality_mode_ties_break_by_first_encountered() {
    let mut rows = vec![
        row("2015/2016", "Albion Rovers", Some(0)),
        row("2016/2017", "Albion Rovers", Some(0)),
        row("2017/2018", "Albion Rovers", Some(0)),
        row("2018/2019", "Albion Rovers", Some(0)),
    ];
    rows[0].nationality = "Portugal".to_string();
    rows[1].nationality = "Spain".to_string();
    rows[2].nationality = "Spain".to_string();
    rows[3].nationality = "Portugal".to_string();

    let overview = compute_overview(&rows).expect("non-empty rows");
    assert_eq!(overview.nationality, "Portugal");
}

#[test]
fn team_order_follows_earliest_season_not_input_order() {
    let rows = vec![
        row("2012/2013", "Team A", Some(0)),
        row("2011/2012", "Team B", Some(0)),
        row("2010/2011", "Team A", Some(0)),
    ];
    assert_eq!(team_order(&rows), vec!["Team A", "Team B"]);

    let mut reversed = rows.clone();
    reversed.reverse();
    assert_eq!(team_order(&reversed), vec!["Team A", "Team B"]);
}

#[test]
fn teams_are_joined_with_an_en_dash_separator() {
    let rows = vec![
        row("2012/2013", "Team B", Some(0)),
        row("2010/2011", "Team A", Some(0)),
    ];
    let overview = compute_overview(&rows).expect("non-empty rows");
    assert_eq!(overview.teams, "Team A – Team B");
}

#[test]
fn end_to_end_champions_league_scenario() {
    let rows = vec![
        row("2015/2016", "Albion Rovers", Some(2)),
        row("2017/2018", "Albion Rovers", Some(-1)),
    ];

    let aggregate = aggregate_player(&rows, &[]).expect("rows present");
    assert_eq!(aggregate.overview.appearances, 2);
    assert_eq!(aggregate.overview.goals, 2);

    let seasons: Vec<(&str, u32, i64)> = aggregate
        .seasons
        .iter()
        .map(|s| (s.season.as_str(), s.appearances, s.goals))
        .collect();
    assert_eq!(
        seasons,
        vec![
            ("2015/2016", 1, 2),
            ("2016/2017", 0, 0),
            ("2017/2018", 1, 0),
        ]
    );
}

#[test]
fn identical_inputs_aggregate_identically() {
    let rows = vec![
        row("2015/2016", "Albion Rovers", Some(2)),
        row("2016/2017", "Real Oriente", Some(-1)),
        row("2018/2019", "Real Oriente", Some(1)),
    ];
    let first = aggregate_player(&rows, &[]).expect("rows present");
    let second = aggregate_player(&rows, &[]).expect("rows present");
    assert_eq!(first, second);
}

#[test]
fn season_subset_filter_narrows_before_aggregation() {
    let rows = vec![
        row("2015/2016", "Albion Rovers", Some(2)),
        row("2016/2017", "Albion Rovers", Some(3)),
    ];
    let aggregate =
        aggregate_player(&rows, &["2016/2017".to_string()]).expect("one season remains");
    assert_eq!(aggregate.overview.appearances, 1);
    assert_eq!(aggregate.overview.goals, 3);
    assert_eq!(aggregate.seasons.len(), 1);

    // A filter that matches nothing is the empty-result state.
    assert!(aggregate_player(&rows, &["1999/2000".to_string()]).is_none());
}

#[test]
fn empty_rows_yield_no_aggregate() {
    assert!(aggregate_player(&[], &[]).is_none());
}
