use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};

use eurostats_terminal::aggregate::{aggregate_player, season_label, season_stats};
use eurostats_terminal::queries::AppearanceRow;

fn sample_rows(seasons: i32, matches_per_season: usize) -> Vec<AppearanceRow> {
    let mut rows = Vec::with_capacity(seasons as usize * matches_per_season);
    for offset in 0..seasons {
        // Leave every fourth season empty so densification has work to do.
        if offset % 4 == 3 {
            continue;
        }
        let season = season_label(2000 + offset);
        for m in 0..matches_per_season {
            rows.push(AppearanceRow {
                player_name: "P. Johansson".to_string(),
                competition_name: "Champions League".to_string(),
                season_name: season.clone(),
                team_name: if offset < seasons / 2 {
                    "Albion Rovers".to_string()
                } else {
                    "Real Oriente".to_string()
                },
                nationality: "Sweden".to_string(),
                player_position: if m % 9 == 0 { "N/A" } else { "FW" }.to_string(),
                shirt_number: Some(if m % 7 == 0 { -1 } else { 11 }),
                minutes_played: Some(90),
                goals: Some(if m % 5 == 0 { -1 } else { (m % 3) as i32 }),
                assists: Some(if offset < 15 { -1 } else { 1 }),
                yellow_cards: Some(0),
                red_cards: Some(0),
                number_of_seasons: seasons,
            });
        }
    }
    rows
}

fn bench_aggregate_player(c: &mut Criterion) {
    let rows = sample_rows(20, 10);
    c.bench_function("aggregate_player", |b| {
        b.iter(|| {
            let aggregate = aggregate_player(black_box(&rows), &[]).unwrap();
            black_box(aggregate.overview.appearances);
        })
    });
}

fn bench_season_densification(c: &mut Criterion) {
    let rows = sample_rows(30, 8);
    c.bench_function("season_stats_densify", |b| {
        b.iter(|| {
            let stats = season_stats(black_box(&rows));
            black_box(stats.len());
        })
    });
}

criterion_group!(benches, bench_aggregate_player, bench_season_densification);
criterion_main!(benches);
