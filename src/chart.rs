use serde::Serialize;

use crate::aggregate::{PlayerOverview, SeasonStat};

// Brand colors carried through to the renderer: orange for appearances,
// blue for goals.
pub const APPEARANCES_COLOR: Rgb = Rgb(255, 128, 14);
pub const GOALS_COLOR: Rgb = Rgb(28, 156, 224);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricTile {
    pub label: String,
    pub value: String,
}

// One y-axis of the combined chart. Labels, ticks and grid are suppressed;
// only the color-coded title survives.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisSpec {
    pub title: String,
    pub side: AxisSide,
    pub color: Rgb,
    pub labels_visible: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AxisSide {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub season: String,
    pub appearances: u32,
    pub goals: i64,
}

// Declarative dual-axis chart: bars for appearances (left), a line with
// point markers for goals (right), one categorical season x-axis, shared
// y-scale. Each point doubles as its own hover row for renderers that
// support tooltips.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonChartSpec {
    pub title: String,
    pub points: Vec<ChartPoint>,
    pub bar_axis: AxisSpec,
    pub line_axis: AxisSpec,
    pub line_point_markers: bool,
    pub y_max: f64,
}

pub fn season_chart_spec(player: &str, seasons: &[SeasonStat]) -> SeasonChartSpec {
    let points: Vec<ChartPoint> = seasons
        .iter()
        .map(|stat| ChartPoint {
            season: stat.season.clone(),
            appearances: stat.appearances,
            goals: stat.goals,
        })
        .collect();

    let y_max = points
        .iter()
        .map(|p| (p.appearances as i64).max(p.goals))
        .max()
        .unwrap_or(0)
        .max(1) as f64;

    SeasonChartSpec {
        title: format!("Appearances and goals per season for {}", display_name(player)),
        points,
        bar_axis: AxisSpec {
            title: "Appearances".to_string(),
            side: AxisSide::Left,
            color: APPEARANCES_COLOR,
            labels_visible: false,
        },
        line_axis: AxisSpec {
            title: "Goals".to_string(),
            side: AxisSide::Right,
            color: GOALS_COLOR,
            labels_visible: false,
        },
        line_point_markers: true,
        y_max,
    }
}

// Metric tiles in display order, matching the overview panel layout.
pub fn overview_tiles(overview: &PlayerOverview) -> Vec<MetricTile> {
    vec![
        tile("Number of seasons", overview.seasons_played.to_string()),
        tile("Appearances", overview.appearances.to_string()),
        tile("Goals", overview.goals.to_string()),
        tile(
            "Assists (tracked from 2015 onwards)",
            overview.assists.to_string(),
        ),
        tile("Nationality", overview.nationality.clone()),
        tile("Position", overview.main_position.clone()),
        tile("Most used shirt number", overview.shirt_number.clone()),
        tile("Yellow Cards", overview.yellow_cards.to_string()),
        tile("Red Cards", overview.red_cards.to_string()),
        tile("Total minutes played", overview.minutes_played.to_string()),
    ]
}

fn tile(label: &str, value: String) -> MetricTile {
    MetricTile {
        label: label.to_string(),
        value,
    }
}

// Player options may carry a disambiguating club suffix, e.g.
// "John Doe (Ajax)"; the display name drops it.
pub fn display_name(player: &str) -> &str {
    match player.find(" (") {
        Some(idx) => &player[..idx],
        None => player,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_strips_club_suffix() {
        assert_eq!(display_name("John Doe (Ajax)"), "John Doe");
        assert_eq!(display_name("John Doe"), "John Doe");
    }

    #[test]
    fn chart_spec_shares_one_scale() {
        let seasons = vec![
            SeasonStat {
                season: "2015/2016".to_string(),
                appearances: 8,
                goals: 11,
            },
            SeasonStat {
                season: "2016/2017".to_string(),
                appearances: 5,
                goals: 2,
            },
        ];
        let spec = season_chart_spec("John Doe", &seasons);
        assert_eq!(spec.points.len(), 2);
        assert_eq!(spec.y_max, 11.0);
        assert_eq!(spec.bar_axis.side, AxisSide::Left);
        assert_eq!(spec.line_axis.side, AxisSide::Right);
        assert!(!spec.bar_axis.labels_visible);
    }
}
