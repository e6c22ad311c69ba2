use super::*;
use crate::net::types::GraphPoint;

fn point(credit_score: u32, approved: bool) -> GraphPoint {
    GraphPoint { credit_score, income: None, approved }
}

#[test]
fn score_breakdown_empty_graph() {
    assert_eq!(score_breakdown(&GraphData::default()), ScoreBreakdown::default());
}

#[test]
fn score_breakdown_tracks_extremes() {
    let graph = GraphData {
        name: "Freedom".into(),
        points: vec![point(720, true), point(690, true), point(700, false), point(640, false), point(750, true)],
    };
    assert_eq!(
        score_breakdown(&graph),
        ScoreBreakdown { approved: 3, denied: 2, lowest_approved: Some(690), highest_denied: Some(700) }
    );
}

#[test]
fn score_or_dash_formats_missing() {
    assert_eq!(score_or_dash(None), "—");
    assert_eq!(score_or_dash(Some(701)), "701");
}
