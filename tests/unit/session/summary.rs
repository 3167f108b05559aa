use super::*;
use crate::session::model::ParticipantKind;

fn pose(id: &str) -> PoseImage {
    PoseImage {
        id: id.to_owned(),
        url: format!("https://img.example/{id}.jpg"),
        thumbnail: format!("https://img.example/{id}-s.jpg"),
        source_url: String::new(),
        title: id.to_uppercase(),
        author: None,
    }
}

fn eval(id: &str, pose_id: &str, participant: &str, score: f64) -> DrawingEvaluation {
    DrawingEvaluation {
        id: id.to_owned(),
        pose_id: pose_id.to_owned(),
        participant_id: participant.to_owned(),
        score,
        feedback: String::new(),
        drawing_thumbnail: String::new(),
    }
}

#[test]
fn groups_follow_pose_order_and_drop_empty_poses() {
    let images = [pose("a"), pose("b"), pose("c")];
    let evals = [
        eval("e1", "c", "u1", 70.0),
        eval("e2", "a", "u1", 90.0),
        eval("e3", "c", "u2", 50.0),
    ];
    let summary = SessionSummary::build(&images, &evals);

    let ids: Vec<_> = summary.groups.iter().map(|g| g.pose.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "c"]);
    let c_drawings: Vec<_> = summary.groups[1].drawings.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(c_drawings, vec!["e1", "e3"]);
    assert_eq!(summary.pose_count(), 2);
}

#[test]
fn stats_average_raw_scores() {
    let images = [pose("a")];
    let evals = [eval("e1", "a", "u", 83.0), eval("e2", "a", "u", 70.0)];
    let stats = SessionSummary::build(&images, &evals).stats;
    assert_eq!(stats.total_evaluations, 2);
    assert_eq!(stats.average_score, 76.5);
}

#[test]
fn empty_session_has_zero_average() {
    let summary = SessionSummary::build(&[pose("a")], &[]);
    assert!(summary.groups.is_empty());
    assert_eq!(summary.stats, SessionStats::default());
}

#[test]
fn dangling_pose_reference_is_dropped_but_counted() {
    let evals = [eval("e1", "ghost", "u", 40.0), eval("e2", "a", "u", 60.0)];
    let summary = SessionSummary::build(&[pose("a")], &evals);
    assert_eq!(summary.groups.len(), 1);
    assert_eq!(summary.groups[0].drawings.len(), 1);
    assert_eq!(summary.stats.total_evaluations, 2);
}

#[test]
fn participant_lookup_reports_missing() {
    let roster = [Participant {
        id: "u1".to_owned(),
        name: "Lucía".to_owned(),
        kind: ParticipantKind::Girl,
    }];
    let found = lookup_participant(&roster, "u1");
    assert!(matches!(found, ParticipantLookup::Found(p) if p.name == "Lucía"));
    assert_eq!(found.name_or("Artista"), "Lucía");

    let unnamed = [Participant {
        name: String::new(),
        ..roster[0].clone()
    }];
    assert_eq!(lookup_participant(&unnamed, "u1").name_or("Artista"), "Artista");

    let missing = lookup_participant(&roster, "u9");
    assert_eq!(missing, ParticipantLookup::Missing);
    assert_eq!(missing.name_or("Artista"), "Artista");
}

#[test]
fn pose_group_is_one_based() {
    let summary = SessionSummary::build(&[pose("a"), pose("b")], &[eval("e1", "b", "u", 10.0)]);
    assert_eq!(summary.pose_group(1).unwrap().pose.id, "b");
    for bad in [0, 2] {
        assert!(matches!(
            summary.pose_group(bad),
            Err(crate::foundation::error::PosecardError::Validation(_))
        ));
    }
}
