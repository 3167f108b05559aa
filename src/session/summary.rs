use std::collections::HashSet;

use crate::foundation::error::{PosecardError, PosecardResult};
use crate::session::model::{DrawingEvaluation, Participant, PoseImage};

/// A practiced pose with the drawings made of it, in submission order.
#[derive(Clone, Debug, PartialEq)]
pub struct PoseGroup {
    pub pose: PoseImage,
    pub drawings: Vec<DrawingEvaluation>,
}

/// Aggregates over every evaluation of the session.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SessionStats {
    pub total_evaluations: usize,
    /// Mean raw score (0..=100), `0.0` for an empty session.
    pub average_score: f64,
}

/// Evaluations grouped by pose, in session pose order. Poses without drawings are omitted.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionSummary {
    pub groups: Vec<PoseGroup>,
    pub stats: SessionStats,
}

impl SessionSummary {
    pub fn build(images: &[PoseImage], evaluations: &[DrawingEvaluation]) -> Self {
        let known: HashSet<&str> = images.iter().map(|i| i.id.as_str()).collect();
        for ev in evaluations {
            if !known.contains(ev.pose_id.as_str()) {
                tracing::warn!(
                    evaluation = %ev.id,
                    pose_id = %ev.pose_id,
                    "evaluation references an unknown pose; dropped from summary"
                );
            }
        }

        let groups = images
            .iter()
            .filter_map(|pose| {
                let drawings: Vec<_> = evaluations
                    .iter()
                    .filter(|ev| ev.pose_id == pose.id)
                    .cloned()
                    .collect();
                (!drawings.is_empty()).then(|| PoseGroup {
                    pose: pose.clone(),
                    drawings,
                })
            })
            .collect();

        let total_evaluations = evaluations.len();
        let average_score = if total_evaluations == 0 {
            0.0
        } else {
            evaluations.iter().map(|ev| ev.score).sum::<f64>() / total_evaluations as f64
        };

        Self {
            groups,
            stats: SessionStats {
                total_evaluations,
                average_score,
            },
        }
    }

    pub fn pose_count(&self) -> usize {
        self.groups.len()
    }

    /// Group of the practiced pose with 1-based `number`.
    pub fn pose_group(&self, number: usize) -> PosecardResult<&PoseGroup> {
        number
            .checked_sub(1)
            .and_then(|i| self.groups.get(i))
            .ok_or_else(|| {
                PosecardError::validation(format!(
                    "pose {number} out of range (session has {} practiced poses)",
                    self.groups.len()
                ))
            })
    }
}

/// Result of resolving an evaluation's participant id.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ParticipantLookup<'a> {
    Found(&'a Participant),
    Missing,
}

impl<'a> ParticipantLookup<'a> {
    /// The participant's name, or `fallback` when the participant is gone or unnamed.
    pub fn name_or(&self, fallback: &'a str) -> &'a str {
        match *self {
            Self::Found(p) if !p.name.is_empty() => p.name.as_str(),
            _ => fallback,
        }
    }
}

pub fn lookup_participant<'a>(participants: &'a [Participant], id: &str) -> ParticipantLookup<'a> {
    participants
        .iter()
        .find(|p| p.id == id)
        .map_or(ParticipantLookup::Missing, ParticipantLookup::Found)
}

#[cfg(test)]
#[path = "../../tests/unit/session/summary.rs"]
mod tests;
