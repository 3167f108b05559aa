use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::foundation::error::{PosecardError, PosecardResult};

/// A reference pose fetched for the session.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoseImage {
    pub id: String,
    /// Full-size image; this is what the composites draw.
    pub url: String,
    pub thumbnail: String,
    pub source_url: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

/// Profile category of a participant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ParticipantKind {
    AdultMale,
    AdultFemale,
    Girl,
    Boy,
    Person,
    LittlePerson,
}

/// Display data attached to a [`ParticipantKind`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Profile {
    pub label: &'static str,
    pub emoji: &'static str,
    /// Palette name (`orange`, `pink`, `emerald`).
    pub color: &'static str,
}

impl ParticipantKind {
    /// Roster cycling order.
    pub const ALL: [Self; 6] = [
        Self::AdultMale,
        Self::AdultFemale,
        Self::Girl,
        Self::Boy,
        Self::Person,
        Self::LittlePerson,
    ];

    pub fn profile(self) -> Profile {
        let (label, emoji, color) = match self {
            Self::AdultMale => ("Adulto", "👨", "orange"),
            Self::AdultFemale => ("Adulta", "👩", "pink"),
            Self::Girl => ("Niña", "👧", "pink"),
            Self::Boy => ("Niño", "👦", "emerald"),
            Self::Person => ("Persona", "👤", "orange"),
            Self::LittlePerson => ("Persona Pequeña", "✨", "emerald"),
        };
        Profile {
            label,
            emoji,
            color,
        }
    }

}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Participant {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ParticipantKind,
}

/// One scored drawing.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawingEvaluation {
    pub id: String,
    pub pose_id: String,
    pub participant_id: String,
    /// 0..=100 as returned by the evaluator.
    pub score: f64,
    pub feedback: String,
    /// Usually a `data:` URI.
    pub drawing_thumbnail: String,
}

/// Session state handed over by the practice app.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SessionSnapshot {
    #[serde(default)]
    pub images: Vec<PoseImage>,
    #[serde(default)]
    pub participants: Vec<Participant>,
    #[serde(default)]
    pub evaluations: Vec<DrawingEvaluation>,
}

impl SessionSnapshot {
    pub fn from_reader<R: std::io::Read>(r: R) -> PosecardResult<Self> {
        let snapshot: Self = serde_json::from_reader(r)
            .map_err(|e| PosecardError::serde(format!("parse session snapshot JSON: {e}")))?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    pub fn from_path(path: impl AsRef<Path>) -> PosecardResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            PosecardError::validation(format!("open session snapshot '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Pose ids must be unique, since evaluations are grouped by them.
    pub fn validate(&self) -> PosecardResult<()> {
        let mut seen = HashSet::new();
        for img in &self.images {
            if !seen.insert(img.id.as_str()) {
                return Err(PosecardError::validation(format!(
                    "duplicate pose id '{}' in session images",
                    img.id
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/model.rs"]
mod tests;
