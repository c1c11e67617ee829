use serde::{Deserialize, Serialize};

/// A running route.
///
/// `length` is the full distance in the track's own unit. Progress on a run
/// is reported either as `full` or as a partial amount in that unit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub id: String,
    pub name: String,
    pub length: f64,
    pub url: String,
    pub progress_unit: ProgressUnit,
}

/// Unit in which progress along a track is measured.
///
/// - `Km`: distance in kilometres
/// - `Flight`: flights of stairs
/// - `Pole`: lamp posts or similar markers
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProgressUnit {
    Km,
    Flight,
    Pole,
}

impl ProgressUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Km => "km",
            Self::Flight => "flight",
            Self::Pole => "pole",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "km" => Some(Self::Km),
            "flight" => Some(Self::Flight),
            "pole" => Some(Self::Pole),
            _ => None,
        }
    }
}
