//! Structured chart record extracted from an engine report.

use serde::Serialize;

/// Structured view of one engine report.
///
/// Built once per calculation and serialized straight into the response.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ParsedChart {
    pub basic: BasicInfo,
    pub five_elements: FiveElements,
    pub patterns: Vec<String>,
    pub spirits: Vec<String>,
    pub analysis: Vec<String>,
    pub raw_output: String,
}

impl ParsedChart {
    /// An empty chart that only carries the raw report text.
    pub fn from_raw(raw_output: &str) -> Self {
        Self {
            raw_output: raw_output.to_string(),
            ..Self::default()
        }
    }
}

/// Dates, palaces and the four pillars. Keys that were not found are omitted.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct BasicInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lunar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minggong: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub taiyuan: Option<String>,
    /// Heavenly stems of the year, month, day and hour pillars.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gans: Option<[String; 4]>,
    /// Earthly branches of the year, month, day and hour pillars.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zhis: Option<[String; 4]>,
}

/// Five-element scores with the chart strength layered into the same map.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FiveElements {
    #[serde(flatten)]
    pub scores: Option<ElementScores>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strength: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_weak: Option<bool>,
}

impl FiveElements {
    pub fn is_empty(&self) -> bool {
        self.scores.is_none() && self.strength.is_none() && self.is_weak.is_none()
    }
}

/// Scores for metal (金), wood (木), water (水), fire (火) and earth (土).
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct ElementScores {
    pub metal: i64,
    pub wood: i64,
    pub water: i64,
    pub fire: i64,
    pub earth: i64,
}
