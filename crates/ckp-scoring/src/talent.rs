//! Talent score stub: a fixed linear formula over tabular features.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const MEAN_WQI: &str = "mean_wqi";
pub const TRAINING_HOURS: &str = "training_hours_180";
pub const LATE_DAYS: &str = "late_days_30";

const DEFAULT_MEAN_WQI: f64 = 50.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TalentRequest {
    pub pegawai_id: String,
    #[serde(default)]
    pub features: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TalentBand {
    High,
    Medium,
    Emerging,
}

impl TalentBand {
    pub fn from_score(score: u8) -> Self {
        if score >= 70 {
            TalentBand::High
        } else if score >= 40 {
            TalentBand::Medium
        } else {
            TalentBand::Emerging
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TalentBand::High => "High",
            TalentBand::Medium => "Medium",
            TalentBand::Emerging => "Emerging",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TalentResponse {
    pub pegawai_id: String,
    pub talent_score: u8,
    pub band: TalentBand,
    pub top_factors: BTreeMap<String, f64>,
}

/// Scores a request; missing features take their defaults.
pub fn score_talent(request: &TalentRequest) -> TalentResponse {
    let feature = |name: &str, default: f64| {
        request
            .features
            .get(name)
            .copied()
            .filter(|value| value.is_finite())
            .unwrap_or(default)
    };
    let mean_wqi = feature(MEAN_WQI, DEFAULT_MEAN_WQI);
    let training = feature(TRAINING_HOURS, 0.0);
    let late = feature(LATE_DAYS, 0.0);

    let raw = 0.6 * mean_wqi + 0.8 * training - 2.0 * late;
    let talent_score = raw.clamp(0.0, 100.0).trunc() as u8;

    TalentResponse {
        pegawai_id: request.pegawai_id.clone(),
        talent_score,
        band: TalentBand::from_score(talent_score),
        top_factors: BTreeMap::from([
            (MEAN_WQI.to_string(), mean_wqi),
            (TRAINING_HOURS.to_string(), training),
            (LATE_DAYS.to_string(), late),
        ]),
    }
}
