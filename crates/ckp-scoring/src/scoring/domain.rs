use serde::{Deserialize, Deserializer, Serialize};

/// Lower bound of every sub-score.
pub const SUB_SCORE_MIN: u8 = 1;
/// Upper bound of every sub-score.
pub const SUB_SCORE_MAX: u8 = 5;

/// Opaque identifier echoed back alongside the scores.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub String);

impl EntryId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EntryId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A CKP narrative submitted for scoring. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrativeEntry {
    pub entry_id: EntryId,
    #[serde(rename = "uraian_teks", alias = "text")]
    pub text: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub target: Option<f64>,
    #[serde(
        rename = "realisasi",
        alias = "realized",
        default,
        deserialize_with = "lenient_number"
    )]
    pub realized: Option<f64>,
}

impl NarrativeEntry {
    pub fn new(entry_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            entry_id: EntryId(entry_id.into()),
            text: text.into(),
            target: None,
            realized: None,
        }
    }

    pub fn with_target(mut self, target: f64) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_realized(mut self, realized: f64) -> Self {
        self.realized = Some(realized);
        self
    }
}

/// The five fixed scoring dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Relevance,
    Impact,
    Evidence,
    Clarity,
    Compliance,
}

impl Dimension {
    pub const ALL: [Dimension; 5] = [
        Dimension::Relevance,
        Dimension::Impact,
        Dimension::Evidence,
        Dimension::Clarity,
        Dimension::Compliance,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Dimension::Relevance => "relevance",
            Dimension::Impact => "impact",
            Dimension::Evidence => "evidence",
            Dimension::Clarity => "clarity",
            Dimension::Compliance => "compliance",
        }
    }
}

/// Five sub-scores, each held in `[SUB_SCORE_MIN, SUB_SCORE_MAX]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubScores {
    relevance: u8,
    impact: u8,
    evidence: u8,
    clarity: u8,
    compliance: u8,
}

impl SubScores {
    /// Builds a set of sub-scores, clamping each value into range.
    pub fn new(relevance: i32, impact: i32, evidence: i32, clarity: i32, compliance: i32) -> Self {
        Self {
            relevance: clamp_sub_score(relevance),
            impact: clamp_sub_score(impact),
            evidence: clamp_sub_score(evidence),
            clarity: clamp_sub_score(clarity),
            compliance: clamp_sub_score(compliance),
        }
    }

    pub fn relevance(&self) -> u8 {
        self.relevance
    }

    pub fn impact(&self) -> u8 {
        self.impact
    }

    pub fn evidence(&self) -> u8 {
        self.evidence
    }

    pub fn clarity(&self) -> u8 {
        self.clarity
    }

    pub fn compliance(&self) -> u8 {
        self.compliance
    }

    pub fn get(&self, dimension: Dimension) -> u8 {
        match dimension {
            Dimension::Relevance => self.relevance,
            Dimension::Impact => self.impact,
            Dimension::Evidence => self.evidence,
            Dimension::Clarity => self.clarity,
            Dimension::Compliance => self.compliance,
        }
    }

    pub fn total(&self) -> u16 {
        Dimension::ALL
            .iter()
            .map(|dimension| u16::from(self.get(*dimension)))
            .sum()
    }

    /// Work Quality Index: the mean sub-score rescaled from `[1, 5]` onto `[0, 100]`.
    ///
    /// `(mean - 1) / 4 * 100` reduces to `(total - 5) * 5` for five integer sub-scores, so the
    /// result is always an exact integer and no rounding tie can arise.
    pub fn composite(&self) -> u8 {
        let floor = u16::from(SUB_SCORE_MIN) * Dimension::ALL.len() as u16;
        let scaled = (self.total().saturating_sub(floor)) * 5;
        scaled.min(100) as u8
    }
}

/// Sub-scores plus the composite index for one narrative.
///
/// The index is either derived from the sub-scores ([`ScoreCard::from_sub_scores`]) or supplied
/// by a trained classifier; nothing else can set it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoreCard {
    #[serde(flatten)]
    sub_scores: SubScores,
    wqi: u8,
}

impl ScoreCard {
    pub fn from_sub_scores(sub_scores: SubScores) -> Self {
        Self {
            wqi: sub_scores.composite(),
            sub_scores,
        }
    }

    pub(crate) fn with_classifier_wqi(sub_scores: SubScores, wqi: u8) -> Self {
        Self {
            sub_scores,
            wqi: wqi.min(100),
        }
    }

    pub fn sub_scores(&self) -> SubScores {
        self.sub_scores
    }

    pub fn wqi(&self) -> u8 {
        self.wqi
    }
}

/// Wire shape returned for each scored entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryScore {
    pub entry_id: EntryId,
    pub work_quality: u8,
    pub relevance: u8,
    pub impact: u8,
    pub evidence: u8,
    pub clarity: u8,
    pub compliance: u8,
    pub wqi: u8,
}

impl EntryScore {
    pub fn new(entry_id: EntryId, card: &ScoreCard) -> Self {
        let scores = card.sub_scores();
        Self {
            entry_id,
            work_quality: card.wqi(),
            relevance: scores.relevance(),
            impact: scores.impact(),
            evidence: scores.evidence(),
            clarity: scores.clarity(),
            compliance: scores.compliance(),
            wqi: card.wqi(),
        }
    }
}

pub(crate) fn clamp_sub_score(value: i32) -> u8 {
    value.clamp(i32::from(SUB_SCORE_MIN), i32::from(SUB_SCORE_MAX)) as u8
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LenientNumber {
    Number(f64),
    Text(String),
    Other(serde::de::IgnoredAny),
}

impl LenientNumber {
    fn into_value(self) -> Option<f64> {
        match self {
            LenientNumber::Number(value) => Some(value),
            LenientNumber::Text(raw) => raw.trim().parse::<f64>().ok(),
            LenientNumber::Other(_) => None,
        }
        .filter(|value| value.is_finite())
    }
}

/// Accepts a number, a numeric string, or null; anything else reads as "not supplied".
pub(crate) fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<LenientNumber>::deserialize(deserializer)?;
    Ok(raw.and_then(LenientNumber::into_value))
}
