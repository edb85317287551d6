//! Declarative rule tables for the narrative scorers.
//!
//! Each dimension is a base score plus a list of contributions evaluated against an
//! [`Observation`] of the narrative. The heuristic scorer and the model-backed proxy scorer use
//! separate tables with their own keyword sets.

use std::sync::OnceLock;

use regex::Regex;

use super::domain::{clamp_sub_score, Dimension, SubScores};

/// Task-action verbs that mark the narrative as describing performed work.
pub const ACTION_VERBS: &[&str] = &[
    "menyusun",
    "menganalisis",
    "mengolah",
    "menyelesaikan",
    "mengembangkan",
    "memverifikasi",
    "menyediakan",
    "merekap",
];
/// Performance-reporting vocabulary.
pub const PERFORMANCE_TERMS: &[&str] = &["kinerja", "laporan", "sop"];
/// Outcome words signalling measurable impact.
pub const IMPACT_TERMS: &[&str] = &[
    "efisiensi",
    "meningkat",
    "turun",
    "akurat",
    "capaian",
    "realisasi",
];
/// Units of measure and reference points.
pub const MEASURE_UNITS: &[&str] = &[
    "%",
    "indikator",
    "berkas",
    "tautan",
    "link",
    "baseline",
    "target",
];
pub const SENTENCE_PUNCTUATION: &[&str] = &[",", "."];

pub const PROXY_PLANNING_TERMS: &[&str] = &["sasaran", "target", "iku", "rencana"];
pub const PROXY_REPORTING_TERMS: &[&str] = &["laporan", "kinerja", "sop"];
pub const PROXY_IMPACT_TERMS: &[&str] = &["efisiensi", "meningkat", "turun", "akurat"];
pub const PROXY_PERCENT: &[&str] = &["%"];
pub const PROXY_ATTACHMENT_TERMS: &[&str] = &[
    "realisasi",
    "target",
    "lampiran",
    "berkas",
    "tautan",
    "link",
];

/// Narrative length (in words) considered clear.
pub const CLEAR_WORD_RANGE: (usize, usize) = (10, 40);
/// Maximum evidence points contributed by extracted tokens.
pub const EVIDENCE_TOKEN_CAP: usize = 4;

/// Condition checked against an observed narrative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predicate {
    /// The normalized text contains at least one fragment (substring match).
    ContainsAny(&'static [&'static str]),
    /// At least one numeric-or-unit token was extracted.
    HasTokens,
    /// Whitespace-delimited word count lies in the inclusive range.
    WordCountWithin { min: usize, max: usize },
    /// A target or realized figure accompanied the narrative.
    FiguresSupplied,
}

impl Predicate {
    pub fn holds(&self, observation: &Observation) -> bool {
        match self {
            Predicate::ContainsAny(fragments) => fragments
                .iter()
                .any(|fragment| observation.normalized.contains(fragment)),
            Predicate::HasTokens => observation.token_count >= 1,
            Predicate::WordCountWithin { min, max } => {
                (*min..=*max).contains(&observation.word_count)
            }
            Predicate::FiguresSupplied => observation.figures_supplied,
        }
    }
}

/// How a rule adds points on top of the dimension's base.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contribution {
    /// One point when the predicate holds.
    Flag(Predicate),
    /// One point per extracted token, up to `cap`.
    TokenCount { cap: usize },
}

impl Contribution {
    pub fn points(&self, observation: &Observation) -> i32 {
        match self {
            Contribution::Flag(predicate) => i32::from(predicate.holds(observation)),
            Contribution::TokenCount { cap } => observation.token_count.min(*cap) as i32,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DimensionRule {
    pub dimension: Dimension,
    pub base: i32,
    pub contributions: &'static [Contribution],
}

impl DimensionRule {
    /// Raw (unclamped) score for this dimension.
    pub fn raw_score(&self, observation: &Observation) -> i32 {
        self.base
            + self
                .contributions
                .iter()
                .map(|contribution| contribution.points(observation))
                .sum::<i32>()
    }
}

/// Which tokens count as evidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenPattern {
    /// Decimal numbers (optionally with `%`) or one of the unit words.
    NumbersAndUnits,
    /// Decimal numbers (optionally with `%`) only.
    NumbersOnly,
}

impl TokenPattern {
    pub fn count(&self, normalized: &str) -> usize {
        self.regex().find_iter(normalized).count()
    }

    fn regex(&self) -> &'static Regex {
        static NUMBERS_AND_UNITS: OnceLock<Regex> = OnceLock::new();
        static NUMBERS_ONLY: OnceLock<Regex> = OnceLock::new();

        match self {
            TokenPattern::NumbersAndUnits => NUMBERS_AND_UNITS.get_or_init(|| {
                Regex::new(r"\b\d+[.,]?\d*%?|\b(?:berkas|indikator|tautan|link)\b")
                    .expect("numeric/unit token pattern compiles")
            }),
            TokenPattern::NumbersOnly => NUMBERS_ONLY.get_or_init(|| {
                Regex::new(r"\b\d+[.,]?\d*%?").expect("numeric token pattern compiles")
            }),
        }
    }
}

/// Features of one narrative that every rule reads from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    pub normalized: String,
    pub word_count: usize,
    pub token_count: usize,
    pub figures_supplied: bool,
}

/// A complete scorer: token pattern plus one rule per dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleSet {
    pub name: &'static str,
    pub tokens: TokenPattern,
    pub rules: [DimensionRule; 5],
}

impl RuleSet {
    pub fn observe(&self, text: &str, target: Option<f64>, realized: Option<f64>) -> Observation {
        let normalized = text.to_lowercase();
        let word_count = normalized.split_whitespace().count();
        let token_count = self.tokens.count(&normalized);

        Observation {
            normalized,
            word_count,
            token_count,
            figures_supplied: target.is_some() || realized.is_some(),
        }
    }

    pub fn rule(&self, dimension: Dimension) -> &DimensionRule {
        // Tables are declared in `Dimension::ALL` order.
        let index = Dimension::ALL
            .iter()
            .position(|candidate| *candidate == dimension)
            .unwrap_or_default();
        &self.rules[index]
    }

    pub fn evaluate(&self, observation: &Observation) -> SubScores {
        let raw = |dimension| self.rule(dimension).raw_score(observation);
        SubScores::new(
            raw(Dimension::Relevance),
            raw(Dimension::Impact),
            raw(Dimension::Evidence),
            raw(Dimension::Clarity),
            raw(Dimension::Compliance),
        )
    }

    pub fn score(&self, text: &str, target: Option<f64>, realized: Option<f64>) -> SubScores {
        self.evaluate(&self.observe(text, target, realized))
    }
}

const CLARITY: DimensionRule = DimensionRule {
    dimension: Dimension::Clarity,
    base: 2,
    contributions: &[
        Contribution::Flag(Predicate::WordCountWithin {
            min: CLEAR_WORD_RANGE.0,
            max: CLEAR_WORD_RANGE.1,
        }),
        Contribution::Flag(Predicate::ContainsAny(SENTENCE_PUNCTUATION)),
    ],
};

const EVIDENCE: DimensionRule = DimensionRule {
    dimension: Dimension::Evidence,
    base: 1,
    contributions: &[Contribution::TokenCount {
        cap: EVIDENCE_TOKEN_CAP,
    }],
};

/// Rules used when no trained model is loaded.
pub static HEURISTIC_RULES: RuleSet = RuleSet {
    name: "heuristic",
    tokens: TokenPattern::NumbersAndUnits,
    rules: [
        DimensionRule {
            dimension: Dimension::Relevance,
            base: 2,
            contributions: &[
                Contribution::Flag(Predicate::ContainsAny(ACTION_VERBS)),
                Contribution::Flag(Predicate::ContainsAny(PERFORMANCE_TERMS)),
            ],
        },
        DimensionRule {
            dimension: Dimension::Impact,
            base: 2,
            contributions: &[
                Contribution::Flag(Predicate::HasTokens),
                Contribution::Flag(Predicate::ContainsAny(IMPACT_TERMS)),
            ],
        },
        EVIDENCE,
        CLARITY,
        DimensionRule {
            dimension: Dimension::Compliance,
            base: 2,
            contributions: &[
                Contribution::Flag(Predicate::FiguresSupplied),
                Contribution::Flag(Predicate::ContainsAny(MEASURE_UNITS)),
            ],
        },
    ],
};

/// Explanatory sub-scores reported next to a classifier-sourced WQI.
pub static MODEL_PROXY_RULES: RuleSet = RuleSet {
    name: "model_proxy",
    tokens: TokenPattern::NumbersOnly,
    rules: [
        DimensionRule {
            dimension: Dimension::Relevance,
            base: 2,
            contributions: &[
                Contribution::Flag(Predicate::ContainsAny(PROXY_PLANNING_TERMS)),
                Contribution::Flag(Predicate::ContainsAny(PROXY_REPORTING_TERMS)),
            ],
        },
        DimensionRule {
            dimension: Dimension::Impact,
            base: 2,
            contributions: &[
                Contribution::Flag(Predicate::ContainsAny(PROXY_IMPACT_TERMS)),
                Contribution::Flag(Predicate::ContainsAny(PROXY_PERCENT)),
            ],
        },
        EVIDENCE,
        CLARITY,
        DimensionRule {
            dimension: Dimension::Compliance,
            base: 2,
            contributions: &[Contribution::Flag(Predicate::ContainsAny(
                PROXY_ATTACHMENT_TERMS,
            ))],
        },
    ],
};
