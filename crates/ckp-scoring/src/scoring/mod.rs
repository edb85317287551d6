//! Narrative scoring engine.

pub mod domain;
pub mod engine;
pub mod heuristic;
pub mod model;
pub mod rules;

pub use domain::{
    Dimension, EntryId, EntryScore, NarrativeEntry, ScoreCard, SubScores, SUB_SCORE_MAX,
    SUB_SCORE_MIN,
};
pub use engine::{ScorerMode, ScoringEngine};
pub use heuristic::HeuristicScorer;
pub use model::{
    BucketId, BucketTable, Classifier, FeatureVector, ModelBackedScorer, ModelBundle,
    ModelLoadError, Vectorizer,
};
