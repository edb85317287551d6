use std::path::Path;

use serde::Serialize;
use tracing::{info, warn};

use super::domain::{EntryScore, NarrativeEntry, ScoreCard};
use super::heuristic::HeuristicScorer;
use super::model::{ModelBackedScorer, ModelBundle};

/// Which scorer is active for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScorerMode {
    Heuristic,
    ModelBacked,
}

impl ScorerMode {
    pub fn label(&self) -> &'static str {
        match self {
            ScorerMode::Heuristic => "heuristic",
            ScorerMode::ModelBacked => "model_backed",
        }
    }
}

/// Scoring engine, chosen once at construction and immutable afterwards.
#[derive(Debug)]
pub enum ScoringEngine {
    Heuristic(HeuristicScorer),
    ModelBacked(ModelBackedScorer),
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::heuristic()
    }
}

impl ScoringEngine {
    pub fn heuristic() -> Self {
        Self::Heuristic(HeuristicScorer::new())
    }

    pub fn model_backed(bundle: ModelBundle) -> Self {
        Self::ModelBacked(ModelBackedScorer::new(bundle))
    }

    /// Selects the scorer from an optional model artifact.
    ///
    /// A missing artifact selects the heuristic scorer. An artifact that fails to load is
    /// logged and also selects the heuristic scorer; no error leaves this function.
    pub fn from_artifact(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            info!("no model artifact configured; using heuristic scorer");
            return Self::heuristic();
        };

        if !path.exists() {
            info!(path = %path.display(), "model artifact not found; using heuristic scorer");
            return Self::heuristic();
        }

        match ModelBundle::load(path) {
            Ok(bundle) => {
                info!(
                    path = %path.display(),
                    buckets = bundle.buckets().len(),
                    "model artifact loaded; using model-backed scorer"
                );
                Self::model_backed(bundle)
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "model artifact failed to load; falling back to heuristic scorer"
                );
                Self::heuristic()
            }
        }
    }

    pub fn mode(&self) -> ScorerMode {
        match self {
            ScoringEngine::Heuristic(_) => ScorerMode::Heuristic,
            ScoringEngine::ModelBacked(_) => ScorerMode::ModelBacked,
        }
    }

    pub fn model_loaded(&self) -> bool {
        self.mode() == ScorerMode::ModelBacked
    }

    pub fn score_with_model(
        &self,
        text: &str,
        target: Option<f64>,
        realized: Option<f64>,
    ) -> ScoreCard {
        match self {
            ScoringEngine::Heuristic(scorer) => scorer.score(text, target, realized),
            ScoringEngine::ModelBacked(scorer) => scorer.score(text, target, realized),
        }
    }

    pub fn score_entry(&self, entry: &NarrativeEntry) -> EntryScore {
        let card = self.score_with_model(&entry.text, entry.target, entry.realized);
        EntryScore::new(entry.entry_id.clone(), &card)
    }

    /// Scores every entry, preserving input order and length.
    pub fn score_batch(&self, entries: &[NarrativeEntry]) -> Vec<EntryScore> {
        entries.iter().map(|entry| self.score_entry(entry)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn scratch_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "ckp-scoring-engine-{}-{name}",
            std::process::id()
        ));
        fs::write(&path, contents).expect("scratch file writes");
        path
    }

    #[test]
    fn missing_artifact_selects_heuristic() {
        assert_eq!(ScoringEngine::from_artifact(None).mode(), ScorerMode::Heuristic);

        let absent = std::env::temp_dir().join("ckp-scoring-engine-absent-model.json");
        let engine = ScoringEngine::from_artifact(Some(absent.as_path()));
        assert!(!engine.model_loaded());
    }

    #[test]
    fn corrupt_artifact_falls_back_to_heuristic() {
        let path = scratch_file("corrupt.json", "{ not json");
        let engine = ScoringEngine::from_artifact(Some(path.as_path()));
        fs::remove_file(&path).ok();

        assert_eq!(engine.mode(), ScorerMode::Heuristic);
        assert_eq!(engine.score_with_model("", None, None).wqi(), 20);
    }

    #[test]
    fn inconsistent_artifact_falls_back_to_heuristic() {
        let path = scratch_file(
            "mismatch.json",
            r#"{"vectorizer":{"vocabulary":{"a":0},"idf":[1.0,2.0]},
                "classifier":{"classes":[0],"coef":[[1.0]],"intercept":[0.0]}}"#,
        );
        let engine = ScoringEngine::from_artifact(Some(path.as_path()));
        fs::remove_file(&path).ok();

        assert_eq!(engine.mode(), ScorerMode::Heuristic);
    }

    #[test]
    fn valid_artifact_selects_model_backed_scorer() {
        let path = scratch_file(
            "valid.json",
            r#"{"vectorizer":{"vocabulary":{"laporan":0},"idf":[1.0]},
                "classifier":{"classes":[4],"coef":[[0.0]],"intercept":[0.0]},
                "bucket_to_score":{"4":90}}"#,
        );
        let engine = ScoringEngine::from_artifact(Some(path.as_path()));
        fs::remove_file(&path).ok();

        assert_eq!(engine.mode(), ScorerMode::ModelBacked);
        assert_eq!(engine.score_with_model("", None, None).wqi(), 90);
        assert_eq!(engine.score_with_model("laporan", Some(1.0), None).wqi(), 90);
    }

    #[test]
    fn batch_preserves_order_and_cardinality() {
        let engine = ScoringEngine::heuristic();
        let entries: Vec<NarrativeEntry> = (0..25)
            .map(|index| {
                NarrativeEntry::new(format!("entry-{index:02}"), "menyusun ".repeat(index))
            })
            .collect();

        let scores = engine.score_batch(&entries);

        assert_eq!(scores.len(), entries.len());
        for (entry, score) in entries.iter().zip(&scores) {
            assert_eq!(entry.entry_id, score.entry_id);
        }
        assert!(engine.score_batch(&[]).is_empty());
    }

    #[test]
    fn heuristic_wqi_reconstructs_from_returned_sub_scores() {
        let engine = ScoringEngine::heuristic();
        let entries = [
            NarrativeEntry::new("a", ""),
            NarrativeEntry::new("b", "Merekap 12 berkas, akurat.").with_target(12.0),
            NarrativeEntry::new("c", "Menyusun laporan kinerja dengan capaian 95% sesuai target.")
                .with_target(90.0)
                .with_realized(95.0),
        ];

        for score in engine.score_batch(&entries) {
            let mean = f64::from(
                score.relevance + score.impact + score.evidence + score.clarity + score.compliance,
            ) / 5.0;
            let expected = ((mean - 1.0) / 4.0 * 100.0).round() as u8;
            assert_eq!(score.wqi, expected, "entry {}", score.entry_id.as_str());
        }
    }
}
