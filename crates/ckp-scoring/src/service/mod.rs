//! Service facade composing the scoring engine with the lookup tables.

mod router;

pub use router::scoring_router;

use serde::Serialize;

use crate::config::AppConfig;
use crate::graph::{GraphMetricsTable, GraphSummary};
use crate::scoring::{EntryScore, NarrativeEntry, ScorerMode, ScoringEngine};
use crate::talent::{score_talent, TalentRequest, TalentResponse};

/// Read-only after construction; shared across requests without locking.
#[derive(Debug)]
pub struct WorkQualityService {
    engine: ScoringEngine,
    graph: GraphMetricsTable,
}

impl WorkQualityService {
    pub fn new(engine: ScoringEngine, graph: GraphMetricsTable) -> Self {
        Self { engine, graph }
    }

    /// Selects the scorer and loads the graph table once, before serving.
    pub fn from_config(config: &AppConfig) -> Self {
        let engine = ScoringEngine::from_artifact(Some(config.model.artifact_path.as_path()));
        let graph = GraphMetricsTable::load_or_empty(&config.data.graph_metrics_path);
        Self::new(engine, graph)
    }

    pub fn engine(&self) -> &ScoringEngine {
        &self.engine
    }

    pub fn mode(&self) -> ScorerMode {
        self.engine.mode()
    }

    pub fn model_loaded(&self) -> bool {
        self.engine.model_loaded()
    }

    pub fn score_ckp(&self, entries: &[NarrativeEntry]) -> Vec<EntryScore> {
        self.engine.score_batch(entries)
    }

    pub fn talent_score(&self, request: &TalentRequest) -> TalentResponse {
        score_talent(request)
    }

    pub fn graph_summary(&self, pegawai_id: &str) -> GraphSummary {
        self.graph.summary(pegawai_id)
    }
}

/// Aggregate view of a scored batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchSummary {
    pub entries: usize,
    pub mean_wqi: Option<f64>,
    pub scorer: ScorerMode,
}

impl BatchSummary {
    pub fn from_scores(scores: &[EntryScore], scorer: ScorerMode) -> Self {
        let mean_wqi = if scores.is_empty() {
            None
        } else {
            let total: u32 = scores.iter().map(|score| u32::from(score.wqi)).sum();
            Some(f64::from(total) / scores.len() as f64)
        };

        Self {
            entries: scores.len(),
            mean_wqi,
            scorer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_averages_wqi() {
        let service = WorkQualityService::new(ScoringEngine::heuristic(), GraphMetricsTable::default());
        let scores = service.score_ckp(&[
            NarrativeEntry::new("a", ""),
            NarrativeEntry::new("b", "Menyusun laporan kinerja dengan capaian 95% sesuai target.")
                .with_target(90.0)
                .with_realized(95.0),
        ]);

        let summary = BatchSummary::from_scores(&scores, service.mode());
        assert_eq!(summary.entries, 2);
        assert_eq!(summary.mean_wqi, Some(40.0));
        assert_eq!(summary.scorer, ScorerMode::Heuristic);
    }

    #[test]
    fn empty_batch_has_no_mean() {
        let summary = BatchSummary::from_scores(&[], ScorerMode::ModelBacked);
        assert_eq!(summary.entries, 0);
        assert!(summary.mean_wqi.is_none());
    }
}
