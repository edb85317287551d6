use super::domain::ScoreCard;
use super::rules::{RuleSet, HEURISTIC_RULES};

/// Keyword/regex scorer; the WQI is derived from its own sub-scores.
#[derive(Debug, Clone, Copy)]
pub struct HeuristicScorer {
    rules: &'static RuleSet,
}

impl Default for HeuristicScorer {
    fn default() -> Self {
        Self {
            rules: &HEURISTIC_RULES,
        }
    }
}

impl HeuristicScorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rules(&self) -> &'static RuleSet {
        self.rules
    }

    pub fn score(&self, text: &str, target: Option<f64>, realized: Option<f64>) -> ScoreCard {
        ScoreCard::from_sub_scores(self.rules.score(text, target, realized))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::domain::{Dimension, SUB_SCORE_MAX, SUB_SCORE_MIN};

    fn assert_bounded(card: &ScoreCard) {
        let scores = card.sub_scores();
        for dimension in Dimension::ALL {
            let value = scores.get(dimension);
            assert!(
                (SUB_SCORE_MIN..=SUB_SCORE_MAX).contains(&value),
                "{} out of range: {value}",
                dimension.label()
            );
        }
        assert!(card.wqi() <= 100);
        assert_eq!(card.wqi(), scores.composite());
    }

    #[test]
    fn empty_text_yields_minimal_scores() {
        let card = HeuristicScorer::new().score("", None, None);
        let scores = card.sub_scores();

        assert_eq!(scores.relevance(), 2);
        assert_eq!(scores.impact(), 2);
        assert_eq!(scores.evidence(), 1);
        assert_eq!(scores.clarity(), 2);
        assert_eq!(scores.compliance(), 2);
        assert_eq!(card.wqi(), 20);
    }

    #[test]
    fn report_narrative_with_figures_scores_high() {
        let card = HeuristicScorer::new().score(
            "Menyusun laporan kinerja dengan capaian 95% sesuai target.",
            Some(90.0),
            Some(95.0),
        );
        let scores = card.sub_scores();

        assert_eq!(scores.relevance(), 4);
        assert_eq!(scores.impact(), 4);
        assert_eq!(scores.evidence(), 2);
        // eight words: below the clear-length window, punctuation present
        assert_eq!(scores.clarity(), 3);
        assert_eq!(scores.compliance(), 4);
        assert_eq!(card.wqi(), 60);
    }

    #[test]
    fn well_formed_narrative_reaches_full_clarity() {
        let card = HeuristicScorer::new().score(
            "Mengolah data absensi pegawai, menyelesaikan rekap bulanan dan menyediakan 3 berkas pendukung untuk indikator kinerja unit.",
            None,
            None,
        );
        let scores = card.sub_scores();

        assert_eq!(scores.clarity(), 4);
        assert_eq!(scores.evidence(), 4);
        assert_eq!(scores.relevance(), 4);
        assert_eq!(scores.compliance(), 3);
    }

    #[test]
    fn target_and_realized_contribute_equally_to_compliance() {
        let scorer = HeuristicScorer::new();
        let text = "Memverifikasi dokumen pengadaan";

        let neither = scorer.score(text, None, None).sub_scores().compliance();
        let target_only = scorer.score(text, Some(10.0), None).sub_scores().compliance();
        let realized_only = scorer.score(text, None, Some(10.0)).sub_scores().compliance();
        let both = scorer.score(text, Some(10.0), Some(8.0)).sub_scores().compliance();

        assert_eq!(target_only, realized_only);
        assert_eq!(target_only, neither + 1);
        assert_eq!(both, target_only);
    }

    #[test]
    fn zero_figures_count_as_supplied() {
        let scorer = HeuristicScorer::new();
        let zero = scorer.score("rapat", Some(0.0), None).sub_scores().compliance();
        let absent = scorer.score("rapat", None, None).sub_scores().compliance();
        assert_eq!(zero, absent + 1);
    }

    #[test]
    fn scores_stay_bounded_under_adversarial_input() {
        let scorer = HeuristicScorer::new();
        let stuffed = "menyusun laporan kinerja sop capaian efisiensi 100% 99% 1,5 berkas indikator tautan link baseline target. "
            .repeat(50);
        let long = "kata ".repeat(10_000);
        let inputs = [
            String::new(),
            "   \n\t ".to_string(),
            stuffed,
            long,
            "Ünïcödé ☃ 数据 ٣٤٥ ％ ، ।".to_string(),
            "%%%%....,,,,".to_string(),
        ];

        for text in &inputs {
            for (target, realized) in [(None, None), (Some(1.0), None), (Some(-5.0), Some(1e12))] {
                assert_bounded(&scorer.score(text, target, realized));
            }
        }
    }

    #[test]
    fn keyword_stuffing_saturates_at_rule_ceiling() {
        let text = "Menyusun laporan kinerja, capaian efisiensi meningkat 10% 20% 30% 40% 50% pada indikator target dan baseline unit kerja selama triwulan berjalan.";
        let card = HeuristicScorer::new().score(text, Some(1.0), Some(1.0));
        let scores = card.sub_scores();

        // relevance, impact, clarity and compliance top out at 4 under these tables
        assert_eq!(scores.relevance(), 4);
        assert_eq!(scores.impact(), 4);
        assert_eq!(scores.evidence(), 5);
        assert_eq!(scores.clarity(), 4);
        assert_eq!(scores.compliance(), 4);
        assert_eq!(card.wqi(), 80);
    }
}
