use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::{BucketId, BucketTable, Classifier, FeatureVector, ModelBundle, ModelLoadError, Vectorizer};

/// On-disk layout of a trained WQI model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub vectorizer: TfidfVectorizer,
    pub classifier: LinearClassifier,
    #[serde(default)]
    pub bucket_to_score: Option<BTreeMap<BucketId, u8>>,
}

impl ModelArtifact {
    pub fn validate(&self) -> Result<(), ModelLoadError> {
        self.vectorizer.validate()?;
        self.classifier.validate(self.vectorizer.width())
    }

    pub fn into_bundle(self) -> Result<ModelBundle, ModelLoadError> {
        self.validate()?;
        let buckets = match self.bucket_to_score {
            Some(table) => BucketTable::new(table)?,
            None => BucketTable::default(),
        };

        Ok(ModelBundle::new(
            Box::new(self.vectorizer),
            Box::new(self.classifier),
            buckets,
        ))
    }
}

/// TF-IDF over lowercased word tokens of two or more characters, L2-normalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    pub vocabulary: HashMap<String, usize>,
    pub idf: Vec<f32>,
    #[serde(default)]
    pub sublinear_tf: bool,
}

impl TfidfVectorizer {
    pub fn width(&self) -> usize {
        self.idf.len()
    }

    fn validate(&self) -> Result<(), ModelLoadError> {
        if self.vocabulary.len() != self.idf.len() {
            return Err(ModelLoadError::Schema(format!(
                "vocabulary has {} terms but idf has {} weights",
                self.vocabulary.len(),
                self.idf.len()
            )));
        }
        if let Some((term, column)) = self
            .vocabulary
            .iter()
            .find(|(_, column)| **column >= self.idf.len())
        {
            return Err(ModelLoadError::Schema(format!(
                "term '{term}' points at column {column} beyond idf width {}",
                self.idf.len()
            )));
        }
        Ok(())
    }

    fn token_pattern() -> &'static Regex {
        static PATTERN: OnceLock<Regex> = OnceLock::new();
        PATTERN.get_or_init(|| Regex::new(r"\b\w\w+\b").expect("word token pattern compiles"))
    }
}

impl Vectorizer for TfidfVectorizer {
    fn vectorize(&self, text: &str) -> FeatureVector {
        let lowered = text.to_lowercase();
        let mut counts: BTreeMap<usize, f32> = BTreeMap::new();
        for token in Self::token_pattern().find_iter(&lowered) {
            if let Some(column) = self.vocabulary.get(token.as_str()) {
                *counts.entry(*column).or_insert(0.0) += 1.0;
            }
        }

        let mut weights: Vec<(usize, f32)> = counts
            .into_iter()
            .map(|(column, count)| {
                let tf = if self.sublinear_tf {
                    1.0 + count.ln()
                } else {
                    count
                };
                let idf = self.idf.get(column).copied().unwrap_or_default();
                (column, tf * idf)
            })
            .collect();

        let norm = weights
            .iter()
            .map(|(_, weight)| weight * weight)
            .sum::<f32>()
            .sqrt();
        if norm > 0.0 {
            for (_, weight) in weights.iter_mut() {
                *weight /= norm;
            }
        }

        FeatureVector::new(weights)
    }
}

/// Linear one-vs-rest classifier; a single coefficient row is treated as binary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearClassifier {
    pub classes: Vec<BucketId>,
    pub coef: Vec<Vec<f32>>,
    pub intercept: Vec<f32>,
}

impl LinearClassifier {
    fn validate(&self, width: usize) -> Result<(), ModelLoadError> {
        if self.classes.is_empty() {
            return Err(ModelLoadError::Schema("classifier has no classes".to_string()));
        }

        let expected_rows = if self.classes.len() == 2 && self.coef.len() == 1 {
            1
        } else {
            self.classes.len()
        };
        if self.coef.len() != expected_rows || self.intercept.len() != expected_rows {
            return Err(ModelLoadError::Schema(format!(
                "{} classes need {expected_rows} coefficient rows and intercepts, found {} and {}",
                self.classes.len(),
                self.coef.len(),
                self.intercept.len()
            )));
        }

        if let Some(row) = self.coef.iter().find(|row| row.len() != width) {
            return Err(ModelLoadError::Schema(format!(
                "coefficient row has {} weights, vectorizer produces {width}",
                row.len()
            )));
        }
        Ok(())
    }

    fn decision(&self, row: usize, features: &FeatureVector) -> f32 {
        let intercept = self.intercept.get(row).copied().unwrap_or_default();
        let weights = self.coef.get(row).map(Vec::as_slice).unwrap_or_default();
        intercept + features.dot(weights)
    }
}

impl Classifier for LinearClassifier {
    fn classify(&self, features: &FeatureVector) -> BucketId {
        if self.coef.len() == 1 && self.classes.len() == 2 {
            return if self.decision(0, features) > 0.0 {
                self.classes[1]
            } else {
                self.classes[0]
            };
        }

        let mut best = 0;
        let mut best_score = f32::NEG_INFINITY;
        for row in 0..self.coef.len() {
            let score = self.decision(row, features);
            if score > best_score {
                best = row;
                best_score = score;
            }
        }
        self.classes.get(best).copied().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn vectorizer() -> TfidfVectorizer {
        TfidfVectorizer {
            vocabulary: HashMap::from([
                ("laporan".to_string(), 0),
                ("capaian".to_string(), 1),
                ("rapat".to_string(), 2),
            ]),
            idf: vec![1.0, 2.0, 1.0],
            sublinear_tf: false,
        }
    }

    #[test]
    fn vectorizer_normalizes_known_terms() {
        let features = vectorizer().vectorize("Laporan capaian, laporan! x tidak dikenal");
        let entries = features.entries();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].0, 0);
        assert_eq!(entries[1].0, 1);
        // tf-idf: laporan 2*1, capaian 1*2, so both weigh the same after normalization
        assert!((entries[0].1 - entries[1].1).abs() < 1e-6);
        let norm: f32 = entries.iter().map(|(_, w)| w * w).sum();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn vectorizer_handles_text_without_vocabulary() {
        assert!(vectorizer().vectorize("").is_empty());
        assert!(vectorizer().vectorize("a b c").is_empty());
    }

    #[test]
    fn multiclass_classifier_picks_highest_decision() {
        let classifier = LinearClassifier {
            classes: vec![0, 2, 4],
            coef: vec![
                vec![0.0, 0.0, 1.0],
                vec![1.0, 0.0, 0.0],
                vec![0.0, 3.0, 0.0],
            ],
            intercept: vec![0.1, 0.0, 0.0],
        };
        let vectorizer = vectorizer();

        assert_eq!(classifier.classify(&vectorizer.vectorize("capaian")), 4);
        assert_eq!(classifier.classify(&vectorizer.vectorize("laporan")), 2);
        assert_eq!(classifier.classify(&vectorizer.vectorize("")), 0);
    }

    #[test]
    fn binary_classifier_uses_sign_of_decision() {
        let classifier = LinearClassifier {
            classes: vec![1, 3],
            coef: vec![vec![-1.0, 2.0, 0.0]],
            intercept: vec![-0.5],
        };
        classifier.validate(3).expect("binary layout is valid");
        let vectorizer = vectorizer();

        assert_eq!(classifier.classify(&vectorizer.vectorize("capaian")), 3);
        assert_eq!(classifier.classify(&vectorizer.vectorize("laporan")), 1);
    }

    #[test]
    fn artifact_parses_integer_bucket_keys() {
        let artifact: ModelArtifact = serde_json::from_value(json!({
            "vectorizer": { "vocabulary": { "laporan": 0 }, "idf": [1.0] },
            "classifier": { "classes": [0, 1], "coef": [[1.0], [-1.0]], "intercept": [0.0, 0.0] },
            "bucket_to_score": { "0": 25, "1": 75 }
        }))
        .expect("artifact parses");

        let bundle = artifact.into_bundle().expect("artifact is consistent");
        assert_eq!(bundle.buckets().wqi(0), 25);
        assert_eq!(bundle.predict_wqi("laporan"), 25);
        assert_eq!(bundle.predict_wqi("lainnya"), 25);
    }

    #[test]
    fn artifact_without_table_uses_default_buckets() {
        let artifact = ModelArtifact {
            vectorizer: vectorizer(),
            classifier: LinearClassifier {
                classes: vec![3],
                coef: vec![vec![0.0, 0.0, 0.0]],
                intercept: vec![0.0],
            },
            bucket_to_score: None,
        };

        let bundle = artifact.into_bundle().expect("artifact is consistent");
        assert_eq!(bundle.predict_wqi("apa pun"), 70);
    }

    #[test]
    fn schema_mismatches_are_rejected() {
        let mut short_idf = vectorizer();
        short_idf.idf.pop();
        assert!(matches!(short_idf.validate(), Err(ModelLoadError::Schema(_))));

        let mut stray_column = vectorizer();
        stray_column.vocabulary.insert("rapat".to_string(), 7);
        assert!(matches!(stray_column.validate(), Err(ModelLoadError::Schema(_))));

        let narrow = LinearClassifier {
            classes: vec![0, 1, 2],
            coef: vec![vec![0.0; 2]; 3],
            intercept: vec![0.0; 3],
        };
        assert!(matches!(narrow.validate(3), Err(ModelLoadError::Schema(_))));

        let missing_rows = LinearClassifier {
            classes: vec![0, 1, 2],
            coef: vec![vec![0.0; 3]],
            intercept: vec![0.0],
        };
        assert!(matches!(missing_rows.validate(3), Err(ModelLoadError::Schema(_))));

        let empty = LinearClassifier {
            classes: Vec::new(),
            coef: Vec::new(),
            intercept: Vec::new(),
        };
        assert!(matches!(empty.validate(3), Err(ModelLoadError::Schema(_))));
    }
}
