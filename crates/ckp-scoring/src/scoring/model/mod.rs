//! Model-backed scoring: a trained vectorizer and classifier pick a WQI bucket.

mod artifact;

pub use artifact::{LinearClassifier, ModelArtifact, TfidfVectorizer};

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::domain::ScoreCard;
use super::rules::{RuleSet, MODEL_PROXY_RULES};

/// Discrete classifier output.
pub type BucketId = i64;

/// WQI used for buckets missing from the lookup table.
pub const UNMAPPED_BUCKET_WQI: u8 = 50;

/// Sparse feature vector as `(column, weight)` pairs in ascending column order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureVector {
    entries: Vec<(usize, f32)>,
}

impl FeatureVector {
    pub fn new(mut entries: Vec<(usize, f32)>) -> Self {
        entries.sort_by_key(|(column, _)| *column);
        Self { entries }
    }

    pub fn entries(&self) -> &[(usize, f32)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn dot(&self, weights: &[f32]) -> f32 {
        self.entries
            .iter()
            .filter_map(|(column, value)| weights.get(*column).map(|weight| weight * value))
            .sum()
    }
}

/// Turns narrative text into features.
pub trait Vectorizer: Send + Sync {
    fn vectorize(&self, text: &str) -> FeatureVector;
}

/// Maps features to a bucket.
pub trait Classifier: Send + Sync {
    fn classify(&self, features: &FeatureVector) -> BucketId;
}

/// Bucket → WQI lookup with a fixed default for unmapped buckets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketTable {
    scores: BTreeMap<BucketId, u8>,
}

impl Default for BucketTable {
    fn default() -> Self {
        Self {
            scores: BTreeMap::from([(0, 10), (1, 30), (2, 50), (3, 70), (4, 90)]),
        }
    }
}

impl BucketTable {
    pub fn new(
        scores: impl IntoIterator<Item = (BucketId, u8)>,
    ) -> Result<Self, ModelLoadError> {
        let scores: BTreeMap<BucketId, u8> = scores.into_iter().collect();
        if let Some((bucket, wqi)) = scores.iter().find(|(_, wqi)| **wqi > 100) {
            return Err(ModelLoadError::Schema(format!(
                "bucket {bucket} maps to {wqi}, outside 0..=100"
            )));
        }
        Ok(Self { scores })
    }

    pub fn wqi(&self, bucket: BucketId) -> u8 {
        self.scores
            .get(&bucket)
            .copied()
            .unwrap_or(UNMAPPED_BUCKET_WQI)
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

/// Immutable, load-once bundle backing the model scorer.
pub struct ModelBundle {
    vectorizer: Box<dyn Vectorizer>,
    classifier: Box<dyn Classifier>,
    buckets: BucketTable,
}

impl std::fmt::Debug for ModelBundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelBundle")
            .field("buckets", &self.buckets)
            .finish_non_exhaustive()
    }
}

impl ModelBundle {
    pub fn new(
        vectorizer: Box<dyn Vectorizer>,
        classifier: Box<dyn Classifier>,
        buckets: BucketTable,
    ) -> Self {
        Self {
            vectorizer,
            classifier,
            buckets,
        }
    }

    /// Reads and validates a JSON model artifact.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ModelLoadError> {
        let path = path.as_ref();
        let raw = std::fs::read(path).map_err(|source| ModelLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let artifact: ModelArtifact = serde_json::from_slice(&raw)?;
        artifact.into_bundle()
    }

    pub fn buckets(&self) -> &BucketTable {
        &self.buckets
    }

    pub fn predict_bucket(&self, text: &str) -> BucketId {
        let features = self.vectorizer.vectorize(text);
        self.classifier.classify(&features)
    }

    pub fn predict_wqi(&self, text: &str) -> u8 {
        self.buckets.wqi(self.predict_bucket(text))
    }
}

/// Scorer whose WQI comes from the classifier.
///
/// Sub-scores are recomputed with the proxy rule table as explanation only; they never feed
/// back into the WQI.
#[derive(Debug)]
pub struct ModelBackedScorer {
    bundle: ModelBundle,
    proxies: &'static RuleSet,
}

impl ModelBackedScorer {
    pub fn new(bundle: ModelBundle) -> Self {
        Self {
            bundle,
            proxies: &MODEL_PROXY_RULES,
        }
    }

    pub fn bundle(&self) -> &ModelBundle {
        &self.bundle
    }

    pub fn score(&self, text: &str, target: Option<f64>, realized: Option<f64>) -> ScoreCard {
        let wqi = self.bundle.predict_wqi(text);
        let proxies = self.proxies.score(text, target, realized);
        ScoreCard::with_classifier_wqi(proxies, wqi)
    }
}

/// Reasons a model artifact can be rejected at startup.
#[derive(Debug, thiserror::Error)]
pub enum ModelLoadError {
    #[error("unable to read model artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("model artifact is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("model artifact schema mismatch: {0}")]
    Schema(String),
}
