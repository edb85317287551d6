//! Lookup over precomputed collaboration-graph centrality metrics.

use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQuery {
    pub pegawai_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSummary {
    pub pegawai_id: String,
    pub degree: f64,
    pub betweenness: f64,
    pub eigenvector: f64,
    pub community: i64,
}

impl GraphSummary {
    /// Summary reported for employees absent from the table.
    pub fn unknown(pegawai_id: &str) -> Self {
        Self {
            pegawai_id: pegawai_id.to_string(),
            degree: 0.0,
            betweenness: 0.0,
            eigenvector: 0.0,
            community: -1,
        }
    }
}

/// Immutable table keyed by employee id; the first row wins on duplicates.
#[derive(Debug, Clone, Default)]
pub struct GraphMetricsTable {
    rows: HashMap<String, GraphSummary>,
}

impl GraphMetricsTable {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, GraphMetricsError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut rows = HashMap::new();

        for record in csv_reader.deserialize::<GraphSummary>() {
            let row = record?;
            rows.entry(row.pegawai_id.clone()).or_insert(row);
        }

        Ok(Self { rows })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, GraphMetricsError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| GraphMetricsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(file)
    }

    /// Loads the table, resolving a missing or unreadable file to an empty table.
    pub fn load_or_empty(path: &Path) -> Self {
        if !path.exists() {
            info!(path = %path.display(), "graph metrics table not found; summaries use defaults");
            return Self::default();
        }

        match Self::from_path(path) {
            Ok(table) => {
                info!(path = %path.display(), rows = table.len(), "graph metrics table loaded");
                table
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "graph metrics table unreadable; summaries use defaults");
                Self::default()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn summary(&self, pegawai_id: &str) -> GraphSummary {
        self.rows
            .get(pegawai_id)
            .cloned()
            .unwrap_or_else(|| GraphSummary::unknown(pegawai_id))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GraphMetricsError {
    #[error("unable to open graph metrics {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed graph metrics row: {0}")]
    Csv(#[from] csv::Error),
}
