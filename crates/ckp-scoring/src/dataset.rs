//! CSV ingestion for CKP narratives and talent datamart rows.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer};

use crate::scoring::{EntryId, NarrativeEntry};
use crate::talent::TalentRequest;

const EMPLOYEE_COLUMN: &str = "pegawai_id";

/// Reads CKP entries; blank or non-numeric figures read as "not supplied".
pub fn read_ckp_entries<R: Read>(reader: R) -> Result<Vec<NarrativeEntry>, DatasetError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut entries = Vec::new();

    for record in csv_reader.deserialize::<CkpRow>() {
        let row = record?;
        entries.push(NarrativeEntry {
            entry_id: EntryId(row.entry_id),
            text: row.text,
            target: row.target.as_deref().and_then(parse_figure),
            realized: row.realized.as_deref().and_then(parse_figure),
        });
    }

    Ok(entries)
}

pub fn read_ckp_path(path: impl AsRef<Path>) -> Result<Vec<NarrativeEntry>, DatasetError> {
    read_ckp_entries(open(path.as_ref())?)
}

/// Reads datamart rows: `pegawai_id` plus any numeric feature columns.
pub fn read_talent_requests<R: Read>(reader: R) -> Result<Vec<TalentRequest>, DatasetError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let id_column = headers
        .iter()
        .position(|header| header == EMPLOYEE_COLUMN)
        .ok_or(DatasetError::MissingColumn(EMPLOYEE_COLUMN))?;

    let mut requests = Vec::new();
    for (index, record) in csv_reader.records().enumerate() {
        let record = record?;
        let mut features = BTreeMap::new();

        for (column, (header, value)) in headers.iter().zip(record.iter()).enumerate() {
            if column == id_column || value.is_empty() {
                continue;
            }
            let parsed = value
                .parse::<f64>()
                .map_err(|_| DatasetError::InvalidFeature {
                    row: index + 1,
                    column: header.to_string(),
                    value: value.to_string(),
                })?;
            features.insert(header.to_string(), parsed);
        }

        requests.push(TalentRequest {
            pegawai_id: record.get(id_column).unwrap_or_default().to_string(),
            features,
        });
    }

    Ok(requests)
}

pub fn read_talent_path(path: impl AsRef<Path>) -> Result<Vec<TalentRequest>, DatasetError> {
    read_talent_requests(open(path.as_ref())?)
}

fn open(path: &Path) -> Result<File, DatasetError> {
    File::open(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[derive(Debug, Deserialize)]
struct CkpRow {
    entry_id: String,
    #[serde(rename = "uraian_teks", alias = "text", default)]
    text: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    target: Option<String>,
    #[serde(
        rename = "realisasi",
        alias = "realized",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    realized: Option<String>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn parse_figure(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("unable to open dataset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("dataset is missing required column '{0}'")]
    MissingColumn(&'static str),
    #[error("row {row}: column '{column}' holds non-numeric value '{value}'")]
    InvalidFeature {
        row: usize,
        column: String,
        value: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_ckp_rows_with_original_headers() {
        let csv = "entry_id,pegawai_id,uraian_teks,target,realisasi,WQI\n\
            E-1,P-001,\"Menyusun laporan, 3 berkas\",90,95,70\n\
            E-2,P-002,Rapat koordinasi,,n/a,40\n";

        let entries = read_ckp_entries(csv.as_bytes()).expect("csv parses");

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].entry_id, EntryId::from("E-1"));
        assert_eq!(entries[0].text, "Menyusun laporan, 3 berkas");
        assert_eq!(entries[0].target, Some(90.0));
        assert_eq!(entries[0].realized, Some(95.0));
        assert_eq!(entries[1].target, None);
        assert_eq!(entries[1].realized, None);
    }

    #[test]
    fn reads_ckp_rows_with_english_headers_and_missing_figures() {
        let csv = "entry_id,text\nA,Compile the monthly report\n";
        let entries = read_ckp_entries(csv.as_bytes()).expect("csv parses");
        assert_eq!(entries[0].text, "Compile the monthly report");
        assert_eq!(entries[0].target, None);
    }

    #[test]
    fn reads_talent_features() {
        let csv = "pegawai_id,mean_wqi,cnt_entries,late_days_30,training_hours_180\n\
            P-001,72.5,4,1,12\n\
            P-002,40,2,,0\n";

        let requests = read_talent_requests(csv.as_bytes()).expect("csv parses");

        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].pegawai_id, "P-001");
        assert_eq!(requests[0].features["mean_wqi"], 72.5);
        assert_eq!(requests[0].features.len(), 4);
        assert!(!requests[1].features.contains_key("late_days_30"));
    }

    #[test]
    fn talent_rows_require_employee_column() {
        let err = read_talent_requests("mean_wqi\n50\n".as_bytes()).expect_err("id column missing");
        assert!(matches!(err, DatasetError::MissingColumn("pegawai_id")));
    }

    #[test]
    fn talent_rows_reject_non_numeric_features() {
        let err = read_talent_requests("pegawai_id,mean_wqi\nP-1,tinggi\n".as_bytes())
            .expect_err("feature must be numeric");
        match err {
            DatasetError::InvalidFeature { row, column, value } => {
                assert_eq!(row, 1);
                assert_eq!(column, "mean_wqi");
                assert_eq!(value, "tinggi");
            }
            other => panic!("expected invalid feature, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let path = std::env::temp_dir().join("ckp-scoring-dataset-missing.csv");
        assert!(matches!(read_ckp_path(&path), Err(DatasetError::Io { .. })));
    }
}
