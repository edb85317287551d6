use clap::Args;
use ckp_scoring::config::AppConfig;
use ckp_scoring::dataset::{read_ckp_path, read_talent_path};
use ckp_scoring::error::AppError;
use ckp_scoring::scoring::{EntryScore, ScorerMode, ScoringEngine};
use ckp_scoring::service::BatchSummary;
use ckp_scoring::talent::{score_talent, TalentResponse, MEAN_WQI};
use std::fmt::Write as _;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct CkpScoreArgs {
    /// CKP CSV export (entry_id, uraian_teks, target, realisasi)
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// WQI model artifact (defaults to the configured path)
    #[arg(long)]
    pub(crate) model: Option<PathBuf>,
    /// Only score the first N entries
    #[arg(long)]
    pub(crate) limit: Option<usize>,
    /// Emit JSON instead of a table
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct TalentScoreArgs {
    /// Talent datamart CSV (pegawai_id plus numeric feature columns)
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Emit JSON instead of a table
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_ckp_score(args: CkpScoreArgs) -> Result<(), AppError> {
    let CkpScoreArgs {
        csv,
        model,
        limit,
        json,
    } = args;

    let model_path = match model {
        Some(path) => path,
        None => AppConfig::load()?.model.artifact_path,
    };
    let engine = ScoringEngine::from_artifact(Some(model_path.as_path()));

    let mut entries = read_ckp_path(&csv)?;
    if let Some(limit) = limit {
        entries.truncate(limit);
    }

    let scores = engine.score_batch(&entries);
    if json {
        println!("{}", to_json(&scores)?);
    } else {
        print!("{}", render_ckp_scores(&scores, engine.mode()));
    }

    Ok(())
}

pub(crate) fn run_talent_score(args: TalentScoreArgs) -> Result<(), AppError> {
    let requests = read_talent_path(&args.csv)?;
    let responses: Vec<TalentResponse> = requests.iter().map(score_talent).collect();

    if args.json {
        println!("{}", to_json(&responses)?);
    } else {
        print!("{}", render_talent_scores(&responses));
    }

    Ok(())
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, AppError> {
    serde_json::to_string_pretty(value).map_err(|err| AppError::Io(std::io::Error::other(err)))
}

pub(crate) fn render_ckp_scores(scores: &[EntryScore], scorer: ScorerMode) -> String {
    let summary = BatchSummary::from_scores(scores, scorer);
    let mut out = String::new();

    let _ = writeln!(out, "CKP work quality scores (scorer: {})", scorer.label());
    let _ = writeln!(
        out,
        "  {:<16} {:>3} {:>3} {:>3} {:>3} {:>3} {:>4}",
        "entry_id", "rel", "imp", "evi", "cla", "com", "wqi"
    );
    for score in scores {
        let _ = writeln!(
            out,
            "  {:<16} {:>3} {:>3} {:>3} {:>3} {:>3} {:>4}",
            score.entry_id.as_str(),
            score.relevance,
            score.impact,
            score.evidence,
            score.clarity,
            score.compliance,
            score.wqi
        );
    }

    match summary.mean_wqi {
        Some(mean) => {
            let _ = writeln!(out, "Entries scored: {}, mean WQI: {mean:.1}", summary.entries);
        }
        None => {
            let _ = writeln!(out, "No entries to score.");
        }
    }
    out
}

pub(crate) fn render_talent_scores(responses: &[TalentResponse]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Talent scores");
    let _ = writeln!(
        out,
        "  {:<16} {:>8} {:>5}  band",
        "pegawai_id", "mean_wqi", "score"
    );
    for response in responses {
        let mean_wqi = response.top_factors.get(MEAN_WQI).copied().unwrap_or_default();
        let _ = writeln!(
            out,
            "  {:<16} {:>8.1} {:>5}  {}",
            response.pegawai_id,
            mean_wqi,
            response.talent_score,
            response.band.label()
        );
    }
    let _ = writeln!(out, "Employees scored: {}", responses.len());
    out
}
