use crate::offline::{run_ckp_score, run_talent_score, CkpScoreArgs, TalentScoreArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use ckp_scoring::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "CKP Work Quality Scoring",
    about = "Score CKP performance narratives over HTTP or from CSV exports",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Work-quality scoring for CKP narratives
    Ckp {
        #[command(subcommand)]
        command: CkpCommand,
    },
    /// Talent scoring over datamart features
    Talent {
        #[command(subcommand)]
        command: TalentCommand,
    },
}

#[derive(Subcommand, Debug)]
enum CkpCommand {
    /// Score every entry of a CKP CSV export and print the results
    Score(CkpScoreArgs),
}

#[derive(Subcommand, Debug)]
enum TalentCommand {
    /// Score every employee of a talent datamart CSV
    Score(TalentScoreArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Override the configured WQI model artifact
    #[arg(long)]
    pub(crate) model: Option<PathBuf>,
    /// Override the configured graph metrics CSV
    #[arg(long)]
    pub(crate) graph_metrics: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Ckp {
            command: CkpCommand::Score(args),
        } => run_ckp_score(args),
        Command::Talent {
            command: TalentCommand::Score(args),
        } => run_talent_score(args),
    }
}
