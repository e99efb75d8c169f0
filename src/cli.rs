use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "podtrust",
    version,
    about = "Pod matching, skill verification and contribution scoring"
)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Directory holding podtrust.toml
    #[arg(long, global = true, default_value = ".")]
    pub root: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rank pods for a user
    Match(MatchCommand),
    /// Level 1 skill quiz
    Quiz(QuizCommand),
    /// Level 2 coding test
    CodingTest(CodingTestCommand),
    /// Review a certificate for a list of skills
    Certificate(CertificateCommand),
    /// Estimate the AI/human split of one file
    Normalize(NormalizeCommand),
    /// Summarize contribution records
    Aggregate(AggregateCommand),
}

#[derive(Clone, ValueEnum)]
pub enum ReportFormat {
    Json,
    Md,
}

#[derive(Args)]
pub struct MatchCommand {
    /// JSON file with the user's tech stack and location
    #[arg(long)]
    pub user: PathBuf,
    /// JSON file with the candidate pods
    #[arg(long)]
    pub pods: PathBuf,
    #[arg(long)]
    pub search: Option<String>,
    #[arg(long)]
    pub city: Option<String>,
    #[arg(long)]
    pub tech: Option<String>,
    #[arg(long)]
    pub within_km: Option<f64>,
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: ReportFormat,
}

#[derive(Args)]
pub struct QuizCommand {
    #[command(subcommand)]
    pub action: QuizAction,
}

#[derive(Subcommand)]
pub enum QuizAction {
    /// Print the questions for a skill
    Show(QuizShowArgs),
    /// Grade answers for a skill
    Submit(QuizSubmitArgs),
}

#[derive(Args)]
pub struct QuizShowArgs {
    #[arg(long)]
    pub skill: String,
    #[arg(long, default_value_t = 0)]
    pub seed: u64,
}

#[derive(Args)]
pub struct QuizSubmitArgs {
    #[arg(long)]
    pub skill: String,
    #[arg(long, default_value_t = 0)]
    pub seed: u64,
    /// Chosen option index per question, comma separated
    #[arg(long, value_delimiter = ',', num_args = 0..)]
    pub answers: Vec<usize>,
}

#[derive(Args)]
pub struct CodingTestCommand {
    #[arg(long)]
    pub language: String,
    #[arg(long)]
    pub file: PathBuf,
    /// Interpreter used for JavaScript submissions
    #[arg(long, default_value = "node")]
    pub node: String,
}

#[derive(Args)]
pub struct CertificateCommand {
    #[arg(long, value_delimiter = ',', required = true)]
    pub skills: Vec<String>,
    #[arg(long)]
    pub image: PathBuf,
}

#[derive(Args)]
pub struct NormalizeCommand {
    #[arg(long)]
    pub file: PathBuf,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub file_type: Option<String>,
    /// Manual AI percentage (skips analysis)
    #[arg(long, requires = "human")]
    pub ai: Option<f64>,
    /// Manual human percentage (skips analysis)
    #[arg(long, requires = "ai")]
    pub human: Option<f64>,
}

#[derive(Args)]
pub struct AggregateCommand {
    /// JSON file with work file contribution records
    #[arg(long)]
    pub contributions: PathBuf,
    #[arg(long, conflicts_with = "user")]
    pub pod: Option<String>,
    #[arg(long)]
    pub user: Option<String>,
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: ReportFormat,
}
