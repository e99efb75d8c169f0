mod cli;

use clap::Parser;
use podtrust::analysis::http::HttpAnalyzer;
use podtrust::analysis::{ContentAnalyzer, ImageAttachment};
use podtrust::contribution::{self, ContributionInput, ManualSplit};
use podtrust::error::PodTrustError;
use podtrust::matching::{self, MatchFilters};
use podtrust::report;
use podtrust::types::config::PodTrustConfig;
use podtrust::types::contribution::{Scope, WorkFileContribution};
use podtrust::types::pod::{PodRecord, UserSignal};
use podtrust::verification::certificate;
use podtrust::verification::coding::{self, NodeRunner};
use podtrust::verification::question_bank::SkillLanguageTable;
use podtrust::verification::quiz;
use serde::de::DeserializeOwned;
use std::path::Path;
use tracing::warn;
use tracing_subscriber::EnvFilter;

pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const NOT_PASSED: i32 = 1;
    pub const INVALID_INPUT: i32 = 2;
    pub const RUNTIME_FAILURE: i32 = 3;
}

fn init_tracing(verbose: u8, quiet: bool) {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, PodTrustError> {
    if !path.exists() {
        return Err(PodTrustError::PathNotFound(path.display().to_string()));
    }
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

fn read_text(path: &Path) -> Result<String, PodTrustError> {
    if !path.exists() {
        return Err(PodTrustError::PathNotFound(path.display().to_string()));
    }
    Ok(std::fs::read_to_string(path)?)
}

fn output_format(format: &cli::ReportFormat) -> report::OutputFormat {
    match format {
        cli::ReportFormat::Json => report::OutputFormat::Json,
        cli::ReportFormat::Md => report::OutputFormat::Md,
    }
}

fn runtime() -> Result<tokio::runtime::Runtime, PodTrustError> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}

fn run(cli: cli::Cli) -> Result<i32, PodTrustError> {
    let config = podtrust::config::load_config(&cli.root)?.unwrap_or_default();

    match cli.command {
        cli::Commands::Match(cmd) => {
            let user: UserSignal = read_json(&cmd.user)?;
            let pods: Vec<PodRecord> = read_json(&cmd.pods)?;
            let filters = MatchFilters {
                search: cmd.search,
                city: cmd.city,
                tech: cmd.tech,
                within_km: cmd.within_km,
            };
            let ranked = matching::match_pods(&user, &pods, &filters, &config.match_settings())?;
            println!(
                "{}",
                report::render_matches(&ranked, output_format(&cmd.format))?
            );
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Quiz(cmd) => {
            let settings = config.quiz_settings();
            let table = SkillLanguageTable::new(settings.skill_languages.clone());
            match cmd.action {
                cli::QuizAction::Show(args) => {
                    let session = quiz::select_questions(&args.skill, args.seed, &table, &settings)?;
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&serde_json::json!({
                            "skill": session.skill,
                            "language": session.language,
                            "seed": session.seed,
                            "questions": session.views(),
                        }))?
                    );
                    Ok(exit_code::SUCCESS)
                }
                cli::QuizAction::Submit(args) => {
                    let session = quiz::select_questions(&args.skill, args.seed, &table, &settings)?;
                    let outcome = quiz::grade(&session, &args.answers, &settings)?;
                    println!("{}", serde_json::to_string_pretty(&outcome)?);
                    Ok(if outcome.passed {
                        exit_code::SUCCESS
                    } else {
                        exit_code::NOT_PASSED
                    })
                }
            }
        }
        cli::Commands::CodingTest(cmd) => {
            let code = read_text(&cmd.file)?;
            let runner = NodeRunner { binary: cmd.node };
            let outcome = runtime()?.block_on(coding::evaluate_submission(
                &code,
                &cmd.language,
                &runner,
                &config.coding_settings(),
            ))?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
            Ok(if outcome.passed {
                exit_code::SUCCESS
            } else {
                exit_code::NOT_PASSED
            })
        }
        cli::Commands::Certificate(cmd) => {
            let image = ImageAttachment::from_path(&cmd.image)?;
            let settings = config.analysis_settings();
            let timeout = settings.timeout;
            let analyzer = HttpAnalyzer::from_settings(settings)?;
            let verdict = runtime()?.block_on(certificate::review_certificate(
                &analyzer,
                &cmd.skills,
                &image,
                timeout,
            ))?;
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "verdict": verdict,
                    "verifiedSkills": verdict.verified_skills(&cmd.skills),
                }))?
            );
            Ok(if verdict.is_valid {
                exit_code::SUCCESS
            } else {
                exit_code::NOT_PASSED
            })
        }
        cli::Commands::Normalize(cmd) => run_normalize(cmd, &config),
        cli::Commands::Aggregate(cmd) => {
            let contributions: Vec<WorkFileContribution> = read_json(&cmd.contributions)?;
            let scope = match (cmd.pod, cmd.user) {
                (Some(pod), _) => Scope::Pod(pod),
                (None, Some(user)) => Scope::User(user),
                (None, None) => Scope::All,
            };
            let aggregate = contribution::aggregate(&scope, &contributions);
            println!(
                "{}",
                report::render_aggregate(&aggregate, output_format(&cmd.format))?
            );
            Ok(exit_code::SUCCESS)
        }
    }
}

fn run_normalize(cmd: cli::NormalizeCommand, config: &PodTrustConfig) -> Result<i32, PodTrustError> {
    if !cmd.file.exists() {
        return Err(PodTrustError::PathNotFound(cmd.file.display().to_string()));
    }
    let bytes = std::fs::read(&cmd.file)?;
    let file_type = cmd.file_type.or_else(|| {
        cmd.file
            .extension()
            .and_then(|value| value.to_str())
            .map(ToString::to_string)
    });
    let input = ContributionInput {
        content: ContributionInput::text_from_bytes(&bytes),
        description: cmd.description,
        file_type,
        manual: match (cmd.ai, cmd.human) {
            (Some(ai_percent), Some(human_percent)) => Some(ManualSplit {
                ai_percent,
                human_percent,
            }),
            _ => None,
        },
    };

    let analyzer = if input.manual.is_some() {
        None
    } else {
        match HttpAnalyzer::from_settings(config.analysis_settings()) {
            Ok(analyzer) => Some(analyzer),
            Err(error) => {
                warn!(%error, "content analysis disabled");
                None
            }
        }
    };

    let settings = config.contribution_settings();
    let normalized = runtime()?.block_on(contribution::normalize_contribution(
        analyzer.as_ref().map(|analyzer| analyzer as &dyn ContentAnalyzer),
        &input,
        &settings,
    ));
    println!("{}", serde_json::to_string_pretty(&normalized)?);
    Ok(exit_code::SUCCESS)
}

fn main() {
    let cli = cli::Cli::parse();
    init_tracing(cli.verbose, cli.quiet);
    match run(cli) {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
        }
        Err(e) => {
            eprintln!("error: {}", e);
            let code = if e.is_invalid_input() {
                exit_code::INVALID_INPUT
            } else {
                exit_code::RUNTIME_FAILURE
            };
            std::process::exit(code);
        }
    }
}
