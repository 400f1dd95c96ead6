use crate::report::{render_batch, render_quiz, render_report};
use crate::server;
use clap::{Args, Parser, Subcommand};
use mindscreen::config::AppConfig;
use mindscreen::diagnostics::{
    AnswerSheetImporter, Answers, Condition, DiagnosticService, EvidencePolicy,
};
use mindscreen::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Mindscreen",
    about = "Run mental-health screening questionnaires from the command line or over HTTP",
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
    /// Print the questionnaire for a condition
    Quiz {
        /// Condition key (screening, anxiety, insomnia, depression, stress)
        condition: String,
    },
    /// Analyze one set of answers
    Analyze(AnalyzeArgs),
    /// Analyze every row of a CSV answer export
    Batch(BatchArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

#[derive(Args, Debug)]
struct AnalyzeArgs {
    /// Condition key to analyze
    #[arg(long)]
    condition: String,
    /// Answers as inline JSON or a path to a JSON file
    #[arg(long)]
    answers: String,
    /// Treat unmapped evidence codes as absent instead of failing
    #[arg(long)]
    lenient: bool,
}

#[derive(Args, Debug)]
struct BatchArgs {
    /// Condition key applied to every row
    #[arg(long)]
    condition: String,
    /// CSV export with one column per fact key
    #[arg(long)]
    csv: PathBuf,
    /// Treat unmapped evidence codes as absent instead of failing
    #[arg(long)]
    lenient: bool,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Quiz { condition } => run_quiz(&condition),
        Command::Analyze(args) => run_analyze(args),
        Command::Batch(args) => run_batch(args),
    }
}

fn run_quiz(key: &str) -> Result<(), AppError> {
    let condition: Condition = key.parse()?;
    print!("{}", render_quiz(condition, condition.quiz()));
    Ok(())
}

fn run_analyze(args: AnalyzeArgs) -> Result<(), AppError> {
    let service = load_service(args.lenient)?;
    let answers = read_answers(&args.answers)?;
    let report = service.report(&args.condition, &answers)?;
    print!("{}", render_report(&report));
    Ok(())
}

fn run_batch(args: BatchArgs) -> Result<(), AppError> {
    let condition: Condition = args.condition.parse()?;
    let service = load_service(args.lenient)?;
    let sheets = AnswerSheetImporter::from_path(&args.csv)?;
    let outcomes = service.analyze_batch(condition, &sheets);
    print!("{}", render_batch(condition, &outcomes));
    Ok(())
}

fn load_service(lenient: bool) -> Result<DiagnosticService, AppError> {
    let policy = if lenient {
        EvidencePolicy::Lenient
    } else {
        AppConfig::load()?.diagnostics.evidence_policy
    };
    Ok(DiagnosticService::load(policy)?)
}

fn read_answers(raw: &str) -> Result<Answers, AppError> {
    let trimmed = raw.trim();
    let json = if trimmed.starts_with('{') {
        trimmed.to_string()
    } else {
        std::fs::read_to_string(trimmed)?
    };
    Ok(serde_json::from_str(&json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mindscreen::diagnostics::AnswerValue;

    #[test]
    fn parses_subcommands() {
        let cli = Cli::try_parse_from([
            "mindscreen-api",
            "analyze",
            "--condition",
            "stress",
            "--answers",
            "answers.json",
            "--lenient",
        ])
        .expect("arguments parse");

        match cli.command {
            Some(Command::Analyze(args)) => {
                assert_eq!(args.condition, "stress");
                assert!(args.lenient);
            }
            other => panic!("expected analyze command, got {other:?}"),
        }

        let cli = Cli::try_parse_from(["mindscreen-api"]).expect("no subcommand");
        assert!(cli.command.is_none());
    }

    #[test]
    fn reads_inline_answers() {
        let answers = read_answers(r#" {"habitos": "1", "isi_score": [1, 2], "mood": 2} "#)
            .expect("inline json parses");
        assert_eq!(answers.get("habitos"), Some(&AnswerValue::Text("1".into())));
        assert_eq!(answers.get("mood"), Some(&AnswerValue::Number(2)));
        assert_eq!(
            answers.get("isi_score"),
            Some(&AnswerValue::List(vec![
                AnswerValue::Number(1),
                AnswerValue::Number(2)
            ]))
        );
    }

    #[test]
    fn missing_answer_file_is_an_io_error() {
        let error = read_answers("does/not/exist.json").expect_err("file is absent");
        assert!(matches!(error, AppError::Io(_)));
    }
}
