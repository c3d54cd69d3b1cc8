//! quizgraph CLI: solve multiple-choice question files against a knowledge graph.

use std::collections::HashMap;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};

use quizgraph::classify;
use quizgraph::dataset;
use quizgraph::oracle::{CachedOracle, HttpOracle, MemoryOracle, Oracle};
use quizgraph::question::{Question, QuestionKind};
use quizgraph::solve::{Outcome, RankMetric, Solver, SolverConfig, solve_all};
use quizgraph::tagger::RuleTagger;

#[derive(Parser)]
#[command(name = "quizgraph", version, about = "Knowledge-graph multiple-choice solver")]
struct Cli {
    /// JSON graph file loaded into the in-memory oracle.
    #[arg(long, global = true, conflicts_with = "server")]
    graph: Option<PathBuf>,

    /// Base URL of a remote concept service.
    #[arg(long, global = true)]
    server: Option<String>,

    /// Path-score reduction metric (shortest | average).
    #[arg(long, global = true, default_value = "average")]
    metric: RankMetric,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve every question in a file and write an answers CSV.
    Solve {
        /// Question file (TSV, or the AI2 CSV export).
        questions: PathBuf,

        /// Where to write the id,answer results.
        #[arg(long, default_value = "results.csv")]
        output: PathBuf,

        /// Append questions nobody could answer to unanswered.tsv.
        #[arg(long)]
        log_unanswered: bool,

        /// Append incorrectly answered questions to incorrect.tsv.
        #[arg(long)]
        log_incorrect: bool,
    },

    /// Solve a single question and print the reasoning outcome.
    Ask {
        /// Question file (TSV, or the AI2 CSV export).
        questions: PathBuf,

        /// 1-based question number; picked at random when omitted.
        #[arg(long)]
        line: Option<usize>,
    },

    /// Classify every question and print a kind histogram.
    Analyse {
        /// Question file (TSV, or the AI2 CSV export).
        questions: PathBuf,
    },
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let oracle: Box<dyn Oracle + Sync> = match (&cli.graph, &cli.server) {
        (Some(path), _) => Box::new(MemoryOracle::from_file(path).into_diagnostic()?),
        (None, Some(url)) => Box::new(HttpOracle::connect(url).into_diagnostic()?),
        (None, None) => {
            miette::bail!("no knowledge graph: pass --graph <file.json> or --server <url>");
        }
    };
    let tagger = RuleTagger::new();
    let config = SolverConfig {
        metric: cli.metric,
        ..Default::default()
    };

    match cli.command {
        Commands::Solve {
            questions,
            output,
            log_unanswered,
            log_incorrect,
        } => {
            let question_list = dataset::read_questions(&questions).into_diagnostic()?;
            let (reports, stats) =
                solve_all(oracle.as_ref(), &tagger, config, &question_list).into_diagnostic()?;

            dataset::write_results(&output, &reports).into_diagnostic()?;

            for (question, report) in question_list.iter().zip(&reports) {
                if log_unanswered && report.outcome != Outcome::Answered {
                    dataset::append_question(&PathBuf::from("unanswered.tsv"), question)
                        .into_diagnostic()?;
                }
                if log_incorrect && report.correct == Some(false) {
                    dataset::append_question(&PathBuf::from("incorrect.tsv"), question)
                        .into_diagnostic()?;
                }
            }

            println!("Answered {} questions -> {}", reports.len(), output.display());
            println!();
            println!("{stats}");
        }

        Commands::Ask { questions, line } => {
            let question_list = dataset::read_questions(&questions).into_diagnostic()?;
            let question = match line {
                Some(line) => dataset::pick_line(&question_list, line).into_diagnostic()?,
                None => dataset::pick_random(&question_list)
                    .ok_or_else(|| miette::miette!("question file is empty"))?,
            };
            println!("{question}");

            let cache = CachedOracle::new(oracle.as_ref());
            let solver = Solver::new(&cache, &tagger, config);
            let report = solver.solve(question).into_diagnostic()?;

            println!("Question kind: {}", report.kind);
            println!("Best guess for answer = {}", report.answer);
            match report.outcome {
                Outcome::Answered => match report.correct {
                    Some(true) => println!("Correct!"),
                    Some(false) => {
                        let expected = question
                            .correct
                            .map(|c| c.to_string())
                            .unwrap_or_default();
                        println!("Wrong, expected {expected}");
                    }
                    None => {}
                },
                Outcome::Unanswered => println!("(no option scored; default answer)"),
                Outcome::NoQuestionConcepts => {
                    println!("(no question concepts found; default answer)");
                }
                Outcome::NoOptionConcepts => {
                    println!("(no option concepts found; default answer)");
                }
            }
        }

        Commands::Analyse { questions } => {
            let question_list = dataset::read_questions(&questions).into_diagnostic()?;
            let histogram = analyse(oracle.as_ref(), &tagger, &question_list).into_diagnostic()?;
            println!("Question kinds across {} questions:", question_list.len());
            for kind in QuestionKind::ALL {
                println!("{:>14} = {}", kind.to_string(), histogram.get(&kind).unwrap_or(&0));
            }
        }
    }

    Ok(())
}

/// Classify every question without solving it.
fn analyse(
    oracle: &dyn Oracle,
    tagger: &RuleTagger,
    questions: &[Question],
) -> quizgraph::error::QuizResult<HashMap<QuestionKind, usize>> {
    let config = SolverConfig::default();
    let mut histogram: HashMap<QuestionKind, usize> = HashMap::new();
    for question in questions {
        let cache = CachedOracle::new(oracle);
        let solver = Solver::new(&cache, tagger, config);
        let mut board = solver.build_blackboard(question)?;
        board.link_properties =
            classify::detect_link_properties(&board.question_concepts, &cache)?;
        let kind = classify::classify(&board, tagger);
        *histogram.entry(kind).or_insert(0) += 1;
    }
    Ok(histogram)
}
