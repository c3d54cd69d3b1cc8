//! The solver: blackboard construction, strategy dispatch, and answer
//! selection.
//!
//! A [`Solver`] borrows its oracle and tagger explicitly — no globals — so
//! several graphs or test doubles can coexist. One solve is sequential;
//! independent questions fan out across threads in [`solve_all`].

pub mod strategies;
pub mod weight;

pub use weight::RankMetric;

use rayon::prelude::*;

use crate::blackboard::{AnswerOption, Blackboard};
use crate::classify;
use crate::error::{QuizError, QuizResult};
use crate::extract;
use crate::oracle::{CachedOracle, Oracle};
use crate::question::{AnswerCode, Question, QuestionKind};
use crate::stats::RunStats;
use crate::tagger::Tagger;

use strategies::StrategyOutcome;

/// Solver configuration.
#[derive(Debug, Clone, Copy)]
pub struct SolverConfig {
    /// How path-probe results reduce to a score.
    pub metric: RankMetric,
    /// The answer returned when solving cannot rank any option.
    pub default_answer: AnswerCode,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            metric: RankMetric::Average,
            default_answer: AnswerCode::D,
        }
    }
}

/// How a solve attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A strategy ranked at least one option.
    Answered,
    /// Every strategy and fallback left the options unrankable.
    Unanswered,
    /// Extraction found no concepts in the question text.
    NoQuestionConcepts,
    /// Extraction found no concepts in any option.
    NoOptionConcepts,
}

/// The result of solving one question.
#[derive(Debug, Clone)]
pub struct SolveReport {
    pub id: String,
    /// The chosen answer; the configured default when nothing ranked.
    pub answer: AnswerCode,
    pub outcome: Outcome,
    pub kind: QuestionKind,
    /// Whether the answer matches the known correct one; `None` when the
    /// question carries no answer or solving fell back to the default.
    pub correct: Option<bool>,
    /// Some but not all options resolved to concepts.
    pub incomplete_options: bool,
}

/// Solves questions against a knowledge-graph oracle and a tagger.
pub struct Solver<'a> {
    pub(crate) oracle: &'a dyn Oracle,
    pub(crate) tagger: &'a dyn Tagger,
    pub(crate) config: SolverConfig,
}

impl<'a> Solver<'a> {
    pub fn new(oracle: &'a dyn Oracle, tagger: &'a dyn Tagger, config: SolverConfig) -> Self {
        Self {
            oracle,
            tagger,
            config,
        }
    }

    /// Solve one question: extract, gate, classify, score, select.
    pub fn solve(&self, question: &Question) -> QuizResult<SolveReport> {
        let mut board = self.build_blackboard(question)?;

        let with_concepts = board.options.iter().filter(|o| !o.concepts.is_empty()).count();
        let incomplete_options = with_concepts > 0 && with_concepts < board.options.len();

        // Quality gate: without concepts on both sides there is nothing to
        // ground the scoring in. Numeral options count as usable even when
        // the graph has no node for them.
        if board.question_concepts.is_empty() {
            tracing::warn!(id = %question.id, "no question concepts identified");
            return Ok(self.default_report(question, Outcome::NoQuestionConcepts, incomplete_options));
        }
        let usable_options = board
            .options
            .iter()
            .filter(|o| !o.concepts.is_empty() || o.as_number().is_some())
            .count();
        if usable_options == 0 {
            tracing::warn!(id = %question.id, "no option concepts identified");
            return Ok(self.default_report(question, Outcome::NoOptionConcepts, incomplete_options));
        }

        board.link_properties =
            classify::detect_link_properties(&board.question_concepts, self.oracle)?;
        board.kind = classify::classify(&board, self.tagger);
        tracing::debug!(id = %question.id, kind = %board.kind, "question classified");

        self.run_strategies(&mut board)?;

        if tracing::enabled!(tracing::Level::DEBUG) {
            let summary = board.describe(self.oracle)?;
            tracing::debug!("{summary}");
        }

        match board.selected_answer() {
            Some(answer) => {
                let correct = question.correct.map(|c| c == answer);
                match correct {
                    Some(true) => tracing::debug!(id = %question.id, %answer, "answer correct"),
                    Some(false) => {
                        tracing::debug!(id = %question.id, %answer, expected = ?question.correct, "answer wrong");
                    }
                    None => {}
                }
                Ok(SolveReport {
                    id: question.id.clone(),
                    answer,
                    outcome: Outcome::Answered,
                    kind: board.kind,
                    correct,
                    incomplete_options,
                })
            }
            None => {
                tracing::warn!(id = %question.id, "unanswered question; using default");
                let mut report =
                    self.default_report(question, Outcome::Unanswered, incomplete_options);
                report.kind = board.kind;
                Ok(report)
            }
        }
    }

    /// Dispatch the strategy for the current kind, following
    /// reclassification chains within the same pass.
    fn run_strategies(&self, board: &mut Blackboard) -> QuizResult<()> {
        loop {
            let strategy = strategies::strategy_for(board.kind);
            match strategy(self, board)? {
                StrategyOutcome::Done => return Ok(()),
                StrategyOutcome::Reclassify(kind) => {
                    tracing::debug!(new_kind = %kind, "strategy found nothing; reclassifying");
                    board.kind = kind;
                }
            }
        }
    }

    /// Tag and extract concepts for the question and all options.
    pub fn build_blackboard(&self, question: &Question) -> QuizResult<Blackboard> {
        let mut board = Blackboard::new(question.clone());

        let question_tags = extract::question_tags(&question.text, self.tagger);
        let extraction = extract::extract_concepts(&question_tags, self.oracle, self.tagger)?;
        board.question_tags = extraction.tags;
        board.question_concepts = extraction.concepts;

        let mut single_token_options = true;
        for code in AnswerCode::ALL {
            let text = &question.options[code.index()];
            let tags = extract::sentence_tags(text, self.tagger);
            if tags.len() != 1 {
                single_token_options = false;
            }
            let extraction = extract::extract_concepts(&tags, self.oracle, self.tagger)?;
            board.options.push(AnswerOption::new(
                code,
                text,
                extraction.tags,
                extraction.concepts,
            ));
        }

        if single_token_options {
            self.specialise_options(&mut board)?;
        }
        Ok(board)
    }

    /// For "what type of X ..." questions with one-word options, try to
    /// upgrade each option concept to the more specific `option_X` compound.
    fn specialise_options(&self, board: &mut Blackboard) -> QuizResult<()> {
        let mut qualifier: Option<String> = None;
        let mut type_question = false;
        for tag in &board.question_tags {
            if !tag.pos.is_noun() {
                continue;
            }
            if tag.text == "type" {
                type_question = true;
            } else {
                qualifier = Some(tag.text.clone());
                break;
            }
        }

        let Some(qualifier) = qualifier else {
            return Ok(());
        };
        if qualifier.contains('_') || !type_question {
            return Ok(());
        }
        tracing::debug!(%qualifier, "specialising single-word options");

        for option in &mut board.options {
            let Some(first) = option.concepts.first().cloned() else {
                continue;
            };
            let compound = format!("{first}_{qualifier}");
            if self.oracle.exists(&compound)? {
                tracing::debug!(from = %first, to = %compound, "upgraded option concept");
                option.concepts[0] = compound;
            }
        }
        Ok(())
    }

    fn default_report(
        &self,
        question: &Question,
        outcome: Outcome,
        incomplete_options: bool,
    ) -> SolveReport {
        SolveReport {
            id: question.id.clone(),
            answer: self.config.default_answer,
            outcome,
            kind: QuestionKind::Unclassified,
            correct: None,
            incomplete_options,
        }
    }
}

/// Solve a batch of questions in parallel.
///
/// Questions are independent and the oracle is read-only, so they fan out
/// across the rayon pool; each solve gets its own request-scoped oracle
/// cache and blackboard. Reports come back in question order.
pub fn solve_all(
    oracle: &(dyn Oracle + Sync),
    tagger: &(dyn Tagger + Sync),
    config: SolverConfig,
    questions: &[Question],
) -> QuizResult<(Vec<SolveReport>, RunStats)> {
    let reports: Result<Vec<SolveReport>, QuizError> = questions
        .par_iter()
        .map(|question| {
            let plain: &dyn Oracle = oracle;
            let cache = CachedOracle::new(plain);
            let solver = Solver::new(&cache, tagger, config);
            solver.solve(question)
        })
        .collect();
    let reports = reports?;

    let mut stats = RunStats::default();
    for report in &reports {
        stats.record(report);
    }
    Ok((reports, stats))
}
