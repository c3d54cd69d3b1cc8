//! Per-question working state shared by extraction, classification, and
//! scoring.
//!
//! A [`Blackboard`] is created for one question, filled in as the pipeline
//! runs, and discarded once an answer (or non-answer) is produced. Nothing
//! on it outlives the question.

use std::fmt::Write as _;

use crate::error::OracleError;
use crate::oracle::Oracle;
use crate::question::{AnswerCode, Question, QuestionKind};
use crate::tag::{PosTag, WordTag, is_numeric, word_to_number};

/// Which end of the score range wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    LowerBest,
    HigherBest,
}

/// One shortest-path probe between an option concept and a question concept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathQuery {
    pub option_concept: String,
    pub question_concept: String,
}

/// Working data for one answer option.
///
/// A score of `0` means "not yet scored / disqualified"; it is never a
/// legitimate ranking value.
#[derive(Debug, Clone)]
pub struct AnswerOption {
    pub code: AnswerCode,
    pub text: String,
    /// Tagged tokens of the option text, post-extraction transform.
    pub tags: Vec<WordTag>,
    /// Candidate concepts, in discovery order, deduplicated.
    pub concepts: Vec<String>,
    /// Path probes formulated for this option.
    pub queries: Vec<PathQuery>,
    /// Probe results, parallel to `queries`; 0 means no path.
    pub results: Vec<u32>,
    pub score: f64,
}

impl AnswerOption {
    pub fn new(code: AnswerCode, text: &str, tags: Vec<WordTag>, concepts: Vec<String>) -> Self {
        Self {
            code,
            text: text.to_string(),
            tags,
            concepts,
            queries: Vec::new(),
            results: Vec::new(),
            score: 0.0,
        }
    }

    /// Queue a path probe with a placeholder result.
    pub fn push_query(&mut self, query: PathQuery) {
        self.queries.push(query);
        self.results.push(0);
    }

    /// How many tokens of the option carry the given tag.
    pub fn count_pos(&self, pos: PosTag) -> usize {
        self.tags.iter().filter(|t| t.pos == pos).count()
    }

    /// The option as a number, when it is a single numeral token.
    pub fn as_number(&self) -> Option<f64> {
        if self.tags.len() != 1 || self.tags[0].pos != PosTag::Cd {
            return None;
        }
        let value = &self.tags[0].text;
        if is_numeric(value) {
            match value.parse::<f64>() {
                Ok(n) => Some(n),
                Err(_) => {
                    tracing::warn!(token = %value, "unable to parse numeric token");
                    None
                }
            }
        } else {
            word_to_number(value)
        }
    }

    /// Mean graph degree of this option's concepts; `None` when it has none.
    pub fn average_degree(&self, oracle: &dyn Oracle) -> Result<Option<f64>, OracleError> {
        if self.concepts.is_empty() {
            return Ok(None);
        }
        let mut sum = 0u64;
        for concept in &self.concepts {
            sum += oracle.degree(concept)?;
        }
        Ok(Some(sum as f64 / self.concepts.len() as f64))
    }
}

/// Working information for one question.
#[derive(Debug, Clone)]
pub struct Blackboard {
    pub question: Question,
    pub kind: QuestionKind,
    /// Question tokens, post-extraction transform.
    pub question_tags: Vec<WordTag>,
    /// Concepts judged significant to the question.
    pub question_concepts: Vec<String>,
    /// Working data per option, in A, B, C, D order.
    pub options: Vec<AnswerOption>,
    /// Question concepts the oracle flags as relation words.
    pub link_properties: Vec<String>,
}

impl Blackboard {
    pub fn new(question: Question) -> Self {
        Self {
            question,
            kind: QuestionKind::Unclassified,
            question_tags: Vec::new(),
            question_concepts: Vec::new(),
            options: Vec::new(),
            link_properties: Vec::new(),
        }
    }

    /// Score orientation for the current question kind.
    ///
    /// Lower scores win, except for least-likely questions and missing-word
    /// questions phrased as "all ... EXCEPT".
    pub fn orientation(&self) -> Orientation {
        if self.kind == QuestionKind::LeastLikely {
            return Orientation::HigherBest;
        }
        if self.kind == QuestionKind::MissingWord && self.question.text.contains("EXCEPT") {
            return Orientation::HigherBest;
        }
        Orientation::LowerBest
    }

    /// The final answer under the current orientation, if any option earned
    /// a rankable score.
    pub fn selected_answer(&self) -> Option<AnswerCode> {
        match self.orientation() {
            Orientation::LowerBest => {
                let mut best = 100.0;
                let mut code = None;
                for option in &self.options {
                    if option.score > 0.0 && option.score < best {
                        best = option.score;
                        code = Some(option.code);
                    }
                }
                code
            }
            Orientation::HigherBest => {
                let mut best = 0.0;
                let mut code = None;
                for option in &self.options {
                    if option.score > 0.0 && option.score > best {
                        best = option.score;
                        code = Some(option.code);
                    }
                }
                code
            }
        }
    }

    /// Indices of the best-scoring options among positive scores; more than
    /// one when tied.
    pub fn best_options(&self, orientation: Orientation) -> Vec<usize> {
        let mut best = match orientation {
            Orientation::LowerBest => 1000.0,
            Orientation::HigherBest => 0.0,
        };
        let mut indices: Vec<usize> = Vec::new();
        for (i, option) in self.options.iter().enumerate() {
            let score = option.score;
            if score <= 0.0 {
                continue;
            }
            let better = match orientation {
                Orientation::LowerBest => score < best,
                Orientation::HigherBest => score > best,
            };
            if better {
                best = score;
                indices.clear();
                indices.push(i);
            } else if score == best {
                indices.push(i);
            }
        }
        indices
    }

    /// Whether every option reduces to exactly one numeral token.
    pub fn is_numeric_question(&self) -> bool {
        self.options
            .iter()
            .all(|o| o.tags.len() == 1 && o.tags[0].pos == PosTag::Cd)
    }

    /// Whether any option text reads like "all of the above".
    pub fn has_all_above_option(&self) -> bool {
        self.options.iter().any(|o| is_all_above(&o.text))
    }

    /// Multi-line dump of the solving state, with concept degrees, for
    /// debug logging.
    pub fn describe(&self, oracle: &dyn Oracle) -> Result<String, OracleError> {
        let mut out = String::new();
        let _ = writeln!(out, "[{}] {}", self.question.id, self.question.text);
        let _ = writeln!(out, "QUESTION TYPE: {}", self.kind);
        let _ = write!(out, "QUESTION CONCEPTS: ");
        for concept in &self.question_concepts {
            let _ = write!(out, "{concept} ({}) ", oracle.degree(concept)?);
        }
        let _ = writeln!(out, "\nANSWERS:");
        for option in &self.options {
            let _ = write!(out, "{} -> [", option.code);
            for concept in &option.concepts {
                let _ = write!(out, "{concept} ({}) ", oracle.degree(concept)?);
            }
            let _ = writeln!(out, "] SCORE: {}", option.score);
            for (query, result) in option.queries.iter().zip(&option.results) {
                let _ = writeln!(
                    out,
                    "\t{} ~ {} = {result}",
                    query.option_concept, query.question_concept
                );
            }
        }
        Ok(out)
    }
}

/// Shared "all of the above" test used by both the classifier and the
/// all-option scorer.
pub fn is_all_above(text: &str) -> bool {
    let lower = text.to_lowercase();
    lower.contains("all of ") && lower.contains("above")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::question::Question;

    fn board_with_scores(scores: [f64; 4]) -> Blackboard {
        let question = Question::new(
            "T1",
            "text",
            ["a".into(), "b".into(), "c".into(), "d".into()],
            None,
        );
        let mut board = Blackboard::new(question);
        for (code, score) in AnswerCode::ALL.into_iter().zip(scores) {
            let mut option = AnswerOption::new(code, "text", Vec::new(), Vec::new());
            option.score = score;
            board.options.push(option);
        }
        board
    }

    #[test]
    fn lowest_positive_wins_by_default() {
        let board = board_with_scores([3.0, 2.0, 4.0, 0.0]);
        assert_eq!(board.selected_answer(), Some(AnswerCode::B));
    }

    #[test]
    fn zero_scores_never_selected() {
        let board = board_with_scores([0.0, 0.0, 0.0, 0.0]);
        assert_eq!(board.selected_answer(), None);
    }

    #[test]
    fn hundred_is_not_an_answer_when_lower_wins() {
        let board = board_with_scores([100.0, 100.0, 100.0, 100.0]);
        assert_eq!(board.selected_answer(), None);
    }

    #[test]
    fn least_likely_takes_highest() {
        let mut board = board_with_scores([3.0, 2.0, 4.0, 0.0]);
        board.kind = QuestionKind::LeastLikely;
        assert_eq!(board.selected_answer(), Some(AnswerCode::C));
    }

    #[test]
    fn except_flips_missing_word_orientation() {
        let mut board = board_with_scores([97.0, 98.0, 99.0, 0.0]);
        board.kind = QuestionKind::MissingWord;
        board.question.text = "All are mammals EXCEPT ___".into();
        assert_eq!(board.selected_answer(), Some(AnswerCode::C));
    }

    #[test]
    fn ties_are_reported_together() {
        let board = board_with_scores([2.0, 2.0, 5.0, 0.0]);
        let best = board.best_options(Orientation::LowerBest);
        assert_eq!(best, vec![0, 1]);
    }

    #[test]
    fn numeric_answer_parsing() {
        let mut option = AnswerOption::new(
            AnswerCode::A,
            "100",
            vec![WordTag::new("100", PosTag::Cd)],
            Vec::new(),
        );
        assert_eq!(option.as_number(), Some(100.0));
        option.tags = vec![WordTag::new("twenty", PosTag::Cd)];
        assert_eq!(option.as_number(), Some(20.0));
        option.tags = vec![WordTag::new("water", PosTag::Nn)];
        assert_eq!(option.as_number(), None);
        option.tags = vec![
            WordTag::new("100", PosTag::Cd),
            WordTag::new("degrees", PosTag::Nns),
        ];
        assert_eq!(option.as_number(), None);
    }

    #[test]
    fn all_above_detection() {
        assert!(is_all_above("All of the above"));
        assert!(is_all_above("all of these above"));
        assert!(!is_all_above("all answers"));
        assert!(!is_all_above("none of the above"));
    }
}
