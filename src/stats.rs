//! Run statistics: answer accuracy and the problems hit along the way.

use std::fmt;

use crate::solve::{Outcome, SolveReport};

/// Counters accumulated over a batch run.
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    pub total: usize,
    /// Guesses matching the provided answer (training data only).
    pub correct: usize,
    /// Guesses contradicting the provided answer (training data only).
    pub incorrect: usize,
    /// Questions where no strategy could rank an option.
    pub unanswered: usize,
    pub no_question_concepts: usize,
    pub no_option_concepts: usize,
    /// Questions where some options resolved to no concepts. Not an error,
    /// but a useful insight into the concept matching process.
    pub incomplete_options: usize,
}

impl RunStats {
    pub fn record(&mut self, report: &SolveReport) {
        self.total += 1;
        match report.outcome {
            Outcome::Answered => match report.correct {
                Some(true) => self.correct += 1,
                Some(false) => self.incorrect += 1,
                None => {}
            },
            Outcome::Unanswered => self.unanswered += 1,
            Outcome::NoQuestionConcepts => self.no_question_concepts += 1,
            Outcome::NoOptionConcepts => self.no_option_concepts += 1,
        }
        if report.incomplete_options {
            self.incomplete_options += 1;
        }
    }

    /// Percentage of scored questions answered correctly.
    pub fn success_rate(&self) -> f64 {
        let scored = self.correct + self.incorrect;
        if scored == 0 {
            return 0.0;
        }
        self.correct as f64 / scored as f64 * 100.0
    }

    pub fn merge(&mut self, other: &RunStats) {
        self.total += other.total;
        self.correct += other.correct;
        self.incorrect += other.incorrect;
        self.unanswered += other.unanswered;
        self.no_question_concepts += other.no_question_concepts;
        self.no_option_concepts += other.no_option_concepts;
        self.incomplete_options += other.incomplete_options;
    }
}

impl fmt::Display for RunStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.correct + self.incorrect > 0 {
            writeln!(f, "*** ANSWER SUMMARY ***")?;
            writeln!(f, "Correct answers: {}", self.correct)?;
            writeln!(f, "Wrong answers:   {}", self.incorrect)?;
            writeln!(f, "Success rate:    {:.1}%", self.success_rate())?;
            writeln!(f)?;
        }
        writeln!(f, "*** ISSUES ***")?;
        writeln!(f, "Unanswered questions      : {}", self.unanswered)?;
        writeln!(f, "No question concepts found: {}", self.no_question_concepts)?;
        writeln!(f, "No answer concepts found  : {}", self.no_option_concepts)?;
        writeln!(f, "Incomplete answer options : {}", self.incomplete_options)
    }
}
