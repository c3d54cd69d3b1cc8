//! Score reduction, weighting, and tie-breaking.
//!
//! Path-probe results collapse to one score per option via the configured
//! metric; a shared weighting pass then compensates options that had fewer
//! concept terms to match with, and breaks remaining ties toward the most
//! specific option.

use crate::blackboard::{Blackboard, Orientation};
use crate::error::OracleError;
use crate::oracle::Oracle;

/// How an option's path-probe results reduce to a single score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RankMetric {
    /// Minimum positive path length across the option's probes.
    Shortest,
    /// Mean of the positive path lengths; no path anywhere disqualifies.
    #[default]
    Average,
}

impl std::str::FromStr for RankMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "shortest" => Ok(Self::Shortest),
            "average" => Ok(Self::Average),
            other => Err(format!(
                "unknown metric `{other}` (expected `shortest` or `average`)"
            )),
        }
    }
}

/// Collapse each option's probe results into a score under the given metric.
pub fn reduce_scores(board: &mut Blackboard, metric: RankMetric) {
    for option in &mut board.options {
        let mut total: u64 = 0;
        let mut lowest: u32 = 100;
        for &value in &option.results {
            total += u64::from(value);
            if value > 0 && value < lowest {
                lowest = value;
            }
        }

        option.score = match metric {
            RankMetric::Shortest => f64::from(lowest),
            RankMetric::Average => {
                let valid = option.results.iter().filter(|&&r| r > 0).count();
                if total == 0 || valid == 0 {
                    // No path to any question concept disqualifies the option.
                    100.0
                } else {
                    total as f64 / valid as f64
                }
            }
        };
    }
}

/// Adjust scores so options with fewer concept terms are not unfairly
/// advantaged, then nudge a tied best set toward the most specific option.
pub fn weight_scores(
    board: &mut Blackboard,
    orientation: Orientation,
    oracle: &dyn Oracle,
) -> Result<(), OracleError> {
    let max_concepts = board
        .options
        .iter()
        .map(|o| o.concepts.len())
        .max()
        .unwrap_or(0);
    tracing::debug!(max_concepts, "weighting option scores");

    for option in &mut board.options {
        let missing = max_concepts.saturating_sub(option.concepts.len());
        if missing > 0 {
            let adjustment = missing as f64 * 0.20;
            tracing::debug!(option = %option.code, adjustment, "missing-term adjustment");
            match orientation {
                Orientation::LowerBest => option.score += adjustment,
                Orientation::HigherBest => option.score -= adjustment,
            }
        }
    }

    let best = board.best_options(orientation);
    tracing::debug!(tied = best.len(), "best scoring options");
    if best.len() > 1 {
        let mut best_degree = match orientation {
            Orientation::LowerBest => f64::MAX,
            Orientation::HigherBest => 0.0,
        };
        let mut chosen: Option<usize> = None;
        for &idx in &best {
            let Some(average) = board.options[idx].average_degree(oracle)? else {
                continue;
            };
            tracing::debug!(option = %board.options[idx].code, average, "average concept degree");
            let better = match orientation {
                Orientation::LowerBest => average < best_degree,
                Orientation::HigherBest => average > best_degree,
            };
            if better {
                best_degree = average;
                chosen = Some(idx);
            }
        }
        if let Some(idx) = chosen {
            tracing::debug!(option = %board.options[idx].code, "specificity tie-break");
            match orientation {
                Orientation::LowerBest => board.options[idx].score -= 0.1,
                Orientation::HigherBest => board.options[idx].score += 0.1,
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blackboard::AnswerOption;
    use crate::oracle::MemoryOracle;
    use crate::question::{AnswerCode, Question};

    fn empty_board() -> Blackboard {
        let question = Question::new(
            "T1",
            "text",
            ["a".into(), "b".into(), "c".into(), "d".into()],
            None,
        );
        let mut board = Blackboard::new(question);
        for code in AnswerCode::ALL {
            board
                .options
                .push(AnswerOption::new(code, "text", Vec::new(), Vec::new()));
        }
        board
    }

    #[test]
    fn average_metric_means_positive_paths() {
        let mut board = empty_board();
        board.options[0].results = vec![2, 4, 0];
        board.options[1].results = vec![0, 0, 0];
        board.options[2].results = vec![5];
        reduce_scores(&mut board, RankMetric::Average);
        assert_eq!(board.options[0].score, 3.0);
        // No path to anything disqualifies.
        assert_eq!(board.options[1].score, 100.0);
        assert_eq!(board.options[2].score, 5.0);
    }

    #[test]
    fn shortest_metric_takes_minimum_positive() {
        let mut board = empty_board();
        board.options[0].results = vec![7, 2, 0, 4];
        reduce_scores(&mut board, RankMetric::Shortest);
        assert_eq!(board.options[0].score, 2.0);
    }

    #[test]
    fn weighting_is_020_per_missing_term() {
        let kb = MemoryOracle::new();
        let mut board = empty_board();
        for option in &mut board.options {
            option.score = 3.0;
        }
        board.options[0].concepts = vec!["a".into(), "b".into(), "c".into()];
        board.options[1].concepts = vec!["d".into()];
        weight_scores(&mut board, Orientation::LowerBest, &kb).unwrap();
        // Two missing terms against the three-concept option.
        let delta = board.options[1].score - board.options[0].score;
        assert!((delta - 0.40).abs() < 1e-9);
    }

    #[test]
    fn weighting_subtracts_when_higher_is_better() {
        let kb = MemoryOracle::new();
        let mut board = empty_board();
        for option in &mut board.options {
            option.score = 3.0;
        }
        board.options[0].concepts = vec!["a".into(), "b".into()];
        weight_scores(&mut board, Orientation::HigherBest, &kb).unwrap();
        assert!(board.options[1].score < board.options[0].score);
    }

    #[test]
    fn tie_breaks_toward_lowest_degree() {
        let kb = MemoryOracle::new();
        // "specific" has degree 1, "generic" degree 3.
        kb.insert_edge("specific", "x", "related");
        kb.insert_edge("generic", "x", "related");
        kb.insert_edge("generic", "y", "related");
        kb.insert_edge("generic", "z", "related");

        let mut board = empty_board();
        board.options[0].score = 2.0;
        board.options[0].concepts = vec!["generic".into()];
        board.options[1].score = 2.0;
        board.options[1].concepts = vec!["specific".into()];
        weight_scores(&mut board, Orientation::LowerBest, &kb).unwrap();
        assert_eq!(board.options[1].score, 1.9);
        assert_eq!(board.options[0].score, 2.0);
    }

    #[test]
    fn tie_break_is_deterministic_across_runs() {
        let kb = MemoryOracle::new();
        kb.insert_edge("specific", "x", "related");
        kb.insert_edge("generic", "x", "related");
        kb.insert_edge("generic", "y", "related");

        for _ in 0..3 {
            let mut board = empty_board();
            board.options[2].score = 4.0;
            board.options[2].concepts = vec!["generic".into()];
            board.options[3].score = 4.0;
            board.options[3].concepts = vec!["specific".into()];
            weight_scores(&mut board, Orientation::LowerBest, &kb).unwrap();
            assert!(board.options[3].score < board.options[2].score);
        }
    }

    #[test]
    fn no_tie_break_for_single_best() {
        let kb = MemoryOracle::new();
        let mut board = empty_board();
        board.options[0].score = 2.0;
        board.options[1].score = 3.0;
        weight_scores(&mut board, Orientation::LowerBest, &kb).unwrap();
        assert_eq!(board.options[0].score, 2.0);
    }

    #[test]
    fn metric_parsing() {
        assert_eq!("shortest".parse::<RankMetric>(), Ok(RankMetric::Shortest));
        assert_eq!("Average".parse::<RankMetric>(), Ok(RankMetric::Average));
        assert!("fastest".parse::<RankMetric>().is_err());
    }
}
