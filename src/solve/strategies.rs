//! Per-kind scoring strategies.
//!
//! Every strategy writes scores onto the blackboard's options and reports
//! whether it is done or wants the question demoted to
//! [`QuestionKind::Unclassified`] for the default graph-search treatment.
//! Reclassification re-enters the dispatch loop within the same solve pass,
//! reformulating queries from scratch.

use crate::blackboard::{Blackboard, Orientation, PathQuery, is_all_above};
use crate::error::OracleError;
use crate::extract::{find_numbers, sentence_tags, significant_words};
use crate::oracle::{Oracle, RelationKind};
use crate::question::QuestionKind;
use crate::tag::PosTag;

use super::Solver;
use super::weight::{reduce_scores, weight_scores};

/// What a strategy decided after scoring.
pub(crate) enum StrategyOutcome {
    Done,
    Reclassify(QuestionKind),
}

pub(crate) type StrategyFn =
    fn(&Solver<'_>, &mut Blackboard) -> Result<StrategyOutcome, OracleError>;

/// Strategy lookup table keyed by question kind.
const STRATEGIES: &[(QuestionKind, StrategyFn)] = &[
    (QuestionKind::IsOpinion, solve_is_opinion),
    (QuestionKind::MissingWord, solve_missing_word),
    (QuestionKind::ComposedOf, solve_composed_of),
    (QuestionKind::Numeric, solve_numeric),
    (QuestionKind::LeastLikely, solve_least_likely),
    (QuestionKind::HasProperty, solve_has_property),
    (QuestionKind::AllOption, solve_all_option),
    (QuestionKind::Unclassified, solve_unclassified),
];

pub(crate) fn strategy_for(kind: QuestionKind) -> StrategyFn {
    STRATEGIES
        .iter()
        .find(|(k, _)| *k == kind)
        .map(|(_, f)| *f)
        .unwrap_or(solve_unclassified)
}

/// Opinion questions: the option with the most comparative adjectives wins.
fn solve_is_opinion(
    _solver: &Solver<'_>,
    board: &mut Blackboard,
) -> Result<StrategyOutcome, OracleError> {
    score_by_pos_tokens(board, &[PosTag::Jjr], false);
    Ok(StrategyOutcome::Done)
}

/// Missing-word questions: definition overlap, falling back to concept
/// specificity when no option overlaps at all.
fn solve_missing_word(
    solver: &Solver<'_>,
    board: &mut Blackboard,
) -> Result<StrategyOutcome, OracleError> {
    if !score_by_definition(solver, board)? {
        score_by_specificity(board, solver.oracle)?;
    }
    Ok(StrategyOutcome::Done)
}

/// Composition questions: count direct made-of/part-of edges between
/// question and option concepts. No edge anywhere demotes the question.
fn solve_composed_of(
    solver: &Solver<'_>,
    board: &mut Blackboard,
) -> Result<StrategyOutcome, OracleError> {
    for option in &mut board.options {
        option.score = 100.0;
    }
    score_by_relations(board, solver.oracle, RelationKind::MadeOf)?;
    score_by_relations(board, solver.oracle, RelationKind::PartOf)?;

    let answered = board.options.iter().any(|o| o.score != 100.0);
    if answered {
        Ok(StrategyOutcome::Done)
    } else {
        Ok(StrategyOutcome::Reclassify(QuestionKind::Unclassified))
    }
}

/// Numeric questions: match option values against numbers mentioned in the
/// definitions of the question concepts.
fn solve_numeric(
    solver: &Solver<'_>,
    board: &mut Blackboard,
) -> Result<StrategyOutcome, OracleError> {
    if !score_numeric(solver, board)? {
        score_by_specificity(board, solver.oracle)?;
    }
    Ok(StrategyOutcome::Done)
}

/// Least-likely questions: the default graph search, but the longest paths
/// win.
fn solve_least_likely(
    solver: &Solver<'_>,
    board: &mut Blackboard,
) -> Result<StrategyOutcome, OracleError> {
    formulate_queries(board);
    evaluate_queries(board, solver.oracle)?;
    reduce_scores(board, solver.config.metric);
    weight_scores(board, Orientation::HigherBest, solver.oracle)?;
    Ok(StrategyOutcome::Done)
}

/// Property questions: match options against concepts reachable through the
/// detected link properties. No match anywhere demotes the question.
fn solve_has_property(
    solver: &Solver<'_>,
    board: &mut Blackboard,
) -> Result<StrategyOutcome, OracleError> {
    if score_by_properties(solver, board)? {
        Ok(StrategyOutcome::Done)
    } else {
        Ok(StrategyOutcome::Reclassify(QuestionKind::Unclassified))
    }
}

/// "All of the above" questions default to choosing the all option.
fn solve_all_option(
    _solver: &Solver<'_>,
    board: &mut Blackboard,
) -> Result<StrategyOutcome, OracleError> {
    score_all_above(board);
    Ok(StrategyOutcome::Done)
}

/// The default treatment: shortest-path probes between every option concept
/// and every question concept, with definition overlap and specificity as
/// fallbacks when the graph search yields nothing.
fn solve_unclassified(
    solver: &Solver<'_>,
    board: &mut Blackboard,
) -> Result<StrategyOutcome, OracleError> {
    formulate_queries(board);
    evaluate_queries(board, solver.oracle)?;
    reduce_scores(board, solver.config.metric);
    weight_scores(board, Orientation::LowerBest, solver.oracle)?;

    if board.selected_answer().is_none() {
        tracing::debug!("graph search returned no answer; trying alternatives");
        if !score_by_definition(solver, board)? {
            score_by_specificity(board, solver.oracle)?;
        }
    }
    Ok(StrategyOutcome::Done)
}

// ---------------------------------------------------------------------------
// Query formulation and evaluation
// ---------------------------------------------------------------------------

/// Queue a shortest-path probe for every (option concept, question concept)
/// pair with distinct values.
pub(crate) fn formulate_queries(board: &mut Blackboard) {
    if !matches!(
        board.kind,
        QuestionKind::Unclassified | QuestionKind::LeastLikely
    ) {
        return;
    }

    let question_concepts = board.question_concepts.clone();
    for option in &mut board.options {
        if option.concepts.is_empty() {
            continue;
        }
        let mut pairs = Vec::new();
        for question_concept in &question_concepts {
            for option_concept in &option.concepts {
                if option_concept == question_concept {
                    continue;
                }
                pairs.push(PathQuery {
                    option_concept: option_concept.clone(),
                    question_concept: question_concept.clone(),
                });
            }
        }
        for pair in pairs {
            option.push_query(pair);
        }
    }
}

/// Run every queued probe; a missing path records as 0.
pub(crate) fn evaluate_queries(
    board: &mut Blackboard,
    oracle: &dyn Oracle,
) -> Result<(), OracleError> {
    for option in &mut board.options {
        for i in 0..option.queries.len() {
            let query = option.queries[i].clone();
            let length = oracle
                .shortest_path_len(&query.option_concept, &query.question_concept)?
                .unwrap_or(0);
            option.results[i] = length;
            tracing::trace!(
                option = %option.code,
                from = %query.option_concept,
                to = %query.question_concept,
                length,
                "path probe"
            );
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Individual scorers
// ---------------------------------------------------------------------------

/// Score by occurrence of particular part-of-speech tags.
pub(crate) fn score_by_pos_tokens(board: &mut Blackboard, tokens: &[PosTag], lowest_best: bool) {
    for option in &mut board.options {
        let count: usize = tokens.iter().map(|t| option.count_pos(*t)).sum();
        option.score = if lowest_best {
            count as f64
        } else {
            100.0 - count as f64
        };
    }
}

/// Tie-breaker: a one-point improvement to the option whose concepts have
/// the lowest average graph degree.
pub(crate) fn score_by_specificity(
    board: &mut Blackboard,
    oracle: &dyn Oracle,
) -> Result<(), OracleError> {
    tracing::debug!("tie-breaking by concept specificity");
    let mut lowest = f64::MAX;
    let mut chosen: Option<usize> = None;
    for (i, option) in board.options.iter().enumerate() {
        let Some(average) = option.average_degree(oracle)? else {
            continue;
        };
        tracing::debug!(option = %option.code, average, "average concept degree");
        if average < lowest {
            lowest = average;
            chosen = Some(i);
        }
    }
    if let Some(i) = chosen {
        board.options[i].score -= 1.0;
    }
    Ok(())
}

/// Significant words of the definitions of a concept list, deduplicated.
/// `None` when there are no concepts to look up.
fn definition_words(
    concepts: &[String],
    solver: &Solver<'_>,
) -> Result<Option<Vec<String>>, OracleError> {
    if concepts.is_empty() {
        return Ok(None);
    }
    let mut results: Vec<String> = Vec::new();
    for concept in concepts {
        let Some(definition) = solver.oracle.definitions(concept)? else {
            tracing::debug!(%concept, "no definition");
            continue;
        };
        tracing::debug!(%concept, %definition, "definition");
        let tags = sentence_tags(&definition, solver.tagger);
        for word in significant_words(&tags, solver.tagger) {
            if !results.contains(&word) {
                results.push(word);
            }
        }
    }
    Ok(Some(results))
}

/// Definition-overlap scoring: count word matches between question
/// definitions and option words, then between option definitions and
/// question words. Reports whether any option matched anything.
pub(crate) fn score_by_definition(
    solver: &Solver<'_>,
    board: &mut Blackboard,
) -> Result<bool, OracleError> {
    let Some(definition_terms) = definition_words(&board.question_concepts, solver)? else {
        return Ok(false);
    };
    tracing::debug!(?definition_terms, "definition overlap scoring");

    let question_words = significant_words(
        &sentence_tags(&board.question.text, solver.tagger),
        solver.tagger,
    );

    let mut have_result = false;
    for option in &mut board.options {
        let mut matches: Vec<String> = Vec::new();
        let mut count = 0usize;

        let option_words = significant_words(&option.tags, solver.tagger);
        for def_word in &definition_terms {
            for term in &option_words {
                if term.eq_ignore_ascii_case(def_word) && !matches.iter().any(|m| m == def_word)
                {
                    tracing::debug!(option = %option.code, word = %def_word, "match in question definition");
                    matches.push(def_word.clone());
                    count += 1;
                }
            }
        }

        let option_definitions = definition_words(&option.concepts, solver)?;
        let Some(option_definitions) = option_definitions.filter(|words| !words.is_empty())
        else {
            tracing::debug!(option = %option.code, "no definition words for option");
            if count > 0 {
                have_result = true;
            }
            option.score = 100.0 - count as f64;
            continue;
        };

        for def_word in &option_definitions {
            for question_word in &question_words {
                if def_word.eq_ignore_ascii_case(question_word)
                    && !matches.iter().any(|m| m == question_word)
                {
                    tracing::debug!(option = %option.code, word = %question_word, "match in option definition");
                    matches.push(question_word.clone());
                    count += 1;
                }
            }
        }

        option.score = 100.0 - count as f64;
        if count > 0 {
            have_result = true;
        }
    }
    Ok(have_result)
}

/// Numeric scoring: collect numbers from question-concept definitions and
/// match them against single-numeral options.
pub(crate) fn score_numeric(
    solver: &Solver<'_>,
    board: &mut Blackboard,
) -> Result<bool, OracleError> {
    if board.question_concepts.is_empty() {
        return Ok(false);
    }

    let mut numbers: Vec<f64> = Vec::new();
    for concept in &board.question_concepts {
        let Some(definition) = solver.oracle.definitions(concept)? else {
            continue;
        };
        tracing::debug!(%concept, %definition, "definition");
        let tags = sentence_tags(&definition, solver.tagger);
        let found = find_numbers(&tags);
        if !found.is_empty() {
            tracing::debug!(%concept, ?found, "numbers in definition");
            numbers.extend(found);
        }
    }
    tracing::debug!(?numbers, "numbers found in question definitions");

    let mut have_result = false;
    for option in &mut board.options {
        let mut count = 0usize;
        if let Some(value) = option.as_number() {
            count = numbers.iter().filter(|&&n| n == value).count();
        }
        option.score = 100.0 - count as f64;
        if count > 0 {
            have_result = true;
        }
    }
    Ok(have_result)
}

/// Decrement an option's score for every direct relation of the given kind
/// between one of its concepts and a question concept.
pub(crate) fn score_by_relations(
    board: &mut Blackboard,
    oracle: &dyn Oracle,
    relation: RelationKind,
) -> Result<bool, OracleError> {
    let question_concepts = board.question_concepts.clone();
    let mut have_result = false;
    for option in &mut board.options {
        let mut count = 0usize;
        for question_concept in &question_concepts {
            for option_concept in &option.concepts {
                let connected = oracle.connected(question_concept, option_concept, relation)?;
                tracing::trace!(
                    question = %question_concept,
                    option_concept = %option_concept,
                    %relation,
                    connected,
                    "relation probe"
                );
                if connected {
                    count += 1;
                }
            }
        }
        option.score -= count as f64;
        if count > 0 {
            have_result = true;
        }
    }
    Ok(have_result)
}

/// Property scoring: options start at 100 and improve for every concept
/// found among the link-property neighbours of the question concepts.
pub(crate) fn score_by_properties(
    solver: &Solver<'_>,
    board: &mut Blackboard,
) -> Result<bool, OracleError> {
    let mut match_list: Vec<String> = Vec::new();
    for concept in &board.question_concepts {
        for link in &board.link_properties {
            let related = solver.oracle.related_by_property(concept, link)?;
            match_list.extend(related);
        }
    }
    tracing::debug!(?match_list, "property match list");

    let mut answered = false;
    for option in &mut board.options {
        option.score = 100.0;
        for concept in &option.concepts {
            for matched in &match_list {
                if matched == concept {
                    option.score -= 1.0;
                    tracing::debug!(option = %option.code, %concept, "property match");
                    answered = true;
                }
            }
        }
    }
    Ok(answered)
}

/// Every option scores 100 except the "all of the above" one at 99.
pub(crate) fn score_all_above(board: &mut Blackboard) {
    for option in &mut board.options {
        option.score = if is_all_above(&option.text) {
            99.0
        } else {
            100.0
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blackboard::AnswerOption;
    use crate::oracle::MemoryOracle;
    use crate::question::{AnswerCode, Question};
    use crate::solve::SolverConfig;
    use crate::tagger::{RuleTagger, Tagger};

    fn board_for(text: &str, options: [&str; 4]) -> Blackboard {
        let question = Question::new("T1", text, options.map(str::to_string), None);
        let tagger = RuleTagger::new();
        let mut board = Blackboard::new(question.clone());
        for code in AnswerCode::ALL {
            let option_text = &question.options[code.index()];
            board.options.push(AnswerOption::new(
                code,
                option_text,
                tagger.tag(option_text),
                Vec::new(),
            ));
        }
        board
    }

    #[test]
    fn relations_decrement_connected_options() {
        let kb = MemoryOracle::new();
        kb.insert_edge("rust", "iron_oxide", RelationKind::MadeOf.label());
        let mut board = board_for("What is rust composed of?", ["a", "b", "c", "d"]);
        board.question_concepts = vec!["rust".into()];
        board.options[0].concepts = vec!["iron_oxide".into()];
        board.options[1].concepts = vec!["water".into()];
        for option in &mut board.options {
            option.score = 100.0;
        }

        let answered = score_by_relations(&mut board, &kb, RelationKind::MadeOf).unwrap();
        assert!(answered);
        assert_eq!(board.options[0].score, 99.0);
        assert_eq!(board.options[1].score, 100.0);
    }

    #[test]
    fn composed_of_demotes_without_edges() {
        let kb = MemoryOracle::new();
        kb.insert_concept("rust");
        let tagger = RuleTagger::new();
        let solver = Solver::new(&kb, &tagger, SolverConfig::default());
        let mut board = board_for("What is rust composed of?", ["a", "b", "c", "d"]);
        board.question_concepts = vec!["rust".into()];
        board.options[0].concepts = vec!["water".into()];

        let outcome = solve_composed_of(&solver, &mut board).unwrap();
        assert!(matches!(
            outcome,
            StrategyOutcome::Reclassify(QuestionKind::Unclassified)
        ));
    }

    #[test]
    fn property_matches_improve_scores() {
        let kb = MemoryOracle::new();
        kb.insert_edge("barnacle", "whale", "attach");
        let tagger = RuleTagger::new();
        let solver = Solver::new(&kb, &tagger, SolverConfig::default());
        let mut board = board_for("What does a barnacle attach to?", ["a", "b", "c", "d"]);
        board.question_concepts = vec!["barnacle".into()];
        board.link_properties = vec!["attach".into()];
        board.options[0].concepts = vec!["whale".into()];
        board.options[1].concepts = vec!["cloud".into()];

        let answered = score_by_properties(&solver, &mut board).unwrap();
        assert!(answered);
        assert_eq!(board.options[0].score, 99.0);
        assert_eq!(board.options[1].score, 100.0);
    }

    #[test]
    fn all_above_option_scores_99() {
        let mut board = board_for(
            "A mineral is which of these?",
            ["hard", "shiny", "rare", "all of the above"],
        );
        score_all_above(&mut board);
        assert_eq!(board.options[3].score, 99.0);
        assert_eq!(board.options[0].score, 100.0);
        assert_eq!(board.selected_answer(), Some(AnswerCode::D));
    }

    #[test]
    fn opinion_scoring_counts_comparatives() {
        let mut board = board_for(
            "Which statement is an opinion?",
            [
                "water is wetter and better",
                "water boils",
                "water freezes",
                "water flows",
            ],
        );
        // "better" tags as a comparative adjective.
        score_by_pos_tokens(&mut board, &[PosTag::Jjr], false);
        assert_eq!(board.options[0].score, 99.0);
        assert_eq!(board.options[1].score, 100.0);
    }

    #[test]
    fn definition_overlap_finds_matching_option() {
        let kb = MemoryOracle::new();
        kb.insert_defined("thermometer", "an instrument that measures temperature");
        kb.insert_concept("temperature");
        let tagger = RuleTagger::new();
        let solver = Solver::new(&kb, &tagger, SolverConfig::default());

        let mut board = board_for(
            "A thermometer is used to find ___.",
            ["temperature", "mass", "volume", "speed"],
        );
        board.question_concepts = vec!["thermometer".into()];
        board.options[0].concepts = vec!["temperature".into()];

        let have = score_by_definition(&solver, &mut board).unwrap();
        assert!(have);
        assert_eq!(board.options[0].score, 99.0);
        assert_eq!(board.options[1].score, 100.0);
    }

    #[test]
    fn definition_overlap_reports_nothing_without_definitions() {
        let kb = MemoryOracle::new();
        kb.insert_concept("thermometer");
        let tagger = RuleTagger::new();
        let solver = Solver::new(&kb, &tagger, SolverConfig::default());

        let mut board = board_for("A thermometer is ___.", ["a", "b", "c", "d"]);
        board.question_concepts = vec!["thermometer".into()];
        let have = score_by_definition(&solver, &mut board).unwrap();
        assert!(!have);
    }

    #[test]
    fn numeric_scoring_matches_definition_numbers() {
        let kb = MemoryOracle::new();
        kb.insert_defined("boiling_point", "water boils at 100 degrees celsius");
        let tagger = RuleTagger::new();
        let solver = Solver::new(&kb, &tagger, SolverConfig::default());

        let mut board = board_for(
            "At what temperature does water boil?",
            ["100", "50", "32", "0"],
        );
        board.question_concepts = vec!["boiling_point".into()];

        let have = score_numeric(&solver, &mut board).unwrap();
        assert!(have);
        assert_eq!(board.options[0].score, 99.0);
        assert_eq!(board.options[1].score, 100.0);
        assert_eq!(board.selected_answer(), Some(AnswerCode::A));
    }

    #[test]
    fn formulate_skips_identical_pairs_and_empty_options() {
        let mut board = board_for("Which is a rock?", ["a", "b", "c", "d"]);
        board.question_concepts = vec!["rock".into()];
        board.options[0].concepts = vec!["granite".into(), "rock".into()];
        formulate_queries(&mut board);
        assert_eq!(board.options[0].queries.len(), 1);
        assert_eq!(board.options[0].queries[0].option_concept, "granite");
        assert!(board.options[1].queries.is_empty());
    }

    #[test]
    fn evaluate_records_zero_for_missing_paths() {
        let kb = MemoryOracle::new();
        kb.insert_edge("granite", "rock", "related");
        kb.insert_concept("cloud");
        let mut board = board_for("Which is a rock?", ["a", "b", "c", "d"]);
        board.question_concepts = vec!["rock".into()];
        board.options[0].concepts = vec!["granite".into()];
        board.options[1].concepts = vec!["cloud".into()];
        formulate_queries(&mut board);
        evaluate_queries(&mut board, &kb).unwrap();
        assert_eq!(board.options[0].results, vec![1]);
        assert_eq!(board.options[1].results, vec![0]);
    }
}
