//! Question classification: route each question to a solving strategy.
//!
//! A fixed, ordered list of predicates; the first one that matches names the
//! question kind. Classification runs once per question, after concept
//! extraction, and never retries — the scoring engine may later demote a
//! question back to [`QuestionKind::Unclassified`] when a strategy finds
//! nothing, but that is its decision, not the classifier's.

use std::collections::HashSet;

use crate::blackboard::Blackboard;
use crate::error::OracleError;
use crate::extract::sentence_tags;
use crate::oracle::Oracle;
use crate::question::QuestionKind;
use crate::tagger::Tagger;

/// Question concepts the oracle flags as relation words.
///
/// A linkword like "attach" lets the solver look up object-[attach]-? edges
/// and match the results against the options.
pub fn detect_link_properties(
    concepts: &[String],
    oracle: &dyn Oracle,
) -> Result<Vec<String>, OracleError> {
    let mut results = Vec::new();
    for concept in concepts {
        if oracle.is_linkword(concept)? {
            tracing::debug!(%concept, "found linkword");
            results.push(concept.clone());
        }
    }
    Ok(results)
}

type RulePredicate = fn(&Blackboard, &dyn Tagger) -> bool;

/// Ordered classification rules; first match wins.
const RULES: &[(QuestionKind, RulePredicate)] = &[
    (QuestionKind::Numeric, |b, _| b.is_numeric_question()),
    (QuestionKind::IsOpinion, |b, _| {
        b.question_concepts.iter().any(|c| c == "opinion")
    }),
    (QuestionKind::AllOption, |b, _| b.has_all_above_option()),
    (QuestionKind::ComposedOf, |b, _| {
        b.question.text.contains("___") && b.question.text.contains(" made from _")
    }),
    (QuestionKind::MissingWord, |b, _| {
        b.question.text.contains("___")
    }),
    (QuestionKind::ComposedOf, |b, _| {
        b.question.text.contains(" composed") || b.question.text.contains(" composition of")
    }),
    (QuestionKind::HasProperty, |b, _| {
        !b.link_properties.is_empty()
    }),
    (QuestionKind::LeastLikely, is_least_likely),
];

/// Assign a question kind from the blackboard state.
///
/// Expects `link_properties` to be populated already; everything else is
/// read straight off the blackboard.
pub fn classify(board: &Blackboard, tagger: &dyn Tagger) -> QuestionKind {
    for (kind, applies) in RULES {
        if applies(board, tagger) {
            return *kind;
        }
    }
    QuestionKind::Unclassified
}

/// "Which ... not ..." / "least likely" phrasing in the question's final
/// sentence, unless softened by a "because" clause.
fn is_least_likely(board: &Blackboard, tagger: &dyn Tagger) -> bool {
    let text = &board.question.text;
    let fragment_start = text.rfind('.').map(|p| p + 1).unwrap_or(0);
    let fragment = &text[fragment_start..];
    tracing::debug!(%fragment, "classifying question fragment");

    let words: HashSet<String> = sentence_tags(fragment, tagger)
        .into_iter()
        .map(|t| t.text)
        .collect();

    let negated = (words.contains("which") && words.contains("not"))
        || (words.contains("least") && words.contains("likely"));
    negated && !words.contains("because")
}
