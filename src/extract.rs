//! Concept extraction: from a tagged sentence to knowledge-graph keys.
//!
//! A single left-to-right scan with one piece of state — the last tag
//! eligible to start an n-gram — turns tokens into concept lookups,
//! preferring the most specific concept available: 3-grams over 2-grams over
//! single words. Every candidate is validated against the oracle; the
//! extractor never invents keys.
//!
//! The scan works on its own copy of the tag sequence. Normalization,
//! lemma substitution, and retagging happen on that copy, which is returned
//! alongside the concepts so callers see the transformed tokens without the
//! input ever being mutated.

use std::collections::{HashMap, HashSet};

use crate::error::OracleError;
use crate::oracle::Oracle;
use crate::tag::{
    EXCLUDED_QUESTION_WORDS, EXCLUDED_VERBS, PosTag, WordTag, is_numeric, word_to_number,
};
use crate::tagger::Tagger;

/// Result of one extraction pass.
#[derive(Debug, Clone)]
pub struct Extraction {
    /// Concept keys in first-discovery order, deduplicated.
    pub concepts: Vec<String>,
    /// The transformed working copy of the input tags.
    pub tags: Vec<WordTag>,
}

/// Tag a sentence for concept extraction.
///
/// Blank markers and quotes become spaces and periods are dropped before
/// tagging, so "___" fill-ins and abbreviation dots never reach the tagger.
pub fn sentence_tags(text: &str, tagger: &dyn Tagger) -> Vec<WordTag> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    let prepared = text.replace(['_', '"'], " ").replace('.', "");
    let tags = tagger.tag(&prepared);
    tracing::trace!(count = tags.len(), "tagged sentence");
    tags
}

/// Tag question text, additionally dropping low-signal quantity words that
/// routinely derail concept matching.
pub fn question_tags(text: &str, tagger: &dyn Tagger) -> Vec<WordTag> {
    sentence_tags(text, tagger)
        .into_iter()
        .filter(|t| !EXCLUDED_QUESTION_WORDS.contains(&t.text.as_str()))
        .collect()
}

fn contains(results: &[String], value: &str) -> bool {
    results.iter().any(|c| c == value)
}

/// Append if absent; reports whether the value was actually added.
fn push_unique(results: &mut Vec<String>, value: &str) -> bool {
    if contains(results, value) {
        return false;
    }
    results.push(value.to_string());
    true
}

/// Remove the first occurrence of a value, if present.
fn remove_value(results: &mut Vec<String>, value: &str) {
    if let Some(pos) = results.iter().position(|c| c == value) {
        results.remove(pos);
    }
}

/// Remember which standalone words an n-gram we synthesized is allowed to
/// suppress in the post-pass: its first and last underscore segments.
fn record_synthesis(synthesized: &mut HashMap<String, (String, String)>, ngram: &str) {
    let segments: Vec<&str> = ngram.split('_').collect();
    if segments.len() >= 2 {
        synthesized.insert(
            ngram.to_string(),
            (
                (*segments.first().unwrap_or(&"")).to_string(),
                (*segments.last().unwrap_or(&"")).to_string(),
            ),
        );
    }
}

/// Check an n-gram against the oracle; on a hit, keep it and drop the
/// preceding word's standalone concept.
fn try_ngram(
    ngram: &str,
    preceding_text: &str,
    results: &mut Vec<String>,
    synthesized: &mut HashMap<String, (String, String)>,
    oracle: &dyn Oracle,
) -> Result<bool, OracleError> {
    if oracle.exists(ngram)? && !contains(results, ngram) {
        tracing::debug!(%ngram, "n-gram concept found");
        record_synthesis(synthesized, ngram);
        remove_value(results, preceding_text);
        results.push(ngram.to_string());
        return Ok(true);
    }
    Ok(false)
}

/// Extract the candidate concepts from a tagged sentence.
///
/// Returns the concepts in discovery order together with the transformed
/// tag sequence (lowercased, hyphens folded to underscores, lemmas and
/// n-gram merges substituted, mistagged tokens retagged).
pub fn extract_concepts(
    tags: &[WordTag],
    oracle: &dyn Oracle,
    tagger: &dyn Tagger,
) -> Result<Extraction, OracleError> {
    let mut working: Vec<WordTag> = tags.to_vec();
    let mut results: Vec<String> = Vec::new();
    let mut synthesized: HashMap<String, (String, String)> = HashMap::new();
    // Index of the last tag eligible to start an n-gram, if any.
    let mut preceding: Option<usize> = None;

    let mut i = 0;
    while i < working.len() {
        working[i].text = working[i].text.to_lowercase().replace('-', "_");

        match working[i].pos {
            PosTag::Nnp | PosTag::Nn | PosTag::Nns | PosTag::Nnps | PosTag::Rp => {
                if let Some(p) = preceding.filter(|&p| working[p].pos.ngram_eligible()) {
                    let prev_text = working[p].text.clone();
                    let mut ngram = format!("{}_{}", prev_text, working[i].text);
                    if !oracle.exists(&ngram)? && working[i].pos == PosTag::Nns {
                        working[i].text = tagger.lemmatize(&working[i].text);
                        ngram = format!("{}_{}", prev_text, working[i].text);
                    }
                    let mut ngram_exists = oracle.exists(&ngram)?;
                    if !ngram_exists {
                        // Compound order in the graph may be reversed.
                        ngram = format!("{}_{}", working[i].text, prev_text);
                        ngram_exists = oracle.exists(&ngram)?;
                    }

                    if ngram_exists && !contains(&results, &ngram) {
                        tracing::debug!(%ngram, "n-gram concept found");
                        record_synthesis(&mut synthesized, &ngram);
                        remove_value(&mut results, &prev_text);
                        results.push(ngram.clone());
                        working[i].text = ngram;
                    } else {
                        if working[i].pos == PosTag::Nns
                            || (working[i].pos == PosTag::Nnp && working[i].text.ends_with('s'))
                        {
                            working[i].text = tagger.lemmatize(&working[i].text);
                        }
                        if oracle.exists(&working[i].text)? {
                            push_unique(&mut results, &working[i].text);
                        }
                    }
                } else {
                    let added = oracle.exists(&working[i].text)?
                        && push_unique(&mut results, &working[i].text);
                    if !added {
                        if working[i].pos == PosTag::Nns
                            || (working[i].pos == PosTag::Nnp && working[i].text.ends_with('s'))
                        {
                            working[i].text = tagger.lemmatize(&working[i].text);
                        }
                        if oracle.exists(&working[i].text)? {
                            push_unique(&mut results, &working[i].text);
                        }
                    }
                }
                preceding = Some(i);
            }

            PosTag::Jj | PosTag::Jjr => {
                // Adverb + adjective compounds, e.g. environmentally_friendly.
                if let Some(p) = preceding.filter(|&p| working[p].pos == PosTag::Rb) {
                    let prev_text = working[p].text.clone();
                    let mut ngram = format!("{}_{}", prev_text, working[i].text);
                    let mut ngram_exists = oracle.exists(&ngram)?;
                    if !ngram_exists {
                        ngram = format!("{}_{}", working[i].text, prev_text);
                        ngram_exists = oracle.exists(&ngram)?;
                    }
                    if ngram_exists && !contains(&results, &ngram) {
                        tracing::debug!(%ngram, "n-gram concept found");
                        record_synthesis(&mut synthesized, &ngram);
                        remove_value(&mut results, &prev_text);
                        results.push(ngram);
                    }
                    preceding = None;
                    i += 1;
                    continue;
                }

                // Keep the surface form on the tag for n-gram use; only the
                // concept lookup sees the lemma.
                preceding = Some(i);
                let surface = working[i].text.clone();
                if surface.ends_with("ed") || surface.ends_with("ing") || surface.ends_with("nt")
                {
                    // Participles and gerunds mistagged as adjectives.
                    let lemma = tagger.lemmatize(&surface);
                    if oracle.exists(&lemma)? && push_unique(&mut results, &lemma) {
                        i += 1;
                        continue;
                    }
                }
                if oracle.exists(&surface)? {
                    push_unique(&mut results, &surface);
                }
            }

            PosTag::In | PosTag::To => {
                // "amino" is reliably mistagged as a preposition.
                if working[i].text == "amino" {
                    working[i].pos = PosTag::Nn;
                    preceding = Some(i);
                    i += 1;
                    continue;
                }

                let Some(p) = preceding.filter(|&p| working[p].pos.ngram_eligible()) else {
                    i += 1;
                    continue;
                };
                if i == 0 || i + 1 == working.len() {
                    i += 1;
                    continue;
                }

                let mut advance = 1;
                let mut next = i + 1;
                // Step over pronouns and determiners such as "your" or "the".
                if matches!(
                    working[next].pos,
                    PosTag::Prp | PosTag::PrpPoss | PosTag::Dt
                ) && i + 2 < working.len()
                {
                    next = i + 2;
                    advance += 1;
                }

                if working[next].pos.ngram_eligible() {
                    if working[next].pos == PosTag::Nns {
                        working[next].text = tagger.lemmatize(&working[next].text);
                    }
                    let composite = format!(
                        "{}_{}_{}",
                        working[i - 1].text,
                        working[i].text,
                        working[next].text
                    );
                    if oracle.exists(&composite)? && !contains(&results, &composite) {
                        tracing::debug!(ngram = %composite, "3-gram concept found");
                        record_synthesis(&mut synthesized, &composite);
                        remove_value(&mut results, &working[p].text.clone());
                        results.push(composite);
                        advance += 1;
                        preceding = None;
                    }
                }
                i += advance;
                continue;
            }

            pos if pos.is_verb() => {
                if EXCLUDED_VERBS.contains(&working[i].text.as_str()) {
                    // Auxiliaries carry no content; the n-gram chain survives.
                    i += 1;
                    continue;
                }

                let mut ngram_found = false;
                if let Some(p) = preceding.filter(|&p| working[p].pos.ngram_eligible()) {
                    let prev_text = working[p].text.clone();
                    let ngram = format!("{}_{}", prev_text, working[i].text);
                    ngram_found =
                        try_ngram(&ngram, &prev_text, &mut results, &mut synthesized, oracle)?;
                    if !ngram_found {
                        // Retry with the infinitive form of the verb.
                        working[i].text = tagger.lemmatize(&working[i].text);
                        let ngram = format!("{}_{}", prev_text, working[i].text);
                        ngram_found =
                            try_ngram(&ngram, &prev_text, &mut results, &mut synthesized, oracle)?;
                    }
                }
                if !ngram_found {
                    if oracle.exists(&working[i].text)? && !contains(&results, &working[i].text) {
                        // A verb form the graph knows acts as a noun from here on.
                        working[i].pos = PosTag::Nn;
                        let text = working[i].text.clone();
                        results.push(text);
                    } else {
                        working[i].text = tagger.lemmatize(&working[i].text);
                        if oracle.exists(&working[i].text)? {
                            push_unique(&mut results, &working[i].text);
                        }
                    }
                }
                preceding = Some(i);
            }

            PosTag::Rb => {
                // Some words ending in -re are mistagged as adverbs; only keep
                // the ones the graph knows.
                if oracle.exists(&working[i].text)? {
                    push_unique(&mut results, &working[i].text);
                }
                working[i].pos = PosTag::Nn;
                preceding = Some(i);
            }

            PosTag::Cd => {
                // Some numerals are actually mistagged proper nouns.
                if !is_numeric(&working[i].text) {
                    working[i].pos = PosTag::Nn;
                }
                preceding = Some(i);
                if oracle.exists(&working[i].text)? {
                    push_unique(&mut results, &working[i].text);
                }
            }

            PosTag::Dt | PosTag::Possessive => {
                // A determiner between two nouns keeps the n-gram chain alive.
            }

            PosTag::Ex => {
                // Existential tags occasionally swallow habitat/animal words.
                if working[i].text.ends_with("tats") {
                    working[i].text = tagger.lemmatize(&working[i].text);
                }
                if (working[i].text.ends_with("tat") || working[i].text.ends_with("mal"))
                    && oracle.exists(&working[i].text)?
                {
                    push_unique(&mut results, &working[i].text);
                }
            }

            _ => {
                preceding = None;
            }
        }
        i += 1;
    }

    suppress_constituents(&mut results, &synthesized);

    Ok(Extraction {
        concepts: results,
        tags: working,
    })
}

/// Drop standalone words that also survive inside an n-gram we synthesized.
///
/// Only the first and last constituents recorded at synthesis time are
/// candidates, and only when both are present; pre-joined concepts (e.g.
/// from hyphenated tokens) never suppress anything.
fn suppress_constituents(results: &mut Vec<String>, synthesized: &HashMap<String, (String, String)>) {
    let mut suppressed: HashSet<String> = HashSet::new();
    for concept in results.iter() {
        if let Some((first, last)) = synthesized.get(concept) {
            if contains(results, first) && contains(results, last) {
                suppressed.insert(first.clone());
                suppressed.insert(last.clone());
            }
        }
    }
    results.retain(|c| !suppressed.contains(c));
}

/// All potentially significant words of a tagged sentence, deduplicated.
///
/// Splits merged n-gram tokens back into their parts, drops function words,
/// and lemmatizes verbs and plurals so definition matching compares base
/// forms.
pub fn significant_words(tags: &[WordTag], tagger: &dyn Tagger) -> Vec<String> {
    let mut results: Vec<String> = Vec::new();
    for tag in tags {
        if tag.pos.is_noun() && tag.text.contains('_') {
            for part in tag.text.split('_') {
                push_unique(&mut results, part);
            }
            continue;
        }

        if !tag.text.chars().all(|c| c.is_alphanumeric()) {
            continue;
        }
        if matches!(
            tag.pos,
            PosTag::Cc
                | PosTag::In
                | PosTag::Dt
                | PosTag::Prp
                | PosTag::PrpPoss
                | PosTag::Rp
                | PosTag::To
                | PosTag::Wp
                | PosTag::WpPoss
                | PosTag::Wrb
                | PosTag::Wdt
        ) {
            continue;
        }
        if tag.pos == PosTag::Jj && tag.text == "such" {
            continue;
        }

        let mut word = tag.text.clone();
        if tag.pos.is_verb() {
            if EXCLUDED_VERBS.contains(&word.as_str()) {
                continue;
            }
            word = tagger.lemmatize(&word);
        }
        if tag.pos == PosTag::Nns {
            word = tagger.lemmatize(&word);
        }
        push_unique(&mut results, &word);
    }
    results
}

/// Collect the numbers mentioned in a tagged sentence: numeral tokens plus
/// spelled-out number words. Unparseable numerals are logged and skipped.
pub fn find_numbers(tags: &[WordTag]) -> Vec<f64> {
    let mut results = Vec::new();
    for tag in tags {
        if tag.pos != PosTag::Cd {
            continue;
        }
        if is_numeric(&tag.text) {
            match tag.text.parse::<f64>() {
                Ok(n) => results.push(n),
                Err(_) => tracing::warn!(token = %tag.text, "unable to parse numeric token"),
            }
        } else if let Some(n) = word_to_number(&tag.text) {
            results.push(n);
        }
    }
    results
}
