//! Part-of-speech tagging and lemmatization.
//!
//! The solver only depends on the [`Tagger`] trait; any real NLP pipeline can
//! sit behind it. [`RuleTagger`] is the bundled implementation: a
//! deterministic, lexicon- and suffix-driven tagger that is nowhere near a
//! full morphology engine but covers the closed classes and regular
//! inflections the solving heuristics actually key on.

use crate::tag::{ABBREVIATIONS, PosTag, WordTag, is_numeric, word_to_number};

/// Produces tagged tokens and base forms for the solver.
///
/// Implementations must be deterministic: the whole solving pipeline promises
/// stable answers given a stable tagger and oracle.
pub trait Tagger {
    /// Tokenize and tag a sentence, in token order.
    fn tag(&self, text: &str) -> Vec<WordTag>;

    /// Base form of a single word: singular for nouns, infinitive for verbs.
    fn lemmatize(&self, word: &str) -> String;
}

// ---------------------------------------------------------------------------
// Closed word classes
// ---------------------------------------------------------------------------

const DETERMINERS: &[&str] = &[
    "the", "a", "an", "this", "that", "these", "those", "each", "every", "some",
    "any", "all", "both", "another", "no",
];

const PREPOSITIONS: &[&str] = &[
    "of", "in", "on", "at", "by", "for", "with", "from", "about", "into",
    "through", "during", "between", "among", "under", "over", "near", "upon",
    "within", "without", "against", "because", "as", "if", "than",
];

const CONJUNCTIONS: &[&str] = &["and", "or", "but", "nor", "yet"];

const PRONOUNS: &[&str] = &[
    "i", "you", "he", "she", "it", "we", "they", "them", "him", "her", "us", "me",
];

const POSSESSIVE_PRONOUNS: &[&str] = &["my", "your", "his", "its", "our", "their"];

const MODALS: &[&str] = &[
    "will", "would", "can", "could", "may", "might", "shall", "should", "must",
];

const PARTICLES: &[&str] = &["up", "down", "off", "out"];

const ADVERBS: &[&str] = &[
    "very", "quite", "too", "also", "always", "never", "often", "sometimes",
    "not", "least", "most", "more", "just", "still", "then", "when", "while",
];

const COMPARATIVE_ADJECTIVES: &[&str] = &[
    "better", "worse", "greater", "smaller", "larger", "bigger", "faster",
    "slower", "stronger", "weaker", "higher", "lower", "warmer", "cooler",
    "harder", "softer", "lighter", "heavier", "denser", "brighter", "darker",
    "older", "younger", "longer", "shorter",
];

const PLAIN_ADJECTIVES: &[&str] = &[
    "hot", "cold", "big", "small", "solid", "liquid", "different", "similar",
    "same", "main", "common", "good", "bad", "old", "young", "likely", "such",
];

/// Base forms of verbs the rule tagger recognises without inflection cues.
const VERBS: &[&str] = &[
    "make", "use", "form", "cause", "become", "occur", "need", "help", "move",
    "grow", "live", "eat", "breathe", "produce", "contain", "require", "attach",
    "orbit", "flow", "melt", "freeze", "boil", "burn", "react", "change",
    "turn", "depend", "consist", "absorb", "reflect", "release", "carry",
    "compose", "erode", "evaporate", "condense", "dissolve",
];

/// Auxiliary and copular forms with their exact tags.
const AUX_FORMS: &[(&str, PosTag)] = &[
    ("is", PosTag::Vbz),
    ("are", PosTag::Vbp),
    ("am", PosTag::Vbp),
    ("was", PosTag::Vbd),
    ("were", PosTag::Vbd),
    ("be", PosTag::Vb),
    ("been", PosTag::Vbn),
    ("being", PosTag::Vbg),
    ("has", PosTag::Vbz),
    ("have", PosTag::Vbp),
    ("had", PosTag::Vbd),
    ("does", PosTag::Vbz),
    ("do", PosTag::Vbp),
    ("did", PosTag::Vbd),
];

/// Irregular surface form → lemma pairs the suffix rules cannot derive.
const IRREGULAR_LEMMAS: &[(&str, &str)] = &[
    // verbs
    ("made", "make"),
    ("was", "be"),
    ("were", "be"),
    ("been", "be"),
    ("had", "have"),
    ("did", "do"),
    ("does", "do"),
    ("done", "do"),
    ("went", "go"),
    ("came", "come"),
    ("took", "take"),
    ("gave", "give"),
    ("found", "find"),
    ("grew", "grow"),
    ("ran", "run"),
    ("got", "get"),
    ("caused", "cause"),
    ("used", "use"),
    ("added", "add"),
    ("froze", "freeze"),
    ("frozen", "freeze"),
    // nouns
    ("children", "child"),
    ("people", "person"),
    ("mice", "mouse"),
    ("feet", "foot"),
    ("teeth", "tooth"),
    ("geese", "goose"),
    ("indices", "index"),
    ("vertices", "vertex"),
    ("matrices", "matrix"),
    ("species", "species"),
    ("leaves", "leaf"),
    ("wolves", "wolf"),
    ("larvae", "larva"),
];

// ---------------------------------------------------------------------------
// Rule tagger
// ---------------------------------------------------------------------------

/// Deterministic lexicon/suffix part-of-speech tagger and lemmatizer.
#[derive(Debug, Default, Clone)]
pub struct RuleTagger;

impl RuleTagger {
    pub fn new() -> Self {
        Self
    }

    /// Split text into word and punctuation tokens.
    ///
    /// Sentence punctuation becomes its own token so that sentence-boundary
    /// logic downstream (n-gram chain breaks, "last token" checks) sees it.
    fn tokenize(text: &str) -> Vec<String> {
        let mut tokens = Vec::new();
        for raw in text.split_whitespace() {
            let stripped = raw.trim_matches(|c: char| !c.is_alphanumeric() && c != '-' && c != '\'');
            let trailing: String = raw
                .chars()
                .rev()
                .take_while(|c| matches!(c, '.' | ',' | '?' | '!' | ';' | ':'))
                .collect();
            if !stripped.is_empty() {
                tokens.push(stripped.to_string());
            }
            for p in trailing.chars().rev() {
                tokens.push(p.to_string());
            }
        }
        tokens
    }

    /// Assign a tag to one token given its sentence position.
    fn classify(token: &str, sentence_initial: bool) -> PosTag {
        if token.chars().all(|c| !c.is_alphanumeric()) {
            return PosTag::Punct;
        }

        let lower = token.to_lowercase();
        let word = lower.as_str();

        if is_numeric(word) || word_to_number(word).is_some() {
            return PosTag::Cd;
        }
        if word == "there" {
            return PosTag::Ex;
        }
        if word == "'s" {
            return PosTag::Possessive;
        }
        if word == "to" {
            return PosTag::To;
        }
        if DETERMINERS.contains(&word) {
            return PosTag::Dt;
        }
        if CONJUNCTIONS.contains(&word) {
            return PosTag::Cc;
        }
        if PRONOUNS.contains(&word) {
            return PosTag::Prp;
        }
        if POSSESSIVE_PRONOUNS.contains(&word) {
            return PosTag::PrpPoss;
        }
        match word {
            "which" | "what" => return PosTag::Wdt,
            "who" | "whom" => return PosTag::Wp,
            "whose" => return PosTag::WpPoss,
            "where" | "why" | "how" => return PosTag::Wrb,
            _ => {}
        }
        if MODALS.contains(&word) {
            return PosTag::Md;
        }
        if let Some((_, tag)) = AUX_FORMS.iter().find(|(w, _)| *w == word) {
            return *tag;
        }
        if PREPOSITIONS.contains(&word) {
            return PosTag::In;
        }
        if ABBREVIATIONS.contains(&word) {
            return PosTag::Nnp;
        }

        // Proper nouns: capitalized anywhere but sentence start.
        if !sentence_initial && token.chars().next().is_some_and(|c| c.is_uppercase()) {
            return if word.ends_with('s') && !word.ends_with("ss") {
                PosTag::Nnps
            } else {
                PosTag::Nnp
            };
        }

        if ADVERBS.contains(&word) {
            return PosTag::Rb;
        }
        if COMPARATIVE_ADJECTIVES.contains(&word) {
            return PosTag::Jjr;
        }
        if PLAIN_ADJECTIVES.contains(&word) {
            return PosTag::Jj;
        }
        if PARTICLES.contains(&word) {
            return PosTag::Rp;
        }
        if word.ends_with("ly") && word.len() > 3 {
            return PosTag::Rb;
        }

        // Verb morphology before noun defaults: inflection cues win.
        if word.ends_with("ing") && word.len() > 4 {
            return PosTag::Vbg;
        }
        if word.ends_with("ed") && word.len() > 3 {
            return PosTag::Vbn;
        }
        if VERBS.contains(&word) {
            return PosTag::Vb;
        }
        if let Some(stem) = word.strip_suffix('s') {
            if VERBS.contains(&stem) {
                return PosTag::Vbz;
            }
            if let Some(es_stem) = word.strip_suffix("es") {
                if VERBS.contains(&es_stem) {
                    return PosTag::Vbz;
                }
            }
        }

        // Adjective suffixes.
        const ADJ_SUFFIXES: &[&str] = &["ous", "ful", "ive", "able", "ible", "less", "ish"];
        if ADJ_SUFFIXES.iter().any(|s| word.ends_with(s)) && word.len() > 4 {
            return PosTag::Jj;
        }

        // Plural nouns: trailing s without the endings that fake a plural.
        if word.ends_with('s')
            && !word.ends_with("ss")
            && !word.ends_with("us")
            && !word.ends_with("is")
            && word.len() > 2
        {
            return PosTag::Nns;
        }

        PosTag::Nn
    }
}

impl Tagger for RuleTagger {
    fn tag(&self, text: &str) -> Vec<WordTag> {
        let tokens = Self::tokenize(text);
        let mut result = Vec::with_capacity(tokens.len());
        let mut sentence_initial = true;
        for token in &tokens {
            let pos = Self::classify(token, sentence_initial);
            sentence_initial = pos == PosTag::Punct && matches!(token.as_str(), "." | "?" | "!");
            result.push(WordTag::new(token.as_str(), pos));
        }

        // Attributive gerunds read as adjectives: "boiling point",
        // "living things".
        for i in 0..result.len().saturating_sub(1) {
            if result[i].pos == PosTag::Vbg && result[i + 1].pos.is_noun() {
                result[i].pos = PosTag::Jj;
            }
        }
        result
    }

    fn lemmatize(&self, word: &str) -> String {
        let lower = word.to_lowercase();

        if let Some((_, lemma)) = IRREGULAR_LEMMAS.iter().find(|(w, _)| *w == lower) {
            return (*lemma).to_string();
        }

        // -ies / -ied → -y  (studies → study, studied → study)
        if let Some(stem) = lower.strip_suffix("ies").or_else(|| lower.strip_suffix("ied")) {
            if stem.len() > 1 {
                return format!("{stem}y");
            }
        }

        // -es after a sibilant or o  (boxes → box, gases → gas, echoes → echo)
        if let Some(stem) = lower.strip_suffix("es") {
            if stem.ends_with('x')
                || stem.ends_with('z')
                || stem.ends_with("ch")
                || stem.ends_with("sh")
                || stem.ends_with('s')
                || stem.ends_with('o')
            {
                return stem.to_string();
            }
        }

        // -ing / -ed with stem repair.
        if let Some(stem) = lower.strip_suffix("ing") {
            if stem.len() > 1 {
                return repair_stem(stem);
            }
        }
        if let Some(stem) = lower.strip_suffix("ed") {
            if stem.len() > 1 {
                return repair_stem(stem);
            }
        }

        // Plain plural -s, guarding endings like gas, crisis, bacillus.
        if let Some(stem) = lower.strip_suffix('s') {
            if !stem.is_empty() && !stem.ends_with('s') {
                let before = stem.chars().last().unwrap_or('x');
                if !matches!(before, 'a' | 'i' | 'o' | 'u') {
                    return stem.to_string();
                }
            }
        }

        lower
    }
}

/// Undo the spelling changes regular -ing/-ed inflection makes to a stem.
fn repair_stem(stem: &str) -> String {
    let chars: Vec<char> = stem.chars().collect();
    let n = chars.len();

    // Doubled final consonant: running → run, stopped → stop. Keep -ll/-ss,
    // which are part of the base (falling → fall, missing → miss).
    if n >= 3 && chars[n - 1] == chars[n - 2] {
        let c = chars[n - 1];
        if !matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'l' | 's') {
            return stem[..stem.len() - 1].to_string();
        }
    }

    // Consonant-vowel-consonant ending with an e-dropping final letter:
    // collid → collide, compos → compose, produc → produce.
    if n >= 3 {
        let last = chars[n - 1];
        let mid = chars[n - 2];
        let prev = chars[n - 3];
        let is_vowel = |c: char| matches!(c, 'a' | 'e' | 'i' | 'o' | 'u');
        if matches!(last, 'c' | 'd' | 'g' | 's' | 'v' | 'z') && is_vowel(mid) && !is_vowel(prev) {
            return format!("{stem}e");
        }
    }

    stem.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags_of(text: &str) -> Vec<(String, PosTag)> {
        RuleTagger::new()
            .tag(text)
            .into_iter()
            .map(|t| (t.text, t.pos))
            .collect()
    }

    #[test]
    fn tags_simple_sentence() {
        let tags = tags_of("The rock contains iron");
        assert_eq!(tags[0], ("the".into(), PosTag::Dt));
        assert_eq!(tags[1], ("rock".into(), PosTag::Nn));
        assert_eq!(tags[2], ("contains".into(), PosTag::Vbz));
        assert_eq!(tags[3], ("iron".into(), PosTag::Nn));
    }

    #[test]
    fn question_mark_is_own_token() {
        let tags = tags_of("What is rust made of?");
        let last = tags.last().unwrap();
        assert_eq!(last.1, PosTag::Punct);
        assert_eq!(tags[tags.len() - 2].0, "of");
    }

    #[test]
    fn numerals_and_number_words() {
        let tags = tags_of("boils at 100 degrees not twenty");
        assert!(tags.iter().any(|t| t.0 == "100" && t.1 == PosTag::Cd));
        assert!(tags.iter().any(|t| t.0 == "twenty" && t.1 == PosTag::Cd));
    }

    #[test]
    fn mid_sentence_capital_is_proper() {
        let tags = tags_of("the orbit of Earth");
        assert!(tags.iter().any(|t| t.0 == "earth" && t.1 == PosTag::Nnp));
    }

    #[test]
    fn sentence_initial_capital_is_not_proper() {
        let tags = tags_of("Water boils");
        assert_eq!(tags[0], ("water".into(), PosTag::Nn));
    }

    #[test]
    fn abbreviations_are_proper_nouns() {
        let tags = tags_of("the pH of soil");
        assert!(tags.iter().any(|t| t.0 == "ph" && t.1 == PosTag::Nnp));
    }

    #[test]
    fn attributive_gerund_becomes_adjective() {
        let tags = tags_of("the boiling point of water");
        assert!(tags.iter().any(|t| t.0 == "boiling" && t.1 == PosTag::Jj));
        let tags = tags_of("the water is boiling");
        assert!(tags.iter().any(|t| t.0 == "boiling" && t.1 == PosTag::Vbg));
    }

    #[test]
    fn plural_guards() {
        let tags = tags_of("the gas and the glass and the crisis");
        assert!(tags.iter().any(|t| t.0 == "gas" && t.1 == PosTag::Nn));
        assert!(tags.iter().any(|t| t.0 == "glass" && t.1 == PosTag::Nn));
        assert!(tags.iter().any(|t| t.0 == "crisis" && t.1 == PosTag::Nn));
    }

    #[test]
    fn lemmatize_plurals() {
        let t = RuleTagger::new();
        assert_eq!(t.lemmatize("rocks"), "rock");
        assert_eq!(t.lemmatize("boxes"), "box");
        assert_eq!(t.lemmatize("studies"), "study");
        assert_eq!(t.lemmatize("gas"), "gas");
        assert_eq!(t.lemmatize("bacillus"), "bacillus");
        assert_eq!(t.lemmatize("mice"), "mouse");
    }

    #[test]
    fn lemmatize_verbs() {
        let t = RuleTagger::new();
        assert_eq!(t.lemmatize("collided"), "collide");
        assert_eq!(t.lemmatize("composed"), "compose");
        assert_eq!(t.lemmatize("running"), "run");
        assert_eq!(t.lemmatize("heated"), "heat");
        assert_eq!(t.lemmatize("made"), "make");
        assert_eq!(t.lemmatize("falling"), "fall");
    }
}
