//! Part-of-speech tags and tagged words.
//!
//! The solver works on Penn-Treebank-style tags. Taggers produce [`WordTag`]
//! sequences; the extractor consumes them and decides, per tag class, how a
//! token may participate in concept lookups and n-gram synthesis.

use std::fmt;

/// A Penn Treebank part-of-speech tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PosTag {
    /// Coordinating conjunction (and, or).
    Cc,
    /// Cardinal number.
    Cd,
    /// Determiner.
    Dt,
    /// Existential "there".
    Ex,
    /// Foreign word.
    Fw,
    /// Preposition or subordinating conjunction.
    In,
    /// Adjective.
    Jj,
    /// Comparative adjective.
    Jjr,
    /// Superlative adjective.
    Jjs,
    /// Modal.
    Md,
    /// Noun, singular or mass.
    Nn,
    /// Noun, plural.
    Nns,
    /// Proper noun, singular.
    Nnp,
    /// Proper noun, plural.
    Nnps,
    /// Possessive marker ('s).
    Possessive,
    /// Personal pronoun.
    Prp,
    /// Possessive pronoun.
    PrpPoss,
    /// Adverb.
    Rb,
    /// Comparative adverb.
    Rbr,
    /// Superlative adverb.
    Rbs,
    /// Particle (up, down, off).
    Rp,
    /// Symbol.
    Sym,
    /// The word "to".
    To,
    /// Interjection.
    Uh,
    /// Verb, base form.
    Vb,
    /// Verb, past tense.
    Vbd,
    /// Verb, gerund or present participle.
    Vbg,
    /// Verb, past participle.
    Vbn,
    /// Verb, non-3rd-person singular present.
    Vbp,
    /// Verb, 3rd-person singular present.
    Vbz,
    /// Wh-determiner (which).
    Wdt,
    /// Wh-pronoun (who).
    Wp,
    /// Possessive wh-pronoun (whose).
    WpPoss,
    /// Wh-adverb (where, when).
    Wrb,
    /// Punctuation.
    Punct,
}

impl PosTag {
    /// Parse a Penn Treebank tag string. Unknown tags map to [`PosTag::Sym`].
    pub fn from_penn(tag: &str) -> Self {
        match tag {
            "CC" => Self::Cc,
            "CD" => Self::Cd,
            "DT" => Self::Dt,
            "EX" => Self::Ex,
            "FW" => Self::Fw,
            "IN" => Self::In,
            "JJ" => Self::Jj,
            "JJR" => Self::Jjr,
            "JJS" => Self::Jjs,
            "MD" => Self::Md,
            "NN" => Self::Nn,
            "NNS" => Self::Nns,
            "NNP" => Self::Nnp,
            "NNPS" => Self::Nnps,
            "POS" => Self::Possessive,
            "PRP" => Self::Prp,
            "PRP$" => Self::PrpPoss,
            "RB" => Self::Rb,
            "RBR" => Self::Rbr,
            "RBS" => Self::Rbs,
            "RP" => Self::Rp,
            "TO" => Self::To,
            "UH" => Self::Uh,
            "VB" => Self::Vb,
            "VBD" => Self::Vbd,
            "VBG" => Self::Vbg,
            "VBN" => Self::Vbn,
            "VBP" => Self::Vbp,
            "VBZ" => Self::Vbz,
            "WDT" => Self::Wdt,
            "WP" => Self::Wp,
            "WP$" => Self::WpPoss,
            "WRB" => Self::Wrb,
            "." | "," | ":" | ";" | "!" | "?" | "(" | ")" | "``" | "''" => Self::Punct,
            _ => Self::Sym,
        }
    }

    /// The canonical Penn Treebank string for this tag.
    pub fn as_penn(&self) -> &'static str {
        match self {
            Self::Cc => "CC",
            Self::Cd => "CD",
            Self::Dt => "DT",
            Self::Ex => "EX",
            Self::Fw => "FW",
            Self::In => "IN",
            Self::Jj => "JJ",
            Self::Jjr => "JJR",
            Self::Jjs => "JJS",
            Self::Md => "MD",
            Self::Nn => "NN",
            Self::Nns => "NNS",
            Self::Nnp => "NNP",
            Self::Nnps => "NNPS",
            Self::Possessive => "POS",
            Self::Prp => "PRP",
            Self::PrpPoss => "PRP$",
            Self::Rb => "RB",
            Self::Rbr => "RBR",
            Self::Rbs => "RBS",
            Self::Rp => "RP",
            Self::Sym => "SYM",
            Self::To => "TO",
            Self::Uh => "UH",
            Self::Vb => "VB",
            Self::Vbd => "VBD",
            Self::Vbg => "VBG",
            Self::Vbn => "VBN",
            Self::Vbp => "VBP",
            Self::Vbz => "VBZ",
            Self::Wdt => "WDT",
            Self::Wp => "WP",
            Self::WpPoss => "WP$",
            Self::Wrb => "WRB",
            Self::Punct => ".",
        }
    }

    /// Whether this tag is any noun class.
    pub fn is_noun(&self) -> bool {
        matches!(self, Self::Nn | Self::Nns | Self::Nnp | Self::Nnps)
    }

    /// Whether this tag is any verb class.
    pub fn is_verb(&self) -> bool {
        matches!(
            self,
            Self::Vb | Self::Vbd | Self::Vbg | Self::Vbn | Self::Vbp | Self::Vbz
        )
    }

    /// Whether a word with this tag may start or extend an n-gram concept.
    ///
    /// Nouns, adjectives, and the open verb forms qualify; everything else
    /// breaks the chain.
    pub fn ngram_eligible(&self) -> bool {
        matches!(
            self,
            Self::Nn
                | Self::Nns
                | Self::Nnp
                | Self::Nnps
                | Self::Jj
                | Self::Vb
                | Self::Vbg
                | Self::Vbz
                | Self::Vbn
        )
    }
}

impl fmt::Display for PosTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_penn())
    }
}

/// One tagged token. The text is held lowercase; extraction passes rewrite
/// it further (hyphen folding, lemma substitution, n-gram merging) on their
/// own working copies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordTag {
    pub text: String,
    pub pos: PosTag,
}

impl WordTag {
    pub fn new(text: impl Into<String>, pos: PosTag) -> Self {
        Self {
            text: text.into().to_lowercase(),
            pos,
        }
    }
}

impl fmt::Display for WordTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.text, self.pos)
    }
}

// ---------------------------------------------------------------------------
// Word classes shared by extraction and scoring
// ---------------------------------------------------------------------------

/// Auxiliaries and copulas that never become concepts on their own.
pub const EXCLUDED_VERBS: &[&str] = &[
    "is", "are", "was", "were", "has", "have", "be", "been", "based",
];

/// Low-signal words dropped from question text before concept extraction.
pub const EXCLUDED_QUESTION_WORDS: &[&str] = &[
    "two", "majority", "primarily", "mainly", "mostly", "large", "new", "usually",
];

/// Tokens that look lowercase but are domain abbreviations; taggers treat
/// them as proper nouns.
pub const ABBREVIATIONS: &[&str] = &["xx", "xy", "ph"];

/// Number words recognised where a definition spells a value out.
const NUMBER_WORDS: &[&str] = &[
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
    "eleven", "twelve", "thirteen", "fourteen", "fifteen", "sixteen", "seventeen",
    "eighteen", "nineteen", "twenty",
];

/// Map a spelled-out number word to its value.
pub fn word_to_number(word: &str) -> Option<f64> {
    NUMBER_WORDS
        .iter()
        .position(|n| n.eq_ignore_ascii_case(word))
        .map(|i| i as f64)
}

/// Whether the token is purely digits (the tagger's notion of a literal number).
pub fn is_numeric(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_ascii_digit())
}
