//! Questions, answer codes, and question kinds.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The letter identifying one of the four answer options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnswerCode {
    A,
    B,
    C,
    D,
}

impl AnswerCode {
    pub const ALL: [AnswerCode; 4] = [Self::A, Self::B, Self::C, Self::D];

    /// Zero-based option index for this code.
    pub fn index(&self) -> usize {
        match self {
            Self::A => 0,
            Self::B => 1,
            Self::C => 2,
            Self::D => 3,
        }
    }

    pub fn letter(&self) -> char {
        match self {
            Self::A => 'A',
            Self::B => 'B',
            Self::C => 'C',
            Self::D => 'D',
        }
    }

    /// Parse a single letter, case-insensitive.
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim() {
            "A" | "a" => Some(Self::A),
            "B" | "b" => Some(Self::B),
            "C" | "c" => Some(Self::C),
            "D" | "d" => Some(Self::D),
            _ => None,
        }
    }
}

impl fmt::Display for AnswerCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// The solving strategy a question is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuestionKind {
    Unclassified,
    IsOpinion,
    MissingWord,
    ComposedOf,
    Numeric,
    LeastLikely,
    HasProperty,
    AllOption,
}

impl QuestionKind {
    pub const ALL: [QuestionKind; 8] = [
        Self::Unclassified,
        Self::IsOpinion,
        Self::MissingWord,
        Self::ComposedOf,
        Self::Numeric,
        Self::LeastLikely,
        Self::HasProperty,
        Self::AllOption,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Unclassified => "unclassified",
            Self::IsOpinion => "is-opinion",
            Self::MissingWord => "missing-word",
            Self::ComposedOf => "composed-of",
            Self::Numeric => "numeric",
            Self::LeastLikely => "least-likely",
            Self::HasProperty => "has-property",
            Self::AllOption => "all-option",
        }
    }
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One multiple-choice question as read from a question file.
#[derive(Debug, Clone)]
pub struct Question {
    pub id: String,
    pub text: String,
    /// Option texts, in A, B, C, D order.
    pub options: [String; 4],
    /// The known correct answer, when the file provides one.
    pub correct: Option<AnswerCode>,
}

impl Question {
    pub fn new(
        id: impl Into<String>,
        text: impl Into<String>,
        options: [String; 4],
        correct: Option<AnswerCode>,
    ) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            options,
            correct,
        }
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[{}] {}", self.id, self.text)?;
        for code in AnswerCode::ALL {
            let marker = if self.correct == Some(code) { "**" } else { "" };
            writeln!(f, "{marker}\t{} {}", code, self.options[code.index()])?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_parsing() {
        assert_eq!(AnswerCode::parse("A"), Some(AnswerCode::A));
        assert_eq!(AnswerCode::parse(" d "), Some(AnswerCode::D));
        assert_eq!(AnswerCode::parse("E"), None);
        assert_eq!(AnswerCode::parse("1"), None);
    }

    #[test]
    fn codes_index_options() {
        let q = Question::new(
            "Q1",
            "What is rust composed of?",
            [
                "iron oxide".into(),
                "water".into(),
                "oxygen".into(),
                "carbon".into(),
            ],
            Some(AnswerCode::A),
        );
        assert_eq!(q.options[AnswerCode::C.index()], "oxygen");
    }
}
