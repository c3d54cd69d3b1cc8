//! # quizgraph
//!
//! Heuristic multiple-choice question answering grounded in a knowledge
//! graph. Question and option text is part-of-speech tagged, mapped onto
//! graph concepts (with multi-word n-gram detection), classified into a
//! solving strategy, and scored per option from graph evidence: direct
//! relations, shortest paths, definitions, and concept specificity.
//!
//! ## Architecture
//!
//! - **Extraction** (`extract`): tagged sentence → deduplicated concept keys
//! - **Classification** (`classify`): first-match-wins rule list → question kind
//! - **Scoring** (`solve`): per-kind strategies, shared weighting and tie-breaks
//! - **Oracle** (`oracle`): read-only graph queries (in-memory, HTTP, cached)
//! - **Tagging** (`tagger`): POS tagging behind a trait, with a rule-based default
//!
//! This is a heuristic scorer, not a verified solver: it ranks options by
//! graph evidence and always has a default answer to fall back on.
//!
//! ## Library usage
//!
//! ```no_run
//! use quizgraph::oracle::MemoryOracle;
//! use quizgraph::question::Question;
//! use quizgraph::solve::{Solver, SolverConfig};
//! use quizgraph::tagger::RuleTagger;
//!
//! let kb = MemoryOracle::new();
//! kb.insert_edge("rust", "iron_oxide", "made-of");
//!
//! let tagger = RuleTagger::new();
//! let solver = Solver::new(&kb, &tagger, SolverConfig::default());
//! let question = Question::new(
//!     "Q1",
//!     "What is rust composed of?",
//!     ["iron oxide".into(), "water".into(), "oxygen".into(), "carbon".into()],
//!     None,
//! );
//! let report = solver.solve(&question).unwrap();
//! println!("answer: {}", report.answer);
//! ```

pub mod blackboard;
pub mod classify;
pub mod dataset;
pub mod error;
pub mod extract;
pub mod oracle;
pub mod question;
pub mod solve;
pub mod stats;
pub mod tag;
pub mod tagger;
