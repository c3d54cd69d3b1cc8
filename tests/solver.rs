//! End-to-end solving tests: raw question text in, answer letter out,
//! against in-memory knowledge graphs.

use quizgraph::oracle::{MemoryOracle, RelationKind, SYNONYM_RELATION};
use quizgraph::question::{AnswerCode, Question, QuestionKind};
use quizgraph::solve::{Outcome, Solver, SolverConfig, solve_all};
use quizgraph::tagger::RuleTagger;

fn question(text: &str, options: [&str; 4], correct: Option<AnswerCode>) -> Question {
    Question::new("T1", text, options.map(str::to_string), correct)
}

fn solve(kb: &MemoryOracle, q: &Question) -> quizgraph::solve::SolveReport {
    let tagger = RuleTagger::new();
    let solver = Solver::new(kb, &tagger, SolverConfig::default());
    solver.solve(q).unwrap()
}

#[test]
fn composed_of_question_follows_made_of_edge() {
    let kb = MemoryOracle::new();
    kb.insert_concept("rust");
    kb.insert_concept("iron_oxide");
    kb.insert_concept("water");
    kb.insert_concept("oxygen");
    kb.insert_concept("carbon");
    kb.insert_edge("rust", "iron_oxide", RelationKind::MadeOf.label());

    let q = question(
        "What is rust composed of?",
        ["iron oxide", "water", "oxygen", "carbon"],
        Some(AnswerCode::A),
    );
    let report = solve(&kb, &q);

    assert_eq!(report.kind, QuestionKind::ComposedOf);
    assert_eq!(report.answer, AnswerCode::A);
    assert_eq!(report.outcome, Outcome::Answered);
    assert_eq!(report.correct, Some(true));
}

#[test]
fn numeric_question_matches_definition_number() {
    let kb = MemoryOracle::new();
    kb.insert_concept("boiling_point");
    kb.insert_concept_full(
        "boiling_point_of_water",
        false,
        Some("the temperature of 100 degrees at which water boils"),
    );

    let q = question(
        "What is the boiling point of water?",
        ["100", "50", "32", "0"],
        Some(AnswerCode::A),
    );
    let report = solve(&kb, &q);

    assert_eq!(report.kind, QuestionKind::Numeric);
    assert_eq!(report.answer, AnswerCode::A);
    assert_eq!(report.correct, Some(true));
}

#[test]
fn all_of_the_above_option_is_selected() {
    let kb = MemoryOracle::new();
    kb.insert_concept("mineral");
    kb.insert_concept("hard");

    let q = question(
        "Which is true of every mineral?",
        ["it is hard", "it is shiny", "it is rare", "all of the above"],
        None,
    );
    let report = solve(&kb, &q);

    assert_eq!(report.kind, QuestionKind::AllOption);
    assert_eq!(report.answer, AnswerCode::D);
}

#[test]
fn least_likely_question_prefers_longest_path() {
    let kb = MemoryOracle::new();
    kb.insert_edge("whale", "mammal", "is-a");
    kb.insert_edge("bat", "mammal", "is-a");
    kb.insert_edge("mouse", "mammal", "is-a");
    kb.insert_edge("trout", "fish", "is-a");
    kb.insert_edge("fish", "animal", "is-a");
    kb.insert_edge("animal", "mammal", "related");

    let q = question(
        "Which of these is not a mammal?",
        ["whale", "bat", "trout", "mouse"],
        Some(AnswerCode::C),
    );
    let report = solve(&kb, &q);

    assert_eq!(report.kind, QuestionKind::LeastLikely);
    assert_eq!(report.answer, AnswerCode::C);
    assert_eq!(report.correct, Some(true));
}

#[test]
fn property_question_matches_linked_concepts() {
    let kb = MemoryOracle::new();
    kb.insert_linkword("attach");
    kb.insert_concept("barnacle");
    kb.insert_concept("whale");
    kb.insert_concept("cloud");
    kb.insert_concept("star");
    kb.insert_concept("flame");
    kb.insert_edge("barnacle", "whale", "attach");

    let q = question(
        "What does a barnacle attach to?",
        ["whale", "cloud", "star", "flame"],
        Some(AnswerCode::A),
    );
    let report = solve(&kb, &q);

    assert_eq!(report.kind, QuestionKind::HasProperty);
    assert_eq!(report.answer, AnswerCode::A);
}

#[test]
fn unclassified_question_ranks_by_path_length() {
    let kb = MemoryOracle::new();
    kb.insert_edge("granite", "rock", "is-a");
    kb.insert_edge("cloud", "sky", "related");
    kb.insert_edge("sky", "weather", "related");
    kb.insert_edge("weather", "rock", "related");
    kb.insert_concept("wind");
    kb.insert_concept("rain");

    let q = question(
        "Which of the following is a rock?",
        ["granite", "cloud", "wind", "rain"],
        Some(AnswerCode::A),
    );
    let report = solve(&kb, &q);

    assert_eq!(report.kind, QuestionKind::Unclassified);
    assert_eq!(report.answer, AnswerCode::A);
}

#[test]
fn missing_word_question_uses_definition_overlap() {
    let kb = MemoryOracle::new();
    kb.insert_concept_full(
        "thermometer",
        false,
        Some("an instrument that measures temperature"),
    );
    kb.insert_concept("temperature");
    kb.insert_concept("mass");
    kb.insert_concept("volume");
    kb.insert_concept("speed");

    let q = question(
        "A thermometer is used to measure ___.",
        ["temperature", "mass", "volume", "speed"],
        Some(AnswerCode::A),
    );
    let report = solve(&kb, &q);

    assert_eq!(report.kind, QuestionKind::MissingWord);
    assert_eq!(report.answer, AnswerCode::A);
}

#[test]
fn composed_of_without_edges_reclassifies_and_still_answers() {
    // No made-of/part-of edges: the strategy demotes to the default graph
    // search, which finds the direct relation instead.
    let kb = MemoryOracle::new();
    kb.insert_edge("rust", "iron_oxide", "related");
    kb.insert_concept("water");
    kb.insert_concept("oxygen");
    kb.insert_concept("carbon");

    let q = question(
        "What is rust composed of?",
        ["iron oxide", "water", "oxygen", "carbon"],
        Some(AnswerCode::A),
    );
    let report = solve(&kb, &q);

    assert_eq!(report.kind, QuestionKind::Unclassified);
    assert_eq!(report.answer, AnswerCode::A);
}

#[test]
fn tie_break_prefers_more_specific_option() {
    // Both options sit one hop from the question concept; the tie breaks
    // toward the option whose concept has the lower graph degree.
    let kb = MemoryOracle::new();
    kb.insert_edge("basalt", "rock", "is-a");
    kb.insert_edge("water", "rock", "related");
    kb.insert_edge("water", "ocean", "related");
    kb.insert_edge("water", "rain", "related");
    kb.insert_edge("water", "cloud", "related");
    kb.insert_concept("wind");
    kb.insert_concept("fire");

    let q = question(
        "Which of the following is a rock?",
        ["water", "basalt", "wind", "fire"],
        Some(AnswerCode::B),
    );
    let report = solve(&kb, &q);

    assert_eq!(report.answer, AnswerCode::B);
}

#[test]
fn solving_is_deterministic() {
    let kb = MemoryOracle::new();
    kb.insert_edge("granite", "rock", "is-a");
    kb.insert_edge("cloud", "rock", "related");
    kb.insert_concept("wind");
    kb.insert_concept("rain");

    let q = question(
        "Which of the following is a rock?",
        ["granite", "cloud", "wind", "rain"],
        None,
    );
    let first = solve(&kb, &q);
    for _ in 0..5 {
        let again = solve(&kb, &q);
        assert_eq!(again.answer, first.answer);
        assert_eq!(again.kind, first.kind);
    }
}

#[test]
fn ngram_constituents_never_survive_alongside_compound() {
    let kb = MemoryOracle::new();
    kb.insert_concept("iron");
    kb.insert_concept("ore");
    kb.insert_concept("iron_ore");

    let tagger = RuleTagger::new();
    let solver = Solver::new(&kb, &tagger, SolverConfig::default());
    let q = question("Where is iron ore mined?", ["a", "b", "c", "d"], None);
    let board = solver.build_blackboard(&q).unwrap();

    assert!(board.question_concepts.contains(&"iron_ore".to_string()));
    assert!(!board.question_concepts.contains(&"iron".to_string()));
    assert!(!board.question_concepts.contains(&"ore".to_string()));
}

#[test]
fn single_word_type_options_are_specialised() {
    let kb = MemoryOracle::new();
    kb.insert_concept("rock");
    kb.insert_concept("granite");
    kb.insert_concept("igneous");
    kb.insert_concept("igneous_rock");

    let tagger = RuleTagger::new();
    let solver = Solver::new(&kb, &tagger, SolverConfig::default());
    let q = question(
        "What type of rock is granite?",
        ["igneous", "wet", "soft", "loud"],
        None,
    );
    let board = solver.build_blackboard(&q).unwrap();

    assert_eq!(board.options[0].concepts, vec!["igneous_rock"]);
}

#[test]
fn insufficient_data_falls_back_to_default() {
    let kb = MemoryOracle::new();
    let q = question(
        "Zzxv qqwf brrgl?",
        ["aaa", "bbb", "ccc", "ddd"],
        Some(AnswerCode::A),
    );
    let report = solve(&kb, &q);

    assert_eq!(report.outcome, Outcome::NoQuestionConcepts);
    assert_eq!(report.answer, AnswerCode::D);
    // Default answers never count toward accuracy.
    assert_eq!(report.correct, None);
}

#[test]
fn no_option_concepts_falls_back_to_default() {
    let kb = MemoryOracle::new();
    kb.insert_concept("rock");
    let q = question(
        "Which of the following is a rock?",
        ["zzxv", "qqwf", "brrgl", "mmnop"],
        None,
    );
    let report = solve(&kb, &q);

    assert_eq!(report.outcome, Outcome::NoOptionConcepts);
    assert_eq!(report.answer, AnswerCode::D);
}

#[test]
fn definitions_reach_through_synonyms() {
    let kb = MemoryOracle::new();
    kb.insert_concept("water");
    kb.insert_concept_full("h2o", false, Some("boils at 100 degrees"));
    kb.insert_edge("water", "h2o", SYNONYM_RELATION);

    let q = question(
        "At what temperature does water boil?",
        ["100", "50", "32", "0"],
        Some(AnswerCode::A),
    );
    let report = solve(&kb, &q);

    assert_eq!(report.kind, QuestionKind::Numeric);
    assert_eq!(report.answer, AnswerCode::A);
}

#[test]
fn batch_solving_aggregates_stats() {
    let kb = MemoryOracle::new();
    kb.insert_concept("rust");
    kb.insert_concept("iron_oxide");
    kb.insert_concept("water");
    kb.insert_concept("oxygen");
    kb.insert_concept("carbon");
    kb.insert_edge("rust", "iron_oxide", RelationKind::MadeOf.label());

    let questions = vec![
        question(
            "What is rust composed of?",
            ["iron oxide", "water", "oxygen", "carbon"],
            Some(AnswerCode::A),
        ),
        question("Zzxv qqwf?", ["aaa", "bbb", "ccc", "ddd"], None),
    ];

    let tagger = RuleTagger::new();
    let (reports, stats) = solve_all(&kb, &tagger, SolverConfig::default(), &questions).unwrap();

    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].answer, AnswerCode::A);
    assert_eq!(stats.total, 2);
    assert_eq!(stats.correct, 1);
    assert_eq!(stats.no_question_concepts, 1);
}
