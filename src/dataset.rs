//! Question file reading and answer writing.
//!
//! Two line formats are supported: the plain TSV layout
//! (`id<TAB>text[<TAB>answer]<TAB>A<TAB>B<TAB>C<TAB>D`) and the AI2 CSV
//! export, which carries nine metadata columns followed by the question text
//! with the options inline as "(A) .. (B) ..".

use std::fs::OpenOptions;
use std::io::Write as _;
use std::path::Path;
use std::sync::LazyLock;

use rand::Rng;
use regex::Regex;

use crate::error::DatasetError;
use crate::question::{AnswerCode, Question};
use crate::solve::SolveReport;

/// The two supported question file layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineFormat {
    Tsv,
    Csv,
}

impl LineFormat {
    /// Pick the format from the file extension; anything but `.csv` reads
    /// as TSV.
    pub fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("csv") => Self::Csv,
            _ => Self::Tsv,
        }
    }
}

static OPTION_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(([A-D])\)").expect("option marker pattern is valid"));

/// Read every question from a file, skipping the header row.
pub fn read_questions(path: &Path) -> Result<Vec<Question>, DatasetError> {
    let format = LineFormat::for_path(path);
    let text = std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut questions = Vec::new();
    for (line_no, line) in text.lines().enumerate().skip(1) {
        if line.trim().is_empty() {
            continue;
        }
        questions.push(parse_line(line, format, line_no + 1)?);
    }
    if questions.is_empty() {
        return Err(DatasetError::Empty {
            path: path.to_path_buf(),
        });
    }
    tracing::info!(path = %path.display(), count = questions.len(), "read question file");
    Ok(questions)
}

/// Parse one question line. `line_no` is the 1-based file line, used only
/// for error reporting.
pub fn parse_line(
    line: &str,
    format: LineFormat,
    line_no: usize,
) -> Result<Question, DatasetError> {
    match format {
        LineFormat::Tsv => parse_tsv(line, line_no),
        LineFormat::Csv => parse_csv(line, line_no),
    }
}

fn parse_tsv(line: &str, line_no: usize) -> Result<Question, DatasetError> {
    let fields: Vec<&str> = line.split('\t').collect();
    let (correct, options) = match fields.len() {
        6 => (None, &fields[2..6]),
        7 => (AnswerCode::parse(fields[2]), &fields[3..7]),
        n => {
            return Err(DatasetError::MalformedLine {
                line: line_no,
                reason: format!("expected 6 or 7 tab-separated fields, found {n}"),
            });
        }
    };
    Ok(Question::new(
        fields[0],
        fields[1],
        [
            options[0].trim().to_string(),
            options[1].trim().to_string(),
            options[2].trim().to_string(),
            options[3].trim().to_string(),
        ],
        correct,
    ))
}

/// The AI2 CSV layout: nine metadata columns, then the question body, then
/// two trailing columns. The body itself may contain commas, so it spans
/// from the ninth comma to the second-to-last one.
fn parse_csv(line: &str, line_no: usize) -> Result<Question, DatasetError> {
    let comma_positions: Vec<usize> = line
        .char_indices()
        .filter(|(_, c)| *c == ',')
        .map(|(i, _)| i)
        .collect();
    if comma_positions.len() < 11 {
        return Err(DatasetError::MalformedLine {
            line: line_no,
            reason: format!(
                "expected at least 12 comma-separated fields, found {}",
                comma_positions.len() + 1
            ),
        });
    }

    let fields: Vec<&str> = line.splitn(10, ',').collect();
    let id = fields[0];
    let correct = AnswerCode::parse(fields[3]);

    let body_start = comma_positions[8] + 1;
    let body_end = comma_positions[comma_positions.len() - 2];
    let body = line[body_start..body_end].replace('"', "");

    let markers: Vec<(AnswerCode, usize, usize)> = OPTION_MARKER
        .captures_iter(&body)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let code = AnswerCode::parse(caps.get(1)?.as_str())?;
            Some((code, whole.start(), whole.end()))
        })
        .collect();

    let expected = [AnswerCode::A, AnswerCode::B, AnswerCode::C];
    if markers.len() < 3 || markers.iter().zip(expected).any(|(m, e)| m.0 != e) {
        return Err(DatasetError::MalformedLine {
            line: line_no,
            reason: "question body does not contain (A) (B) (C) option markers".into(),
        });
    }

    let text = body[..markers[0].1].trim().to_string();
    let mut options = [const { String::new() }; 4];
    for (i, marker) in markers.iter().enumerate() {
        let end = markers.get(i + 1).map(|m| m.1).unwrap_or(body.len());
        options[marker.0.index()] = body[marker.2..end].trim().to_string();
    }

    Ok(Question::new(id, text, options, correct))
}

/// Pick a question by 1-based position.
pub fn pick_line(questions: &[Question], line: usize) -> Result<&Question, DatasetError> {
    if line == 0 || line > questions.len() {
        return Err(DatasetError::LineOutOfRange {
            line,
            available: questions.len(),
        });
    }
    Ok(&questions[line - 1])
}

/// Pick a random question.
pub fn pick_random(questions: &[Question]) -> Option<&Question> {
    if questions.is_empty() {
        return None;
    }
    let index = rand::thread_rng().gen_range(0..questions.len());
    Some(&questions[index])
}

/// Write the `id,answer` results file for a batch run.
pub fn write_results(path: &Path, reports: &[SolveReport]) -> Result<(), DatasetError> {
    let mut out = String::from("id,correctAnswer\n");
    for report in reports {
        out.push_str(&format!("{},{}\n", report.id, report.answer));
    }
    std::fs::write(path, out).map_err(|source| DatasetError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Append one question as a TSV line, e.g. to collect the ones we could not
/// answer for later analysis.
pub fn append_question(path: &Path, question: &Question) -> Result<(), DatasetError> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| DatasetError::Write {
            path: path.to_path_buf(),
            source,
        })?;

    let correct = question
        .correct
        .map(|c| c.to_string())
        .unwrap_or_default();
    let mut line = format!("{}\t{}\t{}", question.id, question.text, correct);
    for option in &question.options {
        line.push('\t');
        line.push_str(option);
    }
    line.push('\n');
    file.write_all(line.as_bytes())
        .map_err(|source| DatasetError::Write {
            path: path.to_path_buf(),
            source,
        })
}
