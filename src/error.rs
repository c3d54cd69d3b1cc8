//! Rich diagnostic error types for the quizgraph solver.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes, help text, and source chains so users know exactly what
//! went wrong and how to fix it.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type QuizResult<T> = std::result::Result<T, QuizError>;

/// Top-level error type for the quizgraph solver.
///
/// Each variant wraps a subsystem-specific error, preserving the full diagnostic
/// chain (error codes, help text, source spans) through to the user.
#[derive(Debug, Error, Diagnostic)]
pub enum QuizError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Oracle(#[from] OracleError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Dataset(#[from] DatasetError),
}

// ---------------------------------------------------------------------------
// Oracle errors
// ---------------------------------------------------------------------------

/// Errors raised by knowledge-graph oracles.
///
/// An oracle failure is fatal to the run: the solver never retries a query
/// and never guesses around a broken graph connection.
#[derive(Debug, Error, Diagnostic)]
pub enum OracleError {
    #[error("failed to read graph file {}", path.display())]
    #[diagnostic(
        code(quizgraph::oracle::io),
        help(
            "Check that the graph file exists, is readable, and that the \
             path passed with --graph is correct."
        )
    )]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed graph file {}", path.display())]
    #[diagnostic(
        code(quizgraph::oracle::json),
        help(
            "The graph file must be a JSON object with `concepts` and `edges` \
             arrays. See MemoryOracle::from_file for the expected shape."
        )
    )]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("graph service request failed: {url}")]
    #[diagnostic(
        code(quizgraph::oracle::http),
        help(
            "The remote graph service did not answer the query. Check that the \
             server is running, the --server URL is correct, and the network \
             is reachable. Oracle failures abort the run by design of the \
             solving contract."
        )
    )]
    Http {
        url: String,
        #[source]
        source: Box<ureq::Error>,
    },

    #[error("unexpected response from graph service: {url}: {message}")]
    #[diagnostic(
        code(quizgraph::oracle::decode),
        help(
            "The service answered, but not with the JSON shape this client \
             expects. Check that the --server endpoint really is a quizgraph \
             concept service and that its version matches."
        )
    )]
    Decode { url: String, message: String },
}

// ---------------------------------------------------------------------------
// Dataset errors
// ---------------------------------------------------------------------------

/// Errors raised while reading or writing question files.
#[derive(Debug, Error, Diagnostic)]
pub enum DatasetError {
    #[error("failed to read question file {}", path.display())]
    #[diagnostic(
        code(quizgraph::dataset::io),
        help("Check that the question file exists and is readable.")
    )]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}", path.display())]
    #[diagnostic(
        code(quizgraph::dataset::write),
        help("Check that the output directory exists and the disk is not full.")
    )]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed question on line {line}: {reason}")]
    #[diagnostic(
        code(quizgraph::dataset::malformed_line),
        help(
            "TSV lines are `id<TAB>text[<TAB>answer]<TAB>A<TAB>B<TAB>C<TAB>D`. \
             CSV lines follow the AI2 export with options inline as \
             \"(A) .. (B) ..\". The header row is skipped automatically."
        )
    )]
    MalformedLine { line: usize, reason: String },

    #[error("question file {} contains no questions", path.display())]
    #[diagnostic(
        code(quizgraph::dataset::empty),
        help("The file needs a header row plus at least one question line.")
    )]
    Empty { path: PathBuf },

    #[error("no question on line {line} (file has {available} questions)")]
    #[diagnostic(
        code(quizgraph::dataset::line_out_of_range),
        help("Line numbers are 1-based and count question lines, not the header.")
    )]
    LineOutOfRange { line: usize, available: usize },
}
