use std::fmt;

use sql_core::Position;

/// Which pipeline stage raised a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum Stage {
    Lex,
    Syn,
    Sem,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Lex => "LEX",
            Stage::Syn => "SYN",
            Stage::Sem => "SEM",
        })
    }
}

/// Diagnostic severity. Most faults are [`Severity::Error`]; `Warning` is
/// for the rare non-fatal one, like literal division by zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Error => "Error",
            Severity::Warning => "Warning",
        })
    }
}

/// A single diagnostic raised by the scanner, parser or analyzer.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Diagnostic {
    pub stage: Stage,
    pub severity: Severity,
    pub message: String,
    pub position: Position,
    /// Byte offsets into the source, for snippet rendering; zero-width
    /// (`n..n`) when a diagnostic has no natural extent (e.g. EOF).
    #[serde(skip)]
    pub span: std::ops::Range<u32>,
    /// Set by the parser on a token mismatch: what the grammar expected.
    pub expected: Option<String>,
    /// Set alongside `expected`: what was actually found.
    pub found: Option<String>,
    /// A "did you mean X?" keyword suggestion, populated lazily (only once
    /// a position is already known to be an error) so a clean parse never
    /// pays for the edit-distance search.
    pub suggestion: Option<String>,
}

impl fmt::Display for Diagnostic {
    /// The canonical one-line form: `"<Stage> Error at line L, column C:
    /// <message>"`. This is the format every test scenario and the data
    /// model require verbatim; a trailing `, <suggestion>` is appended
    /// when the scanner/parser attached a keyword-similarity suggestion.
    /// `printer::render` is for richer, source-annotated output.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} at {}: {}",
            self.stage, self.severity, self.position, self.message
        )?;
        if let Some(suggestion) = &self.suggestion {
            write!(f, ", {suggestion}")?;
        }
        Ok(())
    }
}
