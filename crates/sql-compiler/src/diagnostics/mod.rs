//! Diagnostics shared by all three pipeline stages.
//!
//! Every diagnostic carries the stage that raised it, a severity, a
//! 1-based source position and a message. [`Diagnostic`]'s `Display` impl
//! produces the canonical one-line form (`"SEM Error at line 4, column
//! 12: ..."`); [`printer::render`] produces a richer, source-annotated
//! rendering for terminals via `annotate-snippets`.

mod message;
mod printer;

pub use message::{Diagnostic, Severity, Stage};
pub use printer::{render, DiagnosticsPrinter};

use sql_core::Position;

/// An ordered, append-only collection of diagnostics raised by one stage.
///
/// Order is insertion order, which for a single-pass scanner or a
/// depth-first parser/analyzer coincides with position order.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.items.push(diagnostic);
    }

    /// Starts building an error-severity diagnostic at `position`, with no
    /// extent. Call [`DiagnosticBuilder::span`] to give it one, and
    /// [`DiagnosticBuilder::emit`] to push it.
    pub fn error(
        &mut self,
        stage: Stage,
        message: impl Into<String>,
        position: Position,
    ) -> DiagnosticBuilder<'_> {
        DiagnosticBuilder {
            sink: self,
            diagnostic: Diagnostic {
                stage,
                severity: Severity::Error,
                message: message.into(),
                position,
                span: 0..0,
                expected: None,
                found: None,
                suggestion: None,
            },
        }
    }

    /// Starts building a warning-severity diagnostic — the one severity
    /// below `Error`, for non-fatal faults like a literal division by
    /// zero (§4.3 rule 3).
    pub fn warning(
        &mut self,
        stage: Stage,
        message: impl Into<String>,
        position: Position,
    ) -> DiagnosticBuilder<'_> {
        DiagnosticBuilder {
            sink: self,
            diagnostic: Diagnostic {
                stage,
                severity: Severity::Warning,
                message: message.into(),
                position,
                span: 0..0,
                expected: None,
                found: None,
                suggestion: None,
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }

    /// Appends every diagnostic from `other`, preserving `other`'s order.
    pub fn extend(&mut self, other: Diagnostics) {
        self.items.extend(other.items);
    }

    pub fn printer(&self) -> DiagnosticsPrinter<'_, '_> {
        DiagnosticsPrinter::new(&self.items)
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

/// Builder returned by [`Diagnostics::error`] so call sites can attach
/// `expected`/`found`/`suggestion` before pushing, without a five-argument
/// constructor.
#[must_use = "call `.emit()` or the diagnostic is discarded"]
pub struct DiagnosticBuilder<'a> {
    sink: &'a mut Diagnostics,
    diagnostic: Diagnostic,
}

impl<'a> DiagnosticBuilder<'a> {
    pub fn span(mut self, span: std::ops::Range<u32>) -> Self {
        self.diagnostic.span = span;
        self
    }

    pub fn expected_found(mut self, expected: impl Into<String>, found: impl Into<String>) -> Self {
        self.diagnostic.expected = Some(expected.into());
        self.diagnostic.found = Some(found.into());
        self
    }

    pub fn suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.diagnostic.suggestion = Some(suggestion.into());
        self
    }

    pub fn emit(self) {
        self.sink.push(self.diagnostic);
    }
}
