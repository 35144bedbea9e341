//! Builder-pattern printer for rendering diagnostics with source context.

use std::fmt::Write;

use annotate_snippets::{AnnotationKind, Group, Level, Renderer, Snippet};

use super::{Diagnostic, Severity};

/// Builder for rendering a diagnostic list, with or without source
/// context and color.
pub struct DiagnosticsPrinter<'d, 's> {
    diagnostics: &'d [Diagnostic],
    source: Option<&'s str>,
    path: Option<&'s str>,
    colored: bool,
}

impl<'d, 's> DiagnosticsPrinter<'d, 's> {
    pub fn new(diagnostics: &'d [Diagnostic]) -> Self {
        Self {
            diagnostics,
            source: None,
            path: None,
            colored: false,
        }
    }

    pub fn source(mut self, source: &'s str) -> Self {
        self.source = Some(source);
        self
    }

    pub fn path(mut self, path: &'s str) -> Self {
        self.path = Some(path);
        self
    }

    pub fn colored(mut self, value: bool) -> Self {
        self.colored = value;
        self
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        self.format(&mut out).expect("String write never fails");
        out
    }

    pub fn format(&self, w: &mut impl Write) -> std::fmt::Result {
        let Some(source) = self.source else {
            return self.format_plain(w);
        };

        if self.diagnostics.is_empty() {
            return Ok(());
        }

        let renderer = if self.colored {
            Renderer::styled()
        } else {
            Renderer::plain()
        };

        for (i, diag) in self.diagnostics.iter().enumerate() {
            let range = adjust_span(&diag.span, source.len());

            let mut snippet = Snippet::source(source).line_start(1).annotation(
                AnnotationKind::Primary.span(range).label(&diag.message),
            );
            if let Some(p) = self.path {
                snippet = snippet.path(p);
            }

            let level = severity_to_level(diag.severity);
            let title = format!("{}: {}", diag.stage, diag.message);
            let report: Vec<Group> = vec![level.primary_title(title).element(snippet)];

            if i > 0 {
                w.write_char('\n')?;
            }
            write!(w, "{}", renderer.render(&report))?;
        }

        Ok(())
    }

    fn format_plain(&self, w: &mut impl Write) -> std::fmt::Result {
        for (i, diag) in self.diagnostics.iter().enumerate() {
            if i > 0 {
                w.write_char('\n')?;
            }
            write!(w, "{diag}")?;
        }
        Ok(())
    }
}

fn severity_to_level(severity: Severity) -> Level<'static> {
    match severity {
        Severity::Error => Level::ERROR,
        Severity::Warning => Level::WARNING,
    }
}

fn adjust_span(span: &std::ops::Range<u32>, limit: usize) -> std::ops::Range<usize> {
    let start = (span.start as usize).min(limit);
    let end = (span.end as usize).min(limit);
    if start == end {
        return start..(start + 1).min(limit).max(start);
    }
    start..end
}

/// Renders `diagnostics` against `source` with default (uncolored)
/// options; a convenience wrapper around [`DiagnosticsPrinter`] for
/// callers that don't need the builder.
pub fn render(source: &str, path: &str, diagnostics: &[Diagnostic]) -> String {
    DiagnosticsPrinter::new(diagnostics)
        .source(source)
        .path(path)
        .render()
}

#[cfg(test)]
mod tests {
    use crate::compile;

    #[test]
    fn snippet_render_points_at_the_offending_token() {
        let unit = compile("SELECT * FROM ghosts;");
        let rendered = super::render("SELECT * FROM ghosts;", "query.sql", &unit.diagnostics.into_vec());
        insta::assert_snapshot!(rendered, @r"
        error: SEM: unknown table 'ghosts'
         --> query.sql:1:15
          |
        1 | SELECT * FROM ghosts;
          |               ^^^^^^ unknown table 'ghosts'
        ");
    }

    #[test]
    fn plain_format_falls_back_to_one_line_per_diagnostic() {
        let unit = compile("SLECT 1; SELECT * FROM missing;");
        let rendered = super::DiagnosticsPrinter::new(&unit.diagnostics.into_vec()).render();
        insta::assert_snapshot!(rendered, @r"
        SYN Error at line 1, column 1: unknown statement 'SLECT', did you mean 'SELECT'?
        SEM Error at line 1, column 24: unknown table 'missing'
        ");
    }

    #[test]
    fn rendering_no_diagnostics_produces_no_output() {
        let unit = compile("SELECT 1;");
        let diags = unit.diagnostics.into_vec();
        assert!(super::render("SELECT 1;", "query.sql", &diags).is_empty());
    }
}
