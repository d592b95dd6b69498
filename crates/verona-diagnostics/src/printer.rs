//! Builder-pattern printer for rendering diagnostics with source context.

use std::fmt::Write;

use annotate_snippets::{AnnotationKind, Group, Level, Patch, Renderer, Snippet};

use crate::collection::Diagnostics;
use crate::message::Severity;

/// Renders a [`Diagnostics`] collection as human-readable text, one message
/// at a time, each against the source text its own location slices into.
pub struct DiagnosticsPrinter<'d> {
    diagnostics: &'d Diagnostics,
    colored: bool,
}

impl<'d> DiagnosticsPrinter<'d> {
    pub fn new(diagnostics: &'d Diagnostics) -> Self {
        Self {
            diagnostics,
            colored: false,
        }
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
        if self.diagnostics.is_empty() {
            return Ok(());
        }

        let renderer = if self.colored {
            Renderer::styled()
        } else {
            Renderer::plain()
        };

        for (i, diag) in self.diagnostics.iter().enumerate() {
            let source = diag.location().file_contents();
            let range = diag.location().byte_range();

            let snippet = Snippet::source(source)
                .line_start(1)
                .path(diag.location().file())
                .annotation(AnnotationKind::Primary.span(range.clone()).label(diag.message()));

            let snippet = diag.related.iter().fold(snippet, |snippet, related| {
                snippet.annotation(
                    AnnotationKind::Context
                        .span(related.location.byte_range())
                        .label(&related.message),
                )
            });

            let level = severity_to_level(diag.severity());
            let title_group = level.primary_title(diag.message()).element(snippet);

            let mut report: Vec<Group> = vec![title_group];

            if let Some(fix) = &diag.fix {
                report.push(
                    Level::HELP.secondary_title(&fix.description).element(
                        Snippet::source(source)
                            .line_start(1)
                            .patch(Patch::new(range, &fix.replacement)),
                    ),
                );
            }

            if i > 0 {
                w.write_char('\n')?;
            }
            write!(w, "{}", renderer.render(&report))?;
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
