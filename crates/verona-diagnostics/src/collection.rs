//! Diagnostics collection for accumulating compiler messages.

use verona_core::Location;

use crate::message::{DiagnosticMessage, Fix, RelatedInfo};
use crate::printer::DiagnosticsPrinter;

/// An accumulated set of diagnostics produced by a pass, a lookup, or a
/// subtype query. Passed by value through `PassResult`; never printed
/// directly by library code, only by `verona-cli` at the end of a run.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    messages: Vec<DiagnosticMessage>,
}

/// Builder for one diagnostic message, borrowed from the collection it will
/// be pushed into on `.emit()`.
#[must_use = "diagnostic not recorded until .emit() is called"]
pub struct DiagnosticBuilder<'a> {
    diagnostics: &'a mut Diagnostics,
    message: DiagnosticMessage,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
        }
    }

    pub fn error(&mut self, message: impl Into<String>, location: Location) -> DiagnosticBuilder<'_> {
        DiagnosticBuilder {
            diagnostics: self,
            message: DiagnosticMessage::error(location, message),
        }
    }

    pub fn warning(&mut self, message: impl Into<String>, location: Location) -> DiagnosticBuilder<'_> {
        DiagnosticBuilder {
            diagnostics: self,
            message: DiagnosticMessage::warning(location, message),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DiagnosticMessage> {
        self.messages.iter()
    }

    pub fn has_errors(&self) -> bool {
        self.messages.iter().any(|d| d.is_error())
    }

    pub fn has_warnings(&self) -> bool {
        self.messages.iter().any(|d| d.is_warning())
    }

    pub fn error_count(&self) -> usize {
        self.messages.iter().filter(|d| d.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.messages.iter().filter(|d| d.is_warning()).count()
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.messages.extend(other.messages);
    }

    pub fn printer(&self) -> DiagnosticsPrinter<'_> {
        DiagnosticsPrinter::new(self)
    }
}

impl<'a> DiagnosticBuilder<'a> {
    pub fn related_to(mut self, message: impl Into<String>, location: Location) -> Self {
        self.message.related.push(RelatedInfo::new(location, message));
        self
    }

    pub fn fix(mut self, description: impl Into<String>, replacement: impl Into<String>) -> Self {
        self.message.fix = Some(Fix::new(replacement, description));
        self
    }

    pub fn emit(self) {
        self.diagnostics.messages.push(self.message);
    }
}

impl IntoIterator for Diagnostics {
    type Item = DiagnosticMessage;
    type IntoIter = std::vec::IntoIter<DiagnosticMessage>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a DiagnosticMessage;
    type IntoIter = std::slice::Iter<'a, DiagnosticMessage>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}

impl FromIterator<DiagnosticMessage> for Diagnostics {
    fn from_iter<T: IntoIterator<Item = DiagnosticMessage>>(iter: T) -> Self {
        Self {
            messages: iter.into_iter().collect(),
        }
    }
}
