//! Side channel for recoverable problems that must not end up inside the
//! analysis result, such as a sentiment model that failed and was replaced
//! by the neutral fallback profile.

use log::warn;

use crate::error::SentimentModelFailure;
use crate::language::Language;

/// A recovered problem observed while analyzing one document.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    SentimentFallback {
        language: Language,
        failure: SentimentModelFailure,
    },
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Diagnostic::SentimentFallback { language, failure } => write!(
                f,
                "sentiment analysis ({language}) failed, using neutral fallback: {failure}"
            ),
        }
    }
}

/// Receiver of diagnostics.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

/// Forwards every diagnostic to the `log` facade at warn level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        warn!("{diagnostic}");
    }
}

/// Collects diagnostics for later inspection.
impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}
