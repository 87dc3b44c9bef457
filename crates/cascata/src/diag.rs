/*
 * diag.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Diagnostics for the tolerant-degrade compile pipeline.
//!
//! The compiler never aborts: unresolvable references, unmatched transform
//! clauses, and empty key lookups all degrade to empty output. Each degrade
//! point records a coded diagnostic here so callers *can* observe what was
//! dropped. Codes are stable:
//!
//! | code | meaning |
//! |---|---|
//! | `C-KEY-1` | `$`-prefixed key had no dictionary entry; node dropped |
//! | `C-INTERP-1` | `{token}` had no key-dictionary entry |
//! | `C-INTERP-2` | `{token.variant}` had no variant and no `def` fallback |
//! | `C-XFORM-1` | transform clause pattern resolved to no set; clause skipped |
//! | `C-XFORM-2` | no transform clause matched; expression yielded nothing |
//! | `C-DECL-1` | declaration value interpolated to empty; declaration dropped |
//!
//! In strict mode the same events are recorded as errors instead of
//! warnings. Output text is still produced either way.

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    Warning,
    Error,
}

/// A single degrade event observed during compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// Stable code, see the module table.
    pub code: &'static str,
    pub message: String,
}

/// Collector for degrade events during one compile call.
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
    strict: bool,
}

impl DiagnosticCollector {
    /// Create a new empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a collector that records degrade events as errors.
    pub fn strict() -> Self {
        Self {
            diagnostics: Vec::new(),
            strict: true,
        }
    }

    /// Record a degrade event: a warning normally, an error in strict mode.
    pub fn dropped(&mut self, code: &'static str, message: impl Into<String>) {
        let kind = if self.strict {
            DiagnosticKind::Error
        } else {
            DiagnosticKind::Warning
        };
        let message = message.into();
        tracing::debug!(code, %message, "fragment dropped");
        self.diagnostics.push(Diagnostic {
            kind,
            code,
            message,
        });
    }

    /// Check if any errors were collected (warnings don't count).
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.kind == DiagnosticKind::Error)
    }

    /// Check if the collector is empty.
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Get a reference to the collected diagnostics.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Consume the collector and return the diagnostics.
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}
