// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Error types for the plume theme engine.
//!
//! This module defines [`PlumeError`], the main error enum, the
//! [`Diagnostic`] record produced for non-fatal render problems, and
//! [`SourceContext`] for rich parse error messages.
//!
//! # Error Categories
//!
//! - **Parse errors**: Invalid template syntax or unbalanced blocks
//! - **Per-invocation errors**: Unknown helpers, unresolved paths, missing
//!   partials, helper argument problems. These never abort a render; the
//!   executor turns them into a [`Diagnostic`] and empty output.
//! - **Structural errors**: Recursion limits and broken layout inheritance.
//!   These abort the render of the whole page.
//! - **Loading errors**: Template not found, IO and cache failures

use std::fmt;
use thiserror::Error;

/// Source context for enhanced error messages.
///
/// Captures a snippet of source code around an error location,
/// enabling rich error messages with line numbers and visual indicators.
#[derive(Debug, Clone)]
pub struct SourceContext {
    /// All lines from the source file.
    pub lines: Vec<String>,
    /// The line number where the error occurred (1-indexed).
    pub error_line: usize,
    /// The column number where the error occurred (1-indexed).
    pub error_column: usize,
    /// First line number of the snippet (1-indexed).
    pub snippet_start: usize,
    /// Last line number of the snippet (1-indexed).
    pub snippet_end: usize,
}

impl SourceContext {
    /// Creates a source context from source code and error location.
    ///
    /// Captures 3 lines before and after the error line for context.
    pub fn from_source(source: &str, line: usize, column: usize) -> Self {
        let lines: Vec<String> = source.lines().map(|l| l.to_string()).collect();
        let snippet_start = line.saturating_sub(3).max(1);
        let snippet_end = (line + 3).min(lines.len());

        Self {
            lines,
            error_line: line,
            error_column: column,
            snippet_start,
            snippet_end,
        }
    }

    /// Formats the source snippet with line numbers and error indicator.
    ///
    /// Returns a string like:
    /// ```text
    ///    4 | <div class="post">
    ///    5 |   {{#if post}
    ///      |   ^
    ///    6 | </div>
    /// ```
    pub fn format_snippet(&self) -> String {
        let mut result = String::new();

        for line_num in self.snippet_start..=self.snippet_end {
            if line_num > self.lines.len() {
                break;
            }

            let line = &self.lines[line_num - 1];
            result.push_str(&format!("{:4} | {}\n", line_num, line));

            if line_num == self.error_line {
                result.push_str(&format!(
                    "     | {}^\n",
                    " ".repeat(self.error_column.saturating_sub(1))
                ));
            }
        }

        result
    }
}

impl fmt::Display for SourceContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_snippet())
    }
}

/// Helper struct for displaying optional source context.
pub struct OptSourceContextDisplay<'a>(pub &'a Option<SourceContext>);

impl fmt::Display for OptSourceContextDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(ctx) => write!(f, "{}", ctx),
            None => Ok(()),
        }
    }
}

/// Helper trait for formatting optional source context.
pub trait AsDisplay<'a> {
    /// Wraps self for Display formatting.
    fn as_display(&'a self) -> OptSourceContextDisplay<'a>;
}

impl<'a> AsDisplay<'a> for Option<SourceContext> {
    fn as_display(&'a self) -> OptSourceContextDisplay<'a> {
        OptSourceContextDisplay(self)
    }
}

/// The main error type for plume operations.
#[derive(Error, Debug)]
pub enum PlumeError {
    /// Template parsing failed due to invalid syntax or block nesting.
    #[error("Parse error in {file:?}: {message} at line {line}, column {column}\n{}", source_context.as_display())]
    ParseError {
        /// Description of the parse error.
        message: String,
        /// Line number where the error occurred.
        line: usize,
        /// Column number where the error occurred.
        column: usize,
        /// The template name, if known.
        file: Option<String>,
        /// Source context for rich error display.
        source_context: Option<SourceContext>,
    },

    /// A `{{name ...}}` invocation named a helper that is not registered.
    #[error("Unknown helper: {0}")]
    UnknownHelper(String),

    /// A bare expression resolved to nothing.
    #[error("Unresolved path: {0}")]
    UnresolvedPath(String),

    /// A `{{> name}}` inclusion named a partial the theme does not have.
    #[error("Missing partial: {0}")]
    MissingPartial(String),

    /// A helper rejected its arguments.
    #[error("Helper '{helper}' failed: {message}")]
    HelperError {
        /// The helper name.
        helper: String,
        /// What went wrong.
        message: String,
    },

    /// Partial inclusion or a layout chain nested deeper than the configured bound.
    #[error("Recursion limit of {limit} exceeded while rendering {template}")]
    RecursionLimitExceeded {
        /// The template or partial being entered when the bound was hit.
        template: String,
        /// The configured bound.
        limit: usize,
    },

    /// Layout inheritance is malformed (cycle, unknown layout, misplaced directive).
    #[error("Template structure error in {template}: {message}")]
    TemplateStructureError {
        /// The template where the problem was detected.
        template: String,
        /// Error message.
        message: String,
    },

    /// A template could not be found by the resolver.
    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    /// Template source could not be located or read.
    #[error("Resolution error: {0}")]
    ResolutionError(String),

    /// Cache operation failed.
    #[error("Cache error: {0}")]
    CacheError(String),

    /// File I/O error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl PlumeError {
    /// Returns true when the error must abort the whole render.
    ///
    /// Per-invocation problems are recovered by the executor; only recursion
    /// and structural failures (and anything raised while loading templates)
    /// reach the request boundary.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            PlumeError::UnknownHelper(_)
                | PlumeError::UnresolvedPath(_)
                | PlumeError::MissingPartial(_)
                | PlumeError::HelperError { .. }
        )
    }

    /// Shorthand for a [`PlumeError::HelperError`].
    pub fn helper(helper: impl Into<String>, message: impl Into<String>) -> Self {
        PlumeError::HelperError {
            helper: helper.into(),
            message: message.into(),
        }
    }

    /// Shorthand for a [`PlumeError::TemplateStructureError`].
    pub fn structure(template: impl Into<String>, message: impl Into<String>) -> Self {
        PlumeError::TemplateStructureError {
            template: template.into(),
            message: message.into(),
        }
    }
}

/// Convenience type alias for Results with [`PlumeError`].
pub type Result<T> = std::result::Result<T, PlumeError>;

/// Category of a non-fatal render problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// Invocation of a helper that is not registered.
    UnknownHelper,
    /// A bare expression resolved to nothing.
    UnresolvedPath,
    /// A partial inclusion named a partial the theme does not have.
    MissingPartial,
    /// A helper rejected its arguments.
    HelperFailed,
}

/// A non-fatal problem recorded while rendering a page.
///
/// Diagnostics are returned alongside the rendered output so the caller can
/// log them; the node that produced one rendered as empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    /// What kind of problem occurred.
    pub kind: DiagnosticKind,
    /// The template being rendered when the problem occurred.
    pub template: String,
    /// Human readable description.
    pub message: String,
    /// 1-indexed line of the invocation, when known.
    pub line: usize,
}

impl Diagnostic {
    /// Builds a diagnostic from a recoverable error.
    ///
    /// Returns `None` for fatal errors, which must be propagated instead.
    pub fn from_error(error: &PlumeError, template: &str, line: usize) -> Option<Self> {
        let kind = match error {
            PlumeError::UnknownHelper(_) => DiagnosticKind::UnknownHelper,
            PlumeError::UnresolvedPath(_) => DiagnosticKind::UnresolvedPath,
            PlumeError::MissingPartial(_) => DiagnosticKind::MissingPartial,
            PlumeError::HelperError { .. } => DiagnosticKind::HelperFailed,
            _ => return None,
        };
        Some(Self {
            kind,
            template: template.to_string(),
            message: error.to_string(),
            line,
        })
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.template, self.line, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        assert!(!PlumeError::UnknownHelper("x".into()).is_fatal());
        assert!(!PlumeError::UnresolvedPath("a.b".into()).is_fatal());
        assert!(!PlumeError::helper("date", "bad").is_fatal());
        assert!(PlumeError::structure("post", "cycle").is_fatal());
        assert!(PlumeError::RecursionLimitExceeded {
            template: "loop".into(),
            limit: 32
        }
        .is_fatal());
    }

    #[test]
    fn test_diagnostic_only_for_recoverable_errors() {
        let diag = Diagnostic::from_error(&PlumeError::UnknownHelper("nope".into()), "index", 3)
            .unwrap();
        assert_eq!(diag.kind, DiagnosticKind::UnknownHelper);
        assert_eq!(diag.to_string(), "index:3: Unknown helper: nope");

        let fatal = PlumeError::structure("post", "cycle");
        assert!(Diagnostic::from_error(&fatal, "post", 1).is_none());
    }

    #[test]
    fn test_source_context_snippet() {
        let source = "a\nb\n{{#if}\nd";
        let ctx = SourceContext::from_source(source, 3, 2);
        let snippet = ctx.format_snippet();
        assert!(snippet.contains("   3 | {{#if}"));
        assert!(snippet.contains("     |  ^"));
    }
}
