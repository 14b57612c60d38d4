// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Node tree types for parsed theme templates.
//!
//! The parser produces a [`Template`] whose body is a sequence of [`Node`]s.
//! The executor in [`crate::render`] walks that tree; it never sees template
//! source text.
//!
//! # Node Types
//!
//! - [`Node::Text`]: literal template text, copied to the output verbatim
//! - [`Node::Expression`]: `{{name args}}` or `{{{name args}}}`
//! - [`Node::Block`]: `{{#name args}}...{{else}}...{{/name}}`
//!
//! Partial inclusion (`{{> name}}`) and layout inheritance (`{{!< name}}`)
//! are ordinary expressions invoking the `>` and `!<` helpers.

use crate::error::{PlumeError, Result};
use serde::{Deserialize, Serialize};

/// Name of the helper that performs partial inclusion.
pub const PARTIAL_HELPER: &str = ">";
/// Name of the helper that declares the parent layout.
pub const EXTENDS_HELPER: &str = "!<";

/// A node of a parsed template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    /// Literal text between tags, preserving whitespace.
    Text {
        /// The text content.
        content: String,
    },
    /// A helper invocation or bare expression whose value is written to the output.
    Expression {
        /// The invoked name and its arguments.
        invocation: Invocation,
        /// False for the triple-stash form `{{{...}}}`, which skips HTML escaping.
        escaped: bool,
    },
    /// A block invocation with a primary body and an optional inverse body.
    Block {
        /// The invoked name and its arguments.
        invocation: Invocation,
        /// Nodes rendered when the helper decides the block applies.
        body: Vec<Node>,
        /// Nodes after `{{else}}`, rendered on the falsy / empty path.
        inverse: Option<Vec<Node>>,
    },
}

impl Node {
    /// Creates a text node.
    pub fn text(content: impl Into<String>) -> Self {
        Node::Text {
            content: content.into(),
        }
    }

    /// Creates an escaped expression node.
    pub fn expression(invocation: Invocation) -> Self {
        Node::Expression {
            invocation,
            escaped: true,
        }
    }

    /// Creates a raw (unescaped) expression node.
    pub fn raw(invocation: Invocation) -> Self {
        Node::Expression {
            invocation,
            escaped: false,
        }
    }

    /// Creates a block node.
    pub fn block(invocation: Invocation, body: Vec<Node>, inverse: Option<Vec<Node>>) -> Self {
        Node::Block {
            invocation,
            body,
            inverse,
        }
    }

    /// Returns the invocation carried by this node, if any.
    pub fn invocation(&self) -> Option<&Invocation> {
        match self {
            Node::Text { .. } => None,
            Node::Expression { invocation, .. } | Node::Block { invocation, .. } => Some(invocation),
        }
    }
}

/// A named invocation with its unresolved arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invocation {
    /// Helper name or bare expression path, exactly as written.
    pub name: String,
    /// Positional arguments in source order.
    pub params: Vec<Argument>,
    /// Hash arguments (`key=value`) in source order, keys unique.
    pub hash: Vec<(String, Argument)>,
    /// Source location of the opening tag.
    pub span: Span,
}

impl Invocation {
    /// Creates an invocation without arguments.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            hash: Vec::new(),
            span: Span::default(),
        }
    }

    /// Appends a positional argument.
    pub fn param(mut self, argument: Argument) -> Self {
        self.params.push(argument);
        self
    }

    /// Sets a hash argument. A repeated key replaces the earlier value.
    pub fn hash_arg(mut self, key: impl Into<String>, argument: Argument) -> Self {
        let key = key.into();
        self.hash.retain(|(k, _)| *k != key);
        self.hash.push((key, argument));
        self
    }

    /// Sets the source location.
    pub fn at(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Looks up a hash argument by key.
    pub fn hash_value(&self, key: &str) -> Option<&Argument> {
        self.hash.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }
}

/// An unresolved argument expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Argument {
    /// A path such as `title`, `author.name`, `../pagination.total` or `@index`.
    Path(String),
    /// A quoted string literal.
    String(String),
    /// An integer literal.
    Number(i64),
    /// `true` or `false`.
    Boolean(bool),
}

impl Argument {
    /// Shorthand for a path argument.
    pub fn path(path: impl Into<String>) -> Self {
        Argument::Path(path.into())
    }

    /// Shorthand for a string argument.
    pub fn string(value: impl Into<String>) -> Self {
        Argument::String(value.into())
    }

    /// Returns the argument as written, without resolving it.
    ///
    /// Used by helpers that take a name rather than a value (`>`, `!<`, `block`).
    pub fn literal_text(&self) -> String {
        match self {
            Argument::Path(p) | Argument::String(p) => p.clone(),
            Argument::Number(n) => n.to_string(),
            Argument::Boolean(b) => b.to_string(),
        }
    }
}

/// Source location information for error reporting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    /// Byte offset from the start of the source.
    pub start: usize,
    /// Byte offset of the end (exclusive).
    pub end: usize,
    /// 1-indexed line number.
    pub line: usize,
    /// 1-indexed column number.
    pub column: usize,
}

impl Span {
    /// Creates a new source span.
    pub fn new(start: usize, end: usize, line: usize, column: usize) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }
}

/// A compiled theme template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    /// Template name relative to the theme root, without extension (e.g. `post`, `partials/loop`).
    pub name: String,
    /// Top-level nodes.
    pub body: Vec<Node>,
    /// Hash of the source text, used for cache invalidation.
    pub source_hash: u64,
}

impl Template {
    /// Creates a template from an already built node tree.
    pub fn new(name: impl Into<String>, body: Vec<Node>) -> Self {
        Self {
            name: name.into(),
            body,
            source_hash: 0,
        }
    }

    /// Returns the parent layout named by a top-level `{{!< layout}}`, if any.
    ///
    /// # Errors
    ///
    /// Returns a structure error when more than one top-level extends
    /// directive is present.
    pub fn layout(&self) -> Result<Option<String>> {
        let mut layouts = self.body.iter().filter_map(|node| match node {
            Node::Expression { invocation, .. } if invocation.name == EXTENDS_HELPER => {
                Some(invocation)
            }
            _ => None,
        });

        let first = match layouts.next() {
            Some(invocation) => invocation,
            None => return Ok(None),
        };
        if layouts.next().is_some() {
            return Err(PlumeError::structure(
                &self.name,
                "a template may extend only one layout",
            ));
        }
        match first.params.first() {
            Some(arg) => Ok(Some(arg.literal_text())),
            None => Err(PlumeError::structure(
                &self.name,
                "extends directive is missing a layout name",
            )),
        }
    }
}
