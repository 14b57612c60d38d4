// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! The helper registry.
//!
//! A [`HelperRegistry`] maps literal names to helper functions. Names are
//! matched exactly and case-sensitively: dotted and relative names such as
//! `author.name` or `../pagination.total` are separate entries, not paths.
//!
//! The registry is filled once at startup and then shared read-only, usually
//! behind an [`Arc`](std::sync::Arc), by every concurrent render.

use crate::ast::{Argument, Invocation, Node};
use crate::error::Result;
use crate::render::RenderState;
use crate::value::Value;
use std::collections::HashMap;
use std::fmt;

/// How a helper is being invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallMode {
    /// `{{#name}}...{{/name}}`
    Block,
    /// `{{name}}`, output written to the page.
    Inline,
    /// As an argument of another helper, e.g. `posts` in `{{#if posts}}`.
    Value,
}

/// Everything a helper receives about its invocation.
#[derive(Debug, Clone, Copy)]
pub struct HelperCall<'a> {
    /// The name the helper was invoked under.
    pub name: &'a str,
    /// Unresolved positional arguments.
    pub params: &'a [Argument],
    /// Unresolved hash arguments.
    pub hash: &'a [(String, Argument)],
    /// Primary body, empty for non-block invocations.
    pub body: &'a [Node],
    /// Inverse (`{{else}}`) body, if one was written.
    pub inverse: Option<&'a [Node]>,
    /// Invocation mode.
    pub mode: CallMode,
    /// Source line, for diagnostics.
    pub line: usize,
}

impl<'a> HelperCall<'a> {
    /// A `{{name ...}}` invocation.
    pub fn inline(invocation: &'a Invocation) -> Self {
        Self {
            name: &invocation.name,
            params: &invocation.params,
            hash: &invocation.hash,
            body: &[],
            inverse: None,
            mode: CallMode::Inline,
            line: invocation.span.line,
        }
    }

    /// A `{{#name ...}}` invocation.
    pub fn block(invocation: &'a Invocation, body: &'a [Node], inverse: Option<&'a [Node]>) -> Self {
        Self {
            body,
            inverse,
            mode: CallMode::Block,
            ..Self::inline(invocation)
        }
    }

    /// An argument-position invocation: a bare name, no arguments, no bodies.
    pub fn value(name: &'a str, line: usize) -> Self {
        Self {
            name,
            params: &[],
            hash: &[],
            body: &[],
            inverse: None,
            mode: CallMode::Value,
            line,
        }
    }

    /// Whether the helper was called as `{{#name}}`.
    pub fn is_block(&self) -> bool {
        self.mode == CallMode::Block
    }

    /// Raw hash argument by key.
    pub fn hash_arg(&self, key: &str) -> Option<&'a Argument> {
        self.hash.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }
}

/// Signature shared by all helpers.
///
/// A helper reads its arguments through the [`RenderState`], may render its
/// bodies, and returns the value written in place of the invocation (or
/// handed to the enclosing helper in [`CallMode::Value`]).
pub type HelperFn = for<'a> fn(&HelperCall<'a>, &mut RenderState<'a>) -> Result<Value<'a>>;

/// Name to helper table.
#[derive(Clone, Default)]
pub struct HelperRegistry {
    helpers: HashMap<&'static str, HelperFn>,
}

impl HelperRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the complete builtin helper set.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        crate::helpers::register_builtins(&mut registry);
        registry
    }

    /// Adds a helper. Registering a name twice replaces the earlier entry.
    pub fn register(&mut self, name: &'static str, helper: HelperFn) -> &mut Self {
        if self.helpers.insert(name, helper).is_some() {
            tracing::debug!(helper = name, "helper re-registered");
        }
        self
    }

    /// Finds the helper registered under exactly `name`.
    pub fn lookup(&self, name: &str) -> Option<HelperFn> {
        self.helpers.get(name).copied()
    }

    /// Whether `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.helpers.contains_key(name)
    }

    /// Number of registered names.
    pub fn len(&self) -> usize {
        self.helpers.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.helpers.is_empty()
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.helpers.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for HelperRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HelperRegistry")
            .field("helpers", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every name a theme can invoke, exactly as themes spell them.
    const BUILTIN_NAMES: &[&str] = &[
        "null", "if", "unless", "foreach", "!<", "body", "asset", "encode", ">",
        "meta_title", "meta_description", "ghost_head", "ghost_foot", "body_class",
        "plural", "date", "image", "contentFor", "block", "@blog.title", "@blog.url",
        "@blog.logo", "@blog.cover", "@blog.description", "@blog.navigation",
        "@blog.PoweredByText", "@blog.PoweredByLink", "post", "excerpt", "title",
        "content", "post_class", "featured", "id", "hits", "post.id", "tag.name",
        "tag.slug", "author", "bio", "email", "website", "cover", "location",
        "author.name", "author.bio", "author.email", "author.website", "author.image",
        "author.cover", "author.location", "navigation", "label", "current", "slug",
        "@first", "@last", "@even", "@odd", "name", "url", "pagination", "prev", "next",
        "page", "pages", "page_url", "pageUrl", "posts", "recommends", "all_tags",
        "tag_name", "tag_url", "tags", "pagination.prev", "pagination.next", "prev_post",
        "prev_post.title", "prev_post.url", "next_post", "next_post.title",
        "next_post.url", "pagination.total", "../pagination.total",
    ];

    #[test]
    fn test_builtin_surface_is_complete_and_exact() {
        let registry = HelperRegistry::builtin();
        for name in BUILTIN_NAMES {
            assert!(registry.contains(name), "missing helper {}", name);
        }
        assert_eq!(registry.len(), BUILTIN_NAMES.len());
    }

    #[test]
    fn test_lookup_is_case_sensitive_and_literal() {
        let registry = HelperRegistry::builtin();
        assert!(registry.lookup("If").is_none());
        assert!(registry.lookup("pageurl").is_none());
        assert!(registry.lookup("../../pagination.total").is_none());
        assert!(registry.lookup("author.name").is_some());
    }

    #[test]
    fn test_register_and_lookup() {
        fn nothing<'a>(_: &HelperCall<'a>, _: &mut RenderState<'a>) -> Result<Value<'a>> {
            Ok(Value::Absent)
        }

        let mut registry = HelperRegistry::new();
        assert!(registry.is_empty());
        registry.register("nothing", nothing);
        assert!(registry.contains("nothing"));
        assert_eq!(registry.names(), vec!["nothing"]);
    }
}
