// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Template execution.
//!
//! [`RenderState`] evaluates a node tree against one request. It owns the
//! scope stack, the layout slots collected from child templates, and the
//! diagnostics list; everything else (registry, theme, request data) is
//! borrowed read-only, so concurrent renders share nothing mutable.
//!
//! # Error Propagation
//!
//! Every invocation is evaluated in isolation. A recoverable error becomes a
//! [`Diagnostic`] and empty output for that node only; fatal errors
//! ([`PlumeError::is_fatal`]) unwind to the caller of [`RenderState::render_page`].
//!
//! # Layout Inheritance
//!
//! [`RenderState::render_page`] runs a two-pass loop: render the child,
//! keeping its output as the page body and its `contentFor` sections as
//! named slots, then render the parent layout with those available to
//! `{{{body}}}` and `{{#block}}`. Chains repeat until a template without a
//! parent is reached.

use crate::ast::{Argument, Node, Template};
use crate::context::{Iteration, Scope};
use crate::engine::EngineConfig;
use crate::error::{Diagnostic, PlumeError, Result};
use crate::escape::escape_html;
use crate::model::{Author, NavItem, Post, RequestData, Tag};
use crate::path;
use crate::registry::{CallMode, HelperCall, HelperRegistry};
use crate::theme::Theme;
use crate::value::Value;
use std::collections::HashMap;

/// The result of rendering one page.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOutput {
    /// The rendered page.
    pub html: String,
    /// Non-fatal problems met along the way, in document order.
    pub diagnostics: Vec<Diagnostic>,
}

impl RenderOutput {
    /// The rendered page as bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.html.into_bytes()
    }
}

/// Per-render execution state.
pub struct RenderState<'a> {
    data: &'a RequestData,
    registry: &'a HelperRegistry,
    theme: &'a Theme,
    config: &'a EngineConfig,
    scopes: Vec<Scope<'a>>,
    diagnostics: Vec<Diagnostic>,
    template: &'a str,
    raw: bool,
    partial_depth: usize,
    block_depth: usize,
    body: Option<String>,
    slots: HashMap<String, String>,
    collected: HashMap<String, String>,
}

impl<'a> RenderState<'a> {
    /// Creates a state with a single root scope whose subject is absent.
    pub fn new(
        data: &'a RequestData,
        registry: &'a HelperRegistry,
        theme: &'a Theme,
        config: &'a EngineConfig,
    ) -> Self {
        Self {
            data,
            registry,
            theme,
            config,
            scopes: vec![Scope::new(Value::Absent)],
            diagnostics: Vec::new(),
            template: "",
            raw: false,
            partial_depth: 0,
            block_depth: 0,
            body: None,
            slots: HashMap::new(),
            collected: HashMap::new(),
        }
    }

    /// Replaces the root scope.
    pub fn with_root_scope(mut self, scope: Scope<'a>) -> Self {
        self.scopes = vec![scope];
        self
    }

    /// Renders `template`, following its layout chain, into a finished page.
    pub fn render_page(&mut self, template: &'a Template) -> Result<String> {
        let theme = self.theme;
        let chain = theme.layout_chain(template, self.config.max_depth)?;
        let mut accumulated: HashMap<String, String> = HashMap::new();
        let mut output = String::new();

        for (depth, current) in chain.into_iter().enumerate() {
            tracing::debug!(template = %current.name, depth = depth + 1, "rendering template");
            if depth > 0 {
                self.body = Some(std::mem::take(&mut output));
            }
            self.template = &current.name;
            self.slots = accumulated.clone();
            self.collected.clear();

            output = self.render_nodes(&current.body)?;

            // Within one template the last declaration wins; across the chain
            // the most derived template wins.
            for (name, content) in std::mem::take(&mut self.collected) {
                accumulated.entry(name).or_insert(content);
            }
        }
        Ok(output)
    }

    /// Renders a node sequence in the current scope.
    pub fn render_nodes(&mut self, nodes: &'a [Node]) -> Result<String> {
        let mut out = String::new();
        for node in nodes {
            self.render_node(node, &mut out)?;
        }
        Ok(out)
    }

    fn render_node(&mut self, node: &'a Node, out: &mut String) -> Result<()> {
        match node {
            Node::Text { content } => out.push_str(content),
            Node::Expression {
                invocation,
                escaped,
            } => {
                let call = HelperCall::inline(invocation);
                match self.invoke(&call) {
                    Ok(value) => self.write_value(out, &value, *escaped),
                    Err(error) => self.recover(error, call.line)?,
                }
            }
            Node::Block {
                invocation,
                body,
                inverse,
            } => {
                let call = HelperCall::block(invocation, body, inverse.as_deref());
                self.block_depth += 1;
                let result = self.invoke(&call);
                self.block_depth -= 1;
                match result {
                    Ok(value) => self.write_value(out, &value, true),
                    Err(error) => self.recover(error, call.line)?,
                }
            }
        }
        Ok(())
    }

    fn write_value(&self, out: &mut String, value: &Value<'a>, escaped: bool) {
        let text = value.to_text();
        if !escaped || self.raw || value.is_safe() {
            out.push_str(&text);
        } else {
            out.push_str(&escape_html(&text));
        }
    }

    /// Turns a recoverable error into a diagnostic; returns fatal ones.
    fn recover(&mut self, error: PlumeError, line: usize) -> Result<()> {
        match Diagnostic::from_error(&error, self.template, line) {
            Some(diagnostic) => {
                tracing::warn!(
                    template = %diagnostic.template,
                    line = diagnostic.line,
                    "{}",
                    diagnostic.message
                );
                self.diagnostics.push(diagnostic);
                Ok(())
            }
            None => Err(error),
        }
    }

    /// Dispatches an invocation to its helper, or resolves it as a bare path.
    pub fn invoke(&mut self, call: &HelperCall<'a>) -> Result<Value<'a>> {
        if let Some(helper) = self.registry.lookup(call.name) {
            return helper(call, self);
        }

        let bare = call.mode != CallMode::Block && call.params.is_empty() && call.hash.is_empty();
        if !bare {
            return Err(PlumeError::UnknownHelper(call.name.to_string()));
        }

        let value = self.resolve(call.name);
        if value.is_absent() && call.mode == CallMode::Inline {
            return Err(PlumeError::UnresolvedPath(call.name.to_string()));
        }
        Ok(value)
    }

    /// Evaluates an argument: literals as is, registered names through their
    /// helper, anything else through the path resolver.
    pub fn evaluate(&mut self, argument: &'a Argument, line: usize) -> Result<Value<'a>> {
        match argument {
            Argument::String(s) => Ok(Value::str(s)),
            Argument::Number(n) => Ok(Value::Int(*n)),
            Argument::Boolean(b) => Ok(Value::Bool(*b)),
            Argument::Path(path) => match self.registry.lookup(path) {
                Some(helper) => helper(&HelperCall::value(path, line), self),
                None => Ok(self.resolve(path)),
            },
        }
    }

    /// Positional argument `index`, evaluated; absent when not supplied.
    pub fn param(&mut self, call: &HelperCall<'a>, index: usize) -> Result<Value<'a>> {
        match call.params.get(index) {
            Some(argument) => self.evaluate(argument, call.line),
            None => Ok(Value::Absent),
        }
    }

    /// Hash argument `key`, evaluated.
    pub fn hash(&mut self, call: &HelperCall<'a>, key: &str) -> Result<Option<Value<'a>>> {
        match call.hash_arg(key) {
            Some(argument) => self.evaluate(argument, call.line).map(Some),
            None => Ok(None),
        }
    }

    /// Hash argument `key` as text.
    pub fn hash_string(&mut self, call: &HelperCall<'a>, key: &str) -> Result<Option<String>> {
        Ok(self.hash(call, key)?.map(|value| value.to_text().into_owned()))
    }

    /// Hash argument `key` as a flag: `true`, `"true"`, or any truthy value other than `"false"`.
    pub fn hash_flag(&mut self, call: &HelperCall<'a>, key: &str) -> Result<bool> {
        Ok(match self.hash(call, key)? {
            Some(value) => value.is_truthy() && value.to_text() != "false",
            None => false,
        })
    }

    /// Hash argument `key` as a non-negative integer.
    pub fn hash_usize(&mut self, call: &HelperCall<'a>, key: &str) -> Result<Option<usize>> {
        match self.hash(call, key)? {
            None => Ok(None),
            Some(value) => match value.as_int() {
                Some(n) if n >= 0 => Ok(Some(n as usize)),
                _ => Err(PlumeError::helper(
                    call.name,
                    format!("{}= expects a non-negative number", key),
                )),
            },
        }
    }

    /// All hash arguments, evaluated, in source order.
    pub fn resolved_hash(&mut self, call: &HelperCall<'a>) -> Result<Vec<(&'a str, Value<'a>)>> {
        let mut resolved = Vec::with_capacity(call.hash.len());
        for (key, argument) in call.hash {
            resolved.push((key.as_str(), self.evaluate(argument, call.line)?));
        }
        Ok(resolved)
    }

    /// Resolves a path against the current scope stack.
    pub fn resolve(&self, expression: &str) -> Value<'a> {
        path::resolve(expression, &self.scopes, self.data)
    }

    /// Runs `f` with `scope` pushed; the scope is popped whatever `f` returns.
    pub fn with_scope<F>(&mut self, scope: Scope<'a>, f: F) -> Result<String>
    where
        F: FnOnce(&mut Self) -> Result<String>,
    {
        self.scopes.push(scope);
        let result = f(self);
        self.scopes.pop();
        result
    }

    /// Renders the primary body when `condition` holds, the inverse otherwise.
    pub fn render_branch(&mut self, call: &HelperCall<'a>, condition: bool) -> Result<Value<'a>> {
        if condition {
            Ok(Value::safe(self.render_nodes(call.body)?))
        } else {
            self.render_inverse(call)
        }
    }

    /// Renders the inverse body, or nothing when there is none.
    pub fn render_inverse(&mut self, call: &HelperCall<'a>) -> Result<Value<'a>> {
        match call.inverse {
            Some(inverse) => Ok(Value::safe(self.render_nodes(inverse)?)),
            None => Ok(Value::safe(String::new())),
        }
    }

    /// Renders the body with `subject` as the new `this`, or the inverse when
    /// the subject is absent.
    pub fn render_with_subject(&mut self, call: &HelperCall<'a>, subject: Value<'a>) -> Result<Value<'a>> {
        if subject.is_absent() {
            return self.render_inverse(call);
        }
        let hash = self.resolved_hash(call)?;
        let body = call.body;
        let output = self.with_scope(Scope::new(subject).with_hash(hash), |state| {
            state.render_nodes(body)
        })?;
        Ok(Value::safe(output))
    }

    /// Renders the body once per item with iteration pseudo-properties set.
    ///
    /// An empty sequence renders the inverse body in the current scope.
    /// `limit=N` caps the number of items.
    pub fn iterate(&mut self, call: &HelperCall<'a>, mut items: Vec<Value<'a>>) -> Result<Value<'a>> {
        if let Some(limit) = self.hash_usize(call, "limit")? {
            items.truncate(limit);
        }
        if items.is_empty() {
            return self.render_inverse(call);
        }

        let hash = self.resolved_hash(call)?;
        let length = items.len();
        let body = call.body;
        let mut out = String::new();
        for (index, item) in items.into_iter().enumerate() {
            let scope = Scope::new(item)
                .with_hash(hash.clone())
                .with_iteration(Iteration::new(index, length));
            out.push_str(&self.with_scope(scope, |state| state.render_nodes(body))?);
        }
        Ok(Value::safe(out))
    }

    /// Renders nodes with HTML escaping switched off; the previous setting
    /// is restored afterwards.
    pub fn render_unescaped(&mut self, nodes: &'a [Node]) -> Result<String> {
        let saved = self.raw;
        self.raw = true;
        let result = self.render_nodes(nodes);
        self.raw = saved;
        result
    }

    /// Renders a theme partial in the current scope.
    pub fn render_partial(&mut self, name: &str) -> Result<String> {
        let partial = self
            .theme
            .partial(name)
            .ok_or_else(|| PlumeError::MissingPartial(name.to_string()))?;

        if self.partial_depth >= self.config.max_depth {
            return Err(PlumeError::RecursionLimitExceeded {
                template: partial.name.clone(),
                limit: self.config.max_depth,
            });
        }

        tracing::debug!(partial = %partial.name, depth = self.partial_depth + 1, "including partial");
        let saved_template = self.template;
        let saved_block_depth = self.block_depth;
        self.template = &partial.name;
        self.partial_depth += 1;
        self.block_depth = 0;
        let result = self.render_nodes(&partial.body);
        self.partial_depth -= 1;
        self.block_depth = saved_block_depth;
        self.template = saved_template;
        result
    }

    /// Whether the theme has a partial called `name`.
    pub fn has_partial(&self, name: &str) -> bool {
        self.theme.partial(name).is_some()
    }

    /// The request being rendered.
    pub fn data(&self) -> &'a RequestData {
        self.data
    }

    /// Engine settings for this render.
    pub fn config(&self) -> &'a EngineConfig {
        self.config
    }

    /// Name of the template or partial currently rendering.
    pub fn template_name(&self) -> &'a str {
        self.template
    }

    /// Number of enclosing blocks within the current template or partial.
    pub fn block_depth(&self) -> usize {
        self.block_depth
    }

    /// Number of partials currently being included.
    pub fn partial_depth(&self) -> usize {
        self.partial_depth
    }

    /// Iteration state of the innermost scope pushed by an iteration helper.
    pub fn iteration(&self) -> Option<Iteration> {
        self.scopes.iter().rev().find_map(|scope| scope.iteration)
    }

    /// The rendered child content available to `{{{body}}}`.
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    /// Content a child template supplied for the named slot.
    pub fn slot(&self, name: &str) -> Option<&str> {
        self.slots.get(name).map(String::as_str)
    }

    /// Records `contentFor` output for the named slot.
    pub fn collect_slot(&mut self, name: String, content: String) {
        self.collected.insert(name, content);
    }

    /// Consumes the state, returning its diagnostics.
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    /// The post in focus: the innermost post subject, else the page's post.
    pub fn current_post(&self) -> Option<&'a Post> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| match scope.subject {
                Value::Post(post) => Some(post),
                _ => None,
            })
            .or(self.data.post.as_ref())
    }

    /// The tag in focus: the innermost tag subject, else the archive's tag.
    pub fn current_tag(&self) -> Option<&'a Tag> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| match scope.subject {
                Value::Tag(tag) => Some(tag),
                _ => None,
            })
            .or(self.data.tag.as_ref())
    }

    /// The author in focus.
    ///
    /// The innermost author subject or the author of the innermost post
    /// subject, then the page post's author, then the archive's author.
    pub fn current_author(&self) -> Option<&'a Author> {
        let scoped = self.scopes.iter().rev().find_map(|scope| match scope.subject {
            Value::Author(author) => Some(author),
            Value::Post(post) => post.author.as_ref(),
            _ => None,
        });
        scoped
            .or_else(|| self.data.post.as_ref().and_then(|post| post.author.as_ref()))
            .or(self.data.author.as_ref())
    }

    /// The navigation item being iterated, if any.
    pub fn current_nav_item(&self) -> Option<&'a NavItem> {
        self.scopes.iter().rev().find_map(|scope| match scope.subject {
            Value::NavItem(item) => Some(item),
            _ => None,
        })
    }

    /// The innermost scope subject.
    pub fn subject(&self) -> Value<'a> {
        self.scopes
            .last()
            .map(|scope| scope.subject.clone())
            .unwrap_or(Value::Absent)
    }
}
