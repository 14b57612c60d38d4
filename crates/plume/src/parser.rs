// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Template parser.
//!
//! The pest grammar recognises tags one at a time; [`TreeBuilder`] nests
//! them into blocks with an explicit stack, so a mismatched `{{/name}}` is
//! reported at the tag that caused it.

use crate::ast::{Argument, Invocation, Node, Span, Template, EXTENDS_HELPER, PARTIAL_HELPER};
use crate::error::{PlumeError, Result, SourceContext};
use pest::iterators::Pair;
use pest::Parser;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

mod grammar {
    /// Tag-level grammar for theme templates.
    #[derive(pest_derive::Parser)]
    #[grammar = "grammar.pest"]
    pub struct ThemeParser;
}

use grammar::{Rule, ThemeParser};

/// Parses template source into a [`Template`] called `name`.
pub fn parse_template(source: &str, name: &str) -> Result<Template> {
    let mut pairs = ThemeParser::parse(Rule::template, source).map_err(|e| {
        let (line, column) = match e.line_col {
            pest::error::LineColLocation::Pos(pos) => pos,
            pest::error::LineColLocation::Span(start, _) => start,
        };
        parse_error(source, name, e.variant.message().into_owned(), line, column)
    })?;

    let mut builder = TreeBuilder::new(source, name);
    if let Some(root) = pairs.next() {
        for pair in root.into_inner() {
            builder.push(pair)?;
        }
    }

    let mut template = Template::new(name, builder.finish()?);
    template.source_hash = source_hash(source);
    tracing::debug!(template = name, nodes = template.body.len(), "parsed template");
    Ok(template)
}

/// Hash of template source, used to detect edits.
pub fn source_hash(source: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    source.hash(&mut hasher);
    hasher.finish()
}

fn parse_error(source: &str, name: &str, message: String, line: usize, column: usize) -> PlumeError {
    PlumeError::ParseError {
        message,
        line,
        column,
        file: Some(name.to_string()),
        source_context: Some(SourceContext::from_source(source, line, column)),
    }
}

struct Frame {
    invocation: Invocation,
    body: Vec<Node>,
    inverse: Option<Vec<Node>>,
}

struct TreeBuilder<'s> {
    source: &'s str,
    name: &'s str,
    root: Vec<Node>,
    stack: Vec<Frame>,
}

impl<'s> TreeBuilder<'s> {
    fn new(source: &'s str, name: &'s str) -> Self {
        Self {
            source,
            name,
            root: Vec::new(),
            stack: Vec::new(),
        }
    }

    fn nodes(&mut self) -> &mut Vec<Node> {
        match self.stack.last_mut() {
            Some(Frame {
                inverse: Some(inverse),
                ..
            }) => inverse,
            Some(frame) => &mut frame.body,
            None => &mut self.root,
        }
    }

    fn error(&self, span: &Span, message: impl Into<String>) -> PlumeError {
        parse_error(self.source, self.name, message.into(), span.line, span.column)
    }

    fn push(&mut self, pair: Pair<'_, Rule>) -> Result<()> {
        let span = span_of(&pair);
        match pair.as_rule() {
            Rule::text => {
                let content = pair.as_str().to_string();
                self.nodes().push(Node::text(content));
            }
            Rule::expr_tag | Rule::raw_tag => {
                let escaped = pair.as_rule() == Rule::expr_tag;
                let invocation = self.inner_invocation(pair)?;
                self.nodes().push(Node::Expression {
                    invocation,
                    escaped,
                });
            }
            Rule::partial_tag => {
                let mut inner = pair.into_inner();
                let mut invocation = Invocation::new(PARTIAL_HELPER).at(span.clone());
                if let Some(name) = inner.next() {
                    let name = name
                        .into_inner()
                        .next()
                        .map(|p| self.argument(p))
                        .transpose()?
                        .map(|argument| Argument::String(argument.literal_text()));
                    if let Some(name) = name {
                        invocation = invocation.param(name);
                    }
                }
                for argument in inner {
                    invocation = self.add_argument(invocation, argument)?;
                }
                self.nodes().push(Node::expression(invocation));
            }
            Rule::extends_tag => {
                let mut invocation = Invocation::new(EXTENDS_HELPER).at(span.clone());
                for argument in pair.into_inner() {
                    invocation = self.add_argument(invocation, argument)?;
                }
                self.nodes().push(Node::expression(invocation));
            }
            Rule::block_open => {
                let invocation = self.inner_invocation(pair)?;
                self.stack.push(Frame {
                    invocation,
                    body: Vec::new(),
                    inverse: None,
                });
            }
            Rule::inverse_tag => {
                let frame = self
                    .stack
                    .last()
                    .ok_or_else(|| self.error(&span, "{{else}} outside of a block"))?;
                if frame.inverse.is_some() {
                    let message = format!("second {{{{else}}}} in block '{}'", frame.invocation.name);
                    return Err(self.error(&span, message));
                }
                if let Some(frame) = self.stack.last_mut() {
                    frame.inverse = Some(Vec::new());
                }
            }
            Rule::block_close => {
                let closing = pair
                    .into_inner()
                    .next()
                    .map(|p| p.as_str().to_string())
                    .unwrap_or_default();
                let frame = match self.stack.pop() {
                    Some(frame) => frame,
                    None => {
                        return Err(self.error(&span, format!("unexpected {{{{/{}}}}}", closing)));
                    }
                };
                if frame.invocation.name != closing {
                    return Err(self.error(
                        &span,
                        format!(
                            "expected {{{{/{}}}}} but found {{{{/{}}}}}",
                            frame.invocation.name, closing
                        ),
                    ));
                }
                let block = Node::block(frame.invocation, frame.body, frame.inverse);
                self.nodes().push(block);
            }
            // comments and EOI
            _ => {}
        }
        Ok(())
    }

    fn finish(mut self) -> Result<Vec<Node>> {
        if let Some(frame) = self.stack.pop() {
            let span = frame.invocation.span.clone();
            return Err(self.error(&span, format!("unclosed block '{}'", frame.invocation.name)));
        }
        Ok(self.root)
    }

    /// Builds the invocation nested inside an expression or block tag.
    fn inner_invocation(&self, pair: Pair<'_, Rule>) -> Result<Invocation> {
        let span = span_of(&pair);
        let invocation = pair
            .into_inner()
            .find(|p| p.as_rule() == Rule::invocation)
            .ok_or_else(|| self.error(&span, "missing helper name"))?;

        let mut inner = invocation.into_inner();
        let name = inner
            .next()
            .map(|p| p.as_str().to_string())
            .ok_or_else(|| self.error(&span, "missing helper name"))?;

        let mut result = Invocation::new(name).at(span);
        for argument in inner {
            result = self.add_argument(result, argument)?;
        }
        Ok(result)
    }

    fn add_argument(&self, invocation: Invocation, pair: Pair<'_, Rule>) -> Result<Invocation> {
        if pair.as_rule() != Rule::hash_pair {
            return Ok(invocation.param(self.argument(pair)?));
        }
        let span = span_of(&pair);
        let mut inner = pair.into_inner();
        match (inner.next(), inner.next()) {
            (Some(key), Some(value)) => Ok(invocation.hash_arg(key.as_str(), self.argument(value)?)),
            _ => Err(self.error(&span, "malformed hash argument")),
        }
    }

    fn argument(&self, pair: Pair<'_, Rule>) -> Result<Argument> {
        let span = span_of(&pair);
        match pair.as_rule() {
            Rule::string => Ok(Argument::String(
                pair.into_inner()
                    .next()
                    .map(|inner| inner.as_str().to_string())
                    .unwrap_or_default(),
            )),
            Rule::number => pair
                .as_str()
                .parse()
                .map(Argument::Number)
                .map_err(|_| self.error(&span, format!("number out of range: {}", pair.as_str()))),
            Rule::boolean => Ok(Argument::Boolean(pair.as_str() == "true")),
            _ => Ok(Argument::Path(pair.as_str().to_string())),
        }
    }
}

fn span_of(pair: &Pair<'_, Rule>) -> Span {
    let span = pair.as_span();
    let (line, column) = span.start_pos().line_col();
    Span::new(span.start(), span.end(), line, column)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Vec<Node> {
        parse_template(source, "test").unwrap().body
    }

    #[test]
    fn test_text_and_expressions() {
        let nodes = parse("<h1>{{title}}</h1>{{{content}}}");
        assert_eq!(nodes.len(), 4);
        assert_eq!(nodes[0], Node::text("<h1>"));
        assert_eq!(nodes[1].invocation().unwrap().name, "title");
        assert!(matches!(nodes[3], Node::Expression { escaped: false, .. }));
    }

    #[test]
    fn test_arguments_and_hash() {
        let nodes = parse(r#"{{plural ../pagination.total empty='No posts' singular="% post" limit=3 flag=true}}"#);
        let invocation = nodes[0].invocation().unwrap();
        assert_eq!(invocation.name, "plural");
        assert_eq!(invocation.params, vec![Argument::path("../pagination.total")]);
        assert_eq!(invocation.hash_value("empty"), Some(&Argument::string("No posts")));
        assert_eq!(invocation.hash_value("singular"), Some(&Argument::string("% post")));
        assert_eq!(invocation.hash_value("limit"), Some(&Argument::Number(3)));
        assert_eq!(invocation.hash_value("flag"), Some(&Argument::Boolean(true)));
    }

    #[test]
    fn test_nested_blocks_with_inverse() {
        let nodes = parse("{{#foreach posts}}{{#if featured}}*{{/if}}{{title}}{{else}}none{{/foreach}}");
        assert_eq!(nodes.len(), 1);
        match &nodes[0] {
            Node::Block {
                invocation,
                body,
                inverse,
            } => {
                assert_eq!(invocation.name, "foreach");
                assert_eq!(body.len(), 2);
                assert!(matches!(body[0], Node::Block { .. }));
                assert_eq!(inverse.as_deref(), Some(&[Node::text("none")][..]));
            }
            other => panic!("expected block, got {:?}", other),
        }
    }

    #[test]
    fn test_partials_extends_and_comments() {
        let nodes = parse("{{!< default}}{{! note }}{{!-- {{ignored}} --}}{{> \"loop\"}}{{> sidebar}}");
        assert_eq!(nodes.len(), 3);
        let extends = nodes[0].invocation().unwrap();
        assert_eq!(extends.name, EXTENDS_HELPER);
        assert_eq!(extends.params, vec![Argument::path("default")]);
        assert_eq!(nodes[1].invocation().unwrap().params, vec![Argument::string("loop")]);
        assert_eq!(nodes[2].invocation().unwrap().params, vec![Argument::string("sidebar")]);
    }

    #[test]
    fn test_caret_is_an_else() {
        let nodes = parse("{{#if a}}x{{^}}y{{/if}}");
        assert!(matches!(&nodes[0], Node::Block { inverse: Some(_), .. }));
    }

    #[test]
    fn test_mismatched_close_reports_position() {
        let err = parse_template("line one\n{{#if a}}x{{/unless}}", "post").unwrap_err();
        match err {
            PlumeError::ParseError { line, message, file, .. } => {
                assert_eq!(line, 2);
                assert!(message.contains("{{/if}}"), "{}", message);
                assert_eq!(file.as_deref(), Some("post"));
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_unclosed_and_stray_tags() {
        assert!(parse_template("{{#if a}}x", "t").is_err());
        assert!(parse_template("x{{/if}}", "t").is_err());
        assert!(parse_template("{{else}}", "t").is_err());
        assert!(parse_template("{{#if a}}{{else}}{{else}}{{/if}}", "t").is_err());
        assert!(parse_template("{{ }}", "t").is_err());
    }

    #[test]
    fn test_source_hash_tracks_content() {
        let a = parse_template("{{title}}", "t").unwrap();
        let b = parse_template("{{title}}", "t").unwrap();
        let c = parse_template("{{title}}!", "t").unwrap();
        assert_eq!(a.source_hash, b.source_hash);
        assert_ne!(a.source_hash, c.source_hash);
    }
}
