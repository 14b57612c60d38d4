// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! A loaded theme: every compiled template, frozen for rendering.

use crate::ast::Template;
use crate::error::{PlumeError, Result};
use std::collections::HashMap;
use std::sync::Arc;

/// Directory holding a theme's partials.
pub const PARTIALS_DIR: &str = "partials";

/// Compiled templates and partials of one theme.
///
/// A theme is built once, then shared read-only by concurrent renders, so
/// rendering never touches the filesystem.
#[derive(Debug, Clone, Default)]
pub struct Theme {
    templates: HashMap<String, Arc<Template>>,
}

impl Theme {
    /// Creates an empty theme.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a template under its own name, replacing any earlier one.
    pub fn insert(&mut self, template: Arc<Template>) {
        self.templates.insert(template.name.clone(), template);
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with_template(mut self, template: Template) -> Self {
        self.insert(Arc::new(template));
        self
    }

    /// Looks a page or layout template up by exact name.
    pub fn template(&self, name: &str) -> Option<&Template> {
        self.templates.get(name).map(Arc::as_ref)
    }

    /// Looks a partial up: `partials/<name>` first, then `<name>`.
    pub fn partial(&self, name: &str) -> Option<&Template> {
        self.template(&format!("{}/{}", PARTIALS_DIR, name))
            .or_else(|| self.template(name))
    }

    /// Follows the extends directives of `template` up to a root layout.
    ///
    /// The result starts with `template` itself and ends with the outermost
    /// layout. A chain of `max_depth` templates that still extends another is
    /// a [`PlumeError::RecursionLimitExceeded`]; an unknown layout or a cycle
    /// is a [`PlumeError::TemplateStructureError`].
    pub fn layout_chain<'t>(&'t self, template: &'t Template, max_depth: usize) -> Result<Vec<&'t Template>> {
        let mut chain = vec![template];
        let mut current = template;

        while let Some(parent) = current.layout()? {
            if chain.len() >= max_depth {
                return Err(PlumeError::RecursionLimitExceeded {
                    template: parent,
                    limit: max_depth,
                });
            }
            let layout = self.template(&parent).ok_or_else(|| {
                PlumeError::structure(&current.name, format!("extends unknown layout '{}'", parent))
            })?;
            if chain.iter().any(|seen| seen.name == layout.name) {
                let names: Vec<&str> = chain.iter().map(|seen| seen.name.as_str()).collect();
                return Err(PlumeError::structure(
                    &current.name,
                    format!("layout cycle: {} -> {}", names.join(" -> "), layout.name),
                ));
            }
            chain.push(layout);
            current = layout;
        }
        Ok(chain)
    }

    /// Template names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.templates.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of templates.
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Whether the theme has no templates.
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Node;

    #[test]
    fn test_partial_lookup_prefers_partials_dir() {
        let theme = Theme::new()
            .with_template(Template::new("loop", vec![Node::text("root")]))
            .with_template(Template::new("partials/loop", vec![Node::text("partial")]))
            .with_template(Template::new("footer", vec![Node::text("footer")]));

        assert_eq!(theme.partial("loop").unwrap().name, "partials/loop");
        assert_eq!(theme.partial("footer").unwrap().name, "footer");
        assert!(theme.partial("missing").is_none());
        assert_eq!(theme.names(), vec!["footer", "loop", "partials/loop"]);
    }

    fn parsed(templates: &[(&str, &str)]) -> Theme {
        templates.iter().fold(Theme::new(), |theme, (name, source)| {
            theme.with_template(crate::parser::parse_template(source, name).unwrap())
        })
    }

    fn chain_names(theme: &Theme, name: &str, max_depth: usize) -> Result<Vec<String>> {
        let template = theme.template(name).unwrap();
        let chain = theme.layout_chain(template, max_depth)?;
        Ok(chain.iter().map(|t| t.name.clone()).collect())
    }

    #[test]
    fn test_layout_chain_runs_child_to_root() {
        let theme = parsed(&[("default", "{{{body}}}"), ("post", "{{!< default}}x"), ("index", "y")]);
        assert_eq!(chain_names(&theme, "post", 32).unwrap(), vec!["post", "default"]);
        assert_eq!(chain_names(&theme, "index", 32).unwrap(), vec!["index"]);
    }

    #[test]
    fn test_layout_chain_errors() {
        let theme = parsed(&[
            ("a", "{{!< b}}"),
            ("b", "{{!< a}}"),
            ("c", "{{!< nowhere}}"),
            ("d", "{{!< e}}"),
            ("e", "{{!< f}}"),
            ("f", "f"),
        ]);
        assert!(matches!(
            chain_names(&theme, "a", 32),
            Err(PlumeError::TemplateStructureError { .. })
        ));
        assert!(matches!(
            chain_names(&theme, "c", 32),
            Err(PlumeError::TemplateStructureError { .. })
        ));
        assert!(matches!(
            chain_names(&theme, "d", 2),
            Err(PlumeError::RecursionLimitExceeded { template, limit: 2 }) if template == "f"
        ));
        assert_eq!(chain_names(&theme, "d", 3).unwrap(), vec!["d", "e", "f"]);
    }
}
