// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

use crate::error::{PlumeError, Result};
use crate::resolver::{normalize_name, ResolvedTemplate, TemplateResolver};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// Resolver that keeps theme templates in memory.
///
/// Clones share the same storage, so templates added after an engine was
/// created are visible to it.
#[derive(Debug, Clone, Default)]
pub struct MemoryResolver {
    templates: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryResolver {
    /// Create an empty resolver.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, String>>> {
        self.templates
            .lock()
            .map_err(|_| PlumeError::ResolutionError("Failed to acquire template store lock".to_string()))
    }

    /// Add or replace a template. `name` may carry the `.hbs` extension.
    pub fn add_template(&self, name: &str, source: impl Into<String>) {
        if let Ok(mut templates) = self.lock() {
            templates.insert(normalize_name(name), source.into());
        }
    }

    /// Builder form of [`add_template`](Self::add_template).
    pub fn with_template(self, name: &str, source: impl Into<String>) -> Self {
        self.add_template(name, source);
        self
    }

    /// Remove a template.
    pub fn remove_template(&self, name: &str) {
        if let Ok(mut templates) = self.lock() {
            templates.remove(&normalize_name(name));
        }
    }

    /// Clear all templates
    pub fn clear(&self) {
        if let Ok(mut templates) = self.lock() {
            templates.clear();
        }
    }
}

impl TemplateResolver for MemoryResolver {
    fn resolve(&self, name: &str) -> Result<ResolvedTemplate> {
        let name = normalize_name(name);
        let templates = self.lock()?;
        match templates.get(&name) {
            Some(source) => Ok(ResolvedTemplate {
                path: format!("memory:{}", name),
                source: source.clone(),
            }),
            None => Err(PlumeError::TemplateNotFound(name)),
        }
    }

    fn list(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = self.lock()?.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    fn clone_box(&self) -> Box<dyn TemplateResolver> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_resolver_direct() {
        let resolver = MemoryResolver::new().with_template("post.hbs", "{{title}}");
        let resolved = resolver.resolve("post").unwrap();
        assert_eq!(resolved.source, "{{title}}");
        assert_eq!(resolved.path, "memory:post");
    }

    #[test]
    fn test_memory_resolver_add_remove_clear() {
        let resolver = MemoryResolver::new();
        resolver.add_template("default", "{{{body}}}");
        resolver.add_template("partials/loop", "loop");
        assert_eq!(resolver.list().unwrap(), vec!["default", "partials/loop"]);

        resolver.remove_template("default");
        assert!(matches!(
            resolver.resolve("default"),
            Err(PlumeError::TemplateNotFound(_))
        ));

        let shared = resolver.clone();
        resolver.clear();
        assert!(shared.list().unwrap().is_empty());
    }
}
