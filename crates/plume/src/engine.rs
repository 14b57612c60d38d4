// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! The theme engine.
//!
//! [`Engine`] ties the pieces together: it resolves template sources,
//! compiles and caches them, loads whole themes, and renders pages.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use plume::{Engine, FileSystemResolver, RequestData};
//!
//! let engine = Engine::with_memory_cache(FileSystemResolver::new("./themes/casper"), 100);
//! let theme = engine.load_theme()?;
//!
//! let data: RequestData = serde_json::from_str(&json)?;
//! let page = engine.render(&theme, "index", &data)?;
//! for diagnostic in &page.diagnostics {
//!     eprintln!("{}", diagnostic);
//! }
//! ```
//!
//! # Thread Safety
//!
//! The engine, its [`HelperRegistry`] and a loaded [`Theme`] are all
//! `Send + Sync`; each render owns its own [`RenderState`].

use crate::ast::Template;
use crate::cache::{Cache, MemoryCache};
use crate::context::Scope;
use crate::error::{PlumeError, Result};
use crate::model::RequestData;
use crate::parser::{parse_template, source_hash};
use crate::registry::HelperRegistry;
use crate::render::{RenderOutput, RenderState};
use crate::resolver::{normalize_name, TemplateResolver};
use crate::theme::Theme;
use std::sync::Arc;

/// Default bound on partial nesting and layout chain length.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Rendering settings.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Public URL prefix of theme assets.
    pub asset_base: String,
    /// Maximum partial nesting depth and layout chain length.
    pub max_depth: usize,
    /// Capacity of the compiled template cache.
    pub cache_capacity: usize,
    /// Generator name written by `ghost_head`.
    pub generator: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            asset_base: "/assets/".to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
            cache_capacity: 100,
            generator: format!("plume {}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl EngineConfig {
    /// Default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the URL prefix the `asset` helper writes.
    pub fn with_asset_base(mut self, asset_base: impl Into<String>) -> Self {
        self.asset_base = asset_base.into();
        self
    }

    /// Sets the partial nesting and layout chain bound.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sets the compiled template cache size.
    pub fn with_cache_capacity(mut self, cache_capacity: usize) -> Self {
        self.cache_capacity = cache_capacity;
        self
    }

    /// Sets the generator name written by `ghost_head`.
    pub fn with_generator(mut self, generator: impl Into<String>) -> Self {
        self.generator = generator.into();
        self
    }
}

/// Theme engine, generic over where templates come from.
///
/// ```rust,ignore
/// use plume::{Engine, MemoryResolver, MemoryCache};
///
/// let resolver = MemoryResolver::new().with_template("index", "<h1>{{@blog.title}}</h1>");
/// let engine = Engine::new(resolver, Box::new(MemoryCache::new(100)));
/// ```
#[derive(Debug)]
pub struct Engine<R: TemplateResolver> {
    resolver: R,
    cache: Box<dyn Cache>,
    registry: Arc<HelperRegistry>,
    config: EngineConfig,
}

impl<R: TemplateResolver> Engine<R> {
    /// Creates an engine with the builtin helpers and default settings.
    pub fn new(resolver: R, cache: Box<dyn Cache>) -> Self {
        Self {
            resolver,
            cache,
            registry: Arc::new(HelperRegistry::builtin()),
            config: EngineConfig::default(),
        }
    }

    /// Creates an engine with an LRU cache of `cache_size` templates.
    pub fn with_memory_cache(resolver: R, cache_size: usize) -> Self {
        Self::new(resolver, Box::new(MemoryCache::new(cache_size)))
    }

    /// Creates an engine from settings; the cache is sized by `config.cache_capacity`.
    pub fn from_config(resolver: R, config: EngineConfig) -> Self {
        Self::with_memory_cache(resolver, config.cache_capacity).with_config(config)
    }

    /// Replaces the settings; the cache keeps its size.
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the helper registry.
    pub fn with_registry(mut self, registry: Arc<HelperRegistry>) -> Self {
        self.registry = registry;
        self
    }

    /// The template source.
    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Current settings.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The helper registry shared by every render.
    pub fn registry(&self) -> &Arc<HelperRegistry> {
        &self.registry
    }

    /// Resolves and parses one template, reusing the cached tree when the
    /// source is unchanged.
    pub fn compile(&self, name: &str) -> Result<Arc<Template>> {
        let name = normalize_name(name);
        let resolved = self.resolver.resolve(&name)?;
        let hash = source_hash(&resolved.source);

        if let Some(template) = self.cache.get_fresh(&name, hash)? {
            tracing::debug!(template = %name, "template cache hit");
            return Ok(template);
        }

        tracing::debug!(template = %name, path = %resolved.path, "compiling template");
        let template = Arc::new(parse_template(&resolved.source, &name)?);
        self.cache.set(&name, Arc::clone(&template))?;
        Ok(template)
    }

    /// Compiles every template the resolver lists into a [`Theme`].
    pub fn load_theme(&self) -> Result<Theme> {
        let mut theme = Theme::new();
        for name in self.resolver.list()? {
            theme.insert(self.compile(&name)?);
        }
        tracing::debug!(templates = theme.len(), "theme loaded");
        Ok(theme)
    }

    /// Renders the theme template called `name`.
    pub fn render(&self, theme: &Theme, name: &str, data: &RequestData) -> Result<RenderOutput> {
        let name = normalize_name(name);
        let template = theme
            .template(&name)
            .ok_or_else(|| PlumeError::TemplateNotFound(name.clone()))?;
        self.render_template(theme, template, data)
    }

    /// Renders `name` with `scope` as the root scope instead of an empty one.
    ///
    /// Paths that the scope's subject or hash cannot answer still fall back
    /// to the request data.
    pub fn render_with_scope<'a>(
        &'a self,
        theme: &'a Theme,
        name: &str,
        data: &'a RequestData,
        scope: Scope<'a>,
    ) -> Result<RenderOutput> {
        let name = normalize_name(name);
        let template = theme
            .template(&name)
            .ok_or_else(|| PlumeError::TemplateNotFound(name.clone()))?;
        let state = RenderState::new(data, &self.registry, theme, &self.config).with_root_scope(scope);
        finish(state, template)
    }

    /// Renders an already compiled template against `theme`'s layouts and partials.
    pub fn render_template(&self, theme: &Theme, template: &Template, data: &RequestData) -> Result<RenderOutput> {
        finish(RenderState::new(data, &self.registry, theme, &self.config), template)
    }

    /// Whether a compiled template is cached under `name`.
    pub fn cache_contains(&self, name: &str) -> bool {
        self.cache.contains_key(&normalize_name(name))
    }

    /// Drops every cached template.
    pub fn clear_cache(&self) -> Result<()> {
        self.cache.clear()
    }
}

fn finish<'a>(mut state: RenderState<'a>, template: &'a Template) -> Result<RenderOutput> {
    let html = state.render_page(template)?;
    Ok(RenderOutput {
        html,
        diagnostics: state.into_diagnostics(),
    })
}
