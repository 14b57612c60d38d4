// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

// Warn on missing documentation for public items
#![warn(missing_docs)]

// PlumeError::ParseError carries a source snippet for diagnostics.
#![allow(clippy::result_large_err)]

//! # Plume
//!
//! Handlebars-style blog theme rendering for Rust.
//!
//! Plume renders Ghost/Journey-style themes against per-request blog data:
//! posts, tags, authors, navigation, pagination and blog-wide settings.
//!
//! ## Features
//!
//! - Fixed builtin helper set (`if`, `foreach`, `post`, `date`, `ghost_head`, ...)
//! - Dynamic scoping with `../` parent paths and iteration pseudo-properties
//! - Layout inheritance (`{{!< default}}`, `contentFor`, `block`, `body`) and partials
//! - HTML escaping by default; a failing helper blanks only its own output
//! - Compiled templates cached in memory
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use plume::{Engine, FileSystemResolver, RequestData};
//!
//! let engine = Engine::with_memory_cache(FileSystemResolver::new("./themes/casper"), 100);
//! let theme = engine.load_theme()?;
//! let page = engine.render(&theme, "index", &RequestData::default())?;
//! println!("{}", page.html);
//! ```

/// Node tree types for parsed templates.
pub mod ast;

/// Template parser.
pub mod parser;

/// Blog data handed to a render.
pub mod model;

/// Values produced by helpers and path resolution.
pub mod value;

/// Scope frames of the render context.
pub mod context;

/// Path resolution against the scope stack.
pub mod path;

/// The helper registry.
pub mod registry;

/// The builtin helper set.
pub mod helpers;

/// Template execution.
pub mod render;

/// Output escaping.
pub mod escape;

/// Theme template sources.
pub mod resolver;

/// In-memory template sources.
pub mod memory_resolver;

/// Compiled template caching.
pub mod cache;

/// Loaded themes.
pub mod theme;

/// The theme engine.
pub mod engine;

/// Error types and diagnostics.
pub mod error;

pub use ast::*;
pub use cache::*;
pub use context::{Iteration, Scope};
pub use engine::*;
pub use error::*;
pub use memory_resolver::MemoryResolver;
pub use model::*;
pub use parser::parse_template;
pub use registry::*;
pub use render::{RenderOutput, RenderState};
pub use resolver::*;
pub use theme::Theme;
pub use value::Value;
