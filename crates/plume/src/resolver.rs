// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Theme template sources.
//!
//! This module provides the [`TemplateResolver`] trait and the filesystem
//! implementation used for themes on disk. Template names are relative to
//! the theme root, use `/` separators and omit the `.hbs` extension
//! (`post`, `partials/loop`).
//!
//! # Resolver Implementations
//!
//! - [`FileSystemResolver`]: reads a theme directory (`filesystem` feature)
//! - [`MemoryResolver`](crate::memory_resolver::MemoryResolver): in-memory sources for tests and embedding

use crate::error::{PlumeError, Result};
use std::path::Path;

#[cfg(feature = "filesystem")]
use std::fs;
#[cfg(feature = "filesystem")]
use std::path::PathBuf;
#[cfg(feature = "filesystem")]
use walkdir::{DirEntry, WalkDir};

/// File extension of theme templates.
pub const TEMPLATE_EXTENSION: &str = "hbs";

/// Converts a path to a string with forward slashes.
#[inline]
pub fn path_to_string<P: AsRef<Path>>(path: P) -> String {
    #[cfg(windows)]
    {
        use std::path::Component;
        let mut parts = Vec::new();
        for component in path.as_ref().components() {
            match component {
                Component::Normal(s) => parts.push(s.to_string_lossy().into_owned()),
                Component::ParentDir => parts.push("..".to_string()),
                Component::Prefix(p) => parts.push(p.as_os_str().to_string_lossy().into_owned()),
                Component::RootDir | Component::CurDir => {}
            }
        }
        parts.join("/")
    }
    #[cfg(not(windows))]
    {
        path.as_ref().to_string_lossy().to_string()
    }
}

/// Strips a trailing `.hbs` and leading `./` or `/` from a template name.
pub fn normalize_name(name: &str) -> String {
    let name = name.trim().trim_start_matches("./").trim_start_matches('/');
    name.strip_suffix(".hbs").unwrap_or(name).replace('\\', "/")
}

/// A template located by a resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTemplate {
    /// Where the source came from, for error messages.
    pub path: String,
    /// The template source.
    pub source: String,
}

/// Locates and loads theme templates by name.
pub trait TemplateResolver: Send + Sync + 'static {
    /// Loads the template called `name`.
    fn resolve(&self, name: &str) -> Result<ResolvedTemplate>;

    /// Names of every template the theme provides, sorted.
    fn list(&self) -> Result<Vec<String>>;

    /// Creates a boxed clone.
    fn clone_box(&self) -> Box<dyn TemplateResolver>;
}

impl Clone for Box<dyn TemplateResolver> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Reads templates from a theme directory.
///
/// ```rust,ignore
/// use plume::FileSystemResolver;
///
/// let resolver = FileSystemResolver::new("./content/themes/casper");
/// let post = resolver.resolve("post")?;
/// let loop_partial = resolver.resolve("partials/loop")?;
/// ```
#[cfg(feature = "filesystem")]
#[derive(Debug, Clone)]
pub struct FileSystemResolver {
    /// The theme root directory.
    pub root_dir: String,
}

#[cfg(feature = "filesystem")]
impl FileSystemResolver {
    /// Creates a resolver rooted at `root_dir`.
    pub fn new<P: AsRef<Path>>(root_dir: P) -> Self {
        Self {
            root_dir: path_to_string(root_dir.as_ref()),
        }
    }

    fn file_path(&self, name: &str) -> PathBuf {
        Path::new(&self.root_dir).join(format!("{}.{}", normalize_name(name), TEMPLATE_EXTENSION))
    }

    /// Walks the theme for `.hbs` files, skipping hidden entries.
    ///
    /// Symlinks are followed; a link back to one of its own ancestors is
    /// skipped with a warning.
    fn collect(&self, root: &Path) -> Result<Vec<String>> {
        let walker = WalkDir::new(root)
            .follow_links(true)
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry));

        let mut names = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(error) if error.loop_ancestor().is_some() => {
                    tracing::warn!(path = ?error.path(), "skipping symlink loop in theme");
                    continue;
                }
                Err(error) => return Err(PlumeError::IoError(error.into())),
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(TEMPLATE_EXTENSION) {
                continue;
            }
            if let Ok(relative) = path.strip_prefix(root) {
                names.push(normalize_name(&path_to_string(relative)));
            }
        }
        Ok(names)
    }
}

#[cfg(feature = "filesystem")]
fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

#[cfg(feature = "filesystem")]
impl TemplateResolver for FileSystemResolver {
    fn resolve(&self, name: &str) -> Result<ResolvedTemplate> {
        let path = self.file_path(name);
        if !path.is_file() {
            return Err(PlumeError::TemplateNotFound(normalize_name(name)));
        }
        let source = fs::read_to_string(&path).map_err(|e| {
            PlumeError::ResolutionError(format!("Cannot read '{}': {}", path.display(), e))
        })?;
        Ok(ResolvedTemplate {
            path: path_to_string(&path),
            source,
        })
    }

    fn list(&self) -> Result<Vec<String>> {
        let root = Path::new(&self.root_dir);
        if !root.is_dir() {
            return Err(PlumeError::ResolutionError(format!(
                "Theme directory not found: {}",
                self.root_dir
            )));
        }
        let mut names = self.collect(root)?;
        names.sort();
        Ok(names)
    }

    fn clone_box(&self) -> Box<dyn TemplateResolver> {
        Box::new(self.clone())
    }
}
