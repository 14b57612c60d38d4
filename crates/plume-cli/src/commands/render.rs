// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Render command: one template against one JSON request.

use crate::config::Config;
use anyhow::Context;
use plume::{Engine, FileSystemResolver, RenderOutput, RequestData};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Arguments of `plume render`.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Template name relative to the theme root, e.g. `index` or `post`.
    pub template: String,
    /// JSON file holding the request data.
    pub data: PathBuf,
    /// Output file; stdout when absent.
    pub output: Option<PathBuf>,
}

/// Renders the page and writes it to the chosen output.
///
/// Diagnostics are not printed here; the engine logs each one at `warn`.
pub fn run(config: &Config, options: &RenderOptions) -> anyhow::Result<()> {
    let page = render_page(config, &options.template, &options.data)?;

    match &options.output {
        Some(path) => {
            fs::write(path, page.html.as_bytes())
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(output = %path.display(), bytes = page.html.len(), "page written");
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(page.html.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

/// Loads the theme from `config` and renders `template` with the data in `data_path`.
///
/// Non-fatal problems come back as diagnostics; recursion and layout
/// structure failures are errors.
pub fn render_page(config: &Config, template: &str, data_path: &Path) -> anyhow::Result<RenderOutput> {
    let data = load_data(data_path)?;

    let resolver = FileSystemResolver::new(&config.theme.dir);
    let engine = Engine::from_config(resolver, config.engine_config());
    let theme = engine
        .load_theme()
        .with_context(|| format!("failed to load theme from {}", config.theme.dir.display()))?;

    let page = engine
        .render(&theme, template, &data)
        .with_context(|| format!("failed to render {}", template))?;
    tracing::info!(template = %template, diagnostics = page.diagnostics.len(), "page rendered");
    Ok(page)
}

/// Reads request data from a JSON file.
pub fn load_data(path: &Path) -> anyhow::Result<RequestData> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("invalid request data in {}", path.display()))
}
