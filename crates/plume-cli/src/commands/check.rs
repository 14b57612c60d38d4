// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Check command: compiles every theme template and validates layout chains.

use crate::config::Config;
use plume::{Engine, FileSystemResolver, TemplateResolver, Theme};

/// Outcome of checking a theme.
#[derive(Debug, Default)]
pub struct CheckReport {
    /// Number of templates that compiled.
    pub compiled: usize,
    /// Every problem found, one line each.
    pub errors: Vec<String>,
}

impl CheckReport {
    /// Whether the theme is free of parse and structure errors.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Checks the configured theme and fails when any template is broken.
pub fn run(config: &Config) -> anyhow::Result<()> {
    let report = check_theme(config)?;

    for error in &report.errors {
        eprintln!("  error: {}", error);
    }
    if !report.is_ok() {
        anyhow::bail!(
            "{} problem(s) found in {}",
            report.errors.len(),
            config.theme.dir.display()
        );
    }

    println!(
        "  {} template(s) in {} OK",
        report.compiled,
        config.theme.dir.display()
    );
    Ok(())
}

/// Compiles every template of the theme, collecting all failures instead of
/// stopping at the first.
pub fn check_theme(config: &Config) -> anyhow::Result<CheckReport> {
    if !config.theme.dir.is_dir() {
        anyhow::bail!("theme directory {} does not exist", config.theme.dir.display());
    }

    let engine = Engine::from_config(
        FileSystemResolver::new(&config.theme.dir),
        config.engine_config(),
    );
    let mut report = CheckReport::default();
    let mut theme = Theme::new();

    for name in engine.resolver().list()? {
        match engine.compile(&name) {
            Ok(template) => {
                theme.insert(template);
                report.compiled += 1;
            }
            Err(error) => report.errors.push(error.to_string()),
        }
    }

    for name in theme.names() {
        let Some(template) = theme.template(name) else {
            continue;
        };
        if let Err(error) = theme.layout_chain(template, config.render.max_depth) {
            report.errors.push(error.to_string());
        }
    }

    tracing::info!(
        compiled = report.compiled,
        errors = report.errors.len(),
        "theme checked"
    );
    Ok(report)
}
