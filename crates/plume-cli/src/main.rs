// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

use clap::{Parser, Subcommand};
use plume_cli::commands;
use plume_cli::commands::render::RenderOptions;
use plume_cli::config::{Config, Overrides, CONFIG_FILE};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "plume")]
#[command(author = "Maravilla Labs")]
#[command(version)]
#[command(about = "Handlebars-style blog theme renderer", long_about = None)]
struct Cli {
    /// Log level: error, warn, info, debug, trace
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Configuration file
    #[arg(long, global = true, default_value = CONFIG_FILE)]
    config: PathBuf,

    /// Theme directory (overrides [theme] dir)
    #[arg(long, global = true)]
    theme: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render one page to stdout or a file
    Render {
        /// Template name, e.g. index, post, tag
        #[arg(short, long)]
        template: String,
        /// JSON file with the request data
        #[arg(short, long)]
        data: PathBuf,
        /// Write the page here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Public URL prefix of theme assets (overrides [assets] base_url)
        #[arg(long)]
        asset_base: Option<String>,
        /// Partial and layout nesting bound (overrides [render] max_depth)
        #[arg(long)]
        max_depth: Option<usize>,
    },
    /// Compile every theme template and report errors
    Check,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with the specified log level
    let filter = EnvFilter::try_new(&cli.log_level)
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut overrides = Overrides {
        theme_dir: cli.theme,
        ..Overrides::default()
    };

    match cli.command {
        Commands::Render {
            template,
            data,
            output,
            asset_base,
            max_depth,
        } => {
            overrides.asset_base = asset_base;
            overrides.max_depth = max_depth;
            let config = Config::load_from(&cli.config)?.with_overrides(&overrides);
            commands::render::run(
                &config,
                &RenderOptions {
                    template,
                    data,
                    output,
                },
            )
        }
        Commands::Check => {
            let config = Config::load_from(&cli.config)?.with_overrides(&overrides);
            commands::check::run(&config)
        }
    }
}
