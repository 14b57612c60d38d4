// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

// Warn on missing documentation for public items
#![warn(missing_docs)]

//! Plume CLI library.
//!
//! This crate provides the command-line interface for the plume theme engine.
//!
//! # Usage
//!
//! This crate is primarily used through the `plume` binary:
//!
//! ```bash
//! plume render --theme themes/casper --template index --data request.json
//! plume check --theme themes/casper
//! ```
//!
//! # Configuration
//!
//! Defaults are read from `plume.toml` at the project root.

/// CLI commands (render, check).
pub mod commands;
/// Project configuration from `plume.toml`.
pub mod config;
