// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! CLI command implementations.
//!
//! - `render`: Render one template against a JSON request
//! - `check`: Compile a theme and validate its layout chains

/// Theme validation command.
pub mod check;
/// Page rendering command.
pub mod render;
