// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Layout inheritance and partial inclusion.
//!
//! The layout chain itself is driven by [`RenderState::render_page`]; these
//! helpers only fill and read the slots it manages.

use super::name_argument;
use crate::error::{PlumeError, Result};
use crate::registry::HelperCall;
use crate::render::RenderState;
use crate::value::Value;

/// `{{!< layout}}`. Produces no output; only valid at the top level of a page template.
pub(crate) fn extends<'a>(call: &HelperCall<'a>, state: &mut RenderState<'a>) -> Result<Value<'a>> {
    if call.is_block() || state.block_depth() > 0 || state.partial_depth() > 0 {
        return Err(PlumeError::structure(
            state.template_name(),
            "extends must appear at the top level of a template",
        ));
    }
    Ok(Value::Absent)
}

/// `{{{body}}}`: the rendered child template.
pub(crate) fn body<'a>(_call: &HelperCall<'a>, state: &mut RenderState<'a>) -> Result<Value<'a>> {
    Ok(Value::safe(state.body().unwrap_or_default().to_string()))
}

/// `{{#contentFor "name"}}...{{/contentFor}}`: captures the body for a
/// parent layout's `block` and writes nothing in place.
pub(crate) fn content_for<'a>(call: &HelperCall<'a>, state: &mut RenderState<'a>) -> Result<Value<'a>> {
    if !call.is_block() {
        return Err(PlumeError::helper(call.name, "must be used as a block"));
    }
    let name = name_argument(call)?;
    let content = state.render_nodes(call.body)?;
    state.collect_slot(name, content);
    Ok(Value::Absent)
}

/// `{{#block "name"}}default{{/block}}`: the child's content for the slot, or the default body.
pub(crate) fn block<'a>(call: &HelperCall<'a>, state: &mut RenderState<'a>) -> Result<Value<'a>> {
    let name = name_argument(call)?;
    if let Some(content) = state.slot(&name) {
        return Ok(Value::safe(content.to_string()));
    }
    Ok(Value::safe(state.render_nodes(call.body)?))
}

/// `{{> name}}`: renders a theme partial in the current scope.
pub(crate) fn partial<'a>(call: &HelperCall<'a>, state: &mut RenderState<'a>) -> Result<Value<'a>> {
    let name = name_argument(call)?;
    Ok(Value::safe(state.render_partial(&name)?))
}
