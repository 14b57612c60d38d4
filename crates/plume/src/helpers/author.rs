// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Helpers reading the author in focus.

use super::entity;
use crate::error::Result;
use crate::registry::HelperCall;
use crate::render::RenderState;
use crate::value::Value;

/// `{{#author}}` scopes the body to the current author; inline it writes the name.
pub(crate) fn author<'a>(call: &HelperCall<'a>, state: &mut RenderState<'a>) -> Result<Value<'a>> {
    let subject = Value::from_option(state.current_author(), Value::Author);
    entity(call, state, subject)
}

/// `bio`, `email`, `author.name`, ...: the author field named by the helper,
/// with any `author.` prefix removed.
pub(crate) fn author_field<'a>(call: &HelperCall<'a>, state: &mut RenderState<'a>) -> Result<Value<'a>> {
    let field = call.name.strip_prefix("author.").unwrap_or(call.name);
    Ok(match state.current_author() {
        Some(author) => Value::Author(author).field(field),
        None => Value::Absent,
    })
}
