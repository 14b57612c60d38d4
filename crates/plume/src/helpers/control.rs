// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Conditionals, iteration and iteration pseudo-properties.

use super::flag;
use crate::error::{PlumeError, Result};
use crate::registry::HelperCall;
use crate::render::RenderState;
use crate::value::Value;

pub(crate) fn null<'a>(_call: &HelperCall<'a>, _state: &mut RenderState<'a>) -> Result<Value<'a>> {
    Ok(Value::Absent)
}

fn condition<'a>(call: &HelperCall<'a>, state: &mut RenderState<'a>) -> Result<bool> {
    if call.params.is_empty() {
        return Err(PlumeError::helper(call.name, "expects a condition"));
    }
    Ok(state.param(call, 0)?.is_truthy())
}

/// `{{#if X}}`: primary body when X is truthy, inverse otherwise.
pub(crate) fn if_helper<'a>(call: &HelperCall<'a>, state: &mut RenderState<'a>) -> Result<Value<'a>> {
    let truthy = condition(call, state)?;
    flag(call, state, truthy)
}

/// `{{#unless X}}`: the complement of `if`.
pub(crate) fn unless<'a>(call: &HelperCall<'a>, state: &mut RenderState<'a>) -> Result<Value<'a>> {
    let truthy = condition(call, state)?;
    flag(call, state, !truthy)
}

/// `{{#foreach COLLECTION limit=N}}`.
///
/// An absent collection behaves like an empty one. Anything that is present
/// but not a collection is a helper error.
pub(crate) fn foreach<'a>(call: &HelperCall<'a>, state: &mut RenderState<'a>) -> Result<Value<'a>> {
    if !call.is_block() {
        return Err(PlumeError::helper(call.name, "must be used as a block"));
    }
    let source = match call.params.first() {
        Some(argument) => state.evaluate(argument, call.line)?,
        None => return Err(PlumeError::helper(call.name, "expects a collection")),
    };

    let items = match source.items() {
        Some(items) => items,
        None if source.is_absent() => Vec::new(),
        None => {
            return Err(PlumeError::helper(
                call.name,
                format!("cannot iterate over '{}'", source.to_text()),
            ))
        }
    };
    state.iterate(call, items)
}

/// `@first`, `@last`, `@even`, `@odd` as helpers.
///
/// Outside an iteration every pseudo-property is false.
pub(crate) fn pseudo<'a>(call: &HelperCall<'a>, state: &mut RenderState<'a>) -> Result<Value<'a>> {
    let value = state
        .iteration()
        .and_then(|iteration| iteration.pseudo(call.name))
        .map(|value| value.is_truthy())
        .unwrap_or(false);
    flag(call, state, value)
}
