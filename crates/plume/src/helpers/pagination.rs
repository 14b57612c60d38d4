// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Pagination of listing pages.

use super::{entity, flag};
use crate::ast::Argument;
use crate::error::{PlumeError, Result};
use crate::escape::escape_html;
use crate::model::Pagination;
use crate::registry::{CallMode, HelperCall};
use crate::render::RenderState;
use crate::value::Value;
use std::fmt::Write;

const PARTIAL: &str = "pagination";

/// `pagination`: inline renders the theme's `pagination` partial or the
/// built-in page navigation; a block scopes its body to the pagination state.
pub(crate) fn pagination<'a>(call: &HelperCall<'a>, state: &mut RenderState<'a>) -> Result<Value<'a>> {
    let pagination = &state.data().pagination;
    if call.mode != CallMode::Inline {
        return entity(call, state, Value::Pagination(pagination));
    }
    if state.has_partial(PARTIAL) {
        return Ok(Value::safe(state.render_partial(PARTIAL)?));
    }
    Ok(Value::safe(builtin_markup(pagination)))
}

fn builtin_markup(pagination: &Pagination) -> String {
    let mut html = String::from(r#"<nav class="pagination" role="navigation">"#);
    if let Some(url) = pagination.prev_url() {
        let _ = write!(
            html,
            r#"<a class="newer-posts" href="{}">&larr; Newer Posts</a>"#,
            escape_html(&url)
        );
    }
    let _ = write!(
        html,
        r#"<span class="page-number">Page {} of {}</span>"#,
        pagination.page, pagination.pages
    );
    if let Some(url) = pagination.next_url() {
        let _ = write!(
            html,
            r#"<a class="older-posts" href="{}">Older Posts &rarr;</a>"#,
            escape_html(&url)
        );
    }
    html.push_str("</nav>");
    html
}

/// `prev` and `pagination.prev`: gated on a newer page existing.
pub(crate) fn prev<'a>(call: &HelperCall<'a>, state: &mut RenderState<'a>) -> Result<Value<'a>> {
    let has_prev = state.data().pagination.has_prev();
    flag(call, state, has_prev)
}

/// `next` and `pagination.next`: gated on an older page existing.
pub(crate) fn next<'a>(call: &HelperCall<'a>, state: &mut RenderState<'a>) -> Result<Value<'a>> {
    let has_next = state.data().pagination.has_next();
    flag(call, state, has_next)
}

pub(crate) fn page<'a>(_call: &HelperCall<'a>, state: &mut RenderState<'a>) -> Result<Value<'a>> {
    Ok(Value::Int(state.data().pagination.page as i64))
}

pub(crate) fn pages<'a>(_call: &HelperCall<'a>, state: &mut RenderState<'a>) -> Result<Value<'a>> {
    Ok(Value::Int(state.data().pagination.pages as i64))
}

/// `page_url` / `pageUrl`: `"prev"`, `"next"` or a page number.
///
/// `prev` and `next` yield nothing when there is no such page.
pub(crate) fn page_url<'a>(call: &HelperCall<'a>, state: &mut RenderState<'a>) -> Result<Value<'a>> {
    let pagination = &state.data().pagination;

    // `prev` and `next` are also helper names; read them as written.
    let direction = match call.params.first() {
        Some(Argument::Path(word)) | Some(Argument::String(word)) => word.as_str(),
        Some(_) => "",
        None => return Err(PlumeError::helper(call.name, "expects a page")),
    };
    let url = match direction {
        "prev" => pagination.prev_url(),
        "next" => pagination.next_url(),
        _ => {
            let page = state
                .param(call, 0)?
                .as_int()
                .ok_or_else(|| PlumeError::helper(call.name, "expects \"prev\", \"next\" or a page number"))?;
            Some(pagination.page_url(page.clamp(0, u32::MAX as i64) as u32))
        }
    };
    Ok(url.map(Value::string).unwrap_or(Value::Absent))
}

/// `pagination.total` and `../pagination.total`: total pages, resolved at
/// the scope depth the name addresses.
pub(crate) fn total<'a>(call: &HelperCall<'a>, state: &mut RenderState<'a>) -> Result<Value<'a>> {
    Ok(state.resolve(call.name))
}
