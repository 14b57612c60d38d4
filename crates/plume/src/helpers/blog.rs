// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Blog-wide settings, listings and tags.

use super::{absolute_url, collection};
use crate::error::Result;
use crate::escape::escape_html;
use crate::registry::{CallMode, HelperCall};
use crate::render::RenderState;
use crate::value::Value;

/// `@blog.title`, `@blog.url`, ...: the blog field named after the prefix.
pub(crate) fn blog_field<'a>(call: &HelperCall<'a>, state: &mut RenderState<'a>) -> Result<Value<'a>> {
    let field = call.name.strip_prefix("@blog.").unwrap_or(call.name);
    Ok(Value::Blog(&state.data().blog).field(field))
}

pub(crate) fn posts<'a>(call: &HelperCall<'a>, state: &mut RenderState<'a>) -> Result<Value<'a>> {
    let items = Value::Posts(&state.data().posts);
    collection(call, state, items)
}

pub(crate) fn recommends<'a>(call: &HelperCall<'a>, state: &mut RenderState<'a>) -> Result<Value<'a>> {
    let items = Value::Posts(&state.data().recommends);
    collection(call, state, items)
}

pub(crate) fn all_tags<'a>(call: &HelperCall<'a>, state: &mut RenderState<'a>) -> Result<Value<'a>> {
    let items = Value::Tags(&state.data().all_tags);
    collection(call, state, items)
}

/// Tags of the current post.
///
/// Inline, renders them as a list: `separator` (default `", "`), `prefix`,
/// `suffix`, and `autolink="false"` to emit names without links.
pub(crate) fn tags<'a>(call: &HelperCall<'a>, state: &mut RenderState<'a>) -> Result<Value<'a>> {
    let tags = state
        .current_post()
        .map(|post| post.tags.as_slice())
        .unwrap_or_default();
    if call.mode != CallMode::Inline {
        return collection(call, state, Value::Tags(tags));
    }
    if tags.is_empty() {
        return Ok(Value::Absent);
    }

    let separator = state.hash_string(call, "separator")?.unwrap_or_else(|| ", ".to_string());
    let prefix = state.hash_string(call, "prefix")?.unwrap_or_default();
    let suffix = state.hash_string(call, "suffix")?.unwrap_or_default();
    let autolink = match state.hash(call, "autolink")? {
        Some(value) => value.to_text() != "false",
        None => true,
    };

    let items: Vec<String> = tags
        .iter()
        .map(|tag| {
            if autolink {
                format!(r#"<a href="{}">{}</a>"#, escape_html(&tag.url()), escape_html(&tag.name))
            } else {
                escape_html(&tag.name).into_owned()
            }
        })
        .collect();

    Ok(Value::safe(format!(
        "{}{}{}",
        escape_html(&prefix),
        items.join(&escape_html(&separator)),
        escape_html(&suffix)
    )))
}

/// Name of the current tag (`tag_name`, `tag.name`).
pub(crate) fn tag_name<'a>(_call: &HelperCall<'a>, state: &mut RenderState<'a>) -> Result<Value<'a>> {
    Ok(state
        .current_tag()
        .map(|tag| Value::str(&tag.name))
        .unwrap_or(Value::Absent))
}

pub(crate) fn tag_slug<'a>(_call: &HelperCall<'a>, state: &mut RenderState<'a>) -> Result<Value<'a>> {
    Ok(state
        .current_tag()
        .map(|tag| Value::str(&tag.slug))
        .unwrap_or(Value::Absent))
}

/// URL of the current tag; `absolute="true"` prefixes the blog URL.
pub(crate) fn tag_url<'a>(call: &HelperCall<'a>, state: &mut RenderState<'a>) -> Result<Value<'a>> {
    let absolute = state.hash_flag(call, "absolute")?;
    Ok(match state.current_tag() {
        Some(tag) if absolute => Value::string(absolute_url(&state.data().blog.url, &tag.url())),
        Some(tag) => Value::string(tag.url()),
        None => Value::Absent,
    })
}

/// `{{name}}`: the tag or author in scope, else the current tag or author.
pub(crate) fn name<'a>(_call: &HelperCall<'a>, state: &mut RenderState<'a>) -> Result<Value<'a>> {
    Ok(match state.subject() {
        Value::Tag(tag) => Value::str(&tag.name),
        Value::Author(author) => Value::str(&author.name),
        _ => match (state.current_tag(), state.current_author()) {
            (Some(tag), _) => Value::str(&tag.name),
            (None, Some(author)) => Value::str(&author.name),
            (None, None) => Value::Absent,
        },
    })
}
