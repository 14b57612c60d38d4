// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Helpers reading the current post and its neighbours.

use super::{entity, flag};
use crate::error::Result;
use crate::escape::{strip_tags, truncate_chars, truncate_words};
use crate::model::Post;
use crate::registry::HelperCall;
use crate::render::RenderState;
use crate::value::Value;

const EXCERPT_WORDS: usize = 50;

fn current<'a>(state: &RenderState<'a>) -> Value<'a> {
    Value::from_option(state.current_post(), Value::Post)
}

/// `{{#post}}` scopes the body to the current post.
pub(crate) fn post<'a>(call: &HelperCall<'a>, state: &mut RenderState<'a>) -> Result<Value<'a>> {
    let subject = current(state);
    entity(call, state, subject)
}

/// Plain-text excerpt: `words=N` (default 50) or `characters=N`.
pub(crate) fn excerpt<'a>(call: &HelperCall<'a>, state: &mut RenderState<'a>) -> Result<Value<'a>> {
    let post = match state.current_post() {
        Some(post) => post,
        None => return Ok(Value::Absent),
    };
    let text = strip_tags(&post.html);
    if let Some(characters) = state.hash_usize(call, "characters")? {
        return Ok(Value::string(truncate_chars(&text, characters)));
    }
    let words = state.hash_usize(call, "words")?.unwrap_or(EXCERPT_WORDS);
    Ok(Value::string(truncate_words(&text, words)))
}

pub(crate) fn title<'a>(_call: &HelperCall<'a>, state: &mut RenderState<'a>) -> Result<Value<'a>> {
    Ok(post_value(state, |post| Value::str(&post.title)))
}

/// Post HTML, or a plain-text cut of it when `words=` or `characters=` is given.
pub(crate) fn content<'a>(call: &HelperCall<'a>, state: &mut RenderState<'a>) -> Result<Value<'a>> {
    let post = match state.current_post() {
        Some(post) => post,
        None => return Ok(Value::Absent),
    };
    if let Some(characters) = state.hash_usize(call, "characters")? {
        return Ok(Value::string(truncate_chars(&strip_tags(&post.html), characters)));
    }
    if let Some(words) = state.hash_usize(call, "words")? {
        return Ok(Value::string(truncate_words(&strip_tags(&post.html), words)));
    }
    Ok(Value::Safe(post.html.as_str().into()))
}

pub(crate) fn featured<'a>(call: &HelperCall<'a>, state: &mut RenderState<'a>) -> Result<Value<'a>> {
    let featured = state.current_post().map(|post| post.is_featured).unwrap_or(false);
    flag(call, state, featured)
}

/// `id` and `post.id`.
pub(crate) fn id<'a>(_call: &HelperCall<'a>, state: &mut RenderState<'a>) -> Result<Value<'a>> {
    Ok(post_value(state, |post| Value::Int(post.id)))
}

pub(crate) fn hits<'a>(_call: &HelperCall<'a>, state: &mut RenderState<'a>) -> Result<Value<'a>> {
    Ok(post_value(state, |post| Value::Int(post.hits)))
}

pub(crate) fn prev_post<'a>(call: &HelperCall<'a>, state: &mut RenderState<'a>) -> Result<Value<'a>> {
    let subject = Value::from_option(state.data().prev_post.as_ref(), Value::Post);
    entity(call, state, subject)
}

pub(crate) fn next_post<'a>(call: &HelperCall<'a>, state: &mut RenderState<'a>) -> Result<Value<'a>> {
    let subject = Value::from_option(state.data().next_post.as_ref(), Value::Post);
    entity(call, state, subject)
}

/// `prev_post.title`, `prev_post.url`.
pub(crate) fn prev_post_field<'a>(call: &HelperCall<'a>, state: &mut RenderState<'a>) -> Result<Value<'a>> {
    Ok(neighbour_field(call.name, state.data().prev_post.as_ref()))
}

/// `next_post.title`, `next_post.url`.
pub(crate) fn next_post_field<'a>(call: &HelperCall<'a>, state: &mut RenderState<'a>) -> Result<Value<'a>> {
    Ok(neighbour_field(call.name, state.data().next_post.as_ref()))
}

fn neighbour_field<'a>(name: &str, post: Option<&'a Post>) -> Value<'a> {
    let field = name.rsplit('.').next().unwrap_or(name);
    match post {
        Some(post) => Value::Post(post).field(field),
        None => Value::Absent,
    }
}

fn post_value<'a>(state: &RenderState<'a>, read: impl FnOnce(&'a Post) -> Value<'a>) -> Value<'a> {
    state.current_post().map(read).unwrap_or(Value::Absent)
}
