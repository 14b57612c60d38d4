// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! The builtin helper set.
//!
//! Helpers are grouped by what they read: control flow, layout composition,
//! derived output strings, dates, blog-wide collections, the current post,
//! author, navigation item, and pagination.

mod author;
mod blog;
mod control;
mod date;
mod layout;
mod navigation;
mod output;
mod pagination;
mod post;

use crate::ast::Argument;
use crate::error::{PlumeError, Result};
use crate::registry::{HelperCall, HelperRegistry};
use crate::render::RenderState;
use crate::value::Value;

pub use date::{format_date, time_ago};

/// Registers every builtin helper under every name themes use for it.
pub fn register_builtins(registry: &mut HelperRegistry) {
    registry
        .register("null", control::null)
        .register("if", control::if_helper)
        .register("unless", control::unless)
        .register("foreach", control::foreach)
        .register("@first", control::pseudo)
        .register("@last", control::pseudo)
        .register("@even", control::pseudo)
        .register("@odd", control::pseudo);

    registry
        .register("!<", layout::extends)
        .register("body", layout::body)
        .register("contentFor", layout::content_for)
        .register("block", layout::block)
        .register(">", layout::partial);

    registry
        .register("asset", output::asset)
        .register("encode", output::encode)
        .register("meta_title", output::meta_title)
        .register("meta_description", output::meta_description)
        .register("ghost_head", output::ghost_head)
        .register("ghost_foot", output::ghost_foot)
        .register("body_class", output::body_class)
        .register("post_class", output::post_class)
        .register("plural", output::plural)
        .register("image", output::image)
        .register("url", output::url);

    registry.register("date", date::date);

    registry
        .register("@blog.title", blog::blog_field)
        .register("@blog.url", blog::blog_field)
        .register("@blog.logo", blog::blog_field)
        .register("@blog.cover", blog::blog_field)
        .register("@blog.description", blog::blog_field)
        .register("@blog.PoweredByText", blog::blog_field)
        .register("@blog.PoweredByLink", blog::blog_field)
        .register("@blog.navigation", navigation::navigation)
        .register("posts", blog::posts)
        .register("recommends", blog::recommends)
        .register("all_tags", blog::all_tags)
        .register("tags", blog::tags)
        .register("tag_name", blog::tag_name)
        .register("tag.name", blog::tag_name)
        .register("tag.slug", blog::tag_slug)
        .register("tag_url", blog::tag_url)
        .register("name", blog::name);

    registry
        .register("post", post::post)
        .register("excerpt", post::excerpt)
        .register("title", post::title)
        .register("content", post::content)
        .register("featured", post::featured)
        .register("id", post::id)
        .register("post.id", post::id)
        .register("hits", post::hits)
        .register("prev_post", post::prev_post)
        .register("prev_post.title", post::prev_post_field)
        .register("prev_post.url", post::prev_post_field)
        .register("next_post", post::next_post)
        .register("next_post.title", post::next_post_field)
        .register("next_post.url", post::next_post_field);

    registry
        .register("author", author::author)
        .register("bio", author::author_field)
        .register("email", author::author_field)
        .register("website", author::author_field)
        .register("cover", author::author_field)
        .register("location", author::author_field)
        .register("author.name", author::author_field)
        .register("author.bio", author::author_field)
        .register("author.email", author::author_field)
        .register("author.website", author::author_field)
        .register("author.image", author::author_field)
        .register("author.cover", author::author_field)
        .register("author.location", author::author_field);

    registry
        .register("navigation", navigation::navigation)
        .register("label", navigation::label)
        .register("current", navigation::current)
        .register("slug", navigation::slug);

    registry
        .register("pagination", pagination::pagination)
        .register("prev", pagination::prev)
        .register("pagination.prev", pagination::prev)
        .register("next", pagination::next)
        .register("pagination.next", pagination::next)
        .register("page", pagination::page)
        .register("pages", pagination::pages)
        .register("page_url", pagination::page_url)
        .register("pageUrl", pagination::page_url)
        .register("pagination.total", pagination::total)
        .register("../pagination.total", pagination::total);
}

/// Entity helpers: a block renders with the entity as `this` (the inverse
/// when it is absent); inline and value calls return the entity itself.
fn entity<'a>(call: &HelperCall<'a>, state: &mut RenderState<'a>, subject: Value<'a>) -> Result<Value<'a>> {
    if call.is_block() {
        state.render_with_subject(call, subject)
    } else {
        Ok(subject)
    }
}

/// Collection helpers: a block iterates like `foreach`; otherwise the
/// collection itself is returned.
fn collection<'a>(call: &HelperCall<'a>, state: &mut RenderState<'a>, items: Value<'a>) -> Result<Value<'a>> {
    if !call.is_block() {
        return Ok(items);
    }
    let elements = items.items().unwrap_or_default();
    state.iterate(call, elements)
}

/// Boolean helpers: a block behaves like `if` on the flag.
fn flag<'a>(call: &HelperCall<'a>, state: &mut RenderState<'a>, value: bool) -> Result<Value<'a>> {
    if call.is_block() {
        state.render_branch(call, value)
    } else {
        Ok(Value::Bool(value))
    }
}

/// The first positional argument as written, for helpers taking a name.
fn name_argument(call: &HelperCall<'_>) -> Result<String> {
    call.params
        .first()
        .map(Argument::literal_text)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| PlumeError::helper(call.name, "expects a name argument"))
}

/// Prefixes a site-relative URL with the blog URL.
fn absolute_url(blog_url: &str, path: &str) -> String {
    if path.starts_with('/') {
        format!("{}{}", blog_url.trim_end_matches('/'), path)
    } else {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_url() {
        assert_eq!(absolute_url("https://x.org/", "/a/"), "https://x.org/a/");
        assert_eq!(absolute_url("https://x.org", "/a/"), "https://x.org/a/");
        assert_eq!(absolute_url("https://x.org", "https://cdn/a.png"), "https://cdn/a.png");
    }

    #[test]
    fn test_every_builtin_is_registered_once_per_name() {
        let mut registry = HelperRegistry::new();
        register_builtins(&mut registry);
        assert_eq!(registry.len(), 84);
    }
}
