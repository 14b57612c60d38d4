// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Helpers producing derived strings: URLs, head and foot markup, CSS
//! classes and pluralized counts.

use super::absolute_url;
use crate::error::{PlumeError, Result};
use crate::escape::escape_html;
use crate::model::PageKind;
use crate::registry::HelperCall;
use crate::render::RenderState;
use crate::value::Value;
use std::fmt::Write;

/// `{{asset "css/screen.css"}}` joined onto the configured asset base.
pub(crate) fn asset<'a>(call: &HelperCall<'a>, state: &mut RenderState<'a>) -> Result<Value<'a>> {
    let path = state.param(call, 0)?.to_text().into_owned();
    if path.is_empty() {
        return Err(PlumeError::helper(call.name, "expects an asset path"));
    }
    let base = &state.config().asset_base;
    Ok(Value::string(format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )))
}

/// `{{encode X}}` passes X through unescaped; `{{#encode}}` renders its body
/// with escaping switched off.
pub(crate) fn encode<'a>(call: &HelperCall<'a>, state: &mut RenderState<'a>) -> Result<Value<'a>> {
    if call.is_block() {
        return Ok(Value::safe(state.render_unescaped(call.body)?));
    }
    let text = state.param(call, 0)?.to_text().into_owned();
    Ok(Value::safe(text))
}

pub(crate) fn meta_title<'a>(_call: &HelperCall<'a>, state: &mut RenderState<'a>) -> Result<Value<'a>> {
    Ok(match state.current_post() {
        Some(post) => Value::str(&post.title),
        None => Value::str(&state.data().blog.title),
    })
}

pub(crate) fn meta_description<'a>(_call: &HelperCall<'a>, state: &mut RenderState<'a>) -> Result<Value<'a>> {
    Ok(match state.current_post() {
        Some(post) => Value::str(&post.meta_description),
        None => Value::str(&state.data().blog.description),
    })
}

/// Markup for the document head.
pub(crate) fn ghost_head<'a>(_call: &HelperCall<'a>, state: &mut RenderState<'a>) -> Result<Value<'a>> {
    let data = state.data();
    let blog = &data.blog;

    let description = match &data.post {
        Some(post) => &post.meta_description,
        None => &blog.description,
    };
    let canonical = match &data.post {
        Some(post) => absolute_url(&blog.url, &post.url()),
        None => absolute_url(&blog.url, &data.pagination.page_url(data.pagination.page)),
    };

    let mut head = String::new();
    if !description.is_empty() {
        let _ = writeln!(head, r#"<meta name="description" content="{}" />"#, escape_html(description));
    }
    let _ = writeln!(head, r#"<link rel="canonical" href="{}" />"#, escape_html(&canonical));
    let _ = writeln!(
        head,
        r#"<meta name="generator" content="{}" />"#,
        escape_html(&state.config().generator)
    );
    let _ = writeln!(
        head,
        r#"<link rel="alternate" type="application/rss+xml" title="{}" href="{}" />"#,
        escape_html(&blog.title),
        escape_html(&absolute_url(&blog.url, "/rss/"))
    );
    head.push_str(&blog.code_injection_head);
    Ok(Value::safe(head))
}

/// Markup for the end of the document body.
pub(crate) fn ghost_foot<'a>(_call: &HelperCall<'a>, state: &mut RenderState<'a>) -> Result<Value<'a>> {
    Ok(Value::safe(state.data().blog.code_injection_foot.clone()))
}

/// CSS classes of the `<body>` element for the kind of page being rendered.
pub(crate) fn body_class<'a>(_call: &HelperCall<'a>, state: &mut RenderState<'a>) -> Result<Value<'a>> {
    let data = state.data();
    let post_slug = data.post.as_ref().map(|post| post.slug.as_str()).unwrap_or_default();

    let mut classes = match data.kind {
        PageKind::Index => "home-template".to_string(),
        PageKind::Post => "post-template".to_string(),
        PageKind::Page => format!("page-template page-{}", post_slug),
        PageKind::Tag => format!(
            "tag-template tag-{}",
            data.tag.as_ref().map(|tag| tag.slug.as_str()).unwrap_or_default()
        ),
        PageKind::Author => format!(
            "author-template author-{}",
            data.author.as_ref().map(|author| author.slug.as_str()).unwrap_or_default()
        ),
    };
    if data.pagination.page > 1 {
        classes.push_str(" paged archive-template");
    }
    Ok(Value::string(classes))
}

/// CSS classes of a post's `<article>` element.
pub(crate) fn post_class<'a>(_call: &HelperCall<'a>, state: &mut RenderState<'a>) -> Result<Value<'a>> {
    let mut classes = String::from("post");
    if let Some(post) = state.current_post() {
        if post.is_featured {
            classes.push_str(" featured");
        }
        if post.is_page {
            classes.push_str(" page");
        }
        for tag in &post.tags {
            let _ = write!(classes, " tag-{}", tag.slug);
        }
    }
    Ok(Value::string(classes))
}

/// `{{plural N empty="No posts" singular="% post" plural="% posts"}}`.
pub(crate) fn plural<'a>(call: &HelperCall<'a>, state: &mut RenderState<'a>) -> Result<Value<'a>> {
    let count = state
        .param(call, 0)?
        .as_int()
        .ok_or_else(|| PlumeError::helper(call.name, "expects a number"))?;

    let key = match count {
        0 => "empty",
        1 => "singular",
        _ => "plural",
    };
    let template = state.hash_string(call, key)?.unwrap_or_default();
    Ok(Value::string(template.replace('%', &count.to_string())))
}

/// `{{url absolute="true"}}`: URL of the entity in scope.
pub(crate) fn url<'a>(call: &HelperCall<'a>, state: &mut RenderState<'a>) -> Result<Value<'a>> {
    let absolute = state.hash_flag(call, "absolute")?;
    let blog_url = &state.data().blog.url;

    let path = match state.subject() {
        Value::Post(post) => post.url(),
        Value::Tag(tag) => tag.url(),
        Value::Author(author) => author.url(),
        Value::NavItem(item) => item.url.clone(),
        _ => match state.current_post() {
            Some(post) => post.url(),
            None => return Ok(Value::str(blog_url)),
        },
    };

    if absolute {
        Ok(Value::string(absolute_url(blog_url, &path)))
    } else {
        Ok(Value::string(path))
    }
}

/// `{{image absolute="true"}}`: image of the post or author in scope.
pub(crate) fn image<'a>(call: &HelperCall<'a>, state: &mut RenderState<'a>) -> Result<Value<'a>> {
    let absolute = state.hash_flag(call, "absolute")?;
    let image = match state.subject() {
        Value::Author(author) => author.image.as_str(),
        _ => state
            .current_post()
            .map(|post| post.image.as_str())
            .unwrap_or_default(),
    };

    if image.is_empty() {
        return Ok(Value::Absent);
    }
    if absolute {
        Ok(Value::string(absolute_url(&state.data().blog.url, image)))
    } else {
        Ok(Value::str(image))
    }
}
