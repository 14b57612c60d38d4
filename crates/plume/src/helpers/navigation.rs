// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Site navigation and its per-item fields.

use super::flag;
use crate::error::Result;
use crate::escape::escape_html;
use crate::model::NavItem;
use crate::registry::{CallMode, HelperCall};
use crate::render::RenderState;
use crate::value::Value;
use std::fmt::Write;

const PARTIAL: &str = "navigation";

/// `navigation` and `@blog.navigation`.
///
/// A block iterates the items; inline renders the theme's `navigation`
/// partial, or built-in list markup when the theme has none.
pub(crate) fn navigation<'a>(call: &HelperCall<'a>, state: &mut RenderState<'a>) -> Result<Value<'a>> {
    let items = &state.data().navigation;
    match call.mode {
        CallMode::Block => {
            let elements = items.iter().map(Value::NavItem).collect();
            state.iterate(call, elements)
        }
        CallMode::Value => Ok(Value::Navigation(items)),
        CallMode::Inline if items.is_empty() => Ok(Value::Absent),
        CallMode::Inline if state.has_partial(PARTIAL) => Ok(Value::safe(state.render_partial(PARTIAL)?)),
        CallMode::Inline => Ok(Value::safe(builtin_markup(items))),
    }
}

fn builtin_markup(items: &[NavItem]) -> String {
    let mut html = String::from(r#"<ul class="nav">"#);
    for item in items {
        let current = if item.is_current { " nav-current" } else { "" };
        let _ = write!(
            html,
            r#"<li class="nav-{}{}" role="presentation"><a href="{}">{}</a></li>"#,
            escape_html(&item.slug()),
            current,
            escape_html(&item.url),
            escape_html(&item.label)
        );
    }
    html.push_str("</ul>");
    html
}

pub(crate) fn label<'a>(_call: &HelperCall<'a>, state: &mut RenderState<'a>) -> Result<Value<'a>> {
    Ok(state
        .current_nav_item()
        .map(|item| Value::str(&item.label))
        .unwrap_or(Value::Absent))
}

/// Whether the navigation item links to the page being rendered.
pub(crate) fn current<'a>(call: &HelperCall<'a>, state: &mut RenderState<'a>) -> Result<Value<'a>> {
    let is_current = state.current_nav_item().map(|item| item.is_current).unwrap_or(false);
    flag(call, state, is_current)
}

/// Slug of the entity in scope; navigation items derive theirs from the label.
pub(crate) fn slug<'a>(_call: &HelperCall<'a>, state: &mut RenderState<'a>) -> Result<Value<'a>> {
    let scoped = state.subject().field("slug");
    if !scoped.is_absent() {
        return Ok(scoped);
    }
    Ok(state
        .current_nav_item()
        .map(|item| Value::string(item.slug()))
        .unwrap_or(Value::Absent))
}
