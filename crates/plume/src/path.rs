// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Path resolution against the scope stack.
//!
//! # Resolution Algorithm
//!
//! 1. Each leading `../` removes the innermost remaining scope. Asking for
//!    more ancestors than there are scopes yields [`Value::Absent`].
//! 2. A leading `./` limits the lookup to the innermost subject, like `this.`.
//! 3. The rest is split on `.`.
//! 4. The first segment is looked up innermost scope first, then outward,
//!    then in the top-level [`RequestData`] fields, then in [`Blog`](crate::model::Blog).
//! 5. Every further segment is a field of the previous result.
//!
//! Resolution never fails and never mutates anything.

use crate::context::Scope;
use crate::model::RequestData;
use crate::value::Value;

/// Resolves `expression` against `scopes` (outermost first) and `data`.
pub fn resolve<'a>(expression: &str, scopes: &[Scope<'a>], data: &'a RequestData) -> Value<'a> {
    let (depth, rest) = split_parents(expression.trim());
    if depth > scopes.len() {
        return Value::Absent;
    }
    let visible = &scopes[..scopes.len() - depth];

    if rest.is_empty() || rest == "." {
        return visible
            .last()
            .map(|scope| scope.subject.clone())
            .unwrap_or(Value::Absent);
    }

    let (mut value, fields) = match rest.strip_prefix("./") {
        Some(fields) => {
            let subject = visible
                .last()
                .map(|scope| scope.subject.clone())
                .unwrap_or(Value::Absent);
            (subject, fields)
        }
        None => {
            let (first, fields) = rest.split_once('.').unwrap_or((rest, ""));
            (lookup_first(first, visible, data), fields)
        }
    };

    if fields.is_empty() {
        return value;
    }
    for segment in fields.split('.') {
        if value.is_absent() {
            break;
        }
        value = value.field(segment);
    }
    value
}

/// Counts and strips leading `../` segments.
pub fn split_parents(expression: &str) -> (usize, &str) {
    let mut depth = 0;
    let mut rest = expression;
    while let Some(stripped) = rest.strip_prefix("../") {
        depth += 1;
        rest = stripped;
    }
    if rest == ".." {
        return (depth + 1, "");
    }
    (depth, rest)
}

fn lookup_first<'a>(name: &str, scopes: &[Scope<'a>], data: &'a RequestData) -> Value<'a> {
    for scope in scopes.iter().rev() {
        let value = scope.lookup(name);
        if !value.is_absent() {
            return value;
        }
    }

    let value = request_field(data, name);
    if !value.is_absent() {
        return value;
    }
    Value::Blog(&data.blog).field(name)
}

/// Top-level fields of the request aggregate.
pub fn request_field<'a>(data: &'a RequestData, name: &str) -> Value<'a> {
    match name {
        "post" => Value::from_option(data.post.as_ref(), Value::Post),
        "posts" => Value::Posts(&data.posts),
        "tag" => Value::from_option(data.tag.as_ref(), Value::Tag),
        "author" => Value::from_option(data.author.as_ref(), Value::Author),
        "navigation" => Value::Navigation(&data.navigation),
        "pagination" => Value::Pagination(&data.pagination),
        "blog" | "@blog" => Value::Blog(&data.blog),
        "all_tags" => Value::Tags(&data.all_tags),
        "recommends" => Value::Posts(&data.recommends),
        "prev_post" => Value::from_option(data.prev_post.as_ref(), Value::Post),
        "next_post" => Value::from_option(data.next_post.as_ref(), Value::Post),
        "now" => Value::Date(data.now),
        _ => Value::Absent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Iteration;
    use crate::model::{Blog, Pagination, Post};

    fn data() -> RequestData {
        RequestData {
            blog: Blog {
                title: "Notes".to_string(),
                ..Blog::default()
            },
            posts: vec![
                Post {
                    title: "A".to_string(),
                    ..Post::default()
                },
                Post {
                    title: "B".to_string(),
                    ..Post::default()
                },
            ],
            pagination: Pagination {
                page: 1,
                pages: 4,
                base_url: "/".to_string(),
            },
            ..RequestData::default()
        }
    }

    #[test]
    fn test_dynamic_scoping_reaches_request_and_blog() {
        let data = data();
        let scopes = vec![Scope::new(Value::Absent)];

        assert_eq!(resolve("pagination.pages", &scopes, &data), Value::Int(4));
        assert_eq!(resolve("title", &scopes, &data), Value::str("Notes"));
        assert_eq!(resolve("@blog.title", &scopes, &data), Value::str("Notes"));
        assert_eq!(resolve("missing.deeper", &scopes, &data), Value::Absent);
    }

    #[test]
    fn test_innermost_scope_wins() {
        let data = data();
        let scopes = vec![
            Scope::new(Value::Absent),
            Scope::new(Value::Post(&data.posts[1])).with_iteration(Iteration::new(1, 2)),
        ];

        assert_eq!(resolve("title", &scopes, &data), Value::str("B"));
        assert_eq!(resolve("@index", &scopes, &data), Value::Int(1));
        assert_eq!(resolve("../title", &scopes, &data), Value::str("Notes"));
    }

    #[test]
    fn test_parent_prefix_equals_dropping_innermost_scope() {
        let data = data();
        let scopes = vec![
            Scope::new(Value::Absent),
            Scope::new(Value::Post(&data.posts[0])),
            Scope::new(Value::Post(&data.posts[1])).with_iteration(Iteration::new(1, 2)),
        ];

        for path in ["title", "pagination.total", "@index", "this", "posts.length"] {
            for depth in 0..scopes.len() {
                let prefixed = format!("{}{}", "../".repeat(depth + 1), path);
                let trimmed = &scopes[..scopes.len() - 1];
                let expected = resolve(&format!("{}{}", "../".repeat(depth), path), trimmed, &data);
                assert_eq!(resolve(&prefixed, &scopes, &data), expected, "{}", prefixed);
            }
        }
    }

    #[test]
    fn test_too_many_parents_is_absent() {
        let data = data();
        let scopes = vec![Scope::new(Value::Absent)];

        assert_eq!(resolve("../pagination.total", &scopes, &data), Value::Int(4));
        assert_eq!(resolve("../../pagination.total", &scopes, &data), Value::Absent);
    }

    #[test]
    fn test_dot_slash_reads_the_current_subject() {
        let data = data();
        let scopes = vec![
            Scope::new(Value::Absent),
            Scope::new(Value::Post(&data.posts[1])).with_iteration(Iteration::new(1, 2)),
        ];

        assert_eq!(resolve("./title", &scopes, &data), Value::str("B"));
        assert_eq!(resolve("./title", &scopes, &data), resolve("this.title", &scopes, &data));
        assert_eq!(resolve("../posts.length", &scopes, &data), Value::Int(2));
        assert_eq!(resolve("./pagination", &scopes, &data), Value::Absent);
    }

    #[test]
    fn test_split_parents() {
        assert_eq!(split_parents("../../a.b"), (2, "a.b"));
        assert_eq!(split_parents("a"), (0, "a"));
        assert_eq!(split_parents(".."), (1, ""));
    }
}
