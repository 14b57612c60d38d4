// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Values flowing through a render.
//!
//! A [`Value`] is either a primitive, pre-rendered markup, or a borrowed view
//! of one of the [`crate::model`] entities. Entities expose their fields by
//! name through [`Value::field`], which is all the path resolver needs to
//! navigate `author.name` regardless of the concrete type.

use crate::model::{Author, Blog, NavItem, Pagination, Post, Tag};
use chrono::{DateTime, Utc};
use std::borrow::Cow;

/// A value produced by a helper or the path resolver.
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    /// Nothing was found. Renders empty and is falsy.
    Absent,
    /// A flag such as `featured` or `@first`.
    Bool(bool),
    /// A number such as `id` or `@index`.
    Int(i64),
    /// Plain text, HTML-escaped on output.
    Str(Cow<'a, str>),
    /// Markup that must be written as is.
    Safe(Cow<'a, str>),
    /// A timestamp, formatted by the `date` helper.
    Date(DateTime<Utc>),
    /// A post or static page.
    Post(&'a Post),
    /// A tag.
    Tag(&'a Tag),
    /// An author.
    Author(&'a Author),
    /// One navigation entry.
    NavItem(&'a NavItem),
    /// Pagination of a listing page.
    Pagination(&'a Pagination),
    /// Blog-wide settings, reachable as `@blog`.
    Blog(&'a Blog),
    /// A post collection; iterable.
    Posts(&'a [Post]),
    /// A tag collection; iterable.
    Tags(&'a [Tag]),
    /// The navigation menu; iterable.
    Navigation(&'a [NavItem]),
}

impl<'a> Value<'a> {
    /// Borrowed string value.
    pub fn str(s: &'a str) -> Self {
        Value::Str(Cow::Borrowed(s))
    }

    /// Owned string value.
    pub fn string(s: String) -> Self {
        Value::Str(Cow::Owned(s))
    }

    /// Owned markup value.
    pub fn safe(s: String) -> Self {
        Value::Safe(Cow::Owned(s))
    }

    /// Wraps an optional entity, mapping `None` to [`Value::Absent`].
    pub fn from_option<T>(value: Option<&'a T>, wrap: fn(&'a T) -> Value<'a>) -> Self {
        value.map(wrap).unwrap_or(Value::Absent)
    }

    /// Returns true for [`Value::Absent`].
    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Absent)
    }

    /// Truthiness used by `if`, `unless` and empty-collection checks.
    ///
    /// Falsy: absent, empty string, zero, `false`, empty collection.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Absent => false,
            Value::Bool(b) => *b,
            Value::Int(n) => *n != 0,
            Value::Str(s) | Value::Safe(s) => !s.is_empty(),
            Value::Posts(items) => !items.is_empty(),
            Value::Tags(items) => !items.is_empty(),
            Value::Navigation(items) => !items.is_empty(),
            Value::Date(_)
            | Value::Post(_)
            | Value::Tag(_)
            | Value::Author(_)
            | Value::NavItem(_)
            | Value::Pagination(_)
            | Value::Blog(_) => true,
        }
    }

    /// Whether the value is markup that bypasses escaping.
    pub fn is_safe(&self) -> bool {
        matches!(self, Value::Safe(_))
    }

    /// Text written to the output for this value, before escaping.
    pub fn to_text(&self) -> Cow<'a, str> {
        match *self {
            Value::Absent => Cow::Borrowed(""),
            Value::Bool(b) => Cow::Owned(b.to_string()),
            Value::Int(n) => Cow::Owned(n.to_string()),
            Value::Str(ref s) | Value::Safe(ref s) => s.clone(),
            Value::Date(d) => Cow::Owned(d.to_rfc3339()),
            Value::Post(post) => Cow::Borrowed(&post.title),
            Value::Tag(tag) => Cow::Borrowed(&tag.name),
            Value::Author(author) => Cow::Borrowed(&author.name),
            Value::NavItem(item) => Cow::Borrowed(&item.label),
            Value::Blog(blog) => Cow::Borrowed(&blog.title),
            Value::Pagination(_) | Value::Posts(_) | Value::Tags(_) | Value::Navigation(_) => {
                Cow::Borrowed("")
            }
        }
    }

    /// Integer view, parsing strings when needed.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            Value::Bool(b) => Some(*b as i64),
            Value::Str(s) | Value::Safe(s) => s.trim().parse().ok(),
            Value::Posts(items) => Some(items.len() as i64),
            Value::Tags(items) => Some(items.len() as i64),
            Value::Navigation(items) => Some(items.len() as i64),
            _ => None,
        }
    }

    /// Elements of a collection value, each wrapped as an entity value.
    ///
    /// Returns `None` when the value is not a collection.
    pub fn items(&self) -> Option<Vec<Value<'a>>> {
        match *self {
            Value::Posts(items) => Some(items.iter().map(Value::Post).collect()),
            Value::Tags(items) => Some(items.iter().map(Value::Tag).collect()),
            Value::Navigation(items) => Some(items.iter().map(Value::NavItem).collect()),
            _ => None,
        }
    }

    /// Looks up a named field of an entity value.
    ///
    /// Primitives and collections have no fields; a missing field is [`Value::Absent`].
    pub fn field(&self, name: &str) -> Value<'a> {
        match *self {
            Value::Post(post) => post_field(post, name),
            Value::Tag(tag) => match name {
                "id" => Value::Int(tag.id),
                "name" => Value::str(&tag.name),
                "slug" => Value::str(&tag.slug),
                "url" => Value::string(tag.url()),
                _ => Value::Absent,
            },
            Value::Author(author) => author_field(author, name),
            Value::NavItem(item) => match name {
                "label" => Value::str(&item.label),
                "url" => Value::str(&item.url),
                "current" | "is_current" => Value::Bool(item.is_current),
                "slug" => Value::string(item.slug()),
                _ => Value::Absent,
            },
            Value::Pagination(pagination) => match name {
                "page" => Value::Int(pagination.page as i64),
                "pages" | "total" => Value::Int(pagination.pages as i64),
                "prev" => Value::Bool(pagination.has_prev()),
                "next" => Value::Bool(pagination.has_next()),
                "prev_url" => pagination.prev_url().map(Value::string).unwrap_or(Value::Absent),
                "next_url" => pagination.next_url().map(Value::string).unwrap_or(Value::Absent),
                _ => Value::Absent,
            },
            Value::Blog(blog) => match name {
                "title" => Value::str(&blog.title),
                "url" => Value::str(&blog.url),
                "logo" => Value::str(&blog.logo),
                "cover" => Value::str(&blog.cover),
                "description" => Value::str(&blog.description),
                "PoweredByText" | "powered_by_text" => Value::str(&blog.powered_by_text),
                "PoweredByLink" | "powered_by_link" => Value::str(&blog.powered_by_link),
                _ => Value::Absent,
            },
            Value::Posts(items) => collection_field(items.len(), name),
            Value::Tags(items) => collection_field(items.len(), name),
            Value::Navigation(items) => collection_field(items.len(), name),
            _ => Value::Absent,
        }
    }
}

fn post_field<'a>(post: &'a Post, name: &str) -> Value<'a> {
    match name {
        "id" => Value::Int(post.id),
        "uuid" => Value::str(&post.uuid),
        "title" => Value::str(&post.title),
        "slug" => Value::str(&post.slug),
        "html" | "content" => Value::str(&post.html),
        "image" => Value::str(&post.image),
        "meta_description" => Value::str(&post.meta_description),
        "featured" | "is_featured" => Value::Bool(post.is_featured),
        "page" | "is_page" => Value::Bool(post.is_page),
        "published_at" | "date" => post.published_at.map(Value::Date).unwrap_or(Value::Absent),
        "hits" => Value::Int(post.hits),
        "tags" => Value::Tags(&post.tags),
        "author" => Value::from_option(post.author.as_ref(), Value::Author),
        "url" => Value::string(post.url()),
        _ => Value::Absent,
    }
}

fn author_field<'a>(author: &'a Author, name: &str) -> Value<'a> {
    match name {
        "id" => Value::Int(author.id),
        "name" => Value::str(&author.name),
        "slug" => Value::str(&author.slug),
        "email" => Value::str(&author.email),
        "image" => Value::str(&author.image),
        "cover" => Value::str(&author.cover),
        "bio" => Value::str(&author.bio),
        "website" => Value::str(&author.website),
        "location" => Value::str(&author.location),
        "url" => Value::string(author.url()),
        _ => Value::Absent,
    }
}

fn collection_field<'a>(len: usize, name: &str) -> Value<'a> {
    match name {
        "length" => Value::Int(len as i64),
        _ => Value::Absent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Post;

    #[test]
    fn test_truthiness() {
        assert!(!Value::Absent.is_truthy());
        assert!(!Value::str("").is_truthy());
        assert!(!Value::Int(0).is_truthy());
        assert!(!Value::Bool(false).is_truthy());
        assert!(!Value::Posts(&[]).is_truthy());

        assert!(Value::str("x").is_truthy());
        assert!(Value::Int(-1).is_truthy());
        assert!(Value::Bool(true).is_truthy());

        let post = Post::default();
        assert!(Value::Post(&post).is_truthy());
    }

    #[test]
    fn test_field_navigation() {
        let post = Post {
            title: "Hello".to_string(),
            slug: "hello".to_string(),
            author: Some(Author {
                name: "Ada".to_string(),
                ..Author::default()
            }),
            ..Post::default()
        };
        let value = Value::Post(&post);

        assert_eq!(value.field("title"), Value::str("Hello"));
        assert_eq!(value.field("url").to_text(), "/hello/");
        assert_eq!(value.field("author").field("name"), Value::str("Ada"));
        assert_eq!(value.field("missing"), Value::Absent);
        assert_eq!(Value::Int(3).field("anything"), Value::Absent);
    }

    #[test]
    fn test_items_wraps_elements() {
        let posts = vec![Post::default(), Post::default()];
        let items = Value::Posts(&posts).items().unwrap();
        assert_eq!(items.len(), 2);
        assert!(matches!(items[0], Value::Post(_)));
        assert!(Value::str("x").items().is_none());
    }
}
