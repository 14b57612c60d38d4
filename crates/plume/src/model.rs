// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Request-scoped blog data.
//!
//! [`RequestData`] is built once per request by the persistence layer and is
//! read-only while a page renders. All types deserialize from JSON so the
//! CLI and tests can load fixtures.

use chrono::{DateTime, Utc};
use deunicode::deunicode;
use serde::{Deserialize, Serialize};

/// Site-wide settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Blog {
    /// Blog title.
    pub title: String,
    /// Absolute base URL without trailing slash, e.g. `https://example.com`.
    pub url: String,
    /// Logo image URL.
    pub logo: String,
    /// Cover image URL.
    pub cover: String,
    /// Short description.
    pub description: String,
    /// Attribution text shown in theme footers.
    pub powered_by_text: String,
    /// Attribution link shown in theme footers.
    pub powered_by_link: String,
    /// Raw HTML injected by `ghost_head`.
    pub code_injection_head: String,
    /// Raw HTML injected by `ghost_foot`.
    pub code_injection_foot: String,
}

/// A blog post or static page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Post {
    /// Database id.
    pub id: i64,
    /// Stable public id.
    pub uuid: String,
    /// Post title.
    pub title: String,
    /// URL slug.
    pub slug: String,
    /// Rendered HTML body.
    pub html: String,
    /// Cover image URL.
    pub image: String,
    /// Description for `<meta name="description">`.
    pub meta_description: String,
    /// Featured posts get the `featured` class.
    pub is_featured: bool,
    /// Static pages render with `page-template` and are excluded from listings upstream.
    pub is_page: bool,
    /// Publication time; drafts have none.
    pub published_at: Option<DateTime<Utc>>,
    /// View count.
    pub hits: i64,
    /// Tags in display order.
    pub tags: Vec<Tag>,
    /// The post's author.
    pub author: Option<Author>,
}

impl Post {
    /// Relative URL of the post.
    pub fn url(&self) -> String {
        format!("/{}/", self.slug)
    }
}

/// A post tag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tag {
    /// Database id.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// URL slug.
    pub slug: String,
}

impl Tag {
    /// Relative URL of the tag archive.
    pub fn url(&self) -> String {
        format!("/tag/{}/", self.slug)
    }
}

/// A post author.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Author {
    /// Database id.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// URL slug.
    pub slug: String,
    /// Contact address.
    pub email: String,
    /// Profile picture URL.
    pub image: String,
    /// Cover image URL.
    pub cover: String,
    /// Short biography.
    pub bio: String,
    /// Personal site.
    pub website: String,
    /// Free-form location.
    pub location: String,
}

impl Author {
    /// Relative URL of the author archive.
    pub fn url(&self) -> String {
        format!("/author/{}/", self.slug)
    }
}

/// One entry of the blog navigation menu.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavItem {
    /// Menu text.
    pub label: String,
    /// Link target.
    pub url: String,
    /// Set by the request layer when `url` matches the requested path.
    pub is_current: bool,
}

impl NavItem {
    /// CSS-friendly slug derived from the label.
    pub fn slug(&self) -> String {
        slugify(&self.label)
    }
}

/// Pagination state of a listing page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pagination {
    /// Current page, 1-indexed.
    pub page: u32,
    /// Total number of pages.
    pub pages: u32,
    /// URL of the first page of this listing, e.g. `/` or `/tag/rust/`.
    pub base_url: String,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            pages: 1,
            base_url: "/".to_string(),
        }
    }
}

impl Pagination {
    /// Whether a newer page exists.
    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    /// Whether an older page exists.
    pub fn has_next(&self) -> bool {
        self.page < self.pages
    }

    /// URL of an arbitrary page of this listing.
    pub fn page_url(&self, page: u32) -> String {
        let base = if self.base_url.ends_with('/') {
            self.base_url.clone()
        } else {
            format!("{}/", self.base_url)
        };
        if page <= 1 {
            base
        } else {
            format!("{}page/{}/", base, page)
        }
    }

    /// URL of the previous page, if any.
    pub fn prev_url(&self) -> Option<String> {
        self.has_prev().then(|| self.page_url(self.page - 1))
    }

    /// URL of the next page, if any.
    pub fn next_url(&self) -> Option<String> {
        self.has_next().then(|| self.page_url(self.page + 1))
    }
}

/// Which kind of page is being rendered; drives `body_class`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageKind {
    /// Home page or post listing.
    #[default]
    Index,
    /// A single post.
    Post,
    /// A static page.
    Page,
    /// A tag archive.
    Tag,
    /// An author archive.
    Author,
}

/// Everything a page render can read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestData {
    /// Blog-wide settings.
    pub blog: Blog,
    /// The post of a single-post page.
    pub post: Option<Post>,
    /// Posts of a listing page, in display order.
    pub posts: Vec<Post>,
    /// The tag of a tag archive.
    pub tag: Option<Tag>,
    /// The author of an author archive.
    pub author: Option<Author>,
    /// The navigation menu.
    pub navigation: Vec<NavItem>,
    /// Pagination of a listing page.
    pub pagination: Pagination,
    /// Every tag of the blog, for tag clouds.
    pub all_tags: Vec<Tag>,
    /// Related posts suggested on a post page.
    pub recommends: Vec<Post>,
    /// The post published before the current one.
    pub prev_post: Option<Post>,
    /// The post published after the current one.
    pub next_post: Option<Post>,
    /// Which kind of page this is.
    pub kind: PageKind,
    /// Request time; the reference point for `date` defaults and `timeago`.
    pub now: DateTime<Utc>,
}

impl Default for RequestData {
    fn default() -> Self {
        Self {
            blog: Blog::default(),
            post: None,
            posts: Vec::new(),
            tag: None,
            author: None,
            navigation: Vec::new(),
            pagination: Pagination::default(),
            all_tags: Vec::new(),
            recommends: Vec::new(),
            prev_post: None,
            next_post: None,
            kind: PageKind::Index,
            now: Utc::now(),
        }
    }
}

impl RequestData {
    /// Creates request data for the given blog.
    pub fn new(blog: Blog) -> Self {
        Self {
            blog,
            ..Self::default()
        }
    }
}

/// Lowercase ASCII slug: transliterated, alphanumerics kept, runs of anything else become `-`.
pub fn slugify(text: &str) -> String {
    let transliterated = deunicode(text).to_lowercase();
    let mut slug = String::with_capacity(transliterated.len());
    for c in transliterated.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}
