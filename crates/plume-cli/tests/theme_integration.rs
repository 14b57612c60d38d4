// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Integration tests for the render and check commands against a theme on disk.

use std::fs;
use std::path::Path;

use tempfile::tempdir;

use plume_cli::commands::check::check_theme;
use plume_cli::commands::render::{self, render_page, RenderOptions};
use plume_cli::config::{Config, Overrides, CONFIG_FILE};

/// Create a small Casper-like theme in a temp directory
fn setup_theme(dir: &Path) {
    fs::create_dir_all(dir.join("partials")).unwrap();

    let layout = r#"<!DOCTYPE html>
<html>
<head><title>{{meta_title}}</title>{{ghost_head}}<link rel="stylesheet" href="{{asset "css/screen.css"}}"></head>
<body class="{{body_class}}">
{{navigation}}
{{{body}}}
<footer>{{#block "footer"}}{{@blog.title}}{{/block}}</footer>
{{ghost_foot}}
</body>
</html>"#;
    fs::write(dir.join("default.hbs"), layout).unwrap();

    let index = r#"{{!< default}}
<main>{{#foreach posts}}{{> loop}}{{/foreach}}</main>
{{pagination}}"#;
    fs::write(dir.join("index.hbs"), index).unwrap();

    let post = r#"{{!< default}}
{{#post}}<article class="{{post_class}}"><h1>{{title}}</h1><time>{{date format="YYYY-MM-DD"}}</time>{{content}}</article>{{/post}}
{{#contentFor "footer"}}Posted by {{author}}{{/contentFor}}"#;
    fs::write(dir.join("post.hbs"), post).unwrap();

    let loop_partial = r#"<h2><a href="{{url}}">{{title}}</a></h2>"#;
    fs::write(dir.join("partials/loop.hbs"), loop_partial).unwrap();
}

fn write_data(dir: &Path) -> std::path::PathBuf {
    let data = r#"{
        "blog": {"title": "Field Notes", "url": "https://notes.example", "description": "Notes"},
        "posts": [
            {"title": "First", "slug": "first"},
            {"title": "Second", "slug": "second"}
        ],
        "post": {
            "title": "Hello <World>",
            "slug": "hello-world",
            "html": "<p>Body</p>",
            "published_at": "2024-03-02T15:04:05Z",
            "author": {"name": "Ada", "slug": "ada"}
        },
        "navigation": [{"label": "Home", "url": "/", "is_current": true}],
        "pagination": {"page": 1, "pages": 2, "base_url": "/"},
        "kind": "index"
    }"#;
    let path = dir.join("request.json");
    fs::write(&path, data).unwrap();
    path
}

fn config_for(theme_dir: &Path) -> Config {
    Config::default().with_overrides(&Overrides {
        theme_dir: Some(theme_dir.to_path_buf()),
        ..Overrides::default()
    })
}

#[test]
fn test_render_index_page() {
    let dir = tempdir().unwrap();
    let theme_dir = dir.path().join("theme");
    setup_theme(&theme_dir);
    let data = write_data(dir.path());

    let page = render_page(&config_for(&theme_dir), "index", &data).unwrap();

    assert!(page.diagnostics.is_empty(), "{:?}", page.diagnostics);
    assert!(page.html.starts_with("<!DOCTYPE html>"));
    assert!(page.html.contains("<title>Hello &lt;World&gt;</title>"));
    assert!(page.html.contains(r#"href="/assets/css/screen.css""#));
    assert!(page.html.contains(r#"<h2><a href="/first/">First</a></h2><h2><a href="/second/">Second</a></h2>"#));
    assert!(page.html.contains(r#"<a class="older-posts" href="/page/2/">"#));
    assert!(page.html.contains(r#"<li class="nav-home nav-current" role="presentation">"#));
    assert!(page.html.contains("<footer>Field Notes</footer>"));
}

#[test]
fn test_render_post_page_with_content_for() {
    let dir = tempdir().unwrap();
    let theme_dir = dir.path().join("theme");
    setup_theme(&theme_dir);
    let data = write_data(dir.path());

    let page = render_page(&config_for(&theme_dir), "post", &data).unwrap();

    assert!(page.html.contains("<h1>Hello &lt;World&gt;</h1>"));
    assert!(page.html.contains("<time>2024-03-02</time><p>Body</p>"));
    assert!(page.html.contains("<footer>Posted by Ada</footer>"));
}

#[test]
fn test_render_writes_output_file() {
    let dir = tempdir().unwrap();
    let theme_dir = dir.path().join("theme");
    setup_theme(&theme_dir);
    let data = write_data(dir.path());
    let output = dir.path().join("out/index.html");
    fs::create_dir_all(output.parent().unwrap()).unwrap();

    let config = config_for(&theme_dir).with_overrides(&Overrides {
        asset_base: Some("https://cdn.example/casper".to_string()),
        ..Overrides::default()
    });
    render::run(
        &config,
        &RenderOptions {
            template: "index".to_string(),
            data,
            output: Some(output.clone()),
        },
    )
    .unwrap();

    let html = fs::read_to_string(&output).unwrap();
    assert!(html.contains(r#"href="https://cdn.example/casper/css/screen.css""#));
}

#[test]
fn test_render_with_diagnostics_still_writes_page() {
    let dir = tempdir().unwrap();
    let theme_dir = dir.path().join("theme");
    setup_theme(&theme_dir);
    fs::write(theme_dir.join("sloppy.hbs"), "a{{> nowhere}}b{{frobnicate 1}}c").unwrap();
    let data = write_data(dir.path());
    let output = dir.path().join("sloppy.html");

    let page = render_page(&config_for(&theme_dir), "sloppy", &data).unwrap();
    assert_eq!(page.diagnostics.len(), 2);

    render::run(
        &config_for(&theme_dir),
        &RenderOptions {
            template: "sloppy".to_string(),
            data,
            output: Some(output.clone()),
        },
    )
    .unwrap();
    assert_eq!(fs::read_to_string(&output).unwrap(), "abc");
}

#[test]
fn test_render_reports_fatal_errors() {
    let dir = tempdir().unwrap();
    let theme_dir = dir.path().join("theme");
    setup_theme(&theme_dir);
    fs::write(theme_dir.join("broken.hbs"), "{{!< missing-layout}}x").unwrap();
    let data = write_data(dir.path());

    let error = render_page(&config_for(&theme_dir), "broken", &data).unwrap_err();
    assert!(format!("{:#}", error).contains("missing-layout"));
}

#[test]
fn test_check_collects_every_problem() {
    let dir = tempdir().unwrap();
    let theme_dir = dir.path().join("theme");
    setup_theme(&theme_dir);

    let report = check_theme(&config_for(&theme_dir)).unwrap();
    assert!(report.is_ok(), "{:?}", report.errors);
    assert_eq!(report.compiled, 4);

    fs::write(theme_dir.join("tag.hbs"), "{{#foreach posts}}unclosed").unwrap();
    fs::write(theme_dir.join("author.hbs"), "{{!< nowhere}}").unwrap();

    let report = check_theme(&config_for(&theme_dir)).unwrap();
    assert_eq!(report.compiled, 5);
    assert_eq!(report.errors.len(), 2, "{:?}", report.errors);
    assert!(report.errors.iter().any(|e| e.contains("nowhere")));
}

#[test]
fn test_config_file_supplies_theme_dir() {
    let dir = tempdir().unwrap();
    let theme_dir = dir.path().join("themes/casper");
    setup_theme(&theme_dir);
    let config_path = dir.path().join(CONFIG_FILE);
    fs::write(
        &config_path,
        format!("[theme]\ndir = {:?}\n\n[render]\nmax_depth = 4\n", theme_dir.display().to_string()),
    )
    .unwrap();

    let config = Config::load_from(&config_path).unwrap();
    assert_eq!(config.theme.dir, theme_dir);
    assert_eq!(config.engine_config().max_depth, 4);
    assert!(check_theme(&config).unwrap().is_ok());
}

#[test]
fn test_check_missing_theme_dir() {
    let dir = tempdir().unwrap();
    assert!(check_theme(&config_for(&dir.path().join("absent"))).is_err());
}
