//! Integration Tests for the view server
//!
//! Wires the server from configuration over a temporary directory tree and
//! exercises the full request/response cycle.

use std::fs;
use std::path::Path;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;
use view_resolver::{api::create_router, AppState, Config};

// == Helper Functions ==

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative.trim_start_matches('/'));
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// Builds a web root with host views, a plugin view and a legacy forwarded page.
fn web_root() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("web-app");
    write(&root, "/WEB-INF/grails-app/views/book/list.gsp", "<ul>${title}</ul>");
    write(&root, "/WEB-INF/grails-app/views/book/list.json.gsp", "{\"title\":\"${title}\"}");
    write(
        &root,
        "/WEB-INF/plugins/blog-0.3/grails-app/views/post/show.gsp",
        "<article>${id}</article>",
    );
    write(&root, "/WEB-INF/grails-app/views/legacy/about.jsp", "about us");
    write(
        dir.path(),
        "plugins.json",
        r#"[{"name": "blog", "version": "0.3", "controllers": ["post"]}]"#,
    );
    dir
}

fn config_for(dir: &TempDir) -> Config {
    Config {
        views_root: dir.path().join("web-app"),
        plugin_manifest: Some(dir.path().join("plugins.json")),
        ..Config::default()
    }
}

fn create_test_app(config: &Config) -> Router {
    create_router(AppState::from_config(config).unwrap())
}

async fn get(app: Router, uri: &str, accept: Option<&str>) -> (StatusCode, Option<String>, String) {
    let mut builder = Request::builder().uri(uri);
    if let Some(accept) = accept {
        builder = builder.header(header::ACCEPT, accept);
    }
    let response = app.oneshot(builder.body(Body::empty()).unwrap()).await.unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|v| v.to_str().unwrap().to_string());
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, content_type, String::from_utf8(bytes.to_vec()).unwrap())
}

// == Template Resolution ==

#[tokio::test]
async fn test_renders_host_template() {
    let dir = web_root();
    let app = create_test_app(&config_for(&dir));

    let (status, content_type, body) = get(app, "/book/list?title=Dune", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("text/html;charset=UTF-8"));
    assert_eq!(body, "<ul>Dune</ul>");
}

#[tokio::test]
async fn test_accept_header_selects_format_template() {
    let dir = web_root();
    let app = create_test_app(&config_for(&dir));

    let (status, content_type, body) =
        get(app, "/book/list?title=Dune", Some("application/json")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("application/json;charset=UTF-8"));
    assert_eq!(body, r#"{"title":"Dune"}"#);
}

#[tokio::test]
async fn test_unknown_format_falls_back_to_plain_template() {
    let dir = web_root();
    let app = create_test_app(&config_for(&dir));

    let (status, _, body) = get(app, "/book/list.rss?title=Dune", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "<ul>Dune</ul>");
}

#[tokio::test]
async fn test_plugin_controller_uses_plugin_views() {
    let dir = web_root();
    let app = create_test_app(&config_for(&dir));

    let (status, _, body) = get(app, "/post/show?id=7", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "<article>7</article>");
}

#[tokio::test]
async fn test_plugin_views_need_manifest() {
    let dir = web_root();
    let config = Config {
        plugin_manifest: None,
        ..config_for(&dir)
    };
    let app = create_test_app(&config);

    let (status, _, _) = get(app, "/post/show?id=7", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_forwarded_page_served_raw() {
    let dir = web_root();
    let app = create_test_app(&config_for(&dir));

    let (status, _, body) = get(app, "/legacy/about", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "about us");
}

#[tokio::test]
async fn test_json_model_when_no_template() {
    let dir = web_root();
    let app = create_test_app(&config_for(&dir));

    let (status, content_type, body) = get(app, "/author/show.json?name=Herbert", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("application/json"));
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["name"], "Herbert");
}

#[tokio::test]
async fn test_missing_view_returns_json_error() {
    let dir = web_root();
    let app = create_test_app(&config_for(&dir));

    let (status, _, body) = get(app, "/nothing/here", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert!(json["error"].as_str().unwrap().contains("here.jsp"));
}

// == Live Template Source ==

#[tokio::test]
async fn test_live_template_source_preferred_in_development() {
    let dir = web_root();
    let live = dir.path().join("live");
    write(&live, "/WEB-INF/grails-app/views/book/list.gsp", "live ${title}");

    let config = Config {
        development: true,
        reload_enabled: true,
        template_source_root: Some(live),
        ..config_for(&dir)
    };
    let app = create_test_app(&config);

    let (_, _, body) = get(app, "/book/list?title=Dune", None).await;
    assert_eq!(body, "live Dune");
}

#[tokio::test]
async fn test_live_template_source_ignored_when_packaged() {
    let dir = web_root();
    let live = dir.path().join("live");
    write(&live, "/WEB-INF/grails-app/views/book/list.gsp", "live ${title}");

    let config = Config {
        packaged: true,
        template_source_root: Some(live),
        ..config_for(&dir)
    };
    let app = create_test_app(&config);

    let (_, _, body) = get(app, "/book/list?title=Dune", None).await;
    assert_eq!(body, "<ul>Dune</ul>");
}

// == Caching ==

#[tokio::test]
async fn test_cached_view_survives_template_removal() {
    let dir = web_root();
    let config = config_for(&dir);
    let state = AppState::from_config(&config).unwrap();
    let app = create_router(state.clone());

    let (status, _, _) = get(app.clone(), "/book/list?title=a", None).await;
    assert_eq!(status, StatusCode::OK);

    // Swap the template for a forwarded page. The cached template view is still
    // used, so the missing template surfaces instead of the forwarded page.
    fs::remove_file(dir.path().join("web-app/WEB-INF/grails-app/views/book/list.gsp")).unwrap();
    write(
        &dir.path().join("web-app"),
        "/WEB-INF/grails-app/views/book/list.jsp",
        "forwarded",
    );
    let (status, _, body) = get(app.clone(), "/book/list", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_ne!(body, "forwarded");

    let (_, _, stats) = get(app, "/stats", None).await;
    let stats: Value = serde_json::from_str(&stats).unwrap();
    assert_eq!(stats["cache_enabled"], true);
    assert_eq!(stats["resolver_cache"]["hits"], 1);
    assert_eq!(stats["views"][0]["name"], "/book/list");
    assert_eq!(stats["views"][0]["kind"], "template");
}

#[tokio::test]
async fn test_development_mode_skips_resolver_cache() {
    let dir = web_root();
    let config = Config {
        development: true,
        reload_enabled: true,
        ..config_for(&dir)
    };
    let app = create_test_app(&config);

    get(app.clone(), "/book/list?title=a", None).await;
    get(app.clone(), "/book/list?title=b", None).await;

    let (_, _, stats) = get(app, "/stats", None).await;
    let stats: Value = serde_json::from_str(&stats).unwrap();
    assert_eq!(stats["cache_enabled"], false);
    assert_eq!(stats["resolver_cache"]["total_entries"], 0);
    assert_eq!(stats["view_cache"]["stores"], 2);
}

#[tokio::test]
async fn test_clear_cache_endpoint() {
    let dir = web_root();
    let app = create_test_app(&config_for(&dir));

    get(app.clone(), "/book/list", None).await;
    get(app.clone(), "/book/list", Some("application/json")).await;

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/cache")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&bytes).unwrap();
    // Both requests share the "/book/list_en" key.
    assert_eq!(json["removed"], 1);
}

#[tokio::test]
async fn test_invalid_manifest_fails_wiring() {
    let dir = web_root();
    write(dir.path(), "plugins.json", "not json");

    let result = AppState::from_config(&config_for(&dir));
    assert!(result.is_err());
}
