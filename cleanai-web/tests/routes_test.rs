use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use serde_json::Value;
use std::time::Duration;
use tempfile::TempDir;
use tower::ServiceExt;

use cleanai_core::AppConfig;
use cleanai_core::config::TyperConfig;
use cleanai_web::{bootstrap, routes};

const BOUNDARY: &str = "cleanai-test-boundary";

fn fast_typer() -> TyperConfig {
    TyperConfig {
        char_delay_ms: 1,
        pause_ms: 2,
        total_duration_ms: 30,
        ..TyperConfig::default()
    }
}

fn test_config(assets: &TempDir, typer: TyperConfig) -> AppConfig {
    let mut config = AppConfig::default();
    config.assets.dir = assets.path().to_path_buf();
    config.typer = typer;
    config
}

fn app_with(assets: &TempDir, typer: TyperConfig) -> Router {
    routes::router(bootstrap(&test_config(assets, typer)).unwrap())
}

fn app(assets: &TempDir) -> Router {
    app_with(assets, fast_typer())
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn get(app: &Router, uri: &str) -> axum::response::Response {
    app.clone()
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn post_empty(app: &Router, uri: &str) -> axum::response::Response {
    app.clone()
        .oneshot(Request::post(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn view_json(app: &Router) -> Value {
    serde_json::from_str(&body_text(get(app, "/api/view").await).await).unwrap()
}

/// Splits a finished SSE body into `(event, data)` pairs.
fn sse_events(body: &str) -> Vec<(String, String)> {
    body.split("\n\n")
        .filter_map(|block| {
            let mut event = None;
            let mut data = None;
            for line in block.lines() {
                if let Some(value) = line.strip_prefix("event: ") {
                    event = Some(value.to_string());
                } else if let Some(value) = line.strip_prefix("data: ") {
                    data = Some(value.to_string());
                }
            }
            Some((event?, data.unwrap_or_default()))
        })
        .collect()
}

async fn wait_for_replies(app: &Router) -> Value {
    for _ in 0..200 {
        let view = view_json(app).await;
        if view["awaiting_reply"] == false {
            return view;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("assistant never replied");
}

fn multipart_body(files: &[(&str, usize)]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, size) in files {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"files\"; filename=\"{name}\"\r\n\
                 Content-Type: text/csv\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend(std::iter::repeat_n(b'x', *size));
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

async fn upload(app: &Router, files: &[(&str, usize)]) -> axum::response::Response {
    let request = Request::post("/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(files)))
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

async fn wait_for_page(app: &Router, page: &str) -> Value {
    for _ in 0..200 {
        let view = view_json(app).await;
        if view["page"] == page {
            return view;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("page never became {page}");
}

fn assert_redirects_home(response: &axum::response::Response) {
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/");
}

#[tokio::test]
async fn test_home_is_the_first_page() {
    let assets = tempfile::tempdir().unwrap();
    let app = app(&assets);

    let response = get(&app, "/").await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains(r#"action="/start""#));
    assert_eq!(view_json(&app).await["page"], "home");
}

#[tokio::test]
async fn test_full_workflow() {
    let assets = tempfile::tempdir().unwrap();
    let app = app(&assets);

    assert_redirects_home(&post_empty(&app, "/start").await);
    assert_eq!(view_json(&app).await["page"], "upload");

    let response = upload(&app, &[("half.csv", 524_288), ("double.csv", 2_097_152)]).await;
    assert_redirects_home(&response);

    let view = view_json(&app).await;
    assert_eq!(view["page"], "upload");
    assert_eq!(view["can_proceed"], true);
    assert_eq!(view["files"].as_array().unwrap().len(), 1);
    assert_eq!(view["files"][0]["name"], "half.csv");
    let html = body_text(get(&app, "/").await).await;
    assert!(html.contains("double.csv is 2.00 MB; files must be smaller than 1.00 MB."));
    assert!(html.contains(r#"action="/proceed""#));

    assert_redirects_home(&post_empty(&app, "/proceed").await);
    let view = view_json(&app).await;
    assert!(view["page"] == "loading" || view["page"] == "chat");

    let view = wait_for_page(&app, "chat").await;
    let before = view["bubbles"].as_array().unwrap().len();

    let request = Request::post("/chat")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("message=%3Cb%3Ehello%3C%2Fb%3E"))
        .unwrap();
    assert_redirects_home(&app.clone().oneshot(request).await.unwrap());

    let view = wait_for_replies(&app).await;
    let bubbles = view["bubbles"].as_array().unwrap();
    assert_eq!(bubbles.len(), before + 2);
    assert_eq!(bubbles[before]["alignment"], "right");
    assert_eq!(bubbles[before + 1]["alignment"], "left");

    let html = body_text(get(&app, "/").await).await;
    assert!(html.contains("&lt;b&gt;hello&lt;/b&gt;"));
    assert!(!html.contains("<b>hello</b>"));
    assert!(html.contains("noted your request"));
}

#[tokio::test]
async fn test_unavailable_action_keeps_view() {
    let assets = tempfile::tempdir().unwrap();
    let app = app(&assets);

    assert_redirects_home(&post_empty(&app, "/proceed").await);
    assert_eq!(view_json(&app).await["page"], "home");

    post_empty(&app, "/start").await;
    assert_redirects_home(&post_empty(&app, "/proceed").await);
    let view = view_json(&app).await;
    assert_eq!(view["page"], "upload");
    assert_eq!(view["can_proceed"], false);
}

#[tokio::test]
async fn test_empty_selection_keeps_proceed_hidden() {
    let assets = tempfile::tempdir().unwrap();
    let app = app(&assets);
    post_empty(&app, "/start").await;

    upload(&app, &[("", 0)]).await;

    let view = view_json(&app).await;
    assert_eq!(view["files"].as_array().unwrap().len(), 0);
    assert_eq!(view["can_proceed"], false);
}

#[tokio::test]
async fn test_oversized_upload_becomes_inline_warning() {
    let assets = tempfile::tempdir().unwrap();
    let app = app(&assets);
    post_empty(&app, "/start").await;

    let response = upload(&app, &[("huge.csv", 70 * 1_048_576), ("small.csv", 64)]).await;
    assert_redirects_home(&response);

    let view = view_json(&app).await;
    assert_eq!(view["page"], "upload");
    let files = view["files"].as_array().unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0]["name"], "small.csv");
    assert_eq!(
        view["rejections"][0],
        "huge.csv is 70.00 MB; files must be smaller than 1.00 MB."
    );
    assert_eq!(view["can_proceed"], true);
}

#[tokio::test]
async fn test_loading_events_stream_frames_then_done() {
    let assets = tempfile::tempdir().unwrap();
    let app = app_with(
        &assets,
        TyperConfig {
            char_delay_ms: 5,
            pause_ms: 20,
            total_duration_ms: 400,
            ..TyperConfig::default()
        },
    );
    post_empty(&app, "/start").await;
    upload(&app, &[("a.csv", 64)]).await;
    assert_redirects_home(&post_empty(&app, "/proceed").await);
    assert_eq!(view_json(&app).await["page"], "loading");

    let body = body_text(get(&app, "/loading/events").await).await;

    let events = sse_events(&body);
    let revealed = events.iter().position(|(event, data)| {
        event == "frame"
            && serde_json::from_str::<Value>(data)
                .map(|frame| frame["text"].as_str().is_some_and(|text| !text.is_empty()))
                .unwrap_or(false)
    });
    let done = events.iter().position(|(event, _)| event == "done");
    let (Some(revealed), Some(done)) = (revealed, done) else {
        panic!("expected a revealed frame and a done event, got {events:?}");
    };
    assert!(revealed < done);
    assert_eq!(done, events.len() - 1);
    assert_eq!(view_json(&app).await["page"], "chat");
}

#[tokio::test]
async fn test_loading_events_finish_outside_loading() {
    let assets = tempfile::tempdir().unwrap();
    let app = app(&assets);

    let response = get(&app, "/loading/events").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/event-stream")
    );
    let body = body_text(response).await;
    assert!(body.contains("event: done"));
}

#[tokio::test]
async fn test_assets_are_served_from_catalog_only() {
    let assets = tempfile::tempdir().unwrap();
    std::fs::write(assets.path().join("illustration.png"), b"\x89PNG").unwrap();
    std::fs::write(assets.path().join("notes.txt"), b"private").unwrap();
    let app = app(&assets);

    let response = get(&app, "/assets/illustration.png").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");

    assert_eq!(
        get(&app, "/assets/notes.txt").await.status(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        get(&app, "/assets/background.jpg").await.status(),
        StatusCode::NOT_FOUND
    );
}
