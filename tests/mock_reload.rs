//! End-to-end mock middleware scenarios: initial load, manual reload,
//! error accumulation, and watch-driven hot reload.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use devmock::config::Document;
use devmock::mock::{shared_errors, MockMiddleware, MockOptions};
use tempfile::TempDir;
use tower::ServiceExt;

fn project(dir: &TempDir) -> PathBuf {
    let pages = dir.path().join("src/pages");
    fs::create_dir_all(&pages).unwrap();
    fs::create_dir_all(dir.path().join("mock")).unwrap();
    pages
}

fn options(dir: &TempDir, pages: &Path, watch: bool) -> MockOptions {
    MockOptions {
        cwd: dir.path().to_path_buf(),
        pages_dir: pages.to_path_buf(),
        src_dir: dir.path().join("src"),
        config: Document::new(),
        errors: shared_errors(),
        watch,
        on_start: None,
    }
}

fn app(middleware: &MockMiddleware) -> Router {
    Router::new()
        .fallback(|| async { "fallthrough" })
        .layer(middleware.layer())
}

async fn body_of(app: &Router, path: &str) -> (StatusCode, String) {
    let request = Request::builder().uri(path).body(Body::empty()).unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn serves_mocks_after_initial_load() {
    let dir = TempDir::new().unwrap();
    let pages = project(&dir);
    fs::write(
        dir.path().join("mock/api.toml"),
        "\"GET /api/users\" = [\"alice\", \"bob\"]\n",
    )
    .unwrap();

    let middleware = MockMiddleware::new(options(&dir, &pages, false)).unwrap();
    let app = app(&middleware);

    let (status, body) = body_of(&app, "/api/users").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"["alice","bob"]"#);

    let (_, body) = body_of(&app, "/api/other").await;
    assert_eq!(body, "fallthrough");
}

#[tokio::test]
async fn on_start_receives_the_watched_path_set() {
    let dir = TempDir::new().unwrap();
    let pages = project(&dir);

    let seen: Arc<Mutex<Vec<PathBuf>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let mut opts = options(&dir, &pages, false);
    opts.on_start = Some(Box::new(move |paths| {
        sink.lock().unwrap().extend(paths.iter().cloned());
    }));

    MockMiddleware::new(opts).unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 4);
    assert!(seen.contains(&dir.path().join("mock")));
    assert!(seen.contains(&dir.path().join(".devmockrc.toml")));
    assert!(seen.contains(&dir.path().join(".devmockrc.json")));
    // src_dir's basename is `src`, so it replaces the pages dir.
    assert!(seen.contains(&dir.path().join("src")));
}

#[tokio::test]
async fn manual_reload_swaps_the_table_wholesale() {
    let dir = TempDir::new().unwrap();
    let pages = project(&dir);
    let mock_file = dir.path().join("mock/api.json");
    fs::write(&mock_file, r#"{"GET /api/old": {"v": 1}}"#).unwrap();

    let middleware = MockMiddleware::new(options(&dir, &pages, false)).unwrap();
    let app = app(&middleware);

    let (status, _) = body_of(&app, "/api/old").await;
    assert_eq!(status, StatusCode::OK);

    fs::write(&mock_file, r#"{"GET /api/new": {"v": 2}}"#).unwrap();
    middleware.reload();

    // The swap is wholesale: the old route is gone, the new one serves.
    let (_, body) = body_of(&app, "/api/old").await;
    assert_eq!(body, "fallthrough");
    let (status, body) = body_of(&app, "/api/new").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"v":2}"#);
}

#[tokio::test]
async fn broken_file_fills_the_error_list_but_keeps_other_routes() {
    let dir = TempDir::new().unwrap();
    let pages = project(&dir);
    fs::write(
        dir.path().join("mock/good.json"),
        r#"{"GET /api/ok": {"ok": true}}"#,
    )
    .unwrap();
    let bad = dir.path().join("mock/bad.json");
    fs::write(&bad, "{broken").unwrap();

    let opts = options(&dir, &pages, false);
    let errors = opts.errors.clone();
    let middleware = MockMiddleware::new(opts).unwrap();
    let app = app(&middleware);

    assert_eq!(errors.lock().unwrap().len(), 1);
    let (status, _) = body_of(&app, "/api/ok").await;
    assert_eq!(status, StatusCode::OK);

    // Fixing the file and reloading clears the list.
    fs::write(&bad, r#"{"GET /api/fixed": 1}"#).unwrap();
    middleware.reload();
    assert!(errors.lock().unwrap().is_empty());
    let (status, _) = body_of(&app, "/api/fixed").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn watcher_hot_reloads_on_file_change() {
    let dir = TempDir::new().unwrap();
    let pages = project(&dir);
    let mock_file = dir.path().join("mock/api.json");
    fs::write(&mock_file, r#"{"GET /api/one": 1}"#).unwrap();

    let middleware = MockMiddleware::new(options(&dir, &pages, true)).unwrap();
    let app = app(&middleware);

    let (status, _) = body_of(&app, "/api/one").await;
    assert_eq!(status, StatusCode::OK);

    fs::write(&mock_file, r#"{"GET /api/two": 2}"#).unwrap();

    // The watcher reloads asynchronously; poll until the new table lands.
    for _ in 0..100 {
        let (_, body) = body_of(&app, "/api/two").await;
        if body == "2" {
            let (_, old) = body_of(&app, "/api/one").await;
            assert_eq!(old, "fallthrough");
            return;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    panic!("mock table was not hot-reloaded within 10s");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn watcher_picks_up_new_page_mock_files() {
    let dir = TempDir::new().unwrap();
    let pages = project(&dir);

    let middleware = MockMiddleware::new(options(&dir, &pages, true)).unwrap();
    let app = app(&middleware);

    let (_, body) = body_of(&app, "/api/home").await;
    assert_eq!(body, "fallthrough");

    fs::create_dir_all(pages.join("home")).unwrap();
    fs::write(
        pages.join("home/_mock.json"),
        r#"{"GET /api/home": {"title": "home"}}"#,
    )
    .unwrap();

    for _ in 0..100 {
        let (status, _) = body_of(&app, "/api/home").await;
        if status == StatusCode::OK {
            return;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    panic!("page mock file was not picked up within 10s");
}
