//! Mock middleware: tower layer serving canned responses.
//!
//! # Responsibilities
//! - Build the middleware from a working directory and resolved config
//! - Perform the initial synchronous mock table load
//! - Wire the filesystem watcher to the reload path
//! - Serve a matching mock response or delegate to the inner service
//!
//! # Design Decisions
//! - The service reads the table through [`MockStore`]; the reload path is
//!   the only writer, so request handling is lock-free
//! - Load errors accumulate in a caller-visible shared list instead of
//!   failing requests: a broken mock file degrades mocking, not the server
//! - An unset table (before the first load) behaves as a universal miss

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use notify::RecommendedWatcher;
use tower::{Layer, Service};

use crate::config::cache::DocumentCache;
use crate::config::loader::Document;
use crate::mock::data::{load_mock_table, mock_paths, MockPaths, MockSources};
use crate::mock::store::MockStore;
use crate::mock::table::MockError;
use crate::mock::watcher::{self, WatchTargets};

/// Caller-visible list of errors accumulated by the last load.
pub type SharedErrors = Arc<Mutex<Vec<MockError>>>;

/// A fresh, empty error list.
pub fn shared_errors() -> SharedErrors {
    Arc::new(Mutex::new(Vec::new()))
}

/// Options for [`MockMiddleware::new`].
pub struct MockOptions {
    /// Project working directory; mock files live under `<cwd>/mock`.
    pub cwd: PathBuf,
    /// Absolute pages directory, scanned for per-page `_mock.*` files.
    pub pages_dir: PathBuf,
    /// Absolute source directory; watched instead of `pages_dir` when its
    /// basename is `src`.
    pub src_dir: PathBuf,
    /// Resolved project config (consulted for `mock.exclude`).
    pub config: Document,
    /// Shared error list, cleared and refilled on every reload.
    pub errors: SharedErrors,
    /// Watch the mock paths and hot-reload the table on changes.
    pub watch: bool,
    /// Invoked once with the watched-path set before the initial load.
    pub on_start: Option<Box<dyn FnOnce(&[PathBuf]) + Send>>,
}

/// Rebuilds the mock table and publishes it to the store.
pub(crate) struct Reloader {
    cwd: PathBuf,
    pages_dir: PathBuf,
    config: Document,
    invalidation_roots: Vec<PathBuf>,
    cache: Arc<DocumentCache>,
    errors: SharedErrors,
    store: Arc<MockStore>,
}

impl Reloader {
    /// Build a complete table, swap it in, and replace the error list.
    pub(crate) fn reload(&self) {
        let mut collected = Vec::new();
        let table = load_mock_table(
            &MockSources {
                cwd: &self.cwd,
                pages_dir: &self.pages_dir,
                config: &self.config,
                cache: &self.cache,
            },
            &mut |e| collected.push(e),
        );
        // The table is fully built before this point; readers never observe
        // a partially rebuilt one.
        self.store.swap(table);

        let mut errors = self
            .errors
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        *errors = collected;
    }

    /// Watch-event path: drop stale cached documents, rebuild, and report.
    pub(crate) fn invalidate_and_reload(&self) {
        self.cache.invalidate(&self.invalidation_roots);
        self.reload();

        let errors = self
            .errors
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if errors.is_empty() {
            tracing::info!("mock files reloaded");
        } else {
            tracing::warn!(errors = errors.len(), "mock reload completed with errors");
        }
    }
}

/// Dev-time request mocking middleware.
///
/// Holds the watcher for its lifetime; dropping the middleware stops the
/// watcher. With `watch` enabled, construction must happen inside a tokio
/// runtime (the reload task is spawned on it).
pub struct MockMiddleware {
    store: Arc<MockStore>,
    errors: SharedErrors,
    reloader: Arc<Reloader>,
    _watcher: Option<RecommendedWatcher>,
}

impl MockMiddleware {
    /// Build the middleware: compute the watched-path set, run the initial
    /// load, and start watching when requested.
    pub fn new(mut options: MockOptions) -> Result<Self, notify::Error> {
        let MockPaths {
            mock_dir,
            config_file,
            config_file_alt,
        } = mock_paths(&options.cwd);

        // Cache invalidation covers the whole source tree when it follows
        // the `src` convention; watching narrows to per-page mock files.
        let source_root = if options.src_dir.file_name().is_some_and(|n| n == "src") {
            options.src_dir.clone()
        } else {
            options.pages_dir.clone()
        };
        let invalidation_roots = vec![
            mock_dir.clone(),
            config_file.clone(),
            config_file_alt.clone(),
            source_root,
        ];

        if let Some(on_start) = options.on_start.take() {
            on_start(&invalidation_roots);
        }

        let store = Arc::new(MockStore::new());
        let reloader = Arc::new(Reloader {
            cwd: options.cwd,
            pages_dir: options.pages_dir.clone(),
            config: options.config,
            invalidation_roots,
            cache: Arc::new(DocumentCache::new()),
            errors: options.errors.clone(),
            store: store.clone(),
        });

        reloader.reload();

        let watcher = if options.watch {
            let targets = WatchTargets {
                mock_dir,
                config_file,
                config_file_alt,
                pages_dir: options.pages_dir,
            };
            Some(watcher::start(targets, reloader.clone())?)
        } else {
            None
        };

        Ok(Self {
            store,
            errors: options.errors,
            reloader,
            _watcher: watcher,
        })
    }

    /// Layer to install on the dev server's router.
    pub fn layer(&self) -> MockLayer {
        MockLayer {
            store: self.store.clone(),
        }
    }

    /// The shared error list given at construction.
    pub fn errors(&self) -> SharedErrors {
        self.errors.clone()
    }

    /// Force a full invalidate-and-reload cycle, as a watch event would.
    pub fn reload(&self) {
        self.reloader.invalidate_and_reload();
    }
}

/// Tower layer wrapping an inner service with mock matching.
#[derive(Clone)]
pub struct MockLayer {
    store: Arc<MockStore>,
}

impl MockLayer {
    /// Layer over an existing store; useful for tests and manual tables.
    pub fn with_store(store: Arc<MockStore>) -> Self {
        Self { store }
    }
}

impl<S> Layer<S> for MockLayer {
    type Service = MockService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockService {
            inner,
            store: self.store.clone(),
        }
    }
}

/// Service checking each request against the current mock table.
#[derive(Clone)]
pub struct MockService<S> {
    inner: S,
    store: Arc<MockStore>,
}

impl<S> Service<Request<Body>> for MockService<S>
where
    S: Service<Request<Body>, Response = Response>,
    S::Error: Send + 'static,
    S::Future: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Response, S::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<Body>) -> Self::Future {
        let hit = self.store.get().and_then(|table| {
            table
                .match_request(request.method(), request.uri().path())
                .map(|entry| {
                    (
                        entry.method.clone(),
                        entry.pattern.as_str().to_string(),
                        entry.response.clone(),
                    )
                })
        });

        match hit {
            Some((method, pattern, response)) => {
                tracing::debug!(method = %method, pattern = %pattern, "mock matched");
                let response = response.to_http();
                Box::pin(std::future::ready(Ok(response)))
            }
            None => Box::pin(self.inner.call(request)),
        }
    }
}
