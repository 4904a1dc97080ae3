#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use serde_json::{Value, json};

pub const CATALOG_SIZE: u64 = 45;
pub const TOKEN: &str = "test-token";
pub const DUPLICATE_GOOGLE_ID: &str = "dup";
pub const KNOWN_GOOGLE_ID: &str = "known";
pub const IMPORTED_BOOK_ID: i64 = 501;

#[derive(Debug, Clone, Default)]
pub struct BackendStubConfig {
    /// Catalog pages answered only after this delay.
    pub slow_pages: HashMap<u32, Duration>,
}

/// In-process stand-in for the library backend, served under `/api/v1`.
pub struct BackendStub {
    pub base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
    shutdown_tx: Option<mpsc::Sender<()>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl BackendStub {
    pub fn spawn(config: BackendStubConfig) -> Self {
        let server = tiny_http::Server::http("127.0.0.1:0").expect("start backend stub server");
        let addr = server.server_addr();
        let base_url = format!("http://{addr}/api/v1");

        let requests = Arc::new(Mutex::new(Vec::new()));
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

        let handle = thread::spawn({
            let requests = Arc::clone(&requests);
            let config = Arc::new(config);
            move || {
                loop {
                    if shutdown_rx.try_recv().is_ok() {
                        break;
                    }

                    let request = match server.recv_timeout(Duration::from_millis(50)) {
                        Ok(Some(req)) => req,
                        Ok(None) => continue,
                        Err(_) => break,
                    };

                    requests
                        .lock()
                        .expect("request log")
                        .push(format!("{} {}", request.method(), request.url()));

                    // One thread per request so slow pages do not block fast ones.
                    let config = Arc::clone(&config);
                    thread::spawn(move || respond(request, &config));
                }
            }
        });

        Self {
            base_url,
            requests,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        }
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().expect("request log").clone()
    }
}

impl Drop for BackendStub {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn respond(request: tiny_http::Request, config: &BackendStubConfig) {
    let url = url::Url::parse(&format!("http://stub{}", request.url())).expect("parse url");
    let query: HashMap<String, String> = url.query_pairs().into_owned().collect();
    let authorized = request.headers().iter().any(|header| {
        header.field.equiv("Authorization") && header.value.as_str() == format!("Bearer {TOKEN}")
    });
    let path = url
        .path()
        .strip_prefix("/api/v1")
        .unwrap_or(url.path())
        .to_owned();
    let method = request.method().clone();

    let (status, body) = match (&method, path.as_str()) {
        (tiny_http::Method::Get, "/books") => {
            let page = param(&query, "page").unwrap_or(0);
            let size = param(&query, "size").unwrap_or(10);
            if let Some(delay) = config.slow_pages.get(&page) {
                thread::sleep(*delay);
            }
            (200, catalog_page(page, size))
        }
        (tiny_http::Method::Get, "/books/mine") if authorized => (200, page_of(&[1, 2, 3])),
        (tiny_http::Method::Get, "/books/borrowed") if authorized => (200, page_of(&[2])),
        (tiny_http::Method::Get, "/books/read") if authorized => (200, page_of(&[3])),
        (tiny_http::Method::Get, "/books/returned") if authorized => (200, page_of(&[])),
        (
            tiny_http::Method::Get,
            "/books/mine" | "/books/borrowed" | "/books/read" | "/books/returned",
        ) => (401, json!({ "error": "Full authentication is required" })),
        (tiny_http::Method::Get, "/books/search") => {
            let q = query.get("q").cloned().unwrap_or_default();
            (200, search_response(&q))
        }
        (tiny_http::Method::Post, "/books/add-from-google") => {
            match query.get("googleId").map(String::as_str) {
                Some(DUPLICATE_GOOGLE_ID) => (
                    409,
                    json!({ "error": "Book already exists in your library" }),
                ),
                Some(_) => (200, json!(IMPORTED_BOOK_ID)),
                None => (400, json!({ "error": "googleId is required" })),
            }
        }
        (tiny_http::Method::Get, p) if p.starts_with("/books/google/") => {
            let google_id = &p["/books/google/".len()..];
            if google_id == KNOWN_GOOGLE_ID {
                (200, google_book(google_id))
            } else {
                (404, json!({ "error": format!("No Google book {google_id}") }))
            }
        }
        (tiny_http::Method::Get, "/books/7") => (
            200,
            json!({
                "id": 7,
                "title": "Book 7",
                "authorName": "Author 7",
                "cover": "aGVsbG8=",
                "rate": 4.5,
                "synopsis": "A stub book."
            }),
        ),
        _ => (404, json!({ "error": "not found" })),
    };

    let header = tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
        .expect("build header");
    let response = tiny_http::Response::from_string(body.to_string())
        .with_status_code(status)
        .with_header(header);
    let _ = request.respond(response);
}

fn param(query: &HashMap<String, String>, key: &str) -> Option<u32> {
    query.get(key).and_then(|v| v.parse().ok())
}

fn book(id: i64) -> Value {
    json!({
        "id": id,
        "title": format!("Book {id}"),
        "authorName": format!("Author {id}"),
        "shareable": true
    })
}

fn catalog_page(page: u32, size: u32) -> Value {
    let size = size.max(1);
    let start = u64::from(page) * u64::from(size);
    let end = (start + u64::from(size)).min(CATALOG_SIZE);
    let content: Vec<Value> = (start..end.max(start))
        .map(|i| book(i as i64 + 1))
        .collect();
    let total_pages = CATALOG_SIZE.div_ceil(u64::from(size));
    json!({
        "content": content,
        "number": page,
        "size": size,
        "totalElements": CATALOG_SIZE,
        "totalPages": total_pages,
        "first": page == 0,
        "last": u64::from(page) + 1 >= total_pages
    })
}

fn page_of(ids: &[i64]) -> Value {
    let content: Vec<Value> = ids.iter().copied().map(book).collect();
    json!({
        "content": content,
        "number": 0,
        "size": 12,
        "totalElements": ids.len(),
        "totalPages": if ids.is_empty() { 0 } else { 1 },
        "first": true,
        "last": true
    })
}

fn google_book(google_id: &str) -> Value {
    json!({
        "googleId": google_id,
        "title": "Dune",
        "authorName": "Frank Herbert",
        "isbn": "9780441013593",
        "publishedDate": "1965",
        "category": "Fiction"
    })
}

fn search_response(q: &str) -> Value {
    json!({
        "localBooks": [book(1)],
        "googleBooks": [google_book(KNOWN_GOOGLE_ID)],
        "query": q,
        "totalLocalResults": 1,
        "totalGoogleResults": 1,
        "totalResults": 2
    })
}
