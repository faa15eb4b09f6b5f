#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode};
use http_body_util::BodyExt;
use lopdf::{Document, Object, dictionary};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use storefront_server::api::build_app;
use storefront_server::auth::{USER_ID_HEADER, USER_ROLE_HEADER};
use storefront_server::documents::LocalFileStore;
use storefront_server::{Config, ServerState, Store};

pub const BOUNDARY: &str = "----storefront-test-boundary";

pub struct TestApp {
    pub router: Router,
    pub state: ServerState,
    _dir: TempDir,
}

impl TestApp {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::with_overrides(dir.path().to_string_lossy().to_string(), 0);
        let store = Store::open_in_memory().unwrap();
        let file_store = Arc::new(LocalFileStore::new(dir.path().join("uploads")));
        let state = ServerState::with_parts(config, store, file_store);
        Self {
            router: build_app(&state),
            state,
            _dir: dir,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }
}

/// Identity headers the auth gateway would add
#[derive(Debug, Clone, Copy)]
pub enum As {
    Anonymous,
    Customer(&'static str),
    Staff(&'static str),
}

fn with_identity(builder: http::request::Builder, who: As) -> http::request::Builder {
    match who {
        As::Anonymous => builder,
        As::Customer(id) => builder
            .header(USER_ID_HEADER, id)
            .header(USER_ROLE_HEADER, "customer"),
        As::Staff(id) => builder
            .header(USER_ID_HEADER, id)
            .header(USER_ROLE_HEADER, "staff"),
    }
}

pub fn get(uri: &str, who: As) -> Request<Body> {
    with_identity(Request::get(uri), who)
        .body(Body::empty())
        .unwrap()
}

pub fn json(method: &str, uri: &str, who: As, body: Value) -> Request<Body> {
    with_identity(Request::builder().method(method).uri(uri), who)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// `POST /order/print` with a `data` part and one part per file
pub fn order_upload(who: As, data: &Value, files: &[(&str, Vec<u8>)]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"data\"\r\n\r\n{data}\r\n"
        )
        .as_bytes(),
    );
    for (name, bytes) in files {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"files[]\"; filename=\"{name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    with_identity(Request::post("/order/print"), who)
        .header(
            http::header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

/// Minimal valid PDF with `pages` blank A4 pages
pub fn pdf_with_pages(pages: u32) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let kids: Vec<Object> = (0..pages)
        .map(|_| {
            doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            })
            .into()
        })
        .collect();
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => i64::from(pages),
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

/// Black and white, single sided, A4, one copy, pickup
pub fn bw_selection() -> Value {
    serde_json::json!({
        "mode": "BW",
        "side": "Single",
        "paperSize": "A4",
        "copies": 1,
        "binding": "Loose Papers",
        "fulfillment": "Pickup"
    })
}
