//! A stand-in portal API served by axum on an ephemeral port.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Multipart, Path, State},
    http::{header::AUTHORIZATION, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde_json::{json, Value};

pub const SESSION_COOKIE: &str = "portal_session";
const SESSION_VALUE: &str = "signed-in-admin";

#[derive(Debug, Clone, PartialEq)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub bearer: Option<String>,
}

#[derive(Default)]
struct Store {
    collections: HashMap<String, Vec<Value>>,
    requests: Vec<Recorded>,
    failing: HashSet<String>,
}

#[derive(Clone, Default)]
pub struct MockApi {
    store: Arc<Mutex<Store>>,
}

impl MockApi {
    pub fn seed(&self, collection: &str, items: Vec<Value>) {
        self.store
            .lock()
            .unwrap()
            .collections
            .insert(collection.to_string(), items);
    }

    pub fn push(&self, collection: &str, item: Value) {
        self.store
            .lock()
            .unwrap()
            .collections
            .entry(collection.to_string())
            .or_default()
            .push(item);
    }

    /// Make every list of `collection` answer 500.
    pub fn fail(&self, collection: &str) {
        self.store.lock().unwrap().failing.insert(collection.to_string());
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.store.lock().unwrap().requests.clone()
    }

    pub fn count(&self, method: &str, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    fn record(&self, method: &Method, uri: &Uri, headers: &HeaderMap) {
        let bearer = headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(String::from);
        self.store.lock().unwrap().requests.push(Recorded {
            method: method.to_string(),
            path: uri.path().trim_start_matches("/api/").to_string(),
            bearer,
        });
    }
}

/// Start the mock and return its API base URL.
pub async fn spawn() -> anyhow::Result<(String, MockApi)> {
    let api = MockApi::default();
    let app = Router::new()
        .route("/api/auth/me", get(me))
        .route("/api/auth/logout", post(logout))
        .route("/api/upload", post(upload))
        .route("/api/timetables/upload", post(upload))
        .route("/api/:collection", get(list).post(create))
        .route("/api/:collection/:id", put(update).delete(remove))
        .with_state(api.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    Ok((format!("http://{}/api", addr), api))
}

/// A base URL nothing is listening on.
pub fn unreachable_base() -> anyhow::Result<String> {
    let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?;
    drop(listener);
    Ok(format!("http://{}/api", addr))
}

// Lists hand out the session cookie, standing in for the login page.
async fn list(
    State(api): State<MockApi>,
    Path(collection): Path<String>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    jar: CookieJar,
) -> Response {
    api.record(&method, &uri, &headers);
    let store = api.store.lock().unwrap();
    if store.failing.contains(&collection) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "database unavailable").into_response();
    }

    let items = Value::Array(store.collections.get(&collection).cloned().unwrap_or_default());
    let body = if collection == "announcements" {
        json!({ "announcements": items })
    } else {
        items
    };
    let jar = jar.add(Cookie::build((SESSION_COOKIE, SESSION_VALUE)).path("/").build());
    (jar, Json(body)).into_response()
}

async fn create(
    State(api): State<MockApi>,
    Path(collection): Path<String>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Json(mut body): Json<Value>,
) -> Response {
    api.record(&method, &uri, &headers);
    body["_id"] = json!(uuid::Uuid::new_v4().to_string());
    api.push(&collection, body.clone());
    (StatusCode::CREATED, Json(body)).into_response()
}

async fn update(
    State(api): State<MockApi>,
    Path((collection, id)): Path<(String, String)>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Json(mut body): Json<Value>,
) -> Response {
    api.record(&method, &uri, &headers);
    body["_id"] = json!(id);
    let mut store = api.store.lock().unwrap();
    let slot = store
        .collections
        .get_mut(&collection)
        .and_then(|items| items.iter_mut().find(|item| item["_id"] == id.as_str()));
    match slot {
        Some(slot) => {
            *slot = body.clone();
            Json(body).into_response()
        }
        None => (StatusCode::NOT_FOUND, "no such item").into_response(),
    }
}

async fn remove(
    State(api): State<MockApi>,
    Path((collection, id)): Path<(String, String)>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    api.record(&method, &uri, &headers);
    let mut store = api.store.lock().unwrap();
    let items = store.collections.entry(collection).or_default();
    let before = items.len();
    items.retain(|item| item["_id"] != id.as_str());
    if items.len() == before {
        return (StatusCode::NOT_FOUND, "no such item").into_response();
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn me(State(api): State<MockApi>, method: Method, uri: Uri, headers: HeaderMap, jar: CookieJar) -> Response {
    api.record(&method, &uri, &headers);
    match jar.get(SESSION_COOKIE) {
        Some(cookie) if cookie.value() == SESSION_VALUE => Json(json!({
            "admin": { "_id": "u1", "username": "hod", "role": "admin" }
        }))
        .into_response(),
        _ => (StatusCode::UNAUTHORIZED, Json(json!({ "message": "Not authenticated" }))).into_response(),
    }
}

async fn logout(State(api): State<MockApi>, method: Method, uri: Uri, headers: HeaderMap, jar: CookieJar) -> Response {
    api.record(&method, &uri, &headers);
    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/").build());
    (jar, StatusCode::OK).into_response()
}

async fn upload(
    State(api): State<MockApi>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    api.record(&method, &uri, &headers);
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() != Some("file") {
            continue;
        }
        let name = field.file_name().unwrap_or("upload.bin").to_string();
        let bytes = field.bytes().await.map(|b| b.len()).unwrap_or_default();
        return Json(json!({ "fileUrl": format!("/uploads/{}", name), "bytes": bytes })).into_response();
    }
    (StatusCode::BAD_REQUEST, "missing file field").into_response()
}
