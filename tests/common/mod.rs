#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use axum::extract::{Multipart, Path, Request, State};
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use smart_hr::api::ApiClient;
use smart_hr::models::SessionUser;
use smart_hr::session::SessionContext;

pub const TOKEN: &str = "token-1";
pub const PASSWORD: &str = "secret";
/// Creating a user with this email answers `201` with only a message
pub const MESSAGE_ONLY_EMAIL: &str = "brief@example.com";
pub const EXPORT_BYTES: &[u8] = b"id,type,name\n1,Category,Electronics\n2,Category,Phones\n";

/// One request as seen by the mock backend
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
}

#[derive(Default)]
struct MockState {
    requests: Vec<Recorded>,
    master_status: Vec<(u64, bool)>,
    toggle_bodies: Vec<Value>,
}

type Shared = Arc<Mutex<MockState>>;

/// In-process stand-in for the Smart HR REST backend
pub struct MockBackend {
    pub port: u16,
    pub base_url: String,
    state: Shared,
}

impl MockBackend {
    pub async fn start() -> Result<Self> {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("smart_hr=debug,tower_http=info")
            .with_test_writer()
            .try_init();

        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}/api", port);
        let state: Shared = Arc::new(Mutex::new(MockState {
            requests: Vec::new(),
            master_status: vec![(1, true), (2, false)],
            toggle_bodies: Vec::new(),
        }));

        let app = Router::new()
            .route("/api/login", post(login))
            .route("/api/register", post(register))
            .route("/api/logout", post(ok))
            .route("/api/me", get(me))
            .route("/api/users", get(list_users).post(create_user))
            .route("/api/users/:id", get(show_user).delete(delete_user))
            .route("/api/role-permissions", get(role_permissions))
            .route("/api/master-data", get(list_master_data))
            .route("/api/master-data/import", post(import))
            .route("/api/master-data/export", get(export))
            .route("/api/master-data/bulk-delete", post(ok))
            .route("/api/master-data/:id/toggle-status", patch(toggle_status))
            .route("/api/master-data-types", get(master_data_types))
            .route("/api/expired", get(expired))
            .layer(middleware::from_fn_with_state(state.clone(), record))
            .layer(TraceLayer::new_for_http())
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind mock backend")?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self { port, base_url, state })
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.lock().unwrap().requests.clone()
    }

    /// JSON bodies received by the status toggle endpoint, in order
    pub fn toggle_bodies(&self) -> Vec<Value> {
        self.state.lock().unwrap().toggle_bodies.clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<Recorded> {
        let full = format!("/api/{}", path.trim_start_matches('/'));
        self.requests().into_iter().filter(|r| r.path == full).collect()
    }

    pub fn client(&self, session: Arc<SessionContext>) -> Result<ApiClient> {
        Ok(ApiClient::new(&self.base_url, session)?)
    }

    /// A session already holding the token the backend accepts
    pub fn signed_in(&self) -> Result<(Arc<SessionContext>, ApiClient)> {
        let session = Arc::new(SessionContext::in_memory());
        session.establish(&admin(TOKEN))?;
        let client = self.client(session.clone())?;
        Ok((session, client))
    }
}

pub fn admin(token: &str) -> SessionUser {
    SessionUser {
        id: 1,
        name: "Asha Admin".into(),
        email: "asha@example.com".into(),
        token: token.into(),
    }
}

async fn record(State(state): State<Shared>, req: Request, next: Next) -> Response {
    let recorded = Recorded {
        method: req.method().to_string(),
        path: req.uri().path().to_string(),
        query: req.uri().query().map(str::to_string),
        authorization: req
            .headers()
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    };
    state.lock().unwrap().requests.push(recorded);
    next.run(req).await
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map_or(false, |v| v == format!("Bearer {}", TOKEN))
}

fn unauthenticated() -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "message": "Unauthenticated." }))).into_response()
}

fn page(data: Vec<Value>, per_page: u64) -> Value {
    let total = data.len() as u64;
    json!({
        "data": data,
        "meta": {
            "current_page": 1,
            "last_page": 1,
            "total": total,
            "from": if total == 0 { Value::Null } else { json!(1) },
            "to": if total == 0 { Value::Null } else { json!(total) },
            "per_page": per_page,
        },
        "links": { "first": null, "last": null, "prev": null, "next": null }
    })
}

async fn ok() -> Json<Value> {
    Json(json!({ "message": "ok" }))
}

async fn login(Json(body): Json<Value>) -> Response {
    if body["password"] == PASSWORD {
        Json(json!({
            "id": 1,
            "name": "Asha Admin",
            "email": body["email"],
            "token": TOKEN,
        }))
        .into_response()
    } else {
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "message": "Invalid credentials",
                "errors": { "email": ["These credentials do not match our records."] }
            })),
        )
            .into_response()
    }
}

async fn register(Json(body): Json<Value>) -> Response {
    (
        StatusCode::CREATED,
        Json(json!({
            "user": { "id": 2, "name": body["name"], "email": body["email"] },
            "access_token": "token-2",
        })),
    )
        .into_response()
}

async fn me(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthenticated();
    }
    Json(json!({
        "data": {
            "id": 1,
            "name": "Asha Admin",
            "email": "asha@example.com",
            "permissions": [
                "view-user", "add-user",
                "view-master-data", "edit-master-data", "import-master-data",
            ],
        }
    }))
    .into_response()
}

async fn list_users(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthenticated();
    }
    Json(page(
        vec![
            json!({ "id": 7, "name": "Ravi", "email": "ravi@example.com", "roles": [{ "id": 2, "label": "Manager" }] }),
            json!({ "id": 6, "name": "Meera", "email": "meera@example.com", "role": "staff" }),
        ],
        5,
    ))
    .into_response()
}

async fn create_user(Json(body): Json<Value>) -> Response {
    if body["email"] == "taken@example.com" {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "message": "The email has already been taken.",
                "errors": { "email": ["The email has already been taken."] }
            })),
        )
            .into_response();
    }
    if body["email"] == MESSAGE_ONLY_EMAIL {
        return (StatusCode::CREATED, Json(json!({ "message": "User created successfully" }))).into_response();
    }
    (
        StatusCode::CREATED,
        Json(json!({ "data": { "id": 10, "name": body["name"], "email": body["email"], "role": body["role"] } })),
    )
        .into_response()
}

async fn show_user(Path(id): Path<u64>) -> Response {
    if id == 7 {
        Json(json!({ "data": { "id": 7, "name": "Ravi", "email": "ravi@example.com", "roles": [] } })).into_response()
    } else {
        (StatusCode::NOT_FOUND, Json(json!({ "message": "User not found" }))).into_response()
    }
}

async fn delete_user(Path(id): Path<u64>) -> Response {
    if id == 7 {
        Json(json!({ "message": "User deleted" })).into_response()
    } else {
        (StatusCode::NOT_FOUND, Json(json!({ "message": "User not found" }))).into_response()
    }
}

async fn role_permissions() -> Json<Value> {
    Json(json!({
        "data": [
            { "id": 1, "name": "view-user", "label": "View users", "module": "users" },
            { "id": 2, "name": "add-user", "label": "Add users", "module": "users" },
            { "id": 3, "name": "view-dashboard", "label": "Dashboard", "module": "" },
        ]
    }))
}

async fn list_master_data(State(state): State<Shared>) -> Json<Value> {
    let rows = state
        .lock()
        .unwrap()
        .master_status
        .iter()
        .map(|(id, status)| {
            json!({
                "id": id,
                "type": "Category",
                "name": format!("Item {}", id),
                "parent_id": null,
                "status": if *status { 1 } else { 0 },
            })
        })
        .collect();
    let mut body = page(rows, 10);
    body["types"] = json!(["Category", "Department"]);
    Json(body)
}

async fn toggle_status(State(state): State<Shared>, Path(id): Path<u64>, Json(body): Json<Value>) -> Response {
    let mut state = state.lock().unwrap();
    state.toggle_bodies.push(body.clone());
    let Some(requested) = body["status"].as_bool() else {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "message": "The status field must be true or false.",
                "errors": { "status": ["The status field must be true or false."] }
            })),
        )
            .into_response();
    };
    match state.master_status.iter_mut().find(|(row, _)| *row == id) {
        Some(entry) => {
            entry.1 = requested;
            Json(json!({ "data": { "id": id, "status": if requested { 1 } else { 0 } } })).into_response()
        }
        None => (StatusCode::NOT_FOUND, Json(json!({ "message": "Master data not found" }))).into_response(),
    }
}

async fn import(mut multipart: Multipart) -> Response {
    let mut file: Option<(String, usize)> = None;
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() == Some("file") {
            let name = field.file_name().unwrap_or_default().to_string();
            let bytes = field.bytes().await.map(|b| b.len()).unwrap_or_default();
            file = Some((name, bytes));
        }
    }

    match file {
        Some((name, size)) if name.ends_with(".xlsx") && size > 0 => {
            Json(json!({ "message": "Master data imported successfully", "imported": 3 })).into_response()
        }
        Some(_) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "message": "Import failed",
                "errors": [
                    { "row": 2, "attribute": "code", "errors": ["The code has already been taken."] }
                ]
            })),
        )
            .into_response(),
        None => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "message": "No file", "errors": { "file": ["The file field is required."] } })),
        )
            .into_response(),
    }
}

async fn export() -> Response {
    (
        [("content-type", "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet")],
        EXPORT_BYTES,
    )
        .into_response()
}

async fn master_data_types() -> Json<Value> {
    Json(json!({ "data": ["Category", "Department"] }))
}

async fn expired() -> Response {
    unauthenticated()
}
