//! Shared fixtures: a stand-in backend, token minting, and request helpers.

#![allow(dead_code)]

use std::net::SocketAddr;

use axum::body::{to_bytes, Body};
use axum::extract::{Form, Multipart, Path, State};
use axum::http::header::{AUTHORIZATION, CONTENT_DISPOSITION, CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE};
use axum::http::{HeaderMap, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower::ServiceExt;

use regcollect_web::config::Config;
use regcollect_web::router::build_router;
use regcollect_web::state::AppState;

pub const COOKIE_NAME: &str = "regcollect_token";
pub const BOUNDARY: &str = "regcollect-test-boundary";

/// Mint an unsigned JWT-shaped token for `sub` expiring `ttl_secs` from now.
pub fn token_for(sub: &str, ttl_secs: i64) -> String {
    let exp = chrono::Utc::now().timestamp() + ttl_secs;
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(json!({ "sub": sub, "exp": exp }).to_string());
    format!("{}.{}.signature", header, payload)
}

fn bearer_subject(headers: &HeaderMap) -> Option<String> {
    let token = headers.get(AUTHORIZATION)?.to_str().ok()?.strip_prefix("Bearer ")?;
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
    let claims: Value = serde_json::from_slice(&bytes).ok()?;
    claims["sub"].as_str().map(str::to_string)
}

fn user_json(username: &str) -> Option<Value> {
    let (id, role) = match username {
        "admin" => (1, "admin"),
        "analyst" => (2, "analyst"),
        "banker" => (3, "external"),
        _ => return None,
    };
    Some(json!({
        "id": id,
        "username": username,
        "email": format!("{}@example.org", username),
        "role": role,
        "institution_id": if role == "external" { json!(1) } else { Value::Null },
        "status": "active"
    }))
}

type Reply = Result<Json<Value>, (StatusCode, Json<Value>)>;

fn detail(status: StatusCode, msg: &str) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "detail": msg })))
}

/// Whether list endpoints should fail with a 500.
#[derive(Clone, Copy)]
struct Stub {
    failing: bool,
}

impl Stub {
    fn list(&self, rows: Value) -> Reply {
        if self.failing {
            Err(detail(StatusCode::INTERNAL_SERVER_ERROR, "database unavailable"))
        } else {
            Ok(Json(rows))
        }
    }
}

#[derive(Deserialize)]
struct LoginForm {
    username: String,
    password: String,
}

async fn login(Form(form): Form<LoginForm>) -> Reply {
    if user_json(&form.username).is_some() && form.password == "password" {
        Ok(Json(json!({ "access_token": token_for(&form.username, 3600), "token_type": "bearer" })))
    } else {
        Err(detail(StatusCode::UNAUTHORIZED, "Incorrect username or password"))
    }
}

async fn profile(headers: HeaderMap) -> Reply {
    bearer_subject(&headers)
        .and_then(|sub| user_json(&sub))
        .map(Json)
        .ok_or_else(|| detail(StatusCode::UNAUTHORIZED, "Could not validate credentials"))
}

async fn institutions(State(stub): State<Stub>) -> Reply {
    stub.list(json!([
        { "id": 1, "rssd_id": "1039502", "name": "First Community Bank", "institution_type": "commercial_bank", "status": "active" },
        { "id": 2, "rssd_id": "2380443", "name": "Harbor Savings", "institution_type": "savings_association", "status": "inactive" }
    ]))
}

async fn report_series(State(stub): State<Stub>) -> Reply {
    stub.list(json!([
        { "id": 1, "series_code": "FR Y-9C", "series_name": "Consolidated Financial Statements", "filing_frequency": "quarterly", "status": "active" }
    ]))
}

async fn submissions(State(stub): State<Stub>) -> Reply {
    stub.list(json!([
        { "id": 10, "institution_id": 1, "report_series_id": 1, "reporting_date": "2024-03-31", "submission_date": "2024-04-20T10:00:00", "status": "submitted", "validation_status": "pending" },
        { "id": 11, "institution_id": 1, "report_series_id": 1, "reporting_date": "2023-12-31", "status": "accepted", "validation_status": "passed" },
        { "id": 12, "institution_id": 2, "report_series_id": 1, "reporting_date": "2024-03-31", "status": "submitted", "validation_status": "pending" }
    ]))
}

async fn rules(State(stub): State<Stub>) -> Reply {
    stub.list(json!([
        { "id": 1, "rule_name": "Total assets non-negative", "rule_type": "range", "severity": "error", "effective_date": "2024-01-01", "status": "active" }
    ]))
}

async fn mdrm_items(State(stub): State<Stub>) -> Reply {
    stub.list(json!([
        { "id": 1, "mdrm_identifier": "BHCK2170", "item_name": "Total assets", "data_type": "numeric", "series_mnemonic": "BHCK", "effective_date": "2020-01-01" },
        { "id": 2, "mdrm_identifier": "BHCK3210", "item_name": "Total equity capital", "data_type": "numeric", "series_mnemonic": "BHCK", "effective_date": "2020-01-01" }
    ]))
}

async fn users(State(stub): State<Stub>) -> Reply {
    let rows: Vec<Value> = ["admin", "analyst", "banker"].iter().filter_map(|u| user_json(u)).collect();
    stub.list(Value::Array(rows))
}

async fn institution(Path(id): Path<i64>) -> Reply {
    match id {
        1 => Ok(Json(json!({
            "id": 1, "rssd_id": "1039502", "name": "First Community Bank",
            "institution_type": "commercial_bank", "contact_info": "ops@fcb.example.org", "status": "active"
        }))),
        _ => Err(detail(StatusCode::NOT_FOUND, "Institution not found")),
    }
}

fn submission_json(id: i64, status: &str) -> Value {
    json!({
        "id": id, "institution_id": 1, "report_series_id": 1,
        "institution_name": "First Community Bank", "report_series_name": "FR Y-9C",
        "reporting_date": "2024-03-31", "submission_date": "2024-04-20T10:00:00",
        "file_path": "uploads/fry9c_q1.csv", "status": status, "validation_status": "pending"
    })
}

async fn submission(Path(id): Path<i64>) -> Json<Value> {
    Json(submission_json(id, "submitted"))
}

async fn validation_results(Path(id): Path<i64>) -> Json<Value> {
    Json(json!([{
        "id": 1, "submission_id": id, "rule_id": 1, "field_identifier": "BHCK2170",
        "error_message": "Total assets must be non-negative", "severity": "error", "status": "open"
    }]))
}

async fn validate(Path(id): Path<i64>) -> Json<Value> {
    Json(json!({ "detail": format!("Validation started for submission {}", id), "validation_status": "in_progress" }))
}

#[derive(Deserialize)]
struct StatusForm {
    status: String,
}

async fn submission_status(Path(id): Path<i64>, Form(form): Form<StatusForm>) -> Json<Value> {
    Json(submission_json(id, &form.status))
}

/// Accepts only a complete upload for institution 1 and answers with submission 77.
async fn upload(mut multipart: Multipart) -> Reply {
    let mut institution_id = String::new();
    let mut file_name = String::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "institution_id" => institution_id = field.text().await.unwrap_or_default(),
            "file" => file_name = field.file_name().unwrap_or_default().to_string(),
            _ => {}
        }
    }
    if institution_id != "1" || file_name.is_empty() {
        return Err(detail(StatusCode::UNPROCESSABLE_ENTITY, "Upload rejected"));
    }
    Ok(Json(submission_json(77, "submitted")))
}

fn pdf(file_name: &str) -> Response {
    (
        [
            (CONTENT_TYPE, "application/pdf".to_string()),
            (CONTENT_DISPOSITION, format!("attachment; filename=\"{}\"", file_name)),
        ],
        b"%PDF-1.4 stub".to_vec(),
    )
        .into_response()
}

async fn form_pdf(Path(_id): Path<i64>) -> Response {
    pdf("FR_Y-9C.pdf")
}

async fn instructions_pdf(Path(_id): Path<i64>) -> Response {
    pdf("FR_Y-9C_instructions.pdf")
}

/// Serve a stand-in backend on an ephemeral port and return its API base URL.
pub async fn spawn_backend(failing: bool) -> String {
    let api = Router::new()
        .route("/auth/login", post(login))
        .route("/auth/profile", get(profile))
        .route("/auth/logout", post(|| async { Json(json!({ "detail": "Successfully logged out" })) }))
        .route("/institutions/", get(institutions))
        .route("/institutions/{id}", get(institution))
        .route("/submissions/upload", post(upload))
        .route("/submissions/{id}", get(submission))
        .route("/submissions/{id}/validate", post(validate))
        .route("/submissions/{id}/status", put(submission_status))
        .route("/validation/results/{id}", get(validation_results))
        .route("/forms/{id}", get(form_pdf))
        .route("/forms/instructions/{id}", get(instructions_pdf))
        .route("/users/{id}", delete(|| async { StatusCode::NO_CONTENT }))
        .route("/report-series/", get(report_series))
        .route("/submissions/", get(submissions))
        .route("/validation/rules", get(rules))
        .route("/mdrm/items", get(mdrm_items))
        .route("/users/", get(users))
        .with_state(Stub { failing });
    let app = Router::new().nest("/api/v1", api);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/api/v1", addr)
}

pub struct TestApp {
    router: Router,
}

impl TestApp {
    pub async fn start() -> Self {
        Self::with_backend(false).await
    }

    pub async fn with_backend(failing: bool) -> Self {
        let base_url = spawn_backend(failing).await;
        let config = Config::default().with_overrides(None, Some(base_url));
        let state = AppState::new(config).unwrap();
        Self { router: build_router(state) }
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> Response {
        let mut builder = Request::builder().uri(uri);
        if let Some(token) = token {
            builder = builder.header(COOKIE, format!("{}={}", COOKIE_NAME, token));
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    pub async fn post_body(&self, uri: &str, token: Option<&str>, content_type: &str, body: String) -> Response {
        let mut builder = Request::builder().method("POST").uri(uri).header("content-type", content_type);
        if let Some(token) = token {
            builder = builder.header(COOKIE, format!("{}={}", COOKIE_NAME, token));
        }
        self.send(builder.body(Body::from(body)).unwrap()).await
    }

    /// POST a multipart body built from `(name, file_name, content)` parts.
    pub async fn post_multipart(&self, uri: &str, token: Option<&str>, parts: &[(&str, Option<&str>, &str)]) -> Response {
        let content_type = format!("multipart/form-data; boundary={}", BOUNDARY);
        self.post_body(uri, token, &content_type, multipart_body(parts)).await
    }

    pub async fn post_form(&self, uri: &str, token: Option<&str>, form: &str) -> Response {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/x-www-form-urlencoded");
        if let Some(token) = token {
            builder = builder.header(COOKIE, format!("{}={}", COOKIE_NAME, token));
        }
        self.send(builder.body(Body::from(form.to_string())).unwrap()).await
    }
}

pub fn multipart_body(parts: &[(&str, Option<&str>, &str)]) -> String {
    let mut body = String::new();
    for (name, file_name, content) in parts {
        body.push_str(&format!("--{}\r\n", BOUNDARY));
        match file_name {
            Some(file_name) => body.push_str(&format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: text/csv\r\n\r\n",
                name, file_name
            )),
            None => body.push_str(&format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name)),
        }
        body.push_str(content);
        body.push_str("\r\n");
    }
    body.push_str(&format!("--{}--\r\n", BOUNDARY));
    body
}

pub async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn location(response: &Response) -> Option<&str> {
    response.headers().get(LOCATION).and_then(|v| v.to_str().ok())
}

pub fn set_cookie(response: &Response) -> Option<String> {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with(COOKIE_NAME))
        .map(str::to_string)
}
