#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use parking_lot::Mutex;
use serde::Deserialize;
use serde_json::{json, Value};

use role_console::session::TokenStore;
use role_console::{create_console_with_store, Console, ConsoleConfig};

#[derive(Default)]
struct Inner {
    users: Vec<(Value, String)>,
    tokens: HashMap<String, String>,
    issued: usize,
    forced_login_status: Option<u16>,
    forced_update_role_status: Option<u16>,
    role_updates: Vec<(String, String)>,
    messages: Vec<Value>,
    logs: Vec<Value>,
    hits: HashMap<&'static str, usize>,
}

/// In-process stand-in for the token-issuing backend.
#[derive(Clone, Default)]
pub struct MockBackend {
    inner: Arc<Mutex<Inner>>,
}

impl MockBackend {
    pub fn with_user(self, user_name: &str, password: &str, role: &str) -> Self {
        {
            let mut inner = self.inner.lock();
            let id = inner.users.len() + 1;
            inner.users.push((identity_json(id, user_name, role), password.to_string()));
        }
        self
    }

    pub fn force_login_status(&self, status: u16) {
        self.inner.lock().forced_login_status = Some(status);
    }

    pub fn force_update_role_status(&self, status: u16) {
        self.inner.lock().forced_update_role_status = Some(status);
    }

    /// Simulate every issued token expiring server-side.
    pub fn revoke_all(&self) {
        self.inner.lock().tokens.clear();
    }

    pub fn role_updates(&self) -> Vec<(String, String)> {
        self.inner.lock().role_updates.clone()
    }

    pub fn hits(&self, route: &'static str) -> usize {
        self.inner.lock().hits.get(route).copied().unwrap_or(0)
    }

    pub fn add_log(&self, user_name: &str, description: &str) {
        let mut inner = self.inner.lock();
        let id = inner.logs.len() + 1;
        inner.logs.push(json!({
            "id": id,
            "userName": user_name,
            "description": description,
            "createdAt": "2024-06-01T08:00:00.000"
        }));
    }

    /// Bind to an ephemeral port and return the base URL.
    pub async fn spawn(&self) -> Result<String> {
        let router = Router::new()
            .route("/auth/login", post(login))
            .route("/auth/register", post(register))
            .route("/auth/me", get(me))
            .route("/auth/update-role", post(update_role))
            .route("/users", get(list_users))
            .route("/users/usernames", get(usernames))
            .route("/users/:user_name", get(get_user))
            .route("/messages", get(all_messages))
            .route("/messages/mine", get(my_messages))
            .route("/messages/create", post(create_message))
            .route("/logs", get(all_logs))
            .route("/logs/mine", get(my_logs))
            .with_state(self.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        Ok(format!("http://{addr}"))
    }

    fn hit(&self, route: &'static str) {
        *self.inner.lock().hits.entry(route).or_insert(0) += 1;
    }

    fn authenticate(&self, headers: &HeaderMap) -> Result<String, Response> {
        let token = headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or_else(|| StatusCode::UNAUTHORIZED.into_response())?;

        self.inner
            .lock()
            .tokens
            .get(token)
            .cloned()
            .ok_or_else(|| (StatusCode::UNAUTHORIZED, "token expired").into_response())
    }

    fn find_user(&self, user_name: &str) -> Option<Value> {
        self.inner
            .lock()
            .users
            .iter()
            .find(|(user, _)| user["userName"] == user_name)
            .map(|(user, _)| user.clone())
    }
}

pub fn identity_json(id: usize, user_name: &str, role: &str) -> Value {
    json!({
        "id": id,
        "firstName": "Test",
        "lastName": user_name,
        "userName": user_name,
        "email": format!("{user_name}@example.com"),
        "createdAt": "2024-01-15T12:00:00.000",
        "roles": [role]
    })
}

/// Console wired to `base_url` with the given persistence slot.
pub fn console(base_url: &str, store: Arc<dyn TokenStore>) -> Result<Console> {
    let config = ConsoleConfig::new(base_url, "unused-token-path")?;
    Ok(create_console_with_store(&config, store)?)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginBody {
    user_name: String,
    password: String,
}

async fn login(State(mock): State<MockBackend>, Json(body): Json<LoginBody>) -> Response {
    mock.hit("login");
    let mut inner = mock.inner.lock();
    if let Some(status) = inner.forced_login_status {
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        return (status, Json(json!({"message": "forced"}))).into_response();
    }

    let found = inner
        .users
        .iter()
        .find(|(user, password)| user["userName"] == body.user_name.as_str() && *password == body.password)
        .map(|(user, _)| user.clone());

    match found {
        Some(user) => {
            inner.issued += 1;
            let token = format!("tok-{}-{}", body.user_name, inner.issued);
            inner.tokens.insert(token.clone(), body.user_name);
            Json(json!({"newToken": token, "userInfo": user})).into_response()
        }
        None => (StatusCode::UNAUTHORIZED, "Invalid credentials").into_response(),
    }
}

async fn register(State(mock): State<MockBackend>, Json(body): Json<Value>) -> Response {
    mock.hit("register");
    let user_name = body["userName"].as_str().unwrap_or_default().to_string();
    if mock.find_user(&user_name).is_some() {
        return (StatusCode::CONFLICT, Json(json!({"message": "Username already exists"}))).into_response();
    }

    let password = body["password"].as_str().unwrap_or_default().to_string();
    let mut inner = mock.inner.lock();
    let user = identity_json(inner.users.len() + 1, &user_name, "USER");
    inner.users.push((user.clone(), password));
    (StatusCode::CREATED, Json(user)).into_response()
}

async fn me(State(mock): State<MockBackend>, headers: HeaderMap) -> Response {
    mock.hit("me");
    match mock.authenticate(&headers) {
        Ok(user_name) => match mock.find_user(&user_name) {
            Some(user) => Json(user).into_response(),
            None => StatusCode::UNAUTHORIZED.into_response(),
        },
        Err(rejection) => rejection,
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateRoleBody {
    user_name: String,
    new_role: String,
}

async fn update_role(
    State(mock): State<MockBackend>,
    headers: HeaderMap,
    Json(body): Json<UpdateRoleBody>,
) -> Response {
    mock.hit("update_role");
    if let Err(rejection) = mock.authenticate(&headers) {
        return rejection;
    }

    let mut inner = mock.inner.lock();
    if let Some(status) = inner.forced_update_role_status {
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        return (status, "Forbidden").into_response();
    }

    for (user, _) in inner.users.iter_mut() {
        if user["userName"] == body.user_name.as_str() {
            user["roles"] = json!([body.new_role.clone()]);
        }
    }
    inner.role_updates.push((body.user_name, body.new_role));
    Json(json!("Role updated")).into_response()
}

async fn list_users(State(mock): State<MockBackend>, headers: HeaderMap) -> Response {
    mock.hit("users");
    if let Err(rejection) = mock.authenticate(&headers) {
        return rejection;
    }
    let users: Vec<Value> = mock.inner.lock().users.iter().map(|(u, _)| u.clone()).collect();
    Json(users).into_response()
}

async fn usernames(State(mock): State<MockBackend>, headers: HeaderMap) -> Response {
    if let Err(rejection) = mock.authenticate(&headers) {
        return rejection;
    }
    let names: Vec<Value> = mock
        .inner
        .lock()
        .users
        .iter()
        .map(|(u, _)| u["userName"].clone())
        .collect();
    Json(names).into_response()
}

async fn get_user(
    State(mock): State<MockBackend>,
    headers: HeaderMap,
    Path(user_name): Path<String>,
) -> Response {
    mock.hit("get_user");
    if let Err(rejection) = mock.authenticate(&headers) {
        return rejection;
    }
    match mock.find_user(&user_name) {
        Some(user) => Json(user).into_response(),
        None => (StatusCode::NOT_FOUND, "User not found").into_response(),
    }
}

async fn all_messages(State(mock): State<MockBackend>, headers: HeaderMap) -> Response {
    if let Err(rejection) = mock.authenticate(&headers) {
        return rejection;
    }
    Json(mock.inner.lock().messages.clone()).into_response()
}

async fn my_messages(State(mock): State<MockBackend>, headers: HeaderMap) -> Response {
    let me = match mock.authenticate(&headers) {
        Ok(me) => me,
        Err(rejection) => return rejection,
    };
    let mine: Vec<Value> = mock
        .inner
        .lock()
        .messages
        .iter()
        .filter(|m| m["senderUserName"] == me.as_str() || m["receiverUserName"] == me.as_str())
        .cloned()
        .collect();
    Json(mine).into_response()
}

async fn create_message(
    State(mock): State<MockBackend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let me = match mock.authenticate(&headers) {
        Ok(me) => me,
        Err(rejection) => return rejection,
    };
    let receiver = body["receiverUserName"].as_str().unwrap_or_default().to_string();
    if mock.find_user(&receiver).is_none() {
        return (StatusCode::BAD_REQUEST, "Receiver does not exist").into_response();
    }

    let mut inner = mock.inner.lock();
    let id = inner.messages.len() + 1;
    inner.messages.push(json!({
        "id": id,
        "senderUserName": me,
        "receiverUserName": receiver,
        "text": body["text"].clone(),
        "createdAt": "2024-06-01T08:00:00Z"
    }));
    (StatusCode::CREATED, Json(json!("Message saved"))).into_response()
}

async fn all_logs(State(mock): State<MockBackend>, headers: HeaderMap) -> Response {
    if let Err(rejection) = mock.authenticate(&headers) {
        return rejection;
    }
    Json(mock.inner.lock().logs.clone()).into_response()
}

async fn my_logs(State(mock): State<MockBackend>, headers: HeaderMap) -> Response {
    let me = match mock.authenticate(&headers) {
        Ok(me) => me,
        Err(rejection) => return rejection,
    };
    let mine: Vec<Value> = mock
        .inner
        .lock()
        .logs
        .iter()
        .filter(|log| log["userName"] == me.as_str())
        .cloned()
        .collect();
    Json(mine).into_response()
}
