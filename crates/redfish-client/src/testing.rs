//! Test utilities for redfish-client
//!
//! [`MockBmc`] runs an in-process Redfish service over plain HTTP so the
//! client can be exercised through its real transport.

use std::collections::{BTreeMap, HashMap};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use parking_lot::Mutex;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use crate::config::ClientConfig;

const SERVICE_ROOT: &str = "/redfish/v1/";
const SESSIONS: &str = "/redfish/v1/SessionService/Sessions";

#[derive(Debug)]
struct BmcState {
    username: String,
    password: String,
    /// token -> session id
    sessions: HashMap<String, u32>,
    next_session: u32,
    resources: BTreeMap<String, Value>,
    /// POSTs to non-collection resources (actions), in arrival order
    actions: Vec<(String, Value)>,
}

type SharedState = Arc<Mutex<BmcState>>;

/// A mock BMC that shuts down when dropped
pub struct MockBmc {
    pub addr: SocketAddr,
    state: SharedState,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
    handle: Option<tokio::task::JoinHandle<()>>,
}

impl MockBmc {
    pub const USERNAME: &'static str = "admin";
    pub const PASSWORD: &'static str = "secret";

    /// Start a BMC serving [`standard_tree`] for `manufacturer`
    ///
    /// # Example
    ///
    /// ```ignore
    /// use redfish_client::testing::MockBmc;
    /// use redfish_client::RedfishClient;
    ///
    /// let bmc = MockBmc::start("Contoso").await?;
    /// let mut client = RedfishClient::new(bmc.config())?;
    /// client.connect().await?;
    /// ```
    pub async fn start(manufacturer: &str) -> std::io::Result<Self> {
        Self::start_with_tree(standard_tree(manufacturer)).await
    }

    /// Start a BMC serving `resources`, keyed by path without trailing slash
    pub async fn start_with_tree(resources: BTreeMap<String, Value>) -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let state: SharedState = Arc::new(Mutex::new(BmcState {
            username: Self::USERNAME.to_string(),
            password: Self::PASSWORD.to_string(),
            sessions: HashMap::new(),
            next_session: 1,
            resources,
            actions: Vec::new(),
        }));

        let router = Router::new()
            .route(SERVICE_ROOT, get(service_root))
            .route(SESSIONS, post(create_session))
            .route(&format!("{}/{{id}}", SESSIONS), delete(delete_session))
            .fallback(resource)
            .with_state(state.clone());

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
        let handle = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .ok();
        });

        // Give server a moment to start
        tokio::time::sleep(Duration::from_millis(10)).await;

        Ok(Self {
            addr,
            state,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        })
    }

    /// Client configuration pointing at this BMC with valid credentials
    pub fn config(&self) -> ClientConfig {
        ClientConfig::builder(self.addr.ip().to_string())
            .port(self.addr.port())
            .plain_http()
            .credentials(Self::USERNAME, Self::PASSWORD)
            .request_timeout_ms(5_000)
            .connect_timeout_ms(2_000)
            .build()
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Number of open sessions
    pub fn session_count(&self) -> usize {
        self.state.lock().sessions.len()
    }

    /// Current state of a resource
    pub fn resource(&self, path: &str) -> Option<Value> {
        self.state.lock().resources.get(normalize(path)).cloned()
    }

    pub fn insert_resource(&self, path: &str, body: Value) {
        self.state
            .lock()
            .resources
            .insert(normalize(path).to_string(), body);
    }

    /// Action POSTs received so far
    pub fn actions(&self) -> Vec<(String, Value)> {
        self.state.lock().actions.clone()
    }

    /// Shutdown the server gracefully
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for MockBmc {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

/// A small standard-conformant resource tree: one system, chassis and
/// manager, an account service with one administrator and three roles.
pub fn standard_tree(manufacturer: &str) -> BTreeMap<String, Value> {
    let mut tree = BTreeMap::new();
    let mut add = |path: &str, body: Value| {
        tree.insert(path.to_string(), body);
    };

    add(
        "/redfish/v1",
        json!({
            "@odata.id": "/redfish/v1/",
            "RedfishVersion": "1.6.0",
            "UUID": "92384634-2938-2342-8820-489239905423",
            "AccountService": {"@odata.id": "/redfish/v1/AccountService"},
            "Chassis": {"@odata.id": "/redfish/v1/Chassis"},
            "Managers": {"@odata.id": "/redfish/v1/Managers"},
            "SessionService": {"@odata.id": "/redfish/v1/SessionService"},
            "Systems": {"@odata.id": "/redfish/v1/Systems"},
            "Links": {"Sessions": {"@odata.id": SESSIONS}}
        }),
    );
    add(
        "/redfish/v1/SessionService",
        json!({"ServiceEnabled": true, "SessionTimeout": 300, "Sessions": {"@odata.id": SESSIONS}}),
    );
    add(
        "/redfish/v1/Systems",
        json!({"Members": [{"@odata.id": "/redfish/v1/Systems/1"}], "Members@odata.count": 1}),
    );
    add(
        "/redfish/v1/Systems/1",
        json!({
            "Id": "1",
            "UUID": "4c4c4544-0042-3010-8056-b4c04f4e4d32",
            "Manufacturer": manufacturer,
            "Model": "Rack Server 1000",
            "SerialNumber": "SN0001",
            "PowerState": "On",
            "Actions": {
                "#ComputerSystem.Reset": {
                    "target": "/redfish/v1/Systems/1/Actions/ComputerSystem.Reset",
                    "ResetType@Redfish.AllowableValues": ["On", "ForceOff", "GracefulShutdown", "ForceRestart"]
                }
            }
        }),
    );
    add(
        "/redfish/v1/Chassis",
        json!({"Members": [{"@odata.id": "/redfish/v1/Chassis/1"}]}),
    );
    add(
        "/redfish/v1/Chassis/1",
        json!({"Id": "1", "ChassisType": "RackMount", "SerialNumber": "CH0001"}),
    );
    add(
        "/redfish/v1/Managers",
        json!({"Members": [{"@odata.id": "/redfish/v1/Managers/1"}]}),
    );
    add(
        "/redfish/v1/Managers/1",
        json!({
            "Id": "1",
            "UUID": "3f2a1b4c-0000-4000-8000-000000000001",
            "ManagerType": "BMC",
            "FirmwareVersion": "1.0.0",
            "Actions": {
                "#Manager.Reset": {"target": "/redfish/v1/Managers/1/Actions/Manager.Reset"}
            }
        }),
    );
    add(
        "/redfish/v1/AccountService",
        json!({
            "ServiceEnabled": true,
            "MinPasswordLength": 8,
            "Accounts": {"@odata.id": "/redfish/v1/AccountService/Accounts"},
            "Roles": {"@odata.id": "/redfish/v1/AccountService/Roles"}
        }),
    );
    add(
        "/redfish/v1/AccountService/Accounts",
        json!({"Members": [{"@odata.id": "/redfish/v1/AccountService/Accounts/1"}]}),
    );
    add(
        "/redfish/v1/AccountService/Accounts/1",
        json!({"Id": "1", "UserName": MockBmc::USERNAME, "RoleId": "Administrator", "Enabled": true}),
    );
    add(
        "/redfish/v1/AccountService/Roles",
        json!({"Members": [
            {"@odata.id": "/redfish/v1/AccountService/Roles/Administrator"},
            {"@odata.id": "/redfish/v1/AccountService/Roles/Operator"},
            {"@odata.id": "/redfish/v1/AccountService/Roles/ReadOnly"}
        ]}),
    );
    for role in ["Administrator", "Operator", "ReadOnly"] {
        add(
            &format!("/redfish/v1/AccountService/Roles/{}", role),
            json!({"Id": role, "Name": role, "IsPredefined": true}),
        );
    }

    tree
}

fn normalize(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/"
    } else {
        trimmed
    }
}

fn error(status: StatusCode, message_id: &str, message: &str) -> Response {
    let body = json!({
        "error": {
            "code": "Base.1.4.GeneralError",
            "Message": "A general error has occurred. See ExtendedInfo for more information.",
            "@Message.ExtendedInfo": [{"MessageId": message_id, "Message": message}]
        }
    });
    (status, Json(body)).into_response()
}

fn authorized(state: &BmcState, headers: &HeaderMap) -> bool {
    headers
        .get("X-Auth-Token")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|token| state.sessions.contains_key(token))
}

async fn service_root(State(state): State<SharedState>) -> Response {
    match state.lock().resources.get("/redfish/v1") {
        Some(root) => Json(root.clone()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn create_session(State(state): State<SharedState>, Json(body): Json<Value>) -> Response {
    let mut state = state.lock();

    let user = body.get("UserName").and_then(Value::as_str);
    let password = body.get("Password").and_then(Value::as_str);
    if user != Some(state.username.as_str()) || password != Some(state.password.as_str()) {
        return error(
            StatusCode::UNAUTHORIZED,
            "Base.1.4.NoValidSession",
            "Invalid username or password.",
        );
    }

    let id = state.next_session;
    state.next_session += 1;
    let token = uuid::Uuid::new_v4().simple().to_string();
    state.sessions.insert(token.clone(), id);

    let location = format!("{}/{}", SESSIONS, id);
    (
        StatusCode::CREATED,
        [("X-Auth-Token", token), ("Location", location.clone())],
        Json(json!({"@odata.id": location, "Id": id.to_string(), "UserName": user})),
    )
        .into_response()
}

async fn delete_session(
    State(state): State<SharedState>,
    Path(id): Path<u32>,
    headers: HeaderMap,
) -> Response {
    let mut state = state.lock();
    if !authorized(&state, &headers) {
        return error(StatusCode::UNAUTHORIZED, "Base.1.4.NoValidSession", "No valid session.");
    }

    let before = state.sessions.len();
    state.sessions.retain(|_, session| *session != id);
    if state.sessions.len() == before {
        return error(StatusCode::NOT_FOUND, "Base.1.4.ResourceMissingAtURI", "No such session.");
    }
    StatusCode::NO_CONTENT.into_response()
}

/// Generic handler for everything in the resource tree
async fn resource(
    State(state): State<SharedState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let mut state = state.lock();
    if !authorized(&state, &headers) {
        return error(StatusCode::UNAUTHORIZED, "Base.1.4.NoValidSession", "No valid session.");
    }

    let path = normalize(uri.path()).to_string();
    let payload: Value = if body.is_empty() {
        Value::Null
    } else {
        match serde_json::from_slice(&body) {
            Ok(value) => value,
            Err(_) => {
                return error(
                    StatusCode::BAD_REQUEST,
                    "Base.1.4.MalformedJSON",
                    "The request body submitted was malformed JSON.",
                )
            }
        }
    };

    match method {
        Method::GET => match state.resources.get(&path) {
            Some(value) => Json(value.clone()).into_response(),
            None => not_found(&path),
        },
        Method::PATCH => match state.resources.get_mut(&path) {
            Some(Value::Object(existing)) => {
                if let Value::Object(changes) = payload {
                    existing.extend(changes);
                }
                StatusCode::NO_CONTENT.into_response()
            }
            _ => not_found(&path),
        },
        Method::POST => {
            let is_collection = state
                .resources
                .get(&path)
                .is_some_and(|r| r.get("Members").is_some());
            if is_collection {
                create_member(&mut state, &path, payload)
            } else {
                state.actions.push((path, payload));
                StatusCode::NO_CONTENT.into_response()
            }
        }
        Method::DELETE => {
            if state.resources.remove(&path).is_none() {
                return not_found(&path);
            }
            for collection in state.resources.values_mut() {
                if let Some(Value::Array(members)) = collection.get_mut("Members") {
                    members.retain(|m| {
                        m.get("@odata.id").and_then(Value::as_str) != Some(path.as_str())
                    });
                }
            }
            StatusCode::NO_CONTENT.into_response()
        }
        _ => StatusCode::METHOD_NOT_ALLOWED.into_response(),
    }
}

fn not_found(path: &str) -> Response {
    error(
        StatusCode::NOT_FOUND,
        "Base.1.4.ResourceMissingAtURI",
        &format!("The resource at the URI {} was not found.", path),
    )
}

fn create_member(state: &mut BmcState, collection: &str, payload: Value) -> Response {
    let Value::Object(mut fields) = payload else {
        return error(
            StatusCode::BAD_REQUEST,
            "Base.1.4.MalformedJSON",
            "The request body submitted was malformed JSON.",
        );
    };

    let id = (1..)
        .map(|n: u32| n.to_string())
        .find(|n| !state.resources.contains_key(&format!("{}/{}", collection, n)))
        .unwrap_or_default();
    let location = format!("{}/{}", collection, id);

    fields.insert("Id".into(), Value::from(id));
    state.resources.insert(location.clone(), Value::Object(fields));
    if let Some(Value::Array(members)) = state
        .resources
        .get_mut(collection)
        .and_then(|c| c.get_mut("Members"))
    {
        members.push(json!({"@odata.id": location}));
    }

    (StatusCode::CREATED, [("Location", location)]).into_response()
}
