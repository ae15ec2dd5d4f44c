// crates/mirror-acceptance-core/tests/common/mod.rs
// ============================================================================
// Module: Mirror REST Stub
// Description: Loopback axum server serving account and balance fixtures.
// Purpose: Drive the acceptance suites against a controllable REST API.
// Dependencies: axum, mirror-acceptance-core, serde_json, tokio
// ============================================================================

//! ## Overview
//! Serves `/api/v1/accounts`, `/api/v1/accounts/{id}` and `/api/v1/balances`
//! from in-memory fixtures with `account.id`, `timestamp` and `limit`
//! filtering. Fault rules replace the response for matching requests so
//! tests can inject bad statuses, invalid JSON or wrong records.

#![allow(
    dead_code,
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::missing_docs_in_private_items,
    reason = "Shared test helpers are not used by every test binary."
)]

use std::net::TcpListener as StdTcpListener;
use std::str::FromStr;
use std::sync::Arc;
use std::sync::Mutex;
use std::thread;

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::http::Uri;
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use axum::response::Response;
use mirror_acceptance_config::ApiConfig;
use mirror_acceptance_config::ClientConfig;
use mirror_acceptance_core::AcceptanceEvent;
use mirror_acceptance_core::ConsensusTimestamp;
use mirror_acceptance_core::EntityId;
use mirror_acceptance_core::EventSink;
use mirror_acceptance_core::MirrorClient;
use serde_json::Value;
use serde_json::json;
use tokio::runtime::Builder;
use tokio::sync::oneshot;

/// API prefix served by the stub.
pub const API_PREFIX: &str = "/api/v1";
/// Page size used by fixtures unless a test overrides it.
pub const DEFAULT_MAX_LIMIT: u32 = 12;
/// Snapshot timestamp used by balance envelopes and account balances.
pub const SNAPSHOT_TIMESTAMP: &str = "1700000000.123456789";

// ============================================================================
// SECTION: Fixtures
// ============================================================================

/// Replacement response for matching requests.
#[derive(Clone, Debug)]
pub enum Fault {
    /// Respond with an empty body and this status.
    Status(u16),
    /// Respond 200 with a body that is not JSON.
    InvalidJson,
    /// Respond 200 with this JSON body.
    Body(Value),
}

/// Applies `fault` to requests on `path` whose query contains `query`.
#[derive(Clone, Debug)]
pub struct FaultRule {
    pub path: String,
    pub query: String,
    pub fault: Fault,
}

impl FaultRule {
    pub fn new(path: &str, query: &str, fault: Fault) -> Self {
        Self {
            path: path.to_string(),
            query: query.to_string(),
            fault,
        }
    }

    fn matches(&self, path: &str, query: &str) -> bool {
        self.path == path && query.contains(&self.query)
    }
}

/// In-memory REST API contents.
#[derive(Clone, Debug)]
pub struct MirrorFixture {
    pub max_limit: usize,
    pub accounts: Vec<Value>,
    pub balances: Vec<Value>,
    pub balances_timestamp: Value,
    pub faults: Vec<FaultRule>,
}

impl MirrorFixture {
    /// Builds `count` accounts and balances; the last record sits in realm 1
    /// so it carries the highest ordinal.
    pub fn with_records(count: usize, max_limit: u32) -> Self {
        let ids: Vec<String> = (0..count)
            .map(|index| {
                if index + 1 == count {
                    "0.1.2".to_string()
                } else {
                    format!("0.0.{}", 1001 + index)
                }
            })
            .collect();
        Self {
            max_limit: usize::try_from(max_limit).unwrap_or(usize::MAX),
            accounts: ids.iter().map(|id| account_record(id)).collect(),
            balances: ids.iter().map(|id| balance_record(id)).collect(),
            balances_timestamp: json!(SNAPSHOT_TIMESTAMP),
            faults: Vec::new(),
        }
    }

    pub fn full() -> Self {
        Self::with_records(12, DEFAULT_MAX_LIMIT)
    }

    pub fn with_fault(mut self, path: &str, query: &str, fault: Fault) -> Self {
        self.faults.push(FaultRule::new(path, query, fault));
        self
    }
}

pub fn account_record(id: &str) -> Value {
    json!({
        "account": id,
        "balance": { "balance": 1_000, "timestamp": SNAPSHOT_TIMESTAMP, "tokens": [] },
        "expiry_timestamp": null,
        "auto_renew_period": null,
        "key": null,
        "deleted": false,
    })
}

pub fn balance_record(id: &str) -> Value {
    json!({ "account": id, "balance": 1_000, "tokens": [] })
}

// ============================================================================
// SECTION: Server
// ============================================================================

#[derive(Clone)]
struct StubState {
    fixture: Arc<MirrorFixture>,
    requests: Arc<Mutex<Vec<String>>>,
}

/// Handle for the running stub; shuts the server down on drop.
pub struct MirrorStubHandle {
    base_url: String,
    shutdown: Option<oneshot::Sender<()>>,
    join: Option<thread::JoinHandle<()>>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MirrorStubHandle {
    /// Returns the API base URL including `/api/v1`.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns every requested `path?query`, prefix stripped.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().map_or_else(|_| Vec::new(), |entries| entries.clone())
    }

    /// Builds a client and API config pointed at this stub.
    pub fn client(&self, max_limit: u32) -> (MirrorClient, ApiConfig) {
        let client = MirrorClient::new(&ClientConfig::default(), &self.base_url).expect("client");
        (client, ApiConfig::new(self.base_url.clone(), max_limit))
    }
}

impl Drop for MirrorStubHandle {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(join) = self.join.take() {
            let _ = join.join();
        }
    }
}

/// Starts the stub on a loopback port in its own runtime thread.
pub fn spawn_mirror_stub(fixture: MirrorFixture) -> Result<MirrorStubHandle, String> {
    let listener = StdTcpListener::bind("127.0.0.1:0")
        .map_err(|err| format!("mirror stub bind failed: {err}"))?;
    listener
        .set_nonblocking(true)
        .map_err(|err| format!("mirror stub listener nonblocking failed: {err}"))?;
    let addr =
        listener.local_addr().map_err(|err| format!("mirror stub local addr failed: {err}"))?;
    let base_url = format!("http://{addr}{API_PREFIX}");

    let requests = Arc::new(Mutex::new(Vec::new()));
    let state = StubState {
        fixture: Arc::new(fixture),
        requests: Arc::clone(&requests),
    };
    let app = Router::new().fallback(handle_request).with_state(state);
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let join = thread::spawn(move || {
        let Ok(runtime) = Builder::new_current_thread().enable_all().build() else {
            return;
        };
        runtime.block_on(async move {
            let Ok(listener) = tokio::net::TcpListener::from_std(listener) else {
                return;
            };
            let server = axum::serve(listener, app).with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            });
            let _ = server.await;
        });
    });
    Ok(MirrorStubHandle {
        base_url,
        shutdown: Some(shutdown_tx),
        join: Some(join),
        requests,
    })
}

/// Returns a base URL on a port with nothing listening.
pub fn unreachable_base_url() -> String {
    let listener = StdTcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    format!("http://{addr}{API_PREFIX}")
}

async fn handle_request(State(state): State<StubState>, uri: Uri) -> Response {
    let path = uri.path().strip_prefix(API_PREFIX).unwrap_or(uri.path()).to_string();
    let query = uri.query().unwrap_or_default().to_string();
    if let Ok(mut requests) = state.requests.lock() {
        if query.is_empty() {
            requests.push(path.clone());
        } else {
            requests.push(format!("{path}?{query}"));
        }
    }

    if let Some(rule) = state.fixture.faults.iter().find(|rule| rule.matches(&path, &query)) {
        return fault_response(&rule.fault);
    }

    let params = parse_query(&query);
    let fixture = &state.fixture;
    match path.as_str() {
        "/accounts" => {
            let accounts = filter_records(&fixture.accounts, &params, fixture.max_limit, |record| {
                record.get("balance").and_then(|balance| balance.get("timestamp")).cloned()
            });
            Json(json!({ "accounts": accounts, "links": { "next": null } })).into_response()
        }
        "/balances" => {
            let envelope_timestamp = fixture.balances_timestamp.clone();
            let balances = filter_records(&fixture.balances, &params, fixture.max_limit, |_| {
                Some(envelope_timestamp.clone())
            });
            let mut body = json!({ "balances": balances, "links": { "next": null } });
            if !fixture.balances_timestamp.is_null() {
                body["timestamp"] = fixture.balances_timestamp.clone();
            }
            Json(body).into_response()
        }
        other => match other.strip_prefix("/accounts/") {
            Some(id) => fixture
                .accounts
                .iter()
                .find(|record| record["account"] == id)
                .map_or_else(
                    || StatusCode::NOT_FOUND.into_response(),
                    |record| Json(record.clone()).into_response(),
                ),
            None => StatusCode::NOT_FOUND.into_response(),
        },
    }
}

fn fault_response(fault: &Fault) -> Response {
    match fault {
        Fault::Status(code) => {
            StatusCode::from_u16(*code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR).into_response()
        }
        Fault::InvalidJson => {
            (StatusCode::OK, [(CONTENT_TYPE, "application/json")], "{\"accounts\": [").into_response()
        }
        Fault::Body(body) => Json(body.clone()).into_response(),
    }
}

fn parse_query(query: &str) -> Vec<(String, String)> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((key, value)) => (key.to_string(), value.to_string()),
            None => (pair.to_string(), String::new()),
        })
        .collect()
}

/// Applies `account.id`, `timestamp=gt:/lt:` and `limit` filters.
fn filter_records(
    records: &[Value],
    params: &[(String, String)],
    max_limit: usize,
    timestamp_of: impl Fn(&Value) -> Option<Value>,
) -> Vec<Value> {
    let mut limit = max_limit;
    let mut account: Option<EntityId> = None;
    let mut lower: Option<ConsensusTimestamp> = None;
    let mut upper: Option<ConsensusTimestamp> = None;
    for (key, value) in params {
        match key.as_str() {
            "limit" => limit = value.parse::<usize>().map_or(max_limit, |n| n.min(max_limit)),
            "account.id" => account = parse_account_param(value),
            "timestamp" => {
                if let Some(raw) = value.strip_prefix("gt:") {
                    lower = raw.parse().ok();
                } else if let Some(raw) = value.strip_prefix("lt:") {
                    upper = raw.parse().ok();
                }
            }
            _ => {}
        }
    }
    records
        .iter()
        .filter(|record| account.is_none_or(|id| record["account"] == id.to_string()))
        .filter(|record| {
            if lower.is_none() && upper.is_none() {
                return true;
            }
            let Some(timestamp) =
                timestamp_of(record).and_then(|raw| ConsensusTimestamp::from_value(&raw).ok())
            else {
                return false;
            };
            lower.as_ref().is_none_or(|bound| &timestamp > bound)
                && upper.as_ref().is_none_or(|bound| &timestamp < bound)
        })
        .take(limit)
        .cloned()
        .collect()
}

fn parse_account_param(value: &str) -> Option<EntityId> {
    if value.contains('.') {
        EntityId::from_str(value).ok()
    } else {
        value.parse::<u64>().ok().and_then(|ordinal| EntityId::from_ordinal(ordinal).ok())
    }
}

// ============================================================================
// SECTION: Event Capture
// ============================================================================

/// Sink that keeps every event in memory.
#[derive(Default)]
pub struct CapturingSink {
    events: Mutex<Vec<AcceptanceEvent>>,
}

impl CapturingSink {
    pub fn events(&self) -> Vec<AcceptanceEvent> {
        self.events.lock().map_or_else(|_| Vec::new(), |events| events.clone())
    }

    pub fn labels(&self) -> Vec<&'static str> {
        self.events().iter().map(|event| event.event).collect()
    }
}

impl EventSink for CapturingSink {
    fn record(&self, event: &AcceptanceEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}
