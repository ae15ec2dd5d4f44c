// crates/mirror-acceptance-cli/tests/helpers/mod.rs
// ============================================================================
// Module: CLI Mirror Stub
// Description: Minimal loopback mirror REST API for binary tests.
// Purpose: Give the CLI a well-formed API so a full run can pass.
// Dependencies: axum, mirror-acceptance-core, serde_json, tokio
// ============================================================================

//! ## Overview
//! Serves ten accounts and ten balances under `/api/v1`. Only `account.id`
//! and `limit` are honored; timestamp filters return the first page.

#![allow(
    clippy::expect_used,
    clippy::missing_docs_in_private_items,
    reason = "Test helpers favor brevity."
)]

use std::net::TcpListener as StdTcpListener;
use std::thread;

use axum::Json;
use axum::Router;
use axum::http::StatusCode;
use axum::http::Uri;
use axum::response::IntoResponse;
use axum::response::Response;
use mirror_acceptance_core::EntityId;
use serde_json::Value;
use serde_json::json;
use tokio::runtime::Builder;
use tokio::sync::oneshot;

/// API prefix served by the stub.
const API_PREFIX: &str = "/api/v1";
/// Page size matching the served record count.
pub const STUB_MAX_LIMIT: u32 = 10;
const SNAPSHOT_TIMESTAMP: &str = "1700000000.123456789";

/// Running stub; stops the server on drop.
pub struct MirrorStub {
    base_url: String,
    shutdown: Option<oneshot::Sender<()>>,
    join: Option<thread::JoinHandle<()>>,
}

impl MirrorStub {
    /// Starts the stub on a loopback port.
    pub fn spawn() -> Self {
        let listener = StdTcpListener::bind("127.0.0.1:0").expect("bind loopback");
        listener.set_nonblocking(true).expect("nonblocking listener");
        let addr = listener.local_addr().expect("local addr");
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let join = thread::spawn(move || {
            let Ok(runtime) = Builder::new_current_thread().enable_all().build() else {
                return;
            };
            runtime.block_on(async move {
                let Ok(listener) = tokio::net::TcpListener::from_std(listener) else {
                    return;
                };
                let app = Router::new().fallback(handle_request);
                let server = axum::serve(listener, app).with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                });
                let _ = server.await;
            });
        });
        Self {
            base_url: format!("http://{addr}{API_PREFIX}"),
            shutdown: Some(shutdown_tx),
            join: Some(join),
        }
    }

    /// Returns the API base URL including `/api/v1`.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Drop for MirrorStub {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(join) = self.join.take() {
            let _ = join.join();
        }
    }
}

async fn handle_request(uri: Uri) -> Response {
    let path = uri.path().strip_prefix(API_PREFIX).unwrap_or(uri.path());
    let ids = select_ids(uri.query().unwrap_or_default());
    match path {
        "/accounts" => {
            let accounts: Vec<Value> = ids.iter().map(|id| account_record(id)).collect();
            Json(json!({ "accounts": accounts })).into_response()
        }
        "/balances" => {
            let balances: Vec<Value> =
                ids.iter().map(|id| json!({ "account": id, "balance": 5, "tokens": [] })).collect();
            Json(json!({ "timestamp": SNAPSHOT_TIMESTAMP, "balances": balances })).into_response()
        }
        other => match other.strip_prefix("/accounts/") {
            Some(id) if all_ids().iter().any(|known| known == id) => {
                Json(account_record(id)).into_response()
            }
            _ => StatusCode::NOT_FOUND.into_response(),
        },
    }
}

fn all_ids() -> Vec<String> {
    (1001..=1010).map(|num| format!("0.0.{num}")).collect()
}

fn select_ids(query: &str) -> Vec<String> {
    let mut ids = all_ids();
    for pair in query.split('&') {
        if let Some(value) = pair.strip_prefix("account.id=") {
            let wanted = resolve_id(value);
            ids.retain(|id| wanted.as_deref() == Some(id.as_str()));
        } else if let Some(limit) =
            pair.strip_prefix("limit=").and_then(|value| value.parse::<usize>().ok())
        {
            ids.truncate(limit);
        }
    }
    ids
}

fn resolve_id(value: &str) -> Option<String> {
    if value.contains('.') {
        return Some(value.to_string());
    }
    let ordinal = value.parse::<u64>().ok()?;
    EntityId::from_ordinal(ordinal).ok().map(|id| id.to_string())
}

fn account_record(id: &str) -> Value {
    json!({
        "account": id,
        "balance": { "balance": 5, "timestamp": SNAPSHOT_TIMESTAMP, "tokens": [] },
        "expiry_timestamp": null,
        "auto_renew_period": null,
        "key": null,
        "deleted": false,
    })
}
