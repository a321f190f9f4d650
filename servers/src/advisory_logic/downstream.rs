use crate::advisory_logic::config::Config;
use crate::advisory_logic::model::{
    ClientMessage, LoginRequest, LoginResponse, ServerMessage, StatusChange, StatusReport,
};
use crate::advisory_logic::state::AppState;
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, patch, post},
    Json, Router,
};
use axum_server::tls_rustls::RustlsConfig;
use futures_util::StreamExt;
use lib_advisory::models::{CallDraft, UserRole};
use lib_advisory::performance;
use lib_advisory::store::{DocStore, StoreError};
use serde_json::json;
use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::broadcast;

static NEXT_CLIENT_ID: AtomicUsize = AtomicUsize::new(1);

pub async fn run(config: Config, app_state: AppState, mut shutdown: broadcast::Receiver<()>) {
    let app = Router::new()
        .route("/ws", get(ws_handler))
        .route("/health", get(health_handler))
        .route("/status", get(status_handler))
        .route("/login", post(login_handler))
        .route("/admin/broadcast", post(broadcast_handler))
        .route("/admin/calls", post(add_call_handler))
        .route("/admin/calls/{id}/status", patch(change_status_handler))
        .route("/admin/calls/{id}", delete(delete_call_handler))
        .route("/admin/performance", get(performance_handler))
        .with_state(app_state);

    let port = config.port.unwrap_or(9010);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    log::info!("Downstream server listening on {}", addr);

    // TLS only when both PEM files are actually present; plain HTTP
    // otherwise (local development, reverse-proxied deployments).
    let tls_files = match (&config.tls_cert_path, &config.tls_key_path) {
        (Some(cert), Some(key)) if cert.exists() && key.exists() => {
            Some((cert.clone(), key.clone()))
        }
        _ => None,
    };

    if let Some((cert_path, key_path)) = tls_files {
        match RustlsConfig::from_pem_file(cert_path, key_path).await {
            Ok(tls_config) => {
                if let Err(e) = axum_server::bind_rustls(addr, tls_config)
                    .serve(app.into_make_service())
                    .await
                {
                    log::error!("TLS server terminated: {}", e);
                }
            }
            Err(e) => log::error!("Failed to load TLS configuration: {}", e),
        }
    } else {
        let listener = match tokio::net::TcpListener::bind(&addr).await {
            Ok(l) => l,
            Err(e) => {
                log::error!("Failed to bind {}: {}", addr, e);
                return;
            }
        };
        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                shutdown.recv().await.ok();
                log::info!("Downstream server shutting down.");
            })
            .await
        {
            log::error!("Server terminated: {}", e);
        }
    }
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

async fn status_handler(State(state): State<AppState>) -> Json<StatusReport> {
    let snapshot = state.store.snapshot().await;
    Json(StatusReport {
        status: state.status().await,
        last_updated: snapshot.updated_at.to_rfc3339(),
    })
}

async fn login_handler(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Json<LoginResponse> {
    let role = if req.admin {
        UserRole::Admin
    } else {
        UserRole::Client
    };
    let profile = DocStore::new_profile(&req.full_name, &req.mobile, role);
    let synced = state.store.sync_user(profile).await;
    Json(LoginResponse {
        degraded: synced.is_degraded(),
        profile: synced.profile().clone(),
    })
}

/// The operator's refresh trigger. Not single-flight: a second
/// concurrent trigger interleaves and the last snapshot write wins.
async fn broadcast_handler(State(state): State<AppState>) -> impl IntoResponse {
    state.set_status("BROADCASTING...").await;

    match state.broadcaster.broadcast_refresh().await {
        Ok(report) => {
            state.set_market_status().await;
            Json(report).into_response()
        }
        Err(e) => {
            log::error!("Broadcast failed: {}", e);
            state.set_status("SYNC FAILED").await;
            (StatusCode::INTERNAL_SERVER_ERROR, "SYNC FAILED").into_response()
        }
    }
}

async fn add_call_handler(
    State(state): State<AppState>,
    Json(draft): Json<CallDraft>,
) -> impl IntoResponse {
    match state.store.add_call(draft).await {
        Ok(call) => (StatusCode::CREATED, Json(call)).into_response(),
        Err(e) => store_error_response(e),
    }
}

async fn change_status_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(change): Json<StatusChange>,
) -> impl IntoResponse {
    match state.store.update_call_status(&id, change.status).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => store_error_response(e),
    }
}

async fn delete_call_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.store.delete_call(&id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => store_error_response(e),
    }
}

async fn performance_handler(State(state): State<AppState>) -> impl IntoResponse {
    let calls = state.store.calls().await;
    Json(json!({
        "summary": performance::summarize(&calls),
        "breakdown": performance::pnl_breakdown(&calls),
    }))
}

/// Short status strings only; detail goes to the log.
fn store_error_response(e: StoreError) -> axum::response::Response {
    match e {
        StoreError::NotFound(id) => {
            (StatusCode::NOT_FOUND, format!("call not found: {}", id)).into_response()
        }
        other => {
            log::error!("Store operation failed: {}", other);
            (StatusCode::INTERNAL_SERVER_ERROR, "persistence unavailable").into_response()
        }
    }
}

async fn handle_socket(mut socket: WebSocket, state: AppState) {
    let client_id = NEXT_CLIENT_ID.fetch_add(1, Ordering::Relaxed);
    log::info!("Client {} connected", client_id);

    let (initial_calls, mut calls_rx) = state.store.subscribe_calls().await;
    let (initial_snapshot, mut snapshot_rx) = state.store.subscribe_snapshot().await;

    // Both channels deliver in full on subscribe; clients may narrow the
    // set afterwards with a ClientMessage.
    let mut active: HashSet<String> = ["calls", "snapshot"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    if !push(&mut socket, "calls", json!(&*initial_calls)).await {
        return;
    }
    if !push(&mut socket, "snapshot", json!(&*initial_snapshot)).await {
        return;
    }

    loop {
        tokio::select! {
            // Handle incoming messages from the client
            msg = socket.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        if let Ok(client_msg) = serde_json::from_str::<ClientMessage>(&text) {
                            if let Some(channels) = client_msg.channels {
                                active = channels.into_iter().collect();
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(_)) => break, // client disconnected
                }
            }
            // Full-replace re-delivery of the call collection
            res = calls_rx.recv() => {
                match res {
                    Ok(calls) => {
                        if active.contains("calls") && !push(&mut socket, "calls", json!(&*calls)).await {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        log::warn!("Client {} lagged {} call deliveries", client_id, skipped);
                    }
                }
            }
            // Full-replace re-delivery of the snapshot singleton
            res = snapshot_rx.recv() => {
                match res {
                    Ok(snapshot) => {
                        if active.contains("snapshot") && !push(&mut socket, "snapshot", json!(&*snapshot)).await {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        log::warn!("Client {} lagged {} snapshot deliveries", client_id, skipped);
                    }
                }
            }
        }
    }

    log::info!("Client {} disconnected", client_id);
}

/// Sends one envelope; false when the client is gone.
async fn push(socket: &mut WebSocket, r#type: &str, message: serde_json::Value) -> bool {
    let server_msg = ServerMessage {
        r#type: r#type.to_string(),
        message: Some(message),
        error: None,
    };
    match serde_json::to_string(&server_msg) {
        Ok(json_str) => socket.send(Message::Text(json_str.into())).await.is_ok(),
        Err(_) => true,
    }
}
