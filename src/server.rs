use crate::{
    compare::Comparator,
    config::Config,
    errors::{RequestOutcome, Role},
    ingest::{PartPayload, UploadPart, UploadSet},
    outcome, render,
};
use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;

#[derive(Clone)]
pub struct AppState {
    pub cfg: Arc<Config>,
    pub comparator: Arc<dyn Comparator>,
}

pub async fn serve(cfg: Config, comparator: Arc<dyn Comparator>) -> anyhow::Result<()> {
    let shared = AppState { cfg: Arc::new(cfg), comparator };
    let app = build_router(shared.clone());

    let addr: std::net::SocketAddr =
        format!("{}:{}", shared.cfg.server.bind_addr, shared.cfg.server.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn build_router(shared: AppState) -> Router {
    use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};
    let limit_bytes = shared.cfg.limits.max_upload_kb * 1024;
    Router::new()
        .route("/healthz", get(health))
        .route(
            "/",
            get(index)
                .post(submit)
                .layer::<_, std::convert::Infallible>(RequestBodyLimitLayer::new(limit_bytes))
                .layer(DefaultBodyLimit::max(limit_bytes)),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(shared)
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status":"ok"})))
}

async fn index(headers: HeaderMap) -> Response {
    let format = render::negotiate(&headers);
    page_response(StatusCode::OK, format, render::page(None, format))
}

async fn submit(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Response {
    let started = Instant::now();
    let request_id = uuid::Uuid::new_v4().to_string();

    let set = collect_parts(multipart).await;
    let outcome = outcome::assemble(
        &state.cfg.workspace.scratch_root,
        state.cfg.debug.expose_diagnostics,
        state.comparator.as_ref(),
        set,
    )
    .await;

    let status = outcome.status();
    tracing::info!(
        request_id = request_id,
        outcome = outcome.kind(),
        status = status.as_u16(),
        duration_ms = started.elapsed().as_millis() as u64,
        "compare request"
    );

    // Debug diagnostics bypass the page template entirely.
    if let RequestOutcome::ExecutionFailure { detail: Some(detail), .. } = &outcome {
        return (
            status,
            [(CONTENT_TYPE, "text/plain; charset=UTF-8")],
            detail.clone(),
        )
            .into_response();
    }

    let format = render::negotiate(&headers);
    page_response(status, format, render::page(Some(&outcome), format))
}

/// Drain the multipart stream into the two role slots. A part whose client
/// file name is empty (no file chosen) counts as absent; a failed body read
/// marks that role as a transport error. If the stream itself breaks, the
/// roles that never arrived surface as missing downstream.
async fn collect_parts(mut multipart: Multipart) -> UploadSet {
    let mut set = UploadSet::default();
    loop {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                let role = match field.name() {
                    Some(name) if name == Role::Actual.field_name() => Role::Actual,
                    Some(name) if name == Role::Planned.field_name() => Role::Planned,
                    _ => continue,
                };
                let file_name = field.file_name().unwrap_or("").to_string();
                if file_name.is_empty() {
                    continue;
                }
                let payload = match field.bytes().await {
                    Ok(bytes) => PartPayload::Complete(bytes),
                    Err(_) => PartPayload::TransportError,
                };
                set.insert(role, UploadPart { file_name, payload });
            }
            Ok(None) => break,
            Err(_) => break,
        }
    }
    set
}

fn page_response(status: StatusCode, format: render::PageFormat, body: String) -> Response {
    (status, [(CONTENT_TYPE, format.content_type())], body).into_response()
}
