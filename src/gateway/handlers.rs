use axum::{
    extract::{Query, State},
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode, header},
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::pipeline::{NO_SNIPPETS_MESSAGE, ResearchQuery, RunOutcome};
use crate::session::HistoryEntry;

use super::{AppState, ResearchBody, SESSION_HEADER};

/// Reuse the caller's session when the header carries a well-formed UUID,
/// mint a fresh one otherwise. Malformed ids are treated as absent rather
/// than rejected.
pub(super) fn resolve_session(headers: &HeaderMap) -> Uuid {
    headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|raw| Uuid::parse_str(raw.trim()).ok())
        .unwrap_or_else(Uuid::new_v4)
}

/// Echo the resolved session id on the response so clients can store it.
fn with_session(session: Uuid, response: impl IntoResponse) -> Response {
    let mut response = response.into_response();
    if let Ok(value) = HeaderValue::from_str(&session.to_string()) {
        response
            .headers_mut()
            .insert(HeaderName::from_static(SESSION_HEADER), value);
    }
    response
}

fn draft_json(number: usize, entry: &HistoryEntry) -> serde_json::Value {
    serde_json::json!({
        "number": number,
        "query": entry.query,
        "answer": entry.answer,
        "created_at": entry.created_at,
    })
}

/// GET /health -- always public, nothing secret in the body.
pub(super) async fn handle_health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "model": state.config.drafting.model,
        "sessions": state.sessions.session_count(),
    }))
}

/// POST /research -- run one query through retrieval and drafting.
///
/// A run that retrieved nothing is still a 200: the caller gets the uniform
/// no-snippets message instead of an answer. A failed draft is a 502 carrying
/// whatever snippets were collected.
pub(super) async fn handle_research(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<ResearchBody>, axum::extract::rejection::JsonRejection>,
) -> Response {
    let session = resolve_session(&headers);

    let Json(body) = match body {
        Ok(b) => b,
        Err(e) => {
            let err = serde_json::json!({
                "error": format!("Invalid JSON: {e}. Expected: {{\"query\": \"...\"}}")
            });
            return with_session(session, (StatusCode::BAD_REQUEST, Json(err)));
        }
    };

    let query = ResearchQuery::new(
        body.query,
        body.max_results
            .unwrap_or(state.config.search.max_results),
        body.temperature
            .unwrap_or(state.config.drafting.temperature),
    );

    let history = state.sessions.history(session);
    let mut history = history.lock().await;
    let outcome = state.pipeline.run(&query, &mut history).await;
    let total_drafts = history.len();
    drop(history);

    let response = match outcome {
        RunOutcome::Drafted { snippets, answer } => {
            let body = serde_json::json!({
                "query": query.question(),
                "answer": answer,
                "snippets": snippets,
                "max_results": query.max_results(),
                "temperature": query.temperature(),
                "drafts": total_drafts,
            });
            (StatusCode::OK, Json(body))
        }
        RunOutcome::NoSnippets { error } => {
            let body = serde_json::json!({
                "query": query.question(),
                "answer": serde_json::Value::Null,
                "message": NO_SNIPPETS_MESSAGE,
                "cause": error.map(|e| e.to_string()),
            });
            (StatusCode::OK, Json(body))
        }
        RunOutcome::DraftFailed { snippets, error } => {
            let body = serde_json::json!({
                "error": format!("drafting failed: {error}"),
                "snippets": snippets,
            });
            (StatusCode::BAD_GATEWAY, Json(body))
        }
    };

    with_session(session, response)
}

/// GET /history -- recent drafts for the caller's session, newest first.
pub(super) async fn handle_history(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Response {
    let session = resolve_session(&headers);
    let history = state.sessions.history(session);
    let history = history.lock().await;

    let drafts: Vec<serde_json::Value> = history
        .recent()
        .map(|(number, entry)| draft_json(number, entry))
        .collect();
    let body = serde_json::json!({
        "total": history.len(),
        "drafts": drafts,
    });
    drop(history);

    with_session(session, Json(body))
}

/// GET /download query params. Browsers cannot attach custom headers to a
/// plain download link, so the session id is also accepted as a query
/// parameter, which wins over the header when both are present.
#[derive(Deserialize)]
pub(super) struct DownloadQuery {
    session: Option<String>,
}

/// GET /download -- the latest draft as a `text/plain` attachment.
pub(super) async fn handle_download(
    State(state): State<AppState>,
    Query(params): Query<DownloadQuery>,
    headers: HeaderMap,
) -> Response {
    let session = params
        .session
        .as_deref()
        .and_then(|raw| Uuid::parse_str(raw.trim()).ok())
        .unwrap_or_else(|| resolve_session(&headers));

    let history = state.sessions.history(session);
    let history = history.lock().await;
    let Some(entry) = history.latest().cloned() else {
        drop(history);
        let err = serde_json::json!({"error": "No drafts in this session yet"});
        return with_session(session, (StatusCode::NOT_FOUND, Json(err)));
    };
    drop(history);

    let download_headers = [
        (
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/plain; charset=utf-8"),
        ),
        (
            header::CONTENT_DISPOSITION,
            HeaderValue::from_static("attachment; filename=\"drafted_answer.txt\""),
        ),
    ];
    with_session(session, (download_headers, entry.answer))
}
