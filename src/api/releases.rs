use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::AppState;
use crate::domain::{Release, ReleaseId, ReleasePayload};
use crate::error::AppError;

/// Page size used when the client sends no usable `limit`.
pub const DEFAULT_LIST_LIMIT: i64 = 50;
/// Largest page the list endpoint will return.
pub const MAX_LIST_LIMIT: i64 = 50;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReleaseResponse {
    pub message: String,
    pub new_release: Release,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReleaseResponse {
    pub message: String,
    pub updated_release: Value,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

pub async fn list_releases(
    Query(params): Query<ListQuery>,
    State(state): State<AppState>,
) -> Result<Json<Vec<Release>>, AppError> {
    let limit = resolve_limit(params.limit.as_deref());
    let releases = state.repo.list(limit).await?;
    Ok(Json(releases))
}

pub async fn get_release(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Release>, AppError> {
    let id = ReleaseId::new(id);
    state
        .repo
        .get(&id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Release not found".into()))
}

pub async fn create_release(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<CreateReleaseResponse>), AppError> {
    let payload = parse_payload(&body)?;
    let release = state.repo.insert(&ReleaseId::generate(), &payload).await?;
    debug!(id = %release.id, "release created");

    Ok((
        StatusCode::CREATED,
        Json(CreateReleaseResponse {
            message: "Release added successfully".to_string(),
            new_release: release,
        }),
    ))
}

/// Overwrites every mutable field. An unknown id still answers 200: the
/// statement simply matches no rows.
pub async fn update_release(
    Path(id): Path<String>,
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<UpdateReleaseResponse>, AppError> {
    let id = ReleaseId::new(id);
    let payload = parse_payload(&body)?;
    let rows_affected = state.repo.update(&id, &payload).await?;
    debug!(id = %id, rows_affected, "release updated");

    Ok(Json(UpdateReleaseResponse {
        message: "Release updated successfully".to_string(),
        updated_release: payload.into_raw(),
    }))
}

pub async fn delete_release(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = ReleaseId::new(id);
    let rows_affected = state.repo.delete(&id).await?;
    debug!(id = %id, rows_affected, "release deleted");

    Ok(Json(MessageResponse {
        message: "Release deleted successfully".to_string(),
    }))
}

/// Parse a request body regardless of its content type.
///
/// An empty body counts as `{}`; only syntactically invalid JSON is refused.
fn parse_payload(body: &[u8]) -> Result<ReleasePayload, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(ReleasePayload::from_json(Value::Object(Default::default())));
    }

    let value: Value = serde_json::from_slice(body)
        .map_err(|e| AppError::BadRequest(format!("Invalid JSON body: {}", e)))?;
    Ok(ReleasePayload::from_json(value))
}

/// Turn the raw `limit` query value into a row count in `0..=MAX_LIST_LIMIT`.
///
/// Missing, empty, or non-integer values fall back to the default.
fn resolve_limit(raw: Option<&str>) -> i64 {
    let raw = match raw.map(str::trim) {
        Some(s) if !s.is_empty() => s,
        _ => return DEFAULT_LIST_LIMIT,
    };

    match raw.parse::<i64>() {
        Ok(n) => n.clamp(0, MAX_LIST_LIMIT),
        Err(_) => {
            debug!(limit = raw, "ignoring non-numeric limit");
            DEFAULT_LIST_LIMIT
        }
    }
}
