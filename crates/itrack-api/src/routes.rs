//! HTTP routes for the issue API
//!
//! Every domain outcome, success or failure, is answered with 200 and a
//! JSON body; failures carry an `error` string.

use crate::payload::Payload;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use itrack_core::issue::deserialize_text;
use itrack_core::{Error, Issue, IssueFilter, IssueStore, IssueUpdate, NewIssue};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared application state
pub struct AppState {
    store: Mutex<IssueStore>,
}

impl AppState {
    pub fn new(store: IssueStore) -> Self {
        Self {
            store: Mutex::new(store),
        }
    }

    /// Lock the store for one whole operation
    fn store(&self) -> MutexGuard<'_, IssueStore> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Request to update an issue
#[derive(Debug, Default, Deserialize)]
struct UpdateIssueRequest {
    #[serde(default, rename = "_id", deserialize_with = "deserialize_text")]
    id: Option<String>,
    #[serde(flatten)]
    changes: IssueUpdate,
}

/// Request to delete an issue
#[derive(Debug, Default, Deserialize)]
struct DeleteIssueRequest {
    #[serde(default, rename = "_id", deserialize_with = "deserialize_text")]
    id: Option<String>,
}

/// Acknowledgement of a mutation
#[derive(Debug, Serialize)]
struct Ack {
    result: &'static str,
    #[serde(rename = "_id")]
    id: String,
}

/// Domain failure body
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<String>,
}

/// Store error rendered as an HTTP response
#[derive(Debug)]
struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let ApiError(err) = self;
        let status = if err.is_domain() {
            StatusCode::OK
        } else {
            tracing::error!(error = %err, "Internal error");
            StatusCode::INTERNAL_SERVER_ERROR
        };
        let body = ErrorBody {
            error: err.to_string(),
            id: err.id().map(str::to_string),
        };
        (status, Json(body)).into_response()
    }
}

/// Health check endpoint
async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// List a project's issues, narrowed by query-string filters
async fn list_issues(
    State(state): State<Arc<AppState>>,
    Path(project): Path<String>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Json<Vec<Issue>> {
    let filter = IssueFilter::from_pairs(project, pairs);
    let issues: Vec<Issue> = state.store().query(&filter).into_iter().cloned().collect();
    tracing::debug!(
        project = filter.project_name(),
        filters = filter.len(),
        matched = issues.len(),
        "Listed issues"
    );
    Json(issues)
}

/// Create a new issue
async fn create_issue(
    State(state): State<Arc<AppState>>,
    Path(project): Path<String>,
    Payload(fields): Payload<NewIssue>,
) -> Result<Json<Issue>, ApiError> {
    let issue = state.store().create(&project, fields)?;
    tracing::info!(%issue, "Created issue");
    Ok(Json(issue))
}

/// Update an existing issue
async fn update_issue(
    State(state): State<Arc<AppState>>,
    Path(_project): Path<String>,
    Payload(req): Payload<UpdateIssueRequest>,
) -> Result<Json<Ack>, ApiError> {
    let id = state.store().update(req.id.as_deref(), req.changes)?;
    tracing::info!(%id, "Updated issue");
    Ok(Json(Ack {
        result: "successfully updated",
        id,
    }))
}

/// Delete an issue
async fn delete_issue(
    State(state): State<Arc<AppState>>,
    Path(_project): Path<String>,
    Payload(req): Payload<DeleteIssueRequest>,
) -> Result<Json<Ack>, ApiError> {
    let id = state.store().delete(req.id.as_deref())?;
    tracing::info!(%id, "Deleted issue");
    Ok(Json(Ack {
        result: "successfully deleted",
        id,
    }))
}

/// Build the router
pub fn router(state: Arc<AppState>, cors: bool) -> Router {
    let mut app = Router::new()
        .route("/health", get(health))
        .route(
            "/api/issues/{project}",
            get(list_issues)
                .post(create_issue)
                .put(update_issue)
                .delete(delete_issue),
        )
        .layer(TraceLayer::new_for_http());

    if cors {
        app = app.layer(CorsLayer::permissive());
    }

    app.with_state(state)
}
