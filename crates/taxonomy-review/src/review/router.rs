use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use crate::catalog::{CatalogError, CatalogRepository};

use super::domain::ProjectInfo;
use super::repository::{ReviewId, ReviewSession, SessionRepository, SessionRepositoryError};
use super::service::{EvaluateRequest, ReviewService, ReviewServiceError};
use super::wizard::ReviewEvent;

/// Router builder exposing review sessions and the one-shot evaluator.
pub fn review_router<C, S>(service: Arc<ReviewService<C, S>>) -> Router
where
    C: CatalogRepository + 'static,
    S: SessionRepository + 'static,
{
    Router::new()
        .route("/api/v1/reviews", post(start_handler::<C, S>))
        .route("/api/v1/reviews/:review_id", get(status_handler::<C, S>))
        .route(
            "/api/v1/reviews/:review_id/events",
            post(event_handler::<C, S>),
        )
        .route(
            "/api/v1/reviews/:review_id/advance",
            post(advance_handler::<C, S>),
        )
        .route("/api/v1/reviews/:review_id/back", post(back_handler::<C, S>))
        .route(
            "/api/v1/eligibility/evaluate",
            post(evaluate_handler::<C, S>),
        )
        .with_state(service)
}

/// Body of `POST /api/v1/reviews`; project details may be filled in later.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StartReview {
    pub project: ProjectInfo,
}

pub(crate) async fn start_handler<C, S>(
    State(service): State<Arc<ReviewService<C, S>>>,
    axum::Json(request): axum::Json<StartReview>,
) -> Response
where
    C: CatalogRepository + 'static,
    S: SessionRepository + 'static,
{
    match service.start(request.project) {
        Ok(session) => (StatusCode::CREATED, axum::Json(session.view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn status_handler<C, S>(
    State(service): State<Arc<ReviewService<C, S>>>,
    Path(review_id): Path<String>,
) -> Response
where
    C: CatalogRepository + 'static,
    S: SessionRepository + 'static,
{
    session_response(service.get(&ReviewId(review_id)))
}

pub(crate) async fn event_handler<C, S>(
    State(service): State<Arc<ReviewService<C, S>>>,
    Path(review_id): Path<String>,
    axum::Json(event): axum::Json<ReviewEvent>,
) -> Response
where
    C: CatalogRepository + 'static,
    S: SessionRepository + 'static,
{
    session_response(service.apply(&ReviewId(review_id), event))
}

pub(crate) async fn advance_handler<C, S>(
    State(service): State<Arc<ReviewService<C, S>>>,
    Path(review_id): Path<String>,
) -> Response
where
    C: CatalogRepository + 'static,
    S: SessionRepository + 'static,
{
    session_response(service.advance(&ReviewId(review_id)))
}

pub(crate) async fn back_handler<C, S>(
    State(service): State<Arc<ReviewService<C, S>>>,
    Path(review_id): Path<String>,
) -> Response
where
    C: CatalogRepository + 'static,
    S: SessionRepository + 'static,
{
    session_response(service.back(&ReviewId(review_id)))
}

pub(crate) async fn evaluate_handler<C, S>(
    State(service): State<Arc<ReviewService<C, S>>>,
    axum::Json(request): axum::Json<EvaluateRequest>,
) -> Response
where
    C: CatalogRepository + 'static,
    S: SessionRepository + 'static,
{
    match service.evaluate(request) {
        Ok(outcome) => (StatusCode::OK, axum::Json(outcome)).into_response(),
        Err(error) => error_response(error),
    }
}

fn session_response(result: Result<ReviewSession, ReviewServiceError>) -> Response {
    match result {
        Ok(session) => (StatusCode::OK, axum::Json(session.view())).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: ReviewServiceError) -> Response {
    let status = match &error {
        ReviewServiceError::Repository(SessionRepositoryError::NotFound)
        | ReviewServiceError::Catalog(CatalogError::NotFound { .. }) => StatusCode::NOT_FOUND,
        ReviewServiceError::Repository(SessionRepositoryError::Conflict) => StatusCode::CONFLICT,
        ReviewServiceError::Wizard(_) | ReviewServiceError::CriteriaUnavailable => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
