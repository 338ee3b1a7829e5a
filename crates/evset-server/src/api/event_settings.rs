use crate::api::error_response;
use crate::logging::TraceId;
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch};
use axum::{Json, Router};
use evset_common::profile::FieldProfiles;
use evset_common::types::{Condition, CreatedId, Threshold};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/event-settings",
            get(list_event_settings).post(create_event_setting),
        )
        .route(
            "/event-settings/{id}",
            patch(update_event_setting).delete(delete_event_setting),
        )
}

/// Rejects payloads no editor would produce after validation.
fn check_payload(condition: &Condition, profiles: &FieldProfiles) -> Result<(), String> {
    if condition.field_key.trim().is_empty() {
        return Err("fieldKey is required".to_string());
    }
    let boolean = profiles.is_boolean(&condition.field_key);
    match condition.threshold {
        Threshold::Range { .. } if boolean => Err(format!(
            "field '{}' only supports SINGLE conditions",
            condition.field_key
        )),
        Threshold::Range {
            left_value: Some(left),
            right_value: Some(right),
        } => {
            if left >= right {
                Err("leftValue must be less than rightValue".to_string())
            } else {
                Ok(())
            }
        }
        Threshold::Range { .. } => Err("leftValue and rightValue are required".to_string()),
        Threshold::Single {
            threshold_value: None,
            ..
        } if !boolean => Err("thresholdValue is required".to_string()),
        Threshold::Single { .. } => Ok(()),
    }
}

fn bad_body(trace_id: &str, rejection: &JsonRejection) -> Response {
    error_response(
        StatusCode::BAD_REQUEST,
        trace_id,
        "bad_request",
        &rejection.body_text(),
    )
}

fn not_found(trace_id: &str, id: i64) -> Response {
    error_response(
        StatusCode::NOT_FOUND,
        trace_id,
        "not_found",
        &format!("event setting {id} not found"),
    )
}

async fn list_event_settings(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.repo().list_groups())
}

async fn create_event_setting(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    body: Result<Json<Condition>, JsonRejection>,
) -> Response {
    let condition = match body {
        Ok(Json(c)) => c,
        Err(rejection) => return bad_body(&trace_id, &rejection),
    };
    if let Err(msg) = check_payload(&condition, &state.profiles) {
        return error_response(StatusCode::BAD_REQUEST, &trace_id, "invalid_condition", &msg);
    }

    let field_key = condition.field_key.clone();
    let id = state.repo().create(condition);
    tracing::info!(id, field_key = %field_key, "Event setting created");
    (StatusCode::CREATED, Json(CreatedId { id })).into_response()
}

async fn update_event_setting(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    body: Result<Json<Condition>, JsonRejection>,
) -> Response {
    let condition = match body {
        Ok(Json(c)) => c,
        Err(rejection) => return bad_body(&trace_id, &rejection),
    };
    if let Err(msg) = check_payload(&condition, &state.profiles) {
        return error_response(StatusCode::BAD_REQUEST, &trace_id, "invalid_condition", &msg);
    }

    if !state.repo().update(id, condition) {
        return not_found(&trace_id, id);
    }
    tracing::info!(id, "Event setting updated");
    StatusCode::NO_CONTENT.into_response()
}

async fn delete_event_setting(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Response {
    if !state.repo().delete(id) {
        return not_found(&trace_id, id);
    }
    tracing::info!(id, "Event setting deleted");
    StatusCode::NO_CONTENT.into_response()
}
