//! HTTP request handlers for the packing-list service.
//!
//! Implements packing-list generation and health check endpoints using axum.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router as AxumRouter,
};
use packwise_domain::{DomainError, PackingItem, PackingListResult, TripRequest};
use packwise_pipeline::{Pipeline, PipelineError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Request pipeline
    pub pipeline: Arc<Pipeline>,
}

/// Query string of `GET /generate-packing-list`
#[derive(Debug, Deserialize)]
pub struct PackingListQuery {
    /// Travel destination
    pub destination: String,
    /// Trip length in days
    pub num_day: i64,
}

/// Successful packing-list response
#[derive(Debug, Serialize, Deserialize)]
pub struct PackingListResponse {
    /// Destination as requested
    pub destination: String,
    /// Trip length in days; the field name is kept for existing clients
    pub number_of_people: u32,
    /// Answer-engine summary
    pub summary: String,
    /// Items with quantities
    pub packing_list: Vec<PackingItem>,
}

impl From<PackingListResult> for PackingListResponse {
    fn from(result: PackingListResult) -> Self {
        Self {
            destination: result.destination,
            number_of_people: result.days,
            summary: result.summary,
            packing_list: result.items,
        }
    }
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    /// Always "ok" while the process serves requests
    pub status: String,
    /// Crate version
    pub version: String,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

/// Application error type
#[derive(Debug)]
pub struct AppError(PipelineError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = Json(ErrorResponse {
            error: self.0.to_string(),
        });
        (status, body).into_response()
    }
}

impl From<PipelineError> for AppError {
    fn from(e: PipelineError) -> Self {
        AppError(e)
    }
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        AppError(PipelineError::InvalidRequest(e))
    }
}

/// GET /generate-packing-list - Build a packing list for a trip
#[instrument(
    skip_all,
    fields(destination = %query.destination, num_day = query.num_day)
)]
async fn generate_packing_list(
    State(state): State<AppState>,
    query: Query<PackingListQuery>,
) -> Result<Json<PackingListResponse>, AppError> {
    let request = TripRequest::new(&query.destination, query.num_day)?;
    let result = state.pipeline.run(&request).await?;
    Ok(Json(result.into()))
}

/// GET /health - Liveness check
async fn health_check() -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Create the axum router with all routes
pub fn create_router(state: AppState) -> AxumRouter {
    AxumRouter::new()
        .route("/generate-packing-list", get(generate_packing_list))
        .route("/health", get(health_check))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_renames_days() {
        let result = PackingListResult {
            destination: "Hawaii".to_string(),
            days: 3,
            summary: "Warm.".to_string(),
            items: vec![PackingItem {
                item: "Tシャツ".to_string(),
                quantity: 3,
            }],
        };
        let json = serde_json::to_value(PackingListResponse::from(result)).unwrap();
        assert_eq!(json["number_of_people"], 3);
        assert_eq!(json["packing_list"][0]["item"], "Tシャツ");
        assert_eq!(json["packing_list"][0]["quantity"], 3);
    }

    #[test]
    fn test_validation_error_is_unprocessable() {
        let response = AppError::from(DomainError::InvalidDays(0)).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_deadline_is_gateway_timeout() {
        let response = AppError::from(PipelineError::DeadlineExceeded(120)).into_response();
        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
    }
}
