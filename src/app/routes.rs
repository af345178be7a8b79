use crate::domain::model::AvailabilityResult;
use crate::domain::ports::AvailabilityService;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use std::sync::Arc;

type Service = Arc<dyn AvailabilityService>;

pub fn build_router(service: Service) -> Router {
    Router::new()
        .route("/today-availability", get(today_availability))
        .route("/health", get(health))
        .with_state(service)
}

async fn today_availability(
    State(service): State<Service>,
) -> Result<Json<AvailabilityResult>, (StatusCode, Json<serde_json::Value>)> {
    match service.today_availability().await {
        Ok(result) => Ok(Json(result)),
        Err(e) => {
            tracing::error!("Failed to assemble today's availability: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": e.to_string() })),
            ))
        }
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::SlotView;
    use crate::utils::error::{BoardError, Result};
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    struct StubService {
        fail: bool,
    }

    #[async_trait]
    impl AvailabilityService for StubService {
        async fn today_availability(&self) -> Result<AvailabilityResult> {
            if self.fail {
                return Err(BoardError::ProcessingError {
                    message: "bookings unavailable".to_string(),
                });
            }
            Ok(AvailabilityResult {
                date_display: "Monday, March 2, 2026".to_string(),
                grid: vec![
                    SlotView {
                        label: "9:00 AM".to_string(),
                        booked: false,
                    },
                    SlotView {
                        label: "9:30 AM".to_string(),
                        booked: true,
                    },
                ],
            })
        }
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_today_availability_returns_payload() {
        let router = build_router(Arc::new(StubService { fail: false }));
        let response = router
            .oneshot(
                Request::builder()
                    .uri("/today-availability")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["dateDisplay"], "Monday, March 2, 2026");
        assert_eq!(body["grid"][1]["label"], "9:30 AM");
        assert_eq!(body["grid"][1]["booked"], true);
    }

    #[tokio::test]
    async fn test_engine_failure_maps_to_500_with_error_body() {
        let router = build_router(Arc::new(StubService { fail: true }));
        let response = router
            .oneshot(
                Request::builder()
                    .uri("/today-availability")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("bookings unavailable"));
    }

    #[tokio::test]
    async fn test_health_returns_ok_and_timestamp() {
        let router = build_router(Arc::new(StubService { fail: false }));
        let response = router
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
        assert!(chrono::DateTime::parse_from_rfc3339(body["timestamp"].as_str().unwrap()).is_ok());
    }
}
