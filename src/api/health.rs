use actix_web::{HttpResponse, Responder, get, web};
use serde::Serialize;
use tracing::error;

use crate::api::job::JobService;

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: String,
    store: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// API root
///
/// Static liveness string kept for existing clients.
#[get("/")]
async fn api_root() -> impl Responder {
    HttpResponse::Ok().body("API is running...")
}

/// Health check endpoint
///
/// General health check including a full read of the job store.
/// Use for load balancers and uptime monitors.
#[get("/health")]
async fn health_check(service: web::Data<JobService>) -> impl Responder {
    match service.check_store().await {
        Ok(_) => HttpResponse::Ok().json(HealthResponse {
            status: "healthy".to_string(),
            store: "readable".to_string(),
            error: None,
        }),
        Err(e) => {
            error!("Health check failed: {}", e);
            HttpResponse::ServiceUnavailable().json(HealthResponse {
                status: "unhealthy".to_string(),
                store: "unreadable".to_string(),
                error: Some(e.public_message().to_string()),
            })
        }
    }
}

/// Readiness check endpoint
///
/// Returns 503 while the job store is missing or malformed; recovers once it is fixed.
#[get("/ready")]
async fn readiness_check(service: web::Data<JobService>) -> impl Responder {
    match service.check_store().await {
        Ok(_) => HttpResponse::Ok().json(HealthResponse {
            status: "ready".to_string(),
            store: "readable".to_string(),
            error: None,
        }),
        Err(e) => {
            error!("Readiness check failed: job store unavailable: {}", e);
            HttpResponse::ServiceUnavailable().json(HealthResponse {
                status: "not_ready".to_string(),
                store: "unreadable".to_string(),
                error: Some(e.public_message().to_string()),
            })
        }
    }
}

/// Liveness check endpoint
///
/// Simple check that the process is alive. Does not touch the job store.
#[get("/live")]
async fn liveness_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "alive".to_string(),
        store: "not_checked".to_string(),
        error: None,
    })
}

pub fn health_config(config: &mut web::ServiceConfig) {
    config
        .service(api_root)
        .service(health_check)
        .service(readiness_check)
        .service(liveness_check);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::JobRepository;
    use crate::test_support::TempStore;
    use crate::worker::store_writer;
    use actix_web::{App, http::StatusCode, test};
    use serde_json::Value;

    fn job_service(store: &TempStore) -> web::Data<JobService> {
        let repository = JobRepository::new(store.path());
        let (_writer, handle) = store_writer::channel(repository.clone(), 1);
        web::Data::new(JobService::new(repository, handle))
    }

    #[actix_web::test]
    async fn root_returns_liveness_string() {
        let store = TempStore::with_contents("[]");
        let app = test::init_service(
            App::new()
                .app_data(job_service(&store))
                .configure(health_config),
        )
        .await;

        let req = test::TestRequest::get().uri("/").to_request();
        let body = test::call_and_read_body(&app, req).await;

        assert_eq!(body, "API is running...");
    }

    #[actix_web::test]
    async fn health_reports_readable_store() {
        let store = TempStore::with_contents("[]");
        let app = test::init_service(
            App::new()
                .app_data(job_service(&store))
                .configure(health_config),
        )
        .await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], "healthy");
        assert!(body.get("error").is_none());
    }

    #[actix_web::test]
    async fn unhealthy_body_does_not_leak_store_path() {
        let store = TempStore::missing();
        let app = test::init_service(
            App::new()
                .app_data(job_service(&store))
                .configure(health_config),
        )
        .await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Failed to read jobs file");
        let store_dir = store.path().parent().unwrap().to_string_lossy().into_owned();
        assert!(!body.to_string().contains(&store_dir));
    }

    #[actix_web::test]
    async fn ready_fails_on_malformed_store_but_live_does_not() {
        let store = TempStore::with_contents("oops");
        let app = test::init_service(
            App::new()
                .app_data(job_service(&store))
                .configure(health_config),
        )
        .await;

        let req = test::TestRequest::get().uri("/ready").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], "not_ready");
        assert_eq!(body["error"], "Invalid JSON format in jobs file");

        let req = test::TestRequest::get().uri("/live").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
