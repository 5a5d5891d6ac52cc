use actix_web::{HttpResponse, error::JsonPayloadError, web};
use serde::Serialize;
use serde_json::error::Category;

/// Error body returned by every failing endpoint
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Creates a configured JsonConfig with standardized error handling for the entire project
pub fn json_config(limit: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(limit)
        .error_handler(|err, _req| {
            let message = match &err {
                JsonPayloadError::ContentType => "Expected a JSON request body".to_string(),
                JsonPayloadError::OverflowKnownLength { limit, .. }
                | JsonPayloadError::Overflow { limit } => {
                    format!("Request body exceeds the {} byte limit", limit)
                }
                JsonPayloadError::Deserialize(de_err) => match de_err.classify() {
                    Category::Eof => "Request body is empty. Expected JSON payload".to_string(),
                    Category::Data => "Job must be a JSON object".to_string(),
                    Category::Syntax | Category::Io => "Invalid JSON format".to_string(),
                },
                _ => "Invalid request body".to_string(),
            };

            tracing::warn!("Rejected request body: {}", err);

            actix_web::error::InternalError::from_response(
                err,
                HttpResponse::BadRequest().json(ErrorResponse { error: message }),
            )
            .into()
        })
}
