use actix_web::{error, http::StatusCode, web, HttpRequest, HttpResponse};
use crate::models::ErrorResponse;
use std::fmt;

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for ErrorResponse {}

impl error::ResponseError for ErrorResponse {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST)
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self)
    }
}

fn bad_request(error: &str, message: String) -> actix_web::Error {
    ErrorResponse {
        error: error.to_string(),
        message,
        status_code: StatusCode::BAD_REQUEST.as_u16(),
    }
    .into()
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    bad_request("invalid_json", format!("Invalid JSON: {}", err))
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    bad_request("invalid_query", format!("Invalid query: {}", err))
}

/// Handle malformed path segments such as a non-UUID item id
pub fn handle_path_error(err: error::PathError, _req: &HttpRequest) -> actix_web::Error {
    bad_request("invalid_path", format!("Invalid path: {}", err))
}

/// Register the JSON, query and path extractor error handlers on an app
pub fn configure_extractors(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
        .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
        .app_data(web::PathConfig::default().error_handler(handle_path_error));
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::ResponseError;

    #[test]
    fn test_error_response_keeps_status() {
        let err = ErrorResponse {
            error: "invalid_json".to_string(),
            message: "Invalid JSON".to_string(),
            status_code: 400,
        };

        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "invalid_json: Invalid JSON");
    }
}
