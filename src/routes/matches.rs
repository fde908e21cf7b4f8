use actix_web::{http::StatusCode, web, HttpRequest, HttpResponse, Responder};
use validator::Validate;
use crate::models::{SimilarItemsRequest, SimilarItemsResponse, HealthResponse, InvalidateResponse, ErrorResponse};
use crate::services::{ItemSource, MatchService, SimilarItemsQuery, StoreError, TokenVerifier};
use std::sync::Arc;
use uuid::Uuid;

/// Application state shared across all handlers
pub struct AppState<S: ItemSource> {
    pub service: Arc<MatchService<S>>,
    pub verifier: TokenVerifier,
}

impl<S: ItemSource> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            verifier: self.verifier.clone(),
        }
    }
}

/// Configure all match-related routes
pub fn configure<S: ItemSource>(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check::<S>))
        .route("/matches", web::get().to(potential_matches::<S>))
        .route("/matches/refresh", web::post().to(refresh_matches::<S>))
        .route("/matches/cache", web::delete().to(invalidate_matches::<S>))
        .route("/matches/similar", web::post().to(similar_items::<S>))
        .route("/items/{id}/matches", web::get().to(item_matches::<S>));
}

fn error_response(status: StatusCode, error: &str, message: String) -> HttpResponse {
    HttpResponse::build(status).json(ErrorResponse {
        error: error.to_string(),
        message,
        status_code: status.as_u16(),
    })
}

fn store_failure(context: &str, e: StoreError) -> HttpResponse {
    tracing::error!("{}: {}", context, e);
    error_response(StatusCode::INTERNAL_SERVER_ERROR, context, e.to_string())
}

/// Resolve the caller from the bearer token, or build the 401 to send back
fn authenticate<S: ItemSource>(state: &AppState<S>, req: &HttpRequest) -> Result<String, HttpResponse> {
    let header = req
        .headers()
        .get(actix_web::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    state.verifier.verify_header(header).map_err(|e| {
        tracing::debug!("Rejected request to {}: {}", req.path(), e);
        error_response(StatusCode::UNAUTHORIZED, "Unauthorized", e.to_string())
    })
}

/// Health check endpoint
async fn health_check<S: ItemSource>(state: web::Data<AppState<S>>) -> impl Responder {
    let store_healthy = state.service.store().health_check().await.unwrap_or(false);

    let status = if store_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Potential matches for the caller's reports
///
/// GET /api/v1/matches
///
/// Response body:
/// ```json
/// [{ "item": { ... }, "matchScore": 85 }]
/// ```
async fn potential_matches<S: ItemSource>(
    state: web::Data<AppState<S>>,
    req: HttpRequest,
) -> impl Responder {
    let user_id = match authenticate(&state, &req) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    tracing::info!("Finding matches for user: {}", user_id);

    match state.service.matches_for_user(&user_id).await {
        Ok(matches) => HttpResponse::Ok().json(matches),
        Err(e) => store_failure("Failed to compute matches", e),
    }
}

/// Recompute the caller's matches, bypassing the cache
///
/// POST /api/v1/matches/refresh
async fn refresh_matches<S: ItemSource>(
    state: web::Data<AppState<S>>,
    req: HttpRequest,
) -> impl Responder {
    let user_id = match authenticate(&state, &req) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match state.service.refresh_user(&user_id).await {
        Ok(matches) => HttpResponse::Ok().json(matches),
        Err(e) => store_failure("Failed to compute matches", e),
    }
}

/// Drop the caller's cached matches
///
/// DELETE /api/v1/matches/cache
async fn invalidate_matches<S: ItemSource>(
    state: web::Data<AppState<S>>,
    req: HttpRequest,
) -> impl Responder {
    let user_id = match authenticate(&state, &req) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    state.service.invalidate(&user_id).await;

    HttpResponse::Ok().json(InvalidateResponse { success: true })
}

/// Matches for a single stored report
///
/// GET /api/v1/items/{id}/matches
async fn item_matches<S: ItemSource>(
    state: web::Data<AppState<S>>,
    path: web::Path<Uuid>,
    req: HttpRequest,
) -> impl Responder {
    if let Err(resp) = authenticate(&state, &req) {
        return resp;
    }

    let item_id = path.into_inner();

    match state.service.matches_for_item(item_id).await {
        Ok(Some(matches)) => HttpResponse::Ok().json(matches),
        Ok(None) => error_response(
            StatusCode::NOT_FOUND,
            "Item not found",
            format!("No item with id {}", item_id),
        ),
        Err(e) => store_failure("Failed to compute matches", e),
    }
}

/// Score a search form against reported items
///
/// POST /api/v1/matches/similar
///
/// Request body:
/// ```json
/// {
///   "query": "black leather wallet",
///   "category": "Accessories",
///   "location": "Library",
///   "status": "lost"
/// }
/// ```
async fn similar_items<S: ItemSource>(
    state: web::Data<AppState<S>>,
    body: web::Json<SimilarItemsRequest>,
    req: HttpRequest,
) -> impl Responder {
    let user_id = match authenticate(&state, &req) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    if let Err(errors) = body.validate() {
        tracing::info!("Validation failed for similar_items request: field_errors={:?}", errors);
        return error_response(
            StatusCode::BAD_REQUEST,
            "Validation failed",
            errors.to_string(),
        );
    }

    let body = body.into_inner();
    let query_text = body.query.clone();

    let query = SimilarItemsQuery {
        query: body.query,
        category: body.category,
        location: body.location,
        status: body.status,
        date_lost_found: body.date_lost_found,
    };

    match state.service.similar_items(&user_id, query).await {
        Ok(result) => {
            tracing::info!(
                "Similar items for {}: {} matches out of {} analyzed",
                user_id,
                result.matches.len(),
                result.total_analyzed
            );
            HttpResponse::Ok().json(SimilarItemsResponse {
                query: query_text,
                total_analyzed: result.total_analyzed,
                matches: result.matches,
            })
        }
        Err(e) => store_failure("Failed to search similar items", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_status() {
        let resp = error_response(StatusCode::NOT_FOUND, "Item not found", "missing".to_string());
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_health_check_response() {
        let response = HealthResponse {
            status: "healthy".to_string(),
            version: "0.1.0".to_string(),
            timestamp: chrono::Utc::now(),
        };

        assert_eq!(response.status, "healthy");
    }
}
