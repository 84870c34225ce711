use crate::utils::ApiError;
use actix_web::HttpResponse;

/// Anything under `/api` that is not a subscriber resource.
pub async fn invalid_url() -> Result<HttpResponse, ApiError> {
    Err(ApiError::MalformedRoute)
}

/// Anything outside `/api`.
pub async fn not_found() -> Result<HttpResponse, ApiError> {
    Err(ApiError::NotFound)
}
