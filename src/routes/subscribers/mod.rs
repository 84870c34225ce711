mod detail;
mod index;

use crate::domain::{Operation, ResourceTarget, has_query_string, validate};
use crate::utils::ApiError;
use actix_web::{HttpRequest, HttpResponse, web};
use sqlx::PgPool;

/// Handles every method sent to `/api/subscribers`.
pub async fn collection(
    request: HttpRequest,
    body: web::Bytes,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, ApiError> {
    dispatch(&request, None, &body, &pool).await
}

/// Handles every method sent to `/api/subscribers/{subscriber_id}`.
pub async fn item(
    request: HttpRequest,
    path: web::Path<String>,
    body: web::Bytes,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, ApiError> {
    let subscriber_id = path.into_inner();
    dispatch(&request, Some(&subscriber_id), &body, &pool).await
}

async fn dispatch(
    request: &HttpRequest,
    subscriber_id: Option<&str>,
    body: &[u8],
    pool: &PgPool,
) -> Result<HttpResponse, ApiError> {
    let target = match subscriber_id {
        Some(_) => ResourceTarget::Item,
        None => ResourceTarget::Collection,
    };
    let operation = validate(
        request.method(),
        has_query_string(request.query_string()),
        target,
    )?;

    match operation {
        Operation::List => index::list(pool).await,
        Operation::Create => index::create(request, body, pool).await,
        Operation::Retrieve => detail::retrieve(parse_id(subscriber_id)?, pool).await,
        Operation::Update => detail::update(parse_id(subscriber_id)?, request, body, pool).await,
        Operation::Delete => detail::delete(parse_id(subscriber_id)?, pool).await,
    }
}

/// Ids that are missing or not numeric cannot name a stored record.
fn parse_id(subscriber_id: Option<&str>) -> Result<i64, ApiError> {
    subscriber_id
        .and_then(|id| id.parse().ok())
        .ok_or(ApiError::NotFound)
}
