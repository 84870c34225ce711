use crate::domain::SubscriberFields;
use crate::models::SubscriberGateway;
use crate::utils::ApiError;
use actix_web::{HttpMessage, HttpRequest, HttpResponse};
use actix_web::http::header::ContentType;
use anyhow::Context;
use sqlx::PgPool;

#[tracing::instrument(name = "Retrieving a subscriber", skip(pool))]
pub async fn retrieve(subscriber_id: i64, pool: &PgPool) -> Result<HttpResponse, ApiError> {
    let subscriber = SubscriberGateway::new(pool)
        .find_by_id(subscriber_id)
        .await
        .context("Failed to fetch subscriber.")?
        .ok_or(ApiError::NotFound)?;

    Ok(HttpResponse::Ok()
        .content_type(ContentType::json())
        .json(subscriber))
}

#[tracing::instrument(name = "Updating a subscriber", skip(request, body, pool))]
pub async fn update(
    subscriber_id: i64,
    request: &HttpRequest,
    body: &[u8],
    pool: &PgPool,
) -> Result<HttpResponse, ApiError> {
    let fields =
        SubscriberFields::from_request(request.query_string(), request.content_type(), body)
            .context("Failed to read subscriber update fields.")?;
    let subscriber = SubscriberGateway::new(pool)
        .update_by_id(subscriber_id, fields)
        .await
        .context("Failed to update subscriber.")?
        .ok_or(ApiError::NotFound)?;

    Ok(HttpResponse::Ok()
        .content_type(ContentType::json())
        .json(subscriber))
}

#[tracing::instrument(name = "Deleting a subscriber", skip(pool))]
pub async fn delete(subscriber_id: i64, pool: &PgPool) -> Result<HttpResponse, ApiError> {
    let deleted = SubscriberGateway::new(pool)
        .delete_by_id(subscriber_id)
        .await
        .context("Failed to delete subscriber.")?;

    if !deleted {
        return Err(ApiError::NotFound);
    }

    Ok(HttpResponse::NoContent().finish())
}
