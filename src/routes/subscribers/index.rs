use crate::domain::SubscriberFields;
use crate::models::SubscriberGateway;
use crate::utils::ApiError;
use actix_web::{HttpMessage, HttpRequest, HttpResponse};
use actix_web::http::header::ContentType;
use anyhow::Context;
use sqlx::PgPool;

#[tracing::instrument(name = "Retrieving list of subscribers", skip(pool))]
pub async fn list(pool: &PgPool) -> Result<HttpResponse, ApiError> {
    let subscribers = SubscriberGateway::new(pool)
        .find_all()
        .await
        .context("Failed to fetch subscribers.")?;

    if subscribers.is_empty() {
        return Ok(HttpResponse::NoContent().finish());
    }

    Ok(HttpResponse::Ok()
        .content_type(ContentType::json())
        .json(subscribers))
}

#[tracing::instrument(name = "Creating a subscriber", skip_all)]
pub async fn create(
    request: &HttpRequest,
    body: &[u8],
    pool: &PgPool,
) -> Result<HttpResponse, ApiError> {
    let fields =
        SubscriberFields::from_request(request.query_string(), request.content_type(), body)
            .context("Failed to read new subscriber fields.")?;
    let subscriber = SubscriberGateway::new(pool)
        .insert(fields)
        .await
        .context("Failed to store new subscriber.")?;

    tracing::info!(subscriber_id = subscriber.id, "Subscriber created.");

    Ok(HttpResponse::Created()
        .content_type(ContentType::json())
        .json(subscriber))
}
