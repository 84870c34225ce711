use crate::domain::Rejection;
use actix_web::body::MessageBody;
use actix_web::dev::ServiceResponse;
use actix_web::http::StatusCode;
use actix_web::http::header::{self, ContentType};
use actix_web::middleware::{ErrorHandlerResponse, ErrorHandlers};
use actix_web::{HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};

pub const NOT_FOUND_MESSAGE: &str =
    "The records or resources that you requested are not available.";
pub const INVALID_URL_MESSAGE: &str = "Invalid URL syntax. Please provide acceptable HTTP URL.";
pub const UNEXPECTED_MESSAGE: &str =
    "Error caused by server or client. Please provide acceptable API Command.";

#[derive(thiserror::Error)]
pub enum ApiError {
    #[error("{}", NOT_FOUND_MESSAGE)]
    NotFound,
    #[error(transparent)]
    MethodNotAllowed(#[from] Rejection),
    #[error("{}", INVALID_URL_MESSAGE)]
    MalformedRoute,
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl std::fmt::Debug for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ApiError {
    /// What the caller gets to see. Unexpected failures keep their cause
    /// for the logs only.
    fn client_message(&self) -> String {
        match self {
            ApiError::Unexpected(_) => UNEXPECTED_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::MalformedRoute => StatusCode::BAD_REQUEST,
            ApiError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut response = HttpResponse::build(self.status_code());
        if let ApiError::MethodNotAllowed(rejection) = self {
            response.insert_header((header::ALLOW, rejection.allowed_methods()));
        }

        response
            .content_type(ContentType::json())
            .json(ResponseErrorMessage {
                error: self.client_message(),
            })
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ResponseErrorMessage {
    pub error: String,
}

/// Middleware turning every error response that is not already an
/// `{"error": ...}` envelope into one, e.g. payload errors raised by
/// extractors before a handler runs.
pub fn error_envelope<B>() -> ErrorHandlers<B>
where
    B: MessageBody + 'static,
{
    ErrorHandlers::new().default_handler(render_error_envelope::<B>)
}

fn render_error_envelope<B>(
    response: ServiceResponse<B>,
) -> actix_web::Result<ErrorHandlerResponse<B>>
where
    B: MessageBody + 'static,
{
    let status = response.status();
    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/json"));

    if is_json || !(status.is_client_error() || status.is_server_error()) {
        return Ok(ErrorHandlerResponse::Response(
            response.map_into_left_body(),
        ));
    }

    let (request, _) = response.into_parts();
    let envelope = HttpResponse::build(status)
        .content_type(ContentType::json())
        .json(ResponseErrorMessage {
            error: envelope_message(status),
        });

    Ok(ErrorHandlerResponse::Response(
        ServiceResponse::new(request, envelope).map_into_right_body(),
    ))
}

/// Message used for an error status that reached the request boundary
/// without a body of its own.
pub fn envelope_message(status: StatusCode) -> String {
    if status == StatusCode::NOT_FOUND {
        NOT_FOUND_MESSAGE.to_string()
    } else if status.is_client_error() {
        status
            .canonical_reason()
            .unwrap_or(UNEXPECTED_MESSAGE)
            .to_string()
    } else {
        UNEXPECTED_MESSAGE.to_string()
    }
}

pub fn error_chain_fmt(
    e: &impl std::error::Error,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{}\n", e)?;

    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{}", cause)?;
        current = cause.source();
    }

    Ok(())
}
