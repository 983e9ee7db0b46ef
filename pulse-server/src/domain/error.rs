use actix_web::http::header;
use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::validation::ValidationError;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("validation failed")]
    Validation(#[from] ValidationError),
    #[error("group not found: {0}")]
    GroupNotFound(String),
    #[error("user not found: {0}")]
    UserNotFound(String),
    #[error("post not found: {0}")]
    PostNotFound(Uuid),
    #[error("user already exists: {0}")]
    UserAlreadyExists(String),
    #[error("unauthorized")]
    Unauthorized,
    #[error("not the author of post {0}")]
    EditForbidden(Uuid),
    #[error("internal error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

impl ResponseError for DomainError {
    fn status_code(&self) -> StatusCode {
        match self {
            DomainError::Validation(_) => StatusCode::BAD_REQUEST,
            DomainError::GroupNotFound(_)
            | DomainError::UserNotFound(_)
            | DomainError::PostNotFound(_) => StatusCode::NOT_FOUND,
            DomainError::UserAlreadyExists(_) => StatusCode::CONFLICT,
            DomainError::Unauthorized => StatusCode::UNAUTHORIZED,
            DomainError::EditForbidden(_) => StatusCode::SEE_OTHER,
            DomainError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        // Acting on another author's post is answered with a bare redirect
        // to the post itself, no error payload.
        if let DomainError::EditForbidden(post_id) = self {
            return HttpResponse::SeeOther()
                .insert_header((header::LOCATION, format!("/api/posts/{post_id}")))
                .finish();
        }

        let message = self.to_string();
        let details = match self {
            DomainError::Validation(err) => Some(json!({
                "field": err.field,
                "message": err.message,
                "value": err.value,
            })),
            DomainError::GroupNotFound(resource) | DomainError::UserNotFound(resource) => {
                Some(json!({ "resource": resource }))
            }
            DomainError::PostNotFound(resource) => Some(json!({ "resource": resource })),
            _ => None,
        };
        let body = ErrorBody {
            error: message.as_str(),
            details,
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}
