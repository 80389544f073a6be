use actix_web::{HttpResponse, error::InternalError, web::QueryConfig};
use tracing::warn;

use crate::api::jobs::dto::ErrorResponse;

/// Query-string config that renders parse failures in the standard error shape
pub fn query_config() -> QueryConfig {
    QueryConfig::default().error_handler(|err, req| {
        warn!("Rejected query string on {}: {}", req.path(), err);

        let message = format!("Invalid query parameters: {}", err);
        InternalError::from_response(err, HttpResponse::BadRequest().json(ErrorResponse::new(message)))
            .into()
    })
}
