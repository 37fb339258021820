use actix_web::{error, HttpRequest, HttpResponse};
use actix_web::dev::ServiceResponse;
use actix_web::http::{header, StatusCode};
use actix_web::middleware::ErrorHandlerResponse;
use derive_more::{Display, Error};
use crate::server::model::ErrorResponse;
use crate::server::store::error::StoreError;

#[derive(Debug, Display, Error)]
pub(crate) enum ApiError {
    #[display("{message}")]
    BadRequest { message: String },
    #[display("{message}")]
    NotFound { message: String },
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest { message: message.into() }
    }
}

/// Unmatched paths under `/api`.
pub(crate) async fn unknown_route(req: HttpRequest) -> Result<HttpResponse, ApiError> {
    Err(ApiError::NotFound { message: format!("no route for {} {}", req.method(), req.path()) })
}

/// Rewrite client errors raised outside the handlers (extractors, body limits,
/// method mismatches) into the `{error}` JSON body the handlers produce.
pub(crate) fn json_error_body<B>(res: ServiceResponse<B>) -> actix_web::Result<ErrorHandlerResponse<B>> {
    let is_json = res
        .response()
        .headers()
        .get(header::CONTENT_TYPE)
        .is_some_and(|v| v.as_bytes().starts_with(b"application/json"));
    if is_json {
        return Ok(ErrorHandlerResponse::Response(res.map_into_left_body()));
    }

    let status = res.status();
    let message = match res.response().error() {
        Some(e) => e.to_string(),
        None => status.canonical_reason().unwrap_or("request failed").to_string(),
    };
    let (req, _) = res.into_parts();
    let res = HttpResponse::build(status).json(ErrorResponse { error: message });
    Ok(ErrorHandlerResponse::Response(ServiceResponse::new(req, res).map_into_right_body()))
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::HotelNotFound { .. } | StoreError::OrderNotFound { .. } => {
                ApiError::NotFound { message: e.to_string() }
            }
            StoreError::HotelExists { .. }
            | StoreError::MissingField { .. }
            | StoreError::NotUrlSafe { .. }
            | StoreError::EmptyOrder
            | StoreError::ZeroQuantity { .. }
            | StoreError::InvalidRating { .. } => ApiError::BadRequest { message: e.to_string() },
        }
    }
}

impl error::ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match *self {
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse { error: self.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::ResponseError;

    #[test]
    fn store_errors_map_to_status() {
        let not_found: ApiError = StoreError::OrderNotFound { id: "x".to_string() }.into();
        assert_eq!(not_found.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(not_found.to_string(), "order x not found");

        let bad: ApiError = StoreError::InvalidRating { rating: 9 }.into();
        assert_eq!(bad.status_code(), StatusCode::BAD_REQUEST);
    }
}
