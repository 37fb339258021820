pub(crate) mod error;
mod hotels;
mod menu;
mod orders;
mod stream;
mod tables;

use actix_web::middleware::ErrorHandlers;
use actix_web::web;
use log::debug;
use serde::de::DeserializeOwned;
use serde_json::Value;
use crate::server::controller::error::{json_error_body, unknown_route, ApiError};

/// Upper bound of a JSON request body.
const BODY_LIMIT: usize = 64 * 1024;

/// Mount every route under `/api`.
pub(crate) fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .app_data(
                web::QueryConfig::default()
                    .error_handler(|e, _| ApiError::bad_request(format!("invalid query string, {}", e)).into()),
            )
            .app_data(web::PayloadConfig::new(BODY_LIMIT))
            .wrap(ErrorHandlers::new().default_handler_client(json_error_body))
            .default_service(web::to(unknown_route))
            .service(hotels::get_hotels)
            .service(hotels::post_hotels)
            .service(hotels::get_hotel)
            .service(menu::get_menu)
            .service(menu::post_menu)
            .service(menu::delete_menu)
            .service(tables::get_tables)
            .service(tables::post_tables)
            .service(tables::delete_tables)
            .service(orders::post_order)
            .service(orders::get_orders)
            .service(orders::patch_order)
            .service(stream::get_stream),
    );
}

/// Bodies that are not a JSON object are read as `{}`; an object with
/// mistyped fields is still a bad request.
pub(crate) fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    let value = match serde_json::from_slice::<Value>(body) {
        Ok(value @ Value::Object(_)) => value,
        Ok(_) | Err(_) => {
            if !body.is_empty() {
                debug!("ignoring unparseable request body of {} bytes", body.len());
            }
            Value::Object(Default::default())
        }
    };
    serde_json::from_value(value).map_err(|e| ApiError::bad_request(format!("invalid request body, {}", e)))
}

#[cfg(test)]
pub(crate) mod test_util {
    use actix_web::web;
    use tokio_util::sync::CancellationToken;
    use crate::server::model::config::StreamConfig;
    use crate::server::state::AppState;

    pub fn state() -> web::Data<AppState> {
        web::Data::new(AppState::new(StreamConfig::default(), CancellationToken::new()))
    }

    /// `state()` with a hotel `demo` already created
    pub fn demo_state() -> web::Data<AppState> {
        let state = state();
        state.store().create_hotel("Demo", "demo", None).unwrap();
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::{header, StatusCode};
    use actix_web::{test, App};
    use crate::server::controller::test_util::demo_state;
    use crate::server::model::hotel::PostHotelRequest;
    use crate::server::model::order::OrderPatch;
    use crate::server::model::ErrorResponse;

    #[actix_web::test]
    async fn framework_errors_are_json() {
        let app = test::init_service(App::new().app_data(demo_state()).configure(configure)).await;

        let cases = [
            (test::TestRequest::get().uri("/api/hotels/demo/menu?available=maybe"), StatusCode::BAD_REQUEST),
            (test::TestRequest::delete().uri("/api/hotels/demo/tables?id=a&id=b"), StatusCode::BAD_REQUEST),
            (test::TestRequest::get().uri("/api/nothing/here"), StatusCode::NOT_FOUND),
            (
                test::TestRequest::post().uri("/api/hotels").set_payload(vec![b' '; BODY_LIMIT + 1]),
                StatusCode::PAYLOAD_TOO_LARGE,
            ),
        ];
        for (req, status) in cases {
            let res = test::call_service(&app, req.to_request()).await;
            assert_eq!(res.status(), status);
            assert_eq!(res.headers().get(header::CONTENT_TYPE).unwrap(), "application/json");
            let body: ErrorResponse = test::read_body_json(res).await;
            assert!(!body.error.is_empty());
        }
    }

    #[::core::prelude::v1::test]
    fn malformed_bodies_are_empty_objects() {
        for body in [&b""[..], b"not json", b"[1,2]", b"null"] {
            let req: PostHotelRequest = parse_body(body).unwrap();
            assert!(req.name.is_none() && req.slug.is_none());
        }
    }

    #[::core::prelude::v1::test]
    fn mistyped_fields_are_rejected() {
        assert!(parse_body::<OrderPatch>(br#"{"customerRating": "five"}"#).is_err());
        assert!(parse_body::<OrderPatch>(br#"{"status": "teleported"}"#).is_err());
        assert!(parse_body::<OrderPatch>(br#"{"customerRating": 4}"#).is_ok());
    }
}
