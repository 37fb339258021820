use actix_web::http::header;
use actix_web::{get, web, HttpResponse};
use serde::Deserialize;
use crate::server::controller::error::ApiError;
use crate::server::state::AppState;
use crate::server::store::error::StoreError;
use crate::server::stream::StreamSession;

#[derive(Debug, Deserialize)]
pub(crate) struct StreamParams {
    hotel: Option<String>,
}

#[get("/stream")]
/// live order events of one hotel as `text/event-stream`
pub(crate) async fn get_stream(params: web::Query<StreamParams>, data: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let hotel = match params.into_inner().hotel {
        Some(hotel) if !hotel.is_empty() => hotel,
        _ => return Err(ApiError::bad_request("hotel required")),
    };
    if data.store().get_hotel(&hotel).is_none() {
        return Err(StoreError::HotelNotFound { slug: hotel }.into());
    }

    let session = StreamSession::open(data.store(), &hotel, data.stream_config(), data.shutdown_token());
    Ok(HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, "text/event-stream"))
        .insert_header((header::CACHE_CONTROL, "no-cache, no-transform"))
        .insert_header((header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"))
        .streaming(session))
}
