use actix_web::{get, post, web, Responder};
use log::info;
use crate::server::controller::error::ApiError;
use crate::server::controller::parse_body;
use crate::server::model::hotel::{GetHotelsResponse, HotelResponse, PostHotelRequest};
use crate::server::state::AppState;
use crate::server::store::error::StoreError;

#[get("/hotels")]
pub(crate) async fn get_hotels(data: web::Data<AppState>) -> impl Responder {
    web::Json(GetHotelsResponse {
        hotels: data.store().list_hotels(),
    })
}

#[post("/hotels")]
/// create a hotel, or return the existing one when the slug is taken
pub(crate) async fn post_hotels(body: web::Bytes, data: web::Data<AppState>) -> Result<impl Responder, ApiError> {
    let PostHotelRequest { name, slug, google_review_url } = parse_body(&body)?;
    let (name, slug) = match (name, slug) {
        (Some(name), Some(slug)) if !name.trim().is_empty() && !slug.is_empty() => (name, slug),
        _ => return Err(ApiError::bad_request("name and slug are required")),
    };

    let store = data.store();
    if let Some(hotel) = store.get_hotel(&slug) {
        return Ok(web::Json(HotelResponse { hotel }));
    }
    match store.create_hotel(&name, &slug, google_review_url) {
        Ok(hotel) => Ok(web::Json(HotelResponse { hotel })),
        // lost a race with a concurrent create of the same slug
        Err(StoreError::HotelExists { .. }) => store
            .get_hotel(&slug)
            .map(|hotel| web::Json(HotelResponse { hotel }))
            .ok_or_else(|| StoreError::HotelNotFound { slug }.into()),
        Err(e) => {
            info!("rejected hotel slug={}, {}", slug, e);
            Err(e.into())
        }
    }
}

#[get("/hotels/{slug}")]
pub(crate) async fn get_hotel(slug: web::Path<String>, data: web::Data<AppState>) -> Result<impl Responder, ApiError> {
    let slug = slug.into_inner();
    match data.store().get_hotel(&slug) {
        Some(hotel) => Ok(web::Json(HotelResponse { hotel })),
        None => Err(StoreError::HotelNotFound { slug }.into()),
    }
}
