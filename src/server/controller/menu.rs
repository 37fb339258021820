use actix_web::{delete, get, post, web, Responder};
use crate::server::controller::error::ApiError;
use crate::server::controller::parse_body;
use crate::server::model::menu::{GetMenuParams, GetMenuResponse, MenuItemPatch, MenuItemResponse};
use crate::server::model::{DeleteParams, DeleteResponse};
use crate::server::state::AppState;

#[get("/hotels/{slug}/menu")]
/// list the menu, `?available=true` keeps only orderable items
pub(crate) async fn get_menu(
    slug: web::Path<String>,
    params: web::Query<GetMenuParams>,
    data: web::Data<AppState>,
) -> Result<impl Responder, ApiError> {
    let mut menu = data.store().list_menu(&slug)?;
    if let Some(available) = params.available {
        menu.retain(|item| item.available == available);
    }
    Ok(web::Json(GetMenuResponse { menu }))
}

#[post("/hotels/{slug}/menu")]
/// create or update a menu item
pub(crate) async fn post_menu(slug: web::Path<String>, body: web::Bytes, data: web::Data<AppState>) -> Result<impl Responder, ApiError> {
    let patch: MenuItemPatch = parse_body(&body)?;
    let item = data.store().upsert_menu_item(&slug, patch)?;
    Ok(web::Json(MenuItemResponse { item }))
}

#[delete("/hotels/{slug}/menu")]
pub(crate) async fn delete_menu(
    slug: web::Path<String>,
    params: web::Query<DeleteParams>,
    data: web::Data<AppState>,
) -> Result<impl Responder, ApiError> {
    let id = match params.into_inner().id {
        Some(id) if !id.is_empty() => id,
        _ => return Err(ApiError::bad_request("id required")),
    };
    data.store().delete_menu_item(&slug, &id)?;
    Ok(web::Json(DeleteResponse { ok: true }))
}
