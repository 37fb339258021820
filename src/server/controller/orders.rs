use actix_web::{get, patch, post, web, Responder};
use crate::server::controller::error::ApiError;
use crate::server::controller::parse_body;
use crate::server::model::order::{GetOrdersResponse, OrderPatch, OrderResponse, PostOrderRequest};
use crate::server::state::AppState;

#[post("/hotels/{slug}/orders/new")]
/// place an order from a table's QR page
pub(crate) async fn post_order(slug: web::Path<String>, body: web::Bytes, data: web::Data<AppState>) -> Result<impl Responder, ApiError> {
    let PostOrderRequest { table_id, items } = parse_body(&body)?;
    let (table_id, items) = match (table_id, items) {
        (Some(table_id), Some(items)) if !table_id.is_empty() && !items.is_empty() => (table_id, items),
        _ => return Err(ApiError::bad_request("tableId and items required")),
    };
    let order = data.store().create_order(&slug, &table_id, items)?;
    Ok(web::Json(OrderResponse { order }))
}

#[get("/hotels/{slug}/orders")]
pub(crate) async fn get_orders(slug: web::Path<String>, data: web::Data<AppState>) -> Result<impl Responder, ApiError> {
    let orders = data.store().list_orders(&slug)?;
    Ok(web::Json(GetOrdersResponse { orders }))
}

#[patch("/orders/{id}")]
/// move an order through the workflow or record the customer's rating
pub(crate) async fn patch_order(id: web::Path<String>, body: web::Bytes, data: web::Data<AppState>) -> Result<impl Responder, ApiError> {
    let patch: OrderPatch = parse_body(&body)?;
    let order = data.store().update_order(&id, patch)?;
    Ok(web::Json(OrderResponse { order }))
}
