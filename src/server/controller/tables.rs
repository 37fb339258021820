use actix_web::{delete, get, post, web, Responder};
use crate::server::controller::error::ApiError;
use crate::server::controller::parse_body;
use crate::server::model::table::{GetTablesResponse, TablePatch, TableResponse};
use crate::server::model::{DeleteParams, DeleteResponse};
use crate::server::state::AppState;

#[get("/hotels/{slug}/tables")]
pub(crate) async fn get_tables(slug: web::Path<String>, data: web::Data<AppState>) -> Result<impl Responder, ApiError> {
    let tables = data.store().list_tables(&slug)?;
    Ok(web::Json(GetTablesResponse { tables }))
}

#[post("/hotels/{slug}/tables")]
/// add a table, or rename an existing one
pub(crate) async fn post_tables(slug: web::Path<String>, body: web::Bytes, data: web::Data<AppState>) -> Result<impl Responder, ApiError> {
    let patch: TablePatch = parse_body(&body)?;
    let table = data.store().upsert_table(&slug, patch)?;
    Ok(web::Json(TableResponse { table }))
}

#[delete("/hotels/{slug}/tables")]
pub(crate) async fn delete_tables(
    slug: web::Path<String>,
    params: web::Query<DeleteParams>,
    data: web::Data<AppState>,
) -> Result<impl Responder, ApiError> {
    let id = match params.into_inner().id {
        Some(id) if !id.is_empty() => id,
        _ => return Err(ApiError::bad_request("id required")),
    };
    data.store().delete_table(&slug, &id)?;
    Ok(web::Json(DeleteResponse { ok: true }))
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test, App};
    use serde_json::json;
    use crate::server::controller::configure;
    use crate::server::controller::test_util::demo_state;
    use crate::server::model::table::{GetTablesResponse, TableResponse};

    #[actix_web::test]
    async fn add_list_delete() {
        let data = demo_state();
        let app = test::init_service(App::new().app_data(data.clone()).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/api/hotels/demo/tables")
            .set_json(json!({"id": "T1", "name": "Table 1"}))
            .to_request();
        let t1: TableResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(t1.table.qr_url, "/h/demo/table/T1");
        assert_eq!(t1.table.hotel_slug, "demo");

        let req = test::TestRequest::get().uri("/api/hotels/demo/tables").to_request();
        let listed: GetTablesResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(listed.tables, vec![t1.table]);

        let req = test::TestRequest::delete().uri("/api/hotels/demo/tables?id=T1").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
        // deleting again is a no-op
        let req = test::TestRequest::delete().uri("/api/hotels/demo/tables?id=T1").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
        assert!(data.store().list_tables("demo").unwrap().is_empty());
    }

    #[actix_web::test]
    async fn bad_input() {
        let app = test::init_service(App::new().app_data(demo_state()).configure(configure)).await;

        let req = test::TestRequest::delete().uri("/api/hotels/demo/tables?id=").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::post()
            .uri("/api/hotels/demo/tables")
            .set_json(json!({"name": "No id"}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::get().uri("/api/hotels/ghost/tables").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
    }
}
