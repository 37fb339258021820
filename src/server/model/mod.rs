use serde::{Deserialize, Serialize};

pub(crate) mod config;
pub(crate) mod event;
pub(crate) mod hotel;
pub(crate) mod menu;
pub(crate) mod order;
pub(crate) mod table;

/// `?id=` of the tenant-scoped DELETE endpoints
#[derive(Debug, Deserialize)]
pub(crate) struct DeleteParams {
    pub id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct DeleteResponse {
    pub ok: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct ErrorResponse {
    pub error: String,
}
