use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Table {
    pub id: String,
    pub hotel_slug: String,
    pub name: String,
    pub qr_url: String, // relative deep link to the customer ordering page
}

impl Table {
    pub fn qr_url_for(hotel_slug: &str, table_id: &str) -> String {
        format!("/h/{}/table/{}", hotel_slug, table_id)
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct TablePatch {
    pub id: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct GetTablesResponse {
    pub tables: Vec<Table>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct TableResponse {
    pub table: Table,
}
