use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MenuItem {
    pub id: String,
    pub hotel_slug: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price_cents: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub available: bool,
}

/// Body of `POST /hotels/{slug}/menu`. Absent fields are left untouched on update.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MenuItemPatch {
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub price_cents: Option<u32>,
    pub category: Option<String>,
    pub available: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct GetMenuParams {
    pub available: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct GetMenuResponse {
    pub menu: Vec<MenuItem>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct MenuItemResponse {
    pub item: MenuItem,
}
