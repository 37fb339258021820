use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Hotel {
    pub slug: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google_review_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PostHotelRequest {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub google_review_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct GetHotelsResponse {
    pub hotels: Vec<Hotel>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct HotelResponse {
    pub hotel: Hotel,
}
