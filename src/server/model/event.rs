use serde::{Deserialize, Serialize};
use crate::server::model::order::Order;

/// Order lifecycle events fanned out to dashboards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub(crate) enum OrderEvent {
    #[serde(rename = "order:new", rename_all = "camelCase")]
    New { hotel_slug: String, order: Order },
    #[serde(rename = "order:update", rename_all = "camelCase")]
    Update { hotel_slug: String, order: Order },
}

impl OrderEvent {
    pub fn hotel_slug(&self) -> &str {
        match self {
            OrderEvent::New { hotel_slug, .. } | OrderEvent::Update { hotel_slug, .. } => hotel_slug,
        }
    }

    pub fn order(&self) -> &Order {
        match self {
            OrderEvent::New { order, .. } | OrderEvent::Update { order, .. } => order,
        }
    }
}

/// First frame of every stream, sent before any order event.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename = "connected")]
pub(crate) struct Connected<'a> {
    pub hotel: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::model::order::{OrderItem, OrderStatus};
    use chrono::{DateTime, Utc};

    #[test]
    fn wire_format() {
        let order = Order {
            id: "o1".to_string(),
            hotel_slug: "demo".to_string(),
            table_id: "T1".to_string(),
            items: vec![OrderItem { menu_item_id: "m1".to_string(), quantity: 1, note: None }],
            status: OrderStatus::New,
            created_at: DateTime::<Utc>::from_timestamp_millis(0).unwrap(),
            customer_rating: None,
        };
        let event = OrderEvent::New { hotel_slug: "demo".to_string(), order };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "order:new");
        assert_eq!(value["hotelSlug"], "demo");
        assert_eq!(value["order"]["id"], "o1");

        let connected = serde_json::to_string(&Connected { hotel: "demo" }).unwrap();
        assert_eq!(connected, r#"{"type":"connected","hotel":"demo"}"#);
    }
}
