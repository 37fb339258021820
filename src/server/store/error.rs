use derive_more::{Display, Error};

#[derive(Debug, Display, Error, PartialEq)]
pub(crate) enum StoreError {
    #[display("hotel {slug} not found")]
    HotelNotFound { slug: String },
    #[display("hotel {slug} already exists")]
    HotelExists { slug: String },
    #[display("order {id} not found")]
    OrderNotFound { id: String },
    #[display("{field} required")]
    MissingField { field: &'static str },
    #[display("{field} must only contain letters, digits, '-' or '_'")]
    NotUrlSafe { field: &'static str },
    #[display("order must contain at least one item")]
    EmptyOrder,
    #[display("item {menu_item_id} has quantity 0")]
    ZeroQuantity { menu_item_id: String },
    #[display("customerRating must be between 1 and 5, got {rating}")]
    InvalidRating { rating: u8 },
}
