//! In-memory repository of every tenant's hotel, menu, tables and orders.

pub(crate) mod bus;
pub(crate) mod error;

use crate::server::model::event::OrderEvent;
use crate::server::model::hotel::Hotel;
use crate::server::model::menu::{MenuItem, MenuItemPatch};
use crate::server::model::order::{Order, OrderItem, OrderPatch, OrderStatus};
use crate::server::model::table::{Table, TablePatch};
use crate::server::store::bus::{EventBus, Subscription};
use crate::server::store::error::StoreError;
use crate::server::util::id::{generate_id, is_url_safe};
use crate::server::util::time;
use log::info;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// One hotel and everything it owns.
struct Tenant {
    hotel: Hotel,
    menu: Vec<MenuItem>,
    tables: Vec<Table>,
    /// oldest first
    orders: Vec<Order>,
}

impl Tenant {
    fn new(hotel: Hotel) -> Self {
        Self { hotel, menu: vec![], tables: vec![], orders: vec![] }
    }
}

#[derive(Default)]
struct Tenants {
    by_slug: HashMap<String, Tenant>,
    /// creation order of the slugs in `by_slug`
    slugs: Vec<String>,
    /// order id -> owning hotel slug
    order_index: HashMap<String, String>,
}

impl Tenants {
    fn tenant(&self, slug: &str) -> Result<&Tenant, StoreError> {
        self.by_slug
            .get(slug)
            .ok_or_else(|| StoreError::HotelNotFound { slug: slug.to_string() })
    }

    fn tenant_mut(&mut self, slug: &str) -> Result<&mut Tenant, StoreError> {
        self.by_slug
            .get_mut(slug)
            .ok_or_else(|| StoreError::HotelNotFound { slug: slug.to_string() })
    }
}

/// Every method runs to completion under one lock, so readers never see a
/// partially applied write and events leave in mutation order.
pub(crate) struct Store {
    tenants: Mutex<Tenants>,
    bus: EventBus,
}

impl Store {
    pub fn new(bus: EventBus) -> Self {
        Self { tenants: Mutex::new(Tenants::default()), bus }
    }

    fn lock(&self) -> MutexGuard<'_, Tenants> {
        self.tenants.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn create_hotel(&self, name: &str, slug: &str, google_review_url: Option<String>) -> Result<Hotel, StoreError> {
        if name.trim().is_empty() {
            return Err(StoreError::MissingField { field: "name" });
        }
        if !is_url_safe(slug) {
            return Err(StoreError::NotUrlSafe { field: "slug" });
        }
        let mut tenants = self.lock();
        if tenants.by_slug.contains_key(slug) {
            return Err(StoreError::HotelExists { slug: slug.to_string() });
        }
        let hotel = Hotel {
            slug: slug.to_string(),
            name: name.trim().to_string(),
            google_review_url: google_review_url.filter(|url| !url.trim().is_empty()),
        };
        tenants.by_slug.insert(slug.to_string(), Tenant::new(hotel.clone()));
        tenants.slugs.push(slug.to_string());
        info!("created hotel={}", slug);
        Ok(hotel)
    }

    pub fn get_hotel(&self, slug: &str) -> Option<Hotel> {
        self.lock().by_slug.get(slug).map(|t| t.hotel.clone())
    }

    pub fn list_hotels(&self) -> Vec<Hotel> {
        let tenants = self.lock();
        tenants
            .slugs
            .iter()
            .filter_map(|slug| tenants.by_slug.get(slug))
            .map(|t| t.hotel.clone())
            .collect()
    }

    pub fn list_menu(&self, hotel_slug: &str) -> Result<Vec<MenuItem>, StoreError> {
        Ok(self.lock().tenant(hotel_slug)?.menu.clone())
    }

    /// Update the item whose id matches `patch.id`, otherwise create a new one.
    pub fn upsert_menu_item(&self, hotel_slug: &str, patch: MenuItemPatch) -> Result<MenuItem, StoreError> {
        if patch.id.as_deref().is_some_and(|id| !id.is_empty() && !is_url_safe(id)) {
            return Err(StoreError::NotUrlSafe { field: "id" });
        }
        // a name, when sent, must not be blank on create or update
        if patch.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(StoreError::MissingField { field: "name" });
        }

        let mut tenants = self.lock();
        let tenant = tenants.tenant_mut(hotel_slug)?;

        let existing = patch
            .id
            .as_deref()
            .and_then(|id| tenant.menu.iter_mut().find(|item| item.id == id));
        if let Some(item) = existing {
            if let Some(name) = patch.name {
                item.name = name;
            }
            if patch.description.is_some() {
                item.description = patch.description;
            }
            if let Some(price_cents) = patch.price_cents {
                item.price_cents = price_cents;
            }
            if patch.category.is_some() {
                item.category = patch.category;
            }
            if let Some(available) = patch.available {
                item.available = available;
            }
            info!("updated menu item={} of hotel={}", item.id, hotel_slug);
            return Ok(item.clone());
        }

        let name = patch.name.ok_or(StoreError::MissingField { field: "name" })?;
        let id = match patch.id.filter(|id| !id.is_empty()) {
            Some(id) => id,
            None => unique_id(|candidate| tenant.menu.iter().any(|item| item.id == candidate)),
        };
        let item = MenuItem {
            id,
            hotel_slug: hotel_slug.to_string(),
            name,
            description: patch.description,
            price_cents: patch.price_cents.unwrap_or(0),
            category: patch.category,
            available: patch.available.unwrap_or(true),
        };
        tenant.menu.push(item.clone());
        info!("created menu item={} of hotel={}", item.id, hotel_slug);
        Ok(item)
    }

    pub fn delete_menu_item(&self, hotel_slug: &str, id: &str) -> Result<(), StoreError> {
        let mut tenants = self.lock();
        let tenant = tenants.tenant_mut(hotel_slug)?;
        tenant.menu.retain(|item| item.id != id);
        Ok(())
    }

    pub fn list_tables(&self, hotel_slug: &str) -> Result<Vec<Table>, StoreError> {
        Ok(self.lock().tenant(hotel_slug)?.tables.clone())
    }

    pub fn upsert_table(&self, hotel_slug: &str, patch: TablePatch) -> Result<Table, StoreError> {
        let id = patch
            .id
            .filter(|id| !id.is_empty())
            .ok_or(StoreError::MissingField { field: "id" })?;
        if !is_url_safe(&id) {
            return Err(StoreError::NotUrlSafe { field: "id" });
        }
        let name = patch.name.filter(|n| !n.trim().is_empty());

        let mut tenants = self.lock();
        let tenant = tenants.tenant_mut(hotel_slug)?;
        if let Some(table) = tenant.tables.iter_mut().find(|t| t.id == id) {
            if let Some(name) = name {
                table.name = name;
            }
            return Ok(table.clone());
        }

        let table = Table {
            qr_url: Table::qr_url_for(hotel_slug, &id),
            name: name.unwrap_or_else(|| id.clone()),
            hotel_slug: hotel_slug.to_string(),
            id,
        };
        tenant.tables.push(table.clone());
        info!("created table={} of hotel={}", table.id, hotel_slug);
        Ok(table)
    }

    pub fn delete_table(&self, hotel_slug: &str, id: &str) -> Result<(), StoreError> {
        let mut tenants = self.lock();
        let tenant = tenants.tenant_mut(hotel_slug)?;
        tenant.tables.retain(|table| table.id != id);
        Ok(())
    }

    /// Place a new order and publish `order:new`.
    pub fn create_order(&self, hotel_slug: &str, table_id: &str, items: Vec<OrderItem>) -> Result<Order, StoreError> {
        if table_id.is_empty() {
            return Err(StoreError::MissingField { field: "tableId" });
        }
        if items.is_empty() {
            return Err(StoreError::EmptyOrder);
        }
        if let Some(item) = items.iter().find(|item| item.quantity == 0) {
            return Err(StoreError::ZeroQuantity { menu_item_id: item.menu_item_id.clone() });
        }

        let mut tenants = self.lock();
        tenants.tenant(hotel_slug)?;
        let id = unique_id(|candidate| tenants.order_index.contains_key(candidate));
        let order = Order {
            id: id.clone(),
            hotel_slug: hotel_slug.to_string(),
            table_id: table_id.to_string(),
            items,
            status: OrderStatus::New,
            created_at: time::helper::get_utc_now(),
            customer_rating: None,
        };
        tenants.tenant_mut(hotel_slug)?.orders.push(order.clone());
        tenants.order_index.insert(id, hotel_slug.to_string());
        info!("order={} placed at table={} of hotel={}", order.id, table_id, hotel_slug);

        self.bus.publish(&OrderEvent::New { hotel_slug: hotel_slug.to_string(), order: order.clone() });
        Ok(order)
    }

    /// Apply the fields present in `patch` and publish `order:update`.
    /// Any status may follow any other.
    pub fn update_order(&self, id: &str, patch: OrderPatch) -> Result<Order, StoreError> {
        if let Some(rating) = patch.customer_rating {
            if !(1..=5).contains(&rating) {
                return Err(StoreError::InvalidRating { rating });
            }
        }

        let mut tenants = self.lock();
        let not_found = || StoreError::OrderNotFound { id: id.to_string() };
        let hotel_slug = tenants.order_index.get(id).cloned().ok_or_else(not_found)?;
        let order = tenants
            .tenant_mut(&hotel_slug)?
            .orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(not_found)?;

        if let Some(status) = patch.status {
            info!("order={} of hotel={} moved {:?} -> {:?}", id, hotel_slug, order.status, status);
            order.status = status;
        }
        if let Some(rating) = patch.customer_rating {
            info!("order={} of hotel={} rated {}", id, hotel_slug, rating);
            order.customer_rating = Some(rating);
        }
        let order = order.clone();

        self.bus.publish(&OrderEvent::Update { hotel_slug, order: order.clone() });
        Ok(order)
    }

    /// Orders of a hotel, most recent first.
    pub fn list_orders(&self, hotel_slug: &str) -> Result<Vec<Order>, StoreError> {
        Ok(self.lock().tenant(hotel_slug)?.orders.iter().rev().cloned().collect())
    }

    pub fn subscribe(&self, hotel_slug: &str) -> Subscription {
        self.bus.subscribe(hotel_slug)
    }

    #[cfg(test)]
    pub fn subscriber_count(&self) -> usize {
        self.bus.subscriber_count()
    }
}

fn unique_id<F>(taken: F) -> String
where
    F: Fn(&str) -> bool,
{
    loop {
        let id = generate_id();
        if !taken(&id) {
            return id;
        }
    }
}
