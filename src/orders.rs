//! Order placement and listing client

use chrono::{Local, NaiveDate};
use reqwest::Client;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Error;
use crate::fetch::Fetch;
use crate::products::{Product, ProductsClient};
use crate::suppliers::{Supplier, SuppliersClient};

/// Where an order stands.
///
/// The client never changes this; it is set by the backend or supplier-side
/// action. The vocabulary here mirrors the values the backend has been
/// observed to send; anything absent or unrecognized reads as pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Approved,
    Cancelled,
}

impl OrderStatus {
    /// Parse a wire value, case-insensitively; unrecognized values read as
    /// pending
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "CONFIRMED" => OrderStatus::Confirmed,
            "APPROVED" => OrderStatus::Approved,
            // Both spellings have been seen on the wire
            "CANCELLED" | "CANCELED" => OrderStatus::Cancelled,
            _ => OrderStatus::Pending,
        }
    }

    /// The wire form
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Confirmed => "CONFIRMED",
            OrderStatus::Approved => "APPROVED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }
}

impl Serialize for OrderStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for OrderStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value.as_deref().map(Self::parse).unwrap_or_default())
    }
}

/// A request to a supplier for a quantity of a product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: u64,

    pub product_id: u64,

    pub quantity: u32,

    pub supplier_id: u64,

    /// The owning user
    pub user_id: u64,

    /// Stamped at creation time, not caller-supplied
    pub order_date: NaiveDate,

    #[serde(default)]
    pub status: OrderStatus,
}

/// Fields for placing an order; the id, date and status are assigned
/// elsewhere
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub product_id: u64,
    pub quantity: u32,
    pub supplier_id: u64,
    pub user_id: u64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateOrderBody<'a> {
    #[serde(flatten)]
    order: &'a NewOrder,
    order_date: NaiveDate,
}

/// An order with its product and supplier resolved.
///
/// Either side can be `None` when the point read failed or the referenced
/// record no longer exists; the order itself is still kept.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderWithDetails {
    pub order: Order,
    pub product: Option<Product>,
    pub supplier: Option<Supplier>,
}

/// Client for order operations; read paths degrade like the product
/// client's.
pub struct OrdersClient {
    /// The backend base URL
    url: String,

    /// API path prefix
    prefix: String,

    /// HTTP client used for requests
    client: Client,

    /// Product lookups for order enrichment
    products: ProductsClient,

    /// Supplier lookups for order enrichment
    suppliers: SuppliersClient,
}

impl OrdersClient {
    /// Create a new OrdersClient
    pub(crate) fn new(url: &str, prefix: &str, client: Client) -> Self {
        Self {
            url: url.to_string(),
            prefix: prefix.to_string(),
            client: client.clone(),
            products: ProductsClient::new(url, prefix, client.clone()),
            suppliers: SuppliersClient::new(url, prefix, client),
        }
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}{}", self.url, self.prefix, path)
    }

    /// Place an order, stamping today's date on it
    pub async fn create(&self, order: &NewOrder) -> Result<Order, Error> {
        let url = self.api_url("/orders");
        let body = CreateOrderBody {
            order,
            order_date: Local::now().date_naive(),
        };

        Fetch::post(&self.client, &url).json(&body)?.execute().await
    }

    /// List the orders placed by `user_id`
    pub async fn list_by_user(&self, user_id: u64) -> Vec<Order> {
        let url = self.api_url(&format!("/orders/user/{}", user_id));

        match Fetch::get(&self.client, &url).execute().await {
            Ok(orders) => orders,
            Err(err) => {
                log::warn!("listing orders for user {} failed: {}", user_id, err);
                Vec::new()
            }
        }
    }

    /// List every order
    pub async fn list_all(&self) -> Vec<Order> {
        let url = self.api_url("/orders");

        match Fetch::get(&self.client, &url).execute().await {
            Ok(orders) => orders,
            Err(err) => {
                log::warn!("listing orders failed: {}", err);
                Vec::new()
            }
        }
    }

    /// Fetch a single order
    pub async fn get_by_id(&self, id: u64) -> Option<Order> {
        let url = self.api_url(&format!("/orders/{}", id));

        match Fetch::get(&self.client, &url).execute().await {
            Ok(order) => Some(order),
            Err(err) => {
                log::warn!("fetching order {} failed: {}", id, err);
                None
            }
        }
    }

    /// List a user's orders with product and supplier resolved.
    ///
    /// Each order's two point reads are issued together and awaited
    /// jointly, with no ordering guarantee between them. A failed
    /// resolution leaves that side `None` without discarding the order.
    pub async fn list_by_user_with_details(&self, user_id: u64) -> Vec<OrderWithDetails> {
        let orders = self.list_by_user(user_id).await;

        let lookups = orders.into_iter().map(|order| async move {
            let (product, supplier) = tokio::join!(
                self.products.get_by_id(order.product_id),
                self.suppliers.get_by_id(order.supplier_id),
            );

            OrderWithDetails {
                order,
                product,
                supplier,
            }
        });

        futures::future::join_all(lookups).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_statuses_parse_case_insensitively() {
        assert_eq!(OrderStatus::parse("CONFIRMED"), OrderStatus::Confirmed);
        assert_eq!(OrderStatus::parse("confirmed"), OrderStatus::Confirmed);
        assert_eq!(OrderStatus::parse("Approved"), OrderStatus::Approved);
        assert_eq!(OrderStatus::parse("CANCELLED"), OrderStatus::Cancelled);
        assert_eq!(OrderStatus::parse("CANCELED"), OrderStatus::Cancelled);
    }

    #[test]
    fn unrecognized_statuses_read_as_pending() {
        assert_eq!(OrderStatus::parse("SHIPPED"), OrderStatus::Pending);
        assert_eq!(OrderStatus::parse(""), OrderStatus::Pending);
    }

    #[test]
    fn absent_and_null_statuses_default_to_pending() {
        let without_status = serde_json::json!({
            "id": 1,
            "productId": 2,
            "quantity": 3,
            "supplierId": 4,
            "userId": 5,
            "orderDate": "2024-06-01"
        });
        let order: Order = serde_json::from_value(without_status).unwrap();
        assert_eq!(order.status, OrderStatus::Pending);

        let null_status = serde_json::json!({
            "id": 1,
            "productId": 2,
            "quantity": 3,
            "supplierId": 4,
            "userId": 5,
            "orderDate": "2024-06-01",
            "status": null
        });
        let order: Order = serde_json::from_value(null_status).unwrap();
        assert_eq!(order.status, OrderStatus::Pending);
    }

    #[test]
    fn status_serializes_to_its_wire_form() {
        assert_eq!(
            serde_json::to_value(OrderStatus::Confirmed).unwrap(),
            serde_json::json!("CONFIRMED")
        );
    }
}
