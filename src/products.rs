//! Inventory (stock) client

use chrono::NaiveDate;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::fetch::Fetch;

/// An inventory line item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: u64,

    pub name: String,

    /// Units on hand; the type keeps this non-negative
    pub quantity: u32,

    /// Calendar expiry; a product without one is never flagged as expiring
    #[serde(default)]
    pub expiration_date: Option<NaiveDate>,

    /// The owning user
    pub user_id: u64,
}

/// Fields for creating a product; the backend assigns the id
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub quantity: u32,
    pub expiration_date: Option<NaiveDate>,
    pub user_id: u64,
}

/// Client for product operations.
///
/// Read paths degrade: a failed list comes back empty and a failed point
/// read comes back `None`, with the cause logged. Write paths surface their
/// errors.
pub struct ProductsClient {
    /// The backend base URL
    url: String,

    /// API path prefix
    prefix: String,

    /// HTTP client used for requests
    client: Client,
}

impl ProductsClient {
    /// Create a new ProductsClient
    pub(crate) fn new(url: &str, prefix: &str, client: Client) -> Self {
        Self {
            url: url.to_string(),
            prefix: prefix.to_string(),
            client,
        }
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}{}", self.url, self.prefix, path)
    }

    /// List the products owned by `user_id`
    pub async fn list_by_user(&self, user_id: u64) -> Vec<Product> {
        let url = self.api_url(&format!("/products/user/{}", user_id));

        match Fetch::get(&self.client, &url).execute().await {
            Ok(products) => products,
            Err(err) => {
                log::warn!("listing products for user {} failed: {}", user_id, err);
                Vec::new()
            }
        }
    }

    /// List every product
    pub async fn list_all(&self) -> Vec<Product> {
        let url = self.api_url("/products");

        match Fetch::get(&self.client, &url).execute().await {
            Ok(products) => products,
            Err(err) => {
                log::warn!("listing products failed: {}", err);
                Vec::new()
            }
        }
    }

    /// Fetch a single product
    pub async fn get_by_id(&self, id: u64) -> Option<Product> {
        let url = self.api_url(&format!("/products/{}", id));

        match Fetch::get(&self.client, &url).execute().await {
            Ok(product) => Some(product),
            Err(err) => {
                log::warn!("fetching product {} failed: {}", id, err);
                None
            }
        }
    }

    /// Create a product
    pub async fn create(&self, product: &NewProduct) -> Result<Product, Error> {
        let url = self.api_url("/products");

        Fetch::post(&self.client, &url)
            .json(product)?
            .execute()
            .await
    }

    /// Re-persist the full product record
    pub async fn update(&self, product: &Product) -> Result<Product, Error> {
        let url = self.api_url(&format!("/products/{}", product.id));

        Fetch::put(&self.client, &url)
            .json(product)?
            .execute()
            .await
    }

    /// Delete a product
    pub async fn delete(&self, id: u64) -> Result<(), Error> {
        let url = self.api_url(&format!("/products/{}", id));

        Fetch::delete(&self.client, &url).send().await?;

        Ok(())
    }

    /// Persist the product with one more unit on hand
    pub async fn increment(&self, product: &Product) -> Result<Product, Error> {
        let mut updated = product.clone();
        updated.quantity += 1;
        self.update(&updated).await
    }

    /// Persist the product with one fewer unit on hand.
    ///
    /// Zero is the floor: decrementing at quantity 0 is a no-op that issues
    /// no request and hands the product back unchanged.
    pub async fn decrement(&self, product: &Product) -> Result<Product, Error> {
        if product.quantity == 0 {
            return Ok(product.clone());
        }

        let mut updated = product.clone();
        updated.quantity -= 1;
        self.update(&updated).await
    }
}

/// Products at or below the given quantity threshold
pub fn low_stock(products: &[Product], threshold: u32) -> Vec<&Product> {
    products
        .iter()
        .filter(|product| product.quantity <= threshold)
        .collect()
}

/// Products whose expiry falls within `days` of `today`.
///
/// Already-expired products are included; products without an expiration
/// date never are.
pub fn expiring_within(products: &[Product], today: NaiveDate, days: u32) -> Vec<&Product> {
    let horizon = today + chrono::Duration::days(i64::from(days));

    products
        .iter()
        .filter(|product| match product.expiration_date {
            Some(date) => date <= horizon,
            None => false,
        })
        .collect()
}
