//! Supplier registry client

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::fetch::Fetch;

/// A vendor record, created once and read-only afterwards
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    pub id: u64,

    pub company_name: String,

    pub contact_email: String,

    #[serde(default)]
    pub phone: String,

    #[serde(default)]
    pub address: String,

    /// Free-text description of what the supplier provides
    pub products: String,

    /// The owning user
    pub user_id: u64,

    #[serde(default)]
    pub created_at: String,
}

/// Fields for registering a supplier; the backend assigns id and createdAt
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSupplier {
    pub company_name: String,
    pub contact_email: String,
    pub phone: String,
    pub address: String,
    pub products: String,
    pub user_id: u64,
}

/// Client for supplier operations; read paths degrade like the product
/// client's.
pub struct SuppliersClient {
    /// The backend base URL
    url: String,

    /// API path prefix
    prefix: String,

    /// HTTP client used for requests
    client: Client,
}

impl SuppliersClient {
    /// Create a new SuppliersClient
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

    /// List the suppliers registered by `user_id`
    pub async fn list_by_user(&self, user_id: u64) -> Vec<Supplier> {
        let url = self.api_url(&format!("/suppliers/user/{}", user_id));

        match Fetch::get(&self.client, &url).execute().await {
            Ok(suppliers) => suppliers,
            Err(err) => {
                log::warn!("listing suppliers for user {} failed: {}", user_id, err);
                Vec::new()
            }
        }
    }

    /// List every supplier
    pub async fn list_all(&self) -> Vec<Supplier> {
        let url = self.api_url("/suppliers");

        match Fetch::get(&self.client, &url).execute().await {
            Ok(suppliers) => suppliers,
            Err(err) => {
                log::warn!("listing suppliers failed: {}", err);
                Vec::new()
            }
        }
    }

    /// Fetch a single supplier
    pub async fn get_by_id(&self, id: u64) -> Option<Supplier> {
        let url = self.api_url(&format!("/suppliers/{}", id));

        match Fetch::get(&self.client, &url).execute().await {
            Ok(supplier) => Some(supplier),
            Err(err) => {
                log::warn!("fetching supplier {} failed: {}", id, err);
                None
            }
        }
    }

    /// Register a supplier
    pub async fn create(&self, supplier: &NewSupplier) -> Result<Supplier, Error> {
        let url = self.api_url("/suppliers");

        Fetch::post(&self.client, &url)
            .json(supplier)?
            .execute()
            .await
    }
}
