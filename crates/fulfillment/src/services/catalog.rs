//! Product catalog trait and in-memory implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::ProductId;
use freight::PackagingProfile;
use tokio::sync::RwLock;

use crate::error::{FulfillmentError, Result};

/// Source of packaging profiles for products.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// Returns the packaging profile of `product_id`.
    async fn packaging_profile(&self, product_id: &ProductId) -> Result<PackagingProfile>;
}

/// In-memory product catalog for testing and the CLI.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProductCatalog {
    profiles: Arc<RwLock<HashMap<ProductId, PackagingProfile>>>,
}

impl InMemoryProductCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers or replaces the profile of a product.
    pub async fn insert(&self, product_id: impl Into<ProductId>, profile: PackagingProfile) {
        self.profiles.write().await.insert(product_id.into(), profile);
    }

    /// Returns the number of products known.
    pub async fn len(&self) -> usize {
        self.profiles.read().await.len()
    }

    /// Returns true if no products are known.
    pub async fn is_empty(&self) -> bool {
        self.profiles.read().await.is_empty()
    }
}

#[async_trait]
impl ProductCatalog for InMemoryProductCatalog {
    async fn packaging_profile(&self, product_id: &ProductId) -> Result<PackagingProfile> {
        self.profiles
            .read()
            .await
            .get(product_id)
            .cloned()
            .ok_or_else(|| FulfillmentError::ProductNotFound(product_id.clone()))
    }
}
