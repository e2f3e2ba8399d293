//! Distance service trait and in-memory implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use tokio::sync::RwLock;

use crate::error::{FulfillmentError, Result};

/// Source of road distances between addresses.
#[async_trait]
pub trait DistanceService: Send + Sync {
    /// Returns the distance in kilometres from `origin` to `destination`.
    async fn distance_km(&self, origin: &str, destination: &str) -> Result<Decimal>;
}

/// In-memory route table for testing and the CLI.
///
/// Routes are symmetric and addresses are compared ignoring case and
/// surrounding whitespace.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDistanceService {
    routes: Arc<RwLock<HashMap<(String, String), Decimal>>>,
}

impl InMemoryDistanceService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the distance between two addresses in both directions.
    pub async fn add_route(&self, origin: &str, destination: &str, distance_km: Decimal) {
        self.routes
            .write()
            .await
            .insert(route_key(origin, destination), distance_km);
    }

    /// Returns the number of routes known.
    pub async fn route_count(&self) -> usize {
        self.routes.read().await.len()
    }
}

#[async_trait]
impl DistanceService for InMemoryDistanceService {
    async fn distance_km(&self, origin: &str, destination: &str) -> Result<Decimal> {
        self.routes
            .read()
            .await
            .get(&route_key(origin, destination))
            .copied()
            .ok_or_else(|| FulfillmentError::DistanceUnavailable {
                origin: origin.to_string(),
                destination: destination.to_string(),
            })
    }
}

fn route_key(origin: &str, destination: &str) -> (String, String) {
    let a = origin.trim().to_lowercase();
    let b = destination.trim().to_lowercase();
    if a <= b { (a, b) } else { (b, a) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_routes_are_symmetric() {
        let service = InMemoryDistanceService::new();
        service.add_route("Warehouse 1", "Farm 7", dec!(320)).await;

        assert_eq!(service.distance_km("Warehouse 1", "Farm 7").await.unwrap(), dec!(320));
        assert_eq!(service.distance_km(" farm 7", "WAREHOUSE 1 ").await.unwrap(), dec!(320));
        assert_eq!(service.route_count().await, 1);
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let service = InMemoryDistanceService::new();
        let err = service.distance_km("A", "B").await.unwrap_err();
        assert!(matches!(err, FulfillmentError::DistanceUnavailable { .. }));
    }
}
