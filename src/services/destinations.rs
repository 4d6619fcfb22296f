use serde_json::Value;

use crate::{error::AppResult, services::providers::GeoSource};

/// Places kept when seeding the destination catalog
pub const DEFAULT_PLACE_LIMIT: usize = 100;

/// Pulls the geo hierarchy and keeps the first `limit` places
///
/// The places carry no `categories`; they are tagged by hand before the
/// catalog is served.
pub async fn fetch_destinations(source: &dyn GeoSource, limit: usize) -> AppResult<Vec<Value>> {
    let mut places = source.fetch_places().await.map_err(|e| {
        tracing::error!(provider = source.name(), error = %e, "Destination fetch failed");
        e
    })?;

    let available = places.len();
    places.truncate(limit);

    tracing::info!(
        available,
        kept = places.len(),
        provider = source.name(),
        "Destinations fetched"
    );

    Ok(places)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::AppError, services::providers::MockGeoSource};
    use serde_json::json;

    #[tokio::test]
    async fn test_keeps_first_places_in_order() {
        let mut source = MockGeoSource::new();
        source.expect_name().return_const("mock");
        source.expect_fetch_places().times(1).returning(|| {
            Ok((0..150)
                .map(|i| json!({ "entityId": i.to_string(), "name": format!("Place {i}") }))
                .collect())
        });

        let places = fetch_destinations(&source, DEFAULT_PLACE_LIMIT).await.unwrap();

        assert_eq!(places.len(), 100);
        assert_eq!(places[0]["name"], "Place 0");
        assert_eq!(places[99]["name"], "Place 99");
    }

    #[tokio::test]
    async fn test_fewer_places_than_limit() {
        let mut source = MockGeoSource::new();
        source.expect_name().return_const("mock");
        source
            .expect_fetch_places()
            .returning(|| Ok(vec![json!({ "name": "Tokyo Haneda", "iata": "HND" })]));

        let places = fetch_destinations(&source, DEFAULT_PLACE_LIMIT).await.unwrap();

        assert_eq!(places.len(), 1);
    }

    #[tokio::test]
    async fn test_upstream_failure_propagates() {
        let mut source = MockGeoSource::new();
        source.expect_name().return_const("mock");
        source
            .expect_fetch_places()
            .returning(|| Err(AppError::ExternalApi("status 403".to_string())));

        let result = fetch_destinations(&source, DEFAULT_PLACE_LIMIT).await;

        assert!(matches!(result, Err(AppError::ExternalApi(_))));
    }
}
