//! Skyscanner partners API provider
//!
//! Only the flights geo hierarchy is used. Places come back as an object
//! keyed by entity id; they are returned as opaque JSON values in the order
//! the API sent them.
use crate::{
    error::{AppError, AppResult},
    services::providers::GeoSource,
};
use reqwest::Client as HttpClient;
use serde::Deserialize;
use serde_json::{Map, Value};

const GEO_HIERARCHY_PATH: &str = "/apiservices/v3/geo/hierarchy/flights/en-GB";

#[derive(Debug, Deserialize)]
struct GeoHierarchyResponse {
    #[serde(default)]
    places: Map<String, Value>,
}

#[derive(Clone)]
pub struct SkyscannerClient {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl SkyscannerClient {
    pub fn new(api_key: String, api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url,
        }
    }
}

#[async_trait::async_trait]
impl GeoSource for SkyscannerClient {
    async fn fetch_places(&self) -> AppResult<Vec<Value>> {
        let url = format!("{}{}", self.api_url.trim_end_matches('/'), GEO_HIERARCHY_PATH);

        let response = self
            .http_client
            .get(&url)
            .header("x-api-key", &self.api_key)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Skyscanner API returned status {}: {}",
                status, body
            )));
        }

        let hierarchy: GeoHierarchyResponse = response.json().await?;
        let places: Vec<Value> = hierarchy.places.into_iter().map(|(_, place)| place).collect();

        tracing::info!(
            places = places.len(),
            provider = self.name(),
            "Geo hierarchy fetched"
        );

        Ok(places)
    }

    fn name(&self) -> &'static str {
        "skyscanner"
    }
}
