//! Pexels image search provider
//!
//! Pexels authenticates with the raw API key in the `Authorization` header
//! (no scheme prefix). A missing key is not checked here; Pexels rejects the
//! request and the rejection surfaces as `AppError::ExternalApi`.
use crate::{
    error::{AppError, AppResult},
    models::{PexelsPhoto, PexelsSearchResponse},
    services::providers::ImageSearch,
};
use reqwest::Client as HttpClient;

#[derive(Clone)]
pub struct PexelsClient {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl PexelsClient {
    pub fn new(api_key: String, api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url,
        }
    }
}

#[async_trait::async_trait]
impl ImageSearch for PexelsClient {
    async fn search(&self, query: &str, per_page: u32) -> AppResult<Vec<PexelsPhoto>> {
        let url = format!("{}/search", self.api_url.trim_end_matches('/'));
        let per_page = per_page.to_string();

        let response = self
            .http_client
            .get(&url)
            // bare key, no "Bearer"
            .header(reqwest::header::AUTHORIZATION, &self.api_key)
            .query(&[("query", query), ("per_page", per_page.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Pexels API returned status {} for query '{}': {}",
                status, query, body
            )));
        }

        let results: PexelsSearchResponse = response.json().await?;

        tracing::debug!(
            query = %query,
            results = results.photos.len(),
            provider = self.name(),
            "Image search completed"
        );

        Ok(results.photos)
    }

    fn name(&self) -> &'static str {
        "pexels"
    }
}
