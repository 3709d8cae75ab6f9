//! Qdrant-backed vector index over its REST search API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::corpus::Verse;
use crate::error::{Result, SanadError};
use crate::vector::index::{VectorHit, VectorIndex};
use crate::vector::vector::Vector;

/// Configuration for connecting to a Qdrant collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QdrantConfig {
    /// Base URL of the Qdrant instance.
    pub url: String,

    /// Optional API key sent as the `api-key` header.
    pub api_key: Option<String>,

    /// Collection holding the verse embeddings.
    pub collection: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for QdrantConfig {
    fn default() -> Self {
        QdrantConfig {
            url: "http://localhost:6333".to_string(),
            api_key: None,
            collection: "quran_embeddings".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Request body for Qdrant's points search endpoint.
#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    vector: &'a [f32],
    limit: usize,
    with_payload: bool,
    with_vector: bool,
}

/// Response body from Qdrant's points search endpoint.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    result: Vec<ScoredPoint>,
}

/// One scored point from a Qdrant search.
#[derive(Debug, Deserialize)]
struct ScoredPoint {
    score: f32,
    payload: Option<Verse>,
    #[serde(default)]
    vector: Option<Vec<f32>>,
}

/// Vector index backed by a Qdrant collection.
///
/// Points are expected to carry the verse metadata as their payload and
/// are requested with their stored vectors so downstream deduplication
/// can reuse them instead of re-embedding.
pub struct QdrantIndex {
    client: Client,
    config: QdrantConfig,
}

impl QdrantIndex {
    /// Create a new index client for the configured collection.
    pub fn new(config: QdrantConfig) -> Result<Self> {
        if config.url.trim().is_empty() {
            return Err(SanadError::invalid_config("Qdrant URL must not be empty"));
        }
        if config.collection.trim().is_empty() {
            return Err(SanadError::invalid_config(
                "Qdrant collection name must not be empty",
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                SanadError::vector_search(format!("failed to build HTTP client: {e}"))
            })?;

        Ok(QdrantIndex { client, config })
    }

    fn search_url(&self) -> String {
        format!(
            "{}/collections/{}/points/search",
            self.config.url.trim_end_matches('/'),
            self.config.collection
        )
    }
}

#[async_trait]
impl VectorIndex for QdrantIndex {
    async fn search(&self, vector: &Vector, limit: usize) -> Result<Vec<VectorHit>> {
        let request = SearchRequest {
            vector: &vector.data,
            limit,
            with_payload: true,
            with_vector: true,
        };

        let mut builder = self.client.post(self.search_url()).json(&request);
        if let Some(api_key) = &self.config.api_key {
            builder = builder.header("api-key", api_key);
        }

        let http_response = builder.send().await.map_err(|e| {
            SanadError::vector_search(format!("Qdrant request failed: {e}"))
        })?;

        let status = http_response.status();
        let response_text = http_response.text().await.map_err(|e| {
            SanadError::vector_search(format!("failed to read Qdrant response: {e}"))
        })?;

        if !status.is_success() {
            return Err(SanadError::vector_search(format!(
                "Qdrant error (status {status}): {response_text}"
            )));
        }

        let response: SearchResponse = serde_json::from_str(&response_text).map_err(|e| {
            SanadError::vector_search(format!(
                "failed to parse Qdrant response: {e}. Response text: {response_text}"
            ))
        })?;

        let mut hits = Vec::with_capacity(response.result.len());
        for point in response.result {
            let Some(payload) = point.payload else {
                tracing::debug!("skipping Qdrant point without a verse payload");
                continue;
            };
            let mut hit = VectorHit::new(payload, point.score);
            if let Some(data) = point.vector {
                hit = hit.with_vector(Vector::new(data));
            }
            hits.push(hit);
        }

        Ok(hits)
    }

    fn name(&self) -> &str {
        "qdrant"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = QdrantConfig::default();
        assert_eq!(config.url, "http://localhost:6333");
        assert_eq!(config.collection, "quran_embeddings");
        assert_eq!(config.timeout_secs, 30);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_search_url() {
        let index = QdrantIndex::new(QdrantConfig {
            url: "http://localhost:6333/".to_string(),
            ..QdrantConfig::default()
        })
        .unwrap();
        assert_eq!(
            index.search_url(),
            "http://localhost:6333/collections/quran_embeddings/points/search"
        );
    }

    #[test]
    fn test_empty_url_rejected() {
        let result = QdrantIndex::new(QdrantConfig {
            url: "  ".to_string(),
            ..QdrantConfig::default()
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_search_response() {
        let json = r#"{
            "result": [
                {
                    "id": 7,
                    "version": 3,
                    "score": 0.91,
                    "payload": {
                        "surah_name_english": "Al-Fatihah",
                        "aya_number": 1,
                        "english_translation": "In the name of Allah."
                    },
                    "vector": [0.1, 0.2]
                },
                {
                    "id": 8,
                    "version": 3,
                    "score": 0.42,
                    "payload": null
                }
            ],
            "status": "ok",
            "time": 0.001
        }"#;
        let response: SearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.result.len(), 2);
        assert_eq!(response.result[0].score, 0.91);
        assert!(response.result[0].payload.is_some());
        assert!(response.result[1].payload.is_none());
    }
}
