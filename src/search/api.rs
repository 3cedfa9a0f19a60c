//! HTTP embedding backend
//!
//! Posts `{"model": ..., "input": ...}` to the configured endpoint and
//! expects `{"embedding": [f32]}` back. Any transport or shape problem is an
//! `EmbeddingFailed` for the item being embedded, never a crash.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SksError};
use crate::search::embeddings::Embedder;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct ApiEmbedder {
    client: reqwest::blocking::Client,
    endpoint: String,
    model: String,
    dims: usize,
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Deserialize)]
struct EmbedResponse {
    embedding: Vec<f32>,
}

impl ApiEmbedder {
    pub fn new(endpoint: String, model: String, dims: usize) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            client,
            endpoint,
            model,
            dims,
        }
    }
}

impl Embedder for ApiEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&EmbedRequest {
                model: &self.model,
                input: text,
            })
            .send()
            .map_err(|e| SksError::EmbeddingFailed(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(SksError::EmbeddingFailed(format!(
                "provider returned {}",
                response.status()
            )));
        }

        let parsed: EmbedResponse = response
            .json()
            .map_err(|e| SksError::EmbeddingFailed(format!("invalid response body: {e}")))?;

        if parsed.embedding.len() != self.dims {
            return Err(SksError::EmbeddingFailed(format!(
                "provider returned {} dims, expected {}",
                parsed.embedding.len(),
                self.dims
            )));
        }

        Ok(parsed.embedding)
    }

    fn dims(&self) -> usize {
        self.dims
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[test]
    fn embed_round_trip() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/embed")
                .json_body_includes(r#"{"input": "git commit workflow"}"#);
            then.status(200)
                .json_body(serde_json::json!({ "embedding": [0.1, 0.2, 0.3] }));
        });

        let embedder = ApiEmbedder::new(server.url("/embed"), "default".to_string(), 3);
        let embedding = embedder.embed("git commit workflow").unwrap();

        mock.assert();
        assert_eq!(embedding, vec![0.1, 0.2, 0.3]);
    }

    #[test]
    fn server_error_is_embedding_failed() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/embed");
            then.status(500);
        });

        let embedder = ApiEmbedder::new(server.url("/embed"), "default".to_string(), 3);
        let err = embedder.embed("text").unwrap_err();
        assert!(matches!(err, SksError::EmbeddingFailed(_)));
    }

    #[test]
    fn wrong_dims_is_embedding_failed() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/embed");
            then.status(200)
                .json_body(serde_json::json!({ "embedding": [0.1, 0.2] }));
        });

        let embedder = ApiEmbedder::new(server.url("/embed"), "default".to_string(), 3);
        let err = embedder.embed("text").unwrap_err();
        assert!(matches!(err, SksError::EmbeddingFailed(_)));
    }

    #[test]
    fn malformed_body_is_embedding_failed() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/embed");
            then.status(200).body("not json");
        });

        let embedder = ApiEmbedder::new(server.url("/embed"), "default".to_string(), 3);
        let err = embedder.embed("text").unwrap_err();
        assert!(matches!(err, SksError::EmbeddingFailed(_)));
    }
}
