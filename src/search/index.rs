//! HTTP client for an Elasticsearch-compatible document index

use super::{Document, DocumentSearch, SearchError};
use crate::config::IndexConfig;
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

/// Index client shared by the retrieval tools and the ingestion pipeline
#[derive(Clone)]
pub struct IndexClient {
    client: Client,
    base_url: Url,
    index: String,
    username: String,
    password: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: Hits,
}

#[derive(Debug, Deserialize)]
struct Hits {
    #[serde(default)]
    hits: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
struct Hit {
    #[serde(rename = "_source")]
    source: Document,
}

impl IndexClient {
    pub fn new(config: &IndexConfig) -> Result<Self, SearchError> {
        let base_url = Url::parse(&config.url)
            .map_err(|e| SearchError::InvalidUrl(format!("{}: {e}", config.url)))?;
        if base_url.cannot_be_a_base() {
            return Err(SearchError::InvalidUrl(config.url.clone()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url,
            index: config.index.clone(),
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }

    pub fn index(&self) -> &str {
        &self.index
    }

    /// Build `{base}/{index}/{segments...}` with each segment percent-encoded
    fn endpoint(&self, segments: &[&str]) -> Result<Url, SearchError> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|()| SearchError::InvalidUrl(self.base_url.to_string()))?;
            path.pop_if_empty().push(&self.index);
            for segment in segments {
                path.push(segment);
            }
        }
        Ok(url)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.password {
            Some(password) => request.basic_auth(&self.username, Some(password)),
            None => request,
        }
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, SearchError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(SearchError::Status {
            status: status.as_u16(),
            body,
        })
    }

    /// Insert or replace a document under `id`
    pub async fn upsert(&self, id: &str, document: &Document) -> Result<(), SearchError> {
        let url = self.endpoint(&["_doc", id])?;
        let response = self
            .authorize(self.client.put(url))
            .json(document)
            .send()
            .await?;
        Self::check(response).await?;
        tracing::debug!(index = %self.index, id = %id, "Document upserted");
        Ok(())
    }
}

/// Request body for a keyword search restricted to one corpus
pub(crate) fn search_body(intent: &str, query: &str, topk: usize, alpha: f64) -> Value {
    json!({
        "size": topk,
        "query": {
            "bool": {
                "must": [
                    { "match": { "content": { "query": query, "boost": alpha } } }
                ],
                "filter": [
                    { "term": { "metadata.intent": intent } }
                ]
            }
        }
    })
}

#[async_trait]
impl DocumentSearch for IndexClient {
    async fn search(
        &self,
        intent: &str,
        query: &str,
        topk: usize,
        alpha: f64,
    ) -> Result<Vec<Document>, SearchError> {
        let url = self.endpoint(&["_search"])?;
        let response = self
            .authorize(self.client.post(url))
            .json(&search_body(intent, query, topk, alpha))
            .send()
            .await?;
        let parsed: SearchResponse = Self::check(response).await?.json().await?;

        tracing::debug!(
            index = %self.index,
            intent = %intent,
            hits = parsed.hits.hits.len(),
            "Index search completed"
        );
        Ok(parsed.hits.hits.into_iter().map(|h| h.source).collect())
    }
}
