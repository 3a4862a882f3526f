// Boundary to the external knowledge services, plus the shared HTTP plumbing
// the concrete clients use.

use crate::config::{Config, HttpConfig};
use crate::dbpedia::DbpediaClient;
use crate::error::LookupError;
use crate::quotes::QuoteClient;
use crate::wikidata::WikidataClient;
use crate::wikipedia::WikipediaClient;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub title: String,
    pub extract: String,
}

/// One resolved sub-question: the summary plus an optional supplementary
/// abstract from the structured-data source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRecord {
    pub title: String,
    pub extract: String,
    pub secondary_extract: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub content: String,
    pub author: String,
}

/// `Ok(None)` means "not found"; `Err(LookupError::Aborted)` means the
/// cancellation token fired.
#[async_trait]
pub trait KnowledgeSource: Send + Sync {
    async fn primary_summary(
        &self,
        query: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<Summary>, LookupError>;

    async fn secondary_summary(
        &self,
        topic: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<Summary>, LookupError>;

    async fn tertiary_abstract(
        &self,
        title: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<String>, LookupError>;

    async fn quote(&self, cancel: &CancellationToken) -> Result<Option<Quote>, LookupError>;
}

// ============ HTTP plumbing ============

pub fn build_http_client(http: &HttpConfig) -> Result<Client, LookupError> {
    let client = Client::builder()
        .timeout(Duration::from_secs(http.timeout_secs))
        .connect_timeout(Duration::from_secs(http.connect_timeout_secs))
        .user_agent(http.user_agent.clone())
        .build()?;
    Ok(client)
}

/// Sends the request and decodes a JSON body, racing the cancellation token.
pub(crate) async fn fetch_json<T: DeserializeOwned>(
    request: RequestBuilder,
    service: &'static str,
    cancel: &CancellationToken,
) -> Result<T, LookupError> {
    let fetch = async {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status { service, status: status.as_u16() });
        }
        response
            .json::<T>()
            .await
            .map_err(|_| LookupError::Malformed(service))
    };

    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(LookupError::Aborted),
        result = fetch => result,
    }
}

// ============ Web services ============

/// Production source backed by Wikipedia, Wikidata, DBpedia and Quotable.
pub struct WebKnowledge {
    wikipedia: WikipediaClient,
    wikidata: WikidataClient,
    dbpedia: DbpediaClient,
    quotes: QuoteClient,
}

impl WebKnowledge {
    pub fn new(config: &Config) -> Result<Self, LookupError> {
        let client = build_http_client(&config.http)?;
        let endpoints = &config.endpoints;
        Ok(Self {
            wikipedia: WikipediaClient::new(
                client.clone(),
                &endpoints.wikipedia_api,
                &endpoints.wikipedia_rest,
            ),
            wikidata: WikidataClient::new(client.clone(), &endpoints.wikidata_api),
            dbpedia: DbpediaClient::new(client.clone(), &endpoints.dbpedia_sparql),
            quotes: QuoteClient::new(client, &endpoints.quote_api),
        })
    }
}

#[async_trait]
impl KnowledgeSource for WebKnowledge {
    async fn primary_summary(
        &self,
        query: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<Summary>, LookupError> {
        self.wikipedia.summary(query, cancel).await
    }

    async fn secondary_summary(
        &self,
        topic: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<Summary>, LookupError> {
        self.wikidata.describe(topic, cancel).await
    }

    async fn tertiary_abstract(
        &self,
        title: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<String>, LookupError> {
        self.dbpedia.abstract_for(title, cancel).await
    }

    async fn quote(&self, cancel: &CancellationToken) -> Result<Option<Quote>, LookupError> {
        self.quotes.random(cancel).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_cancelled_token_aborts_before_sending() {
        let client = build_http_client(&HttpConfig::default()).unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();

        // Unroutable address: the request would hang or fail, never succeed.
        let request = client.get("http://10.255.255.1/never");
        let result: Result<serde_json::Value, _> = fetch_json(request, "test", &cancel).await;
        assert!(result.unwrap_err().is_aborted());
    }
}
