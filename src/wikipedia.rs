use crate::error::LookupError;
use crate::sources::{fetch_json, Summary};
use reqwest::Client;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

const SERVICE: &str = "wikipedia";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    query: SearchQuery,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    search: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    title: String,
}

#[derive(Debug, Deserialize)]
struct PageSummary {
    #[serde(rename = "type")]
    page_type: Option<String>,
    extract: Option<String>,
}

impl PageSummary {
    /// Usable extract, unless the page only disambiguates.
    fn into_extract(self) -> Option<String> {
        if self.page_type.as_deref() == Some("disambiguation") {
            return None;
        }
        self.extract.filter(|e| !e.trim().is_empty())
    }
}

pub struct WikipediaClient {
    client: Client,
    api_url: String,
    rest_url: String,
}

impl WikipediaClient {
    pub fn new(client: Client, api_url: &str, rest_url: &str) -> Self {
        Self {
            client,
            api_url: api_url.to_string(),
            rest_url: rest_url.trim_end_matches('/').to_string(),
        }
    }

    /// Full-text search, then the page summary of the best hit.
    pub async fn summary(
        &self,
        query: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<Summary>, LookupError> {
        let request = self.client.get(&self.api_url).query(&[
            ("action", "query"),
            ("list", "search"),
            ("srsearch", query),
            ("utf8", ""),
            ("format", "json"),
        ]);
        let search: SearchResponse = fetch_json(request, SERVICE, cancel).await?;

        let Some(hit) = search.query.search.into_iter().next() else {
            return Ok(None);
        };

        let url = format!(
            "{}/page/summary/{}",
            self.rest_url,
            urlencoding::encode(&hit.title)
        );
        let page: PageSummary = fetch_json(self.client.get(url), SERVICE, cancel).await?;

        Ok(page.into_extract().map(|extract| Summary {
            title: hit.title,
            extract,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disambiguation_pages_are_rejected() {
        let page: PageSummary = serde_json::from_str(
            r#"{"type": "disambiguation", "extract": "Mercury may refer to:"}"#,
        )
        .unwrap();
        assert_eq!(page.into_extract(), None);
    }

    #[test]
    fn test_standard_page_keeps_extract() {
        let page: PageSummary = serde_json::from_str(
            r#"{"type": "standard", "extract": "A car is a motor vehicle."}"#,
        )
        .unwrap();
        assert_eq!(page.into_extract().as_deref(), Some("A car is a motor vehicle."));

        let empty: PageSummary = serde_json::from_str(r#"{"type": "standard"}"#).unwrap();
        assert_eq!(empty.into_extract(), None);
    }

    #[test]
    fn test_search_payload_shape() {
        let search: SearchResponse = serde_json::from_str(
            r#"{"batchcomplete": "", "query": {"searchinfo": {"totalhits": 1}, "search": [{"ns": 0, "title": "Car", "pageid": 13673345}]}}"#,
        )
        .unwrap();
        assert_eq!(search.query.search[0].title, "Car");
    }
}
