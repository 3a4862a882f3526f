use crate::error::LookupError;
use crate::sources::{fetch_json, Quote};
use reqwest::Client;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

const SERVICE: &str = "quotable";

#[derive(Debug, Deserialize)]
struct RandomQuote {
    content: Option<String>,
    author: Option<String>,
}

pub struct QuoteClient {
    client: Client,
    url: String,
}

impl QuoteClient {
    pub fn new(client: Client, url: &str) -> Self {
        Self {
            client,
            url: url.to_string(),
        }
    }

    pub async fn random(&self, cancel: &CancellationToken) -> Result<Option<Quote>, LookupError> {
        let quote: RandomQuote = fetch_json(self.client.get(&self.url), SERVICE, cancel).await?;
        match (quote.content, quote.author) {
            (Some(content), Some(author)) if !content.is_empty() => {
                Ok(Some(Quote { content, author }))
            }
            _ => Ok(None),
        }
    }
}
