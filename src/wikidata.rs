use crate::error::LookupError;
use crate::sources::{fetch_json, Summary};
use reqwest::Client;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

const SERVICE: &str = "wikidata";

#[derive(Debug, Deserialize)]
struct EntitySearch {
    #[serde(default)]
    search: Vec<Entity>,
}

#[derive(Debug, Deserialize)]
struct Entity {
    label: Option<String>,
    description: Option<String>,
}

impl Entity {
    fn into_summary(self, topic: &str) -> Option<Summary> {
        let description = self.description.filter(|d| !d.trim().is_empty())?;
        Some(Summary {
            title: self.label.unwrap_or_else(|| topic.to_string()),
            extract: format!("{} (Source: Wikidata)", description),
        })
    }
}

pub struct WikidataClient {
    client: Client,
    api_url: String,
}

impl WikidataClient {
    pub fn new(client: Client, api_url: &str) -> Self {
        Self {
            client,
            api_url: api_url.to_string(),
        }
    }

    /// Label and short description of the first matching entity.
    pub async fn describe(
        &self,
        topic: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<Summary>, LookupError> {
        let request = self.client.get(&self.api_url).query(&[
            ("action", "wbsearchentities"),
            ("search", topic),
            ("language", "en"),
            ("format", "json"),
        ]);
        let found: EntitySearch = fetch_json(request, SERVICE, cancel).await?;

        Ok(found
            .search
            .into_iter()
            .next()
            .and_then(|entity| entity.into_summary(topic)))
    }
}
