use crate::error::LookupError;
use crate::sources::fetch_json;
use reqwest::Client;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

const SERVICE: &str = "dbpedia";

#[derive(Debug, Deserialize)]
struct SparqlResponse {
    results: SparqlResults,
}

#[derive(Debug, Deserialize)]
struct SparqlResults {
    bindings: Vec<Binding>,
}

#[derive(Debug, Deserialize)]
struct Binding {
    #[serde(rename = "abstract")]
    abstract_text: Option<BoundValue>,
}

#[derive(Debug, Deserialize)]
struct BoundValue {
    value: String,
}

fn escape_literal(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

/// English abstract of the resource labelled exactly `title`.
fn abstract_query(title: &str) -> String {
    format!(
        r#"PREFIX dbo: <http://dbpedia.org/ontology/>
PREFIX rdfs: <http://www.w3.org/2000/01/rdf-schema#>
SELECT ?abstract WHERE {{
    ?resource rdfs:label "{}"@en .
    ?resource dbo:abstract ?abstract .
    FILTER (lang(?abstract) = 'en')
}} LIMIT 1"#,
        escape_literal(title)
    )
}

pub struct DbpediaClient {
    client: Client,
    endpoint: String,
}

impl DbpediaClient {
    pub fn new(client: Client, endpoint: &str) -> Self {
        Self {
            client,
            endpoint: endpoint.to_string(),
        }
    }

    pub async fn abstract_for(
        &self,
        title: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<String>, LookupError> {
        let query = abstract_query(title);
        let request = self
            .client
            .get(&self.endpoint)
            .header("Accept", "application/sparql-results+json")
            .query(&[("query", query.as_str()), ("format", "json")]);
        let response: SparqlResponse = fetch_json(request, SERVICE, cancel).await?;

        Ok(response
            .results
            .bindings
            .into_iter()
            .next()
            .and_then(|b| b.abstract_text)
            .map(|v| v.value)
            .filter(|v| !v.trim().is_empty()))
    }
}
