use reqwest::Client;
use serde::Deserialize;
use anyhow::{Result, anyhow};

#[derive(Deserialize)]
struct QuoteResponse {
    content: String,
}

/// Client for the public random quote service
#[derive(Clone)]
pub struct QuoteClient {
    client: Client,
    url: String,
}

impl QuoteClient {
    pub fn new(url: &str) -> Self {
        Self {
            client: Client::new(),
            url: url.to_string(),
        }
    }

    pub async fn random(&self) -> Result<String> {
        let response = self.client.get(&self.url).send().await?;

        if !response.status().is_success() {
            return Err(anyhow!("Quote request failed with status: {}", response.status()));
        }

        let quote: QuoteResponse = response.json().await?;
        Ok(quote.content)
    }
}
