use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use anyhow::{Result, anyhow};

use crate::product::{ProductId, ProductInfo, ProsCons};

#[derive(Deserialize)]
struct SummaryResponse {
    summary: String,
}

#[derive(Deserialize)]
struct ReviewsResponse {
    reviews: String,
}

/// Client for the local FiveStar backend service
#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn product_info(&self, product_id: Option<&ProductId>) -> Result<ProductInfo> {
        self.get("info", product_id).await
    }

    pub async fn summarize_product(&self, product_id: Option<&ProductId>) -> Result<String> {
        let response: SummaryResponse = self.get("summarize-product", product_id).await?;
        Ok(response.summary)
    }

    pub async fn summarize_reviews(&self, product_id: Option<&ProductId>) -> Result<String> {
        let response: ReviewsResponse = self.get("summarize-reviews", product_id).await?;
        Ok(response.reviews)
    }

    pub async fn pros_cons(&self, product_id: Option<&ProductId>) -> Result<ProsCons> {
        self.get("pros-cons", product_id).await
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str, product_id: Option<&ProductId>) -> Result<T> {
        let url = format!("{}/{}", self.base_url, endpoint);

        let response = self
            .client
            .get(&url)
            .query(&[("product_id", ProductId::query_value(product_id))])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "Backend request to /{} failed with status: {}. Make sure the FiveStar backend is running at {}",
                endpoint,
                response.status(),
                self.base_url
            ));
        }

        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn echo_dot() -> ProductId {
        ProductId::from_url("https://www.amazon.com/dp/B07XJ8C8F5/").unwrap()
    }

    #[tokio::test]
    async fn test_product_info() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/info"))
            .and(query_param("product_id", "B07XJ8C8F5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "title": "Echo Dot",
                "description": "Smart speaker",
                "features": ["Alexa", "Compact"]
            })))
            .mount(&server)
            .await;

        let client = BackendClient::new(&server.uri());
        let info = client.product_info(Some(&echo_dot())).await.unwrap();
        assert_eq!(info.title, "Echo Dot");
        assert_eq!(info.description.as_deref(), Some("Smart speaker"));
        assert_eq!(info.features, Some(vec!["Alexa".to_string(), "Compact".to_string()]));
    }

    #[tokio::test]
    async fn test_missing_id_is_sent_as_null() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/summarize-reviews"))
            .and(query_param("product_id", "null"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "reviews": "Mostly positive"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = BackendClient::new(&server.uri());
        assert_eq!(client.summarize_reviews(None).await.unwrap(), "Mostly positive");
    }

    #[tokio::test]
    async fn test_summary_ignores_extra_fields() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/summarize-product"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "info": {"title": "Echo Dot"},
                "summary": "A small speaker"
            })))
            .mount(&server)
            .await;

        let client = BackendClient::new(&format!("{}/", server.uri()));
        assert_eq!(client.summarize_product(Some(&echo_dot())).await.unwrap(), "A small speaker");
    }

    #[tokio::test]
    async fn test_pros_cons_optional_lists() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pros-cons"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "pros": ["Loud"]
            })))
            .mount(&server)
            .await;

        let client = BackendClient::new(&server.uri());
        let pros_cons = client.pros_cons(Some(&echo_dot())).await.unwrap();
        assert_eq!(pros_cons.pros, Some(vec!["Loud".to_string()]));
        assert_eq!(pros_cons.cons, None);
    }

    #[tokio::test]
    async fn test_error_status_is_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/info"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = BackendClient::new(&server.uri());
        let err = client.product_info(Some(&echo_dot())).await.unwrap_err();
        assert!(err.to_string().contains("500"));
    }

    #[tokio::test]
    async fn test_malformed_body_is_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/summarize-product"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = BackendClient::new(&server.uri());
        assert!(client.summarize_product(None).await.is_err());
    }
}
