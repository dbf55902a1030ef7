//! Background relay
//!
//! Bridges tab metadata to the content script and the popup. It answers a
//! single request kind, `{"message": "getURL"}`, with `{"url": <sender tab url>}`.
//! Requests travel over an mpsc channel and each carries a oneshot reply.

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::{mpsc, oneshot};

/// A browser tab as seen by the relay
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tab {
    pub id: u32,
    pub url: String,
}

/// Who sent a message. Contexts that are not bound to a tab have `tab: None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageSender {
    pub tab: Option<Tab>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "message")]
pub enum RelayRequest {
    #[serde(rename = "getURL")]
    GetUrl,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayResponse {
    pub url: String,
}

/// Message passing as seen from a content or popup context
#[async_trait]
pub trait Runtime: Send + Sync {
    /// Send a message to the background relay. `Ok(None)` means the relay
    /// chose not to answer.
    async fn send_message(&self, message: Value) -> Result<Option<Value>>;
}

/// Ask the relay for the sender tab's URL. `Ok(None)` when it does not answer.
pub async fn request_url<R: Runtime + ?Sized>(runtime: &R) -> Result<Option<String>> {
    let request = serde_json::to_value(RelayRequest::GetUrl)?;
    let Some(response) = runtime.send_message(request).await? else {
        return Ok(None);
    };

    let response: RelayResponse =
        serde_json::from_value(response).context("malformed getURL response")?;
    Ok(Some(response.url))
}

#[derive(Debug, Default, Clone, Copy)]
pub struct BackgroundRelay;

impl BackgroundRelay {
    pub fn new() -> Self {
        Self
    }

    /// Answer one message. Unknown kinds and senders without a tab get no response.
    pub fn handle(&self, message: &Value, sender: &MessageSender) -> Option<RelayResponse> {
        let request = match serde_json::from_value::<RelayRequest>(message.clone()) {
            Ok(request) => request,
            Err(_) => {
                tracing::debug!(%message, "ignoring unrecognized relay message");
                return None;
            }
        };

        match request {
            RelayRequest::GetUrl => match &sender.tab {
                Some(tab) => Some(RelayResponse { url: tab.url.clone() }),
                None => {
                    tracing::warn!("getURL request from a sender without a tab");
                    None
                }
            },
        }
    }

    /// Run the relay on its own task and return a handle to reach it.
    pub fn spawn(self) -> RelayHandle {
        let (tx, mut rx) = mpsc::unbounded_channel::<Envelope>();

        tokio::spawn(async move {
            while let Some(envelope) = rx.recv().await {
                let response = self
                    .handle(&envelope.message, &envelope.sender)
                    .and_then(|response| serde_json::to_value(response).ok());
                // The requester may have gone away; nothing to do then
                let _ = envelope.reply.send(response);
            }
            tracing::debug!("background relay stopped");
        });

        RelayHandle { tx }
    }
}

struct Envelope {
    message: Value,
    sender: MessageSender,
    reply: oneshot::Sender<Option<Value>>,
}

/// Cloneable handle to a running relay
#[derive(Clone)]
pub struct RelayHandle {
    tx: mpsc::UnboundedSender<Envelope>,
}

impl RelayHandle {
    /// A messaging port for a context living in `tab`.
    pub fn port(&self, tab: Option<Tab>) -> RelayPort {
        RelayPort {
            tx: self.tx.clone(),
            sender: MessageSender { tab },
        }
    }
}

/// A relay connection bound to one sender context
#[derive(Clone)]
pub struct RelayPort {
    tx: mpsc::UnboundedSender<Envelope>,
    sender: MessageSender,
}

#[async_trait]
impl Runtime for RelayPort {
    async fn send_message(&self, message: Value) -> Result<Option<Value>> {
        let (reply, response) = oneshot::channel();
        self.tx
            .send(Envelope {
                message,
                sender: self.sender.clone(),
                reply,
            })
            .map_err(|_| anyhow!("background relay is not running"))?;

        response
            .await
            .map_err(|_| anyhow!("background relay dropped the request"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn product_tab() -> Tab {
        Tab {
            id: 7,
            url: "https://www.amazon.com/dp/B07XJ8C8F5/".to_string(),
        }
    }

    #[test]
    fn test_get_url_answers_with_sender_tab_url() {
        let relay = BackgroundRelay::new();
        let sender = MessageSender { tab: Some(product_tab()) };
        let response = relay.handle(&json!({"message": "getURL"}), &sender).unwrap();
        assert_eq!(
            serde_json::to_value(response).unwrap(),
            json!({"url": "https://www.amazon.com/dp/B07XJ8C8F5/"})
        );
    }

    #[test]
    fn test_unknown_message_kind_is_ignored() {
        let relay = BackgroundRelay::new();
        let sender = MessageSender { tab: Some(product_tab()) };
        assert_eq!(relay.handle(&json!({"message": "getTitle"}), &sender), None);
        assert_eq!(relay.handle(&json!({"url": "x"}), &sender), None);
        assert_eq!(relay.handle(&json!("getURL"), &sender), None);
    }

    #[test]
    fn test_sender_without_tab_gets_no_response() {
        let relay = BackgroundRelay::new();
        assert_eq!(relay.handle(&json!({"message": "getURL"}), &MessageSender::default()), None);
    }

    #[test]
    fn test_request_wire_format() {
        assert_eq!(serde_json::to_value(RelayRequest::GetUrl).unwrap(), json!({"message": "getURL"}));
    }

    #[tokio::test]
    async fn test_spawned_relay_round_trip() {
        let relay = BackgroundRelay::new().spawn();

        let content = relay.port(Some(product_tab()));
        let response = content.send_message(json!({"message": "getURL"})).await.unwrap();
        assert_eq!(response, Some(json!({"url": "https://www.amazon.com/dp/B07XJ8C8F5/"})));

        let popup = relay.port(None);
        assert_eq!(popup.send_message(json!({"message": "getURL"})).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_request_url() {
        let relay = BackgroundRelay::new().spawn();
        let url = request_url(&relay.port(Some(product_tab()))).await.unwrap();
        assert_eq!(url.as_deref(), Some("https://www.amazon.com/dp/B07XJ8C8F5/"));
        assert_eq!(request_url(&relay.port(None)).await.unwrap(), None);
    }
}
