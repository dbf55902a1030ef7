//! Content script: asks the background relay for the tab URL and writes it
//! into the page's `url` element.

use anyhow::Result;
use std::collections::BTreeMap;

use crate::relay::{self, Runtime};

pub const URL_ELEMENT_ID: &str = "url";

/// Page elements the content script may write to
pub trait Document {
    /// Replace the text of element `id`. Returns `false` if there is no such element.
    fn set_text_content(&mut self, id: &str, text: &str) -> bool;
}

/// In-memory page made of text elements keyed by id
#[derive(Debug, Clone, Default)]
pub struct PageDocument {
    elements: BTreeMap<String, String>,
}

impl PageDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_element(mut self, id: &str) -> Self {
        self.elements.insert(id.to_string(), String::new());
        self
    }

    pub fn text(&self, id: &str) -> Option<&str> {
        self.elements.get(id).map(String::as_str)
    }
}

impl Document for PageDocument {
    fn set_text_content(&mut self, id: &str, text: &str) -> bool {
        match self.elements.get_mut(id) {
            Some(content) => {
                *content = text.to_string();
                true
            }
            None => false,
        }
    }
}

pub struct ContentScript<R: Runtime> {
    runtime: R,
}

impl<R: Runtime> ContentScript<R> {
    pub fn new(runtime: R) -> Self {
        Self { runtime }
    }

    /// Request the URL once and write it into the page if the element exists.
    ///
    /// Returns the URL the relay answered with, if any.
    pub async fn on_load<D: Document>(&self, document: &mut D) -> Result<Option<String>> {
        let Some(url) = relay::request_url(&self.runtime).await? else {
            tracing::debug!("relay did not answer getURL");
            return Ok(None);
        };

        if !document.set_text_content(URL_ELEMENT_ID, &url) {
            tracing::debug!("page has no #{} element, skipping", URL_ELEMENT_ID);
        }

        Ok(Some(url))
    }
}
