//! Popup controller
//!
//! On open the controller fans out one request per popup region and
//! publishes each result to a [`PopupView`] as soon as it resolves. The only
//! ordering between regions: the summary result is applied after the
//! product info, because it builds on the scraped lines.

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::api::{BackendClient, QuoteClient};
use crate::product::{ProductId, ProductInfo, ProsCons};
use crate::state::{BulletRegion, SummaryRegion};

pub const QUOTE_FAILED: &str = "Failed to fetch quote";
pub const INFO_FAILED: &str = "Failed to fetch product info";

/// One region's new contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopupUpdate {
    Url(String),
    Quote(String),
    Title(String),
    Summary(SummaryRegion),
    Reviews(String),
    /// The reviews request settled without a digest; nothing is shown for it
    ReviewsUnavailable,
    Pros(BulletRegion),
    Cons(BulletRegion),
}

/// Sink for region updates
pub trait PopupView: Send + Sync {
    fn update(&self, update: PopupUpdate);
}

impl PopupView for mpsc::UnboundedSender<PopupUpdate> {
    fn update(&self, update: PopupUpdate) {
        // The receiving UI may already be closed
        let _ = self.send(update);
    }
}

/// Network capabilities the popup needs
#[async_trait]
pub trait PopupServices: Send + Sync {
    async fn random_quote(&self) -> Result<String>;
    async fn product_info(&self, product_id: Option<&ProductId>) -> Result<ProductInfo>;
    async fn summarize_product(&self, product_id: Option<&ProductId>) -> Result<String>;
    async fn summarize_reviews(&self, product_id: Option<&ProductId>) -> Result<String>;
    async fn pros_cons(&self, product_id: Option<&ProductId>) -> Result<ProsCons>;
}

/// Services backed by the FiveStar backend and the public quote service
#[derive(Clone)]
pub struct HttpServices {
    backend: BackendClient,
    quotes: QuoteClient,
}

impl HttpServices {
    pub fn new(backend: BackendClient, quotes: QuoteClient) -> Self {
        Self { backend, quotes }
    }
}

#[async_trait]
impl PopupServices for HttpServices {
    async fn random_quote(&self) -> Result<String> {
        self.quotes.random().await
    }

    async fn product_info(&self, product_id: Option<&ProductId>) -> Result<ProductInfo> {
        self.backend.product_info(product_id).await
    }

    async fn summarize_product(&self, product_id: Option<&ProductId>) -> Result<String> {
        self.backend.summarize_product(product_id).await
    }

    async fn summarize_reviews(&self, product_id: Option<&ProductId>) -> Result<String> {
        self.backend.summarize_reviews(product_id).await
    }

    async fn pros_cons(&self, product_id: Option<&ProductId>) -> Result<ProsCons> {
        self.backend.pros_cons(product_id).await
    }
}

pub struct PopupController<S: PopupServices, V: PopupView> {
    services: S,
    view: V,
}

impl<S: PopupServices, V: PopupView> PopupController<S, V> {
    pub fn new(services: S, view: V) -> Self {
        Self { services, view }
    }

    /// Populate every region for the tab at `tab_url`. Returns once all
    /// requests have settled.
    pub async fn open(&self, tab_url: &str) {
        self.view.update(PopupUpdate::Url(tab_url.to_string()));

        let product_id = ProductId::from_url(tab_url);
        let product_id = product_id.as_ref();
        match product_id {
            Some(id) => tracing::info!(product_id = %id, "opening popup"),
            None => tracing::info!(url = tab_url, "opening popup for a non-product page"),
        }

        tokio::join!(
            self.load_quote(),
            self.load_product(product_id),
            self.load_reviews(product_id),
            self.load_pros_cons(product_id),
        );
    }

    async fn load_quote(&self) {
        let quote = match self.services.random_quote().await {
            Ok(quote) => quote,
            Err(e) => {
                tracing::error!(error = %e, "failed to fetch quote");
                QUOTE_FAILED.to_string()
            }
        };
        self.view.update(PopupUpdate::Quote(quote));
    }

    async fn load_product(&self, product_id: Option<&ProductId>) {
        // Both requests are in flight together; the summary is applied on
        // top of whatever the info request left in the region.
        let (mut region, summary) = tokio::join!(
            self.load_info(product_id),
            self.services.summarize_product(product_id),
        );

        match summary {
            Ok(summary) => region.mark_summarized(summary),
            Err(e) => {
                tracing::error!(error = %e, "failed to summarize product");
                region.mark_failed();
            }
        }
        self.view.update(PopupUpdate::Summary(region));
    }

    async fn load_info(&self, product_id: Option<&ProductId>) -> SummaryRegion {
        match self.services.product_info(product_id).await {
            Ok(info) => {
                self.view.update(PopupUpdate::Title(info.title.clone()));
                let region = SummaryRegion::summarizing(info.summary_lines());
                self.view.update(PopupUpdate::Summary(region.clone()));
                region
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to fetch product info");
                self.view.update(PopupUpdate::Title(INFO_FAILED.to_string()));
                SummaryRegion::new()
            }
        }
    }

    async fn load_reviews(&self, product_id: Option<&ProductId>) {
        match self.services.summarize_reviews(product_id).await {
            Ok(reviews) => self.view.update(PopupUpdate::Reviews(reviews)),
            Err(e) => {
                tracing::error!(error = %e, "failed to summarize reviews");
                self.view.update(PopupUpdate::ReviewsUnavailable);
            }
        }
    }

    async fn load_pros_cons(&self, product_id: Option<&ProductId>) {
        match self.services.pros_cons(product_id).await {
            Ok(ProsCons { pros, cons }) => {
                self.view.update(PopupUpdate::Pros(BulletRegion::from_items("pros", pros)));
                self.view.update(PopupUpdate::Cons(BulletRegion::from_items("cons", cons)));
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to fetch pros and cons");
                self.view.update(PopupUpdate::Pros(BulletRegion::failed("pros")));
                self.view.update(PopupUpdate::Cons(BulletRegion::failed("cons")));
            }
        }
    }
}

/// Current contents of every popup region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopupState {
    pub url: String,
    pub quote: String,
    /// `None` until the info request settles
    pub title: Option<String>,
    pub summary: SummaryRegion,
    pub reviews: Option<String>,
    pub reviews_settled: bool,
    pub pros: BulletRegion,
    pub cons: BulletRegion,
}

impl PopupState {
    pub fn new() -> Self {
        Self {
            url: String::new(),
            quote: String::new(),
            title: None,
            summary: SummaryRegion::new(),
            reviews: None,
            reviews_settled: false,
            pros: BulletRegion::Loading,
            cons: BulletRegion::Loading,
        }
    }

    pub fn apply(&mut self, update: PopupUpdate) {
        match update {
            PopupUpdate::Url(url) => self.url = url,
            PopupUpdate::Quote(quote) => self.quote = quote,
            PopupUpdate::Title(title) => self.title = Some(title),
            PopupUpdate::Summary(summary) => self.summary = summary,
            PopupUpdate::Reviews(reviews) => {
                self.reviews = Some(reviews);
                self.reviews_settled = true;
            }
            PopupUpdate::ReviewsUnavailable => self.reviews_settled = true,
            PopupUpdate::Pros(pros) => self.pros = pros,
            PopupUpdate::Cons(cons) => self.cons = cons,
        }
    }
}

impl Default for PopupState {
    fn default() -> Self {
        Self::new()
    }
}
