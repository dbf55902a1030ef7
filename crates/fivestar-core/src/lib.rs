pub mod api;
pub mod chat;
pub mod config;
pub mod content;
pub mod popup;
pub mod product;
pub mod relay;
pub mod state;

// Re-export main types for convenience
pub use api::{BackendClient, QuoteClient};
pub use chat::{ChatHistory, ChatWidget};
pub use config::Config;
pub use content::{ContentScript, Document, PageDocument};
pub use popup::{HttpServices, PopupController, PopupServices, PopupState, PopupUpdate, PopupView};
pub use product::{ProductId, ProductInfo, ProsCons};
pub use relay::{
    BackgroundRelay, MessageSender, RelayHandle, RelayPort, RelayRequest, RelayResponse, Runtime, Tab,
};
pub use state::{BulletRegion, ChatMessage, ChatRole, SummaryRegion, SummaryStatus};
