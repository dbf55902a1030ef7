pub mod backend;
pub mod quote;

pub use backend::BackendClient;
pub use quote::QuoteClient;
