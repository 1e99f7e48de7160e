pub mod client;
pub mod models;

pub use client::CoinMarketCapClient;
pub use models::ListingsQuery;
