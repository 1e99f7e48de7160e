pub mod client;

pub use client::CurrencyClient;
