pub mod coinmarketcap;
pub mod currency;
pub mod error;

pub use coinmarketcap::CoinMarketCapClient;
pub use currency::CurrencyClient;
pub use error::ApiError;
