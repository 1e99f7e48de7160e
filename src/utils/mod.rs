pub mod data_uri;
pub mod errors;
pub mod fs;

pub use data_uri::svg_data_uri;
pub use errors::CollectorError;
pub use fs::write_atomic;

#[cfg(test)]
pub mod test_http;
