//! Price history models

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Date format of history keys
pub const SAMPLE_DATE_FORMAT: &str = "%Y%m%d";

/// Today's price for one coin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSample {
    pub id: u64,
    pub date: String,
    pub price: f64,
}

impl PriceSample {
    /// The `{date: {price}}` shape stored in history files
    pub fn history_record(&self) -> Value {
        let mut record = Map::new();
        record.insert(self.date.clone(), json!({ "price": self.price }));
        Value::Object(record)
    }
}
