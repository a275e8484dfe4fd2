//! Filter search query model.

use serde::Serialize;

/// The filter fields accepted by the filter search endpoint.
///
/// Empty fields are omitted from the request body; the backend requires at
/// least one filter, so an all-empty query is rejected locally before any
/// request is made.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FilterQuery {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub port: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub country: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub product: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub os: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub category: String,
}

impl FilterQuery {
    pub fn is_empty(&self) -> bool {
        self.port.is_empty()
            && self.country.is_empty()
            && self.product.is_empty()
            && self.os.is_empty()
            && self.category.is_empty()
    }

    /// Short human-readable summary, e.g. `port:22 country:DE`
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if !self.port.is_empty() {
            parts.push(format!("port:{}", self.port));
        }
        if !self.country.is_empty() {
            parts.push(format!("country:{}", self.country));
        }
        if !self.product.is_empty() {
            parts.push(format!("product:{}", self.product));
        }
        if !self.os.is_empty() {
            parts.push(format!("os:{}", self.os));
        }
        if !self.category.is_empty() {
            parts.push(format!("category:{}", self.category));
        }
        parts.join(" ")
    }
}
