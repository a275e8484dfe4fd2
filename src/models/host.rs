//! Host intelligence records returned by the search endpoints.

use serde::{Deserialize, Serialize};

/// Geographic location attached to a host record
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HostLocation {
    pub city: Option<String>,
    pub country_name: Option<String>,
    pub country_code: Option<String>,
}

impl HostLocation {
    /// "City, Country" with whichever parts are known
    pub fn display(&self) -> String {
        let country = self
            .country_name
            .as_deref()
            .or(self.country_code.as_deref());
        match (self.city.as_deref(), country) {
            (Some(city), Some(country)) => format!("{}, {}", city, country),
            (Some(city), None) => city.to_string(),
            (None, Some(country)) => country.to_string(),
            (None, None) => "-".to_string(),
        }
    }
}

/// A single service banner observed on a host
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceBanner {
    pub port: Option<u16>,
    pub transport: Option<String>,
    pub product: Option<String>,
    pub version: Option<String>,
    pub info: Option<String>,
}

impl ServiceBanner {
    /// "80/tcp  nginx 1.18" style summary line
    pub fn display(&self) -> String {
        let port = self
            .port
            .map(|p| p.to_string())
            .unwrap_or_else(|| "?".to_string());
        let transport = self.transport.as_deref().unwrap_or("tcp");
        let mut line = format!("{}/{}", port, transport);
        if let Some(ref product) = self.product {
            line.push_str(&format!("  {}", product));
            if let Some(ref version) = self.version {
                line.push_str(&format!(" {}", version));
            }
        }
        if let Some(ref info) = self.info {
            if !info.is_empty() {
                line.push_str(&format!(" ({})", info));
            }
        }
        line
    }
}

/// A host record from either search endpoint.
///
/// IP lookups return one record with `ports` populated; filter searches
/// return many records with a single `port` each. Every field is optional
/// because the upstream intelligence data is sparse.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HostInfo {
    pub ip_str: Option<String>,
    pub org: Option<String>,
    pub isp: Option<String>,
    pub os: Option<String>,
    pub port: Option<u16>,
    pub ports: Vec<u16>,
    pub hostnames: Vec<String>,
    pub domains: Vec<String>,
    pub product: Option<String>,
    pub version: Option<String>,
    pub timestamp: Option<String>,
    pub vulns: Vec<String>,
    pub location: HostLocation,
    pub data: Vec<ServiceBanner>,
}

impl HostInfo {
    pub fn ip(&self) -> &str {
        self.ip_str.as_deref().unwrap_or("unknown")
    }

    /// Ports for display: the aggregate list when present, else the single port
    pub fn port_list(&self) -> Vec<u16> {
        if !self.ports.is_empty() {
            self.ports.clone()
        } else {
            self.port.into_iter().collect()
        }
    }

    pub fn hostname_display(&self) -> String {
        if self.hostnames.is_empty() {
            "-".to_string()
        } else {
            self.hostnames.join(", ")
        }
    }

    /// Observation timestamp formatted for display
    pub fn timestamp_display(&self) -> String {
        match self.timestamp.as_deref() {
            Some(ts) => {
                if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(ts) {
                    dt.format("%Y-%m-%d %H:%M").to_string()
                } else {
                    ts.chars().take(16).collect()
                }
            }
            None => "-".to_string(),
        }
    }
}
