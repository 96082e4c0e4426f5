//! Client configuration.
//!
//! `ClientConfig` can be built in code or deserialized from whatever format
//! the host application already uses for its settings.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::routes::DEFAULT_SERVICE_DOMAIN;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Storefront identifier sent as `domain` on every request.
    pub domain: String,
    #[serde(default = "default_service_domain")]
    pub service_domain: String,
    /// End-to-end request timeout in milliseconds. `None` waits
    /// indefinitely.
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    /// Headers seeded into the client before defaults are applied.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

fn default_service_domain() -> String {
    DEFAULT_SERVICE_DOMAIN.to_string()
}

impl ClientConfig {
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            service_domain: default_service_domain(),
            timeout_ms: None,
            headers: BTreeMap::new(),
        }
    }

    pub fn service_domain(mut self, service_domain: impl Into<String>) -> Self {
        self.service_domain = service_domain.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn timeout_duration(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}
