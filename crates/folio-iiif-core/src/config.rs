//! Configuration for the Folio IIIF service.
//!
//! All configuration is driven by environment variables with sensible
//! defaults, so a container deployment needs no config files.

use folio_iiif_model::{ComplianceLevel, Format};

/// Service configuration.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceConfig {
    /// Bind address for the HTTP front door.
    pub listen: String,
    /// Public base URL of the image service, used in `@id` URLs
    /// (no trailing slash).
    pub public_base_url: String,
    /// Base URL of the backing image renderer.
    pub backend_base_url: String,
    /// Timeout for backend fetches, in seconds.
    pub backend_timeout_secs: u64,
    /// The declared compliance level advertised in `info.json`.
    pub compliance_level: ComplianceLevel,
    /// Output format implied by a bare-identifier request.
    pub default_format: Format,
    /// Log level.
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:8182".to_owned(),
            public_base_url: "http://localhost:8182/iiif".to_owned(),
            backend_base_url: "http://localhost:8080/fsi/server".to_owned(),
            backend_timeout_secs: 30,
            compliance_level: ComplianceLevel::Level2,
            default_format: Format::Jpg,
            log_level: "info".to_owned(),
        }
    }
}

impl ServiceConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(v) = std::env::var("IIIF_LISTEN") {
            config.listen = v;
        }
        if let Ok(v) = std::env::var("IIIF_PUBLIC_BASE_URL") {
            config.public_base_url = v.trim_end_matches('/').to_owned();
        }
        if let Ok(v) = std::env::var("IIIF_BACKEND_URL") {
            config.backend_base_url = v;
        }
        if let Ok(v) = std::env::var("IIIF_BACKEND_TIMEOUT_SECS") {
            if let Ok(secs) = v.parse() {
                config.backend_timeout_secs = secs;
            }
        }
        if let Ok(v) = std::env::var("IIIF_COMPLIANCE_LEVEL") {
            if let Some(level) = ComplianceLevel::from_token(&v) {
                config.compliance_level = level;
            }
        }
        if let Ok(v) = std::env::var("IIIF_DEFAULT_FORMAT") {
            if let Some(format) = Format::from_token(&v) {
                config.default_format = format;
            }
        }
        if let Ok(v) = std::env::var("LOG_LEVEL") {
            config.log_level = v;
        }

        config
    }
}
