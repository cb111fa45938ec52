//! Centralized configuration for Spindrift.
//!
//! All tunable parameters and settings are defined here to avoid
//! hard-coded values scattered throughout the codebase.

use std::time::Duration;

/// Central configuration for all Spindrift components.
///
/// Groups related configuration settings into logical sections.
/// Supports environment variable overrides for runtime customization.
#[derive(Debug, Clone, Default)]
pub struct SpindriftConfig {
    pub network: NetworkConfig,
    pub providers: ProviderConfig,
}

/// Outbound HTTP communication configuration.
///
/// Controls per-attempt timeouts, redirect handling, and the user agent
/// presented to upstream providers.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// Timeout for a conversion-API job submission
    pub conversion_timeout: Duration,
    /// Timeout for a single mirror existence probe
    pub probe_timeout: Duration,
    /// Timeout for a metadata extraction call
    pub extraction_timeout: Duration,
    /// Timeout for the proxied upstream fetch to produce response headers
    pub proxy_timeout: Duration,
    /// TCP connect timeout shared by all outbound requests
    pub connect_timeout: Duration,
    /// Maximum redirects followed by probes and fetches
    pub max_redirects: usize,
    /// User agent for upstream requests; some upstreams reject
    /// non-browser clients, so this impersonates a standard browser
    pub user_agent: &'static str,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            conversion_timeout: Duration::from_secs(20),
            probe_timeout: Duration::from_secs(5),
            extraction_timeout: Duration::from_secs(20),
            proxy_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            max_redirects: 5,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
        }
    }
}

/// Upstream provider endpoint configuration.
///
/// All lists are ordered by priority and immutable for the process
/// lifetime; adapters try entries strictly in listed order.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Conversion-API base URLs, tried in order
    pub conversion_endpoints: Vec<String>,
    /// Lightweight redirect mirrors for direct stream probes
    pub probe_mirrors: Vec<String>,
    /// Encoding tags probed per mirror, quality-descending
    pub probe_itags: Vec<String>,
    /// Metadata extractor API base URLs, tried in order
    pub extractor_api_bases: Vec<String>,
    /// Prefix for deriving the canonical watch URL from a video id
    pub watch_url_base: &'static str,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            conversion_endpoints: vec!["https://api.cobalt.tools".to_string()],
            probe_mirrors: vec![
                "https://inv.nadeko.net".to_string(),
                "https://invidious.nerdvpn.de".to_string(),
            ],
            probe_itags: vec![
                "251".to_string(), // opus ~160 kbps
                "140".to_string(), // aac 128 kbps
                "250".to_string(), // opus ~70 kbps
                "249".to_string(), // opus ~50 kbps
            ],
            extractor_api_bases: vec![
                "https://inv.nadeko.net".to_string(),
                "https://invidious.nerdvpn.de".to_string(),
            ],
            watch_url_base: "https://www.youtube.com/watch?v=",
        }
    }
}

impl SpindriftConfig {
    /// Creates configuration with environment variable overrides.
    ///
    /// Allows runtime configuration via environment variables while
    /// maintaining sensible defaults. Endpoint lists are comma-separated.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(endpoints) = std::env::var("SPINDRIFT_CONVERSION_ENDPOINTS") {
            let parsed = parse_url_list(&endpoints);
            if !parsed.is_empty() {
                config.providers.conversion_endpoints = parsed;
            }
        }

        if let Ok(mirrors) = std::env::var("SPINDRIFT_PROBE_MIRRORS") {
            let parsed = parse_url_list(&mirrors);
            if !parsed.is_empty() {
                config.providers.probe_mirrors = parsed;
            }
        }

        if let Ok(bases) = std::env::var("SPINDRIFT_EXTRACTOR_APIS") {
            let parsed = parse_url_list(&bases);
            if !parsed.is_empty() {
                config.providers.extractor_api_bases = parsed;
            }
        }

        if let Ok(tags) = std::env::var("SPINDRIFT_PROBE_ITAGS") {
            let parsed = parse_list(&tags);
            if !parsed.is_empty() {
                config.providers.probe_itags = parsed;
            }
        }

        if let Some(timeout) = env_timeout_secs("SPINDRIFT_CONVERSION_TIMEOUT") {
            config.network.conversion_timeout = timeout;
        }
        if let Some(timeout) = env_timeout_secs("SPINDRIFT_PROBE_TIMEOUT") {
            config.network.probe_timeout = timeout;
        }
        if let Some(timeout) = env_timeout_secs("SPINDRIFT_EXTRACTION_TIMEOUT") {
            config.network.extraction_timeout = timeout;
        }
        if let Some(timeout) = env_timeout_secs("SPINDRIFT_PROXY_TIMEOUT") {
            config.network.proxy_timeout = timeout;
        }

        config
    }

    /// Creates a configuration optimized for testing.
    ///
    /// Short timeouts so that tests exercising failure paths do not
    /// wait on real network bounds.
    pub fn for_testing() -> Self {
        let mut config = Self::default();
        config.network.conversion_timeout = Duration::from_millis(250);
        config.network.probe_timeout = Duration::from_millis(100);
        config.network.extraction_timeout = Duration::from_millis(250);
        config.network.proxy_timeout = Duration::from_millis(250);
        config.network.connect_timeout = Duration::from_millis(100);
        config
    }
}

/// Splits a comma-separated list, trimming entries and dropping blanks.
fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

/// Like `parse_list` but also strips trailing slashes off each entry.
fn parse_url_list(raw: &str) -> Vec<String> {
    parse_list(raw)
        .into_iter()
        .map(|entry| entry.trim_end_matches('/').to_string())
        .collect()
}

/// Reads a whole-seconds timeout from the environment; unparseable
/// values are ignored rather than failing startup.
fn env_timeout_secs(name: &str) -> Option<Duration> {
    let seconds = std::env::var(name).ok()?.parse::<u64>().ok()?;
    Some(Duration::from_secs(seconds))
}
