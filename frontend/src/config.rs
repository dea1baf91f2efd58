//! Build-time configuration.
//!
//! Values are baked in at compile time via `option_env!`, the WASM analogue of a
//! bundler's `import.meta.env`.

use gogreen_shared::protocol::{ApiRequest, relative_url};

/// Backend used by `trunk serve` when no override is given.
pub const LOCAL_API_BASE_URL: &str = "http://127.0.0.1:8000";
/// Release builds talk to the host that served the page.
pub const PRODUCTION_API_BASE_URL: &str = "";

const API_BASE_URL_ENV: Option<&str> = option_env!("GOGREEN_API_BASE_URL");
const LOG_LEVEL_ENV: Option<&str> = option_env!("GOGREEN_LOG_LEVEL");

fn normalize_base_url(value: &str) -> String {
    value.trim().trim_end_matches('/').to_string()
}

/// Resolves the API base: override first, then the build-profile default.
pub fn resolve_base_url(override_value: Option<&str>, release: bool) -> String {
    let normalized = override_value.map(normalize_base_url).unwrap_or_default();
    if !normalized.is_empty() {
        return normalized;
    }
    if release {
        PRODUCTION_API_BASE_URL.to_string()
    } else {
        LOCAL_API_BASE_URL.to_string()
    }
}

pub fn resolve_log_level(value: Option<&str>, release: bool) -> log::Level {
    value
        .and_then(|raw| raw.trim().parse::<log::Level>().ok())
        .unwrap_or(if release {
            log::Level::Info
        } else {
            log::Level::Debug
        })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
}

impl ApiConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: normalize_base_url(base_url),
        }
    }

    pub fn from_env() -> Self {
        Self {
            base_url: resolve_base_url(API_BASE_URL_ENV, !cfg!(debug_assertions)),
        }
    }

    /// Absolute (or same-origin) URL of an endpoint.
    pub fn url_for<R: ApiRequest>(&self, req: &R) -> String {
        format!("{}{}", self.base_url, relative_url(req))
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub log_level: log::Level,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            api: ApiConfig::from_env(),
            log_level: resolve_log_level(LOG_LEVEL_ENV, !cfg!(debug_assertions)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gogreen_shared::protocol::{OrdersQuery, PublicImpactQuery};

    #[test]
    fn test_override_is_normalized() {
        assert_eq!(
            resolve_base_url(Some("  https://api.gogreen.in/// "), true),
            "https://api.gogreen.in"
        );
    }

    #[test]
    fn test_blank_override_falls_back() {
        assert_eq!(resolve_base_url(Some("   "), false), LOCAL_API_BASE_URL);
        assert_eq!(resolve_base_url(None, false), LOCAL_API_BASE_URL);
        assert_eq!(resolve_base_url(None, true), PRODUCTION_API_BASE_URL);
    }

    #[test]
    fn test_log_level() {
        assert_eq!(resolve_log_level(Some("warn"), false), log::Level::Warn);
        assert_eq!(resolve_log_level(Some("nope"), true), log::Level::Info);
        assert_eq!(resolve_log_level(None, false), log::Level::Debug);
    }

    #[test]
    fn test_url_for() {
        let config = ApiConfig::new("http://localhost:8000/");
        assert_eq!(
            config.url_for(&PublicImpactQuery),
            "http://localhost:8000/api/trees/public-impact/"
        );

        let same_origin = ApiConfig::new(PRODUCTION_API_BASE_URL);
        let req = OrdersQuery {
            email: "a@b.in".into(),
        };
        assert_eq!(same_origin.url_for(&req), "/api/trees/orders/?email=a%40b.in");
    }
}
