//! Storefront server configuration

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Conversions API credentials. Both must be present for events to be sent.
#[derive(Clone)]
pub struct CapiConfig {
    pub pixel_id: Option<String>,
    pub access_token: Option<String>,
    /// Graph API base, e.g. `https://graph.facebook.com`
    pub graph_base_url: String,
    /// Graph API version segment, e.g. `v18.0`
    pub api_version: String,
    /// Forwarded as `test_event_code` when a request sets `test_mode`
    pub test_event_code: Option<String>,
}

impl CapiConfig {
    pub fn is_configured(&self) -> bool {
        self.pixel_id.is_some() && self.access_token.is_some()
    }
}

impl std::fmt::Debug for CapiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapiConfig")
            .field("pixel_id", &self.pixel_id)
            .field("graph_base_url", &self.graph_base_url)
            .field("api_version", &self.api_version)
            .finish_non_exhaustive()
    }
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection URL
    pub database_url: String,
    pub http_port: u16,
    /// Environment: development | staging | production
    pub environment: String,
    /// HS256 secret shared with the identity provider
    pub jwt_secret: String,
    /// Expected `aud` claim, unchecked when unset
    pub jwt_audience: Option<String>,
    pub capi: CapiConfig,
    /// Default courier API base; `courier_settings.base_url` overrides it
    pub courier_base_url: String,
    /// Allowed browser origin; any origin when unset
    pub cors_allowed_origin: Option<String>,
    /// Rate-limit on `X-Forwarded-For` instead of the peer address.
    /// Only safe behind a proxy that overwrites the header.
    pub trust_proxy_headers: bool,
}

impl Config {
    /// Require a secret env var: must be set and non-empty in non-development environments.
    fn require_secret(name: &str, environment: &str) -> Result<String, BoxError> {
        let val = match std::env::var(name) {
            Ok(v) => v,
            Err(_) => {
                if environment != "development" {
                    return Err(format!("{name} must be set in {environment} environment").into());
                }
                format!("dev-{name}-not-for-production")
            }
        };
        if val.is_empty() && environment != "development" {
            return Err(format!("{name} must not be empty in {environment} environment").into());
        }
        Ok(val)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());
        let optional = |name: &str| std::env::var(name).ok().filter(|s| !s.is_empty());

        Ok(Self {
            database_url: std::env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set")?,
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            jwt_secret: Self::require_secret("JWT_SECRET", &environment)?,
            jwt_audience: optional("JWT_AUDIENCE"),
            capi: CapiConfig {
                pixel_id: optional("CAPI_PIXEL_ID"),
                access_token: optional("CAPI_ACCESS_TOKEN"),
                graph_base_url: std::env::var("CAPI_GRAPH_BASE_URL")
                    .unwrap_or_else(|_| "https://graph.facebook.com".into()),
                api_version: std::env::var("CAPI_API_VERSION").unwrap_or_else(|_| "v18.0".into()),
                test_event_code: optional("CAPI_TEST_EVENT_CODE"),
            },
            courier_base_url: std::env::var("COURIER_BASE_URL")
                .unwrap_or_else(|_| "https://portal.packzy.com/api/v1".into()),
            cors_allowed_origin: optional("CORS_ALLOWED_ORIGIN"),
            trust_proxy_headers: optional("TRUST_PROXY_HEADERS")
                .is_some_and(|v| parse_flag(&v)),
            environment,
        })
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("true"));
        assert!(parse_flag(" 1 "));
        assert!(parse_flag("YES"));
        assert!(!parse_flag("false"));
        assert!(!parse_flag("0"));
    }

    #[test]
    fn test_require_secret_dev_fallback() {
        let val = Config::require_secret("STOREFRONT_TEST_UNSET_SECRET", "development").unwrap();
        assert_eq!(val, "dev-STOREFRONT_TEST_UNSET_SECRET-not-for-production");
    }

    #[test]
    fn test_require_secret_mandatory_in_production() {
        let err = Config::require_secret("STOREFRONT_TEST_UNSET_SECRET", "production").unwrap_err();
        assert!(err.to_string().contains("must be set in production"));
    }

    #[test]
    fn test_capi_requires_both_credentials() {
        let mut capi = CapiConfig {
            pixel_id: Some("123".into()),
            access_token: None,
            graph_base_url: "https://graph.facebook.com".into(),
            api_version: "v18.0".into(),
            test_event_code: None,
        };
        assert!(!capi.is_configured());
        capi.access_token = Some("token".into());
        assert!(capi.is_configured());
        assert!(!format!("{capi:?}").contains("token"));
    }
}
