use serde::Deserialize;
use ustr::Ustr;

/// Build-time override, the same variable the runtime override reads.
const BUILD_API_LINK: Option<&str> = option_env!("BILLING_API_LINK");

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read configuration from environment: {0}")]
    Env(#[from] serde_env::Error),
    #[error("BILLING_API_LINK must be an http(s) URL, got {0:?}")]
    InvalidBaseUrl(String),
}

#[derive(Debug, Default, Deserialize)]
pub struct RawConfig {
    pub billing_api_link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessConfig {
    /// Backend root; resource paths are appended directly (`{base}/customers`).
    ///
    /// Empty means same-origin, which is what the web build uses by default.
    pub api_base_url: String,
}

impl BusinessConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Default config overridden by `BILLING_API_LINK` from the process environment.
    ///
    /// On native a `.env` file in the working directory is loaded first.
    pub fn from_env() -> Result<Self, ConfigError> {
        #[cfg(not(target_arch = "wasm32"))]
        if let Ok(path) = dotenvy::dotenv() {
            log::debug!("loaded environment from {}", path.display());
        }

        let raw: RawConfig = serde_env::from_iter(std::env::vars())?;
        Self::from_raw(raw)
    }

    pub fn from_raw(raw: RawConfig) -> Result<Self, ConfigError> {
        match raw.billing_api_link {
            None => Ok(Self::default()),
            Some(link) if link.trim().is_empty() => Ok(Self::default()),
            Some(link) => {
                let link = link.trim();
                if !(link.starts_with("http://") || link.starts_with("https://")) {
                    return Err(ConfigError::InvalidBaseUrl(link.to_string()));
                }
                Ok(Self::new(link))
            }
        }
    }

    /// Absolute URL of a collection or member path such as `/plans/4`.
    pub fn url(&self, path: &str) -> Ustr {
        Ustr::from(&format!("{}{}", self.api_base_url, path))
    }
}

impl Default for BusinessConfig {
    fn default() -> Self {
        let base = match BUILD_API_LINK {
            Some(link) => link,
            None if cfg!(target_arch = "wasm32") => "",
            None => "http://localhost:3000",
        };
        Self::new(base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_env::from_iter;

    #[test]
    fn default_base_url() {
        let config = BusinessConfig::default();

        if let Some(link) = BUILD_API_LINK {
            assert_eq!(config.api_base_url, link.trim_end_matches('/'));
        } else if cfg!(target_arch = "wasm32") {
            assert_eq!(config.api_base_url, "");
            assert_eq!(config.url("/plans"), Ustr::from("/plans"));
        } else {
            assert_eq!(config.api_base_url, "http://localhost:3000");
            assert_eq!(
                config.url("/plans"),
                Ustr::from("http://localhost:3000/plans")
            );
        }
    }

    #[test]
    fn env_overrides_default() {
        let raw: RawConfig = from_iter(vec![("BILLING_API_LINK", "https://billing.example.com/")])
            .expect("RawConfig should deserialize");

        let config = BusinessConfig::from_raw(raw).expect("config should build");
        assert_eq!(config.api_base_url, "https://billing.example.com");
        assert_eq!(
            config.url("/customers/3"),
            Ustr::from("https://billing.example.com/customers/3")
        );
    }

    #[test]
    fn blank_link_falls_back_to_default() {
        let raw: RawConfig =
            from_iter(vec![("BILLING_API_LINK", "  ")]).expect("RawConfig should deserialize");
        assert_eq!(
            BusinessConfig::from_raw(raw).expect("config should build"),
            BusinessConfig::default()
        );
    }

    #[test]
    fn unrelated_variables_are_ignored() {
        let raw: RawConfig =
            from_iter(vec![("HOME", "/root"), ("RUST_LOG", "debug")]).expect("deserialize");
        assert!(raw.billing_api_link.is_none());
    }

    #[test]
    fn rejects_non_http_link() {
        let raw: RawConfig =
            from_iter(vec![("BILLING_API_LINK", "ftp://files")]).expect("deserialize");
        let err = BusinessConfig::from_raw(raw).unwrap_err();
        assert!(err.to_string().contains("BILLING_API_LINK"));
    }
}
