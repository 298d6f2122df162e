use billing_business::BusinessConfig;

/// Application-wide state shared by every page.
#[derive(Debug, Clone, Default)]
pub struct State {
    pub config: BusinessConfig,
}

impl State {
    /// Config from the environment, falling back to the build default.
    pub fn from_env() -> Self {
        let config = BusinessConfig::from_env().unwrap_or_else(|err| {
            log::warn!("{err}; using {:?}", BusinessConfig::default().api_base_url);
            BusinessConfig::default()
        });
        Self { config }
    }

    pub fn test(base_url: String) -> Self {
        Self {
            config: BusinessConfig::new(base_url),
        }
    }
}
