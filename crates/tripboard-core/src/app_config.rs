use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Service key for the tourism data API. Only commands that reach the
    /// upstream need it.
    pub tour_api_service_key: Option<String>,
    pub tour_api_base_url: String,
    pub mobile_app: String,
    pub request_timeout_secs: u64,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
}

impl AppConfig {
    /// Returns the service key, or a [`crate::ConfigError::MissingEnvVar`]
    /// naming the variable the caller needs to set.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` when `TOUR_API_SERVICE_KEY` is unset.
    pub fn require_service_key(&self) -> Result<&str, crate::ConfigError> {
        self.tour_api_service_key
            .as_deref()
            .ok_or_else(|| crate::ConfigError::MissingEnvVar("TOUR_API_SERVICE_KEY".to_string()))
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field(
                "tour_api_service_key",
                &self.tour_api_service_key.as_ref().map(|_| "[redacted]"),
            )
            .field("tour_api_base_url", &self.tour_api_base_url)
            .field("mobile_app", &self.mobile_app)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_ms", &self.retry_backoff_base_ms)
            .finish()
    }
}
