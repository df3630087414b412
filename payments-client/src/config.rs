//! Client configuration.

use std::env;
use std::time::Duration;

use payments_auth::DEFAULT_RENEWAL_BUFFER;

use crate::error::ClientError;

/// Which deployment of the API to talk to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Sandbox,
    Live,
    /// Explicit base URIs, e.g. for a local mock server.
    Custom {
        auth_uri: String,
        api_uri: String,
        hpp_uri: String,
    },
}

impl Environment {
    /// Same base URI for every service.
    pub fn custom(uri: impl Into<String>) -> Self {
        let uri = uri.into();
        Environment::Custom {
            auth_uri: uri.clone(),
            api_uri: uri.clone(),
            hpp_uri: uri,
        }
    }

    pub fn auth_uri(&self) -> &str {
        match self {
            Environment::Sandbox => "https://auth.truelayer-sandbox.com",
            Environment::Live => "https://auth.truelayer.com",
            Environment::Custom { auth_uri, .. } => auth_uri.trim_end_matches('/'),
        }
    }

    pub fn api_uri(&self) -> &str {
        match self {
            Environment::Sandbox => "https://api.truelayer-sandbox.com",
            Environment::Live => "https://api.truelayer.com",
            Environment::Custom { api_uri, .. } => api_uri.trim_end_matches('/'),
        }
    }

    /// Base URI of the hosted payment page.
    pub fn hpp_uri(&self) -> &str {
        match self {
            Environment::Sandbox => "https://payment.truelayer-sandbox.com",
            Environment::Live => "https://payment.truelayer.com",
            Environment::Custom { hpp_uri, .. } => hpp_uri.trim_end_matches('/'),
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sandbox" => Ok(Environment::Sandbox),
            "live" | "production" => Ok(Environment::Live),
            _ => Err(format!("Unknown environment: {}. Supported: sandbox, live", s)),
        }
    }
}

/// Where access tokens are cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TokenCacheMode {
    /// Every call requests a fresh token.
    None,
    #[default]
    InMemory,
}

impl std::str::FromStr for TokenCacheMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" | "off" => Ok(TokenCacheMode::None),
            "memory" | "in_memory" | "in-memory" => Ok(TokenCacheMode::InMemory),
            _ => Err(format!("Unknown token cache: {}. Supported: memory, none", s)),
        }
    }
}

/// Client configuration.
#[derive(Clone)]
pub struct ClientOptions {
    pub client_id: String,
    pub client_secret: String,
    pub environment: Environment,
    pub token_cache: TokenCacheMode,
    pub token_renewal_buffer: Duration,
    /// Per-request timeout. `None` leaves it to the transport.
    pub timeout: Option<Duration>,
}

impl std::fmt::Debug for ClientOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientOptions")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("environment", &self.environment)
            .field("token_cache", &self.token_cache)
            .field("token_renewal_buffer", &self.token_renewal_buffer)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ClientOptions {
    /// Sandbox options with in-memory token caching.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            environment: Environment::Sandbox,
            token_cache: TokenCacheMode::default(),
            token_renewal_buffer: DEFAULT_RENEWAL_BUFFER,
            timeout: None,
        }
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    pub fn with_token_cache(mut self, mode: TokenCacheMode) -> Self {
        self.token_cache = mode;
        self
    }

    pub fn with_token_renewal_buffer(mut self, buffer: Duration) -> Self {
        self.token_renewal_buffer = buffer;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Loads options from `PAYMENTS_*` environment variables.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Loads options through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ClientError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| ClientError::Config(format!("{} environment variable is required", name)))
        };

        let mut options = Self::new(
            required("PAYMENTS_CLIENT_ID")?,
            required("PAYMENTS_CLIENT_SECRET")?,
        );

        if let Some(environment) = lookup("PAYMENTS_ENVIRONMENT") {
            options.environment = environment.parse().map_err(ClientError::Config)?;
        }
        if let Some(mode) = lookup("PAYMENTS_TOKEN_CACHE") {
            options.token_cache = mode.parse().map_err(ClientError::Config)?;
        }
        if let Some(secs) = lookup("PAYMENTS_TOKEN_RENEWAL_BUFFER_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                ClientError::Config(format!(
                    "PAYMENTS_TOKEN_RENEWAL_BUFFER_SECS must be a number of seconds, got {}",
                    secs
                ))
            })?;
            options.token_renewal_buffer = Duration::from_secs(secs);
        }

        Ok(options)
    }
}
