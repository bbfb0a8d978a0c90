//! Credentials and client configuration for the iFlytek translation API

use crate::error::{MtError, MtResult};
use crate::translator::validate_locale;
use std::time::Duration;

/// Endpoint of the iFlytek "ntrans" text translation API
pub const DEFAULT_ENDPOINT: &str = "https://ntrans.xfyun.cn/v2/ots";
/// Host named in the request signature
pub const API_HOST: &str = "ntrans.xfyun.cn";
/// Path named in the request signature's request line
pub const API_PATH: &str = "/v2/ots";

pub const APP_ID_VAR: &str = "APP_ID";
pub const API_SECRET_VAR: &str = "API_SECRET";
pub const API_KEY_VAR: &str = "API_KEY";

/// Application id plus the two secrets issued by the iFlytek console
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub app_id: String,
    /// Shared secret, used as the HMAC key
    pub api_secret: String,
    pub api_key: String,
}

impl Credentials {
    pub fn new(
        app_id: impl Into<String>,
        api_secret: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            app_id: app_id.into(),
            api_secret: api_secret.into(),
            api_key: api_key.into(),
        }
    }

    /// Read `APP_ID`, `API_SECRET` and `API_KEY` from the environment
    pub fn from_env() -> MtResult<Self> {
        let var = |name: &str| {
            std::env::var(name).map_err(|_| {
                MtError::ConfigError(format!("{} environment variable not set", name))
            })
        };

        let credentials = Self::new(var(APP_ID_VAR)?, var(API_SECRET_VAR)?, var(API_KEY_VAR)?);
        credentials.validate()?;
        Ok(credentials)
    }

    /// Every value must be non-empty
    pub fn validate(&self) -> MtResult<()> {
        for (name, value) in [
            ("app id", &self.app_id),
            ("API secret", &self.api_secret),
            ("API key", &self.api_key),
        ] {
            if value.trim().is_empty() {
                return Err(MtError::ConfigError(format!("{} cannot be empty", name)));
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("app_id", &self.app_id)
            .field("api_secret", &"***")
            .field("api_key", &"***")
            .finish()
    }
}

/// Everything an `XunfeiTranslator` needs, validated once at construction
#[derive(Debug, Clone)]
pub struct XunfeiConfig {
    pub credentials: Credentials,
    /// Source language code (iFlytek codes, e.g. `en`)
    pub from: String,
    /// Target language code (iFlytek codes, e.g. `cn`)
    pub to: String,
    pub endpoint: String,
    /// `None` waits until the server responds or the connection fails
    pub timeout: Option<Duration>,
}

impl XunfeiConfig {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            from: "en".to_string(),
            to: "cn".to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: None,
        }
    }

    pub fn with_languages(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.from = from.into();
        self.to = to.into();
        self
    }

    /// Send requests somewhere other than the public endpoint
    ///
    /// The signature still names the public host and path.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn validate(&self) -> MtResult<()> {
        self.credentials.validate()?;
        validate_locale(&self.from)?;
        validate_locale(&self.to)?;
        if self.endpoint.trim().is_empty() {
            return Err(MtError::ConfigError("endpoint cannot be empty".to_string()));
        }
        Ok(())
    }
}
