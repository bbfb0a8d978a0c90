use mc_snbt::SnbtError;

/// Error types for the translation pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MtError {
    /// Missing or invalid configuration (credentials, HMAC key, HTTP client)
    ConfigError(String),
    /// Language code that the service cannot accept
    InvalidLocale(String),
    /// The request never got a response (DNS, connect, TLS, timeout)
    NetworkError(String),
    /// The service answered with a non-success status
    TransportError { status: u16, message: String },
    /// A success response that lacks the expected fields
    ResponseSchemaError(String),
    /// Provider-level translation failure
    TranslationError(String),
    /// Reading, parsing or writing an SNBT document failed
    Snbt(SnbtError),
    /// General error with context
    Other(String),
}

impl MtError {
    /// Whether this error must stop the whole pass instead of a single leaf
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            MtError::ConfigError(_) | MtError::InvalidLocale(_) | MtError::ResponseSchemaError(_)
        )
    }
}

impl std::fmt::Display for MtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MtError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            MtError::InvalidLocale(msg) => write!(f, "Invalid locale: {}", msg),
            MtError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            MtError::TransportError { status, message } => {
                write!(f, "Translation request failed ({}): {}", status, message)
            }
            MtError::ResponseSchemaError(msg) => write!(f, "Unexpected response: {}", msg),
            MtError::TranslationError(msg) => write!(f, "Translation error: {}", msg),
            MtError::Snbt(err) => write!(f, "{}", err),
            MtError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for MtError {}

impl From<reqwest::Error> for MtError {
    fn from(err: reqwest::Error) -> Self {
        MtError::NetworkError(err.to_string())
    }
}

impl From<SnbtError> for MtError {
    fn from(err: SnbtError) -> Self {
        MtError::Snbt(err)
    }
}

/// Result type for MT operations
pub type MtResult<T> = Result<T, MtError>;
