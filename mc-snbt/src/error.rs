/// Error types for SNBT parsing and file handling
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnbtError {
    /// Malformed SNBT text, with a 1-based position
    Parse {
        line: usize,
        column: usize,
        message: String,
    },
    /// Filesystem error while reading or writing a document
    Io(String),
}

impl std::fmt::Display for SnbtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SnbtError::Parse {
                line,
                column,
                message,
            } => write!(f, "SNBT parse error at {}:{}: {}", line, column, message),
            SnbtError::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for SnbtError {}

/// Result type for SNBT operations
pub type SnbtResult<T> = Result<T, SnbtError>;
