//! Error types for instinct operations.
//!
//! Every library function returns [`InstinctResult`]. Errors carry an
//! [`ErrorCode`] for programmatic handling and render as short,
//! actionable messages.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for instinct operations.
pub type InstinctResult<T> = Result<T, InstinctError>;

/// Main error type for all instinct operations.
#[derive(Error, Debug)]
pub enum InstinctError {
    /// Input validation failed.
    #[error("validation error: {message}")]
    Validation {
        message: String,
        code: ErrorCode,
        suggestion: Option<String>,
    },

    /// Instinct not found in any store root.
    #[error("instinct not found: {instinct_id}")]
    NotFound {
        code: ErrorCode,
        instinct_id: String,
    },

    /// A record or import source could not be decoded.
    #[error("parse error{}: {message}", display_path(.path))]
    Parse {
        message: String,
        code: ErrorCode,
        path: Option<PathBuf>,
    },

    /// Export format is not one of the supported encodings.
    #[error("unsupported format: {format} (use yaml or json)")]
    UnsupportedFormat { format: String },

    /// Import source file does not exist.
    #[error("source file not found: {}", .path.display())]
    SourceNotFound { path: PathBuf },

    /// Store read or write failed for a specific path.
    #[error("storage error: {message}")]
    Storage {
        message: String,
        code: ErrorCode,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration error.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML serialization error.
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

fn display_path(path: &Option<PathBuf>) -> String {
    match path {
        Some(p) => format!(" in {}", p.display()),
        None => String::new(),
    }
}

/// Error codes for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Validation (VAL_xxx)
    ValInvalidInput,
    ValInvalidId,
    ValConfidenceRange,
    ValUnsupportedFormat,

    // Instinct (INS_xxx)
    InsNotFound,
    InsSourceMissing,

    // Parse (PARSE_xxx)
    ParseFrontmatter,
    ParseJson,

    // Storage (STO_xxx)
    StoRead,
    StoWrite,

    // Configuration (CFG_xxx)
    CfgInvalid,

    // Internal
    Internal,
}

impl ErrorCode {
    /// Get the string representation of the error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ValInvalidInput => "VAL_001",
            ErrorCode::ValInvalidId => "VAL_002",
            ErrorCode::ValConfidenceRange => "VAL_003",
            ErrorCode::ValUnsupportedFormat => "VAL_004",
            ErrorCode::InsNotFound => "INS_001",
            ErrorCode::InsSourceMissing => "INS_002",
            ErrorCode::ParseFrontmatter => "PARSE_001",
            ErrorCode::ParseJson => "PARSE_002",
            ErrorCode::StoRead => "STO_001",
            ErrorCode::StoWrite => "STO_002",
            ErrorCode::CfgInvalid => "CFG_001",
            ErrorCode::Internal => "INT_001",
        }
    }
}

impl InstinctError {
    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            code: ErrorCode::ValInvalidInput,
            suggestion: None,
        }
    }

    /// Create a validation error for an unsafe or empty instinct ID.
    pub fn invalid_id(id: &str, reason: &str) -> Self {
        Self::Validation {
            message: format!("instinct ID {:?} {}", id, reason),
            code: ErrorCode::ValInvalidId,
            suggestion: Some("Use a plain file-name-safe identifier such as 'prefer-early-return'".to_string()),
        }
    }

    /// Create a validation error for a confidence outside `[0, 1]`.
    pub fn confidence_out_of_range(id: &str, confidence: f64) -> Self {
        Self::Validation {
            message: format!("confidence {} for instinct {:?} is outside [0, 1]", confidence, id),
            code: ErrorCode::ValConfidenceRange,
            suggestion: Some("Clamp the confidence to [0.0, 1.0] before saving".to_string()),
        }
    }

    /// Create a not found error.
    pub fn not_found(instinct_id: impl Into<String>) -> Self {
        Self::NotFound {
            code: ErrorCode::InsNotFound,
            instinct_id: instinct_id.into(),
        }
    }

    /// Create a frontmatter parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            code: ErrorCode::ParseFrontmatter,
            path: None,
        }
    }

    /// Create a JSON parse error.
    pub fn parse_json(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            code: ErrorCode::ParseJson,
            path: None,
        }
    }

    /// Create an unsupported export format error.
    pub fn unsupported_format(format: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            format: format.into(),
        }
    }

    /// Create a storage read error for `path`.
    pub fn read_failed(path: &Path, source: std::io::Error) -> Self {
        Self::Storage {
            message: format!("read {}: {}", path.display(), source),
            code: ErrorCode::StoRead,
            path: path.to_path_buf(),
            source,
        }
    }

    /// Create a storage write error for `path`.
    pub fn write_failed(path: &Path, source: std::io::Error) -> Self {
        Self::Storage {
            message: format!("write {}: {}", path.display(), source),
            code: ErrorCode::StoWrite,
            path: path.to_path_buf(),
            source,
        }
    }

    /// Attach a file path to a parse error. Other variants pass through.
    pub fn at_path(self, at: &Path) -> Self {
        match self {
            Self::Parse { message, code, .. } => Self::Parse {
                message,
                code,
                path: Some(at.to_path_buf()),
            },
            other => other,
        }
    }

    /// Whether this error is the named not-found condition.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Get the error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Validation { code, .. } => *code,
            Self::NotFound { code, .. } => *code,
            Self::Parse { code, .. } => *code,
            Self::Storage { code, .. } => *code,
            Self::UnsupportedFormat { .. } => ErrorCode::ValUnsupportedFormat,
            Self::SourceNotFound { .. } => ErrorCode::InsSourceMissing,
            Self::Configuration(_) => ErrorCode::CfgInvalid,
            Self::Serialization(_) => ErrorCode::ParseJson,
            Self::Yaml(_) => ErrorCode::ParseFrontmatter,
            Self::Io(_) => ErrorCode::Internal,
        }
    }

    /// Get a user-friendly suggestion for resolving this error.
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::Validation { suggestion, .. } => suggestion.as_deref(),
            Self::NotFound { .. } => Some("Check the instinct ID with `instinct status`"),
            Self::SourceNotFound { .. } => Some("Check the path of the file to import"),
            Self::Parse { .. } => Some("Fix the frontmatter block or re-export the file"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let err = InstinctError::validation("bad input");
        assert_eq!(err.code(), ErrorCode::ValInvalidInput);
        assert!(err.to_string().contains("bad input"));
    }

    #[test]
    fn test_not_found_error() {
        let err = InstinctError::not_found("prefer-early-return");
        assert_eq!(err.code(), ErrorCode::InsNotFound);
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "instinct not found: prefer-early-return");
        assert!(err.suggestion().is_some());
    }

    #[test]
    fn test_unsupported_format_message() {
        let err = InstinctError::unsupported_format("xml");
        assert_eq!(err.to_string(), "unsupported format: xml (use yaml or json)");
        assert_eq!(err.code().as_str(), "VAL_004");
    }

    #[test]
    fn test_parse_error_with_path() {
        let err = InstinctError::parse("missing id").at_path(Path::new("/tmp/x.yaml"));
        assert_eq!(err.to_string(), "parse error in /tmp/x.yaml: missing id");

        let bare = InstinctError::parse("missing id");
        assert_eq!(bare.to_string(), "parse error: missing id");
    }

    #[test]
    fn test_source_not_found_message() {
        let err = InstinctError::SourceNotFound {
            path: PathBuf::from("team.yaml"),
        };
        assert_eq!(err.to_string(), "source file not found: team.yaml");
        assert_eq!(err.code(), ErrorCode::InsSourceMissing);
    }
}
