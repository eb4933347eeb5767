use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read terms file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse terms file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Terms file must be a YAML mapping")]
    NotAMapping,

    #[error("Terms file has no top-level `flagged_terms` mapping")]
    MissingFlaggedTerms,

    #[error("Invalid entry for flagged term `{key}`: {message}")]
    InvalidEntry { key: String, message: String },

    #[error("Invalid pattern for flagged term `{key}`: {source}")]
    InvalidPattern { key: String, source: regex::Error },

    #[error("Invalid allowed phrases for flagged term `{key}`: {source}")]
    InvalidAllowPattern { key: String, source: regex::Error },

    #[error("Invalid allowed_files glob `{pattern}` for flagged term `{key}`: {source}")]
    InvalidGlob {
        key: String,
        pattern: String,
        source: glob::PatternError,
    },

    #[error("Failed to combine flagged term patterns: {0}")]
    CombinedPattern(regex::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
