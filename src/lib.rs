pub mod checker;
pub mod cli;
pub mod config;
pub mod error;
pub mod source;

pub use checker::TermChecker;
pub use config::Config;
pub use error::ConfigError;

use serde::Serialize;

#[derive(Debug, Clone, Default)]
pub struct CheckResult {
    pub offense_count: usize,
    pub fixed_count: usize,
    pub offenses: Vec<Offense>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OffenseKind {
    Line,
    Path,
}

/// `column` and `length` count chars, not bytes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Offense {
    pub line: usize,
    pub column: usize,
    pub length: usize,
    pub key: String,
    pub term: String,
    pub message: String,
    pub kind: OffenseKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CorrectionEdit {
    pub line: usize,
    pub column: usize,
    pub length: usize,
    pub replacement: String,
}
