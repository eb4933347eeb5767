use crate::checker::autocorrect::capitalize;
use crate::checker::dictionary::{case_insensitive, FlaggedTerm};
use crate::error::{ConfigError, Result};
use lazy_static::lazy_static;
use regex::Regex;
use std::ops::Range;

lazy_static! {
    static ref ACRONYM_BOUNDARY: Regex = Regex::new(r"([A-Z\d]+)([A-Z][a-z])").unwrap();
    static ref CAMEL_BOUNDARY: Regex = Regex::new(r"([a-z\d])([A-Z])").unwrap();
}

#[derive(Debug, Clone, Default)]
pub struct AllowList {
    source: Option<String>,
    pattern: Option<Regex>,
}

impl AllowList {
    pub fn compile(term: &FlaggedTerm) -> Result<Self> {
        let variants = variants(&term.allowed);
        if variants.is_empty() {
            return Ok(Self::default());
        }

        let source = variants
            .iter()
            .map(|v| regex::escape(v))
            .collect::<Vec<_>>()
            .join("|");
        let pattern =
            case_insensitive(&source).map_err(|source| ConfigError::InvalidAllowPattern {
                key: term.key.clone(),
                source,
            })?;

        Ok(Self {
            source: Some(source),
            pattern: Some(pattern),
        })
    }

    pub fn global<'a>(lists: impl IntoIterator<Item = &'a AllowList>) -> Result<Self> {
        let parts: Vec<String> = lists
            .into_iter()
            .filter_map(|list| list.source.as_deref())
            .map(|source| format!("(?:{})", source))
            .collect();
        if parts.is_empty() {
            return Ok(Self::default());
        }

        let source = parts.join("|");
        let pattern = case_insensitive(&source).map_err(ConfigError::CombinedPattern)?;
        Ok(Self {
            source: Some(source),
            pattern: Some(pattern),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.pattern.is_none()
    }

    pub fn as_str(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.pattern.as_ref().is_some_and(|p| p.is_match(text))
    }

    pub fn spans(&self, text: &str) -> Vec<Range<usize>> {
        match &self.pattern {
            Some(pattern) => pattern.find_iter(text).map(|m| m.range()).collect(),
            None => Vec::new(),
        }
    }
}

/// Allowed phrases plus snake_case and PascalCase forms, longest first
pub fn variants(phrases: &[String]) -> Vec<String> {
    let snake: Vec<String> = phrases.iter().map(|p| snake_case(p)).collect();
    let pascal: Vec<String> = snake.iter().map(|s| pascal_case(s)).collect();

    let mut all: Vec<String> = Vec::with_capacity(phrases.len() * 3);
    for variant in phrases.iter().chain(&snake).chain(&pascal) {
        if !variant.is_empty() && !all.contains(variant) {
            all.push(variant.clone());
        }
    }
    all.sort_by_key(|v| std::cmp::Reverse(v.len()));
    all
}

/// `Ocean Master-Bill` becomes `ocean_master_bill`.
pub fn snake_case(phrase: &str) -> String {
    let word = phrase.replace(' ', "_");
    let word = ACRONYM_BOUNDARY.replace_all(&word, "${1}_${2}");
    let word = CAMEL_BOUNDARY.replace_all(&word, "${1}_${2}");
    word.replace('-', "_").to_lowercase()
}

pub fn pascal_case(snake: &str) -> String {
    snake.split('_').map(capitalize).collect()
}
