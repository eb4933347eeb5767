use crate::error::{ConfigError, Result};
use log::debug;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Deserializer};
use serde_yaml::Value;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

const EMBEDDED_TERMS: &str = include_str!("../../flagged_terms.yml");

#[derive(Debug, Clone)]
pub struct FlaggedTerm {
    pub key: String,
    pub suggestions: Vec<String>,
    pub allowed: Vec<String>,
    pub allowed_files: Vec<String>,
    pattern: Regex,
    anchored: Regex,
}

impl FlaggedTerm {
    pub fn new(
        key: impl Into<String>,
        suggestions: Vec<String>,
        allowed: Vec<String>,
        allowed_files: Vec<String>,
    ) -> Result<Self> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(ConfigError::InvalidEntry {
                key,
                message: "term pattern must not be empty".to_string(),
            });
        }

        let pattern = case_insensitive(&key).map_err(|source| ConfigError::InvalidPattern {
            key: key.clone(),
            source,
        })?;
        let anchored = case_insensitive(&format!("^(?:{})$", key)).map_err(|source| {
            ConfigError::InvalidPattern {
                key: key.clone(),
                source,
            }
        })?;

        Ok(Self {
            key,
            suggestions,
            allowed,
            allowed_files,
            pattern,
            anchored,
        })
    }

    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    pub fn matches_whole(&self, text: &str) -> bool {
        self.anchored.is_match(text)
    }

    pub fn first_suggestion(&self) -> Option<&str> {
        self.suggestions.first().map(String::as_str)
    }
}

#[derive(Debug, Clone, Default)]
pub struct TermDictionary {
    terms: Vec<FlaggedTerm>,
    index: HashMap<String, usize>,
}

#[derive(Debug, Default, Deserialize)]
struct TermEntry {
    #[serde(default, deserialize_with = "nullable_list")]
    suggestions: Vec<String>,
    #[serde(default, deserialize_with = "nullable_list")]
    allowed: Vec<String>,
    #[serde(default, deserialize_with = "nullable_list")]
    allowed_files: Vec<String>,
}

/// `suggestions:` with no value parses as null
fn nullable_list<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

impl TermDictionary {
    /// Load terms from the given path, the installed file, or the embedded set
    pub fn load(terms_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = terms_path {
            return Self::from_path(path);
        }

        match crate::config::Config::default_terms_path() {
            Some(path) if path.exists() => Self::from_path(&path),
            _ => {
                debug!("No terms file installed, using embedded flagged terms");
                Self::embedded()
            }
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let dictionary = Self::parse(&content)?;
        debug!(
            "Loaded {} flagged terms from {}",
            dictionary.len(),
            path.display()
        );
        Ok(dictionary)
    }

    pub fn embedded() -> Result<Self> {
        Self::parse(EMBEDDED_TERMS)
    }

    pub fn parse(source: &str) -> Result<Self> {
        let document: Value = serde_yaml::from_str(source)?;
        let root = match document {
            Value::Mapping(root) => root,
            _ => return Err(ConfigError::NotAMapping),
        };

        let entries = match root.get("flagged_terms") {
            Some(Value::Mapping(entries)) => entries,
            _ => return Err(ConfigError::MissingFlaggedTerms),
        };

        let mut terms = Vec::with_capacity(entries.len());
        for (key, value) in entries {
            let key = match key {
                Value::String(key) => key.clone(),
                other => {
                    return Err(ConfigError::InvalidEntry {
                        key: format!("{:?}", other),
                        message: "term keys must be strings".to_string(),
                    })
                }
            };

            let entry = match value {
                Value::Null => TermEntry::default(),
                Value::Mapping(_) => serde_yaml::from_value::<TermEntry>(value.clone())
                    .map_err(|e| ConfigError::InvalidEntry {
                        key: key.clone(),
                        message: e.to_string(),
                    })?,
                _ => {
                    return Err(ConfigError::InvalidEntry {
                        key,
                        message: "expected a mapping of suggestions, allowed and allowed_files"
                            .to_string(),
                    })
                }
            };

            terms.push(FlaggedTerm::new(
                key,
                entry.suggestions,
                entry.allowed,
                entry.allowed_files,
            )?);
        }

        Ok(Self::from_terms(terms))
    }

    pub fn from_terms(terms: Vec<FlaggedTerm>) -> Self {
        let mut index = HashMap::with_capacity(terms.len());
        for (i, term) in terms.iter().enumerate() {
            index.entry(term.key.to_lowercase()).or_insert(i);
        }
        Self { terms, index }
    }

    pub fn lookup(&self, key: &str) -> Option<&FlaggedTerm> {
        self.index
            .get(&key.to_lowercase())
            .map(|&i| &self.terms[i])
    }

    pub fn all_keys(&self) -> Vec<&str> {
        self.terms.iter().map(|t| t.key.as_str()).collect()
    }

    pub fn terms(&self) -> &[FlaggedTerm] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Exact key first, then a whole-text match, then a match anywhere
    pub fn resolve(&self, text: &str) -> Option<&FlaggedTerm> {
        let lowered = text.to_lowercase();
        if let Some(term) = self.lookup(&lowered) {
            return Some(term);
        }

        self.terms
            .iter()
            .find(|t| t.matches_whole(text))
            .or_else(|| self.terms.iter().find(|t| t.pattern.is_match(&lowered)))
    }

    pub fn term_for(&self, key: &str, text: &str) -> Option<&FlaggedTerm> {
        self.lookup(key).or_else(|| self.resolve(text))
    }
}

pub(crate) fn case_insensitive(pattern: &str) -> std::result::Result<Regex, regex::Error> {
    RegexBuilder::new(pattern).case_insensitive(true).build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const TERMS: &str = r#"
flagged_terms:
  master:
    suggestions:
      - primary
      - leader
    allowed:
      - master bill of lading
  black_?list:
    suggestions: [blocklist]
  dummy:
  grandfathered:
    suggestions:
    allowed_files: ["README.md"]
"#;

    #[test]
    fn test_parse_keeps_definition_order() {
        let dict = TermDictionary::parse(TERMS).unwrap();
        assert_eq!(
            dict.all_keys(),
            vec!["master", "black_?list", "dummy", "grandfathered"]
        );
    }

    #[test]
    fn test_absent_and_null_fields_are_empty() {
        let dict = TermDictionary::parse(TERMS).unwrap();

        let dummy = dict.lookup("dummy").unwrap();
        assert!(dummy.suggestions.is_empty());
        assert!(dummy.allowed.is_empty());

        let grandfathered = dict.lookup("grandfathered").unwrap();
        assert!(grandfathered.suggestions.is_empty());
        assert_eq!(grandfathered.allowed_files, vec!["README.md"]);
    }

    #[test]
    fn test_lookup_ignores_case() {
        let dict = TermDictionary::parse(TERMS).unwrap();
        assert_eq!(dict.lookup("MASTER").unwrap().key, "master");
        assert!(dict.lookup("slave").is_none());
    }

    #[test]
    fn test_resolve_by_pattern() {
        let dict = TermDictionary::parse(TERMS).unwrap();
        assert_eq!(dict.resolve("BLACK_LIST").unwrap().key, "black_?list");
        assert_eq!(dict.resolve("Blacklist").unwrap().key, "black_?list");
        assert_eq!(dict.resolve("Master").unwrap().key, "master");
        assert!(dict.resolve("allowlist").is_none());
    }

    #[test]
    fn test_rejects_non_mapping_document() {
        let err = TermDictionary::parse("- master\n- slave\n").unwrap_err();
        assert!(matches!(err, ConfigError::NotAMapping));
    }

    #[test]
    fn test_rejects_missing_flagged_terms() {
        let err = TermDictionary::parse("terms:\n  master: {}\n").unwrap_err();
        assert!(matches!(err, ConfigError::MissingFlaggedTerms));
    }

    #[test]
    fn test_rejects_wrong_field_type() {
        let err = TermDictionary::parse("flagged_terms:\n  master:\n    suggestions: 3\n")
            .unwrap_err();
        match err {
            ConfigError::InvalidEntry { key, .. } => assert_eq!(key, "master"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_invalid_pattern_names_the_key() {
        let err = TermDictionary::parse("flagged_terms:\n  \"black(list\": {}\n").unwrap_err();
        match err {
            ConfigError::InvalidPattern { key, .. } => assert_eq!(key, "black(list"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_from_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("terms.yml");
        fs::write(&path, TERMS).unwrap();

        let dict = TermDictionary::load(Some(&path)).unwrap();
        assert_eq!(dict.len(), 4);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempdir().unwrap();
        let err = TermDictionary::from_path(&dir.path().join("nope.yml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_embedded_terms_load() {
        let dict = TermDictionary::embedded().unwrap();
        assert!(!dict.is_empty());
        assert!(dict.lookup("master").is_some());
    }
}
