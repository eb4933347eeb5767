use crate::checker::dictionary::{FlaggedTerm, TermDictionary};
use crate::checker::matcher::{CompiledTerm, Matcher};
use crate::checker::report;
use crate::error::{ConfigError, Result};
use crate::Offense;
use glob::{MatchOptions, Pattern};
use std::path::{Path, PathBuf};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

#[derive(Debug, Clone, Default)]
pub struct AllowedFiles {
    patterns: Vec<Pattern>,
}

impl AllowedFiles {
    pub fn compile(term: &FlaggedTerm) -> Result<Self> {
        let patterns = term
            .allowed_files
            .iter()
            .map(|raw| {
                Pattern::new(raw).map_err(|source| ConfigError::InvalidGlob {
                    key: term.key.clone(),
                    pattern: raw.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    fn matches(&self, path: &Path) -> bool {
        self.patterns
            .iter()
            .any(|p| p.matches_path_with(path, MATCH_OPTIONS))
    }
}

#[derive(Debug, Clone, Default)]
pub struct FileScopeFilter {
    base_dir: Option<PathBuf>,
}

impl FileScopeFilter {
    pub fn new(base_dir: Option<PathBuf>) -> Self {
        Self { base_dir }
    }

    pub fn active_terms_for<'m>(
        &self,
        path: Option<&Path>,
        matcher: &'m Matcher,
    ) -> Vec<&'m CompiledTerm> {
        let Some(path) = path else {
            return matcher.terms().iter().collect();
        };

        let candidates = self.candidates(path);
        matcher
            .terms()
            .iter()
            .filter(|term| {
                term.allowed_files.is_empty()
                    || !candidates.iter().any(|c| term.allowed_files.matches(c))
            })
            .collect()
    }

    pub fn path_offense(
        &self,
        path: &Path,
        active: &[&CompiledTerm],
        matcher: &Matcher,
        dictionary: &TermDictionary,
    ) -> Option<Offense> {
        let path = path.to_string_lossy();
        let found = matcher.scan_path(&path, active)?;
        Some(report::path_offense(&found.key, &found.text, dictionary))
    }

    fn candidates<'p>(&self, path: &'p Path) -> Vec<&'p Path> {
        let mut candidates = vec![path];
        if let Ok(stripped) = path.strip_prefix(".") {
            candidates.push(stripped);
        }
        if let Some(base) = &self.base_dir {
            if let Ok(relative) = path.strip_prefix(base) {
                candidates.push(relative);
            }
        }
        candidates
    }
}
