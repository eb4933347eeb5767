pub mod allowlist;
pub mod autocorrect;
pub mod dictionary;
pub mod matcher;
pub mod report;
pub mod scope;

use crate::cli::output::{prompt_correction, Choice};
use crate::error::ConfigError;
use crate::source::SourceFile;
use crate::{CheckResult, Config, CorrectionEdit, Offense};
use anyhow::{Context, Result};
use autocorrect::{apply_edits, Autocorrector};
use dictionary::TermDictionary;
use log::debug;
use matcher::Matcher;
use scope::FileScopeFilter;
use std::fs;
use std::path::Path;

pub struct TermChecker {
    dictionary: TermDictionary,
    matcher: Matcher,
    scope: FileScopeFilter,
    corrector: Autocorrector,
    check_paths: bool,
}

impl TermChecker {
    pub fn new(config: &Config) -> Result<Self> {
        let dictionary = TermDictionary::load(config.terms_path.as_deref())
            .context("Failed to load flagged terms")?;
        Ok(Self::with_dictionary(dictionary, config)?)
    }

    pub fn with_dictionary(
        dictionary: TermDictionary,
        config: &Config,
    ) -> std::result::Result<Self, ConfigError> {
        let matcher = Matcher::new(&dictionary)?;

        Ok(Self {
            dictionary,
            matcher,
            scope: FileScopeFilter::new(std::env::current_dir().ok()),
            corrector: Autocorrector::new(config.disable_autocorrect),
            check_paths: config.check_paths,
        })
    }

    pub fn dictionary(&self) -> &TermDictionary {
        &self.dictionary
    }

    pub fn autocorrect_disabled(&self) -> bool {
        self.corrector.is_disabled()
    }

    pub fn scan(&self, source: &SourceFile) -> Vec<Offense> {
        let active = self.scope.active_terms_for(source.path(), &self.matcher);
        let mut offenses = Vec::new();

        for (index, line) in source.lines().iter().enumerate() {
            for found in self.matcher.scan_line(line, &active) {
                let column = line[..found.start].chars().count();
                let length = found.text.chars().count();
                offenses.push(report::report(
                    index + 1,
                    column,
                    length,
                    &found.key,
                    &found.text,
                    &self.dictionary,
                ));
            }
        }

        if self.check_paths {
            if let Some(path) = source.path() {
                if let Some(offense) =
                    self.scope
                        .path_offense(path, &active, &self.matcher, &self.dictionary)
                {
                    offenses.push(offense);
                }
            }
        }

        debug!(
            "{}: {} offenses",
            source
                .path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "<buffer>".to_string()),
            offenses.len()
        );
        offenses
    }

    pub fn scan_str(&self, content: &str) -> Vec<Offense> {
        self.scan(&SourceFile::new(content, None))
    }

    pub fn correction(&self, offense: &Offense) -> Option<CorrectionEdit> {
        self.corrector.edit_for(offense, &self.dictionary)
    }

    pub fn corrections(&self, offenses: &[Offense]) -> Vec<CorrectionEdit> {
        offenses.iter().filter_map(|o| self.correction(o)).collect()
    }

    pub fn check(&self, file_path: &Path) -> Result<CheckResult> {
        let source = SourceFile::read(file_path)?;
        let offenses = self.scan(&source);

        Ok(CheckResult {
            offense_count: offenses.len(),
            fixed_count: 0,
            offenses,
        })
    }

    /// Fix all offenses automatically
    pub fn fix_auto(&self, file_path: &Path) -> Result<CheckResult> {
        let mut source = SourceFile::read(file_path)?;
        let edits = self.corrections(&self.scan(&source));
        self.apply_and_rescan(file_path, &mut source, &edits)
    }

    /// Fix offenses interactively
    pub fn fix_interactive(&self, file_path: &Path, colored: bool) -> Result<CheckResult> {
        let mut source = SourceFile::read(file_path)?;
        let offenses = self.scan(&source);
        let mut accepted = Vec::new();

        for offense in &offenses {
            let Some(edit) = self.correction(offense) else {
                continue;
            };
            let context = source.line(offense.line).unwrap_or_default();
            match prompt_correction(file_path, offense, &edit, context, colored)? {
                Choice::Apply => accepted.push(edit),
                Choice::Skip => {}
                Choice::Quit => break,
            }
        }

        self.apply_and_rescan(file_path, &mut source, &accepted)
    }

    fn apply_and_rescan(
        &self,
        file_path: &Path,
        source: &mut SourceFile,
        edits: &[CorrectionEdit],
    ) -> Result<CheckResult> {
        let (lines, fixed_count) = apply_edits(source.lines(), edits);

        if fixed_count > 0 {
            source.set_lines(lines);
            fs::write(file_path, source.content())
                .with_context(|| format!("Failed to write file: {}", file_path.display()))?;
        }

        let offenses = self.scan(source);
        Ok(CheckResult {
            offense_count: offenses.len(),
            fixed_count,
            offenses,
        })
    }
}
