use crate::checker::allowlist::AllowList;
use crate::checker::dictionary::{case_insensitive, FlaggedTerm, TermDictionary};
use crate::checker::scope::AllowedFiles;
use crate::error::{ConfigError, Result};
use regex::Regex;
use std::borrow::Cow;
use std::ops::Range;

// Single byte, so masked offsets equal original offsets
const MASK_CHAR: char = '*';

#[derive(Debug, Clone)]
pub struct CompiledTerm {
    pub key: String,
    pattern: Regex,
    allow: AllowList,
    pub(crate) allowed_files: AllowedFiles,
}

impl CompiledTerm {
    fn compile(term: &FlaggedTerm) -> Result<Self> {
        Ok(Self {
            key: term.key.clone(),
            pattern: term.pattern().clone(),
            allow: AllowList::compile(term)?,
            allowed_files: AllowedFiles::compile(term)?,
        })
    }

    pub fn allow_list(&self) -> &AllowList {
        &self.allow
    }

    fn find(&self, line: &str) -> Vec<Range<usize>> {
        let allowed = self.allow.spans(line);
        let masked = mask(line, &allowed);

        self.pattern
            .find_iter(&masked)
            .map(|m| m.range())
            .filter(|r| !r.is_empty())
            .filter(|r| !allowed.iter().any(|a| overlaps(a, r)))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermMatch {
    pub key: String,
    pub start: usize,
    pub end: usize,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct Matcher {
    terms: Vec<CompiledTerm>,
    combined: Option<Regex>,
    global_allow: AllowList,
}

impl Matcher {
    pub fn new(dictionary: &TermDictionary) -> Result<Self> {
        let terms = dictionary
            .terms()
            .iter()
            .map(CompiledTerm::compile)
            .collect::<Result<Vec<_>>>()?;

        let combined = if terms.is_empty() {
            None
        } else {
            let source = terms
                .iter()
                .map(|t| format!("(?:{})", t.key))
                .collect::<Vec<_>>()
                .join("|");
            Some(case_insensitive(&source).map_err(ConfigError::CombinedPattern)?)
        };

        let global_allow = AllowList::global(terms.iter().map(|t| &t.allow))?;

        Ok(Self {
            terms,
            combined,
            global_allow,
        })
    }

    pub fn terms(&self) -> &[CompiledTerm] {
        &self.terms
    }

    pub fn global_allow(&self) -> &AllowList {
        &self.global_allow
    }

    pub fn has_candidate(&self, text: &str) -> bool {
        self.combined.as_ref().is_some_and(|c| c.is_match(text))
    }

    /// Find flagged terms in a line, term by term in dictionary order
    pub fn scan_line(&self, line: &str, active: &[&CompiledTerm]) -> Vec<TermMatch> {
        if !self.has_candidate(line) {
            return Vec::new();
        }

        let mut matches = Vec::new();
        for term in active {
            for range in term.find(line) {
                matches.push(TermMatch {
                    key: term.key.clone(),
                    start: range.start,
                    end: range.end,
                    text: line[range].to_string(),
                });
            }
        }
        matches
    }

    pub fn scan_path(&self, path: &str, active: &[&CompiledTerm]) -> Option<TermMatch> {
        if self.global_allow.is_match(path) {
            return None;
        }

        let mut best: Option<TermMatch> = None;
        for term in active {
            if let Some(m) = term.pattern.find(path) {
                if m.is_empty() {
                    continue;
                }
                if best.as_ref().map_or(true, |b| m.start() < b.start) {
                    best = Some(TermMatch {
                        key: term.key.clone(),
                        start: m.start(),
                        end: m.end(),
                        text: m.as_str().to_string(),
                    });
                }
            }
        }
        best
    }
}

fn mask<'a>(line: &'a str, spans: &[Range<usize>]) -> Cow<'a, str> {
    if spans.is_empty() {
        return Cow::Borrowed(line);
    }

    let mut masked = String::with_capacity(line.len());
    let mut cursor = 0;
    for span in spans {
        masked.push_str(&line[cursor..span.start]);
        masked.extend(std::iter::repeat(MASK_CHAR).take(span.len()));
        cursor = span.end;
    }
    masked.push_str(&line[cursor..]);
    Cow::Owned(masked)
}

fn overlaps(a: &Range<usize>, b: &Range<usize>) -> bool {
    a.start < b.end && b.start < a.end
}
