use crate::checker::dictionary::{FlaggedTerm, TermDictionary};
use crate::{CorrectionEdit, Offense, OffenseKind};
use log::warn;
use std::collections::BTreeMap;
use std::ops::Range;

/// Get the first suggestion, cased like `matched` (UPPER, Capitalized, or as written)
pub fn correct(matched: &str, dictionary: &TermDictionary) -> Option<String> {
    correct_with(matched, dictionary.resolve(matched)?)
}

pub fn correct_with(matched: &str, term: &FlaggedTerm) -> Option<String> {
    let suggestion = term.first_suggestion()?;

    let corrected = if matched == matched.to_uppercase() {
        suggestion.to_uppercase()
    } else if matched == capitalize(matched) {
        capitalize(suggestion)
    } else {
        suggestion.to_string()
    };
    Some(corrected)
}

pub(crate) fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Autocorrector {
    disabled: bool,
}

impl Autocorrector {
    pub fn new(disabled: bool) -> Self {
        Self { disabled }
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn edit_for(&self, offense: &Offense, dictionary: &TermDictionary) -> Option<CorrectionEdit> {
        if self.disabled || offense.kind == OffenseKind::Path {
            return None;
        }

        let term = dictionary.term_for(&offense.key, &offense.term)?;
        correct_with(&offense.term, term).map(|replacement| CorrectionEdit {
            line: offense.line,
            column: offense.column,
            length: offense.length,
            replacement,
        })
    }
}

/// Apply edits right to left per line, skipping overlapping or stale ones
pub fn apply_edits(lines: &[String], edits: &[CorrectionEdit]) -> (Vec<String>, usize) {
    let mut by_line: BTreeMap<usize, Vec<&CorrectionEdit>> = BTreeMap::new();
    for edit in edits {
        by_line.entry(edit.line).or_default().push(edit);
    }

    let mut output = lines.to_vec();
    let mut applied = 0;

    for (line_number, line_edits) in by_line {
        let Some(line) = line_number
            .checked_sub(1)
            .and_then(|i| output.get_mut(i))
        else {
            warn!("Skipping correction for missing line {}", line_number);
            continue;
        };

        let mut accepted: Vec<(Range<usize>, &str)> = Vec::new();
        for edit in line_edits {
            let Some(span) = byte_span(line, edit.column, edit.length) else {
                warn!(
                    "Skipping correction outside line {} at column {}",
                    edit.line, edit.column
                );
                continue;
            };
            if accepted
                .iter()
                .any(|(taken, _)| taken.start < span.end && span.start < taken.end)
            {
                warn!(
                    "Skipping overlapping correction at {}:{}",
                    edit.line, edit.column
                );
                continue;
            }
            accepted.push((span, edit.replacement.as_str()));
        }

        accepted.sort_by_key(|(span, _)| std::cmp::Reverse(span.start));
        for (span, replacement) in accepted {
            line.replace_range(span, replacement);
            applied += 1;
        }
    }

    (output, applied)
}

fn byte_span(line: &str, column: usize, length: usize) -> Option<Range<usize>> {
    let mut boundaries = line
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(line.len()));
    let start = boundaries.nth(column)?;
    let end = if length == 0 {
        start
    } else {
        boundaries.nth(length - 1)?
    };
    Some(start..end)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dictionary() -> TermDictionary {
        TermDictionary::parse(
            r#"
flagged_terms:
  black_?list:
    suggestions: [blocklist]
  white_?list:
    suggestions: [allowlist]
  master:
    suggestions: [primary_node]
  dummy: {}
"#,
        )
        .unwrap()
    }

    fn offense(line: usize, column: usize, key: &str, term: &str) -> Offense {
        Offense {
            line,
            column,
            length: term.chars().count(),
            key: key.to_string(),
            term: term.to_string(),
            message: String::new(),
            kind: OffenseKind::Line,
        }
    }

    #[test]
    fn test_case_buckets() {
        let dict = dictionary();
        assert_eq!(correct("BLACKLIST", &dict).as_deref(), Some("BLOCKLIST"));
        assert_eq!(correct("Blacklist", &dict).as_deref(), Some("Blocklist"));
        assert_eq!(correct("blacklist", &dict).as_deref(), Some("blocklist"));
        assert_eq!(correct("BLACK_LIST", &dict).as_deref(), Some("BLOCKLIST"));
    }

    #[test]
    fn test_mixed_case_uses_suggestion_as_written() {
        let dict = dictionary();
        assert_eq!(correct("BlackList", &dict).as_deref(), Some("blocklist"));
        assert_eq!(correct("mAsTeR", &dict).as_deref(), Some("primary_node"));
        assert_eq!(correct("Master", &dict).as_deref(), Some("Primary_node"));
    }

    #[test]
    fn test_no_suggestion_or_unknown_term() {
        let dict = dictionary();
        assert_eq!(correct("dummy", &dict), None);
        assert_eq!(correct("inclusive", &dict), None);
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("blocklist"), "Blocklist");
        assert_eq!(capitalize("BLOCKLIST"), "Blocklist");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_disabled_corrector_yields_nothing() {
        let dict = dictionary();
        let offense = offense(1, 0, "black_?list", "blacklist");
        assert!(Autocorrector::new(false).edit_for(&offense, &dict).is_some());
        assert!(Autocorrector::new(true).edit_for(&offense, &dict).is_none());
    }

    #[test]
    fn test_path_offense_is_never_corrected() {
        let dict = dictionary();
        let offense = Offense {
            kind: OffenseKind::Path,
            ..offense(1, 0, "black_?list", "blacklist")
        };
        assert!(Autocorrector::default().edit_for(&offense, &dict).is_none());
    }

    #[test]
    fn test_edit_uses_the_matching_term() {
        let dict = TermDictionary::parse(
            r#"
flagged_terms:
  'web\w*':
    suggestions: [site]
  '\w*master':
    suggestions: [leader]
"#,
        )
        .unwrap();
        let corrector = Autocorrector::default();

        let by_master = corrector
            .edit_for(&offense(1, 0, r"\w*master", "webmaster"), &dict)
            .unwrap();
        assert_eq!(by_master.replacement, "leader");

        let by_web = corrector
            .edit_for(&offense(1, 0, r"web\w*", "webmaster"), &dict)
            .unwrap();
        assert_eq!(by_web.replacement, "site");
    }

    #[test]
    fn test_apply_edits_right_to_left() {
        let dict = dictionary();
        let lines = vec![
            "BLACK_LIST_CODES = [\"AF\"]".to_string(),
            "BLACK_LIST_COUNTRIES = \"blacklist_countries\"".to_string(),
        ];
        let corrector = Autocorrector::default();
        let edits: Vec<CorrectionEdit> = [
            offense(1, 0, "black_?list", "BLACK_LIST"),
            offense(2, 0, "black_?list", "BLACK_LIST"),
            offense(2, 24, "black_?list", "blacklist"),
        ]
        .iter()
        .filter_map(|o| corrector.edit_for(o, &dict))
        .collect();

        let (fixed, applied) = apply_edits(&lines, &edits);
        assert_eq!(applied, 3);
        assert_eq!(fixed[0], "BLOCKLIST_CODES = [\"AF\"]");
        assert_eq!(fixed[1], "BLOCKLIST_COUNTRIES = \"blocklist_countries\"");
    }

    #[test]
    fn test_overlapping_edit_is_skipped() {
        let lines = vec!["the mastermind".to_string()];
        let edits = vec![
            CorrectionEdit {
                line: 1,
                column: 4,
                length: 6,
                replacement: "primary".to_string(),
            },
            CorrectionEdit {
                line: 1,
                column: 4,
                length: 10,
                replacement: "genius".to_string(),
            },
        ];
        let (fixed, applied) = apply_edits(&lines, &edits);
        assert_eq!(applied, 1);
        assert_eq!(fixed[0], "the primarymind");
    }

    #[test]
    fn test_stale_edits_are_ignored() {
        let lines = vec!["short".to_string()];
        let edits = vec![
            CorrectionEdit {
                line: 1,
                column: 3,
                length: 9,
                replacement: "x".to_string(),
            },
            CorrectionEdit {
                line: 4,
                column: 0,
                length: 1,
                replacement: "x".to_string(),
            },
        ];
        let (fixed, applied) = apply_edits(&lines, &edits);
        assert_eq!(applied, 0);
        assert_eq!(fixed, lines);
    }

    #[test]
    fn test_char_columns_with_multibyte_text() {
        let lines = vec!["é — whitelist".to_string()];
        let edits = vec![CorrectionEdit {
            line: 1,
            column: 4,
            length: 9,
            replacement: "allowlist".to_string(),
        }];
        let (fixed, applied) = apply_edits(&lines, &edits);
        assert_eq!(applied, 1);
        assert_eq!(fixed[0], "é — allowlist");
    }
}
