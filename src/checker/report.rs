use crate::checker::dictionary::{FlaggedTerm, TermDictionary};
use crate::{Offense, OffenseKind};

/// Build the offense for `term`, matched by the pattern `key`.
pub fn report(
    line: usize,
    column: usize,
    length: usize,
    key: &str,
    term: &str,
    dictionary: &TermDictionary,
) -> Offense {
    Offense {
        line,
        column,
        length,
        key: key.to_string(),
        term: term.to_string(),
        message: describe(term, dictionary.term_for(key, term)),
        kind: OffenseKind::Line,
    }
}

/// A file path offense points at the first character of the file.
pub fn path_offense(key: &str, term: &str, dictionary: &TermDictionary) -> Offense {
    Offense {
        kind: OffenseKind::Path,
        ..report(1, 0, 1, key, term, dictionary)
    }
}

pub fn message(term: &str, dictionary: &TermDictionary) -> String {
    describe(term, dictionary.resolve(term))
}

fn describe(term: &str, flagged: Option<&FlaggedTerm>) -> String {
    let suggestions = flagged
        .map(|t| t.suggestions.join(", "))
        .unwrap_or_default();

    if suggestions.is_empty() {
        format!("Use of non-inclusive word: `{}`.", term)
    } else {
        format!(
            "Use of non-inclusive word: `{}`. Consider using these suggested alternatives: `{}`.",
            term, suggestions
        )
    }
}
