use crate::{CheckResult, CorrectionEdit, Offense, OffenseKind};
use anyhow::Result;
use colored::*;
use dialoguer::theme::{ColorfulTheme, SimpleTheme, Theme};
use dialoguer::Select;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Debug, Serialize)]
struct JsonOffense<'a> {
    file: String,
    #[serde(flatten)]
    offense: &'a Offense,
}

#[derive(Debug, Serialize)]
struct JsonOutput<'a> {
    files_checked: usize,
    total_offenses: usize,
    total_fixed: usize,
    offenses: Vec<JsonOffense<'a>>,
}

/// User's answer to a proposed correction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Apply,
    Skip,
    Quit,
}

pub fn print_results(
    results: &[(PathBuf, CheckResult)],
    colored_output: bool,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Text => {
            for (file_path, result) in results {
                print_text_offenses(file_path, result, colored_output);
            }
        }
        OutputFormat::Json => println!("{}", render_json(results)?),
    }
    Ok(())
}

fn print_text_offenses(file_path: &Path, result: &CheckResult, colored_output: bool) {
    if result.offenses.is_empty() {
        return;
    }

    let file_name = file_path.display().to_string();

    if colored_output {
        println!("\n{}", file_name.bold().underline());
    } else {
        println!("\n{}", file_name);
    }

    for offense in &result.offenses {
        // Editors expect 1-based columns
        let location = format!("{}:{}", offense.line, offense.column + 1);
        let kind = match offense.kind {
            OffenseKind::Line => "",
            OffenseKind::Path => " (path)",
        };

        if colored_output {
            println!(
                "  {} {}{} {}",
                location.blue().bold(),
                offense.term.red().bold(),
                kind.dimmed(),
                offense.message
            );
        } else {
            println!("  {} {}{} {}", location, offense.term, kind, offense.message);
        }
    }
}

fn render_json(results: &[(PathBuf, CheckResult)]) -> Result<String> {
    let offenses = results
        .iter()
        .flat_map(|(path, result)| {
            result.offenses.iter().map(move |offense| JsonOffense {
                file: path.display().to_string(),
                offense,
            })
        })
        .collect();

    let output = JsonOutput {
        files_checked: results.len(),
        total_offenses: results.iter().map(|(_, r)| r.offense_count).sum(),
        total_fixed: results.iter().map(|(_, r)| r.fixed_count).sum(),
        offenses,
    };

    Ok(serde_json::to_string_pretty(&output)?)
}

fn format_context(context: &str, offense: &Offense, colored: bool) -> String {
    match (colored, split_at_offense(context, offense)) {
        (true, Some((before, term, after))) => {
            format!("{}{}{}", before, term.red().bold(), after)
        }
        _ => context.to_string(),
    }
}

/// Text before, at and after the offense; `column` and `length` are chars.
fn split_at_offense<'a>(
    context: &'a str,
    offense: &Offense,
) -> Option<(&'a str, &'a str, &'a str)> {
    let mut boundaries = context
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(context.len()));
    let start = boundaries.nth(offense.column)?;
    let end = boundaries.nth(offense.length.checked_sub(1)?)?;
    Some((&context[..start], &context[start..end], &context[end..]))
}

pub fn print_check_summary(total_offenses: usize, files_checked: usize, colored: bool) {
    println!();
    let file_word = if files_checked == 1 { "file" } else { "files" };
    if total_offenses == 0 {
        let message = format!("✓ No flagged terms found in {} {}", files_checked, file_word);
        if colored {
            println!("{}", message.green().bold());
        } else {
            println!("{}", message);
        }
    } else {
        let offense_word = if total_offenses == 1 {
            "offense"
        } else {
            "offenses"
        };
        if colored {
            println!(
                "{} {} {} found in {} {}",
                "✗".red().bold(),
                total_offenses.to_string().red().bold(),
                offense_word,
                files_checked,
                file_word
            );
        } else {
            println!(
                "✗ {} {} found in {} {}",
                total_offenses, offense_word, files_checked, file_word
            );
        }
    }
}

pub fn print_fix_summary(total_fixed: usize, files_checked: usize, colored: bool) {
    println!();
    if total_fixed == 0 {
        if colored {
            println!("{}", "No corrections applied.".green().bold());
        } else {
            println!("No corrections applied.");
        }
    } else {
        let fix_word = if total_fixed == 1 {
            "correction"
        } else {
            "corrections"
        };
        let file_word = if files_checked == 1 { "file" } else { "files" };
        if colored {
            println!(
                "{} {} {} applied across {} {}",
                "✓".green().bold(),
                total_fixed.to_string().green().bold(),
                fix_word,
                files_checked,
                file_word
            );
        } else {
            println!(
                "✓ {} {} applied across {} {}",
                total_fixed, fix_word, files_checked, file_word
            );
        }
    }
}

pub fn prompt_correction(
    file_path: &Path,
    offense: &Offense,
    edit: &CorrectionEdit,
    context: &str,
    colored: bool,
) -> Result<Choice> {
    if colored {
        println!(
            "\n{} {}:{}:{}",
            "Flagged term:".yellow().bold(),
            file_path.display(),
            offense.line.to_string().blue(),
            (offense.column + 1).to_string().blue()
        );
    } else {
        println!(
            "\nFlagged term: {}:{}:{}",
            file_path.display(),
            offense.line,
            offense.column + 1
        );
    }
    println!("  {}", format_context(context, offense, colored));

    let theme: Box<dyn Theme> = if colored {
        Box::new(ColorfulTheme::default())
    } else {
        Box::new(SimpleTheme)
    };
    let items = [
        format!("Replace with `{}`", edit.replacement),
        "Skip".to_string(),
        "Quit".to_string(),
    ];

    let selection = Select::with_theme(theme.as_ref())
        .with_prompt(format!("`{}`", offense.term))
        .items(&items)
        .default(0)
        .interact_opt()?;

    Ok(match selection {
        Some(0) => Choice::Apply,
        Some(2) => Choice::Quit,
        _ => Choice::Skip,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result() -> CheckResult {
        let offense = Offense {
            line: 2,
            column: 4,
            length: 9,
            key: "blacklist".to_string(),
            term: "blacklist".to_string(),
            message: "Use of non-inclusive word: `blacklist`.".to_string(),
            kind: OffenseKind::Line,
        };
        CheckResult {
            offense_count: 1,
            fixed_count: 0,
            offenses: vec![offense],
        }
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_json_output_shape() {
        let results = vec![(PathBuf::from("lib/a.rb"), result())];
        let json: serde_json::Value = serde_json::from_str(&render_json(&results).unwrap()).unwrap();

        assert_eq!(json["files_checked"], 1);
        assert_eq!(json["total_offenses"], 1);
        let offense = &json["offenses"][0];
        assert_eq!(offense["file"], "lib/a.rb");
        assert_eq!(offense["line"], 2);
        assert_eq!(offense["column"], 4);
        assert_eq!(offense["kind"], "line");
    }

    #[test]
    fn test_context_split_uses_offense_column() {
        let offense = Offense {
            line: 1,
            column: 28,
            length: 6,
            key: "master".to_string(),
            term: "master".to_string(),
            message: String::new(),
            kind: OffenseKind::Line,
        };
        let context = "puts \"master bill of lading master\"";

        assert_eq!(
            split_at_offense(context, &offense),
            Some(("puts \"master bill of lading ", "master", "\""))
        );
    }

    #[test]
    fn test_context_split_counts_chars() {
        let offense = Offense {
            line: 1,
            column: 2,
            length: 9,
            key: "white_?list".to_string(),
            term: "whitelist".to_string(),
            message: String::new(),
            kind: OffenseKind::Line,
        };

        assert_eq!(
            split_at_offense("é whitelist é", &offense),
            Some(("é ", "whitelist", " é"))
        );
        let stale = Offense { column: 20, ..offense };
        assert_eq!(split_at_offense("é whitelist é", &stale), None);
    }

    #[test]
    fn test_plain_context_is_untouched() {
        let result = result();
        assert_eq!(
            format_context("not blacklist", &result.offenses[0], false),
            "not blacklist"
        );
    }
}
