use crate::checker::dictionary::TermDictionary;
use crate::checker::matcher::Matcher;
use anyhow::{Context, Result};
use colored::*;
use std::path::Path;

pub fn list_terms(dictionary: &TermDictionary, colored: bool) {
    if dictionary.is_empty() {
        if colored {
            println!("{}", "No flagged terms configured.".yellow());
        } else {
            println!("No flagged terms configured.");
        }
        return;
    }

    for term in dictionary.terms() {
        if colored {
            println!("{}", term.key.cyan().bold());
        } else {
            println!("{}", term.key);
        }
        print_field("suggestions", &term.suggestions, colored);
        print_field("allowed", &term.allowed, colored);
        print_field("allowed files", &term.allowed_files, colored);
    }

    println!();
    println!("{} flagged terms", dictionary.len());
}

fn print_field(name: &str, values: &[String], colored: bool) {
    if values.is_empty() {
        return;
    }
    let joined = values.join(", ");
    if colored {
        println!("  {}: {}", name.dimmed(), joined.green());
    } else {
        println!("  {}: {}", name, joined);
    }
}

/// Load and compile a terms file, reporting the first problem found.
pub fn check_terms(path: &Path, colored: bool) -> Result<()> {
    let dictionary = TermDictionary::from_path(path)
        .with_context(|| format!("Invalid terms file: {}", path.display()))?;
    Matcher::new(&dictionary)
        .with_context(|| format!("Invalid terms file: {}", path.display()))?;

    if colored {
        println!(
            "{} {} ({} flagged terms)",
            "✓".green().bold(),
            path.display().to_string().cyan(),
            dictionary.len()
        );
    } else {
        println!("✓ {} ({} flagged terms)", path.display(), dictionary.len());
    }
    Ok(())
}
