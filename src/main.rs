use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::{generate, Shell};
use indicatif::{ProgressBar, ProgressStyle};
use log::{warn, LevelFilter};
use rayon::prelude::*;
use std::io;
use std::path::{Path, PathBuf};
use termchk::checker::dictionary::TermDictionary;
use termchk::cli::output::{self, OutputFormat};
use termchk::cli::{discovery, terms};
use termchk::{CheckResult, Config, TermChecker};

#[derive(Parser, Debug)]
#[command(name = "termchk")]
#[command(version, about = "A fast checker for non-inclusive terminology", long_about = None)]
struct Cli {
    /// Files or directories to check
    #[arg(value_name = "PATHS")]
    paths: Vec<PathBuf>,

    /// Fix offenses in place (apply the first suggestion)
    #[arg(short, long)]
    fix: bool,

    /// Confirm each correction interactively
    #[arg(short, long, requires = "fix")]
    interactive: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Exit with code 0 even if offenses are found
    #[arg(long)]
    no_fail: bool,

    /// Flagged terms file (YAML)
    #[arg(short, long, env = "TERMCHK_TERMS")]
    terms: Option<PathBuf>,

    /// Glob of files to skip while walking directories
    #[arg(long)]
    exclude: Vec<String>,

    /// Do not flag terms found in file paths
    #[arg(long)]
    no_path_check: bool,

    /// Output format (text, json)
    #[arg(short = 'o', long, default_value = "text")]
    format: OutputFormat,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Generate shell completion script
    #[arg(long, value_name = "SHELL")]
    completion: Option<Shell>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Parser, Debug)]
enum Commands {
    /// Flagged terms management
    Terms {
        #[command(subcommand)]
        action: TermsCommands,
    },
}

#[derive(Parser, Debug)]
enum TermsCommands {
    /// List the flagged terms in use
    List,
    /// Validate a terms file
    Check {
        /// Terms file (defaults to the configured one)
        path: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();

    // Handle shell completion generation
    if let Some(shell) = cli.completion {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "termchk", &mut io::stdout());
        return Ok(());
    }

    // Load configuration
    let config = Config::load(cli.terms.clone(), cli.exclude.clone(), cli.no_path_check)?;
    let colored = !cli.no_color;

    // Handle subcommands
    if let Some(command) = cli.command {
        return handle_command(command, &config, colored);
    }

    // Validate inputs
    if cli.paths.is_empty() {
        anyhow::bail!("No files specified. Use --help for usage information.");
    }
    if cli.interactive && !console::user_attended() {
        anyhow::bail!("--interactive requires a terminal");
    }

    let checker = TermChecker::new(&config)?;
    if cli.fix && checker.autocorrect_disabled() {
        warn!("Autocorrection is disabled by configuration; offenses are only reported");
    }

    let files = discovery::collect_files(&cli.paths, &config.exclude)?;

    let results: Vec<(PathBuf, CheckResult)> = if cli.interactive {
        files
            .iter()
            .filter_map(|file| keep(file, checker.fix_interactive(file, colored)))
            .collect()
    } else {
        let pb = progress_bar(files.len(), cli.format);
        let results: Vec<_> = files
            .par_iter()
            .filter_map(|file| {
                let result = if cli.fix {
                    checker.fix_auto(file)
                } else {
                    checker.check(file)
                };
                pb.inc(1);
                keep(file, result)
            })
            .collect();
        pb.finish_and_clear();
        results
    };

    output::print_results(&results, colored, cli.format)?;

    let total_offenses: usize = results.iter().map(|(_, r)| r.offense_count).sum();
    let total_fixed: usize = results.iter().map(|(_, r)| r.fixed_count).sum();

    // Print summary
    if cli.format == OutputFormat::Text {
        if cli.fix {
            output::print_fix_summary(total_fixed, results.len(), colored);
        } else {
            output::print_check_summary(total_offenses, results.len(), colored);
        }
    }

    // Exit with appropriate code
    if total_offenses > 0 && !cli.no_fail && !cli.fix {
        std::process::exit(1);
    }

    Ok(())
}

/// Unreadable files (binary content, permissions) are logged and skipped.
fn keep(file: &Path, result: Result<CheckResult>) -> Option<(PathBuf, CheckResult)> {
    match result {
        Ok(result) => Some((file.to_path_buf(), result)),
        Err(err) => {
            warn!("{:#}", err);
            None
        }
    }
}

fn progress_bar(len: usize, format: OutputFormat) -> ProgressBar {
    if len < 2 || format == OutputFormat::Json {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.cyan} [{bar:30.cyan/blue}] {pos}/{len} files")
    {
        pb.set_style(style);
    }
    pb
}

fn handle_command(command: Commands, config: &Config, colored: bool) -> Result<()> {
    match command {
        Commands::Terms { action } => match action {
            TermsCommands::List => {
                let dictionary = TermDictionary::load(config.terms_path.as_deref())?;
                terms::list_terms(&dictionary, colored);
            }
            TermsCommands::Check { path } => {
                let Some(path) = path.or_else(|| config.terms_path.clone()) else {
                    anyhow::bail!("No terms file given and none configured");
                };
                terms::check_terms(&path, colored)?;
            }
        },
    }
    Ok(())
}
