use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const LOCAL_CONFIG_FILE: &str = ".termchk.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub terms_path: Option<PathBuf>,

    #[serde(default)]
    pub disable_autocorrect: bool,

    #[serde(default = "default_check_paths")]
    pub check_paths: bool,

    #[serde(default)]
    pub exclude: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ConfigFile {
    terms_path: Option<PathBuf>,
    disable_autocorrect: Option<bool>,
    check_paths: Option<bool>,
    exclude: Option<Vec<String>>,
}

fn default_check_paths() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            terms_path: None,
            disable_autocorrect: false,
            check_paths: default_check_paths(),
            exclude: vec!["**/.git/**".to_string(), "**/target/**".to_string()],
        }
    }
}

impl Config {
    /// Load configuration with priority: CLI args > local config > global config > defaults
    pub fn load(
        terms_path: Option<PathBuf>,
        cli_exclude: Vec<String>,
        no_path_check: bool,
    ) -> Result<Self> {
        let mut config = Self::default();

        // Load global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                let global_config = Self::from_file(&global_path)?;
                config = config.merge(global_config);
            }
        }

        // Load local config (overrides global)
        let local_path = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_path.exists() {
            let local_config = Self::from_file(&local_path)?;
            config = config.merge(local_config);
        }

        // Apply CLI overrides
        if let Some(path) = terms_path {
            config.terms_path = Some(path);
        }
        if !cli_exclude.is_empty() {
            config.exclude.extend(cli_exclude);
        }
        if no_path_check {
            config.check_paths = false;
        }

        Ok(config)
    }

    pub(crate) fn from_file(path: &Path) -> Result<ConfigFile> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    fn merge(mut self, other: ConfigFile) -> Self {
        // Only keys present in the file override the layer below
        if let Some(terms_path) = other.terms_path {
            self.terms_path = Some(terms_path);
        }
        if let Some(disable_autocorrect) = other.disable_autocorrect {
            self.disable_autocorrect = disable_autocorrect;
        }
        if let Some(check_paths) = other.check_paths {
            self.check_paths = check_paths;
        }
        if let Some(exclude) = other.exclude {
            self.exclude = exclude;
        }
        self
    }

    pub fn global_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "termchk").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    pub fn default_terms_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "termchk")
            .map(|dirs| dirs.config_dir().join("flagged_terms.yml"))
    }
}
