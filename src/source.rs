use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default)]
pub struct SourceFile {
    path: Option<PathBuf>,
    lines: Vec<String>,
    endings: Vec<&'static str>,
}

impl SourceFile {
    pub fn new(content: &str, path: Option<PathBuf>) -> Self {
        let mut lines = Vec::new();
        let mut endings = Vec::new();

        for raw in content.split_inclusive('\n') {
            let (line, ending) = if let Some(line) = raw.strip_suffix("\r\n") {
                (line, "\r\n")
            } else if let Some(line) = raw.strip_suffix('\n') {
                (line, "\n")
            } else {
                (raw, "")
            };
            lines.push(line.to_string());
            endings.push(ending);
        }

        Self {
            path,
            lines,
            endings,
        }
    }

    pub fn read(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;
        Ok(Self::new(&content, Some(path.to_path_buf())))
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Line count must not change
    pub fn set_lines(&mut self, lines: Vec<String>) {
        debug_assert_eq!(lines.len(), self.lines.len());
        self.lines = lines;
    }

    pub fn content(&self) -> String {
        self.lines
            .iter()
            .zip(&self.endings)
            .map(|(line, ending)| format!("{}{}", line, ending))
            .collect()
    }

    pub fn line(&self, number: usize) -> Option<&str> {
        number
            .checked_sub(1)
            .and_then(|i| self.lines.get(i))
            .map(String::as_str)
    }
}
