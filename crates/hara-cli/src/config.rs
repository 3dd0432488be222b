use crate::OutputFormat;
use anyhow::{Context, Result};
use glob::{MatchOptions, Pattern};
use regex::Regex;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Where a summary is written
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Stdout,
    File(PathBuf),
}

impl Destination {
    /// `-` selects stdout, anything else is a file path
    pub fn from_path(path: &Path) -> Self {
        if is_dash(path) {
            Destination::Stdout
        } else {
            Destination::File(path.to_path_buf())
        }
    }
}

/// Run configuration, built once from the command line
#[derive(Debug, Clone)]
pub struct Config {
    /// Input files or directories; `-` reads stdin
    pub inputs: Vec<PathBuf>,
    /// Output files or directories; `-` writes stdout
    pub outputs: Vec<PathBuf>,
    /// Folder whose HAR files are all processed
    pub folder: Option<PathBuf>,
    pub csv: bool,
    pub recursive: bool,
    pub quiet: bool,
    /// File name patterns skipped while scanning folders
    pub exclude: Vec<Regex>,
}

impl Config {
    pub fn new(
        inputs: Vec<PathBuf>,
        outputs: Vec<PathBuf>,
        folder: Option<PathBuf>,
        csv: bool,
        recursive: bool,
        quiet: bool,
        exclude: &[String],
    ) -> Result<Self> {
        let exclude = exclude
            .iter()
            .map(|pattern| {
                Regex::new(pattern)
                    .with_context(|| format!("Invalid exclude pattern '{}'", pattern))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            inputs,
            outputs,
            folder,
            csv,
            recursive,
            quiet,
            exclude,
        })
    }

    /// True when the HAR document comes from stdin
    pub fn reads_stdin(&self) -> bool {
        match self.inputs.first() {
            Some(first) => is_dash(first),
            None => self.folder.is_none(),
        }
    }

    /// Print usage instead of blocking on an interactive stdin
    pub fn shows_help(&self, stdin_is_terminal: bool) -> bool {
        stdin_is_terminal && self.folder.is_none() && self.reads_stdin()
    }

    /// CSV when requested on the command line or implied by a `.csv` path
    pub fn format_for(&self, destination: &Destination) -> OutputFormat {
        let csv_path = match destination {
            Destination::File(path) => has_extension(path, "csv"),
            Destination::Stdout => false,
        };

        if self.csv || csv_path {
            OutputFormat::Csv
        } else {
            OutputFormat::Json
        }
    }

    /// Output path used when none is given: the `.har` extension is swapped
    /// for `.json` or `.csv`
    pub fn default_output(&self, input: &Path) -> PathBuf {
        let extension = if self.csv {
            OutputFormat::Csv.extension()
        } else {
            OutputFormat::Json.extension()
        };

        if has_extension(input, "har") {
            return input.with_extension(extension);
        }

        let mut name = input.file_name().unwrap_or_default().to_os_string();
        name.push(".");
        name.push(extension);
        input.with_file_name(name)
    }

    /// HAR file that no exclude pattern matches
    pub fn accepts(&self, file_name: &str) -> bool {
        is_har_file(file_name) && !self.exclude.iter().any(|re| re.is_match(file_name))
    }
}

/// `*.har`, case-insensitive
pub fn is_har_file(file_name: &str) -> bool {
    let options = MatchOptions {
        case_sensitive: false,
        ..MatchOptions::new()
    };

    Pattern::new("*.har")
        .map(|pattern| pattern.matches_with(file_name, options))
        .unwrap_or(false)
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}

fn is_dash(path: &Path) -> bool {
    path.as_os_str() == "-"
}
