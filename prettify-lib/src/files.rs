//! Reading, writing and finding the files to prettify.

use crate::config::PrettifyConfig;
use crate::error::{PrettifyError, Result};
use crate::prettify::{html_prettify, prettify};
use chrono::{DateTime, TimeZone};
use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Already minified output of other tools; never touched.
const MINIFIED_SUFFIX: &str = ".min.css";

/// What a file is, judging by its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// `.css` or `.scss`
    Stylesheet,
    /// `.htm` or `.html`
    Markup,
}

impl SourceKind {
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "css" | "scss" => Some(SourceKind::Stylesheet),
            "htm" | "html" => Some(SourceKind::Markup),
            _ => None,
        }
    }
}

/// Everything a run needs besides the target path.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub config: PrettifyConfig,
    /// Prepended to output file names; without it files are rewritten in place.
    pub prefix: Option<String>,
    /// Start stylesheet output with a `/* <time> */ ` comment.
    pub timestamp: bool,
    /// Spaces per nesting level in HTML output.
    pub indent_width: usize,
}

impl Default for RunOptions {
    fn default() -> Self {
        RunOptions {
            config: PrettifyConfig::default(),
            prefix: None,
            timestamp: false,
            indent_width: 4,
        }
    }
}

/// Reads a file as UTF-8, skipping a byte-order mark.
pub fn read_source(path: &Path) -> Result<String> {
    let mut bytes = fs::read(path).map_err(|err| PrettifyError::from_io(path, err))?;
    if bytes.starts_with(UTF8_BOM) {
        bytes.drain(..UTF8_BOM.len());
    }
    String::from_utf8(bytes).map_err(|source| PrettifyError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

pub fn write_output(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).map_err(|err| PrettifyError::from_io(path, err))
}

/// Output path for `path`: same folder, `prefix` put in front of the file
/// stem, extension lowercased. Only the file name is rewritten, never the
/// folders leading to it.
pub fn output_path(path: &Path, prefix: Option<&str>) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut file_name = format!("{}{}", prefix.unwrap_or_default(), stem);
    if let Some(extension) = path.extension() {
        file_name.push('.');
        file_name.push_str(&extension.to_string_lossy().to_lowercase());
    }
    match path.parent() {
        Some(parent) => parent.join(file_name),
        None => PathBuf::from(file_name),
    }
}

/// Every stylesheet and markup file under `dir`, sorted by path.
///
/// Hidden files and `.min.css` files are skipped.
pub fn collect_targets(dir: &Path) -> Result<Vec<PathBuf>> {
    log::debug!("Recursively scanning {}", dir.display());
    let mut targets = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(source) if source.depth() == 0 => {
                return Err(PrettifyError::Walk {
                    path: dir.to_path_buf(),
                    source,
                })
            }
            Err(err) => {
                log::warn!("Skipping unreadable entry: {}", err);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if name.starts_with('.') || name.ends_with(MINIFIED_SUFFIX) {
            continue;
        }
        if SourceKind::from_path(entry.path()).is_some() {
            targets.push(entry.into_path());
        }
    }
    Ok(targets)
}

/// `/* 2026-10-16t09:30:00 */ ` for the given moment.
pub fn timestamp_comment<Tz>(now: DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let stamp = now.format("%Y-%m-%dT%H:%M:%S").to_string().to_lowercase();
    format!("/* {} */ ", stamp)
}

/// Prettifies one file and writes the result next to it. Returns the path
/// written to.
pub fn process_file(path: &Path, options: &RunOptions) -> Result<PathBuf> {
    let kind = SourceKind::from_path(path).ok_or_else(|| PrettifyError::UnsupportedTarget {
        path: path.to_path_buf(),
    })?;
    let source = read_source(path)?;
    let pretty = match kind {
        SourceKind::Stylesheet => {
            log::info!("Processing CSS / SCSS file: {}", path.display());
            let pretty = prettify(&source, &options.config);
            if options.timestamp {
                timestamp_comment(chrono::Local::now()) + &pretty
            } else {
                pretty
            }
        }
        SourceKind::Markup => {
            log::info!("Processing HTML file: {}", path.display());
            html_prettify(&source, options.indent_width)
        }
    };
    let output = output_path(path, options.prefix.as_deref());
    write_output(&output, &pretty)?;
    Ok(output)
}
