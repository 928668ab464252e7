//! Enumerates configuration sources in zip archives and directory trees.

use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use meff_core::errors::{ErrorInfo, MeffError};
use walkdir::WalkDir;
use zip::ZipArchive;

use crate::select::EntrySelector;

fn source_error(code: &str, err: impl ToString, path: &Path) -> MeffError {
    MeffError::Ingestion(
        ErrorInfo::new(code, err.to_string()).with_context("path", path.display()),
    )
}

/// Where configuration sources are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// A zip archive holding one entry per configuration.
    Zip(PathBuf),
    /// A directory tree holding one file per configuration.
    Directory(PathBuf),
}

impl DataSource {
    /// Treats directories as trees and anything else as a zip archive.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if path.is_dir() {
            DataSource::Directory(path)
        } else {
            DataSource::Zip(path)
        }
    }

    /// Path of the archive or directory.
    pub fn path(&self) -> &Path {
        match self {
            DataSource::Zip(path) | DataSource::Directory(path) => path,
        }
    }

    /// Label recorded in provenance.
    pub fn label(&self) -> String {
        self.path().display().to_string()
    }
}

/// Bytes of one selected entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntry {
    /// Slash-separated name relative to the source root.
    pub name: String,
    /// Entry contents.
    pub bytes: Vec<u8>,
}

impl RawEntry {
    /// Wraps in-memory contents.
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

/// Reads every selected entry, sorted by name.
///
/// Sorting fixes the configuration order independently of archive layout or
/// filesystem iteration order.
pub fn collect_entries(
    source: &DataSource,
    selector: &dyn EntrySelector,
) -> Result<Vec<RawEntry>, MeffError> {
    let mut entries = match source {
        DataSource::Zip(path) => zip_entries(path, selector)?,
        DataSource::Directory(path) => directory_entries(path, selector)?,
    };
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    log::debug!(
        "selected {} entries from {}",
        entries.len(),
        source.label()
    );
    Ok(entries)
}

fn zip_entries(path: &Path, selector: &dyn EntrySelector) -> Result<Vec<RawEntry>, MeffError> {
    let file = File::open(path).map_err(|err| source_error("archive-open", err, path))?;
    let mut archive =
        ZipArchive::new(file).map_err(|err| source_error("archive-open", err, path))?;
    let mut entries = Vec::new();
    for idx in 0..archive.len() {
        let mut file = archive
            .by_index(idx)
            .map_err(|err| source_error("archive-read", err, path))?;
        if file.is_dir() || !selector.select(file.name()) {
            continue;
        }
        let name = file.name().to_string();
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)
            .map_err(|err| source_error("archive-read", err, path).with_context("entry", &name))?;
        entries.push(RawEntry { name, bytes });
    }
    Ok(entries)
}

fn normalise(path: &Path) -> String {
    path.components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn directory_entries(
    root: &Path,
    selector: &dyn EntrySelector,
) -> Result<Vec<RawEntry>, MeffError> {
    if !root.is_dir() {
        return Err(source_error("source-missing", "directory does not exist", root));
    }
    let mut entries = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = entry.map_err(|err| source_error("directory-read", err, root))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(rel) = entry.path().strip_prefix(root) else {
            continue;
        };
        let name = normalise(rel);
        if !selector.select(&name) {
            continue;
        }
        let bytes = fs::read(entry.path())
            .map_err(|err| source_error("directory-read", err, entry.path()))?;
        entries.push(RawEntry { name, bytes });
    }
    Ok(entries)
}
