//! File naming and emission.
//!
//! Rendering a document is pure; handing the bytes to the host is the only
//! side effect and goes through a [`FileSink`].

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use routes::{ActivityType, RouteDetails};
use time::Date;
use time::macros::format_description;
use tracing::info;

use crate::errors::ExportError;

pub const GPX_MIME_TYPE: &str = "application/gpx+xml";

/// A GPX file ready to be saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GpxFile {
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

impl GpxFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: GPX_MIME_TYPE,
            bytes,
        }
    }
}

/// Lowercases `name` and replaces each run of characters outside `[a-z0-9]` with `-`.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut in_separator = false;

    for c in name.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            slug.push(c);
            in_separator = false;
        } else if !in_separator {
            slug.push('-');
            in_separator = true;
        }
    }

    slug
}

/// `<slug>-<date>.gpx` for named routes, `<type>-route-<date>.gpx` otherwise.
pub fn export_file_name(
    details: &RouteDetails,
    activity: ActivityType,
    date: Date,
) -> Result<String, ExportError> {
    let date = date.format(format_description!("[year]-[month]-[day]"))?;

    Ok(match details.given_name() {
        Some(name) => format!("{}-{date}.gpx", slugify(name)),
        None => format!("{}-route-{date}.gpx", activity.gpx_type()),
    })
}

/// Destination for exported files.
pub trait FileSink {
    fn save(&self, file: &GpxFile) -> Result<(), ExportError>;
}

/// Writes files into a directory, creating it on first use.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, file: &GpxFile) -> PathBuf {
        self.dir.join(&file.file_name)
    }
}

impl FileSink for DirectorySink {
    fn save(&self, file: &GpxFile) -> Result<(), ExportError> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(file);
        std::fs::write(&path, &file.bytes)?;

        info!("Saved {} ({} bytes)", path.display(), file.bytes.len());
        Ok(())
    }
}

/// Keeps saved files in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    files: RefCell<Vec<GpxFile>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn files(&self) -> Vec<GpxFile> {
        self.files.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.files.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.borrow().is_empty()
    }
}

impl FileSink for MemorySink {
    fn save(&self, file: &GpxFile) -> Result<(), ExportError> {
        self.files.borrow_mut().push(file.clone());
        Ok(())
    }
}
