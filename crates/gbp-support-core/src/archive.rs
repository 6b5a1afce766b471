//! Output archive lifecycle
//!
//! The bundle is a gzip-compressed tar file. Entries are append-only while a
//! run is in progress; the file is only complete after [`BundleArchive::finish`].
//! An archive dropped without being finished is deleted from disk.

use std::fs::{self, File};
use std::path::{Component, Path, PathBuf};

use chrono::{DateTime, Local};
use flate2::Compression;
use flate2::write::GzEncoder;
use tar::Builder;
use tracing::{debug, warn};

use crate::error::CoreError;

/// Archive file name for `hostname` at time `now`
#[must_use]
pub fn default_filename(hostname: &str, now: DateTime<Local>) -> String {
    format!("gbp_{hostname}_{}.tar.gz", now.format("%Y-%m-%dT%H-%M"))
}

/// Name of the local host, for generated archive names
#[must_use]
pub fn local_hostname() -> String {
    gethostname::gethostname().to_string_lossy().into_owned()
}

/// Archive-internal name for a filesystem path.
///
/// Tar entries must be relative, so root and `.` components are dropped.
#[must_use]
pub fn entry_name(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::RootDir | Component::Prefix(_) | Component::CurDir))
        .collect()
}

/// The single bundle being written during a run
pub struct BundleArchive {
    path: PathBuf,
    builder: Option<Builder<GzEncoder<File>>>,
    entries: usize,
}

impl BundleArchive {
    /// Create the archive in `output_dir`, named `filename` or a generated name.
    ///
    /// # Errors
    /// Returns `CoreError::ArchiveOpen` if the file cannot be created.
    pub fn create(output_dir: &Path, filename: Option<&str>) -> Result<Self, CoreError> {
        let filename = match filename {
            Some(name) => name.to_string(),
            None => default_filename(&local_hostname(), Local::now()),
        };
        let path = output_dir.join(filename);

        let file = File::create(&path).map_err(|e| CoreError::ArchiveOpen {
            path: path.clone(),
            reason: e.to_string(),
        })?;

        let mut builder = Builder::new(GzEncoder::new(file, Compression::default()));
        builder.follow_symlinks(false);

        debug!(path = %path.display(), "opened archive");

        Ok(Self {
            path,
            builder: Some(builder),
            entries: 0,
        })
    }

    /// Destination of the archive on disk
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of top-level entries added so far
    #[must_use]
    pub fn entries(&self) -> usize {
        self.entries
    }

    fn builder(&mut self, name: &Path) -> Result<&mut Builder<GzEncoder<File>>, CoreError> {
        self.builder.as_mut().ok_or_else(|| CoreError::ArchiveWrite {
            name: name.display().to_string(),
            reason: "archive already finished".to_string(),
        })
    }

    /// Add a single file (or a bare directory entry) read from `source` under `name`
    ///
    /// # Errors
    /// Returns `CoreError::ArchiveWrite` if `source` cannot be read or written.
    pub fn append_file(&mut self, source: &Path, name: &Path) -> Result<(), CoreError> {
        let name = entry_name(name);
        self.builder(&name)?
            .append_path_with_name(source, &name)
            .map_err(|e| write_error(&name, &e))?;
        self.entries += 1;
        Ok(())
    }

    /// Add the directory `source` and everything below it under `name`.
    /// Symlinks inside the tree are stored as links.
    ///
    /// # Errors
    /// Returns `CoreError::ArchiveWrite` if any part of the tree cannot be read.
    pub fn append_dir_all(&mut self, source: &Path, name: &Path) -> Result<(), CoreError> {
        let name = entry_name(name);
        self.builder(&name)?
            .append_dir_all(&name, source)
            .map_err(|e| write_error(&name, &e))?;
        self.entries += 1;
        Ok(())
    }

    /// Write the trailer, flush, and return the archive path
    ///
    /// # Errors
    /// Returns `CoreError::ArchiveWrite` if finalizing fails; the partial file is removed.
    pub fn finish(mut self) -> Result<PathBuf, CoreError> {
        let builder = self.builder.take().ok_or_else(|| CoreError::ArchiveWrite {
            name: self.path.display().to_string(),
            reason: "archive already finished".to_string(),
        })?;

        let finished = builder
            .into_inner()
            .and_then(GzEncoder::finish)
            .and_then(|file| file.sync_all());

        if let Err(e) = finished {
            remove_partial(&self.path);
            return Err(write_error(&self.path, &e));
        }

        debug!(path = %self.path.display(), entries = self.entries, "closed archive");
        Ok(self.path.clone())
    }
}

impl Drop for BundleArchive {
    fn drop(&mut self) {
        if let Some(builder) = self.builder.take() {
            drop(builder);
            remove_partial(&self.path);
        }
    }
}

fn remove_partial(path: &Path) {
    debug!(path = %path.display(), "removing unfinished archive");
    if let Err(e) = fs::remove_file(path) {
        warn!(path = %path.display(), error = %e, "unable to remove unfinished archive");
    }
}

fn write_error(name: &Path, e: &std::io::Error) -> CoreError {
    CoreError::ArchiveWrite {
        name: name.display().to_string(),
        reason: e.to_string(),
    }
}
