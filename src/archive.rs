// ABOUTME: Deployment artifact set and in-memory zip packaging of build output.
// ABOUTME: Entries carry fixed Unix permission bits per entry type on non-Windows hosts.

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// rw-r--r--
pub const UNIX_FILE_PERMISSIONS: u32 = 0o644;
/// rwxr-xr-x
pub const UNIX_DIRECTORY_PERMISSIONS: u32 = 0o755;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("output directory {0} contains no files")]
    EmptyOutputDirectory(PathBuf),

    #[error("failed to read build output at {}", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("symbolic link loop in build output at {}", .0.display())]
    Loop(PathBuf),

    #[error("I/O error")]
    Io(#[from] std::io::Error),

    #[error("failed to write archive")]
    Zip(#[from] zip::result::ZipError),
}

impl From<walkdir::Error> for ArchiveError {
    fn from(err: walkdir::Error) -> Self {
        let path = err.path().map(Path::to_path_buf).unwrap_or_default();
        match err.into_io_error() {
            Some(source) => ArchiveError::Walk { path, source },
            None => ArchiveError::Loop(path),
        }
    }
}

pub type Result<T> = std::result::Result<T, ArchiveError>;

/// One entry of the artifact set. `content == None` marks a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Path relative to the output root, `/`-separated.
    pub path: String,
    pub content: Option<Vec<u8>>,
    /// Name to use inside the archive instead of `path`.
    pub rename_to: Option<String>,
    pub dependencies: Vec<String>,
}

impl FileEntry {
    pub fn file(path: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            content: Some(content.into()),
            rename_to: None,
            dependencies: Vec::new(),
        }
    }

    pub fn directory(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: None,
            rename_to: None,
            dependencies: Vec::new(),
        }
    }

    pub fn renamed(mut self, name: impl Into<String>) -> Self {
        self.rename_to = Some(name.into());
        self
    }

    pub fn is_directory(&self) -> bool {
        self.content.is_none()
    }

    pub fn archive_name(&self) -> &str {
        self.rename_to.as_deref().unwrap_or(&self.path)
    }
}

/// Whether `dir` holds at least one regular file at any depth.
pub fn directory_contains_files(dir: &Path) -> bool {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .any(|entry| entry.file_type().is_file())
}

/// Read a build output directory into an artifact set, in sorted path order.
///
/// # Errors
///
/// `ArchiveError::EmptyOutputDirectory` if `dir` is missing or no regular
/// file exists beneath it; directories alone do not count.
pub fn collect_entries(dir: &Path) -> Result<Vec<FileEntry>> {
    if !dir.is_dir() {
        return Err(ArchiveError::EmptyOutputDirectory(dir.to_path_buf()));
    }

    let mut entries = Vec::new();
    let mut files = 0usize;

    for entry in WalkDir::new(dir).min_depth(1).sort_by_file_name() {
        let entry = entry?;
        let Ok(relative) = entry.path().strip_prefix(dir) else {
            continue;
        };
        let name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        if entry.file_type().is_dir() {
            entries.push(FileEntry::directory(format!("{name}/")));
        } else if entry.file_type().is_file() {
            let content = std::fs::read(entry.path())?;
            entries.push(FileEntry::file(name, content));
            files += 1;
        }
    }

    if files == 0 {
        return Err(ArchiveError::EmptyOutputDirectory(dir.to_path_buf()));
    }

    tracing::debug!(dir = %dir.display(), files, entries = entries.len(), "collected build output");
    Ok(entries)
}

/// Write entries into a deflated zip held in memory.
pub fn to_zip_bytes(entries: &[FileEntry]) -> Result<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let base = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for entry in entries {
        let name = entry.archive_name();
        match &entry.content {
            None => {
                writer.add_directory(name, with_permissions(base, UNIX_DIRECTORY_PERMISSIONS))?;
            }
            Some(content) => {
                writer.start_file(name, with_permissions(base, UNIX_FILE_PERMISSIONS))?;
                writer.write_all(content)?;
            }
        }
    }

    let buffer = writer.finish()?;
    Ok(buffer.into_inner())
}

/// Collect `dir` and zip it in one step.
pub fn package_directory(dir: &Path) -> Result<Vec<u8>> {
    let entries = collect_entries(dir)?;
    to_zip_bytes(&entries)
}

fn with_permissions(options: SimpleFileOptions, mode: u32) -> SimpleFileOptions {
    if cfg!(windows) {
        options
    } else {
        options.unix_permissions(mode)
    }
}
