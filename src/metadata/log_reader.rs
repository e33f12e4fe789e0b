//! Reads `.log` files from the cluster metadata directory.

use crate::error::{Result, SwiftQueueError};
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Name of the single metadata log segment.
pub const METADATA_LOG_FILE: &str = "00000000000000000000.log";

/// One log file, with or without its contents.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub file_name: String,
    pub path: PathBuf,
    pub size: u64,
    /// Empty for [`LogReader::log_file_info`].
    pub data: Vec<u8>,
}

/// Reader over one metadata log directory. Holds no open handles; every call
/// goes back to the file system.
#[derive(Debug, Clone)]
pub struct LogReader {
    base_path: PathBuf,
}

impl LogReader {
    pub fn new(base_path: impl AsRef<Path>) -> Result<Self> {
        let base_path = base_path.as_ref().to_path_buf();
        if !base_path.is_dir() {
            return Err(SwiftQueueError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("log directory does not exist: {}", base_path.display()),
            )));
        }
        Ok(Self { base_path })
    }

    pub fn log_directory(&self) -> &Path {
        &self.base_path
    }

    /// Sorted names of every `.log` file in the directory.
    pub fn list_log_files(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in std::fs::read_dir(&self.base_path)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.ends_with(".log") {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }

    pub fn read_log_file(&self, file_name: &str) -> Result<LogEntry> {
        let path = self.base_path.join(file_name);
        let data = std::fs::read(&path)?;
        Ok(LogEntry {
            file_name: file_name.to_string(),
            size: data.len() as u64,
            path,
            data,
        })
    }

    /// Raw bytes of the metadata log segment.
    pub fn read_metadata_log(&self) -> Result<Vec<u8>> {
        Ok(self.read_log_file(METADATA_LOG_FILE)?.data)
    }

    /// Every readable `.log` file; unreadable ones are skipped with a warning.
    pub fn read_all_log_files(&self) -> Result<Vec<LogEntry>> {
        let mut entries = Vec::new();
        for name in self.list_log_files()? {
            match self.read_log_file(&name) {
                Ok(entry) => entries.push(entry),
                Err(e) => warn!(file = %name, "failed to read log file: {}", e),
            }
        }
        Ok(entries)
    }

    /// Up to `len` bytes starting at `offset`; shorter at end of file.
    pub fn read_log_file_bytes(&self, file_name: &str, offset: u64, len: usize) -> Result<Vec<u8>> {
        let mut file = File::open(self.base_path.join(file_name))?;
        file.seek(SeekFrom::Start(offset))?;
        let mut buf = Vec::with_capacity(len);
        file.take(len as u64).read_to_end(&mut buf)?;
        Ok(buf)
    }

    pub fn log_file_info(&self, file_name: &str) -> Result<LogEntry> {
        let path = self.base_path.join(file_name);
        let size = std::fs::metadata(&path)?.len();
        Ok(LogEntry {
            file_name: file_name.to_string(),
            path,
            size,
            data: Vec::new(),
        })
    }

    /// Sum of the sizes of every `.log` file; files that vanish are ignored.
    pub fn total_log_size(&self) -> Result<u64> {
        Ok(self
            .list_log_files()?
            .iter()
            .filter_map(|name| self.log_file_info(name).ok())
            .map(|info| info.size)
            .sum())
    }
}
