//! Saving report payloads into the download directory.
//!
//! Bytes are first written to an anonymous staged file inside the target
//! directory and only then published under the resolved name. The staged file
//! is removed automatically if anything fails before publication.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, info};

/// Give up finding a free ` (n)` name after this many attempts.
const MAX_NAME_ATTEMPTS: u32 = 1000;

#[derive(Error, Debug)]
pub enum SaveError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("下载目录不可用 {path}: {source}")]
    Directory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("无法为 {0} 找到可用的文件名")]
    NoFreeName(String),
}

pub type SaveResult<T> = std::result::Result<T, SaveError>;

/// Where downloaded reports land.
#[derive(Debug, Clone)]
pub struct DownloadDir {
    dir: PathBuf,
}

impl DownloadDir {
    /// Use `dir`, creating it if needed. Fails if it cannot be used.
    pub fn new(dir: impl Into<PathBuf>) -> SaveResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|source| SaveError::Directory {
            path: dir.clone(),
            source,
        })?;
        if !dir.is_dir() {
            return Err(SaveError::Directory {
                path: dir.clone(),
                source: io::Error::new(io::ErrorKind::Other, "not a directory"),
            });
        }
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }

    /// Write `bytes` as `filename`, never overwriting an existing file.
    /// Returns the final path.
    pub fn save(&self, filename: &str, bytes: &[u8]) -> SaveResult<PathBuf> {
        let name = sanitize_filename(filename);

        let mut staged = NamedTempFile::new_in(&self.dir)?;
        staged.write_all(bytes)?;
        staged.flush()?;
        debug!(staged = %staged.path().display(), size = bytes.len(), "Payload staged");

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let target = self.dir.join(numbered_name(&name, attempt));
            match staged.persist_noclobber(&target) {
                Ok(_) => {
                    info!(path = %target.display(), "Report saved");
                    return Ok(target);
                }
                Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => {
                    staged = e.file;
                }
                Err(e) => return Err(SaveError::Io(e.error)),
            }
        }
        Err(SaveError::NoFreeName(name))
    }
}

/// Keep only a bare file name: separators and control characters are
/// replaced, and dot-only names are refused.
pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let cleaned = cleaned.trim().trim_start_matches('.').to_string();
    if cleaned.is_empty() {
        super::disposition::DEFAULT_FILENAME.to_string()
    } else {
        cleaned
    }
}

/// `name`, `name (1)`, `name (2)`... keeping the extension last.
fn numbered_name(name: &str, n: u32) -> String {
    if n == 0 {
        return name.to_string();
    }
    match name.rfind('.') {
        Some(idx) if idx > 0 => format!("{} ({n}){}", &name[..idx], &name[idx..]),
        _ => format!("{name} ({n})"),
    }
}
