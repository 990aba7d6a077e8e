//! Upload storage
//!
//! Every upload gets its own request-scoped file name, so concurrent
//! requests never delete each other's files. Requests remove their own file
//! once parsed; anything left behind is removed by the retention sweeper.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use uuid::Uuid;

/// Longest original-name fragment kept in a stored file name
const MAX_NAME_LEN: usize = 64;
const PROBE_FILE: &str = ".write-probe";

/// The upload directory could not be prepared or written to
#[derive(Debug)]
pub struct StorageError {
    pub path: PathBuf,
    pub source: io::Error,
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Upload storage error at {}: {}",
            self.path.display(),
            self.source
        )
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

fn storage_err(path: &Path) -> impl FnOnce(io::Error) -> StorageError + '_ {
    move |source| StorageError {
        path: path.to_path_buf(),
        source,
    }
}

/// Directory holding in-flight uploads
#[derive(Debug)]
pub struct UploadStore {
    dir: PathBuf,
    retention: Duration,
}

/// A single stored upload, owned by the request that created it
#[derive(Debug)]
pub struct StoredUpload {
    key: String,
    path: PathBuf,
}

impl StoredUpload {
    /// Unique storage key (the file name inside the upload directory)
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove this upload's file. A file already swept away is not an error.
    pub async fn discard(self) -> Result<(), StorageError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(storage_err(&self.path)(e)),
        }
    }
}

impl UploadStore {
    /// Create the upload directory if needed and check that it is writable
    pub fn init<P: AsRef<Path>>(dir: P, retention: Duration) -> Result<Self, StorageError> {
        let dir = dir.as_ref().to_path_buf();

        std::fs::create_dir_all(&dir).map_err(storage_err(&dir))?;

        let probe = dir.join(PROBE_FILE);
        std::fs::write(&probe, b"").map_err(storage_err(&dir))?;
        std::fs::remove_file(&probe).map_err(storage_err(&dir))?;

        Ok(Self { dir, retention })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Persist an upload under a fresh key
    pub async fn save(&self, original_name: &str, bytes: &[u8]) -> Result<StoredUpload, StorageError> {
        let key = format!(
            "{}-{}-{}",
            chrono::Utc::now().timestamp_millis(),
            Uuid::new_v4().simple(),
            sanitize_file_name(original_name)
        );
        let path = self.dir.join(&key);

        tokio::fs::write(&path, bytes)
            .await
            .map_err(storage_err(&path))?;

        log::debug!("Stored upload '{}' ({} bytes) as {}", original_name, bytes.len(), key);

        Ok(StoredUpload { key, path })
    }

    /// Delete files older than the retention window. Returns how many were removed.
    pub fn sweep(&self, now: SystemTime) -> Result<usize, StorageError> {
        let mut removed = 0;

        for entry in std::fs::read_dir(&self.dir).map_err(storage_err(&self.dir))? {
            let entry = entry.map_err(storage_err(&self.dir))?;
            let path = entry.path();

            let metadata = match entry.metadata() {
                Ok(m) if m.is_file() => m,
                Ok(_) => continue,
                Err(e) => {
                    log::warn!("Skipping {} during sweep: {}", path.display(), e);
                    continue;
                }
            };

            let modified = metadata.modified().map_err(storage_err(&path))?;
            let age = now.duration_since(modified).unwrap_or_default();
            if age < self.retention {
                continue;
            }

            match std::fs::remove_file(&path) {
                Ok(()) => removed += 1,
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(storage_err(&path)(e)),
            }
        }

        if removed > 0 {
            log::info!("Swept {} stale upload(s) from {}", removed, self.dir.display());
        }

        Ok(removed)
    }

    /// Run `sweep` on a fixed interval in the background
    pub fn spawn_sweeper(self: Arc<Self>, interval: Duration) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                let store = Arc::clone(&self);
                match tokio::task::spawn_blocking(move || store.sweep(SystemTime::now())).await {
                    Ok(Ok(_)) => {}
                    Ok(Err(e)) => log::error!("Upload sweep failed: {}", e),
                    Err(e) => log::error!("Upload sweep task panicked: {}", e),
                }
            }
        })
    }
}

/// Reduce a client-supplied file name to a safe single path component,
/// keeping the extension so the spreadsheet reader can detect the format
pub fn sanitize_file_name(name: &str) -> String {
    // Browsers on Windows may send a full path
    let base = name.rsplit(['/', '\\']).next().unwrap_or("");

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');

    if cleaned.is_empty() {
        return "upload".to_string();
    }

    if cleaned.len() <= MAX_NAME_LEN {
        return cleaned.to_string();
    }

    // Keep the tail so the extension survives truncation
    cleaned[cleaned.len() - MAX_NAME_LEN..].to_string()
}
