use crate::errors::StoreError;
use crate::models::PageLayout;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error};

pub const THEME_KEY: &str = "theme";

/// Durable key-value preferences scoped to one site.
pub trait PreferenceStore: Send {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Preferences kept as a flat JSON object on disk.
///
/// Reads happen once at load; every `set` hands the serialized entries to a
/// background writer task, so callers never block on the filesystem. Writes
/// land in the order they were made.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
    writer: mpsc::UnboundedSender<WriteRequest>,
}

#[derive(Debug)]
enum WriteRequest {
    Save(Vec<u8>),
    Flush(oneshot::Sender<()>),
}

impl JsonFileStore {
    pub async fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match fs::read(&path).await {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(entries) => entries,
                Err(err) => {
                    error!("failed to parse preferences file: {err}");
                    BTreeMap::new()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => {
                error!("failed to read preferences file: {err}");
                BTreeMap::new()
            }
        };

        let (writer, requests) = mpsc::unbounded_channel();
        tokio::spawn(write_loop(path.clone(), requests));

        Self {
            path,
            entries,
            writer,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Resolves once every write issued before the call has hit the disk.
    pub async fn flush(&self) {
        let (done, finished) = oneshot::channel();
        if self.writer.send(WriteRequest::Flush(done)).is_ok() {
            let _ = finished.await;
        }
    }
}

impl PreferenceStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        let payload = serde_json::to_vec_pretty(&self.entries)?;
        self.writer
            .send(WriteRequest::Save(payload))
            .map_err(|_| StoreError::unavailable("preference writer stopped"))
    }
}

async fn write_loop(path: PathBuf, mut requests: mpsc::UnboundedReceiver<WriteRequest>) {
    while let Some(request) = requests.recv().await {
        match request {
            WriteRequest::Save(payload) => match persist(&path, &payload).await {
                Ok(()) => debug!(path = %path.display(), "preferences written"),
                Err(err) => error!("failed to write preferences file: {err}"),
            },
            WriteRequest::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
}

async fn persist(path: &Path, payload: &[u8]) -> Result<(), StoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }
    fs::write(path, payload).await?;
    Ok(())
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn with_entry(key: &str, value: &str) -> Self {
        let mut store = Self::default();
        store.entries.insert(key.to_string(), value.to_string());
        store
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

pub async fn load_layout(path: &Path) -> PageLayout {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(layout) => layout,
            Err(err) => {
                error!("failed to parse layout file: {err}");
                PageLayout::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => PageLayout::default(),
        Err(err) => {
            error!("failed to read layout file: {err}");
            PageLayout::default()
        }
    }
}
