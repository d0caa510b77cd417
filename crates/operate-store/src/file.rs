use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::StoreError;
use crate::state::{PersistedState, StatePatch};
use crate::StateStore;

/// State store backed by a single JSON file.
///
/// Writes go to a sibling temp file first and are renamed into place, so a
/// reader never sees a half-written document.
pub struct FileStateStore {
  path: PathBuf,
  write_lock: Mutex<()>,
}

impl FileStateStore {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self {
      path: path.into(),
      write_lock: Mutex::new(()),
    }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  async fn read(&self) -> Result<PersistedState, StoreError> {
    match fs::read_to_string(&self.path).await {
      Ok(content) => Ok(serde_json::from_str(&content)?),
      Err(e) if e.kind() == ErrorKind::NotFound => Ok(PersistedState::default()),
      Err(e) => Err(e.into()),
    }
  }
}

#[async_trait]
impl StateStore for FileStateStore {
  async fn get(&self) -> Result<PersistedState, StoreError> {
    self.read().await
  }

  async fn put(&self, patch: StatePatch) -> Result<(), StoreError> {
    let _guard = self.write_lock.lock().await;

    let mut state = self.read().await?;
    state.apply(patch);

    if let Some(parent) = self.path.parent()
      && !parent.as_os_str().is_empty()
    {
      fs::create_dir_all(parent).await?;
    }

    let content = serde_json::to_string_pretty(&state)?;
    let tmp_path = self.path.with_extension("json.tmp");
    fs::write(&tmp_path, content).await?;
    fs::rename(&tmp_path, &self.path).await?;

    debug!(path = %self.path.display(), "persisted instances state");
    Ok(())
  }
}
