//! Fire-and-forget persistence of state patches.

use std::sync::Arc;

use operate_store::{StatePatch, StateStore};
use tokio::sync::{mpsc, oneshot};
use tracing::warn;

enum PersistCommand {
  Put(StatePatch),
  Flush(oneshot::Sender<()>),
}

/// Writes patches to the store from a background task, in submission order.
///
/// A failed write is logged and dropped; it never reaches the page.
pub(crate) struct Persister {
  sender: mpsc::UnboundedSender<PersistCommand>,
}

impl Persister {
  pub(crate) fn spawn(store: Arc<dyn StateStore>) -> Self {
    let (sender, mut receiver) = mpsc::unbounded_channel();

    tokio::spawn(async move {
      while let Some(command) = receiver.recv().await {
        match command {
          PersistCommand::Put(patch) => {
            if let Err(e) = store.put(patch).await {
              warn!(error = %e, "failed to persist instances state");
            }
          }
          PersistCommand::Flush(done) => {
            let _ = done.send(());
          }
        }
      }
    });

    Self { sender }
  }

  pub(crate) fn put(&self, patch: StatePatch) {
    if patch.is_empty() {
      return;
    }
    if self.sender.send(PersistCommand::Put(patch)).is_err() {
      warn!("persistence task has stopped, dropping state update");
    }
  }

  /// Wait until every patch submitted so far has been written (or failed).
  pub(crate) async fn flush(&self) {
    let (done, wait) = oneshot::channel();
    if self.sender.send(PersistCommand::Flush(done)).is_ok() {
      let _ = wait.await;
    }
  }
}
