use std::sync::Arc;

use memo_store::{CollectionManager, KvStore, StoreResult};

use crate::error::{ServerError, ServerResult};

/// Shared handler state: the process-wide collection manager.
#[derive(Clone, Debug)]
pub struct AppState {
    manager: Arc<CollectionManager>,
}

impl AppState {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self {
            manager: Arc::new(CollectionManager::new(store)),
        }
    }

    pub fn manager(&self) -> &Arc<CollectionManager> {
        &self.manager
    }

    /// Run a blocking collection operation off the async executor.
    pub(crate) async fn run<T, F>(&self, op: F) -> ServerResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&CollectionManager) -> StoreResult<T> + Send + 'static,
    {
        let manager = Arc::clone(&self.manager);
        let result = tokio::task::spawn_blocking(move || op(&manager))
            .await
            .map_err(|e| ServerError::Internal(format!("store task failed: {e}")))?;
        Ok(result?)
    }
}
