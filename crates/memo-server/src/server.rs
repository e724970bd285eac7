use std::future::Future;
use std::sync::Arc;

use memo_store::{KvStore, RedbKvStore};
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::router::build_router;
use crate::state::AppState;

/// memo HTTP server.
///
/// Owns the store handle for the lifetime of the server; the handle is
/// released when [`serve`](Self::serve) returns.
pub struct MemoServer {
    config: ServerConfig,
    state: AppState,
}

impl MemoServer {
    /// Open the persistent store named by `config.db_path`.
    pub fn open(config: ServerConfig) -> ServerResult<Self> {
        let store = RedbKvStore::open(&config.db_path)?;
        Ok(Self::with_store(config, Arc::new(store)))
    }

    /// Build a server over an already opened store.
    pub fn with_store(config: ServerConfig, store: Arc<dyn KvStore>) -> Self {
        Self {
            config,
            state: AppState::new(store),
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(self.state.clone(), &self.config)
    }

    /// Serve until Ctrl-C.
    pub async fn serve(self) -> ServerResult<()> {
        self.serve_with_shutdown(shutdown_signal()).await
    }

    /// Serve until `signal` resolves, then drain in-flight requests.
    pub async fn serve_with_shutdown<F>(self, signal: F) -> ServerResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = self.router();
        match self.config.tls.clone() {
            Some(tls) => self.serve_tls(app, tls, signal).await,
            None => {
                let listener = TcpListener::bind(&self.config.bind_addr).await?;
                tracing::info!("memo server listening on http://{}", self.config.bind_addr);
                axum::serve(listener, app)
                    .with_graceful_shutdown(signal)
                    .await?;
                tracing::info!("memo server stopped");
                Ok(())
            }
        }
    }

    #[cfg(feature = "tls")]
    async fn serve_tls<F>(
        &self,
        app: axum::Router,
        tls: crate::config::TlsConfig,
        signal: F,
    ) -> ServerResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        use axum_server::tls_rustls::RustlsConfig;
        use std::time::Duration;

        let rustls = RustlsConfig::from_pem_file(&tls.cert_path, &tls.key_path)
            .await
            .map_err(|e| {
                ServerError::Config(format!(
                    "cannot load TLS material ({}, {}): {e}",
                    tls.cert_path.display(),
                    tls.key_path.display()
                ))
            })?;

        let handle = axum_server::Handle::new();
        let shutdown = handle.clone();
        tokio::spawn(async move {
            signal.await;
            shutdown.graceful_shutdown(Some(Duration::from_secs(10)));
        });

        tracing::info!("memo server listening on https://{}", self.config.bind_addr);
        axum_server::bind_rustls(self.config.bind_addr, rustls)
            .handle(handle)
            .serve(app.into_make_service())
            .await?;
        tracing::info!("memo server stopped");
        Ok(())
    }

    #[cfg(not(feature = "tls"))]
    async fn serve_tls<F>(
        &self,
        _app: axum::Router,
        _tls: crate::config::TlsConfig,
        _signal: F,
    ) -> ServerResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        Err(ServerError::Config(
            "TLS is configured but memo-server was built without the `tls` feature".into(),
        ))
    }
}

/// Resolves on Ctrl-C.
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "cannot listen for Ctrl-C; serving until killed");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TlsConfig;
    use memo_store::InMemoryKvStore;

    fn test_config() -> ServerConfig {
        ServerConfig {
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            ..ServerConfig::default()
        }
    }

    #[test]
    fn server_construction() {
        let server = MemoServer::with_store(test_config(), Arc::new(InMemoryKvStore::new()));
        assert_eq!(server.config().bind_addr.port(), 0);
        let _router = server.router();
    }

    #[test]
    fn open_creates_store() {
        let tmp = tempfile::tempdir().unwrap();
        let config = ServerConfig {
            db_path: tmp.path().join("db"),
            ..test_config()
        };
        let server = MemoServer::open(config).unwrap();
        assert!(server.config().db_path.join(memo_store::persistent::DB_FILE_NAME).exists());
    }

    #[test]
    fn open_fails_on_unusable_path() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("file");
        std::fs::write(&file, b"x").unwrap();
        let config = ServerConfig {
            db_path: file,
            ..test_config()
        };
        assert!(matches!(MemoServer::open(config), Err(ServerError::Store(_))));
    }

    #[tokio::test]
    async fn serve_stops_on_signal() {
        let server = MemoServer::with_store(test_config(), Arc::new(InMemoryKvStore::new()));
        server.serve_with_shutdown(async {}).await.unwrap();
    }

    #[tokio::test]
    async fn tls_with_missing_files_fails() {
        let config = ServerConfig {
            tls: Some(TlsConfig {
                cert_path: "/no/such/cert.pem".into(),
                key_path: "/no/such/key.pem".into(),
            }),
            ..test_config()
        };
        let server = MemoServer::with_store(config, Arc::new(InMemoryKvStore::new()));
        let err = server.serve_with_shutdown(async {}).await.unwrap_err();
        assert!(matches!(err, ServerError::Config(_)));
    }
}
