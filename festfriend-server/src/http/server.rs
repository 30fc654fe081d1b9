/// Group HTTP Server
///
/// Serves the group endpoints over plain HTTP:
/// - POST /group/create - Create a password-protected group
/// - POST /join - Join a group under a username
/// - POST /group/members - List a group's members
///
/// The registry is created empty at construction and discarded with the
/// server; nothing is persisted.

use std::net::SocketAddr;
use std::sync::Arc;

use festfriend_protocol::{
    Argon2Credentials, CredentialScheme, GroupRegistry, GroupService, HashingError,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::{router, AppState};
use crate::config::ServerConfig;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Invalid credential parameters: {0}")]
    Credentials(#[from] HashingError),

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Serve(#[source] std::io::Error),

    #[error("Server task failed: {0}")]
    Task(String),
}

pub type Result<T> = std::result::Result<T, ServerError>;

/// Group server: owns the service and the shutdown signal.
pub struct GroupServer {
    config: ServerConfig,
    service: GroupService,
    /// Flipped to `true` to stop accepting connections
    shutdown: watch::Sender<bool>,
}

/// A started server.
pub struct RunningServer {
    local_addr: SocketAddr,
    task: JoinHandle<std::io::Result<()>>,
}

impl RunningServer {
    /// Address actually bound (resolves port 0).
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Wait until the server has shut down.
    pub async fn wait(self) -> Result<()> {
        self.task
            .await
            .map_err(|e| ServerError::Task(e.to_string()))?
            .map_err(ServerError::Serve)
    }
}

impl GroupServer {
    /// Create a server with an empty registry and Argon2id credentials.
    pub fn new(config: ServerConfig) -> Result<Self> {
        let credentials = Argon2Credentials::new(config.credential_params)?;
        Ok(Self::with_credentials(config, Arc::new(credentials)))
    }

    /// Create a server with an empty registry and the given credential scheme.
    pub fn with_credentials(config: ServerConfig, credentials: Arc<dyn CredentialScheme>) -> Self {
        let service = GroupService::new(Arc::new(GroupRegistry::new()), credentials);
        Self::with_service(config, service)
    }

    /// Create a server around an existing service.
    pub fn with_service(config: ServerConfig, service: GroupService) -> Self {
        let (shutdown, _) = watch::channel(false);
        Self {
            config,
            service,
            shutdown,
        }
    }

    pub fn service(&self) -> &GroupService {
        &self.service
    }

    /// Bind the listener and start serving on a background task.
    pub async fn start(&self) -> Result<RunningServer> {
        let addr = self.config.bind_addr();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: addr.clone(),
                source,
            })?;
        let local_addr = listener.local_addr().map_err(|source| ServerError::Bind {
            addr: addr.clone(),
            source,
        })?;

        log::info!("Group server listening on {}", local_addr);

        let app = router(AppState {
            service: self.service.clone(),
            max_body_bytes: self.config.max_body_bytes,
        });
        let mut stop = self.shutdown.subscribe();

        let task = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    while !*stop.borrow_and_update() {
                        if stop.changed().await.is_err() {
                            break;
                        }
                    }
                    log::info!("Group server shutting down");
                })
                .await
        });

        Ok(RunningServer { local_addr, task })
    }

    /// Stop the server
    pub fn stop(&self) {
        self.shutdown.send_replace(true);
        log::info!("Group server stop signal sent");
    }
}
