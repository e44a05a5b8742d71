use log::{error, info, warn};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;
use tokio::sync::Semaphore;

use crate::config::ServerSettings;
use crate::error::ServiceError;
use crate::naming::RandomNameGenerator;
use crate::protocol::responses::{self, reply};
use crate::server::session::handle_client;
use crate::store::{FileStore, InvoiceProfile};

pub struct Server {
    listener: TcpListener,
    store: Arc<FileStore<InvoiceProfile>>,
    connection_slots: Arc<Semaphore>,
    max_clients: usize,
    max_upload_bytes: u64,
}

impl Server {
    pub async fn bind(
        settings: &ServerSettings,
        store: Arc<FileStore<InvoiceProfile>>,
    ) -> Result<Self, ServiceError> {
        let socket = settings.listen_socket();
        let listener = match TcpListener::bind(&socket).await {
            Ok(listener) => listener,
            Err(e) => {
                error!("Failed to bind to {}: {}", socket, e);
                return Err(ServiceError::from(e));
            }
        };
        info!("Server bound to {}", listener.local_addr()?);

        Ok(Self {
            listener,
            store,
            connection_slots: Arc::new(Semaphore::new(settings.max_clients)),
            max_clients: settings.max_clients,
            max_upload_bytes: settings.max_upload_size_bytes(),
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accepts connections forever, one task per client.
    pub async fn start(&self) {
        info!(
            "Starting invoice store on {:?} (max {} clients)",
            self.local_addr().ok(),
            self.max_clients
        );

        loop {
            match self.listener.accept().await {
                Ok((mut stream, addr)) => {
                    let permit = match Arc::clone(&self.connection_slots).try_acquire_owned() {
                        Ok(permit) => permit,
                        Err(_) => {
                            warn!("Rejecting {}: connection limit reached", addr);
                            let _ = stream
                                .write_all(
                                    reply(responses::TOO_MANY_CONNECTIONS, "Too many connections")
                                        .as_bytes(),
                                )
                                .await;
                            continue;
                        }
                    };

                    let store = Arc::clone(&self.store);
                    let max_upload_bytes = self.max_upload_bytes;
                    let session_id = RandomNameGenerator::new().generate_default();
                    info!("Session {} opened for {}", session_id, addr);

                    // Spawn a task for each client so accept loop doesn't block
                    tokio::spawn(async move {
                        if let Err(e) = handle_client(stream, addr, store, max_upload_bytes).await {
                            warn!("Session {} ({}) failed: {}", session_id, addr, e);
                        }
                        info!("Session {} closed", session_id);
                        drop(permit);
                    });
                }
                Err(e) => {
                    error!("Error accepting connection: {}", e);
                }
            }
        }
    }
}
