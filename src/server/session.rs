//! Client session handling
//!
//! Reads command lines from one connection, pulls upload payloads off the
//! stream and runs the blocking store calls on the blocking pool.

use log::{error, info, warn};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

use crate::protocol::responses::{self, reply};
use crate::protocol::{Command, CommandResult, CommandStatus, handle_command, handle_upload, parse_command};
use crate::storage::UploadedFile;
use crate::store::{FileStore, InvoiceProfile};

pub const MAX_COMMAND_LENGTH: usize = 1024;

/// Serves one client until it quits or disconnects.
pub async fn handle_client(
    stream: TcpStream,
    client_addr: SocketAddr,
    store: Arc<FileStore<InvoiceProfile>>,
    max_upload_bytes: u64,
) -> Result<(), std::io::Error> {
    let (read_half, mut write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);
    let mut buf = Vec::new();

    write_half
        .write_all(reply(responses::READY, "Invoice store ready").as_bytes())
        .await?;
    write_half.flush().await?;

    loop {
        buf.clear();
        let n = (&mut reader)
            .take(MAX_COMMAND_LENGTH as u64 + 1)
            .read_until(b'\n', &mut buf)
            .await?;
        if n == 0 {
            info!("Connection closed by client {}", client_addr);
            return Ok(());
        }

        // The rest of an overlong line is still unread, so the session ends here
        if buf.len() > MAX_COMMAND_LENGTH {
            warn!("Command from {} exceeds {} bytes", client_addr, MAX_COMMAND_LENGTH);
            write_half
                .write_all(reply(responses::UNKNOWN_COMMAND, "Command too long").as_bytes())
                .await?;
            write_half.flush().await?;
            return Ok(());
        }

        let line = String::from_utf8_lossy(&buf);
        let command = parse_command(&line);
        info!("Received from {}: {:?}", client_addr, command);

        let result = match command {
            Command::UPLOAD(original_name, size) => {
                if size > max_upload_bytes {
                    warn!(
                        "Upload from {} too large: {} > {} bytes",
                        client_addr, size, max_upload_bytes
                    );
                    // The payload is still on the wire, so the session cannot continue
                    write_half
                        .write_all(reply(responses::TOO_LARGE, "File too large").as_bytes())
                        .await?;
                    return Ok(());
                }

                let mut contents = vec![0u8; size as usize];
                reader.read_exact(&mut contents).await?;
                let file = UploadedFile::new(original_name, contents);
                run_blocking(&store, move |store| handle_upload(store, &file)).await
            }
            command => run_blocking(&store, move |store| handle_command(store, &command)).await,
        };

        write_half.write_all(result.message.as_bytes()).await?;
        write_half.flush().await?;

        if result.status == CommandStatus::CloseConnection {
            info!("Client {} requested to quit", client_addr);
            return Ok(());
        }
    }
}

async fn run_blocking<F>(store: &Arc<FileStore<InvoiceProfile>>, f: F) -> CommandResult
where
    F: FnOnce(&FileStore<InvoiceProfile>) -> CommandResult + Send + 'static,
{
    let store = Arc::clone(store);
    match tokio::task::spawn_blocking(move || f(&store)).await {
        Ok(result) => result,
        Err(e) => {
            error!("Store task failed: {}", e);
            CommandResult::failure(
                e.to_string(),
                reply(responses::RECORD_FAILED, "Internal error"),
            )
        }
    }
}
