//! Command handlers for the upload endpoint.
//!
//! Each handler calls the file store and turns the outcome into a response
//! line. Handlers block on storage I/O; the session runs them off the async
//! executor.

use log::{error, info};

use crate::error::handlers::{error_to_status_code, handle_error};
use crate::protocol::responses::{self, reply};
use crate::protocol::{Command, CommandResult, CommandStatus};
use crate::registry::NameRegistry;
use crate::storage::UploadedFile;
use crate::store::{FileStore, InvoiceProfile, SaveOutcome};

/// Dispatches a command that carries no payload.
///
/// `UPLOAD` is routed by the session to [`handle_upload`] once the payload
/// has been read.
pub fn handle_command(store: &FileStore<InvoiceProfile>, command: &Command) -> CommandResult {
    match command {
        Command::QUIT => handle_cmd_quit(),
        Command::DELETE(name) => handle_cmd_delete(store, name),
        Command::EXISTS(name) => handle_cmd_exists(store, name),
        Command::UPLOAD(..) | Command::UNKNOWN => handle_cmd_unknown(),
    }
}

/// Saves an uploaded invoice and records its name.
pub fn handle_upload(store: &FileStore<InvoiceProfile>, file: &UploadedFile) -> CommandResult {
    if file.size() == 0 {
        return CommandResult::failure(
            "Missing file",
            reply(responses::UNPROCESSABLE, "File is required"),
        );
    }

    let name = match store.save_file(file, "") {
        Ok(SaveOutcome::Accepted(name)) => name,
        Ok(SaveOutcome::Rejected(reason)) => {
            error!("Upload of {} rejected: {:?}", file.original_name(), reason);
            return CommandResult::failure(
                "Save rejected",
                reply(responses::UNPROCESSABLE, "Can not save file"),
            );
        }
        Err(e) => {
            handle_error(&e);
            return CommandResult::failure(e.to_string(), reply(error_to_status_code(&e), &e.to_string()));
        }
    };

    if let Err(e) = store.profile().registry().record(&name) {
        error!("Stored {} but could not record it: {}", name, e);
        return CommandResult::failure(
            e.to_string(),
            reply(responses::RECORD_FAILED, "Can not save to db"),
        );
    }

    let url = store.get_uri_path(&name);
    info!("Upload of {} available at {}", file.original_name(), url);
    CommandResult::success(reply(responses::UPLOADED, &url))
}

fn handle_cmd_quit() -> CommandResult {
    CommandResult {
        status: CommandStatus::CloseConnection,
        message: reply(responses::GOODBYE, "Goodbye"),
    }
}

fn handle_cmd_delete(store: &FileStore<InvoiceProfile>, name: &str) -> CommandResult {
    if store.delete_image(name) {
        CommandResult::success(reply(responses::DELETED, "Deleted"))
    } else {
        CommandResult::failure(
            "Delete failed",
            reply(responses::DELETE_FAILED, "Delete failed"),
        )
    }
}

fn handle_cmd_exists(store: &FileStore<InvoiceProfile>, name: &str) -> CommandResult {
    match store.exists(name) {
        Ok(found) => CommandResult::success(reply(responses::STATUS, if found { "1" } else { "0" })),
        Err(e) => {
            handle_error(&e);
            CommandResult::failure(e.to_string(), reply(error_to_status_code(&e), &e.to_string()))
        }
    }
}

fn handle_cmd_unknown() -> CommandResult {
    CommandResult::failure(
        "Unknown command",
        reply(responses::UNKNOWN_COMMAND, "Unknown command"),
    )
}
