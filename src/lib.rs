pub mod config;
pub mod error;
pub mod naming;
pub mod protocol;
pub mod registry;
pub mod server;
pub mod storage;
pub mod store;

pub use server::Server;
pub use store::{FileStore, InvoiceProfile, SaveOutcome, StorageProfile};
