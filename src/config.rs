//! Configuration management for the invoice store
//!
//! Settings come from an optional `config.toml`, then environment variables
//! prefixed with `INVOICE_STORE_` (nested keys separated by `__`, e.g.
//! `INVOICE_STORE_STORE__PUBLIC_DOMAIN`). Values are read once at startup and
//! handed to the file store explicitly.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;

use crate::naming::{DEFAULT_ALPHABET, DEFAULT_MAX_ATTEMPTS, FILE_NAME_LENGTH, NamingPolicy};

const DEFAULT_CONFIG_PATH: &str = "config";
const ENV_PREFIX: &str = "INVOICE_STORE";

/// Complete service configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    pub store: StoreSettings,
    pub server: ServerSettings,
}

/// Which storage backend the store writes to
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageDriver {
    Local,
    Memory,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StoreSettings {
    pub storage_driver: StorageDriver,

    /// Root directory for the `local` driver
    pub storage_root: String,

    /// Base of the public URLs handed back to clients
    pub public_domain: String,

    /// Ledger file for the name registry; in-memory registry when absent
    pub registry_path: Option<String>,

    pub name_length: usize,
    pub max_name_attempts: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub bind_address: String,
    pub port: u16,
    pub max_upload_size_mb: u64,
    pub max_clients: usize,
}

/// Explicit configuration a file store is constructed with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub storage_driver: StorageDriver,
    pub public_domain: String,
}

impl ServiceConfig {
    /// Load configuration from ./config.toml with environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// Load configuration from the given file (extension optional) with
    /// environment overrides. A missing file falls back to the defaults.
    pub fn load_from(config_path: &str) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .set_default("store.storage_driver", "local")?
            .set_default("store.storage_root", "./storage")?
            .set_default("store.public_domain", "http://localhost")?
            .set_default("store.name_length", FILE_NAME_LENGTH as i64)?
            .set_default("store.max_name_attempts", DEFAULT_MAX_ATTEMPTS as i64)?
            .set_default("server.bind_address", "127.0.0.1")?
            .set_default("server.port", 2180_i64)?
            .set_default("server.max_upload_size_mb", 20_i64)?
            .set_default("server.max_clients", 64_i64)?
            .add_source(File::with_name(config_path).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let config: ServiceConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validation for all configuration values
    fn validate(&self) -> Result<(), ConfigError> {
        if self.store.public_domain.is_empty() {
            return Err(ConfigError::Message("public_domain cannot be empty".into()));
        }

        if self.store.storage_driver == StorageDriver::Local && self.store.storage_root.is_empty()
        {
            return Err(ConfigError::Message(
                "storage_root cannot be empty for the local driver".into(),
            ));
        }

        if self.store.name_length == 0 {
            return Err(ConfigError::Message(
                "name_length must be greater than 0".into(),
            ));
        }

        if self.store.max_name_attempts == 0 {
            return Err(ConfigError::Message(
                "max_name_attempts must be greater than 0".into(),
            ));
        }

        if self.server.port == 0 {
            return Err(ConfigError::Message("port cannot be 0".into()));
        }

        if self.server.max_clients == 0 {
            return Err(ConfigError::Message(
                "max_clients must be greater than 0".into(),
            ));
        }

        if self.server.max_upload_size_mb == 0 {
            return Err(ConfigError::Message(
                "max_upload_size_mb must be greater than 0".into(),
            ));
        }

        Ok(())
    }
}

impl StoreSettings {
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            storage_driver: self.storage_driver,
            public_domain: self.public_domain.clone(),
        }
    }

    pub fn naming_policy(&self) -> NamingPolicy {
        NamingPolicy {
            length: self.name_length,
            alphabet: DEFAULT_ALPHABET.to_string(),
            max_attempts: self.max_name_attempts,
        }
    }

    pub fn storage_root_path(&self) -> PathBuf {
        PathBuf::from(&self.storage_root)
    }
}

impl ServerSettings {
    /// Bind address and port as a socket address string
    pub fn listen_socket(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    pub fn max_upload_size_bytes(&self) -> u64 {
        self.max_upload_size_mb * 1024 * 1024
    }
}
