use std::collections::{HashSet, VecDeque};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use invoice_store::config::{StorageDriver, StoreConfig};
use invoice_store::error::{RegistryError, StorageError, StoreError};
use invoice_store::naming::{NameSource, NamingPolicy};
use invoice_store::registry::{InMemoryRegistry, NameRegistry};
use invoice_store::storage::{InMemoryBackend, LocalDiskBackend, StorageBackend, UploadedFile};
use invoice_store::store::SaveRejection;
use invoice_store::{FileStore, InvoiceProfile, SaveOutcome};
use tempfile::tempdir;

// Test doubles

/// Hands out a fixed sequence of base names.
struct ScriptedNames {
    names: Mutex<VecDeque<String>>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedNames {
    fn new(names: &[&str]) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let source = Self {
            names: Mutex::new(names.iter().map(|n| n.to_string()).collect()),
            calls: Arc::clone(&calls),
        };
        (source, calls)
    }
}

impl NameSource for ScriptedNames {
    fn generate(&self, _length: usize, _alphabet: &str) -> String {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.names
            .lock()
            .unwrap()
            .pop_front()
            .expect("name generator should not be called")
    }
}

#[derive(Default)]
struct RecordingBackend {
    inner: InMemoryBackend,
    /// Accept writes without storing them
    lose_writes: bool,
    fail_writes: bool,
    fail_deletes: bool,
    /// (path, already present) for every write
    puts: Mutex<Vec<(String, bool)>>,
    deletes: AtomicUsize,
}

impl StorageBackend for RecordingBackend {
    fn exists(&self, path: &str) -> Result<bool, StorageError> {
        self.inner.exists(path)
    }

    fn put(&self, path: &str, contents: &[u8]) -> Result<(), StorageError> {
        let present = self.inner.exists(path)?;
        self.puts.lock().unwrap().push((path.to_string(), present));
        if self.fail_writes {
            return Err(StorageError::IoError(std::io::Error::other("disk full")));
        }
        if self.lose_writes {
            return Ok(());
        }
        self.inner.put(path, contents)
    }

    fn get(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        self.inner.get(path)
    }

    fn delete(&self, path: &str) -> Result<(), StorageError> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        if self.fail_deletes {
            return Err(StorageError::IoError(std::io::Error::other("read-only")));
        }
        self.inner.delete(path)
    }
}

#[derive(Default)]
struct CountingRegistry {
    inner: InMemoryRegistry,
    queries: AtomicUsize,
    unavailable: bool,
}

impl NameRegistry for CountingRegistry {
    fn count_by_name(&self, name: &str) -> Result<u64, RegistryError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        if self.unavailable {
            return Err(RegistryError::Unavailable("connection refused".into()));
        }
        self.inner.count_by_name(name)
    }

    fn record(&self, name: &str) -> Result<(), RegistryError> {
        self.inner.record(name)
    }
}

fn store_config() -> StoreConfig {
    StoreConfig {
        storage_driver: StorageDriver::Memory,
        public_domain: "https://files.example.com".into(),
    }
}

fn store_with(
    backend: Arc<RecordingBackend>,
    registry: Arc<CountingRegistry>,
) -> FileStore<InvoiceProfile> {
    FileStore::new(InvoiceProfile::new(backend, registry), store_config())
}

fn invoice() -> UploadedFile {
    UploadedFile::new("invoice.pdf", b"%PDF-1.7".to_vec())
}

// Uniqueness

#[test]
fn test_accepted_names_are_distinct_and_were_free() {
    let backend = Arc::new(RecordingBackend::default());
    let registry = Arc::new(CountingRegistry::default());
    let store = store_with(Arc::clone(&backend), Arc::clone(&registry));

    let mut accepted = HashSet::new();
    for _ in 0..50 {
        let name = store.save_file(&invoice(), "").unwrap().into_name().unwrap();
        assert_eq!(registry.count_by_name(&name).unwrap(), 0);
        registry.record(&name).unwrap();
        assert!(accepted.insert(name));
    }

    let puts = backend.puts.lock().unwrap();
    assert_eq!(puts.len(), 50);
    assert!(puts.iter().all(|(_, present)| !present));
}

#[test]
fn test_small_name_space_fills_without_reuse() {
    let backend = Arc::new(RecordingBackend::default());
    let registry = Arc::new(CountingRegistry::default());
    let store = store_with(Arc::clone(&backend), Arc::clone(&registry)).with_naming(NamingPolicy {
        length: 3,
        alphabet: "ab".into(),
        max_attempts: 2_000,
    });

    // Half of the 8 names are taken in storage, the other half in the registry
    let mut accepted = HashSet::new();
    for i in 0..8 {
        let name = store.save_file(&invoice(), "").unwrap().into_name().unwrap();
        if i % 2 == 0 {
            registry.record(&name).unwrap();
            assert!(store.delete(&name));
        }
        assert!(accepted.insert(name));
    }
    assert_eq!(accepted.len(), 8);

    match store.save_file(&invoice(), "") {
        Err(StoreError::NameSpaceExhausted { .. }) => {}
        other => panic!("expected exhausted name space, got {:?}", other),
    }
}

#[test]
fn test_concurrent_saves_get_distinct_names() {
    let backend = Arc::new(RecordingBackend::default());
    let registry = Arc::new(CountingRegistry::default());
    let store = Arc::new(store_with(Arc::clone(&backend), registry));

    let names: Vec<String> = thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                scope.spawn(move || {
                    (0..25)
                        .map(|_| store.save_file(&invoice(), "").unwrap().into_name().unwrap())
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        handles.into_iter().flat_map(|h| h.join().unwrap()).collect()
    });

    let distinct: HashSet<&String> = names.iter().collect();
    assert_eq!(distinct.len(), 200);
    assert_eq!(backend.inner.paths().len(), 200);
}

// Retry on collision

#[test]
fn test_storage_collisions_skip_to_next_candidate() {
    let backend = Arc::new(RecordingBackend::default());
    for taken in ["c0", "c1", "c2"] {
        backend
            .inner
            .put(&format!("user_invoices/{}.pdf", taken), b"old")
            .unwrap();
    }
    let registry = Arc::new(CountingRegistry::default());
    let (source, calls) = ScriptedNames::new(&["c0", "c1", "c2", "c3", "c4"]);
    let store = store_with(Arc::clone(&backend), registry).with_name_source(Box::new(source));

    let outcome = store.save_file(&invoice(), "").unwrap();
    assert_eq!(outcome, SaveOutcome::Accepted("c3.pdf".into()));
    assert_eq!(calls.load(Ordering::SeqCst), 4);
    assert_eq!(store.get("c0.pdf").unwrap(), b"old");
}

#[test]
fn test_registry_collision_draws_a_new_name() {
    let backend = Arc::new(RecordingBackend::default());
    let registry = Arc::new(CountingRegistry::default());
    registry.record("r0.pdf").unwrap();
    let (source, calls) = ScriptedNames::new(&["r0", "r1"]);
    let store =
        store_with(backend, Arc::clone(&registry)).with_name_source(Box::new(source));

    let outcome = store.save_file(&invoice(), "").unwrap();
    assert_eq!(outcome.name(), Some("r1.pdf"));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(registry.queries.load(Ordering::SeqCst), 2);
}

#[test]
fn test_registry_outage_propagates() {
    let backend = Arc::new(RecordingBackend::default());
    let registry = Arc::new(CountingRegistry {
        unavailable: true,
        ..CountingRegistry::default()
    });
    let store = store_with(Arc::clone(&backend), registry);

    assert!(matches!(
        store.save_file(&invoice(), ""),
        Err(StoreError::Registry(RegistryError::Unavailable(_)))
    ));
    assert!(backend.puts.lock().unwrap().is_empty());
}

// Verification gate

#[test]
fn test_lost_write_is_rejected() {
    let backend = Arc::new(RecordingBackend {
        lose_writes: true,
        ..RecordingBackend::default()
    });
    let store = store_with(Arc::clone(&backend), Arc::new(CountingRegistry::default()));

    let outcome = store.save_file(&invoice(), "").unwrap();
    assert_eq!(outcome, SaveOutcome::Rejected(SaveRejection::VerificationFailed));
    assert_eq!(outcome.name(), None);
    assert_eq!(backend.puts.lock().unwrap().len(), 1);
}

#[test]
fn test_failed_write_is_rejected() {
    let backend = Arc::new(RecordingBackend {
        fail_writes: true,
        ..RecordingBackend::default()
    });
    let store = store_with(backend, Arc::new(CountingRegistry::default()));

    assert_eq!(
        store.save_file(&invoice(), "custom.pdf").unwrap(),
        SaveOutcome::Rejected(SaveRejection::WriteFailed)
    );
}

// Idempotent delete

#[test]
fn test_delete_image_semantics() {
    let backend = Arc::new(RecordingBackend::default());
    let store = store_with(Arc::clone(&backend), Arc::new(CountingRegistry::default()));

    assert!(store.delete_image(""));
    assert!(store.delete_image("missing.pdf"));
    assert_eq!(backend.deletes.load(Ordering::SeqCst), 0);

    assert!(store.put("present.pdf", b"x"));
    assert!(store.delete_image("present.pdf"));
    assert_eq!(backend.deletes.load(Ordering::SeqCst), 1);
    assert!(!store.exists("present.pdf").unwrap());
}

#[test]
fn test_delete_image_reports_backend_failure() {
    let backend = Arc::new(RecordingBackend {
        fail_deletes: true,
        ..RecordingBackend::default()
    });
    let store = store_with(Arc::clone(&backend), Arc::new(CountingRegistry::default()));

    assert!(store.put("stuck.pdf", b"x"));
    assert!(!store.delete_image("stuck.pdf"));
    assert_eq!(backend.deletes.load(Ordering::SeqCst), 1);
}

// Explicit-name bypass

#[test]
fn test_explicit_name_skips_resolution() {
    let backend = Arc::new(RecordingBackend::default());
    let registry = Arc::new(CountingRegistry::default());
    let (source, calls) = ScriptedNames::new(&[]);
    let store = store_with(Arc::clone(&backend), Arc::clone(&registry))
        .with_name_source(Box::new(source));

    let outcome = store.save_file(&invoice(), "custom.pdf").unwrap();
    assert_eq!(outcome, SaveOutcome::Accepted("custom.pdf".into()));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(registry.queries.load(Ordering::SeqCst), 0);
    assert_eq!(
        backend.puts.lock().unwrap().as_slice(),
        &[("user_invoices/custom.pdf".to_string(), false)]
    );
}

// URL construction

#[test]
fn test_uri_path() {
    let store = store_with(
        Arc::new(RecordingBackend::default()),
        Arc::new(CountingRegistry::default()),
    );
    assert_eq!(
        store.get_uri_path("abc.pdf"),
        "https://files.example.com/user_invoices/abc.pdf"
    );
}

// Disk backend end to end

#[test]
fn test_save_to_local_disk() {
    let dir = tempdir().unwrap();
    let backend = Arc::new(LocalDiskBackend::new(dir.path()).unwrap());
    let store = FileStore::new(
        InvoiceProfile::new(backend, Arc::new(InMemoryRegistry::new())),
        StoreConfig {
            storage_driver: StorageDriver::Local,
            public_domain: "https://files.example.com".into(),
        },
    );

    let name = store.save_file(&invoice(), "").unwrap().into_name().unwrap();
    let on_disk: PathBuf = dir.path().join("user_invoices").join(&name);
    assert_eq!(store.file_path(&name), Some(on_disk.clone()));
    assert_eq!(std::fs::read(&on_disk).unwrap(), b"%PDF-1.7");

    assert!(store.delete_image(&name));
    assert!(!on_disk.exists());
}

#[test]
fn test_local_disk_stat_failures_surface() {
    let dir = tempdir().unwrap();
    let backend = Arc::new(LocalDiskBackend::new(dir.path()).unwrap());
    // Base names longer than a single path component may be
    let store = FileStore::new(
        InvoiceProfile::new(backend, Arc::new(InMemoryRegistry::new())),
        StoreConfig {
            storage_driver: StorageDriver::Local,
            public_domain: "https://files.example.com".into(),
        },
    )
    .with_naming(NamingPolicy {
        length: 300,
        ..NamingPolicy::default()
    });

    assert!(matches!(
        store.save_file(&invoice(), ""),
        Err(StoreError::Storage(StorageError::IoError(_)))
    ));

    let unreadable = format!("{}.pdf", "a".repeat(300));
    assert!(!store.delete_image(&unreadable));
}
