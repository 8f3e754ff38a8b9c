use crate::config::{Credentials, Settings};
use crate::store::{
    FileConfig, FileStore, PrivxStore, STORE_REGISTRY, SecretStore, stores,
};
use crate::PrivxError;
use privx_secrets_core::Value;
use std::convert::TryFrom;
use std::fs;
use tempfile::TempDir;
use url::Url;

fn settings(endpoint: &str) -> Settings {
    Settings {
        endpoint: Url::parse(endpoint).unwrap(),
        certificate: None,
        credentials: Credentials::default(),
    }
}

fn file_settings(dir: &TempDir) -> Settings {
    Settings {
        endpoint: Url::from_directory_path(dir.path()).unwrap(),
        certificate: None,
        credentials: Credentials::default(),
    }
}

#[test]
fn test_registry_lists_all_stores() {
    let names: Vec<_> = stores().into_iter().map(|info| info.name).collect();
    assert!(names.contains(&"privx"));
    assert!(names.contains(&"file"));
}

#[test]
fn test_store_info_display() {
    let info = stores()
        .into_iter()
        .find(|info| info.name == "file")
        .unwrap();
    assert_eq!(
        info.display_with_examples(),
        "file: Directory of JSON secret documents (read-only) (e.g., file:///var/lib/privx-secrets)"
    );
}

#[test]
fn test_registry_entries_match_store_info() {
    for registration in STORE_REGISTRY.iter() {
        assert!(!registration.schemes.is_empty());
    }
    let infos: Vec<_> = STORE_REGISTRY.iter().map(|reg| reg.info.name).collect();
    assert!(infos.contains(&PrivxStore::INFO.name));
    assert!(infos.contains(&FileStore::INFO.name));

    let dir = TempDir::new().unwrap();
    let store = Box::<dyn SecretStore>::try_from(&file_settings(&dir)).unwrap();
    assert_eq!(store.name(), FileStore::INFO.name);
}

#[test]
fn test_https_endpoint_selects_privx() {
    let store = Box::<dyn SecretStore>::try_from(&settings("https://privx.example.com")).unwrap();
    assert_eq!(store.name(), "privx");

    let store = Box::<dyn SecretStore>::try_from(&settings("http://localhost:8080")).unwrap();
    assert_eq!(store.name(), "privx");
}

#[test]
fn test_file_endpoint_selects_file_store() {
    let dir = TempDir::new().unwrap();
    let store = Box::<dyn SecretStore>::try_from(&file_settings(&dir)).unwrap();
    assert_eq!(store.name(), "file");
}

#[test]
fn test_unknown_scheme() {
    let result = Box::<dyn SecretStore>::try_from(&settings("ftp://vault.example.com"));
    match result {
        Err(PrivxError::StoreNotFound(scheme)) => assert_eq!(scheme, "ftp"),
        Err(e) => panic!("Expected StoreNotFound error, got {}", e),
        Ok(_) => panic!("Expected StoreNotFound error"),
    }
}

#[test]
fn test_file_store_requires_existing_directory() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing");
    let result = FileStore::new(FileConfig { root: missing });
    assert!(matches!(result, Err(PrivxError::StoreOperationFailed(_))));
}

#[test]
fn test_file_config_rejects_other_schemes() {
    let url = Url::parse("https://privx.example.com").unwrap();
    assert!(FileConfig::try_from(&url).is_err());
}

#[test]
fn test_file_store_fetch() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("secret.json"),
        r#"{"data": {"user": "alice", "pass": "s3cr3t"}, "author": "admin"}"#,
    )
    .unwrap();

    let store = FileStore::new(FileConfig {
        root: dir.path().to_path_buf(),
    })
    .unwrap();
    let document = store.fetch("secret").unwrap();

    assert_eq!(
        document["data"].get("user"),
        Some(&Value::from("alice"))
    );
    assert_eq!(document["author"], Value::from("admin"));
}

#[test]
fn test_file_store_missing_secret() {
    let dir = TempDir::new().unwrap();
    let store = FileStore::new(FileConfig {
        root: dir.path().to_path_buf(),
    })
    .unwrap();

    match store.fetch("nope") {
        Err(PrivxError::SecretNotFound(name)) => assert_eq!(name, "nope"),
        other => panic!("Expected SecretNotFound, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_file_store_rejects_path_names() {
    let dir = TempDir::new().unwrap();
    let store = FileStore::new(FileConfig {
        root: dir.path().to_path_buf(),
    })
    .unwrap();

    for name in ["../etc/passwd", "a/b", "..", ""] {
        assert!(
            matches!(store.fetch(name), Err(PrivxError::StoreOperationFailed(_))),
            "name {:?} should be rejected",
            name
        );
    }
}

#[test]
fn test_file_store_invalid_json() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("broken.json"), "{ not json").unwrap();
    let store = FileStore::new(FileConfig {
        root: dir.path().to_path_buf(),
    })
    .unwrap();

    assert!(matches!(store.fetch("broken"), Err(PrivxError::Json(_))));
}

#[test]
fn test_file_store_authenticate_is_noop() {
    let dir = TempDir::new().unwrap();
    let store = Box::<dyn SecretStore>::try_from(&file_settings(&dir)).unwrap();
    assert!(store.authenticate().is_ok());
}
