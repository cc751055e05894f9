use std::path::Path;

use rede::config::{Config, LoggingConfig, StorageConfig};
use rede::facade::Facade;
use rede::storage::SnapshotStore;

fn test_config(dir: &Path) -> Config {
    Config {
        storage: StorageConfig {
            data_file: dir.join("rede.snapshot").to_string_lossy().into_owned(),
        },
        logging: LoggingConfig {
            level: "error".into(),
            file: None,
        },
    }
}

#[tokio::test]
async fn write_through_state_survives_reopen() {
    let tmp = tempfile::tempdir().unwrap();
    let config = test_config(tmp.path());
    let token;
    {
        let mut facade = Facade::open(&config).await.unwrap();
        facade.register("jose", "segredo", "Jose Santos").await.unwrap();
        facade.register("maria", "senha", "Maria Silva").await.unwrap();
        token = facade.login("jose", "segredo").await.unwrap();
        facade.request_friend(&token, "maria").await.unwrap();
        let maria = facade.login("maria", "senha").await.unwrap();
        facade.request_friend(&maria, "jose").await.unwrap();
    }
    // Fresh facade over the same snapshot file
    let facade = Facade::open(&config).await.unwrap();
    assert_eq!(facade.graph().user_count(), 2, "users did not survive reopen");
    assert!(
        facade.is_friend("jose", "maria").unwrap(),
        "friendship did not survive reopen"
    );
    // Session tokens are part of the snapshot too
    assert_eq!(facade.session_user(&token).unwrap(), "jose");
}

#[tokio::test]
async fn queued_messages_survive_reopen() {
    let tmp = tempfile::tempdir().unwrap();
    let config = test_config(tmp.path());
    {
        let mut facade = Facade::open(&config).await.unwrap();
        facade.register("jose", "segredo", "Jose Santos").await.unwrap();
        facade.register("maria", "senha", "Maria Silva").await.unwrap();
        let jose = facade.login("jose", "segredo").await.unwrap();
        facade.send_message(&jose, "maria", "ate amanha").await.unwrap();
    }
    let mut facade = Facade::open(&config).await.unwrap();
    let maria = facade.login("maria", "senha").await.unwrap();
    assert_eq!(facade.read_message(&maria).await.unwrap(), "ate amanha");
}

#[tokio::test]
async fn corrupt_snapshot_starts_empty() {
    let tmp = tempfile::tempdir().unwrap();
    let config = test_config(tmp.path());
    tokio::fs::write(&config.storage.data_file, b"garbage bytes")
        .await
        .unwrap();
    let facade = Facade::open(&config).await.unwrap();
    assert_eq!(
        facade.graph().user_count(),
        0,
        "a corrupt snapshot must not brick startup"
    );
}

#[tokio::test]
async fn reset_clears_state_and_removes_the_snapshot() {
    let tmp = tempfile::tempdir().unwrap();
    let config = test_config(tmp.path());
    let mut facade = Facade::open(&config).await.unwrap();
    facade.register("jose", "segredo", "Jose Santos").await.unwrap();
    facade.reset().await.unwrap();

    assert_eq!(facade.graph().user_count(), 0);
    let store = SnapshotStore::new(&config.storage.data_file);
    assert!(
        store.file_size().is_none(),
        "snapshot file should be removed by reset"
    );

    // A reopen after reset starts from nothing
    let reopened = Facade::open(&config).await.unwrap();
    assert_eq!(reopened.graph().user_count(), 0);
}

#[tokio::test]
async fn consumed_messages_stay_consumed_after_reopen() {
    let tmp = tempfile::tempdir().unwrap();
    let config = test_config(tmp.path());
    let maria;
    {
        let mut facade = Facade::open(&config).await.unwrap();
        facade.register("jose", "segredo", "Jose Santos").await.unwrap();
        facade.register("maria", "senha", "Maria Silva").await.unwrap();
        let jose = facade.login("jose", "segredo").await.unwrap();
        maria = facade.login("maria", "senha").await.unwrap();
        facade.send_message(&jose, "maria", "uma so").await.unwrap();
        assert_eq!(facade.read_message(&maria).await.unwrap(), "uma so");
    }
    let mut facade = Facade::open(&config).await.unwrap();
    assert!(
        facade.read_message(&maria).await.is_err(),
        "a consumed message must not reappear after reopen"
    );
}
