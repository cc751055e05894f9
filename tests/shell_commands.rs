use std::path::Path;

use rede::config::{Config, LoggingConfig, StorageConfig};
use rede::facade::Facade;
use rede::shell::Shell;

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

async fn shell(config: &Config) -> Shell {
    Shell::new(Facade::open(config).await.unwrap())
}

async fn run(shell: &mut Shell, line: &str) -> String {
    shell
        .dispatch(line)
        .await
        .unwrap()
        .expect("command should not quit the shell")
}

#[tokio::test]
async fn register_login_whoami_flow() {
    let tmp = tempfile::tempdir().unwrap();
    let config = test_config(tmp.path());
    let mut sh = shell(&config).await;

    assert_eq!(
        run(&mut sh, "register jose segredo Jose Santos").await,
        "Account created."
    );
    assert_eq!(run(&mut sh, "whoami").await, "Not logged in.");
    assert_eq!(run(&mut sh, "login jose segredo").await, "Logged in as jose.");
    assert_eq!(run(&mut sh, "whoami").await, "Logged in as jose.");
    assert_eq!(run(&mut sh, "logout").await, "Logged out.");
    assert_eq!(run(&mut sh, "whoami").await, "Not logged in.");
}

#[tokio::test]
async fn friend_flow_reports_request_then_acceptance() {
    let tmp = tempfile::tempdir().unwrap();
    let config = test_config(tmp.path());
    let mut sh = shell(&config).await;

    run(&mut sh, "register jose segredo Jose Santos").await;
    run(&mut sh, "register maria senha Maria Silva").await;
    run(&mut sh, "login jose segredo").await;
    assert_eq!(
        run(&mut sh, "friend maria").await,
        "Friend request sent to maria."
    );
    run(&mut sh, "login maria senha").await;
    assert_eq!(
        run(&mut sh, "friend jose").await,
        "You are now friends with jose."
    );
    assert_eq!(run(&mut sh, "friends").await, "{jose}");
}

#[tokio::test]
async fn error_sentences_surface_verbatim() {
    let tmp = tempfile::tempdir().unwrap();
    let config = test_config(tmp.path());
    let mut sh = shell(&config).await;

    run(&mut sh, "register jose segredo Jose Santos").await;
    assert_eq!(
        run(&mut sh, "register jose outra Outro Jose").await,
        "An account with this login already exists."
    );
    assert_eq!(
        run(&mut sh, "login jose errado").await,
        "Invalid login or password."
    );
    run(&mut sh, "login jose segredo").await;
    assert_eq!(run(&mut sh, "read").await, "There are no messages.");
}

#[tokio::test]
async fn commands_require_a_session() {
    let tmp = tempfile::tempdir().unwrap();
    let config = test_config(tmp.path());
    let mut sh = shell(&config).await;

    run(&mut sh, "register jose segredo Jose Santos").await;
    for line in ["friend jose", "set city Natal", "read", "crushes", "post x y"] {
        assert_eq!(
            run(&mut sh, line).await,
            "You must log in first.",
            "'{line}' should be rejected while logged out"
        );
    }
}

#[tokio::test]
async fn malformed_input_yields_usage_lines() {
    let tmp = tempfile::tempdir().unwrap();
    let config = test_config(tmp.path());
    let mut sh = shell(&config).await;

    assert_eq!(
        run(&mut sh, "register jose").await,
        "Usage: register <login> <password> <name>"
    );
    assert!(run(&mut sh, "bogus-command").await.starts_with("Unknown command"));
    assert_eq!(run(&mut sh, "").await, "", "blank lines are ignored");
}

#[tokio::test]
async fn community_flow_over_the_shell() {
    let tmp = tempfile::tempdir().unwrap();
    let config = test_config(tmp.path());
    let mut sh = shell(&config).await;

    run(&mut sh, "register jose segredo Jose Santos").await;
    run(&mut sh, "register maria senha Maria Silva").await;
    run(&mut sh, "login jose segredo").await;
    assert_eq!(
        run(&mut sh, "community praia Beach people").await,
        "Community created."
    );
    assert_eq!(
        run(&mut sh, "info praia").await,
        "Beach people (owner: jose)"
    );
    run(&mut sh, "login maria senha").await;
    assert_eq!(run(&mut sh, "join praia").await, "Joined community.");
    assert_eq!(run(&mut sh, "members praia").await, "{jose,maria}");
    assert_eq!(run(&mut sh, "post praia encontro as 9").await, "Broadcast posted.");
    assert_eq!(run(&mut sh, "readpost").await, "encontro as 9");
}

#[tokio::test]
async fn reset_requires_confirmation() {
    let tmp = tempfile::tempdir().unwrap();
    let config = test_config(tmp.path());
    let mut sh = shell(&config).await;

    run(&mut sh, "register jose segredo Jose Santos").await;
    assert_eq!(
        run(&mut sh, "reset").await,
        "Type 'reset yes' to wipe all state."
    );
    assert_eq!(run(&mut sh, "reset yes").await, "All state wiped.");
    assert_eq!(run(&mut sh, "status").await, "0 users, 0 communities, 0 active sessions");
}

#[tokio::test]
async fn delete_account_requires_typing_the_login() {
    let tmp = tempfile::tempdir().unwrap();
    let config = test_config(tmp.path());
    let mut sh = shell(&config).await;

    run(&mut sh, "register jose segredo Jose Santos").await;
    run(&mut sh, "login jose segredo").await;
    assert_eq!(
        run(&mut sh, "delete-account").await,
        "Type 'delete-account jose' to confirm."
    );
    assert_eq!(run(&mut sh, "delete-account jose").await, "Account deleted.");
    assert_eq!(run(&mut sh, "whoami").await, "Not logged in.");
}

#[tokio::test]
async fn quit_ends_the_loop() {
    let tmp = tempfile::tempdir().unwrap();
    let config = test_config(tmp.path());
    let mut sh = shell(&config).await;
    assert!(sh.dispatch("quit").await.unwrap().is_none());
    assert!(sh.dispatch("exit").await.unwrap().is_none());
}
