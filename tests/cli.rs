mod common;

use common::{TestFixture, stderr, stdout};

fn fixture() -> TestFixture {
    TestFixture::new().with_secret(
        "secret",
        serde_json::json!({
            "data": {
                "user": "alice",
                "pass": "s3cr3t",
                "db": { "host": "h", "port": "5432" }
            },
            "author": "admin"
        }),
    )
}

#[test]
fn test_get_assignment() {
    let output = fixture().run(&["get", "cred=secret.user"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "cred=\"alice\"\n");
}

#[test]
fn test_get_display() {
    let output = fixture().run(&["get", "secret.pass"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "s3cr3t\n");
}

#[test]
fn test_get_bourne_spread() {
    let output = fixture().run(&["get", "-s", "--spread", "cred=secret.db"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let out = stdout(&output);
    let mut lines: Vec<_> = out.lines().collect();
    lines.sort();
    assert_eq!(
        lines,
        [
            "cred_host=\"h\"; export cred_host;",
            "cred_port=\"5432\"; export cred_port;",
        ]
    );
}

#[test]
fn test_get_cshell() {
    let output = fixture().run(&["get", "-c", "U=secret.user"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "setenv U \"alice\"\n");
}

#[test]
fn test_get_with_single_dash_separator() {
    let output = fixture().run(&["get", "-separator", "/", "secret/db/port"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "5432\n");
}

#[test]
fn test_get_several_keys_in_order() {
    let output = fixture().run(&["get", "-s", "U=secret.user", "P=secret.pass"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(
        stdout(&output),
        "U=\"alice\"; export U;\nP=\"s3cr3t\"; export P;\n"
    );
}

#[test]
fn test_get_missing_element_fails() {
    let output = fixture().run(&["get", "secret.missing"]);
    assert!(!output.status.success());
    assert!(stdout(&output).is_empty());
    assert!(stderr(&output).contains("secret.missing"));
}

#[test]
fn test_get_cshell_wins_over_bourne() {
    let output = fixture().run(&["get", "-c", "-s", "U=secret.user"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "setenv U \"alice\"\n");
}

#[test]
fn test_get_spread_without_name_fails() {
    let output = fixture().run(&["get", "--spread", "secret.db"]);
    assert!(!output.status.success());
    assert!(stdout(&output).is_empty());
}

#[test]
fn test_missing_config_file_fails() {
    let fixture = fixture();
    std::fs::remove_file(&fixture.config_path).unwrap();
    let output = fixture.run(&["get", "secret.user"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("failed to read config file"));
}

#[test]
fn test_login_with_file_store() {
    let output = fixture().run(&["login"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output).trim(), "ok");
}

#[test]
fn test_stores_lists_registered_stores() {
    let output = fixture().run(&["stores"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("privx:"));
    assert!(out.contains("file:"));
}
