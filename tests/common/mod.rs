use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;
use url::Url;

/// A directory of secret documents plus a config file pointing at it
pub struct TestFixture {
    _temp_dir: TempDir,
    pub secrets_dir: PathBuf,
    pub config_path: PathBuf,
}

impl TestFixture {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let secrets_dir = temp_dir.path().join("vault");
        fs::create_dir_all(&secrets_dir).unwrap();

        let endpoint = Url::from_directory_path(&secrets_dir).unwrap();
        let config_path = temp_dir.path().join("privx-secrets.toml");
        fs::write(
            &config_path,
            format!("[api]\nendpoint = \"{}\"\n", endpoint),
        )
        .unwrap();

        Self {
            _temp_dir: temp_dir,
            secrets_dir,
            config_path,
        }
    }

    /// Stores `json` as the secret document `name`
    pub fn with_secret(self, name: &str, json: serde_json::Value) -> Self {
        fs::write(
            self.secrets_dir.join(format!("{}.json", name)),
            serde_json::to_string_pretty(&json).unwrap(),
        )
        .unwrap();
        self
    }

    /// Runs the binary with `--config` pointing at this fixture
    pub fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_privx-secrets"))
            .arg("--config")
            .arg(&self.config_path)
            .args(args)
            .env_remove("PRIVX_SECRETS_CONFIG")
            .env_remove("RUST_LOG")
            .env("NO_COLOR", "1")
            .output()
            .unwrap()
    }
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8(output.stderr.clone()).unwrap()
}
