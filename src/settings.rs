use crate::session::AdminCredential;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{env, fs, io};

pub const SETTINGS_FILENAME: &str = "settings.json";

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("cannot read settings file {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("cannot parse settings file {path}: {source}")]
    Parse { path: PathBuf, source: serde_json::Error },
    #[error("{var} is not a valid value: {value}")]
    Env { var: &'static str, value: String },
}

/// Runtime settings shared by the server and the CLI.
///
/// Every field has a default, so a missing `settings.json` or a partial
/// one is fine.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub tcp_socket_binding: String,
    pub tcp_socket_port: u16,
    /// JSON document the server persists into.
    pub data_path: PathBuf,
    /// Base URL of the REST server for the client. Empty means local-only.
    pub api_base: String,
    pub request_timeout_ms: u64,
    /// redb file the client falls back to.
    pub local_store_path: PathBuf,
    pub namespace: String,
    /// Enforce the task lifecycle on status changes.
    pub strict_status: bool,
    pub admin: AdminCredential,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            tcp_socket_binding: "0.0.0.0".into(),
            tcp_socket_port: 3000,
            data_path: PathBuf::from("data.json"),
            api_base: "http://localhost:3000".into(),
            request_timeout_ms: 3000,
            local_store_path: PathBuf::from("smartoffice.redb"),
            namespace: "smartoffice".into(),
            strict_status: false,
            admin: AdminCredential::default(),
        }
    }
}

impl Settings {
    /// `settings.json` from the working directory, then the environment.
    pub fn load() -> Result<Settings, SettingsError> {
        Settings::load_from(SETTINGS_FILENAME)?.with_env_overrides()
    }

    /// Read a settings file. A missing file yields the defaults.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Settings, SettingsError> {
        let path = path.as_ref();
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no settings file, using defaults");
                return Ok(Settings::default());
            }
            Err(source) => {
                return Err(SettingsError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        serde_json::from_str(&content).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply `PORT`, `SMARTOFFICE_API_BASE` and `SMARTOFFICE_DATA_PATH`.
    pub fn with_env_overrides(self) -> Result<Settings, SettingsError> {
        self.with_overrides(|var| env::var(var).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Settings, SettingsError> {
        if let Some(port) = lookup("PORT") {
            self.tcp_socket_port = port.trim().parse().map_err(|_| SettingsError::Env {
                var: "PORT",
                value: port,
            })?;
        }
        if let Some(base) = lookup("SMARTOFFICE_API_BASE") {
            self.api_base = base;
        }
        if let Some(path) = lookup("SMARTOFFICE_DATA_PATH") {
            self.data_path = PathBuf::from(path);
        }
        Ok(self)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.tcp_socket_binding, self.tcp_socket_port)
    }

    /// `None` when the client should run local-only.
    pub fn api_base(&self) -> Option<&str> {
        Some(self.api_base.trim()).filter(|base| !base.is_empty())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}
