use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;
use shared::error::ConfigError;
use ssh_transport::{SshOptions, SshTarget, DEFAULT_SSH_PORT};

pub const DEFAULT_CONFIG_FILE: &str = "fanshell.toml";
const ENV_PREFIX: &str = "FANSHELL_";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub ssh_port: u16,
    pub connect_timeout_seconds: u64,
    /// Zero disables keepalives.
    pub keepalive_seconds: u64,
    pub scroll_step: u16,
    pub log_file: PathBuf,
    pub log_filter: String,
    pub command_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ssh_port: DEFAULT_SSH_PORT,
            connect_timeout_seconds: 10,
            keepalive_seconds: 30,
            scroll_step: 5,
            log_file: PathBuf::from("fanshell.log"),
            log_filter: "info".into(),
            command_dir: None,
        }
    }
}

impl Settings {
    pub fn ssh_options(&self) -> SshOptions {
        SshOptions {
            connect_timeout: Duration::from_secs(self.connect_timeout_seconds),
            keepalive_interval: (self.keepalive_seconds > 0)
                .then(|| Duration::from_secs(self.keepalive_seconds)),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    ssh_port: Option<u16>,
    connect_timeout_seconds: Option<u64>,
    keepalive_seconds: Option<u64>,
    scroll_step: Option<u16>,
    log_file: Option<PathBuf>,
    log_filter: Option<String>,
    command_dir: Option<PathBuf>,
}

/// Defaults, then the TOML file, then `FANSHELL_*` environment variables.
///
/// An explicitly named config file must exist; the default one is optional.
pub fn load_settings(config_path: Option<&Path>) -> Result<Settings, ConfigError> {
    let mut settings = Settings::default();

    let (path, required) = match config_path {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
    };
    match fs::read_to_string(&path) {
        Ok(raw) => apply_file(&mut settings, &path, &raw)?,
        Err(error) if required => {
            return Err(ConfigError::Settings {
                path,
                reason: error.to_string(),
            })
        }
        Err(_) => {}
    }

    apply_env(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

fn apply_file(settings: &mut Settings, path: &Path, raw: &str) -> Result<(), ConfigError> {
    let file_cfg: FileSettings = toml::from_str(raw).map_err(|error| ConfigError::Settings {
        path: path.to_path_buf(),
        reason: error.to_string(),
    })?;

    if let Some(v) = file_cfg.ssh_port {
        settings.ssh_port = v;
    }
    if let Some(v) = file_cfg.connect_timeout_seconds {
        settings.connect_timeout_seconds = v;
    }
    if let Some(v) = file_cfg.keepalive_seconds {
        settings.keepalive_seconds = v;
    }
    if let Some(v) = file_cfg.scroll_step {
        settings.scroll_step = v;
    }
    if let Some(v) = file_cfg.log_file {
        settings.log_file = v;
    }
    if let Some(v) = file_cfg.log_filter {
        settings.log_filter = v;
    }
    if file_cfg.command_dir.is_some() {
        settings.command_dir = file_cfg.command_dir;
    }
    Ok(())
}

fn apply_env(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    let var = |name: &str| lookup(&format!("{ENV_PREFIX}{name}"));

    if let Some(v) = var("SSH_PORT").and_then(|v| v.parse().ok()) {
        settings.ssh_port = v;
    }
    if let Some(v) = var("CONNECT_TIMEOUT_SECONDS").and_then(|v| v.parse().ok()) {
        settings.connect_timeout_seconds = v;
    }
    if let Some(v) = var("KEEPALIVE_SECONDS").and_then(|v| v.parse().ok()) {
        settings.keepalive_seconds = v;
    }
    if let Some(v) = var("SCROLL_STEP").and_then(|v| v.parse().ok()) {
        settings.scroll_step = v;
    }
    if let Some(v) = var("LOG_FILE") {
        settings.log_file = PathBuf::from(v);
    }
    if let Some(v) = var("LOG_FILTER") {
        settings.log_filter = v;
    }
    if let Some(v) = var("COMMAND_DIR") {
        settings.command_dir = Some(PathBuf::from(v));
    }
}

/// Reads the login file. Line order becomes connection order.
pub fn parse_login_file(path: &Path, default_port: u16) -> Result<Vec<SshTarget>, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::ReadLoginFile {
        path: path.to_path_buf(),
        source,
    })?;

    let mut targets = Vec::new();
    for (index, line) in raw.lines().enumerate() {
        if let Some(target) = parse_login_line(index + 1, line, default_port)? {
            targets.push(target);
        }
    }

    if targets.is_empty() {
        return Err(ConfigError::NoConnections {
            path: path.to_path_buf(),
        });
    }
    Ok(targets)
}

/// Parses `<credential-file-path> <host>[:port] <username>`. Blank lines
/// yield `None`.
pub fn parse_login_line(
    line_number: usize,
    line: &str,
    default_port: u16,
) -> Result<Option<SshTarget>, ConfigError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.is_empty() {
        return Ok(None);
    }
    let [credential, host, username] = fields[..] else {
        return Err(ConfigError::MalformedLogin {
            line: line_number,
            reason: format!(
                "expected `<credential-file-path> <host> <username>`, found {} field(s)",
                fields.len()
            ),
        });
    };

    let (host, port) = split_host_port(host, default_port).map_err(|reason| {
        ConfigError::MalformedLogin {
            line: line_number,
            reason,
        }
    })?;

    Ok(Some(SshTarget {
        credential_path: PathBuf::from(credential),
        host,
        port,
        username: username.to_string(),
    }))
}

fn split_host_port(field: &str, default_port: u16) -> Result<(String, u16), String> {
    match field.rsplit_once(':') {
        Some((host, port)) if !host.is_empty() && !host.contains(':') => {
            let port = port
                .parse::<u16>()
                .map_err(|_| format!("invalid port `{port}` in host `{field}`"))?;
            Ok((host.to_string(), port))
        }
        _ => Ok((field.to_string(), default_port)),
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
