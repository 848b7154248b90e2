use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::Result;
use async_trait::async_trait;
use russh::{client, ChannelMsg, Disconnect};
use russh_keys::key;
use session_core::{Connection, ExecutionOutput, RemoteExecutor};
use shared::{
    domain::shell_prefix,
    error::{ConfigError, RemoteExecutionError},
};
use tokio::sync::Mutex;
use tracing::{info, warn};

pub const DEFAULT_SSH_PORT: u16 = 22;

/// One line of the login file, resolved to a dialable address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SshTarget {
    pub credential_path: PathBuf,
    pub host: String,
    pub port: u16,
    pub username: String,
}

impl SshTarget {
    pub fn prefix(&self) -> String {
        shell_prefix(&self.username, &self.host)
    }

    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone)]
pub struct SshOptions {
    pub connect_timeout: Duration,
    pub keepalive_interval: Option<Duration>,
}

impl Default for SshOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            keepalive_interval: Some(Duration::from_secs(30)),
        }
    }
}

/// Host keys are accepted without verification.
struct AcceptAnyHostKey {
    host: String,
}

#[async_trait]
impl client::Handler for AcceptAnyHostKey {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        _server_public_key: &key::PublicKey,
    ) -> Result<bool, Self::Error> {
        warn!(host = %self.host, "ssh: accepting host key without verification");
        Ok(true)
    }
}

/// An authenticated SSH connection. Every command runs in its own exec
/// channel, so no shell state carries over between commands.
pub struct SshChannel {
    endpoint: String,
    handle: Mutex<client::Handle<AcceptAnyHostKey>>,
}

impl SshChannel {
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn run(
        &self,
        command: &str,
        output: &mut Vec<u8>,
    ) -> Result<Option<RemoteExecutionError>, russh::Error> {
        let mut channel = self.handle.lock().await.channel_open_session().await?;
        channel.exec(true, command).await?;

        let mut failure = None;
        while let Some(msg) = channel.wait().await {
            match msg {
                ChannelMsg::Data { ref data } => output.extend_from_slice(data),
                ChannelMsg::ExtendedData { ref data, .. } => output.extend_from_slice(data),
                ChannelMsg::ExitStatus { exit_status } if exit_status != 0 => {
                    failure = Some(RemoteExecutionError::NonZeroExit {
                        status: exit_status,
                    });
                }
                ChannelMsg::ExitSignal { signal_name, .. } => {
                    failure = Some(RemoteExecutionError::Signal {
                        signal: format!("{signal_name:?}"),
                    });
                }
                _ => {}
            }
        }
        Ok(failure)
    }
}

#[async_trait]
impl RemoteExecutor for SshChannel {
    async fn execute(&self, command: &str) -> ExecutionOutput {
        let mut raw = Vec::new();
        let failure = match self.run(command, &mut raw).await {
            Ok(failure) => failure,
            Err(error) => Some(RemoteExecutionError::Transport(error.to_string())),
        };
        let text = String::from_utf8_lossy(&raw).into_owned();
        match failure {
            Some(failure) => ExecutionOutput::failed(text, failure),
            None => ExecutionOutput::completed(text),
        }
    }

    async fn close(&self) -> Result<()> {
        self.handle
            .lock()
            .await
            .disconnect(Disconnect::ByApplication, "", "English")
            .await?;
        info!(endpoint = %self.endpoint, "ssh: disconnected");
        Ok(())
    }
}

pub struct SshConnector {
    config: Arc<client::Config>,
    options: SshOptions,
}

impl SshConnector {
    pub fn new(options: SshOptions) -> Self {
        let config = client::Config {
            keepalive_interval: options.keepalive_interval,
            ..Default::default()
        };
        Self {
            config: Arc::new(config),
            options,
        }
    }

    /// Loads the target's private key, then dials and authenticates within
    /// the configured timeout.
    pub async fn connect(&self, target: &SshTarget) -> Result<SshChannel, ConfigError> {
        let key_pair = russh_keys::load_secret_key(&target.credential_path, None).map_err(
            |error| ConfigError::Credential {
                path: target.credential_path.clone(),
                reason: error.to_string(),
            },
        )?;

        let endpoint = target.endpoint();
        let handshake = async {
            let handler = AcceptAnyHostKey {
                host: target.host.clone(),
            };
            let mut handle = client::connect(
                self.config.clone(),
                (target.host.as_str(), target.port),
                handler,
            )
            .await
            .map_err(|error| ConfigError::Connect {
                host: endpoint.clone(),
                reason: error.to_string(),
            })?;

            let authenticated = handle
                .authenticate_publickey(target.username.as_str(), Arc::new(key_pair))
                .await
                .map_err(|error| ConfigError::Connect {
                    host: endpoint.clone(),
                    reason: error.to_string(),
                })?;
            if !authenticated {
                return Err(ConfigError::Authentication {
                    username: target.username.clone(),
                    host: target.host.clone(),
                });
            }
            Ok::<_, ConfigError>(handle)
        };

        let handle = tokio::time::timeout(self.options.connect_timeout, handshake)
            .await
            .map_err(|_| ConfigError::ConnectTimeout {
                host: endpoint.clone(),
                seconds: self.options.connect_timeout.as_secs(),
            })??;

        info!(%endpoint, username = %target.username, "ssh: connected");
        Ok(SshChannel {
            endpoint,
            handle: Mutex::new(handle),
        })
    }

    /// Connects every target in order. On the first failure the connections
    /// already made are closed before the error is returned.
    pub async fn connect_all(&self, targets: &[SshTarget]) -> Result<Vec<Connection>, ConfigError> {
        connect_in_order(self, targets).await
    }
}

/// One dial-and-authenticate attempt per login line.
#[async_trait]
trait Dialer: Send + Sync {
    async fn dial(&self, target: &SshTarget) -> Result<Arc<dyn RemoteExecutor>, ConfigError>;
}

#[async_trait]
impl Dialer for SshConnector {
    async fn dial(&self, target: &SshTarget) -> Result<Arc<dyn RemoteExecutor>, ConfigError> {
        let channel: Arc<dyn RemoteExecutor> = Arc::new(self.connect(target).await?);
        Ok(channel)
    }
}

async fn connect_in_order(
    dialer: &dyn Dialer,
    targets: &[SshTarget],
) -> Result<Vec<Connection>, ConfigError> {
    let mut established: Vec<(&SshTarget, Arc<dyn RemoteExecutor>)> =
        Vec::with_capacity(targets.len());
    for target in targets {
        match dialer.dial(target).await {
            Ok(executor) => established.push((target, executor)),
            Err(error) => {
                warn!(
                    endpoint = %target.endpoint(),
                    %error,
                    connected = established.len(),
                    "ssh: startup aborted, closing established connections"
                );
                for (opened, executor) in &established {
                    if let Err(close_error) = executor.close().await {
                        warn!(
                            endpoint = %opened.endpoint(),
                            error = %close_error,
                            "ssh: close during abort failed"
                        );
                    }
                }
                return Err(error);
            }
        }
    }

    Ok(established
        .into_iter()
        .map(|(target, executor)| Connection::new(target.prefix(), executor))
        .collect())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
