use std::sync::Arc;
use std::time::Duration;

use russh::client::{self, Handle};
use russh::{Channel, ChannelMsg};
use shared::auth::AuthParams;
use shared::konst::{QUIESCENT_EMPTY_READS, READ_POLL_INTERVAL_MS};
use tracing::{debug, warn};

use super::ansi::strip_ansi;
use super::client::ClientHandler;
use super::error::SessionError;

/// One interactive SSH shell channel with combined stderr. Blind to command
/// semantics: it knows only a prompt marker and a byte ceiling, both supplied
/// by whoever drives it.
pub struct SshSession {
    host: String,
    handle: Handle<ClientHandler>,
    channel: Channel<client::Msg>,
    max_bytes: usize,
}

impl SshSession {
    /// Establish the shell channel and give the remote banner a moment to
    /// arrive before the caller sends anything.
    pub async fn open(
        host: &str,
        port: u16,
        auth: &AuthParams,
        connect_timeout: Duration,
        max_bytes: usize,
    ) -> Result<Self, SessionError> {
        let config = Arc::new(client::Config::default());

        let connect = client::connect(config, (host, port), ClientHandler);
        let mut handle = match tokio::time::timeout(connect_timeout, connect).await {
            Ok(Ok(handle)) => handle,
            Ok(Err(source)) => {
                return Err(SessionError::Unreachable {
                    host: host.to_string(),
                    source: std::io::Error::new(std::io::ErrorKind::Other, source),
                });
            }
            Err(_) => {
                return Err(SessionError::Timeout {
                    host: host.to_string(),
                    timeout_secs: connect_timeout.as_secs_f64(),
                });
            }
        };

        authenticate(&mut handle, host, auth).await?;

        let mut channel = handle
            .channel_open_session()
            .await
            .map_err(|source| SessionError::Protocol {
                host: host.to_string(),
                source,
            })?;
        channel
            .request_shell(true)
            .await
            .map_err(|source| SessionError::Protocol {
                host: host.to_string(),
                source,
            })?;

        tokio::time::sleep(Duration::from_millis(300)).await;

        Ok(Self {
            host: host.to_string(),
            handle,
            channel,
            max_bytes,
        })
    }

    /// Drain whatever output is ready right now, up to `max_bytes`. Returns
    /// an empty string when nothing is waiting; never blocks waiting for
    /// more.
    pub async fn read_output(&mut self) -> Result<String, SessionError> {
        let mut collected = Vec::new();

        while collected.len() < self.max_bytes {
            let wait = tokio::time::timeout(Duration::from_millis(1), self.channel.wait());
            let msg = match wait.await {
                Ok(Some(msg)) => msg,
                Ok(None) | Err(_) => break,
            };

            match msg {
                ChannelMsg::Data { data } | ChannelMsg::ExtendedData { data, .. } => {
                    collected.extend_from_slice(&data);
                }
                ChannelMsg::Eof | ChannelMsg::Close => break,
                _ => {}
            }
        }

        if collected.len() > self.max_bytes {
            collected.truncate(self.max_bytes);
        }

        let decoded = String::from_utf8_lossy(&collected).into_owned();
        Ok(strip_ansi(&decoded))
    }

    /// Write `command` verbatim, then drain until `prompt_marker` has been
    /// observed and `QUIESCENT_EMPTY_READS` consecutive drains came back
    /// empty. The double condition avoids returning early when the marker
    /// appears inside a banner, and avoids hanging forever when it never
    /// appears at all.
    pub async fn send(&mut self, command: &str, prompt_marker: &str) -> Result<String, SessionError> {
        self.channel
            .data(command.as_bytes())
            .await
            .map_err(|source| SessionError::Protocol {
                host: self.host.clone(),
                source,
            })?;

        let mut buffer = String::new();
        let mut seen_marker = false;
        let mut empty_reads = 0u32;

        loop {
            let chunk = self.read_output().await?;
            if chunk.is_empty() {
                empty_reads += 1;
            } else {
                empty_reads = 0;
                buffer.push_str(&chunk);
                if buffer.contains(prompt_marker) {
                    seen_marker = true;
                }
            }

            if seen_marker && empty_reads >= QUIESCENT_EMPTY_READS {
                break;
            }

            tokio::time::sleep(Duration::from_millis(READ_POLL_INTERVAL_MS)).await;
        }

        Ok(buffer)
    }

    /// Best-effort teardown; failures are logged, never propagated.
    pub async fn close(&mut self) {
        if let Err(err) = self.channel.eof().await {
            warn!(host = %self.host, error = %err, "failed to close SSH channel cleanly");
        }
        debug!(host = %self.host, "SSH session closed");
    }
}

async fn authenticate(
    handle: &mut Handle<ClientHandler>,
    host: &str,
    auth: &AuthParams,
) -> Result<(), SessionError> {
    if let Some(key_path) = &auth.key_path {
        let key_pair = russh::keys::load_secret_key(key_path, auth.password.as_deref())
            .map_err(|source| SessionError::KeyLoad {
                path: key_path.clone(),
                source,
            })?;
        let result = handle
            .authenticate_publickey(
                &auth.username,
                russh::keys::PrivateKeyWithHashAlg::new(Arc::new(key_pair), None),
            )
            .await
            .map_err(|source| SessionError::Protocol {
                host: host.to_string(),
                source,
            })?;
        if !result.success() {
            return Err(SessionError::AuthFailure {
                host: host.to_string(),
            });
        }
        return Ok(());
    }

    if let Some(password) = &auth.password {
        let result = handle
            .authenticate_password(&auth.username, password)
            .await
            .map_err(|source| SessionError::Protocol {
                host: host.to_string(),
                source,
            })?;
        if !result.success() {
            return Err(SessionError::AuthFailure {
                host: host.to_string(),
            });
        }
        return Ok(());
    }

    Err(SessionError::AuthFailure {
        host: host.to_string(),
    })
}
