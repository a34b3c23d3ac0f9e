//! Remote snapshot store contracts and HTTP implementation.
//!
//! # Responsibility
//! - Fetch and replace the full snapshot on the remote endpoint.
//! - Map transport, status, and payload problems to `RemoteError`.
//!
//! # Invariants
//! - `push` always sends the full snapshot; there is no incremental patch.
//! - Any 2xx response counts as success; everything else is an error.

use crate::model::snapshot::{Snapshot, SnapshotPayload};
use reqwest::blocking::Client;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

pub type RemoteResult<T> = Result<T, RemoteError>;

#[derive(Debug)]
pub enum RemoteError {
    /// Endpoint unreachable, timed out, or the client could not be built.
    Transport(reqwest::Error),
    /// Endpoint answered with a non-success status code.
    Status(u16),
    /// Response body is not a snapshot payload.
    Parse(serde_json::Error),
    /// No remote endpoint is configured.
    Disabled,
}

impl Display for RemoteError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(err) => write!(f, "remote transport failure: {err}"),
            Self::Status(code) => write!(f, "remote answered with status {code}"),
            Self::Parse(err) => write!(f, "remote payload is malformed: {err}"),
            Self::Disabled => write!(f, "remote store is disabled"),
        }
    }
}

impl Error for RemoteError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Transport(err) => Some(err),
            Self::Parse(err) => Some(err),
            Self::Status(_) | Self::Disabled => None,
        }
    }
}

impl From<reqwest::Error> for RemoteError {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport(value)
    }
}

impl From<serde_json::Error> for RemoteError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

impl RemoteError {
    /// Stable short code for log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Transport(_) => "remote_unreachable",
            Self::Status(_) => "remote_status",
            Self::Parse(_) => "remote_parse",
            Self::Disabled => "remote_disabled",
        }
    }
}

/// Full-snapshot remote persistence.
pub trait RemoteStore {
    /// Reads the snapshot; missing top-level keys resolve to empty collections.
    fn fetch(&self) -> RemoteResult<Snapshot>;
    /// Replaces the remote snapshot.
    fn push(&self, snapshot: &Snapshot) -> RemoteResult<()>;
}

impl<R: RemoteStore + ?Sized> RemoteStore for Box<R> {
    fn fetch(&self) -> RemoteResult<Snapshot> {
        (**self).fetch()
    }

    fn push(&self, snapshot: &Snapshot) -> RemoteResult<()> {
        (**self).push(snapshot)
    }
}

/// JSON-over-HTTP remote: `GET` reads, `POST` replaces.
pub struct HttpRemoteStore {
    client: Client,
    url: String,
}

impl HttpRemoteStore {
    pub fn new(url: impl Into<String>, timeout: Duration) -> RemoteResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

impl RemoteStore for HttpRemoteStore {
    fn fetch(&self) -> RemoteResult<Snapshot> {
        let response = self.client.get(&self.url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Status(status.as_u16()));
        }
        let body = response.text()?;
        decode_remote_payload(&body)
    }

    fn push(&self, snapshot: &Snapshot) -> RemoteResult<()> {
        let response = self.client.post(&self.url).json(snapshot).send()?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(RemoteError::Status(status.as_u16()))
        }
    }
}

/// Remote used when no endpoint is configured; every call fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledRemote;

impl RemoteStore for DisabledRemote {
    fn fetch(&self) -> RemoteResult<Snapshot> {
        Err(RemoteError::Disabled)
    }

    fn push(&self, _snapshot: &Snapshot) -> RemoteResult<()> {
        Err(RemoteError::Disabled)
    }
}

/// Decodes a remote response body, adopting it verbatim.
pub fn decode_remote_payload(body: &str) -> RemoteResult<Snapshot> {
    Ok(SnapshotPayload::parse(body)?.or_empty())
}
