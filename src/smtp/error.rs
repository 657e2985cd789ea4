use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("no socket address for {host}")]
    NoAddress { host: String },
    #[error("connection to {host} failed: {reason}")]
    Connect { host: String, reason: String },
    #[error("connection closed by {host}")]
    Disconnected { host: String },
    #[error("I/O error with {host}: {source}")]
    Io {
        host: String,
        #[source]
        source: std::io::Error,
    },
    #[error("protocol error: {0}")]
    Protocol(String),
}

impl ProbeError {
    pub(crate) fn connect(host: &str, reason: impl Into<String>) -> Self {
        Self::Connect {
            host: host.to_string(),
            reason: reason.into(),
        }
    }

    /// TCP connect failure; a timeout is kept as an I/O error like a read
    /// timeout.
    pub(crate) fn connect_failed(
        host: &str,
        addr: &std::net::SocketAddr,
        source: std::io::Error,
    ) -> Self {
        if source.kind() == std::io::ErrorKind::TimedOut {
            Self::Io {
                host: host.to_string(),
                source,
            }
        } else {
            Self::connect(host, format!("{addr}: {source}"))
        }
    }

    /// EOF is a disconnection; everything else stays an I/O error.
    pub(crate) fn io(host: &str, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::UnexpectedEof {
            Self::Disconnected {
                host: host.to_string(),
            }
        } else {
            Self::Io {
                host: host.to_string(),
                source,
            }
        }
    }
}
