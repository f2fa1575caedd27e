use thiserror::Error;

/// Failure of one OS query. The display text is what ends up in the
/// `error` field of the affected domain.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("system clock is before the Unix epoch: {0}")]
    Clock(#[from] std::time::SystemTimeError),

    #[error("{call} failed: {source}")]
    Os {
        call: &'static str,
        #[source]
        source: nix::Error,
    },

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Unavailable(String),
}

impl ProbeError {
    pub(crate) fn os(call: &'static str, source: nix::Error) -> Self {
        ProbeError::Os { call, source }
    }

    pub(crate) fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        ProbeError::Io {
            path: path.into(),
            source,
        }
    }
}
