//! Error type shared by the tracker, packet codec and integration layer.

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The packet budget cannot hold even the bundle header and `/frame`.
    #[error("packet capacity {capacity} is below the minimum of {minimum} bytes")]
    CapacityTooSmall { capacity: usize, minimum: usize },

    #[error("got {ids} track IDs for {persons} persons")]
    IdCountMismatch { persons: usize, ids: usize },

    #[error("malformed packet: {0}")]
    MalformedPacket(String),
}

impl From<std::convert::Infallible> for Error {
    fn from(never: std::convert::Infallible) -> Self {
        match never {}
    }
}
