//! Outbound side of the pipeline: somewhere to put finished packets.

use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};

use log::debug;

use crate::error::{Error, Result};

/// Sink for encoded frames.
///
/// Implement this trait to deliver packets over anything other than UDP.
///
/// # Example
///
/// ```ignore
/// use posetrack_rs::Transport;
///
/// struct Recorder(Vec<Vec<u8>>);
///
/// impl Transport for Recorder {
///     type Error = std::convert::Infallible;
///
///     fn send(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
///         self.0.push(bytes.to_vec());
///         Ok(())
///     }
/// }
/// ```
pub trait Transport {
    /// Error type for delivery failures.
    type Error;

    /// Send `bytes` as one unit, now.
    fn send(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;
}

/// Sends every packet as a single UDP datagram to a fixed destination.
pub struct UdpTransport {
    socket: UdpSocket,
    target: SocketAddr,
}

impl UdpTransport {
    /// Bind an ephemeral local port and resolve `host:port` once.
    pub fn connect(host: &str, port: u16) -> Result<Self> {
        let target = (host, port)
            .to_socket_addrs()?
            .find(SocketAddr::is_ipv4)
            .ok_or_else(|| {
                Error::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("no IPv4 address for {host}:{port}"),
                ))
            })?;
        let socket = UdpSocket::bind("0.0.0.0:0")?;
        debug!("sending skeletons from {} to {target}", socket.local_addr()?);
        Ok(Self { socket, target })
    }

    pub fn target(&self) -> SocketAddr {
        self.target
    }
}

impl Transport for UdpTransport {
    type Error = Error;

    fn send(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        self.socket.send_to(bytes, self.target)?;
        Ok(())
    }
}
