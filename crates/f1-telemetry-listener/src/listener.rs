//! UDP receive loop.
//!
//! One task per bound socket with exactly one receive outstanding. Every
//! datagram is handed to the callback as a [`RawDatagram`] and the loop goes
//! straight back to the socket; validation is the decoder's job, so empty
//! and oversized datagrams are forwarded too.

use std::io;
use std::net::{IpAddr, SocketAddr};

use f1_telemetry_protocol::RawDatagram;
use tokio::net::UdpSocket;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::{BindError, ListenerConfig, ListenerError, StartError};

/// Largest possible UDP payload; no datagram is ever truncated.
pub const RECV_BUFFER_SIZE: usize = 65_535;

/// A bound UDP socket, not yet receiving.
#[derive(Debug)]
pub struct Listener {
    socket: UdpSocket,
    local_addr: SocketAddr,
}

impl Listener {
    /// Bind `bind_address:port`. Port 0 picks an ephemeral port.
    ///
    /// # Errors
    ///
    /// [`BindError`] when the OS refuses the bind (address in use,
    /// permission denied, address not available).
    pub async fn start(bind_address: IpAddr, port: u16) -> Result<Self, BindError> {
        let addr = SocketAddr::new(bind_address, port);
        let socket = UdpSocket::bind(addr).await.map_err(|source| {
            warn!(error = %source, %addr, "F1 UDP socket bind failed");
            BindError { addr, source }
        })?;
        let local_addr = socket
            .local_addr()
            .map_err(|source| BindError { addr, source })?;
        info!(addr = %local_addr, "F1 UDP listener bound");
        Ok(Self { socket, local_addr })
    }

    /// Validate `config` and bind the configured address.
    ///
    /// # Errors
    ///
    /// [`StartError::Config`] before any socket is created, or
    /// [`StartError::Bind`].
    pub async fn from_config(config: &ListenerConfig) -> Result<Self, StartError> {
        config.validate()?;
        let ip = config.bind_ip()?;
        Ok(Self::start(ip, config.port).await?)
    }

    /// Wrap an already bound socket.
    ///
    /// # Errors
    ///
    /// The socket's `local_addr` lookup failed.
    pub fn from_socket(socket: UdpSocket) -> io::Result<Self> {
        let local_addr = socket.local_addr()?;
        Ok(Self { socket, local_addr })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Receive until `shutdown` fires (or its sender is dropped) or the
    /// socket fails.
    ///
    /// `on_datagram` runs inline on the receive task and must be bounded
    /// work, such as a queue push or an inline decode.
    ///
    /// # Errors
    ///
    /// [`ListenerError::SocketFatal`] for any receive error other than the
    /// transient kinds listed in [`is_transient`].
    pub async fn receive_loop<F>(
        self,
        mut on_datagram: F,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ListenerError>
    where
        F: FnMut(RawDatagram),
    {
        let mut buf = vec![0u8; RECV_BUFFER_SIZE];
        let mut received = 0u64;
        debug!(addr = %self.local_addr, "F1 UDP receive loop started");

        let result = loop {
            tokio::select! {
                biased;
                _ = shutdown.recv() => {
                    break Ok(());
                }
                recv = self.socket.recv_from(&mut buf) => match recv {
                    Ok((len, source)) => {
                        let bytes = buf.get(..len).unwrap_or_default();
                        received = received.saturating_add(1);
                        on_datagram(RawDatagram::new(bytes, source));
                    }
                    Err(err) if is_transient(&err) => {
                        debug!(error = %err, "transient UDP receive error, retrying");
                    }
                    Err(err) => {
                        warn!(error = %err, addr = %self.local_addr, "UDP receive failed, stopping listener");
                        break Err(ListenerError::SocketFatal { source: err });
                    }
                }
            }
        };

        info!(addr = %self.local_addr, received, "F1 UDP listener stopped");
        result
    }

    /// Run [`receive_loop`](Self::receive_loop) on its own tokio task.
    ///
    /// Dropping the returned handle also stops the loop, at its next wake-up.
    pub fn spawn<F>(self, on_datagram: F) -> ListenerHandle
    where
        F: FnMut(RawDatagram) + Send + 'static,
    {
        self.spawn_then(on_datagram, |_result| {})
    }

    /// Like [`spawn`](Self::spawn), running `on_exit` on the receive task
    /// with the terminal result once the loop has ended for any reason.
    pub fn spawn_then<F, E>(self, on_datagram: F, on_exit: E) -> ListenerHandle
    where
        F: FnMut(RawDatagram) + Send + 'static,
        E: FnOnce(&Result<(), ListenerError>) + Send + 'static,
    {
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let local_addr = self.local_addr;
        let task = tokio::spawn(async move {
            let result = self.receive_loop(on_datagram, shutdown_rx).await;
            on_exit(&result);
            result
        });
        ListenerHandle {
            local_addr,
            shutdown_tx,
            task: Some(task),
        }
    }
}

/// Receive errors that do not end the loop.
///
/// `ConnectionReset` shows up on Windows after an ICMP port-unreachable
/// for an earlier send on the same socket.
pub fn is_transient(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::Interrupted
            | io::ErrorKind::WouldBlock
            | io::ErrorKind::TimedOut
            | io::ErrorKind::ConnectionReset
    )
}

/// Control handle for a spawned receive loop.
#[derive(Debug)]
pub struct ListenerHandle {
    local_addr: SocketAddr,
    shutdown_tx: broadcast::Sender<()>,
    task: Option<JoinHandle<Result<(), ListenerError>>>,
}

impl ListenerHandle {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Whether the loop has exited (stopped or failed).
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Stop the loop and wait for it to exit.
    ///
    /// Once this returns, no further callback runs and the socket is closed.
    /// The first call returns the loop's terminal result; later calls return
    /// `None`.
    pub async fn stop(&mut self) -> Option<Result<(), ListenerError>> {
        if self.task.is_some() && self.shutdown_tx.send(()).is_err() {
            debug!("receive loop already exited");
        }
        self.join().await
    }

    /// Wait for the loop to exit on its own, without signalling shutdown.
    ///
    /// Shares [`stop`](Self::stop)'s once-only terminal result.
    pub async fn join(&mut self) -> Option<Result<(), ListenerError>> {
        let task = self.task.take()?;
        Some(match task.await {
            Ok(result) => result,
            Err(err) => Err(ListenerError::TaskFailed(err.to_string())),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;
    use std::time::Duration;
    use tokio::sync::mpsc;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    const LOCALHOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

    #[tokio::test]
    async fn test_forwards_datagrams_verbatim() -> TestResult {
        let listener = Listener::start(LOCALHOST, 0).await?;
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut handle = listener.spawn(move |dg: RawDatagram| {
            let _sent = tx.send(dg);
        });

        let sender = UdpSocket::bind((LOCALHOST, 0)).await?;
        sender.send_to(&[1, 2, 3], handle.local_addr()).await?;
        sender.send_to(&[], handle.local_addr()).await?;

        let first = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await?
            .ok_or("channel closed")?;
        assert_eq!(first.as_bytes(), &[1, 2, 3]);
        assert_eq!(first.source, sender.local_addr()?);

        let empty = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await?
            .ok_or("channel closed")?;
        assert!(empty.is_empty());

        assert!(matches!(handle.stop().await, Some(Ok(()))));
        Ok(())
    }

    #[tokio::test]
    async fn test_stop_is_idempotent() -> TestResult {
        let listener = Listener::start(LOCALHOST, 0).await?;
        let mut handle = listener.spawn(|_| {});
        assert!(matches!(handle.stop().await, Some(Ok(()))));
        assert!(handle.stop().await.is_none());
        assert!(handle.is_finished());
        Ok(())
    }

    #[tokio::test]
    async fn test_on_exit_sees_fatal_receive_error() -> TestResult {
        let dead = UdpSocket::bind((LOCALHOST, 0)).await?.local_addr()?;
        let socket = UdpSocket::bind((LOCALHOST, 0)).await?;
        socket.connect(dead).await?;
        socket.send(b"x").await?;

        let (tx, rx) = tokio::sync::oneshot::channel();
        let mut handle = Listener::from_socket(socket)?.spawn_then(
            |_| {},
            move |result: &Result<(), ListenerError>| {
                let _sent = tx.send(result.is_err());
            },
        );

        let exited_with_error = tokio::time::timeout(Duration::from_secs(2), rx).await??;
        assert!(exited_with_error);
        match handle.join().await {
            Some(Err(ListenerError::SocketFatal { source })) => {
                assert_eq!(source.kind(), io::ErrorKind::ConnectionRefused);
            }
            other => return Err(format!("unexpected terminal result: {other:?}").into()),
        }
        assert!(handle.stop().await.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_bind_conflict_reports_address() -> TestResult {
        let first = Listener::start(LOCALHOST, 0).await?;
        let taken = first.local_addr();
        let err = Listener::start(LOCALHOST, taken.port())
            .await
            .err()
            .ok_or("second bind on the same port succeeded")?;
        assert_eq!(err.addr, taken);
        assert_eq!(err.kind(), io::ErrorKind::AddrInUse);
        Ok(())
    }

    #[tokio::test]
    async fn test_from_config_rejects_invalid_config() {
        let config = ListenerConfig::default().with_queue_capacity(0);
        let result = Listener::from_config(&config).await;
        assert!(matches!(result, Err(StartError::Config(_))));
    }

    #[test]
    fn test_transient_error_kinds() {
        assert!(is_transient(&io::Error::from(io::ErrorKind::ConnectionReset)));
        assert!(is_transient(&io::Error::from(io::ErrorKind::Interrupted)));
        assert!(!is_transient(&io::Error::from(io::ErrorKind::PermissionDenied)));
    }
}
