//! TCP transport: the sole gateway to the network.
//!
//! One [`Transport`] per connection, shared by the receiver task (reads) and
//! the dispatcher (writes). The socket is split into owned halves, each
//! behind its own async mutex, so a blocked read never delays a send.
//!
//! Failure semantics are deliberately blunt: any send or receive fault is
//! fatal for the session. There is no retry and no reconnection.

use std::sync::atomic::{AtomicBool, Ordering};

use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{
        TcpStream,
        tcp::{OwnedReadHalf, OwnedWriteHalf},
    },
    sync::Mutex,
};

use crate::error::ClientError;

/// Owns the TCP socket for one session.
#[derive(Debug)]
pub struct Transport {
    reader: Mutex<OwnedReadHalf>,
    writer: Mutex<OwnedWriteHalf>,
    closed: AtomicBool,
}

impl Transport {
    /// Establish the TCP connection to the relay.
    ///
    /// # Errors
    ///
    /// [`ClientError::Connect`] on any network-level failure (unreachable,
    /// refused, timeout). The session never becomes alive in that case.
    pub async fn connect(addr: &str) -> Result<Self, ClientError> {
        let stream = TcpStream::connect(addr).await.map_err(ClientError::Connect)?;
        let (reader, writer) = stream.into_split();

        Ok(Self {
            reader: Mutex::new(reader),
            writer: Mutex::new(writer),
            closed: AtomicBool::new(false),
        })
    }

    /// Write one protocol line, appending the newline terminator if absent.
    ///
    /// # Errors
    ///
    /// [`ClientError::Send`] on any write failure, including sends after
    /// [`Self::close`]. The caller must treat this as fatal and mark the
    /// session dead.
    pub async fn send_line(&self, line: &str) -> Result<(), ClientError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(ClientError::Send(std::io::Error::new(
                std::io::ErrorKind::NotConnected,
                "transport closed",
            )));
        }

        let mut writer = self.writer.lock().await;
        writer.write_all(line.as_bytes()).await.map_err(ClientError::Send)?;
        if !line.ends_with('\n') {
            writer.write_all(b"\n").await.map_err(ClientError::Send)?;
        }
        writer.flush().await.map_err(ClientError::Send)?;

        Ok(())
    }

    /// Blocking read of the next available bytes into `buf`.
    ///
    /// Returns `Ok(Some(n))` with the number of bytes read, or `Ok(None)`
    /// when the relay closed the connection cleanly. Both `None` and an error
    /// are fatal for the session.
    ///
    /// # Errors
    ///
    /// [`ClientError::Receive`] on a network fault.
    pub async fn recv_chunk(&self, buf: &mut [u8]) -> Result<Option<usize>, ClientError> {
        let mut reader = self.reader.lock().await;
        match reader.read(buf).await {
            Ok(0) => Ok(None),
            Ok(n) => Ok(Some(n)),
            Err(e) => Err(ClientError::Receive(e)),
        }
    }

    /// Release the connection. Idempotent; tolerates an already-broken
    /// socket without raising.
    pub async fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }

        let mut writer = self.writer.lock().await;
        if let Err(e) = writer.shutdown().await {
            tracing::debug!("shutdown on close: {e}");
        }
    }

    /// Whether [`Self::close`] has been called.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}
