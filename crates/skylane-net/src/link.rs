//! Framed TCP link between two endpoints.
//!
//! Frames are a big-endian `u32` length followed by a codec frame. Once the
//! version handshake succeeds the socket is split into a reader task and a
//! writer task, bridged to the logic thread with unbounded channels that are
//! only ever polled, never awaited.

use std::io::ErrorKind;
use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream};
use tokio::runtime::Handle;
use tokio::sync::mpsc::error::TryRecvError as MpscTryRecvError;
use tokio::sync::oneshot::error::TryRecvError;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::codec::{self, CodecError, MAX_FRAME_LEN};
use crate::error::NetError;
use crate::protocol::Message;

/// An established, version-checked connection.
pub struct Link {
    outbound: mpsc::UnboundedSender<Message>,
    inbound: mpsc::UnboundedReceiver<Result<Message, NetError>>,
    cancel: CancellationToken,
}

impl Link {
    /// Queue a message for the writer task.
    pub fn send(&self, message: Message) -> Result<(), NetError> {
        self.outbound.send(message).map_err(|_| NetError::Closed)
    }

    /// Next inbound message or failure, if one has arrived.
    pub fn try_recv(&mut self) -> Option<Result<Message, NetError>> {
        match self.inbound.try_recv() {
            Ok(result) => Some(result),
            Err(MpscTryRecvError::Empty) => None,
            Err(MpscTryRecvError::Disconnected) => Some(Err(NetError::Closed)),
        }
    }

    fn spawn(reader: OwnedReadHalf, writer: OwnedWriteHalf, cancel: CancellationToken) -> Self {
        let (outbound, outbound_rx) = mpsc::unbounded_channel();
        let (inbound_tx, inbound) = mpsc::unbounded_channel();

        tokio::spawn(read_task(reader, inbound_tx.clone(), cancel.clone()));
        tokio::spawn(write_task(writer, outbound_rx, inbound_tx, cancel.clone()));

        Self {
            outbound,
            inbound,
            cancel,
        }
    }
}

impl Drop for Link {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// The single result of a background connect or accept.
pub struct PendingLink {
    result: oneshot::Receiver<Result<Link, NetError>>,
}

impl PendingLink {
    /// `None` while the attempt is still running.
    pub fn poll(&mut self) -> Option<Result<Link, NetError>> {
        match self.result.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Closed) => Some(Err(NetError::Closed)),
        }
    }
}

/// Connect to `addr` and handshake on a background task.
pub fn spawn_connect(
    handle: &Handle,
    addr: String,
    version: u32,
    timeout: Duration,
    cancel: CancellationToken,
) -> PendingLink {
    let (tx, result) = oneshot::channel();
    handle.spawn(async move {
        let outcome = tokio::select! {
            _ = cancel.cancelled() => return,
            outcome = connect(&addr, version, timeout, cancel.child_token()) => outcome,
        };
        let _ = tx.send(outcome);
    });
    PendingLink { result }
}

/// Accept a single peer on `listener` and handshake on a background task.
pub fn spawn_accept(
    handle: &Handle,
    listener: std::net::TcpListener,
    version: u32,
    timeout: Duration,
    cancel: CancellationToken,
) -> Result<PendingLink, NetError> {
    listener.set_nonblocking(true)?;
    let listener = {
        let _guard = handle.enter();
        TcpListener::from_std(listener)?
    };

    let (tx, result) = oneshot::channel();
    handle.spawn(async move {
        let outcome = tokio::select! {
            _ = cancel.cancelled() => return,
            outcome = accept(listener, version, timeout, cancel.child_token()) => outcome,
        };
        let _ = tx.send(outcome);
    });
    Ok(PendingLink { result })
}

async fn connect(
    addr: &str,
    version: u32,
    timeout: Duration,
    cancel: CancellationToken,
) -> Result<Link, NetError> {
    let stream = tokio::time::timeout(timeout, TcpStream::connect(addr))
        .await
        .map_err(|_| NetError::ConnectTimeout)??;
    info!(%addr, "connected");
    handshake(stream, version, timeout, cancel).await
}

async fn accept(
    listener: TcpListener,
    version: u32,
    timeout: Duration,
    cancel: CancellationToken,
) -> Result<Link, NetError> {
    let (stream, peer): (TcpStream, SocketAddr) = listener.accept().await?;
    info!(%peer, "peer connected");
    handshake(stream, version, timeout, cancel).await
}

/// Exchange versions. Both sides send first and then read, so both detect
/// a mismatch.
async fn handshake(
    stream: TcpStream,
    version: u32,
    timeout: Duration,
    cancel: CancellationToken,
) -> Result<Link, NetError> {
    stream.set_nodelay(true)?;
    let (mut reader, mut writer) = stream.into_split();

    write_frame(&mut writer, &codec::encode(&Message::Version(version))?).await?;
    let frame = tokio::time::timeout(timeout, read_frame(&mut reader))
        .await
        .map_err(|_| NetError::ConnectTimeout)??;

    match codec::decode(&frame)? {
        Message::Version(remote) if remote == version => {
            info!(version, "handshake complete");
            Ok(Link::spawn(reader, writer, cancel))
        }
        Message::Version(remote) => Err(NetError::VersionMismatch {
            local: version,
            remote,
        }),
        other => Err(NetError::UnexpectedMessage(other.name())),
    }
}

async fn read_task(
    mut reader: OwnedReadHalf,
    inbound: mpsc::UnboundedSender<Result<Message, NetError>>,
    cancel: CancellationToken,
) {
    let error = tokio::select! {
        _ = cancel.cancelled() => return,
        error = read_loop(&mut reader, &inbound) => error,
    };
    debug!(%error, "reader stopped");
    let _ = inbound.send(Err(error));
}

/// Runs until the first failure and returns it.
async fn read_loop(
    reader: &mut OwnedReadHalf,
    inbound: &mpsc::UnboundedSender<Result<Message, NetError>>,
) -> NetError {
    loop {
        let frame = match read_frame(reader).await {
            Ok(frame) => frame,
            Err(error) => return error,
        };
        let message = match codec::decode(&frame) {
            Ok(message) => message,
            Err(error) => return error.into(),
        };
        if inbound.send(Ok(message)).is_err() {
            return NetError::Closed;
        }
    }
}

async fn write_task(
    mut writer: OwnedWriteHalf,
    mut outbound: mpsc::UnboundedReceiver<Message>,
    inbound: mpsc::UnboundedSender<Result<Message, NetError>>,
    cancel: CancellationToken,
) {
    let result = tokio::select! {
        _ = cancel.cancelled() => Ok(()),
        result = write_loop(&mut writer, &mut outbound) => result,
    };
    if let Err(error) = result {
        debug!(%error, "writer stopped");
        let _ = inbound.send(Err(error));
    }
    let _ = writer.shutdown().await;
}

async fn write_loop(
    writer: &mut OwnedWriteHalf,
    outbound: &mut mpsc::UnboundedReceiver<Message>,
) -> Result<(), NetError> {
    while let Some(message) = outbound.recv().await {
        write_frame(writer, &codec::encode(&message)?).await?;
    }
    Ok(())
}

#[allow(clippy::cast_possible_truncation)]
async fn write_frame<W: AsyncWrite + Unpin>(writer: &mut W, frame: &[u8]) -> Result<(), NetError> {
    writer.write_u32(frame.len() as u32).await?;
    writer.write_all(frame).await?;
    Ok(())
}

async fn read_frame<R: AsyncRead + Unpin>(reader: &mut R) -> Result<Vec<u8>, NetError> {
    let length = reader.read_u32().await.map_err(peer_gone)?;
    if length > MAX_FRAME_LEN {
        return Err(CodecError::FrameTooLarge(length).into());
    }
    let mut buffer = vec![0u8; length as usize];
    reader.read_exact(&mut buffer).await.map_err(peer_gone)?;
    Ok(buffer)
}

/// A peer hanging up is a close, not a transport failure.
fn peer_gone(error: std::io::Error) -> NetError {
    match error.kind() {
        ErrorKind::UnexpectedEof | ErrorKind::ConnectionReset | ErrorKind::ConnectionAborted => {
            NetError::Closed
        }
        _ => NetError::Transport(error),
    }
}
