use std::sync::Arc;
use std::time::Duration;

use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use sidebar_core::{ClientId, ConnectionStatus, ControlFrame};
use sidebar_logging::{sidebar_debug, sidebar_info, sidebar_warn};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tokio_util::sync::CancellationToken;

use crate::{EngineEvent, EngineSettings, EventSink};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<WsStream, Message>;

const CLOSE_GRACE: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionSettings {
    pub url: String,
    pub reconnect_delay: Duration,
    pub connect_timeout: Duration,
}

impl From<&EngineSettings> for ConnectionSettings {
    fn from(settings: &EngineSettings) -> Self {
        Self {
            url: settings.ws_url.clone(),
            reconnect_delay: settings.reconnect_delay,
            connect_timeout: settings.connect_timeout,
        }
    }
}

enum ConnectionCommand {
    Send(ControlFrame),
    SetContext(String),
}

/// Owner of the one socket of a session.
///
/// Opens the socket, registers, forwards inbound text frames and status
/// changes to the sink, and reconnects after a fixed delay whenever the
/// socket closes, indefinitely. Only [`ConnectionManager::close`] (or
/// dropping the handle) stops it.
pub struct ConnectionManager {
    commands: mpsc::UnboundedSender<ConnectionCommand>,
    shutdown: CancellationToken,
    task: JoinHandle<()>,
}

impl ConnectionManager {
    /// Starts the connection loop. Must be called from within a tokio runtime.
    pub fn open(settings: ConnectionSettings, client_id: ClientId, sink: Arc<dyn EventSink>) -> Self {
        let (commands, command_rx) = mpsc::unbounded_channel();
        let shutdown = CancellationToken::new();
        let worker = Worker {
            settings,
            client_id,
            context: None,
            commands: command_rx,
            shutdown: shutdown.clone(),
            sink,
        };
        let task = tokio::spawn(worker.run());
        Self {
            commands,
            shutdown,
            task,
        }
    }

    /// Writes `frame` if the socket is open.
    ///
    /// Frames issued while a connection attempt is in flight go out right
    /// after registration; frames issued while waiting to reconnect are dropped.
    pub fn send(&self, frame: ControlFrame) {
        let _ = self.commands.send(ConnectionCommand::Send(frame));
    }

    /// Replaces the last known event context and sends it now if connected.
    /// It is re-sent after registration on every later connection.
    pub fn set_context(&self, event_slug: impl Into<String>) {
        let _ = self
            .commands
            .send(ConnectionCommand::SetContext(event_slug.into()));
    }

    /// Closes the socket and cancels any pending reconnect.
    pub async fn close(self) {
        self.shutdown.cancel();
        if let Err(err) = self.task.await {
            sidebar_warn!("connection task ended abnormally: {}", err);
        }
    }
}

enum SessionEnd {
    Closed,
    Shutdown,
}

#[derive(Debug, thiserror::Error)]
enum ConnectError {
    #[error("connect timed out")]
    Timeout,
    #[error("websocket error: {0}")]
    Socket(#[from] tungstenite::Error),
    #[error("could not encode frame: {0}")]
    Encode(#[from] serde_json::Error),
}

struct Worker {
    settings: ConnectionSettings,
    client_id: ClientId,
    /// One-slot event context, replayed after every registration.
    context: Option<String>,
    commands: mpsc::UnboundedReceiver<ConnectionCommand>,
    shutdown: CancellationToken,
    sink: Arc<dyn EventSink>,
}

impl Worker {
    async fn run(mut self) {
        loop {
            self.emit_status(ConnectionStatus::Connecting);
            match self.connect_and_serve().await {
                Ok(SessionEnd::Shutdown) => break,
                Ok(SessionEnd::Closed) => {
                    sidebar_info!("socket closed by server");
                }
                Err(err) => {
                    sidebar_warn!("socket error: {}", err);
                    self.emit_status(ConnectionStatus::Error);
                }
            }
            self.emit_status(ConnectionStatus::Disconnected);
            if !self.wait_before_reconnect().await {
                return;
            }
            sidebar_info!("reconnecting to {}", self.settings.url);
        }
        self.emit_status(ConnectionStatus::Disconnected);
        sidebar_debug!("connection manager stopped");
    }

    async fn connect_and_serve(&mut self) -> Result<SessionEnd, ConnectError> {
        let connect = tokio::time::timeout(
            self.settings.connect_timeout,
            connect_async(self.settings.url.as_str()),
        );
        let connected = tokio::select! {
            _ = self.shutdown.cancelled() => return Ok(SessionEnd::Shutdown),
            connected = connect => connected,
        };
        let (socket, _response) = connected.map_err(|_| ConnectError::Timeout)??;
        let (mut writer, mut reader) = socket.split();

        self.emit_status(ConnectionStatus::Connected);
        sidebar_info!("connected to {}", self.settings.url);

        // Registration is always the first frame of a connection.
        let register = ControlFrame::register(self.client_id.clone());
        if !send_unless_shutdown(&self.shutdown, &mut writer, &register).await? {
            return Ok(SessionEnd::Shutdown);
        }
        if let Some(slug) = self.context.clone() {
            let context = ControlFrame::event_context(slug);
            if !send_unless_shutdown(&self.shutdown, &mut writer, &context).await? {
                return Ok(SessionEnd::Shutdown);
            }
        }

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    close_socket(&mut writer).await;
                    return Ok(SessionEnd::Shutdown);
                }
                command = self.commands.recv() => {
                    let frame = match command {
                        Some(ConnectionCommand::Send(frame)) => frame,
                        Some(ConnectionCommand::SetContext(slug)) => {
                            self.context = Some(slug.clone());
                            ControlFrame::event_context(slug)
                        }
                        None => {
                            close_socket(&mut writer).await;
                            return Ok(SessionEnd::Shutdown);
                        }
                    };
                    if !send_unless_shutdown(&self.shutdown, &mut writer, &frame).await? {
                        return Ok(SessionEnd::Shutdown);
                    }
                }
                inbound = reader.next() => match inbound {
                    Some(Ok(Message::Text(text))) => {
                        self.sink.emit(EngineEvent::Frame(text.as_str().to_owned()));
                    }
                    Some(Ok(Message::Binary(bytes))) => match String::from_utf8(bytes.to_vec()) {
                        Ok(text) => self.sink.emit(EngineEvent::Frame(text)),
                        Err(_) => sidebar_warn!("dropping non-utf8 binary frame ({} bytes)", bytes.len()),
                    },
                    Some(Ok(Message::Close(frame))) => {
                        sidebar_debug!("close frame received: {:?}", frame);
                        return Ok(SessionEnd::Closed);
                    }
                    Some(Ok(_)) => {}
                    Some(Err(err)) => return Err(err.into()),
                    None => return Ok(SessionEnd::Closed),
                },
            }
        }
    }

    /// Sleeps out the reconnect delay while still tracking context updates.
    /// Returns `false` if the manager was shut down meanwhile.
    async fn wait_before_reconnect(&mut self) -> bool {
        let delay = tokio::time::sleep(self.settings.reconnect_delay);
        tokio::pin!(delay);
        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => return false,
                _ = &mut delay => return true,
                command = self.commands.recv() => match command {
                    Some(ConnectionCommand::SetContext(slug)) => self.context = Some(slug),
                    Some(ConnectionCommand::Send(frame)) => {
                        sidebar_warn!("socket not open, dropping {:?}", frame);
                    }
                    None => return false,
                },
            }
        }
    }

    fn emit_status(&self, status: ConnectionStatus) {
        self.sink.emit(EngineEvent::Status(status));
    }
}

/// Writes `frame` unless shutdown is requested first; a peer that stopped
/// reading must not hold up `close`. Returns `false` on shutdown.
async fn send_unless_shutdown(
    shutdown: &CancellationToken,
    writer: &mut WsSink,
    frame: &ControlFrame,
) -> Result<bool, ConnectError> {
    tokio::select! {
        _ = shutdown.cancelled() => Ok(false),
        sent = send_frame(writer, frame) => sent.map(|()| true),
    }
}

async fn send_frame(writer: &mut WsSink, frame: &ControlFrame) -> Result<(), ConnectError> {
    let json = frame.to_json()?;
    sidebar_debug!("-> {}", json);
    writer.send(Message::Text(json.into())).await?;
    Ok(())
}

async fn close_socket(writer: &mut WsSink) {
    let close = async {
        if let Err(err) = writer.send(Message::Close(None)).await {
            sidebar_debug!("close frame not sent: {}", err);
        }
        let _ = writer.close().await;
    };
    if tokio::time::timeout(CLOSE_GRACE, close).await.is_err() {
        sidebar_debug!("peer not draining, dropping socket without close handshake");
    }
}
