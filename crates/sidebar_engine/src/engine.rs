use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use sidebar_core::{ClientId, Effect, JobRequest};
use sidebar_logging::{sidebar_debug, sidebar_warn};
use tokio::sync::mpsc as async_mpsc;

use crate::connection::{ConnectionManager, ConnectionSettings};
use crate::{
    ChannelEventSink, EngineError, EngineEvent, EngineSettings, EventSink, HttpJobLauncher,
    JobLauncher,
};

enum EngineCommand {
    Execute(Effect),
    Shutdown,
}

/// Runs the session's IO on a dedicated runtime thread.
///
/// Effects go in through [`EngineHandle::execute`]; connection status, raw
/// frames, launch outcomes and watchdog expiries come back as [`EngineEvent`]s.
pub struct EngineHandle {
    cmd_tx: async_mpsc::UnboundedSender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
    thread: Option<thread::JoinHandle<()>>,
}

impl EngineHandle {
    pub fn new(settings: EngineSettings, client_id: ClientId) -> Result<Self, EngineError> {
        settings.validate()?;
        let launcher = Arc::new(HttpJobLauncher::new(&settings)?);
        Self::with_launcher(settings, client_id, launcher)
    }

    pub fn with_launcher(
        settings: EngineSettings,
        client_id: ClientId,
        launcher: Arc<dyn JobLauncher>,
    ) -> Result<Self, EngineError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(EngineError::Runtime)?;
        let (cmd_tx, cmd_rx) = async_mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::channel();
        let sink: Arc<dyn EventSink> = Arc::new(ChannelEventSink::new(event_tx));

        let thread = thread::Builder::new()
            .name("sidebar-engine".to_string())
            .spawn(move || {
                runtime.block_on(run_engine(settings, client_id, launcher, sink, cmd_rx));
            })
            .map_err(EngineError::Thread)?;

        Ok(Self {
            cmd_tx,
            event_rx,
            thread: Some(thread),
        })
    }

    pub fn execute(&self, effect: Effect) {
        let _ = self.cmd_tx.send(EngineCommand::Execute(effect));
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    /// Closes the socket without reconnecting and waits for the engine thread.
    pub fn shutdown(mut self) {
        let _ = self.cmd_tx.send(EngineCommand::Shutdown);
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                sidebar_warn!("engine thread panicked during shutdown");
            }
        }
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        let _ = self.cmd_tx.send(EngineCommand::Shutdown);
    }
}

async fn run_engine(
    settings: EngineSettings,
    client_id: ClientId,
    launcher: Arc<dyn JobLauncher>,
    sink: Arc<dyn EventSink>,
    mut cmd_rx: async_mpsc::UnboundedReceiver<EngineCommand>,
) {
    let connection = ConnectionManager::open(
        ConnectionSettings::from(&settings),
        client_id,
        sink.clone(),
    );

    while let Some(command) = cmd_rx.recv().await {
        match command {
            EngineCommand::Execute(effect) => execute_effect(
                effect,
                &connection,
                &launcher,
                &sink,
                settings.feed_watchdog,
            ),
            EngineCommand::Shutdown => break,
        }
    }

    connection.close().await;
    sidebar_debug!("engine stopped");
}

fn execute_effect(
    effect: Effect,
    connection: &ConnectionManager,
    launcher: &Arc<dyn JobLauncher>,
    sink: &Arc<dyn EventSink>,
    feed_watchdog: Duration,
) {
    match effect {
        Effect::SendControl(frame) => connection.send(frame),
        Effect::AnnounceEventContext(slug) => connection.set_context(slug),
        Effect::Launch(request) => {
            let launcher = launcher.clone();
            let sink = sink.clone();
            tokio::spawn(async move {
                launch_job(launcher.as_ref(), request, sink.as_ref()).await;
            });
        }
        Effect::ArmFeedWatchdog { token } => {
            let sink = sink.clone();
            tokio::spawn(async move {
                tokio::time::sleep(feed_watchdog).await;
                sink.emit(EngineEvent::FeedWatchdogElapsed { token });
            });
        }
    }
}

async fn launch_job(launcher: &dyn JobLauncher, request: JobRequest, sink: &dyn EventSink) {
    let job = request.kind();
    let request_id = request.request_id();
    match launcher.launch(&request).await {
        Ok(()) => sink.emit(EngineEvent::LaunchAccepted { job, request_id }),
        Err(error) => {
            sidebar_warn!("{} request {} was not accepted: {}", job, request_id, error);
            sink.emit(EngineEvent::LaunchFailed {
                job,
                request_id,
                error,
            });
        }
    }
}
