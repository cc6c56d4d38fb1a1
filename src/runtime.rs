//! Single-task event loop that owns the session controller
//!
//! UI commands and recognizer callbacks are both funneled into one task, so
//! every state mutation happens in order on that task and nothing needs a lock.

use crate::recognition::{HostEnvironment, SessionEvent, SpeechCapability};
use crate::session::{SessionConfig, SessionController, SessionSnapshot};
use anyhow::{anyhow, Context, Result};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::timeout;
use tracing::{info, warn};

/// How long shutdown waits for each stopped session to release the capability
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(3);

/// Commands accepted by the runtime
#[derive(Debug)]
pub enum Command {
    Toggle(oneshot::Sender<SessionSnapshot>),
    Start(oneshot::Sender<SessionSnapshot>),
    Stop(oneshot::Sender<SessionSnapshot>),
    Clear(oneshot::Sender<SessionSnapshot>),
    Snapshot(oneshot::Sender<SessionSnapshot>),
    Shutdown,
}

/// Cloneable handle for sending commands to a running `DictationRuntime`
#[derive(Debug, Clone)]
pub struct DictationHandle {
    commands: mpsc::Sender<Command>,
}

impl DictationHandle {
    pub async fn toggle(&self) -> Result<SessionSnapshot> {
        self.request(Command::Toggle).await
    }

    pub async fn start(&self) -> Result<SessionSnapshot> {
        self.request(Command::Start).await
    }

    pub async fn stop(&self) -> Result<SessionSnapshot> {
        self.request(Command::Stop).await
    }

    pub async fn clear(&self) -> Result<SessionSnapshot> {
        self.request(Command::Clear).await
    }

    pub async fn snapshot(&self) -> Result<SessionSnapshot> {
        self.request(Command::Snapshot).await
    }

    /// Ask the runtime to tear down the live session and exit
    pub async fn shutdown(&self) -> Result<()> {
        self.commands
            .send(Command::Shutdown)
            .await
            .map_err(|_| anyhow!("Dictation runtime is not running"))
    }

    async fn request(
        &self,
        command: impl FnOnce(oneshot::Sender<SessionSnapshot>) -> Command,
    ) -> Result<SessionSnapshot> {
        let (tx, rx) = oneshot::channel();

        self.commands
            .send(command(tx))
            .await
            .map_err(|_| anyhow!("Dictation runtime is not running"))?;

        rx.await.context("Dictation runtime dropped the request")
    }
}

/// Event loop owning the `SessionController`
pub struct DictationRuntime {
    controller: SessionController,
    commands: mpsc::Receiver<Command>,
    events: mpsc::UnboundedReceiver<SessionEvent>,
}

impl DictationRuntime {
    pub fn new(
        capability: SpeechCapability,
        config: SessionConfig,
        environment: HostEnvironment,
    ) -> (Self, DictationHandle) {
        let (command_tx, command_rx) = mpsc::channel(32);
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let controller = SessionController::new(capability, config, environment, event_tx);

        (
            Self {
                controller,
                commands: command_rx,
                events: event_rx,
            },
            DictationHandle {
                commands: command_tx,
            },
        )
    }

    /// Process commands and recognizer events until shutdown
    ///
    /// Returns once a `Shutdown` command arrives or every handle is dropped.
    /// The live session is always stopped on the way out, and sessions still
    /// shutting down get up to `SHUTDOWN_GRACE` each to finish.
    pub async fn run(mut self) {
        info!("Dictation runtime started");

        loop {
            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(Command::Shutdown) | None => break,
                    Some(command) => self.dispatch(command),
                },
                Some(event) = self.events.recv() => {
                    self.controller.handle_event(event);
                }
            }
        }

        for task in self.controller.dispose() {
            match timeout(SHUTDOWN_GRACE, task).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!("Recognition session task failed: {}", e),
                Err(_) => warn!("Recognition session did not finish within {:?}", SHUTDOWN_GRACE),
            }
        }
        info!("Dictation runtime stopped");
    }

    fn dispatch(&mut self, command: Command) {
        let reply = match command {
            Command::Toggle(reply) => {
                if let Err(e) = self.controller.toggle() {
                    warn!("Toggle failed: {}", e);
                }
                reply
            }
            Command::Start(reply) => {
                if let Err(e) = self.controller.start() {
                    warn!("Start failed: {}", e);
                }
                reply
            }
            Command::Stop(reply) => {
                self.controller.stop();
                reply
            }
            Command::Clear(reply) => {
                self.controller.clear_transcript();
                reply
            }
            Command::Snapshot(reply) => reply,
            Command::Shutdown => return,
        };

        // The requester may have gone away; the state change still stands
        let _ = reply.send(self.controller.snapshot());
    }
}
