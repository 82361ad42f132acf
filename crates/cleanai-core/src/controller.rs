//! Application controller.
//!
//! The controller is a single tokio task that owns the [`SessionStore`].
//! Every request reaches it as a [`Command`] on an mpsc channel, so session
//! mutations happen one at a time without any lock around the session.
//! [`ControllerHandle`] is the cloneable client side.
//!
//! Entering `loading` spawns a background task that runs the reveal loop and
//! the backend call together. The task reports back with the generation it
//! was started for; results from an older generation are dropped. Chat
//! replies are produced the same way, so a slow responder never holds up
//! other commands.

use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};
use tokio_util::sync::CancellationToken;

use crate::config::AppConfig;
use crate::error::{CleanAiError, Result};
use crate::processor::{DatasetProcessor, ImmediateProcessor};
use crate::responder::{Responder, ResponseStub};
use crate::router::{Action, Effect, LoadingOutcome, PageRouter, View};
use crate::session::{ChatMessage, PageId, Revision, Session, SessionStore};
use crate::typer::{FactTyper, TyperFrame, TyperOutcome};

const COMMAND_BUFFER: usize = 32;

enum Command {
    Dispatch {
        action: Action,
        reply: oneshot::Sender<Result<View>>,
    },
    View {
        reply: oneshot::Sender<View>,
    },
    Snapshot {
        reply: oneshot::Sender<Session>,
    },
    LoadingResolved {
        generation: u64,
        outcome: LoadingOutcome,
    },
    ReplyReceived {
        generation: u64,
        reply: Result<ChatMessage>,
    },
    Shutdown,
}

/// Fluent builder for the controller task.
///
/// Collaborators default to the placeholder responder and the immediate
/// processor.
pub struct AppControllerBuilder {
    config: AppConfig,
    responder: Option<Arc<dyn Responder>>,
    processor: Option<Arc<dyn DatasetProcessor>>,
}

impl AppControllerBuilder {
    pub fn with_responder(mut self, responder: Arc<dyn Responder>) -> Self {
        self.responder = Some(responder);
        self
    }

    pub fn with_processor(mut self, processor: Arc<dyn DatasetProcessor>) -> Self {
        self.processor = Some(processor);
        self
    }

    /// Spawns the controller on the current tokio runtime.
    pub fn spawn(self) -> ControllerHandle {
        let config = self.config;
        let (commands, receiver) = mpsc::channel(COMMAND_BUFFER);
        let (frames, frames_rx) = watch::channel(TyperFrame::default());
        let frames = Arc::new(frames);

        let store = SessionStore::new(Session::new(config.chat.greeting.clone()));
        let revisions = store.subscribe();

        let responder = self.responder.unwrap_or_else(|| {
            Arc::new(ResponseStub::new(config.chat.acknowledgment.clone()))
        });
        let processor = self
            .processor
            .unwrap_or_else(|| Arc::new(ImmediateProcessor));

        let controller = AppController {
            store,
            router: PageRouter::from_config(&config.upload),
            typer: FactTyper::from_config(&config.typer),
            responder,
            processor,
            instruction: config.backend.instruction.clone(),
            frames: Arc::clone(&frames),
            generation: 0,
            loading_cancel: None,
            commands: commands.downgrade(),
            receiver,
        };
        tokio::spawn(controller.run());

        ControllerHandle {
            commands,
            frames: frames_rx,
            revisions,
        }
    }
}

/// Owner of the session. Only reachable through a [`ControllerHandle`].
pub struct AppController {
    store: SessionStore,
    router: PageRouter,
    typer: FactTyper,
    responder: Arc<dyn Responder>,
    processor: Arc<dyn DatasetProcessor>,
    instruction: String,
    frames: Arc<watch::Sender<TyperFrame>>,
    generation: u64,
    loading_cancel: Option<CancellationToken>,
    commands: mpsc::WeakSender<Command>,
    receiver: mpsc::Receiver<Command>,
}

impl AppController {
    pub fn builder(config: AppConfig) -> AppControllerBuilder {
        AppControllerBuilder {
            config,
            responder: None,
            processor: None,
        }
    }

    async fn run(mut self) {
        tracing::info!("[AppController] Session {} started", self.store.session().id);

        while let Some(command) = self.receiver.recv().await {
            match command {
                Command::Dispatch { action, reply } => {
                    let result = self.dispatch(action);
                    let _ = reply.send(result);
                }
                Command::View { reply } => {
                    let _ = reply.send(self.render());
                }
                Command::Snapshot { reply } => {
                    let _ = reply.send(self.store.snapshot());
                }
                Command::LoadingResolved { generation, outcome } => {
                    self.resolve_loading(generation, outcome);
                }
                Command::ReplyReceived { generation, reply } => {
                    self.receive_reply(generation, reply);
                }
                Command::Shutdown => break,
            }
        }

        self.cancel_loading();
        tracing::info!("[AppController] Session {} stopped", self.store.session().id);
    }

    fn dispatch(&mut self, action: Action) -> Result<View> {
        let action_name = action.name();
        let transition = match self.store.update(|session| self.router.apply(session, action)) {
            Ok(transition) => transition,
            Err(err) => {
                tracing::warn!("[AppController] Ignoring {}: {}", action_name, err);
                return Err(err);
            }
        };
        tracing::info!(
            "[AppController] {}: {} -> {}",
            action_name,
            transition.from,
            transition.to
        );

        match transition.effect {
            Some(Effect::BeginLoading) => self.begin_loading(),
            Some(Effect::Respond(text)) => self.request_reply(text),
            None => {}
        }

        Ok(self.render())
    }

    fn render(&mut self) -> View {
        if self.store.session().page.is_recognized() {
            return self.router.view(self.store.session());
        }
        match self.store.update(|session| Ok(self.router.render(session))) {
            Ok(view) => view,
            Err(_) => self.router.view(self.store.session()),
        }
    }

    fn begin_loading(&mut self) {
        self.cancel_loading();
        self.generation += 1;
        let generation = self.generation;

        let cancel = CancellationToken::new();
        self.loading_cancel = Some(cancel.clone());

        let facts = self.typer.pick(&mut rand::thread_rng());
        let files = self.store.session().files.clone();
        let typer = self.typer.clone();
        let frames = Arc::clone(&self.frames);
        let processor = Arc::clone(&self.processor);
        let instruction = self.instruction.clone();
        let commands = self.commands.clone();

        tracing::info!(
            "[AppController] Loading generation {} with {} file(s)",
            generation,
            files.len()
        );

        tokio::spawn(async move {
            let reveal = typer.run(&facts, &frames, &cancel);
            let backend = async {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => None,
                    result = processor.process(&files, &instruction) => Some(result),
                }
            };
            let (reveal, backend) = tokio::join!(reveal, backend);

            let (TyperOutcome::Completed { .. }, Some(result)) = (reveal, backend) else {
                tracing::debug!("[AppController] Loading generation {} cancelled", generation);
                return;
            };
            let outcome = match result {
                Ok(report) => LoadingOutcome::Processed(report),
                Err(err) => {
                    tracing::warn!("[AppController] Dataset processing failed: {}", err);
                    LoadingOutcome::Failed(err.to_string())
                }
            };

            if let Some(commands) = commands.upgrade() {
                let _ = commands
                    .send(Command::LoadingResolved { generation, outcome })
                    .await;
            }
        });
    }

    fn resolve_loading(&mut self, generation: u64, outcome: LoadingOutcome) {
        if generation != self.generation {
            tracing::debug!(
                "[AppController] Dropping stale loading result {} (current {})",
                generation,
                self.generation
            );
            return;
        }
        self.loading_cancel = None;

        let action = Action::LoadingFinished(outcome);
        match self.store.update(|session| self.router.apply(session, action)) {
            Ok(transition) => {
                tracing::info!("[AppController] Loading finished: -> {}", transition.to)
            }
            Err(err) => tracing::warn!("[AppController] Loading result ignored: {}", err),
        }
    }

    /// Asks the responder in the background. The reply is tagged with the
    /// generation of the chat it belongs to.
    fn request_reply(&self, text: String) {
        let generation = self.generation;
        let responder = Arc::clone(&self.responder);
        let commands = self.commands.clone();

        tokio::spawn(async move {
            let reply = responder.respond(&text).await;
            if let Err(err) = &reply {
                tracing::warn!("[AppController] Responder failed: {}", err);
            }
            if let Some(commands) = commands.upgrade() {
                let _ = commands
                    .send(Command::ReplyReceived { generation, reply })
                    .await;
            }
        });
    }

    fn receive_reply(&mut self, generation: u64, reply: Result<ChatMessage>) {
        if generation != self.generation {
            tracing::debug!(
                "[AppController] Dropping reply for generation {} (current {})",
                generation,
                self.generation
            );
            return;
        }
        let result = self.store.update(|session| {
            self.router.complete_reply(session, reply);
            Ok(())
        });
        if let Err(err) = result {
            tracing::warn!("[AppController] Reply not recorded: {}", err);
        }
    }

    fn cancel_loading(&mut self) {
        if let Some(cancel) = self.loading_cancel.take() {
            cancel.cancel();
        }
    }
}

/// Cloneable client of the controller task.
#[derive(Clone)]
pub struct ControllerHandle {
    commands: mpsc::Sender<Command>,
    frames: watch::Receiver<TyperFrame>,
    revisions: watch::Receiver<Revision>,
}

impl ControllerHandle {
    /// Spawns a controller with the default collaborators.
    pub fn spawn(config: AppConfig) -> Self {
        AppController::builder(config).spawn()
    }

    /// Applies an action and returns the view that results from it.
    pub async fn dispatch(&self, action: Action) -> Result<View> {
        let (reply, response) = oneshot::channel();
        self.send(Command::Dispatch { action, reply }).await?;
        response.await.map_err(Self::closed)?
    }

    pub async fn view(&self) -> Result<View> {
        let (reply, response) = oneshot::channel();
        self.send(Command::View { reply }).await?;
        response.await.map_err(Self::closed)
    }

    pub async fn snapshot(&self) -> Result<Session> {
        let (reply, response) = oneshot::channel();
        self.send(Command::Snapshot { reply }).await?;
        response.await.map_err(Self::closed)
    }

    /// Latest frame of the reveal loop.
    pub fn subscribe_typer(&self) -> watch::Receiver<TyperFrame> {
        self.frames.clone()
    }

    /// Notified after every session mutation.
    pub fn subscribe_revisions(&self) -> watch::Receiver<Revision> {
        self.revisions.clone()
    }

    pub fn current_page(&self) -> PageId {
        self.revisions.borrow().page.clone()
    }

    pub async fn shutdown(&self) -> Result<()> {
        self.send(Command::Shutdown).await
    }

    async fn send(&self, command: Command) -> Result<()> {
        self.commands
            .send(command)
            .await
            .map_err(|_| CleanAiError::ControllerClosed("command channel closed".to_string()))
    }

    fn closed(_: oneshot::error::RecvError) -> CleanAiError {
        CleanAiError::ControllerClosed("controller dropped the reply".to_string())
    }
}
