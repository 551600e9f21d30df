//! Run Turn use case: the conversation controller.
//!
//! Orchestrates one turn: appends the user message and a model
//! placeholder, routes the prompt to the right gateway call shape, feeds
//! streamed chunks into the placeholder, and upserts the session once the
//! turn settles or errors. Exactly one turn may be in flight; submissions
//! while busy are rejected rather than queued.

use crate::ports::model_gateway::{ChatHandle, GatewayError, GenerateRequest, ModelGateway};
use crate::ports::transcript_logger::{TranscriptEvent, TranscriptLogger};
use crate::ports::turn_progress::TurnProgress;
use crate::session_store::SessionStore;
use palaver_domain::{
    ClassifiedPrompt, DomainError, GenerationMode, GenerationOutput, InlineImage, Message, Model,
    PromptTemplate, Session, StreamEvent, classify,
};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Fallback content for a failed image-generation turn. The other modes
/// surface the underlying error message instead.
pub const IMAGE_FALLBACK_CONTENT: &str =
    "Sorry, something went wrong while creating that image. Please try again.";

/// Lifecycle of the active turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    /// No turn in flight.
    Idle,
    /// Gateway call issued, nothing received yet.
    Submitting,
    /// Incremental chunks arriving.
    Streaming,
    /// Last turn committed successfully.
    Settled,
    /// Last turn ended with an error message committed in its place.
    Errored,
}

/// Errors that reject a submission before a turn starts.
///
/// Gateway failures are not errors at this level; they settle the turn
/// with error content and a persisted session.
#[derive(Error, Debug)]
pub enum TurnError {
    #[error("A turn is already in flight")]
    Busy,

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// A submission: text and/or an attached image, with an optional explicit
/// mode that bypasses slash-command classification.
#[derive(Debug, Clone, Default)]
pub struct TurnInput {
    pub text: String,
    pub image: Option<InlineImage>,
    pub mode: Option<GenerationMode>,
}

impl TurnInput {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_image(mut self, image: InlineImage) -> Self {
        self.image = Some(image);
        self
    }

    pub fn with_mode(mut self, mode: GenerationMode) -> Self {
        self.mode = Some(mode);
        self
    }
}

/// What a completed turn produced.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub session_id: String,
    pub mode: GenerationMode,
    /// The committed model message (error content when `errored`).
    pub message: Message,
    pub errored: bool,
}

/// Model selection for the controller.
#[derive(Debug, Clone)]
pub struct ConversationConfig {
    pub chat_model: Model,
    pub image_model: Model,
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            chat_model: Model::default_chat(),
            image_model: Model::default_image(),
        }
    }
}

/// The conversation controller.
///
/// Owns the explicit application state the UI reads: the session store,
/// the live working session, per-session chat handles, and the turn
/// phase. Session switching is a pure state-replacement operation.
pub struct ConversationController {
    gateway: Arc<dyn ModelGateway>,
    transcript: Arc<dyn TranscriptLogger>,
    config: ConversationConfig,
    store: SessionStore,
    /// The live session; persisted only when a turn settles or errors.
    current: Option<Session>,
    /// Stateful chat handles keyed by session id. Cleared on user switch.
    chats: HashMap<String, Box<dyn ChatHandle>>,
    phase: TurnPhase,
}

impl ConversationController {
    pub fn new(
        gateway: Arc<dyn ModelGateway>,
        transcript: Arc<dyn TranscriptLogger>,
        config: ConversationConfig,
        store: SessionStore,
    ) -> Self {
        Self {
            gateway,
            transcript,
            config,
            store,
            current: None,
            chats: HashMap::new(),
            phase: TurnPhase::Idle,
        }
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    /// True while a turn is between submission and settlement.
    pub fn is_in_flight(&self) -> bool {
        matches!(self.phase, TurnPhase::Submitting | TurnPhase::Streaming)
    }

    pub fn user(&self) -> &str {
        self.store.user()
    }

    /// Persisted sessions, oldest first.
    pub fn sessions(&self) -> &[Session] {
        self.store.sessions()
    }

    /// The live session, if any.
    pub fn current_session(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    /// Start a fresh conversation; a session id is allocated on the first
    /// submission.
    pub fn new_chat(&mut self) {
        self.current = None;
        self.phase = TurnPhase::Idle;
    }

    /// Make the persisted session with `id` current. Returns false if no
    /// such session exists.
    pub fn switch_to(&mut self, id: &str) -> bool {
        match self.store.get(id) {
            Some(session) => {
                self.current = Some(session.clone());
                self.phase = TurnPhase::Idle;
                true
            }
            None => false,
        }
    }

    /// Delete a persisted session (and the live copy if it is current).
    pub fn delete_session(&mut self, id: &str) {
        self.store.remove(id);
        if self.current.as_ref().is_some_and(|s| s.id() == id) {
            self.current = None;
        }
        self.chats.remove(id);
    }

    /// Sign in as a different user: in-memory state is discarded and the
    /// new user's disjoint collection loaded.
    pub fn switch_user(&mut self, user: impl Into<String>) {
        self.store.switch_user(user);
        self.current = None;
        self.chats.clear();
        self.phase = TurnPhase::Idle;
    }

    /// Sign out: drop the persisted collection along with in-memory state.
    pub fn clear_history(&mut self) {
        self.store.clear();
        self.current = None;
        self.chats.clear();
    }

    /// Submit one turn and drive it to settlement.
    ///
    /// Rejected with [`TurnError::Busy`] while a turn is in flight and
    /// with a domain error for empty or unclassifiable input. Once a turn
    /// starts it always settles: gateway failures are committed as error
    /// content and the session is persisted either way.
    pub async fn submit(
        &mut self,
        input: TurnInput,
        progress: &dyn TurnProgress,
    ) -> Result<TurnOutcome, TurnError> {
        if self.is_in_flight() {
            return Err(TurnError::Busy);
        }

        let classified = self.route(&input)?;
        self.phase = TurnPhase::Submitting;

        let mut session = self.current.take().unwrap_or_default();
        let display_text = input.text.trim().to_string();
        let user_message = match input.image.clone() {
            Some(image) => Message::user_with_image(display_text, image),
            None => Message::user(display_text),
        };
        let placeholder = Message::model_placeholder();
        let placeholder_id = placeholder.id.clone();
        session.push(user_message);
        session.push(placeholder);
        progress.on_submitted(&session);

        self.transcript.log(TranscriptEvent::new(
            "turn_submitted",
            serde_json::json!({
                "session": session.id(),
                "mode": classified.mode.as_str(),
                "prompt_chars": classified.prompt.chars().count(),
                "has_image": input.image.is_some(),
            }),
        ));

        let result = match classified.mode {
            GenerationMode::Chat => {
                self.run_chat(&mut session, &placeholder_id, &classified, input.image, progress)
                    .await
            }
            GenerationMode::Image => {
                self.run_image(&mut session, &placeholder_id, &classified, input.image)
                    .await
            }
            GenerationMode::Scene | GenerationMode::App => {
                self.run_document(&mut session, &placeholder_id, &classified, input.image)
                    .await
            }
        };

        let errored = result.is_err();
        match result {
            Ok(()) => {
                self.phase = TurnPhase::Settled;
                let message = last_message(&session);
                progress.on_settled(&message);
                self.transcript.log(TranscriptEvent::new(
                    "model_response",
                    serde_json::json!({
                        "session": session.id(),
                        "mode": classified.mode.as_str(),
                        "content_chars": message.content.chars().count(),
                        "has_image": message.image.is_some(),
                    }),
                ));
            }
            Err(e) => {
                let content = match classified.mode {
                    GenerationMode::Image => IMAGE_FALLBACK_CONTENT.to_string(),
                    _ => format!("Error: {e}"),
                };
                session.update_streaming_content(&placeholder_id, &content);
                self.phase = TurnPhase::Errored;
                progress.on_error(&content);
                self.transcript.log(TranscriptEvent::new(
                    "turn_failed",
                    serde_json::json!({
                        "session": session.id(),
                        "mode": classified.mode.as_str(),
                        "error": e.to_string(),
                    }),
                ));
            }
        }

        // The session is persisted with the error content too, so a failed
        // turn survives reload exactly as the user saw it.
        self.store.upsert(session.clone());
        let outcome = TurnOutcome {
            session_id: session.id().to_string(),
            mode: classified.mode,
            message: last_message(&session),
            errored,
        };
        self.current = Some(session);
        Ok(outcome)
    }

    /// Apply mode routing: an explicit mode wins, an attached image with
    /// no text defaults to chat, everything else goes through the
    /// slash-command classifier.
    fn route(&self, input: &TurnInput) -> Result<ClassifiedPrompt, TurnError> {
        let trimmed = input.text.trim();
        if let Some(mode) = input.mode {
            if trimmed.is_empty() && input.image.is_none() {
                return Err(DomainError::EmptyPrompt.into());
            }
            return Ok(ClassifiedPrompt {
                mode,
                prompt: trimmed.to_string(),
            });
        }
        if trimmed.is_empty() {
            if input.image.is_some() {
                return Ok(ClassifiedPrompt {
                    mode: GenerationMode::Chat,
                    prompt: String::new(),
                });
            }
            return Err(DomainError::EmptyPrompt.into());
        }
        Ok(classify(trimmed)?)
    }

    async fn run_chat(
        &mut self,
        session: &mut Session,
        placeholder_id: &str,
        classified: &ClassifiedPrompt,
        image: Option<InlineImage>,
        progress: &dyn TurnProgress,
    ) -> Result<(), GatewayError> {
        let handle = match self.chats.entry(session.id().to_string()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                debug!("opening chat handle for session {}", session.id());
                let handle = self
                    .gateway
                    .open_chat(&self.config.chat_model, PromptTemplate::chat_system())
                    .await?;
                entry.insert(handle)
            }
        };

        let mut stream = handle.send(&classified.prompt, image).await?;
        let mut accumulated = String::new();

        while let Some(event) = stream.receiver.recv().await {
            match event {
                StreamEvent::Delta(chunk) => {
                    self.phase = TurnPhase::Streaming;
                    accumulated.push_str(&chunk);
                    session.update_streaming_content(placeholder_id, &accumulated);
                    progress.on_delta(&chunk, &accumulated);
                }
                StreamEvent::Completed(text) => {
                    if accumulated.is_empty() {
                        accumulated = text;
                        session.update_streaming_content(placeholder_id, &accumulated);
                    }
                    return Ok(());
                }
                StreamEvent::Error(e) => {
                    return Err(GatewayError::RequestFailed(e));
                }
            }
        }
        // Producer dropped without a terminal event; keep what arrived.
        info!("stream closed without completion; committing partial content");
        Ok(())
    }

    async fn run_image(
        &mut self,
        session: &mut Session,
        placeholder_id: &str,
        classified: &ClassifiedPrompt,
        image: Option<InlineImage>,
    ) -> Result<(), GatewayError> {
        let mut request =
            GenerateRequest::image(self.config.image_model.clone(), &classified.prompt);
        if let Some(image) = image {
            request = request.with_image(image);
        }
        match self.gateway.generate(request).await? {
            GenerationOutput::Image(payload) => {
                session.attach_image(placeholder_id, payload);
                Ok(())
            }
            GenerationOutput::Text(text) => {
                // The model answered in prose instead of pixels; commit it
                // rather than pretending nothing came back.
                session.update_streaming_content(placeholder_id, &text);
                Ok(())
            }
        }
    }

    async fn run_document(
        &mut self,
        session: &mut Session,
        placeholder_id: &str,
        classified: &ClassifiedPrompt,
        image: Option<InlineImage>,
    ) -> Result<(), GatewayError> {
        let prompt = match classified.mode {
            GenerationMode::Scene => PromptTemplate::scene_document(&classified.prompt),
            _ => PromptTemplate::app_document(&classified.prompt),
        };
        let mut request = GenerateRequest::text(self.config.chat_model.clone(), prompt);
        if let Some(image) = image {
            request = request.with_image(image);
        }
        match self.gateway.generate(request).await? {
            GenerationOutput::Text(text) => {
                session.update_streaming_content(placeholder_id, &text);
                Ok(())
            }
            GenerationOutput::Image(payload) => {
                session.attach_image(placeholder_id, payload);
                Ok(())
            }
        }
    }

    #[cfg(test)]
    fn set_phase_for_test(&mut self, phase: TurnPhase) {
        self.phase = phase;
    }
}

fn last_message(session: &Session) -> Message {
    session
        .messages()
        .last()
        .cloned()
        .expect("a submitted turn always has messages")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::key_value_store::InMemoryStore;
    use crate::ports::model_gateway::StreamHandle;
    use crate::ports::transcript_logger::NoTranscriptLogger;
    use crate::ports::turn_progress::NoTurnProgress;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::mpsc;

    /// What the gateway should do for the next call, in order.
    enum Reply {
        /// Streamed chat chunks, then completion.
        Stream(Vec<&'static str>),
        /// Streamed chunks, then a stream-level error.
        StreamThenError(Vec<&'static str>, &'static str),
        /// Single-shot output.
        Single(GenerationOutput),
        /// The call itself fails.
        Fail(&'static str),
    }

    struct ScriptedGateway {
        replies: Arc<Mutex<VecDeque<Reply>>>,
        opened_chats: AtomicUsize,
        generate_requests: Mutex<Vec<GenerateRequest>>,
    }

    impl ScriptedGateway {
        fn new(replies: Vec<Reply>) -> Self {
            Self {
                replies: Arc::new(Mutex::new(replies.into())),
                opened_chats: AtomicUsize::new(0),
                generate_requests: Mutex::new(Vec::new()),
            }
        }

        fn chats_opened(&self) -> usize {
            self.opened_chats.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ModelGateway for ScriptedGateway {
        async fn open_chat(
            &self,
            model: &Model,
            _system_instruction: &str,
        ) -> Result<Box<dyn ChatHandle>, GatewayError> {
            self.opened_chats.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(ScriptedChat {
                model: model.clone(),
                replies: Arc::clone(&self.replies),
            }))
        }

        async fn generate(
            &self,
            request: GenerateRequest,
        ) -> Result<GenerationOutput, GatewayError> {
            self.generate_requests.lock().unwrap().push(request);
            match self.replies.lock().unwrap().pop_front() {
                Some(Reply::Single(output)) => Ok(output),
                Some(Reply::Fail(message)) => {
                    Err(GatewayError::RequestFailed(message.to_string()))
                }
                other => panic!(
                    "unexpected generate call (scripted reply: {})",
                    if other.is_some() { "stream" } else { "none" }
                ),
            }
        }
    }

    struct ScriptedChat {
        model: Model,
        replies: Arc<Mutex<VecDeque<Reply>>>,
    }

    #[async_trait]
    impl ChatHandle for ScriptedChat {
        fn model(&self) -> &Model {
            &self.model
        }

        async fn send(
            &self,
            _text: &str,
            _image: Option<InlineImage>,
        ) -> Result<StreamHandle, GatewayError> {
            let reply = self.replies.lock().unwrap().pop_front();
            match reply {
                Some(Reply::Stream(chunks)) => {
                    let (tx, rx) = mpsc::channel(chunks.len() + 1);
                    let mut full = String::new();
                    for chunk in chunks {
                        full.push_str(chunk);
                        tx.send(StreamEvent::Delta(chunk.to_string())).await.unwrap();
                    }
                    tx.send(StreamEvent::Completed(full)).await.unwrap();
                    Ok(StreamHandle::new(rx))
                }
                Some(Reply::StreamThenError(chunks, error)) => {
                    let (tx, rx) = mpsc::channel(chunks.len() + 1);
                    for chunk in chunks {
                        tx.send(StreamEvent::Delta(chunk.to_string())).await.unwrap();
                    }
                    tx.send(StreamEvent::Error(error.to_string())).await.unwrap();
                    Ok(StreamHandle::new(rx))
                }
                Some(Reply::Fail(message)) => {
                    Err(GatewayError::RequestFailed(message.to_string()))
                }
                _ => panic!("unexpected chat send"),
            }
        }
    }

    /// Records every progress notification for assertions.
    #[derive(Default)]
    struct RecordingProgress {
        accumulated: Mutex<Vec<String>>,
        settled: Mutex<Vec<Message>>,
        errors: Mutex<Vec<String>>,
    }

    impl TurnProgress for RecordingProgress {
        fn on_delta(&self, _delta: &str, accumulated: &str) {
            self.accumulated.lock().unwrap().push(accumulated.to_string());
        }

        fn on_settled(&self, message: &Message) {
            self.settled.lock().unwrap().push(message.clone());
        }

        fn on_error(&self, content: &str) {
            self.errors.lock().unwrap().push(content.to_string());
        }
    }

    fn controller_with(gateway: Arc<ScriptedGateway>) -> ConversationController {
        let store = SessionStore::open(Arc::new(InMemoryStore::new()), "ada");
        ConversationController::new(
            gateway,
            Arc::new(NoTranscriptLogger),
            ConversationConfig::default(),
            store,
        )
    }

    fn png() -> InlineImage {
        InlineImage {
            data: "aGVsbG8=".to_string(),
            mime_type: "image/png".to_string(),
        }
    }

    #[tokio::test]
    async fn chat_stream_accumulates_chunk_by_chunk() {
        let gateway = Arc::new(ScriptedGateway::new(vec![Reply::Stream(vec![
            "Hel", "lo, ", "world",
        ])]));
        let mut controller = controller_with(gateway);
        let progress = RecordingProgress::default();

        let outcome = controller
            .submit(TurnInput::text("hi"), &progress)
            .await
            .unwrap();

        assert_eq!(outcome.mode, GenerationMode::Chat);
        assert!(!outcome.errored);
        assert_eq!(outcome.message.content, "Hello, world");
        assert_eq!(
            *progress.accumulated.lock().unwrap(),
            vec!["Hel", "Hello, ", "Hello, world"]
        );
        assert_eq!(controller.phase(), TurnPhase::Settled);
        assert!(!controller.is_in_flight());

        // Settled turn is persisted: one session, user + model message
        let sessions = controller.sessions();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].title(), "hi");
        assert_eq!(sessions[0].messages().len(), 2);
        assert_eq!(sessions[0].messages()[1].content, "Hello, world");
    }

    #[tokio::test]
    async fn chat_error_commits_error_message_and_persists() {
        let gateway = Arc::new(ScriptedGateway::new(vec![Reply::Fail("boom")]));
        let mut controller = controller_with(gateway);
        let progress = RecordingProgress::default();

        let outcome = controller
            .submit(TurnInput::text("hi"), &progress)
            .await
            .unwrap();

        assert!(outcome.errored);
        assert!(outcome.message.content.starts_with("Error: "));
        assert_eq!(controller.phase(), TurnPhase::Errored);
        assert!(!controller.is_in_flight());
        assert_eq!(progress.errors.lock().unwrap().len(), 1);

        // Exactly one model message, and the errored session is persisted
        let session = &controller.sessions()[0];
        let model_messages: Vec<_> = session
            .messages()
            .iter()
            .filter(|m| m.role == palaver_domain::Role::Model)
            .collect();
        assert_eq!(model_messages.len(), 1);
        assert!(model_messages[0].content.starts_with("Error: "));
    }

    #[tokio::test]
    async fn stream_error_replaces_partial_content() {
        let gateway = Arc::new(ScriptedGateway::new(vec![Reply::StreamThenError(
            vec!["Hel"],
            "connection reset",
        )]));
        let mut controller = controller_with(gateway);

        let outcome = controller
            .submit(TurnInput::text("hi"), &NoTurnProgress)
            .await
            .unwrap();

        assert!(outcome.errored);
        assert!(outcome.message.content.starts_with("Error: "));
        assert!(outcome.message.content.contains("connection reset"));
    }

    #[tokio::test]
    async fn imagine_command_routes_to_image_generation() {
        let gateway = Arc::new(ScriptedGateway::new(vec![Reply::Single(
            GenerationOutput::Image(png()),
        )]));
        let mut controller = controller_with(Arc::clone(&gateway));

        let outcome = controller
            .submit(TurnInput::text("/imagine a red cube"), &NoTurnProgress)
            .await
            .unwrap();

        assert_eq!(outcome.mode, GenerationMode::Image);
        assert!(outcome.message.image.is_some());

        let requests = gateway.generate_requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].prompt, "a red cube");
        assert!(requests[0].expect_image);
    }

    #[tokio::test]
    async fn image_failure_uses_fixed_apology() {
        let gateway = Arc::new(ScriptedGateway::new(vec![Reply::Fail("quota")]));
        let mut controller = controller_with(gateway);

        let outcome = controller
            .submit(TurnInput::text("/imagine a red cube"), &NoTurnProgress)
            .await
            .unwrap();

        assert!(outcome.errored);
        assert_eq!(outcome.message.content, IMAGE_FALLBACK_CONTENT);
        // The apologetic turn still persists
        assert_eq!(controller.sessions().len(), 1);
    }

    #[tokio::test]
    async fn scene_mode_wraps_description_in_template() {
        let gateway = Arc::new(ScriptedGateway::new(vec![Reply::Single(
            GenerationOutput::Text("<html>scene</html>".to_string()),
        )]));
        let mut controller = controller_with(Arc::clone(&gateway));

        let outcome = controller
            .submit(TurnInput::text("/scene a forest clearing"), &NoTurnProgress)
            .await
            .unwrap();

        assert_eq!(outcome.mode, GenerationMode::Scene);
        assert_eq!(outcome.message.content, "<html>scene</html>");

        let requests = gateway.generate_requests.lock().unwrap();
        assert!(requests[0].prompt.contains("a forest clearing"));
        assert!(requests[0].prompt.contains("three.js"));
        assert!(!requests[0].expect_image);
    }

    #[tokio::test]
    async fn busy_controller_rejects_submission() {
        let gateway = Arc::new(ScriptedGateway::new(vec![]));
        let mut controller = controller_with(gateway);
        controller.set_phase_for_test(TurnPhase::Streaming);

        let result = controller
            .submit(TurnInput::text("hi"), &NoTurnProgress)
            .await;
        assert!(matches!(result, Err(TurnError::Busy)));
    }

    #[tokio::test]
    async fn empty_and_unknown_input_rejected_before_turn_starts() {
        let gateway = Arc::new(ScriptedGateway::new(vec![]));
        let mut controller = controller_with(gateway);

        let empty = controller.submit(TurnInput::text("   "), &NoTurnProgress).await;
        assert!(matches!(
            empty,
            Err(TurnError::Domain(DomainError::EmptyPrompt))
        ));

        let unknown = controller
            .submit(TurnInput::text("/summon x"), &NoTurnProgress)
            .await;
        assert!(matches!(
            unknown,
            Err(TurnError::Domain(DomainError::UnknownCommand(_)))
        ));

        // Nothing was appended or persisted
        assert_eq!(controller.phase(), TurnPhase::Idle);
        assert!(controller.current_session().is_none());
        assert!(controller.sessions().is_empty());
    }

    #[tokio::test]
    async fn chat_handle_is_reused_within_a_session() {
        let gateway = Arc::new(ScriptedGateway::new(vec![
            Reply::Stream(vec!["one"]),
            Reply::Stream(vec!["two"]),
            Reply::Stream(vec!["three"]),
        ]));
        let mut controller = controller_with(Arc::clone(&gateway));

        controller.submit(TurnInput::text("a"), &NoTurnProgress).await.unwrap();
        controller.submit(TurnInput::text("b"), &NoTurnProgress).await.unwrap();
        assert_eq!(gateway.chats_opened(), 1);
        assert_eq!(controller.sessions().len(), 1);
        assert_eq!(controller.sessions()[0].messages().len(), 4);

        // A fresh conversation gets its own handle and session
        controller.new_chat();
        controller.submit(TurnInput::text("c"), &NoTurnProgress).await.unwrap();
        assert_eq!(gateway.chats_opened(), 2);
        assert_eq!(controller.sessions().len(), 2);
    }

    #[tokio::test]
    async fn attached_image_without_text_is_plain_chat() {
        let gateway = Arc::new(ScriptedGateway::new(vec![Reply::Stream(vec![
            "A photo of an otter.",
        ])]));
        let mut controller = controller_with(gateway);

        let outcome = controller
            .submit(TurnInput::default().with_image(png()), &NoTurnProgress)
            .await
            .unwrap();

        assert_eq!(outcome.mode, GenerationMode::Chat);
        let session = controller.current_session().unwrap();
        assert!(session.messages()[0].image.is_some());
        assert_eq!(session.messages()[1].content, "A photo of an otter.");
    }

    #[tokio::test]
    async fn switch_user_discards_live_state() {
        let gateway = Arc::new(ScriptedGateway::new(vec![Reply::Stream(vec!["hi"])]));
        let mut controller = controller_with(gateway);
        controller.submit(TurnInput::text("hello"), &NoTurnProgress).await.unwrap();
        assert!(controller.current_session().is_some());

        controller.switch_user("brin");
        assert_eq!(controller.user(), "brin");
        assert!(controller.current_session().is_none());
        assert!(controller.sessions().is_empty());
    }
}
