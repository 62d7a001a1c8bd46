//! Study session: the mutable state behind one learner's sitting.
//!
//! The session owns the active section address, the rendering dispatcher's
//! widget state, the per-section conversation, and the per-section artifact
//! shelf. Navigation invalidates everything: each section change bumps an
//! epoch counter, and generation responses carry the epoch they were issued
//! under, so a response that arrives after navigation is silently discarded
//! instead of being applied to the wrong section.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::artifact::{parse_artifact, ArtifactKind, GeneratedArtifact};
use crate::curriculum::Curriculum;
use crate::error::SessionError;
use crate::model::SectionAddress;
use crate::prompt::{artifact_prompt, chat_prompt};
use crate::render::Renderer;
use crate::traits::{GenerateRequest, ResponseFormat, TutorClient, TUTOR_SYSTEM_PROMPT};

/// Who authored a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

/// One message in the scoped tutoring conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub id: Uuid,
    pub sender: Sender,
    pub text: String,
    pub at: DateTime<Utc>,
}

impl ConversationTurn {
    fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender,
            text: text.into(),
            at: Utc::now(),
        }
    }
}

/// Outcome of delivering a generation response to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// The response was applied to session state.
    Applied,
    /// The session navigated away before the response arrived; it was
    /// discarded without side effects.
    Stale,
}

/// Claim ticket for an in-flight artifact request.
#[derive(Debug, Clone)]
pub struct ArtifactTicket {
    epoch: u64,
    kind: ArtifactKind,
    pub request: GenerateRequest,
}

/// Claim ticket for an in-flight chat request.
#[derive(Debug, Clone)]
pub struct ChatTicket {
    epoch: u64,
    pub request: GenerateRequest,
}

/// All mutable state for one sitting.
#[derive(Debug, Default)]
pub struct StudySession {
    epoch: u64,
    active: Option<SectionAddress>,
    renderer: Renderer,
    conversation: Vec<ConversationTurn>,
    artifacts: BTreeMap<ArtifactKind, GeneratedArtifact>,
    artifact_error: Option<String>,
    revealed_answers: HashSet<usize>,
    artifact_busy: bool,
    chat_busy: bool,
}

impl StudySession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Land on the curriculum's first section, if it has one.
    pub fn start(&mut self, curriculum: &Curriculum) {
        self.set_section(curriculum.first_address());
    }

    pub fn active(&self) -> Option<&SectionAddress> {
        self.active.as_ref()
    }

    pub fn renderer_mut(&mut self) -> &mut Renderer {
        &mut self.renderer
    }

    pub fn conversation(&self) -> &[ConversationTurn] {
        &self.conversation
    }

    pub fn artifacts(&self) -> &BTreeMap<ArtifactKind, GeneratedArtifact> {
        &self.artifacts
    }

    pub fn artifact_error(&self) -> Option<&str> {
        self.artifact_error.as_deref()
    }

    pub fn is_artifact_busy(&self) -> bool {
        self.artifact_busy
    }

    pub fn is_chat_busy(&self) -> bool {
        self.chat_busy
    }

    /// Navigate to a section (or to none). Bumps the epoch and clears every
    /// piece of per-section state, including busy flags: in-flight responses
    /// become stale and their channels reopen immediately.
    pub fn set_section(&mut self, addr: Option<SectionAddress>) {
        self.epoch += 1;
        debug!(epoch = self.epoch, section = ?addr.as_ref().map(|a| a.to_string()), "section change");
        self.active = addr;
        self.renderer.reset();
        self.conversation.clear();
        self.artifacts.clear();
        self.artifact_error = None;
        self.revealed_answers.clear();
        self.artifact_busy = false;
        self.chat_busy = false;
    }

    /// Show or hide the answer of one generated review question, by its index
    /// within the review-questions artifact.
    pub fn toggle_answer(&mut self, question_index: usize) {
        if !self.revealed_answers.remove(&question_index) {
            self.revealed_answers.insert(question_index);
        }
    }

    pub fn is_answer_revealed(&self, question_index: usize) -> bool {
        self.revealed_answers.contains(&question_index)
    }

    // -- artifacts ----------------------------------------------------------

    /// Open an artifact request for the active section. The artifact channel
    /// admits one request at a time.
    pub fn begin_artifact(
        &mut self,
        kind: ArtifactKind,
        curriculum: &Curriculum,
    ) -> Result<ArtifactTicket, SessionError> {
        if self.artifact_busy {
            return Err(SessionError::ChannelBusy("artifact"));
        }
        let addr = self.active.as_ref().ok_or(SessionError::NoActiveSection)?;
        let (chapter, section) = curriculum
            .section_at(addr)
            .ok_or(SessionError::NoActiveSection)?;

        self.artifact_busy = true;
        self.artifact_error = None;
        Ok(ArtifactTicket {
            epoch: self.epoch,
            kind,
            request: GenerateRequest {
                prompt: artifact_prompt(kind, &chapter.title, section),
                system_instruction: None,
                response_format: ResponseFormat::Json,
            },
        })
    }

    /// Deliver a provider outcome for an artifact request. `Err` carries a
    /// provider-side failure message; a parse failure is detected here.
    /// Either way the failure is scoped to this artifact kind and any
    /// previously shown artifact of another kind is untouched.
    pub fn complete_artifact(
        &mut self,
        ticket: ArtifactTicket,
        outcome: Result<String, String>,
    ) -> Delivery {
        if ticket.epoch != self.epoch {
            debug!(kind = %ticket.kind, "discarding stale artifact response");
            return Delivery::Stale;
        }
        self.artifact_busy = false;
        match outcome {
            Ok(raw) => match parse_artifact(ticket.kind, &raw) {
                Ok(artifact) => {
                    if ticket.kind == ArtifactKind::ReviewQuestions {
                        self.revealed_answers.clear();
                    }
                    self.artifacts.insert(ticket.kind, artifact);
                    self.artifact_error = None;
                }
                Err(e) => {
                    self.artifact_error = Some(e.to_string());
                }
            },
            Err(message) => {
                self.artifact_error = Some(message);
            }
        }
        Delivery::Applied
    }

    /// Run one artifact request end to end against a client.
    pub async fn request_artifact(
        &mut self,
        kind: ArtifactKind,
        curriculum: &Curriculum,
        client: &dyn TutorClient,
    ) -> Result<Delivery, SessionError> {
        let ticket = self.begin_artifact(kind, curriculum)?;
        let outcome = client
            .generate(&ticket.request)
            .await
            .map(|response| response.text)
            .map_err(|e| e.to_string());
        Ok(self.complete_artifact(ticket, outcome))
    }

    // -- chat ---------------------------------------------------------------

    /// Open a chat request for the active section. The learner's turn is
    /// appended optimistically, before the provider answers.
    pub fn begin_chat(
        &mut self,
        question: &str,
        curriculum: &Curriculum,
    ) -> Result<ChatTicket, SessionError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(SessionError::EmptyQuestion);
        }
        if self.chat_busy {
            return Err(SessionError::ChannelBusy("chat"));
        }
        let addr = self.active.as_ref().ok_or(SessionError::NoActiveSection)?;
        let (chapter, section) = curriculum
            .section_at(addr)
            .ok_or(SessionError::NoActiveSection)?;

        self.conversation
            .push(ConversationTurn::new(Sender::User, question));
        self.chat_busy = true;
        Ok(ChatTicket {
            epoch: self.epoch,
            request: GenerateRequest {
                prompt: chat_prompt(&chapter.title, section, question),
                system_instruction: Some(TUTOR_SYSTEM_PROMPT.to_string()),
                response_format: ResponseFormat::Text,
            },
        })
    }

    /// Deliver a provider outcome for a chat request. Failures become a
    /// visible assistant turn rather than an out-of-band error.
    pub fn complete_chat(&mut self, ticket: ChatTicket, outcome: Result<String, String>) -> Delivery {
        if ticket.epoch != self.epoch {
            debug!("discarding stale chat response");
            return Delivery::Stale;
        }
        self.chat_busy = false;
        let text = match outcome {
            Ok(answer) => answer,
            Err(message) => {
                debug!(error = %message, "chat request failed");
                "Sorry, I ran into a problem answering that. Please try again.".to_string()
            }
        };
        self.conversation
            .push(ConversationTurn::new(Sender::Assistant, text));
        Delivery::Applied
    }

    /// Run one chat exchange end to end against a client.
    pub async fn send_chat(
        &mut self,
        question: &str,
        curriculum: &Curriculum,
        client: &dyn TutorClient,
    ) -> Result<Delivery, SessionError> {
        let ticket = self.begin_chat(question, curriculum)?;
        let outcome = client
            .generate(&ticket.request)
            .await
            .map(|response| response.text)
            .map_err(|e| e.to_string());
        Ok(self.complete_chat(ticket, outcome))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::GenerateResponse;
    use async_trait::async_trait;

    const CURRICULUM: &str = r#"{
        "title": "Security Basics",
        "chapters": [
            {"id": "c1", "title": "Passwords", "sections": [
                {"id": "s1", "title": "Why length matters", "content": [
                    {"kind": "paragraph", "text": "Longer passwords resist guessing."}
                ]},
                {"id": "s2", "title": "Managers", "content": [
                    {"kind": "paragraph", "text": "Use a password manager."}
                ]}
            ]}
        ]
    }"#;

    fn curriculum() -> Curriculum {
        Curriculum::from_json(CURRICULUM).unwrap()
    }

    fn started_session(curriculum: &Curriculum) -> StudySession {
        let mut session = StudySession::new();
        session.start(curriculum);
        session
    }

    struct CannedTutor {
        text: String,
    }

    #[async_trait]
    impl TutorClient for CannedTutor {
        fn name(&self) -> &str {
            "canned"
        }

        async fn generate(&self, _request: &GenerateRequest) -> anyhow::Result<GenerateResponse> {
            Ok(GenerateResponse {
                text: self.text.clone(),
            })
        }
    }

    #[test]
    fn start_lands_on_first_section() {
        let curriculum = curriculum();
        let session = started_session(&curriculum);
        assert_eq!(session.active().unwrap().to_string(), "c1/s1");
    }

    #[test]
    fn artifact_requires_active_section() {
        let curriculum = curriculum();
        let mut session = StudySession::new();
        let err = session
            .begin_artifact(ArtifactKind::Takeaways, &curriculum)
            .unwrap_err();
        assert!(matches!(err, SessionError::NoActiveSection));
    }

    #[test]
    fn artifact_channel_admits_one_request() {
        let curriculum = curriculum();
        let mut session = started_session(&curriculum);
        let _ticket = session
            .begin_artifact(ArtifactKind::Takeaways, &curriculum)
            .unwrap();
        let err = session
            .begin_artifact(ArtifactKind::Scenario, &curriculum)
            .unwrap_err();
        assert!(matches!(err, SessionError::ChannelBusy("artifact")));
    }

    #[test]
    fn successful_artifact_is_applied() {
        let curriculum = curriculum();
        let mut session = started_session(&curriculum);
        let ticket = session
            .begin_artifact(ArtifactKind::Takeaways, &curriculum)
            .unwrap();
        assert_eq!(ticket.request.response_format, ResponseFormat::Json);

        let delivery =
            session.complete_artifact(ticket, Ok(r#"{"key_takeaways": ["be long"]}"#.into()));
        assert_eq!(delivery, Delivery::Applied);
        assert!(session.artifacts().contains_key(&ArtifactKind::Takeaways));
        assert!(!session.is_artifact_busy());
        assert!(session.artifact_error().is_none());
    }

    #[test]
    fn stale_artifact_response_is_discarded() {
        let curriculum = curriculum();
        let mut session = started_session(&curriculum);
        let ticket = session
            .begin_artifact(ArtifactKind::Takeaways, &curriculum)
            .unwrap();

        // Navigate away while the request is in flight.
        session.set_section(Some(SectionAddress::new("c1", "s2")));
        let delivery =
            session.complete_artifact(ticket, Ok(r#"{"key_takeaways": ["stale"]}"#.into()));
        assert_eq!(delivery, Delivery::Stale);
        assert!(session.artifacts().is_empty());

        // The channel reopened with the navigation.
        assert!(!session.is_artifact_busy());
        session
            .begin_artifact(ArtifactKind::Takeaways, &curriculum)
            .unwrap();
    }

    #[test]
    fn parse_failure_keeps_previous_artifacts() {
        let curriculum = curriculum();
        let mut session = started_session(&curriculum);

        let ticket = session
            .begin_artifact(ArtifactKind::Takeaways, &curriculum)
            .unwrap();
        session.complete_artifact(ticket, Ok(r#"{"key_takeaways": ["good"]}"#.into()));

        let ticket = session
            .begin_artifact(ArtifactKind::Scenario, &curriculum)
            .unwrap();
        let delivery = session.complete_artifact(ticket, Ok("not json at all".into()));
        assert_eq!(delivery, Delivery::Applied);
        assert!(session.artifact_error().is_some());
        // The earlier takeaways are still on the shelf.
        assert!(session.artifacts().contains_key(&ArtifactKind::Takeaways));
        assert!(!session.artifacts().contains_key(&ArtifactKind::Scenario));
    }

    #[test]
    fn provider_failure_sets_artifact_error() {
        let curriculum = curriculum();
        let mut session = started_session(&curriculum);
        let ticket = session
            .begin_artifact(ArtifactKind::Takeaways, &curriculum)
            .unwrap();
        session.complete_artifact(ticket, Err("rate limited".into()));
        assert_eq!(session.artifact_error(), Some("rate limited"));
        assert!(!session.is_artifact_busy());
    }

    #[test]
    fn chat_appends_user_turn_optimistically() {
        let curriculum = curriculum();
        let mut session = started_session(&curriculum);
        let ticket = session.begin_chat("How long is long enough?", &curriculum).unwrap();

        assert_eq!(session.conversation().len(), 1);
        assert_eq!(session.conversation()[0].sender, Sender::User);
        assert!(ticket.request.system_instruction.is_some());
        assert_eq!(ticket.request.response_format, ResponseFormat::Text);

        session.complete_chat(ticket, Ok("At least 12 characters.".into()));
        assert_eq!(session.conversation().len(), 2);
        assert_eq!(session.conversation()[1].sender, Sender::Assistant);
    }

    #[test]
    fn chat_failure_becomes_visible_turn() {
        let curriculum = curriculum();
        let mut session = started_session(&curriculum);
        let ticket = session.begin_chat("q", &curriculum).unwrap();
        session.complete_chat(ticket, Err("timeout".into()));

        assert_eq!(session.conversation().len(), 2);
        assert!(session.conversation()[1].text.contains("problem answering"));
        assert!(!session.is_chat_busy());
    }

    #[test]
    fn empty_question_is_rejected() {
        let curriculum = curriculum();
        let mut session = started_session(&curriculum);
        let err = session.begin_chat("   ", &curriculum).unwrap_err();
        assert!(matches!(err, SessionError::EmptyQuestion));
        assert!(session.conversation().is_empty());
    }

    #[test]
    fn stale_chat_response_is_discarded() {
        let curriculum = curriculum();
        let mut session = started_session(&curriculum);
        let ticket = session.begin_chat("q", &curriculum).unwrap();

        session.set_section(Some(SectionAddress::new("c1", "s2")));
        let delivery = session.complete_chat(ticket, Ok("late answer".into()));
        assert_eq!(delivery, Delivery::Stale);
        // The navigation cleared the conversation; the late answer stayed out.
        assert!(session.conversation().is_empty());
    }

    #[test]
    fn navigation_resets_everything() {
        let curriculum = curriculum();
        let mut session = started_session(&curriculum);

        let ticket = session
            .begin_artifact(ArtifactKind::Takeaways, &curriculum)
            .unwrap();
        session.complete_artifact(ticket, Ok(r#"{"key_takeaways": ["a"]}"#.into()));
        let ticket = session.begin_chat("q", &curriculum).unwrap();
        session.complete_chat(ticket, Ok("a".into()));

        session.set_section(Some(SectionAddress::new("c1", "s2")));
        assert!(session.artifacts().is_empty());
        assert!(session.conversation().is_empty());
        assert!(session.artifact_error().is_none());
        assert!(!session.is_artifact_busy());
        assert!(!session.is_chat_busy());
    }

    #[test]
    fn answer_reveals_reset_with_fresh_questions() {
        let curriculum = curriculum();
        let mut session = started_session(&curriculum);

        session.toggle_answer(0);
        assert!(session.is_answer_revealed(0));
        session.toggle_answer(0);
        assert!(!session.is_answer_revealed(0));

        session.toggle_answer(1);
        let ticket = session
            .begin_artifact(ArtifactKind::ReviewQuestions, &curriculum)
            .unwrap();
        session.complete_artifact(
            ticket,
            Ok(r#"{"review_questions": [{"question": "q", "answer": "a"}]}"#.into()),
        );
        // A fresh question set starts with every answer hidden.
        assert!(!session.is_answer_revealed(1));
    }

    #[tokio::test]
    async fn request_artifact_end_to_end() {
        let curriculum = curriculum();
        let mut session = started_session(&curriculum);
        let client = CannedTutor {
            text: "```json\n{\"key_takeaways\": [\"fenced but fine\"]}\n```".into(),
        };

        let delivery = session
            .request_artifact(ArtifactKind::Takeaways, &curriculum, &client)
            .await
            .unwrap();
        assert_eq!(delivery, Delivery::Applied);
        let GeneratedArtifact::Takeaways(payload) =
            &session.artifacts()[&ArtifactKind::Takeaways]
        else {
            panic!("wrong artifact");
        };
        assert_eq!(payload.key_takeaways, vec!["fenced but fine"]);
    }

    #[tokio::test]
    async fn send_chat_end_to_end() {
        let curriculum = curriculum();
        let mut session = started_session(&curriculum);
        let client = CannedTutor {
            text: "Use a manager.".into(),
        };

        let delivery = session.send_chat("Managers?", &curriculum, &client).await.unwrap();
        assert_eq!(delivery, Delivery::Applied);
        assert_eq!(session.conversation().len(), 2);
        assert_eq!(session.conversation()[1].text, "Use a manager.");
    }
}
