//! Session driver: turns operator lines into session transitions.

use chrono::Utc;
use consult_core::intake::{self, INTAKE_GREETING};
use consult_core::session::{Mode, Session, UserInput};
use consult_core::{CompletionGateway, GenerationParams, Result};
use std::sync::Arc;

/// Result of handling one operator line.
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionResult {
    /// Blank input; nothing happened.
    NoOp,
    /// The operator asked to end the session.
    Exit,
    /// The session was reset. Guided intake also carries the greeting that
    /// became the first assistant turn.
    Cleared { greeting: Option<String> },
    /// Rendered patient record, or `None` when the mode keeps no record.
    Summary(Option<String>),
    /// Mode after a switch request; `changed` is false for a no-op switch.
    ModeChanged { mode: Mode, changed: bool },
    /// Answer to a bare `mode`.
    CurrentMode(Mode),
    Help(String),
    /// Assistant reply appended to the transcript.
    Reply { content: String, is_final: bool },
    /// Recoverable per-turn failure; the transcript was rolled back.
    Error(String),
}

/// How a reply is obtained.
///
/// `Greeting` never reaches the gateway: its text is the reply.
#[derive(Debug, Clone, Copy)]
enum ReplyRequest<'a> {
    Greeting(&'a str),
    Completion,
}

/// Owns the live session and drives it one operator line at a time.
///
/// Each call to [`handle_input`](Self::handle_input) finishes (including
/// its gateway call) before the next line is accepted.
pub struct InteractionManager {
    gateway: Arc<dyn CompletionGateway>,
    session: Session,
    max_tokens: u32,
}

impl InteractionManager {
    pub fn new(gateway: Arc<dyn CompletionGateway>, mode: Mode, max_tokens: u32) -> Self {
        Self {
            gateway,
            session: Session::new(mode),
            max_tokens,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn mode(&self) -> Mode {
        self.session.mode()
    }

    /// Opens the session. In guided intake this appends the greeting turn
    /// and returns it.
    pub async fn start(&mut self) -> Option<String> {
        self.greet_if_intake().await
    }

    /// Handles one raw operator line.
    pub async fn handle_input(&mut self, line: &str) -> InteractionResult {
        match UserInput::parse(line) {
            UserInput::Empty => InteractionResult::NoOp,
            UserInput::Exit => {
                tracing::info!(session_id = %self.session.id, "Session ended by operator");
                InteractionResult::Exit
            }
            UserInput::Clear => self.clear().await,
            UserInput::Summary => self.summary(),
            UserInput::ToggleJson => {
                let target = self.mode().json_toggled();
                self.switch_mode(target)
            }
            UserInput::Mode(Some(mode)) => self.switch_mode(mode),
            UserInput::Mode(None) => InteractionResult::CurrentMode(self.mode()),
            UserInput::Help => InteractionResult::Help(help_text(self.mode())),
            UserInput::Reply(text) => self.handle_reply(&text).await,
        }
    }

    async fn clear(&mut self) -> InteractionResult {
        self.session = self.session.cleared();
        tracing::info!(session_id = %self.session.id, mode = %self.mode(), "Session cleared");
        let greeting = self.greet_if_intake().await;
        InteractionResult::Cleared { greeting }
    }

    fn summary(&self) -> InteractionResult {
        match self.mode() {
            Mode::GuidedIntake => {
                InteractionResult::Summary(Some(self.session.record().render_summary()))
            }
            _ => InteractionResult::Summary(None),
        }
    }

    fn switch_mode(&mut self, mode: Mode) -> InteractionResult {
        let changed = self.session.switch_mode(mode);
        InteractionResult::ModeChanged { mode, changed }
    }

    async fn greet_if_intake(&mut self) -> Option<String> {
        if self.mode() != Mode::GuidedIntake {
            return None;
        }
        // Greeting requests never reach the gateway and cannot fail.
        let greeting = self
            .fetch_reply(ReplyRequest::Greeting(INTAKE_GREETING))
            .await
            .ok()?;
        self.session.history_mut().append_assistant(greeting.clone());
        Some(greeting)
    }

    async fn handle_reply(&mut self, text: &str) -> InteractionResult {
        let intake = self.mode() == Mode::GuidedIntake;

        self.session.history_mut().append_user(text);

        if intake {
            // A failed first turn leaves `main_complaint` behind, so the
            // retry is filed as a follow-up rather than a second first reply.
            let is_first_reply = self.session.record().main_complaint.is_none();
            let tags = intake::classify(text);
            tracing::debug!(?tags, is_first_reply, "Extracting facts from reply");
            let record = std::mem::take(self.session.record_mut());
            self.session
                .set_record(intake::extract(record, text, is_first_reply, Utc::now()));
        }

        match self.fetch_reply(ReplyRequest::Completion).await {
            Ok(reply) => {
                let is_final = intake && intake::is_final(&reply);
                self.session.history_mut().append_assistant(reply.clone());
                if is_final {
                    tracing::info!(session_id = %self.session.id, "Final intake summary received");
                    self.session.record_mut().final_recommendations = Some(reply.clone());
                }
                InteractionResult::Reply {
                    content: reply,
                    is_final,
                }
            }
            Err(e) => {
                tracing::warn!(session_id = %self.session.id, "Gateway call failed, rolling back turn: {e}");
                self.session.history_mut().rollback_last_user();
                if intake {
                    self.session.record_mut().remove_last_response();
                }
                InteractionResult::Error(e.to_string())
            }
        }
    }

    async fn fetch_reply(&self, request: ReplyRequest<'_>) -> Result<String> {
        match request {
            ReplyRequest::Greeting(text) => Ok(text.to_string()),
            ReplyRequest::Completion => {
                let params = GenerationParams {
                    temperature: self.session.temperature(),
                    max_tokens: self.max_tokens,
                };
                self.gateway
                    .complete(self.session.history().snapshot(), params)
                    .await
            }
        }
    }
}

fn help_text(mode: Mode) -> String {
    let mut lines = vec![
        format!("Current mode: {mode}"),
        "Commands:".to_string(),
        "  exit            end the session".to_string(),
        "  clear           start over with an empty history".to_string(),
        "  json            toggle structured-json / plain".to_string(),
        "  mode [name]     show or switch mode (plain, json, intake)".to_string(),
    ];
    if mode == Mode::GuidedIntake {
        lines.push("  summary         show the patient record collected so far".to_string());
    }
    lines.push("  help            show this list".to_string());
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use consult_core::session::{ModeRegistry, Role, Turn};
    use consult_core::{ConsultError, NO_ANSWER_FALLBACK};
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Gateway that replays scripted outcomes and records every request.
    struct ScriptedGateway {
        outcomes: Mutex<VecDeque<Result<String>>>,
        requests: Mutex<Vec<(Vec<Turn>, GenerationParams)>>,
    }

    impl ScriptedGateway {
        fn new(outcomes: Vec<Result<String>>) -> Arc<Self> {
            Arc::new(Self {
                outcomes: Mutex::new(outcomes.into()),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn requests(&self) -> Vec<(Vec<Turn>, GenerationParams)> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl CompletionGateway for ScriptedGateway {
        async fn complete(&self, turns: &[Turn], params: GenerationParams) -> Result<String> {
            self.requests.lock().unwrap().push((turns.to_vec(), params));
            self.outcomes
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(NO_ANSWER_FALLBACK.to_string()))
        }
    }

    fn manager(gateway: &Arc<ScriptedGateway>, mode: Mode) -> InteractionManager {
        InteractionManager::new(gateway.clone(), mode, 1024)
    }

    fn failure() -> Result<String> {
        Err(ConsultError::gateway(Some(500), "boom"))
    }

    #[tokio::test]
    async fn test_plain_reply_round_trip() {
        let gateway = ScriptedGateway::new(vec![Ok("Hi there".into())]);
        let mut mgr = manager(&gateway, Mode::Plain);

        let result = mgr.handle_input("hello").await;

        assert_eq!(
            result,
            InteractionResult::Reply {
                content: "Hi there".into(),
                is_final: false
            }
        );
        let turns = mgr.session().history().snapshot();
        assert_eq!(turns.len(), 3);
        assert_eq!(turns[1], Turn::user("hello"));
        assert_eq!(turns[2], Turn::assistant("Hi there"));

        let requests = gateway.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].0.len(), 2);
        assert_eq!(requests[0].1.temperature, 0.7);
        assert_eq!(requests[0].1.max_tokens, 1024);
    }

    #[tokio::test]
    async fn test_gateway_failure_rolls_back_user_turn() {
        let gateway = ScriptedGateway::new(vec![Ok("first".into()), failure()]);
        let mut mgr = manager(&gateway, Mode::Plain);
        mgr.handle_input("hello").await;
        let before = mgr.session().history().len();

        let result = mgr.handle_input("test").await;

        assert!(matches!(result, InteractionResult::Error(ref m) if m.contains("boom")));
        assert_eq!(mgr.session().history().len(), before);
        assert_eq!(
            mgr.session().history().last(),
            Some(&Turn::assistant("first"))
        );
    }

    #[tokio::test]
    async fn test_session_continues_after_failure() {
        let gateway = ScriptedGateway::new(vec![failure(), Ok("recovered".into())]);
        let mut mgr = manager(&gateway, Mode::Plain);

        mgr.handle_input("test").await;
        let result = mgr.handle_input("test again").await;

        assert!(matches!(result, InteractionResult::Reply { ref content, .. } if content == "recovered"));
        let requests = gateway.requests();
        // The failed user turn is not resent.
        assert_eq!(requests[1].0.len(), 2);
        assert_eq!(requests[1].0[1], Turn::user("test again"));
    }

    #[tokio::test]
    async fn test_blank_input_is_ignored() {
        let gateway = ScriptedGateway::new(vec![]);
        let mut mgr = manager(&gateway, Mode::Plain);

        assert_eq!(mgr.handle_input("   ").await, InteractionResult::NoOp);
        assert_eq!(mgr.session().history().len(), 1);
        assert!(gateway.requests().is_empty());
    }

    #[tokio::test]
    async fn test_exit() {
        let gateway = ScriptedGateway::new(vec![]);
        let mut mgr = manager(&gateway, Mode::Plain);
        assert_eq!(mgr.handle_input("Exit").await, InteractionResult::Exit);
    }

    #[tokio::test]
    async fn test_json_toggle_rewrites_only_system_turn() {
        let gateway = ScriptedGateway::new(vec![Ok("answer".into()), Ok("{}".into())]);
        let mut mgr = manager(&gateway, Mode::Plain);
        mgr.handle_input("question").await;
        let tail: Vec<Turn> = mgr.session().history().snapshot()[1..].to_vec();

        let result = mgr.handle_input("JSON").await;

        assert_eq!(
            result,
            InteractionResult::ModeChanged {
                mode: Mode::StructuredJson,
                changed: true
            }
        );
        assert_eq!(
            mgr.session().history().system_prompt(),
            Some(ModeRegistry::system_prompt_for(Mode::StructuredJson))
        );
        assert_eq!(&mgr.session().history().snapshot()[1..], tail.as_slice());

        mgr.handle_input("again").await;
        assert_eq!(gateway.requests()[1].1.temperature, 0.3);

        let result = mgr.handle_input("json").await;
        assert_eq!(
            result,
            InteractionResult::ModeChanged {
                mode: Mode::Plain,
                changed: true
            }
        );
    }

    #[tokio::test]
    async fn test_intake_start_uses_greeting_without_gateway() {
        let gateway = ScriptedGateway::new(vec![]);
        let mut mgr = manager(&gateway, Mode::GuidedIntake);

        let greeting = mgr.start().await;

        assert_eq!(greeting.as_deref(), Some(INTAKE_GREETING));
        assert!(gateway.requests().is_empty());
        let turns = mgr.session().history().snapshot();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[1], Turn::assistant(INTAKE_GREETING));
    }

    #[tokio::test]
    async fn test_plain_start_has_no_greeting() {
        let gateway = ScriptedGateway::new(vec![]);
        let mut mgr = manager(&gateway, Mode::Plain);
        assert_eq!(mgr.start().await, None);
        assert_eq!(mgr.session().history().len(), 1);
    }

    #[tokio::test]
    async fn test_intake_reply_updates_record() {
        let gateway = ScriptedGateway::new(vec![
            Ok("When did it start?".into()),
            Ok("Are you taking anything?".into()),
        ]);
        let mut mgr = manager(&gateway, Mode::GuidedIntake);
        mgr.start().await;

        mgr.handle_input("Headache, I'm allergic to aspirin").await;
        mgr.handle_input("Two days ago").await;

        let record = mgr.session().record();
        assert_eq!(
            record.main_complaint.as_deref(),
            Some("Headache, I'm allergic to aspirin")
        );
        assert_eq!(record.allergies.len(), 1);
        assert_eq!(record.symptoms, vec!["Two days ago".to_string()]);
        assert_eq!(record.responses.len(), 2);
        assert!(record.final_recommendations.is_none());
    }

    #[tokio::test]
    async fn test_final_summary_is_recorded() {
        let summary = "1) Complaint summary: headache. This does not replace an in-person medical exam.";
        let gateway = ScriptedGateway::new(vec![Ok(summary.into())]);
        let mut mgr = manager(&gateway, Mode::GuidedIntake);
        mgr.start().await;

        let result = mgr.handle_input("Headache").await;

        assert_eq!(
            result,
            InteractionResult::Reply {
                content: summary.into(),
                is_final: true
            }
        );
        assert_eq!(
            mgr.session().record().final_recommendations.as_deref(),
            Some(summary)
        );
    }

    #[tokio::test]
    async fn test_markers_outside_intake_are_not_final() {
        let gateway = ScriptedGateway::new(vec![Ok("1) first 2) second".into())]);
        let mut mgr = manager(&gateway, Mode::Plain);

        let result = mgr.handle_input("list two things").await;

        assert!(matches!(result, InteractionResult::Reply { is_final: false, .. }));
    }

    #[tokio::test]
    async fn test_intake_failure_removes_only_response_log_entry() {
        let gateway = ScriptedGateway::new(vec![failure()]);
        let mut mgr = manager(&gateway, Mode::GuidedIntake);
        mgr.start().await;
        let history_len = mgr.session().history().len();

        let result = mgr.handle_input("I have a chronic cough").await;

        assert!(matches!(result, InteractionResult::Error(_)));
        assert_eq!(mgr.session().history().len(), history_len);
        let record = mgr.session().record();
        assert!(record.responses.is_empty());
        // Categorized side effects of the failed turn remain.
        assert_eq!(record.main_complaint.as_deref(), Some("I have a chronic cough"));
        assert_eq!(record.chronic_conditions.len(), 1);
    }

    #[tokio::test]
    async fn test_retry_after_failed_first_reply_is_a_symptom() {
        let gateway = ScriptedGateway::new(vec![failure(), Ok("Any other symptoms?".into())]);
        let mut mgr = manager(&gateway, Mode::GuidedIntake);
        mgr.start().await;

        mgr.handle_input("Headache").await;
        let result = mgr
            .handle_input("Sharp pain behind the eyes since Monday")
            .await;

        assert!(matches!(result, InteractionResult::Reply { .. }));
        let record = mgr.session().record();
        assert_eq!(record.main_complaint.as_deref(), Some("Headache"));
        assert_eq!(
            record.symptoms,
            vec!["Sharp pain behind the eyes since Monday".to_string()]
        );
        assert_eq!(record.responses.len(), 1);
        assert_eq!(
            record.responses[0].text,
            "Sharp pain behind the eyes since Monday"
        );
    }

    #[tokio::test]
    async fn test_intake_reply_is_recorded_verbatim() {
        let gateway = ScriptedGateway::new(vec![Ok("Since when?".into())]);
        let mut mgr = manager(&gateway, Mode::GuidedIntake);
        mgr.start().await;

        mgr.handle_input("  Sore throat ").await;

        assert_eq!(
            mgr.session().record().main_complaint.as_deref(),
            Some("  Sore throat ")
        );
        assert_eq!(
            mgr.session().history().last(),
            Some(&Turn::assistant("Since when?"))
        );
        assert_eq!(
            mgr.session().history().snapshot()[2],
            Turn::user("  Sore throat ")
        );
    }

    #[tokio::test]
    async fn test_clear_in_intake_resets_and_greets() {
        let gateway = ScriptedGateway::new(vec![Ok("Where does it hurt?".into())]);
        let mut mgr = manager(&gateway, Mode::GuidedIntake);
        mgr.start().await;
        mgr.handle_input("Back pain").await;
        let old_id = mgr.session().id.clone();

        let result = mgr.handle_input("clear").await;

        assert_eq!(
            result,
            InteractionResult::Cleared {
                greeting: Some(INTAKE_GREETING.to_string())
            }
        );
        assert_ne!(mgr.session().id, old_id);
        assert!(mgr.session().record().is_empty());
        let turns = mgr.session().history().snapshot();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].role, Role::System);
        assert_eq!(turns[1], Turn::assistant(INTAKE_GREETING));
        assert_eq!(gateway.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_clear_in_plain_leaves_single_system_turn() {
        let gateway = ScriptedGateway::new(vec![Ok("hi".into())]);
        let mut mgr = manager(&gateway, Mode::Plain);
        mgr.handle_input("hello").await;

        let result = mgr.handle_input("CLEAR").await;

        assert_eq!(result, InteractionResult::Cleared { greeting: None });
        assert_eq!(mgr.session().history().len(), 1);
        assert_eq!(mgr.mode(), Mode::Plain);
    }

    #[tokio::test]
    async fn test_summary_is_read_only() {
        let gateway = ScriptedGateway::new(vec![Ok("How long?".into())]);
        let mut mgr = manager(&gateway, Mode::GuidedIntake);
        mgr.start().await;
        mgr.handle_input("Sore throat").await;
        let len = mgr.session().history().len();

        let result = mgr.handle_input("summary").await;

        match result {
            InteractionResult::Summary(Some(text)) => {
                assert!(text.contains("Main complaint: Sore throat"))
            }
            other => panic!("Expected summary, got {other:?}"),
        }
        assert_eq!(mgr.session().history().len(), len);
    }

    #[tokio::test]
    async fn test_summary_outside_intake() {
        let gateway = ScriptedGateway::new(vec![]);
        let mut mgr = manager(&gateway, Mode::StructuredJson);
        assert_eq!(
            mgr.handle_input("summary").await,
            InteractionResult::Summary(None)
        );
    }

    #[tokio::test]
    async fn test_mode_commands() {
        let gateway = ScriptedGateway::new(vec![]);
        let mut mgr = manager(&gateway, Mode::Plain);

        assert_eq!(
            mgr.handle_input("mode").await,
            InteractionResult::CurrentMode(Mode::Plain)
        );
        assert_eq!(
            mgr.handle_input("mode plain").await,
            InteractionResult::ModeChanged {
                mode: Mode::Plain,
                changed: false
            }
        );
        assert_eq!(
            mgr.handle_input("mode intake").await,
            InteractionResult::ModeChanged {
                mode: Mode::GuidedIntake,
                changed: true
            }
        );
        assert_eq!(mgr.mode(), Mode::GuidedIntake);
    }

    #[tokio::test]
    async fn test_mode_with_unknown_name_is_a_patient_reply() {
        let gateway = ScriptedGateway::new(vec![Ok("How severe, from 1 to 10?".into())]);
        let mut mgr = manager(&gateway, Mode::GuidedIntake);
        mgr.start().await;
        let before = mgr.session().history().len();

        let result = mgr.handle_input("mode severe").await;

        assert!(matches!(result, InteractionResult::Reply { .. }));
        assert_eq!(mgr.mode(), Mode::GuidedIntake);
        assert_eq!(mgr.session().history().len(), before + 2);
        assert_eq!(
            mgr.session().history().snapshot()[before],
            Turn::user("mode severe")
        );
        assert_eq!(mgr.session().record().main_complaint.as_deref(), Some("mode severe"));
    }

    #[tokio::test]
    async fn test_help_mentions_summary_only_in_intake() {
        let gateway = ScriptedGateway::new(vec![]);
        let mut mgr = manager(&gateway, Mode::Plain);
        match mgr.handle_input("help").await {
            InteractionResult::Help(text) => assert!(!text.contains("summary")),
            other => panic!("Expected help, got {other:?}"),
        }

        mgr.handle_input("mode intake").await;
        match mgr.handle_input("help").await {
            InteractionResult::Help(text) => assert!(text.contains("summary")),
            other => panic!("Expected help, got {other:?}"),
        }
    }
}
