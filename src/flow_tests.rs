//! End-to-end runs of the client against a mock quiz server: keystrokes go
//! through `handle_key`, requests through the API worker and `HttpQuizApi`.

use crate::api::HttpQuizApi;
use crate::api_worker::spawn_api_worker;
use crate::config::{CourseBinding, Deployment, SessionSettings};
use crate::input::{KeyFlow, handle_key};
use crate::models::{ApiRequest, ApiResponse};
use crate::session::{Event, FINALIZE_ERROR, Outcome, QuizController, Screen, ScreenKind};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Harness {
    controller: QuizController,
    tx: UnboundedSender<ApiRequest>,
    rx: UnboundedReceiver<ApiResponse>,
}

impl Harness {
    fn new(server: &MockServer, deployment: Deployment, settings: SessionSettings) -> Self {
        let api = HttpQuizApi::new(&server.uri(), Duration::from_secs(5)).unwrap();
        let (tx, rx, _handle) = spawn_api_worker(Arc::new(api));
        Self {
            controller: QuizController::new(deployment, settings),
            tx,
            rx,
        }
    }

    /// Sends `request` and feeds responses back until the controller stops
    /// asking for more.
    async fn settle(&mut self, mut request: Option<ApiRequest>) {
        while let Some(next) = request.take() {
            self.tx.send(next).unwrap();
            let response = self.rx.recv().await.unwrap();
            request = self.controller.handle(Event::Api(response));
        }
    }

    async fn press(&mut self, code: KeyCode) {
        match handle_key(&mut self.controller, KeyEvent::new(code, KeyModifiers::empty())) {
            KeyFlow::Continue(request) => self.settle(request).await,
            KeyFlow::Quit => panic!("unexpected quit"),
        }
    }

    async fn type_line(&mut self, text: &str) {
        for c in text.chars() {
            self.press(KeyCode::Char(c)).await;
        }
        self.press(KeyCode::Enter).await;
    }

    async fn login(&mut self, identity: &str, full_name: &str) {
        for c in identity.chars() {
            self.press(KeyCode::Char(c)).await;
        }
        self.press(KeyCode::Tab).await;
        self.type_line(full_name).await;
    }
}

fn single_course() -> Deployment {
    Deployment::default()
}

#[tokio::test]
async fn test_full_attempt_submits_answers_and_shows_score() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/check_user"))
        .and(body_json(json!({"username": "alice", "full_name": "Alice A"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "questions": ["What is 2+2?", {"q": "Name a primate."}]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/finalize"))
        .and(body_json(json!({
            "username": "alice",
            "answers": [
                {"index": 0, "question": "What is 2+2?", "answer": "4"},
                {"index": 1, "question": "Name a primate.", "answer": "Gorilla"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "final_score": 2,
            "total": 2,
            "answers": [
                {"index": 0, "feedback": "Correct.", "score": 1},
                {"index": 1, "feedback": null, "score": 1}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut harness = Harness::new(&server, single_course(), SessionSettings::default());
    harness.login("alice", "Alice A").await;
    assert_eq!(harness.controller.screen().kind(), ScreenKind::Answering);

    harness.type_line("4").await;
    harness.type_line("  Gorilla ").await;

    match harness.controller.screen() {
        Screen::Finished {
            outcome: Outcome::Scored(result),
            ..
        } => {
            assert_eq!(result.final_score, 2.0);
            assert_eq!(result.total, 2);
            assert_eq!(result.answers[1].feedback, None);
        }
        other => panic!("expected a scored result, got {:?}", other),
    }
}

#[tokio::test]
async fn test_taken_user_sees_attempt_count_and_can_retake() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/ml_auto/check_user"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "taken": true,
            "error": "Already attempted",
            "taken_count": 2
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/retake"))
        .and(body_json(json!({"username": "bob"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "questions": ["Define overfitting."],
            "taken_count": 3
        })))
        .expect(1)
        .mount(&server)
        .await;

    let deployment = Deployment {
        multi_course: false,
        course: Some(CourseBinding::from_id("ml_auto")),
    };
    let mut harness = Harness::new(&server, deployment, SessionSettings::default());
    harness.login("bob", "Bob B").await;

    assert_eq!(
        harness.controller.screen(),
        &Screen::Login {
            message: Some("Already attempted (Attempts: 2/3)".to_string()),
            retake_offered: true,
            pending: false,
        }
    );

    let retake = KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL);
    let KeyFlow::Continue(request) = handle_key(&mut harness.controller, retake) else {
        panic!("unexpected quit");
    };
    harness.settle(request).await;

    let session = harness.controller.session().unwrap();
    assert_eq!(harness.controller.screen(), &Screen::Answering);
    assert_eq!(session.attempt, Some(3));
    assert_eq!(session.questions[0].text, "Define overfitting.");
}

#[tokio::test]
async fn test_finalize_failure_shows_generic_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/check_user"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"questions": ["Only question"]})),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/finalize"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let mut harness = Harness::new(&server, single_course(), SessionSettings::default());
    harness.login("carol", "Carol C").await;
    harness.type_line("an answer").await;

    assert_eq!(
        harness.controller.screen(),
        &Screen::Finished {
            outcome: Outcome::Failed(FINALIZE_ERROR.to_string()),
            retake_message: None,
            retake_pending: false,
        }
    );
    assert!(!harness.controller.countdown_active());
}

#[tokio::test]
async fn test_countdown_expiry_submits_partial_answers_once() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/check_user"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"questions": ["q1", "q2", "q3"]})),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/finalize"))
        .and(body_json(json!({
            "username": "dave",
            "answers": [{"index": 0, "question": "q1", "answer": "first"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "final_score": 0.5,
            "total": 3,
            "answers": [{"index": 0, "feedback": "Partly right", "score": 0.5}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let settings = SessionSettings {
        time_limit_secs: 2,
        ..SessionSettings::default()
    };
    let mut harness = Harness::new(&server, single_course(), settings);
    harness.login("dave", "Dave D").await;
    harness.type_line("first").await;
    // typed but never submitted
    harness.press(KeyCode::Char('x')).await;

    let request = harness.controller.handle(Event::Tick);
    assert_eq!(request, None);
    let request = harness.controller.handle(Event::Tick);
    assert!(matches!(request, Some(ApiRequest::Finalize { .. })));
    assert_eq!(harness.controller.handle(Event::Tick), None);
    harness.settle(request).await;

    assert!(matches!(
        harness.controller.screen(),
        Screen::Finished {
            outcome: Outcome::Scored(result),
            ..
        } if result.final_score == 0.5
    ));
    assert_eq!(harness.controller.handle(Event::Tick), None);
}

#[tokio::test]
async fn test_multi_course_selection_scopes_login() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/courses"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "courses": [
                {"id": "ml_auto", "title": "Machine Learning", "question_count": 12},
                {"id": "db", "description": "Databases", "question_count": 4}
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/db/check_user"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "username and full_name required"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let deployment = Deployment {
        multi_course: true,
        course: None,
    };
    let mut harness = Harness::new(&server, deployment, SessionSettings::default());
    let start = harness.controller.start();
    harness.settle(start).await;

    harness.press(KeyCode::Down).await;
    harness.press(KeyCode::Enter).await;
    assert_eq!(harness.controller.course().unwrap().title, "DB");

    harness.press(KeyCode::Enter).await;
    assert!(matches!(
        harness.controller.screen(),
        Screen::Login { message: Some(m), pending: false, .. } if m == "username and full_name required"
    ));
}
