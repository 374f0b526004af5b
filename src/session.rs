use crate::config::{CourseBinding, Deployment, SessionSettings};
use crate::countdown::{Countdown, Tick};
use crate::error::ApiError;
use crate::input::{LoginForm, TextInput};
use crate::models::{
    AnswerRecord, ApiRequest, ApiResponse, CheckUserOutcome, CheckUserRequest, Course,
    FinalizeRequest, FinalizeResult, Question, QuizStart, RetakeOutcome, RetakeRequest,
};
use tracing::{debug, info, warn};

pub const CONNECTION_ERROR: &str = "Error connecting to server.";
pub const FINALIZE_ERROR: &str = "Something went wrong. Please try again.";

/// Client-held state for one attempt by one identity.
#[derive(Debug, Clone)]
pub struct Session {
    pub identity: String,
    pub full_name: String,
    pub course: Option<String>,
    pub questions: Vec<Question>,
    pub answers: Vec<AnswerRecord>,
    pub current_index: usize,
    pub countdown: Countdown,
    pub attempt: Option<u32>,
}

impl Session {
    fn begin(
        identity: String,
        full_name: String,
        course: Option<String>,
        start: QuizStart,
        time_limit_secs: u32,
    ) -> Self {
        Self {
            identity,
            full_name,
            course,
            questions: start.questions,
            answers: Vec::new(),
            current_index: 0,
            countdown: Countdown::start(time_limit_secs),
            attempt: start.attempt,
        }
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current_index)
    }

    pub fn is_complete(&self) -> bool {
        self.current_index >= self.questions.len()
    }

    /// Appends the trimmed answer for the current question and advances.
    /// Blank input is ignored and returns `false`.
    fn record_answer(&mut self, raw: &str) -> bool {
        let answer = raw.trim();
        if answer.is_empty() {
            return false;
        }
        let Some(question) = self.current_question() else {
            return false;
        };
        let record = AnswerRecord {
            index: self.current_index,
            question: question.text.clone(),
            answer: answer.to_string(),
        };
        self.answers.push(record);
        self.current_index += 1;
        true
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CourseCatalog {
    Loading,
    Loaded(Vec<Course>),
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Scored(FinalizeResult),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    CourseSelection {
        catalog: CourseCatalog,
        selected: usize,
    },
    Login {
        message: Option<String>,
        retake_offered: bool,
        pending: bool,
    },
    Answering,
    Finalizing,
    Finished {
        outcome: Outcome,
        retake_message: Option<String>,
        retake_pending: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenKind {
    CourseSelection,
    Login,
    Answering,
    Finalizing,
    Finished,
}

impl Screen {
    fn login() -> Self {
        Screen::Login {
            message: None,
            retake_offered: false,
            pending: false,
        }
    }

    pub fn kind(&self) -> ScreenKind {
        match self {
            Screen::CourseSelection { .. } => ScreenKind::CourseSelection,
            Screen::Login { .. } => ScreenKind::Login,
            Screen::Answering => ScreenKind::Answering,
            Screen::Finalizing => ScreenKind::Finalizing,
            Screen::Finished { .. } => ScreenKind::Finished,
        }
    }
}

#[derive(Debug)]
pub enum Event {
    ReloadCourses,
    CourseChosen(String),
    LoginSubmitted { identity: String, full_name: String },
    AnswerSubmitted(String),
    Tick,
    RetakeRequested,
    Api(ApiResponse),
}

impl From<ApiResponse> for Event {
    fn from(response: ApiResponse) -> Self {
        Event::Api(response)
    }
}

/// Owns every piece of mutable client state and applies events to it.
///
/// `handle` never performs I/O. Each event yields at most one
/// [`ApiRequest`] for the caller to execute; its response comes back as
/// [`Event::Api`].
#[derive(Debug)]
pub struct QuizController {
    settings: SessionSettings,
    multi_course: bool,
    course: Option<CourseBinding>,
    screen: Screen,
    session: Option<Session>,
    identity: String,
    full_name: String,
    pub login: LoginForm,
    pub answer_input: TextInput,
}

impl QuizController {
    pub fn new(deployment: Deployment, settings: SessionSettings) -> Self {
        let screen = if deployment.needs_course_selection() {
            Screen::CourseSelection {
                catalog: CourseCatalog::Loading,
                selected: 0,
            }
        } else {
            Screen::login()
        };
        Self {
            settings,
            multi_course: deployment.multi_course,
            course: deployment.course,
            screen,
            session: None,
            identity: String::new(),
            full_name: String::new(),
            login: LoginForm::default(),
            answer_input: TextInput::default(),
        }
    }

    /// Request issued once at startup, if any.
    pub fn start(&mut self) -> Option<ApiRequest> {
        match self.screen {
            Screen::CourseSelection { .. } => Some(ApiRequest::FetchCourses),
            _ => None,
        }
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn course(&self) -> Option<&CourseBinding> {
        self.course.as_ref()
    }

    pub fn settings(&self) -> SessionSettings {
        self.settings
    }

    pub fn is_multi_course(&self) -> bool {
        self.multi_course
    }

    pub fn countdown_active(&self) -> bool {
        matches!(self.screen, Screen::Answering)
            && self
                .session
                .as_ref()
                .is_some_and(|session| session.countdown.is_active())
    }

    pub fn handle(&mut self, event: Event) -> Option<ApiRequest> {
        debug!(screen = ?self.screen.kind(), ?event, "handling event");
        match event {
            Event::ReloadCourses => self.reload_courses(),
            Event::CourseChosen(id) => {
                self.choose_course(&id);
                None
            }
            Event::LoginSubmitted {
                identity,
                full_name,
            } => self.submit_login(identity, full_name),
            Event::AnswerSubmitted(text) => self.submit_answer(&text),
            Event::Tick => self.tick(),
            Event::RetakeRequested => self.request_retake(),
            Event::Api(ApiResponse::Courses(result)) => {
                self.on_courses(result);
                None
            }
            Event::Api(ApiResponse::CheckUser(result)) => self.on_check_user(result),
            Event::Api(ApiResponse::Finalize(result)) => {
                self.on_finalized(result);
                None
            }
            Event::Api(ApiResponse::Retake(result)) => self.on_retake(result),
        }
    }

    pub fn move_course_selection(&mut self, delta: isize) {
        if let Screen::CourseSelection {
            catalog: CourseCatalog::Loaded(courses),
            selected,
        } = &mut self.screen
            && !courses.is_empty()
        {
            let last = courses.len() - 1;
            *selected = selected.saturating_add_signed(delta).min(last);
        }
    }

    pub fn selected_course(&self) -> Option<&Course> {
        match &self.screen {
            Screen::CourseSelection {
                catalog: CourseCatalog::Loaded(courses),
                selected,
            } => courses.get(*selected),
            _ => None,
        }
    }

    fn course_id(&self) -> Option<String> {
        self.course.as_ref().map(|course| course.id.clone())
    }

    fn reload_courses(&mut self) -> Option<ApiRequest> {
        match &mut self.screen {
            Screen::CourseSelection { catalog, .. } if *catalog == CourseCatalog::Failed => {
                *catalog = CourseCatalog::Loading;
                Some(ApiRequest::FetchCourses)
            }
            _ => None,
        }
    }

    fn on_courses(&mut self, result: Result<Vec<Course>, ApiError>) {
        let Screen::CourseSelection { catalog, selected } = &mut self.screen else {
            return;
        };
        *selected = 0;
        *catalog = match result {
            Ok(courses) => {
                info!(count = courses.len(), "course catalog loaded");
                CourseCatalog::Loaded(courses)
            }
            Err(err) => {
                warn!(error = %err, "failed to load course catalog");
                CourseCatalog::Failed
            }
        };
    }

    fn choose_course(&mut self, id: &str) {
        let Screen::CourseSelection {
            catalog: CourseCatalog::Loaded(courses),
            ..
        } = &self.screen
        else {
            return;
        };
        let Some(course) = courses.iter().find(|course| course.id == id) else {
            warn!(course = id, "selected course is not in the catalog");
            return;
        };
        info!(course = %course.id, "course selected");
        self.course = Some(CourseBinding {
            id: course.id.clone(),
            title: course.display_title(),
        });
        self.screen = Screen::login();
    }

    fn submit_login(&mut self, identity: String, full_name: String) -> Option<ApiRequest> {
        let Screen::Login {
            message, pending, ..
        } = &mut self.screen
        else {
            return None;
        };
        if *pending {
            return None;
        }
        *pending = true;
        *message = None;
        info!(identity = %identity, "checking user");
        self.identity = identity.clone();
        self.full_name = full_name.clone();
        Some(ApiRequest::CheckUser {
            course: self.course_id(),
            request: CheckUserRequest {
                identity,
                full_name,
            },
        })
    }

    fn on_check_user(&mut self, result: Result<CheckUserOutcome, ApiError>) -> Option<ApiRequest> {
        if !matches!(self.screen, Screen::Login { pending: true, .. }) {
            return None;
        }
        match result {
            Ok(CheckUserOutcome::Ready(start)) => self.start_session(start),
            Ok(CheckUserOutcome::Taken {
                message,
                taken_count,
            }) => {
                info!(identity = %self.identity, ?taken_count, "quiz already taken");
                self.screen = Screen::Login {
                    message: Some(self.taken_message(&message, taken_count)),
                    retake_offered: self.attempts_remain(taken_count),
                    pending: false,
                };
                None
            }
            Ok(CheckUserOutcome::Rejected { message }) => {
                self.screen = Screen::Login {
                    message: Some(message),
                    retake_offered: false,
                    pending: false,
                };
                None
            }
            Err(err) => {
                warn!(error = %err, "check_user failed");
                self.screen = Screen::Login {
                    message: Some(CONNECTION_ERROR.to_string()),
                    retake_offered: false,
                    pending: false,
                };
                None
            }
        }
    }

    pub fn taken_message(&self, message: &str, taken_count: Option<u32>) -> String {
        match taken_count {
            Some(count) => format!(
                "{} (Attempts: {}/{})",
                message, count, self.settings.max_attempts
            ),
            None => message.to_string(),
        }
    }

    fn attempts_remain(&self, taken_count: Option<u32>) -> bool {
        taken_count.is_none_or(|count| count < self.settings.max_attempts)
    }

    fn start_session(&mut self, start: QuizStart) -> Option<ApiRequest> {
        if let Some(echoed) = &start.course_id
            && self.course.as_ref().is_some_and(|course| &course.id != echoed)
        {
            warn!(course = %echoed, "server answered for a different course");
        }
        let session = Session::begin(
            self.identity.clone(),
            self.full_name.clone(),
            self.course_id(),
            start,
            self.settings.time_limit_secs,
        );
        info!(
            identity = %session.identity,
            questions = session.questions.len(),
            seconds = self.settings.time_limit_secs,
            "quiz started"
        );
        let complete = session.is_complete();
        self.session = Some(session);
        self.answer_input.clear();
        self.screen = Screen::Answering;
        if complete {
            self.begin_finalize()
        } else {
            None
        }
    }

    fn submit_answer(&mut self, text: &str) -> Option<ApiRequest> {
        if !matches!(self.screen, Screen::Answering) {
            return None;
        }
        let session = self.session.as_mut()?;
        if !session.record_answer(text) {
            return None;
        }
        let complete = session.is_complete();
        debug!(index = session.current_index, "answer recorded");
        self.answer_input.clear();
        if complete { self.begin_finalize() } else { None }
    }

    fn tick(&mut self) -> Option<ApiRequest> {
        if !matches!(self.screen, Screen::Answering) {
            return None;
        }
        let session = self.session.as_mut()?;
        match session.countdown.tick() {
            Tick::Expired => {
                info!(answered = session.answers.len(), "time is up");
                self.begin_finalize()
            }
            Tick::Running | Tick::Idle => None,
        }
    }

    /// Both the last answer and countdown expiry land here. The countdown is
    /// cancelled before anything else so only the first caller emits a
    /// finalize request.
    fn begin_finalize(&mut self) -> Option<ApiRequest> {
        let session = self.session.as_mut()?;
        session.countdown.cancel();
        if !matches!(self.screen, Screen::Answering) {
            return None;
        }
        self.screen = Screen::Finalizing;
        info!(
            identity = %session.identity,
            answers = session.answers.len(),
            "finalizing quiz"
        );
        Some(ApiRequest::Finalize {
            course: session.course.clone(),
            request: FinalizeRequest {
                identity: session.identity.clone(),
                answers: session.answers.clone(),
            },
        })
    }

    fn on_finalized(&mut self, result: Result<FinalizeResult, ApiError>) {
        if !matches!(self.screen, Screen::Finalizing) {
            return;
        }
        let outcome = match result {
            Ok(result) => {
                info!(score = result.final_score, total = result.total, "quiz scored");
                Outcome::Scored(result)
            }
            Err(err) => {
                warn!(error = %err, "finalize failed");
                Outcome::Failed(FINALIZE_ERROR.to_string())
            }
        };
        self.screen = Screen::Finished {
            outcome,
            retake_message: None,
            retake_pending: false,
        };
    }

    fn request_retake(&mut self) -> Option<ApiRequest> {
        match &mut self.screen {
            Screen::Login {
                message,
                retake_offered: true,
                pending,
            } if !*pending => {
                *pending = true;
                *message = None;
            }
            Screen::Finished {
                retake_message,
                retake_pending,
                ..
            } if !*retake_pending => {
                *retake_pending = true;
                *retake_message = None;
            }
            _ => return None,
        }
        info!(identity = %self.identity, "requesting retake");
        Some(ApiRequest::Retake(RetakeRequest {
            identity: self.identity.clone(),
        }))
    }

    fn on_retake(&mut self, result: Result<RetakeOutcome, ApiError>) -> Option<ApiRequest> {
        let (text, still_offered) = match result {
            Ok(RetakeOutcome::Ready(start)) => {
                if matches!(
                    self.screen,
                    Screen::Login { pending: true, .. }
                        | Screen::Finished {
                            retake_pending: true,
                            ..
                        }
                ) {
                    return self.start_session(start);
                }
                return None;
            }
            Ok(RetakeOutcome::Rejected { message }) => {
                info!(message = %message, "retake refused");
                (message, false)
            }
            Err(err) => {
                warn!(error = %err, "retake failed");
                (CONNECTION_ERROR.to_string(), true)
            }
        };
        match &mut self.screen {
            Screen::Login {
                message,
                retake_offered,
                pending,
            } if *pending => {
                *message = Some(text);
                *retake_offered = still_offered;
                *pending = false;
            }
            Screen::Finished {
                retake_message,
                retake_pending,
                ..
            } if *retake_pending => {
                *retake_message = Some(text);
                *retake_pending = false;
            }
            _ => {}
        }
        None
    }
}
