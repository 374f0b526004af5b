use crate::error::ApiError;
use serde::{Deserialize, Serialize};

/// A question as the client uses it. The server may send either a bare
/// string or an object; both decode into this form.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "QuestionWire")]
pub struct Question {
    pub text: String,
}

impl Question {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum QuestionWire {
    Text(String),
    Record {
        #[serde(alias = "text")]
        q: String,
    },
}

impl From<QuestionWire> for Question {
    fn from(wire: QuestionWire) -> Self {
        match wire {
            QuestionWire::Text(text) => Question { text },
            QuestionWire::Record { q } => Question { text: q },
        }
    }
}

/// One submitted answer. Serialized as `{index, question, answer}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub index: usize,
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Course {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub question_count: usize,
}

impl Course {
    pub fn display_title(&self) -> String {
        if self.title.trim().is_empty() {
            self.id.to_uppercase()
        } else {
            self.title.clone()
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CourseList {
    #[serde(default)]
    pub courses: Vec<Course>,
}

/// Questions handed out for a fresh attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizStart {
    pub questions: Vec<Question>,
    pub attempt: Option<u32>,
    pub course_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CheckUserOutcome {
    Rejected {
        message: String,
    },
    Taken {
        message: String,
        taken_count: Option<u32>,
    },
    Ready(QuizStart),
}

#[derive(Debug, Clone, PartialEq)]
pub enum RetakeOutcome {
    Rejected { message: String },
    Ready(QuizStart),
}

#[derive(Debug, Deserialize)]
pub(crate) struct CheckUserBody {
    error: Option<String>,
    taken: Option<bool>,
    message: Option<String>,
    taken_count: Option<u32>,
    questions: Option<Vec<Question>>,
    course_id: Option<String>,
}

impl TryFrom<CheckUserBody> for CheckUserOutcome {
    type Error = ApiError;

    fn try_from(body: CheckUserBody) -> Result<Self, Self::Error> {
        // The attempt-limit response carries both `taken` and `error`.
        if body.taken == Some(true) {
            let message = body
                .message
                .or(body.error)
                .unwrap_or_else(|| "Quiz already taken".to_string());
            return Ok(CheckUserOutcome::Taken {
                message,
                taken_count: body.taken_count,
            });
        }
        if let Some(message) = body.error {
            return Ok(CheckUserOutcome::Rejected { message });
        }
        let questions = body
            .questions
            .ok_or_else(|| ApiError::Rejected("response carried no questions".to_string()))?;
        Ok(CheckUserOutcome::Ready(QuizStart {
            questions,
            attempt: body.taken_count,
            course_id: body.course_id,
        }))
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RetakeBody {
    error: Option<String>,
    questions: Option<Vec<Question>>,
    taken_count: Option<u32>,
    course_id: Option<String>,
}

impl TryFrom<RetakeBody> for RetakeOutcome {
    type Error = ApiError;

    fn try_from(body: RetakeBody) -> Result<Self, Self::Error> {
        if let Some(message) = body.error {
            return Ok(RetakeOutcome::Rejected { message });
        }
        let questions = body
            .questions
            .ok_or_else(|| ApiError::Rejected("response carried no questions".to_string()))?;
        Ok(RetakeOutcome::Ready(QuizStart {
            questions,
            attempt: body.taken_count,
            course_id: body.course_id,
        }))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScoredAnswer {
    pub index: usize,
    #[serde(default)]
    pub feedback: Option<String>,
    #[serde(default)]
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FinalizeResult {
    pub final_score: f64,
    pub total: u32,
    pub answers: Vec<ScoredAnswer>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckUserRequest {
    #[serde(rename = "username")]
    pub identity: String,
    pub full_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FinalizeRequest {
    #[serde(rename = "username")]
    pub identity: String,
    pub answers: Vec<AnswerRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RetakeRequest {
    #[serde(rename = "username")]
    pub identity: String,
}

/// A call the controller wants made. `course` scopes the path when set.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiRequest {
    FetchCourses,
    CheckUser {
        course: Option<String>,
        request: CheckUserRequest,
    },
    Finalize {
        course: Option<String>,
        request: FinalizeRequest,
    },
    Retake(RetakeRequest),
}

#[derive(Debug)]
pub enum ApiResponse {
    Courses(Result<Vec<Course>, ApiError>),
    CheckUser(Result<CheckUserOutcome, ApiError>),
    Finalize(Result<FinalizeResult, ApiError>),
    Retake(Result<RetakeOutcome, ApiError>),
}
