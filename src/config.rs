use crate::error::ConfigError;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_TIME_LIMIT_SECS: u32 = 300;
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_LOG_FILE: &str = "quiz_client.log";

/// Command line options. Every flag can also come from the environment.
#[derive(Debug, Clone, Parser)]
#[command(name = "course-quiz", version, about = "Timed course quiz client for the terminal")]
pub struct Config {
    /// Base URL of the quiz server
    #[arg(long, env = "QUIZ_SERVER_URL", default_value = DEFAULT_SERVER_URL)]
    pub server: String,

    /// Course id to take the quiz for
    #[arg(long, env = "QUIZ_COURSE")]
    pub course: Option<String>,

    /// Course page path such as /course/ml_auto
    #[arg(long, env = "QUIZ_COURSE_PATH")]
    pub course_path: Option<String>,

    /// Offer a course selection screen when no course is given
    #[arg(long, env = "QUIZ_MULTI_COURSE")]
    pub multi_course: bool,

    /// Seconds allowed per attempt
    #[arg(long, env = "QUIZ_TIME_LIMIT", default_value_t = DEFAULT_TIME_LIMIT_SECS)]
    pub time_limit: u32,

    /// Attempt cap shown next to the server's taken count
    #[arg(long, env = "QUIZ_MAX_ATTEMPTS", default_value_t = DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: u32,

    /// HTTP request timeout in seconds
    #[arg(long, env = "QUIZ_REQUEST_TIMEOUT", default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)]
    pub request_timeout: u64,

    /// Where to write logs; the terminal is reserved for the quiz
    #[arg(long, env = "QUIZ_LOG_FILE", default_value = DEFAULT_LOG_FILE)]
    pub log_file: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseBinding {
    pub id: String,
    pub title: String,
}

impl CourseBinding {
    /// Binding for a course known only by id; the title defaults to the
    /// upper-cased id.
    pub fn from_id(id: &str) -> Self {
        Self {
            id: id.to_string(),
            title: id.to_uppercase(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Deployment {
    pub multi_course: bool,
    pub course: Option<CourseBinding>,
}

impl Deployment {
    pub fn needs_course_selection(&self) -> bool {
        self.multi_course && self.course.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSettings {
    pub time_limit_secs: u32,
    pub max_attempts: u32,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            time_limit_secs: DEFAULT_TIME_LIMIT_SECS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Setup {
    pub server: String,
    pub deployment: Deployment,
    pub settings: SessionSettings,
    pub request_timeout: Duration,
}

impl Config {
    pub fn validate(&self) -> Result<Setup, ConfigError> {
        let server = self.server.trim().trim_end_matches('/').to_string();
        if !(server.starts_with("http://") || server.starts_with("https://")) {
            return Err(ConfigError::ServerUrl(self.server.clone()));
        }
        if self.time_limit == 0 {
            return Err(ConfigError::TimeLimit);
        }
        if self.max_attempts == 0 {
            return Err(ConfigError::MaxAttempts);
        }

        let course = match (&self.course, &self.course_path) {
            (Some(_), Some(_)) => return Err(ConfigError::ConflictingCourse),
            (Some(id), None) => {
                let id = id.trim();
                if id.is_empty() {
                    return Err(ConfigError::EmptyCourse);
                }
                Some(CourseBinding::from_id(id))
            }
            (None, Some(path)) => Some(CourseBinding::from_id(&course_from_path(path)?)),
            (None, None) => None,
        };

        Ok(Setup {
            server,
            deployment: Deployment {
                multi_course: self.multi_course,
                course,
            },
            settings: SessionSettings {
                time_limit_secs: self.time_limit,
                max_attempts: self.max_attempts,
            },
            request_timeout: Duration::from_secs(self.request_timeout.max(1)),
        })
    }
}

/// Extracts `<id>` from `/course/<id>`, also when the path is part of a full
/// URL.
pub fn course_from_path(path: &str) -> Result<String, ConfigError> {
    let trimmed = path.trim().trim_end_matches('/');
    let with_root = if trimmed.starts_with('/') || trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    };
    match with_root.rsplit_once("/course/") {
        Some((_, id)) if !id.is_empty() && !id.contains('/') => Ok(id.to_string()),
        _ => Err(ConfigError::CoursePath(path.to_string())),
    }
}
