pub mod client;

pub use client::HttpQuizApi;

use crate::error::ApiError;
use crate::models::{
    ApiRequest, ApiResponse, CheckUserOutcome, CheckUserRequest, Course, FinalizeRequest,
    FinalizeResult, RetakeOutcome, RetakeRequest,
};
use async_trait::async_trait;

/// The quiz server as seen by the client. `course` scopes a call to
/// `/api/<course>/...` when set.
#[async_trait]
pub trait QuizApi: Send + Sync {
    async fn list_courses(&self) -> Result<Vec<Course>, ApiError>;

    async fn check_user(
        &self,
        course: Option<&str>,
        request: &CheckUserRequest,
    ) -> Result<CheckUserOutcome, ApiError>;

    async fn finalize(
        &self,
        course: Option<&str>,
        request: &FinalizeRequest,
    ) -> Result<FinalizeResult, ApiError>;

    async fn retake(&self, request: &RetakeRequest) -> Result<RetakeOutcome, ApiError>;
}

/// Runs one controller request against `api`.
pub async fn execute(api: &dyn QuizApi, request: ApiRequest) -> ApiResponse {
    match request {
        ApiRequest::FetchCourses => ApiResponse::Courses(api.list_courses().await),
        ApiRequest::CheckUser { course, request } => {
            ApiResponse::CheckUser(api.check_user(course.as_deref(), &request).await)
        }
        ApiRequest::Finalize { course, request } => {
            ApiResponse::Finalize(api.finalize(course.as_deref(), &request).await)
        }
        ApiRequest::Retake(request) => ApiResponse::Retake(api.retake(&request).await),
    }
}
